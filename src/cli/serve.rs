use crate::cli::commands::ServeArgs;
use crate::errors::LabsightError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs, config_path: Option<&str>) -> Result<(), LabsightError> {
    let mut config = super::load_with_db(config_path, args.db.as_deref()).await?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.static_dir {
        config.server.static_dir = Some(dir);
    }
    if args.no_seed {
        config.database.seed_sample = false;
    }

    info!(host = %config.server.host, port = config.server.port, "Starting API server");

    let state = api::create_app_state(&config).await?;
    let app = api::build_app(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| LabsightError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
