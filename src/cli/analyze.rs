use std::path::Path;
use crate::api::AppState;
use crate::cli::commands::AnalyzeArgs;
use crate::db::Database;
use crate::errors::LabsightError;
use crate::llm::create_provider;
use crate::models::UploadedFile;
use tracing::info;

pub async fn handle_analyze(args: AnalyzeArgs, config_path: Option<&str>) -> Result<(), LabsightError> {
    let mut config = super::load_with_db(config_path, args.db.as_deref()).await?;
    config.database.seed_sample = false;

    let path = Path::new(&args.file);
    let bytes = tokio::fs::read(path).await?;
    let media_type = args.media_type.clone().unwrap_or_else(|| guess_media_type(path));
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());

    info!(file = %args.file, media_type = %media_type, size = bytes.len(), "Analyzing report");
    let upload = UploadedFile::new(file_name, media_type, bytes);

    if args.dry_run {
        let provider = create_provider(&config.llm)?;
        let state = AppState::new(Database::in_memory()?, provider, &config);
        let draft = state.analyzer.build_draft(Some(upload)).await?;
        println!("{}", serde_json::to_string_pretty(&draft)?);
        return Ok(());
    }

    let state = crate::api::create_app_state(&config).await?;
    let report = state.analyzer.analyze(Some(upload)).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn guess_media_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_media_type() {
        assert_eq!(guess_media_type(Path::new("cbc.pdf")), "application/pdf");
        assert_eq!(guess_media_type(Path::new("scan.PNG")), "image/png");
        assert_eq!(guess_media_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_media_type(Path::new("notes")), "application/octet-stream");
    }
}
