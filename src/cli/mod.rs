pub mod commands;
pub mod analyze;
pub mod query;
pub mod serve;

pub use commands::{Cli, Commands};

use crate::config::{load_config, LabsightConfig};
use crate::errors::LabsightError;

/// Load the config file (or defaults) and apply a `--db` override.
pub(crate) async fn load_with_db(
    config_path: Option<&str>,
    db: Option<&str>,
) -> Result<LabsightConfig, LabsightError> {
    let mut config = load_config(config_path).await?;
    if let Some(path) = db {
        config.database.path = path.to_string();
    }
    Ok(config)
}
