use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;
use typesense_cluster::DesiredConfig;

use crate::error::CliError;

/// Load a desired cluster config from a JSON file, or from stdin for `-`.
pub async fn load_desired(path: &Path) -> Result<DesiredConfig, CliError> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|source| CliError::Input {
                path: path.to_path_buf(),
                source,
            })?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CliError::Input {
                path: path.to_path_buf(),
                source,
            })?
    };

    parse_desired(&raw, path)
}

fn parse_desired(raw: &str, path: &Path) -> Result<DesiredConfig, CliError> {
    serde_json::from_str(raw).map_err(|source| CliError::Desired {
        path: PathBuf::from(path),
        source,
    })
}
