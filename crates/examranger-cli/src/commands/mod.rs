pub mod exams;
pub mod generate;
pub mod import;
pub mod init;
pub mod rankings;
pub mod results;
pub mod review;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use examranger_store::{load_config_from, ExamrangerConfig, JsonFileStore};

/// Load configuration and open the data file it points at.
pub fn open_store(config_path: Option<&Path>) -> Result<(ExamrangerConfig, JsonFileStore)> {
    let config = load_config_from(config_path)?;
    let store = JsonFileStore::open(&config.data_file)
        .with_context(|| format!("failed to open data file: {}", config.data_file.display()))?;
    Ok((config, store))
}
