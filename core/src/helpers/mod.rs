use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::debug;

pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let secs = duration.as_secs();
    let minutes = secs / 60;

    match (minutes, secs) {
        (m, _) if m >= 60 => format!("{}h {}m {}s", m / 60, m % 60, secs % 60),
        (m, _) if m > 0 => format!("{}m {}s", m, secs % 60),
        (0, s) if s >= 10 => format!("{}s", s),
        (0, s) if s > 0 => format!("{}s {}ms", s, total_ms % 1000),
        _ => format!("{}ms", total_ms),
    }
}

/// Renders a value as a single quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

pub fn load_env_from_full_path(path: &Path) {
    if let Err(e) = dotenv::from_path(path) {
        debug!("Did not load environment file {}: {}", path.display(), e);
    }
}

pub fn load_env_from_project_path(project_path: &Path) {
    load_env_from_full_path(&project_path.join(".env"));
}

#[derive(thiserror::Error, Debug)]
pub enum WriteFileError {
    #[error("Could not create dir: {0}")]
    CouldNotCreateDir(std::io::Error),

    #[error("Could not create the file: {0}")]
    CouldNotCreateFile(std::io::Error),

    #[error("Could not write to file: {0}")]
    CouldNotWriteToFile(std::io::Error),
}

pub fn write_file(path: &PathBuf, contents: &str) -> Result<(), WriteFileError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(WriteFileError::CouldNotCreateDir)?;
    }

    let mut file = fs::File::create(path).map_err(WriteFileError::CouldNotCreateFile)?;
    file.write_all(contents.as_bytes()).map_err(WriteFileError::CouldNotWriteToFile)?;
    Ok(())
}
