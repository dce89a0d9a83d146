mod settings;

pub use settings::{
    Config, GreenInvoiceSettings, SheetsSettings, GOOGLE_ACCESS_TOKEN_ENV,
    GREENINVOICE_API_ID_ENV, GREENINVOICE_API_SECRET_ENV,
};

use crate::error::{ExportError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.invoice-export/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "invoice-export") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".invoice-export"))
}

/// Load config.toml from the config directory.
///
/// A missing file is not an error: defaults are used and credentials are
/// expected to come from the environment.
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        tracing::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ExportError::ConfigParse { path, source: e })
}

/// Load config.toml and overlay credentials from the process environment
pub fn load_config_with_env(config_dir: &Path) -> Result<Config> {
    let mut config = load_config(config_dir)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}

/// Create the config directory and write the template
pub fn init_config(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(ExportError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"# Credentials may also be supplied through the environment:
#   GREENINVOICE_API_ID, GREENINVOICE_API_SECRET, GOOGLE_ACCESS_TOKEN

[greeninvoice]
# api_id = "your_api_id"
# api_secret = "your_api_secret"
base_url = "https://api.greeninvoice.co.il/api/v1"

[sheets]
spreadsheet = "Invoice Tracker"
worksheet = "Sheet1"
# spreadsheet_id = "1AbC..."     # optional, skips lookup by name
# access_token = "ya29..."       # OAuth token with Sheets + Drive scopes
base_url = "https://sheets.googleapis.com"
drive_base_url = "https://www.googleapis.com"
"#;
