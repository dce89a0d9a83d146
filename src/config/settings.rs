use serde::Deserialize;

use crate::error::{ExportError, Result};

pub const GREENINVOICE_API_ID_ENV: &str = "GREENINVOICE_API_ID";
pub const GREENINVOICE_API_SECRET_ENV: &str = "GREENINVOICE_API_SECRET";
pub const GOOGLE_ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub greeninvoice: GreenInvoiceSettings,
    #[serde(default)]
    pub sheets: SheetsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GreenInvoiceSettings {
    #[serde(default)]
    pub api_id: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default = "default_greeninvoice_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SheetsSettings {
    #[serde(default = "default_spreadsheet")]
    pub spreadsheet: String,
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    /// Skips the Drive lookup by name when set
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_sheets_url")]
    pub base_url: String,
    #[serde(default = "default_drive_url")]
    pub drive_base_url: String,
}

fn default_greeninvoice_url() -> String {
    "https://api.greeninvoice.co.il/api/v1".to_string()
}

fn default_spreadsheet() -> String {
    "Invoice Tracker".to_string()
}

fn default_worksheet() -> String {
    "Sheet1".to_string()
}

fn default_sheets_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_drive_url() -> String {
    "https://www.googleapis.com".to_string()
}

impl Default for GreenInvoiceSettings {
    fn default() -> Self {
        Self {
            api_id: None,
            api_secret: None,
            base_url: default_greeninvoice_url(),
        }
    }
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            spreadsheet: default_spreadsheet(),
            worksheet: default_worksheet(),
            spreadsheet_id: None,
            access_token: None,
            base_url: default_sheets_url(),
            drive_base_url: default_drive_url(),
        }
    }
}

impl Config {
    /// Overlay credentials from the environment (or any other lookup).
    /// Non-empty values win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(GREENINVOICE_API_ID_ENV) {
            self.greeninvoice.api_id = Some(v);
        }
        if let Some(v) = get(GREENINVOICE_API_SECRET_ENV) {
            self.greeninvoice.api_secret = Some(v);
        }
        if let Some(v) = get(GOOGLE_ACCESS_TOKEN_ENV) {
            self.sheets.access_token = Some(v);
        }
    }
}

impl GreenInvoiceSettings {
    /// API id and secret, or an error naming whichever is missing
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let id = self
            .api_id
            .as_deref()
            .ok_or(ExportError::MissingCredential {
                field: "greeninvoice.api_id",
                env: GREENINVOICE_API_ID_ENV,
            })?;
        let secret = self
            .api_secret
            .as_deref()
            .ok_or(ExportError::MissingCredential {
                field: "greeninvoice.api_secret",
                env: GREENINVOICE_API_SECRET_ENV,
            })?;
        Ok((id, secret))
    }
}

impl SheetsSettings {
    pub fn access_token(&self) -> Result<&str> {
        self.access_token
            .as_deref()
            .ok_or(ExportError::MissingCredential {
                field: "sheets.access_token",
                env: GOOGLE_ACCESS_TOKEN_ENV,
            })
    }
}
