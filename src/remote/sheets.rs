use serde::Deserialize;
use serde_json::json;
use ureq::Agent;
use url::Url;

use super::{bearer, http_agent, Destination, PublishSink};
use crate::config::SheetsSettings;
use crate::error::{ExportError, Result};
use crate::table::parse_rows;

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

/// Google Sheets writer. Authenticates with a ready-made OAuth access token.
pub struct SheetsClient {
    agent: Agent,
    sheets_url: String,
    drive_url: String,
    access_token: String,
    spreadsheet_id: Option<String>,
}

impl SheetsClient {
    pub fn new(
        sheets_url: impl Into<String>,
        drive_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            agent: http_agent(),
            sheets_url: sheets_url.into(),
            drive_url: drive_url.into(),
            access_token: access_token.into(),
            spreadsheet_id: None,
        }
    }

    /// Use a known spreadsheet id instead of looking it up by name
    pub fn with_spreadsheet_id(mut self, id: impl Into<String>) -> Self {
        self.spreadsheet_id = Some(id.into());
        self
    }

    pub fn from_settings(settings: &SheetsSettings) -> Result<Self> {
        let token = settings.access_token()?;
        let client = Self::new(&settings.base_url, &settings.drive_base_url, token);
        Ok(match &settings.spreadsheet_id {
            Some(id) => client.with_spreadsheet_id(id),
            None => client,
        })
    }

    /// Id of the spreadsheet called `name`, via a Drive search unless one
    /// was configured
    pub fn resolve_spreadsheet(&self, name: &str) -> Result<String> {
        if let Some(id) = &self.spreadsheet_id {
            return Ok(id.clone());
        }

        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let url = endpoint(&self.drive_url, &["drive", "v3", "files"])?;
        let body = self
            .agent
            .get(url.as_str())
            .header("Authorization", bearer(&self.access_token))
            .query("q", &query)
            .query("fields", "files(id,name)")
            .call()?
            .body_mut()
            .read_to_string()?;

        let list: DriveFileList =
            serde_json::from_str(&body).map_err(|e| ExportError::UnexpectedResponse {
                service: "Google Drive",
                reason: format!("file list: {e}"),
            })?;

        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| ExportError::SpreadsheetNotFound(name.to_string()))
    }

    /// Empty every cell of the worksheet
    pub fn clear(&self, spreadsheet_id: &str, worksheet: &str) -> Result<()> {
        let range = format!("{}:clear", sheet_range(worksheet));
        let url = endpoint(
            &self.sheets_url,
            &["v4", "spreadsheets", spreadsheet_id, "values", range.as_str()],
        )?;
        self.agent
            .post(url.as_str())
            .header("Authorization", bearer(&self.access_token))
            .header("Content-Type", "application/json")
            .send("{}")?;
        Ok(())
    }

    /// Write `rows` starting at the top-left cell, values taken verbatim
    pub fn write_rows(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        rows: &[Vec<String>],
    ) -> Result<()> {
        let range = format!("{}!A1", sheet_range(worksheet));
        let mut url = endpoint(
            &self.sheets_url,
            &["v4", "spreadsheets", spreadsheet_id, "values", range.as_str()],
        )?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let payload = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        self.agent
            .put(url.as_str())
            .header("Authorization", bearer(&self.access_token))
            .header("Content-Type", "application/json")
            .send(payload.to_string())?;
        Ok(())
    }
}

impl PublishSink for SheetsClient {
    fn publish(&self, csv: &str, destination: &Destination) -> Result<()> {
        let rows = parse_rows(csv)?;
        let id = self.resolve_spreadsheet(&destination.spreadsheet)?;

        self.clear(&id, &destination.worksheet)?;
        self.write_rows(&id, &destination.worksheet, &rows)?;

        tracing::info!(
            spreadsheet = %destination.spreadsheet,
            worksheet = %destination.worksheet,
            "published {} rows",
            rows.len()
        );
        Ok(())
    }
}

/// A1 reference to a whole worksheet; the name is always quoted
fn sheet_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

/// `base` with `segments` appended, each percent-encoded as needed
fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
