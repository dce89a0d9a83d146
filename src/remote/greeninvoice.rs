use serde::Deserialize;
use serde_json::json;
use ureq::Agent;

use super::{bearer, http_agent, InvoiceSource};
use crate::config::GreenInvoiceSettings;
use crate::error::{ExportError, Result};
use crate::invoice::{parse_invoice_list, InvoiceRecord};

/// Document search status for open invoices
const STATUS_OPEN: u8 = 0;

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Client for the Green Invoice documents API
pub struct GreenInvoiceClient {
    agent: Agent,
    base_url: String,
    api_id: String,
    api_secret: String,
}

impl GreenInvoiceClient {
    pub fn new(
        base_url: impl Into<String>,
        api_id: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            agent: http_agent(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_id: api_id.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn from_settings(settings: &GreenInvoiceSettings) -> Result<Self> {
        let (id, secret) = settings.credentials()?;
        Ok(Self::new(&settings.base_url, id, secret))
    }

    /// Exchange the API id and secret for a bearer token
    pub fn token(&self) -> Result<String> {
        let payload = json!({ "id": self.api_id, "secret": self.api_secret });
        let body = self
            .agent
            .post(format!("{}/account/token", self.base_url))
            .header("Content-Type", "application/json")
            .send(payload.to_string())?
            .body_mut()
            .read_to_string()?;

        let response: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ExportError::UnexpectedResponse {
                service: "Green Invoice",
                reason: format!("token response: {e}"),
            })?;
        Ok(response.token)
    }

    /// Search for open documents using an existing token
    pub fn search_open(&self, token: &str) -> Result<Vec<InvoiceRecord>> {
        let payload = json!({ "status": STATUS_OPEN });
        let body = self
            .agent
            .post(format!("{}/documents/search", self.base_url))
            .header("Authorization", bearer(token))
            .header("Content-Type", "application/json")
            .send(payload.to_string())?
            .body_mut()
            .read_to_string()?;

        parse_invoice_list(&body, "Green Invoice documents search")
    }
}

impl InvoiceSource for GreenInvoiceClient {
    fn open_invoices(&self) -> Result<Vec<InvoiceRecord>> {
        let token = self.token()?;
        let invoices = self.search_open(&token)?;
        tracing::info!("fetched {} open invoices", invoices.len());
        Ok(invoices)
    }
}
