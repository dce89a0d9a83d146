use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ExportError, Result};

/// Client sub-object as returned by the invoicing API.
///
/// Fields are kept as raw JSON so a mistyped contact detail degrades to a
/// default instead of rejecting the payload. `None` means the key was
/// absent, `Some(Value::Null)` that it was sent as null.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ClientInfo {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub emails: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Value>,
}

impl ClientInfo {
    /// Group key: the id rendered as text, `None` when absent, null or not a scalar
    pub fn key(&self) -> Option<String> {
        match &self.id {
            None | Some(Value::Null | Value::Array(_) | Value::Object(_)) => None,
            id => Some(cell(id.as_ref())),
        }
    }

    /// String entries of `emails`; anything else is skipped
    pub fn email_list(&self) -> Vec<&str> {
        match &self.emails {
            Some(Value::Array(emails)) => emails.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Keep an explicit null distinct from a missing key
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Line item on a document; only its due date matters here
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub due_date: Option<String>,
}

/// A raw invoice document. Every field may be missing.
///
/// Display-only fields are kept as JSON values so numbers and strings are
/// written out exactly as the API sent them.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    #[serde(default)]
    pub client: Option<ClientInfo>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<LineItem>>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub document_date: Option<Value>,
    /// Download links keyed by language code
    #[serde(default)]
    pub url: Option<HashMap<String, Option<String>>>,
}

/// Decode an invoice search response. The list comes either wrapped as
/// `{"items": [...]}` or as a bare array; any other shape yields no invoices.
pub fn parse_invoice_list(body: &str, origin: &str) -> Result<Vec<InvoiceRecord>> {
    let invalid = |e: serde_json::Error| ExportError::InvalidPayload {
        origin: origin.to_string(),
        source: e,
    };

    let value: Value = serde_json::from_str(body).map_err(invalid)?;
    let list = match value {
        Value::Object(mut map) => match map.remove("items") {
            Some(items) => items,
            None => {
                tracing::warn!("{origin}: response has no invoice list, treating as empty");
                return Ok(Vec::new());
            }
        },
        list @ Value::Array(_) => list,
        _ => {
            tracing::warn!("{origin}: response is not an object or array, treating as empty");
            return Ok(Vec::new());
        }
    };

    if list.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(list).map_err(invalid)
}

/// Render an optional JSON value as a table cell. Absent and null become
/// an empty cell; strings are written without quotes.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
