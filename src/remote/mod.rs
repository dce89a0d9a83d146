//! Collaborators at the edge of a run: where invoices come from and where
//! the finished table goes.

mod greeninvoice;
mod sheets;

pub use greeninvoice::GreenInvoiceClient;
pub use sheets::SheetsClient;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use ureq::Agent;

use crate::error::Result;
use crate::invoice::{parse_invoice_list, InvoiceRecord};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies the open invoices for one run
pub trait InvoiceSource {
    fn open_invoices(&self) -> Result<Vec<InvoiceRecord>>;
}

/// Replaces the contents of a destination with a CSV table
pub trait PublishSink {
    fn publish(&self, csv: &str, destination: &Destination) -> Result<()>;
}

/// A worksheet inside a named spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub spreadsheet: String,
    pub worksheet: String,
}

/// Reads a saved invoice search response from disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InvoiceSource for JsonFileSource {
    fn open_invoices(&self) -> Result<Vec<InvoiceRecord>> {
        let body = fs::read_to_string(&self.path)?;
        parse_invoice_list(&body, &self.path.display().to_string())
    }
}

fn http_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(HTTP_TIMEOUT))
        .build()
        .into()
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
