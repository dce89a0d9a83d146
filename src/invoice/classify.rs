use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt;

use super::record::{cell, InvoiceRecord};

/// Language key of the download link kept in the export
const DOWNLOAD_LINK_LANG: &str = "he";

/// Payment status relative to the run's reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    PastDue,
    ToBePaid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::PastDue => "past_due",
            InvoiceStatus::ToBePaid => "to_be_paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an invoice was left out of the export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    NoDueDate,
    UnparseableDueDate(String),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NoDueDate => write!(f, "no due date"),
            DropReason::UnparseableDueDate(raw) => write!(f, "unparseable due date '{raw}'"),
        }
    }
}

/// An invoice reduced to the exported fields plus its status
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedInvoice {
    pub status: InvoiceStatus,
    pub id: Option<Value>,
    pub amount: Option<Value>,
    pub description: Option<Value>,
    pub download_link: Option<String>,
    pub create_date: Option<Value>,
    /// The due date exactly as received
    pub due_date: String,
}

impl ClassifiedInvoice {
    /// Number of cells one invoice occupies in the flat table
    pub const FIELD_COUNT: usize = 7;

    /// Field names in column order
    pub const FIELD_NAMES: [&'static str; Self::FIELD_COUNT] = [
        "status",
        "id",
        "amount",
        "description",
        "download_link",
        "create_date",
        "due_date",
    ];

    /// Cell values in the same order as [`Self::FIELD_NAMES`]
    pub fn cells(&self) -> [String; Self::FIELD_COUNT] {
        [
            self.status.to_string(),
            cell(self.id.as_ref()),
            cell(self.amount.as_ref()),
            cell(self.description.as_ref()),
            self.download_link.clone().unwrap_or_default(),
            cell(self.create_date.as_ref()),
            self.due_date.clone(),
        ]
    }
}

/// Invoice-level due date, falling back to the first line item's.
/// Empty strings count as missing.
fn resolve_due_date(invoice: &InvoiceRecord) -> Option<&str> {
    let present = |s: &&str| !s.is_empty();
    invoice.due_date.as_deref().filter(present).or_else(|| {
        invoice
            .items
            .as_ref()?
            .first()?
            .due_date
            .as_deref()
            .filter(present)
    })
}

/// Parse the leading `YYYY-MM-DD` of a due date as midnight of that day
fn parse_due_date(raw: &str) -> Option<NaiveDateTime> {
    let head = match raw.char_indices().nth(10) {
        Some((end, _)) => &raw[..end],
        None => raw,
    };
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Classify one invoice against `now`.
///
/// A due date strictly before `now` is past due; the same instant or later
/// is still to be paid.
pub fn classify(
    invoice: &InvoiceRecord,
    now: NaiveDateTime,
) -> std::result::Result<ClassifiedInvoice, DropReason> {
    let raw_due = resolve_due_date(invoice).ok_or(DropReason::NoDueDate)?;
    let due = parse_due_date(raw_due)
        .ok_or_else(|| DropReason::UnparseableDueDate(raw_due.to_string()))?;

    let status = if due < now {
        InvoiceStatus::PastDue
    } else {
        InvoiceStatus::ToBePaid
    };

    let download_link = invoice
        .url
        .as_ref()
        .and_then(|links| links.get(DOWNLOAD_LINK_LANG))
        .cloned()
        .flatten();

    Ok(ClassifiedInvoice {
        status,
        id: invoice.id.clone(),
        amount: invoice.amount.clone(),
        description: invoice.description.clone(),
        download_link,
        create_date: invoice.document_date.clone(),
        due_date: raw_due.to_string(),
    })
}
