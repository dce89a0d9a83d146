use crate::invoice::{ClassifiedInvoice, ClientGroups};

/// Leading per-client columns
pub const CLIENT_COLUMNS: [&str; 4] = ["client_id", "client_name", "client_email", "client_phone"];

/// A rectangular table: every row has exactly `header.len()` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Number of invoice slots the header allocates
    pub fn invoice_slots(&self) -> usize {
        self.header.len().saturating_sub(CLIENT_COLUMNS.len()) / ClassifiedInvoice::FIELD_COUNT
    }
}

/// Column names for a table with `max_invoices` invoice slots
pub fn header(max_invoices: usize) -> Vec<String> {
    let mut header: Vec<String> = CLIENT_COLUMNS.iter().map(|c| c.to_string()).collect();
    for slot in 1..=max_invoices {
        header.extend(
            ClassifiedInvoice::FIELD_NAMES
                .iter()
                .map(|field| format!("invoice{slot}_{field}")),
        );
    }
    header
}

/// Flatten client groups into one row per client.
///
/// The header width is fixed from the largest group before any row is
/// built; shorter rows are padded with empty cells.
pub fn flatten(groups: &ClientGroups) -> Table {
    let header = header(groups.max_invoices());
    let width = header.len();

    let rows = groups
        .iter()
        .map(|group| {
            let mut row = Vec::with_capacity(width);
            row.push(group.client_id.clone());
            row.push(group.client_name.clone());
            row.push(group.client_email.clone());
            row.push(group.client_phone.clone());
            for invoice in &group.invoices {
                row.extend(invoice.cells());
            }
            row.resize(width, String::new());
            row
        })
        .collect();

    Table { header, rows }
}
