use tabled::{settings::Style, Table as TextTable, Tabled};

use crate::invoice::{ClientGroups, InvoiceStatus};

// Table row struct for tabled
#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "EMAIL")]
    email: String,
    #[tabled(rename = "INVOICES")]
    invoices: usize,
    #[tabled(rename = "PAST DUE")]
    past_due: usize,
    #[tabled(rename = "TO BE PAID")]
    to_be_paid: usize,
}

/// Human-readable per-client overview, one line per group in export order
pub fn render_summary(groups: &ClientGroups) -> String {
    let rows: Vec<ClientRow> = groups
        .iter()
        .map(|group| ClientRow {
            id: group.client_id.clone(),
            name: group.client_name.clone(),
            email: group.client_email.clone(),
            invoices: group.invoices.len(),
            past_due: group.count_with_status(InvoiceStatus::PastDue),
            to_be_paid: group.count_with_status(InvoiceStatus::ToBePaid),
        })
        .collect();

    TextTable::new(rows).with(Style::rounded()).to_string()
}
