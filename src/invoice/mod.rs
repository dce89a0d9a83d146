mod aggregate;
mod classify;
mod record;

pub use aggregate::{aggregate, ClientGroup, ClientGroups, UNKNOWN_CLIENT_ID, UNKNOWN_CLIENT_NAME};
pub use classify::{classify, ClassifiedInvoice, DropReason, InvoiceStatus};
pub use record::{cell, parse_invoice_list, ClientInfo, InvoiceRecord, LineItem};
