pub mod config;
pub mod error;
pub mod invoice;
pub mod logging;
pub mod pipeline;
pub mod remote;
pub mod table;

pub use config::Config;
pub use error::{ExportError, Result};
pub use invoice::{aggregate, classify, ClassifiedInvoice, ClientGroup, ClientGroups, InvoiceRecord};
pub use table::{flatten, to_csv, Table};
