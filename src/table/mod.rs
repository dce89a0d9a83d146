mod delimited;
mod flatten;
mod summary;

pub use delimited::{parse_rows, to_csv, CSV_CONTENT_TYPE};
pub use flatten::{flatten, header, Table, CLIENT_COLUMNS};
pub use summary::render_summary;
