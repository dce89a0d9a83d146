use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ExportError, Result};
use crate::invoice::{aggregate, ClientGroups};
use crate::remote::{Destination, InvoiceSource, PublishSink};
use crate::table::{flatten, to_csv, Table};

/// Parse a reference instant given as `YYYY-MM-DD` (midnight) or
/// `YYYY-MM-DDTHH:MM:SS[.fff]`
pub fn parse_now(value: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ExportError::InvalidNow(value.to_string()))
}

/// Fetch open invoices and group them by client
pub fn build_groups(source: &dyn InvoiceSource, now: NaiveDateTime) -> Result<ClientGroups> {
    let invoices = source.open_invoices()?;
    let groups = aggregate(&invoices, now);
    tracing::info!(
        "grouped {} invoices into {} clients",
        groups.iter().map(|g| g.invoices.len()).sum::<usize>(),
        groups.len()
    );
    Ok(groups)
}

/// Fetch, group and flatten
pub fn build_table(source: &dyn InvoiceSource, now: NaiveDateTime) -> Result<Table> {
    let table = flatten(&build_groups(source, now)?);
    tracing::debug!(
        rows = table.rows.len(),
        "table has {} invoice slots",
        table.invoice_slots()
    );
    Ok(table)
}

/// One full run: fetch, flatten, serialize, then publish when a sink is
/// given. Returns the CSV text only if every step succeeded.
pub fn export(
    source: &dyn InvoiceSource,
    sink: Option<(&dyn PublishSink, &Destination)>,
    now: NaiveDateTime,
) -> Result<String> {
    let table = build_table(source, now)?;
    let csv = to_csv(&table)?;

    if let Some((sink, destination)) = sink {
        sink.publish(&csv, destination)?;
    }

    Ok(csv)
}
