use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::HashMap;

use super::classify::{classify, ClassifiedInvoice, InvoiceStatus};
use super::record::{cell, ClientInfo, InvoiceRecord};

/// Group key for invoices without a client id
pub const UNKNOWN_CLIENT_ID: &str = "unknown";
/// Name used when the client has none, or a name that is not a string.
/// A name sent as null is written as an empty cell.
pub const UNKNOWN_CLIENT_NAME: &str = "Unknown";

/// One billing entity and its invoices in the order they were seen
#[derive(Debug, Clone, PartialEq)]
pub struct ClientGroup {
    pub client_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub invoices: Vec<ClassifiedInvoice>,
}

impl ClientGroup {
    fn from_client(client_id: String, client: Option<&ClientInfo>) -> Self {
        let client_name = match client.and_then(|c| c.name.as_ref()) {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) => String::new(),
            _ => UNKNOWN_CLIENT_NAME.to_string(),
        };
        let client_email = client
            .map(|c| c.email_list().join(", "))
            .unwrap_or_default();
        let client_phone = match client.and_then(|c| c.phone.as_ref()) {
            Some(Value::String(phone)) => phone.clone(),
            _ => String::new(),
        };

        Self {
            client_id,
            client_name,
            client_email,
            client_phone,
            invoices: Vec::new(),
        }
    }

    pub fn count_with_status(&self, status: InvoiceStatus) -> usize {
        self.invoices.iter().filter(|i| i.status == status).count()
    }
}

/// Client groups keyed by client id, iterated in first-seen order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClientGroups {
    groups: Vec<ClientGroup>,
    index: HashMap<String, usize>,
}

impl ClientGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, client_id: &str) -> Option<&ClientGroup> {
        self.index.get(client_id).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClientGroup> {
        self.groups.iter()
    }

    /// Largest number of invoices held by one client, 0 when empty
    pub fn max_invoices(&self) -> usize {
        self.groups.iter().map(|g| g.invoices.len()).max().unwrap_or(0)
    }

    /// The group for `client_id`, created from `client` on first sight.
    /// An existing group keeps the contact details it was created with.
    fn entry(&mut self, client_id: String, client: Option<&ClientInfo>) -> &mut ClientGroup {
        let pos = match self.index.get(&client_id) {
            Some(&pos) => pos,
            None => {
                let pos = self.groups.len();
                self.index.insert(client_id.clone(), pos);
                self.groups.push(ClientGroup::from_client(client_id, client));
                pos
            }
        };
        &mut self.groups[pos]
    }
}

impl<'a> IntoIterator for &'a ClientGroups {
    type Item = &'a ClientGroup;
    type IntoIter = std::slice::Iter<'a, ClientGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Group invoices by client id, classifying each against the same `now`.
/// Unclassifiable invoices are skipped.
pub fn aggregate<'a, I>(invoices: I, now: NaiveDateTime) -> ClientGroups
where
    I: IntoIterator<Item = &'a InvoiceRecord>,
{
    let mut groups = ClientGroups::new();

    for invoice in invoices {
        let classified = match classify(invoice, now) {
            Ok(c) => c,
            Err(reason) => {
                tracing::debug!(
                    invoice = %cell(invoice.id.as_ref()),
                    "dropping invoice: {reason}"
                );
                continue;
            }
        };

        let client = invoice.client.as_ref();
        let client_id = client
            .and_then(ClientInfo::key)
            .unwrap_or_else(|| UNKNOWN_CLIENT_ID.to_string());

        groups.entry(client_id, client).invoices.push(classified);
    }

    groups
}
