//! Schema-tagged result rows and the column layouts each provider exports.
//!
//! Providers return very different payloads; every one of them is normalized
//! into a [`ResultRow`], a set of named optional text fields. Output formats
//! never index into a row by position: they project it through an ordered
//! list of [`Column`]s.

use crate::types::Provider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named field of a normalized result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// IPv4/IPv6 address
    Ip,
    /// Port number, as text
    Port,
    /// Domain name
    Domain,
    /// Application or transport protocol
    Protocol,
    /// Base (transport) protocol, Hunter only
    BaseProtocol,
    /// `ip:port` composite
    Host,
    /// Primary link/URL of the asset
    Link,
    /// Web page title
    Title,
    /// Server banner or component string
    Server,
    /// HTTP status code, as text
    StatusCode,
    /// ICP registrant company
    Company,
    /// ICP licence number
    IcpNumber,
    /// ICP registrant unit
    IcpUnit,
    /// Country
    Country,
    /// Whether the asset is a web asset
    IsWeb,
    /// Internet service provider
    Isp,
}

/// One column of an output layout: which field, under which header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field projected into this column
    pub field: Field,
    /// Header text
    pub header: &'static str,
}

const fn col(field: Field, header: &'static str) -> Column {
    Column { field, header }
}

const FOFA_COLUMNS: &[Column] = &[
    col(Field::Ip, "IP"),
    col(Field::Domain, "Domain"),
    col(Field::Port, "Port"),
    col(Field::Protocol, "Protocol"),
    col(Field::Link, "Link"),
    col(Field::Title, "Title"),
    col(Field::Server, "Server"),
];

const HUNTER_COLUMNS: &[Column] = &[
    col(Field::Ip, "IP"),
    col(Field::Port, "Port"),
    col(Field::Domain, "Domain"),
    col(Field::Protocol, "Protocol"),
    col(Field::BaseProtocol, "Base Protocol"),
    col(Field::Link, "URL"),
    col(Field::Title, "Web Title"),
    col(Field::StatusCode, "Status Code"),
    col(Field::Company, "Company"),
    col(Field::IcpNumber, "Number"),
    col(Field::Country, "Country"),
    col(Field::IsWeb, "Is Web"),
    col(Field::Isp, "ISP"),
];

const HUNTER_DISPLAY: &[Column] = &[
    col(Field::Ip, "IP"),
    col(Field::Domain, "Domain"),
    col(Field::Port, "Port"),
    col(Field::Protocol, "Protocol"),
    col(Field::Link, "URL"),
    col(Field::Title, "Web Title"),
];

const QUAKE_COLUMNS: &[Column] = &[
    col(Field::Ip, "IP"),
    col(Field::Domain, "Domain"),
    col(Field::Port, "Port"),
    col(Field::Protocol, "Protocol"),
    col(Field::Host, "Host"),
    col(Field::Link, "URL"),
    col(Field::Title, "Title"),
    col(Field::Server, "Server"),
    col(Field::IcpNumber, "ICP"),
    col(Field::IcpUnit, "Unit"),
    col(Field::Isp, "ISP"),
];

const QUAKE_DISPLAY: &[Column] = &[
    col(Field::Ip, "IP"),
    col(Field::Domain, "Domain"),
    col(Field::Port, "Port"),
    col(Field::Protocol, "Protocol"),
    col(Field::Link, "URL"),
    col(Field::Title, "Title"),
    col(Field::IcpNumber, "ICP"),
];

impl Provider {
    /// Columns written to CSV output, in order.
    #[must_use]
    pub fn csv_columns(self) -> &'static [Column] {
        match self {
            Provider::Fofa => FOFA_COLUMNS,
            Provider::Hunter => HUNTER_COLUMNS,
            Provider::Quake => QUAKE_COLUMNS,
        }
    }

    /// Columns shown in the console table, in order.
    #[must_use]
    pub fn display_columns(self) -> &'static [Column] {
        match self {
            Provider::Fofa => FOFA_COLUMNS,
            Provider::Hunter => HUNTER_DISPLAY,
            Provider::Quake => QUAKE_DISPLAY,
        }
    }
}

/// A normalized search result.
///
/// Fields a provider does not report are simply absent; [`ResultRow::get`]
/// reads them as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    fields: BTreeMap<Field, String>,
}

impl ResultRow {
    /// Create an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style. Empty values are not stored.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field. Empty values clear it.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.fields.remove(&field);
        } else {
            self.fields.insert(field, value);
        }
    }

    /// Value of a field, or `""` when absent.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map_or("", String::as_str)
    }

    /// Primary link of the row, used for console progress.
    #[must_use]
    pub fn link(&self) -> &str {
        self.get(Field::Link)
    }

    /// Project the row through a column layout.
    #[must_use]
    pub fn project(&self, columns: &[Column]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.get(column.field).to_string())
            .collect()
    }
}

/// Header texts of a column layout.
#[must_use]
pub fn headers(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().map(|column| column.header).collect()
}
