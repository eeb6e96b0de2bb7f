use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Opaque reference to the customer an order belongs to.
///
/// Issued by whatever authenticates customers; the core only stores it and writes it on
/// receipts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerRef(pub String);

impl From<&str> for CustomerRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CustomerRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for CustomerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
