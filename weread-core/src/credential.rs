//! The session credential (browser cookie string)

use std::fmt;

/// Session cookie string proving access to one account.
///
/// `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw cookie string, normalizing `name=value` pairs
    pub fn new(raw: impl AsRef<str>) -> Self {
        let pairs: Vec<&str> = raw
            .as_ref()
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .collect();
        Self(pairs.join("; "))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Cookie` request header
    pub fn header_value(&self) -> &str {
        &self.0
    }

    /// Cookie names only, for diagnostics
    pub fn cookie_names(&self) -> Vec<&str> {
        self.0
            .split("; ")
            .filter_map(|pair| pair.split_once('=').map(|(name, _)| name))
            .collect()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self)
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<empty>")
        } else {
            write!(f, "<redacted: {}>", self.cookie_names().join(","))
        }
    }
}
