use std::fmt;

/// Wildcard marker understood by the tool's name filter
pub const WILDCARD: char = '*';

/// A chunk of the catalog fetched by one detail invocation.
///
/// Wildcard prefixes cover every name starting with `stem`. A name shorter than the
/// configured prefix length becomes an exact prefix so it never overlaps a wildcard one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix {
    stem: String,
    exact: bool,
}

impl Prefix {
    pub fn wildcard(stem: impl Into<String>) -> Self {
        Self { stem: stem.into(), exact: false }
    }

    pub fn exact(name: impl Into<String>) -> Self {
        Self { stem: name.into(), exact: true }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Argument passed to the detail invocation
    pub fn pattern(&self) -> String {
        if self.exact { self.stem.clone() } else { format!("{}{}", self.stem, WILDCARD) }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern())
    }
}
