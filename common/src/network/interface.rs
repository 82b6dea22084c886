//! # Interface Selection
//!
//! Decides which interfaces a lease run should drive.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::error::{Result, WifiError};

#[derive(Debug, Clone)]
pub enum InterfaceSelector {
    /// Only the interface with exactly this name.
    Exact(String),
    /// Every interface whose name contains a match, like `grep`.
    Pattern(Regex),
}

impl InterfaceSelector {
    pub fn exact(name: impl Into<String>) -> Self {
        InterfaceSelector::Exact(name.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(InterfaceSelector::Pattern)
            .map_err(|e| WifiError::InvalidSelector {
                selector: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            InterfaceSelector::Exact(exact) => exact == name,
            InterfaceSelector::Pattern(re) => re.is_match(name),
        }
    }

    /// Filters `names` down to the matching ones, in order, each name once.
    ///
    /// Returning a name twice would let two lease tasks drive the same interface.
    pub fn select<I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        names
            .into_iter()
            .filter(|name| self.matches(name))
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }
}

impl fmt::Display for InterfaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceSelector::Exact(name) => f.write_str(name),
            InterfaceSelector::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
