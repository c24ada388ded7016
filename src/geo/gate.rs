//! Search submission gate
//!
//! Decides whether a query reaches the network. Queries shorter than the
//! minimum length never do, and by default only an explicit submit triggers a
//! search (typing alone does not).

use std::fmt;
use std::str::FromStr;

/// What caused a search attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTrigger {
    /// Explicit submit (enter key, search button)
    Submit,
    /// Every change of the input text
    Keystroke,
}

impl FromStr for SearchTrigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "submit" => Ok(SearchTrigger::Submit),
            "keystroke" => Ok(SearchTrigger::Keystroke),
            _ => Err(format!("Unknown search trigger: {} (expected submit or keystroke)", s)),
        }
    }
}

impl fmt::Display for SearchTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTrigger::Submit => write!(f, "submit"),
            SearchTrigger::Keystroke => write!(f, "keystroke"),
        }
    }
}

/// Gating policy for search submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchGate {
    min_chars: usize,
    trigger: SearchTrigger,
}

impl SearchGate {
    pub fn new(min_chars: usize, trigger: SearchTrigger) -> Self {
        Self { min_chars, trigger }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn trigger(&self) -> SearchTrigger {
        self.trigger
    }

    /// True when the input is long enough to keep showing results for
    pub fn long_enough(&self, input: &str) -> bool {
        input.trim().chars().count() >= self.min_chars
    }

    /// Return the trimmed query if this attempt may be sent
    ///
    /// A submit is always honored when the query is long enough; a keystroke
    /// only when the gate is configured for keystroke searching.
    pub fn admit<'a>(&self, input: &'a str, cause: SearchTrigger) -> Option<&'a str> {
        if cause == SearchTrigger::Keystroke && self.trigger != SearchTrigger::Keystroke {
            return None;
        }
        if !self.long_enough(input) {
            return None;
        }
        Some(input.trim())
    }
}

impl Default for SearchGate {
    fn default() -> Self {
        Self::new(
            crate::config::defaults::DEFAULT_MIN_QUERY_CHARS,
            SearchTrigger::Submit,
        )
    }
}
