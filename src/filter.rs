use regex::Regex;
use std::collections::HashSet;

use platlog_types::{Event, EventKind};

/// Compiled filter for input lines and the events they produce
#[derive(Clone)]
pub struct LineFilter {
    /// Regex pattern (if any)
    regex: Option<Regex>,

    /// Original pattern string
    pattern: String,

    /// Event kinds to emit (empty = all)
    kinds: HashSet<EventKind>,

    /// Whether to invert the regex match
    invert: bool,
}

impl LineFilter {
    /// Create a new filter from a pattern string
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
            kinds: HashSet::new(),
            invert: false,
        })
    }

    /// Set event kinds to filter by
    pub fn with_kinds(mut self, kinds: HashSet<EventKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Invert the regex match
    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    /// Check if a raw line should be classified at all
    pub fn accepts_line(&self, line: &str) -> bool {
        let text_match = match &self.regex {
            Some(re) => re.is_match(line),
            None => return true,
        };

        if self.invert { !text_match } else { text_match }
    }

    /// Check if a classification result should be emitted.
    /// Unmatched lines only pass when no kind filter is set.
    pub fn accepts_event(&self, event: Option<&Event>) -> bool {
        if self.kinds.is_empty() {
            return true;
        }
        event.is_some_and(|e| self.kinds.contains(&e.kind()))
    }

    /// Check if filter is empty (accepts everything)
    pub fn is_empty(&self) -> bool {
        self.regex.is_none() && self.kinds.is_empty()
    }
}

impl std::fmt::Debug for LineFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineFilter")
            .field("pattern", &self.pattern)
            .field("kinds", &self.kinds)
            .field("invert", &self.invert)
            .finish()
    }
}
