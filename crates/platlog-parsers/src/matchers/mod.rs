//! One matcher per event shape
//!
//! A matcher pairs a template (written as a sequence of [`Scanner`] calls) with
//! the event it produces. Matchers are plain `fn` pointers in `const` values so
//! catalogs can be `'static` slices shared freely between threads.
//!
//! [`Scanner`]: crate::scan::Scanner

pub mod heroku;
pub mod lambda;
pub mod syslog;

use std::fmt;

use platlog_types::{Event, EventKind};

use crate::error::MatchResult;

/// Executable template for a single event shape
#[derive(Clone, Copy)]
pub struct Matcher {
    /// Event variant produced on success
    pub kind: EventKind,
    /// A canonical line of this shape
    pub sample: &'static str,
    extract: fn(&str) -> MatchResult<Event>,
}

impl Matcher {
    pub const fn new(
        kind: EventKind,
        sample: &'static str,
        extract: fn(&str) -> MatchResult<Event>,
    ) -> Self {
        Self {
            kind,
            sample,
            extract,
        }
    }

    /// Try to extract this matcher's event from `line`
    pub fn extract(&self, line: &str) -> MatchResult<Event> {
        (self.extract)(line)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("kind", &self.kind)
            .field("sample", &self.sample)
            .finish()
    }
}
