//! Line classification for platlog
//!
//! This crate turns single lines from AWS Lambda and Heroku into typed
//! [`Event`]s. Each line is classified on its own against an ordered catalog
//! of shape matchers; the first matcher that accepts the line wins.
//!
//! ```
//! use platlog_parsers::{CatalogKind, Event, classify};
//!
//! let event = classify("Deploy 059375fe by user tj@apex.sh", CatalogKind::Heroku);
//! assert!(matches!(event, Some(Event::HerokuDeploy(_))));
//! ```

pub mod catalog;
mod dispatch;
mod error;
pub mod extract;
pub mod matchers;
pub mod scan;

pub use catalog::catalog;
pub use dispatch::{
    Attempt, Diagnosis, classify, classify_with, diagnose, parse, parse_heroku, parse_lambda,
};
pub use error::{MatchError, MatchResult};
pub use matchers::Matcher;

// Re-export types used in our public API
pub use platlog_types::{CatalogKind, Event, EventKind};
