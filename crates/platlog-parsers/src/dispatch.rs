use platlog_types::{CatalogKind, Event, EventKind};
use tracing::{debug, trace};

use crate::catalog;
use crate::error::MatchError;
use crate::matchers::Matcher;

/// Classify a line against a built-in catalog
///
/// Returns the event from the first matcher that accepts the line, or `None`
/// when no shape fits. `None` is an ordinary outcome, not a failure.
pub fn classify(line: &str, kind: CatalogKind) -> Option<Event> {
    classify_with(line, catalog::catalog(kind))
}

/// Classify a line against a caller supplied, ordered matcher list
pub fn classify_with(line: &str, matchers: &[Matcher]) -> Option<Event> {
    for matcher in matchers {
        match matcher.extract(line) {
            Ok(event) => {
                trace!(kind = %matcher.kind, "line classified");
                return Some(event);
            }
            Err(MatchError::Mismatch) => {}
            Err(err) => {
                debug!(kind = %matcher.kind, error = %err, "shape fit but a field did not convert");
            }
        }
    }
    None
}

/// Classify against every known shape
pub fn parse(line: &str) -> Option<Event> {
    classify(line, CatalogKind::Combined)
}

/// Classify against the Lambda shapes only
pub fn parse_lambda(line: &str) -> Option<Event> {
    classify(line, CatalogKind::Lambda)
}

/// Classify against the Heroku shapes only
pub fn parse_heroku(line: &str) -> Option<Event> {
    classify(line, CatalogKind::Heroku)
}

/// One matcher's verdict on a line
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub kind: EventKind,
    pub outcome: Result<(), MatchError>,
}

/// Every attempt `classify` would make on a line, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub attempts: Vec<Attempt>,
    pub event: Option<Event>,
}

impl Diagnosis {
    /// The event `classify` returns for this line
    pub fn matched(&self) -> Option<&Event> {
        self.event.as_ref()
    }

    /// Shapes that fit the line structurally but had an unconvertible field
    pub fn near_misses(&self) -> impl Iterator<Item = (EventKind, &MatchError)> {
        self.attempts.iter().filter_map(|a| match &a.outcome {
            Err(err) if err.is_conversion() => Some((a.kind, err)),
            _ => None,
        })
    }
}

/// Like [`classify`], but keep the reason each matcher declined
pub fn diagnose(line: &str, kind: CatalogKind) -> Diagnosis {
    let mut attempts = Vec::new();

    for matcher in catalog::catalog(kind) {
        match matcher.extract(line) {
            Ok(event) => {
                attempts.push(Attempt {
                    kind: matcher.kind,
                    outcome: Ok(()),
                });
                return Diagnosis {
                    attempts,
                    event: Some(event),
                };
            }
            Err(err) => attempts.push(Attempt {
                kind: matcher.kind,
                outcome: Err(err),
            }),
        }
    }

    Diagnosis {
        attempts,
        event: None,
    }
}
