//! Ordered matcher catalogs per source family
//!
//! Order matters where one template is a structural prefix of another: the
//! longer template goes first. [`shadowed`] checks that property and the tests
//! below run it over every built-in catalog.

use platlog_types::{CatalogKind, EventKind};

use crate::matchers::{Matcher, heroku, lambda, syslog};

/// AWS Lambda runtime shapes
pub static LAMBDA: &[Matcher] = &[
    lambda::START,
    lambda::REPORT_INIT,
    lambda::REPORT,
    lambda::END,
    lambda::TIMEOUT,
];

/// Heroku dyno manager shapes, then the logplex syslog envelope
pub static HEROKU: &[Matcher] = &[
    heroku::DEPLOY,
    heroku::RELEASE,
    heroku::ROLLBACK,
    heroku::BUILD,
    heroku::STATE_CHANGE,
    heroku::PROCESS_EXIT,
    heroku::PROCESS_START,
    heroku::PROCESS_LISTENING,
    heroku::CONFIG_SET,
    heroku::CONFIG_REMOVE,
    heroku::SCALE,
    syslog::SYSLOG,
];

/// Every supported shape
pub static COMBINED: &[Matcher] = &[
    lambda::START,
    lambda::REPORT_INIT,
    lambda::REPORT,
    lambda::END,
    lambda::TIMEOUT,
    syslog::SYSLOG,
    heroku::DEPLOY,
    heroku::RELEASE,
    heroku::ROLLBACK,
    heroku::BUILD,
    heroku::STATE_CHANGE,
    heroku::PROCESS_EXIT,
    heroku::PROCESS_START,
    heroku::PROCESS_LISTENING,
    heroku::CONFIG_SET,
    heroku::CONFIG_REMOVE,
    heroku::SCALE,
];

/// Matchers for a source family
pub fn catalog(kind: CatalogKind) -> &'static [Matcher] {
    match kind {
        CatalogKind::Combined => COMBINED,
        CatalogKind::Lambda => LAMBDA,
        CatalogKind::Heroku => HEROKU,
    }
}

/// Pairs `(victim, shadow)` where `victim`'s own sample line is claimed by an
/// earlier matcher `shadow` in `matchers`. Empty for a well ordered catalog.
pub fn shadowed(matchers: &[Matcher]) -> Vec<(EventKind, EventKind)> {
    let mut found = Vec::new();

    for (i, victim) in matchers.iter().enumerate() {
        let winner = matchers[..i]
            .iter()
            .find(|m| m.extract(victim.sample).is_ok());
        if let Some(shadow) = winner {
            found.push((victim.kind, shadow.kind));
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalogs_are_well_ordered() {
        for kind in CatalogKind::ALL {
            assert_eq!(shadowed(catalog(kind)), Vec::new(), "catalog {kind}");
        }
    }

    #[test]
    fn test_catalogs_have_no_duplicates() {
        for kind in CatalogKind::ALL {
            let matchers = catalog(kind);
            assert!(!matchers.is_empty(), "catalog {kind} is empty");
            let unique: HashSet<EventKind> = matchers.iter().map(|m| m.kind).collect();
            assert_eq!(unique.len(), matchers.len(), "catalog {kind}");
        }
    }

    #[test]
    fn test_combined_covers_every_kind() {
        let kinds: HashSet<EventKind> = COMBINED.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, EventKind::ALL.into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn test_family_catalogs_partition_shapes() {
        assert!(LAMBDA.iter().all(|m| m.kind.is_lambda()));
        assert!(HEROKU.iter().all(|m| !m.kind.is_lambda()));
        assert_eq!(LAMBDA.len() + HEROKU.len(), COMBINED.len());
    }

    #[test]
    fn test_samples_match_their_own_matcher() {
        for matcher in COMBINED {
            let event = matcher.extract(matcher.sample).unwrap();
            assert_eq!(event.kind(), matcher.kind);
        }
    }

    #[test]
    fn test_shadowed_reports_claimed_samples() {
        let reversed = [lambda::REPORT, lambda::REPORT_INIT];
        // The plain report refuses trailing fields, so even this order is safe
        assert!(shadowed(&reversed).is_empty());

        let shadowing = [syslog::SYSLOG, syslog::SYSLOG];
        assert_eq!(
            shadowed(&shadowing),
            vec![(EventKind::Syslog, EventKind::Syslog)]
        );
    }
}
