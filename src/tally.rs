use std::collections::BTreeMap;
use std::fmt;

use platlog_types::{Event, EventKind};

/// Line counts per classification outcome
#[derive(Clone, Debug, Default)]
pub struct Tally {
    matched: BTreeMap<EventKind, usize>,
    unmatched: usize,
    /// Unmatched lines that fit a shape but had a bad field
    near_misses: usize,
}

impl Tally {
    /// Record the outcome for one line
    pub fn record(&mut self, event: Option<&Event>) {
        match event {
            Some(event) => *self.matched.entry(event.kind()).or_default() += 1,
            None => self.unmatched += 1,
        }
    }

    pub fn record_near_miss(&mut self) {
        self.near_misses += 1;
    }

    #[allow(dead_code)]
    pub fn count(&self, kind: EventKind) -> usize {
        self.matched.get(&kind).copied().unwrap_or(0)
    }

    pub fn unmatched(&self) -> usize {
        self.unmatched
    }

    pub fn near_misses(&self) -> usize {
        self.near_misses
    }

    pub fn total(&self) -> usize {
        self.matched.values().sum::<usize>() + self.unmatched
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, n) in &self.matched {
            writeln!(f, "{:<26}{n}", kind.as_str())?;
        }
        writeln!(f, "{:<26}{}", "unmatched", self.unmatched())?;
        if self.near_misses() > 0 {
            writeln!(f, "{:<26}{}", "  (bad field)", self.near_misses())?;
        }
        write!(f, "{:<26}{}", "total", self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platlog_types::{HerokuProcessExit, LambdaEnd};

    #[test]
    fn test_counts() {
        let end = Event::LambdaEnd(LambdaEnd {
            request_id: "abc".to_string(),
        });
        let exit = Event::HerokuProcessExit(HerokuProcessExit { status: 1 });

        let mut tally = Tally::default();
        tally.record(Some(&end));
        tally.record(Some(&end));
        tally.record(Some(&exit));
        tally.record(None);
        tally.record_near_miss();

        assert_eq!(tally.count(EventKind::LambdaEnd), 2);
        assert_eq!(tally.count(EventKind::HerokuProcessExit), 1);
        assert_eq!(tally.count(EventKind::Syslog), 0);
        assert_eq!(tally.unmatched(), 1);
        assert_eq!(tally.near_misses(), 1);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_display() {
        let mut tally = Tally::default();
        tally.record(None);
        let text = tally.to_string();
        assert!(text.contains("unmatched"));
        assert!(text.ends_with('1'));
        assert!(!text.contains("bad field"));
    }
}
