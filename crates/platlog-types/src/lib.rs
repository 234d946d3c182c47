//! Shared types for platlog
//!
//! This crate contains the typed event records produced by the line
//! classifier, plus the selectors used to pick a matcher catalog.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// AWS Lambda Events
// ============================================================================

/// `START RequestId: ... Version: ...`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaStart {
    pub request_id: String,
    /// Either `$LATEST` or the published version number, kept as text
    pub version: String,
}

/// `END RequestId: ...`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaEnd {
    pub request_id: String,
}

/// `REPORT RequestId: ...` without a cold start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LambdaReport {
    pub request_id: String,
    /// Milliseconds
    pub duration: f64,
    /// Milliseconds
    pub billed_duration: f64,
    /// Megabytes
    pub memory_size: i64,
    /// Megabytes
    pub max_memory_used: i64,
}

/// `REPORT RequestId: ...` for an invocation that paid for a cold start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LambdaReportInit {
    pub request_id: String,
    pub duration: f64,
    pub billed_duration: f64,
    pub memory_size: i64,
    pub max_memory_used: i64,
    /// Milliseconds spent in the init phase
    pub init_duration: f64,
}

impl LambdaReportInit {
    /// The report fields without the init phase
    pub fn report(&self) -> LambdaReport {
        LambdaReport {
            request_id: self.request_id.clone(),
            duration: self.duration,
            billed_duration: self.billed_duration,
            memory_size: self.memory_size,
            max_memory_used: self.max_memory_used,
        }
    }
}

/// `<timestamp> <request id> Task timed out after N seconds`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LambdaTimeout {
    pub timestamp: String,
    pub request_id: String,
    /// Seconds
    pub duration: f64,
}

impl LambdaTimeout {
    /// Timestamp parsed as RFC 3339, if it is one
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}

// ============================================================================
// Syslog Envelope
// ============================================================================

/// RFC 5424 style line as delivered by a logplex drain
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syslog {
    pub priority: i64,
    pub version: i64,
    pub timestamp: String,
    pub hostname: String,
    pub appname: String,
    pub proc_id: String,
    /// `-` is a real value here, not an absence
    pub msg_id: String,
    pub message: String,
}

impl Syslog {
    /// Timestamp parsed as RFC 3339, if it is one
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }

    /// Facility code encoded in the priority
    pub fn facility(&self) -> i64 {
        self.priority >> 3
    }

    /// Severity code encoded in the priority
    pub fn severity(&self) -> i64 {
        self.priority & 0x07
    }
}

// ============================================================================
// Heroku Dyno Manager Events
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuDeploy {
    pub commit: String,
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuRelease {
    pub version: String,
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuRollback {
    pub version: String,
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuBuild {
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuStateChange {
    pub from: String,
    pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuProcessExit {
    pub status: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuProcessStart {
    pub command: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuProcessListening {
    pub port: i64,
}

/// Comma separated variable names, kept as one string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuConfigSet {
    pub variables: String,
    pub user: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuConfigRemove {
    pub variables: String,
    pub user: String,
}

/// Space separated `type@qty:size` tokens, kept as one string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerokuScale {
    pub dynos: String,
    pub user: String,
}

// ============================================================================
// Event
// ============================================================================

/// A classified log line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    LambdaStart(LambdaStart),
    LambdaEnd(LambdaEnd),
    LambdaReport(LambdaReport),
    LambdaReportInit(LambdaReportInit),
    LambdaTimeout(LambdaTimeout),
    Syslog(Syslog),
    HerokuDeploy(HerokuDeploy),
    HerokuRelease(HerokuRelease),
    HerokuRollback(HerokuRollback),
    HerokuBuild(HerokuBuild),
    HerokuStateChange(HerokuStateChange),
    HerokuProcessExit(HerokuProcessExit),
    HerokuProcessStart(HerokuProcessStart),
    HerokuProcessListening(HerokuProcessListening),
    HerokuConfigSet(HerokuConfigSet),
    HerokuConfigRemove(HerokuConfigRemove),
    HerokuScale(HerokuScale),
}

impl Event {
    /// Discriminant of this event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LambdaStart(_) => EventKind::LambdaStart,
            Self::LambdaEnd(_) => EventKind::LambdaEnd,
            Self::LambdaReport(_) => EventKind::LambdaReport,
            Self::LambdaReportInit(_) => EventKind::LambdaReportInit,
            Self::LambdaTimeout(_) => EventKind::LambdaTimeout,
            Self::Syslog(_) => EventKind::Syslog,
            Self::HerokuDeploy(_) => EventKind::HerokuDeploy,
            Self::HerokuRelease(_) => EventKind::HerokuRelease,
            Self::HerokuRollback(_) => EventKind::HerokuRollback,
            Self::HerokuBuild(_) => EventKind::HerokuBuild,
            Self::HerokuStateChange(_) => EventKind::HerokuStateChange,
            Self::HerokuProcessExit(_) => EventKind::HerokuProcessExit,
            Self::HerokuProcessStart(_) => EventKind::HerokuProcessStart,
            Self::HerokuProcessListening(_) => EventKind::HerokuProcessListening,
            Self::HerokuConfigSet(_) => EventKind::HerokuConfigSet,
            Self::HerokuConfigRemove(_) => EventKind::HerokuConfigRemove,
            Self::HerokuScale(_) => EventKind::HerokuScale,
        }
    }

    /// Lambda request id, for the events that carry one
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::LambdaStart(e) => Some(&e.request_id),
            Self::LambdaEnd(e) => Some(&e.request_id),
            Self::LambdaReport(e) => Some(&e.request_id),
            Self::LambdaReportInit(e) => Some(&e.request_id),
            Self::LambdaTimeout(e) => Some(&e.request_id),
            _ => None,
        }
    }

    /// Acting user, for the Heroku events that name one
    pub fn user(&self) -> Option<&str> {
        match self {
            Self::HerokuDeploy(e) => Some(&e.user),
            Self::HerokuRelease(e) => Some(&e.user),
            Self::HerokuRollback(e) => Some(&e.user),
            Self::HerokuBuild(e) => Some(&e.user),
            Self::HerokuConfigSet(e) => Some(&e.user),
            Self::HerokuConfigRemove(e) => Some(&e.user),
            Self::HerokuScale(e) => Some(&e.user),
            _ => None,
        }
    }
}

/// Field-less discriminant of [`Event`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    LambdaStart,
    LambdaEnd,
    LambdaReport,
    LambdaReportInit,
    LambdaTimeout,
    Syslog,
    HerokuDeploy,
    HerokuRelease,
    HerokuRollback,
    HerokuBuild,
    HerokuStateChange,
    HerokuProcessExit,
    HerokuProcessStart,
    HerokuProcessListening,
    HerokuConfigSet,
    HerokuConfigRemove,
    HerokuScale,
}

impl EventKind {
    pub const ALL: [EventKind; 17] = [
        Self::LambdaStart,
        Self::LambdaEnd,
        Self::LambdaReport,
        Self::LambdaReportInit,
        Self::LambdaTimeout,
        Self::Syslog,
        Self::HerokuDeploy,
        Self::HerokuRelease,
        Self::HerokuRollback,
        Self::HerokuBuild,
        Self::HerokuStateChange,
        Self::HerokuProcessExit,
        Self::HerokuProcessStart,
        Self::HerokuProcessListening,
        Self::HerokuConfigSet,
        Self::HerokuConfigRemove,
        Self::HerokuScale,
    ];

    /// Stable snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LambdaStart => "lambda_start",
            Self::LambdaEnd => "lambda_end",
            Self::LambdaReport => "lambda_report",
            Self::LambdaReportInit => "lambda_report_init",
            Self::LambdaTimeout => "lambda_timeout",
            Self::Syslog => "syslog",
            Self::HerokuDeploy => "heroku_deploy",
            Self::HerokuRelease => "heroku_release",
            Self::HerokuRollback => "heroku_rollback",
            Self::HerokuBuild => "heroku_build",
            Self::HerokuStateChange => "heroku_state_change",
            Self::HerokuProcessExit => "heroku_process_exit",
            Self::HerokuProcessStart => "heroku_process_start",
            Self::HerokuProcessListening => "heroku_process_listening",
            Self::HerokuConfigSet => "heroku_config_set",
            Self::HerokuConfigRemove => "heroku_config_remove",
            Self::HerokuScale => "heroku_scale",
        }
    }

    /// Whether this shape comes from the Lambda runtime
    pub fn is_lambda(&self) -> bool {
        matches!(
            self,
            Self::LambdaStart
                | Self::LambdaEnd
                | Self::LambdaReport
                | Self::LambdaReportInit
                | Self::LambdaTimeout
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownName::new("event kind", s))
    }
}

// ============================================================================
// Catalog Selection
// ============================================================================

/// Which source family a line is expected to come from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// Source unknown, try everything
    #[default]
    Combined,
    /// AWS Lambda runtime only
    Lambda,
    /// Heroku dyno manager and logplex only
    Heroku,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [Self::Combined, Self::Lambda, Self::Heroku];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Combined => "combined",
            Self::Lambda => "lambda",
            Self::Heroku => "heroku",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "combined" | "all" => Ok(Self::Combined),
            "lambda" | "aws" => Ok(Self::Lambda),
            "heroku" => Ok(Self::Heroku),
            _ => Err(UnknownName::new("catalog", s)),
        }
    }
}

/// A name that does not correspond to any known selector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what}: {name:?}")]
pub struct UnknownName {
    pub what: &'static str,
    pub name: String,
}

impl UnknownName {
    fn new(what: &'static str, name: &str) -> Self {
        Self {
            what,
            name: name.to_string(),
        }
    }
}
