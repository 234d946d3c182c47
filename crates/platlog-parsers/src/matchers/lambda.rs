//! AWS Lambda runtime lines

use platlog_types::{
    Event, EventKind, LambdaEnd, LambdaReport, LambdaReportInit, LambdaStart, LambdaTimeout,
};

use super::Matcher;
use crate::error::MatchResult;
use crate::extract;
use crate::scan::Scanner;

pub const START: Matcher = Matcher::new(
    EventKind::LambdaStart,
    "START RequestId: f7172574-5884-44d9-95f4-7438fb83e9b0 Version: $LATEST",
    start,
);

pub const END: Matcher = Matcher::new(
    EventKind::LambdaEnd,
    "END RequestId: f7172574-5884-44d9-95f4-7438fb83e9b0",
    end,
);

pub const REPORT: Matcher = Matcher::new(
    EventKind::LambdaReport,
    "REPORT RequestId: 136f2f48-069e-4808-8d73-b31c4d97e146\tDuration: 7.80 ms\tBilled Duration: 100 ms\tMemory Size: 512 MB\tMax Memory Used: 115 MB\t",
    report,
);

pub const REPORT_INIT: Matcher = Matcher::new(
    EventKind::LambdaReportInit,
    "REPORT RequestId: 136f2f48-069e-4808-8d73-b31c4d97e146\tDuration: 7.80 ms\tBilled Duration: 100 ms\tMemory Size: 512 MB\tMax Memory Used: 115 MB\tInit Duration: 185.62 ms\t",
    report_init,
);

pub const TIMEOUT: Matcher = Matcher::new(
    EventKind::LambdaTimeout,
    "2018-07-30T18:27:17.585Z 5f8d5b0e-9429-11e8-9bcb-3da5aa5e4c2e Task timed out after 3.00 seconds",
    timeout,
);

fn start(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("START RequestId: ")?;
    let request_id = s.word()?;
    s.literal(" Version: ")?;
    let version = extract::version("version", s.rest())?;

    Ok(Event::LambdaStart(LambdaStart {
        request_id: request_id.to_string(),
        version,
    }))
}

fn end(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("END RequestId: ")?;
    let request_id = s.tail()?;

    Ok(Event::LambdaEnd(LambdaEnd {
        request_id: request_id.to_string(),
    }))
}

/// Tab separated fields shared by both report shapes, up to and including
/// `Max Memory Used: N MB`
fn report_fields(s: &mut Scanner<'_>) -> MatchResult<LambdaReport> {
    s.literal("REPORT RequestId: ")?;
    let request_id = s.until("\t")?;
    s.literal("Duration: ")?;
    let duration = extract::decimal("duration", s.until(" ms\t")?)?;
    s.literal("Billed Duration: ")?;
    let billed_duration = extract::decimal("billed_duration", s.until(" ms\t")?)?;
    s.literal("Memory Size: ")?;
    let memory_size = extract::integer("memory_size", s.until(" MB\t")?)?;
    s.literal("Max Memory Used: ")?;
    let max_memory_used = extract::integer("max_memory_used", s.until(" MB")?)?;

    Ok(LambdaReport {
        request_id: request_id.to_string(),
        duration,
        billed_duration,
        memory_size,
        max_memory_used,
    })
}

fn report(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    let fields = report_fields(&mut s)?;
    // Anything after the last field means this is a longer shape
    s.finish()?;

    Ok(Event::LambdaReport(fields))
}

fn report_init(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    let fields = report_fields(&mut s)?;
    s.tabs()?;
    s.literal("Init Duration: ")?;
    let init_duration = extract::decimal("init_duration", s.until(" ms")?)?;
    s.finish()?;

    Ok(Event::LambdaReportInit(LambdaReportInit {
        request_id: fields.request_id,
        duration: fields.duration,
        billed_duration: fields.billed_duration,
        memory_size: fields.memory_size,
        max_memory_used: fields.max_memory_used,
        init_duration,
    }))
}

fn timeout(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    let timestamp = s.word()?;
    s.literal(" ")?;
    let request_id = s.word()?;
    s.literal(" Task timed out after ")?;
    let duration = extract::decimal("duration", s.until(" seconds")?)?;
    s.finish()?;

    Ok(Event::LambdaTimeout(LambdaTimeout {
        timestamp: timestamp.to_string(),
        request_id: request_id.to_string(),
        duration,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    const REPORT_LINE: &str = "REPORT RequestId: 136f2f48-069e-4808-8d73-b31c4d97e146\tDuration: 7.80 ms\tBilled Duration: 100 ms\tMemory Size: 512 MB\tMax Memory Used: 115 MB\t";

    #[test]
    fn test_start_numeric_version() {
        let event = START
            .extract("START RequestId: f7172574-5884-44d9-95f4-7438fb83e9b0 Version: 26")
            .unwrap();
        assert_eq!(
            event,
            Event::LambdaStart(LambdaStart {
                request_id: "f7172574-5884-44d9-95f4-7438fb83e9b0".to_string(),
                version: "26".to_string(),
            })
        );
    }

    #[test]
    fn test_start_latest_version() {
        let Event::LambdaStart(start) = START.extract(START.sample).unwrap() else {
            panic!("expected LambdaStart");
        };
        assert_eq!(start.version, "$LATEST");
    }

    #[test]
    fn test_start_bad_version_is_conversion() {
        let err = START
            .extract("START RequestId: abc Version: latest")
            .unwrap_err();
        assert!(err.is_conversion());
    }

    #[test]
    fn test_end() {
        let Event::LambdaEnd(end) = END.extract(END.sample).unwrap() else {
            panic!("expected LambdaEnd");
        };
        assert_eq!(end.request_id, "f7172574-5884-44d9-95f4-7438fb83e9b0");
        assert_eq!(END.extract("END RequestId: "), Err(MatchError::Mismatch));
    }

    #[test]
    fn test_report_fields() {
        let Event::LambdaReport(report) = REPORT.extract(REPORT_LINE).unwrap() else {
            panic!("expected LambdaReport");
        };
        assert_eq!(report.request_id, "136f2f48-069e-4808-8d73-b31c4d97e146");
        assert_eq!(report.duration, 7.8);
        assert_eq!(report.billed_duration, 100.0);
        assert_eq!(report.memory_size, 512);
        assert_eq!(report.max_memory_used, 115);
    }

    #[test]
    fn test_report_accepts_trailing_newline() {
        let line = format!("{REPORT_LINE}\n");
        assert!(REPORT.extract(&line).is_ok());
    }

    #[test]
    fn test_report_rejects_init_line() {
        let line = format!("{REPORT_LINE}Init Duration: 185.62 ms\t");
        assert_eq!(REPORT.extract(&line), Err(MatchError::Mismatch));
        assert!(REPORT_INIT.extract(&line).is_ok());
    }

    #[test]
    fn test_report_init_rejects_plain_line() {
        assert_eq!(REPORT_INIT.extract(REPORT_LINE), Err(MatchError::Mismatch));
    }

    #[test]
    fn test_report_init_after_double_tab() {
        let line = format!("{REPORT_LINE}\tInit Duration: 185.62 ms\t");
        let Event::LambdaReportInit(init) = REPORT_INIT.extract(&line).unwrap() else {
            panic!("expected LambdaReportInit");
        };
        assert_eq!(init.init_duration, 185.62);
        assert_eq!(init.memory_size, 512);
    }

    #[test]
    fn test_report_bad_duration_is_conversion() {
        let line = REPORT_LINE.replace("7.80", "abc");
        assert_eq!(
            REPORT.extract(&line),
            Err(MatchError::Conversion {
                field: "duration",
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_report_needs_tabs() {
        let line = REPORT_LINE.replace('\t', " ");
        assert_eq!(REPORT.extract(&line), Err(MatchError::Mismatch));
    }

    #[test]
    fn test_timeout() {
        let Event::LambdaTimeout(timeout) = TIMEOUT.extract(TIMEOUT.sample).unwrap() else {
            panic!("expected LambdaTimeout");
        };
        assert_eq!(timeout.timestamp, "2018-07-30T18:27:17.585Z");
        assert_eq!(timeout.request_id, "5f8d5b0e-9429-11e8-9bcb-3da5aa5e4c2e");
        assert_eq!(timeout.duration, 3.0);
    }

    #[test]
    fn test_timeout_timestamp_not_validated() {
        let event = TIMEOUT
            .extract("not-a-date abc Task timed out after 900.00 seconds")
            .unwrap();
        assert_eq!(event.kind(), EventKind::LambdaTimeout);
    }
}
