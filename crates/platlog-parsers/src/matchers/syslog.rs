//! RFC 5424 framed lines, as delivered by a Heroku logplex drain
//!
//! `<PRI>VERSION TIMESTAMP HOSTNAME APP-NAME PROCID MSGID MSG`

use platlog_types::{Event, EventKind, Syslog};

use super::Matcher;
use crate::error::MatchResult;
use crate::extract;
use crate::scan::Scanner;

pub const SYSLOG: Matcher = Matcher::new(
    EventKind::Syslog,
    "<134>1 2018-08-01T14:27:01.123456+00:00 host app web.1 - State changed from starting to up",
    syslog,
);

fn syslog(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("<")?;
    let priority = extract::integer("priority", s.until(">")?)?;
    let version = extract::integer("version", s.word()?)?;
    s.literal(" ")?;
    let timestamp = s.word()?;
    s.literal(" ")?;
    let hostname = s.word()?;
    s.literal(" ")?;
    let appname = s.word()?;
    s.literal(" ")?;
    let proc_id = s.word()?;
    s.literal(" ")?;
    let msg_id = s.word()?;
    s.literal(" ")?;
    let message = s.rest();

    Ok(Event::Syslog(Syslog {
        priority,
        version,
        timestamp: timestamp.to_string(),
        hostname: hostname.to_string(),
        appname: appname.to_string(),
        proc_id: proc_id.to_string(),
        msg_id: msg_id.to_string(),
        message: message.to_string(),
    }))
}
