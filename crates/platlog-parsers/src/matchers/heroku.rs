//! Heroku dyno manager and platform API lines

use platlog_types::{
    Event, EventKind, HerokuBuild, HerokuConfigRemove, HerokuConfigSet, HerokuDeploy,
    HerokuProcessExit, HerokuProcessListening, HerokuProcessStart, HerokuRelease, HerokuRollback,
    HerokuScale, HerokuStateChange,
};

use super::Matcher;
use crate::error::MatchResult;
use crate::extract;
use crate::scan::Scanner;

pub const DEPLOY: Matcher = Matcher::new(
    EventKind::HerokuDeploy,
    "Deploy 059375fe by user tj@apex.sh",
    deploy,
);

pub const RELEASE: Matcher = Matcher::new(
    EventKind::HerokuRelease,
    "Release v42 created by user tj@apex.sh",
    release,
);

pub const ROLLBACK: Matcher = Matcher::new(
    EventKind::HerokuRollback,
    "Rollback to v41 by user tj@apex.sh",
    rollback,
);

pub const BUILD: Matcher = Matcher::new(
    EventKind::HerokuBuild,
    "Build started by user tj@apex.sh",
    build,
);

pub const STATE_CHANGE: Matcher = Matcher::new(
    EventKind::HerokuStateChange,
    "State changed from starting to up",
    state_change,
);

pub const PROCESS_EXIT: Matcher = Matcher::new(
    EventKind::HerokuProcessExit,
    "Process exited with status 143",
    process_exit,
);

pub const PROCESS_START: Matcher = Matcher::new(
    EventKind::HerokuProcessStart,
    "Starting process with command `node server.js`",
    process_start,
);

pub const PROCESS_LISTENING: Matcher = Matcher::new(
    EventKind::HerokuProcessListening,
    "Listening on port 5000",
    process_listening,
);

pub const CONFIG_SET: Matcher = Matcher::new(
    EventKind::HerokuConfigSet,
    "Set FOO, BAR config vars by user tj@apex.sh",
    config_set,
);

pub const CONFIG_REMOVE: Matcher = Matcher::new(
    EventKind::HerokuConfigRemove,
    "Remove FOO config vars by user tj@apex.sh",
    config_remove,
);

pub const SCALE: Matcher = Matcher::new(
    EventKind::HerokuScale,
    "Scaled to web@2:Standard-1X worker@1:Standard-1X by user tj@apex.sh",
    scale,
);

fn deploy(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Deploy ")?;
    let commit = s.word()?;
    s.literal(" by user ")?;
    let user = s.tail()?;

    Ok(Event::HerokuDeploy(HerokuDeploy {
        commit: commit.to_string(),
        user: user.to_string(),
    }))
}

fn release(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Release ")?;
    let version = s.word()?;
    s.literal(" created by user ")?;
    let user = s.tail()?;

    Ok(Event::HerokuRelease(HerokuRelease {
        version: version.to_string(),
        user: user.to_string(),
    }))
}

fn rollback(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Rollback to ")?;
    let version = s.word()?;
    s.literal(" by user ")?;
    let user = s.tail()?;

    Ok(Event::HerokuRollback(HerokuRollback {
        version: version.to_string(),
        user: user.to_string(),
    }))
}

fn build(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Build started by user ")?;
    let user = s.tail()?;

    Ok(Event::HerokuBuild(HerokuBuild {
        user: user.to_string(),
    }))
}

fn state_change(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("State changed from ")?;
    let from = s.word()?;
    s.literal(" to ")?;
    let to = s.tail()?;

    Ok(Event::HerokuStateChange(HerokuStateChange {
        from: from.to_string(),
        to: to.to_string(),
    }))
}

fn process_exit(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Process exited with status ")?;
    let status = extract::integer("status", s.tail()?)?;

    Ok(Event::HerokuProcessExit(HerokuProcessExit { status }))
}

fn process_start(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Starting process with command `")?;
    let command = s.until_last("`")?;
    s.finish()?;

    Ok(Event::HerokuProcessStart(HerokuProcessStart {
        command: command.to_string(),
    }))
}

fn process_listening(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Listening on port ")?;
    let port = extract::integer("port", s.tail()?)?;

    Ok(Event::HerokuProcessListening(HerokuProcessListening { port }))
}

/// Variable names may themselves be a comma separated list, so the capture
/// runs to the last `config vars by user` rather than the first separator.
fn config_vars<'a>(s: &mut Scanner<'a>, verb: &str) -> MatchResult<(&'a str, &'a str)> {
    s.literal(verb)?;
    let variables = s.until_last(" config vars by user ")?;
    let user = s.tail()?;
    Ok((variables, user))
}

fn config_set(line: &str) -> MatchResult<Event> {
    let (variables, user) = config_vars(&mut Scanner::new(line), "Set ")?;

    Ok(Event::HerokuConfigSet(HerokuConfigSet {
        variables: variables.to_string(),
        user: user.to_string(),
    }))
}

fn config_remove(line: &str) -> MatchResult<Event> {
    let (variables, user) = config_vars(&mut Scanner::new(line), "Remove ")?;

    Ok(Event::HerokuConfigRemove(HerokuConfigRemove {
        variables: variables.to_string(),
        user: user.to_string(),
    }))
}

fn scale(line: &str) -> MatchResult<Event> {
    let mut s = Scanner::new(line);
    s.literal("Scaled to ")?;
    let dynos = s.until_last(" by user ")?;
    let user = s.tail()?;

    Ok(Event::HerokuScale(HerokuScale {
        dynos: dynos.to_string(),
        user: user.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    #[test]
    fn test_deploy() {
        assert_eq!(
            DEPLOY.extract("Deploy 059375fe by user tj@apex.sh"),
            Ok(Event::HerokuDeploy(HerokuDeploy {
                commit: "059375fe".to_string(),
                user: "tj@apex.sh".to_string(),
            }))
        );
        assert_eq!(DEPLOY.extract("Deploy  by user x"), Err(MatchError::Mismatch));
        assert_eq!(DEPLOY.extract("Deploy 059375fe by user "), Err(MatchError::Mismatch));
    }

    #[test]
    fn test_release_and_rollback() {
        let Ok(Event::HerokuRelease(release)) = RELEASE.extract(RELEASE.sample) else {
            panic!("expected HerokuRelease");
        };
        assert_eq!(release.version, "v42");

        let Ok(Event::HerokuRollback(rollback)) = ROLLBACK.extract(ROLLBACK.sample) else {
            panic!("expected HerokuRollback");
        };
        assert_eq!(rollback.version, "v41");
        assert_eq!(rollback.user, "tj@apex.sh");
    }

    #[test]
    fn test_build() {
        assert_eq!(
            BUILD.extract(BUILD.sample),
            Ok(Event::HerokuBuild(HerokuBuild {
                user: "tj@apex.sh".to_string()
            }))
        );
        assert_eq!(BUILD.extract("Build started by user"), Err(MatchError::Mismatch));
    }

    #[test]
    fn test_state_change() {
        let Ok(Event::HerokuStateChange(change)) = STATE_CHANGE.extract(STATE_CHANGE.sample)
        else {
            panic!("expected HerokuStateChange");
        };
        assert_eq!(change.from, "starting");
        assert_eq!(change.to, "up");
    }

    #[test]
    fn test_process_exit() {
        assert_eq!(
            PROCESS_EXIT.extract("Process exited with status 0"),
            Ok(Event::HerokuProcessExit(HerokuProcessExit { status: 0 }))
        );
        assert!(
            PROCESS_EXIT
                .extract("Process exited with status zero")
                .unwrap_err()
                .is_conversion()
        );
    }

    #[test]
    fn test_process_start_keeps_inner_backticks() {
        let Ok(Event::HerokuProcessStart(start)) =
            PROCESS_START.extract("Starting process with command `sh -c `echo hi``")
        else {
            panic!("expected HerokuProcessStart");
        };
        assert_eq!(start.command, "sh -c `echo hi`");
        assert_eq!(
            PROCESS_START.extract("Starting process with command `npm start"),
            Err(MatchError::Mismatch)
        );
    }

    #[test]
    fn test_process_listening() {
        assert_eq!(
            PROCESS_LISTENING.extract(PROCESS_LISTENING.sample),
            Ok(Event::HerokuProcessListening(HerokuProcessListening { port: 5000 }))
        );
        assert!(PROCESS_LISTENING.extract("Listening on port http").is_err());
    }

    #[test]
    fn test_config_set_is_greedy() {
        assert_eq!(
            CONFIG_SET.extract("Set FOO, BAR config vars by user tj@apex.sh"),
            Ok(Event::HerokuConfigSet(HerokuConfigSet {
                variables: "FOO, BAR".to_string(),
                user: "tj@apex.sh".to_string(),
            }))
        );
    }

    #[test]
    fn test_config_remove_single() {
        assert_eq!(
            CONFIG_REMOVE.extract(CONFIG_REMOVE.sample),
            Ok(Event::HerokuConfigRemove(HerokuConfigRemove {
                variables: "FOO".to_string(),
                user: "tj@apex.sh".to_string(),
            }))
        );
        assert_eq!(CONFIG_SET.extract(CONFIG_REMOVE.sample), Err(MatchError::Mismatch));
    }

    #[test]
    fn test_scale_keeps_all_dynos() {
        let Ok(Event::HerokuScale(scale)) = SCALE.extract(SCALE.sample) else {
            panic!("expected HerokuScale");
        };
        assert_eq!(scale.dynos, "web@2:Standard-1X worker@1:Standard-1X");
        assert_eq!(scale.user, "tj@apex.sh");
    }
}
