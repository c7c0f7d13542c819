use std::{io, path::Path, process::Command};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use crate::error::HostError;
use crate::models::CommitRecord;

/// `git log` format consumed by [`parse_git_log`]: `<hash> - <subject> (<date time tz>)`.
pub const LOG_FORMAT: &str = "--pretty=format:%h - %s (%ci)";

// Compile the log line regex once for all uses. Hash and date classes are ASCII only.
static LOG_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((?-u:\w)+) - (.+) \(([0-9]{4}-[0-9]{2}-[0-9]{2})").unwrap()
});

/// Parses `git log` output into commit records. Lines that don't match are skipped.
pub fn parse_git_log(raw: &str) -> Vec<CommitRecord> {
    raw.lines()
        .filter_map(|line| {
            let caps = LOG_LINE_REGEX.captures(line)?;
            Some(CommitRecord {
                hash: caps[1].to_string(),
                message: caps[2].to_string(),
                date: caps[3].to_string(),
            })
        })
        .collect()
}

/// Runs `git log` in `repo` and returns the raw output.
pub fn get_git_log(repo: &Path, limit: Option<usize>) -> Result<String, HostError> {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(repo)
        .arg("log")
        .arg(LOG_FORMAT)
        .arg("--abbrev-commit");
    if let Some(limit) = limit {
        cmd.arg("-n").arg(limit.to_string());
    }

    debug!(repo = %repo.display(), ?limit, "running git log");
    let output = cmd.output().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HostError::ToolUnavailable("git".to_string()),
        _ => HostError::from_io(repo, e),
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(repo = %repo.display(), %stderr, "git log failed");
        Err(HostError::NotARepository { path: repo.to_path_buf(), stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(hash: &str, message: &str, date: &str) -> CommitRecord {
        CommitRecord { hash: hash.into(), message: message.into(), date: date.into() }
    }

    #[test]
    fn parses_single_line() {
        let parsed = parse_git_log("a1b2c3 - Fix bug (2024-01-15 10:00:00 +0000)");
        assert_eq!(parsed, vec![record("a1b2c3", "Fix bug", "2024-01-15")]);
    }

    #[test]
    fn drops_lines_that_do_not_match() {
        assert!(parse_git_log("not a log line").is_empty());
        assert!(parse_git_log("").is_empty());

        let raw = "\
abc1234 - Add phases (2024-03-02 09:12:44 +0100)
garbage
- missing hash (2024-03-01 00:00:00 +0000)
def5678 - Initial commit (2024-03-01 18:00:00 +0100)
";
        assert_eq!(
            parse_git_log(raw),
            vec![
                record("abc1234", "Add phases", "2024-03-02"),
                record("def5678", "Initial commit", "2024-03-01"),
            ]
        );
    }

    #[test]
    fn message_may_contain_parentheses_and_dashes() {
        let raw = "0f0f0f0 - Merge branch 'x' - fixes (#12) (2023-12-31 23:59:59 -0500)";
        assert_eq!(
            parse_git_log(raw),
            vec![record("0f0f0f0", "Merge branch 'x' - fixes (#12)", "2023-12-31")]
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let raw = "aaa - One (2024-01-01 00:00:00 +0000)\r\nbbb - Two (2024-01-02 00:00:00 +0000)\r\n";
        let parsed = parse_git_log(raw);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], record("bbb", "Two", "2024-01-02"));
    }

    #[test]
    fn output_never_exceeds_line_count_and_fields_are_well_formed() {
        let inputs = [
            "x - y (2024-01-01",
            "x - (2024-01-01)\n\n\n",
            "h1 - m (2024-01-01 x)\nh2 - m (20240101)\nh3 - m (2024-02-03)",
            "ümlaut - m (2024-01-01 00:00)",
        ];
        let date_re = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
        let hash_re = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
        for input in inputs {
            let parsed = parse_git_log(input);
            assert!(parsed.len() <= input.lines().count().max(1));
            for rec in parsed {
                assert!(hash_re.is_match(&rec.hash), "{rec:?}");
                assert!(date_re.is_match(&rec.date), "{rec:?}");
            }
        }
    }

    #[test]
    fn non_ascii_hashes_and_digits_are_rejected() {
        let raw = "\
ümlaut - Umlaut hash (2024-01-01 00:00:00 +0000)
abc123 - Arabic-Indic date (٢٠٢٤-٠١-٠١ 00:00:00 +0000)
abc124 - Fullwidth date (２０２４-０１-０１ 00:00:00 +0000)
abc125 - Plain (2024-01-01 00:00:00 +0000)";
        assert_eq!(parse_git_log(raw), vec![record("abc125", "Plain", "2024-01-01")]);
    }

    #[test]
    fn git_log_outside_a_repository_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        match get_git_log(dir.path(), Some(5)) {
            Err(HostError::NotARepository { path, .. }) => assert_eq!(path, dir.path()),
            // Machines without git still get a structured error.
            Err(HostError::ToolUnavailable(tool)) => assert_eq!(tool, "git"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
