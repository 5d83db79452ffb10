//! git output parser
//!
//! Parses the output from git commands into structured data.

use std::sync::LazyLock;

use regex::Regex;

use super::constants::special;
use crate::model::{LogEntry, ParentSet};

static SQUASH_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(special::SQUASH_MARKER_PATTERN).expect("squash marker pattern is valid")
});

/// `diff --git a/<old> b/<new>` header; paths without spaces only
static DIFF_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^diff --git a/(\S+) b/(\S+)$").expect("diff header pattern is valid")
});

/// Header whose paths git C-quoted (non-ASCII, quotes, backslashes, control bytes)
static QUOTED_DIFF_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^diff --git "a/((?:[^"\\]|\\.)*)" "b/((?:[^"\\]|\\.)*)"$"#)
        .expect("quoted diff header pattern is valid")
});

/// Parser for git command output
pub struct Parser;

impl Parser {
    /// Parse `git log -n1 --format=%P` output into a ParentSet
    ///
    /// An empty line means a root commit.
    pub fn parse_parents(output: &str) -> ParentSet {
        ParentSet::new(output.split_whitespace().map(str::to_string).collect())
    }

    /// Parse `git log --oneline` output
    pub fn parse_oneline_log(output: &str) -> Vec<LogEntry> {
        output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once(' ') {
                Some((id, subject)) => LogEntry {
                    commit_id: id.to_string(),
                    subject: subject.to_string(),
                },
                None => LogEntry {
                    commit_id: line.to_string(),
                    subject: String::new(),
                },
            })
            .collect()
    }

    /// Extract the file names a unified diff touches
    ///
    /// Uses the `diff --git` headers, falling back to `+++`/`---` lines for
    /// plain unified diffs. `/dev/null` sides are skipped.
    pub fn parse_diff_file_names(diff: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if name != "/dev/null" && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };

        let mut saw_header = false;
        for line in diff.lines() {
            if let Some(caps) = DIFF_HEADER.captures(line) {
                saw_header = true;
                push(&caps[1]);
                push(&caps[2]);
            } else if let Some(caps) = QUOTED_DIFF_HEADER.captures(line) {
                saw_header = true;
                push(&unquote_c_style(&caps[1]));
                push(&unquote_c_style(&caps[2]));
            }
        }
        if saw_header {
            return names;
        }

        for line in diff.lines() {
            let path = line
                .strip_prefix("+++ ")
                .or_else(|| line.strip_prefix("--- "));
            if let Some(path) = path {
                let path = match path.strip_prefix('"') {
                    Some(quoted) => unquote_c_style(quoted_body(quoted)),
                    None => path.split('\t').next().unwrap_or(path).trim().to_string(),
                };
                let path = path
                    .strip_prefix("a/")
                    .or_else(|| path.strip_prefix("b/"))
                    .unwrap_or(&path);
                push(path);
            }
        }
        names
    }
}

/// Text up to the closing quote, skipping escaped quotes
fn quoted_body(rest: &str) -> &str {
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            '"' if !escaped => return &rest[..i],
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    rest
}

/// Decode the inside of a C-quoted path as git writes it
///
/// Octal escapes are raw bytes, so multi-byte UTF-8 names come back whole.
fn unquote_c_style(quoted: &str) -> String {
    let mut bytes = Vec::with_capacity(quoted.len());
    let mut iter = quoted.bytes().peekable();
    while let Some(b) = iter.next() {
        if b != b'\\' {
            bytes.push(b);
            continue;
        }
        match iter.next() {
            Some(b'n') => bytes.push(b'\n'),
            Some(b't') => bytes.push(b'\t'),
            Some(b'r') => bytes.push(b'\r'),
            Some(b'a') => bytes.push(0x07),
            Some(b'b') => bytes.push(0x08),
            Some(b'f') => bytes.push(0x0c),
            Some(b'v') => bytes.push(0x0b),
            Some(d @ b'0'..=b'7') => {
                let mut value = u32::from(d - b'0');
                for _ in 0..2 {
                    match iter.peek() {
                        Some(&next @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(next - b'0');
                            iter.next();
                        }
                        _ => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => bytes.push(other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Whether a commit subject carries a `squash!`/`fixup!`/`amend!` marker
pub fn is_squash_marker(subject: &str) -> bool {
    SQUASH_MARKER.is_match(subject)
}
