//! Makefile and fileinfo parsing.
//!
//! The makefile grammar is line-oriented: a rule spans a header line
//! (`TARGET: PREREQ...`) plus the command lines (leading whitespace)
//! attached to the most recent header. Blank lines and `#` comments are
//! skipped. Target and prerequisite names exclude `:`, `=`, `#`,
//! whitespace, and `\`.
//!
//! The fileinfo format records the last build time on its first line and
//! one `NAME CHANGEDATE` entry per following line; every change date must
//! lie strictly before the last build time.

use super::MakeError;
use log::{debug, info};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// Line patterns compiled once. Matching is anchored: a line belongs to
// exactly one of comment/blank, header, or command, checked in that order.
static RE_IGNORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:\s*|#.*)$").unwrap());
static RE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:=#\s\\]+):\s*([^:=#\\]*)$").unwrap());
static RE_COMMAND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s+.+$").unwrap());
static RE_FILEINFO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:=#\s\\]+)\s+(\d+)$").unwrap());

/// One makefile rule: a target, its prerequisites, and the command lines
/// that rebuild it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Name of the target this rule builds.
    pub target: String,
    /// Prerequisite names in first-appearance order, duplicates dropped.
    pub prerequisites: Vec<String>,
    /// Command lines verbatim, indentation included.
    pub commands: Vec<String>,
}

/// Recorded file change dates relative to one last-build instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// The time of the previous build; all change dates lie before it.
    pub last_build_time: u64,
    /// Change date per file name.
    pub change_dates: HashMap<String, u64>,
}

/// Parse makefile text into rules, in first-appearance order.
///
/// A later header for an already known target appends its new
/// prerequisites (duplicates dropped, order preserved); if the earlier
/// rule already has commands, the later header's command lines are
/// discarded, so the first command set wins.
///
/// # Errors
///
/// Returns [`MakeError::Syntax`] carrying the offending line for a
/// command line before any header or a line matching no part of the
/// grammar.
pub fn parse_makefile(text: &str) -> Result<Vec<Rule>, MakeError> {
    let mut rules: Vec<Rule> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    // Rule the next command line attaches to, and whether that rule is
    // still accepting commands.
    let mut current: Option<usize> = None;
    let mut taking_commands = false;

    for line in text.lines() {
        if RE_IGNORE.is_match(line) {
            continue;
        }
        if let Some(captures) = RE_HEADER.captures(line) {
            let target = captures[1].to_string();
            let position = match index.get(&target) {
                Some(&at) => at,
                None => {
                    debug!("New rule for target {target}");
                    rules.push(Rule {
                        target: target.clone(),
                        prerequisites: Vec::new(),
                        commands: Vec::new(),
                    });
                    index.insert(target, rules.len() - 1);
                    rules.len() - 1
                }
            };
            let rule = &mut rules[position];
            for prereq in captures[2].split_whitespace() {
                if !rule.prerequisites.iter().any(|p| p == prereq) {
                    rule.prerequisites.push(prereq.to_string());
                }
            }
            taking_commands = rule.commands.is_empty();
            current = Some(position);
            continue;
        }
        if RE_COMMAND.is_match(line) {
            let position = current.ok_or_else(|| MakeError::Syntax {
                line: line.to_string(),
            })?;
            if taking_commands {
                rules[position].commands.push(line.to_string());
            }
            continue;
        }
        return Err(MakeError::Syntax {
            line: line.to_string(),
        });
    }

    info!("Parsed {} makefile rules", rules.len());
    Ok(rules)
}

/// Parse fileinfo text: the last build time on the first line, then one
/// `NAME CHANGEDATE` entry per line. Blank lines and `#` comments are
/// skipped after the first line.
///
/// # Errors
///
/// Returns [`MakeError::MalformedFileinfo`] carrying the offending line
/// when the first line is not an unsigned integer, an entry does not
/// match the grammar, or a change date lies at or after the last build
/// time.
pub fn parse_fileinfo(text: &str) -> Result<FileInfo, MakeError> {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("");
    let last_build_time: u64 =
        first
            .trim()
            .parse()
            .map_err(|_| MakeError::MalformedFileinfo {
                line: first.to_string(),
            })?;

    let mut change_dates = HashMap::new();
    for line in lines {
        if RE_IGNORE.is_match(line) {
            continue;
        }
        let captures = RE_FILEINFO
            .captures(line)
            .ok_or_else(|| MakeError::MalformedFileinfo {
                line: line.to_string(),
            })?;
        let date: u64 = captures[2]
            .parse()
            .map_err(|_| MakeError::MalformedFileinfo {
                line: line.to_string(),
            })?;
        if date >= last_build_time {
            return Err(MakeError::MalformedFileinfo {
                line: line.to_string(),
            });
        }
        change_dates.insert(captures[1].to_string(), date);
    }

    info!(
        "Parsed fileinfo: build time {last_build_time}, {} entries",
        change_dates.len()
    );
    Ok(FileInfo {
        last_build_time,
        change_dates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_makefile() {
        let rules = parse_makefile(
            "# build everything\n\
             prog: main.o util.o\n\
             \tcc -o prog main.o util.o\n\
             \n\
             main.o: main.c\n\
             \tcc -c main.c\n",
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].target, "prog");
        assert_eq!(rules[0].prerequisites, ["main.o", "util.o"]);
        assert_eq!(rules[0].commands, ["\tcc -o prog main.o util.o"]);
        assert_eq!(rules[1].target, "main.o");
    }

    #[test]
    fn test_reopened_rule_merges_prerequisites() {
        let rules = parse_makefile(
            "a: b\n\
             \tcmd1\n\
             a: c b\n\
             \tignored\n",
        )
        .unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].prerequisites, ["b", "c"]);
        // The first command set wins.
        assert_eq!(rules[0].commands, ["\tcmd1"]);
    }

    #[test]
    fn test_reopened_rule_without_commands_takes_later_ones() {
        let rules = parse_makefile("a: b\na: c\n\tcmd\n").unwrap();
        assert_eq!(rules[0].commands, ["\tcmd"]);
    }

    #[test]
    fn test_command_before_header_is_syntax_error() {
        let err = parse_makefile("\torphan\n").unwrap_err();
        assert!(matches!(err, MakeError::Syntax { line } if line == "\torphan"));
    }

    #[test]
    fn test_invalid_target_name_is_syntax_error() {
        let err = parse_makefile("bad=name: x\n").unwrap_err();
        assert!(matches!(err, MakeError::Syntax { .. }));
    }

    #[test]
    fn test_parse_fileinfo() {
        let info = parse_fileinfo("100\nmain.c 50\nutil.c 60\n").unwrap();
        assert_eq!(info.last_build_time, 100);
        assert_eq!(info.change_dates.get("main.c"), Some(&50));
        assert_eq!(info.change_dates.get("util.c"), Some(&60));
    }

    #[test]
    fn test_fileinfo_change_date_after_build_time_is_rejected() {
        let err = parse_fileinfo("100\nmain.c 100\n").unwrap_err();
        assert!(matches!(err, MakeError::MalformedFileinfo { line } if line == "main.c 100"));
    }

    #[test]
    fn test_fileinfo_bad_first_line_is_rejected() {
        let err = parse_fileinfo("not-a-number\n").unwrap_err();
        assert!(matches!(err, MakeError::MalformedFileinfo { .. }));
    }
}
