use crate::parser::{ParseError, parse_record};
use crate::record::Record;
use crate::selftest;
use crate::tree::{InsertOutcome, Tree};
use anyhow::Result;
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Message shown for any line that does not hold a valid record.
///
/// Details of what was wrong go to the log only.
pub const INVALID_INPUT: &str = "Invalid input";

/// Tells the read loop whether to keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One command line, decoded.
///
/// Commands that carry a record own it: executing an insert moves the record
/// into the tree, while erase and contains only lend it to the tree and drop
/// it afterwards.
#[derive(Debug)]
pub enum Command<'a> {
    Insert(Record),
    Erase(Record),
    Contains(Record),
    Print,
    Exit,
    SelfTest,
    /// A record command whose arguments did not parse.
    Invalid(ParseError),
    /// Anything else. Holds the raw line, which is untrusted.
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Decode `line` by its first character.
    pub fn from_line(line: &'a str) -> Self {
        let with_record = |make: fn(Record) -> Command<'a>| match parse_record(line) {
            Ok(record) => make(record),
            Err(err) => Command::Invalid(err),
        };

        match line.chars().next() {
            Some('i') => with_record(Command::Insert),
            Some('e') => with_record(Command::Erase),
            Some('c') => with_record(Command::Contains),
            Some('p') => Command::Print,
            Some('x') => Command::Exit,
            Some('t') => Command::SelfTest,
            _ => Command::Unknown(line),
        }
    }

    /// Run the command against `tree`, writing any output to `out`.
    pub fn execute(self, tree: &mut Tree, out: &mut dyn Write) -> Result<Flow> {
        match self {
            Command::Insert(record) => match tree.insert(record) {
                InsertOutcome::Inserted => log::debug!("inserted, {} records", tree.len()),
                InsertOutcome::Duplicate => log::debug!("duplicate ignored"),
                InsertOutcome::AllocationFailed => writeln!(out, "Out of memory")?,
            },
            Command::Erase(record) => {
                let erased = tree.erase(&record);
                log::debug!("erase {record}: {erased}");
            }
            Command::Contains(record) => {
                let answer = if tree.contains(&record) { "y" } else { "n" };
                writeln!(out, "{answer}")?;
            }
            Command::Print => tree.print(out)?,
            Command::Exit => return Ok(Flow::Exit),
            Command::SelfTest => render_self_tests(&selftest::run(), out)?,
            Command::Invalid(err) => {
                log::debug!("rejected command arguments: {err}");
                writeln!(out, "{INVALID_INPUT}")?;
            }
            Command::Unknown(text) => {
                out.write_all(b"No such command: ")?;
                out.write_all(text.as_bytes())?;
                out.write_all(b"\n\n")?;
            }
        }
        Ok(Flow::Continue)
    }
}

/// Write `Testing...` followed by one `[i/n] PASS|FAIL` line per case.
pub fn render_self_tests(results: &[selftest::CaseResult], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Testing...")?;
    let total = results.len();
    let width = total.to_string().len();
    for (i, result) in results.iter().enumerate() {
        if let Some(failure) = &result.failure {
            writeln!(out, "ASSERT FAILED: {}: {}", result.name, failure)?;
        }
        let verdict = if result.passed() { "PASS" } else { "FAIL" };
        writeln!(out, "[{:>width$}/{total}] {verdict}", i + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(tree: &mut Tree, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = Command::from_line(line).execute(tree, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_decode_by_first_character() {
        assert!(matches!(Command::from_line("i 1 a"), Command::Insert(_)));
        assert!(matches!(Command::from_line("e 1 a"), Command::Erase(_)));
        assert!(matches!(Command::from_line("c 1 a"), Command::Contains(_)));
        assert!(matches!(Command::from_line("p"), Command::Print));
        assert!(matches!(Command::from_line("x"), Command::Exit));
        assert!(matches!(Command::from_line("t"), Command::SelfTest));
        assert!(matches!(Command::from_line("i abc x"), Command::Invalid(_)));
        assert!(matches!(Command::from_line(" i 1 a"), Command::Unknown(" i 1 a")));
        assert!(matches!(Command::from_line(""), Command::Unknown("")));
    }

    #[test]
    fn test_insert_then_contains() {
        let mut tree = Tree::new();
        assert_eq!(run(&mut tree, "i 10 aap"), (Flow::Continue, String::new()));
        assert_eq!(run(&mut tree, "c 10 aap").1, "y\n");
        assert_eq!(run(&mut tree, "c 10 noot").1, "n\n");
    }

    #[test]
    fn test_erase_removes_record() {
        let mut tree = Tree::new();
        run(&mut tree, "i 10 aap");
        assert_eq!(run(&mut tree, "e 10 aap").1, "");
        assert_eq!(run(&mut tree, "c 10 aap").1, "n\n");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_invalid_arguments_report_generic_message() {
        let mut tree = Tree::new();
        assert_eq!(run(&mut tree, "i abc x").1, "Invalid input\n");
        let long = format!("c 1 {}", "a".repeat(64));
        assert_eq!(run(&mut tree, &long).1, "Invalid input\n");
        assert!(tree.is_empty());
    }

    #[test]
    fn test_unknown_command_is_echoed_literally() {
        let mut tree = Tree::new();
        assert_eq!(
            run(&mut tree, "%s%n {} {0}").1,
            "No such command: %s%n {} {0}\n\n"
        );
    }

    #[test]
    fn test_exit_stops_the_loop() {
        let mut tree = Tree::new();
        assert_eq!(run(&mut tree, "x"), (Flow::Exit, String::new()));
    }

    #[test]
    fn test_full_tree_reports_out_of_memory() {
        let mut tree = Tree::with_node_limit(1);
        run(&mut tree, "i 1 a");
        assert_eq!(run(&mut tree, "i 2 b").1, "Out of memory\n");
        assert_eq!(run(&mut tree, "i 1 a").1, "");
    }

    #[test]
    fn test_self_test_rendering() {
        let results: Vec<selftest::CaseResult> = (0..10)
            .map(|i| selftest::CaseResult {
                name: "case",
                failure: (i == 2).then(|| "boom".to_string()),
            })
            .collect();
        let mut out = Vec::new();
        render_self_tests(&results, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Testing...");
        assert_eq!(lines[1], "[ 1/10] PASS");
        assert_eq!(lines[3], "ASSERT FAILED: case: boom");
        assert_eq!(lines[4], "[ 3/10] FAIL");
        assert_eq!(lines[11], "[10/10] PASS");
    }

    #[test]
    fn test_self_test_command_passes() {
        let mut tree = Tree::new();
        let (_, text) = run(&mut tree, "t");
        assert!(text.starts_with("Testing...\n"));
        assert!(!text.contains("FAIL"));
        assert!(tree.is_empty());
    }
}
