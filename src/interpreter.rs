use crate::command::{Command, Flow, INVALID_INPUT};
use crate::io_adapters::LineSource;
use crate::line_reader::ReadError;
use crate::tree::Tree;
use anyhow::{Context, Result};
use std::io::Write;

/// Read-eval-print loop driving a sorted container from text commands.
///
/// The interpreter owns the [`Tree`] and never reaches into it beyond its
/// public operations. Lines come from any [`LineSource`] and output goes to
/// any writer, so a session can run against stdin/stdout or entirely in
/// memory.
///
/// Example
/// ```
/// use sint::Interpreter;
/// let mut sint = Interpreter::default();
/// let mut out = Vec::new();
/// sint.execute("i 10 aap", &mut out).unwrap();
/// sint.execute("c 10 aap", &mut out).unwrap();
/// assert_eq!(out, b"y\n");
/// ```
pub struct Interpreter {
    tree: Tree,
    prompt: bool,
    farewell: bool,
}

impl Interpreter {
    /// Create an interpreter around an existing tree, without prompt or farewell.
    pub fn with_tree(tree: Tree) -> Self {
        Self {
            tree,
            prompt: false,
            farewell: false,
        }
    }

    /// Print `> ` on a fresh line before every read.
    pub fn set_prompt(&mut self, prompt: bool) {
        self.prompt = prompt;
    }

    /// Print `Bye.` once the loop ends.
    pub fn set_farewell(&mut self, farewell: bool) {
        self.farewell = farewell;
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Execute a single command line.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        log::debug!("command: {line:?}");
        Command::from_line(line).execute(&mut self.tree, out)
    }

    /// Run commands from `source` until it is exhausted or `x` is read.
    ///
    /// Lines that are too long or not UTF-8 are answered with a generic
    /// diagnostic and the loop goes on; a failing stream ends it with an error.
    pub fn run(&mut self, source: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
        let result = self.run_loop(source, out);
        if self.farewell {
            write!(out, "\nBye.\n")?;
            out.flush()?;
        }
        result
    }

    fn run_loop(&mut self, source: &mut dyn LineSource, out: &mut dyn Write) -> Result<()> {
        loop {
            if self.prompt {
                write!(out, "\n> ")?;
                out.flush()?;
            }

            let line = match source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(()),
                Err(err) if err.is_recoverable() => {
                    log::debug!("rejected input line: {err}");
                    writeln!(out, "{INVALID_INPUT}")?;
                    continue;
                }
                Err(ReadError::Io(err)) => {
                    log::warn!("input failed: {err}");
                    return Err(err).context("failed to read command");
                }
                Err(err) => return Err(err.into()),
            };

            let flow = self.execute(&line, out)?;
            out.flush()?;
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }
}

impl Default for Interpreter {
    /// An interpreter with an empty, unlimited tree and no prompt.
    fn default() -> Self {
        Self::with_tree(Tree::new())
    }
}
