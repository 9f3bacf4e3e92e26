use crate::line_reader::{LineReader, MAX_LINE_LENGTH, ReadError};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead};

/// Anything the interpreter can pull command lines from.
///
/// `Ok(None)` means the input is exhausted.
pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<String>, ReadError>;
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        self.read_line()
    }
}

/// Interactive line source with editing and history, backed by `rustyline`.
pub struct EditorSource {
    editor: DefaultEditor,
    prompt: String,
}

impl EditorSource {
    pub fn new(prompt: impl Into<String>) -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: prompt.into(),
        })
    }
}

impl LineSource for EditorSource {
    fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if line.len() > MAX_LINE_LENGTH {
                    return Err(ReadError::LineTooLong {
                        max: MAX_LINE_LENGTH,
                    });
                }
                if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                    log::warn!("could not record history: {err}");
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(ReadError::Io(err)),
            Err(err) => Err(ReadError::Io(io::Error::other(err.to_string()))),
        }
    }
}

/// Replays a fixed list of lines; handy for driving the interpreter in tests.
pub struct ScriptSource<I> {
    lines: I,
}

impl<I> ScriptSource<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl<I> LineSource for ScriptSource<I>
where
    I: Iterator<Item = String>,
{
    fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        Ok(self.lines.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_reader_as_source() {
        let mut source = LineReader::new(Cursor::new(b"p\nx".to_vec()));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("p"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("x"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_script_source_replays_lines() {
        let mut source = ScriptSource::new(vec!["i 1 a".to_string(), "p".to_string()]);
        assert_eq!(source.next_line().unwrap().as_deref(), Some("i 1 a"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("p"));
        assert_eq!(source.next_line().unwrap(), None);
    }
}
