//! Line input for the chat application.
//!
//! [`RustylineReader`] is used when stdin is a terminal; [`BufReadReader`]
//! handles piped input and tests.

use std::io::{self, BufRead, Stdin, Stdout, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// A source of user input lines.
pub trait LineReader {
    /// Show `prompt` and read one line without its line terminator.
    ///
    /// Returns `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive line editor backed by rustyline.
pub struct RustylineReader {
    editor: DefaultEditor,
}

impl RustylineReader {
    /// Create a reader on the controlling terminal.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        // Only the last prompt line is handed to the editor.
        let (head, prompt) = match prompt.rfind('\n') {
            Some(idx) => prompt.split_at(idx + 1),
            None => ("", prompt),
        };
        if !head.is_empty() {
            let mut stdout = io::stdout();
            stdout.write_all(head.as_bytes())?;
            stdout.flush()?;
        }
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                // Ctrl+C at a prompt discards the line and asks again.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(readline_error(err)),
            }
        }
    }
}

/// Line reader over any buffered input, echoing prompts to `prompt_out`.
pub struct BufReadReader<R: BufRead, W: Write> {
    input: R,
    prompt_out: W,
}

impl BufReadReader<io::StdinLock<'static>, Stdout> {
    /// Read from stdin, prompting on stdout.
    pub fn stdin() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> BufReadReader<R, W> {
    /// Create a reader over `input` that writes prompts to `prompt_out`.
    pub fn new(input: R, prompt_out: W) -> Self {
        Self { input, prompt_out }
    }

    /// Consumes the reader and returns the prompt writer.
    pub fn into_prompt_out(self) -> W {
        self.prompt_out
    }
}

impl<R: BufRead, W: Write> LineReader for BufReadReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(err) => Error::io("failed to read line", err),
        err => Error::io("failed to read line", io::Error::other(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_lines_without_terminators() {
        let mut reader = BufReadReader::new(Cursor::new("one\r\ntwo\nthree"), Vec::new());
        assert_eq!(reader.read_line("> ").unwrap().as_deref(), Some("one"));
        assert_eq!(reader.read_line("> ").unwrap().as_deref(), Some("two"));
        assert_eq!(reader.read_line("> ").unwrap().as_deref(), Some("three"));
        assert_eq!(reader.read_line("> ").unwrap(), None);
        let prompts = String::from_utf8(reader.into_prompt_out()).unwrap();
        assert_eq!(prompts, "> > > > ");
    }

    #[test]
    fn empty_line_is_not_end_of_input() {
        let mut reader = BufReadReader::new(Cursor::new("\n"), io::sink());
        assert_eq!(reader.read_line("").unwrap().as_deref(), Some(""));
        assert_eq!(reader.read_line("").unwrap(), None);
    }
}
