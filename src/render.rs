//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the chat loop
//! can write to the terminal or to any other sink.

use std::io::{self, Stdout, Write};

/// Label printed in front of every model reply.
pub const REPLY_LABEL: &str = "Gemini";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a complete model reply.
    fn print_reply(&mut self, text: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print a warning about something that was skipped.
    fn print_warning(&mut self, warning: &str);
}

/// Plain text renderer.
///
/// Replies and informational text go to the wrapped writer (stdout by
/// default); errors and warnings always go to stderr.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer writing to stdout.
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Consumes the renderer and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_reply(&mut self, text: &str) {
        self.write_line(&format!("\n{REPLY_LABEL}: {text}"));
    }

    fn print_info(&mut self, info: &str) {
        self.write_line(info);
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("Error: {error}");
    }

    fn print_warning(&mut self, warning: &str) {
        eprintln!("Warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_is_labelled_after_blank_line() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new());
        renderer.print_reply("Hi there!");
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "\nGemini: Hi there!\n");
    }

    #[test]
    fn info_is_written_verbatim() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new());
        renderer.print_info("line one\n");
        renderer.print_info("line two");
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "line one\n\nline two\n");
    }
}
