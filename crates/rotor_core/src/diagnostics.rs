//! Source-excerpt rendering for lex, parse, and runtime errors.
//!
//! Each reported error prints three lines to stderr:
//!
//! ```text
//!      3| let x = 1 ~ 2;
//!                   ^
//!  SyntaxError: unexpected word
//! ```
//!
//! The first line is the 1-based source line, the second underlines the
//! offending span (tab characters in the prefix are reproduced so the carets
//! stay aligned), and the third is the error message.  Errors without a
//! location print the message alone.

use crate::error::RotorError;
use crate::parser::scanner::Loc;

/// Renders diagnostics against one source text.
#[derive(Debug, Clone, Copy)]
pub struct Diagnostics<'src> {
    source: &'src str,
}

impl<'src> Diagnostics<'src> {
    /// Creates a renderer for `source`.
    pub fn new(source: &'src str) -> Self {
        Self { source }
    }

    /// Renders `err` with a source excerpt when it carries a location.
    pub fn report(&self, err: &RotorError) {
        match err.loc() {
            Some(loc) if loc.line > 0 => self.print(loc, &err.to_string()),
            _ => eprintln!(" {err}"),
        }
    }

    /// Prints the excerpt/caret/message triple for an arbitrary span.
    pub fn print(&self, loc: Loc, msg: &str) {
        let (start, end) = self.line_bounds(loc.line);
        let text = &self.source[start..end];
        eprintln!("{:>6}| {}", loc.line, text);

        let mut underline = String::from("        ");
        let col_end = loc.offset.clamp(start, end);
        for c in self.source[start..col_end].chars() {
            underline.push(if c == '\t' { '\t' } else { ' ' });
        }
        for _ in 0..loc.len.max(1) {
            underline.push('^');
        }
        eprintln!("{underline}");
        eprintln!(" {msg}");
    }

    /// Returns the byte range of the 1-based line `line` (without the
    /// terminating newline).  Out-of-range lines collapse to the last line.
    fn line_bounds(&self, line: u32) -> (usize, usize) {
        let mut start = 0usize;
        let mut current = 1u32;
        while current < line {
            match self.source[start..].find('\n') {
                Some(i) => {
                    start += i + 1;
                    current += 1;
                }
                None => break,
            }
        }
        let end = self.source[start..]
            .find('\n')
            .map(|i| start + i)
            .unwrap_or(self.source.len());
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bounds_single_line() {
        let d = Diagnostics::new("let x = 1;");
        assert_eq!(d.line_bounds(1), (0, 10));
    }

    #[test]
    fn test_line_bounds_inner_line() {
        let d = Diagnostics::new("a\nbb\nccc\n");
        assert_eq!(d.line_bounds(1), (0, 1));
        assert_eq!(d.line_bounds(2), (2, 4));
        assert_eq!(d.line_bounds(3), (5, 8));
    }

    #[test]
    fn test_line_bounds_past_end_clamps() {
        let d = Diagnostics::new("a\nbb");
        assert_eq!(d.line_bounds(9), (2, 4));
    }
}
