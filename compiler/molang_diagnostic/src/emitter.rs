//! Terminal emitter.
//!
//! Human-readable output with a source excerpt and caret underline:
//!
//! ```text
//! error[E2001]: unknown scope `foo`
//!  --> 1:1
//!   |
//! 1 | foo.x + 1
//!   | ^^^^^ not a known scope
//!   = note: valid scopes are query, variable, context, global, temp, math
//! ```

use std::io::{self, Write};

use molang_ir::Span;

use crate::{Diagnostic, Severity};

mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for the terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// For `Auto`, `is_tty` decides.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn paint(&self, color: &'static str) -> &'static str {
        if self.colors {
            color
        } else {
            ""
        }
    }

    /// Write one diagnostic rendered against `source`.
    pub fn emit(&mut self, diagnostic: &Diagnostic, source: &str) -> io::Result<()> {
        let severity_color = match diagnostic.severity {
            Severity::Error => colors::ERROR,
        };
        let (sev, bold, gutter, reset) = (
            self.paint(severity_color),
            self.paint(colors::BOLD),
            self.paint(colors::GUTTER),
            self.paint(colors::RESET),
        );

        writeln!(
            self.writer,
            "{sev}{}[{}]{reset}{bold}: {}{reset}",
            diagnostic.severity, diagnostic.code, diagnostic.message
        )?;

        let mut labels: Vec<_> = diagnostic.labels.iter().collect();
        labels.sort_by_key(|l| (!l.is_primary, l.span.start));

        if let Some(first) = labels.first() {
            let (line, col) = line_col(source, first.span.start);
            let width = line.to_string().len();
            let pad = " ".repeat(width);
            writeln!(self.writer, "{pad}{gutter}-->{reset} {line}:{col}")?;
            writeln!(self.writer, "{pad} {gutter}|{reset}")?;

            for label in labels {
                let (line, col) = line_col(source, label.span.start);
                let text = line_text(source, line);
                let line_len = text.chars().count();
                let start = col - 1;
                let underline = span_width(source, label.span).clamp(1, line_len.saturating_sub(start).max(1));
                let marker = if label.is_primary { '^' } else { '-' };
                let marker_color = if label.is_primary { sev } else { gutter };

                writeln!(self.writer, "{gutter}{line:>width$} |{reset} {text}")?;
                writeln!(
                    self.writer,
                    "{pad} {gutter}|{reset} {}{marker_color}{} {}{reset}",
                    " ".repeat(start),
                    marker.to_string().repeat(underline),
                    label.message
                )?;
            }
        }

        let pad = " ".repeat(
            diagnostic
                .primary_span()
                .map_or(1, |s| line_col(source, s.start).0.to_string().len()),
        );
        for note in &diagnostic.notes {
            writeln!(self.writer, "{pad} {gutter}={reset} {bold}note{reset}: {note}")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Render a diagnostic as plain text, without colors.
pub fn render(diagnostic: &Diagnostic, source: &str) -> String {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    // Writing to a Vec cannot fail.
    let _ = emitter.emit(diagnostic, source);
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}

/// 1-based line and character column of a byte offset.
pub fn line_col(source: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let mut line = 1;
    let mut line_start = 0;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    let col = source
        .get(line_start..offset)
        .map_or(0, |prefix| prefix.chars().count())
        + 1;
    (line, col)
}

fn line_text(source: &str, line: usize) -> &str {
    source
        .lines()
        .nth(line - 1)
        .unwrap_or("")
        .trim_end_matches('\r')
}

fn span_width(source: &str, span: Span) -> usize {
    let line_end = source
        .get(span.start as usize..)
        .and_then(|rest| rest.find('\n'))
        .map_or(span.end as usize, |i| span.start as usize + i);
    let end = (span.end as usize).min(line_end);
    source
        .get(span.start as usize..end)
        .map_or(1, |text| text.chars().count())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_line_col() {
        let src = "t.a = 1;\nt.b = ?";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 4), (1, 5));
        assert_eq!(line_col(src, 9), (2, 1));
        assert_eq!(line_col(src, 15), (2, 7));
        assert_eq!(line_col(src, 999), (2, 8));
    }

    #[test]
    fn test_render_plain() {
        let src = "foo.x + 1";
        let diag = Diagnostic::error(ErrorCode::E2001)
            .with_message("unknown scope `foo`")
            .with_label(Span::new(0, 5), "not a known scope")
            .with_note("valid scopes are query, variable, context, global, temp, math");

        let expected = "\
error[E2001]: unknown scope `foo`
 --> 1:1
  |
1 | foo.x + 1
  | ^^^^^ not a known scope
  = note: valid scopes are query, variable, context, global, temp, math
";
        assert_eq!(render(&diag, src), expected);
    }

    #[test]
    fn test_render_point_span_at_end() {
        let src = "math.sqrt(";
        let diag = Diagnostic::error(ErrorCode::E1002)
            .with_message("expected expression, found end of input")
            .with_label(Span::point(10), "expected expression");

        let rendered = render(&diag, src);
        assert!(rendered.contains("1 | math.sqrt("));
        assert!(rendered.contains("  |           ^ expected expression"));
    }

    #[test]
    fn test_colors_only_when_enabled() {
        let diag = Diagnostic::error(ErrorCode::E0002).with_message("invalid character `$`");
        let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
        emitter.emit(&diag, "$").unwrap();
        let out = String::from_utf8(emitter.into_inner()).unwrap();
        assert!(out.contains("\x1b[1;31m"));
        assert!(!render(&diag, "$").contains('\x1b'));
    }
}
