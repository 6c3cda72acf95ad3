use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::{
    error::{ParseError, RuntimeError},
    interpreter::{position::Span, value::core::Origin},
};

/// Width of the banner lines framing a diagnostic.
const BANNER_WIDTH: usize = 60;

/// Applies ANSI styles only when colour output is enabled.
#[derive(Clone, Copy)]
struct Painter {
    colored: bool,
}

impl Painter {
    fn banner(self, title: &str) -> String {
        let line = format!("{title:=^width$}", width = BANNER_WIDTH);
        if self.colored { line.red().bold().to_string() } else { line }
    }

    fn heading(self, text: &str) -> String {
        if self.colored { text.blue().bold().to_string() } else { text.to_owned() }
    }

    fn location(self, text: &str) -> String {
        if self.colored { text.green().to_string() } else { text.to_owned() }
    }

    fn source(self, text: &str) -> String {
        if self.colored { text.yellow().to_string() } else { text.to_owned() }
    }

    fn kind(self, text: &str) -> String {
        if self.colored { text.red().bold().to_string() } else { text.to_owned() }
    }

    fn message(self, text: &str) -> String {
        if self.colored { text.red().to_string() } else { text.to_owned() }
    }
}

/// Renders a lexer or parser error.
///
/// ```text
/// ======================= SYNTAX ERROR =======================
///   File main.peri
///     Line 1, Column 9
///    >var x = )
///             ^
/// SyntaxError: Expected value, identifier, ...
/// ============================================================
/// ```
#[must_use]
pub fn render_parse_error(error: &ParseError, colored: bool) -> String {
    let paint = Painter { colored };
    let mut out = String::new();

    push_line(&mut out, &paint.banner(" SYNTAX ERROR "));
    push_line(&mut out, &paint.location(&format!("  File {}", error.span.start.file())));
    push_excerpt(&mut out, paint, &error.span);
    push_line(&mut out,
              &format!("{}: {}", paint.kind(error.kind.name()), paint.message(&error.message)));
    out.push_str(&paint.banner(""));
    out
}

/// Renders a runtime error with its traceback and origin chain.
///
/// Frames are listed outermost first. Each frame points at the call that
/// entered the next one; the last frame points at the error itself.
#[must_use]
pub fn render_runtime_error(error: &RuntimeError, colored: bool) -> String {
    let paint = Painter { colored };
    let mut out = String::new();

    push_line(&mut out, &paint.banner(" RUNTIME ERROR "));
    push_line(&mut out, &paint.heading("Traceback (most recent call last):"));

    let mut frames = Vec::new();
    let mut span = error.span.clone();
    let mut context = error.context.clone();
    while let Some(frame) = context {
        frames.push((span, frame.display.clone()));
        span = frame.call_site.clone();
        context = frame.parent.clone();
    }
    if frames.is_empty() {
        frames.push((error.span.clone(), "<program>".into()));
    }

    for (span, display) in frames.iter().rev() {
        match span {
            Some(span) => {
                push_line(&mut out,
                          &paint.location(&format!("  File {}, In {display}", span.start.file())));
                push_excerpt(&mut out, paint, span);
            },
            None => push_line(&mut out, &paint.location(&format!("  In {display}"))),
        }
    }

    if !error.origin.is_empty() {
        push_line(&mut out, &paint.heading("Origin (most recent call last):"));
        for Origin { span, display } in &error.origin {
            push_line(&mut out,
                      &paint.location(&format!("  File {}, In {display}", span.start.file())));
            push_excerpt(&mut out, paint, span);
        }
    }

    push_line(&mut out,
              &format!("{}: {}", paint.kind(error.kind.name()), paint.message(&error.message)));
    out.push_str(&paint.banner(""));
    out
}

/// The `Line`/`Column` line, the quoted source line and the carets under the
/// span. A span running past its first line is underlined to the line end.
fn push_excerpt(out: &mut String, paint: Painter, span: &Span) {
    let start = &span.start;
    let text = start.line_text();
    let line_width = text.chars().count();

    let end_column = if span.end.line == start.line {
        span.end.column
    } else {
        line_width
    };
    let width = end_column.saturating_sub(start.column).max(1);

    push_line(out,
              &paint.location(&format!("    Line {}, Column {}", start.line + 1, start.column + 1)));
    let _ = writeln!(out, "   >{}", paint.source(text));
    let _ = writeln!(out,
                     "    {}{}",
                     " ".repeat(start.column),
                     paint.source(&"^".repeat(width)));
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        interpreter::{config::Config, evaluator::core::Interpreter},
    };

    fn render(text: &str) -> String {
        match Interpreter::new(Config::default()).run("main.peri", text) {
            Err(error) => error.render(false),
            Ok(values) => panic!("expected an error, got {values:?}"),
        }
    }

    #[test]
    fn syntax_errors_point_at_the_token() {
        let rendered = render("var x = )");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], format!("{:=^60}", " SYNTAX ERROR "));
        assert_eq!(lines[1], "  File main.peri");
        assert_eq!(lines[2], "    Line 1, Column 9");
        assert_eq!(lines[3], "   >var x = )");
        assert_eq!(lines[4], "            ^");
        assert!(lines[5].starts_with("SyntaxError: "));
        assert_eq!(lines[6], "=".repeat(60));
    }

    #[test]
    fn runtime_errors_list_frames_outermost_first() {
        let rendered = render("var f = func() {\nreturn(1 + \"a\")\n}\nf()");
        let expected = "Traceback (most recent call last):
  File main.peri, In <program>
    Line 4, Column 1
   >f()
    ^^^
  File main.peri, In f
    Line 2, Column 8
   >return(1 + \"a\")
           ^^^^^^^
";
        assert!(rendered.contains(expected), "{rendered}");
        assert!(rendered.contains("OperationError: "));
    }

    #[test]
    fn origins_follow_the_traceback() {
        let rendered = render("var s = \"a\"\nvar x = 5\nx = s");
        assert!(rendered.contains("TypeError: "), "{rendered}");
        assert!(rendered.contains("Origin (most recent call last):\n  File main.peri, In <program>\n    Line 1, Column 9"),
                "{rendered}");
    }

    #[test]
    fn origins_cross_function_calls() {
        let rendered = render("var m = \"a\"\nvar f = func(v) {\nvar n = 5\nn = v\n}\nf(m)");
        let Some((_, origin)) = rendered.split_once("Origin (most recent call last):\n") else {
            panic!("no origin section in\n{rendered}");
        };
        let hops: Vec<&str> = origin.lines()
                                    .filter(|line| line.starts_with("  File") || line.starts_with("    Line"))
                                    .collect();
        assert_eq!(hops,
                   ["  File main.peri, In <program>",
                    "    Line 1, Column 9",
                    "  File main.peri, In <program>",
                    "    Line 6, Column 3",
                    "  File main.peri, In f",
                    "    Line 4, Column 5"],
                   "{rendered}");
    }

    #[test]
    fn colour_is_optional() {
        let Err(error) = Interpreter::new(Config::default()).run("main.peri", "1 / 0") else {
            panic!("expected an error");
        };
        assert!(!error.render(false).contains('\u{1b}'));
        assert!(error.render(true).contains('\u{1b}'));
        assert!(matches!(error, Error::Runtime(_)));
    }
}
