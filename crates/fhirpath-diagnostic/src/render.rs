//! The caret-block diagnostic renderer (spec §4.3).
//!
//! Produces the exact template:
//!
//! ```text
//! ParseError: <originalMessage>
//!   at line <L>, column <C>:
//!
//! > <line-no padded to 4> | <source line containing the error>
//!        | <C-1 spaces>^^^^^
//! ```
//!
//! with up to two lines of context before and after the error line when
//! available, each prefixed `  N | ` (the error line instead gets `> N | `).

use fhirpath_ir::Position;

const CONTEXT_LINES: usize = 2;
const GUTTER_WIDTH: usize = 4;

fn gutter(marker: &str, line_no: Option<usize>) -> String {
    match line_no {
        Some(n) => format!("{marker}{n:>width$} | ", width = GUTTER_WIDTH),
        None => format!("{marker}{:width$} | ", "", width = GUTTER_WIDTH),
    }
}

/// Renders the full, user-visible diagnostic text for a parse failure.
pub fn render(original_message: &str, position: Position, expression: &str) -> String {
    let lines: Vec<&str> = if expression.is_empty() {
        vec![""]
    } else {
        expression.split('\n').collect()
    };
    let error_idx = (position.line as usize).saturating_sub(1).min(lines.len() - 1);
    let error_line = lines[error_idx];

    let mut out = format!(
        "ParseError: {original_message}\n  at line {}, column {}:\n\n",
        position.line, position.column
    );

    let start = error_idx.saturating_sub(CONTEXT_LINES);
    let end = (error_idx + CONTEXT_LINES).min(lines.len() - 1);

    for idx in start..=end {
        let line_no = idx + 1;
        let marker = if idx == error_idx { "> " } else { "  " };
        out.push_str(&gutter(marker, Some(line_no)));
        out.push_str(lines[idx]);
        out.push('\n');

        if idx == error_idx {
            let col = position.column.max(1) as usize;
            let line_len = error_line.chars().count();
            let remaining = line_len.saturating_sub(col - 1);
            let caret_count = remaining.clamp(1, 5);
            out.push_str(&gutter("  ", None));
            out.push_str(&" ".repeat(col - 1));
            out.push_str(&"^".repeat(caret_count));
            out.push('\n');
        }
    }

    if let Some(hint) = suggest(original_message, expression) {
        out.push_str(&hint);
        out.push('\n');
    }

    // Drop the single trailing newline so callers get a clean final line.
    out.pop();
    out
}

/// An optional extra hint line (spec §4.3 "Suggestions").
fn suggest(original_message: &str, expression: &str) -> Option<String> {
    let open_parens = expression.matches('(').count();
    let close_parens = expression.matches(')').count();
    if open_parens > close_parens {
        let missing = open_parens - close_parens;
        return Some(format!("hint: add {missing} closing `)`"));
    }

    let open_brackets = expression.matches('[').count();
    let close_brackets = expression.matches(']').count();
    if open_brackets > close_brackets {
        let missing = open_brackets - close_brackets;
        return Some(format!("hint: add {missing} closing `]`"));
    }

    if original_message == "Expected identifier after dot" {
        return Some(
            "hint: an identifier, quoted identifier, or function call must follow `.`".to_string(),
        );
    }

    if original_message.starts_with("Unterminated") {
        return Some("hint: check for a missing closing quote, backtick, or `*/`".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_the_exact_template_shape() {
        let rendered = render(
            "Unexpected token in expression. Expected an operand, function, or identifier.",
            Position::new(12, 1, 13),
            "Patient.name(",
        );
        assert!(rendered.starts_with(
            "ParseError: Unexpected token in expression. Expected an operand, function, or identifier.\n  at line 1, column 13:\n"
        ));
        assert!(rendered.contains("> "));
        assert!(rendered.contains("Patient.name("));
        assert!(rendered.contains("^"));
    }

    #[test]
    fn caret_count_is_clamped_between_one_and_five() {
        let rendered = render("boom", Position::new(0, 1, 1), "a very long line of source text");
        let caret_line = rendered.lines().find(|l| l.contains('^')).unwrap();
        assert_eq!(caret_line.matches('^').count(), 5);

        let rendered = render("boom", Position::new(0, 1, 1), "a");
        let caret_line = rendered.lines().find(|l| l.contains('^')).unwrap();
        assert_eq!(caret_line.matches('^').count(), 1);
    }

    #[test]
    fn unbalanced_parens_get_a_hint() {
        let rendered = render("boom", Position::new(0, 1, 1), "Patient.name(");
        assert!(rendered.contains("add 1 closing `)`"));
    }

    #[test]
    fn shows_surrounding_context_lines() {
        let expr = "one\ntwo\nthree\nfour\nfive\nsix\nseven";
        let rendered = render("boom", Position::new(0, 4, 1), expr);
        assert!(rendered.contains("two"));
        assert!(rendered.contains("> "));
        assert!(rendered.contains("six"));
        assert!(!rendered.contains("seven"));
    }
}
