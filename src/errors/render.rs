use std::fmt::{self, Write};

use crate::get_line_at_position;

use super::errors::{Diagnostic, ErrorTip};

/// Renders a diagnostic as a caret report against its source line.
///
/// ```text
/// error[E104]: String starting here was never closed. (add a closing " ...)
/// -> main.steps
///   |
/// 2 | display "abc
///   | --------^
/// ```
///
/// # Arguments
///
/// * `diagnostic` - The diagnostic to render
/// * `source` - The buffer the diagnostic was produced from
/// * `file` - Name shown in the report, `<string>` when absent
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, file: Option<&str>) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_diagnostic(&mut out, diagnostic, source, file.unwrap_or("<string>"));
    out
}

fn write_diagnostic(
    out: &mut String,
    diagnostic: &Diagnostic,
    source: &str,
    file: &str,
) -> fmt::Result {
    match diagnostic.get_tip() {
        ErrorTip::None => writeln!(
            out,
            "{}[{}]: {}",
            diagnostic.get_severity(),
            diagnostic.get_code(),
            diagnostic.message()
        )?,
        tip => writeln!(
            out,
            "{}[{}]: {} ({})",
            diagnostic.get_severity(),
            diagnostic.get_code(),
            diagnostic.message(),
            tip
        )?,
    }
    writeln!(out, "-> {}", file)?;

    let position = diagnostic.get_span().start;
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return Ok(());
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    writeln!(out, "{:>padding$}", "|")?;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    writeln!(out, "{} | {}", line_string, line_text_removed.trim_end())?;

    let column = line_text
        .get(..line_pos)
        .unwrap_or(&line_text)
        .chars()
        .count();
    let arrows = column.saturating_sub(removed_whitespace) + 1;

    writeln!(out, "{:>padding$} {:->arrows$}", "|", "^")
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .count();

    (&string[start..], start)
}
