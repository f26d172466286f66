//! Whitespace formatting for generated TypeScript and JavaScript
//!
//! There is no JavaScript parser in the pipeline, so formatting is limited to
//! whitespace: trailing whitespace is stripped, runs of blank lines collapse
//! to one and the file ends with exactly one newline. Before touching the
//! text, delimiters are checked for balance so that a broken template is
//! reported instead of silently reshaped.

use crate::error::FormatError;

/// Format generated TypeScript source
pub fn format_source(text: &str) -> Result<String, FormatError> {
    check_balance(text)?;

    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if blank_run > 0 && !out.is_empty() {
            out.push('\n');
        }
        blank_run = 0;
        out.push_str(line);
        out.push('\n');
    }

    Ok(out)
}

/// Count `{}`, `()` and `[]` outside of quoted strings, template literals
/// and comments
fn check_balance(text: &str) -> Result<(), FormatError> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Quoted(char),
        LineComment,
        BlockComment,
    }

    let mut state = State::Code;
    let mut open = 0usize;
    let mut close = 0usize;
    let mut depth = 0isize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '{' | '(' | '[' => {
                    open += 1;
                    depth += 1;
                }
                '}' | ')' | ']' => {
                    close += 1;
                    depth -= 1;
                    if depth < 0 {
                        return Err(FormatError::Unbalanced { open, close });
                    }
                }
                '\'' | '"' | '`' => state = State::Quoted(c),
                '/' if chars.peek() == Some(&'/') => state = State::LineComment,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => {}
            },
            State::Quoted(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote || (c == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                }
            }
        }
    }

    if open != close {
        return Err(FormatError::Unbalanced { open, close });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_blank_lines_and_trailing_space() {
        let formatted = format_source("\n\nexport enum A {  \n  X = 'X',\n\n\n}\n\n\n").unwrap();
        assert_eq!(formatted, "export enum A {\n  X = 'X',\n\n}\n");
    }

    #[test]
    fn test_ignores_delimiters_in_strings_and_comments() {
        let text = "// it's (fine\nconst a = '{';\n/* ] */ const b = \"(\";\n";
        assert!(format_source(text).is_ok());
    }

    #[test]
    fn test_ignores_delimiters_in_template_literals() {
        let text = "const document = `\nquery posts($filter: String = \"{\") {\n  posts\n`;\n";
        assert!(format_source(text).is_ok());
    }

    #[test]
    fn test_reports_unbalanced_delimiters() {
        assert!(matches!(
            format_source("export class A {\n"),
            Err(FormatError::Unbalanced { open: 1, close: 0 })
        ));
        assert!(matches!(
            format_source("}{"),
            Err(FormatError::Unbalanced { open: 0, close: 1 })
        ));
    }
}
