//! String literal decoding.

use std::str::Chars;

use crate::error::{SdlError, Span};

/// Decodes the body of a `"…"` string (quotes already stripped).
pub(crate) fn unescape(raw: &str, span: Span) -> Result<String, SdlError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{8}',
            Some('f') => '\u{c}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                let lookahead: String = chars.clone().take(4).collect();
                unicode_escape(&mut chars).ok_or_else(|| SdlError::InvalidEscape {
                    sequence: format!("\\u{lookahead}"),
                    span,
                })?
            }
            Some(other) => {
                return Err(SdlError::InvalidEscape {
                    sequence: format!("\\{other}"),
                    span,
                })
            }
            None => {
                return Err(SdlError::InvalidEscape {
                    sequence: "\\".to_string(),
                    span,
                })
            }
        };
        out.push(decoded);
    }

    Ok(out)
}

/// Reads the part of a `\u` escape after the `u`: either `XXXX` (joining a
/// surrogate pair when one follows) or `{X…}`.
fn unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
    if chars.clone().next() == Some('{') {
        chars.next();
        let mut hex = String::new();
        loop {
            match chars.next()? {
                '}' => break,
                c if c.is_ascii_hexdigit() => hex.push(c),
                _ => return None,
            }
        }
        return u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32);
    }

    let high = hex4(chars)?;
    if !(0xD800..0xDC00).contains(&high) {
        return char::from_u32(high);
    }

    let mut pair = chars.clone();
    if pair.next() != Some('\\') || pair.next() != Some('u') {
        return None;
    }
    let low = hex4(&mut pair)?;
    if !(0xDC00..0xE000).contains(&low) {
        return None;
    }
    *chars = pair;
    char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
}

fn hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(&digits, 16).ok()
}

/// Computes the value of a `"""…"""` block string (quotes already stripped):
/// un-escapes `\"""`, removes the common indentation of every line after the
/// first, and drops leading and trailing blank lines.
pub(crate) fn block_string_value(raw: &str) -> String {
    let raw = raw
        .replace(r#"\""""#, r#"""""#)
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let lines: Vec<&str> = raw.split('\n').collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = leading_whitespace(line);
            (indent < line.len()).then_some(indent)
        })
        .min();

    let mut dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| match common_indent {
            Some(indent) if i > 0 => line.get(indent..).unwrap_or(""),
            _ => line,
        })
        .collect();

    while dedented.first().is_some_and(|l| is_blank(l)) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(|l| is_blank(l)) {
        dedented.pop();
    }

    dedented.join("\n")
}

fn leading_whitespace(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn is_blank(line: &str) -> bool {
    leading_whitespace(line) == line.len()
}
