use logos::Logos;

use crate::error::{SdlError, Span};
use crate::token::{LexError, Token};

/// A token paired with its source span and the comments directly above it.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
    /// `#` comment lines immediately preceding this token, without the `#`.
    pub comments: Vec<String>,
}

/// Tokenizes SDL source text into a sequence of spanned tokens.
///
/// A run of `#` comments is attached to the next token unless a blank line
/// separates them. A comment sharing a line with the token before it is
/// dropped. Lex errors are collected; if any are found the entire
/// result is an error.
///
/// # Errors
///
/// Returns every invalid character and unterminated string found.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, Vec<SdlError>> {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut comments: Vec<String> = Vec::new();
    let mut last_comment_end = 0;
    let mut last_token_end: Option<usize> = None;

    let lexer = Token::lexer(source);
    for (result, range) in lexer.spanned() {
        let span = Span::new(range.start, range.end);
        match result {
            Ok(Token::Comment) => {
                let trailing = last_token_end
                    .is_some_and(|end| !source[end..range.start].contains('\n'));
                if trailing {
                    continue;
                }
                if !comments.is_empty() && has_blank_line(&source[last_comment_end..range.start]) {
                    comments.clear();
                }
                comments.push(comment_text(&source[range.clone()]));
                last_comment_end = range.end;
            }
            Ok(token) => {
                if !comments.is_empty() && has_blank_line(&source[last_comment_end..range.start]) {
                    comments.clear();
                }
                last_token_end = Some(range.end);
                tokens.push(SpannedToken {
                    token,
                    span,
                    text: source[range].to_string(),
                    comments: std::mem::take(&mut comments),
                });
            }
            Err(LexError::InvalidCharacter) => errors.push(SdlError::InvalidToken { span }),
            Err(LexError::UnterminatedString) => {
                errors.push(SdlError::UnterminatedString { span })
            }
            Err(LexError::UnterminatedBlockString) => {
                errors.push(SdlError::UnterminatedBlockString { span })
            }
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

fn comment_text(raw: &str) -> String {
    let body = raw.strip_prefix('#').unwrap_or(raw);
    let body = body.strip_prefix(' ').unwrap_or(body);
    body.trim_end().to_string()
}

// The gap between tokens holds only insignificant characters.
fn has_blank_line(gap: &str) -> bool {
    gap.matches('\n').count() > 1
}
