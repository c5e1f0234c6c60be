use logos::{Lexer, Logos};

/// Failure modes of the raw lexer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LexError {
    #[default]
    InvalidCharacter,
    UnterminatedString,
    UnterminatedBlockString,
}

/// Tokens produced by the SDL lexer.
///
/// Whitespace, commas and the byte order mark are insignificant. `#`
/// comments are kept as tokens so the lexer can attach them to whatever
/// follows. Keywords are contextual and lex as [`Token::Name`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n,\x{FEFF}]+")]
pub enum Token {
    // -- Punctuation --
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,

    #[token("@")]
    At,

    #[token("!")]
    Bang,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("$")]
    Dollar,

    #[token("...")]
    Spread,

    // -- Literals --
    /// An integer literal, e.g. `42` or `-7`.
    #[regex(r"-?(0|[1-9][0-9]*)")]
    IntValue,

    /// A float literal with a fraction, an exponent, or both.
    #[regex(r"-?(0|[1-9][0-9]*)(\.[0-9]+([eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)")]
    FloatValue,

    /// A double-quoted string, quotes included.
    #[token("\"", lex_string)]
    StringValue,

    /// A triple-quoted block string, quotes included.
    #[token("\"\"\"", lex_block_string)]
    BlockStringValue,

    /// A `#` comment up to the end of the line.
    #[regex(r"#[^\n\r]*")]
    Comment,

    /// A name; keywords are names too.
    #[regex(r"[_A-Za-z][_0-9A-Za-z]*")]
    Name,
}

fn lex_string(lex: &mut Lexer<Token>) -> Result<(), LexError> {
    let rest = lex.remainder();
    let mut escaped = false;
    for (i, c) in rest.char_indices() {
        match c {
            '\n' | '\r' => {
                lex.bump(i);
                return Err(LexError::UnterminatedString);
            }
            '"' if !escaped => {
                lex.bump(i + 1);
                return Ok(());
            }
            '\\' if !escaped => escaped = true,
            _ => escaped = false,
        }
    }
    lex.bump(rest.len());
    Err(LexError::UnterminatedString)
}

fn lex_block_string(lex: &mut Lexer<Token>) -> Result<(), LexError> {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        if rest[i..].starts_with(br#"\""""#) {
            i += 4;
        } else if rest[i..].starts_with(br#"""""#) {
            lex.bump(i + 3);
            return Ok(());
        } else {
            i += 1;
        }
    }
    lex.bump(rest.len());
    Err(LexError::UnterminatedBlockString)
}

impl Token {
    /// Returns a human-readable description of this token kind.
    pub fn description(&self) -> &'static str {
        match self {
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Colon => "':'",
            Self::Equals => "'='",
            Self::At => "'@'",
            Self::Bang => "'!'",
            Self::Amp => "'&'",
            Self::Pipe => "'|'",
            Self::Dollar => "'$'",
            Self::Spread => "'...'",
            Self::IntValue => "integer literal",
            Self::FloatValue => "float literal",
            Self::StringValue => "string literal",
            Self::BlockStringValue => "block string",
            Self::Comment => "comment",
            Self::Name => "name",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
