//! Reference token lists as they arrive from datasets.
//!
//! Tabular sources store the list as a quoted literal such as
//! `['SELECT', 'count', '(', '*', ')']`; JSON sources carry a real array.
//! Both are resolved once into lower-cased tokens.

use logos::Logos;
use serde::{Deserialize, Serialize};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTokenField {
    Decoded(Vec<String>),
    Literal(String),
}

impl RawTokenField {
    /// Produces the lower-cased reference tokens.
    pub fn resolve(self) -> Result<Vec<String>, String> {
        let tokens = match self {
            RawTokenField::Decoded(tokens) => tokens,
            RawTokenField::Literal(text) => decode_token_list(&text)?,
        };
        Ok(tokens.into_iter().map(|token| token.to_lowercase()).collect())
    }
}

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
enum ListToken<'a> {
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(",")]
    Comma,
    #[regex(r#"'([^'\\]|\\.)*'"#, strip_quotes)]
    #[regex(r#""([^"\\]|\\.)*""#, strip_quotes)]
    Quoted(&'a str),
}

fn strip_quotes<'a>(lex: &mut logos::Lexer<'a, ListToken<'a>>) -> &'a str {
    let slice = lex.slice();
    &slice[1..slice.len() - 1]
}

/// Resolves the escape sequences of a Python string literal body.
///
/// Unknown escapes are rejected instead of kept verbatim.
fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.next() {
            Some(escaped @ ('\\' | '\'' | '"')) => escaped,
            Some('a') => '\x07',
            Some('b') => '\x08',
            Some('f') => '\x0c',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('v') => '\x0b',
            Some('x') => hex_escape(&mut chars, 2)?,
            Some('u') => hex_escape(&mut chars, 4)?,
            Some('U') => hex_escape(&mut chars, 8)?,
            Some(first @ '0'..='7') => {
                // up to three octal digits
                let mut code = first as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                char::from_u32(code).ok_or_else(|| format!("invalid octal escape {code:o}"))?
            }
            Some(other) => return Err(format!("unsupported escape \\{other} in {body:?}")),
            None => return Err(format!("dangling backslash in {body:?}")),
        };
        out.push(decoded);
    }
    Ok(out)
}

fn hex_escape(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Result<char, String> {
    let mut code = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| format!("hex escape needs {digits} digits"))?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or_else(|| format!("escape U+{code:X} is not a character"))
}

fn next_token<'a>(
    lexer: &mut logos::Lexer<'a, ListToken<'a>>,
) -> Result<Option<ListToken<'a>>, String> {
    match lexer.next() {
        Some(Ok(token)) => Ok(Some(token)),
        Some(Err(())) => Err(format!(
            "unexpected {:?} at offset {}",
            lexer.slice(),
            lexer.span().start
        )),
        None => Ok(None),
    }
}

/// Decodes a bracketed list of quoted strings, keeping the original case.
pub fn decode_token_list(input: &str) -> Result<Vec<String>, String> {
    let mut lexer = ListToken::lexer(input);

    match next_token(&mut lexer)? {
        Some(ListToken::LeftBracket) => {}
        other => return Err(format!("expected '[', found {:?}", other)),
    }

    let mut tokens = Vec::new();
    loop {
        match next_token(&mut lexer)? {
            Some(ListToken::Quoted(body)) => tokens.push(unescape(body)?),
            // empty list, or a trailing comma before the bracket
            Some(ListToken::RightBracket) => break,
            other => return Err(format!("expected quoted token, found {:?}", other)),
        }
        match next_token(&mut lexer)? {
            Some(ListToken::Comma) => {}
            Some(ListToken::RightBracket) => break,
            other => return Err(format!("expected ',' or ']', found {:?}", other)),
        }
    }

    match next_token(&mut lexer)? {
        None => Ok(tokens),
        Some(extra) => Err(format!("trailing input after list: {:?}", extra)),
    }
}
