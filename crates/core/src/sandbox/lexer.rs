use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal")]
    InvalidNumber,

    #[error("invalid character {0:?}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Str(String),
    Int(i64),
    Float(f64),
    True,
    False,
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Assign,
}

/// Tokenize one source line. A `#` outside a string literal starts a comment
/// that runs to the end of the line.
pub fn lex_line(line: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '#' => break,
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(lex_string(&mut chars, c)?));
            }
            '0'..='9' => tokens.push(lex_number(&mut chars)?),
            'a'..='z' | 'A'..='Z' | '_' => tokens.push(lex_ident(&mut chars)),
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '=' => {
                chars.next();
                tokens.push(Token::Assign);
            }
            other => return Err(LexError::InvalidChar(other)),
        }
    }

    Ok(tokens)
}

fn lex_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, LexError> {
    let mut text = String::new();
    loop {
        match chars.next() {
            None => return Err(LexError::UnterminatedString),
            Some(c) if c == quote => return Ok(text),
            Some('\\') => match chars.next() {
                None => return Err(LexError::UnterminatedString),
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('\\') => text.push('\\'),
                Some('\'') => text.push('\''),
                Some('"') => text.push('"'),
                // Unknown escapes keep the backslash, as Python does.
                Some(other) => {
                    text.push('\\');
                    text.push(other);
                }
            },
            Some(c) => text.push(c),
        }
    }
}

fn lex_number(chars: &mut Peekable<Chars<'_>>) -> Result<Token, LexError> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }

    let mut is_float = false;
    if chars.peek() == Some(&'.') {
        is_float = true;
        digits.push('.');
        chars.next();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
    }

    // "42abc" is not a valid literal.
    if let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            return Err(LexError::InvalidNumber);
        }
    }

    if is_float {
        digits
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| LexError::InvalidNumber)
    } else {
        digits
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| LexError::InvalidNumber)
    }
}

fn lex_ident(chars: &mut Peekable<Chars<'_>>) -> Token {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    match name.as_str() {
        "True" => Token::True,
        "False" => Token::False,
        _ => Token::Ident(name),
    }
}
