//! Parser for the scalar/list literal syntax found in string-encoded condition fields.
//!
//! Accepted forms: integers, floats (with optional exponent), quoted strings,
//! `True`/`False`/`None`, and lists or tuples of these. Tuples are returned as
//! [`Value::List`]; [`coerce_literal`](super::coerce_literal) keeps a top-level
//! tuple whole instead of narrowing it like a list.

use crate::value::Value;

/// Errors raised while parsing a literal
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    /// Input ended inside a literal
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start or continue a literal
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// Offending character
        found: char,
        /// Byte offset into the input
        offset: usize,
    },

    /// A numeric token that does not parse
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Extra characters after a complete literal
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}

/// Parse a complete literal, surrounding whitespace allowed.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        src: input,
        pos: 0,
    };
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(LiteralError::TrailingInput(parser.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::UnexpectedChar {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            Some('[') => self.sequence(']').map(|(items, _)| Value::List(items)),
            Some('(') => {
                let (mut items, trailing_comma) = self.sequence(')')?;
                // `(x)` is just a parenthesized scalar
                if items.len() == 1 && !trailing_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Value::List(items))
                }
            }
            Some('\'') | Some('"') => self.string().map(Value::Utf8),
            Some(c) if c == '+' || c == '-' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            _ => Err(self.unexpected()),
        }
    }

    /// Comma separated values up to `close`. Returns whether a trailing comma was present.
    fn sequence(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        self.bump();
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, trailing_comma));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    trailing_comma = true;
                }
                Some(c) if c == close => {
                    trailing_comma = false;
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(LiteralError::UnexpectedEnd),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut negative = false;
        while let Some(sign @ ('+' | '-')) = self.peek() {
            if sign == '-' {
                negative = !negative;
            }
            self.bump();
            self.skip_ws();
        }
        let digits_start = self.pos;
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if let Some('+' | '-') = self.peek() {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let token: String = self.src[digits_start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        if token.is_empty() || token == "." {
            return Err(LiteralError::InvalidNumber(self.src[start..self.pos].to_string()));
        }
        let invalid = || LiteralError::InvalidNumber(self.src[start..self.pos].to_string());
        if is_float {
            let v: f64 = token.parse().map_err(|_| invalid())?;
            Ok(Value::Float64(if negative { -v } else { v }))
        } else {
            // Integers too large for i64 degrade to float
            match token.parse::<i64>() {
                Ok(v) => Ok(Value::Int64(if negative { -v } else { v })),
                Err(_) => {
                    let v: f64 = token.parse().map_err(|_| invalid())?;
                    Ok(Value::Float64(if negative { -v } else { v }))
                }
            }
        }
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            _ => Err(LiteralError::UnexpectedChar {
                found: self.src[start..].chars().next().unwrap_or('?'),
                offset: start,
            }),
        }
    }
}
