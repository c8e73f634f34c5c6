// src/parser.rs
use crate::errors::RenderError;
use crate::value::Value;

#[derive(Debug)]
pub enum ParseError {
    InvalidSyntax(String),
}

impl From<String> for ParseError {
    fn from(msg: String) -> Self {
        ParseError::InvalidSyntax(msg)
    }
}

impl From<ParseError> for RenderError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::InvalidSyntax(msg) => RenderError::Parse(msg),
        }
    }
}

/// Character cursor over template source.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Skips `n` bytes; `n` must land on a char boundary.
    pub fn advance(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c == '-' || c.is_ascii_alphanumeric() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax(format!(
                "identifier expected at offset {start}"
            )));
        }
        Ok(self.s[start..self.i].to_string())
    }

    /// A dotted path such as `a.b.c`, `this` or `.`.
    pub fn parse_path(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c == '-' || c == '.' || c.is_ascii_alphanumeric() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax(format!(
                "path expected at offset {start}"
            )));
        }
        Ok(self.s[start..self.i].to_string())
    }

    pub fn parse_number_literal(&mut self) -> Result<Value, ParseError> {
        let start = self.i;
        if self.peek_char() == Some('-') {
            self.i += 1;
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.peek_char() == Some('.') {
            self.i += 1;
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    self.i += 1;
                } else {
                    break;
                }
            }
        }
        let s = &self.s[start..self.i];
        if s.is_empty() || s == "-" {
            return Err(ParseError::InvalidSyntax("number expected".into()));
        }
        if s.contains('.') {
            let f: f64 = s
                .parse()
                .map_err(|_| ParseError::InvalidSyntax(format!("bad float `{s}`")))?;
            Ok(Value::Float(f))
        } else {
            let i: i64 = s
                .parse()
                .map_err(|_| ParseError::InvalidSyntax(format!("bad int `{s}`")))?;
            Ok(Value::Int(i))
        }
    }

    pub fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        let quote = self
            .peek_char()
            .ok_or_else(|| ParseError::InvalidSyntax("string".into()))?;
        if quote != '\'' && quote != '"' {
            return Err(ParseError::InvalidSyntax("expected quoted string".into()));
        }
        self.i += 1;
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                if let Some(nc) = self.peek_char() {
                    self.i += nc.len_utf8();
                    match nc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '\\' => out.push('\\'),
                        '"' => out.push('"'),
                        '\'' => out.push('\''),
                        _ => {
                            out.push('\\');
                            out.push(nc);
                        }
                    }
                } else {
                    break;
                }
            } else {
                out.push(c);
            }
        }
        Err(ParseError::InvalidSyntax("unterminated string".into()))
    }

    /// Everything up to (not including) `end`; the cursor stops on `end`.
    pub fn capture_until(&mut self, end: &str) -> Result<&'a str, ParseError> {
        let start = self.i;
        match self.s[start..].find(end) {
            Some(off) => {
                self.i = start + off;
                Ok(&self.s[start..self.i])
            }
            None => Err(ParseError::InvalidSyntax(format!("expected '{end}'"))),
        }
    }

    /// Everything up to `end`, or the rest of the input when `end` never shows up.
    pub fn capture_until_or_eof(&mut self, end: &str) -> &'a str {
        let start = self.i;
        self.i = self.s[start..].find(end).map_or(self.s.len(), |off| start + off);
        &self.s[start..self.i]
    }

    pub fn expect(&mut self, lit: &str) -> Result<(), ParseError> {
        if self.consume_str(lit) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!(
                "expected '{lit}' at offset {}",
                self.i
            )))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn consume_str(&mut self, lit: &str) -> bool {
        if self.peek_str(lit) {
            self.i += lit.len();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    /// Character right after the next `n` bytes, if any.
    pub fn peek_char_at(&self, n: usize) -> Option<char> {
        self.s.get(self.i + n..).and_then(|rest| rest.chars().next())
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_and_strings() {
        assert_eq!(Parser::new("-12").parse_number_literal().unwrap(), Value::Int(-12));
        assert_eq!(Parser::new("1.25").parse_number_literal().unwrap(), Value::Float(1.25));
        assert!(Parser::new("-").parse_number_literal().is_err());
        assert_eq!(Parser::new(r#""a\"b""#).parse_quoted_string().unwrap(), "a\"b");
        assert!(Parser::new("'open").parse_quoted_string().is_err());
    }

    #[test]
    fn capture_stops_before_delimiter() {
        let mut p = Parser::new("abc}}rest");
        assert_eq!(p.capture_until("}}").unwrap(), "abc");
        assert!(p.consume_str("}}"));
        assert_eq!(p.capture_until_or_eof("{{"), "rest");
        assert!(p.eof());
    }

    #[test]
    fn paths_include_dots() {
        let mut p = Parser::new("a.b-c d");
        assert_eq!(p.parse_path().unwrap(), "a.b-c");
        assert_eq!(p.peek_char(), Some(' '));
    }
}
