// src/template.rs
use crate::errors::Result;
use crate::parser::{ParseError, Parser};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    /// `{{call}}` (escaped) or `{{{call}}}`.
    Mustache { call: Call, escape: bool },
    /// `{{#call}}body{{else}}inverse{{/name}}`
    Block {
        call: Call,
        body: Vec<Node>,
        inverse: Option<Vec<Node>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub head: Param,
    pub params: Vec<Param>,
    pub hash: Vec<(String, Param)>,
}

impl Call {
    /// Helper name when the head is a bare identifier.
    pub fn helper_name(&self) -> Option<&str> {
        match &self.head {
            Param::Path(segs) if segs.len() == 1 => Some(&segs[0]),
            _ => None,
        }
    }

    pub fn hash_param(&self, key: &str) -> Option<&Param> {
        self.hash.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param {
    /// Field path from the current context; empty means the context itself.
    Path(Vec<String>),
    /// `@name`, read from the innermost iteration frame.
    Data(String),
    Literal(Value),
}

/// A parsed template, renderable any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Template> {
        let nodes = TParser::new(src).parse_all()?;
        Ok(Template { nodes })
    }
}

struct Open {
    call: Call,
    name: String,
    body: Vec<Node>,
    inverse: Option<Vec<Node>>,
}

impl Open {
    fn push(&mut self, node: Node) {
        match &mut self.inverse {
            Some(inv) => inv.push(node),
            None => self.body.push(node),
        }
    }
}

struct TParser<'a> {
    parser: Parser<'a>,
    root: Vec<Node>,
    stack: Vec<Open>,
}

impl<'a> TParser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            parser: Parser::new(s),
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(open) => open.push(node),
            None => self.root.push(node),
        }
    }

    fn parse_all(mut self) -> std::result::Result<Vec<Node>, ParseError> {
        while !self.parser.eof() {
            let text = self.parser.capture_until_or_eof("{{");
            if !text.is_empty() {
                self.push(Node::Text(text.to_string()));
            }
            if self.parser.eof() {
                break;
            }
            self.parse_tag()?;
        }
        if let Some(open) = self.stack.last() {
            return Err(ParseError::InvalidSyntax(format!(
                "unclosed block `{}`",
                open.name
            )));
        }
        Ok(self.root)
    }

    fn parse_tag(&mut self) -> std::result::Result<(), ParseError> {
        if self.parser.consume_str("{{{") {
            let call = self.parse_call()?;
            self.parser.skip_ws();
            self.parser.expect("}}}")?;
            self.push(Node::Mustache { call, escape: false });
            return Ok(());
        }

        self.parser.expect("{{")?;
        self.parser.skip_ws();

        if self.parser.consume_str("!--") {
            self.parser.capture_until("--}}")?;
            return self.parser.expect("--}}");
        }
        if self.parser.consume_char('!') {
            self.parser.capture_until("}}")?;
            return self.parser.expect("}}");
        }

        if self.parser.consume_char('#') {
            let call = self.parse_call()?;
            self.close_tag()?;
            let name = call
                .helper_name()
                .map(str::to_string)
                .ok_or_else(|| ParseError::InvalidSyntax("block helper name expected".into()))?;
            self.stack.push(Open {
                call,
                name,
                body: Vec::new(),
                inverse: None,
            });
            return Ok(());
        }

        if self.parser.consume_char('/') {
            self.parser.skip_ws();
            let name = self.parser.parse_identifier()?;
            self.close_tag()?;
            let open = self.stack.pop().ok_or_else(|| {
                ParseError::InvalidSyntax(format!("`{{{{/{name}}}}}` without an open block"))
            })?;
            if open.name != name {
                return Err(ParseError::InvalidSyntax(format!(
                    "`{}` closed by `{name}`",
                    open.name
                )));
            }
            self.push(Node::Block {
                call: open.call,
                body: open.body,
                inverse: open.inverse,
            });
            return Ok(());
        }

        if self.at_else() {
            self.parser.consume_str("else");
            self.close_tag()?;
            let open = self
                .stack
                .last_mut()
                .ok_or_else(|| ParseError::InvalidSyntax("`else` outside a block".into()))?;
            if open.inverse.is_some() {
                return Err(ParseError::InvalidSyntax(format!(
                    "duplicate `else` in `{}`",
                    open.name
                )));
            }
            open.inverse = Some(Vec::new());
            return Ok(());
        }

        let call = self.parse_call()?;
        self.close_tag()?;
        self.push(Node::Mustache { call, escape: true });
        Ok(())
    }

    fn at_else(&self) -> bool {
        self.parser.peek_str("else")
            && self
                .parser
                .peek_char_at(4)
                .map_or(true, |c| c.is_whitespace() || c == '}')
    }

    fn close_tag(&mut self) -> std::result::Result<(), ParseError> {
        self.parser.skip_ws();
        self.parser.expect("}}")
    }

    fn parse_call(&mut self) -> std::result::Result<Call, ParseError> {
        self.parser.skip_ws();
        let head = self.parse_param()?;
        let mut params = Vec::new();
        let mut hash = Vec::new();
        loop {
            self.parser.skip_ws();
            if self.parser.eof() || self.parser.peek_str("}}") {
                break;
            }
            if let Some(key) = self.try_hash_key() {
                let value = self.parse_param()?;
                hash.push((key, value));
            } else {
                params.push(self.parse_param()?);
            }
        }
        Ok(Call { head, params, hash })
    }

    /// Consumes `key=` when the next token is a hash pair.
    fn try_hash_key(&mut self) -> Option<String> {
        let c = self.parser.peek_char()?;
        if !(c == '_' || c.is_ascii_alphabetic()) {
            return None;
        }
        let mut lookahead = Parser::new(self.parser.rest());
        let key = lookahead.parse_identifier().ok()?;
        if !lookahead.consume_char('=') {
            return None;
        }
        self.parser.advance(lookahead.pos());
        Some(key)
    }

    fn parse_param(&mut self) -> std::result::Result<Param, ParseError> {
        self.parser.skip_ws();
        match self.parser.peek_char() {
            Some('"') | Some('\'') => Ok(Param::Literal(Value::Str(
                self.parser.parse_quoted_string()?,
            ))),
            Some(c) if c == '-' || c.is_ascii_digit() => {
                Ok(Param::Literal(self.parser.parse_number_literal()?))
            }
            Some('@') => {
                self.parser.consume_char('@');
                Ok(Param::Data(self.parser.parse_identifier()?))
            }
            Some(_) => {
                let raw = self.parser.parse_path()?;
                Ok(match raw.as_str() {
                    "true" => Param::Literal(Value::Bool(true)),
                    "false" => Param::Literal(Value::Bool(false)),
                    "null" | "undefined" => Param::Literal(Value::Null),
                    _ => Param::Path(split_path(&raw)),
                })
            }
            None => Err(ParseError::InvalidSyntax("unexpected end of tag".into())),
        }
    }
}

fn split_path(raw: &str) -> Vec<String> {
    raw.split('.')
        .filter(|seg| !seg.is_empty() && *seg != "this")
        .map(str::to_string)
        .collect()
}
