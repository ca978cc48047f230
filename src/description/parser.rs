//! Line-oriented parser for the description language
//!
//! Top-level declarations occupy one line each, except structs and unions
//! whose fields follow on subsequent lines until the closing `}` or `]`.
//! Blank lines become [`Node::NewLine`]; comments inside struct bodies and
//! trailing comments are dropped.

use super::ast::{
    Call, Comment, Description, Field, Flags, Include, Node, Resource, Struct, Type, TypeDef,
};
use crate::error::{DeclExtractError, Result};

/// Parse description text into nodes
pub fn parse(text: &str) -> Result<Description> {
    let mut parser = Parser::new(text);
    let mut nodes = Vec::new();
    while let Some(node) = parser.next_node()? {
        nodes.push(node);
    }
    Ok(Description { nodes })
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, line: 1 }
    }

    fn next_node(&mut self) -> Result<Option<Node>> {
        self.skip_spaces();
        let node = match self.peek() {
            None => return Ok(None),
            Some(b'\n') => {
                self.newline();
                Node::NewLine
            }
            Some(b'#') => {
                self.bump();
                let text = self.take_while(|c| c != b'\n').to_string();
                self.end_line()?;
                Node::Comment(Comment { text })
            }
            Some(_) => {
                let word = self.word()?;
                match word.as_str() {
                    "include" => self.include()?,
                    "resource" => self.resource()?,
                    "type" => self.type_def()?,
                    _ => self.named(word)?,
                }
            }
        };
        Ok(Some(node))
    }

    fn include(&mut self) -> Result<Node> {
        self.skip_spaces();
        self.expect(b'<')?;
        let file = self.take_while(|c| c != b'>' && c != b'\n').to_string();
        self.expect(b'>')?;
        self.end_line()?;
        Ok(Node::Include(Include { file }))
    }

    fn resource(&mut self) -> Result<Node> {
        self.skip_spaces();
        let name = self.word()?;
        self.expect(b'[')?;
        self.skip_spaces();
        let base = self.ty()?;
        self.skip_spaces();
        self.expect(b']')?;
        self.skip_spaces();
        let mut values = Vec::new();
        if self.peek() == Some(b':') {
            self.bump();
            values = self.value_list()?;
        }
        self.end_line()?;
        Ok(Node::Resource(Resource { name, base, values }))
    }

    fn type_def(&mut self) -> Result<Node> {
        self.skip_spaces();
        let name = self.word()?;
        let mut params = Vec::new();
        if self.peek() == Some(b'[') {
            self.bump();
            loop {
                self.skip_spaces();
                params.push(self.word()?);
                self.skip_spaces();
                match self.peek() {
                    Some(b',') => self.bump(),
                    Some(b']') => {
                        self.bump();
                        break;
                    }
                    _ => return Err(self.error("expected ',' or ']' in type parameters")),
                }
            }
        }
        self.skip_spaces();
        let ty = self.ty()?;
        self.end_line()?;
        Ok(Node::TypeDef(TypeDef { name, params, ty }))
    }

    /// Declarations that start with their own name: calls, flags, structs, unions
    fn named(&mut self, name: String) -> Result<Node> {
        if self.peek() == Some(b'(') {
            return self.call(name);
        }
        self.skip_spaces();
        match self.peek() {
            Some(b'=') => {
                self.bump();
                let values = self.value_list()?;
                self.end_line()?;
                Ok(Node::Flags(Flags { name, values }))
            }
            Some(b'{') => self.body(name, false),
            Some(b'[') => self.body(name, true),
            _ => Err(self.error(&format!("unexpected declaration after '{}'", name))),
        }
    }

    fn call(&mut self, name: String) -> Result<Node> {
        self.expect(b'(')?;
        let mut args = Vec::new();
        loop {
            self.skip_spaces();
            if self.peek() == Some(b')') {
                self.bump();
                break;
            }
            let arg = self.word()?;
            self.skip_spaces();
            let ty = self.ty()?;
            args.push(Field::new(arg, ty));
            self.skip_spaces();
            match self.peek() {
                Some(b',') => self.bump(),
                Some(b')') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error("expected ',' or ')' in argument list")),
            }
        }
        self.skip_spaces();
        let ret = if self.at_line_end() {
            None
        } else {
            Some(self.ty()?)
        };
        self.end_line()?;
        Ok(Node::Call(Call::new(name, args, ret)))
    }

    fn body(&mut self, name: String, is_union: bool) -> Result<Node> {
        let close = if is_union { b']' } else { b'}' };
        self.bump();
        self.end_line()?;
        let mut fields = Vec::new();
        loop {
            self.skip_spaces();
            match self.peek() {
                None => return Err(self.error(&format!("unterminated body of '{}'", name))),
                Some(b'\n') => self.newline(),
                Some(b'#') => {
                    self.take_while(|c| c != b'\n');
                    self.end_line()?;
                }
                Some(c) if c == close => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let field = self.word()?;
                    self.skip_spaces();
                    let ty = self.ty()?;
                    self.end_line()?;
                    fields.push(Field::new(field, ty));
                }
            }
        }
        let mut attrs = Vec::new();
        self.skip_spaces();
        if self.peek() == Some(b'[') {
            self.bump();
            loop {
                self.skip_spaces();
                attrs.push(self.ty()?);
                self.skip_spaces();
                match self.peek() {
                    Some(b',') => self.bump(),
                    Some(b']') => {
                        self.bump();
                        break;
                    }
                    _ => return Err(self.error("expected ',' or ']' in attributes")),
                }
            }
        }
        self.end_line()?;
        Ok(Node::Struct(Struct {
            name,
            fields,
            is_union,
            attrs,
        }))
    }

    fn ty(&mut self) -> Result<Type> {
        let mut ty = self.ty_no_colon()?;
        while self.peek() == Some(b':') {
            self.bump();
            ty.colon.push(self.ty_no_colon()?);
        }
        Ok(ty)
    }

    fn ty_no_colon(&mut self) -> Result<Type> {
        let value = self.atom()?;
        let mut args = Vec::new();
        if self.peek() == Some(b'[') {
            self.bump();
            loop {
                self.skip_spaces();
                if self.peek() == Some(b']') {
                    self.bump();
                    break;
                }
                args.push(self.ty()?);
                self.skip_spaces();
                match self.peek() {
                    Some(b',') => self.bump(),
                    Some(b']') => {
                        self.bump();
                        break;
                    }
                    _ => return Err(self.error("expected ',' or ']' in type arguments")),
                }
            }
        }
        Ok(Type {
            value,
            args,
            colon: Vec::new(),
        })
    }

    fn value_list(&mut self) -> Result<Vec<String>> {
        let mut values = Vec::new();
        loop {
            self.skip_spaces();
            values.push(self.atom()?);
            self.skip_spaces();
            if self.peek() != Some(b',') {
                return Ok(values);
            }
            self.bump();
        }
    }

    /// Identifier, number or quoted string
    fn atom(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ (b'"' | b'\'' | b'`')) => {
                let start = self.pos;
                self.bump();
                self.take_while(|c| c != q && c != b'\n');
                self.expect(q)?;
                Ok(self.src[start..self.pos].to_string())
            }
            Some(b'-') => {
                let start = self.pos;
                self.bump();
                self.word()?;
                Ok(self.src[start..self.pos].to_string())
            }
            _ => self.word(),
        }
    }

    fn word(&mut self) -> Result<String> {
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || c == b'_' || c == b'$');
        if word.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(word.to_string())
    }

    /// Consume an optional trailing comment and the line terminator
    fn end_line(&mut self) -> Result<()> {
        self.skip_spaces();
        if self.peek() == Some(b'#') {
            self.take_while(|c| c != b'\n');
        }
        match self.peek() {
            None => Ok(()),
            Some(b'\n') => {
                self.newline();
                Ok(())
            }
            Some(c) => Err(self.error(&format!("unexpected '{}'", c as char))),
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), None | Some(b'\n') | Some(b'#'))
    }

    fn expect(&mut self, want: u8) -> Result<()> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", want as char)))
        }
    }

    fn skip_spaces(&mut self) {
        self.take_while(|c| c == b' ' || c == b'\t' || c == b'\r');
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn newline(&mut self) {
        self.bump();
        self.line += 1;
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn error(&self, message: &str) -> DeclExtractError {
        DeclExtractError::Parse {
            line: self.line,
            message: message.to_string(),
            text: self.src.to_string(),
        }
    }
}
