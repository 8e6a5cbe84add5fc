//! Declaration extractor.
//!
//! Reads a Go-like source file and registers every top-level `type` statement
//! that declares exactly one record type. Everything else (package clause,
//! imports, functions, variables, non-record types, multi-spec `type (...)`
//! groups) is skipped after a bracket-balance check.

use crate::declarations::{
    DeclarationOrigin, DeclarationSet, FieldDeclaration, RawTag, TypeDeclaration, TypeRef,
};
use crate::error::{Error, Result};
use crate::lexer::{Spanned, Token, tokenize};
use crate::source::{Position, SourceMap};
use crate::tags::unescape;

/// Deepest type expression (`[][]*T`, nested `struct { ... }`) accepted.
pub const MAX_TYPE_DEPTH: usize = 64;

/// Parses `source` into the ordered set of record declarations it defines.
pub fn extract_declarations(source: &str) -> Result<DeclarationSet> {
    let map = SourceMap::new(source);
    let tokens = tokenize(&map)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        map: &map,
        depth: 0,
    };
    parser.parse_file()
}

struct TypeSpec {
    name: String,
    position: Position,
    type_ref: TypeRef,
}

struct Parser<'t, 's> {
    tokens: &'t [Spanned],
    pos: usize,
    map: &'t SourceMap<'s>,
    depth: usize,
}

impl<'t> Parser<'t, '_> {
    fn parse_file(&mut self) -> Result<DeclarationSet> {
        let mut set = DeclarationSet::new();
        loop {
            self.skip_terminators();
            match self.peek() {
                None => return Ok(set),
                Some(Token::Type) => self.parse_type_decl(&mut set)?,
                Some(token) if token.is_closer() => return Err(self.unexpected("declaration")),
                Some(_) => self.skip_statement()?,
            }
        }
    }

    fn parse_type_decl(&mut self, set: &mut DeclarationSet) -> Result<()> {
        self.pos += 1;

        if self.peek() != Some(&Token::LParen) {
            let spec = self.parse_type_spec()?;
            self.end_statement()?;
            register(set, spec);
            return Ok(());
        }

        self.pos += 1;
        let mut specs = Vec::new();
        loop {
            self.skip_terminators();
            match self.peek() {
                Some(Token::RParen) => {
                    self.pos += 1;
                    break;
                }
                None => return Err(self.unexpected("')' closing the type group")),
                _ => {}
            }
            specs.push(self.parse_type_spec()?);
            match self.peek() {
                Some(token) if token.is_terminator() => self.pos += 1,
                Some(Token::RParen) => {}
                _ => return Err(self.unexpected("newline, ';' or ')'")),
            }
        }
        self.end_statement()?;

        if specs.len() == 1
            && let Some(spec) = specs.pop()
        {
            register(set, spec);
        }
        Ok(())
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec> {
        let position = self.position();
        let name = self.expect_ident("type name")?;
        if self.peek() == Some(&Token::LBracket) && self.starts_type_parameters() {
            self.skip_group()?;
        }
        if self.peek() == Some(&Token::Assign) {
            self.pos += 1;
        }
        let type_ref = self.parse_type()?;
        Ok(TypeSpec {
            name,
            position,
            type_ref,
        })
    }

    /// `[T any]` after a type name, as opposed to `[N]T`.
    fn starts_type_parameters(&self) -> bool {
        matches!(self.peek_nth(1), Some(Token::Ident(_)))
            && !matches!(self.peek_nth(2), Some(Token::RBracket))
    }

    fn parse_type(&mut self) -> Result<TypeRef> {
        if self.depth >= MAX_TYPE_DEPTH {
            return Err(Error::syntax(
                self.position(),
                format!("type nested more than {MAX_TYPE_DEPTH} levels deep"),
            ));
        }
        self.depth += 1;
        let parsed = self.parse_type_expr();
        self.depth -= 1;
        parsed
    }

    fn parse_type_expr(&mut self) -> Result<TypeRef> {
        let position = self.position();
        let Some(token) = self.peek() else {
            return Err(self.unexpected("type"));
        };

        match token {
            Token::Ident(name) => {
                self.pos += 1;
                if self.peek() == Some(&Token::Dot) {
                    self.pos += 1;
                    let selector = self.expect_ident("type name after '.'")?;
                    self.skip_type_arguments()?;
                    return Ok(TypeRef::Unsupported(format!("{name}.{selector}")));
                }
                self.skip_type_arguments()?;
                Ok(TypeRef::from_ident(name))
            }
            Token::Star => {
                self.pos += 1;
                self.parse_type()
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_type()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::LBracket => {
                self.pos += 1;
                self.skip_array_length()?;
                let element = self.parse_type()?;
                Ok(TypeRef::Array(Box::new(element)))
            }
            Token::Map => {
                self.pos += 1;
                self.expect(Token::LBracket, "'[' after 'map'")?;
                let key = self.parse_type()?;
                self.expect(Token::RBracket, "']'")?;
                let value = self.parse_type()?;
                Ok(TypeRef::Unsupported(format!(
                    "map[{}]{}",
                    key.describe(),
                    value.describe()
                )))
            }
            Token::Chan => {
                self.pos += 1;
                while self.peek() == Some(&Token::Operator) {
                    self.pos += 1;
                }
                let element = self.parse_type()?;
                Ok(TypeRef::Unsupported(format!("chan {}", element.describe())))
            }
            Token::Operator => {
                // receive-only channel: `<-chan T`
                while self.peek() == Some(&Token::Operator) {
                    self.pos += 1;
                }
                if self.peek() != Some(&Token::Chan) {
                    return Err(Error::syntax(position, "expected type"));
                }
                self.parse_type()
            }
            Token::Func => {
                self.pos += 1;
                if self.peek() != Some(&Token::LParen) {
                    return Err(self.unexpected("'(' after 'func'"));
                }
                self.skip_group()?;
                match self.peek() {
                    Some(Token::LParen) => self.skip_group()?,
                    Some(token) if starts_type(token) => {
                        self.parse_type()?;
                    }
                    _ => {}
                }
                Ok(TypeRef::Unsupported("func".to_string()))
            }
            Token::Interface => {
                self.pos += 1;
                if self.peek() != Some(&Token::LBrace) {
                    return Err(self.unexpected("'{' after 'interface'"));
                }
                self.skip_group()?;
                Ok(TypeRef::Unsupported("interface{}".to_string()))
            }
            Token::Struct => {
                self.pos += 1;
                let fields = self.parse_struct_body()?;
                Ok(TypeRef::InlineRecord(TypeDeclaration {
                    name: String::new(),
                    fields,
                    position,
                    origin: DeclarationOrigin::Inline {
                        parent: String::new(),
                    },
                }))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    fn parse_struct_body(&mut self) -> Result<Vec<FieldDeclaration>> {
        self.expect(Token::LBrace, "'{' after 'struct'")?;
        let mut fields = Vec::new();
        loop {
            self.skip_terminators();
            match self.peek() {
                Some(Token::RBrace) => {
                    self.pos += 1;
                    return Ok(fields);
                }
                None => return Err(self.unexpected("'}' closing the struct")),
                _ => {}
            }
            fields.push(self.parse_field()?);
            match self.peek() {
                Some(token) if token.is_terminator() => self.pos += 1,
                Some(Token::RBrace) => {}
                _ => return Err(self.unexpected("newline, ';' or '}' after field")),
            }
        }
    }

    fn parse_field(&mut self) -> Result<FieldDeclaration> {
        let position = self.position();
        let (names, type_ref) = match (self.peek(), self.peek_nth(1)) {
            (Some(Token::Ident(first)), Some(Token::Comma)) => {
                let mut names = vec![first.clone()];
                self.pos += 1;
                while self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                    self.skip_newlines();
                    names.push(self.expect_ident("field name")?);
                }
                (names, self.parse_type()?)
            }
            // embedded field: `Base`, `pkg.Base`
            (Some(Token::Ident(_)), next) if ends_embedded_field(next) => {
                (Vec::new(), self.parse_type()?)
            }
            (Some(Token::Ident(first)), _) => {
                self.pos += 1;
                (vec![first.clone()], self.parse_type()?)
            }
            (Some(Token::Star), _) => (Vec::new(), self.parse_type()?),
            _ => return Err(self.unexpected("field name")),
        };

        let tag = match self.peek() {
            Some(Token::Str(literal)) | Some(Token::RawStr(literal)) => {
                let tag = RawTag {
                    text: strip_literal(literal),
                    position: self.position(),
                };
                self.pos += 1;
                Some(tag)
            }
            _ => None,
        };

        Ok(FieldDeclaration {
            names,
            type_ref,
            tag,
            position,
        })
    }

    fn skip_type_arguments(&mut self) -> Result<()> {
        if self.peek() == Some(&Token::LBracket) {
            self.skip_group()?;
        }
        Ok(())
    }

    /// Consumes everything up to and including the `]` of an array type.
    fn skip_array_length(&mut self) -> Result<()> {
        let mut depth = 0_usize;
        loop {
            match self.peek() {
                Some(Token::RBracket) if depth == 0 => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(Token::LBracket) | Some(Token::LParen) => depth += 1,
                Some(Token::RBracket) | Some(Token::RParen) if depth > 0 => depth -= 1,
                Some(Token::RParen) | Some(Token::LBrace) | Some(Token::RBrace) | None => {
                    return Err(self.unexpected("']'"));
                }
                Some(token) if token.is_terminator() => return Err(self.unexpected("']'")),
                Some(_) => {}
            }
            self.pos += 1;
        }
    }

    /// Skips a top-level statement this extractor does not register.
    fn skip_statement(&mut self) -> Result<()> {
        let mut open = Vec::new();
        while let Some(token) = self.peek() {
            if open.is_empty() && token.is_terminator() {
                self.pos += 1;
                return Ok(());
            }
            self.track_bracket(&mut open, token)?;
            self.pos += 1;
        }
        unclosed(&open)
    }

    /// Skips a bracketed group starting at the current opening token.
    fn skip_group(&mut self) -> Result<()> {
        let mut open = Vec::new();
        while let Some(token) = self.peek() {
            self.track_bracket(&mut open, token)?;
            self.pos += 1;
            if open.is_empty() {
                return Ok(());
            }
        }
        unclosed(&open)
    }

    fn track_bracket(&self, open: &mut Vec<(Token, Position)>, token: &Token) -> Result<()> {
        if let Some(closer) = token.closer() {
            open.push((closer, self.position()));
        } else if token.is_closer() {
            match open.pop() {
                Some((expected, _)) if &expected == token => {}
                _ => {
                    return Err(Error::syntax(
                        self.position(),
                        format!("unexpected {}", token.describe()),
                    ));
                }
            }
        }
        Ok(())
    }

    fn end_statement(&mut self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) if token.is_terminator() => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected("newline or ';'")),
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<()> {
        if self.peek() == Some(&token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name.clone())
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn skip_terminators(&mut self) {
        while matches!(self.peek(), Some(token) if token.is_terminator()) {
            self.pos += 1;
        }
    }

    fn skip_newlines(&mut self) {
        while self.peek() == Some(&Token::Newline) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + n).map(|spanned| &spanned.token)
    }

    fn position(&self) -> Position {
        self.tokens
            .get(self.pos)
            .map(|spanned| self.map.position(spanned.span.start))
            .unwrap_or_else(|| self.map.end())
    }

    fn unexpected(&self, expected: &str) -> Error {
        let found = self
            .peek()
            .map(Token::describe)
            .unwrap_or_else(|| "end of input".to_string());
        Error::syntax(self.position(), format!("expected {expected}, found {found}"))
    }
}

fn register(set: &mut DeclarationSet, spec: TypeSpec) {
    if let TypeRef::InlineRecord(mut declaration) = spec.type_ref {
        declaration.name = spec.name;
        declaration.position = spec.position;
        declaration.origin = DeclarationOrigin::TopLevel;
        set.insert(declaration);
    }
}

fn unclosed(open: &[(Token, Position)]) -> Result<()> {
    match open.last() {
        Some((closer, position)) => Err(Error::syntax(
            *position,
            format!("missing closing {}", closer.describe()),
        )),
        None => Ok(()),
    }
}

fn starts_type(token: &Token) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::Star
            | Token::LBracket
            | Token::Map
            | Token::Chan
            | Token::Func
            | Token::Struct
            | Token::Interface
    )
}

fn ends_embedded_field(next: Option<&Token>) -> bool {
    matches!(
        next,
        None | Some(Token::Newline)
            | Some(Token::Semicolon)
            | Some(Token::RBrace)
            | Some(Token::Dot)
            | Some(Token::Str(_))
            | Some(Token::RawStr(_))
    )
}

fn strip_literal(literal: &str) -> String {
    if let Some(raw) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return raw.to_string();
    }
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(literal);
    unescape(inner)
}
