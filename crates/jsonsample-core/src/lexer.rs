//! Tokens for the declaration subset.
//!
//! Horizontal whitespace and comments are skipped. Newlines are kept because
//! they terminate statements and field entries the same way `;` does.

use std::ops::Range;

use logos::Logos;

use crate::error::{Error, Result};
use crate::source::SourceMap;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    #[token("\n")]
    Newline,
    #[token(";")]
    Semicolon,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,
    #[token("=")]
    Assign,

    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("type")]
    Type,
    #[token("struct")]
    Struct,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("chan")]
    Chan,
    #[token("func")]
    Func,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9][0-9A-Za-z_]*(\.[0-9A-Za-z_]*)?")]
    Number,
    /// Interpreted string literal, quotes included.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    Str(String),
    /// Raw string literal, backticks included.
    #[regex(r"`[^`]*`", |lex| lex.slice().to_string())]
    RawStr(String),
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Rune,
    #[regex(r"[+\-/%&|^<>!:~?]")]
    Operator,
}

impl Token {
    /// Short human-readable form used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Newline => "newline".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Assign => "'='".to_string(),
            Token::Package => "keyword 'package'".to_string(),
            Token::Import => "keyword 'import'".to_string(),
            Token::Type => "keyword 'type'".to_string(),
            Token::Struct => "keyword 'struct'".to_string(),
            Token::Interface => "keyword 'interface'".to_string(),
            Token::Map => "keyword 'map'".to_string(),
            Token::Chan => "keyword 'chan'".to_string(),
            Token::Func => "keyword 'func'".to_string(),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Number => "number".to_string(),
            Token::Str(_) | Token::RawStr(_) => "string literal".to_string(),
            Token::Rune => "rune literal".to_string(),
            Token::Operator => "operator".to_string(),
        }
    }

    pub fn is_terminator(&self) -> bool {
        matches!(self, Token::Newline | Token::Semicolon)
    }

    /// Closing token matching an opening bracket.
    pub fn closer(&self) -> Option<Token> {
        match self {
            Token::LBrace => Some(Token::RBrace),
            Token::LBracket => Some(Token::RBracket),
            Token::LParen => Some(Token::RParen),
            _ => None,
        }
    }

    pub fn is_closer(&self) -> bool {
        matches!(self, Token::RBrace | Token::RBracket | Token::RParen)
    }
}

/// Token with its byte range in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

pub fn tokenize(map: &SourceMap<'_>) -> Result<Vec<Spanned>> {
    let mut lexer = Token::lexer(map.source());
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => {
                let slice = lexer.slice();
                let message = match slice.chars().next() {
                    Some('"') | Some('`') => "unterminated string literal".to_string(),
                    Some('\'') => "unterminated rune literal".to_string(),
                    Some('/') => "unterminated comment".to_string(),
                    Some(c) => format!("unexpected character {c:?}"),
                    None => "unexpected end of input".to_string(),
                };
                return Err(Error::syntax(map.position(span.start), message));
            }
        }
    }

    Ok(tokens)
}
