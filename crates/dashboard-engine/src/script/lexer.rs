//! Lexer (tokenizer) for formula expressions.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::error::{ScriptError, ScriptResult};

/// A token in a formula expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal.
    Number(f64),

    /// A string literal, with escape sequences resolved.
    Str(String),

    /// An identifier.
    Ident(String),

    /// The `true` keyword.
    True,

    /// The `false` keyword.
    False,

    /// The `null` keyword.
    Null,

    // ==================== Operators ====================
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Not,
    Assign,
    Question,
    Colon,
    Dot,
    Comma,
    Semicolon,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Str(s) => write!(f, "'{}'", s),
            Token::Ident(name) => write!(f, "{}", name),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::AndAnd => write!(f, "&&"),
            Token::OrOr => write!(f, "||"),
            Token::Not => write!(f, "!"),
            Token::Assign => write!(f, "="),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
            Token::Semicolon => write!(f, ";"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::OpenBracket => write!(f, "["),
            Token::CloseBracket => write!(f, "]"),
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Lexer for tokenizing formula expressions.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.peek() {
            if c.is_whitespace() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Reads an identifier or keyword.
    fn read_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(self.next_char().unwrap());
            } else {
                break;
            }
        }
        ident
    }

    /// Reads a numeric literal: digits with an optional fractional part.
    fn read_number(&mut self) -> f64 {
        let mut text = String::new();
        while let Some(&c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(self.next_char().unwrap());
            } else {
                break;
            }
        }
        if self.peek() == Some(&'.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
                text.push(self.next_char().unwrap());
                while let Some(&c) = self.peek() {
                    if c.is_ascii_digit() {
                        text.push(self.next_char().unwrap());
                    } else {
                        break;
                    }
                }
            }
        }
        // Digits only, so this cannot fail.
        text.parse().unwrap_or(f64::NAN)
    }

    /// Reads a quoted string (single or double quotes).
    ///
    /// A backslash escapes the character that follows it, whatever it is.
    /// This is what lets template authors write `\}` inside an expression
    /// span without closing the span.
    fn read_quoted_string(&mut self, quote_char: char) -> ScriptResult<String> {
        let start = self.position;
        self.next_char(); // consume the opening quote

        let mut result = String::new();
        loop {
            match self.next_char() {
                None => return Err(ScriptError::UnterminatedString { position: start }),
                Some(c) if c == quote_char => return Ok(result),
                Some('\\') => match self.next_char() {
                    None => return Err(ScriptError::UnterminatedString { position: start }),
                    Some('n') => result.push('\n'),
                    Some('t') => result.push('\t'),
                    Some('r') => result.push('\r'),
                    Some(escaped) => result.push(escaped),
                },
                Some(c) => result.push(c),
            }
        }
    }

    /// Returns the next token with its position, or None at end of input.
    fn next_token(&mut self) -> ScriptResult<Option<PositionedToken>> {
        self.skip_whitespace();

        let c = match self.peek() {
            Some(&c) => c,
            None => return Ok(None),
        };
        let token_start = self.position;

        let token = match c {
            '0'..='9' => Token::Number(self.read_number()),

            '\'' | '"' => Token::Str(self.read_quoted_string(c)?),

            _ if c.is_alphabetic() || c == '_' => {
                let ident = self.read_identifier();
                match ident.as_str() {
                    "true" => Token::True,
                    "false" => Token::False,
                    "null" => Token::Null,
                    _ => Token::Ident(ident),
                }
            }

            '+' => {
                self.next_char();
                Token::Plus
            }
            '-' => {
                self.next_char();
                Token::Minus
            }
            '*' => {
                self.next_char();
                Token::Star
            }
            '/' => {
                self.next_char();
                Token::Slash
            }
            '%' => {
                self.next_char();
                Token::Percent
            }
            '?' => {
                self.next_char();
                Token::Question
            }
            ':' => {
                self.next_char();
                Token::Colon
            }
            '.' => {
                self.next_char();
                Token::Dot
            }
            ',' => {
                self.next_char();
                Token::Comma
            }
            ';' => {
                self.next_char();
                Token::Semicolon
            }
            '(' => {
                self.next_char();
                Token::OpenParen
            }
            ')' => {
                self.next_char();
                Token::CloseParen
            }
            '[' => {
                self.next_char();
                Token::OpenBracket
            }
            ']' => {
                self.next_char();
                Token::CloseBracket
            }
            '{' => {
                self.next_char();
                Token::OpenBrace
            }
            '}' => {
                self.next_char();
                Token::CloseBrace
            }

            '=' => {
                self.next_char();
                if self.peek() == Some(&'=') {
                    self.next_char();
                    Token::EqEq
                } else {
                    Token::Assign
                }
            }
            '!' => {
                self.next_char();
                if self.peek() == Some(&'=') {
                    self.next_char();
                    Token::NotEq
                } else {
                    Token::Not
                }
            }
            '<' => {
                self.next_char();
                if self.peek() == Some(&'=') {
                    self.next_char();
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            '>' => {
                self.next_char();
                if self.peek() == Some(&'=') {
                    self.next_char();
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            '&' => {
                self.next_char();
                if self.peek() == Some(&'&') {
                    self.next_char();
                    Token::AndAnd
                } else {
                    return Err(ScriptError::UnexpectedCharacter {
                        character: '&',
                        position: token_start,
                    });
                }
            }
            '|' => {
                self.next_char();
                if self.peek() == Some(&'|') {
                    self.next_char();
                    Token::OrOr
                } else {
                    return Err(ScriptError::UnexpectedCharacter {
                        character: '|',
                        position: token_start,
                    });
                }
            }

            _ => {
                return Err(ScriptError::UnexpectedCharacter {
                    character: c,
                    position: token_start,
                });
            }
        };

        Ok(Some(PositionedToken {
            token,
            position: token_start,
        }))
    }

    /// Collects all tokens into a vector.
    pub fn tokenize(mut self) -> ScriptResult<Vec<PositionedToken>> {
        let mut tokens = Vec::new();
        while let Some(positioned) = self.next_token()? {
            tokens.push(positioned);
        }
        Ok(tokens)
    }
}
