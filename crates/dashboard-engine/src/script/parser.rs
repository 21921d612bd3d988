//! Recursive descent parser for formula expressions and scripts.

use super::ast::{AssignTarget, BinaryOp, Expr, Script, Stmt, UnaryOp};
use super::error::{ScriptError, ScriptResult};
use super::lexer::{Lexer, PositionedToken, Token};

/// Parser for formula expressions.
///
/// # Grammar
///
/// ```text
/// script     ::= statement (";" statement)* ";"?
/// statement  ::= assignment | ternary
/// assignment ::= ident ("." ident)* "=" ternary
/// ternary    ::= or ("?" ternary ":" ternary)?
/// or         ::= and ("||" and)*
/// and        ::= equality ("&&" equality)*
/// equality   ::= comparison (("==" | "!=") comparison)*
/// comparison ::= additive (("<" | "<=" | ">" | ">=") additive)*
/// additive   ::= multiplicative (("+" | "-") multiplicative)*
/// multiplicative ::= unary (("*" | "/" | "%") unary)*
/// unary      ::= ("-" | "!") unary | postfix
/// postfix    ::= primary ("." ident | "[" ternary "]")*
/// primary    ::= number | string | "true" | "false" | "null"
///              | ident | ident "(" args ")" | "(" ternary ")" | object
/// object     ::= "{" (key ":" ternary ("," key ":" ternary)* ","?)? "}"
/// ```
///
/// Precedence follows the grammar, lowest at the top. All binary
/// operators are left-associative; the ternary is right-associative.
pub struct Parser {
    tokens: Vec<PositionedToken>,
    position: usize,
}

impl Parser {
    /// Parses a single expression. Trailing tokens are an error.
    pub fn parse_expression(input: &str) -> ScriptResult<Expr> {
        let mut parser = Self::tokenize(input)?;
        let expr = parser.parse_ternary()?;
        parser.expect_end()?;
        Ok(expr)
    }

    /// Parses a script: semicolon-separated statements.
    pub fn parse_script(input: &str) -> ScriptResult<Script> {
        let mut parser = Self::tokenize(input)?;
        let mut statements = Vec::new();

        loop {
            while parser.check(&Token::Semicolon) {
                parser.advance();
            }
            if parser.at_end() {
                break;
            }
            statements.push(parser.parse_statement()?);
            if !parser.at_end() && !parser.check(&Token::Semicolon) {
                return parser.unexpected();
            }
        }

        Ok(Script { statements })
    }

    fn tokenize(input: &str) -> ScriptResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ScriptError::EmptyExpression);
        }

        let tokens = Lexer::new(trimmed).tokenize()?;
        if tokens.is_empty() {
            return Err(ScriptError::EmptyExpression);
        }

        Ok(Self {
            tokens,
            position: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|pt| &pt.token)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.position + offset).map(|pt| &pt.token)
    }

    fn advance(&mut self) -> Option<&PositionedToken> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consumes the expected token or fails.
    fn expect(&mut self, expected: &Token) -> ScriptResult<()> {
        if self.check(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected()
        }
    }

    fn expect_end(&self) -> ScriptResult<()> {
        match self.tokens.get(self.position) {
            None => Ok(()),
            Some(pt) => Err(ScriptError::UnexpectedToken {
                token: pt.token.to_string(),
                position: pt.position,
            }),
        }
    }

    fn unexpected<T>(&self) -> ScriptResult<T> {
        match self.tokens.get(self.position) {
            None => Err(ScriptError::UnexpectedEndOfInput),
            Some(pt) => Err(ScriptError::UnexpectedToken {
                token: pt.token.to_string(),
                position: pt.position,
            }),
        }
    }

    /// Parses one statement: an assignment if the lookahead matches
    /// `ident ("." ident)* "="`, otherwise a bare expression.
    fn parse_statement(&mut self) -> ScriptResult<Stmt> {
        if let Some(path_len) = self.assignment_lookahead() {
            let mut names = Vec::with_capacity(path_len);
            for _ in 0..path_len {
                match self.advance().map(|pt| pt.token.clone()) {
                    Some(Token::Ident(name)) => names.push(name),
                    _ => return Err(ScriptError::InvalidAssignment),
                }
                if self.check(&Token::Dot) {
                    self.advance();
                }
            }
            self.expect(&Token::Assign)?;

            let root = names.remove(0);
            let value = self.parse_ternary()?;
            return Ok(Stmt::Assign {
                target: AssignTarget { root, path: names },
                value,
            });
        }

        Ok(Stmt::Expr(self.parse_ternary()?))
    }

    /// Checks whether the tokens at the cursor form an assignment target.
    /// Returns the number of identifiers in the path if they do.
    fn assignment_lookahead(&self) -> Option<usize> {
        let mut offset = 0;
        let mut idents = 0;

        loop {
            match self.peek_at(offset) {
                Some(Token::Ident(_)) => {
                    idents += 1;
                    offset += 1;
                }
                _ => return None,
            }
            match self.peek_at(offset) {
                Some(Token::Dot) => offset += 1,
                Some(Token::Assign) => return Some(idents),
                _ => return None,
            }
        }
    }

    fn parse_ternary(&mut self) -> ScriptResult<Expr> {
        let condition = self.parse_or()?;

        if self.check(&Token::Question) {
            self.advance();
            let then = self.parse_ternary()?;
            self.expect(&Token::Colon)?;
            let otherwise = self.parse_ternary()?;
            return Ok(Expr::Ternary {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }

        Ok(condition)
    }

    fn parse_or(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_and()?;

        while self.check(&Token::OrOr) {
            self.advance();
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_equality()?;

        while self.check(&Token::AndAnd) {
            self.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_comparison()?;

        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ScriptResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ScriptResult<Expr> {
        let op = match self.peek() {
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Not) => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
            });
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ScriptResult<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(&Token::Dot) {
                self.advance();
                let name = match self.advance().map(|pt| pt.token.clone()) {
                    Some(Token::Ident(name)) => name,
                    _ => {
                        self.position = self.position.saturating_sub(1);
                        return self.unexpected();
                    }
                };
                expr = Expr::Property {
                    target: Box::new(expr),
                    name,
                };
            } else if self.check(&Token::OpenBracket) {
                self.advance();
                let index = self.parse_ternary()?;
                self.expect(&Token::CloseBracket)?;
                expr = Expr::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> ScriptResult<Expr> {
        let token = match self.advance() {
            Some(pt) => pt.token.clone(),
            None => return Err(ScriptError::UnexpectedEndOfInput),
        };

        match token {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::Str(s) => Ok(Expr::Str(s)),
            Token::True => Ok(Expr::Bool(true)),
            Token::False => Ok(Expr::Bool(false)),
            Token::Null => Ok(Expr::Null),

            Token::Ident(name) => {
                if self.check(&Token::OpenParen) {
                    self.advance();
                    let args = self.parse_arguments()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Var(name))
                }
            }

            Token::OpenParen => {
                let inner = self.parse_ternary()?;
                self.expect(&Token::CloseParen)?;
                Ok(inner)
            }

            Token::OpenBrace => self.parse_object(),

            _ => {
                self.position -= 1;
                self.unexpected()
            }
        }
    }

    /// Parses call arguments after the opening parenthesis.
    fn parse_arguments(&mut self) -> ScriptResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check(&Token::CloseParen) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_ternary()?);
            if self.check(&Token::Comma) {
                self.advance();
            } else {
                self.expect(&Token::CloseParen)?;
                return Ok(args);
            }
        }
    }

    /// Parses an object literal after the opening brace. Keys are bare
    /// identifiers or string literals; a trailing comma is allowed.
    fn parse_object(&mut self) -> ScriptResult<Expr> {
        let mut entries = Vec::new();

        loop {
            if self.check(&Token::CloseBrace) {
                self.advance();
                return Ok(Expr::Object(entries));
            }

            let key = match self.advance().map(|pt| pt.token.clone()) {
                Some(Token::Ident(name)) => name,
                Some(Token::Str(s)) => s,
                _ => {
                    self.position = self.position.saturating_sub(1);
                    return self.unexpected();
                }
            };
            self.expect(&Token::Colon)?;
            let value = self.parse_ternary()?;
            entries.push((key, value));

            if self.check(&Token::Comma) {
                self.advance();
            } else {
                self.expect(&Token::CloseBrace)?;
                return Ok(Expr::Object(entries));
            }
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(Parser::parse_expression("42").unwrap(), Expr::Number(42.0));
        assert_eq!(
            Parser::parse_expression("'hi'").unwrap(),
            Expr::Str("hi".to_string())
        );
        assert_eq!(Parser::parse_expression("null").unwrap(), Expr::Null);
    }

    #[test]
    fn test_parse_precedence() {
        // 1 + 2 * 3 groups as 1 + (2 * 3)
        let expr = Parser::parse_expression("1 + 2 * 3").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Add,
                Expr::Number(1.0),
                binary(BinaryOp::Mul, Expr::Number(2.0), Expr::Number(3.0)),
            )
        );
    }

    #[test]
    fn test_parse_parentheses_override_precedence() {
        let expr = Parser::parse_expression("(1 + 2) * 3").unwrap();
        assert_eq!(
            expr,
            binary(
                BinaryOp::Mul,
                binary(BinaryOp::Add, Expr::Number(1.0), Expr::Number(2.0)),
                Expr::Number(3.0),
            )
        );
    }

    #[test]
    fn test_parse_comparison_binds_tighter_than_logic() {
        let expr = Parser::parse_expression("a > 1 && b < 2").unwrap();
        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_ternary() {
        let expr = Parser::parse_expression("count > 5 ? 'red' : 'green'").unwrap();
        match expr {
            Expr::Ternary {
                then, otherwise, ..
            } => {
                assert_eq!(*then, Expr::Str("red".to_string()));
                assert_eq!(*otherwise, Expr::Str("green".to_string()));
            }
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_ternary_is_right_associative() {
        let expr = Parser::parse_expression("a ? 1 : b ? 2 : 3").unwrap();
        match expr {
            Expr::Ternary { otherwise, .. } => {
                assert!(matches!(*otherwise, Expr::Ternary { .. }));
            }
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_call() {
        let expr = Parser::parse_expression("date('+ 7 days')").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                name: "date".to_string(),
                args: vec![Expr::Str("+ 7 days".to_string())],
            }
        );
    }

    #[test]
    fn test_parse_call_no_arguments() {
        let expr = Parser::parse_expression("date()").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                name: "date".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_parse_property_chain() {
        let expr = Parser::parse_expression("item.user.login").unwrap();
        match expr {
            Expr::Property { target, name } => {
                assert_eq!(name, "login");
                assert!(matches!(*target, Expr::Property { .. }));
            }
            other => panic!("expected property access, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_index() {
        let expr = Parser::parse_expression("labels[0]").unwrap();
        match expr {
            Expr::Index { target, index } => {
                assert_eq!(*target, Expr::Var("labels".to_string()));
                assert_eq!(*index, Expr::Number(0.0));
            }
            other => panic!("expected index access, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_object_literal() {
        let expr = Parser::parse_expression("{ value: total, color: 'red' }").unwrap();
        match expr {
            Expr::Object(entries) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].0, "value");
                assert_eq!(entries[1].1, Expr::Str("red".to_string()));
            }
            other => panic!("expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_object() {
        assert_eq!(
            Parser::parse_expression("{}").unwrap(),
            Expr::Object(vec![])
        );
    }

    #[test]
    fn test_parse_script_statements() {
        let script = Parser::parse_script("userdata.count = 1; userdata.count + 1").unwrap();
        assert_eq!(script.statements.len(), 2);
        match &script.statements[0] {
            Stmt::Assign { target, .. } => {
                assert_eq!(target.root, "userdata");
                assert_eq!(target.path, vec!["count".to_string()]);
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_script_trailing_semicolon() {
        let script = Parser::parse_script("x = 1;").unwrap();
        assert_eq!(script.statements.len(), 1);
    }

    #[test]
    fn test_parse_equality_in_statement_is_not_assignment() {
        let script = Parser::parse_script("a == b").unwrap();
        assert!(matches!(
            script.statements[0],
            Stmt::Expr(Expr::Binary {
                op: BinaryOp::Eq,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_empty_expression() {
        assert_eq!(
            Parser::parse_expression("   ").unwrap_err(),
            ScriptError::EmptyExpression
        );
    }

    #[test]
    fn test_parse_trailing_tokens_rejected() {
        let err = Parser::parse_expression("1 2").unwrap_err();
        assert!(matches!(err, ScriptError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_parse_unclosed_parenthesis() {
        let err = Parser::parse_expression("(1 + 2").unwrap_err();
        assert_eq!(err, ScriptError::UnexpectedEndOfInput);
    }
}
