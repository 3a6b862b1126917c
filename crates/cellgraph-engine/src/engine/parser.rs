//! Formula parser
//!
//! A recursive descent parser over the arithmetic formula grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | REFERENCE | '(' expr ')'
//! ```
//!
//! Input is the formula text without its leading `=`.
//!
//! Parenthesis and unary nesting is capped at [`MAX_NESTING`] and the depth
//! of the resulting tree at [`MAX_DEPTH`], which bounds the recursion of
//! parsing, evaluating, printing and dropping a formula.

use thiserror::Error;

use super::ast::{BinaryOperator, Expr, UnaryOperator};
use super::position::Position;

/// Formula text could not be turned into an expression tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("formula parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Deepest parenthesis/unary nesting a formula may have.
pub const MAX_NESTING: usize = 256;
/// Deepest expression tree a formula may have.
pub const MAX_DEPTH: usize = 1024;

/// Parse formula text (without the leading `=`) into an expression tree.
pub fn parse_expression(text: &str) -> ParseResult<Expr> {
    let mut parser = FormulaParser::new(text)?;
    let (expr, _) = parser.parse_expr()?;

    // Make sure we consumed all input
    if parser.current != Token::Eof {
        return Err(ParseError::new(
            format!(
                "unexpected input after expression: '{}'",
                &parser.input[parser.token_start..]
            ),
            parser.token_start,
        ));
    }

    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Reference(Position),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    current: Token,
    nesting: usize,
}

/// Expression tree plus its depth.
type Node = (Expr, usize);

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> ParseResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            token_start: 0,
            current: Token::Eof,
            nesting: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Grammar ===

    fn parse_expr(&mut self) -> ParseResult<Node> {
        let (mut left, mut depth) = self.parse_term()?;
        loop {
            let op = match self.current {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => return Ok((left, depth)),
            };
            let op_start = self.token_start;
            self.advance_token()?;
            let (right, right_depth) = self.parse_term()?;
            depth = deeper(depth.max(right_depth), op_start)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let (mut left, mut depth) = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => return Ok((left, depth)),
            };
            let op_start = self.token_start;
            self.advance_token()?;
            let (right, right_depth) = self.parse_unary()?;
            depth = deeper(depth.max(right_depth), op_start)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match self.current {
            Token::Plus => UnaryOperator::Plus,
            Token::Minus => UnaryOperator::Negate,
            _ => return self.parse_primary(),
        };
        let op_start = self.token_start;
        self.enter()?;
        self.advance_token()?;
        let (operand, depth) = self.parse_unary()?;
        self.nesting -= 1;
        Ok((
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            deeper(depth, op_start)?,
        ))
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let node = match self.current {
            Token::Number(n) => (Expr::Number(n), 1),
            Token::Reference(pos) => (Expr::Reference(pos), 1),
            Token::LeftParen => {
                self.enter()?;
                self.advance_token()?;
                let inner = self.parse_expr()?;
                if self.current != Token::RightParen {
                    return Err(ParseError::new("expected ')'", self.token_start));
                }
                self.nesting -= 1;
                inner
            }
            Token::Eof => {
                return Err(ParseError::new("unexpected end of formula", self.token_start));
            }
            _ => {
                return Err(ParseError::new(
                    format!("unexpected token {:?}", self.current),
                    self.token_start,
                ));
            }
        };
        self.advance_token()?;
        Ok(node)
    }

    /// Step into a parenthesised group or unary operand.
    fn enter(&mut self) -> ParseResult<()> {
        if self.nesting >= MAX_NESTING {
            return Err(ParseError::new("formula nested too deeply", self.token_start));
        }
        self.nesting += 1;
        Ok(())
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> ParseResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> ParseResult<Token> {
        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()))
        {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        Err(ParseError::new(
            format!("unexpected character '{}'", c),
            self.pos,
        ))
    }

    fn scan_number(&mut self) -> ParseResult<Token> {
        let start = self.pos;
        self.skip_digits();

        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return Err(ParseError::new("malformed exponent", start));
            }
            self.skip_digits();
        }

        let literal = &self.input[start..self.pos];
        match literal.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            Ok(_) => Err(ParseError::new(
                format!("number out of range: {}", literal),
                start,
            )),
            Err(_) => Err(ParseError::new(
                format!("malformed number: {}", literal),
                start,
            )),
        }
    }

    fn scan_reference(&mut self) -> ParseResult<Token> {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        self.skip_digits();

        let text = &self.input[start..self.pos];
        Position::from_a1(text)
            .map(Token::Reference)
            .ok_or_else(|| ParseError::new(format!("invalid cell reference: {}", text), start))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }
}

/// Depth of a node one level above a child of depth `depth`.
fn deeper(depth: usize, offset: usize) -> ParseResult<usize> {
    if depth >= MAX_DEPTH {
        return Err(ParseError::new("formula nested too deeply", offset));
    }
    Ok(depth + 1)
}
