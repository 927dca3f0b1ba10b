//! Formula parser.
//!
//! A recursive descent parser for arithmetic formulas with the usual operator
//! precedence:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | CELL | '(' expr ')'
//! ```

use thiserror::Error;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::cell_ref::CellRef;

/// The expression text could not be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the expression text.
    pub position: usize,
}

impl ParseError {
    fn new(message: impl Into<String>, position: usize) -> ParseError {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// Parse an expression (without the leading `=`) into a syntax tree.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(input)?;
    let expr = parser.parse_expr()?;
    if parser.current != Token::Eof {
        return Err(ParseError::new(
            format!("Unexpected {}", parser.current.describe()),
            parser.token_start,
        ));
    }
    Ok(expr)
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Cell(CellRef),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Cell(cell) => format!("reference {}", cell),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Eof => "end of formula".to_string(),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    current: Token,
    token_start: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, ParseError> {
        let mut parser = Parser {
            input,
            pos: 0,
            current: Token::Eof,
            token_start: 0,
        };
        parser.advance()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance(&mut self) -> Result<(), ParseError> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current = self.scan_token()?;
        Ok(())
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek_byte().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek_byte().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn scan_token(&mut self) -> Result<Token, ParseError> {
        let Some(c) = self.peek_byte() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            b'+' => Some(Token::Plus),
            b'-' => Some(Token::Minus),
            b'*' => Some(Token::Star),
            b'/' => Some(Token::Slash),
            b'(' => Some(Token::LeftParen),
            b')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok(token);
        }

        if c.is_ascii_digit() || c == b'.' {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        if self.input[self.pos..].starts_with("#REF!") {
            self.pos += "#REF!".len();
            return Ok(Token::Cell(CellRef::INVALID));
        }

        let ch = self.input[self.pos..].chars().next().unwrap_or('?');
        Err(ParseError::new(
            format!("Unexpected character '{}'", ch),
            self.pos,
        ))
    }

    fn scan_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        self.take_while(|b| b.is_ascii_digit());
        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            self.take_while(|b| b.is_ascii_digit());
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.take_while(|b| b.is_ascii_digit()).is_empty() {
                // Not an exponent after all; let the next token report it.
                self.pos = mark;
            }
        }

        let text = &self.input[start..self.pos];
        match text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            Ok(_) => Err(ParseError::new(
                format!("Number out of range '{}'", text),
                start,
            )),
            Err(_) => Err(ParseError::new(format!("Invalid number '{}'", text), start)),
        }
    }

    fn scan_reference(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        self.take_while(|b| b.is_ascii_alphabetic());
        if self.take_while(|b| b.is_ascii_digit()).is_empty() {
            self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
            let name = &self.input[start..self.pos];
            return Err(ParseError::new(
                format!("Unknown identifier '{}'", name),
                start,
            ));
        }
        if self
            .peek_byte()
            .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        {
            return Err(ParseError::new("Malformed cell reference", start));
        }

        let name = &self.input[start..self.pos];
        // Row 0 is malformed; overflowing coordinates are just out of bounds.
        let digits = name.trim_start_matches(|c: char| c.is_ascii_alphabetic());
        if digits.trim_start_matches('0').is_empty() {
            return Err(ParseError::new(
                format!("Malformed cell reference '{}'", name),
                start,
            ));
        }
        Ok(Token::Cell(
            CellRef::parse_a1(name).unwrap_or(CellRef::INVALID),
        ))
    }

    // === Grammar ===

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.current {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current {
            Token::Plus => UnaryOp::Plus,
            Token::Minus => UnaryOp::Minus,
            _ => return self.parse_primary(),
        };
        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let expr = match self.current {
            Token::Number(n) => Expr::Number(n),
            Token::Cell(cell) => Expr::Ref(cell),
            Token::LeftParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                if self.current != Token::RightParen {
                    return Err(ParseError::new(
                        format!("Expected ')', found {}", self.current.describe()),
                        self.token_start,
                    ));
                }
                inner
            }
            ref other => {
                return Err(ParseError::new(
                    format!("Unexpected {}", other.describe()),
                    self.token_start,
                ));
            }
        };
        self.advance()?;
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(input: &str) -> String {
        parse_expression(input).unwrap().to_string()
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(canon("1 + 2 * 3"), "1+2*3");
        assert_eq!(canon("(1 + 2) * 3"), "(1+2)*3");
        assert_eq!(canon("((A1))"), "A1");
        assert_eq!(canon("1 - 2 - 3"), "1-2-3");
        assert_eq!(canon("1 - (2 - 3)"), "1-(2-3)");
        assert_eq!(canon("8 / (4 / 2)"), "8/(4/2)");
        assert_eq!(canon("-(b2 + 1)"), "-(B2+1)");
        assert_eq!(canon("--3"), "--3");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(canon("1.50"), "1.5");
        assert_eq!(canon(".5"), "0.5");
        assert_eq!(canon("2e3"), "2000");
        assert_eq!(canon("1E-1"), "0.1");
    }

    #[test]
    fn test_overflowing_literal_is_rejected() {
        let err = parse_expression("1 + 1e999").unwrap_err();
        assert_eq!(err.message, "Number out of range '1e999'");
        assert_eq!(err.position, 4);
        assert!(parse_expression("-1e400").is_err());

        // The largest finite literal survives a render/parse cycle.
        let max = canon("1.7976931348623157e308");
        assert!(!max.contains('#'), "{}", max);
        assert_eq!(canon(&max), max);
        assert_eq!(canon("1e-999"), "0");
    }

    #[test]
    fn test_evaluation_order() {
        let expr = parse_expression("2 + 3 * 4 - 10 / 5").unwrap();
        assert_eq!(expr.evaluate(&|_| Ok(0.0)), Ok(12.0));
        let expr = parse_expression("-(1 - 4) * +2").unwrap();
        assert_eq!(expr.evaluate(&|_| Ok(0.0)), Ok(6.0));
    }

    #[test]
    fn test_out_of_bounds_reference_parses() {
        assert_eq!(canon("XFE1+1"), "#REF!+1");
        assert_eq!(canon(&format!("{}1", "Z".repeat(40))), "#REF!");
        assert_eq!(canon("#REF!*2"), "#REF!*2");
    }

    #[test]
    fn test_syntax_errors() {
        for bad in ["", "   ", "1+", "(1", "1)", "1 2", "A", "SUM(A1)", "A0", "A1B", "1 $ 2", "*3"] {
            assert!(parse_expression(bad).is_err(), "expected error for {:?}", bad);
        }
        let err = parse_expression("1 + ?").unwrap_err();
        assert_eq!(err.position, 4);
        assert!(err.to_string().contains("position 4"));
    }
}
