//! Recursive-descent parser producing an [`Expr`] tree.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! sum      := product (('+' | '-') product)*
//! product  := power (('*' | '/' | '%') power)*
//! power    := sign unary          -- must not be followed by '^'
//!           | postfix ('^' power)?
//! unary    := sign unary | postfix
//! postfix  := NUMBER '!'?         -- '!' only after a bare digit run
//!           | '(' sum ')'
//!           | FUNC argument
//! argument := '(' sum ')'
//!           | NUMBER '!'?         -- '√' only
//! ```
//!
//! `^` is right associative and its left operand cannot carry a sign:
//! `-2^2` is rejected rather than guessed at, `(-2)^2` and `-(2^2)` are
//! fine, and the exponent may be signed (`2^-1`).
//!
//! Two touching `+` or two touching `-` are an error (`5--3`); mixed
//! signs (`5-+3`) and spaced ones (`5- -3`) are fine.

use super::CalcError;
use super::lexer::{Func, Spanned, Token};

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`, remainder with the sign of the dividend.
    Rem,
    /// `^`
    Pow,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal.
    Number(f64),
    /// Arithmetic negation.
    Neg(Box<Self>),
    /// A binary operation.
    Binary {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Self>,
        /// Right operand.
        rhs: Box<Self>,
    },
    /// A function applied to one argument.
    Call {
        /// Function.
        func: Func,
        /// Argument.
        arg: Box<Self>,
    },
    /// `n!` of an integer literal.
    Factorial(f64),
}

/// Parse a token stream into a single expression.
///
/// # Errors
///
/// Returns [`CalcError::Empty`] for no tokens, and the other
/// [`CalcError`] syntax variants for malformed input, including
/// trailing tokens.
pub fn parse(tokens: &[Spanned]) -> Result<Expr, CalcError> {
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }
    reject_doubled_signs(tokens)?;
    let mut parser = Parser { tokens, next: 0 };
    let expr = parser.sum()?;
    if let Some(extra) = parser.peek() {
        return Err(CalcError::UnexpectedToken {
            found: extra.token.to_string(),
            pos: extra.pos,
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    next: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Spanned> {
        self.tokens.get(self.next).copied()
    }

    fn peek_token(&self) -> Option<Token> {
        self.peek().map(|s| s.token)
    }

    fn bump(&mut self) -> Option<Spanned> {
        let tok = self.peek()?;
        self.next += 1;
        Some(tok)
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek_token() == Some(token) {
            self.next += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), CalcError> {
        match self.bump() {
            Some(s) if s.token == token => Ok(()),
            Some(s) => Err(unexpected(s)),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    /// Consume a leading `+`/`-`, returning whether it negates.
    fn sign(&mut self) -> Option<bool> {
        match self.peek_token()? {
            Token::Plus => {
                self.next += 1;
                Some(false)
            }
            Token::Minus => {
                self.next += 1;
                Some(true)
            }
            _ => None,
        }
    }

    fn sum(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.next += 1;
            let rhs = self.product()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn product(&mut self) -> Result<Expr, CalcError> {
        let mut lhs = self.power()?;
        loop {
            let op = match self.peek_token() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => return Ok(lhs),
            };
            self.next += 1;
            let rhs = self.power()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn power(&mut self) -> Result<Expr, CalcError> {
        if let Some(negate) = self.sign() {
            let operand = self.unary()?;
            if let Some(caret) = self.peek().filter(|s| s.token == Token::Caret) {
                return Err(CalcError::UnaryBeforePower { pos: caret.pos });
            }
            return Ok(signed(negate, operand));
        }

        let base = self.postfix()?;
        if self.eat(Token::Caret) {
            let exponent = self.power()?;
            return Ok(binary(BinOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        match self.sign() {
            Some(negate) => {
                let operand = self.unary()?;
                Ok(signed(negate, operand))
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr, CalcError> {
        let tok = self.bump().ok_or(CalcError::UnexpectedEnd)?;
        match tok.token {
            Token::Number { value, integer } => self.literal(value, integer, tok.pos),
            Token::LParen => {
                let inner = self.sum()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Func(func) => {
                let arg = self.argument(func)?;
                Ok(Expr::Call {
                    func,
                    arg: Box::new(arg),
                })
            }
            _ => Err(unexpected(tok)),
        }
    }

    fn argument(&mut self, func: Func) -> Result<Expr, CalcError> {
        let tok = self.bump().ok_or(CalcError::UnexpectedEnd)?;
        match tok.token {
            Token::LParen => {
                let inner = self.sum()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Number { value, integer } if func == Func::Sqrt => {
                self.literal(value, integer, tok.pos)
            }
            _ => Err(unexpected(tok)),
        }
    }

    fn literal(&mut self, value: f64, integer: bool, pos: usize) -> Result<Expr, CalcError> {
        if self.peek_token() != Some(Token::Bang) {
            return Ok(Expr::Number(value));
        }
        if !integer {
            return Err(CalcError::FactorialOperand { pos });
        }
        self.next += 1;
        Ok(Expr::Factorial(value))
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn signed(negate: bool, operand: Expr) -> Expr {
    if negate {
        Expr::Neg(Box::new(operand))
    } else {
        operand
    }
}

fn reject_doubled_signs(tokens: &[Spanned]) -> Result<(), CalcError> {
    for pair in tokens.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        let sign = match (first.token, second.token) {
            (Token::Plus, Token::Plus) => '+',
            (Token::Minus, Token::Minus) => '-',
            _ => continue,
        };
        if second.pos == first.pos + 1 {
            return Err(CalcError::DoubledSign {
                sign,
                pos: second.pos,
            });
        }
    }
    Ok(())
}

fn unexpected(tok: Spanned) -> CalcError {
    CalcError::UnexpectedToken {
        found: tok.token.to_string(),
        pos: tok.pos,
    }
}
