use thiserror::Error;

use super::lexer::{LexError, Token, lex_line};

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("invalid syntax")]
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { name: String, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Name(String),
    Call { name: String, args: Vec<Expr> },
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parse a whole source text into statements, one per non-blank line.
///
/// The entire text is parsed before anything runs, so a syntax error on any
/// line fails the run without producing partial output.
///
/// # Errors
///
/// Returns `SyntaxError` on the first lexing or parsing failure.
pub fn parse(source: &str) -> Result<Vec<Stmt>, SyntaxError> {
    let mut stmts = Vec::new();
    for line in source.lines() {
        let tokens = lex_line(line)?;
        if tokens.is_empty() {
            continue;
        }
        stmts.push(Parser::new(tokens).parse_stmt()?);
    }
    Ok(stmts)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), SyntaxError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(SyntaxError::Invalid)
        }
    }

    fn parse_stmt(mut self) -> Result<Stmt, SyntaxError> {
        let stmt = if let (Some(Token::Ident(name)), Some(Token::Assign)) =
            (self.tokens.first(), self.tokens.get(1))
        {
            let name = name.clone();
            self.pos = 2;
            let value = self.parse_expr()?;
            Stmt::Assign { name, value }
        } else {
            Stmt::Expr(self.parse_expr()?)
        };

        // Trailing tokens after a complete statement are a syntax error.
        if self.pos != self.tokens.len() {
            return Err(SyntaxError::Invalid);
        }
        Ok(stmt)
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, SyntaxError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            let operand = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.next() {
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Int(i)) => Ok(Expr::Int(i)),
            Some(Token::Float(f)) => Ok(Expr::Float(f)),
            Some(Token::True) => Ok(Expr::Bool(true)),
            Some(Token::False) => Ok(Expr::Bool(false)),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.parse_args()?;
                    Ok(Expr::Call { name, args })
                } else {
                    Ok(Expr::Name(name))
                }
            }
            Some(Token::LParen) => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            _ => Err(SyntaxError::Invalid),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.next() {
                Some(Token::Comma) => {}
                Some(Token::RParen) => return Ok(args),
                _ => return Err(SyntaxError::Invalid),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_print_with_arguments() {
        let stmts = parse("print('hi', 2 + 2)").unwrap();
        assert_eq!(stmts.len(), 1);
        let Stmt::Expr(Expr::Call { name, args }) = &stmts[0] else {
            panic!("expected a call statement");
        };
        assert_eq!(name, "print");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn parses_empty_call() {
        let stmts = parse("print()").unwrap();
        assert_eq!(
            stmts[0],
            Stmt::Expr(Expr::Call {
                name: "print".into(),
                args: Vec::new(),
            })
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let stmts = parse("\n# setup\nprint(1)\n\n").unwrap();
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn parses_assignment() {
        let stmts = parse("x = 1 + 2").unwrap();
        assert!(matches!(&stmts[0], Stmt::Assign { name, .. } if name == "x"));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let stmts = parse("1 + 2 * 3").unwrap();
        let Stmt::Expr(Expr::Binary { op, rhs, .. }) = &stmts[0] else {
            panic!("expected a binary expression");
        };
        assert_eq!(*op, BinOp::Add);
        assert!(matches!(**rhs, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn parenthesized_expression_overrides_precedence() {
        let stmts = parse("(5 + 3) * 2").unwrap();
        let Stmt::Expr(Expr::Binary { op, .. }) = &stmts[0] else {
            panic!("expected a binary expression");
        };
        assert_eq!(*op, BinOp::Mul);
    }

    #[test]
    fn trailing_tokens_are_invalid() {
        assert_eq!(parse("print(1) print(2)"), Err(SyntaxError::Invalid));
    }

    #[test]
    fn unbalanced_parenthesis_is_invalid() {
        assert_eq!(parse("print(1"), Err(SyntaxError::Invalid));
    }

    #[test]
    fn double_equals_is_invalid() {
        assert_eq!(parse("x == 1"), Err(SyntaxError::Invalid));
    }
}
