//! Formula parser
//!
//! Turns formula text into an [`Expr`] tree, using a hand-written
//! recursive-descent parser over the following grammar:
//!
//! ```text
//! primitive   := '(' expr ')' | '|' expr '|' | letter | real-literal
//! primitive2  := primitive | '-' primitive
//! factor      := primitive2 ('^' factor)?
//! term        := factor ( ('*' | '/') factor | factor )*
//! expr        := term ( ('+' | '-') term )*
//! ```
//!
//! A few consequences are worth calling out:
//!
//! - Two factors next to each other are multiplied (`2x`, `x(y + 1)`,
//!   `3|x|`).  A following `+` or `-` always belongs to `expr`, so `a -b` is
//!   a subtraction rather than `a * (-b)`.  A `|` after a factor is tried as
//!   the start of an absolute value, and left for an enclosing `|...|` if
//!   that fails.
//! - Unary minus is only accepted in front of a `primitive`, and it binds more
//!   tightly than `^`: `-x^2` parses as `(-x)^2`.  This is part of the
//!   language, and is pinned by a regression test.
//! - `^` is right-associative: `2^3^2 = 2^9`.
//! - Whitespace (including newlines) may appear between any two tokens.
//! - Variables are single ASCII letters, folded to lowercase; `xy` is `x * y`.
//! - Nesting is bounded: at most [`MAX_NESTING`] levels of brackets, absolute
//!   values, and powers, and a tree at most [`MAX_HEIGHT`] nodes tall.
//!
//! ```
//! use zerocurve::{context::Expr, parse::parse};
//!
//! let e = parse("2x + y")?;
//! assert_eq!(e, Expr::constant(2.0) * Expr::x() + Expr::y());
//! # Ok::<(), zerocurve::Error>(())
//! ```
use crate::{
    Error,
    context::{BinaryOpcode, Expr, UnaryOpcode},
};

mod lexer;
use lexer::{Token, tokenize};

/// Maximum nesting of brackets, absolute values, and powers
pub const MAX_NESTING: usize = 256;

/// Maximum height of a parsed expression tree, counted in nodes
pub const MAX_HEIGHT: usize = 1024;

/// Reported when either nesting limit is exceeded
const TOO_DEEP: &str = "a less deeply nested formula";

/// Parses a formula into an expression tree
///
/// Returns [`Error::Syntax`] if the text is not entirely consumed by the
/// grammar, or if it nests more deeply than [`MAX_NESTING`] or
/// [`MAX_HEIGHT`] allow; no partial tree is ever returned.
pub fn parse(text: &str) -> Result<Expr, Error> {
    let tokens = tokenize(text)?;
    let mut p = Parser {
        tokens: &tokens,
        index: 0,
        end: text.len(),
        nesting: 0,
    };
    let out = p.expr()?;
    if p.peek().is_some() {
        return Err(p.error("operator or end of input"));
    }
    Ok(out.expr)
}

/// Subtree under construction, tagged with its height
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}

struct Parser<'a> {
    tokens: &'a [(usize, Token)],
    index: usize,
    /// Position reported for errors at the end of input
    end: usize,
    /// Number of `factor` calls currently on the stack
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.index).map(|(_, t)| *t)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.index).map(|(p, _)| *p).unwrap_or(self.end)
    }

    fn error(&self, expected: &'static str) -> Error {
        Error::Syntax {
            position: self.position(),
            expected,
        }
    }

    /// Consumes the next token if it matches `t`
    fn accept(&mut self, t: Token) -> bool {
        if self.peek() == Some(t) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(
        &mut self,
        t: Token,
        expected: &'static str,
    ) -> Result<(), Error> {
        if self.accept(t) {
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn binary(
        &self,
        op: BinaryOpcode,
        a: Node,
        b: Node,
    ) -> Result<Node, Error> {
        let height = 1 + a.height.max(b.height);
        self.node(Expr::binary(op, a.expr, b.expr), height)
    }

    fn unary(&self, op: UnaryOpcode, a: Node) -> Result<Node, Error> {
        let height = 1 + a.height;
        self.node(Expr::unary(op, a.expr), height)
    }

    fn node(&self, expr: Expr, height: usize) -> Result<Node, Error> {
        if height > MAX_HEIGHT {
            Err(self.error(TOO_DEEP))
        } else {
            Ok(Node { expr, height })
        }
    }

    fn expr(&mut self) -> Result<Node, Error> {
        let mut out = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOpcode::Add,
                Some(Token::Minus) => BinaryOpcode::Sub,
                _ => break,
            };
            self.index += 1;
            let rhs = self.term()?;
            out = self.binary(op, out, rhs)?;
        }
        Ok(out)
    }

    fn term(&mut self) -> Result<Node, Error> {
        let mut out = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => {
                    self.index += 1;
                    BinaryOpcode::Mul
                }
                Some(Token::Slash) => {
                    self.index += 1;
                    BinaryOpcode::Div
                }
                Some(Token::Bar) => {
                    // Implicit multiplication by an absolute value.  The bar
                    // may instead close an enclosing absolute value, so
                    // rewind on failure.
                    let saved = self.index;
                    match self.factor() {
                        Ok(rhs) => {
                            out = self.binary(BinaryOpcode::Mul, out, rhs)?;
                            continue;
                        }
                        Err(e) if is_too_deep(&e) => return Err(e),
                        Err(..) => {
                            self.index = saved;
                            break;
                        }
                    }
                }
                // Any other primitive can only be an implicit multiplication
                Some(t) if t.starts_primitive() => BinaryOpcode::Mul,
                _ => break,
            };
            let rhs = self.factor()?;
            out = self.binary(op, out, rhs)?;
        }
        Ok(out)
    }

    /// Parses a `factor`, enforcing [`MAX_NESTING`]
    ///
    /// Every recursive path through the grammar passes through here.
    fn factor(&mut self) -> Result<Node, Error> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error(TOO_DEEP));
        }
        self.nesting += 1;
        let out = self.power();
        self.nesting -= 1;
        out
    }

    fn power(&mut self) -> Result<Node, Error> {
        let base = self.primitive2()?;
        if self.accept(Token::Caret) {
            let exp = self.factor()?;
            self.binary(BinaryOpcode::Pow, base, exp)
        } else {
            Ok(base)
        }
    }

    fn primitive2(&mut self) -> Result<Node, Error> {
        if self.accept(Token::Minus) {
            let e = self.primitive()?;
            self.unary(UnaryOpcode::Neg, e)
        } else {
            self.primitive()
        }
    }

    fn primitive(&mut self) -> Result<Node, Error> {
        match self.peek() {
            Some(Token::LParen) => {
                self.index += 1;
                let e = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(e)
            }
            Some(Token::Bar) => {
                self.index += 1;
                let e = self.expr()?;
                self.expect(Token::Bar, "'|'")?;
                self.unary(UnaryOpcode::Abs, e)
            }
            Some(Token::Letter(v)) => {
                self.index += 1;
                Ok(Node::leaf(Expr::Var(v)))
            }
            Some(Token::Number(n)) => {
                self.index += 1;
                Ok(Node::leaf(Expr::Const(n)))
            }
            _ => Err(self.error("'(', '|', a variable, or a number")),
        }
    }
}

fn is_too_deep(e: &Error) -> bool {
    matches!(e, Error::Syntax { expected, .. } if *expected == TOO_DEEP)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::var::Var;

    fn x() -> Expr {
        Expr::x()
    }
    fn y() -> Expr {
        Expr::y()
    }
    fn c(v: f64) -> Expr {
        Expr::constant(v)
    }

    #[test]
    fn parse_basic() {
        assert_eq!(parse("x").unwrap(), x());
        assert_eq!(parse(" X ").unwrap(), x());
        assert_eq!(parse("1.5").unwrap(), c(1.5));
        assert_eq!(parse("x + y").unwrap(), x() + y());
        assert_eq!(parse("x - y - 1").unwrap(), (x() - y()) - 1.0);
        assert_eq!(parse("x / y * 2").unwrap(), (x() / y()) * 2.0);
    }

    #[test]
    fn parse_precedence() {
        assert_eq!(parse("1 + 2 * x").unwrap(), c(1.0) + c(2.0) * x());
        assert_eq!(parse("2 * x ^ 2").unwrap(), c(2.0) * x().pow(2.0));
        assert_eq!(parse("(1 + 2) * x").unwrap(), (c(1.0) + c(2.0)) * x());
        assert_eq!(parse("2^3^2").unwrap(), c(2.0).pow(c(3.0).pow(2.0)));
    }

    #[test]
    fn parse_unary_minus() {
        // Unary minus binds to the primitive, so this is (-x)^2
        assert_eq!(parse("-x^2").unwrap(), (-x()).pow(2.0));
        assert_eq!(parse("-x + y").unwrap(), -x() + y());
        assert_eq!(parse("x^-2").unwrap(), x().pow(-c(2.0)));
        assert_eq!(parse("x * -y").unwrap(), x() * -y());
        assert_eq!(parse("-(x + y)").unwrap(), -(x() + y()));
        assert!(parse("--x").is_err());
    }

    #[test]
    fn parse_implicit_mul() {
        assert_eq!(parse("2x").unwrap(), c(2.0) * x());
        assert_eq!(parse("xy").unwrap(), x() * y());
        assert_eq!(parse("2(x + 1)").unwrap(), c(2.0) * (x() + 1.0));
        assert_eq!(parse("x y / 2").unwrap(), (x() * y()) / 2.0);
        assert_eq!(parse("3|x|").unwrap(), c(3.0) * x().abs());

        // The lookahead must leave `+` and `-` to `expr`
        assert_eq!(parse("x -y").unwrap(), x() - y());
        assert_eq!(parse("2x +3y").unwrap(), c(2.0) * x() + c(3.0) * y());
    }

    #[test]
    fn parse_abs() {
        assert_eq!(parse("|x|").unwrap(), x().abs());
        assert_eq!(parse("|x - y|").unwrap(), (x() - y()).abs());
        assert_eq!(parse("|x||y|").unwrap(), x().abs() * y().abs());
        assert_eq!(parse("|x| - x").unwrap(), x().abs() - x());
        assert_eq!(parse("|(|x| - 1)|").unwrap(), (x().abs() - 1.0).abs());

        // Implicit multiplication only rewinds locally, so a bar which
        // could open a new primitive always does
        assert!(parse("||x| - 1|").is_err());
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(parse("1e3").unwrap(), c(1000.0));
        assert_eq!(parse("2.5E-1").unwrap(), c(0.25));
        assert_eq!(parse(".5").unwrap(), c(0.5));
        assert_eq!(parse("3.").unwrap(), c(3.0));

        // An `e` with no digits after it is the variable `e`
        let e = Expr::Var(Var::from_char('e').unwrap());
        assert_eq!(parse("2e").unwrap(), c(2.0) * e);
    }

    #[test]
    fn parse_whitespace() {
        assert_eq!(
            parse("\tx\n+\n  y ^ 2 ").unwrap(),
            x() + y().pow(2.0)
        );
    }

    #[test]
    fn parse_errors() {
        let check = |s: &str, pos: usize| match parse(s) {
            Err(Error::Syntax { position, .. }) => {
                assert_eq!(position, pos, "bad position for {s:?}")
            }
            r => panic!("expected syntax error for {s:?}, got {r:?}"),
        };
        check("", 0);
        check("x +", 3);
        check("(x + y", 6);
        check("x)", 1);
        check("|x", 2);
        check("x $ y", 2);
        check("x ^", 3);
        check("2 * * x", 4);

        // A bracket after a factor is always a multiplication, so an
        // unclosed one is reported where the ')' is missing
        check("x(y", 3);
        check("x + 3(y - 1", 11);
        check("2x(y", 4);
        assert!(matches!(
            parse("x(y"),
            Err(Error::Syntax { expected: "')'", .. })
        ));
    }

    #[test]
    fn parse_nesting_limit() {
        let nested = |n: usize| {
            format!("{}x{}", "(".repeat(n), ")".repeat(n))
        };
        assert_eq!(parse(&nested(MAX_NESTING - 1)).unwrap(), x());
        assert!(parse(&nested(MAX_NESTING)).is_err());
        assert!(parse(&nested(100_000)).is_err());
        assert!(parse(&"|".repeat(100_000)).is_err());

        let powers = vec!["x"; 100_000].join("^");
        assert!(matches!(
            parse(&powers),
            Err(Error::Syntax { expected, .. }) if expected == TOO_DEEP
        ));
    }

    #[test]
    fn parse_height_limit() {
        let sum = |n: usize| vec!["x"; n].join(" + ");
        let e = parse(&sum(MAX_HEIGHT)).unwrap();
        assert_eq!(e.depth(), MAX_HEIGHT);
        assert!(matches!(
            parse(&sum(MAX_HEIGHT + 1)),
            Err(Error::Syntax { expected, .. }) if expected == TOO_DEEP
        ));
        assert!(parse(&sum(100_000)).is_err());
    }
}
