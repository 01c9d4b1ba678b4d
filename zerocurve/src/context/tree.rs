//! Owned math trees
use super::op::{BinaryOpcode, UnaryOpcode};
use crate::{
    Fault,
    types::ZERO_EPSILON,
    var::{VAR_COUNT, Var},
};

/// Tolerance for comparing constants in [`Expr::equals_to`]
///
/// This is only used when matching patterns during compilation; evaluation
/// uses [`ZERO_EPSILON`](crate::types::ZERO_EPSILON) instead.
pub const CONST_EQ_EPSILON: f64 = 1e-9;

/// Expression tree, as produced by the parser
///
/// Each node owns its children exclusively; trees are built once and not
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Expr {
    Const(f64),
    Var(Var),
    Binary(BinaryOpcode, Box<Expr>, Box<Expr>),
    Unary(UnaryOpcode, Box<Expr>),
}

/// See [`Expr`] for documentation of these functions
#[allow(missing_docs)]
impl Expr {
    pub fn x() -> Self {
        Expr::Var(Var::X)
    }
    pub fn y() -> Self {
        Expr::Var(Var::Y)
    }
    pub fn constant(f: f64) -> Self {
        Expr::Const(f)
    }
    pub fn binary(op: BinaryOpcode, a: Expr, b: Expr) -> Self {
        Expr::Binary(op, Box::new(a), Box::new(b))
    }
    pub fn unary(op: UnaryOpcode, a: Expr) -> Self {
        Expr::Unary(op, Box::new(a))
    }
    pub fn abs(self) -> Self {
        Self::unary(UnaryOpcode::Abs, self)
    }
    pub fn pow<T: Into<Expr>>(self, other: T) -> Self {
        Self::binary(BinaryOpcode::Pow, self, other.into())
    }
}

impl Expr {
    /// Maximum evaluation stack height needed by this subtree
    ///
    /// Operands are evaluated depth-first and consumed by their operator, so
    /// a binary node needs one more slot than its deeper child; this is
    /// **not** the node count.
    pub fn depth(&self) -> usize {
        match self {
            Expr::Const(..) | Expr::Var(..) => 1,
            Expr::Binary(_, a, b) => 1 + a.depth().max(b.depth()),
            Expr::Unary(_, a) => a.depth(),
        }
    }

    /// Structural equality, comparing constants within [`CONST_EQ_EPSILON`]
    pub fn equals_to(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => {
                (a - b).abs() <= CONST_EQ_EPSILON
            }
            (Expr::Var(a), Expr::Var(b)) => a == b,
            (Expr::Binary(op_a, a1, a2), Expr::Binary(op_b, b1, b2)) => {
                op_a == op_b && a1.equals_to(b1) && a2.equals_to(b2)
            }
            (Expr::Unary(op_a, a), Expr::Unary(op_b, b)) => {
                op_a == op_b && a.equals_to(b)
            }
            _ => false,
        }
    }

    /// If this node is a constant integer within [`CONST_EQ_EPSILON`], returns
    /// that integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expr::Const(c) => {
                let k = c.round();
                ((c - k).abs() <= CONST_EQ_EPSILON && k.abs() < 1e15)
                    .then_some(k as i64)
            }
            _ => None,
        }
    }

    /// Returns `true` if the tree refers to no variables
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Const(..) => true,
            Expr::Var(..) => false,
            Expr::Binary(_, a, b) => a.is_constant() && b.is_constant(),
            Expr::Unary(_, a) => a.is_constant(),
        }
    }

    /// Evaluates the tree at a single point, using plain `f64` arithmetic
    ///
    /// Faults follow the same rules as interval evaluation: dividing by a
    /// value within [`ZERO_EPSILON`] of zero, or raising a negative value to
    /// a non-integer power, is an error.
    pub fn eval_point(&self, vars: &[f64; VAR_COUNT]) -> Result<f64, Fault> {
        let out = match self {
            Expr::Const(c) => *c,
            Expr::Var(v) => vars[v.index() as usize],
            Expr::Unary(op, a) => {
                let a = a.eval_point(vars)?;
                match op {
                    UnaryOpcode::Neg => -a,
                    UnaryOpcode::Abs => a.abs(),
                }
            }
            Expr::Binary(op, a, b) => {
                let a = a.eval_point(vars)?;
                let b = b.eval_point(vars)?;
                match op {
                    BinaryOpcode::Add => a + b,
                    BinaryOpcode::Sub => a - b,
                    BinaryOpcode::Mul => a * b,
                    BinaryOpcode::Div => {
                        if b.abs() <= ZERO_EPSILON {
                            return Err(Fault::DivisionByZero);
                        }
                        a / b
                    }
                    BinaryOpcode::Pow => {
                        if a < 0.0 && (b - b.round()).abs() > ZERO_EPSILON {
                            return Err(Fault::NonIntegerExponent);
                        }
                        if a < 0.0 { a.powf(b.round()) } else { a.powf(b) }
                    }
                }
            }
        };
        Ok(out)
    }
}

impl std::fmt::Display for Expr {
    /// Prints the tree with every operation parenthesized
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Unary(UnaryOpcode::Neg, a) => write!(f, "(-{a})"),
            Expr::Unary(UnaryOpcode::Abs, a) => write!(f, "|{a}|"),
            Expr::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbol()),
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Expr {
        Expr::constant(v)
    }
}

impl From<Var> for Expr {
    fn from(v: Var) -> Expr {
        Expr::Var(v)
    }
}

macro_rules! impl_binary {
    ($op:ident, $base_fn:ident, $opcode:ident) => {
        impl<A: Into<Expr>> std::ops::$op<A> for Expr {
            type Output = Expr;

            fn $base_fn(self, other: A) -> Expr {
                Expr::binary(BinaryOpcode::$opcode, self, other.into())
            }
        }
    };
}

impl_binary!(Add, add, Add);
impl_binary!(Sub, sub, Sub);
impl_binary!(Mul, mul, Mul);
impl_binary!(Div, div, Div);

impl std::ops::Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::unary(UnaryOpcode::Neg, self)
    }
}
