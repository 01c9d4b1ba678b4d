//! Expression trees
//!
//! An [`Expr`] is the parsed form of a formula: a tree of constants,
//! variables, and unary / binary operations.  It is consumed by the
//! [`compiler`](crate::compiler), which lowers it into a linear
//! [`Program`](crate::vm::Program).
mod op;
mod tree;

pub use op::{BinaryOpcode, UnaryOpcode};
pub use tree::{CONST_EQ_EPSILON, Expr};
