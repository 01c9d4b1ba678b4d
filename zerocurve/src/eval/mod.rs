//! Evaluation backends
//!
//! The rasterizer is generic over a [`Function`], which knows how to build a
//! per-thread context and evaluate itself over a pair of input intervals.  Two
//! backends are provided:
//!
//! - [`Program`](crate::vm::Program), the interval bytecode VM
//! - [`Predicate`], which wraps a native boolean test of a single point
use crate::{Fault, types::Interval, var::Var, vm::Program};

mod predicate;
pub use predicate::Predicate;

/// A function of `x` and `y` which can be evaluated over intervals
///
/// Implementations are shared by reference across render workers, while each
/// worker owns its own [`Context`](Function::Context).
pub trait Function: Sync {
    /// Mutable per-thread evaluation state
    type Context: Send;

    /// Builds a fresh evaluation context
    fn new_context(&self) -> Self::Context;

    /// Evaluates the function over the rectangle `x × y`
    ///
    /// The result must contain every value the function takes over that
    /// rectangle; a pixel is on the curve when the result
    /// [contains zero](Interval::is_zero).
    fn eval_xy(
        &self,
        ctx: &mut Self::Context,
        x: Interval,
        y: Interval,
    ) -> Result<Interval, Fault>;
}

impl Function for Program {
    type Context = crate::vm::VmContext;

    fn new_context(&self) -> Self::Context {
        Program::new_context(self)
    }

    fn eval_xy(
        &self,
        ctx: &mut Self::Context,
        x: Interval,
        y: Interval,
    ) -> Result<Interval, Fault> {
        ctx.set_var(Var::X, x);
        ctx.set_var(Var::Y, y);
        self.execute(ctx)
    }
}
