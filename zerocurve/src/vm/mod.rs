//! Interval virtual machine
//!
//! A [`Program`] is an immutable list of [`Instruction`]s, executed against a
//! per-thread [`VmContext`].  Programs are cheap to clone (they wrap an
//! [`Arc`]), so every render worker can hold its own handle to the same
//! bytecode.
use crate::{
    Error, Fault, compiler::Instruction, parse::parse, types::Interval,
};
use std::sync::Arc;

mod context;
pub use context::VmContext;

/// Instructions and stack requirements of a compiled program
#[derive(Debug)]
struct ProgramData {
    instrs: Vec<Instruction>,
    stack_size: usize,
}

/// Compiled interval program
///
/// Built by [`compile`](crate::compiler::compile) or [`Program::from_text`].
#[derive(Clone, Debug)]
pub struct Program(Arc<ProgramData>);

static_assertions::assert_impl_all!(Program: Send, Sync);

impl Program {
    pub(crate) fn new(instrs: Vec<Instruction>, stack_size: usize) -> Self {
        Self(Arc::new(ProgramData { instrs, stack_size }))
    }

    /// Parses and compiles formula text
    ///
    /// ```
    /// # use zerocurve::{vm::Program, var::Var, types::Interval};
    /// let p = Program::from_text("a + b")?;
    /// let mut ctx = p.new_context();
    /// ctx.set_var(Var::from_char('a').unwrap(), 1.0.into());
    /// ctx.set_var(Var::from_char('b').unwrap(), 2.0.into());
    /// assert_eq!(p.execute(&mut ctx)?, Interval::from(3.0));
    /// # Ok::<(), zerocurve::Error>(())
    /// ```
    pub fn from_text(text: &str) -> Result<Self, Error> {
        let e = parse(text)?;
        Ok(crate::compiler::compile(&e))
    }

    /// Returns the number of stack slots needed to execute this program
    pub fn stack_size(&self) -> usize {
        self.0.stack_size
    }

    /// Returns the instruction list
    pub fn instructions(&self) -> &[Instruction] {
        &self.0.instrs
    }

    /// Returns the number of instructions
    pub fn len(&self) -> usize {
        self.0.instrs.len()
    }

    /// Checks whether the program is empty
    ///
    /// Compiled programs are never empty, but an empty program is a valid
    /// (always-faulting) value.
    pub fn is_empty(&self) -> bool {
        self.0.instrs.is_empty()
    }

    /// Builds a context with enough stack to execute this program
    pub fn new_context(&self) -> VmContext {
        VmContext::new(self.stack_size())
    }

    /// Executes the program against the variable bindings in `ctx`
    ///
    /// The context's stack is reset (and grown if needed) before evaluation.
    /// Returns the single value left on the stack at the end.
    pub fn execute(&self, ctx: &mut VmContext) -> Result<Interval, Fault> {
        ctx.reset(self.stack_size());
        for op in self.instructions() {
            match *op {
                Instruction::PushConst(v) => ctx.push(Interval::from(v))?,
                Instruction::PushVar(v) => ctx.push(ctx.load(v.index())?)?,
                Instruction::Add => {
                    let (a, b) = pop2(ctx)?;
                    ctx.push(a + b)?
                }
                Instruction::Sub => {
                    let (a, b) = pop2(ctx)?;
                    ctx.push(a - b)?
                }
                Instruction::Mul => {
                    let (a, b) = pop2(ctx)?;
                    ctx.push(a * b)?
                }
                Instruction::Div => {
                    let (a, b) = pop2(ctx)?;
                    ctx.push(a.checked_div(b)?)?
                }
                Instruction::Pow => {
                    let (a, b) = pop2(ctx)?;
                    ctx.push(a.pow(b)?)?
                }
                Instruction::Neg => {
                    let a = ctx.pop()?;
                    ctx.push(-a)?
                }
                Instruction::Abs => {
                    let a = ctx.pop()?;
                    ctx.push(a.abs())?
                }
                Instruction::Dup => ctx.push(ctx.top()?)?,
                Instruction::Swap => ctx.swap()?,
            }
        }
        match ctx.height() {
            1 => ctx.pop(),
            n => Err(Fault::BadResult(n)),
        }
    }
}

/// Pops the right-hand operand, then the left-hand operand
#[inline]
fn pop2(ctx: &mut VmContext) -> Result<(Interval, Interval), Fault> {
    let b = ctx.pop()?;
    let a = ctx.pop()?;
    Ok((a, b))
}

impl std::fmt::Display for Program {
    /// Prints one instruction per line, after a header with the stack size
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "; stack size {}", self.stack_size())?;
        for (i, op) in self.instructions().iter().enumerate() {
            writeln!(f, "{i:>4}  {op}")?;
        }
        Ok(())
    }
}
