//! Lowering from expression trees to stack-machine bytecode
//!
//! [`compile`] walks an [`Expr`] in post-order (operands before operators),
//! producing a [`Program`] for the interval VM.  Two rewrites are applied
//! during emission, when the `optimize` feature is enabled:
//!
//! - **Small integer powers**: `e ^ k` with a constant integer `k` in `1..=4`
//!   becomes `k - 1` copies of `e` multiplied together.  Even powers take the
//!   absolute value of `e` first, so that the result is non-negative just like
//!   the generic power.  Odd powers are still sound, but repeated
//!   multiplication treats each copy of `e` independently, so a base that
//!   straddles zero gives a wider result: `x^3` over `x = [-2, 1]` is
//!   `[-8, 4]` here and `[-8, 1]` through the generic power.
//! - **Absolute-value factoring**: `|e| ± e` and `e ± |e|` evaluate `e` once,
//!   then [`Dup`](Instruction::Dup) it and apply [`Abs`](Instruction::Abs) to
//!   the copy.  When the absolute value is the left operand of a subtraction,
//!   a [`Swap`](Instruction::Swap) restores the operand order.
//!
//! [`compile_unoptimized`] always uses the plain post-order walk, and is
//! useful as a reference when checking the rewrites.  The two agree, up to
//! rounding, when every variable is bound to a single point; over wider
//! intervals the optimized result contains the unoptimized one, but may be
//! larger.
use crate::{
    context::{BinaryOpcode, Expr, UnaryOpcode},
    vm::Program,
};

mod op;
pub use op::{Instruction, Opcode, iter_opcodes};

/// Compiles an expression tree into an interval-VM program
pub fn compile(e: &Expr) -> Program {
    Compiler::new(cfg!(feature = "optimize")).run(e)
}

/// Compiles an expression tree with no rewrites
pub fn compile_unoptimized(e: &Expr) -> Program {
    Compiler::new(false).run(e)
}

struct Compiler {
    optimize: bool,
    instrs: Vec<Instruction>,

    /// Current stack height
    height: usize,

    /// Maximum stack height seen so far
    peak: usize,
}

impl Compiler {
    fn new(optimize: bool) -> Self {
        Self {
            optimize,
            instrs: vec![],
            height: 0,
            peak: 0,
        }
    }

    fn run(mut self, e: &Expr) -> Program {
        self.emit(e);
        debug_assert_eq!(self.height, 1);

        // A plain post-order walk never needs more than the tree's depth;
        // expanded powers may need a few extra slots, tracked by `peak`.
        let depth = e.depth();
        debug_assert!(self.optimize || self.peak <= depth);
        let stack_size = depth.max(self.peak);

        let prog = Program::new(self.instrs, stack_size);
        log::debug!(
            "compiled {} instructions (stack size {})",
            prog.len(),
            prog.stack_size()
        );
        prog
    }

    fn push(&mut self, i: Instruction) {
        self.height = self.height.saturating_add_signed(i.stack_effect());
        self.peak = self.peak.max(self.height);
        self.instrs.push(i);
    }

    fn emit(&mut self, e: &Expr) {
        match e {
            Expr::Const(c) => self.push(Instruction::PushConst(*c)),
            Expr::Var(v) => self.push(Instruction::PushVar(*v)),
            Expr::Unary(op, a) => {
                self.emit(a);
                self.push(match op {
                    UnaryOpcode::Neg => Instruction::Neg,
                    UnaryOpcode::Abs => Instruction::Abs,
                });
            }
            Expr::Binary(op, a, b) => {
                if !(self.optimize && self.emit_special(*op, a, b)) {
                    self.emit(a);
                    self.emit(b);
                    self.push(binary_instruction(*op));
                }
            }
        }
    }

    /// Tries to emit an optimized form of `a op b`
    ///
    /// Returns `false` (having emitted nothing) if no rewrite applies.
    fn emit_special(&mut self, op: BinaryOpcode, a: &Expr, b: &Expr) -> bool {
        match op {
            BinaryOpcode::Pow => match b.as_integer() {
                Some(k @ 1..=4) => {
                    self.emit(a);
                    if k % 2 == 0 {
                        self.push(Instruction::Abs);
                    }
                    for _ in 1..k {
                        self.push(Instruction::Dup);
                    }
                    for _ in 1..k {
                        self.push(Instruction::Mul);
                    }
                    true
                }
                _ => false,
            },
            BinaryOpcode::Add | BinaryOpcode::Sub => {
                let (e, swap) = match (a, b) {
                    (Expr::Unary(UnaryOpcode::Abs, e), b) if e.equals_to(b) => {
                        (b, op == BinaryOpcode::Sub)
                    }
                    (a, Expr::Unary(UnaryOpcode::Abs, e)) if e.equals_to(a) => {
                        (a, false)
                    }
                    _ => return false,
                };
                // Leaves [e, |e|] on the stack
                self.emit(e);
                self.push(Instruction::Dup);
                self.push(Instruction::Abs);
                if swap {
                    self.push(Instruction::Swap);
                }
                self.push(binary_instruction(op));
                true
            }
            BinaryOpcode::Mul | BinaryOpcode::Div => false,
        }
    }
}

fn binary_instruction(op: BinaryOpcode) -> Instruction {
    match op {
        BinaryOpcode::Add => Instruction::Add,
        BinaryOpcode::Sub => Instruction::Sub,
        BinaryOpcode::Mul => Instruction::Mul,
        BinaryOpcode::Div => Instruction::Div,
        BinaryOpcode::Pow => Instruction::Pow,
    }
}
