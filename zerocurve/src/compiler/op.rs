use crate::var::Var;

/// Single stack-machine instruction
///
/// Binary operations pop their right-hand operand first, then their left-hand
/// operand, and push the result.
#[derive(Copy, Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(
    name(Opcode),
    derive(strum::EnumIter, strum::IntoStaticStr),
    allow(missing_docs)
)]
pub enum Instruction {
    /// Pushes the point interval `[v, v]`
    PushConst(f64),
    /// Pushes the current value of a variable slot
    PushVar(Var),

    /// Pops `b`, pops `a`, pushes `a + b`
    Add,
    /// Pops `b`, pops `a`, pushes `a - b`
    Sub,
    /// Pops `b`, pops `a`, pushes `a * b`
    Mul,
    /// Pops `b`, pops `a`, pushes `a / b`
    ///
    /// Faults if `b` contains zero
    Div,
    /// Pops `b`, pops `a`, pushes `a ^ b`
    Pow,

    /// Negates the top of the stack
    Neg,
    /// Takes the absolute value of the top of the stack
    Abs,

    /// Pushes a copy of the top of the stack
    Dup,
    /// Exchanges the top two stack values
    Swap,
}

static_assertions::const_assert_eq!(std::mem::size_of::<Instruction>(), 16);

impl Instruction {
    /// Change in stack height caused by this instruction
    pub fn stack_effect(&self) -> isize {
        match self {
            Instruction::PushConst(..)
            | Instruction::PushVar(..)
            | Instruction::Dup => 1,
            Instruction::Add
            | Instruction::Sub
            | Instruction::Mul
            | Instruction::Div
            | Instruction::Pow => -1,
            Instruction::Neg | Instruction::Abs | Instruction::Swap => 0,
        }
    }

    /// Returns the opcode name, in `CamelCase`
    pub fn name(&self) -> &'static str {
        Opcode::from(self).into()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::PushConst(v) => write!(f, "{} {v}", self.name()),
            Instruction::PushVar(v) => write!(f, "{} {v}", self.name()),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Iterates over opcode names, in declaration order
pub fn iter_opcodes() -> impl Iterator<Item = &'static str> {
    use strum::IntoEnumIterator;
    Opcode::iter().map(|op| op.into())
}
