/// A one-argument math operation
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum UnaryOpcode {
    Neg,
    Abs,
}

/// A two-argument math operation
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum BinaryOpcode {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOpcode {
    /// Returns the operator symbol used in formula text
    pub fn symbol(&self) -> char {
        match self {
            BinaryOpcode::Add => '+',
            BinaryOpcode::Sub => '-',
            BinaryOpcode::Mul => '*',
            BinaryOpcode::Div => '/',
            BinaryOpcode::Pow => '^',
        }
    }
}
