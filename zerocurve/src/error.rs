//! Module containing the universal error type and evaluation faults
use thiserror::Error;

/// Error raised while evaluating a compiled program
///
/// Faults are split into two families:
/// - **Arithmetic** faults depend on the input values (e.g. dividing by an
///   interval which contains zero)
/// - **Internal** faults indicate a mismatch between compiler and evaluator,
///   and should never occur for a program built by
///   [`compile`](crate::compiler::compile)
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Division by an interval which contains zero
    #[error("division by zero")]
    DivisionByZero,

    /// Non-integer exponent applied to a negative base
    #[error("non-integer exponent of negative base")]
    NonIntegerExponent,

    /// The evaluation stack is too small for this program
    #[error("stack overflow (capacity {0})")]
    StackOverflow(usize),

    /// An instruction tried to pop from an empty stack
    #[error("stack underflow")]
    StackUnderflow,

    /// A variable slot is out of range
    #[error("invalid variable slot {0}")]
    BadVarSlot(u8),

    /// The program did not leave exactly one value on the stack
    #[error("program left {0} values on the stack")]
    BadResult(usize),
}

impl Fault {
    /// Checks whether this is an arithmetic (input-dependent) fault
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Fault::DivisionByZero | Fault::NonIntegerExponent)
    }
}

/// Universal error type for `zerocurve`
#[derive(Error, Debug)]
pub enum Error {
    /// The formula text does not match the grammar
    #[error("syntax error at position {position}: expected {expected}")]
    Syntax {
        /// Byte offset into the formula text
        position: usize,
        /// Description of what the parser was looking for
        expected: &'static str,
    },

    /// Evaluation fault, not tied to a particular location
    #[error(transparent)]
    Fault(#[from] Fault),

    /// Evaluation fault raised while rendering a particular pixel
    #[error("{fault}\nPoint: ({x}, {y})")]
    FaultAt {
        /// Underlying fault
        fault: Fault,
        /// Lower X bound of the pixel being evaluated
        x: f64,
        /// Lower Y bound of the pixel being evaluated
        y: f64,
    },

    /// Image has a zero dimension
    #[error("image size must be non-zero ({0} x {1})")]
    EmptyImage(u32, u32),

    /// Render region has a non-finite coordinate or size
    #[error("render region and its size must be finite")]
    NonFiniteRegion,

    /// Could not build the worker pool
    #[error("could not build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// IO error; see inner code for details
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Returns the evaluation fault, if this error carries one
    pub fn fault(&self) -> Option<Fault> {
        match self {
            Error::Fault(f) | Error::FaultAt { fault: f, .. } => Some(*f),
            _ => None,
        }
    }
}
