use crate::{
    Fault,
    types::Interval,
    var::{VAR_COUNT, Var},
};

/// Per-worker evaluation state for a [`Program`](super::Program)
///
/// A context holds a fixed-capacity interval stack and one value per variable
/// slot.  It is owned by a single thread and reused across evaluations; the
/// stack is reset before each run, while variable bindings persist until they
/// are overwritten.
#[derive(Clone, Debug)]
pub struct VmContext {
    stack: Vec<Interval>,
    sp: usize,
    vars: [Interval; VAR_COUNT],
}

impl VmContext {
    /// Builds a context with the given stack capacity
    ///
    /// All variables start bound to `[0, 0]`.
    pub fn new(stack_size: usize) -> Self {
        Self {
            stack: vec![Interval::from(0.0); stack_size],
            sp: 0,
            vars: [Interval::from(0.0); VAR_COUNT],
        }
    }

    /// Binds a variable to the given interval
    pub fn set_var(&mut self, v: Var, value: Interval) {
        self.vars[v.index() as usize] = value;
    }

    /// Returns the current binding of a variable
    pub fn var(&self, v: Var) -> Interval {
        self.vars[v.index() as usize]
    }

    /// Returns the stack capacity
    pub fn capacity(&self) -> usize {
        self.stack.len()
    }

    /// Empties the stack, growing it to at least `stack_size` slots
    pub fn reset(&mut self, stack_size: usize) {
        if self.stack.len() < stack_size {
            self.stack.resize(stack_size, Interval::from(0.0));
        }
        self.sp = 0;
    }

    /// Returns the number of values currently on the stack
    pub(super) fn height(&self) -> usize {
        self.sp
    }

    pub(super) fn load(&self, slot: u8) -> Result<Interval, Fault> {
        self.vars
            .get(slot as usize)
            .copied()
            .ok_or(Fault::BadVarSlot(slot))
    }

    #[inline]
    pub(super) fn push(&mut self, v: Interval) -> Result<(), Fault> {
        let capacity = self.stack.len();
        let slot = self
            .stack
            .get_mut(self.sp)
            .ok_or(Fault::StackOverflow(capacity))?;
        *slot = v;
        self.sp += 1;
        Ok(())
    }

    #[inline]
    pub(super) fn pop(&mut self) -> Result<Interval, Fault> {
        self.sp = self.sp.checked_sub(1).ok_or(Fault::StackUnderflow)?;
        Ok(self.stack[self.sp])
    }

    #[inline]
    pub(super) fn top(&self) -> Result<Interval, Fault> {
        match self.sp {
            0 => Err(Fault::StackUnderflow),
            i => Ok(self.stack[i - 1]),
        }
    }

    /// Exchanges the top two stack values
    #[inline]
    pub(super) fn swap(&mut self) -> Result<(), Fault> {
        if self.sp < 2 {
            return Err(Fault::StackUnderflow);
        }
        self.stack.swap(self.sp - 1, self.sp - 2);
        Ok(())
    }
}
