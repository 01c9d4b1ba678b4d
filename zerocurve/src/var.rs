//! Input variables to math expressions
//!
//! Formulas may refer to any of 26 single-letter variables (`a` through `z`,
//! case-insensitive).  Each letter owns a fixed slot in the evaluation
//! context; the renderer binds `x` and `y`, and the rest are free for the
//! caller to set.

/// Number of variable slots
pub const VAR_COUNT: usize = 26;

/// A single-letter variable, stored as its slot index (`a = 0`, `z = 25`)
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Var(u8);

impl Var {
    /// The horizontal axis, bound by the renderer
    pub const X: Var = Var(b'x' - b'a');
    /// The vertical axis, bound by the renderer
    pub const Y: Var = Var(b'y' - b'a');

    /// Builds a variable from an ASCII letter, folding case
    ///
    /// Returns `None` if the character is not an ASCII letter.
    ///
    /// ```
    /// # use zerocurve::var::Var;
    /// assert_eq!(Var::from_char('X'), Some(Var::X));
    /// assert_eq!(Var::from_char('1'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Var(c.to_ascii_lowercase() as u8 - b'a'))
        } else {
            None
        }
    }

    /// Builds a variable from a slot index
    ///
    /// Returns `None` if the index is out of range.
    pub fn from_index(i: usize) -> Option<Self> {
        u8::try_from(i)
            .ok()
            .filter(|i| (*i as usize) < VAR_COUNT)
            .map(Var)
    }

    /// Returns the slot index of this variable
    #[inline]
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Returns the (lowercase) letter naming this variable
    pub fn name(&self) -> char {
        (b'a' + self.0) as char
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn var_case_folding() {
        assert_eq!(Var::from_char('a').unwrap().index(), 0);
        assert_eq!(Var::from_char('Z').unwrap().index(), 25);
        assert_eq!(Var::from_char('y'), Some(Var::Y));
        assert_eq!(Var::X.name(), 'x');
        assert!(Var::from_char('_').is_none());
        assert!(Var::from_char('é').is_none());
    }

    #[test]
    fn var_from_index() {
        assert_eq!(Var::from_index(23), Some(Var::X));
        assert_eq!(Var::from_index(26), None);
        assert_eq!(Var::from_index(1000), None);
    }
}
