use crate::Fault;

/// Tolerance used by [`Interval::is_zero`]
///
/// The same test guards division and decides whether an exponent is an
/// integer.  It is unrelated to the tolerance used to compare
/// constants during compilation
/// ([`CONST_EQ_EPSILON`](crate::context::CONST_EQ_EPSILON)).
pub const ZERO_EPSILON: f64 = 1e-9;

/// Stores a closed range `[lower, upper]`, with conservative calculations to
/// guarantee that it always contains the actual value.
///
/// # Warning
/// This implementation does not set rounding modes, so it may not be _perfect_.
#[derive(Copy, Clone, PartialEq)]
#[repr(C)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl std::fmt::Debug for Interval {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> Result<(), std::fmt::Error> {
        f.debug_tuple("")
            .field(&self.lower)
            .field(&self.upper)
            .finish()
    }
}

impl Interval {
    /// Builds a new interval
    ///
    /// There are two kinds of valid interval:
    /// - `[lower, upper]` where `lower <= upper`
    /// - `[NaN, NaN]`
    ///
    /// # Panics
    /// Panics if the resulting interval would be invalid
    #[inline]
    pub fn new(lower: f64, upper: f64) -> Self {
        assert!(
            upper >= lower || (lower.is_nan() && upper.is_nan()),
            "invalid interval [{lower}, {upper}]"
        );
        Self { lower, upper }
    }

    /// Builds an interval from computed bounds, collapsing to `[NaN, NaN]` if
    /// either bound is `NaN` (e.g. after `inf - inf`)
    #[inline]
    fn from_bounds(lower: f64, upper: f64) -> Self {
        if lower.is_nan() || upper.is_nan() {
            f64::NAN.into()
        } else {
            Interval::new(lower, upper)
        }
    }

    /// Returns the lower bound of the interval
    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }
    /// Returns the upper bound of the interval
    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }
    /// Checks whether the given value is contained in the interval
    #[inline]
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }
    /// Returns `true` if either bound of the interval is `NaN`
    pub fn has_nan(&self) -> bool {
        self.lower.is_nan() || self.upper.is_nan()
    }
    /// Returns `true` if the interval is a single point
    pub fn is_point(&self) -> bool {
        self.lower == self.upper
    }

    /// Zero-membership test
    ///
    /// Returns `true` if the interval touches `[-ε, ε]`, where `ε` is
    /// [`ZERO_EPSILON`].  `NaN` intervals are never zero.
    ///
    /// ```
    /// # use zerocurve::types::Interval;
    /// assert!(Interval::new(-1.0, 1.0).is_zero());
    /// assert!(Interval::new(1e-12, 1.0).is_zero());
    /// assert!(!Interval::new(0.5, 1.0).is_zero());
    /// ```
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.lower <= ZERO_EPSILON && self.upper >= -ZERO_EPSILON
    }

    /// If the interval is (within [`ZERO_EPSILON`]) a single integer, returns
    /// that integer
    pub fn as_integer(&self) -> Option<f64> {
        let k = self.lower.round();
        if self.upper - self.lower <= ZERO_EPSILON
            && (self.lower - k).abs() <= ZERO_EPSILON
            && (self.upper - k).abs() <= ZERO_EPSILON
        {
            Some(k)
        } else {
            None
        }
    }

    /// Calculates the absolute value of the interval
    pub fn abs(self) -> Self {
        if self.lower < 0.0 {
            if self.upper > 0.0 {
                Interval::new(0.0, self.upper.max(-self.lower))
            } else {
                Interval::new(-self.upper, -self.lower)
            }
        } else {
            self
        }
    }

    /// Divides two intervals
    ///
    /// Returns [`Fault::DivisionByZero`] if the divisor
    /// [contains zero](Interval::is_zero).
    pub fn checked_div(self, rhs: Self) -> Result<Self, Fault> {
        if rhs.is_zero() {
            return Err(Fault::DivisionByZero);
        }
        if self.has_nan() || rhs.has_nan() {
            return Ok(f64::NAN.into());
        }
        Ok(Self::corners(self, rhs, |a, b| a / b))
    }

    /// Raises the interval to an interval-valued power
    ///
    /// - A base which straddles zero gives `[0, m^e]`, where `m` is the
    ///   largest magnitude in the base and `e` ranges over the exponent.  A
    ///   single odd integer exponent keeps the sign instead, since `x^k` is
    ///   monotonic.
    /// - A non-negative base takes the extremes over the four corner powers.
    /// - A negative base requires a single integer exponent; even exponents
    ///   flip the order of the bounds before powering.
    ///
    /// Any base which includes zero, raised to a possibly-negative exponent,
    /// reaches `1 / 0` and is a [`Fault::DivisionByZero`].
    pub fn pow(self, exp: Self) -> Result<Self, Fault> {
        if self.has_nan() || exp.has_nan() {
            return Ok(f64::NAN.into());
        }
        if exp.lower < 0.0 && self.contains(0.0) {
            return Err(Fault::DivisionByZero);
        }
        if self.lower < 0.0 && self.upper > 0.0 {
            if let Some(k) = exp.as_integer() {
                if k % 2.0 != 0.0 {
                    return Ok(Interval::from_bounds(
                        self.lower.powf(k),
                        self.upper.powf(k),
                    ));
                }
            }
            let m = self.upper.max(-self.lower);
            let upper = m.powf(exp.lower).max(m.powf(exp.upper));
            Ok(Interval::from_bounds(0.0, upper))
        } else if self.lower >= 0.0 {
            Ok(Self::corners(self, exp, f64::powf))
        } else {
            let k = exp.as_integer().ok_or(Fault::NonIntegerExponent)?;
            let (a, b) = if k % 2.0 == 0.0 {
                (self.upper, self.lower)
            } else {
                (self.lower, self.upper)
            };
            let (a, b) = (a.powf(k), b.powf(k));
            Ok(Interval::from_bounds(a.min(b), a.max(b)))
        }
    }

    /// Applies `f` to every pair of bounds, returning the extremes
    fn corners(lhs: Self, rhs: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let mut lower = f64::INFINITY;
        let mut upper = f64::NEG_INFINITY;
        for i in [lhs.lower, lhs.upper] {
            for j in [rhs.lower, rhs.upper] {
                let v = f(i, j);
                if v.is_nan() {
                    return f64::NAN.into();
                }
                lower = lower.min(v);
                upper = upper.max(v);
            }
        }
        Interval::new(lower, upper)
    }

    /// Returns the midpoint of the interval
    pub fn midpoint(self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Calculates the width of the interval
    ///
    /// ```
    /// # use zerocurve::types::Interval;
    /// let a = Interval::new(2.0, 3.0);
    /// assert_eq!(a.width(), 1.0);
    /// ```
    pub fn width(self) -> f64 {
        self.upper - self.lower
    }

    /// Checks that the two values are roughly equal, panicking otherwise
    #[cfg(test)]
    pub(crate) fn compare_eq(&self, other: Self) {
        let d = (self.lower - other.lower)
            .abs()
            .max((self.upper - other.upper).abs());
        if d >= 1e-9 {
            panic!("lhs != rhs ({self:?} != {other:?})");
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

impl From<[f64; 2]> for Interval {
    fn from(i: [f64; 2]) -> Interval {
        Interval::new(i[0], i[1])
    }
}

impl From<f64> for Interval {
    fn from(f: f64) -> Self {
        Interval::new(f, f)
    }
}

impl std::ops::Add<Interval> for Interval {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Interval::from_bounds(self.lower + rhs.lower, self.upper + rhs.upper)
    }
}

impl std::ops::Sub<Interval> for Interval {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Interval::from_bounds(self.lower - rhs.upper, self.upper - rhs.lower)
    }
}

impl std::ops::Mul<Interval> for Interval {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.has_nan() || rhs.has_nan() {
            return f64::NAN.into();
        }
        Interval::corners(self, rhs, |a, b| a * b)
    }
}

impl std::ops::Neg for Interval {
    type Output = Self;
    fn neg(self) -> Self {
        Interval::from_bounds(-self.upper, -self.lower)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_interval_arith() {
        let a = Interval::new(1.0, 2.0);
        let b = Interval::new(-3.0, 5.0);
        assert_eq!(a + b, Interval::new(-2.0, 7.0));
        assert_eq!(a - b, Interval::new(-4.0, 5.0));
        assert_eq!(b - a, Interval::new(-5.0, 4.0));
        assert_eq!(a * b, Interval::new(-6.0, 10.0));
        assert_eq!(-b, Interval::new(-5.0, 3.0));
    }

    #[test]
    fn test_interval_abs() {
        assert_eq!(Interval::new(0.0, 1.0).abs(), Interval::new(0.0, 1.0));
        assert_eq!(Interval::new(-2.0, 5.0).abs(), Interval::new(0.0, 5.0));
        assert_eq!(Interval::new(-6.0, 5.0).abs(), Interval::new(0.0, 6.0));
        assert_eq!(Interval::new(-6.0, -1.0).abs(), Interval::new(1.0, 6.0));
    }

    #[test]
    fn test_interval_div() {
        let one = Interval::from(1.0);
        assert_eq!(
            one.checked_div(Interval::new(-1.0, 1.0)),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            one.checked_div(Interval::new(1e-12, 1.0)),
            Err(Fault::DivisionByZero)
        );
        one.checked_div(Interval::new(2.0, 3.0))
            .unwrap()
            .compare_eq(Interval::new(1.0 / 3.0, 0.5));
        Interval::new(-4.0, 2.0)
            .checked_div(Interval::new(-2.0, -1.0))
            .unwrap()
            .compare_eq(Interval::new(-2.0, 4.0));
    }

    #[test]
    fn test_interval_pow() {
        let two = Interval::from(2.0);
        let p = |a: f64, b: f64| Interval::new(a, b);

        assert_eq!(p(2.0, 3.0).pow(two), Ok(p(4.0, 9.0)));
        assert_eq!(p(-1.0, 1.0).pow(two), Ok(p(0.0, 1.0)));
        assert_eq!(p(-3.0, 2.0).pow(two), Ok(p(0.0, 9.0)));
        assert_eq!(p(-3.0, -2.0).pow(two), Ok(p(4.0, 9.0)));
        assert_eq!(p(-3.0, -2.0).pow(3.0.into()), Ok(p(-27.0, -8.0)));
        assert_eq!(p(-2.0, 1.0).pow(3.0.into()), Ok(p(-8.0, 1.0)));
        assert_eq!(
            p(-2.0, -2.0).pow(0.5.into()),
            Err(Fault::NonIntegerExponent)
        );
        assert_eq!(
            p(-2.0, -2.0).pow(p(1.0, 2.0)),
            Err(Fault::NonIntegerExponent)
        );
        assert_eq!(
            p(-2.0, 1.0).pow((-1.0).into()),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            p(-3.0, 0.0).pow((-1.0).into()),
            Err(Fault::DivisionByZero)
        );
        assert_eq!(
            p(0.0, 2.0).pow(p(-1.0, 1.0)),
            Err(Fault::DivisionByZero)
        );

        // Non-negative base with a range of exponents
        assert_eq!(p(0.5, 2.0).pow(p(1.0, 2.0)), Ok(p(0.25, 4.0)));
        assert_eq!(p(4.0, 4.0).pow(0.5.into()), Ok(p(2.0, 2.0)));
        assert_eq!(p(2.0, 4.0).pow((-1.0).into()), Ok(p(0.25, 0.5)));
    }

    #[test]
    fn test_is_zero() {
        assert!(Interval::from(0.0).is_zero());
        assert!(Interval::new(-1.0, -1e-10).is_zero());
        assert!(!Interval::new(-1.0, -1e-3).is_zero());
        assert!(!Interval::from(f64::NAN).is_zero());
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(Interval::from(3.0).as_integer(), Some(3.0));
        assert_eq!(Interval::from(3.0 + 1e-12).as_integer(), Some(3.0));
        assert_eq!(Interval::from(2.5).as_integer(), None);
        assert_eq!(Interval::new(2.0, 3.0).as_integer(), None);
    }

    #[test]
    fn test_nan_propagation() {
        let inf = Interval::from(f64::INFINITY);
        assert!((inf - inf).has_nan());
        assert!((Interval::from(0.0) * inf).has_nan());
    }
}
