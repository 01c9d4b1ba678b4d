use super::Function;
use crate::{Fault, types::Interval};

/// Native point test, usable wherever a [`Function`] is expected
///
/// The wrapped closure is called once per pixel, at the center of the pixel's
/// rectangle.  `true` means the point is on the curve, and is reported as the
/// interval `[0, 0]`; `false` is reported as `[1, 1]`.
///
/// Unlike the interval VM, this backend samples a single point, so thin
/// features between sample points may be missed.
///
/// ```
/// # use zerocurve::{eval::{Function, Predicate}, types::Interval};
/// let f = Predicate::new(|x, y| x * x + y * y <= 1.0);
/// let mut ctx = f.new_context();
/// let r = f.eval_xy(&mut ctx, Interval::new(-0.1, 0.1), 0.0.into())?;
/// assert!(r.is_zero());
/// # Ok::<(), zerocurve::Fault>(())
/// ```
#[derive(Clone)]
pub struct Predicate<F>(F);

impl<F: Fn(f64, f64) -> bool + Sync> Predicate<F> {
    /// Wraps a point test
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F: Fn(f64, f64) -> bool + Sync> Function for Predicate<F> {
    type Context = ();

    fn new_context(&self) -> Self::Context {}

    fn eval_xy(
        &self,
        _ctx: &mut Self::Context,
        x: Interval,
        y: Interval,
    ) -> Result<Interval, Fault> {
        let v = if (self.0)(x.midpoint(), y.midpoint()) {
            0.0
        } else {
            1.0
        };
        Ok(Interval::from(v))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn predicate_midpoint() {
        let f = Predicate::new(|x, y| x > 0.0 && y < 0.0);
        let y = Interval::new(-2.0, 1.0);
        let r = f.eval_xy(&mut (), Interval::new(-1.0, 3.0), y).unwrap();
        assert_eq!(r, Interval::from(0.0));

        let r = f.eval_xy(&mut (), Interval::new(-3.0, 1.0), y).unwrap();
        assert_eq!(r, Interval::from(1.0));
        assert!(!r.is_zero());
    }
}
