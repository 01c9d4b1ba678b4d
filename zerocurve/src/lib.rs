//! `zerocurve` draws implicit curves: given a formula `f(x, y)`, it finds the
//! set of points in a region of the plane where `f(x, y) = 0`, and rasterizes
//! that set into an image.
//!
//! Rather than sampling `f` at pixel centers (which misses thin or tangent
//! features), each pixel is evaluated over the entire rectangle it covers,
//! using [interval arithmetic](crate::types::Interval).  If the resulting
//! interval contains zero, the curve may pass through that pixel; if it
//! doesn't, the curve definitely does not.
//!
//! # Formulas
//! Formulas are written in a small language: numbers, single-letter variables,
//! `+ - * / ^`, parentheses, and `|absolute value|`.  Multiplication may be
//! implicit, so `2x(y + 1)` is valid.  See the [`parse`] module for the full
//! grammar.
//!
//! ```
//! use zerocurve::{context::Expr, parse::parse};
//!
//! let e = parse("x^2 + y^2 - 4")?;
//! assert_eq!(e, Expr::x().pow(2.0) + Expr::y().pow(2.0) - 4.0);
//! # Ok::<(), zerocurve::Error>(())
//! ```
//!
//! # Compilation and evaluation
//! An expression tree is [compiled](crate::compiler::compile) into bytecode for
//! a small stack machine, which evaluates it over intervals.  A compiled
//! [`Program`](crate::vm::Program) is immutable and cheap to clone; each thread
//! evaluates it using its own [`VmContext`](crate::vm::VmContext).
//!
//! ```
//! use zerocurve::{types::Interval, var::Var, vm::Program};
//!
//! let p = Program::from_text("x^2 + y^2 - 4")?;
//! let mut ctx = p.new_context();
//! ctx.set_var(Var::X, Interval::new(1.0, 2.0));
//! ctx.set_var(Var::Y, Interval::new(0.0, 1.0));
//! let r = p.execute(&mut ctx)?;
//! assert_eq!(r, Interval::new(-3.0, 1.0));
//! assert!(r.is_zero()); // the circle passes through this rectangle
//! # Ok::<(), zerocurve::Error>(())
//! ```
//!
//! # Rendering
//! The [`render`] module splits an image into horizontal bands and evaluates
//! them in parallel.  Any type implementing [`eval::Function`] can be
//! rendered; besides the bytecode VM, [`eval::Predicate`] wraps a native
//! point test.
//!
//! ```
//! use zerocurve::{
//!     render::{ImageSize, Pixel, Region, RenderConfig},
//!     vm::Program,
//! };
//!
//! let p = Program::from_text("x^2 + y^2 - 9")?;
//! let cfg = RenderConfig {
//!     region: Region::from_corners(-4.0, -4.0, 4.0, 4.0),
//!     image_size: ImageSize::from(16),
//!     ..Default::default()
//! };
//! let image = cfg.run(&p)?;
//! for row in image.pixels().chunks(image.width()) {
//!     for p in row {
//!         print!("{}", if *p == Pixel::Curve { "XX" } else { "  " });
//!     }
//!     println!();
//! }
//!
//! // This will print
//! //
//! //               XXXX
//! //         XXXXXXXXXXXXXXXX
//! //       XXXX            XXXX
//! //     XXXX                XXXX
//! //     XX                    XX
//! //     XX                    XX
//! //   XXXX                    XXXX
//! //   XXXX                    XXXX
//! //     XX                    XX
//! //     XX                    XX
//! //     XXXX                XXXX
//! //       XXXX            XXXX
//! //         XXXXXXXXXXXXXXXX
//! //               XXXX
//! //
//! # Ok::<(), zerocurve::Error>(())
//! ```
//!
//! # Feature flags
#![doc = document_features::document_features!()]
#![warn(missing_docs)]

pub mod compiler;
pub mod context;
pub mod eval;
pub mod parse;
pub mod render;
pub mod script;
pub mod types;
pub mod var;
pub mod vm;

mod error;
pub use error::{Error, Fault};
