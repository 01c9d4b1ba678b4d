//! 2D rasterization of implicit curves
//!
//! The main entry point is [`render`] (or equivalently
//! [`RenderConfig::run`]), which classifies every pixel of an image as on or
//! off the curve `f(x, y) = 0`.
//!
//! ```
//! use zerocurve::{
//!     render::{ImageSize, Pixel, RenderConfig, ThreadCount},
//!     vm::Program,
//! };
//!
//! let p = Program::from_text("x^2 + y^2 - 25")?;
//! let cfg = RenderConfig {
//!     image_size: ImageSize::from(32),
//!     threads: ThreadCount::One,
//!     ..Default::default()
//! };
//! let image = cfg.run(&p)?;
//! assert!(image.count(Pixel::Curve) > 0);
//! assert_eq!(image.count(Pixel::Incomplete), 0);
//! # Ok::<(), zerocurve::Error>(())
//! ```
mod bitmap;
mod config;
mod render2d;

pub use bitmap::{Bitmap, Pixel};
pub use config::{ImageSize, Region, RenderConfig, ThreadCount, YAxis};
pub use render2d::{bands, render};
