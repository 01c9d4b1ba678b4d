use crate::{
    Error,
    eval::Function,
    render::{Bitmap, render},
    types::Interval,
};
use nalgebra::{Point2, Vector2};
use std::num::NonZeroUsize;

/// Number of threads to use during rendering
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ThreadCount {
    /// Perform all evaluation in the calling thread, not spawning any workers
    One,

    /// Split the image into this many bands, rendered by a pool of workers
    Many(NonZeroUsize),
}

impl From<NonZeroUsize> for ThreadCount {
    fn from(v: NonZeroUsize) -> Self {
        match v.get() {
            1 => ThreadCount::One,
            _ => ThreadCount::Many(v),
        }
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = std::num::TryFromIntError;
    fn try_from(v: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::try_from(v).map(ThreadCount::from)
    }
}

/// Single-threaded mode is shown as `-`; otherwise, an integer
impl std::fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadCount::One => write!(f, "-"),
            ThreadCount::Many(n) => write!(f, "{n}"),
        }
    }
}

impl ThreadCount {
    /// Gets the number of bands that the image is split into
    pub fn get(&self) -> usize {
        match self {
            ThreadCount::One => 1,
            ThreadCount::Many(v) => v.get(),
        }
    }
}

impl Default for ThreadCount {
    /// Uses the available hardware parallelism, or two threads if unknown
    fn default() -> Self {
        match std::thread::available_parallelism() {
            Ok(n) => n.into(),
            Err(..) => ThreadCount::Many(NonZeroUsize::MIN.saturating_add(1)),
        }
    }
}

/// Direction of the Y axis in the output image
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum YAxis {
    /// Row 0 of the image is the top (maximum Y) edge of the region
    #[default]
    Up,
    /// Row 0 of the image is the bottom (minimum Y) edge of the region
    Down,
}

/// Axis-aligned rectangle in formula coordinates
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    min: Point2<f64>,
    max: Point2<f64>,
}

impl Default for Region {
    /// Returns the rectangle `[-10, 10] × [-10, 10]`
    fn default() -> Self {
        Self::new(Point2::new(-10.0, -10.0), Point2::new(10.0, 10.0))
    }
}

impl Region {
    /// Builds a region from two opposite corners, in any order
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Builds a region from the corners `(x1, y1)` and `(x2, y2)`
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    /// Returns the lower-left corner
    pub fn min(&self) -> Point2<f64> {
        self.min
    }

    /// Returns the upper-right corner
    pub fn max(&self) -> Point2<f64> {
        self.max
    }

    /// Returns the region's width and height
    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }

    /// Checks that every coordinate, and the region's size, is finite
    ///
    /// Corners near `±f64::MAX` are finite on their own but overflow when
    /// subtracted, which would leave pixel bounds infinite or NaN.
    pub fn is_finite(&self) -> bool {
        self.min
            .iter()
            .chain(self.max.iter())
            .chain(self.size().iter())
            .all(|v| v.is_finite())
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}] × [{}, {}]",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

/// Image size in pixels
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    /// Builds a new image size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    /// Returns the width of the image, in pixels
    pub fn width(&self) -> u32 {
        self.width
    }
    /// Returns the height of the image, in pixels
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Builds a square image
impl From<u32> for ImageSize {
    fn from(size: u32) -> Self {
        Self::new(size, size)
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

/// Settings for 2D rendering
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Region of the plane to render
    pub region: Region,

    /// Render size
    pub image_size: ImageSize,

    /// Number of worker threads
    pub threads: ThreadCount,

    /// Direction of the Y axis
    pub y_axis: YAxis,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            image_size: ImageSize::from(512),
            threads: ThreadCount::default(),
            y_axis: YAxis::default(),
        }
    }
}

impl RenderConfig {
    /// Renders a function using this configuration
    pub fn run<F: Function>(&self, f: &F) -> Result<Bitmap, Error> {
        render(f, self)
    }

    /// Returns the size of a single pixel, in formula units
    pub fn pixel_size(&self) -> Vector2<f64> {
        let s = self.region.size();
        Vector2::new(
            s.x / f64::from(self.image_size.width),
            s.y / f64::from(self.image_size.height),
        )
    }

    /// Returns the rectangle covered by the pixel at column `px`, row `py`
    ///
    /// Coordinates are computed from the global pixel position, so the result
    /// doesn't depend on how the image was split between workers.
    pub fn pixel_rect(&self, px: usize, py: usize) -> (Interval, Interval) {
        let d = self.pixel_size();
        let min = self.region.min;
        let (px, py) = (px as f64, py as f64);
        let x = Interval::new(min.x + px * d.x, min.x + (px + 1.0) * d.x);
        let y = match self.y_axis {
            YAxis::Down => {
                Interval::new(min.y + py * d.y, min.y + (py + 1.0) * d.y)
            }
            YAxis::Up => {
                let top = self.region.max.y;
                Interval::new(top - (py + 1.0) * d.y, top - py * d.y)
            }
        };
        (x, y)
    }
}
