//! Band-parallel 2D rasterization
use super::{Bitmap, Pixel, RenderConfig, ThreadCount};
use crate::{Error, eval::Function};
use std::{ops::Range, sync::OnceLock};

/// Splits `height` rows into `count` contiguous bands
///
/// Band `i` covers rows `i * height / count .. (i + 1) * height / count`, so
/// the bands exactly tile the image with sizes differing by at most one row.
/// `count` is clamped to `1..=height`, so no band is empty (unless the image
/// itself is).
///
/// ```
/// # use zerocurve::render::bands;
/// assert_eq!(bands(10, 3), [0..3, 3..6, 6..10]);
/// assert_eq!(bands(2, 8), [0..1, 1..2]);
/// ```
pub fn bands(height: usize, count: usize) -> Vec<Range<usize>> {
    let count = count.clamp(1, height.max(1));
    (0..count)
        .map(|i| i * height / count..(i + 1) * height / count)
        .collect()
}

/// Renders a function into a bitmap
///
/// Each pixel is evaluated over the full rectangle it covers, so a curve
/// passing anywhere through the pixel is never missed.  The image is split
/// into horizontal bands, one per thread; every band gets its own evaluation
/// context and writes only to its own rows.
///
/// If evaluation faults, the offending pixel is left
/// [`Incomplete`](Pixel::Incomplete) and the remaining work still runs to
/// completion; the first fault recorded is then returned as
/// [`Error::FaultAt`] instead of the image.
pub fn render<F: Function>(
    f: &F,
    config: &RenderConfig,
) -> Result<Bitmap, Error> {
    let (width, height) =
        (config.image_size.width(), config.image_size.height());
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage(width, height));
    }
    if !config.region.is_finite() {
        return Err(Error::NonFiniteRegion);
    }
    let width = width as usize;
    let height = height as usize;

    let mut image = Bitmap::new(width, height);
    let first_fault = OnceLock::new();

    match config.threads {
        ThreadCount::One => {
            render_band(f, config, 0..height, image.pixels_mut(), &first_fault)
        }
        ThreadCount::Many(n) => {
            let bands = bands(height, n.get());
            log::debug!("rendering {} bands on {n} threads", bands.len());
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n.get())
                .build()?;
            let first_fault = &first_fault;
            pool.scope(|s| {
                let mut rest = image.pixels_mut();
                for band in bands {
                    let (pixels, tail) = std::mem::take(&mut rest)
                        .split_at_mut(band.len() * width);
                    rest = tail;
                    s.spawn(move |_| {
                        render_band(f, config, band, pixels, first_fault)
                    });
                }
            });
        }
    }

    match first_fault.into_inner() {
        Some(e) => Err(e),
        None => Ok(image),
    }
}

/// Renders the given rows into `out`, which holds exactly those rows
fn render_band<F: Function>(
    f: &F,
    config: &RenderConfig,
    rows: Range<usize>,
    out: &mut [Pixel],
    first_fault: &OnceLock<Error>,
) {
    let width = config.image_size.width() as usize;
    let mut ctx = f.new_context();
    'rows: for (py, row) in rows.clone().zip(out.chunks_exact_mut(width)) {
        for (px, pixel) in row.iter_mut().enumerate() {
            let (x, y) = config.pixel_rect(px, py);
            match f.eval_xy(&mut ctx, x, y) {
                // NaN results can't be classified, so stay incomplete
                Ok(v) if v.has_nan() => (),
                Ok(v) if v.is_zero() => *pixel = Pixel::Curve,
                Ok(..) => *pixel = Pixel::Empty,
                Err(fault) => {
                    let _ = first_fault.set(Error::FaultAt {
                        fault,
                        x: x.lower(),
                        y: y.lower(),
                    });
                    if !fault.is_arithmetic() {
                        break 'rows;
                    }
                }
            }
        }
    }
    log::debug!("finished rows {}..{}", rows.start, rows.end);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        Fault,
        eval::Predicate,
        render::{ImageSize, Region, YAxis},
        vm::Program,
    };
    use std::num::NonZeroUsize;

    fn config(size: u32, threads: usize) -> RenderConfig {
        RenderConfig {
            region: Region::from_corners(-4.0, -4.0, 4.0, 4.0),
            image_size: ImageSize::from(size),
            threads: NonZeroUsize::new(threads).unwrap().into(),
            y_axis: YAxis::Up,
        }
    }

    fn render_and_compare(text: &str, cfg: &RenderConfig, expected: &str) {
        let p = Program::from_text(text).unwrap();
        let out = render(&p, cfg).unwrap().to_ascii();
        let expected = expected.trim_start_matches('\n');
        if out != expected {
            panic!(
                "image mismatch detected!\n\
                 Expected:\n{expected}\nGot:\n{out}"
            );
        }
    }

    #[test]
    fn band_coverage() {
        for height in 1..=40 {
            for count in 1..=height {
                let b = bands(height, count);
                assert_eq!(b.len(), count);
                assert_eq!(b[0].start, 0);
                assert_eq!(b[count - 1].end, height);
                for w in b.windows(2) {
                    assert_eq!(w[0].end, w[1].start);
                }
                assert!(b.iter().all(|r| !r.is_empty()));
            }
            assert_eq!(bands(height, height + 5).len(), height);
        }
        assert_eq!(bands(5, 0), [0..5]);
    }

    #[test]
    fn render_diagonal() {
        const EXPECTED: &str = "
......XX
.....XXX
....XXX.
...XXX..
..XXX...
.XXX....
XXX.....
XX......
";
        for threads in [1, 3, 8] {
            render_and_compare("y - x", &config(8, threads), EXPECTED);
        }
    }

    #[test]
    fn render_y_down() {
        const EXPECTED: &str = "
XX......
XXX.....
.XXX....
..XXX...
...XXX..
....XXX.
.....XXX
......XX
";
        let mut cfg = config(8, 2);
        cfg.y_axis = YAxis::Down;
        render_and_compare("y - x", &cfg, EXPECTED);
    }

    #[test]
    fn render_deterministic() {
        let p = Program::from_text("x^2 + y^2 - 9 + |x y| / 4").unwrap();
        let base = render(&p, &config(61, 1)).unwrap();
        assert!(base.count(Pixel::Curve) > 0);
        assert_eq!(base.count(Pixel::Incomplete), 0);
        for threads in [2, 3, 7, 61, 100] {
            let out = render(&p, &config(61, threads)).unwrap();
            assert_eq!(out, base, "mismatch with {threads} threads");
        }
    }

    #[test]
    fn render_fault() {
        let p = Program::from_text("1/x").unwrap();
        let err = render(&p, &config(8, 1)).unwrap_err();
        match err {
            Error::FaultAt { fault, x, y } => {
                assert_eq!(fault, Fault::DivisionByZero);
                assert_eq!((x, y), (-1.0, 3.0));
            }
            e => panic!("unexpected error {e:?}"),
        }

        let err = render(&p, &config(8, 4)).unwrap_err();
        assert_eq!(err.fault(), Some(Fault::DivisionByZero));
        let msg = err.to_string();
        assert!(msg.starts_with("division by zero\nPoint: ("), "{msg}");
    }

    #[test]
    fn render_empty() {
        let p = Program::from_text("x").unwrap();
        let mut cfg = config(8, 1);
        cfg.image_size = ImageSize::new(0, 8);
        assert!(matches!(render(&p, &cfg), Err(Error::EmptyImage(0, 8))));

        let mut cfg = config(8, 1);
        cfg.region = Region::from_corners(0.0, 0.0, f64::NAN, 1.0);
        assert!(matches!(render(&p, &cfg), Err(Error::NonFiniteRegion)));

        // Finite corners whose span overflows
        cfg.region = Region::from_corners(-1e308, -1e308, 1e308, 1e308);
        assert!(matches!(render(&p, &cfg), Err(Error::NonFiniteRegion)));
    }

    #[test]
    fn render_predicate() {
        // Filled disk of radius 2, sampled at pixel centers
        let f = Predicate::new(|x, y| x * x + y * y <= 4.0);
        let out = render(&f, &config(8, 2)).unwrap();
        const EXPECTED: &str = "
........
........
...XX...
..XXXX..
..XXXX..
...XX...
........
........
";
        assert_eq!(out.to_ascii(), EXPECTED.trim_start_matches('\n'));
    }

    #[test]
    fn render_nan_is_incomplete() {
        // Overflows to infinity, then multiplies by zero
        let p = Program::from_text("x * 1e308 * 1e308 * 0").unwrap();
        let out = render(&p, &config(4, 1)).unwrap();
        assert_eq!(out.count(Pixel::Incomplete), 16);
    }
}
