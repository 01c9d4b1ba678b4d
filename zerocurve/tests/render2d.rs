use std::num::NonZeroUsize;

use zerocurve::{
    Error,
    render::{Bitmap, ImageSize, Pixel, RenderConfig, ThreadCount, YAxis},
    script::Script,
};

fn load(name: &str) -> Script {
    let path = format!("{}/../models/{name}", env!("CARGO_MANIFEST_DIR"));
    Script::load(path).unwrap()
}

fn render(script: &Script, size: u32, threads: ThreadCount) -> Bitmap {
    let cfg = RenderConfig {
        region: script.region,
        image_size: ImageSize::from(size),
        threads,
        y_axis: YAxis::Up,
    };
    cfg.run(&script.program().unwrap()).unwrap()
}

/// Returns the pixel containing the point `(x, y)`
fn pixel_at(script: &Script, size: u32, x: f64, y: f64) -> (usize, usize) {
    let min = script.region.min();
    let max = script.region.max();
    let s = script.region.size();
    let n = size as f64;
    let px = ((x - min.x) / s.x * n).floor().clamp(0.0, n - 1.0);
    let py = ((max.y - y) / s.y * n).floor().clamp(0.0, n - 1.0);
    (px as usize, py as usize)
}

#[test]
fn circle_is_not_missed() {
    let script = load("circle.txt");
    let image = render(&script, 64, ThreadCount::One);
    assert_eq!(image.count(Pixel::Incomplete), 0);

    for i in 0..1000 {
        let t = i as f64 / 1000.0 * std::f64::consts::TAU;
        let (x, y) = (5.0 * t.cos(), 5.0 * t.sin());
        let (px, py) = pixel_at(&script, 64, x, y);
        assert_eq!(
            image.get(px, py),
            Pixel::Curve,
            "missed ({x}, {y}) at pixel ({px}, {py})"
        );
    }

    // The center and corners are well away from the curve
    assert_eq!(image.get(32, 32), Pixel::Empty);
    assert_eq!(image.get(0, 0), Pixel::Empty);
    assert_eq!(image.get(63, 63), Pixel::Empty);
}

#[test]
fn diamond_with_fold() {
    let script = load("diamond.txt");
    let image = render(&script, 64, ThreadCount::One);
    assert_eq!(image.count(Pixel::Incomplete), 0);

    // |x| + |y| = 5 on the right, 2|x| + |y| = 5 on the left
    let points =
        [(5.0, 0.0), (2.0, 3.0), (0.0, -5.0), (-2.5, 0.0), (-1.0, 3.0)];
    for (x, y) in points {
        let (px, py) = pixel_at(&script, 64, x, y);
        assert_eq!(image.get(px, py), Pixel::Curve, "missed ({x}, {y})");
    }
    let (px, py) = pixel_at(&script, 64, -5.0, 0.0);
    assert_eq!(image.get(px, py), Pixel::Empty);
}

#[test]
fn models_are_deterministic() {
    for name in ["circle.txt", "heart.txt", "lemniscate.txt", "diamond.txt"] {
        let script = load(name);
        let base = render(&script, 97, ThreadCount::One);
        assert!(base.count(Pixel::Curve) > 0, "{name} is empty");
        for n in [2, 5, 16] {
            let threads = ThreadCount::Many(NonZeroUsize::new(n).unwrap());
            let out = render(&script, 97, threads);
            assert!(out == base, "{name} differs with {n} threads");
        }
    }
}

#[test]
fn lemniscate_crosses_origin() {
    let script = load("lemniscate.txt");
    let image = render(&script, 64, ThreadCount::One);
    let (px, py) = pixel_at(&script, 64, 0.0, 0.0);
    assert_eq!(image.get(px, py), Pixel::Curve);

    // Lobes end at x = ±√2
    let (px, py) = pixel_at(&script, 64, 2f64.sqrt(), 0.0);
    assert_eq!(image.get(px, py), Pixel::Curve);
    let (px, py) = pixel_at(&script, 64, 0.0, 1.5);
    assert_eq!(image.get(px, py), Pixel::Empty);
}

#[test]
fn script_errors() {
    let script = Script::from_text("# broken\nx + * y");
    match script.program() {
        Err(Error::Syntax { position, .. }) => assert_eq!(position, 4),
        r => panic!("expected syntax error, got {r:?}"),
    }

    let script = Script::from_text("#! 0 0 1 1\n1 / (x - 0.5)");
    let cfg = RenderConfig {
        region: script.region,
        image_size: ImageSize::from(4),
        ..Default::default()
    };
    let err = cfg.run(&script.program().unwrap()).unwrap_err();
    assert!(err.to_string().contains("\nPoint: ("), "{err}");
}
