use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use zerocurve::{
    compiler::{compile, compile_unoptimized},
    parse::parse,
    render::{ImageSize, Pixel, Region, RenderConfig, ThreadCount, YAxis},
    script::Script,
    types::Interval,
    var::Var,
    vm::Program,
};

/// Implicit curve plotter
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,

    /// Input script
    #[clap(short, long)]
    input: PathBuf,

    /// Compile without the peephole optimizer
    #[clap(long)]
    naive: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Rasterize the curve
    Render {
        #[clap(flatten)]
        settings: ImageSettings,
    },

    /// Print the compiled bytecode
    Dump,

    /// Evaluate the formula over a rectangle
    Eval {
        /// Value of `x`, as `v` or `lo,hi`
        #[clap(allow_hyphen_values = true, value_parser = parse_interval)]
        x: Interval,

        /// Value of `y`, as `v` or `lo,hi`
        #[clap(allow_hyphen_values = true, value_parser = parse_interval)]
        y: Interval,
    },
}

#[derive(Parser)]
struct ImageSettings {
    /// Name of a `.png` file to write
    #[clap(short, long)]
    out: Option<PathBuf>,

    /// Print the image to stdout as text
    #[clap(long)]
    ascii: bool,

    /// Number of threads to use
    #[clap(short, long)]
    threads: Option<NonZeroUsize>,

    /// Number of times to render (for benchmarking)
    #[clap(short = 'N', default_value_t = 1)]
    n: usize,

    /// Image size
    #[clap(short, long, default_value_t = 256)]
    size: u32,

    /// Region to render as `x1,y1,x2,y2`, overriding the script
    #[clap(
        long,
        num_args = 4,
        value_delimiter = ',',
        allow_hyphen_values = true
    )]
    region: Option<Vec<f64>>,

    /// Put row 0 at the bottom of the image
    #[clap(long)]
    y_down: bool,
}

fn parse_interval(s: &str) -> Result<Interval> {
    let mut parts = s.split(',').map(|p| p.trim().parse::<f64>());
    let out = match (parts.next(), parts.next(), parts.next()) {
        (Some(v), None, None) => Interval::from(v?),
        (Some(a), Some(b), None) => {
            let (a, b) = (a?, b?);
            if a.is_nan() || b.is_nan() {
                bail!("interval bounds must be numbers, got {s:?}");
            }
            Interval::new(a.min(b), a.max(b))
        }
        _ => bail!("expected `v` or `lo,hi`, got {s:?}"),
    };
    Ok(out)
}

fn build(script: &Script, naive: bool) -> Result<Program> {
    let expr = parse(&script.formula)?;
    let program = if naive {
        compile_unoptimized(&expr)
    } else {
        compile(&expr)
    };
    Ok(program)
}

fn run_render(
    script: &Script,
    program: &Program,
    settings: &ImageSettings,
) -> Result<()> {
    let region = match settings.region.as_deref() {
        Some(&[x1, y1, x2, y2]) => Region::from_corners(x1, y1, x2, y2),
        Some(r) => bail!("expected four region values, got {}", r.len()),
        None => script.region,
    };
    let cfg = RenderConfig {
        region,
        image_size: ImageSize::from(settings.size),
        threads: settings.threads.map(ThreadCount::from).unwrap_or_default(),
        y_axis: if settings.y_down { YAxis::Down } else { YAxis::Up },
    };
    info!(
        "Rendering {region} at {} with {} threads",
        cfg.image_size, cfg.threads
    );

    let start = Instant::now();
    let mut image = None;
    for _ in 0..settings.n {
        image = Some(cfg.run(program)?);
    }
    let Some(image) = image else {
        return Ok(());
    };
    info!(
        "Rendered {}x at {:?} ms/frame",
        settings.n,
        start.elapsed().as_micros() as f64 / 1000.0 / (settings.n as f64)
    );
    info!(
        "{} curve, {} empty, {} incomplete",
        image.count(Pixel::Curve),
        image.count(Pixel::Empty),
        image.count(Pixel::Incomplete),
    );

    if settings.ascii {
        print!("{}", image.to_ascii());
    }
    if let Some(out) = &settings.out {
        image::save_buffer(
            out,
            &image.to_rgb(),
            image.width() as u32,
            image.height() as u32,
            image::ColorType::Rgb8,
        )?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .init();

    let now = Instant::now();
    let args = Args::parse();
    let script = Script::load(&args.input)?;
    info!("Loaded file in {:?}", now.elapsed());

    let start = Instant::now();
    let program = build(&script, args.naive)?;
    info!(
        "Compiled {} instructions in {:?}",
        program.len(),
        start.elapsed()
    );

    match args.cmd {
        Command::Render { settings } => {
            run_render(&script, &program, &settings)?;
        }
        Command::Dump => print!("{program}"),
        Command::Eval { x, y } => {
            let mut ctx = program.new_context();
            ctx.set_var(Var::X, x);
            ctx.set_var(Var::Y, y);
            let r = program.execute(&mut ctx)?;
            println!("{r}");
            println!("contains zero: {}", r.is_zero());
        }
    }
    Ok(())
}
