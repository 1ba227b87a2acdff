use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brushwork::models::PaintConfig;
use brushwork::services::{reference, PaintSession, Pattern, SessionReport};
use stroke_engine::{PixelBuffer, Position, Rgb};

/// Gray ramp used for the terminal preview, dark to light.
const PREVIEW_RAMP: &[u8] = b"@%#*+=-:. ";

/// Time limit for a demo run that has no other budget.
const DEMO_DEFAULT_SECONDS: f64 = 10.0;

#[derive(Parser)]
#[command(name = "brushwork")]
#[command(about = "Brushwork - approximate images with painted brush strokes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Paint a synthetic reference pattern and print a summary
    Demo {
        /// Reference pattern to paint
        #[arg(short, long, value_enum, default_value_t = Pattern::Gradient)]
        pattern: Pattern,

        /// Image width in pixels
        #[arg(long, default_value_t = 96)]
        width: usize,

        /// Image height in pixels
        #[arg(long, default_value_t = 64)]
        height: usize,

        /// YAML paint configuration (falls back to CONFIG_FILE, then defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed for stroke placement and the noise pattern
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many evaluated strokes
        #[arg(long)]
        max_iterations: Option<u64>,

        /// Stop after this many seconds (10 when no other limit is set)
        #[arg(long)]
        max_seconds: Option<f64>,

        /// Print every accepted stroke
        #[arg(long)]
        strokes: bool,

        /// Print a coarse text rendering of the reference and the result
        #[arg(long)]
        preview: bool,
    },
    /// Print the default configuration as YAML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Demo {
            pattern,
            width,
            height,
            config,
            seed,
            max_iterations,
            max_seconds,
            strokes,
            preview,
        }) => run_demo_command(DemoArgs {
            pattern,
            width,
            height,
            config,
            seed,
            max_iterations,
            max_seconds,
            strokes,
            preview,
        }),
        Some(Commands::Config) => {
            print!("{}", PaintConfig::default().to_yaml()?);
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

struct DemoArgs {
    pattern: Pattern,
    width: usize,
    height: usize,
    config: Option<PathBuf>,
    seed: Option<u64>,
    max_iterations: Option<u64>,
    max_seconds: Option<f64>,
    strokes: bool,
    preview: bool,
}

/// Command line flags win over the config file. A run without any limit
/// gets a time budget, since some patterns never reach the stop threshold.
fn apply_overrides(config: &mut PaintConfig, args: &DemoArgs) {
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.max_iterations.is_some() {
        config.budget.max_iterations = args.max_iterations;
    }
    if args.max_seconds.is_some() {
        config.budget.max_seconds = args.max_seconds;
    }
    if config.budget().is_unlimited() {
        tracing::info!(seconds = DEMO_DEFAULT_SECONDS, "No budget configured, limiting demo run");
        config.budget.max_seconds = Some(DEMO_DEFAULT_SECONDS);
    }
}

/// Paint a generated reference in memory (no image files involved)
fn run_demo_command(args: DemoArgs) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brushwork=info,stroke_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config_file = args
        .config
        .clone()
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
    let mut config = match config_file {
        Some(path) => PaintConfig::load(&path)?,
        None => PaintConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let reference = reference::render(args.pattern, args.width, args.height, config.seed.unwrap_or(0))?;
    if args.preview {
        println!("Reference:");
        print_preview(&reference);
    }

    let mut session = PaintSession::new(reference, &config)?.record_strokes(args.strokes);
    let report = session.run()?;

    print_summary(args.pattern, args.width, args.height, &report);
    if args.strokes {
        print_strokes(&report);
    }
    if args.preview {
        println!("\nResult:");
        print_preview(&session.into_canvas());
    }
    Ok(())
}

fn print_summary(pattern: Pattern, width: usize, height: usize, report: &SessionReport) {
    let paint = &report.paint;
    println!("Painted {pattern} {width}x{height}");
    println!("  Outcome     : {}", paint.outcome);
    println!(
        "  Strokes     : {} accepted, {} rejected, {} discarded",
        paint.accepted, paint.rejected, paint.discarded
    );
    println!(
        "  Error       : {} -> {} (stop at {:.0})",
        paint.initial_error, paint.final_error, paint.stop_threshold
    );
    println!("  Progress    : {:.1}%", paint.progress);
    println!("  Elapsed     : {:.2?}", report.elapsed);
}

fn print_strokes(report: &SessionReport) {
    println!("\nAccepted strokes:");
    for stroke in &report.strokes {
        let start = stroke.chain.first().center;
        let end = stroke.chain.last().center;
        println!(
            "  #{:<5} {} pivots ({},{}) -> ({},{}) width {:.1} color {} error {} -> {}",
            stroke.index,
            stroke.chain.len(),
            start.x,
            start.y,
            end.x,
            end.y,
            stroke.chain.width(),
            stroke.color,
            stroke.error_before,
            stroke.error_after
        );
    }
}

/// Print the image as text, at most 64 columns wide.
fn print_preview(image: &PixelBuffer<Rgb>) {
    let (width, height) = image.dimensions();
    let step = width.div_ceil(64).max(1);
    // Terminal cells are about twice as tall as wide
    for y in (0..height).step_by(step * 2) {
        let line: String = (0..width)
            .step_by(step)
            .map(|x| {
                let luma = image
                    .get(Position::new(x as i32, y as i32))
                    .map_or(0.0, |c| c.luma());
                let index = (luma / 256.0 * PREVIEW_RAMP.len() as f64) as usize;
                PREVIEW_RAMP[index.min(PREVIEW_RAMP.len() - 1)] as char
            })
            .collect();
        println!("  {line}");
    }
}

fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Brushwork v{VERSION}");
    println!("Approximate images with painted brush strokes\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG    = {}",
        std::env::var("RUST_LOG")
            .ok()
            .as_deref()
            .unwrap_or("brushwork=info,stroke_engine=info (default)")
    );

    println!("\nCommands:");
    println!("  brushwork demo --pattern rings   Paint a generated pattern");
    println!("  brushwork config                 Print the default configuration");
    println!("  brushwork --help                 Show all options");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn demo_args() -> DemoArgs {
        DemoArgs {
            pattern: Pattern::Stripes,
            width: 32,
            height: 32,
            config: None,
            seed: None,
            max_iterations: None,
            max_seconds: None,
            strokes: false,
            preview: false,
        }
    }

    #[test]
    fn test_demo_without_budget_gets_time_limit() {
        let mut config = PaintConfig::default();
        apply_overrides(&mut config, &demo_args());
        assert_eq!(
            config.budget().max_duration,
            Some(Duration::from_secs_f64(DEMO_DEFAULT_SECONDS))
        );
    }

    #[test]
    fn test_demo_keeps_explicit_budget() {
        let mut config = PaintConfig::default();
        let args = DemoArgs {
            max_iterations: Some(50),
            seed: Some(4),
            ..demo_args()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.budget.max_iterations, Some(50));
        assert_eq!(config.budget.max_seconds, None);
        assert_eq!(config.seed, Some(4));
    }

    #[test]
    fn test_demo_keeps_config_file_budget() {
        let mut config = PaintConfig::default();
        config.budget.max_candidates = Some(200);
        apply_overrides(&mut config, &demo_args());
        assert_eq!(config.budget.max_seconds, None);
    }
}
