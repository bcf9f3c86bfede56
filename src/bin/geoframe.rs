use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use colored::Colorize;
use geoframe::{
    DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIRECTORY, ExportOptions, ExportReport, FfmpegLogLevel,
    GeoSample, Geotagger, ProgressCallback, ProgressInfo, RunPlan,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};

const CLI_AFTER_HELP: &str = "Examples:\n  geoframe DJI_0001.SRT DJI_0001.MP4\n  geoframe DJI_0001.SRT DJI_0001.MP4 2.5 --out frames --quality 90 --progress\n  geoframe DJI_0001.SRT DJI_0001.MP4 --dry-run --json";

#[derive(Debug, Parser)]
#[command(
    name = "geoframe",
    version,
    about = "Extract geotagged still frames from drone video using its SRT telemetry log",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Telemetry log (.SRT) recorded alongside the video.
    telemetry: PathBuf,

    /// Video file to extract frames from.
    video: PathBuf,

    /// Seconds of video between exported frames (fractions allowed).
    #[arg(default_value_t = geoframe::DEFAULT_INTERVAL_SECONDS)]
    interval: f64,

    /// Output directory for the geotagged images.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIRECTORY)]
    out: PathBuf,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Print the frames that would be exported without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print a machine-readable JSON summary.
    #[arg(long)]
    json: bool,

    /// Show a progress bar while exporting.
    #[arg(long)]
    progress: bool,

    /// Show debug logging output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<FfmpegLogLevel>,
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} frames ({eta}) {msg}")
        {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.total);
        self.bar.set_position(info.current);
        if !info.succeeded {
            self.bar.set_message(format!("frame {} failed", info.frame_index));
        }
        if info.current >= info.total {
            self.bar.finish_and_clear();
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.progress {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn sample_json(sample: &GeoSample) -> Value {
    json!({
        "frame_index": sample.frame_index,
        "latitude": sample.latitude,
        "longitude": sample.longitude,
        "absolute_altitude": sample.absolute_altitude,
        "focal_length": sample.focal_length,
    })
}

fn plan_json(plan: &RunPlan) -> Value {
    json!({
        "frame_increment": plan.frame_increment,
        "telemetry_blocks": plan.telemetry_blocks,
        "video": {
            "width": plan.video.width,
            "height": plan.video.height,
            "fps": plan.video.frames_per_second,
            "frame_count": plan.video.frame_count,
            "codec": plan.video.codec,
        },
        "samples": plan.samples.iter().map(sample_json).collect::<Vec<_>>(),
    })
}

fn report_json(report: &ExportReport) -> Value {
    json!({
        "exported": report.exported.iter().map(|path| path.display().to_string()).collect::<Vec<_>>(),
        "failures": report.failures.iter().map(|failure| json!({
            "frame_index": failure.frame_index,
            "error": failure.error.to_string(),
        })).collect::<Vec<_>>(),
    })
}

fn print_plan(plan: &RunPlan) {
    println!(
        "Video: {}x{} @ {:.3} fps [{}], {} frames",
        plan.video.width,
        plan.video.height,
        plan.video.frames_per_second,
        plan.video.codec,
        plan.video.frame_count,
    );
    println!(
        "Telemetry: {} frames, sampling every {} frames",
        plan.telemetry_blocks, plan.frame_increment
    );
    for sample in &plan.samples {
        println!("{sample}");
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Some(level) = cli.log_level {
        geoframe::set_ffmpeg_log_level(level);
    }

    let options = ExportOptions::new()
        .with_output_directory(&cli.out)
        .with_jpeg_quality(cli.quality);

    if cli.dry_run {
        let plan = Geotagger::new(options).plan(&cli.telemetry, &cli.video, cli.interval)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&plan_json(&plan))?);
        } else {
            print_plan(&plan);
        }
        return Ok(());
    }

    let options = if cli.progress {
        options.with_progress(Arc::new(TerminalProgress::new()))
    } else {
        options
    };

    let summary = Geotagger::new(options).run(&cli.telemetry, &cli.video, cli.interval)?;

    for failure in &summary.report.failures {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("frame {}: {}", failure.frame_index, failure.error).yellow()
        );
    }

    if cli.json {
        let payload = json!({
            "plan": plan_json(&summary.plan),
            "report": report_json(&summary.report),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!(
            "{} {} of {} frames written to {}",
            "done:".green().bold(),
            summary.report.exported.len(),
            summary.plan.samples.len(),
            cli.out.display()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
