//! media-view - play images and animations against a simulated UI clock.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use viewer::{build_registry, play_file, save_png, RendererKind, ViewerConfig};

/// media-view - decode images and animations and report playback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to play
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Format tag to use instead of the file extension
    #[arg(long)]
    format: Option<String>,

    /// Simulated playback time in milliseconds
    #[arg(long, default_value = "1000")]
    duration: u64,

    /// Redraw interval in milliseconds
    #[arg(long, default_value = "16")]
    tick: u64,

    /// Upload into wgpu textures instead of memory
    #[arg(long)]
    gpu: bool,

    /// Maximum decoded width and height
    #[arg(long)]
    max_size: Option<u32>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Write the last frame of the first file to a PNG
    #[arg(long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> ViewerConfig {
        let mut config = ViewerConfig::new().with_timing(self.duration, self.tick);
        if let Some(format) = &self.format {
            config = config.with_format(format);
        }
        if self.gpu {
            config = config.with_renderer(RendererKind::Gpu);
        }
        if let Some(size) = self.max_size {
            config = config.with_max_size(size);
        }
        if let Some(output) = &self.output {
            config = config.with_output(output.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("media-view v{}", viewer::VERSION);
    let config = args.config();
    let (registry, renderer) = build_registry(&config).await?;

    let mut reports = Vec::with_capacity(args.files.len());
    for (index, path) in args.files.iter().enumerate() {
        let playback = play_file(&registry, &renderer, path, &config);

        if index == 0 {
            if let Some(output) = &config.output {
                match &playback.last_frame {
                    Some(frame) => {
                        save_png(frame, output)?;
                        info!("Last frame saved to: {}", output.display());
                    }
                    None if !playback.report.loaded => {
                        warn!("{} did not load; nothing written", path.display())
                    }
                    None => warn!("--output needs the memory renderer; ignored with --gpu"),
                }
            }
        }

        if !args.json {
            println!("{}", playback.report.summary());
        }
        reports.push(playback.report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
