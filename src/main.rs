use clap::Parser;
use log::{error, info};
use soft_rasterizer::app;
use soft_rasterizer::io::config::Config;
use soft_rasterizer::pipeline::shaders::phong::ShadingMode;
use std::path::PathBuf;
use std::process::ExitCode;

/// Headless CPU triangle rasterizer.
#[derive(Parser, Debug)]
#[command(name = "soft-rasterizer", version, about)]
struct Cli {
    /// Scene configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long)]
    frames: Option<usize>,

    /// Output image; the format follows the extension
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Initial shading mode
    #[arg(long, value_enum)]
    shading_mode: Option<ShadingMode>,

    /// Visualize the depth buffer instead of shading
    #[arg(long)]
    depth: bool,

    /// Keep meshes still
    #[arg(long)]
    no_rotate: bool,

    /// Ignore normal maps
    #[arg(long)]
    no_normal_map: bool,

    /// Rasterize on a single thread
    #[arg(long)]
    sequential: bool,
}

impl Cli {
    fn load_config(&self) -> soft_rasterizer::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config file: {:?}", path);
                Config::load(path)?
            }
            None => {
                info!("No config file given; using defaults");
                Config::default()
            }
        };

        if let Some(frames) = self.frames {
            config.render.frames = frames;
        }
        if let Some(output) = &self.output {
            config.render.output = output.to_string_lossy().into_owned();
        }
        if let Some(mode) = self.shading_mode {
            config.shading.mode = mode;
        }
        config.shading.depth_visualization |= self.depth;
        config.shading.rotating &= !self.no_rotate;
        config.shading.normal_mapping &= !self.no_normal_map;
        config.render.parallel &= !self.sequential;

        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let result = cli.load_config().and_then(|config| app::run(&config));

    match result {
        Ok(path) => {
            info!("Done: {:?}", path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
