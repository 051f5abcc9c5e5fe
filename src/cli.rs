// cli.rs - Command-line interface configuration
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoScene {
    /// Palette-cycled plasma in 8-bit indexed mode
    Plasma,
    /// Bouncing box writing true-color pixels directly
    Bounce,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "pixel-hall")]
#[command(about = "Fixed-tick pixel presentation demo", long_about = None)]
pub struct Cli {
    /// Window width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Start in borderless fullscreen
    #[arg(long, default_value = "false")]
    pub fullscreen: bool,

    /// Demo scene to run
    #[arg(long, value_enum, default_value_t = DemoScene::Plasma)]
    pub scene: DemoScene,

    /// Simulation tick period in milliseconds
    #[arg(long = "tick-ms", default_value_t = 30)]
    pub tick_ms: u32,
}
