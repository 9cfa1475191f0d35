//! Application entry point for the snowflake viewer.
//!
//! Parses startup parameters, sets up logging, starts the OSC color
//! listener and hands the seeded simulation to [`Viewer`].

mod osc;
mod viewer;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snow_core::{Channel, ColorState, Config, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

use osc::{OscListener, OscRouter};
use viewer::Viewer;

/// Default OSC input port.
const DEFAULT_OSC_PORT: u16 = 57110;

#[derive(Parser, Debug)]
#[command(name = "snowflake")]
#[command(about = "Grow a symmetric DLA snowflake, tinted live over OSC")]
struct Cli {
    /// Lattice width in pixels
    #[arg(long, default_value_t = 600)]
    width: usize,

    /// Lattice height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Symmetric arms (even, at least 2)
    #[arg(long, default_value_t = 12)]
    arms: usize,

    /// Random-walk trials per frame
    #[arg(long, default_value_t = 2)]
    steps_per_frame: usize,

    /// Frames to grow before halting
    #[arg(long, default_value_t = 500)]
    max_frames: u32,

    /// Fraction of each arm's sector walkers launch from (0..=1)
    #[arg(long, default_value_t = 1.0)]
    petal_sweep: f32,

    /// Chance that each seed-band column starts crystallized (0..=1)
    #[arg(long, default_value_t = 0.25)]
    seed_probability: f64,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// UDP port for OSC color input
    #[arg(long, default_value_t = DEFAULT_OSC_PORT)]
    osc_port: u16,

    /// OSC address driving the red channel
    #[arg(long, default_value = "/red")]
    red_address: String,

    /// OSC address driving the green channel
    #[arg(long, default_value = "/green")]
    green_address: String,

    /// OSC address driving the blue channel
    #[arg(long, default_value = "/blue")]
    blue_address: String,

    /// Log every incoming OSC message
    #[arg(long)]
    show_messages: bool,

    /// Do not open the OSC socket
    #[arg(long)]
    no_osc: bool,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            width: self.width,
            height: self.height,
            arm_count: self.arms,
            steps_per_frame: self.steps_per_frame,
            max_frames: self.max_frames,
            petal_sweep: self.petal_sweep,
            seed_probability: self.seed_probability,
        }
    }

    fn router(&self, color: ColorState) -> OscRouter {
        let mut router = OscRouter::new(color);
        router
            .on_input(self.red_address.as_str(), Channel::Red)
            .on_input(self.green_address.as_str(), Channel::Green)
            .on_input(self.blue_address.as_str(), Channel::Blue);
        router
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = cli.config();
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(?cfg, seed, "starting snowflake");

    let color = ColorState::default();
    let sim = Simulation::with_color(cfg, StdRng::seed_from_u64(seed), color.clone())
        .context("invalid configuration")?;

    let osc = if cli.no_osc {
        None
    } else {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, cli.osc_port));
        let listener = OscListener::spawn(addr, cli.router(color), cli.show_messages)
            .with_context(|| format!("failed to open OSC port {}", cli.osc_port))?;
        Some(listener)
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cfg.width as f32 + 220.0, cfg.height as f32 + 60.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Snowflake",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(sim, osc)))),
    )
    .map_err(|err| anyhow!("viewer failed: {err}"))
}
