mod host;
mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use tvp_core::player::{Player, PlayerConfig};
use tvp_core::profile::{Profile, PROFILE_2BPP, PROFILE_4BPP};
use tvp_core::timing::VblankTicks;

use crate::host::{HostPlatform, Pacing};

#[derive(Parser)]
#[command(name = "tvp")]
#[command(version, about = "Tile video stream player", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a command/asset stream pair in real time
    Play {
        /// Path to the command stream
        commands: PathBuf,

        /// Path to the tile asset stream
        tiles: PathBuf,

        /// Build profile the streams were authored for
        #[arg(long, default_value = "2bpp")]
        profile: String,

        /// Ticks per second of the simulated vblank source
        #[arg(long, default_value_t = 75.47)]
        tick_rate: f64,

        /// Also write every presented frame as a PNG into this directory
        #[arg(long)]
        dump: Option<PathBuf>,
    },

    /// Decode the whole stream as fast as possible, writing PNGs
    Render {
        /// Path to the command stream
        commands: PathBuf,

        /// Path to the tile asset stream
        tiles: PathBuf,

        /// Build profile the streams were authored for
        #[arg(long, default_value = "2bpp")]
        profile: String,

        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,
    },
}

// One playback per process; the ticker thread holds the producing side.
static TICKS: VblankTicks = VblankTicks::new();

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            commands,
            tiles,
            profile,
            tick_rate,
            dump,
        } => {
            let profile = profile_by_name(&profile)?;
            let period = Duration::from_secs_f64(1.0 / tick_rate);
            let platform = build_platform(&commands, &tiles, profile, Pacing::RealTime(period), dump)?;

            thread::spawn(move || loop {
                thread::sleep(period);
                TICKS.raise();
            });

            play(profile, platform)
        }

        Commands::Render {
            commands,
            tiles,
            profile,
            out,
        } => {
            let profile = profile_by_name(&profile)?;
            let platform =
                build_platform(&commands, &tiles, profile, Pacing::FreeRun, Some(out))?;
            play(profile, platform)
        }
    }
}

fn play(profile: &'static Profile, platform: HostPlatform) -> Result<()> {
    let config = PlayerConfig {
        profile,
        ..PlayerConfig::default()
    };
    let mut player = Player::new(config, platform, &TICKS);
    player.run();
    info!("presented {} frames", player.frames_presented());
    Ok(())
}

fn build_platform(
    commands: &Path,
    tiles: &Path,
    profile: &'static Profile,
    pacing: Pacing,
    dump: Option<PathBuf>,
) -> Result<HostPlatform> {
    let command_bytes = fs::read(commands)
        .with_context(|| format!("reading command stream {}", commands.display()))?;
    let tile_bytes =
        fs::read(tiles).with_context(|| format!("reading tile asset stream {}", tiles.display()))?;

    if let Some(dir) = &dump {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    Ok(HostPlatform::new(
        profile,
        command_bytes,
        tile_bytes,
        pacing,
        &TICKS,
        dump,
    ))
}

fn profile_by_name(name: &str) -> Result<&'static Profile> {
    match name {
        "2bpp" => Ok(&PROFILE_2BPP),
        "4bpp" => Ok(&PROFILE_4BPP),
        _ => bail!("unknown profile: {name} (expected 2bpp or 4bpp)"),
    }
}
