use std::time::Duration;

use clap::Parser;

use crate::area::AreaLimits;
use crate::constants::{
    DEFAULT_MAGNET_PX, DEFAULT_MIN_AREA_HEIGHT, DEFAULT_THROTTLE_MS, DEFAULT_TICK_MS, MAX_AREAS,
};
use crate::error::ConfigError;
use crate::palette::Palette;
use crate::scene::SceneOptions;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "field-snap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drag and resize boxes that snap onto each other's edges",
    after_help = indoc::indoc! {"
        Mouse:
          drag inside an area    move it
          drag its border        resize from that side or corner

        Keys:
          q, Ctrl+C              quit
          r                      new scene
          d                      toggle the debug log
          PageUp, PageDown       scroll the debug log
    "}
)]
pub struct Cli {
    /// Number of areas to place. Asked for interactively when omitted.
    #[arg(short = 'n', long = "areas", value_name = "N")]
    pub areas: Option<usize>,

    /// Color palette: random, red, orange, yellow, green, blue, purple, pink or monochrome.
    #[arg(short = 'p', long = "palette", value_name = "NAME")]
    pub palette: Option<String>,

    /// Snap distance in terminal cells.
    #[arg(long = "magnet", value_name = "PX", default_value_t = DEFAULT_MAGNET_PX)]
    pub magnet_px: f64,

    /// Smallest width and height an area can be resized to, in percent.
    #[arg(long = "min-size", value_name = "PERCENT", default_value_t = DEFAULT_MIN_AREA_HEIGHT)]
    pub min_size: f64,

    /// Cooldown between two applied pointer moves.
    #[arg(long = "throttle-ms", value_name = "MS", default_value_t = DEFAULT_THROTTLE_MS)]
    pub throttle_ms: u64,

    /// Idle poll interval of the event loop.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Seed for scene generation, for repeatable layouts.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Open the debug log panel on start.
    #[arg(long = "debug-log")]
    pub debug_log: bool,
}

/// Validated runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapConfig {
    pub areas: Option<usize>,
    pub palette: Option<Palette>,
    pub magnet_px: f64,
    pub min_size: f64,
    pub throttle: Duration,
    pub tick: Duration,
    pub seed: Option<u64>,
    pub debug_log: bool,
}

impl SnapConfig {
    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            magnet_px: self.magnet_px,
            limits: AreaLimits {
                min_width: self.min_size,
                min_height: self.min_size,
            },
            throttle: self.throttle,
        }
    }

    /// Both setup answers, when given on the command line.
    pub fn preset(&self) -> Option<(usize, Palette)> {
        Some((self.areas?, self.palette?))
    }
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            areas: None,
            palette: None,
            magnet_px: DEFAULT_MAGNET_PX,
            min_size: DEFAULT_MIN_AREA_HEIGHT,
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
            debug_log: false,
        }
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

impl TryFrom<&Cli> for SnapConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if let Some(value) = cli.areas
            && !(1..=MAX_AREAS).contains(&value)
        {
            return Err(ConfigError::AreaCount {
                value,
                max: MAX_AREAS,
            });
        }
        let palette = cli.palette.as_deref().map(str::parse).transpose()?;
        check_range("magnet", cli.magnet_px, 1.0, 50.0)?;
        check_range("min-size", cli.min_size, 1.0, 50.0)?;
        check_range("throttle-ms", cli.throttle_ms as f64, 0.0, 1000.0)?;
        check_range("tick-ms", cli.tick_ms as f64, 1.0, 100.0)?;
        Ok(Self {
            areas: cli.areas,
            palette,
            magnet_px: cli.magnet_px,
            min_size: cli.min_size,
            throttle: Duration::from_millis(cli.throttle_ms),
            tick: Duration::from_millis(cli.tick_ms),
            seed: cli.seed,
            debug_log: cli.debug_log,
        })
    }
}
