//! Area fill colors.
//!
//! Colors are drawn as light HSV tones within a named hue range and then
//! mapped to whatever the terminal can show: 24-bit when `COLORTERM`
//! advertises it, otherwise the closest entry of the xterm-256 table.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use ratatui::style::Color;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    #[default]
    Random,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Monochrome,
}

impl Palette {
    pub const ALL: [Palette; 9] = [
        Palette::Random,
        Palette::Red,
        Palette::Orange,
        Palette::Yellow,
        Palette::Green,
        Palette::Blue,
        Palette::Purple,
        Palette::Pink,
        Palette::Monochrome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Palette::Random => "random",
            Palette::Red => "red",
            Palette::Orange => "orange",
            Palette::Yellow => "yellow",
            Palette::Green => "green",
            Palette::Blue => "blue",
            Palette::Purple => "purple",
            Palette::Pink => "pink",
            Palette::Monochrome => "monochrome",
        }
    }

    /// Hue range in degrees. Red wraps around zero.
    fn hue_range(self) -> (i32, i32) {
        match self {
            Palette::Random | Palette::Monochrome => (0, 359),
            Palette::Red => (-26, 18),
            Palette::Orange => (19, 46),
            Palette::Yellow => (47, 62),
            Palette::Green => (63, 178),
            Palette::Blue => (179, 257),
            Palette::Purple => (258, 282),
            Palette::Pink => (283, 334),
        }
    }

    /// A random light tone from this palette.
    pub fn light_rgb<R: Rng + ?Sized>(self, rng: &mut R) -> (u8, u8, u8) {
        let (lo, hi) = self.hue_range();
        let hue = rng.random_range(lo..=hi).rem_euclid(360) as f64;
        let saturation = match self {
            Palette::Monochrome => 0.0,
            _ => rng.random_range(55..=100) as f64 / 100.0,
        };
        let value = rng.random_range(80..=100) as f64 / 100.0;
        hsv_to_rgb(hue, saturation, value)
    }

    pub fn light_color<R: Rng + ?Sized>(self, rng: &mut R) -> Color {
        let (r, g, b) = self.light_rgb(rng);
        map_rgb(r, g, b)
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Palette::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| ConfigError::Palette(s.to_string()))
    }
}

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let c = value * saturation;
    let h = (hue % 360.0) / 60.0;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let (r, g, b) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    TrueColor,
    Indexed256,
}

impl ColorDepth {
    pub fn detect() -> Self {
        match std::env::var("COLORTERM") {
            Ok(value) => Self::from_colorterm(&value),
            Err(_) => ColorDepth::Indexed256,
        }
    }

    pub fn from_colorterm(value: &str) -> Self {
        let value = value.to_ascii_lowercase();
        if value.contains("truecolor") || value.contains("24bit") {
            ColorDepth::TrueColor
        } else {
            ColorDepth::Indexed256
        }
    }

    pub fn map(self, r: u8, g: u8, b: u8) -> Color {
        match self {
            ColorDepth::TrueColor => Color::Rgb(r, g, b),
            ColorDepth::Indexed256 => Color::Indexed(xterm_index(r, g, b)),
        }
    }
}

/// Map an RGB triple for the current terminal.
pub fn map_rgb(r: u8, g: u8, b: u8) -> Color {
    ColorDepth::detect().map(r, g, b)
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn nearest_cube_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, level)| (i32::from(**level) - i32::from(v)).abs())
        .map_or(0, |(i, _)| i)
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (i32::from(x) - i32::from(y)).unsigned_abs().pow(2);
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

/// Closest xterm-256 index among the color cube and the gray ramp.
fn xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let (ri, gi, bi) = (nearest_cube_level(r), nearest_cube_level(g), nearest_cube_level(b));
    let cube_rgb = (CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_index = 16 + 36 * ri + 6 * gi + bi;

    let avg = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
    let step = (avg.saturating_sub(8) + 5) / 10;
    let step = step.min(23) as u8;
    let gray = 8 + step * 10;
    let gray_index = 232 + usize::from(step);

    if distance_sq((r, g, b), (gray, gray, gray)) < distance_sq((r, g, b), cube_rgb) {
        gray_index as u8
    } else {
        cube_index as u8
    }
}
