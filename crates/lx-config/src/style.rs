//! Chrome stylesheet: colors and metrics for the window chrome.
//!
//! Uses the same `key=value` syntax as the other config files:
//!
//! ```text
//! # chrome.style
//! window_fill = #1e1e1e
//! accent_color = #3d7eff
//! corner_radius = 4
//! ```

use crate::parser::ConfigMap;
use crate::parser::load_config_file;
use lx_core::BrowserError;
use lx_core::BrowserResult;
use std::path::Path;
use tracing::info;
use tracing::warn;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#rrggbb` (leading `#` optional).
    pub fn parse_hex(input: &str) -> BrowserResult<Self> {
        let digits = input.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(BrowserError::new(
                "config.style.color_invalid",
                format!("expected `#rrggbb`, got `{input}`"),
            ));
        }

        let channel = |range: core::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|error| {
                BrowserError::new(
                    "config.style.color_invalid",
                    format!("invalid color `{input}`: {error}"),
                )
            })
        };

        Ok(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChromeStyle {
    pub window_fill: Rgb,
    pub panel_fill: Rgb,
    pub text_color: Rgb,
    pub accent_color: Rgb,
    pub progress_color: Rgb,
    pub corner_radius: f32,
    pub item_spacing: f32,
}

impl Default for ChromeStyle {
    fn default() -> Self {
        Self {
            window_fill: Rgb(0x20, 0x21, 0x24),
            panel_fill: Rgb(0x2b, 0x2d, 0x31),
            text_color: Rgb(0xe8, 0xea, 0xed),
            accent_color: Rgb(0x3d, 0x7e, 0xff),
            progress_color: Rgb(0x4c, 0xaf, 0x50),
            corner_radius: 4.0,
            item_spacing: 6.0,
        }
    }
}

impl ChromeStyle {
    /// Missing file or bad values fall back to the defaults, with a log line.
    pub fn load(path: &Path) -> Self {
        match load_config_file(path) {
            Ok(map) => Self::from_map(&map),
            Err(error) => {
                info!("{error}; using default chrome style");
                Self::default()
            }
        }
    }

    pub fn from_map(map: &ConfigMap) -> Self {
        let mut style = Self::default();
        for (key, value) in map {
            let applied = match key.as_str() {
                "window_fill" => Rgb::parse_hex(value).map(|color| style.window_fill = color),
                "panel_fill" => Rgb::parse_hex(value).map(|color| style.panel_fill = color),
                "text_color" => Rgb::parse_hex(value).map(|color| style.text_color = color),
                "accent_color" => Rgb::parse_hex(value).map(|color| style.accent_color = color),
                "progress_color" => {
                    Rgb::parse_hex(value).map(|color| style.progress_color = color)
                }
                "corner_radius" => parse_metric(value).map(|metric| style.corner_radius = metric),
                "item_spacing" => parse_metric(value).map(|metric| style.item_spacing = metric),
                _ => {
                    warn!("unknown chrome style key `{key}` ignored");
                    Ok(())
                }
            };

            if let Err(error) = applied {
                warn!("chrome style `{key}` kept default: {error}");
            }
        }
        style
    }
}

fn parse_metric(value: &str) -> BrowserResult<f32> {
    let parsed = value.trim().trim_end_matches("px").parse::<f32>().map_err(|error| {
        BrowserError::new(
            "config.style.metric_invalid",
            format!("invalid metric `{value}`: {error}"),
        )
    })?;

    if !parsed.is_finite() || parsed < 0.0 {
        return Err(BrowserError::new(
            "config.style.metric_invalid",
            format!("metric must be a non-negative number, got `{value}`"),
        ));
    }

    Ok(parsed)
}
