//! Color parsing, interpolation and timed fill transitions.
//!
//! Layer switches do not swap fills instantly: every feature's fill is
//! interpolated in RGB space from its displayed color to its new color over
//! a fixed duration with cubic in-out easing.

use std::fmt;
use std::time::Duration;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    /// Linear interpolation per channel, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Cubic in-out easing.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Interpolate between two color strings.
///
/// Endpoints are returned verbatim. If either side is not a hex color the
/// result snaps to `to` once the transition has started.
pub fn interpolate(from: &str, to: &str, t: f64) -> String {
    if t <= 0.0 {
        return from.to_string();
    }
    if t >= 1.0 {
        return to.to_string();
    }
    match (Rgb::parse_hex(from), Rgb::parse_hex(to)) {
        (Some(a), Some(b)) => a.lerp(b, t).to_string(),
        _ => to.to_string(),
    }
}

/// A timed transition of every feature's fill.
#[derive(Debug, Clone, PartialEq)]
pub struct FillTransition {
    from: Vec<String>,
    to: Vec<String>,
    duration: Duration,
    elapsed: Duration,
}

impl FillTransition {
    /// Start a transition. `from` and `to` are aligned by feature index.
    pub fn new(from: Vec<String>, to: Vec<String>, duration: Duration) -> Self {
        debug_assert_eq!(from.len(), to.len());
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the clock.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    /// Raw progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Whether the transition has reached its end state.
    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Displayed fill of feature `index` at the current time.
    pub fn sample(&self, index: usize) -> Option<String> {
        let to = self.to.get(index)?;
        let from = self.from.get(index).unwrap_or(to);
        Some(interpolate(from, to, ease_cubic_in_out(self.progress())))
    }

    /// Displayed fills of every feature at the current time.
    pub fn sample_all(&self) -> Vec<String> {
        (0..self.to.len()).filter_map(|i| self.sample(i)).collect()
    }

    /// Target fills.
    pub fn target(&self) -> &[String] {
        &self.to
    }
}
