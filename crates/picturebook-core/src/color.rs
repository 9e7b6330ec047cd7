//! Colors for timeline drawing.

use serde::{Deserialize, Serialize};

/// RGBA color with 32-bit float components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create an opaque color from a `0xRRGGBB` literal.
    #[inline]
    pub fn from_hex(rgb: u32) -> Self {
        Self::from_rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// Convert to 8-bit RGBA.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Same color with a different 8-bit alpha.
    #[inline]
    pub fn with_alpha(self, alpha: u8) -> Self {
        Self {
            a: alpha as f32 / 255.0,
            ..self
        }
    }

    /// Brighten by a percentage (130 = 30% brighter), saturating at white.
    pub fn lighter(self, percent: u32) -> Self {
        let f = percent as f32 / 100.0;
        Self::new(
            (self.r * f).min(1.0),
            (self.g * f).min(1.0),
            (self.b * f).min(1.0),
            self.a,
        )
    }

    /// Darken by a divisor percentage (180 = 1/1.8 of the brightness).
    pub fn darker(self, percent: u32) -> Self {
        if percent == 0 {
            return self;
        }
        let f = 100.0 / percent as f32;
        Self::new(self.r * f, self.g * f, self.b * f, self.a)
    }

    /// Stable color for a label (speaker name, subtitle style...).
    pub fn for_label(label: &str) -> Self {
        // FNV-1a keeps the assignment stable across runs and platforms.
        let hash = label
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
                (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
            });
        Self::from_hex(LABEL_PALETTE[(hash % LABEL_PALETTE.len() as u64) as usize])
    }

    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Pink, blue, green, orange, purple, cyan.
const LABEL_PALETTE: [u32; 6] = [0xE91E63, 0x2196F3, 0x4CAF50, 0xFF9800, 0x9C27B0, 0x00BCD4];
