//! Colours and per-bucket material hints.
//!
//! Particle colour is decided once, at spawn, from the particle's index and
//! motif; it never changes afterwards. The render sink owns lighting and
//! post-processing; [`BucketStyle`] only tells it what each bucket should
//! glow like.

use glam::Vec3;

use crate::particle::{Category, Motif};

/// Convert a `0xRRGGBB` colour to linear-ish RGB in 0..1.
pub fn hex_to_rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Three-colour swarm palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Deep purple, most of the outer ring.
    pub primary: Vec3,
    /// Lavender, the rest of the outer ring and most of the inner motif.
    pub accent: Vec3,
    /// White highlights.
    pub highlight: Vec3,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: hex_to_rgb(0x836ef9),
            accent: hex_to_rgb(0xa08cff),
            highlight: hex_to_rgb(0xffffff),
        }
    }
}

impl Palette {
    /// Colour for particle `index`.
    ///
    /// Outer ring: every 8th particle is a highlight, otherwise even indices
    /// are primary and odd ones accent. Inner motif: every 3rd particle is a
    /// highlight, the rest accent.
    pub fn color_for(&self, index: usize, motif: Motif) -> Vec3 {
        match motif {
            Motif::Outer if index % 8 == 0 => self.highlight,
            Motif::Outer if index % 2 == 0 => self.primary,
            Motif::Outer => self.accent,
            Motif::Inner if index % 3 == 0 => self.highlight,
            Motif::Inner => self.accent,
        }
    }
}

/// Material hints for one instance bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketStyle {
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
}

impl BucketStyle {
    /// Reference look for a category.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Round => Self {
                emissive: hex_to_rgb(0x836ef9),
                emissive_intensity: 0.8,
                roughness: 0.05,
                metalness: 1.0,
            },
            Category::Angular => Self {
                emissive: hex_to_rgb(0xffffff),
                emissive_intensity: 0.5,
                roughness: 0.05,
                metalness: 1.0,
            },
        }
    }
}
