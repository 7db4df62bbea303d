//! Canned category queries
//!
//! Four preset phrases standing in for category buttons: each maps a
//! label to the query text actually submitted to the matcher.

use clap::ValueEnum;

/// Preset gift categories selectable instead of a free-text query
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Cables, chargers and electronic accessories
    Tech,
    /// Kitchen appliances and home decor
    Kitchen,
    /// Headphones and speakers
    Audio,
    /// Toys and creative hobbies
    Toys,
}

impl Preset {
    /// All presets in display order
    pub const ALL: [Preset; 4] = [Preset::Tech, Preset::Kitchen, Preset::Audio, Preset::Toys];

    /// Human-facing label
    pub fn label(self) -> &'static str {
        match self {
            Preset::Tech => "Tech Gadgets",
            Preset::Kitchen => "Kitchen & Home",
            Preset::Audio => "Music & Audio",
            Preset::Toys => "Toys & Hobby",
        }
    }

    /// Query text submitted to the matcher
    pub fn query(self) -> &'static str {
        match self {
            Preset::Tech => "High tech electronics cables and accessories",
            Preset::Kitchen => "Kitchen appliances and home decor",
            Preset::Audio => "Wireless headphones and speakers",
            Preset::Toys => "Toys for kids and creative hobbies",
        }
    }
}
