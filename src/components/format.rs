//! Display formatting shared by the grid and the detail modal

use ratatui::style::Color;

/// Highest base stat in the catalog; bars are scaled against it
pub const STAT_MAX: u32 = 255;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// `mr-mime` -> `Mr Mime`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_id(id: u32) -> String {
    format!("#{id:03}")
}

/// Decimeters to metres
pub fn format_height(height: u32) -> String {
    format!("{:.1} m", f64::from(height) / 10.0)
}

/// Hectograms to kilograms
pub fn format_weight(weight: u32) -> String {
    format!("{:.1} kg", f64::from(weight) / 10.0)
}

pub fn stat_label(name: &str) -> &str {
    match name {
        "hp" => "HP",
        "attack" => "ATK",
        "defense" => "DEF",
        "special-attack" => "SpA",
        "special-defense" => "SpD",
        "speed" => "SPD",
        other => other,
    }
}

/// Filled part of a `width`-cell bar for `base` out of [`STAT_MAX`]
pub fn stat_bar(base: u32, width: usize) -> String {
    let filled = (base.min(STAT_MAX) as usize * width).div_ceil(STAT_MAX as usize);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn stat_color(base: u32) -> Color {
    if base >= 100 {
        Color::Green
    } else if base >= 70 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn spinner(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick % SPINNER_FRAMES.len() as u64) as usize]
}
