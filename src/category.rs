//! Category (elemental type) taxonomy used for badge colours

use ratatui::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Normal,
        Category::Fire,
        Category::Water,
        Category::Electric,
        Category::Grass,
        Category::Ice,
        Category::Fighting,
        Category::Poison,
        Category::Ground,
        Category::Flying,
        Category::Psychic,
        Category::Bug,
        Category::Rock,
        Category::Ghost,
        Category::Dragon,
        Category::Dark,
        Category::Steel,
        Category::Fairy,
    ];

    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(name))
            .unwrap_or(Category::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Fire => "fire",
            Category::Water => "water",
            Category::Electric => "electric",
            Category::Grass => "grass",
            Category::Ice => "ice",
            Category::Fighting => "fighting",
            Category::Poison => "poison",
            Category::Ground => "ground",
            Category::Flying => "flying",
            Category::Psychic => "psychic",
            Category::Bug => "bug",
            Category::Rock => "rock",
            Category::Ghost => "ghost",
            Category::Dragon => "dragon",
            Category::Dark => "dark",
            Category::Steel => "steel",
            Category::Fairy => "fairy",
            Category::Unknown => "unknown",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Category::Normal => Color::Rgb(168, 168, 120),
            Category::Fire => Color::Rgb(240, 128, 48),
            Category::Water => Color::Rgb(104, 144, 240),
            Category::Electric => Color::Rgb(248, 208, 48),
            Category::Grass => Color::Rgb(120, 200, 80),
            Category::Ice => Color::Rgb(152, 216, 216),
            Category::Fighting => Color::Rgb(192, 48, 40),
            Category::Poison => Color::Rgb(160, 64, 160),
            Category::Ground => Color::Rgb(224, 192, 104),
            Category::Flying => Color::Rgb(168, 144, 240),
            Category::Psychic => Color::Rgb(248, 88, 136),
            Category::Bug => Color::Rgb(168, 184, 32),
            Category::Rock => Color::Rgb(184, 160, 56),
            Category::Ghost => Color::Rgb(112, 88, 152),
            Category::Dragon => Color::Rgb(112, 56, 248),
            Category::Dark => Color::Rgb(112, 88, 72),
            Category::Steel => Color::Rgb(184, 184, 208),
            Category::Fairy => Color::Rgb(238, 153, 172),
            Category::Unknown => Color::Rgb(104, 160, 144),
        }
    }
}
