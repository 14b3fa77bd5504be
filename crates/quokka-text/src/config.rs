//! Layout configuration surface.
//!
//! Mode enums parse from kebab-case strings (`"tail-truncation"`,
//! `"fill-words-full"`) through both serde and `FromStr`, so the same names
//! work in JSON config files and on the command line.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::font::MIN_FONT_SIZE;

/// How a paragraph that is wider than the box is broken into lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum LineBreakMode {
    /// Break between words; a single word wider than the line overflows.
    #[default]
    WordWrap,
    /// Break at any grapheme boundary.
    CharacterWrap,
    /// Never break a paragraph; overflow to the right.
    NoWrap,
    /// Word-wrap, cutting the last allowed line with a trail. Single line
    /// unless `max_lines` says otherwise.
    TailTruncation,
}

/// Horizontal placement of each line inside the box.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum HorizontalAlignment {
    /// Align to the left edge.
    #[default]
    Start,
    /// Center in the box.
    Center,
    /// Align to the right edge.
    End,
    /// Spread leftover width over spaces; last paragraph line stays start-aligned.
    FillWords,
    /// Spread leftover width over spaces on every line.
    FillWordsFull,
    /// Spread leftover width over every glyph gap; last paragraph line exempt.
    FillCharacters,
    /// Spread leftover width over every glyph gap on every line.
    FillCharactersFull,
}

impl HorizontalAlignment {
    /// Whether this mode justifies lines.
    #[must_use]
    pub const fn is_justified(self) -> bool {
        matches!(
            self,
            Self::FillWords | Self::FillWordsFull | Self::FillCharacters | Self::FillCharactersFull
        )
    }

    /// Whether justification also applies to the last line of a paragraph.
    #[must_use]
    pub const fn justifies_last_line(self) -> bool {
        matches!(self, Self::FillWordsFull | Self::FillCharactersFull)
    }

    /// Whether leftover width goes to every glyph gap rather than spaces.
    #[must_use]
    pub const fn fills_characters(self) -> bool {
        matches!(self, Self::FillCharacters | Self::FillCharactersFull)
    }
}

/// Vertical placement of the block of lines inside the box.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum VerticalAlignment {
    /// Top of the box.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Bottom of the box.
    End,
}

/// Font-size auto-fitting.
///
/// *Fit* shrinks until the text fits, *Fill* grows while there is slack,
/// *FitFill* does both.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AutoSizeMode {
    /// Keep the configured size.
    #[default]
    None,
    /// Shrink until every paragraph fits on one line.
    FitHorizontal,
    /// Grow while lines have horizontal slack.
    FillHorizontal,
    /// Shrink to fit, then grow into horizontal slack.
    FitFillHorizontal,
    /// Shrink until the text fits the height.
    FitVertical,
    /// Grow while there is vertical slack.
    FillVertical,
    /// Shrink to fit, then grow into vertical slack.
    FitFillVertical,
}

impl AutoSizeMode {
    /// Shrinks on horizontal overflow.
    #[must_use]
    pub const fn fits_horizontal(self) -> bool {
        matches!(self, Self::FitHorizontal | Self::FitFillHorizontal)
    }

    /// Grows into horizontal slack.
    #[must_use]
    pub const fn fills_horizontal(self) -> bool {
        matches!(self, Self::FillHorizontal | Self::FitFillHorizontal)
    }

    /// Shrinks on vertical overflow.
    #[must_use]
    pub const fn fits_vertical(self) -> bool {
        matches!(self, Self::FitVertical | Self::FitFillVertical)
    }

    /// Grows into vertical slack.
    #[must_use]
    pub const fn fills_vertical(self) -> bool {
        matches!(self, Self::FillVertical | Self::FitFillVertical)
    }
}

/// Everything a label can be told about how to lay out its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayoutConfig {
    /// Logical font family; `None` uses the context's default face.
    pub font_family: Option<String>,
    /// Font size in logical units (multiplied by the measure scale).
    pub font_size: f32,
    /// Font weight (400 = normal, 700 = bold).
    pub font_weight: u16,
    /// Request italic.
    pub italic: bool,
    /// Line breaking policy.
    pub line_break_mode: LineBreakMode,
    /// Maximum number of lines, `None` for unlimited.
    pub max_lines: Option<usize>,
    /// Horizontal alignment and justification.
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical alignment.
    pub vertical_alignment: VerticalAlignment,
    /// Auto-size mode.
    pub auto_size: AutoSizeMode,
    /// Measure auto-size against this text instead of the live text.
    pub auto_size_text: Option<String>,
    /// Lower bound for auto-size, never below [`MIN_FONT_SIZE`].
    pub min_font_size: f32,
    /// Upper bound for auto-size.
    pub max_font_size: f32,
    /// Advance multiplier for every glyph.
    pub character_spacing: f32,
    /// Line advance as a multiple of the line height.
    pub line_spacing: f32,
    /// Extra space before a paragraph as a multiple of the line height.
    pub paragraph_spacing: f32,
    /// Drawn in place of characters no face can render.
    pub fallback_character: char,
    /// Look for another face before substituting the fallback character.
    pub auto_font: bool,
    /// Every line is at least the font's full line height.
    pub uniform_line_height: bool,
    /// Drop one trailing space from every line but the last.
    pub trim_trailing_spaces: bool,
    /// Appended to a truncated last line.
    pub truncation_trail: String,
}

impl Default for TextLayoutConfig {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 12.0,
            font_weight: 400,
            italic: false,
            line_break_mode: LineBreakMode::default(),
            max_lines: None,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            auto_size: AutoSizeMode::default(),
            auto_size_text: None,
            min_font_size: MIN_FONT_SIZE,
            max_font_size: 512.0,
            character_spacing: 1.0,
            line_spacing: 1.0,
            paragraph_spacing: 0.0,
            fallback_character: '□',
            auto_font: false,
            uniform_line_height: true,
            trim_trailing_spaces: false,
            truncation_trail: "..".to_string(),
        }
    }
}

impl TextLayoutConfig {
    /// Line limit actually enforced.
    ///
    /// Zero means unlimited. Tail truncation without an explicit limit is a
    /// single line.
    #[must_use]
    pub fn effective_max_lines(&self) -> Option<usize> {
        match (self.line_break_mode, self.max_lines.filter(|&lines| lines > 0)) {
            (LineBreakMode::TailTruncation, None) => Some(1),
            (_, limit) => limit,
        }
    }

    /// Auto-size floor, never below [`MIN_FONT_SIZE`].
    #[must_use]
    pub fn font_size_floor(&self) -> f32 {
        self.min_font_size.max(MIN_FONT_SIZE)
    }

    /// Mask text for auto-size, if it differs from `text`.
    #[must_use]
    pub fn measurement_mask<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.auto_size_text
            .as_deref()
            .filter(|mask| !mask.is_empty() && *mask != text)
    }
}
