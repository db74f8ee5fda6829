use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB triple. Serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|ch| [ch, ch]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |idx: usize| u8::from_str_radix(&expanded[idx..idx + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Composites `self` at `opacity` over an opaque `backdrop`.
    pub fn over(self, backdrop: Rgb, opacity: f32) -> Rgb {
        let alpha = opacity.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (fg as f32 * alpha + bg as f32 * (1.0 - alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, backdrop.r), mix(self.g, backdrop.g), mix(self.b, backdrop.b))
    }

    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&value).ok_or_else(|| format!("invalid color '{value}', expected #RRGGBB"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Semantic color names. Renderers only ever hold tokens; the palette turns
/// them into RGB when a primitive is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorToken {
    Primary,
    PrimaryDark,
    Success,
    Warning,
    Danger,
    Info,
    Accent,
    Text,
    TextMuted,
    Border,
    Panel,
    Background,
    Track,
    Shadow,
    Separator,
}

impl ColorToken {
    /// Cycle used when a chart needs one color per category.
    pub const SERIES: [ColorToken; 6] = [
        ColorToken::Primary,
        ColorToken::Success,
        ColorToken::Warning,
        ColorToken::Info,
        ColorToken::Accent,
        ColorToken::Danger,
    ];

    pub fn series(index: usize) -> ColorToken {
        Self::SERIES[index % Self::SERIES.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: Rgb,
    pub primary_dark: Rgb,
    pub success: Rgb,
    pub warning: Rgb,
    pub danger: Rgb,
    pub info: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
    pub text_muted: Rgb,
    pub border: Rgb,
    pub panel: Rgb,
    pub background: Rgb,
    pub track: Rgb,
    pub shadow: Rgb,
    pub separator: Rgb,
}

impl Palette {
    pub fn resolve(&self, token: ColorToken) -> Rgb {
        match token {
            ColorToken::Primary => self.primary,
            ColorToken::PrimaryDark => self.primary_dark,
            ColorToken::Success => self.success,
            ColorToken::Warning => self.warning,
            ColorToken::Danger => self.danger,
            ColorToken::Info => self.info,
            ColorToken::Accent => self.accent,
            ColorToken::Text => self.text,
            ColorToken::TextMuted => self.text_muted,
            ColorToken::Border => self.border,
            ColorToken::Panel => self.panel,
            ColorToken::Background => self.background,
            ColorToken::Track => self.track,
            ColorToken::Shadow => self.shadow,
            ColorToken::Separator => self.separator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Font selection: size in points plus weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: f32,
    pub weight: FontWeight,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
        }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self {
            size: self.size * factor,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberFormat {
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub currency_symbol: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub palette: Palette,
    pub number_format: NumberFormat,
    pub title_font: Font,
    pub heading_font: Font,
    pub body_font: Font,
    pub caption_font: Font,
    pub value_font: Font,
    pub small_font: Font,
}

impl Theme {
    pub fn corporate() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            palette: Palette {
                primary: Rgb::new(0x25, 0x63, 0xEB),
                primary_dark: Rgb::new(0x1E, 0x3A, 0x8A),
                success: Rgb::new(0x10, 0xB9, 0x81),
                warning: Rgb::new(0xF5, 0x9E, 0x0B),
                danger: Rgb::new(0xEF, 0x44, 0x44),
                info: Rgb::new(0x0E, 0xA5, 0xE9),
                accent: Rgb::new(0x8B, 0x5C, 0xF6),
                text: Rgb::new(0x1F, 0x29, 0x37),
                text_muted: Rgb::new(0x6B, 0x72, 0x80),
                border: Rgb::new(0xE5, 0xE7, 0xEB),
                panel: Rgb::new(0xFF, 0xFF, 0xFF),
                background: Rgb::new(0xF8, 0xFA, 0xFC),
                track: Rgb::new(0xF1, 0xF5, 0xF9),
                shadow: Rgb::new(0x0F, 0x17, 0x2A),
                separator: Rgb::WHITE,
            },
            number_format: NumberFormat::default(),
            title_font: Font::bold(24.0),
            heading_font: Font::bold(13.0),
            body_font: Font::regular(9.5),
            caption_font: Font::regular(7.5),
            value_font: Font::bold(15.0),
            small_font: Font::regular(6.5),
        }
    }

    pub fn slate() -> Self {
        let mut theme = Self::corporate();
        theme.palette = Palette {
            primary: Rgb::new(0x47, 0x55, 0x69),
            primary_dark: Rgb::new(0x1E, 0x29, 0x3B),
            success: Rgb::new(0x05, 0x96, 0x69),
            warning: Rgb::new(0xD9, 0x77, 0x06),
            danger: Rgb::new(0xDC, 0x26, 0x26),
            info: Rgb::new(0x02, 0x84, 0xC7),
            accent: Rgb::new(0x7C, 0x3A, 0xED),
            text: Rgb::new(0x0F, 0x17, 0x2A),
            text_muted: Rgb::new(0x64, 0x74, 0x8B),
            border: Rgb::new(0xCB, 0xD5, 0xE1),
            panel: Rgb::new(0xFF, 0xFF, 0xFF),
            background: Rgb::new(0xF1, 0xF5, 0xF9),
            track: Rgb::new(0xE2, 0xE8, 0xF0),
            shadow: Rgb::new(0x02, 0x06, 0x17),
            separator: Rgb::WHITE,
        };
        theme
    }

    pub fn color(&self, token: ColorToken) -> Rgb {
        self.palette.resolve(token)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::corporate()
    }
}
