//! Textual color parsing.
//!
//! Accepted forms:
//!
//! | Form | Example |
//! |------|---------|
//! | integer triplet / quad | `255, 0, 0` or `255 0 0 0.5` |
//! | hexadecimal | `#f00`, `#f008`, `#ff0000`, `#ff000080` |
//! | `rgb()` / `rgba()` | `rgb(255 0 0 / 50%)`, `rgba(100%, 0%, 0%, 0.5)` |
//! | `hsl()` / `hsla()` | `hsl(120deg 100% 25%)`, `hsla(0, 100%, 50%, 0.3)` |
//! | named | `rebeccapurple`, `transparent` |
//!
//! Parsing never panics; every malformed input maps to a [`ParseError`].

use std::fmt;

use crate::color::{Color, Hsl};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input was empty or whitespace only.
    Empty,
    /// `#` prefix with the wrong length or a non-hex digit.
    InvalidHex(String),
    /// Functional or list syntax that does not match any accepted shape.
    InvalidFunction(String),
    /// A channel parsed but lies outside its range.
    ChannelOutOfRange { channel: &'static str, value: f64 },
    /// Not a known CSS color name.
    UnknownName(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty color string"),
            Self::InvalidHex(s) => write!(f, "invalid hex color: {s}"),
            Self::InvalidFunction(s) => write!(f, "invalid color function: {s}"),
            Self::ChannelOutOfRange { channel, value } => {
                write!(f, "{channel} channel out of range: {value}")
            }
            Self::UnknownName(s) => write!(f, "unknown color name: {s}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a color from any supported textual form.
pub fn parse(repr: &str) -> Result<Color, ParseError> {
    let input = repr.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ParseError::InvalidHex(input.to_string()));
    }
    let lower = input.to_ascii_lowercase();
    if let Some(open) = lower.find('(') {
        return parse_function(&lower, open);
    }
    if lower.starts_with(|c: char| c.is_ascii_digit() || c == '.' || c == '-' || c == '+') {
        return parse_list(&lower);
    }
    named(&lower).ok_or(ParseError::UnknownName(lower))
}

/// Look up a CSS named color (lower-case).
#[must_use]
pub fn named(name: &str) -> Option<Color> {
    if name == "transparent" {
        return Some(Color::TRANSPARENT);
    }
    NAMED
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|i| NAMED[i].1)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(
            nibble(0)?,
            nibble(1)?,
            nibble(2)?,
            f32::from(nibble(3)?) / 255.0,
        )),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f32::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

fn parse_function(input: &str, open: usize) -> Result<Color, ParseError> {
    let invalid = || ParseError::InvalidFunction(input.to_string());
    let name = input[..open].trim();
    let body = input[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
    let (channels, alpha) = split_arguments(body).ok_or_else(invalid)?;
    let alpha = match alpha {
        Some(a) => parse_alpha(a).ok_or_else(invalid)??,
        None => 1.0,
    };
    match name {
        "rgb" | "rgba" => {
            let r = parse_rgb_channel("red", channels[0]).ok_or_else(invalid)??;
            let g = parse_rgb_channel("green", channels[1]).ok_or_else(invalid)??;
            let b = parse_rgb_channel("blue", channels[2]).ok_or_else(invalid)??;
            Ok(Color::rgba(r, g, b, alpha))
        }
        "hsl" | "hsla" => {
            let hue = channels[0];
            let hue = hue.strip_suffix("deg").unwrap_or(hue);
            let h = number(hue).ok_or_else(invalid)?;
            let s = parse_percent("saturation", channels[1]).ok_or_else(invalid)??;
            let l = parse_percent("lightness", channels[2]).ok_or_else(invalid)??;
            Ok(Color::from_hsl(Hsl::new(h, s, l), alpha))
        }
        _ => Err(invalid()),
    }
}

/// Bare list form: three integer channels and an optional alpha.
fn parse_list(input: &str) -> Result<Color, ParseError> {
    let invalid = || ParseError::InvalidFunction(input.to_string());
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(invalid());
    }
    let mut rgb = [0u8; 3];
    for (slot, (name, text)) in rgb
        .iter_mut()
        .zip(["red", "green", "blue"].into_iter().zip(&parts))
    {
        let value = number(text).ok_or_else(invalid)?;
        if value.fract() != 0.0 {
            return Err(invalid());
        }
        *slot = channel_u8(name, value)?;
    }
    let alpha = match parts.get(3) {
        Some(a) => parse_alpha(a).ok_or_else(invalid)??,
        None => 1.0,
    };
    Ok(Color::rgba(rgb[0], rgb[1], rgb[2], alpha))
}

/// Split a function body into three channels plus an optional alpha.
///
/// Handles the legacy comma form and the space form with `/ alpha`.
fn split_arguments(body: &str) -> Option<([&str; 3], Option<&str>)> {
    let (main, slash_alpha) = match body.split_once('/') {
        Some((main, alpha)) => (main, Some(alpha.trim())),
        None => (body, None),
    };
    let parts: Vec<&str> = if main.contains(',') {
        main.split(',').map(str::trim).collect()
    } else {
        main.split_whitespace().collect()
    };
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    if slash_alpha == Some("") {
        return None;
    }
    match (parts.as_slice(), slash_alpha) {
        ([a, b, c], alpha) => Some(([*a, *b, *c], alpha)),
        ([a, b, c, d], None) => Some(([*a, *b, *c], Some(*d))),
        _ => None,
    }
}

fn number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn channel_u8(channel: &'static str, value: f64) -> Result<u8, ParseError> {
    if !(0.0..=255.0).contains(&value) {
        return Err(ParseError::ChannelOutOfRange { channel, value });
    }
    Ok(value.round() as u8)
}

/// `None` when the text is not a number; `Some(Err)` when out of range.
fn parse_rgb_channel(channel: &'static str, text: &str) -> Option<Result<u8, ParseError>> {
    if let Some(pct) = text.strip_suffix('%') {
        let value = number(pct)?;
        if !(0.0..=100.0).contains(&value) {
            return Some(Err(ParseError::ChannelOutOfRange { channel, value }));
        }
        return Some(channel_u8(channel, value * 2.55));
    }
    number(text).map(|v| channel_u8(channel, v))
}

fn parse_percent(channel: &'static str, text: &str) -> Option<Result<f64, ParseError>> {
    let value = number(text.strip_suffix('%').unwrap_or(text))?;
    if !(0.0..=100.0).contains(&value) {
        return Some(Err(ParseError::ChannelOutOfRange { channel, value }));
    }
    Some(Ok(value))
}

fn parse_alpha(text: &str) -> Option<Result<f32, ParseError>> {
    let (value, scale) = match text.strip_suffix('%') {
        Some(pct) => (number(pct)?, 100.0),
        None => (number(text)?, 1.0),
    };
    if !(0.0..=scale).contains(&value) {
        return Some(Err(ParseError::ChannelOutOfRange {
            channel: "alpha",
            value,
        }));
    }
    Some(Ok((value / scale) as f32))
}

/// CSS Color 4 named colors, sorted by name for binary search.
static NAMED: [(&str, Color); 148] = [
    ("aliceblue", Color::rgb(240, 248, 255)),
    ("antiquewhite", Color::rgb(250, 235, 215)),
    ("aqua", Color::rgb(0, 255, 255)),
    ("aquamarine", Color::rgb(127, 255, 212)),
    ("azure", Color::rgb(240, 255, 255)),
    ("beige", Color::rgb(245, 245, 220)),
    ("bisque", Color::rgb(255, 228, 196)),
    ("black", Color::rgb(0, 0, 0)),
    ("blanchedalmond", Color::rgb(255, 235, 205)),
    ("blue", Color::rgb(0, 0, 255)),
    ("blueviolet", Color::rgb(138, 43, 226)),
    ("brown", Color::rgb(165, 42, 42)),
    ("burlywood", Color::rgb(222, 184, 135)),
    ("cadetblue", Color::rgb(95, 158, 160)),
    ("chartreuse", Color::rgb(127, 255, 0)),
    ("chocolate", Color::rgb(210, 105, 30)),
    ("coral", Color::rgb(255, 127, 80)),
    ("cornflowerblue", Color::rgb(100, 149, 237)),
    ("cornsilk", Color::rgb(255, 248, 220)),
    ("crimson", Color::rgb(220, 20, 60)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("darkblue", Color::rgb(0, 0, 139)),
    ("darkcyan", Color::rgb(0, 139, 139)),
    ("darkgoldenrod", Color::rgb(184, 134, 11)),
    ("darkgray", Color::rgb(169, 169, 169)),
    ("darkgreen", Color::rgb(0, 100, 0)),
    ("darkgrey", Color::rgb(169, 169, 169)),
    ("darkkhaki", Color::rgb(189, 183, 107)),
    ("darkmagenta", Color::rgb(139, 0, 139)),
    ("darkolivegreen", Color::rgb(85, 107, 47)),
    ("darkorange", Color::rgb(255, 140, 0)),
    ("darkorchid", Color::rgb(153, 50, 204)),
    ("darkred", Color::rgb(139, 0, 0)),
    ("darksalmon", Color::rgb(233, 150, 122)),
    ("darkseagreen", Color::rgb(143, 188, 143)),
    ("darkslateblue", Color::rgb(72, 61, 139)),
    ("darkslategray", Color::rgb(47, 79, 79)),
    ("darkslategrey", Color::rgb(47, 79, 79)),
    ("darkturquoise", Color::rgb(0, 206, 209)),
    ("darkviolet", Color::rgb(148, 0, 211)),
    ("deeppink", Color::rgb(255, 20, 147)),
    ("deepskyblue", Color::rgb(0, 191, 255)),
    ("dimgray", Color::rgb(105, 105, 105)),
    ("dimgrey", Color::rgb(105, 105, 105)),
    ("dodgerblue", Color::rgb(30, 144, 255)),
    ("firebrick", Color::rgb(178, 34, 34)),
    ("floralwhite", Color::rgb(255, 250, 240)),
    ("forestgreen", Color::rgb(34, 139, 34)),
    ("fuchsia", Color::rgb(255, 0, 255)),
    ("gainsboro", Color::rgb(220, 220, 220)),
    ("ghostwhite", Color::rgb(248, 248, 255)),
    ("gold", Color::rgb(255, 215, 0)),
    ("goldenrod", Color::rgb(218, 165, 32)),
    ("gray", Color::rgb(128, 128, 128)),
    ("green", Color::rgb(0, 128, 0)),
    ("greenyellow", Color::rgb(173, 255, 47)),
    ("grey", Color::rgb(128, 128, 128)),
    ("honeydew", Color::rgb(240, 255, 240)),
    ("hotpink", Color::rgb(255, 105, 180)),
    ("indianred", Color::rgb(205, 92, 92)),
    ("indigo", Color::rgb(75, 0, 130)),
    ("ivory", Color::rgb(255, 255, 240)),
    ("khaki", Color::rgb(240, 230, 140)),
    ("lavender", Color::rgb(230, 230, 250)),
    ("lavenderblush", Color::rgb(255, 240, 245)),
    ("lawngreen", Color::rgb(124, 252, 0)),
    ("lemonchiffon", Color::rgb(255, 250, 205)),
    ("lightblue", Color::rgb(173, 216, 230)),
    ("lightcoral", Color::rgb(240, 128, 128)),
    ("lightcyan", Color::rgb(224, 255, 255)),
    ("lightgoldenrodyellow", Color::rgb(250, 250, 210)),
    ("lightgray", Color::rgb(211, 211, 211)),
    ("lightgreen", Color::rgb(144, 238, 144)),
    ("lightgrey", Color::rgb(211, 211, 211)),
    ("lightpink", Color::rgb(255, 182, 193)),
    ("lightsalmon", Color::rgb(255, 160, 122)),
    ("lightseagreen", Color::rgb(32, 178, 170)),
    ("lightskyblue", Color::rgb(135, 206, 250)),
    ("lightslategray", Color::rgb(119, 136, 153)),
    ("lightslategrey", Color::rgb(119, 136, 153)),
    ("lightsteelblue", Color::rgb(176, 196, 222)),
    ("lightyellow", Color::rgb(255, 255, 224)),
    ("lime", Color::rgb(0, 255, 0)),
    ("limegreen", Color::rgb(50, 205, 50)),
    ("linen", Color::rgb(250, 240, 230)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("mediumaquamarine", Color::rgb(102, 205, 170)),
    ("mediumblue", Color::rgb(0, 0, 205)),
    ("mediumorchid", Color::rgb(186, 85, 211)),
    ("mediumpurple", Color::rgb(147, 112, 219)),
    ("mediumseagreen", Color::rgb(60, 179, 113)),
    ("mediumslateblue", Color::rgb(123, 104, 238)),
    ("mediumspringgreen", Color::rgb(0, 250, 154)),
    ("mediumturquoise", Color::rgb(72, 209, 204)),
    ("mediumvioletred", Color::rgb(199, 21, 133)),
    ("midnightblue", Color::rgb(25, 25, 112)),
    ("mintcream", Color::rgb(245, 255, 250)),
    ("mistyrose", Color::rgb(255, 228, 225)),
    ("moccasin", Color::rgb(255, 228, 181)),
    ("navajowhite", Color::rgb(255, 222, 173)),
    ("navy", Color::rgb(0, 0, 128)),
    ("oldlace", Color::rgb(253, 245, 230)),
    ("olive", Color::rgb(128, 128, 0)),
    ("olivedrab", Color::rgb(107, 142, 35)),
    ("orange", Color::rgb(255, 165, 0)),
    ("orangered", Color::rgb(255, 69, 0)),
    ("orchid", Color::rgb(218, 112, 214)),
    ("palegoldenrod", Color::rgb(238, 232, 170)),
    ("palegreen", Color::rgb(152, 251, 152)),
    ("paleturquoise", Color::rgb(175, 238, 238)),
    ("palevioletred", Color::rgb(219, 112, 147)),
    ("papayawhip", Color::rgb(255, 239, 213)),
    ("peachpuff", Color::rgb(255, 218, 185)),
    ("peru", Color::rgb(205, 133, 63)),
    ("pink", Color::rgb(255, 192, 203)),
    ("plum", Color::rgb(221, 160, 221)),
    ("powderblue", Color::rgb(176, 224, 230)),
    ("purple", Color::rgb(128, 0, 128)),
    ("rebeccapurple", Color::rgb(102, 51, 153)),
    ("red", Color::rgb(255, 0, 0)),
    ("rosybrown", Color::rgb(188, 143, 143)),
    ("royalblue", Color::rgb(65, 105, 225)),
    ("saddlebrown", Color::rgb(139, 69, 19)),
    ("salmon", Color::rgb(250, 128, 114)),
    ("sandybrown", Color::rgb(244, 164, 96)),
    ("seagreen", Color::rgb(46, 139, 87)),
    ("seashell", Color::rgb(255, 245, 238)),
    ("sienna", Color::rgb(160, 82, 45)),
    ("silver", Color::rgb(192, 192, 192)),
    ("skyblue", Color::rgb(135, 206, 235)),
    ("slateblue", Color::rgb(106, 90, 205)),
    ("slategray", Color::rgb(112, 128, 144)),
    ("slategrey", Color::rgb(112, 128, 144)),
    ("snow", Color::rgb(255, 250, 250)),
    ("springgreen", Color::rgb(0, 255, 127)),
    ("steelblue", Color::rgb(70, 130, 180)),
    ("tan", Color::rgb(210, 180, 140)),
    ("teal", Color::rgb(0, 128, 128)),
    ("thistle", Color::rgb(216, 191, 216)),
    ("tomato", Color::rgb(255, 99, 71)),
    ("turquoise", Color::rgb(64, 224, 208)),
    ("violet", Color::rgb(238, 130, 238)),
    ("wheat", Color::rgb(245, 222, 179)),
    ("white", Color::rgb(255, 255, 255)),
    ("whitesmoke", Color::rgb(245, 245, 245)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("yellowgreen", Color::rgb(154, 205, 50)),
];
