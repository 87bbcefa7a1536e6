//! Color parsing and per-frame composition
//!
//! The grid is painted by composing one resolved fill color at a per-cell
//! alpha over a uniform background. Resolution accepts the color syntaxes a
//! host style sheet would hand us (hex, `rgb()`/`rgba()`, CSS names) and
//! never fails: anything unparseable degrades to opaque black.

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new color from RGBA values
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to ARGB u32 for softbuffer
    pub fn to_argb_u32(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Parse from "#RGB", "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let nibble = |c: u8| -> Result<u8, String> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| format!("Invalid hex digit: {}", c as char))
        };
        match s.len() {
            3 => {
                let b = s.as_bytes();
                Ok(Color {
                    r: nibble(b[0])? * 17,
                    g: nibble(b[1])? * 17,
                    b: nibble(b[2])? * 17,
                    a: 255,
                })
            }
            6 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: 255,
            }),
            8 => Ok(Color {
                r: u8::from_str_radix(&s[0..2], 16).map_err(|e| e.to_string())?,
                g: u8::from_str_radix(&s[2..4], 16).map_err(|e| e.to_string())?,
                b: u8::from_str_radix(&s[4..6], 16).map_err(|e| e.to_string())?,
                a: u8::from_str_radix(&s[6..8], 16).map_err(|e| e.to_string())?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }
}

/// Resolve a symbolic color value into channel values.
///
/// Accepts hex (`#1e1e2e`), functional (`rgb(30, 30, 46)`,
/// `rgba(30, 30, 46, 0.5)`) and CSS named colors. Unparseable input returns
/// opaque black so a bad style parameter blanks the effect instead of
/// aborting it.
pub fn resolve(spec: &str) -> Color {
    match parse(spec) {
        Ok(color) => color,
        Err(e) => {
            tracing::warn!("Unresolvable color {:?} ({}), using black", spec, e);
            Color::rgb(0, 0, 0)
        }
    }
}

fn parse(spec: &str) -> Result<Color, String> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err("empty color".to_string());
    }
    if spec.starts_with('#') {
        return Color::from_hex(spec);
    }
    let lower = spec.to_ascii_lowercase();
    if lower.starts_with("rgb") {
        return parse_functional(&lower);
    }
    named(&lower).ok_or_else(|| format!("Unknown color name: {}", spec))
}

/// Parse `rgb(r, g, b)` / `rgba(r, g, b, a)` with a 0-1 alpha component.
fn parse_functional(spec: &str) -> Result<Color, String> {
    let open = spec.find('(').ok_or("missing '('")?;
    let close = spec.rfind(')').ok_or("missing ')'")?;
    if close < open {
        return Err("malformed rgb() syntax".to_string());
    }
    let parts: Vec<&str> = spec[open + 1..close].split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("expected 3 or 4 components, got {}", parts.len()));
    }
    let channel = |s: &str| -> Result<u8, String> {
        let v: f32 = s.parse().map_err(|_| format!("bad channel: {}", s))?;
        Ok(v.clamp(0.0, 255.0).round() as u8)
    };
    let a = if parts.len() == 4 {
        let v: f32 = parts[3]
            .parse()
            .map_err(|_| format!("bad alpha: {}", parts[3]))?;
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Ok(Color {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a,
    })
}

fn named(name: &str) -> Option<Color> {
    let c = match name {
        "black" => Color::rgb(0x00, 0x00, 0x00),
        "white" => Color::rgb(0xFF, 0xFF, 0xFF),
        "red" => Color::rgb(0xFF, 0x00, 0x00),
        "lime" => Color::rgb(0x00, 0xFF, 0x00),
        "blue" => Color::rgb(0x00, 0x00, 0xFF),
        "green" => Color::rgb(0x00, 0x80, 0x00),
        "yellow" => Color::rgb(0xFF, 0xFF, 0x00),
        "cyan" | "aqua" => Color::rgb(0x00, 0xFF, 0xFF),
        "magenta" | "fuchsia" => Color::rgb(0xFF, 0x00, 0xFF),
        "gray" | "grey" => Color::rgb(0x80, 0x80, 0x80),
        "silver" => Color::rgb(0xC0, 0xC0, 0xC0),
        "maroon" => Color::rgb(0x80, 0x00, 0x00),
        "olive" => Color::rgb(0x80, 0x80, 0x00),
        "navy" => Color::rgb(0x00, 0x00, 0x80),
        "teal" => Color::rgb(0x00, 0x80, 0x80),
        "purple" => Color::rgb(0x80, 0x00, 0x80),
        "orange" => Color::rgb(0xFF, 0xA5, 0x00),
        "transparent" => Color::rgba(0x00, 0x00, 0x00, 0x00),
        _ => return None,
    };
    Some(c)
}

/// Compose `fg` at `alpha` over an opaque `bg`, producing an ARGB pixel.
///
/// Cells never overlap, so composition against the uniform background color
/// is exact without reading the frame back.
pub fn blend_over(bg: Color, fg: Color, alpha: f32) -> u32 {
    let a = alpha.clamp(0.0, 1.0);
    let r = (bg.r as f32 * (1.0 - a) + fg.r as f32 * a) as u32;
    let g = (bg.g as f32 * (1.0 - a) + fg.g as f32 * a) as u32;
    let b = (bg.b as f32 * (1.0 - a) + fg.b as f32 * a) as u32;
    0xFF000000 | (r << 16) | (g << 8) | b
}
