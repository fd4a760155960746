// Hex color helpers for the flat dirt fill and its blob highlights

/// Flat fill used when no theme color was supplied or it failed to parse.
pub const NEUTRAL_FALLBACK: Rgb = Rgb {
    r: 0x33,
    g: 0x33,
    b: 0x33,
};

/// How much darker the animated blobs are than the flat fill.
pub const BLOB_DARKEN_PERCENT: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` with the alpha clamped to `[0,1]`.
    pub fn to_css_alpha(self, alpha: f64) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }

    /// Scale every channel by `1 - percent/100`, floored and clamped to a byte.
    pub fn darken(self, percent: f64) -> Rgb {
        let factor = 1.0 - percent / 100.0;
        let scale = |c: u8| (c as f64 * factor).floor().clamp(0.0, 255.0) as u8;
        Rgb {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

/// Parse `#RRGGBB` (case-insensitive, `#` optional). Anything else is `None`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Darkened variant of `hex` as a lowercase `#rrggbb` string.
/// Malformed input darkens [`NEUTRAL_FALLBACK`] instead.
pub fn darken(hex: &str, percent: f64) -> String {
    hex_to_rgb(hex)
        .unwrap_or(NEUTRAL_FALLBACK)
        .darken(percent)
        .to_hex()
}
