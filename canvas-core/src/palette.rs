//! Preset background colours and the cursor that cycles through them.

use serde::Serialize;

/// Background fills offered by the editor, in cycling order.
///
/// The last two entries are intentionally equal; cycling is driven by the
/// cursor index rather than by looking the current colour up, so the
/// duplicate never traps the cycle.
pub const PRESET_BACKGROUNDS: [&str; 7] = [
    "#1f2937", // dark gray
    "#374151", // slate
    "#3f3f46", // zinc
    "#1e293b", // slate dark
    "#292524", // stone dark
    "#312e81", // indigo dark
    "#312e81", // purple dark
];

/// The surface background: always one of [`PRESET_BACKGROUNDS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Background {
    cursor: usize,
}

impl Background {
    /// Background at the first preset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Background at `index`, wrapped into the preset table.
    #[must_use]
    pub fn at(index: usize) -> Self {
        Self {
            cursor: index % PRESET_BACKGROUNDS.len(),
        }
    }

    /// Current index into [`PRESET_BACKGROUNDS`].
    #[must_use]
    pub fn index(&self) -> usize {
        self.cursor
    }

    /// Current fill colour as a `#rrggbb` string.
    #[must_use]
    pub fn color(&self) -> &'static str {
        PRESET_BACKGROUNDS[self.cursor]
    }

    /// Advance to the next preset, wrapping after the last one.
    pub fn cycle(&mut self) -> &'static str {
        self.cursor = (self.cursor + 1) % PRESET_BACKGROUNDS.len();
        self.color()
    }
}

/// Parse a `#rrggbb` or `#rgb` colour into RGB bytes.
#[must_use]
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some([r, g, b])
        }
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, ch) in rgb.iter_mut().zip(hex.chars()) {
                let v = u8::try_from(ch.to_digit(16)?).ok()?;
                *slot = v * 17;
            }
            Some(rgb)
        }
        _ => None,
    }
}
