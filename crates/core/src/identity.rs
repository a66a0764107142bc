//! Participant identity colors and initials
//!
//! Both the wheel segments and result displays derive a participant's color
//! from the name alone, so the same name always looks the same.

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Build from a `0xRRGGBB` literal
    pub const fn from_rgb_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Segment palette, in lookup order
pub const PALETTE: [Color; 15] = [
    Color::from_rgb_u32(0xFF1744),
    Color::from_rgb_u32(0xE91E63),
    Color::from_rgb_u32(0x9C27B0),
    Color::from_rgb_u32(0x673AB7),
    Color::from_rgb_u32(0x3F51B5),
    Color::from_rgb_u32(0x2196F3),
    Color::from_rgb_u32(0x00BCD4),
    Color::from_rgb_u32(0x009688),
    Color::from_rgb_u32(0x4CAF50),
    Color::from_rgb_u32(0x8BC34A),
    Color::from_rgb_u32(0xFFC107),
    Color::from_rgb_u32(0xFF9800),
    Color::from_rgb_u32(0xFF5722),
    Color::from_rgb_u32(0xF44336),
    Color::from_rgb_u32(0x00E676),
];

/// Pointer color shown while the wheel has no participants
pub const ACCENT: Color = Color::from_rgb_u32(0xFF6436);

/// Rolling `hash * 31 + code` over the name's characters, wrapping at i32
fn name_hash(name: &str) -> i32 {
    name.chars().fold(0i32, |hash, c| {
        (c as u32 as i32).wrapping_add((hash << 5).wrapping_sub(hash))
    })
}

/// Stable palette color for a name. The empty name maps to the first entry.
pub fn color_of(name: &str) -> Color {
    let index = name_hash(name).unsigned_abs() as usize % PALETTE.len();
    PALETTE[index]
}

/// One or two uppercase initials: first token, plus last token when there
/// are at least two. Blank names yield `"?"`.
pub fn initials_of(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return "?".to_string();
    };

    let mut initials: String = first.chars().take(1).flat_map(char::to_uppercase).collect();
    if tokens.len() >= 2 {
        if let Some(last) = tokens.last() {
            initials.extend(last.chars().take(1).flat_map(char::to_uppercase));
        }
    }
    initials
}
