//! CPU-side material slot state and color handling.
//!
//! A [`Material`] is the per-slot state the tint operations mutate and the
//! renderer re-uploads when `dirty` is set. Texture contents are never held
//! here; the tint logic only needs to know whether a base color texture is
//! bound.

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Create a color from components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` (or bare `rrggbb`) hex string, as produced by a
    /// color picker control.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(ColorParseError::InvalidLength(digits.len()));
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(c));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).unwrap_or(0) as f32 / 255.0
        };
        Ok(Self {
            r: channel(0..2),
            g: channel(2..4),
            b: channel(4..6),
        })
    }

    /// Components as `[r, g, b]`.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Errors from parsing a hex color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    /// The digit count is not 6 (after any leading `#`).
    InvalidLength(usize),
    /// A character is not a hex digit.
    InvalidDigit(char),
}

impl std::fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "expected 6 hex digits, got {len}"),
            Self::InvalidDigit(c) => write!(f, "invalid hex digit {c:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// One material slot of a renderable node.
///
/// Single-material and multi-material meshes are represented uniformly as a
/// slot list on the mesh attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material name as authored in the source asset, if any.
    pub name: Option<String>,
    /// Base color factor `[r, g, b, a]`. Tints replace the RGB part.
    pub base_color: [f32; 4],
    /// Whether a base color texture is bound. Textured slots only take a
    /// tint when the caller allows multiplicative texture tinting.
    pub has_color_texture: bool,
    /// Roughness factor.
    pub roughness: f32,
    /// Metalness factor.
    pub metalness: f32,
    /// Set when CPU-side state changed and the slot must be re-uploaded.
    pub dirty: bool,
}

impl Material {
    /// Create an unnamed, untextured slot with the viewer's standard
    /// surface response (used when the source asset supplies no material).
    pub fn new() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            has_color_texture: false,
            roughness: 0.7,
            metalness: 0.1,
            dirty: false,
        }
    }

    /// Set the material name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the base color factor.
    #[must_use]
    pub fn with_base_color(mut self, base_color: [f32; 4]) -> Self {
        self.base_color = base_color;
        self
    }

    /// Mark a base color texture as bound.
    #[must_use]
    pub fn with_color_texture(mut self, has_color_texture: bool) -> Self {
        self.has_color_texture = has_color_texture;
        self
    }

    /// Replace the RGB base color, keeping alpha, and mark the slot dirty.
    pub fn set_color(&mut self, color: Color) {
        self.base_color[0] = color.r;
        self.base_color[1] = color.g;
        self.base_color[2] = color.b;
        self.dirty = true;
    }

    /// The RGB part of the base color.
    pub fn color(&self) -> Color {
        Color::new(self.base_color[0], self.base_color[1], self.base_color[2])
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_with_and_without_hash() {
        let c = Color::from_hex("#8d5524").unwrap();
        assert_eq!(c, Color::from_hex("8d5524").unwrap());
        assert!((c.r - 0x8d as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x55 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x24 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert_eq!(
            Color::from_hex("#fff"),
            Err(ColorParseError::InvalidLength(3))
        );
        assert_eq!(
            Color::from_hex("8d552g"),
            Err(ColorParseError::InvalidDigit('g'))
        );
    }

    #[test]
    fn set_color_keeps_alpha_and_dirties() {
        let mut mat = Material::new().with_base_color([0.2, 0.2, 0.2, 0.5]);
        mat.set_color(Color::new(1.0, 0.0, 0.0));
        assert_eq!(mat.base_color, [1.0, 0.0, 0.0, 0.5]);
        assert!(mat.dirty);
    }

    #[test]
    fn default_surface_response() {
        let mat = Material::new();
        assert_eq!(mat.roughness, 0.7);
        assert_eq!(mat.metalness, 0.1);
        assert!(!mat.has_color_texture);
    }
}
