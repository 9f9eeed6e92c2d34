//! ARGB8888 color helpers and the named polygon [`Color`].

/// Background used by a freshly created [`crate::render::Renderer`].
pub const BACKGROUND: u32 = 0xFF1E1E1E;

/// Palette indexed by the per-polygon color ids of a [`crate::mesh::Mesh`].
pub const PALETTE: [Color; 9] = [
    Color::named(0xFF000000, "black"),
    Color::named(0xFFFFFFFF, "white"),
    Color::named(0xFFFF0000, "red"),
    Color::named(0xFF00FF00, "green"),
    Color::named(0xFF0000FF, "blue"),
    Color::named(0xFFFFFF00, "yellow"),
    Color::named(0xFFFF00FF, "magenta"),
    Color::named(0xFF00FFFF, "cyan"),
    Color::named(0xFF808080, "gray"),
];

/// Polygon color. The rasterizer hands `argb` to the shader and frame
/// buffer untouched; `name` only shows up in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub argb: u32,
    pub name: &'static str,
}

impl Color {
    pub const fn new(argb: u32) -> Self {
        Self { argb, name: "" }
    }

    pub const fn named(argb: u32, name: &'static str) -> Self {
        Self { argb, name }
    }

    /// Palette entry for `id`, wrapping around the palette length.
    pub fn from_palette(id: usize) -> Self {
        PALETTE[id % PALETTE.len()]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{:08X}", self.argb)
        } else {
            f.write_str(self.name)
        }
    }
}

/// Pack normalized channels into ARGB8888.
#[inline]
pub fn pack_color(r: f32, g: f32, b: f32, a: f32) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(a) << 24) | (channel(r) << 16) | (channel(g) << 8) | channel(b)
}

/// Unpack the RGB channels of an ARGB8888 color into [0.0, 1.0].
#[inline]
pub fn unpack_color(color: u32) -> (f32, f32, f32) {
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    (r, g, b)
}

#[inline]
pub fn alpha(color: u32) -> f32 {
    (color >> 24) as f32 / 255.0
}

/// Scale the RGB channels of `color` by `intensity`, keeping alpha.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let (r, g, b) = unpack_color(color);
    pack_color(r * intensity, g * intensity, b * intensity, alpha(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_keeps_channels() {
        let (r, g, b) = unpack_color(0xFF336699);
        assert_eq!(pack_color(r, g, b, 1.0), 0xFF336699);
    }

    #[test]
    fn modulate_scales_rgb_only() {
        assert_eq!(modulate(0x80FF0000, 0.5), 0x80800000);
        assert_eq!(modulate(0xFF00FF00, 0.0), 0xFF000000);
    }

    #[test]
    fn display_prefers_name() {
        assert_eq!(Color::named(0xFFFF0000, "red").to_string(), "red");
        assert_eq!(Color::new(0xFF00FF00).to_string(), "#FF00FF00");
    }
}
