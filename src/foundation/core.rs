pub(crate) use kurbo::Affine;

/// Straight-alpha RGBA8 color, the fully resolved form of every color property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the initial value of the CSS `color` property.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Return the same color with alpha forced to 255.
    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    /// Legacy `#rrggbb` / `#rrggbbaa` notation.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// A rasterized bitmap read back from the CPU renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl Bitmap {
    /// Read the straight-alpha pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        if !self.premultiplied || px[3] == 255 || px[3] == 0 {
            return Some(Rgba8::new(px[0], px[1], px[2], px[3]));
        }
        let a = u16::from(px[3]);
        let unpremul = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
        Some(Rgba8::new(unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), px[3]))
    }

    /// Flatten onto `backdrop` and drop alpha, producing tightly packed RGB8.
    pub fn to_rgb8_over(&self, backdrop: Rgba8) -> Vec<u8> {
        let bd = backdrop.opaque();
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for px in self.data.chunks_exact(4) {
            let a = u16::from(px[3]);
            let inv = 255 - a;
            let over = |c: u8, b: u8| -> u8 {
                let src = if self.premultiplied {
                    u16::from(c)
                } else {
                    (u16::from(c) * a + 127) / 255
                };
                (src + (u16::from(b) * inv + 127) / 255).min(255) as u8
            };
            out.push(over(px[0], bd.r));
            out.push(over(px[1], bd.g));
            out.push(over(px[2], bd.b));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
