//! Drawing targets for the particle fields.

/// 8-bit straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::gray(0);
    pub const WHITE: Rgba = Rgba::gray(255);

    pub const fn gray(v: u8) -> Self {
        Self {
            r: v,
            g: v,
            b: v,
            a: 255,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS color string for canvas fill styles.
    pub fn css(self) -> String {
        format!(
            "rgba({}, {}, {}, {:.4})",
            self.r,
            self.g,
            self.b,
            f64::from(self.a) / 255.0
        )
    }
}

/// Anything the driver can paint a frame onto.
pub trait Surface {
    fn clear(&mut self, color: Rgba);
    /// Filled circle; `diameter` matches the canvas `circle()` convention.
    fn fill_circle(&mut self, x: f64, y: f64, diameter: f64, color: Rgba);
}

/// Software RGBA surface for headless rendering and export.
#[derive(Debug, Clone)]
pub struct PixelFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let i = (y * self.width + x) * 4;
        let alpha = f64::from(color.a) / 255.0;
        let mix = |dst: u8, src: u8| -> u8 {
            (f64::from(src) * alpha + f64::from(dst) * (1.0 - alpha)).round() as u8
        };
        self.pixels[i] = mix(self.pixels[i], color.r);
        self.pixels[i + 1] = mix(self.pixels[i + 1], color.g);
        self.pixels[i + 2] = mix(self.pixels[i + 2], color.b);
        self.pixels[i + 3] = self.pixels[i + 3].max(color.a);
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_png(&self, path: impl AsRef<std::path::Path>) -> crate::error::Result<()> {
        let image = image::RgbaImage::from_raw(
            self.width as u32,
            self.height as u32,
            self.pixels.clone(),
        )
        .ok_or(crate::error::IntroError::BufferSize {
            expected: self.width * self.height * 4,
            actual: self.pixels.len(),
        })?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

impl Surface for PixelFrame {
    fn clear(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, diameter: f64, color: Rgba) {
        if !(x.is_finite() && y.is_finite()) || self.width == 0 || self.height == 0 {
            return;
        }
        let r = (diameter / 2.0).max(0.0);
        let x0 = (x - r).floor().max(0.0) as usize;
        let y0 = (y - r).floor().max(0.0) as usize;
        let x1 = ((x + r).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((y + r).ceil().max(0.0) as usize).min(self.height);

        let mut covered = false;
        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f64 + 0.5 - x;
                let dy = py as f64 + 0.5 - y;
                if dx * dx + dy * dy <= r * r {
                    self.blend(px, py, color);
                    covered = true;
                }
            }
        }
        // Sub-pixel dots still land on the pixel that contains them.
        if !covered && x >= 0.0 && y >= 0.0 {
            let (px, py) = (x as usize, y as usize);
            if px < self.width && py < self.height {
                self.blend(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_then_opaque_circle() {
        let mut frame = PixelFrame::new(16, 16);
        frame.clear(Rgba::BLACK);
        frame.fill_circle(8.0, 8.0, 4.0, Rgba::WHITE);
        assert_eq!(frame.pixel(8, 8), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(16, 0), None);
    }

    #[test]
    fn translucent_circle_blends_over_black() {
        let mut frame = PixelFrame::new(4, 4);
        frame.clear(Rgba::BLACK);
        frame.fill_circle(2.0, 2.0, 2.0, Rgba::WHITE.with_alpha(128));
        let [r, g, b, a] = frame.pixel(1, 1).unwrap();
        assert_eq!((r, g, b, a), (128, 128, 128, 255));
    }

    #[test]
    fn tiny_and_offscreen_dots_are_safe() {
        let mut frame = PixelFrame::new(4, 4);
        frame.clear(Rgba::BLACK);
        frame.fill_circle(0.1, 0.1, 0.2, Rgba::WHITE);
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
        frame.fill_circle(-50.0, 900.0, 3.0, Rgba::WHITE);
        frame.fill_circle(f64::NAN, 1.0, 3.0, Rgba::WHITE);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn saved_png_reads_back_with_same_pixels() {
        let mut frame = PixelFrame::new(12, 8);
        frame.clear(Rgba::BLACK);
        frame.fill_circle(6.0, 4.0, 4.0, Rgba::WHITE);
        let path = std::env::temp_dir()
            .join(format!("intro_viz_frame_{}.png", std::process::id()));

        frame.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        let _ = std::fs::remove_file(&path);

        assert_eq!(decoded.dimensions(), (12, 8));
        assert_eq!(decoded.get_pixel(6, 4).0, [255, 255, 255, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(decoded.as_raw().as_slice(), frame.as_rgba());
    }

    #[test]
    fn css_uses_unit_alpha() {
        assert_eq!(Rgba::WHITE.with_alpha(0).css(), "rgba(255, 255, 255, 0.0000)");
        assert_eq!(Rgba::BLACK.css(), "rgba(0, 0, 0, 1.0000)");
    }
}
