// Glyph rasterization onto RGBA canvases
use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

/// Pixel rectangle; drawing outside it is discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn of_image(image: &RgbaImage) -> Self {
        Self::new(0, 0, image.width(), image.height())
    }

    fn contains(&self, px: i64, py: i64) -> bool {
        px >= i64::from(self.x)
            && py >= i64::from(self.y)
            && px < i64::from(self.x) + i64::from(self.width)
            && py < i64::from(self.y) + i64::from(self.height)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub em_px: f32,
    pub color: Rgba<u8>,
}

/// Draws single-line text with one shared font
#[derive(Clone)]
pub struct GlyphPainter {
    font: FontArc,
}

impl GlyphPainter {
    pub fn new(font: FontArc) -> Self {
        Self { font }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| anyhow::anyhow!("invalid font data: {}", e))?;
        Ok(Self::new(font))
    }

    /// Scale at which one em spans `em_px` pixels
    pub fn scale_for_em(&self, em_px: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(em_px * self.font.height_unscaled() / units_per_em)
    }

    /// Draw `text` with its baseline starting at `(x, baseline)`, blending
    /// glyph coverage over the canvas and clipping to `clip`.
    pub fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        baseline: i32,
        style: TextStyle,
        clip: ClipRect,
    ) {
        let scale = self.scale_for_em(style.em_px);
        let scaled = self.font.as_scaled(scale);
        let clip = intersect(clip, ClipRect::of_image(canvas));

        let mut caret = x as f32;
        let mut previous = None;

        for c in text.chars() {
            if c.is_control() {
                continue;
            }
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline as f32));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i64 + i64::from(gx);
                let py = bounds.min.y as i64 + i64::from(gy);
                if clip.contains(px, py) {
                    blend(canvas.get_pixel_mut(px as u32, py as u32), style.color, coverage);
                }
            });
        }
    }
}

fn intersect(a: ClipRect, b: ClipRect) -> ClipRect {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = (a.x + a.width).min(b.x + b.width);
    let y1 = (a.y + a.height).min(b.y + b.height);
    ClipRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * f32::from(src[3]) / 255.0;
    for channel in 0..3 {
        let s = f32::from(src[channel]);
        let d = f32::from(dst[channel]);
        dst[channel] = (s * alpha + d * (1.0 - alpha)).round() as u8;
    }
    let d_alpha = f32::from(dst[3]) / 255.0;
    dst[3] = ((alpha + d_alpha * (1.0 - alpha)) * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_clips_to_canvas() {
        let clip = intersect(ClipRect::new(250, 10, 100, 100), ClipRect::new(0, 0, 300, 65));
        assert_eq!(clip, ClipRect::new(250, 10, 50, 55));

        let disjoint = intersect(ClipRect::new(400, 0, 10, 10), ClipRect::new(0, 0, 300, 300));
        assert_eq!(disjoint.width, 0);
        assert!(!disjoint.contains(400, 0));
    }

    #[test]
    fn test_blend_full_and_partial_coverage() {
        let white = Rgba([255, 255, 255, 255]);

        let mut full = Rgba([0, 0, 0, 255]);
        blend(&mut full, white, 1.0);
        assert_eq!(full.0, [255, 255, 255, 255]);

        let mut half = Rgba([0, 0, 0, 255]);
        blend(&mut half, white, 0.5);
        assert_eq!(half.0, [128, 128, 128, 255]);

        let mut none = Rgba([10, 20, 30, 255]);
        blend(&mut none, white, 0.0);
        assert_eq!(none.0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_clip_rect_contains() {
        let rect = ClipRect::new(300, 0, 300, 300);
        assert!(rect.contains(300, 0));
        assert!(rect.contains(599, 299));
        assert!(!rect.contains(600, 0));
        assert!(!rect.contains(299, 10));
        assert!(!rect.contains(310, -1));
    }

    #[test]
    fn test_invalid_font_bytes_are_rejected() {
        assert!(GlyphPainter::from_bytes(b"not a font".to_vec()).is_err());
    }
}
