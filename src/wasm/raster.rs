use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement};

use super::render::context_2d;
use crate::mask::{MaskRasterizer, TextLayout};

const FONT_FAMILY: &str = "Montserrat, sans-serif";

/// Draws the word into a detached `<canvas>` and reads back the red channel.
pub struct CanvasRasterizer {
    document: Document,
}

impl CanvasRasterizer {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn draw(&self, layout: &TextLayout) -> Result<Vec<u8>, JsValue> {
        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        let (w, h) = (layout.pixel_width() as u32, layout.pixel_height() as u32);
        canvas.set_width(w);
        canvas.set_height(h);

        let ctx = context_2d(&canvas)?;
        ctx.set_fill_style_str("#000");
        ctx.fill_rect(0.0, 0.0, f64::from(w), f64::from(h));
        ctx.set_fill_style_str("#fff");
        ctx.set_font(&format!("{}px {}", layout.text_size, FONT_FAMILY));
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(&layout.word, layout.width / 2.0, layout.height / 2.0)?;

        let data = ctx.get_image_data(0.0, 0.0, f64::from(w), f64::from(h))?.data();
        Ok(data.0.chunks_exact(4).map(|px| px[0]).collect())
    }
}

impl MaskRasterizer for CanvasRasterizer {
    fn rasterize(&self, layout: &TextLayout) -> Option<Vec<u8>> {
        match self.draw(layout) {
            Ok(pixels) => Some(pixels),
            Err(err) => {
                web_sys::console::warn_2(&"text raster unavailable".into(), &err);
                None
            }
        }
    }
}
