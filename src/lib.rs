//! Magnetic particle intro: a word drawn in shimmering particles, surrounded by
//! a field of particles attracted to its letters.
//!
//! The simulation core is target independent. Browser glue compiles only for
//! wasm32; the static server and PNG export compile only for the host.

pub mod error;
pub mod font;
pub mod mask;
pub mod params;
pub mod particles;
pub mod rng;
pub mod sim;
pub mod surface;

#[cfg(not(target_arch = "wasm32"))]
pub mod server;

pub use error::{IntroError, Result};
pub use mask::{BlockFontRasterizer, LetterBound, MaskRasterizer, TextLayout, TextMask};
pub use params::{ParamKey, Params};
pub use sim::{SeedChange, Simulation};
pub use surface::{PixelFrame, Rgba, Surface};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod controls;
    mod raster;
    mod render;

    pub use controls::Intro;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        web_sys::console::log_1(&"intro_viz wasm module loaded".into());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::Intro;
