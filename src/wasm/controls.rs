use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use web_sys::{window, Document, HtmlAnchorElement, HtmlCanvasElement, HtmlElement};

use super::raster::CanvasRasterizer;
use super::render::{self, SharedSim};
use crate::mask::TextLayout;
use crate::params::{ParamKey, Params, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::Simulation;

const EXPORT_NAME: &str = "andrew-intro.png";

/// JS-facing handle: owns the canvas and the running simulation, and exposes
/// the UI control handlers.
#[wasm_bindgen]
pub struct Intro {
    sim: SharedSim,
    canvas: HtmlCanvasElement,
    document: Document,
    picker: StdRng,
}

#[wasm_bindgen]
impl Intro {
    /// Create the canvas inside `container_id`, build the fields and start
    /// the animation loop.
    pub fn mount(container_id: &str) -> Result<Intro, JsValue> {
        let window = window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or("canvas container not found")?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        container.append_child(&canvas)?;

        let mut sim = Simulation::new(
            Params::default(),
            TextLayout::default(),
            CanvasRasterizer::new(document.clone()),
        );
        sim.reinitialize();
        let sim = Rc::new(RefCell::new(sim));
        render::start(canvas.clone(), sim.clone())?;

        hide_loading(&document);
        web_sys::console::log_1(&"intro mounted".into());

        // Only picks fresh seeds for the randomize control.
        let entropy = (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
        Ok(Intro {
            sim,
            canvas,
            document,
            picker: StdRng::seed_from_u64(entropy),
        })
    }

    #[wasm_bindgen(js_name = updateParam)]
    pub fn update_param(&self, name: &str, value: f64) -> Result<(), JsValue> {
        self.sim
            .borrow_mut()
            .update_param(name, value)
            .map(|_| ())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Returns the seed the input box should display afterwards.
    #[wasm_bindgen(js_name = updateSeed)]
    pub fn update_seed(&self, input: &str) -> u32 {
        self.sim.borrow_mut().enter_seed(input).seed()
    }

    #[wasm_bindgen(js_name = previousSeed)]
    pub fn previous_seed(&self) -> u32 {
        self.sim.borrow_mut().previous_seed().seed()
    }

    #[wasm_bindgen(js_name = nextSeed)]
    pub fn next_seed(&self) -> u32 {
        self.sim.borrow_mut().next_seed().seed()
    }

    #[wasm_bindgen(js_name = randomSeed)]
    pub fn random_seed(&mut self) -> u32 {
        self.sim.borrow_mut().randomize_seed(&mut self.picker).seed()
    }

    #[wasm_bindgen(js_name = resetParameters)]
    pub fn reset_parameters(&self) {
        self.sim.borrow_mut().reset_parameters();
    }

    pub fn param(&self, name: &str) -> Result<f64, JsValue> {
        let key: ParamKey = name
            .parse()
            .map_err(|err: crate::IntroError| JsValue::from_str(&err.to_string()))?;
        Ok(self.sim.borrow().params().get(key))
    }

    pub fn seed(&self) -> u32 {
        self.sim.borrow().params().seed
    }

    /// Download the current frame as a PNG.
    #[wasm_bindgen(js_name = saveImage)]
    pub fn save_image(&self) -> Result<(), JsValue> {
        let url = self.canvas.to_data_url_with_type("image/png")?;
        let anchor = self
            .document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()?;
        anchor.set_href(&url);
        anchor.set_download(EXPORT_NAME);
        anchor.click();
        Ok(())
    }
}

fn hide_loading(document: &Document) {
    let Ok(Some(el)) = document.query_selector(".loading") else {
        return;
    };
    if let Ok(el) = el.dyn_into::<HtmlElement>() {
        let _ = el.style().set_property("display", "none");
    }
}
