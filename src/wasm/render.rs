use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, CanvasRenderingContext2d, HtmlCanvasElement};

use super::raster::CanvasRasterizer;
use crate::sim::Simulation;
use crate::surface::{Rgba, Surface};

pub type SharedSim = Rc<RefCell<Simulation<CanvasRasterizer>>>;

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or("2d canvas context not supported")?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Canvas 2D target. Remembers the last fill so runs of same-colored
/// particles do not re-parse the style string.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
    width: f64,
    height: f64,
    last_fill: Option<Rgba>,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self {
            ctx,
            width,
            height,
            last_fill: None,
        }
    }

    fn fill(&mut self, color: Rgba) {
        if self.last_fill != Some(color) {
            self.ctx.set_fill_style_str(&color.css());
            self.last_fill = Some(color);
        }
    }
}

impl Surface for CanvasSurface<'_> {
    fn clear(&mut self, color: Rgba) {
        self.fill(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, diameter: f64, color: Rgba) {
        self.fill(color);
        self.ctx.begin_path();
        if self
            .ctx
            .arc(x, y, diameter / 2.0, 0.0, std::f64::consts::TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }
}

/// Start the animation loop: one simulation step per display refresh.
pub fn start(canvas: HtmlCanvasElement, sim: SharedSim) -> Result<(), JsValue> {
    let ctx = context_2d(&canvas)?;
    let (width, height) = (f64::from(canvas.width()), f64::from(canvas.height()));

    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        {
            let mut surface = CanvasSurface::new(&ctx, width, height);
            sim.borrow_mut().step(&mut surface);
        }

        // schedule next
        if let (Some(win), Some(cb)) = (window(), f.borrow().as_ref()) {
            if let Err(err) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                web_sys::console::error_2(&"animation loop stopped".into(), &err);
            }
        }
    }) as Box<dyn FnMut()>));

    let win = window().ok_or("no window")?;
    if let Some(cb) = g.borrow().as_ref() {
        win.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }

    Ok(())
}
