#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use intro_viz::Intro;

wasm_bindgen_test_configure!(run_in_browser);

fn mount() -> Intro {
    let document = web_sys::window().unwrap().document().unwrap();
    if document.get_element_by_id("canvas-container").is_none() {
        let container = document.create_element("div").unwrap();
        container.set_id("canvas-container");
        document.body().unwrap().append_child(&container).unwrap();
    }
    Intro::mount("canvas-container").expect("mount failed")
}

#[wasm_bindgen_test]
fn canvas_exists() {
    let _intro = mount();
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .query_selector("#canvas-container canvas")
        .unwrap()
        .expect("canvas element not found")
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    assert_eq!((canvas.width(), canvas.height()), (1200, 675));
}

#[wasm_bindgen_test]
fn seed_controls_round_trip() {
    let mut intro = mount();
    let start = intro.seed();
    assert_eq!(intro.update_seed("abc"), start);
    assert_eq!(intro.next_seed(), start + 1);
    assert_eq!(intro.previous_seed(), start);
    let random = intro.random_seed();
    assert!((1..=999_999).contains(&random));
}

#[wasm_bindgen_test]
fn unknown_param_is_rejected() {
    let intro = mount();
    assert!(intro.update_param("bogus", 1.0).is_err());
    intro.update_param("jitterAmount", 0.0).unwrap();
    assert_eq!(intro.param("jitterAmount").unwrap(), 0.0);
}
