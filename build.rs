// Build script: compiles the wasm bundle when targeting wasm32 and mirrors
// `static/` into `dist/` so the site can be deployed as-is.
use std::process::Command;
use std::{env, fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    // Not the whole directory: wasm-pack writes `static/pkg` during the build.
    for asset in ["static/index.html", "static/styles.css", "static/frontend.js"] {
        println!("cargo:rerun-if-changed={asset}");
    }

    // Only run the heavy wasm-pack build when targeting wasm32, and never
    // from inside wasm-pack itself.
    let target = env::var("TARGET").unwrap_or_default();
    let nested = env::var("INTRO_VIZ_NESTED_BUILD").is_ok();
    if target == "wasm32-unknown-unknown" && !nested {
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
            .env("INTRO_VIZ_NESTED_BUILD", "1")
            .status();

        match status {
            Ok(st) if st.success() => {}
            Ok(_) => println!("cargo:warning=wasm-pack build failed"),
            Err(_) => println!("cargo:warning=wasm-pack not installed – skipping"),
        }
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let options = CopyOptions::new().overwrite(true).content_only(true);
        if let Err(err) = copy(static_dir, out_dir, &options) {
            println!("cargo:warning=copying static/ to dist/ failed: {err}");
        }
    }
}
