//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg` and
//! serves `static/`; `cargo run -- render` exports a headless frame as PNG.

#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    host::main()
}

// The browser entry point lives in the library.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::env;
    use std::path::Path;
    use std::process::{Command, ExitCode};

    use intro_viz::server::StaticServer;
    use intro_viz::{BlockFontRasterizer, Params, PixelFrame, Simulation, TextLayout};
    use tracing::{error, info, warn};
    use tracing_subscriber::EnvFilter;

    use crate::cli::{self, Opts, Parsed};

    pub fn main() -> ExitCode {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        let opts = match Opts::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{}", cli::HELP_TEXT);
                return ExitCode::SUCCESS;
            }
            Ok(Parsed::Version) => {
                println!("intro_viz {}", cli::VERSION);
                return ExitCode::SUCCESS;
            }
            Err(msg) => {
                eprintln!("{msg}\n\n{}", cli::HELP_TEXT);
                return ExitCode::from(2);
            }
        };

        let result = match opts.command {
            cli::Command::Serve => serve(&opts),
            cli::Command::Render => render(&opts),
        };
        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!(%err, "intro_viz failed");
                ExitCode::FAILURE
            }
        }
    }

    fn serve(opts: &Opts) -> intro_viz::Result<()> {
        if opts.build {
            build_wasm(opts);
        }
        println!("Server running at http://localhost:{}", opts.port);
        StaticServer::bind(("127.0.0.1", opts.port), &opts.root)?.run()
    }

    /// Compile the wasm bundle into `<root>/pkg`. Failures only warn; the
    /// site may then serve stale artifacts.
    fn build_wasm(opts: &Opts) {
        info!("building WASM pkg");
        let out_dir = opts.root.join("pkg");
        let status = wasm_pack_command(&out_dir).status();
        match status {
            Ok(st) if st.success() => info!(out = %out_dir.display(), "wasm bundle ready"),
            Ok(st) => warn!(%st, "wasm-pack finished with errors"),
            Err(err) => warn!(%err, "wasm-pack not found in PATH, skipping wasm build"),
        }
    }

    /// The build script skips its own wasm-pack run when this is set; without
    /// it the inner cargo waits on the outer one's build-directory lock.
    const NESTED_BUILD_ENV: &str = "INTRO_VIZ_NESTED_BUILD";

    fn wasm_pack_command(out_dir: &Path) -> Command {
        let mut command = Command::new("wasm-pack");
        command
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(out_dir)
            .env(NESTED_BUILD_ENV, "1");
        command
    }

    fn render(opts: &Opts) -> intro_viz::Result<()> {
        let defaults = Params::default();
        let params = Params {
            seed: opts.seed.unwrap_or(defaults.seed),
            particle_count: opts.particles.unwrap_or(defaults.particle_count),
            ..defaults
        };
        let layout = TextLayout::default();
        let mut frame = PixelFrame::new(layout.pixel_width(), layout.pixel_height());
        let mut sim = Simulation::new(params, layout, BlockFontRasterizer);
        sim.reinitialize();
        for _ in 0..opts.frames {
            sim.step(&mut frame);
        }
        if opts.frames == 0 {
            sim.render(&mut frame);
        }
        frame.save_png(&opts.out)?;
        info!(
            seed = params.seed,
            frames = opts.frames,
            out = %opts.out.display(),
            "exported frame"
        );
        Ok(())
    }

}
