//! Command-line options for the host helper.
//!
//! Parsed by hand. Environment variables (`INTRO_VIZ_*`) override defaults and
//! explicit flags override environment variables.

use std::path::PathBuf;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
intro_viz: magnetic particle intro

USAGE:
    intro_viz [serve|render] [OPTIONS]

COMMANDS:
    serve       Build the wasm bundle into <root>/pkg and serve <root> (default)
    render      Run the simulation headless and export one frame as PNG

OPTIONS:
    --port=N        Port to serve on (default: 3000)
    --root=DIR      Static directory to serve (default: static)
    --no-build      Skip the wasm-pack build before serving
    --seed=N        Seed for render (default: 12345)
    --particles=N   Background particle count for render (default: 8000)
    --frames=N      Frames to simulate before exporting (default: 120)
    --out=PATH      PNG output path (default: andrew-intro.png)
    --help, -h      Show this help message
    --version, -V   Show version

ENVIRONMENT VARIABLES:
    INTRO_VIZ_PORT      Override --port
    INTRO_VIZ_ROOT      Override --root
    INTRO_VIZ_SEED      Override --seed
    RUST_LOG            Log filter (default: info)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Render,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub command: Command,
    pub port: u16,
    pub root: PathBuf,
    pub build: bool,
    pub seed: Option<u32>,
    pub particles: Option<usize>,
    pub frames: u32,
    pub out: PathBuf,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            command: Command::Serve,
            port: 3000,
            root: PathBuf::from("static"),
            build: true,
            seed: None,
            particles: None,
            frames: 120,
            out: PathBuf::from("andrew-intro.png"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse from an argument list (without the program name) and an
    /// environment lookup.
    pub fn parse_from<I, E>(args: I, env: E) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = env("INTRO_VIZ_PORT") {
            opts.port = parse_num("INTRO_VIZ_PORT", &val)?;
        }
        if let Some(val) = env("INTRO_VIZ_ROOT") {
            opts.root = PathBuf::from(val);
        }
        if let Some(val) = env("INTRO_VIZ_SEED") {
            opts.seed = Some(parse_num("INTRO_VIZ_SEED", &val)?);
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "serve" => opts.command = Command::Serve,
                "render" => opts.command = Command::Render,
                "--no-build" => opts.build = false,
                other => {
                    let Some((flag, val)) = other.split_once('=') else {
                        return Err(format!("unknown argument: {other}"));
                    };
                    match flag {
                        "--port" => opts.port = parse_num(flag, val)?,
                        "--root" => opts.root = PathBuf::from(val),
                        "--seed" => opts.seed = Some(parse_num(flag, val)?),
                        "--particles" => opts.particles = Some(parse_num(flag, val)?),
                        "--frames" => opts.frames = parse_num(flag, val)?,
                        "--out" => opts.out = PathBuf::from(val),
                        _ => return Err(format!("unknown argument: {other}")),
                    }
                }
            }
        }

        if opts.seed == Some(0) {
            return Err("seed must be positive".to_string());
        }
        Ok(Parsed::Run(opts))
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("invalid value for {name}: {val}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_serve_static_on_3000() {
        let Parsed::Run(opts) = Opts::parse_from(args(&[]), no_env).unwrap() else {
            panic!("expected run");
        };
        assert_eq!(opts, Opts::default());
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            "INTRO_VIZ_PORT" => Some("8080".to_string()),
            "INTRO_VIZ_SEED" => Some("5".to_string()),
            _ => None,
        };
        let parsed = Opts::parse_from(args(&["render", "--seed=9", "--frames=3"]), env).unwrap();
        let Parsed::Run(opts) = parsed else {
            panic!("expected run");
        };
        assert_eq!(opts.command, Command::Render);
        assert_eq!(opts.port, 8080);
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.frames, 3);
    }

    #[test]
    fn help_version_and_errors() {
        assert_eq!(Opts::parse_from(args(&["-h"]), no_env), Ok(Parsed::Help));
        assert_eq!(Opts::parse_from(args(&["--version"]), no_env), Ok(Parsed::Version));
        assert!(Opts::parse_from(args(&["--port=abc"]), no_env).is_err());
        assert!(Opts::parse_from(args(&["--bogus"]), no_env).is_err());
        assert!(Opts::parse_from(args(&["--seed=0"]), no_env).is_err());
    }
}
