use std::fmt;

/// Errors surfaced by the intro library.
///
/// Visual degradations (missing raster backend, failed text placement) are
/// not errors; they fall back silently and only log.
#[derive(Debug)]
pub enum IntroError {
    /// A UI control id that does not name a tunable parameter.
    UnknownParam(String),
    /// A pixel buffer whose length does not match its dimensions.
    BufferSize { expected: usize, actual: usize },
    /// Filesystem or socket failure on the host side.
    Io(std::io::Error),
    /// PNG encoding failure during export.
    #[cfg(not(target_arch = "wasm32"))]
    Image(image::ImageError),
}

impl fmt::Display for IntroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParam(name) => write!(f, "unknown parameter: {name}"),
            Self::BufferSize { expected, actual } => write!(
                f,
                "buffer holds {actual} values, expected {expected}"
            ),
            Self::Io(err) => write!(f, "io error: {err}"),
            #[cfg(not(target_arch = "wasm32"))]
            Self::Image(err) => write!(f, "image export failed: {err}"),
        }
    }
}

impl std::error::Error for IntroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            #[cfg(not(target_arch = "wasm32"))]
            Self::Image(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IntroError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<image::ImageError> for IntroError {
    fn from(err: image::ImageError) -> Self {
        Self::Image(err)
    }
}

pub type Result<T> = std::result::Result<T, IntroError>;
