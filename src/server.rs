//! Minimal static server for the page, stylesheet, and animation bundle.
//!
//! Blocking, one request per connection. Files are read from disk on every
//! request and served verbatim.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;

/// How long a connection may stay silent before it is dropped.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Cap on request line plus headers.
pub const MAX_REQUEST_BYTES: u64 = 8 * 1024;

/// One routable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub route: &'static str,
    pub file: &'static str,
    pub content_type: &'static str,
}

pub const ASSETS: &[Asset] = &[
    Asset {
        route: "/",
        file: "index.html",
        content_type: "text/html",
    },
    Asset {
        route: "/styles.css",
        file: "styles.css",
        content_type: "text/css",
    },
    Asset {
        route: "/frontend.js",
        file: "frontend.js",
        content_type: "application/javascript",
    },
    Asset {
        route: "/pkg/intro_viz.js",
        file: "pkg/intro_viz.js",
        content_type: "application/javascript",
    },
    Asset {
        route: "/pkg/intro_viz_bg.wasm",
        file: "pkg/intro_viz_bg.wasm",
        content_type: "application/wasm",
    },
];

/// Exact-match routing; any query string is ignored.
pub fn route(target: &str) -> Option<&'static Asset> {
    let path = target.split(['?', '#']).next().unwrap_or(target);
    ASSETS.iter().find(|asset| asset.route == path)
}

#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Response {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type,
            body,
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            reason: "Not Found",
            content_type: "text/plain",
            body: b"Not Found".to_vec(),
        }
    }

    fn bad_request() -> Self {
        Self {
            status: 400,
            reason: "Bad Request",
            content_type: "text/plain",
            body: b"Bad Request".to_vec(),
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(
            out,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            self.reason,
            self.content_type,
            self.body.len()
        )?;
        out.write_all(&self.body)?;
        out.flush()
    }
}

/// Resolve a request line against the asset table under `root`.
pub fn respond(root: &Path, request_line: &str) -> Response {
    let mut parts = request_line.split_whitespace();
    let (Some(_method), Some(target)) = (parts.next(), parts.next()) else {
        return Response::bad_request();
    };
    let Some(asset) = route(target) else {
        return Response::not_found();
    };
    match fs::read(root.join(asset.file)) {
        Ok(body) => Response::ok(asset.content_type, body),
        Err(err) => {
            warn!(file = asset.file, %err, "asset missing on disk");
            Response::not_found()
        }
    }
}

pub struct StaticServer {
    listener: TcpListener,
    root: PathBuf,
    read_timeout: Duration,
}

impl StaticServer {
    pub fn bind<A: ToSocketAddrs>(addr: A, root: impl Into<PathBuf>) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        Ok(Self {
            listener,
            root: root.into(),
            read_timeout: READ_TIMEOUT,
        })
    }

    /// Connections are served one at a time, so an idle client holds up
    /// everyone behind it for at most this long.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and answer a single connection.
    pub fn serve_one(&self) -> Result<()> {
        let (stream, peer) = self.listener.accept()?;
        self.handle(stream, peer)
    }

    /// Serve until the listener fails. Per-connection errors are logged and
    /// do not stop the loop.
    pub fn run(&self) -> Result<()> {
        info!(addr = %self.local_addr()?, root = %self.root.display(), "serving");
        loop {
            let (stream, peer) = self.listener.accept()?;
            if let Err(err) = self.handle(stream, peer) {
                warn!(%peer, %err, "request failed");
            }
        }
    }

    fn handle(&self, mut stream: TcpStream, peer: SocketAddr) -> Result<()> {
        stream.set_read_timeout(Some(self.read_timeout))?;
        let mut reader = BufReader::new(stream.try_clone()?.take(MAX_REQUEST_BYTES));
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;
        // Drain headers so the client sees a clean close.
        let mut header = String::new();
        while reader.read_line(&mut header)? > 0 && !header.trim_end().is_empty() {
            header.clear();
        }

        let request_line = request_line.trim_end();
        let response = respond(&self.root, request_line);
        info!(%peer, request = request_line, status = response.status, "request");
        response.write_to(&mut stream)?;
        Ok(())
    }
}
