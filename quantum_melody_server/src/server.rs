// HTTP listener and worker pool.
//
// Architecture: one `tiny_http::Server` shared by `workers` threads through
// an `Arc`. Each worker loops on `recv_timeout`, so it can notice the
// `keep_running` flag within `POLL_INTERVAL` of `ServerHandle::stop`.
//
// Per request a worker reads at most `MAX_BODY_BYTES` of body (larger
// bodies get 413), builds a fresh `ShotRng` from OS entropy, and runs
// `handler::handle`. Nothing mutable
// is shared between workers; the `MelodyConfig` and renderer are read-only
// and cloned into each thread.

use std::io::{self, Read};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use quantum_melody_music::{MelodyConfig, SmfRenderer};
use quantum_melody_sim::prng::ShotRng;
use tiny_http::{Header, Request, Response, Server};
use tracing::{debug, info, warn};

use crate::handler::{Method, Reply, handle};

/// How often idle workers re-check the stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Request bodies beyond this are refused with 413.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// How much of an oversized body is discarded before replying, so the
/// client sees the 413 instead of a reset connection.
const MAX_DRAIN_BYTES: u64 = 1024 * 1024;

/// Configuration for starting the melody server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub melody: MelodyConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            workers: 4,
            melody: MelodyConfig::default(),
        }
    }
}

/// Handle returned by `start_server` to stop the running server.
pub struct ServerHandle {
    keep_running: Arc<AtomicBool>,
    threads: Vec<thread::JoinHandle<()>>,
}

impl ServerHandle {
    /// Signal all workers to stop and wait for them.
    pub fn stop(self) {
        self.keep_running.store(false, Ordering::SeqCst);
        for handle in self.threads {
            let _ = handle.join();
        }
    }

    /// Block until every worker has exited without asking them to stop.
    pub fn wait(self) {
        for handle in self.threads {
            let _ = handle.join();
        }
    }
}

/// Bind and start the worker pool. Returns the stop handle and the bound
/// address (port 0 picks a free port).
pub fn start_server(config: ServerConfig) -> std::io::Result<(ServerHandle, SocketAddr)> {
    config.melody.validate().map_err(std::io::Error::other)?;

    let server = Server::http(format!("{}:{}", config.host, config.port))
        .map_err(std::io::Error::other)?;
    let addr = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| std::io::Error::other("server is not bound to an IP address"))?;
    let server = Arc::new(server);
    let keep_running = Arc::new(AtomicBool::new(true));
    let renderer = SmfRenderer::from_config(&config.melody);

    let threads = (0..config.workers.max(1))
        .map(|worker| {
            let server = Arc::clone(&server);
            let keep_running = Arc::clone(&keep_running);
            let melody = config.melody.clone();
            let renderer = renderer.clone();
            thread::spawn(move || run_worker(worker, &server, &keep_running, &melody, &renderer))
        })
        .collect();

    info!(%addr, workers = config.workers.max(1), "melody server listening");
    Ok((
        ServerHandle {
            keep_running,
            threads,
        },
        addr,
    ))
}

fn run_worker(
    worker: usize,
    server: &Server,
    keep_running: &AtomicBool,
    melody: &MelodyConfig,
    renderer: &SmfRenderer,
) {
    while keep_running.load(Ordering::SeqCst) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => serve(worker, request, melody, renderer),
            Ok(None) => {}
            Err(e) => {
                warn!(worker, error = %e, "accept failed");
                break;
            }
        }
    }
    debug!(worker, "worker stopped");
}

fn serve(worker: usize, mut request: Request, melody: &MelodyConfig, renderer: &SmfRenderer) {
    let method = match request.method() {
        tiny_http::Method::Post => Method::Post,
        _ => Method::Other,
    };
    let url = request.url().to_string();

    let reply = match read_body(worker, &mut request) {
        Ok(body) => match ShotRng::from_entropy() {
            Ok(mut rng) => handle(method, &url, &body, melody, renderer, &mut rng),
            Err(e) => {
                warn!(worker, error = %e, "OS entropy unavailable");
                Reply::error(500, "random source unavailable")
            }
        },
        Err(reply) => reply,
    };
    debug!(worker, %url, status = reply.status, "handled request");

    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        warn!(worker, error = %e, "failed to send response");
    }
}

/// Read the whole body as UTF-8, or the error reply to send instead.
fn read_body(worker: usize, request: &mut Request) -> Result<String, Reply> {
    let mut bytes = Vec::new();
    let reader: &mut dyn Read = request.as_reader();
    if let Err(e) = (&mut *reader).take(MAX_BODY_BYTES + 1).read_to_end(&mut bytes) {
        debug!(worker, error = %e, "unreadable request body");
        return Err(Reply::error(400, "request body could not be read"));
    }
    if bytes.len() as u64 > MAX_BODY_BYTES {
        let _ = io::copy(&mut (&mut *reader).take(MAX_DRAIN_BYTES), &mut io::sink());
        debug!(worker, limit = MAX_BODY_BYTES, "request body too large");
        return Err(Reply::error(
            413,
            &format!("request body exceeds {MAX_BODY_BYTES} bytes"),
        ));
    }
    String::from_utf8(bytes)
        .map_err(|_| Reply::error(400, "request body could not be read as UTF-8 text"))
}
