//! In-process stand-in for the capture service.

#![allow(dead_code)]

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use pktconsole::session::Synchronizer;

/// Recorded traffic and canned responses
#[derive(Default)]
pub struct Backend {
    hits: Mutex<HashMap<&'static str, usize>>,
    packet_queries: Mutex<Vec<String>>,
    bodies: Mutex<Vec<(&'static str, Value)>>,
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    pub fail_statistics: AtomicBool,
    pub fail_upload: AtomicBool,
    pub capturing: AtomicBool,
    pub packets: Mutex<Value>,
    pub statistics: Mutex<Value>,
    pub alerts: Mutex<Value>,
}

impl Backend {
    pub fn hits(&self, route: &str) -> usize {
        self.hits.lock().get(route).copied().unwrap_or(0)
    }

    pub fn packet_queries(&self) -> Vec<String> {
        self.packet_queries.lock().clone()
    }

    pub fn last_body(&self, route: &str) -> Option<Value> {
        self.bodies
            .lock()
            .iter()
            .rev()
            .find(|(r, _)| *r == route)
            .map(|(_, body)| body.clone())
    }

    fn hit(&self, route: &'static str) {
        *self.hits.lock().entry(route).or_insert(0) += 1;
    }
}

pub struct StubServer {
    pub backend: Arc<Backend>,
    pub base: String,
}

impl StubServer {
    /// Base URL of the API, as the console expects it
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base)
    }

    pub fn ingest_url(&self) -> String {
        format!("{}/api/pcap/upload", self.base)
    }
}

/// Start the stub on an ephemeral port in its own actix system
pub fn spawn_backend() -> StubServer {
    let backend = Arc::new(Backend::default());
    *backend.packets.lock() = json!({"packets": [], "total": 0});
    *backend.statistics.lock() = json!({});
    *backend.alerts.lock() = json!({"alerts": []});

    let state = web::Data::from(backend.clone());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let system = actix_rt::System::new();
        system.block_on(async move {
            let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
                .workers(1)
                .bind(("127.0.0.1", 0))
                .expect("bind stub backend");
            let port = server.addrs()[0].port();
            tx.send(port).expect("report port");
            server.run().await.expect("run stub backend");
        });
    });

    let port = rx.recv().expect("stub backend port");
    StubServer {
        backend,
        base: format!("http://127.0.0.1:{}", port),
    }
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/capture")
                    .route("/status", web::get().to(capture_status))
                    .route("/start", web::post().to(capture_start))
                    .route("/stop", web::post().to(capture_stop)),
            )
            .route("/packets", web::get().to(packets))
            .route("/statistics", web::get().to(statistics))
            .route("/alerts", web::get().to(alerts))
            .route("/export", web::post().to(export))
            .route("/clear", web::post().to(clear))
            .route("/pcap/upload", web::post().to(upload))
            .route("/echo", web::get().to(echo))
            .route("/plain", web::get().to(plain))
            .route("/nothing", web::post().to(nothing))
            .route("/teapot", web::get().to(teapot)),
    );
}

async fn capture_status(state: web::Data<Backend>) -> impl Responder {
    state.hit("status");
    HttpResponse::Ok().json(json!({
        "is_capturing": state.capturing.load(Ordering::SeqCst),
        "packets_captured": 10,
        "packets_analyzed": 8,
    }))
}

async fn capture_start(state: web::Data<Backend>, body: web::Json<Value>) -> impl Responder {
    state.hit("start");
    state.bodies.lock().push(("start", body.into_inner()));
    if state.fail_start.load(Ordering::SeqCst) {
        return HttpResponse::InternalServerError().body("interface not found");
    }
    state.capturing.store(true, Ordering::SeqCst);
    HttpResponse::Ok().json(json!({"message": "Capture started"}))
}

async fn capture_stop(state: web::Data<Backend>) -> impl Responder {
    state.hit("stop");
    if state.fail_stop.load(Ordering::SeqCst) {
        return HttpResponse::InternalServerError().body("stop failed");
    }
    state.capturing.store(false, Ordering::SeqCst);
    HttpResponse::Ok().body("Capture stopped")
}

async fn packets(state: web::Data<Backend>, req: HttpRequest) -> impl Responder {
    state.hit("packets");
    state.packet_queries.lock().push(req.query_string().to_string());
    HttpResponse::Ok().json(state.packets.lock().clone())
}

async fn statistics(state: web::Data<Backend>) -> impl Responder {
    state.hit("statistics");
    if state.fail_statistics.load(Ordering::SeqCst) {
        return HttpResponse::ServiceUnavailable().body("busy");
    }
    HttpResponse::Ok().json(state.statistics.lock().clone())
}

async fn alerts(state: web::Data<Backend>) -> impl Responder {
    state.hit("alerts");
    HttpResponse::Ok().json(state.alerts.lock().clone())
}

async fn export(state: web::Data<Backend>, body: web::Json<Value>) -> impl Responder {
    state.hit("export");
    state.bodies.lock().push(("export", body.into_inner()));
    HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(r#"[{"id":1}]"#)
}

async fn clear(state: web::Data<Backend>) -> impl Responder {
    state.hit("clear");
    *state.packets.lock() = json!({"packets": [], "total": 0});
    HttpResponse::Ok().json(json!({"message": "All packets cleared"}))
}

async fn upload(state: web::Data<Backend>, body: web::Bytes) -> impl Responder {
    state.hit("upload");
    if state.fail_upload.load(Ordering::SeqCst) {
        return HttpResponse::BadRequest().body("not a pcap");
    }
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"file\"") {
        return HttpResponse::BadRequest().body("missing file part");
    }
    HttpResponse::Ok().json(json!({"ingested": true}))
}

async fn echo(req: HttpRequest) -> impl Responder {
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    HttpResponse::Ok().json(json!({
        "query": req.query_string(),
        "headers": headers,
    }))
}

async fn plain() -> impl Responder {
    HttpResponse::Ok().content_type("text/plain").body("pong")
}

async fn nothing() -> impl Responder {
    HttpResponse::NoContent().finish()
}

async fn teapot() -> impl Responder {
    HttpResponse::build(actix_web::http::StatusCode::IM_A_TEAPOT).body("short and stout")
}

/// Synchronizer that only counts how often it runs
#[derive(Default)]
pub struct CountingSync {
    pub runs: AtomicUsize,
}

impl CountingSync {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Synchronizer for CountingSync {
    fn resync(&self) -> BoxFuture<'static, ()> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {})
    }
}
