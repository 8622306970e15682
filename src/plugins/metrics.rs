use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::{routing::get, Router};
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct MetricsPlugin {
    registry: Arc<Registry>,
    pub request_counter: Arc<IntCounterVec>,
    pub request_duration: Arc<HistogramVec>,
}

impl MetricsPlugin {
    pub fn new() -> Self {
        let registry = Registry::new();
        let ctr_opts = Opts::new("requests_total", "Total HTTP requests");
        let counter = IntCounterVec::new(ctr_opts, &["method", "plugin", "status"]).expect("counter");
        registry.register(Box::new(counter.clone())).ok();

        let hist_opts =
            HistogramOpts::new("request_duration_seconds", "HTTP request latencies in seconds");
        let histogram = HistogramVec::new(hist_opts, &["method", "plugin"]).expect("histogram");
        registry.register(Box::new(histogram.clone())).ok();

        #[cfg(target_os = "linux")]
        {
            let collector = prometheus::process_collector::ProcessCollector::for_self();
            registry.register(Box::new(collector)).ok();
        }

        MetricsPlugin {
            registry: Arc::new(registry),
            request_counter: Arc::new(counter),
            request_duration: Arc::new(histogram),
        }
    }

    /// Middleware body used by the kernel to instrument plugin routers.
    pub async fn track(&self, plugin: &'static str, req: Request, next: Next) -> Response {
        let method = req.method().as_str().to_string();
        let start = Instant::now();
        let resp = next.run(req).await;
        let status = resp.status().as_u16().to_string();
        self.request_counter
            .with_label_values(&[&method, plugin, &status])
            .inc();
        self.request_duration
            .with_label_values(&[&method, plugin])
            .observe(start.elapsed().as_secs_f64());
        resp
    }

    pub fn router(&self) -> Router {
        let reg = self.registry.clone();
        Router::new().route(
            "/",
            get(move || {
                let encoder = TextEncoder::new();
                let metric_families = reg.gather();
                let mut buffer = Vec::new();
                encoder.encode(&metric_families, &mut buffer).unwrap();
                let body = String::from_utf8(buffer).unwrap();
                async move { (axum::http::StatusCode::OK, body) }
            }),
        )
    }
}

impl Default for MetricsPlugin {
    fn default() -> Self {
        Self::new()
    }
}
