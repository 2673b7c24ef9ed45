use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

/// Metrics collects and exposes HTTP server metrics.
pub struct Metrics {
    registry: Registry,
    http_requests_total: CounterVec,
    http_request_duration_seconds: HistogramVec,
    errors_total: CounterVec,
    network_traffic_bytes: CounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "endpoint", "status"],
        )?;
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "endpoint"],
        )?;
        let errors_total = CounterVec::new(
            Opts::new("errors_total", "Total number of error responses"),
            &["class", "endpoint"],
        )?;
        let network_traffic_bytes = CounterVec::new(
            Opts::new("network_traffic_bytes", "Network traffic in bytes"),
            &["direction"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(errors_total.clone()))?;
        registry.register(Box::new(network_traffic_bytes.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            errors_total,
            network_traffic_bytes,
        })
    }

    fn record_request(&self, method: &str, endpoint: &str, status: u16, duration: Duration) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration.as_secs_f64());
    }

    fn record_error(&self, class: &str, endpoint: &str) {
        self.errors_total.with_label_values(&[class, endpoint]).inc();
    }

    fn record_network_traffic(&self, direction: &str, bytes: usize) {
        if bytes > 0 {
            self.network_traffic_bytes
                .with_label_values(&[direction])
                .inc_by(bytes as f64);
        }
    }

    /// Prometheus text exposition of everything registered.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn content_length(headers: &HeaderMap) -> usize {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0)
}

/// Records count, latency, error class and traffic of every request.
///
/// The endpoint label is the matched route template (`/food/api/v1/orders/{id}`),
/// never the raw path, so ids do not blow up label cardinality.
pub async fn track(
    State(metrics): State<Arc<Metrics>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    metrics.record_network_traffic("in", content_length(req.headers()));

    let start = Instant::now();
    let response = next.run(req).await;
    let duration = start.elapsed();

    let status = response.status();
    metrics.record_request(&method, &endpoint, status.as_u16(), duration);
    if status.is_client_error() {
        metrics.record_error("client", &endpoint);
    } else if status.is_server_error() {
        metrics.record_error("server", &endpoint);
    }
    metrics.record_network_traffic("out", content_length(response.headers()));

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_requests_show_up_in_exposition() {
        let metrics = Metrics::new().unwrap();
        metrics.record_request("GET", "/food/api/v1/orders/{id}", 404, Duration::from_millis(3));
        metrics.record_error("client", "/food/api/v1/orders/{id}");

        let text = metrics.render().unwrap();
        assert!(text.contains("http_requests_total"));
        assert!(text.contains(r#"endpoint="/food/api/v1/orders/{id}""#));
        assert!(text.contains(r#"class="client""#));
    }

    #[test]
    fn empty_bodies_are_not_counted_as_traffic() {
        let metrics = Metrics::new().unwrap();
        metrics.record_network_traffic("in", 0);
        assert!(!metrics.render().unwrap().contains(r#"direction="in""#));
    }
}
