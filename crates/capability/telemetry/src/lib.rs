//! 追踪初始化、请求 ID 与请求计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_sent: u64,
    pub requests_succeeded: u64,
    pub http_failures: u64,
    pub transport_failures: u64,
    pub latency_ms_total: u64,
}

impl MetricsSnapshot {
    /// 平均耗时（毫秒）；尚无完成的请求时为 None。
    pub fn average_latency_ms(&self) -> Option<u64> {
        let completed = self.requests_succeeded + self.http_failures;
        (completed > 0).then(|| self.latency_ms_total / completed)
    }
}

/// HTTP 请求计数。
#[derive(Debug, Default)]
pub struct RequestMetrics {
    requests_sent: AtomicU64,
    requests_succeeded: AtomicU64,
    http_failures: AtomicU64,
    transport_failures: AtomicU64,
    latency_ms_total: AtomicU64,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_sent: self.requests_sent.load(Ordering::Relaxed),
            requests_succeeded: self.requests_succeeded.load(Ordering::Relaxed),
            http_failures: self.http_failures.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            latency_ms_total: self.latency_ms_total.load(Ordering::Relaxed),
        }
    }
}

static METRICS: OnceLock<RequestMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static RequestMetrics {
    METRICS.get_or_init(RequestMetrics::new)
}

/// 初始化 tracing；`RUST_LOG` 优先，其次使用传入的默认过滤表达式。
///
/// 日志写到 stderr，避免污染命令输出。
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// 生成新的 request_id。
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录发出的请求。
pub fn record_request_sent() {
    metrics().requests_sent.fetch_add(1, Ordering::Relaxed);
}

/// 记录 2xx 响应及其耗时（毫秒）。
pub fn record_request_succeeded(latency_ms: u64) {
    let metrics = metrics();
    metrics.requests_succeeded.fetch_add(1, Ordering::Relaxed);
    metrics
        .latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
}

/// 记录非 2xx 响应及其耗时（毫秒）。
pub fn record_http_failure(latency_ms: u64) {
    let metrics = metrics();
    metrics.http_failures.fetch_add(1, Ordering::Relaxed);
    metrics
        .latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
}

/// 记录连接/超时等传输层失败。
pub fn record_transport_failure() {
    metrics().transport_failures.fetch_add(1, Ordering::Relaxed);
}
