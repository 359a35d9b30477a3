use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Process-lifetime counters backing the metrics endpoint.
pub struct ServiceMetrics {
    started_at: Instant,
    total_queries: AtomicU64,
    failed_queries: AtomicU64,
    total_latency_micros: AtomicU64,
    documents_ingested: AtomicU64,
    chunks_ingested: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub failed_queries: u64,
    pub avg_response_time_ms: f64,
    pub documents_ingested: u64,
    pub chunks_ingested: u64,
    pub uptime_seconds: u64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_queries: AtomicU64::new(0),
            failed_queries: AtomicU64::new(0),
            total_latency_micros: AtomicU64::new(0),
            documents_ingested: AtomicU64::new(0),
            chunks_ingested: AtomicU64::new(0),
        }
    }

    pub fn record_query(&self, latency: Duration, succeeded: bool) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        self.total_latency_micros
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
        if !succeeded {
            self.failed_queries.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_ingestion(&self, documents: usize, chunks: usize) {
        self.documents_ingested
            .fetch_add(documents as u64, Ordering::Relaxed);
        self.chunks_ingested.fetch_add(chunks as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_queries = self.total_queries.load(Ordering::Relaxed);
        let total_latency_micros = self.total_latency_micros.load(Ordering::Relaxed);

        let avg_response_time_ms = if total_queries == 0 {
            0.0
        } else {
            total_latency_micros as f64 / total_queries as f64 / 1000.0
        };

        MetricsSnapshot {
            total_queries,
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            avg_response_time_ms,
            documents_ingested: self.documents_ingested.load(Ordering::Relaxed),
            chunks_ingested: self.chunks_ingested.load(Ordering::Relaxed),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}
