use anyhow::{Context, Result};
use axum::{Router, http::StatusCode, routing::get};
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Gauge, Histogram, MeterProvider};
use opentelemetry_sdk::metrics::{MetricError, SdkMeterProvider};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::models::datasets::blocks::TransformedBlock;

pub struct Metrics {
    registry: Arc<prometheus::Registry>,
    _provider: SdkMeterProvider,

    // Conversion metrics
    pub blocks_converted: Counter<u64>,
    pub transactions_converted: Counter<u64>,
    pub calls_emitted: Counter<u64>,
    pub reverted_calls: Counter<u64>,
    pub conversion_errors: Counter<u64>,

    // Latest block metrics
    pub latest_block_height: Gauge<u64>,
    pub block_conversion_time: Histogram<f64>,
}

impl Metrics {
    pub fn new() -> Result<Self, MetricError> {
        let registry = prometheus::Registry::new();

        // Export OpenTelemetry instruments through the prometheus registry
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();
        let meter = provider.meter("fireaelf_metrics");

        let blocks_converted = meter
            .u64_counter("fireaelf_blocks_converted")
            .with_description("Total number of blocks converted")
            .build();

        let transactions_converted = meter
            .u64_counter("fireaelf_transactions_converted")
            .with_description("Total number of transaction traces converted")
            .build();

        let calls_emitted = meter
            .u64_counter("fireaelf_calls_emitted")
            .with_description("Total number of flattened calls emitted")
            .build();

        let reverted_calls = meter
            .u64_counter("fireaelf_reverted_calls")
            .with_description("Number of emitted calls marked as reverted")
            .build();

        let conversion_errors = meter
            .u64_counter("fireaelf_conversion_errors")
            .with_description("Number of blocks that failed to convert")
            .build();

        let latest_block_height = meter
            .u64_gauge("fireaelf_latest_block_height")
            .with_description("Height of the latest converted block")
            .build();

        let block_conversion_time = meter
            .f64_histogram("fireaelf_block_conversion_time")
            .with_description("Time spent converting a block")
            .with_boundaries(vec![
                0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ])
            .with_unit("s")
            .build();

        Ok(Self {
            registry: Arc::new(registry),
            _provider: provider,
            blocks_converted,
            transactions_converted,
            calls_emitted,
            reverted_calls,
            conversion_errors,
            latest_block_height,
            block_conversion_time,
        })
    }

    pub fn record_block(&self, block: &TransformedBlock, elapsed_secs: f64) {
        let attributes = block
            .header
            .as_ref()
            .map(|header| vec![KeyValue::new("chain_id", i64::from(header.chain_id))])
            .unwrap_or_default();

        let calls = block
            .transaction_traces
            .iter()
            .flat_map(|trace| &trace.calls);
        let (emitted, reverted) = calls.fold((0u64, 0u64), |(emitted, reverted), call| {
            (emitted + 1, reverted + u64::from(call.reverted))
        });

        self.blocks_converted.add(1, &attributes);
        self.transactions_converted
            .add(block.transaction_traces.len() as u64, &attributes);
        self.calls_emitted.add(emitted, &attributes);
        self.reverted_calls.add(reverted, &attributes);
        self.latest_block_height.record(block.number(), &attributes);
        self.block_conversion_time.record(elapsed_secs, &attributes);
    }

    pub fn record_error(&self) {
        self.conversion_errors.add(1, &[]);
    }

    pub async fn start_metrics_server(&self, addr: &str, port: u16) -> Result<()> {
        let addr = format!("{addr}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid metrics address {addr}:{port}"))?;
        let registry = self.registry.clone();

        let app = Router::new().route("/metrics", get(move || metrics_handler(registry.clone())));

        // Only used for logging
        let access_url = if addr.ip().is_unspecified() {
            format!("http://localhost:{port}/metrics")
        } else {
            format!("http://{}:{port}/metrics", addr.ip())
        };

        info!(
            "Starting metrics server - binding to {} (accessible at {})",
            addr, access_url
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind metrics server to {addr}"))?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Metrics server stopped: {}", e);
            }
        });

        Ok(())
    }

    pub fn render(&self) -> Result<String> {
        render_registry(&self.registry)
    }
}

async fn metrics_handler(registry: Arc<prometheus::Registry>) -> (StatusCode, String) {
    match render_registry(&registry) {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to render metrics: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

fn render_registry(registry: &prometheus::Registry) -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("failed to encode metrics")?;
    String::from_utf8(buffer).context("metrics are not valid utf-8")
}
