use anyhow::{Context, Result, anyhow};
use base64::{Engine, engine::general_purpose::STANDARD};
use prost::Message;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::{signal, time::Instant};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

use firehose_aelf::converter::process_block;
use firehose_aelf::metrics::Metrics;
use firehose_aelf::models::common::{Config, OutputFormat};
use firehose_aelf::models::datasets::blocks::TransformedBlock;
use firehose_aelf::utils::{decode_payload, load_config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing. Stdout carries converted blocks, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    info!("=========================== INITIALIZING ===========================");

    let config = match load_config("config.yml") {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            return Err(e);
        }
    };

    // Initialize optional metrics
    let metrics = if config.metrics.enabled {
        let metrics = Metrics::new().map_err(|e| anyhow!("failed to set up metrics: {e}"))?;
        metrics
            .start_metrics_server(&config.metrics.address, config.metrics.port)
            .await?;
        Some(metrics)
    } else {
        info!("Metrics are disabled");
        None
    };

    info!(
        "Reading {:?} blocks from stdin, writing {:?} blocks to stdout",
        config.input_format, config.output_format
    );
    info!("============================ CONVERTING ============================");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            _ = &mut shutdown => {
                info!("Received Ctrl+C signal, shutting down...");
                break;
            }
            line = lines.next_line() => line.context("failed to read block from stdin")?,
        };

        let Some(line) = line else {
            info!("Input closed, shutting down...");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let start = Instant::now();
        let block = match convert_line(&line, &config) {
            Ok(block) => block,
            Err(e) => {
                // Never emit a partial or guessed block
                if let Some(metrics) = &metrics {
                    metrics.record_error();
                }
                error!("Failed to convert block: {:#}", e);
                return Err(e);
            }
        };
        let elapsed = start.elapsed().as_secs_f64();

        let output = render_block(&block, config.output_format)?;
        stdout
            .write_all(output.as_bytes())
            .await
            .context("failed to write block to stdout")?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;

        info!(
            "Converted block {} ({}) with {} transactions and {} calls in {:.3}s",
            block.number(),
            block.id(),
            block.transaction_traces.len(),
            block.call_count(),
            elapsed
        );
        if let Some(metrics) = &metrics {
            metrics.record_block(&block, elapsed);
        }
    }

    Ok(())
}

fn convert_line(line: &str, config: &Config) -> Result<TransformedBlock> {
    let payload = decode_payload(line, config.input_format)?;
    let block = process_block(&payload)?;
    Ok(block)
}

fn render_block(block: &TransformedBlock, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string(block).context("failed to serialize block"),
        OutputFormat::Protobuf => Ok(STANDARD.encode(block.encode_to_vec())),
    }
}
