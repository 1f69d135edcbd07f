use crate::models::datasets::logs::{LogEvent, TransformedLogEvent};

pub trait LogTransformer {
    fn transform_logs(logs: &[LogEvent]) -> Vec<TransformedLogEvent>;
}

impl LogTransformer for LogEvent {
    fn transform_logs(logs: &[LogEvent]) -> Vec<TransformedLogEvent> {
        logs.iter()
            .map(|log| TransformedLogEvent {
                // Logs without an emitter keep an empty address rather than failing the block
                address: log
                    .address
                    .as_ref()
                    .map(|address| address.to_base58())
                    .unwrap_or_default(),
                name: log.name.clone(),
                indexed: log.indexed.clone(),
                non_indexed: log.non_indexed.clone(),
            })
            .collect()
    }
}
