use thiserror::Error;

use crate::models::datasets::traces::TraceKind;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to decode block payload: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("Failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: prost::EncodeError,
    },
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error("Invalid trace for transaction {transaction_id}: {source}")]
    Trace {
        transaction_id: String,
        #[source]
        source: TraceError,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum BlockError {
    #[error("Invalid block format: missing {field}")]
    MissingField { field: &'static str },
    #[error(
        "Invalid block format: {transaction_ids} transaction ids, {transactions} transactions and {traces} traces"
    )]
    TransactionCountMismatch {
        transaction_ids: usize,
        transactions: usize,
        traces: usize,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum TraceError {
    #[error(
        "Trace of `{method}` pairs {transactions} {kind} transactions with {traces} {kind} traces"
    )]
    CardinalityMismatch {
        method: String,
        kind: TraceKind,
        transactions: usize,
        traces: usize,
    },
    #[error("Transaction `{method}` has no `{field}` address")]
    MissingAddress { method: String, field: &'static str },
    #[error("Main call index {index} does not fit in an int32")]
    MainCallIndexOverflow { index: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum CallPathError {
    #[error("Invalid call path {path:?}: must start with ':'")]
    MissingSeparator { path: String },
    #[error("Invalid call path {path:?}: ends after an edge marker")]
    Truncated { path: String },
    #[error("Invalid call path {path:?}: unexpected segment {segment:?}")]
    InvalidSegment { path: String, segment: String },
}
