use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::models::datasets::logs::LogEvent;
use crate::models::datasets::transactions::{Hash, Transaction};
use crate::utils::serialization;

////////////////////////////////////// Raw Data ////////////////////////////////////////
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ExecutionStatus {
    Undefined = 0,
    Executed = 1,
    Canceled = -1,
    SystemError = -2,
    ContractError = -10,
    ExceededMaxCallDepth = -11,
    Prefailed = -99,
    Postfailed = -199,
}

impl ExecutionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionStatus::Undefined => "UNDEFINED",
            ExecutionStatus::Executed => "EXECUTED",
            ExecutionStatus::Canceled => "CANCELED",
            ExecutionStatus::SystemError => "SYSTEM_ERROR",
            ExecutionStatus::ContractError => "CONTRACT_ERROR",
            ExecutionStatus::ExceededMaxCallDepth => "EXCEEDED_MAX_CALL_DEPTH",
            ExecutionStatus::Prefailed => "PREFAILED",
            ExecutionStatus::Postfailed => "POSTFAILED",
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionExecutingStateSet {
    #[prost(btree_map = "string, bytes", tag = "1")]
    pub writes: BTreeMap<String, Vec<u8>>,
    #[prost(btree_map = "string, bool", tag = "2")]
    pub reads: BTreeMap<String, bool>,
    #[prost(btree_map = "string, bool", tag = "3")]
    pub deletes: BTreeMap<String, bool>,
}

// One node of a transaction's execution tree. Each child list is paired
// positionally with the transaction list of the same kind.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionTrace {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: Option<Hash>,
    #[prost(bytes = "vec", tag = "2")]
    pub return_value: Vec<u8>,
    #[prost(string, tag = "3")]
    pub error: String,
    #[prost(message, repeated, tag = "4")]
    pub pre_transactions: Vec<Transaction>,
    #[prost(message, repeated, tag = "5")]
    pub pre_traces: Vec<TransactionTrace>,
    #[prost(message, repeated, tag = "6")]
    pub inline_transactions: Vec<Transaction>,
    #[prost(message, repeated, tag = "7")]
    pub inline_traces: Vec<TransactionTrace>,
    #[prost(message, repeated, tag = "8")]
    pub post_transactions: Vec<Transaction>,
    #[prost(message, repeated, tag = "9")]
    pub post_traces: Vec<TransactionTrace>,
    #[prost(message, repeated, tag = "10")]
    pub logs: Vec<LogEvent>,
    #[prost(int64, tag = "11")]
    pub elapsed: i64,
    #[prost(enumeration = "ExecutionStatus", tag = "12")]
    pub execution_status: i32,
    #[prost(message, optional, tag = "13")]
    pub state_set: Option<TransactionExecutingStateSet>,
}

impl TransactionTrace {
    /// Whether the node reported a successful execution of its own.
    ///
    /// Status values unknown to this build are not treated as success.
    pub fn is_executed(&self) -> bool {
        matches!(
            ExecutionStatus::try_from(self.execution_status),
            Ok(ExecutionStatus::Executed)
        )
    }
}

/////////////////////////////////// Transformed Data ///////////////////////////////////
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TransformedStateSet {
    #[prost(btree_map = "string, bytes", tag = "1")]
    #[serde(serialize_with = "serialization::hex_map")]
    pub writes: BTreeMap<String, Vec<u8>>,
    #[prost(btree_map = "string, bool", tag = "2")]
    pub reads: BTreeMap<String, bool>,
    #[prost(btree_map = "string, bool", tag = "3")]
    pub deletes: BTreeMap<String, bool>,
}

impl From<&TransactionExecutingStateSet> for TransformedStateSet {
    fn from(state_set: &TransactionExecutingStateSet) -> Self {
        Self {
            writes: state_set.writes.clone(),
            reads: state_set.reads.clone(),
            deletes: state_set.deletes.clone(),
        }
    }
}

// The three relations a child trace can have with its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Pre,
    Inline,
    Post,
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceKind::Pre => f.write_str("pre"),
            TraceKind::Inline => f.write_str("inline"),
            TraceKind::Post => f.write_str("post"),
        }
    }
}
