use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::datasets::traces::TransactionTrace;
use crate::models::datasets::transactions::{Hash, Transaction, TransformedTransactionTrace};
use crate::utils::serialization;

////////////////////////////////////// Raw Data ////////////////////////////////////////
// `extra_data` is a map on the wire. It is kept as ordered entries so that
// re-encoding a header reproduces the node's bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExtraDataEntry {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockHeader {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(int32, tag = "2")]
    pub chain_id: i32,
    #[prost(message, optional, tag = "3")]
    pub previous_block_hash: Option<Hash>,
    #[prost(message, optional, tag = "4")]
    pub merkle_tree_root_of_transactions: Option<Hash>,
    #[prost(message, optional, tag = "5")]
    pub merkle_tree_root_of_world_state: Option<Hash>,
    #[prost(bytes = "vec", tag = "6")]
    pub bloom: Vec<u8>,
    #[prost(int64, tag = "7")]
    pub height: i64,
    #[prost(message, repeated, tag = "8")]
    pub extra_data: Vec<ExtraDataEntry>,
    #[prost(message, optional, tag = "9")]
    pub time: Option<Timestamp>,
    #[prost(message, optional, tag = "10")]
    pub merkle_tree_root_of_transaction_status: Option<Hash>,
    #[prost(bytes = "vec", tag = "9999")]
    pub signer_pubkey: Vec<u8>,
    #[prost(bytes = "vec", tag = "10000")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockBody {
    #[prost(message, repeated, tag = "1")]
    pub transaction_ids: Vec<Hash>,
}

// Execution data attached by the node's firehose plugin. Transactions and
// traces are positionally aligned with `BlockBody::transaction_ids`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FirehoseBody {
    #[prost(message, repeated, tag = "1")]
    pub transactions: Vec<Transaction>,
    #[prost(message, repeated, tag = "3")]
    pub transaction_traces: Vec<TransactionTrace>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Block {
    #[prost(message, optional, tag = "1")]
    pub header: Option<BlockHeader>,
    #[prost(message, optional, tag = "2")]
    pub body: Option<BlockBody>,
    #[prost(message, optional, tag = "7001")]
    pub firehose_body: Option<FirehoseBody>,
}

/////////////////////////////////// Transformed Data ///////////////////////////////////
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TransformedBlockHeader {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(int32, tag = "2")]
    pub chain_id: i32,
    #[prost(string, tag = "3")]
    pub previous_block_hash: String,
    #[prost(string, tag = "4")]
    pub merkle_tree_root_of_transactions: String,
    #[prost(string, tag = "5")]
    pub merkle_tree_root_of_world_state: String,
    #[prost(bytes = "vec", tag = "6")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub bloom: Vec<u8>,
    #[prost(int64, tag = "7")]
    pub height: i64,
    #[prost(btree_map = "string, bytes", tag = "8")]
    #[serde(serialize_with = "serialization::hex_map")]
    pub extra_data: BTreeMap<String, Vec<u8>>,
    #[prost(message, optional, tag = "9")]
    #[serde(serialize_with = "serialization::timestamp")]
    pub time: Option<Timestamp>,
    #[prost(string, tag = "10")]
    pub merkle_tree_root_of_transaction_status: String,
    #[prost(bytes = "vec", tag = "11")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub signer_pubkey: Vec<u8>,
    #[prost(bytes = "vec", tag = "12")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub signature: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TransformedBlock {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(string, tag = "2")]
    pub block_hash: String,
    #[prost(int64, tag = "3")]
    pub height: i64,
    #[prost(message, optional, tag = "4")]
    pub header: Option<TransformedBlockHeader>,
    #[prost(message, repeated, tag = "5")]
    pub transaction_traces: Vec<TransformedTransactionTrace>,
}

impl TransformedBlock {
    pub fn id(&self) -> &str {
        &self.block_hash
    }

    pub fn number(&self) -> u64 {
        u64::try_from(self.height).unwrap_or_default()
    }

    pub fn parent_id(&self) -> &str {
        self.header
            .as_ref()
            .map(|header| header.previous_block_hash.as_str())
            .unwrap_or_default()
    }

    pub fn parent_number(&self) -> u64 {
        self.number().saturating_sub(1)
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.header
            .as_ref()
            .and_then(|header| header.time.as_ref())
            .and_then(serialization::timestamp_to_datetime)
    }

    pub fn call_count(&self) -> usize {
        self.transaction_traces
            .iter()
            .map(|trace| trace.calls.len())
            .sum()
    }
}
