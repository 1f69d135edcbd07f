use serde::Serialize;

use crate::models::datasets::calls::Call;
use crate::utils::encoding::{to_base58_check, to_hex};

////////////////////////////////////// Raw Data ////////////////////////////////////////
// Wire format emitted by the AElf node
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Address {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

impl Address {
    pub fn to_base58(&self) -> String {
        to_base58_check(&self.value)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct Hash {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

impl Hash {
    pub fn to_hex(&self) -> String {
        to_hex(&self.value)
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(message, optional, tag = "1")]
    pub from: Option<Address>,
    #[prost(message, optional, tag = "2")]
    pub to: Option<Address>,
    #[prost(int64, tag = "3")]
    pub ref_block_number: i64,
    #[prost(bytes = "vec", tag = "4")]
    pub ref_block_prefix: Vec<u8>,
    #[prost(string, tag = "5")]
    pub method_name: String,
    #[prost(bytes = "vec", tag = "6")]
    pub params: Vec<u8>,
    #[prost(bytes = "vec", tag = "10000")]
    pub signature: Vec<u8>,
}

/////////////////////////////////// Transformed Data ///////////////////////////////////
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TransformedTransactionTrace {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(bytes = "vec", tag = "2")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub raw_transaction: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub signature: Vec<u8>,
    #[prost(message, repeated, tag = "4")]
    pub calls: Vec<Call>,
    #[prost(int32, tag = "5")]
    pub main_call_index: i32,
}

impl TransformedTransactionTrace {
    // The call produced by the transaction itself, as opposed to its pre/inline/post calls
    pub fn main_call(&self) -> Option<&Call> {
        usize::try_from(self.main_call_index)
            .ok()
            .and_then(|index| self.calls.get(index))
    }
}
