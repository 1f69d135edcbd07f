use serde::Serialize;

use crate::models::datasets::transactions::Address;
use crate::utils::serialization;

////////////////////////////////////// Raw Data ////////////////////////////////////////
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogEvent {
    #[prost(message, optional, tag = "1")]
    pub address: Option<Address>,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub indexed: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "4")]
    pub non_indexed: Vec<u8>,
}

/////////////////////////////////// Transformed Data ///////////////////////////////////
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct TransformedLogEvent {
    #[prost(string, tag = "1")]
    pub address: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(bytes = "vec", repeated, tag = "3")]
    #[serde(serialize_with = "serialization::hex_list")]
    pub indexed: Vec<Vec<u8>>,
    #[prost(bytes = "vec", tag = "4")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub non_indexed: Vec<u8>,
}
