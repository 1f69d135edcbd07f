pub mod annotate;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod transformations;

use prost::Message;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::converter::transformations::{
    blocks::BlockTransformer, transactions::TransactionTransformer,
};
use crate::models::datasets::blocks::{Block, BlockHeader, TransformedBlock};
use crate::models::datasets::transactions::Transaction;
use crate::models::errors::{BlockError, ConvertError};

/// Schema version stamped on every converted block.
pub const BLOCK_VERSION: i32 = 1;

pub fn decode_block(payload: &[u8]) -> Result<Block, ConvertError> {
    Ok(Block::decode(payload)?)
}

/// The block id: hex SHA-256 of the header's protobuf encoding with the signature cleared.
pub fn block_id(header: &BlockHeader) -> Result<String, ConvertError> {
    let unsigned = BlockHeader {
        signature: Vec::new(),
        ..header.clone()
    };
    let bytes = encode_message(&unsigned, "block header")?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Converts a decoded node block into the indexer's block model.
///
/// Fails on a missing header or when the transaction ids, transactions and
/// traces are not aligned. A missing body or firehose body is treated as empty.
pub fn convert_block(block_id: &str, block: &Block) -> Result<TransformedBlock, ConvertError> {
    let header = block
        .header
        .as_ref()
        .ok_or(BlockError::MissingField { field: "header" })?;

    let transaction_ids = block
        .body
        .as_ref()
        .map(|body| body.transaction_ids.as_slice())
        .unwrap_or_default();
    let (transactions, traces) = block
        .firehose_body
        .as_ref()
        .map(|firehose| {
            (
                firehose.transactions.as_slice(),
                firehose.transaction_traces.as_slice(),
            )
        })
        .unwrap_or_default();

    let transaction_traces =
        Transaction::transform_transactions(transaction_ids, transactions, traces)?;

    Ok(TransformedBlock {
        version: BLOCK_VERSION,
        block_hash: block_id.to_string(),
        height: header.height,
        header: Some(header.transform_header()),
        transaction_traces,
    })
}

/// Decodes a raw node block and converts it, deriving the block id from its header.
pub fn process_block(payload: &[u8]) -> Result<TransformedBlock, ConvertError> {
    let block = decode_block(payload)?;
    let header = block
        .header
        .as_ref()
        .ok_or(BlockError::MissingField { field: "header" })?;
    let id = block_id(header)?;

    let converted = convert_block(&id, &block)?;
    debug!(
        block_id = %converted.id(),
        height = converted.height,
        transactions = converted.transaction_traces.len(),
        calls = converted.call_count(),
        "Converted block"
    );

    Ok(converted)
}

pub(crate) fn encode_message<M: Message>(
    message: &M,
    what: &'static str,
) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::with_capacity(message.encoded_len());
    message
        .encode(&mut buf)
        .map_err(|source| ConvertError::Encode { what, source })?;
    Ok(buf)
}
