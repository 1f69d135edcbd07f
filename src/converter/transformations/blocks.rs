use std::collections::BTreeMap;

use crate::models::datasets::blocks::{BlockHeader, TransformedBlockHeader};
use crate::models::datasets::transactions::Hash;

pub trait BlockTransformer {
    fn transform_header(&self) -> TransformedBlockHeader;
}

impl BlockTransformer for BlockHeader {
    fn transform_header(&self) -> TransformedBlockHeader {
        TransformedBlockHeader {
            version: self.version,
            chain_id: self.chain_id,
            previous_block_hash: hash_hex(&self.previous_block_hash),
            merkle_tree_root_of_transactions: hash_hex(&self.merkle_tree_root_of_transactions),
            merkle_tree_root_of_world_state: hash_hex(&self.merkle_tree_root_of_world_state),
            bloom: self.bloom.clone(),
            height: self.height,
            // Repeated keys resolve to the last entry, as a protobuf map would
            extra_data: self
                .extra_data
                .iter()
                .map(|entry| (entry.key.clone(), entry.value.clone()))
                .collect::<BTreeMap<_, _>>(),
            time: self.time.clone(),
            merkle_tree_root_of_transaction_status: hash_hex(
                &self.merkle_tree_root_of_transaction_status,
            ),
            signer_pubkey: self.signer_pubkey.clone(),
            signature: self.signature.clone(),
        }
    }
}

fn hash_hex(hash: &Option<Hash>) -> String {
    hash.as_ref().map(Hash::to_hex).unwrap_or_default()
}
