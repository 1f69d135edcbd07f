// Builders for hand-made blocks and trace trees used across unit tests
use prost_types::Timestamp;
use std::collections::BTreeMap;

use crate::models::datasets::blocks::{Block, BlockBody, BlockHeader, ExtraDataEntry, FirehoseBody};
use crate::models::datasets::logs::LogEvent;
use crate::models::datasets::traces::{
    ExecutionStatus, TransactionExecutingStateSet, TransactionTrace,
};
use crate::models::datasets::transactions::{Address, Hash, Transaction};

pub(crate) const REF_BLOCK_PREFIX: [u8; 4] = [0x62, 0x26, 0x3b, 0x36];

pub(crate) fn address(seed: u8) -> Address {
    Address {
        value: vec![seed; 32],
    }
}

pub(crate) fn hash(seed: u8) -> Hash {
    Hash {
        value: vec![seed; 32],
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    method: String,
    status: ExecutionStatus,
    pre: Vec<Node>,
    inline: Vec<Node>,
    post: Vec<Node>,
}

impl Node {
    pub(crate) fn new(method: &str, status: ExecutionStatus) -> Self {
        Self {
            method: method.to_string(),
            status,
            pre: Vec::new(),
            inline: Vec::new(),
            post: Vec::new(),
        }
    }

    pub(crate) fn pre(mut self, child: Node) -> Self {
        self.pre.push(child);
        self
    }

    pub(crate) fn inline(mut self, child: Node) -> Self {
        self.inline.push(child);
        self
    }

    pub(crate) fn post(mut self, child: Node) -> Self {
        self.post.push(child);
        self
    }

    pub(crate) fn build(&self) -> (Transaction, TransactionTrace) {
        let transaction = Transaction {
            from: Some(address(1)),
            to: Some(address(2)),
            ref_block_number: 7,
            ref_block_prefix: REF_BLOCK_PREFIX.to_vec(),
            method_name: self.method.clone(),
            params: self.method.as_bytes().to_vec(),
            signature: vec![0xaa; 65],
        };

        let (pre_transactions, pre_traces) = build_children(&self.pre);
        let (inline_transactions, inline_traces) = build_children(&self.inline);
        let (post_transactions, post_traces) = build_children(&self.post);

        let trace = TransactionTrace {
            transaction_id: None,
            return_value: vec![0x08, 0x01],
            error: if self.status == ExecutionStatus::Executed {
                String::new()
            } else {
                format!("{} failed", self.method)
            },
            pre_transactions,
            pre_traces,
            inline_transactions,
            inline_traces,
            post_transactions,
            post_traces,
            logs: vec![LogEvent {
                address: Some(address(2)),
                name: format!("{}Done", self.method),
                indexed: vec![vec![0x01]],
                non_indexed: vec![0x02],
            }],
            elapsed: 10,
            execution_status: self.status as i32,
            state_set: Some(TransactionExecutingStateSet {
                writes: BTreeMap::from([(format!("state/{}", self.method), vec![0x01])]),
                reads: BTreeMap::from([(format!("state/{}", self.method), true)]),
                deletes: BTreeMap::new(),
            }),
        };

        (transaction, trace)
    }
}

fn build_children(nodes: &[Node]) -> (Vec<Transaction>, Vec<TransactionTrace>) {
    nodes.iter().map(Node::build).unzip()
}

pub(crate) fn header(height: i64) -> BlockHeader {
    BlockHeader {
        version: 0,
        chain_id: 9992731,
        previous_block_hash: Some(hash(0x10)),
        merkle_tree_root_of_transactions: Some(hash(0x11)),
        merkle_tree_root_of_world_state: Some(hash(0x12)),
        bloom: Vec::new(),
        height,
        extra_data: vec![
            ExtraDataEntry {
                key: "CrossChain".to_string(),
                value: Vec::new(),
            },
            ExtraDataEntry {
                key: "Consensus".to_string(),
                value: vec![0x0a, 0x01],
            },
        ],
        time: Some(Timestamp {
            seconds: 1737209793,
            nanos: 890336100,
        }),
        merkle_tree_root_of_transaction_status: Some(hash(0x13)),
        signer_pubkey: vec![0x04; 65],
        signature: vec![0x8b; 65],
    }
}

// A block at `height` with one transaction per node, ids derived from the position
pub(crate) fn block(height: i64, nodes: &[Node]) -> Block {
    let (transactions, transaction_traces) = build_children(nodes);
    let transaction_ids = (0..nodes.len())
        .map(|i| hash(0xc0 + i as u8))
        .collect();

    Block {
        header: Some(header(height)),
        body: Some(BlockBody { transaction_ids }),
        firehose_body: Some(FirehoseBody {
            transactions,
            transaction_traces,
        }),
    }
}
