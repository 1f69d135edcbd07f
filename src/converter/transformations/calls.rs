use crate::converter::annotate::AnnotatedTrace;
use crate::converter::transformations::logs::LogTransformer;
use crate::models::datasets::calls::{Call, CallSequence};
use crate::models::datasets::logs::LogEvent;
use crate::models::datasets::traces::TransformedStateSet;
use crate::utils::encoding::to_hex;

pub trait CallTransformer {
    /// Flattens a trace tree into calls in execution order: pre-children, the node
    /// itself, inline children, then post-children, each group in original order
    /// and expanded recursively.
    ///
    /// The node's path is `{path_prefix}:{index}`. Pre and post children extend it
    /// with `:pre` and `:post`; inline children share the node's namespace.
    fn transform_calls(&self, transaction_id: &str, path_prefix: &str, index: usize)
    -> CallSequence;
}

impl CallTransformer for AnnotatedTrace<'_> {
    fn transform_calls(
        &self,
        transaction_id: &str,
        path_prefix: &str,
        index: usize,
    ) -> CallSequence {
        let mut calls = Vec::with_capacity(self.node_count());
        let main_call_index = flatten_calls(
            self,
            transaction_id,
            format!("{path_prefix}:{index}"),
            &mut calls,
        );

        CallSequence {
            calls,
            main_call_index,
        }
    }
}

// Appends the calls of `node` to `calls` and returns the position of the node's
// own call relative to where this subtree starts
fn flatten_calls(
    node: &AnnotatedTrace<'_>,
    transaction_id: &str,
    call_path: String,
    calls: &mut Vec<Call>,
) -> usize {
    let start = calls.len();

    for (i, child) in node.pre.iter().enumerate() {
        flatten_calls(child, transaction_id, format!("{call_path}:pre:{i}"), calls);
    }

    let main_call_index = calls.len() - start;
    calls.push(build_call(node, transaction_id, call_path.clone()));

    for (i, child) in node.inline.iter().enumerate() {
        flatten_calls(child, transaction_id, format!("{call_path}:{i}"), calls);
    }
    for (i, child) in node.post.iter().enumerate() {
        flatten_calls(child, transaction_id, format!("{call_path}:post:{i}"), calls);
    }

    main_call_index
}

fn build_call(node: &AnnotatedTrace<'_>, transaction_id: &str, call_path: String) -> Call {
    let transaction = node.transaction;
    let trace = node.trace;

    Call {
        transaction_id: transaction_id.to_string(),
        call_path,
        ref_block_number: transaction.ref_block_number,
        ref_block_prefix: to_hex(&transaction.ref_block_prefix),
        from: node.from.to_base58(),
        to: node.to.to_base58(),
        method_name: transaction.method_name.clone(),
        params: transaction.params.clone(),
        execution_status: trace.execution_status,
        return_value: trace.return_value.clone(),
        error: trace.error.clone(),
        state_set: Some(
            trace
                .state_set
                .as_ref()
                .map(TransformedStateSet::from)
                .unwrap_or_default(),
        ),
        logs: LogEvent::transform_logs(&trace.logs),
        reverted: node.reverted,
    }
}
