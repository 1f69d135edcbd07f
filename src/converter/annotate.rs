use crate::models::datasets::traces::{TraceKind, TransactionTrace};
use crate::models::datasets::transactions::{Address, Transaction};
use crate::models::errors::TraceError;

/// A trace node paired with its transaction and its computed revert status.
///
/// Borrows from the decoded block and has the same shape as the raw trace tree.
#[derive(Debug, Clone)]
pub struct AnnotatedTrace<'a> {
    pub transaction: &'a Transaction,
    pub trace: &'a TransactionTrace,
    pub from: &'a Address,
    pub to: &'a Address,
    pub reverted: bool,
    pub pre: Vec<AnnotatedTrace<'a>>,
    pub inline: Vec<AnnotatedTrace<'a>>,
    pub post: Vec<AnnotatedTrace<'a>>,
}

impl<'a> AnnotatedTrace<'a> {
    /// Annotates a trace tree bottom-up.
    ///
    /// A node is reverted when its own status is not `Executed` or when any of its
    /// pre, inline or post children is reverted. A reverted node then forces every
    /// inline descendant to reverted, since inline calls share its atomic context.
    /// Pre and post children are committed separately and keep their own status.
    pub fn annotate(
        transaction: &'a Transaction,
        trace: &'a TransactionTrace,
    ) -> Result<Self, TraceError> {
        let (from, to) = addresses(transaction)?;

        let pre = annotate_children(
            transaction,
            TraceKind::Pre,
            &trace.pre_transactions,
            &trace.pre_traces,
        )?;
        let mut inline = annotate_children(
            transaction,
            TraceKind::Inline,
            &trace.inline_transactions,
            &trace.inline_traces,
        )?;
        let post = annotate_children(
            transaction,
            TraceKind::Post,
            &trace.post_transactions,
            &trace.post_traces,
        )?;

        let reverted = !trace.is_executed()
            || pre.iter().any(|child| child.reverted)
            || inline.iter().any(|child| child.reverted)
            || post.iter().any(|child| child.reverted);

        if reverted {
            inline.iter_mut().for_each(AnnotatedTrace::force_revert);
        }

        Ok(Self {
            transaction,
            trace,
            from,
            to,
            reverted,
            pre,
            inline,
            post,
        })
    }

    // Follows inline edges only
    fn force_revert(&mut self) {
        self.reverted = true;
        self.inline.iter_mut().for_each(AnnotatedTrace::force_revert);
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .pre
            .iter()
            .chain(&self.inline)
            .chain(&self.post)
            .map(AnnotatedTrace::node_count)
            .sum::<usize>()
    }
}

fn annotate_children<'a>(
    parent: &Transaction,
    kind: TraceKind,
    transactions: &'a [Transaction],
    traces: &'a [TransactionTrace],
) -> Result<Vec<AnnotatedTrace<'a>>, TraceError> {
    if transactions.len() != traces.len() {
        return Err(TraceError::CardinalityMismatch {
            method: parent.method_name.clone(),
            kind,
            transactions: transactions.len(),
            traces: traces.len(),
        });
    }

    transactions
        .iter()
        .zip(traces)
        .map(|(transaction, trace)| AnnotatedTrace::annotate(transaction, trace))
        .collect()
}

fn addresses(transaction: &Transaction) -> Result<(&Address, &Address), TraceError> {
    let missing = |field| TraceError::MissingAddress {
        method: transaction.method_name.clone(),
        field,
    };
    let from = transaction.from.as_ref().ok_or_else(|| missing("from"))?;
    let to = transaction.to.as_ref().ok_or_else(|| missing("to"))?;
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::fixtures::Node;
    use crate::models::datasets::traces::ExecutionStatus::{
        Canceled, ContractError, Executed, Prefailed,
    };

    #[test]
    fn leaf_follows_its_own_status() {
        let (tx, trace) = Node::new("Transfer", Executed).build();
        assert!(!AnnotatedTrace::annotate(&tx, &trace).unwrap().reverted);

        let (tx, trace) = Node::new("Transfer", ContractError).build();
        assert!(AnnotatedTrace::annotate(&tx, &trace).unwrap().reverted);
    }

    #[test]
    fn unknown_status_counts_as_failure() {
        let (tx, mut trace) = Node::new("Transfer", Executed).build();
        trace.execution_status = 42;
        assert!(AnnotatedTrace::annotate(&tx, &trace).unwrap().reverted);

        trace.execution_status = 0;
        assert!(AnnotatedTrace::annotate(&tx, &trace).unwrap().reverted);
    }

    #[test]
    fn failed_parent_reverts_inline_descendants() {
        let (tx, trace) = Node::new("Main", ContractError)
            .inline(
                Node::new("Transfer", Executed)
                    .inline(Node::new("Approve", Executed))
                    .pre(Node::new("CheckFee", Executed))
                    .post(Node::new("Notify", Executed)),
            )
            .build();

        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        let transfer = &annotated.inline[0];
        assert!(annotated.reverted);
        assert!(transfer.reverted);
        assert!(transfer.inline[0].reverted);
        // Separately committed children of an inline call keep their own status
        assert!(!transfer.pre[0].reverted);
        assert!(!transfer.post[0].reverted);
    }

    #[test]
    fn failed_inline_child_reverts_parent_and_siblings() {
        let (tx, trace) = Node::new("Main", Executed)
            .inline(Node::new("First", Executed))
            .inline(Node::new("Second", ContractError))
            .build();

        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        assert!(annotated.reverted);
        assert!(annotated.inline[0].reverted);
        assert!(annotated.inline[1].reverted);
    }

    #[test]
    fn failure_bubbles_up_from_pre_and_post_children() {
        let (tx, trace) = Node::new("Main", Executed)
            .pre(Node::new("ChargeFee", Prefailed))
            .build();
        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        assert!(annotated.reverted);
        assert!(annotated.pre[0].reverted);

        let (tx, trace) = Node::new("Main", Executed)
            .post(Node::new("Refund", Canceled))
            .build();
        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        assert!(annotated.reverted);
        assert!(annotated.post[0].reverted);
    }

    #[test]
    fn failed_parent_leaves_pre_and_post_children_alone() {
        let (tx, trace) = Node::new("Main", ContractError)
            .pre(Node::new("ChargeFee", Executed).inline(Node::new("Burn", Executed)))
            .post(Node::new("Refund", Executed))
            .build();

        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        assert!(annotated.reverted);
        assert!(!annotated.pre[0].reverted);
        assert!(!annotated.pre[0].inline[0].reverted);
        assert!(!annotated.post[0].reverted);
    }

    #[test]
    fn reverted_pre_child_only_touches_its_own_inline_subtree() {
        let (tx, trace) = Node::new("Main", Executed)
            .pre(Node::new("ChargeFee", Prefailed).inline(Node::new("Burn", Executed)))
            .inline(Node::new("Transfer", Executed))
            .build();

        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        assert!(annotated.pre[0].inline[0].reverted);
        // The parent reverts because a pre-child did, which in turn reverts its inline calls
        assert!(annotated.reverted);
        assert!(annotated.inline[0].reverted);
    }

    #[test]
    fn counts_every_node() {
        let (tx, trace) = Node::new("Main", Executed)
            .pre(Node::new("A", Executed).post(Node::new("B", Executed)))
            .inline(Node::new("C", Executed).inline(Node::new("D", Executed)))
            .post(Node::new("E", Executed))
            .build();

        let annotated = AnnotatedTrace::annotate(&tx, &trace).unwrap();
        assert_eq!(annotated.node_count(), 6);
    }

    #[test]
    fn rejects_unpaired_children() {
        let (tx, mut trace) = Node::new("Main", Executed)
            .inline(Node::new("Transfer", Executed))
            .build();
        trace.inline_transactions.clear();

        let err = AnnotatedTrace::annotate(&tx, &trace).unwrap_err();
        assert_eq!(
            err,
            TraceError::CardinalityMismatch {
                method: "Main".to_string(),
                kind: TraceKind::Inline,
                transactions: 0,
                traces: 1,
            }
        );
    }

    #[test]
    fn rejects_nested_unpaired_children() {
        let (tx, mut trace) = Node::new("Main", Executed)
            .post(Node::new("Refund", Executed).pre(Node::new("ChargeFee", Executed)))
            .build();
        let duplicate = trace.post_traces[0].pre_traces[0].clone();
        trace.post_traces[0].pre_traces.push(duplicate);

        let err = AnnotatedTrace::annotate(&tx, &trace).unwrap_err();
        assert!(matches!(
            err,
            TraceError::CardinalityMismatch {
                kind: TraceKind::Pre,
                transactions: 1,
                traces: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_transactions_without_addresses() {
        let (mut tx, trace) = Node::new("Main", Executed).build();
        tx.to = None;

        let err = AnnotatedTrace::annotate(&tx, &trace).unwrap_err();
        assert_eq!(
            err,
            TraceError::MissingAddress {
                method: "Main".to_string(),
                field: "to",
            }
        );
    }
}
