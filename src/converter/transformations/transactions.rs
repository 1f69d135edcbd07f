use tracing::debug;

use crate::converter::annotate::AnnotatedTrace;
use crate::converter::encode_message;
use crate::converter::transformations::calls::CallTransformer;
use crate::models::datasets::calls::CallSequence;
use crate::models::datasets::traces::TransactionTrace;
use crate::models::datasets::transactions::{Hash, Transaction, TransformedTransactionTrace};
use crate::models::errors::{BlockError, ConvertError, TraceError};

pub trait TransactionTransformer {
    fn transform_transactions(
        transaction_ids: &[Hash],
        transactions: &[Transaction],
        traces: &[TransactionTrace],
    ) -> Result<Vec<TransformedTransactionTrace>, ConvertError>;
}

impl TransactionTransformer for Transaction {
    fn transform_transactions(
        transaction_ids: &[Hash],
        transactions: &[Transaction],
        traces: &[TransactionTrace],
    ) -> Result<Vec<TransformedTransactionTrace>, ConvertError> {
        // The three lists are positionally aligned
        if transaction_ids.len() != transactions.len() || transactions.len() != traces.len() {
            return Err(BlockError::TransactionCountMismatch {
                transaction_ids: transaction_ids.len(),
                transactions: transactions.len(),
                traces: traces.len(),
            }
            .into());
        }

        transaction_ids
            .iter()
            .zip(transactions)
            .zip(traces)
            .map(|((transaction_id, transaction), trace)| {
                transform_transaction(transaction_id, transaction, trace)
            })
            .collect()
    }
}

fn transform_transaction(
    transaction_id: &Hash,
    transaction: &Transaction,
    trace: &TransactionTrace,
) -> Result<TransformedTransactionTrace, ConvertError> {
    let transaction_id = transaction_id.to_hex();
    let invalid_trace = |source| ConvertError::Trace {
        transaction_id: transaction_id.clone(),
        source,
    };

    let annotated = AnnotatedTrace::annotate(transaction, trace).map_err(invalid_trace)?;
    let CallSequence {
        calls,
        main_call_index,
    } = annotated.transform_calls(&transaction_id, "", 0);
    let main_call_index = i32::try_from(main_call_index).map_err(|_| {
        invalid_trace(TraceError::MainCallIndexOverflow {
            index: main_call_index,
        })
    })?;

    debug!(
        transaction_id = %transaction_id,
        method = %transaction.method_name,
        calls = calls.len(),
        main_call_index,
        reverted = annotated.reverted,
        "Extracted calls"
    );

    Ok(TransformedTransactionTrace {
        raw_transaction: encode_message(transaction, "transaction")?,
        signature: transaction.signature.clone(),
        transaction_id,
        calls,
        main_call_index,
    })
}
