//! Transaction reference uniqueness check.

use log::warn;

use super::payments_errors::PaymentError;
use super::payments_model::ConflictingPayment;
use super::payments_traits::PaymentRepositoryTrait;
use crate::errors::Result;

/// Result of the last uniqueness query for a transaction reference.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionRefStatus {
    /// Empty or whitespace; never queried, always valid.
    #[default]
    Blank,
    Unused,
    InUse {
        reference: String,
        payment: ConflictingPayment,
    },
}

impl TransactionRefStatus {
    pub fn is_conflict(&self) -> bool {
        matches!(self, TransactionRefStatus::InUse { .. })
    }

    /// Inline message shown under the reference field, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            TransactionRefStatus::InUse { payment, .. } => Some(format!(
                "This reference already exists for {} ({})",
                payment.student_name, payment.admission_no
            )),
            _ => None,
        }
    }

    /// Converts a conflict into the error that blocks submission.
    pub fn into_result(self) -> std::result::Result<(), PaymentError> {
        match self {
            TransactionRefStatus::InUse { reference, payment } => {
                Err(PaymentError::DuplicateTransactionRef {
                    reference,
                    student_name: payment.student_name,
                    admission_no: payment.admission_no,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Asks the remote API whether `reference` already belongs to another payment.
///
/// The reference is sent exactly as typed; blank values short-circuit without
/// a request.
pub async fn check_transaction_ref(
    repository: &dyn PaymentRepositoryTrait,
    reference: &str,
) -> Result<TransactionRefStatus> {
    if reference.trim().is_empty() {
        return Ok(TransactionRefStatus::Blank);
    }

    match repository.find_by_transaction_ref(reference).await? {
        Some(payment) => {
            warn!(
                "Transaction reference '{}' already used by admission {}",
                reference, payment.admission_no
            );
            Ok(TransactionRefStatus::InUse {
                reference: reference.to_string(),
                payment,
            })
        }
        None => Ok(TransactionRefStatus::Unused),
    }
}
