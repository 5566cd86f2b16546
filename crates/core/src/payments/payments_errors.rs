use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a payment is refused before (or instead of) being submitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),

    #[error("Select the agent who collected this payment")]
    MissingCollectingAgent,

    #[error("Select the agent receiving this fee payment")]
    MissingFeePayee,

    #[error("This reference already exists for {student_name} ({admission_no})")]
    DuplicateTransactionRef {
        reference: String,
        student_name: String,
        admission_no: String,
    },

    #[error("Attachment '{0}' must be an image or a PDF")]
    UnsupportedAttachment(String),
}
