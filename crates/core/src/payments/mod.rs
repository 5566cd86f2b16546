//! Payments module - allocation calculator, reference check, service and form session.

mod allocation;
mod payment_entry;
mod payments_errors;
mod payments_model;
mod payments_service;
mod payments_traits;
mod transaction_ref;

#[cfg(test)]
pub(crate) mod test_support;

pub use allocation::{allocate, max_deductible};
pub use payment_entry::PaymentEntry;
pub use payments_errors::PaymentError;
pub use payments_model::{
    AgentPaymentRecord, AllocationChoices, AllocationRequest, Attachment, ConflictingPayment,
    NewPayment, PayerType, PaymentAllocation, PaymentDraft, PaymentFlow, PaymentMode,
    PaymentRecord, ReceiverType, ServiceChargeOption,
};
pub use payments_service::PaymentService;
pub use payments_traits::{PaymentEntryContext, PaymentRepositoryTrait, PaymentServiceTrait};
pub use transaction_ref::{check_transaction_ref, TransactionRefStatus};
