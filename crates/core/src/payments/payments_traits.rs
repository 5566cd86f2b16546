//! Payment repository and service traits.
//!
//! The repository is the remote payments API; the service layers validation
//! and allocation on top of it.

use async_trait::async_trait;

use super::payments_model::{
    Attachment, ConflictingPayment, NewPayment, PaymentAllocation, PaymentDraft,
};
use super::transaction_ref::TransactionRefStatus;
use crate::admissions::{Admission, AdmissionDetails};
use crate::agents::Agent;
use crate::errors::Result;

#[async_trait]
pub trait PaymentRepositoryTrait: Send + Sync {
    /// Looks up the payment owning `reference`, if any.
    async fn find_by_transaction_ref(&self, reference: &str)
        -> Result<Option<ConflictingPayment>>;

    /// Creates a payment. Sent as multipart when an attachment is given.
    async fn create_payment(
        &self,
        payment: NewPayment,
        attachment: Option<Attachment>,
    ) -> Result<()>;
}

/// Data the payment form needs before the operator can type anything.
#[derive(Debug, Clone)]
pub struct PaymentEntryContext {
    pub details: AdmissionDetails,
    pub agents: Vec<Agent>,
}

#[async_trait]
pub trait PaymentServiceTrait: Send + Sync {
    /// Loads the admission snapshot and the agent list.
    async fn load_entry_context(&self, admission_id: &str) -> Result<PaymentEntryContext>;

    /// Checks a transaction reference for reuse. Blank references are always valid.
    async fn check_transaction_ref(&self, reference: &str) -> Result<TransactionRefStatus>;

    /// Computes the allocation the draft would be saved with, without side effects.
    fn preview_allocation(
        &self,
        admission: &Admission,
        draft: &PaymentDraft,
    ) -> Result<PaymentAllocation>;

    /// Validates, checks the reference, submits the payment and returns the
    /// admission snapshot re-read after the write.
    ///
    /// Once the payment is created the call succeeds; `None` means the
    /// payment was saved but the snapshot could not be re-read.
    async fn record_payment(
        &self,
        admission: &Admission,
        draft: PaymentDraft,
    ) -> Result<Option<AdmissionDetails>>;
}
