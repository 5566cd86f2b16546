//! Payment entry session.
//!
//! Holds the state of one "add payment" form for one admission: the snapshot
//! it was opened with, the operator's draft and the last transaction
//! reference check. Submitting takes `&mut self`, so a session never has two
//! submissions in flight. Dropping the session discards the draft.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::allocation::max_deductible;
use super::payments_errors::PaymentError;
use super::payments_model::{
    AllocationChoices, Attachment, ConflictingPayment, PayerType, PaymentAllocation,
    PaymentDraft, PaymentMode, ReceiverType, ServiceChargeOption,
};
use super::payments_traits::PaymentServiceTrait;
use super::transaction_ref::TransactionRefStatus;
use crate::admissions::{Admission, AdmissionDetails, RosterEntry};
use crate::agents::Agent;
use crate::errors::{Error, Result};
use crate::utils::money_utils::{clamp_amount, non_negative, round_currency};

pub struct PaymentEntry {
    service: Arc<dyn PaymentServiceTrait>,
    details: AdmissionDetails,
    agents: Vec<Agent>,
    draft: PaymentDraft,
    ref_status: TransactionRefStatus,
    today: NaiveDate,
    stale: bool,
}

impl PaymentEntry {
    /// Loads the admission snapshot and agent list and starts an empty draft.
    pub async fn open(
        service: Arc<dyn PaymentServiceTrait>,
        admission_id: &str,
        today: NaiveDate,
    ) -> Result<Self> {
        let context = service.load_entry_context(admission_id).await?;
        Ok(Self {
            service,
            details: context.details,
            agents: context.agents,
            draft: PaymentDraft::new(today),
            ref_status: TransactionRefStatus::Blank,
            today,
            stale: false,
        })
    }

    pub fn admission(&self) -> &Admission {
        &self.details.admission
    }

    pub fn details(&self) -> &AdmissionDetails {
        &self.details
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Agents of this admission, for choosing a fee payee.
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.details.admission.roster()
    }

    pub fn draft(&self) -> &PaymentDraft {
        &self.draft
    }

    pub fn transaction_ref_status(&self) -> &TransactionRefStatus {
        &self.ref_status
    }

    /// True when the last payment was saved but the snapshot was not re-read.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Reloads the admission snapshot and agent list, keeping the draft.
    pub async fn refresh(&mut self) -> Result<()> {
        let context = self
            .service
            .load_entry_context(&self.details.admission.id)
            .await?;
        self.details = context.details;
        self.agents = context.agents;
        self.stale = false;
        Ok(())
    }

    /// Upper bound offered for a partial service charge deduction.
    pub fn max_deductible(&self) -> Decimal {
        max_deductible(
            self.details.admission.service_charge_due(),
            non_negative(self.draft.amount),
        )
    }

    pub fn set_payer_type(&mut self, payer_type: PayerType) {
        self.draft.payer_type = payer_type;
        self.draft.choices = AllocationChoices::default();
    }

    pub fn set_receiver_type(&mut self, receiver_type: ReceiverType) {
        self.draft.receiver_type = receiver_type;
        self.draft.choices = AllocationChoices::default();
    }

    /// Changing the amount invalidates any deduction typed against the old one.
    pub fn set_amount(&mut self, amount: Decimal) {
        self.draft.amount = amount;
        self.draft.choices.requested_deduction = Decimal::ZERO;
        self.draft.choices.agent_fee_deducted = Decimal::ZERO;
    }

    pub fn set_payment_date(&mut self, payment_date: NaiveDate) {
        self.draft.payment_date = payment_date;
    }

    pub fn set_payment_mode(&mut self, payment_mode: PaymentMode) {
        self.draft.payment_mode = payment_mode;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    pub fn set_attachment(&mut self, attachment: Option<Attachment>) {
        self.draft.attachment = attachment;
    }

    /// Records the reference as typed; the previous check no longer applies.
    pub fn set_transaction_ref(&mut self, reference: impl Into<String>) {
        self.draft.transaction_ref = reference.into();
        self.ref_status = TransactionRefStatus::Blank;
    }

    /// Picks the service charge option and pre-fills the deduction for it.
    pub fn select_service_charge_option(&mut self, option: ServiceChargeOption) {
        let prefill = match option {
            ServiceChargeOption::CollegeOnly => Decimal::ZERO,
            ServiceChargeOption::ScOnly => non_negative(self.draft.amount),
            ServiceChargeOption::PartialSc => self.max_deductible(),
        };
        self.draft.choices.service_charge_option = option;
        self.draft.choices.requested_deduction = prefill;
    }

    /// Sets the partial deduction, clamped to what can be deducted.
    pub fn set_requested_deduction(&mut self, deduction: Decimal) {
        self.draft.choices.requested_deduction =
            clamp_amount(deduction, Decimal::ZERO, self.max_deductible());
    }

    pub fn set_college_service_charge(&mut self, is_service_charge: bool) {
        self.draft.choices.college_service_charge = is_service_charge;
    }

    pub fn select_collecting_agent(&mut self, agent_id: Option<String>) {
        self.draft.choices.collecting_agent_id = agent_id;
    }

    pub fn set_deduct_agent_fee(&mut self, deduct: bool) {
        self.draft.choices.deduct_agent_fee = deduct;
        self.draft.choices.agent_fee_deducted = Decimal::ZERO;
    }

    pub fn set_agent_fee_deducted(&mut self, fee: Decimal) {
        self.draft.choices.agent_fee_deducted = non_negative(fee);
    }

    pub fn select_fee_payee(&mut self, agent_id: Option<String>) {
        self.draft.choices.agent_id_for_fee_payment = agent_id;
    }

    /// Runs the uniqueness query for the current reference and keeps the result.
    pub async fn check_transaction_ref(&mut self) -> Result<&TransactionRefStatus> {
        self.ref_status = self
            .service
            .check_transaction_ref(&self.draft.transaction_ref)
            .await?;
        Ok(&self.ref_status)
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        round_currency(self.draft.amount) > Decimal::ZERO && !self.ref_status.is_conflict()
    }

    /// The allocation the current draft would be saved with.
    pub fn preview(&self) -> Result<PaymentAllocation> {
        self.service
            .preview_allocation(&self.details.admission, &self.draft)
    }

    /// Submits the draft. Once the payment is saved the form is cleared, and
    /// the snapshot is replaced by the re-read one when that succeeded
    /// (otherwise the session is marked stale). On failure the draft is left
    /// untouched.
    pub async fn submit(&mut self) -> Result<()> {
        if self.ref_status.is_conflict() {
            debug!("Submit blocked by transaction reference conflict");
            self.ref_status.clone().into_result()?;
        }

        let result = self
            .service
            .record_payment(&self.details.admission, self.draft.clone())
            .await;

        match result {
            Ok(details) => {
                match details {
                    Some(details) => {
                        self.details = details;
                        self.stale = false;
                    }
                    None => self.stale = true,
                }
                self.draft = PaymentDraft::new(self.today);
                self.ref_status = TransactionRefStatus::Blank;
                Ok(())
            }
            Err(e) => {
                if let Error::Payment(PaymentError::DuplicateTransactionRef {
                    reference,
                    student_name,
                    admission_no,
                }) = &e
                {
                    self.ref_status = TransactionRefStatus::InUse {
                        reference: reference.clone(),
                        payment: ConflictingPayment {
                            student_name: student_name.clone(),
                            admission_no: admission_no.clone(),
                        },
                    };
                }
                Err(e)
            }
        }
    }
}
