use log::{debug, error, info};
use std::sync::Arc;

use super::allocation::allocate;
use super::payments_model::{NewPayment, PaymentAllocation, PaymentDraft};
use super::payments_traits::{PaymentEntryContext, PaymentRepositoryTrait, PaymentServiceTrait};
use super::transaction_ref::{check_transaction_ref, TransactionRefStatus};
use crate::admissions::{Admission, AdmissionDetails, AdmissionRepositoryTrait};
use crate::agents::AgentRepositoryTrait;
use crate::constants::AGENT_LIST_LIMIT;
use crate::errors::Result;
use crate::users::CurrentUser;

/// Service for recording admission payments.
pub struct PaymentService {
    payment_repository: Arc<dyn PaymentRepositoryTrait>,
    admission_repository: Arc<dyn AdmissionRepositoryTrait>,
    agent_repository: Arc<dyn AgentRepositoryTrait>,
    current_user: CurrentUser,
}

impl PaymentService {
    pub fn new(
        payment_repository: Arc<dyn PaymentRepositoryTrait>,
        admission_repository: Arc<dyn AdmissionRepositoryTrait>,
        agent_repository: Arc<dyn AgentRepositoryTrait>,
        current_user: CurrentUser,
    ) -> Self {
        Self {
            payment_repository,
            admission_repository,
            agent_repository,
            current_user,
        }
    }

    fn allocate_for_user(
        &self,
        admission: &Admission,
        draft: &PaymentDraft,
    ) -> Result<PaymentAllocation> {
        let mut request = draft.allocation_request(admission.service_charge_due());
        if !self.current_user.role.can_allocate_service_charge() {
            request.choices = request.choices.restricted_to_college_fee();
        }
        Ok(allocate(&request)?)
    }
}

#[async_trait::async_trait]
impl PaymentServiceTrait for PaymentService {
    async fn load_entry_context(&self, admission_id: &str) -> Result<PaymentEntryContext> {
        let details = self
            .admission_repository
            .get_admission_details(admission_id)
            .await?;
        let agents = self.agent_repository.list_agents(AGENT_LIST_LIMIT).await?;
        debug!(
            "Loaded payment entry for {} with {} agents",
            details.admission.admission_no,
            agents.len()
        );
        Ok(PaymentEntryContext { details, agents })
    }

    async fn check_transaction_ref(&self, reference: &str) -> Result<TransactionRefStatus> {
        check_transaction_ref(self.payment_repository.as_ref(), reference).await
    }

    fn preview_allocation(
        &self,
        admission: &Admission,
        draft: &PaymentDraft,
    ) -> Result<PaymentAllocation> {
        self.allocate_for_user(admission, draft)
    }

    async fn record_payment(
        &self,
        admission: &Admission,
        draft: PaymentDraft,
    ) -> Result<Option<AdmissionDetails>> {
        // Local validation runs before any request
        let allocation = self.allocate_for_user(admission, &draft)?;

        self.check_transaction_ref(&draft.transaction_ref)
            .await?
            .into_result()?;

        let payment = NewPayment {
            admission_id: admission.id.clone(),
            branch_id: admission.branch.id.clone(),
            payer_type: draft.payer_type,
            receiver_type: draft.receiver_type,
            payment_date: draft.payment_date,
            amount: allocation.amount,
            payment_mode: draft.payment_mode,
            transaction_ref: draft.transaction_ref,
            notes: draft.notes,
            allocation,
        };

        if let Err(e) = self
            .payment_repository
            .create_payment(payment, draft.attachment)
            .await
        {
            error!(
                "Failed to record payment for admission {}: {}",
                admission.admission_no, e
            );
            return Err(e);
        }
        info!("Recorded payment for admission {}", admission.admission_no);

        match self
            .admission_repository
            .get_admission_details(&admission.id)
            .await
        {
            Ok(details) => Ok(Some(details)),
            Err(e) => {
                error!(
                    "Payment recorded but admission {} could not be reloaded: {}",
                    admission.admission_no, e
                );
                Ok(None)
            }
        }
    }
}
