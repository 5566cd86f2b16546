//! In-memory repositories shared by the payment service and entry tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::admissions::{
    Admission, AdmissionAgents, AdmissionDetails, AdmissionRepositoryTrait, AgentAssignment,
    NamedRef, ServiceChargeSummary, StudentInfo,
};
use crate::agents::{Agent, AgentRepositoryTrait, AgentType};
use crate::errors::{CollaboratorError, Error, Result};
use crate::payments::{
    Attachment, ConflictingPayment, NewPayment, PaymentRepositoryTrait, PaymentService,
};
use crate::users::{CurrentUser, UserRole};

// --- Mock PaymentRepository ---
#[derive(Default)]
pub(crate) struct MockPaymentRepository {
    pub used_refs: Mutex<HashMap<String, ConflictingPayment>>,
    pub ref_queries: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(NewPayment, Option<Attachment>)>>,
    pub fail_create: Mutex<bool>,
}

impl MockPaymentRepository {
    pub fn with_used_ref(self, reference: &str, student_name: &str, admission_no: &str) -> Self {
        self.used_refs.lock().unwrap().insert(
            reference.to_string(),
            ConflictingPayment {
                student_name: student_name.to_string(),
                admission_no: admission_no.to_string(),
            },
        );
        self
    }

    pub fn set_fail_create(&self, fail: bool) {
        *self.fail_create.lock().unwrap() = fail;
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn last_created(&self) -> Option<(NewPayment, Option<Attachment>)> {
        self.created.lock().unwrap().last().cloned()
    }

    pub fn query_count(&self) -> usize {
        self.ref_queries.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentRepositoryTrait for MockPaymentRepository {
    async fn find_by_transaction_ref(
        &self,
        reference: &str,
    ) -> Result<Option<ConflictingPayment>> {
        self.ref_queries.lock().unwrap().push(reference.to_string());
        Ok(self.used_refs.lock().unwrap().get(reference).cloned())
    }

    async fn create_payment(
        &self,
        payment: NewPayment,
        attachment: Option<Attachment>,
    ) -> Result<()> {
        if *self.fail_create.lock().unwrap() {
            return Err(Error::Collaborator(CollaboratorError::Status {
                status: 500,
                message: "Error adding payment".to_string(),
            }));
        }
        self.created.lock().unwrap().push((payment, attachment));
        Ok(())
    }
}

// --- Mock AdmissionRepository ---
pub(crate) struct MockAdmissionRepository {
    details: Mutex<AdmissionDetails>,
    pub fetches: AtomicUsize,
    pub recalculated: Mutex<Vec<String>>,
    fail_after: Mutex<Option<usize>>,
}

impl MockAdmissionRepository {
    pub fn new(details: AdmissionDetails) -> Self {
        Self {
            details: Mutex::new(details),
            fetches: AtomicUsize::new(0),
            recalculated: Mutex::new(Vec::new()),
            fail_after: Mutex::new(None),
        }
    }

    /// Fails every fetch after the first `count` with a transport error.
    pub fn fail_fetches_after(&self, count: usize) {
        *self.fail_after.lock().unwrap() = Some(count);
    }

    /// Simulates the server re-aggregating totals after a write.
    pub fn set_service_charge_due(&self, due: Decimal) {
        let mut details = self.details.lock().unwrap();
        if let Some(sc) = details.admission.service_charge.as_mut() {
            sc.due = due;
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdmissionRepositoryTrait for MockAdmissionRepository {
    async fn get_admission_details(&self, admission_id: &str) -> Result<AdmissionDetails> {
        let fetch = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = *self.fail_after.lock().unwrap() {
            if fetch > limit {
                return Err(Error::Collaborator(CollaboratorError::Transport(
                    "timeout".to_string(),
                )));
            }
        }
        let details = self.details.lock().unwrap().clone();
        if details.admission.id != admission_id {
            return Err(Error::Collaborator(CollaboratorError::NotFound(
                admission_id.to_string(),
            )));
        }
        Ok(details)
    }

    async fn recalculate_admission(&self, admission_id: &str) -> Result<()> {
        self.recalculated
            .lock()
            .unwrap()
            .push(admission_id.to_string());
        Ok(())
    }
}

// --- Mock AgentRepository ---
pub(crate) struct MockAgentRepository {
    agents: Vec<Agent>,
}

impl MockAgentRepository {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }
}

#[async_trait]
impl AgentRepositoryTrait for MockAgentRepository {
    async fn list_agents(&self, limit: u32) -> Result<Vec<Agent>> {
        Ok(self.agents.iter().take(limit as usize).cloned().collect())
    }
}

// --- Fixtures ---

pub(crate) fn agent(id: &str, name: &str, agent_type: AgentType) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        agent_type: Some(agent_type),
        phone: None,
        is_active: true,
    }
}

pub(crate) fn sample_details(service_charge_due: Decimal) -> AdmissionDetails {
    AdmissionDetails {
        admission: Admission {
            id: "adm-1".to_string(),
            admission_no: "ADM-2024-0042".to_string(),
            student: StudentInfo {
                first_name: "Asha".to_string(),
                last_name: "Menon".to_string(),
                phone: None,
                email: None,
            },
            branch: NamedRef {
                id: "br-1".to_string(),
                name: Some("Kochi".to_string()),
            },
            college: None,
            course: None,
            academic_year: Some("2024-2025".to_string()),
            admission_status: None,
            service_charge: Some(ServiceChargeSummary {
                agreed: service_charge_due,
                due: service_charge_due,
                ..Default::default()
            }),
            payment_summary: None,
            college_payment: None,
            agents: Some(AdmissionAgents {
                main_agent: Some(AgentAssignment {
                    agent: Some(agent("ag-1", "Ravi", AgentType::Main)),
                    agent_fee: Decimal::new(20000, 0),
                    paid: Decimal::ZERO,
                }),
                ..Default::default()
            }),
            agent: None,
        },
        payments: Vec::new(),
        agent_payments: Vec::new(),
    }
}

pub(crate) fn user(role: UserRole) -> CurrentUser {
    CurrentUser {
        id: "user-1".to_string(),
        name: "Office".to_string(),
        role,
    }
}

pub(crate) struct Harness {
    pub payments: Arc<MockPaymentRepository>,
    pub admissions: Arc<MockAdmissionRepository>,
    pub service: Arc<PaymentService>,
}

pub(crate) fn harness(
    payments: MockPaymentRepository,
    service_charge_due: Decimal,
    role: UserRole,
) -> Harness {
    let payments = Arc::new(payments);
    let admissions = Arc::new(MockAdmissionRepository::new(sample_details(
        service_charge_due,
    )));
    let agents = Arc::new(MockAgentRepository::new(vec![
        agent("ag-1", "Ravi", AgentType::Main),
        agent("ag-2", "Salim", AgentType::College),
    ]));
    let service = Arc::new(PaymentService::new(
        payments.clone(),
        admissions.clone(),
        agents,
        user(role),
    ));
    Harness {
        payments,
        admissions,
        service,
    }
}
