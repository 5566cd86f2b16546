//! Admission snapshot models, as served by the admission details endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agents::{Agent, AgentType};
use crate::payments::{AgentPaymentRecord, PaymentRecord};
use crate::utils::money_utils::non_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionStatus {
    Confirmed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// A populated reference (`{ "_id": ..., "name": ... }`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamedRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Server-aggregated service charge position of an admission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceChargeSummary {
    pub agreed: Decimal,
    pub received_from_college: Decimal,
    pub deducted_from_student: Decimal,
    pub deducted_by_agent: Decimal,
    pub paid_back_to_college: Decimal,
    pub received: Decimal,
    pub due: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPaymentSummary {
    pub student_paid: Decimal,
    pub student_due: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CollegePaymentSummary {
    pub total_due_to_college: Decimal,
    pub paid_to_college: Decimal,
    pub balance_due_to_college: Decimal,
}

/// An agent attached to an admission with the fee agreed for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentAssignment {
    #[serde(rename = "agentId", default)]
    pub agent: Option<Agent>,
    #[serde(default)]
    pub agent_fee: Decimal,
    #[serde(default)]
    pub paid: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdmissionAgents {
    pub main_agent: Option<AgentAssignment>,
    pub college_agent: Option<AgentAssignment>,
    pub sub_agent: Option<AgentAssignment>,
    pub total_agent_fee: Decimal,
    pub total_agent_fee_paid: Decimal,
    pub total_agent_fee_due: Decimal,
}

/// An agent the payment form may select, with its fee position.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub agent_id: String,
    pub name: String,
    pub agent_type: AgentType,
    pub agent_fee: Decimal,
    pub paid: Decimal,
    pub fee_due: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Admission {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub admission_no: String,
    #[serde(default)]
    pub student: StudentInfo,
    #[serde(rename = "branchId")]
    pub branch: NamedRef,
    #[serde(rename = "collegeId", default)]
    pub college: Option<NamedRef>,
    #[serde(rename = "courseId", default)]
    pub course: Option<NamedRef>,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub admission_status: Option<AdmissionStatus>,
    #[serde(default)]
    pub service_charge: Option<ServiceChargeSummary>,
    #[serde(default)]
    pub payment_summary: Option<StudentPaymentSummary>,
    #[serde(default)]
    pub college_payment: Option<CollegePaymentSummary>,
    #[serde(default)]
    pub agents: Option<AdmissionAgents>,
    /// Single-agent layout used by older admissions.
    #[serde(default)]
    pub agent: Option<AgentAssignment>,
}

impl Admission {
    pub fn student_name(&self) -> String {
        format!("{} {}", self.student.first_name, self.student.last_name)
            .trim()
            .to_string()
    }

    /// Outstanding service charge, floored at zero; zero when the admission has none.
    pub fn service_charge_due(&self) -> Decimal {
        self.service_charge
            .as_ref()
            .map(|sc| non_negative(sc.due))
            .unwrap_or(Decimal::ZERO)
    }

    /// Agents linked to this admission: Main, College, Sub, then the legacy
    /// single agent (reported as Main).
    pub fn roster(&self) -> Vec<RosterEntry> {
        let mut slots: Vec<(AgentType, &AgentAssignment)> = Vec::new();
        if let Some(agents) = &self.agents {
            for (agent_type, slot) in [
                (AgentType::Main, &agents.main_agent),
                (AgentType::College, &agents.college_agent),
                (AgentType::Sub, &agents.sub_agent),
            ] {
                if let Some(assignment) = slot {
                    slots.push((agent_type, assignment));
                }
            }
        }
        if let Some(legacy) = &self.agent {
            slots.push((AgentType::Main, legacy));
        }

        slots
            .into_iter()
            .filter_map(|(agent_type, assignment)| {
                assignment.agent.as_ref().map(|agent| RosterEntry {
                    agent_id: agent.id.clone(),
                    name: agent.name.clone(),
                    agent_type,
                    agent_fee: assignment.agent_fee,
                    paid: assignment.paid,
                    fee_due: non_negative(assignment.agent_fee - assignment.paid),
                })
            })
            .collect()
    }
}

/// Everything the admission details screen loads in one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionDetails {
    pub admission: Admission,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    #[serde(default)]
    pub agent_payments: Vec<AgentPaymentRecord>,
}
