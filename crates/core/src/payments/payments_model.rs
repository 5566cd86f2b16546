//! Payment domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payments_errors::PaymentError;
use crate::utils::money_utils::{non_negative, round_currency};

/// Who handed over the money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PayerType {
    #[default]
    Student,
    College,
    Consultancy,
    Agent,
}

/// Who received the money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ReceiverType {
    #[default]
    Consultancy,
    College,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMode {
    #[default]
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
    BankTransfer,
    Cheque,
}

/// The payer/receiver pairs that carry allocation rules.
///
/// Every other pair is a `Direct` transfer with no derived fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFlow {
    StudentToConsultancy,
    AgentToConsultancy,
    CollegeToConsultancy,
    ConsultancyToAgent,
    Direct,
}

impl PaymentFlow {
    pub fn classify(payer: PayerType, receiver: ReceiverType) -> Self {
        match (payer, receiver) {
            (PayerType::Student, ReceiverType::Consultancy) => PaymentFlow::StudentToConsultancy,
            (PayerType::Agent, ReceiverType::Consultancy) => PaymentFlow::AgentToConsultancy,
            (PayerType::College, ReceiverType::Consultancy) => PaymentFlow::CollegeToConsultancy,
            (PayerType::Consultancy, ReceiverType::Agent) => PaymentFlow::ConsultancyToAgent,
            _ => PaymentFlow::Direct,
        }
    }

    /// Flows where part of the money may be kept as service charge.
    pub fn splits_service_charge(&self) -> bool {
        matches!(
            self,
            PaymentFlow::StudentToConsultancy | PaymentFlow::AgentToConsultancy
        )
    }
}

/// Operator's classification of a Student/Agent → Consultancy payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServiceChargeOption {
    /// Full amount is due to the college.
    #[default]
    CollegeOnly,
    /// Consultancy keeps the full amount as service charge.
    ScOnly,
    /// Part of the amount is retained as service charge.
    PartialSc,
}

/// The operator's choices on the payment form that feed the allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AllocationChoices {
    pub service_charge_option: ServiceChargeOption,
    /// Only read for `PartialSc`.
    pub requested_deduction: Decimal,
    /// College → Consultancy: the payment is the college settling service charge.
    pub college_service_charge: bool,
    pub collecting_agent_id: Option<String>,
    pub deduct_agent_fee: bool,
    pub agent_fee_deducted: Decimal,
    pub agent_id_for_fee_payment: Option<String>,
}

impl AllocationChoices {
    /// Drops the service-charge classification for users not allowed to make it.
    pub fn restricted_to_college_fee(self) -> Self {
        Self {
            service_charge_option: ServiceChargeOption::CollegeOnly,
            requested_deduction: Decimal::ZERO,
            college_service_charge: false,
            ..self
        }
    }
}

/// A file attached to a payment (receipt photo or PDF). Opaque to allocation.
#[derive(Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Builds an attachment, accepting images and PDFs only.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, PaymentError> {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let content_type = match extension.as_str() {
            "pdf" => "application/pdf",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => return Err(PaymentError::UnsupportedAttachment(file_name)),
        };
        Ok(Self {
            content_type: content_type.to_string(),
            file_name,
            bytes,
        })
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// What the operator typed into the payment form, before allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDraft {
    #[serde(default)]
    pub payer_type: PayerType,
    #[serde(default)]
    pub receiver_type: ReceiverType,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    #[serde(default)]
    pub transaction_ref: String,
    #[serde(default)]
    pub notes: String,
    #[serde(flatten)]
    pub choices: AllocationChoices,
    #[serde(skip)]
    pub attachment: Option<Attachment>,
}

impl PaymentDraft {
    /// An empty Student → Consultancy cash payment dated `payment_date`.
    pub fn new(payment_date: NaiveDate) -> Self {
        Self {
            payer_type: PayerType::default(),
            receiver_type: ReceiverType::default(),
            payment_date,
            amount: Decimal::ZERO,
            payment_mode: PaymentMode::default(),
            transaction_ref: String::new(),
            notes: String::new(),
            choices: AllocationChoices::default(),
            attachment: None,
        }
    }

    pub fn flow(&self) -> PaymentFlow {
        PaymentFlow::classify(self.payer_type, self.receiver_type)
    }

    /// Assembles the calculator input, normalising typed amounts to paise.
    pub fn allocation_request(&self, service_charge_due: Decimal) -> AllocationRequest {
        let mut choices = self.choices.clone();
        choices.requested_deduction = round_currency(choices.requested_deduction);
        choices.agent_fee_deducted = round_currency(choices.agent_fee_deducted);
        AllocationRequest {
            payer_type: self.payer_type,
            receiver_type: self.receiver_type,
            amount: round_currency(self.amount),
            service_charge_due: non_negative(service_charge_due),
            choices,
        }
    }
}

/// Input to the allocation calculator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllocationRequest {
    pub payer_type: PayerType,
    pub receiver_type: ReceiverType,
    pub amount: Decimal,
    /// Outstanding service charge on the admission when the form was opened.
    pub service_charge_due: Decimal,
    pub choices: AllocationChoices,
}

/// The derived fields persisted with a payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAllocation {
    #[serde(skip)]
    pub flow: PaymentFlow,
    #[serde(skip)]
    pub amount: Decimal,
    pub is_service_charge_payment: bool,
    pub deduct_service_charge: bool,
    pub service_charge_deducted: Decimal,
    pub is_agent_collection: bool,
    pub collecting_agent_id: Option<String>,
    pub deduct_agent_fee: bool,
    pub agent_fee_deducted: Decimal,
    pub is_agent_fee_payment: bool,
    pub agent_id_for_fee_payment: Option<String>,
}

/// POST body for `/payments`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub admission_id: String,
    pub branch_id: String,
    pub payer_type: PayerType,
    pub receiver_type: ReceiverType,
    pub payment_date: NaiveDate,
    pub amount: Decimal,
    pub payment_mode: PaymentMode,
    pub transaction_ref: String,
    pub notes: String,
    #[serde(flatten)]
    pub allocation: PaymentAllocation,
}

/// A payment as stored by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub payer_type: PayerType,
    pub receiver_type: ReceiverType,
    pub payment_date: Option<String>,
    pub amount: Decimal,
    pub payment_mode: Option<PaymentMode>,
    pub transaction_ref: Option<String>,
    pub voucher_no: Option<String>,
    #[serde(default)]
    pub is_service_charge_payment: bool,
    #[serde(default)]
    pub deduct_service_charge: bool,
    #[serde(default)]
    pub service_charge_deducted: Decimal,
    #[serde(default)]
    pub is_agent_collection: bool,
    #[serde(default)]
    pub deduct_agent_fee: bool,
    #[serde(default)]
    pub agent_fee_deducted: Decimal,
    #[serde(default)]
    pub is_agent_fee_payment: bool,
}

/// A fee paid to an agent through the older agent-payment ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPaymentRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub payment_date: Option<String>,
    pub amount: Decimal,
    pub payment_mode: Option<PaymentMode>,
    pub transaction_ref: Option<String>,
    pub voucher_no: Option<String>,
}

/// Identifying fields of the payment that already owns a transaction reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConflictingPayment {
    pub student_name: String,
    pub admission_no: String,
}
