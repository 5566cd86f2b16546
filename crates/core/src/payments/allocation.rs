//! Payment allocation calculator.
//!
//! Splits a payment between service charge kept by the consultancy and the
//! amount owed on to the college, and records what an agent kept from money
//! it collected. The result is computed once, when the payment is created,
//! from the admission snapshot the form was opened with. It is never
//! recomputed afterwards; running totals come from the server.

use log::debug;
use rust_decimal::Decimal;

use super::payments_errors::PaymentError;
use super::payments_model::{
    AllocationRequest, PaymentAllocation, PaymentFlow, ServiceChargeOption,
};
use crate::utils::money_utils::{clamp_amount, format_currency, non_negative};

/// Largest service charge that may be deducted from `amount`.
pub fn max_deductible(service_charge_due: Decimal, amount: Decimal) -> Decimal {
    non_negative(service_charge_due.min(amount))
}

/// Computes the derived allocation fields for a payment.
///
/// Over-requested deductions are clamped, not rejected. The only failures are
/// a non-positive amount and a missing agent selection.
pub fn allocate(request: &AllocationRequest) -> Result<PaymentAllocation, PaymentError> {
    if request.amount <= Decimal::ZERO {
        return Err(PaymentError::NonPositiveAmount(request.amount));
    }

    let flow = PaymentFlow::classify(request.payer_type, request.receiver_type);
    let choices = &request.choices;
    let mut allocation = PaymentAllocation::direct(flow, request.amount);

    match flow {
        PaymentFlow::StudentToConsultancy | PaymentFlow::AgentToConsultancy => {
            match choices.service_charge_option {
                ServiceChargeOption::CollegeOnly => {}
                ServiceChargeOption::ScOnly => {
                    allocation.is_service_charge_payment = true;
                    allocation.service_charge_deducted = request.amount;
                }
                ServiceChargeOption::PartialSc => {
                    allocation.deduct_service_charge = true;
                    allocation.service_charge_deducted = clamp_amount(
                        choices.requested_deduction,
                        Decimal::ZERO,
                        max_deductible(request.service_charge_due, request.amount),
                    );
                }
            }
        }
        PaymentFlow::CollegeToConsultancy => {
            allocation.is_service_charge_payment = choices.college_service_charge;
        }
        PaymentFlow::ConsultancyToAgent => {
            let payee = non_blank(choices.agent_id_for_fee_payment.as_deref())
                .ok_or(PaymentError::MissingFeePayee)?;
            allocation.is_agent_fee_payment = true;
            allocation.agent_id_for_fee_payment = Some(payee);
        }
        PaymentFlow::Direct => {}
    }

    if flow == PaymentFlow::AgentToConsultancy {
        let collector = non_blank(choices.collecting_agent_id.as_deref())
            .ok_or(PaymentError::MissingCollectingAgent)?;
        allocation.is_agent_collection = true;
        allocation.collecting_agent_id = Some(collector);
        if choices.deduct_agent_fee {
            allocation.deduct_agent_fee = true;
            allocation.agent_fee_deducted =
                clamp_amount(choices.agent_fee_deducted, Decimal::ZERO, request.amount);
        }
    }

    debug!(
        "Allocated {:?} payment of {}: sc_deducted={}, agent_fee_deducted={}",
        flow, request.amount, allocation.service_charge_deducted, allocation.agent_fee_deducted
    );
    Ok(allocation)
}

impl PaymentAllocation {
    /// An allocation with no derived flags set.
    fn direct(flow: PaymentFlow, amount: Decimal) -> Self {
        Self {
            flow,
            amount,
            is_service_charge_payment: false,
            deduct_service_charge: false,
            service_charge_deducted: Decimal::ZERO,
            is_agent_collection: false,
            collecting_agent_id: None,
            deduct_agent_fee: false,
            agent_fee_deducted: Decimal::ZERO,
            is_agent_fee_payment: false,
            agent_id_for_fee_payment: None,
        }
    }

    /// Portion of this payment owed on to the college.
    pub fn due_to_college(&self) -> Decimal {
        if self.flow.splits_service_charge() {
            non_negative(self.amount - self.service_charge_deducted)
        } else {
            Decimal::ZERO
        }
    }

    /// What the payer originally handed to the agent. Display only, never stored.
    pub fn gross_collected(&self) -> Decimal {
        if self.deduct_agent_fee {
            self.amount + self.agent_fee_deducted
        } else {
            self.amount
        }
    }

    /// One-line description for the confirmation panel.
    pub fn describe(&self) -> String {
        let amount = format_currency(self.amount);
        match self.flow {
            PaymentFlow::StudentToConsultancy | PaymentFlow::AgentToConsultancy => {
                let mut line = if self.is_service_charge_payment {
                    format!("Full amount ({}) is Service Charge", amount)
                } else if self.deduct_service_charge {
                    format!(
                        "SC: {}, Due to College: {}",
                        format_currency(self.service_charge_deducted),
                        format_currency(self.due_to_college())
                    )
                } else {
                    format!("Full amount ({}) due to College", amount)
                };
                if self.deduct_agent_fee && self.agent_fee_deducted > Decimal::ZERO {
                    line.push_str(&format!(
                        "; collected {} with agent fee {} kept",
                        format_currency(self.gross_collected()),
                        format_currency(self.agent_fee_deducted)
                    ));
                }
                line
            }
            PaymentFlow::CollegeToConsultancy if self.is_service_charge_payment => {
                format!("Service charge of {} received from college", amount)
            }
            PaymentFlow::CollegeToConsultancy => {
                format!("Full amount ({}) received from college", amount)
            }
            PaymentFlow::ConsultancyToAgent => format!("Agent fee payment of {}", amount),
            PaymentFlow::Direct => format!("Direct transfer of {}", amount),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
