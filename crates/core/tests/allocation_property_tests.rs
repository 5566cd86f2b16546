//! Property-based integration tests for the payment allocation calculator.
//!
//! Amounts are generated in whole paise so every input is already at the
//! precision the calculator stores.

use campusdesk_core::payments::{
    allocate, max_deductible, AllocationChoices, AllocationRequest, PayerType, ReceiverType,
    ServiceChargeOption,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// A positive amount between ₹0.01 and ₹10,00,000.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=100_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

/// Any amount, including zero and negatives, as an operator might type it.
fn arb_typed_amount() -> impl Strategy<Value = Decimal> {
    (-10_000_000i64..=100_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

/// A service charge due, zero included.
fn arb_due() -> impl Strategy<Value = Decimal> {
    (0i64..=50_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

/// The two payers whose payments to the consultancy can carry service charge.
fn arb_splitting_payer() -> impl Strategy<Value = PayerType> {
    prop_oneof![Just(PayerType::Student), Just(PayerType::Agent)]
}

fn request(
    payer_type: PayerType,
    amount: Decimal,
    due: Decimal,
    option: ServiceChargeOption,
    requested: Decimal,
) -> AllocationRequest {
    AllocationRequest {
        payer_type,
        receiver_type: ReceiverType::Consultancy,
        amount,
        service_charge_due: due,
        choices: AllocationChoices {
            service_charge_option: option,
            requested_deduction: requested,
            collecting_agent_id: Some("ag-1".to_string()),
            ..Default::default()
        },
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A college-only payment never retains service charge.
    #[test]
    fn prop_college_only_deducts_nothing(
        payer in arb_splitting_payer(),
        amount in arb_amount(),
        due in arb_due(),
        requested in arb_typed_amount(),
    ) {
        let allocation = allocate(&request(
            payer, amount, due, ServiceChargeOption::CollegeOnly, requested,
        )).unwrap();

        prop_assert!(!allocation.is_service_charge_payment);
        prop_assert!(!allocation.deduct_service_charge);
        prop_assert_eq!(allocation.service_charge_deducted, Decimal::ZERO);
        prop_assert_eq!(allocation.due_to_college(), amount);
    }

    /// A service-charge-only payment retains the whole amount.
    #[test]
    fn prop_sc_only_retains_full_amount(
        payer in arb_splitting_payer(),
        amount in arb_amount(),
        due in arb_due(),
    ) {
        let allocation = allocate(&request(
            payer, amount, due, ServiceChargeOption::ScOnly, Decimal::ZERO,
        )).unwrap();

        prop_assert!(allocation.is_service_charge_payment);
        prop_assert_eq!(allocation.service_charge_deducted, amount);
        prop_assert_eq!(allocation.due_to_college(), Decimal::ZERO);
    }

    /// A partial deduction is the request clamped to [0, min(due, amount)].
    #[test]
    fn prop_partial_deduction_is_clamped(
        payer in arb_splitting_payer(),
        amount in arb_amount(),
        due in arb_due(),
        requested in arb_typed_amount(),
    ) {
        let allocation = allocate(&request(
            payer, amount, due, ServiceChargeOption::PartialSc, requested,
        )).unwrap();

        let expected = requested.max(Decimal::ZERO).min(due).min(amount);
        prop_assert!(allocation.deduct_service_charge);
        prop_assert_eq!(allocation.service_charge_deducted, expected);
        prop_assert!(allocation.service_charge_deducted <= max_deductible(due, amount));
    }

    /// Feeding a clamped deduction back in leaves it unchanged.
    #[test]
    fn prop_partial_deduction_is_idempotent(
        amount in arb_amount(),
        due in arb_due(),
        requested in arb_typed_amount(),
    ) {
        let first = allocate(&request(
            PayerType::Student, amount, due, ServiceChargeOption::PartialSc, requested,
        )).unwrap();
        let second = allocate(&request(
            PayerType::Student,
            amount,
            due,
            ServiceChargeOption::PartialSc,
            first.service_charge_deducted,
        )).unwrap();

        prop_assert_eq!(first.service_charge_deducted, second.service_charge_deducted);
    }

    /// The college's share is never negative and the split adds up.
    #[test]
    fn prop_split_is_conserved(
        payer in arb_splitting_payer(),
        amount in arb_amount(),
        due in arb_due(),
        requested in arb_typed_amount(),
        option in prop_oneof![
            Just(ServiceChargeOption::CollegeOnly),
            Just(ServiceChargeOption::ScOnly),
            Just(ServiceChargeOption::PartialSc),
        ],
    ) {
        let allocation = allocate(&request(payer, amount, due, option, requested)).unwrap();

        prop_assert!(allocation.due_to_college() >= Decimal::ZERO);
        prop_assert_eq!(
            allocation.due_to_college() + allocation.service_charge_deducted,
            amount
        );
    }

    /// An agent collection reports the gross as net received plus the fee kept.
    #[test]
    fn prop_agent_gross_is_net_plus_fee(
        amount in arb_amount(),
        fee in arb_typed_amount(),
        deduct in any::<bool>(),
    ) {
        let mut req = request(
            PayerType::Agent, amount, Decimal::ZERO, ServiceChargeOption::CollegeOnly, Decimal::ZERO,
        );
        req.choices.deduct_agent_fee = deduct;
        req.choices.agent_fee_deducted = fee;

        let allocation = allocate(&req).unwrap();

        prop_assert!(allocation.is_agent_collection);
        prop_assert!(allocation.agent_fee_deducted >= Decimal::ZERO);
        prop_assert!(allocation.agent_fee_deducted <= amount);
        if !deduct {
            prop_assert_eq!(allocation.agent_fee_deducted, Decimal::ZERO);
        }
        prop_assert_eq!(
            allocation.gross_collected(),
            amount + allocation.agent_fee_deducted
        );
    }

    /// Zero and negative amounts are always rejected.
    #[test]
    fn prop_non_positive_amount_rejected(
        paise in -10_000_000i64..=0,
        due in arb_due(),
    ) {
        let amount = Decimal::new(paise, 2);
        let result = allocate(&request(
            PayerType::Student, amount, due, ServiceChargeOption::ScOnly, Decimal::ZERO,
        ));
        prop_assert!(result.is_err());
    }
}
