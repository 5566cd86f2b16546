/// Decimal places kept on stored amounts
pub const DECIMAL_PRECISION: u32 = 2;

/// Decimal places shown when formatting amounts
pub const DISPLAY_DECIMAL_PRECISION: u32 = 0;

/// Currency symbol used by the formatter (amounts are INR)
pub const CURRENCY_SYMBOL: &str = "₹";

/// Page size used when loading the agent roster for the payment form
pub const AGENT_LIST_LIMIT: u32 = 100;
