pub mod calculator;

pub use calculator::{
    amortize, compute_amortization, Amortization, AmortizationInput, AmortizationPeriod,
    MAX_TERM, MIXED_PAYMENT_DIVISOR,
};
