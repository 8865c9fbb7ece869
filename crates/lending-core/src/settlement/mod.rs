pub mod classifier;

pub use classifier::{
    classify_state, classify_state_with, SettlementQuery, SettlementState,
};
