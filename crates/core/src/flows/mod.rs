pub mod engine;
pub mod states;

pub use engine::{parse_amount, CostFlowError, CostNegotiationFlow};
pub use states::{CostEvent, NegotiationAction, TransitionOutcome};
