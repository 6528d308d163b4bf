pub mod calculate_claim_cost;
pub mod claim;
pub mod initialize;

pub use calculate_claim_cost::*;
pub use claim::*;
pub use initialize::*;
