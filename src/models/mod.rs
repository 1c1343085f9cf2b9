pub mod subscription;
pub mod range;
pub mod cost;
pub mod plan;

pub use subscription::Subscription;
pub use range::{DateRange, DateRangeRequest};
pub use cost::{resource_name, round_cents, Column, CostReport, CostRow, CostTable, TopResource, COST_COLUMNS};
pub use plan::DefenderPlan;
