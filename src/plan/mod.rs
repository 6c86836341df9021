mod plan;

pub use plan::{DistrictSummary, Plan, PlanRow, PlanSummary};
