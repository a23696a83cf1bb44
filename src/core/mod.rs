mod engine;
mod stats;
mod types;

pub use engine::{compound_interest, milestones, monthly_plan};
pub use stats::{average_profits, effective_rate};
pub use types::{
    DAYS_PER_MONTH, DAYS_PER_YEAR, MAX_HORIZON_DAYS, MilestoneResult, MonthlyRecord,
    ProfitSummary, SimulationParams,
};
