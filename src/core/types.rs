use serde::Serialize;

pub const DAYS_PER_YEAR: u32 = 365;
pub const DAYS_PER_MONTH: u32 = 30;
pub const MAX_HORIZON_DAYS: u32 = DAYS_PER_YEAR * 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ZeroCompounding {
    Skip,
    AccruePrincipal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub principal: f64,
    pub annual_rate_percent: f64,
    // 0 means simple interest
    pub compounding_days: u32,
    pub additional_amount: f64,
    pub additional_frequency: u32,
}

impl SimulationParams {
    pub fn annual_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0
    }

    pub fn daily_rate(&self) -> f64 {
        self.annual_rate() / DAYS_PER_YEAR as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub month: u32,
    pub cumulative_amount: f64,
    pub monthly_income: f64,
    pub percentage_of_initial: f64,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneResult {
    pub double: u32,
    pub tenfold: u32,
    pub hundredfold: u32,
    pub target_income: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitSummary {
    pub monthly: f64,
    pub annual: f64,
    pub monthly_percent: f64,
    pub annual_percent: f64,
}
