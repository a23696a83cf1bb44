use super::types::{DAYS_PER_YEAR, ProfitSummary};

pub fn effective_rate(principal: f64, final_amount: f64, term_days: u32) -> f64 {
    if term_days == 0 || principal <= 0.0 || final_amount <= principal {
        return 0.0;
    }
    let growth_factor = final_amount / principal;
    (growth_factor.powf(DAYS_PER_YEAR as f64 / term_days as f64) - 1.0) * 100.0
}

pub fn average_profits(principal: f64, final_amount: f64, term_days: u32) -> ProfitSummary {
    if term_days == 0 {
        return ProfitSummary::default();
    }

    let total_profit = final_amount - principal;
    let years = term_days as f64 / DAYS_PER_YEAR as f64;
    let months = years * 12.0;

    let per_period = |periods: f64| {
        if periods > 0.0 {
            total_profit / periods
        } else {
            0.0
        }
    };
    let percent_per_period = |periods: f64| {
        if principal > 0.0 && periods > 0.0 {
            (total_profit / principal) * 100.0 / periods
        } else {
            0.0
        }
    };

    ProfitSummary {
        monthly: per_period(months),
        annual: per_period(years),
        monthly_percent: percent_per_period(months),
        annual_percent: percent_per_period(years),
    }
}
