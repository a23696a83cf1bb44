use super::types::{
    DAYS_PER_MONTH, DAYS_PER_YEAR, MAX_HORIZON_DAYS, MilestoneResult, MonthlyRecord,
    SimulationParams, ZeroCompounding,
};

#[derive(Debug, Clone, Copy)]
struct DailyAdvance {
    principal: f64,
    daily_rate: f64,
    compounding_days: u32,
    additional_amount: f64,
    additional_frequency: u32,
    zero_compounding: ZeroCompounding,
}

impl DailyAdvance {
    fn new(params: &SimulationParams, zero_compounding: ZeroCompounding) -> Self {
        Self {
            principal: params.principal,
            daily_rate: params.daily_rate(),
            compounding_days: params.compounding_days,
            additional_amount: params.additional_amount,
            additional_frequency: params.additional_frequency,
            zero_compounding,
        }
    }

    fn apply(&self, day: u32, balance: &mut f64) {
        if self.additional_frequency > 0 && day % self.additional_frequency == 0 {
            *balance += self.additional_amount;
        }

        if self.compounding_days > 0 {
            if day % self.compounding_days == 0 {
                // Accrued daily rate over the period, not a true periodic rate.
                *balance *= 1.0 + self.daily_rate * self.compounding_days as f64;
            }
        } else if self.zero_compounding == ZeroCompounding::AccruePrincipal {
            *balance += self.principal * self.daily_rate;
        }
    }

    fn run(&self, days: std::ops::RangeInclusive<u32>, balance: &mut f64) {
        for day in days {
            self.apply(day, balance);
        }
    }
}

pub fn compound_interest(params: &SimulationParams, term_days: u32) -> f64 {
    if params.compounding_days == 0 {
        return simple_interest(params, term_days);
    }

    let mut amount = params.principal;
    DailyAdvance::new(params, ZeroCompounding::Skip).run(1..=term_days, &mut amount);
    amount
}

// Contributions are added flat and earn nothing.
fn simple_interest(params: &SimulationParams, term_days: u32) -> f64 {
    let interest =
        params.principal * params.annual_rate() * (term_days as f64 / DAYS_PER_YEAR as f64);
    let mut amount = params.principal + interest;

    if params.additional_frequency > 0 && params.additional_amount > 0.0 {
        let contributions = term_days / params.additional_frequency;
        amount += params.additional_amount * contributions as f64;
    }
    amount
}

pub fn monthly_plan(params: &SimulationParams, term_days: u32) -> Vec<MonthlyRecord> {
    let advance = DailyAdvance::new(params, ZeroCompounding::Skip);
    let months = term_days.div_ceil(DAYS_PER_MONTH);

    let mut plan = Vec::with_capacity(months as usize);
    let mut amount = params.principal;
    let mut previous_amount = params.principal;

    for month in 1..=months {
        advance.run(month_window(month, term_days), &mut amount);

        let monthly_income = amount - previous_amount;
        plan.push(MonthlyRecord {
            month,
            cumulative_amount: amount,
            monthly_income,
            percentage_of_initial: if params.principal > 0.0 {
                monthly_income / params.principal * 100.0
            } else {
                0.0
            },
        });
        previous_amount = amount;
    }
    plan
}

fn month_window(month: u32, term_days: u32) -> std::ops::RangeInclusive<u32> {
    let start_day = (month - 1).saturating_mul(DAYS_PER_MONTH).saturating_add(1);
    let end_day = month.saturating_mul(DAYS_PER_MONTH).min(term_days);
    start_day..=end_day
}

pub fn milestones(params: &SimulationParams, target_income: f64) -> MilestoneResult {
    let advance = DailyAdvance::new(params, ZeroCompounding::AccruePrincipal);
    let principal = params.principal;
    let annual_rate = params.annual_rate();

    let mut result = MilestoneResult::default();
    let mut amount = principal;

    for day in 1..=MAX_HORIZON_DAYS {
        advance.apply(day, &mut amount);

        if principal > 0.0 {
            record_first(&mut result.double, day, amount >= principal * 2.0);
            record_first(&mut result.tenfold, day, amount >= principal * 10.0);
            record_first(&mut result.hundredfold, day, amount >= principal * 100.0);
        }
        if target_income > 0.0 {
            record_first(
                &mut result.target_income,
                day,
                amount * annual_rate / 12.0 >= target_income,
            );
        }

        if result.double > 0
            && result.tenfold > 0
            && result.hundredfold > 0
            && (result.target_income > 0 || target_income <= 0.0)
        {
            break;
        }
    }
    result
}

fn record_first(slot: &mut u32, day: u32, reached: bool) {
    if *slot == 0 && reached {
        *slot = day;
    }
}
