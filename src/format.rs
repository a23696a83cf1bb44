use crate::core::{DAYS_PER_MONTH, DAYS_PER_YEAR};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Language {
    #[default]
    En,
    Ru,
}

/// Compact amount: `1.23M`, `12.3K`, `123.46`.
pub fn format_number(value: f64) -> String {
    if value.abs() > 999_999.0 {
        format!("{}M", to_fixed(value / 1_000_000.0, 2))
    } else if value.abs() > 999.0 {
        format!("{}K", to_fixed(value / 1_000.0, 1))
    } else {
        to_fixed(value, 2)
    }
}

// Ties round away from zero.
fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (value.abs() * scale).round() / scale;
    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    format!("{sign}{rounded:.decimals$}")
}

/// Renders a day count as years, months (30 days) and days, e.g.
/// `1 year 1 month 3 days`. Non-positive counts read as "never".
pub fn format_time_period(days: f64, lang: Language) -> String {
    if days.is_nan() || days <= 0.0 {
        return match lang {
            Language::En => "Never".to_string(),
            Language::Ru => "Никогда".to_string(),
        };
    }

    let year = DAYS_PER_YEAR as f64;
    let month = DAYS_PER_MONTH as f64;
    let years = (days / year).floor();
    let months = ((days % year) / month).floor();
    let remaining_days = (days - years * year - months * month).round();

    let units = [
        (years as u64, Unit::Year),
        (months as u64, Unit::Month),
        (remaining_days as u64, Unit::Day),
    ];
    let parts: Vec<String> = units
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, unit)| format!("{count} {}", unit.label(count, lang)))
        .collect();

    if parts.is_empty() {
        return format!("0 {}", Unit::Day.label(0, lang));
    }
    parts.join(" ")
}

#[derive(Copy, Clone)]
enum Unit {
    Year,
    Month,
    Day,
}

impl Unit {
    fn label(self, count: u64, lang: Language) -> &'static str {
        match lang {
            Language::En => {
                let (one, many) = match self {
                    Unit::Year => ("year", "years"),
                    Unit::Month => ("month", "months"),
                    Unit::Day => ("day", "days"),
                };
                if count == 1 { one } else { many }
            }
            Language::Ru => {
                let forms = match self {
                    Unit::Year => ["год", "года", "лет"],
                    Unit::Month => ["месяц", "месяца", "месяцев"],
                    Unit::Day => ["день", "дня", "дней"],
                };
                forms[russian_plural_form(count)]
            }
        }
    }
}

/// Index into `[one, few, many]`.
fn russian_plural_form(count: u64) -> usize {
    let n = count % 100;
    let last = n % 10;
    if (11..20).contains(&n) {
        2
    } else if (2..5).contains(&last) {
        1
    } else if last == 1 {
        0
    } else {
        2
    }
}
