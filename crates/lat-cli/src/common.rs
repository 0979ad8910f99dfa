use clap::ValueEnum;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
const SECONDS_PER_MONTH: f64 = SECONDS_PER_YEAR / 12.0;

/// Display unit for times in the summary table. Conversion is purely
/// presentational; every persisted artifact stays in seconds.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    pub fn divisor(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => SECONDS_PER_MINUTE,
            TimeUnit::Hours => SECONDS_PER_HOUR,
            TimeUnit::Days => SECONDS_PER_DAY,
            TimeUnit::Weeks => SECONDS_PER_WEEK,
            TimeUnit::Months => SECONDS_PER_MONTH,
            TimeUnit::Years => SECONDS_PER_YEAR,
        }
    }

    pub fn convert(self, seconds: f64) -> f64 {
        seconds / self.divisor()
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Months => "months",
            TimeUnit::Years => "years",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(TimeUnit::Seconds.convert(90.0), 90.0);
        assert_eq!(TimeUnit::Minutes.convert(90.0), 1.5);
        assert_eq!(TimeUnit::Hours.convert(7200.0), 2.0);
        assert!((TimeUnit::Years.convert(SECONDS_PER_YEAR) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_months_are_a_twelfth_of_a_year() {
        assert!(
            (TimeUnit::Months.convert(SECONDS_PER_YEAR) - 12.0).abs() < 1e-12
        );
    }
}
