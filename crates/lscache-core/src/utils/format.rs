use crate::cache::TimeDiff;

const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

/// Format an entry age for display ("just now", "5m ago", "2h ago", "3d ago",
/// "4mo ago", "1y ago").
///
/// Hours and larger units are rounded half-up, so 1h 30m shows as "2h ago".
/// A value that rounds up to a full next unit moves to that unit
/// (23h 40m shows as "1d ago", not "24h ago"). Negative ages (clock skew)
/// show as "just now".
pub fn format_age(diff: &TimeDiff) -> String {
    if diff.minutes_ago < 1.0 {
        return "just now".to_string();
    }
    if diff.minutes_ago < MINUTES_PER_HOUR {
        return format!("{}m ago", diff.minutes_ago.floor());
    }

    let hours = diff.hours_ago.round();
    if hours < HOURS_PER_DAY {
        return format!("{}h ago", hours);
    }
    let days = diff.days_ago.round();
    if days < DAYS_PER_MONTH {
        return format!("{}d ago", days);
    }
    let months = diff.months_ago.round();
    if months < MONTHS_PER_YEAR {
        return format!("{}mo ago", months);
    }
    format!("{}y ago", diff.years_ago.round())
}
