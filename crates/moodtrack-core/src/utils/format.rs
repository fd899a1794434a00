use chrono::{Datelike, Duration, NaiveDate};

/// Format a date as dd/mm/yyyy
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Where a date sits relative to today, coarsest bucket last
pub fn relative_period(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "today".to_string();
    }

    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    if date >= week_start && date <= today {
        return "this week".to_string();
    }

    if date.year() == today.year() && date.month() == today.month() {
        return "this month".to_string();
    }

    if date.year() == today.year() {
        return "this year".to_string();
    }

    format!("year {}", date.year())
}

/// Signed degree, e.g. "+3", "0", "-2"
pub fn format_degree(degree: i64) -> String {
    if degree > 0 {
        format!("+{}", degree)
    } else {
        degree.to_string()
    }
}

/// Average with two decimals and an explicit sign
pub fn format_average(average: f64) -> String {
    if average > 0.0 {
        format!("+{:.2}", average)
    } else {
        format!("{:.2}", average)
    }
}

pub fn format_percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.1}%", r),
        None => "-".to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(date(2025, 7, 3)), "03/07/2025");
    }

    #[test]
    fn test_relative_period() {
        // Thursday
        let today = date(2025, 7, 10);
        assert_eq!(relative_period(today, today), "today");
        assert_eq!(relative_period(date(2025, 7, 7), today), "this week");
        assert_eq!(relative_period(date(2025, 7, 6), today), "this month");
        assert_eq!(relative_period(date(2025, 2, 1), today), "this year");
        assert_eq!(relative_period(date(2024, 12, 31), today), "year 2024");
    }

    #[test]
    fn test_relative_period_week_spanning_months() {
        // Wednesday 2 July, week started Monday 30 June
        let today = date(2025, 7, 2);
        assert_eq!(relative_period(date(2025, 6, 30), today), "this week");
        assert_eq!(relative_period(date(2025, 6, 29), today), "this year");
    }

    #[test]
    fn test_format_degree() {
        assert_eq!(format_degree(3), "+3");
        assert_eq!(format_degree(0), "0");
        assert_eq!(format_degree(-2), "-2");
        assert_eq!(format_average(1.5), "+1.50");
        assert_eq!(format_average(-0.333), "-0.33");
        assert_eq!(format_percent(Some(66.66)), "66.7%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Détente", 5), "Dé...");
    }
}
