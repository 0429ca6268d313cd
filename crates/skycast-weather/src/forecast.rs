//! Pure aggregation of hourly forecast entries into daily buckets.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::types::ForecastEntry;

/// One calendar day of forecast entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub items: Vec<ForecastEntry>,
    pub avg_temp: i32,
    pub icon: Option<String>,
    pub description: String,
}

/// Group forecast entries by calendar date.
///
/// Day order follows the first occurrence of each date in the input;
/// `avg_temp` is the half-up-rounded mean of the day's temperatures;
/// icon and description come from the day's first entry. Total and
/// deterministic: empty input yields an empty list.
pub fn group_by_day(entries: &[ForecastEntry]) -> Vec<ForecastDay> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut buckets: HashMap<NaiveDate, Vec<ForecastEntry>> = HashMap::new();

    for entry in entries {
        let bucket = buckets.entry(entry.date).or_insert_with(|| {
            order.push(entry.date);
            Vec::new()
        });
        bucket.push(entry.clone());
    }

    order
        .into_iter()
        .filter_map(|date| {
            let items = buckets.remove(&date)?;
            let first = items.first()?;
            let sum: f64 = items.iter().map(|i| i.temperature).sum();

            Some(ForecastDay {
                date,
                icon: first.icon.clone(),
                description: first.description.clone(),
                avg_temp: round_half_up(sum / items.len() as f64),
                items,
            })
        })
        .collect()
}

/// Round halves toward positive infinity, matching the rounding the
/// backend's consumers have always seen (-12.5 rounds to -12).
fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveTime;

    fn entry(date: &str, time: &str, temperature: f64) -> ForecastEntry {
        ForecastEntry {
            date: date.parse().unwrap(),
            time: time.parse::<NaiveTime>().unwrap(),
            temperature,
            humidity: 70,
            pressure: 1013,
            wind_speed: 3.0,
            description: "scattered clouds".to_string(),
            icon: Some("03d".to_string()),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(group_by_day(&[]).is_empty());
    }

    #[test]
    fn test_item_count_is_conserved() {
        let entries = vec![
            entry("2024-01-01", "09:00:00", 10.0),
            entry("2024-01-01", "12:00:00", 14.0),
            entry("2024-01-02", "09:00:00", -1.0),
            entry("2024-01-03", "09:00:00", 2.0),
        ];

        let days = group_by_day(&entries);

        let total: usize = days.iter().map(|d| d.items.len()).sum();
        assert_eq!(total, entries.len());
        assert_eq!(days.len(), 3);
    }

    #[test]
    fn test_avg_temp_is_half_up_rounded_mean() {
        let entries = vec![
            entry("2024-01-01", "09:00:00", 10.0),
            entry("2024-01-01", "12:00:00", 14.0),
        ];

        let days = group_by_day(&entries);
        assert_eq!(days[0].avg_temp, 12);
    }

    #[test]
    fn test_half_up_rounding_at_the_boundary() {
        // 11 and 12 average to 11.5, which rounds up.
        let entries = vec![
            entry("2024-01-01", "09:00:00", 11.0),
            entry("2024-01-01", "12:00:00", 12.0),
        ];
        assert_eq!(group_by_day(&entries)[0].avg_temp, 12);

        // Negative halves round toward positive infinity.
        let entries = vec![
            entry("2024-01-02", "09:00:00", -12.0),
            entry("2024-01-02", "12:00:00", -13.0),
        ];
        assert_eq!(group_by_day(&entries)[0].avg_temp, -12);
    }

    #[test]
    fn test_day_order_follows_first_occurrence() {
        let entries = vec![
            entry("2024-01-01", "09:00:00", 10.0),
            entry("2024-01-02", "09:00:00", -1.0),
            entry("2024-01-01", "12:00:00", 14.0),
        ];

        let days = group_by_day(&entries);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2024-01-01".parse::<NaiveDate>().unwrap());
        assert_eq!(days[1].date, "2024-01-02".parse::<NaiveDate>().unwrap());
        assert_eq!(days[0].items.len(), 2);
        assert_eq!(days[0].avg_temp, 12);
    }

    #[test]
    fn test_icon_and_description_come_from_first_entry() {
        let mut late = entry("2024-01-01", "18:00:00", 8.0);
        late.icon = Some("10n".to_string());
        late.description = "rain".to_string();

        let entries = vec![entry("2024-01-01", "09:00:00", 10.0), late];
        let days = group_by_day(&entries);

        assert_eq!(days[0].icon.as_deref(), Some("03d"));
        assert_eq!(days[0].description, "scattered clouds");
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let entries = vec![
            entry("2024-01-01", "09:00:00", 10.0),
            entry("2024-01-02", "09:00:00", -1.0),
            entry("2024-01-01", "12:00:00", 14.0),
        ];

        assert_eq!(group_by_day(&entries), group_by_day(&entries));
    }
}
