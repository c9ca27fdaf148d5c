use std::collections::HashMap;

use chrono::TimeZone;

use crate::model::{DaySummary, RawForecastEntry};

use super::day_label;

/// Summaries in first-seen order, with an index from day key to position.
#[derive(Debug, Default)]
struct DayBuckets {
    order: Vec<DaySummary>,
    index: HashMap<&'static str, usize>,
}

impl DayBuckets {
    fn fold(&mut self, key: &'static str, entry: &RawForecastEntry) {
        match self.index.get(key) {
            Some(&pos) => {
                let day = &mut self.order[pos];
                day.max_temperature = day.max_temperature.max(entry.temperature_max);
                day.min_temperature = day.min_temperature.min(entry.temperature_min);
            }
            None => {
                self.index.insert(key, self.order.len());
                self.order.push(DaySummary {
                    day_label: key.to_string(),
                    min_temperature: entry.temperature_min,
                    max_temperature: entry.temperature_max,
                    icon: entry.icon(),
                    description: entry.description.clone(),
                    first_seen: entry.timestamp,
                });
            }
        }
    }
}

/// Fold a time-ordered feed into one summary per weekday of `tz`.
///
/// Days come back in the order they were first seen, at most `day_limit` of
/// them. The icon and description of a day are those of its first entry.
/// Temperatures must already share one unit; nothing is converted here.
pub fn aggregate_daily<Tz: TimeZone>(
    entries: &[RawForecastEntry],
    day_limit: usize,
    tz: &Tz,
) -> Vec<DaySummary> {
    let mut buckets = DayBuckets::default();

    for entry in entries {
        buckets.fold(day_label(&entry.timestamp, tz), entry);
    }

    let mut days = buckets.order;
    days.truncate(day_limit);
    days
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::forecast::test_support::*;
    use crate::forecast::zone_for_offset;

    fn tuesday_wednesday_feed() -> Vec<RawForecastEntry> {
        // 8 Tuesday slots, then 2 Wednesday slots.
        let temps: [(f64, f64); 10] = [
            (4.0, 6.0),
            (3.5, 5.0),
            (2.0, 4.5),
            (5.0, 9.0),
            (8.0, 12.5),
            (9.0, 11.0),
            (6.0, 8.0),
            (4.5, 6.5),
            (1.0, 3.0),
            (-0.5, 2.0),
        ];
        temps
            .iter()
            .enumerate()
            .map(|(i, &(min, max))| {
                let icon = if i == 0 { "01n" } else if i == 8 { "13n" } else { "04d" };
                entry(TUESDAY_MIDNIGHT + i as i64 * THREE_HOURS, (min + max) / 2.0, min, max, icon)
            })
            .collect()
    }

    #[test]
    fn empty_feed_gives_no_days() {
        assert!(aggregate_daily(&[], 5, &Utc).is_empty());
    }

    #[test]
    fn groups_by_weekday_in_first_seen_order() {
        let days = aggregate_daily(&tuesday_wednesday_feed(), 5, &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_label, "Tuesday");
        assert_eq!(days[0].min_temperature, 2.0);
        assert_eq!(days[0].max_temperature, 12.5);
        assert_eq!(days[1].day_label, "Wednesday");
        assert_eq!(days[1].min_temperature, -0.5);
        assert_eq!(days[1].max_temperature, 3.0);
    }

    #[test]
    fn icon_and_description_come_from_first_entry_of_day() {
        let days = aggregate_daily(&tuesday_wednesday_feed(), 5, &Utc);

        assert_eq!(days[0].icon.id, "01n");
        assert_eq!(days[0].description, "condition 01n");
        assert_eq!(days[1].icon.id, "13n");
        assert_eq!(days[0].first_seen.timestamp(), TUESDAY_MIDNIGHT);
    }

    #[test]
    fn day_limit_truncates() {
        let feed: Vec<_> = (0..7)
            .map(|d| entry(TUESDAY_MIDNIGHT + d * 86_400, 10.0, 5.0, 15.0, "01d"))
            .collect();

        let days = aggregate_daily(&feed, 5, &Utc);
        let labels: Vec<_> = days.iter().map(|d| d.day_label.as_str()).collect();
        assert_eq!(labels, ["Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]);

        assert!(aggregate_daily(&feed, 0, &Utc).is_empty());
    }

    #[test]
    fn fewer_days_than_limit_is_not_padded() {
        let feed = [entry(TUESDAY_MIDNIGHT, 1.0, 0.0, 2.0, "01d")];
        assert_eq!(aggregate_daily(&feed, 5, &Utc).len(), 1);
    }

    #[test]
    fn same_weekday_a_week_apart_merges_into_first_bucket() {
        // Keys are weekday names, so next Tuesday folds into this Tuesday.
        let feed = [
            entry(TUESDAY_MIDNIGHT, 1.0, 0.0, 2.0, "01d"),
            entry(TUESDAY_MIDNIGHT + 86_400, 1.0, 0.0, 2.0, "01d"),
            entry(TUESDAY_MIDNIGHT + 7 * 86_400, 1.0, -9.0, 20.0, "09d"),
        ];

        let days = aggregate_daily(&feed, 5, &Utc);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].min_temperature, -9.0);
        assert_eq!(days[0].max_temperature, 20.0);
        assert_eq!(days[0].icon.id, "01d");
    }

    #[test]
    fn buckets_follow_label_zone() {
        // 21:00 UTC Tuesday is already Wednesday at UTC+5.
        let feed = [
            entry(TUESDAY_MIDNIGHT + 18 * 3600, 1.0, 0.0, 2.0, "01d"),
            entry(TUESDAY_MIDNIGHT + 21 * 3600, 1.0, 0.0, 2.0, "01n"),
        ];

        assert_eq!(aggregate_daily(&feed, 5, &Utc).len(), 1);

        let days = aggregate_daily(&feed, 5, &zone_for_offset(5 * 3600));
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].day_label, "Wednesday");
    }

    #[test]
    fn fold_is_order_independent_within_a_day() {
        let mut feed = tuesday_wednesday_feed();
        feed.truncate(8);
        let forward = aggregate_daily(&feed, 5, &Utc);

        feed.reverse();
        let backward = aggregate_daily(&feed, 5, &Utc);

        assert_eq!(forward[0].min_temperature, backward[0].min_temperature);
        assert_eq!(forward[0].max_temperature, backward[0].max_temperature);
    }

    #[test]
    fn output_bounded_by_limit_and_distinct_days() {
        let feed = tuesday_wednesday_feed();
        for limit in 0..4 {
            let days = aggregate_daily(&feed, limit, &Utc);
            assert!(days.len() <= limit);
            assert!(days.len() <= 2);
        }
    }

    #[test]
    fn min_never_exceeds_max() {
        for day in aggregate_daily(&tuesday_wednesday_feed(), 5, &Utc) {
            assert!(day.min_temperature <= day.max_temperature);
        }
    }

    #[test]
    fn reaggregating_summaries_is_a_fixed_point() {
        let days = aggregate_daily(&tuesday_wednesday_feed(), 5, &Utc);

        let as_entries: Vec<RawForecastEntry> = days
            .iter()
            .map(|d| RawForecastEntry {
                timestamp: d.first_seen,
                temperature: d.max_temperature,
                temperature_min: d.min_temperature,
                temperature_max: d.max_temperature,
                icon_id: d.icon.id.clone(),
                description: d.description.clone(),
            })
            .collect();

        assert_eq!(aggregate_daily(&as_entries, 5, &Utc), days);
    }
}
