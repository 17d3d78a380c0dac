use std::collections::HashMap;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::PgPool;

use crate::dto::activity::ActivityRecord;
use crate::dto::leaderboard::{LeaderboardEntry, LeaderboardFilter, TimeFrame};
use crate::error::Result;
use crate::repository::activity::ActivityRepository;

struct Totals {
    points: i64,
    entries: u32,
}

/// Builds the ranked leaderboard for one time window and optional name filter.
///
/// The evaluation instant is passed in explicitly instead of read from the
/// wall clock, so the computation is a pure function of its inputs: the same
/// records and parameters always produce the same ranking, and concurrent
/// invocations share no state. Window comparisons use the calendar date
/// components of `now`'s timezone, not elapsed-duration arithmetic, so a
/// record from 23:59 yesterday and one from 00:01 today land in different
/// `day` buckets.
///
/// Records whose `created_at` is absent or whose `activity_time` is missing
/// or unparseable are dropped in every window, without diagnostics.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use storage::dto::activity::ActivityRecord;
/// use storage::dto::leaderboard::LeaderboardFilter;
/// use storage::services::leaderboard::rank_activities;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
/// let records = vec![ActivityRecord {
///     user_name: "Alex Benjamin".to_string(),
///     activity_time: Some(now),
///     points: 20,
///     created_at: Some(now),
/// }];
///
/// let entries = rank_activities(&records, &LeaderboardFilter::default(), now);
/// assert_eq!(entries[0].rank, 1);
/// assert_eq!(entries[0].points, 20);
/// ```
pub fn rank_activities<Tz: TimeZone>(
    records: &[ActivityRecord],
    filter: &LeaderboardFilter,
    now: DateTime<Tz>,
) -> Vec<LeaderboardEntry> {
    let needle = filter
        .user_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase);

    let mut groups: HashMap<&str, Totals> = HashMap::new();

    for record in records {
        // A record without an insertion timestamp or a parseable activity
        // time is malformed and never contributes to the ranking.
        let Some(activity_time) = record.activity_time else {
            continue;
        };
        if record.created_at.is_none() {
            continue;
        }

        if !in_window(activity_time, filter.time_frame, &now) {
            continue;
        }

        if let Some(needle) = &needle {
            if !record.user_name.to_lowercase().contains(needle) {
                continue;
            }
        }

        // Grouping stays case-sensitive even though the name filter is not:
        // "Alex" and "alex" are distinct groups.
        let totals = groups.entry(record.user_name.as_str()).or_insert(Totals {
            points: 0,
            entries: 0,
        });
        totals.points += record.points;
        totals.entries += 1;
    }

    let mut groups: Vec<(&str, Totals)> = groups.into_iter().collect();
    // Highest points first; ties fall back to entry count, then to the group
    // key so the output order is total and deterministic.
    groups.sort_unstable_by(|(name_a, a), (name_b, b)| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.entries.cmp(&a.entries))
            .then_with(|| name_a.cmp(name_b))
    });

    groups
        .into_iter()
        .enumerate()
        .map(|(index, (user_name, totals))| LeaderboardEntry {
            rank: index as u32 + 1,
            user_name: user_name.to_owned(),
            points: totals.points,
            entries: totals.entries,
        })
        .collect()
}

fn in_window<Tz: TimeZone>(
    activity_time: DateTime<Utc>,
    frame: TimeFrame,
    now: &DateTime<Tz>,
) -> bool {
    let local = activity_time.with_timezone(&now.timezone());

    match frame {
        TimeFrame::All => true,
        TimeFrame::Day => local.date_naive() == now.date_naive(),
        TimeFrame::Month => local.year() == now.year() && local.month() == now.month(),
        TimeFrame::Year => local.year() == now.year(),
    }
}

/// Fetches every stored activity and ranks it with [`rank_activities`].
pub async fn compute_leaderboard<Tz: TimeZone>(
    pool: &PgPool,
    filter: &LeaderboardFilter,
    now: DateTime<Tz>,
) -> Result<Vec<LeaderboardEntry>> {
    let repo = ActivityRepository::new(pool);
    let records: Vec<ActivityRecord> = repo
        .list()
        .await?
        .into_iter()
        .map(ActivityRecord::from)
        .collect();

    Ok(rank_activities(&records, filter, now))
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
    }

    fn record(user_name: &str, activity_time: DateTime<Utc>, points: i64) -> ActivityRecord {
        ActivityRecord {
            user_name: user_name.to_string(),
            activity_time: Some(activity_time),
            points,
            created_at: Some(activity_time),
        }
    }

    fn filter(time_frame: TimeFrame, user_name: Option<&str>) -> LeaderboardFilter {
        LeaderboardFilter {
            time_frame,
            user_name: user_name.map(str::to_string),
        }
    }

    fn entry(rank: u32, user_name: &str, points: i64, entries: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            rank,
            user_name: user_name.to_string(),
            points,
            entries,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_leaderboard() {
        let now = at(2024, 3, 2, 12, 0);
        let entries = rank_activities(&[], &filter(TimeFrame::All, None), now);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_groups_by_user_summing_points_and_counting_entries() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Alex Benjamin", at(2024, 3, 2, 8, 0), 10),
            record("Alex Benjamin", at(2024, 3, 2, 9, 0), 20),
            record("Joe Hendry", at(2024, 3, 2, 10, 0), 5),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(
            entries,
            vec![
                entry(1, "Alex Benjamin", 30, 2),
                entry(2, "Joe Hendry", 5, 1),
            ]
        );
    }

    #[test]
    fn test_sorts_by_points_descending() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Low", at(2024, 3, 2, 8, 0), 10),
            record("High", at(2024, 3, 2, 8, 0), 90),
            record("Mid", at(2024, 3, 2, 8, 0), 50),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        let names: Vec<&str> = entries.iter().map(|e| e.user_name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_points_ties_break_by_entry_count() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("One Big", at(2024, 3, 2, 8, 0), 40),
            record("Two Small", at(2024, 3, 2, 8, 0), 20),
            record("Two Small", at(2024, 3, 2, 9, 0), 20),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(
            entries,
            vec![
                entry(1, "Two Small", 40, 2),
                entry(2, "One Big", 40, 1),
            ]
        );
    }

    #[test]
    fn test_remaining_ties_break_by_user_name() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Zed", at(2024, 3, 2, 8, 0), 30),
            record("Amy", at(2024, 3, 2, 8, 0), 30),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(
            entries,
            vec![entry(1, "Amy", 30, 1), entry(2, "Zed", 30, 1)]
        );
    }

    #[test]
    fn test_ranks_stay_sequential_without_tie_sharing() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Amy", at(2024, 3, 2, 8, 0), 30),
            record("Bob", at(2024, 3, 2, 8, 0), 30),
            record("Cid", at(2024, 3, 2, 8, 0), 30),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_day_window_is_calendar_based() {
        // Two records less than three minutes apart straddle midnight and
        // land in different day buckets.
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Yesterday", at(2024, 3, 1, 23, 59), 10),
            record("Today", at(2024, 3, 2, 0, 1), 10),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::Day, None), now);

        assert_eq!(entries, vec![entry(1, "Today", 10, 1)]);
    }

    #[test]
    fn test_day_window_uses_the_callers_timezone() {
        // 23:30 UTC on March 1st is already March 2nd one hour east.
        let activity = at(2024, 3, 1, 23, 30);
        let records = vec![record("Night Owl", activity, 10)];

        let utc_now = at(2024, 3, 2, 12, 0);
        assert!(rank_activities(&records, &filter(TimeFrame::Day, None), utc_now).is_empty());

        let east_now = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 2, 12, 0, 0)
            .unwrap();
        let entries = rank_activities(&records, &filter(TimeFrame::Day, None), east_now);
        assert_eq!(entries, vec![entry(1, "Night Owl", 10, 1)]);
    }

    #[test]
    fn test_month_window_requires_same_year() {
        let now = at(2024, 3, 15, 12, 0);
        let records = vec![
            record("This March", at(2024, 3, 10, 8, 0), 10),
            record("Last March", at(2023, 3, 10, 8, 0), 10),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::Month, None), now);

        assert_eq!(entries, vec![entry(1, "This March", 10, 1)]);
    }

    #[test]
    fn test_year_window() {
        let now = at(2024, 12, 31, 23, 0);
        let records = vec![
            record("January", at(2024, 1, 15, 8, 0), 10),
            record("Previous Year", at(2023, 12, 31, 8, 0), 10),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::Year, None), now);

        assert_eq!(entries, vec![entry(1, "January", 10, 1)]);
    }

    #[test]
    fn test_all_window_spans_every_year() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Ancient", at(2020, 6, 1, 8, 0), 10),
            record("Recent", at(2024, 3, 1, 8, 0), 10),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_prior_month_records_fall_outside_month_window() {
        let now = at(2024, 3, 15, 12, 0);
        let mut records = vec![
            record("Joe Hendry", at(2024, 2, 2, 8, 0), 30),
            record("Joe Hendry", at(2024, 2, 5, 8, 0), 30),
            record("Joe Hendry", at(2024, 2, 10, 8, 0), 30),
        ];
        records.push(record("Alex Benjamin", at(2024, 3, 15, 8, 0), 20));
        records.push(record("Alex Benjamin", at(2024, 3, 15, 9, 0), 20));

        let entries = rank_activities(&records, &filter(TimeFrame::Month, None), now);

        assert_eq!(entries, vec![entry(1, "Alex Benjamin", 40, 2)]);
    }

    #[test]
    fn test_records_without_activity_time_are_dropped() {
        let now = at(2024, 3, 2, 12, 0);
        let mut malformed = record("Ghost", at(2024, 3, 2, 8, 0), 50);
        malformed.activity_time = None;
        let records = vec![malformed, record("Alex Benjamin", at(2024, 3, 2, 8, 0), 20)];

        // Dropped even under `all`, where no window applies.
        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(entries, vec![entry(1, "Alex Benjamin", 20, 1)]);
    }

    #[test]
    fn test_records_without_created_at_are_dropped() {
        let now = at(2024, 3, 2, 12, 0);
        let mut unguarded = record("Ghost", at(2024, 3, 2, 8, 0), 50);
        unguarded.created_at = None;
        let records = vec![unguarded, record("Alex Benjamin", at(2024, 3, 2, 8, 0), 20)];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(entries, vec![entry(1, "Alex Benjamin", 20, 1)]);
    }

    #[test]
    fn test_name_filter_matches_case_insensitive_substring() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Samoa Joe", at(2024, 3, 2, 8, 0), 40),
            record("SAMUEL", at(2024, 3, 2, 8, 0), 10),
            record("Alex Benjamin", at(2024, 3, 2, 8, 0), 20),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, Some("sam")), now);

        let names: Vec<&str> = entries.iter().map(|e| e.user_name.as_str()).collect();
        assert_eq!(names, vec!["Samoa Joe", "SAMUEL"]);
    }

    #[test]
    fn test_blank_name_filter_is_ignored() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Samoa Joe", at(2024, 3, 2, 8, 0), 40),
            record("Alex Benjamin", at(2024, 3, 2, 8, 0), 20),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, Some("   ")), now);
        assert_eq!(entries.len(), 2);

        let entries = rank_activities(&records, &filter(TimeFrame::All, Some(" joe ")), now);
        assert_eq!(entries, vec![entry(1, "Samoa Joe", 40, 1)]);
    }

    #[test]
    fn test_grouping_remains_case_sensitive() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Alex", at(2024, 3, 2, 8, 0), 10),
            record("alex", at(2024, 3, 2, 9, 0), 20),
        ];

        // The filter matches both spellings; the groups stay distinct.
        let entries = rank_activities(&records, &filter(TimeFrame::All, Some("ALEX")), now);

        assert_eq!(
            entries,
            vec![entry(1, "alex", 20, 1), entry(2, "Alex", 10, 1)]
        );
    }

    #[test]
    fn test_zero_point_records_still_count_as_entries() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Alex Benjamin", at(2024, 3, 2, 8, 0), 0),
            record("Alex Benjamin", at(2024, 3, 2, 9, 0), 20),
        ];

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        assert_eq!(entries, vec![entry(1, "Alex Benjamin", 20, 2)]);
    }

    #[test]
    fn test_same_inputs_produce_identical_output() {
        let now = at(2024, 3, 2, 12, 0);
        let records = vec![
            record("Samoa Joe", at(2024, 1, 15, 8, 0), 40),
            record("Joe Hendry", at(2024, 2, 5, 8, 0), 30),
            record("Alex Benjamin", at(2024, 3, 2, 8, 0), 20),
            record("Alex Benjamin", at(2024, 3, 2, 9, 0), 20),
        ];
        let query = filter(TimeFrame::Year, Some("e"));

        let first = rank_activities(&records, &query, now);
        let second = rank_activities(&records, &query, now);

        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_contiguity_and_adjacent_order_invariants() {
        let now = at(2024, 3, 2, 12, 0);
        let mut records = Vec::new();
        for (name, points_per, count) in [
            ("Alex Benjamin", 20, 5),
            ("Joe Hendry", 30, 3),
            ("Samoa Joe", 40, 3),
            ("Eddie", 10, 1),
            ("Frankie", 90, 1),
            ("Minnie", 30, 3),
        ] {
            for i in 0..count {
                records.push(record(name, at(2024, 3, 2, 8, i), points_per));
            }
        }

        let entries = rank_activities(&records, &filter(TimeFrame::All, None), now);

        let ranks: Vec<u32> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=entries.len() as u32).collect::<Vec<_>>());

        for pair in entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.points > b.points || (a.points == b.points && a.entries >= b.entries),
                "output out of order: {a:?} before {b:?}"
            );
        }
    }
}
