// src/app/timeline.rs
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use itertools::Itertools;

use super::types::Movie;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelinePoint {
    pub bucket: String,
    pub percent: f64,
}

/// One emotion token's share of each period, dense across all periods so a
/// stacked chart renders continuous bands.
#[derive(Clone, Debug, PartialEq)]
pub struct EmotionSeries {
    pub token: String,
    pub points: Vec<TimelinePoint>,
}

/// Display key for the period containing `date`.
pub fn bucket_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => date.format("%d %b %Y").to_string(),
        Granularity::Weekly => {
            // ISO week numbering: the week and its year are derived together,
            // so a boundary week spanning New Year lands in one bucket.
            let week = date.iso_week();
            format!("Week {}, {}", week.week(), week.year())
        }
        Granularity::Monthly => date.format("%b %Y").to_string(),
    }
}

/// Parse a bucket key back into a date usable for chronological ordering.
/// Malformed keys sort to the earliest possible position instead of erroring.
pub fn bucket_sort_date(key: &str, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => {
            NaiveDate::parse_from_str(key, "%d %b %Y").unwrap_or(NaiveDate::MIN)
        }
        Granularity::Weekly => parse_week_key(key)
            .and_then(|(year, week)| NaiveDate::from_isoywd_opt(year, week, Weekday::Mon))
            .unwrap_or(NaiveDate::MIN),
        Granularity::Monthly => {
            NaiveDate::parse_from_str(&format!("01 {key}"), "%d %b %Y").unwrap_or(NaiveDate::MIN)
        }
    }
}

fn parse_week_key(key: &str) -> Option<(i32, u32)> {
    let rest = key.strip_prefix("Week ")?;
    let (week, year) = rest.split_once(", ")?;
    Some((year.trim().parse().ok()?, week.trim().parse().ok()?))
}

/// Bucket annotated movies by period and compute each emotion token's
/// percentage of that period's total tag occurrences.
///
/// Series come out in *reverse* first-discovery order of the tokens; the
/// stacked chart relies on that order for its band layering. Every series
/// has one point per surviving bucket (0.0 where the token is absent).
pub fn aggregate(movies: &[Movie], granularity: Granularity) -> Vec<EmotionSeries> {
    let eligible: Vec<&Movie> = movies.iter().filter(|m| m.is_annotated()).collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    // First-discovery order of distinct tokens across the whole scan.
    let discovery: Vec<String> = eligible
        .iter()
        .flat_map(|m| m.emotions.split_whitespace())
        .unique()
        .map(str::to_string)
        .collect();

    // Per-bucket token counts. A token repeated inside one movie's tag
    // string counts once per occurrence.
    let mut counts: HashMap<String, HashMap<&str, u32>> = HashMap::new();
    for m in &eligible {
        let Some(date) = m.date_tagged else { continue };
        let per_bucket = counts.entry(bucket_key(date, granularity)).or_default();
        for token in m.emotions.split_whitespace() {
            *per_bucket.entry(token).or_insert(0) += 1;
        }
    }

    let buckets: Vec<String> = counts
        .keys()
        .cloned()
        .sorted_by_key(|k| bucket_sort_date(k, granularity))
        .collect();

    let totals: HashMap<&String, u32> = counts
        .iter()
        .map(|(bucket, per)| (bucket, per.values().sum()))
        .collect();

    let mut series: Vec<EmotionSeries> = discovery
        .iter()
        .map(|token| {
            let points = buckets
                .iter()
                .map(|bucket| {
                    let n = counts[bucket].get(token.as_str()).copied().unwrap_or(0);
                    let total = totals[bucket];
                    TimelinePoint {
                        bucket: bucket.clone(),
                        percent: f64::from(n) / f64::from(total) * 100.0,
                    }
                })
                .collect();
            EmotionSeries {
                token: token.clone(),
                points,
            }
        })
        .collect();

    series.reverse();
    series
}

/// Titles of the movies behind one `(bucket, token)` data point, in
/// collection iteration order.
pub fn lookup_contributors(
    movies: &[Movie],
    bucket: &str,
    token: &str,
    granularity: Granularity,
) -> Vec<String> {
    movies
        .iter()
        .filter(|m| {
            m.date_tagged
                .is_some_and(|d| bucket_key(d, granularity) == bucket)
        })
        .filter(|m| m.emotions.split_whitespace().any(|t| t == token))
        .map(|m| m.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(id: i64, title: &str, date: (i32, u32, u32), emotions: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genre: "Drama".to_string(),
            rating: 7.0,
            poster_path: None,
            emotions: emotions.to_string(),
            notes: String::new(),
            tags: String::new(),
            date_tagged: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
        }
    }

    fn untagged(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genre: "Drama".to_string(),
            rating: 7.0,
            poster_path: None,
            emotions: String::new(),
            notes: String::new(),
            tags: String::new(),
            date_tagged: None,
        }
    }

    #[test]
    fn empty_when_nothing_is_annotated() {
        let movies = vec![untagged(1, "A"), untagged(2, "B")];
        assert!(aggregate(&movies, Granularity::Daily).is_empty());
    }

    #[test]
    fn duplicate_tokens_count_per_occurrence() {
        let movies = vec![
            tagged(1, "A", (2024, 1, 10), "😄 😄"),
            tagged(2, "B", (2024, 1, 10), "😢"),
        ];
        let series = aggregate(&movies, Granularity::Daily);
        assert_eq!(series.len(), 2);

        // Discovery order 😄, 😢 — reversed for stacking.
        assert_eq!(series[0].token, "😢");
        assert_eq!(series[1].token, "😄");

        let happy = &series[1].points[0];
        let sad = &series[0].points[0];
        assert_eq!(happy.bucket, "10 Jan 2024");
        assert!((happy.percent - 200.0 / 3.0).abs() < 1e-9);
        assert!((sad.percent - 100.0 / 3.0).abs() < 1e-9);
        assert!((happy.percent + sad.percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn series_are_dense_across_buckets() {
        let movies = vec![
            tagged(1, "A", (2024, 1, 10), "😄"),
            tagged(2, "B", (2024, 1, 12), "😢"),
        ];
        let series = aggregate(&movies, Granularity::Daily);
        for s in &series {
            assert_eq!(s.points.len(), 2);
            assert_eq!(s.points[0].bucket, "10 Jan 2024");
            assert_eq!(s.points[1].bucket, "12 Jan 2024");
        }
        // Each bucket sums to 100 across series.
        for idx in 0..2 {
            let sum: f64 = series.iter().map(|s| s.points[idx].percent).sum();
            assert!((sum - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn stacking_order_reverses_discovery() {
        let movies = vec![
            tagged(1, "A", (2024, 3, 1), "calm"),
            tagged(2, "B", (2024, 3, 2), "joy"),
            tagged(3, "C", (2024, 3, 3), "fear calm"),
        ];
        let series = aggregate(&movies, Granularity::Monthly);
        let tokens: Vec<_> = series.iter().map(|s| s.token.as_str()).collect();
        assert_eq!(tokens, ["fear", "joy", "calm"]);
    }

    #[test]
    fn weekly_buckets_use_iso_week_year() {
        // 2024-12-30 is a Monday belonging to ISO week 1 of 2025.
        let movies = vec![tagged(1, "A", (2024, 12, 30), "😄")];
        let series = aggregate(&movies, Granularity::Weekly);
        assert_eq!(series[0].points[0].bucket, "Week 1, 2025");
    }

    #[test]
    fn buckets_are_chronological_not_lexicographic() {
        let movies = vec![
            tagged(1, "A", (2024, 11, 4), "😄"),  // Week 45, 2024
            tagged(2, "B", (2024, 2, 5), "😄"),   // Week 6, 2024
            tagged(3, "C", (2023, 12, 18), "😄"), // Week 51, 2023
        ];
        let series = aggregate(&movies, Granularity::Weekly);
        let buckets: Vec<_> = series[0].points.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, ["Week 51, 2023", "Week 6, 2024", "Week 45, 2024"]);
    }

    #[test]
    fn monthly_buckets_order_across_years() {
        let movies = vec![
            tagged(1, "A", (2024, 2, 1), "😄"),
            tagged(2, "B", (2023, 12, 1), "😄"),
        ];
        let series = aggregate(&movies, Granularity::Monthly);
        let buckets: Vec<_> = series[0].points.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, ["Dec 2023", "Feb 2024"]);
    }

    #[test]
    fn malformed_week_key_sorts_first() {
        assert_eq!(
            bucket_sort_date("Week soon, maybe", Granularity::Weekly),
            NaiveDate::MIN
        );
        assert_eq!(bucket_sort_date("garbage", Granularity::Weekly), NaiveDate::MIN);
        let good = bucket_sort_date("Week 2, 2024", Granularity::Weekly);
        assert!(good > NaiveDate::MIN);
        assert_eq!(good, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    }

    #[test]
    fn stray_whitespace_in_emotions_is_ignored() {
        let movies = vec![tagged(1, "A", (2024, 1, 10), "  😄   😢 ")];
        let series = aggregate(&movies, Granularity::Daily);
        assert_eq!(series.len(), 2);
        let sum: f64 = series.iter().map(|s| s.points[0].percent).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn contributors_match_bucket_and_token() {
        let movies = vec![
            tagged(1, "Matrix", (2024, 1, 10), "😄 😄"),
            tagged(2, "Notebook", (2024, 1, 10), "😢"),
            tagged(3, "Heat", (2024, 1, 11), "😢"),
        ];
        let out = lookup_contributors(&movies, "10 Jan 2024", "😢", Granularity::Daily);
        assert_eq!(out, ["Notebook"]);

        let out = lookup_contributors(&movies, "10 Jan 2024", "😄", Granularity::Daily);
        assert_eq!(out, ["Matrix"]);

        let out = lookup_contributors(&movies, "09 Jan 2024", "😄", Granularity::Daily);
        assert!(out.is_empty());
    }

    #[test]
    fn every_positive_point_has_contributors() {
        let movies = vec![
            tagged(1, "A", (2024, 1, 10), "😄"),
            tagged(2, "B", (2024, 1, 12), "😢 😄"),
        ];
        for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            for series in aggregate(&movies, granularity) {
                for point in &series.points {
                    if point.percent > 0.0 {
                        let found =
                            lookup_contributors(&movies, &point.bucket, &series.token, granularity);
                        assert!(!found.is_empty(), "{} @ {}", series.token, point.bucket);
                    }
                }
            }
        }
    }
}
