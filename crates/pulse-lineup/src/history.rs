//! Participation-year history and the consecutive-year eligibility rule.

use std::collections::{BTreeSet, HashMap};

use crate::model::PerformerKey;

/// Check whether `candidate_year` may be added to `years` without creating
/// a run of more than `max_consecutive` consecutive years.
///
/// `years` may be unordered and contain duplicates; only the distinct set
/// matters. The check is pure and must be re-run whenever the history grows.
pub fn is_eligible(years: &[i32], candidate_year: i32, max_consecutive: usize) -> bool {
    let distinct: BTreeSet<i32> = years
        .iter()
        .copied()
        .chain(std::iter::once(candidate_year))
        .collect();

    let mut run = 1;
    let mut previous: Option<i32> = None;
    for year in distinct {
        run = match previous {
            Some(prev) if year == prev + 1 => run + 1,
            _ => 1,
        };
        if run > max_consecutive {
            return false;
        }
        previous = Some(year);
    }
    true
}

/// Longest run of consecutive distinct years in `years`.
pub fn longest_streak(years: &[i32]) -> usize {
    let distinct: BTreeSet<i32> = years.iter().copied().collect();

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<i32> = None;
    for year in distinct {
        run = match previous {
            Some(prev) if year == prev + 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(year);
    }
    longest
}

/// Append-only record of the festival years each performer was drawn for.
///
/// Owned by the caller and lent mutably to the scheduler, which reads it
/// for eligibility and appends to it as performers are drawn.
#[derive(Debug, Clone, Default)]
pub struct PerformanceYearHistory {
    years: HashMap<PerformerKey, Vec<i32>>,
}

impl PerformanceYearHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `performer` was booked in `year`.
    pub fn record(&mut self, performer: PerformerKey, year: i32) {
        self.years.entry(performer).or_default().push(year);
    }

    /// Years recorded for `performer`, in recording order.
    pub fn years(&self, performer: PerformerKey) -> &[i32] {
        self.years
            .get(&performer)
            .map(|years| years.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `performer` may be booked for `year` under the streak rule.
    pub fn is_eligible(&self, performer: PerformerKey, year: i32, max_consecutive: usize) -> bool {
        is_eligible(self.years(performer), year, max_consecutive)
    }

    /// Number of performers with at least one recorded year.
    pub fn performer_count(&self) -> usize {
        self.years.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 3;

    #[test]
    fn test_fourth_consecutive_year_rejected() {
        let years = [2019, 2020, 2021];
        assert!(!is_eligible(&years, 2022, MAX));
        assert!(!is_eligible(&years, 2018, MAX));
        assert!(is_eligible(&years, 2023, MAX));
    }

    #[test]
    fn test_duplicates_and_order_ignored() {
        let years = [2020, 2018, 2020, 2019, 2018];
        assert!(!is_eligible(&years, 2021, MAX));
        assert!(is_eligible(&years, 2022, MAX));
    }

    #[test]
    fn test_candidate_bridging_two_runs() {
        // 2017-2018 + 2020-2021: adding 2019 makes a five-year run
        let years = [2017, 2018, 2020, 2021];
        assert!(!is_eligible(&years, 2019, MAX));
    }

    #[test]
    fn test_repeat_year_within_existing_run() {
        let years = [2019, 2020, 2021];
        assert!(is_eligible(&years, 2020, MAX));
    }

    #[test]
    fn test_empty_history_always_eligible() {
        assert!(is_eligible(&[], 2024, MAX));
        assert!(is_eligible(&[], 2024, 1));
    }

    #[test]
    fn test_check_is_pure() {
        let mut history = PerformanceYearHistory::new();
        let artist = PerformerKey::Artist(1);
        for year in [2018, 2019, 2020] {
            history.record(artist, year);
        }

        let first = history.is_eligible(artist, 2021, MAX);
        let second = history.is_eligible(artist, 2021, MAX);
        assert_eq!(first, second);
        assert!(!first);
        assert_eq!(history.years(artist), &[2018, 2019, 2020]);
        assert!(history.is_eligible(artist, 2023, MAX));
    }

    #[test]
    fn test_years_fed_one_at_a_time_never_exceed_streak() {
        let mut history = PerformanceYearHistory::new();
        let group = PerformerKey::Group(4);
        for year in [2015, 2016, 2017, 2018, 2019, 2020, 2021, 2022] {
            if history.is_eligible(group, year, MAX) {
                history.record(group, year);
            }
        }
        assert_eq!(history.years(group), &[2015, 2016, 2017, 2019, 2020, 2021]);
        assert!(longest_streak(history.years(group)) <= MAX);
    }

    #[test]
    fn test_artist_and_group_keys_are_separate() {
        let mut history = PerformanceYearHistory::new();
        for year in [2018, 2019, 2020] {
            history.record(PerformerKey::Artist(2), year);
        }
        assert!(history.is_eligible(PerformerKey::Group(2), 2021, MAX));
        assert_eq!(history.performer_count(), 1);
    }

    #[test]
    fn test_longest_streak() {
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[2020, 2020]), 1);
        assert_eq!(longest_streak(&[2016, 2018, 2019, 2020, 2022]), 3);
    }
}
