use std::collections::HashMap;

use chrono::Duration;

use crate::model::{HeadDifference, Observation, SiteKey, WellPair};
use crate::util::round_to;

/// Pair observations of two nearby wells to get vertical head differences.
///
/// For every observation of `well_1`, the first `well_2` observation (in input
/// order) dated within `window_days` either side is its partner. The midpoint
/// date rounds toward the earlier day. Any window width is accepted; one
/// wider than the calendar range pairs every reading.
pub fn match_well_pairs(
    pairs: &[WellPair],
    observations: &[Observation],
    window_days: u32,
) -> Vec<HeadDifference> {
    let mut by_site: HashMap<&SiteKey, Vec<&Observation>> = HashMap::new();
    for obs in observations {
        by_site.entry(&obs.site).or_default().push(obs);
    }

    let window = i64::from(window_days);
    let mut out = Vec::new();

    for pair in pairs {
        let (Some(first), Some(second)) = (by_site.get(&pair.well_1), by_site.get(&pair.well_2)) else {
            log::debug!("well pair '{}' has no observations on one side", pair.pair_id);
            continue;
        };

        for o1 in first {
            let partner = second
                .iter()
                .find(|o2| (o2.date - o1.date).num_days().abs() <= window);
            if let Some(o2) = partner {
                let offset = (o2.date - o1.date).num_days().div_euclid(2);
                out.push(HeadDifference {
                    pair_id: pair.pair_id.clone(),
                    well_1: pair.well_1.clone(),
                    date_1: o1.date,
                    head_1: o1.value,
                    well_2: pair.well_2.clone(),
                    date_2: o2.date,
                    head_2: o2.value,
                    mid_date: o1.date + Duration::days(offset),
                    head_diff: round_to(o1.value - o2.value, 2),
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, m, day).unwrap()
    }

    fn pair(id: &str, a: &str, b: &str) -> WellPair {
        WellPair {
            pair_id: id.into(),
            well_1: SiteKey::new(a),
            well_2: SiteKey::new(b),
        }
    }

    #[test]
    fn pairs_within_window() {
        let obs = vec![
            Observation::new("SHALLOW", d(3, 1), 105.456),
            Observation::new("SHALLOW", d(6, 1), 101.0),
            Observation::new("DEEP", d(3, 10), 100.0),
            Observation::new("DEEP", d(3, 12), 99.0),
        ];
        let out = match_well_pairs(&[pair("1", "shallow", "deep")], &obs, 15);
        assert_eq!(out.len(), 1);
        let h = &out[0];
        assert_eq!(h.pair_id, "1");
        assert_eq!(h.date_2, d(3, 10));
        assert_eq!(h.mid_date, d(3, 5));
        assert_eq!(h.head_diff, 5.46);
    }

    #[test]
    fn partner_before_first_well() {
        let obs = vec![
            Observation::new("A", d(3, 10), 50.0),
            Observation::new("B", d(3, 7), 52.0),
        ];
        let out = match_well_pairs(&[pair("p", "A", "B")], &obs, 5);
        assert_eq!(out.len(), 1);
        // -3 days / 2 rounds down to -2
        assert_eq!(out[0].mid_date, d(3, 8));
        assert_eq!(out[0].head_diff, -2.0);
    }

    #[test]
    fn outside_window_or_missing_well() {
        let obs = vec![
            Observation::new("A", d(1, 1), 50.0),
            Observation::new("B", d(3, 1), 52.0),
        ];
        assert!(match_well_pairs(&[pair("p", "A", "B")], &obs, 15).is_empty());
        assert!(match_well_pairs(&[pair("q", "A", "C")], &obs, 365).is_empty());
    }

    #[test]
    fn widest_window_does_not_overflow() {
        let obs = vec![
            Observation::new("A", NaiveDate::MIN, 50.0),
            Observation::new("B", NaiveDate::MAX, 52.0),
        ];
        let out = match_well_pairs(&[pair("p", "A", "B")], &obs, u32::MAX);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date_2, NaiveDate::MAX);
        assert_eq!(out[0].head_diff, -2.0);
    }

    #[test]
    fn names_are_kept_as_read() {
        let obs = vec![
            Observation::new("s01", d(3, 1), 10.0),
            Observation::new("D01", d(3, 2), 9.0),
        ];
        let out = match_well_pairs(&[pair("1", "S01", "D01")], &obs, 15);
        assert_eq!(out[0].well_1.name(), "S01");
        assert_eq!(out[0].well_2.name(), "D01");
    }
}
