use chrono::NaiveDate;

use crate::model::SimulatedSeries;
use crate::util::round_to;

/// Linearly interpolate between two simulated values onto `obs_date`.
///
/// Requires `early_date <= obs_date <= late_date`. The boundary dates return
/// their own value exactly; interior dates use whole-day arithmetic. A
/// zero-length bracket with an interior date is a caller bug.
pub fn interpolate(
    obs_date: NaiveDate,
    early_date: NaiveDate,
    early_value: f64,
    late_date: NaiveDate,
    late_value: f64,
) -> f64 {
    debug_assert!(early_date <= obs_date && obs_date <= late_date);
    if obs_date == early_date {
        return early_value;
    }
    if obs_date == late_date {
        return late_value;
    }
    debug_assert!(early_date < late_date, "degenerate bracket");

    let span = (late_date - early_date).num_days() as f64;
    let offset = (obs_date - early_date).num_days() as f64;
    early_value + (late_value - early_value) * offset / span
}

/// Position of a date within a simulated date array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// The date is a simulated timestep.
    Exact(usize),
    /// Last simulated index before the date, first simulated index after it.
    Between(usize, usize),
}

/// Locate `date` in strictly increasing `dates`.
///
/// Returns `None` when the date is before the first or after the last
/// simulated date.
pub fn find_bracket(dates: &[NaiveDate], date: NaiveDate) -> Option<Bracket> {
    let first = *dates.first()?;
    let last = *dates.last()?;
    if date < first || date > last {
        return None;
    }

    // count of dates <= date; at least 1 because date >= first
    let upper = dates.partition_point(|d| *d <= date);
    let early = upper - 1;
    if dates[early] == date {
        Some(Bracket::Exact(early))
    } else {
        Some(Bracket::Between(early, upper))
    }
}

/// Simulated value of `series` at `date`, or `None` outside the simulated period.
pub fn value_at(series: &SimulatedSeries, date: NaiveDate) -> Option<f64> {
    let dates = series.dates();
    let values = series.values();
    match find_bracket(dates, date)? {
        Bracket::Exact(i) => Some(values[i]),
        Bracket::Between(lo, hi) => Some(interpolate(date, dates[lo], values[lo], dates[hi], values[hi])),
    }
}

/// Simulated equivalent of an observation, optionally rounded.
pub fn sim_equiv(series: &SimulatedSeries, date: NaiveDate, round_decimals: Option<u32>) -> Option<f64> {
    let value = value_at(series, date)?;
    Some(match round_decimals {
        Some(decimals) => round_to(value, decimals),
        None => value,
    })
}

/// 1-based timestep of `date` in `dates`: the step ending on or after it.
///
/// Returns `None` outside the simulated period.
pub fn timestep(dates: &[NaiveDate], date: NaiveDate) -> Option<usize> {
    match find_bracket(dates, date)? {
        Bracket::Exact(i) => Some(i + 1),
        Bracket::Between(_, hi) => Some(hi + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(values: &[(NaiveDate, f64)]) -> SimulatedSeries {
        SimulatedSeries::new(
            1,
            values.iter().map(|(d, _)| *d).collect(),
            values.iter().map(|(_, v)| *v).collect(),
        )
        .unwrap()
    }

    #[test]
    fn boundaries_return_exact_values() {
        let (d0, d1) = (d(2020, 1, 1), d(2020, 1, 11));
        assert_eq!(interpolate(d0, d0, 100.0, d1, 200.0), 100.0);
        assert_eq!(interpolate(d1, d0, 100.0, d1, 200.0), 200.0);
    }

    #[test]
    fn interior_points() {
        let (d0, d1) = (d(2020, 1, 1), d(2020, 1, 5));
        assert!((interpolate(d(2020, 1, 2), d0, 100.0, d1, 200.0) - 125.0).abs() < 1e-9);
        assert!((interpolate(d(2020, 1, 3), d0, 100.0, d1, 200.0) - 150.0).abs() < 1e-9);
        assert!((interpolate(d(2020, 1, 4), d0, 100.0, d1, 200.0) - 175.0).abs() < 1e-9);
        // decreasing and negative values
        assert!((interpolate(d(2020, 1, 3), d0, 200.0, d1, 100.0) - 150.0).abs() < 1e-9);
        assert!((interpolate(d(2020, 1, 3), d0, -50.0, d1, -100.0) + 75.0).abs() < 1e-9);
    }

    #[test]
    fn bracket_search() {
        let dates = [d(2020, 1, 1), d(2020, 1, 11), d(2020, 1, 21)];
        assert_eq!(find_bracket(&dates, d(2019, 12, 31)), None);
        assert_eq!(find_bracket(&dates, d(2020, 1, 22)), None);
        assert_eq!(find_bracket(&dates, d(2020, 1, 1)), Some(Bracket::Exact(0)));
        assert_eq!(find_bracket(&dates, d(2020, 1, 21)), Some(Bracket::Exact(2)));
        assert_eq!(find_bracket(&dates, d(2020, 1, 15)), Some(Bracket::Between(1, 2)));
        assert_eq!(find_bracket(&[], d(2020, 1, 15)), None);
    }

    #[test]
    fn value_at_ignores_query_order() {
        let s = series(&[
            (d(2020, 1, 1), 100.0),
            (d(2020, 1, 11), 110.0),
            (d(2020, 1, 21), 120.0),
        ]);
        // later date first, then an earlier one
        assert!((value_at(&s, d(2020, 1, 16)).unwrap() - 115.0).abs() < 1e-9);
        assert!((value_at(&s, d(2020, 1, 6)).unwrap() - 105.0).abs() < 1e-9);
        assert_eq!(value_at(&s, d(2020, 1, 21)), Some(120.0));
        assert_eq!(value_at(&s, d(2020, 2, 1)), None);
    }

    #[test]
    fn sim_equiv_rounds() {
        let s = series(&[(d(2020, 1, 1), 100.0), (d(2020, 1, 4), 101.0)]);
        let raw = sim_equiv(&s, d(2020, 1, 2), None).unwrap();
        assert!((raw - 100.333_333).abs() < 1e-5);
        assert_eq!(sim_equiv(&s, d(2020, 1, 2), Some(2)), Some(100.33));
        assert_eq!(sim_equiv(&s, d(2020, 1, 2), Some(0)), Some(100.0));
    }

    #[test]
    fn timestep_is_the_step_ending_on_or_after() {
        let dates = [d(2000, 1, 31), d(2000, 2, 29), d(2000, 3, 31), d(2000, 4, 30)];
        assert_eq!(timestep(&dates, d(2000, 1, 31)), Some(1));
        assert_eq!(timestep(&dates, d(2000, 3, 15)), Some(3));
        assert_eq!(timestep(&dates, d(2000, 3, 31)), Some(3));
        assert_eq!(timestep(&dates, d(2000, 4, 1)), Some(4));
        assert_eq!(timestep(&dates, d(2000, 1, 30)), None);
        assert_eq!(timestep(&dates, d(2000, 5, 1)), None);
    }
}
