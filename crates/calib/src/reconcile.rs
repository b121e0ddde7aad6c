use std::collections::BTreeSet;

/// Split two site collections into the names only one side knows about.
///
/// Set semantics: duplicates on either side do not matter and comparison is
/// plain equality. Both lists come back sorted.
pub fn reconcile<T>(sim_sites: &[T], obs_sites: &[T]) -> (Vec<T>, Vec<T>)
where
    T: Ord + Clone,
{
    let sim: BTreeSet<&T> = sim_sites.iter().collect();
    let obs: BTreeSet<&T> = obs_sites.iter().collect();

    let sim_only = sim.difference(&obs).map(|s| (*s).clone()).collect();
    let obs_only = obs.difference(&sim).map(|s| (*s).clone()).collect();
    (sim_only, obs_only)
}
