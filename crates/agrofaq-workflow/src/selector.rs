//! Assignment selector
//!
//! Picks the least-loaded eligible worker of a role, breaking ties uniformly
//! at random so no low-workload user is deterministically starved. The
//! chosen worker's ledger is incremented before the selector returns, so
//! concurrent assignment calls observe the updated load.

use agrofaq_model::{Role, UserId};
use agrofaq_store::{UserDirectory, UserRecord};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;

/// Select and claim a worker for an assignment
///
/// Returns `None` when no eligible candidate remains; the caller must treat
/// that as "no capacity" and escalate or stall the transition, never drop
/// the work item.
pub fn select_worker<R: Rng + ?Sized>(
    directory: &UserDirectory,
    role: Role,
    exclude: &HashSet<UserId>,
    rng: &mut R,
) -> Option<Arc<UserRecord>> {
    let candidates: Vec<Arc<UserRecord>> = directory
        .candidates(role)
        .into_iter()
        .filter(|u| !exclude.contains(&u.id))
        .collect();

    if candidates.is_empty() {
        tracing::debug!(%role, excluded = exclude.len(), "no eligible worker");
        return None;
    }

    let min_workload = candidates.iter().map(|u| u.workload()).min()?;
    let least_loaded: Vec<&Arc<UserRecord>> = candidates
        .iter()
        .filter(|u| u.workload() == min_workload)
        .collect();

    let chosen = Arc::clone(least_loaded.choose(rng)?);
    let new_load = chosen.increment_workload();
    tracing::debug!(
        %role,
        worker = %chosen.id,
        workload = new_load,
        ties = least_loaded.len(),
        "worker selected"
    );
    Some(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn no_exclusions() -> HashSet<UserId> {
        HashSet::new()
    }

    #[test]
    fn picks_the_least_loaded_worker() {
        let dir = UserDirectory::new();
        let busy = dir.add_user("busy", Role::AgriSpecialist);
        let idle = dir.add_user("idle", Role::AgriSpecialist);
        busy.increment_workload();
        busy.increment_workload();

        let mut rng = StdRng::seed_from_u64(7);
        let chosen = select_worker(&dir, Role::AgriSpecialist, &no_exclusions(), &mut rng).unwrap();
        assert_eq!(chosen.id, idle.id);
        assert_eq!(idle.workload(), 1);
    }

    #[test]
    fn ties_are_broken_within_the_minimum_set() {
        let dir = UserDirectory::new();
        let a = dir.add_user("a", Role::AgriSpecialist);
        let b = dir.add_user("b", Role::AgriSpecialist);
        let heavy = dir.add_user("heavy", Role::AgriSpecialist);
        heavy.increment_workload();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let chosen =
                select_worker(&dir, Role::AgriSpecialist, &no_exclusions(), &mut rng).unwrap();
            assert!(chosen.id == a.id || chosen.id == b.id);
            chosen.decrement_workload();
        }
    }

    #[test]
    fn repeated_selection_balances_load() {
        let dir = UserDirectory::new();
        let a = dir.add_user("a", Role::AgriSpecialist);
        let b = dir.add_user("b", Role::AgriSpecialist);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            select_worker(&dir, Role::AgriSpecialist, &no_exclusions(), &mut rng).unwrap();
        }
        assert_eq!(a.workload() + b.workload(), 10);
        assert_eq!(a.workload(), 5);
        assert_eq!(b.workload(), 5);
    }

    #[test]
    fn exclusions_and_roles_are_respected() {
        let dir = UserDirectory::new();
        let only = dir.add_user("only", Role::AgriSpecialist);
        dir.add_user("mod", Role::Moderator);

        let mut exclude = HashSet::new();
        exclude.insert(only.id);

        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_worker(&dir, Role::AgriSpecialist, &exclude, &mut rng).is_none());
        assert!(select_worker(&dir, Role::Admin, &no_exclusions(), &mut rng).is_none());
    }

    #[test]
    fn unavailable_workers_are_skipped() {
        let dir = UserDirectory::new();
        let away = dir.add_user("away", Role::Moderator);
        dir.set_available(away.id, false).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        assert!(select_worker(&dir, Role::Moderator, &no_exclusions(), &mut rng).is_none());
    }
}
