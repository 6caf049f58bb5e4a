use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::snapshot::CombatantHp;

/// Chooses the party index to send in after a faint.
///
/// The first `active_slots` players are on the field; the rest are reserves.
/// When any reserve has hp left, one is sampled with probability proportional
/// to its hp ratio, so fainted reserves are never picked. Otherwise
/// `backup_slot` is returned.
pub fn select_switch_target<R: Rng + ?Sized>(
    players: &[CombatantHp],
    active_slots: usize,
    backup_slot: usize,
    rng: &mut R,
) -> usize {
    let reserves = players.get(active_slots..).unwrap_or_default();
    if !reserves.iter().any(|p| p.ratio() > 0.0) {
        return backup_slot;
    }

    match WeightedIndex::new(reserves.iter().map(CombatantHp::ratio)) {
        Ok(dist) => active_slots + dist.sample(rng),
        Err(err) => {
            tracing::warn!(?err, "reserve weights rejected, using backup slot");
            backup_slot
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::snapshot::CombatantId;

    fn party(ratios: &[f32]) -> Vec<CombatantHp> {
        ratios
            .iter()
            .enumerate()
            .map(|(i, r)| CombatantHp::new(CombatantId::new(format!("p{i}")), *r))
            .collect()
    }

    #[test]
    fn falls_back_to_backup_without_living_reserves() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(select_switch_target(&party(&[0.0, 0.5, 0.0, 0.0]), 2, 1, &mut rng), 1);
        assert_eq!(select_switch_target(&party(&[0.0, 0.5]), 2, 1, &mut rng), 1);
        assert_eq!(select_switch_target(&[], 2, 1, &mut rng), 1);
    }

    #[test]
    fn never_selects_fainted_reserves() {
        let players = party(&[0.0, 0.4, 0.0, 0.7, 0.0, 0.1]);
        let mut rng = StdRng::seed_from_u64(42);

        let mut violations = 0;
        for _ in 0..10_000 {
            let index = select_switch_target(&players, 2, 1, &mut rng);
            if players[index].ratio() == 0.0 || index < 2 {
                violations += 1;
            }
        }
        assert_eq!(violations, 0);
    }

    #[test]
    fn weighting_prefers_healthier_reserves() {
        let players = party(&[0.0, 0.0, 0.9, 0.1]);
        let mut rng = StdRng::seed_from_u64(3);

        let healthy = (0..2_000)
            .filter(|_| select_switch_target(&players, 2, 1, &mut rng) == 2)
            .count();
        assert!(healthy > 1_500, "healthy reserve picked {healthy} times");
    }
}
