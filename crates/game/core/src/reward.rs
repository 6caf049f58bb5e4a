//! Reward shaping between two decision snapshots.
//!
//! Consumed by the environment adapter, never by the resolver itself.
use crate::snapshot::PhaseSnapshot;

/// Reward tuning knobs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RewardWeights {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    /// Scale applied to hp deltas (ratios become percentages).
    pub hp: f32,
    pub member_died: f32,
    pub wave_done: f32,
    pub tenth_wave_done: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            damage_dealt: 1.0,
            damage_taken: 1.25,
            hp: 100.0,
            member_died: -50.0,
            wave_done: 10.0,
            tenth_wave_done: 20.0,
        }
    }
}

/// Per-component reward, kept apart for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RewardBreakdown {
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub fainted: f32,
    pub wave: f32,
}

impl RewardBreakdown {
    pub fn total(&self) -> f32 {
        self.damage_dealt + self.damage_taken + self.fainted + self.wave
    }
}

impl RewardWeights {
    /// Scores the transition from `prev` to `next`.
    ///
    /// Only combatants present in both snapshots contribute hp deltas. Player
    /// damage is ignored across a tenth-wave transition, where the party is
    /// healed and hp deltas are meaningless.
    pub fn evaluate(&self, prev: &PhaseSnapshot, next: &PhaseSnapshot) -> RewardBreakdown {
        let mut breakdown = RewardBreakdown::default();

        for enemy in &next.hp_ratios.enemies {
            if let Some(before) = prev.hp_ratios.enemy(&enemy.id) {
                breakdown.damage_dealt += (before - enemy.ratio()) * self.hp * self.damage_dealt;
            }
        }

        let wave_changed = next.stage != prev.stage;
        if !wave_changed || next.stage % 10 != 0 {
            for player in &next.hp_ratios.players {
                let Some(before) = prev.hp_ratios.player(&player.id) else {
                    continue;
                };
                let delta = before - player.ratio();
                breakdown.damage_taken -= delta * self.hp * self.damage_taken;
                if player.is_fainted() && delta > 0.0 {
                    breakdown.fainted += self.member_died;
                }
            }
        }

        if next.stage > prev.stage {
            breakdown.wave += if next.stage % 10 == 0 {
                self.tenth_wave_done
            } else {
                self.wave_done
            };
        }

        breakdown
    }
}
