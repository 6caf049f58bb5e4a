use rand::Rng;

use crate::snapshot::LearnMoveContext;

/// Slot index meaning "keep the current moveset, skip the new move".
pub const FORGET_NONE: usize = 4;

/// How the learn-move phase picks the slot to overwrite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MoveForgetStrategy {
    /// Uniform over the four known slots plus [`FORGET_NONE`].
    #[default]
    UniformRandom,
    /// Argmax of [`moveset_value`] over the candidate movesets; falls back
    /// to uniform when the observer supplied no move data.
    MovesetValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Battle-relevant data of one move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveProfile {
    pub damage_type: String,
    pub category: MoveCategory,
    pub power: f32,
    /// Hit chance in `[0, 1]`.
    pub accuracy: f32,
    pub pp: f32,
}

/// Stats of the party member that is learning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearnerProfile {
    pub attack: f32,
    pub special_attack: f32,
    pub types: Vec<String>,
}

/// Everything needed to score the candidate movesets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovesetEvaluation {
    pub learner: LearnerProfile,
    pub current: Vec<MoveProfile>,
    pub candidate: MoveProfile,
}

/// Multipliers of the moveset value formula.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovesetScoring {
    pub stat_multiplier: f32,
    pub pp_multiplier: f32,
    pub same_type_multiplier: f32,
}

impl Default for MovesetScoring {
    fn default() -> Self {
        Self {
            stat_multiplier: 1.0,
            pp_multiplier: 0.5,
            same_type_multiplier: 0.75,
        }
    }
}

/// Scores a moveset for a learner.
///
/// Each move contributes `stat × power × accuracy × pp` (scaled by the
/// multipliers, ×1.5 with same-type bonus); the sum is multiplied by
/// `same_type_multiplier × distinct damage types`.
pub fn moveset_value(learner: &LearnerProfile, moveset: &[MoveProfile], scoring: &MovesetScoring) -> f32 {
    let mut types: Vec<&str> = Vec::new();
    let mut total = 0.0;

    for mv in moveset {
        if !types.contains(&mv.damage_type.as_str()) {
            types.push(&mv.damage_type);
        }
        let stat = match mv.category {
            MoveCategory::Physical => learner.attack,
            MoveCategory::Special | MoveCategory::Status => learner.special_attack,
        };
        let stab = if learner.types.iter().any(|t| t == &mv.damage_type) {
            1.5
        } else {
            1.0
        };
        total += stat
            * scoring.stat_multiplier
            * mv.power
            * mv.accuracy
            * mv.pp
            * scoring.pp_multiplier
            * stab;
    }

    total * scoring.same_type_multiplier * types.len() as f32
}

/// Slot whose replacement by the candidate yields the best moveset, or
/// [`FORGET_NONE`] when keeping the current moves scores highest.
///
/// Slots are scored in order with "keep" last; ties go to the earliest.
pub fn best_forget_slot(evaluation: &MovesetEvaluation, scoring: &MovesetScoring) -> usize {
    let replacements = (0..evaluation.current.len().min(FORGET_NONE)).map(|slot| {
        let mut moveset = evaluation.current.clone();
        moveset[slot] = evaluation.candidate.clone();
        (slot, moveset_value(&evaluation.learner, &moveset, scoring))
    });
    let keep = (
        FORGET_NONE,
        moveset_value(&evaluation.learner, &evaluation.current, scoring),
    );

    let mut best: Option<(usize, f32)> = None;
    for (slot, value) in replacements.chain(std::iter::once(keep)) {
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((slot, value));
        }
    }

    best.map_or(FORGET_NONE, |(slot, _)| slot)
}

/// Picks the slot (0..=[`FORGET_NONE`]) to overwrite with the new move.
pub fn forget_slot<R: Rng + ?Sized>(
    strategy: MoveForgetStrategy,
    context: Option<&LearnMoveContext>,
    rng: &mut R,
) -> usize {
    if strategy == MoveForgetStrategy::MovesetValue {
        match context.and_then(|c| c.evaluation.as_ref()) {
            Some(evaluation) if evaluation.current.len() == FORGET_NONE => {
                return best_forget_slot(evaluation, &MovesetScoring::default());
            }
            _ => tracing::debug!("no moveset data, forgetting uniformly"),
        }
    }

    rng.gen_range(0..=FORGET_NONE)
}
