//! Classification of the phase names reported by the game engine.

/// Phases the resolver treats specially.
///
/// The game reports dozens of phase names; everything without a dedicated
/// handler classifies as [`Phase::Other`] and is acknowledged generically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Title / main menu. Reaching it means the run is over.
    Title,
    /// "Switch before the next battle?" prompt.
    CheckSwitch,
    /// A party member wants to learn a new move.
    LearnMove,
    /// Item / modifier shop after a wave.
    SelectModifier,
    /// Forced switch after a party member fainted.
    Switch,
    /// Egg hatch summary screen.
    EggSummary,
    /// Battle command selection; control returns to the policy here.
    Command,
    /// Anything else (narration, animations, unknown tags).
    Other,
}

impl Phase {
    pub const TITLE: &'static str = "TitlePhase";
    pub const CHECK_SWITCH: &'static str = "CheckSwitchPhase";
    pub const LEARN_MOVE: &'static str = "LearnMovePhase";
    pub const SELECT_MODIFIER: &'static str = "SelectModifierPhase";
    pub const SWITCH: &'static str = "SwitchPhase";
    pub const EGG_SUMMARY: &'static str = "EggSummaryPhase";
    pub const COMMAND: &'static str = "CommandPhase";

    /// Classifies a raw phase name. Never fails.
    pub fn from_name(name: &str) -> Self {
        match name {
            Self::TITLE => Phase::Title,
            Self::CHECK_SWITCH => Phase::CheckSwitch,
            Self::LEARN_MOVE => Phase::LearnMove,
            Self::SELECT_MODIFIER => Phase::SelectModifier,
            Self::SWITCH => Phase::Switch,
            Self::EGG_SUMMARY => Phase::EggSummary,
            Self::COMMAND => Phase::Command,
            _ => Phase::Other,
        }
    }

    /// Canonical phase name, `None` for [`Phase::Other`].
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Phase::Title => Some(Self::TITLE),
            Phase::CheckSwitch => Some(Self::CHECK_SWITCH),
            Phase::LearnMove => Some(Self::LEARN_MOVE),
            Phase::SelectModifier => Some(Self::SELECT_MODIFIER),
            Phase::Switch => Some(Self::SWITCH),
            Phase::EggSummary => Some(Self::EGG_SUMMARY),
            Phase::Command => Some(Self::COMMAND),
            Phase::Other => None,
        }
    }

    /// True for the two phases that end a resolution chain.
    pub const fn is_exit(self) -> bool {
        matches!(self, Phase::Title | Phase::Command)
    }
}
