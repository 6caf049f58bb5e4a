//! Named buttons the agent can press and their browser key codes.
use thiserror::Error;

/// Buttons understood by the game's input controller.
///
/// Names follow the upper-case spelling used in the button combination
/// tables (`"SPACE"`, `"DOWN"`, ...). Parsing is case-insensitive.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Enter,
    /// Confirm / advance dialogue.
    Space,
    /// Cancel / back.
    Backspace,
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Enter,
        Button::Space,
        Button::Backspace,
    ];

    /// Generic acknowledge button used to skip narration phases.
    pub const CONFIRM: Button = Button::Space;

    /// Back button used to close summaries.
    pub const CANCEL: Button = Button::Backspace;

    /// Parses a button name from a combination table.
    pub fn parse(name: &str) -> Result<Self, ButtonError> {
        name.parse().map_err(|_| ButtonError::Unknown {
            name: name.to_owned(),
        })
    }

    /// DOM key code dispatched for keydown/keyup events.
    pub const fn key_code(self) -> u16 {
        match self {
            Button::Up => 38,
            Button::Down => 40,
            Button::Left => 37,
            Button::Right => 39,
            Button::Enter => 13,
            Button::Space => 32,
            Button::Backspace => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ButtonError {
    #[error("unknown button name `{name}`")]
    Unknown { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_spelling() {
        assert_eq!(Button::parse("SPACE").unwrap(), Button::Space);
        assert_eq!(Button::parse("backspace").unwrap(), Button::Backspace);
        assert_eq!(Button::Down.to_string(), "DOWN");
    }

    #[test]
    fn rejects_unknown_names() {
        let err = Button::parse("C").unwrap_err();
        assert_eq!(
            err,
            ButtonError::Unknown {
                name: "C".to_string()
            }
        );
    }

    #[test]
    fn key_codes_match_browser_codes() {
        assert_eq!(Button::Space.key_code(), 32);
        assert_eq!(Button::Enter.key_code(), 13);
        assert_eq!(Button::Left.key_code(), 37);
        assert_eq!(Button::Backspace.key_code(), 8);
    }
}
