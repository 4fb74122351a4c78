use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which kind of game a session hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    HumanVsHuman,
    HumanVsComputer,
}

/// Who is allowed to move next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPolicy {
    /// Seats take strict turns, first seat opens.
    Alternate,
    /// The single human seat always acts; the reply is automatic.
    HumanAlwaysFirst,
}

/// Where moves come from after a human move is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    HumanOnly,
    HumanThenComputer,
}

/// Everything that differs between the two modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRules {
    pub required_players: usize,
    pub turn_policy: TurnPolicy,
    pub move_source: MoveSource,
}

impl GameMode {
    pub fn rules(self) -> ModeRules {
        match self {
            GameMode::HumanVsHuman => ModeRules {
                required_players: 2,
                turn_policy: TurnPolicy::Alternate,
                move_source: MoveSource::HumanOnly,
            },
            GameMode::HumanVsComputer => ModeRules {
                required_players: 1,
                turn_policy: TurnPolicy::HumanAlwaysFirst,
                move_source: MoveSource::HumanThenComputer,
            },
        }
    }

    /// Get mode name for display
    pub fn name(self) -> &'static str {
        match self {
            GameMode::HumanVsHuman => "Human vs Human",
            GameMode::HumanVsComputer => "Human vs Computer",
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hvh" | "human-vs-human" => Ok(GameMode::HumanVsHuman),
            "hvc" | "human-vs-computer" => Ok(GameMode::HumanVsComputer),
            other => Err(format!(
                "unknown mode '{other}' (expected 'hvh' or 'hvc')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_per_mode() {
        let hvh = GameMode::HumanVsHuman.rules();
        assert_eq!(hvh.required_players, 2);
        assert_eq!(hvh.turn_policy, TurnPolicy::Alternate);
        assert_eq!(hvh.move_source, MoveSource::HumanOnly);

        let hvc = GameMode::HumanVsComputer.rules();
        assert_eq!(hvc.required_players, 1);
        assert_eq!(hvc.turn_policy, TurnPolicy::HumanAlwaysFirst);
        assert_eq!(hvc.move_source, MoveSource::HumanThenComputer);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("hvh".parse::<GameMode>(), Ok(GameMode::HumanVsHuman));
        assert_eq!("HVC".parse::<GameMode>(), Ok(GameMode::HumanVsComputer));
        assert_eq!(
            "human-vs-computer".parse::<GameMode>(),
            Ok(GameMode::HumanVsComputer)
        );
        assert!("solo".parse::<GameMode>().is_err());
    }
}
