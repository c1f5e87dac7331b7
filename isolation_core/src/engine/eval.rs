use crate::engine::{Evaluator, Score};
use crate::logic::board::Cell;
use crate::logic::game::{GameState, Player};
use crate::logic::generator::two_hop_mask;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Open-cell percentages that pick the rule used by [`Heuristic::Progression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phases {
    /// At or above this share of open cells the position is an opening.
    pub early_game_percent: u8,
    /// Below this share the position is an endgame.
    pub late_game_percent: u8,
}

impl Default for Phases {
    fn default() -> Self {
        Self {
            early_game_percent: 75,
            late_game_percent: 40,
        }
    }
}

/// The heuristics an agent can be configured with.
///
/// In JSON a heuristic is its name, or `{"progression": {...}}` to give the
/// progression rule its own thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "HeuristicRepr")]
pub enum Heuristic {
    #[default]
    LibertyDifference,
    ExtendedLibertyDifference,
    CenterDistance,
    Progression(Phases),
}

impl Heuristic {
    pub const NAMES: [&'static str; 4] = [
        "liberty_difference",
        "extended_liberty_difference",
        "center_distance",
        "progression",
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::LibertyDifference => Self::NAMES[0],
            Self::ExtendedLibertyDifference => Self::NAMES[1],
            Self::CenterDistance => Self::NAMES[2],
            Self::Progression(_) => Self::NAMES[3],
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "liberty_difference" => Ok(Self::LibertyDifference),
            "extended_liberty_difference" => Ok(Self::ExtendedLibertyDifference),
            "center_distance" => Ok(Self::CenterDistance),
            "progression" => Ok(Self::Progression(Phases::default())),
            other => Err(format!(
                "unknown heuristic `{other}`, expected one of {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeuristicRepr {
    Name(String),
    Progression(ProgressionRepr),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProgressionRepr {
    progression: Phases,
}

impl TryFrom<HeuristicRepr> for Heuristic {
    type Error = String;

    fn try_from(repr: HeuristicRepr) -> Result<Self, Self::Error> {
        match repr {
            HeuristicRepr::Name(name) => name.parse(),
            HeuristicRepr::Progression(ProgressionRepr { progression }) => {
                Ok(Self::Progression(progression))
            }
        }
    }
}

impl Evaluator for Heuristic {
    fn evaluate(&self, state: &GameState, perspective: Player) -> Score {
        match self {
            Self::LibertyDifference => liberty_difference(state, perspective),
            Self::ExtendedLibertyDifference => extended_liberty_difference(state, perspective),
            Self::CenterDistance => center_distance(state, perspective),
            Self::Progression(phases) => progression(state, perspective, *phases),
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn count(mask: u128) -> Score {
    // At most 128 bits are set.
    mask.count_ones() as Score
}

/// Own liberties minus the opponent's.
pub fn liberty_difference(state: &GameState, perspective: Player) -> Score {
    count(state.liberty_mask(perspective)) - count(state.liberty_mask(perspective.opposite()))
}

/// Cells reachable within two moves, own minus the opponent's.
pub fn extended_liberty_difference(state: &GameState, perspective: Player) -> Score {
    let board = state.board();
    let own = two_hop_mask(board, state.location(perspective));
    let opp = two_hop_mask(board, state.location(perspective.opposite()));
    count(own) - count(opp)
}

/// Opponent's distance to the center minus our own, in half-cells; higher is
/// better for `perspective`. An unplaced token counts as centered.
pub fn center_distance(state: &GameState, perspective: Player) -> Score {
    let distance = |cell: Option<Cell>| -> Score {
        cell.map_or(0, |c| {
            Score::try_from(state.board().center_distance2(c)).unwrap_or(Score::MAX)
        })
    };
    distance(state.location(perspective.opposite())) - distance(state.location(perspective))
}

/// Center control while the board is mostly open, plain mobility in the
/// middle game, two-move reach in the endgame.
pub fn progression(state: &GameState, perspective: Player, phases: Phases) -> Score {
    let board = state.board();
    let open_percent = board.open_count() * 100 / board.cell_count().max(1);

    if open_percent >= u32::from(phases.early_game_percent) {
        center_distance(state, perspective)
    } else if open_percent >= u32::from(phases.late_game_percent) {
        liberty_difference(state, perspective)
    } else {
        extended_liberty_difference(state, perspective)
    }
}
