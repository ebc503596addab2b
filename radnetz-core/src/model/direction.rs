use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// direction index ("ri") of a directed edge. `Forward` (0) follows the
/// source geometry and fills the "hinrichtung" layer, `Reverse` (1) runs
/// against it and fills "gegenrichtung".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    pub fn index(&self) -> u8 {
        match self {
            Direction::Forward => 0,
            Direction::Reverse => 1,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    pub fn layer_name(&self) -> &'static str {
        match self {
            Direction::Forward => "hinrichtung",
            Direction::Reverse => "gegenrichtung",
        }
    }
}

impl From<Direction> for u8 {
    fn from(value: Direction) -> Self {
        value.index()
    }
}

impl TryFrom<u8> for Direction {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::Forward),
            1 => Ok(Direction::Reverse),
            other => Err(format!("invalid direction index '{}'", other)),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}
