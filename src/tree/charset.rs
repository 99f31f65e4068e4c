use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tree character set '{0}', expected 'basic' or 'box_drawings_light'")]
pub struct ParseCharSetError(String);

/// Characters used to draw tree lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharSet {
    /// Plain ASCII: `|`, `+` and `-`.
    Basic,
    /// Unicode box drawing characters: `│`, `├`, `─` and `└`.
    #[default]
    BoxDrawingsLight,
}

impl CharSet {
    fn chars(self) -> (char, char, char, char) {
        match self {
            CharSet::Basic => ('|', '+', '-', '+'),
            CharSet::BoxDrawingsLight => ('\u{2502}', '\u{251c}', '\u{2500}', '\u{2514}'),
        }
    }

    pub fn vertical(self) -> char {
        self.chars().0
    }

    pub fn intersection(self) -> char {
        self.chars().1
    }

    pub fn horizontal(self) -> char {
        self.chars().2
    }

    pub fn angle(self) -> char {
        self.chars().3
    }

    /// Connector of a node that has further siblings: `├── `.
    pub fn inter(self) -> String {
        format!("{0}{1}{1} ", self.intersection(), self.horizontal())
    }

    /// Connector of the last child of a node: `└── `.
    pub fn last(self) -> String {
        format!("{0}{1}{1} ", self.angle(), self.horizontal())
    }

    /// Filler extending a right-aligned node by one level: `────`.
    pub fn fill(self) -> String {
        self.horizontal().to_string().repeat(4)
    }

    /// Continuation below an ancestor that has further siblings: `│   `.
    pub fn vert(self) -> String {
        format!("{}   ", self.vertical())
    }

    /// Continuation below an ancestor that was the last child.
    pub fn empty(self) -> String {
        " ".repeat(4)
    }
}

impl fmt::Display for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharSet::Basic => write!(f, "basic"),
            CharSet::BoxDrawingsLight => write!(f, "box_drawings_light"),
        }
    }
}

impl FromStr for CharSet {
    type Err = ParseCharSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" | "ascii" => Ok(CharSet::Basic),
            "box_drawings_light" | "box" => Ok(CharSet::BoxDrawingsLight),
            _ => Err(ParseCharSetError(s.to_string())),
        }
    }
}
