use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sequential internal contig id in `[0, node_count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContigId(pub usize);

impl ContigId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ContigId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zero-based index of a bin in a [`BinAssignment`](crate::core::bins::BinAssignment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BinId(pub usize);

impl BinId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assembler that produced the graph and path files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Assembler {
    /// SPAdes / metaSPAdes: GFA over segments plus a `contigs.paths` file
    Spades,
    /// MEGAHIT: GFA whose segments are the contigs themselves
    Megahit,
}

impl std::fmt::Display for Assembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spades => write!(f, "SPAdes"),
            Self::Megahit => write!(f, "MEGAHIT"),
        }
    }
}

/// Strand of a segment within a path or link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// Parse a single `+` / `-` sign
    #[must_use]
    pub fn from_sign(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Forward),
            '-' => Some(Self::Reverse),
            _ => None,
        }
    }

    #[must_use]
    pub fn sign(self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

/// An assembler segment name with a trailing orientation sign, e.g. `12+`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrientedSegment {
    pub name: String,
    pub orientation: Orientation,
}

impl OrientedSegment {
    pub fn new(name: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            name: name.into(),
            orientation,
        }
    }

    /// The same segment read on the opposite strand
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            name: self.name.clone(),
            orientation: self.orientation.flipped(),
        }
    }
}

impl std::fmt::Display for OrientedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.orientation.sign())
    }
}

/// Error returned when a segment token has no valid trailing sign
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid oriented segment '{0}': expected <name>+ or <name>-")]
pub struct InvalidSegmentToken(pub String);

impl FromStr for OrientedSegment {
    type Err = InvalidSegmentToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut chars = token.chars();
        let orientation = chars
            .next_back()
            .and_then(Orientation::from_sign)
            .ok_or_else(|| InvalidSegmentToken(token.to_string()))?;
        let name = chars.as_str();
        if name.is_empty() {
            return Err(InvalidSegmentToken(token.to_string()));
        }
        Ok(Self::new(name, orientation))
    }
}
