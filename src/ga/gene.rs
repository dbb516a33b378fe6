//! City coordinates.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A city: an immutable point in the plane.
///
/// Genes compare and hash by value, so two cities at the same coordinates
/// are the same gene. `-0.0` and `0.0` are treated as equal.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gene {
    x: f64,
    y: f64,
}

impl Gene {
    /// Creates a gene at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to `other`.
    ///
    /// Symmetric: `a.distance(&b) == b.distance(&a)`.
    pub fn distance(&self, other: &Gene) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn key(&self) -> (u64, u64) {
        (normalized_bits(self.x), normalized_bits(self.y))
    }
}

/// Bit pattern with `-0.0` folded onto `0.0`.
fn normalized_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for Gene {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Gene {}

impl Hash for Gene {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<(f64, f64)> for Gene {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
