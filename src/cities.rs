//! City input: a plain-text point list parser and a random generator.
//!
//! The text format holds one city per line as two numbers separated by
//! whitespace and/or a comma. Blank lines and `#` comments are ignored:
//!
//! ```text
//! # x y
//! 0 0
//! 1.5, 2
//! 3 4   # trailing comment
//! ```

use crate::error::{Result, TspError};
use crate::ga::Gene;
use rand::Rng;
use std::collections::HashSet;

/// Parses a city list.
///
/// Duplicates are not rejected here; [`Chromosome::create`] and
/// [`Evolution::new`] do that.
///
/// [`Chromosome::create`]: crate::ga::Chromosome::create
/// [`Evolution::new`]: crate::ga::Evolution::new
///
/// # Errors
/// [`TspError::InvalidInput`] naming the first malformed line (1-based).
pub fn parse_points(text: &str) -> Result<Vec<Gene>> {
    let mut points = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let [x, y] = fields.as_slice() else {
            return Err(TspError::InvalidInput(format!(
                "line {}: expected 2 coordinates, found {}",
                idx + 1,
                fields.len()
            )));
        };

        let coord = |s: &str| -> Result<f64> {
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(TspError::InvalidInput(format!(
                    "line {}: invalid coordinate {s:?}",
                    idx + 1
                ))),
            }
        };

        points.push(Gene::new(coord(*x)?, coord(*y)?));
    }

    Ok(points)
}

/// Generates `n` distinct cities uniformly inside `[0, extent) x [0, extent)`.
///
/// Coordinates are rounded to whole numbers when `extent` allows enough
/// distinct positions, which keeps generated maps readable.
///
/// # Panics
/// Panics if `extent` is not positive.
pub fn random_points<R: Rng>(n: usize, extent: f64, rng: &mut R) -> Vec<Gene> {
    let integral = extent >= 1.0 && extent * extent >= 4.0 * n as f64;
    let mut seen = HashSet::with_capacity(n);
    let mut points = Vec::with_capacity(n);

    while points.len() < n {
        let mut x = rng.random_range(0.0..extent);
        let mut y = rng.random_range(0.0..extent);
        if integral {
            x = x.floor();
            y = y.floor();
        }
        let gene = Gene::new(x, y);
        if seen.insert(gene) {
            points.push(gene);
        }
    }
    points
}
