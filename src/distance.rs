use crate::error::{PathError, Result};
use fxhash::FxHashMap;

/// A point in the plane of the road network.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Position {
        Position { x, y }
    }
    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
    pub fn manhattan_distance(&self, other: &Position) -> f64 {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }
}

/// Maps node ids to positions. Only nodes with valid coordinates have an entry.
#[derive(Clone, Debug, Default)]
pub struct PositionLookup {
    positions: FxHashMap<String, Position>,
}

impl PositionLookup {
    pub fn new() -> PositionLookup {
        PositionLookup::default()
    }
    pub fn insert(&mut self, id: impl Into<String>, position: Position) -> Option<Position> {
        self.positions.insert(id.into(), position)
    }
    /// Retrieves the position of a node, failing with [PathError::MissingPosition] if it has none.
    pub fn get(&self, id: &str) -> Result<Position> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| PathError::MissingPosition(id.to_owned()))
    }
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }
    pub fn len(&self) -> usize {
        self.positions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Position)> {
        self.positions.iter().map(|(id, p)| (id.as_str(), p))
    }
    /// Lower-left and upper-right corner of the bounding box of all positions.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut values = self.positions.values();
        let first = *values.next()?;
        Some(values.fold((first, first), |(min, max), p| {
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

impl<S: Into<String>> FromIterator<(S, Position)> for PositionLookup {
    fn from_iter<T: IntoIterator<Item = (S, Position)>>(iter: T) -> Self {
        PositionLookup {
            positions: iter.into_iter().map(|(id, p)| (id.into(), p)).collect(),
        }
    }
}

/// Signature shared by the distance functions so they can be bound into a heuristic.
pub type DistanceFn = fn(&str, &str, &PositionLookup) -> Result<f64>;

/// Straight-line distance between two nodes.
pub fn euclidean_distance(u: &str, v: &str, positions: &PositionLookup) -> Result<f64> {
    Ok(positions.get(u)?.euclidean_distance(&positions.get(v)?))
}

/// Grid distance between two nodes. Only admissible when no edge is cheaper than the grid
/// distance between its endpoints.
pub fn manhattan_distance(u: &str, v: &str, positions: &PositionLookup) -> Result<f64> {
    Ok(positions.get(u)?.manhattan_distance(&positions.get(v)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> PositionLookup {
        [
            ("a", Position::new(0.0, 0.0)),
            ("b", Position::new(3.0, 4.0)),
            ("c", Position::new(-2.0, 1.5)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn three_four_five() {
        let positions = lookup();
        assert_eq!(euclidean_distance("a", "b", &positions).unwrap(), 5.0);
        assert_eq!(manhattan_distance("a", "b", &positions).unwrap(), 7.0);
    }

    #[test]
    fn distances_are_symmetric() {
        let positions = lookup();
        for f in [euclidean_distance as DistanceFn, manhattan_distance] {
            assert_eq!(f("b", "c", &positions), f("c", "b", &positions));
            assert_eq!(f("c", "c", &positions).unwrap(), 0.0);
        }
    }

    #[test]
    fn missing_position() {
        let positions = lookup();
        assert_eq!(
            euclidean_distance("a", "z", &positions),
            Err(PathError::MissingPosition("z".to_owned()))
        );
        assert_eq!(
            manhattan_distance("z", "a", &positions),
            Err(PathError::MissingPosition("z".to_owned()))
        );
    }

    #[test]
    fn bounding_box() {
        let (min, max) = lookup().bounds().unwrap();
        assert_eq!(min, Position::new(-2.0, 0.0));
        assert_eq!(max, Position::new(3.0, 4.0));
        assert!(PositionLookup::new().bounds().is_none());
    }
}
