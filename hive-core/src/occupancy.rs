//! Occupancy sets: connectivity (One-Hive Rule) and the slide gate
//!
//! An [`Occupancy`] is a throwaway copy of the set of occupied cells. Every
//! "what if this piece moved" question is answered on a copy, never on the
//! live board.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::Hex;

/// Set of occupied cells (stack height is irrelevant here)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: FxHashSet<Hex>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.cells.contains(&hex)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Hex> + '_ {
        self.cells.iter().copied()
    }

    pub fn insert(&mut self, hex: Hex) -> bool {
        self.cells.insert(hex)
    }

    pub fn remove(&mut self, hex: Hex) -> bool {
        self.cells.remove(&hex)
    }

    /// Copy with `hex` added
    pub fn with(&self, hex: Hex) -> Occupancy {
        let mut next = self.clone();
        next.insert(hex);
        next
    }

    /// Copy with `hex` removed
    pub fn without(&self, hex: Hex) -> Occupancy {
        let mut next = self.clone();
        next.remove(hex);
        next
    }

    /// True if any neighbor of `hex` is occupied
    pub fn touches(&self, hex: Hex) -> bool {
        hex.neighbors().iter().any(|&n| self.contains(n))
    }

    /// True iff all occupied cells form a single connected group.
    /// Empty and single-cell sets are trivially connected.
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.cells.iter().next() else {
            return true;
        };

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(hex) = queue.pop_front() {
            for n in hex.neighbors() {
                if self.contains(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }

        seen.len() == self.cells.len()
    }

    /// Slide gate: a piece can slide between two adjacent cells unless both
    /// cells flanking the shared edge are occupied. Non-adjacent cells never
    /// pass.
    pub fn can_slide(&self, from: Hex, to: Hex) -> bool {
        match from.flanks(to) {
            Some([a, b]) => !(self.contains(a) && self.contains(b)),
            None => false,
        }
    }

    /// Empty cells adjacent to at least one occupied cell
    pub fn perimeter(&self) -> FxHashSet<Hex> {
        self.cells
            .iter()
            .flat_map(|h| h.neighbors())
            .filter(|&n| !self.contains(n))
            .collect()
    }

    /// Mean pixel position of the occupied cells (unit hex size)
    pub fn centroid(&self) -> (f32, f32) {
        if self.cells.is_empty() {
            return (0.0, 0.0);
        }
        let (sx, sy) = self.cells.iter().fold((0.0f32, 0.0f32), |(sx, sy), h| {
            let (x, y) = h.to_pixel(1.0);
            (sx + x, sy + y)
        });
        let n = self.cells.len() as f32;
        (sx / n, sy / n)
    }
}

impl FromIterator<Hex> for Occupancy {
    fn from_iter<I: IntoIterator<Item = Hex>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(cells: &[(i32, i32)]) -> Occupancy {
        cells.iter().map(|&(q, r)| Hex::new(q, r)).collect()
    }

    #[test]
    fn test_trivially_connected() {
        assert!(Occupancy::new().is_connected());
        assert!(occ(&[(4, -7)]).is_connected());
    }

    #[test]
    fn test_connectivity() {
        assert!(occ(&[(0, 0), (1, 0), (2, 0)]).is_connected());
        assert!(!occ(&[(0, 0), (2, 0)]).is_connected());
        // Two clusters joined through a single cell
        let bridge = occ(&[(-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0)]);
        assert!(bridge.is_connected());
        assert!(!bridge.without(Hex::new(0, 0)).is_connected());
    }

    #[test]
    fn test_connectivity_ignores_translation() {
        let shapes: [&[(i32, i32)]; 3] = [
            &[(0, 0), (1, 0), (1, 1), (0, 2)],
            &[(0, 0), (1, -1), (3, -1)],
            &[(0, 0), (0, 1), (0, 2), (-1, 3), (-2, 3)],
        ];
        for shape in shapes {
            let base = occ(shape);
            let moved: Occupancy = base.iter().map(|h| Hex::new(h.q + 7, h.r - 11)).collect();
            assert_eq!(base.is_connected(), moved.is_connected());
        }
    }

    #[test]
    fn test_slide_gate() {
        let from = Hex::new(0, 0);
        let to = Hex::new(1, 0);

        let open = occ(&[(1, -1)]);
        assert!(open.can_slide(from, to));

        let gate = occ(&[(1, -1), (0, 1)]);
        assert!(!gate.can_slide(from, to));

        // The gate only looks at the flanks, not at contact
        let empty = Occupancy::new();
        assert!(empty.can_slide(from, to));

        // Not adjacent
        assert!(!open.can_slide(from, Hex::new(2, 0)));
    }

    #[test]
    fn test_slide_gate_is_symmetric() {
        let board = occ(&[(0, -1), (1, -1), (1, 1), (-1, 1), (2, -1)]);
        let center = Hex::new(0, 0);
        for n in center.neighbors() {
            assert_eq!(board.can_slide(center, n), board.can_slide(n, center));
        }
    }

    #[test]
    fn test_perimeter() {
        let single = occ(&[(0, 0)]);
        let perimeter = single.perimeter();
        assert_eq!(perimeter.len(), 6);
        for n in Hex::ORIGIN.neighbors() {
            assert!(perimeter.contains(&n));
        }

        let pair = occ(&[(0, 0), (1, 0)]);
        assert_eq!(pair.perimeter().len(), 8);
    }
}
