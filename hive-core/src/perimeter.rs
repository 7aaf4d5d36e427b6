//! Perimeter rings and the Spider's three-step walk
//!
//! A ring is the cyclic sequence of empty cells met while following the edge
//! of the hive with the hive kept on one side. Consecutive ring cells are
//! always adjacent. A cell that touches the hive in several separate places
//! appears once per contact, and every enclosed hole gets its own ring.
//!
//! Walking a ring forwards or backwards is walking around the hive in one
//! rotational sense, which is exactly the freedom a Spider has.

use rustc_hash::FxHashSet;

use crate::board::Hex;
use crate::occupancy::Occupancy;

/// Number of steps a Spider takes
pub const SPIDER_STEPS: usize = 3;

/// A cyclic sequence of perimeter cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ring {
    cells: Vec<Hex>,
}

impl Ring {
    pub fn cells(&self) -> &[Hex] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell `offset` steps away from position `index`, wrapping around
    pub fn step(&self, index: usize, offset: isize) -> Hex {
        let n = self.cells.len() as isize;
        self.cells[(index as isize + offset).rem_euclid(n) as usize]
    }

    /// Every position at which `hex` appears
    pub fn positions(&self, hex: Hex) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == hex)
            .map(|(i, _)| i)
    }
}

/// Trace every perimeter ring of `occupancy`.
///
/// Perimeter cells are visited in angular order around the hive centroid, so
/// each ring starts at its lowest-angle cell and the output is deterministic.
pub fn rings(occupancy: &Occupancy) -> Vec<Ring> {
    let mut rings = Vec::new();
    let mut traced: FxHashSet<(Hex, usize)> = FxHashSet::default();

    for cell in angular_order(occupancy) {
        for held in 0..6 {
            if occupancy.contains(cell.neighbor(held)) && !traced.contains(&(cell, held)) {
                rings.push(trace(occupancy, cell, held, &mut traced));
            }
        }
    }

    rings
}

/// Perimeter cells sorted by angle around the centroid
fn angular_order(occupancy: &Occupancy) -> Vec<Hex> {
    let (cx, cy) = occupancy.centroid();
    let angle = |h: &Hex| {
        let (x, y) = h.to_pixel(1.0);
        (y - cy).atan2(x - cx)
    };

    let mut cells: Vec<Hex> = occupancy.perimeter().into_iter().collect();
    cells.sort_by(|a, b| {
        angle(a)
            .total_cmp(&angle(b))
            .then_with(|| a.cmp(b))
    });
    cells
}

/// Follow the hive edge from `start`, holding the occupied neighbor in
/// direction `held`, until the walk returns to its starting state.
///
/// Each step either pivots (the next cell around is occupied, so hold it
/// instead) or moves into the next cell around, which keeps holding the same
/// occupied cell. A gated edge counts as a wall: the walk pivots past it onto
/// the occupied flank beyond, so a ring never enters a cell it could not
/// slide into. Walls are the same from both sides, so the state update is a
/// permutation of boundary edges and the walk always closes.
fn trace(
    occupancy: &Occupancy,
    start: Hex,
    start_held: usize,
    traced: &mut FxHashSet<(Hex, usize)>,
) -> Ring {
    let mut cells = vec![start];
    let (mut cell, mut held) = (start, start_held);
    let limit = 6 * (occupancy.perimeter().len() + 1);

    for _ in 0..limit {
        traced.insert((cell, held));
        let turn = (held + 1) % 6;
        let next = cell.neighbor(turn);
        if occupancy.contains(next) {
            held = turn;
        } else if !occupancy.can_slide(cell, next) {
            held = (held + 2) % 6;
        } else {
            cell = next;
            held = (held + 5) % 6;
            cells.push(cell);
        }
        if (cell, held) == (start, start_held) {
            break;
        }
    }

    // The closing move lands back on the start cell
    if cells.len() > 1 && cells.last() == cells.first() {
        cells.pop();
    }

    Ring { cells }
}

/// Every valid Spider walk from `origin` over `occupancy` (the hive with the
/// Spider already lifted). Each walk is `[origin, step1, step2, destination]`.
///
/// A walk is valid when its four cells are distinct, every step passes the
/// slide gate, every cell touches the hive, and the hive stays connected
/// with the Spider at the destination.
pub fn spider_paths(occupancy: &Occupancy, origin: Hex) -> Vec<[Hex; SPIDER_STEPS + 1]> {
    let mut paths = Vec::new();
    if occupancy.is_empty() {
        return paths;
    }

    for ring in rings(occupancy) {
        for index in ring.positions(origin) {
            for sense in [1isize, -1] {
                let path: [Hex; SPIDER_STEPS + 1] =
                    std::array::from_fn(|step| ring.step(index, sense * step as isize));
                if is_valid_walk(occupancy, &path) && !paths.contains(&path) {
                    paths.push(path);
                }
            }
        }
    }

    paths
}

/// Check a walk step by step against the gate, contact and no-revisit rules
pub fn is_valid_walk(occupancy: &Occupancy, path: &[Hex]) -> bool {
    let distinct: FxHashSet<Hex> = path.iter().copied().collect();
    if distinct.len() != path.len() {
        return false;
    }

    let steps_ok = path.windows(2).all(|pair| {
        let (from, to) = (pair[0], pair[1]);
        !occupancy.contains(to) && occupancy.can_slide(from, to) && occupancy.touches(to)
    });

    match path.last() {
        Some(&dest) => steps_ok && occupancy.with(dest).is_connected(),
        None => false,
    }
}
