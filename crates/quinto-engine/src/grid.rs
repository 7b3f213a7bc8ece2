//! Bingo grids and the line-counting win predicate.
//!
//! A grid is a 5x5 arrangement of the numbers 1..=25, one of each, stored
//! row-major. Win checking never looks at who marked what: it only asks
//! which of the grid's twelve lines (five rows, five columns, two
//! diagonals) are fully contained in the set of called numbers. That makes
//! the predicate monotone in the called set, which the turn engine relies
//! on: once a line is complete it stays complete.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::EngineError;

/// Cells per side of a grid.
pub const SIDE: usize = 5;

/// Total cells in a grid.
pub const CELL_COUNT: usize = SIDE * SIDE;

/// Completed lines required to win.
pub const LINES_TO_WIN: u32 = 5;

/// Cell indices of the twelve completable lines, row-major.
const LINES: [[usize; SIDE]; 12] = [
    // rows
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [15, 16, 17, 18, 19],
    [20, 21, 22, 23, 24],
    // columns
    [0, 5, 10, 15, 20],
    [1, 6, 11, 16, 21],
    [2, 7, 12, 17, 22],
    [3, 8, 13, 18, 23],
    [4, 9, 14, 19, 24],
    // diagonals
    [0, 6, 12, 18, 24],
    [4, 8, 12, 16, 20],
];

// ---------------------------------------------------------------------------
// NumberSet
// ---------------------------------------------------------------------------

/// A set of numbers drawn from 1..=25, packed into a bitmask.
///
/// This is the "called numbers" type: small enough to copy freely and
/// cheap to probe from inside the line scan. Numbers outside 1..=25 are
/// never members and cannot be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberSet(u32);

impl NumberSet {
    pub const fn new() -> Self {
        Self(0)
    }

    fn bit(number: u8) -> Option<u32> {
        (1..=CELL_COUNT as u8)
            .contains(&number)
            .then(|| 1 << (number - 1))
    }

    pub fn contains(&self, number: u8) -> bool {
        Self::bit(number).is_some_and(|b| self.0 & b != 0)
    }

    /// Inserts a number. Returns `false` if it was already present or is
    /// outside 1..=25, leaving the set unchanged.
    pub fn insert(&mut self, number: u8) -> bool {
        match Self::bit(number) {
            Some(b) if self.0 & b == 0 => {
                self.0 |= b;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=CELL_COUNT as u8).filter(|&n| self.contains(n))
    }
}

impl FromIterator<u8> for NumberSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::new();
        for n in iter {
            set.insert(n);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// One player's private 5x5 grid: a permutation of 1..=25, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid([u8; CELL_COUNT]);

impl Grid {
    /// A freshly shuffled grid (Fisher-Yates over 1..=25).
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut cells: [u8; CELL_COUNT] =
            std::array::from_fn(|i| (i + 1) as u8);
        cells.shuffle(rng);
        Self(cells)
    }

    /// Builds a grid from explicit cells, verifying it is a permutation.
    ///
    /// # Errors
    /// Returns [`EngineError::CellOutOfRange`] or
    /// [`EngineError::DuplicateCell`] when the cells are not exactly the
    /// numbers 1..=25.
    pub fn from_cells(cells: [u8; CELL_COUNT]) -> Result<Self, EngineError> {
        let mut seen = NumberSet::new();
        for &n in &cells {
            if NumberSet::bit(n).is_none() {
                return Err(EngineError::CellOutOfRange(n));
            }
            if !seen.insert(n) {
                return Err(EngineError::DuplicateCell(n));
            }
        }
        Ok(Self(cells))
    }

    pub fn cells(&self) -> &[u8; CELL_COUNT] {
        &self.0
    }

    /// How many of the twelve lines are fully covered by `called`.
    pub fn completed_lines(&self, called: &NumberSet) -> u32 {
        LINES
            .iter()
            .filter(|line| line.iter().all(|&i| called.contains(self.0[i])))
            .count() as u32
    }

    /// Whether `called` completes at least [`LINES_TO_WIN`] lines.
    pub fn has_bingo(&self, called: &NumberSet) -> bool {
        self.completed_lines(called) >= LINES_TO_WIN
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The grid holding 1..=25 in reading order. Cell (r, c) = r*5 + c + 1,
    /// which makes line membership easy to reason about by hand.
    fn identity_grid() -> Grid {
        Grid::from_cells(std::array::from_fn(|i| (i + 1) as u8)).unwrap()
    }

    // =====================================================================
    // NumberSet
    // =====================================================================

    #[test]
    fn test_number_set_insert_and_contains() {
        let mut set = NumberSet::new();
        assert!(set.is_empty());
        assert!(set.insert(7));
        assert!(set.contains(7));
        assert!(!set.contains(8));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_number_set_rejects_duplicates() {
        let mut set = NumberSet::new();
        assert!(set.insert(25));
        assert!(!set.insert(25));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_number_set_rejects_out_of_range() {
        let mut set = NumberSet::new();
        assert!(!set.insert(0));
        assert!(!set.insert(26));
        assert!(set.is_empty());
        assert!(!set.contains(0));
        assert!(!set.contains(200));
    }

    #[test]
    fn test_number_set_iter_is_ascending() {
        let set: NumberSet = [9, 1, 25, 3].into_iter().collect();
        let members: Vec<u8> = set.iter().collect();
        assert_eq!(members, vec![1, 3, 9, 25]);
    }

    // =====================================================================
    // Grid construction
    // =====================================================================

    #[test]
    fn test_shuffled_grid_is_a_permutation() {
        let mut rng = rand::rng();
        let grid = Grid::shuffled(&mut rng);
        let seen: NumberSet = grid.cells().iter().copied().collect();
        assert_eq!(seen.len(), CELL_COUNT as u32);
    }

    #[test]
    fn test_from_cells_rejects_duplicates() {
        let mut cells: [u8; CELL_COUNT] =
            std::array::from_fn(|i| (i + 1) as u8);
        cells[24] = 1;
        assert!(matches!(
            Grid::from_cells(cells),
            Err(EngineError::DuplicateCell(1))
        ));
    }

    #[test]
    fn test_from_cells_rejects_out_of_range() {
        let mut cells: [u8; CELL_COUNT] =
            std::array::from_fn(|i| (i + 1) as u8);
        cells[0] = 26;
        assert!(matches!(
            Grid::from_cells(cells),
            Err(EngineError::CellOutOfRange(26))
        ));
    }

    // =====================================================================
    // Line counting
    // =====================================================================

    #[test]
    fn test_no_lines_with_empty_called_set() {
        let grid = identity_grid();
        assert_eq!(grid.completed_lines(&NumberSet::new()), 0);
        assert!(!grid.has_bingo(&NumberSet::new()));
    }

    #[test]
    fn test_partial_line_does_not_count() {
        let grid = identity_grid();
        // Four of the five cells of row 0.
        let called: NumberSet = [1, 2, 3, 4].into_iter().collect();
        assert_eq!(grid.completed_lines(&called), 0);
    }

    #[test]
    fn test_row_and_column_counted_together() {
        // Row 0 holds 1..=5; column 0 holds 1, 6, 11, 16, 21. The shared
        // corner cell belongs to both lines.
        let grid = identity_grid();
        let called: NumberSet =
            [1, 2, 3, 4, 5, 6, 11, 16, 21].into_iter().collect();
        assert_eq!(grid.completed_lines(&called), 2);
        assert!(!grid.has_bingo(&called));
    }

    #[test]
    fn test_main_diagonal_counted() {
        let grid = identity_grid();
        let called: NumberSet = [1, 7, 13, 19, 25].into_iter().collect();
        assert_eq!(grid.completed_lines(&called), 1);
    }

    #[test]
    fn test_anti_diagonal_counted() {
        let grid = identity_grid();
        let called: NumberSet = [5, 9, 13, 17, 21].into_iter().collect();
        assert_eq!(grid.completed_lines(&called), 1);
    }

    #[test]
    fn test_bingo_requires_five_lines() {
        let grid = identity_grid();

        // Rows 0..=3 complete, nothing else: 21 is needed for column 0 and
        // the anti-diagonal, 25 for column 4 and the main diagonal.
        let four_lines: NumberSet = (1..=20).collect();
        assert_eq!(grid.completed_lines(&four_lines), 4);
        assert!(!grid.has_bingo(&four_lines));

        // Adding 21 completes column 0 and the anti-diagonal at once.
        let six_lines: NumberSet = (1..=21).collect();
        assert_eq!(grid.completed_lines(&six_lines), 6);
        assert!(grid.has_bingo(&six_lines));
    }

    #[test]
    fn test_full_called_set_completes_all_twelve_lines() {
        let mut rng = rand::rng();
        let grid = Grid::shuffled(&mut rng);
        let all: NumberSet = (1..=25).collect();
        assert_eq!(grid.completed_lines(&all), 12);
        assert!(grid.has_bingo(&all));
    }

    #[test]
    fn test_completed_lines_is_monotone_in_called_set() {
        // Growing the called set never un-completes a line. Checked by
        // inserting every number in a shuffled order and watching the
        // count along the way.
        let mut rng = rand::rng();
        let grid = Grid::shuffled(&mut rng);

        let mut order: Vec<u8> = (1..=25).collect();
        order.shuffle(&mut rng);

        let mut called = NumberSet::new();
        let mut previous = 0;
        for n in order {
            called.insert(n);
            let lines = grid.completed_lines(&called);
            assert!(
                lines >= previous,
                "line count dropped from {previous} to {lines} after {n}"
            );
            previous = lines;
        }
        assert_eq!(previous, 12);
    }
}
