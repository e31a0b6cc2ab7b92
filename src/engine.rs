use rand::Rng;
use std::fmt;

/// A direction to move/merge tiles.
///
/// Declaration order is the fixed evaluation order used by the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in evaluation order: `[Up, Right, Down, Left]`.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Position of this direction in [`Direction::ALL`].
    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// The direction obtained by rotating this one a quarter turn clockwise.
    #[inline]
    pub fn clockwise(self) -> Direction { Direction::ALL[(self.index() + 1) % 4] }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "Up",
            Direction::Right => "Right",
            Direction::Down => "Down",
            Direction::Left => "Left",
        };
        f.write_str(name)
    }
}

pub const GRID_SIZE: usize = 4;
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

type Cells = [Tile; CELL_COUNT];
type Tile = u32;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid needs exactly 16 values, got {len}")]
    Length { len: usize },
}

/// A 4x4 2048 grid of tile values, row-major, `0` for an empty cell.
///
/// `Grid` is a plain value: copies never share state, so a search can
/// clone freely and mutate its own copy.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid(Cells);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([0; CELL_COUNT]);

    /// Create an empty grid.
    #[inline]
    pub fn new() -> Self { Self::EMPTY }

    /// Build a grid from 16 row-major values.
    ///
    /// ```
    /// use rollout_2048::engine::{Grid, GridError};
    /// let g = Grid::from_flat_sequence(&[2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4]).unwrap();
    /// assert_eq!(g.get(3, 3), 4);
    /// assert_eq!(Grid::from_flat_sequence(&[2, 4]), Err(GridError::Length { len: 2 }));
    /// ```
    pub fn from_flat_sequence(values: &[Tile]) -> Result<Self, GridError> {
        let cells: Cells = values.try_into().map_err(|_| GridError::Length { len: values.len() })?;
        Ok(Grid(cells))
    }

    /// Row-major copy of the cell values (y outer, x inner).
    #[inline]
    pub fn to_flat_sequence(&self) -> [Tile; CELL_COUNT] { self.0 }

    /// Value at column `x`, row `y`. Both must be below 4.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Tile {
        assert!(x < GRID_SIZE && y < GRID_SIZE, "cell ({x}, {y}) is outside the 4x4 grid");
        self.0[y * GRID_SIZE + x]
    }

    /// Overwrite the value at column `x`, row `y`. Both must be below 4.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: Tile) {
        assert!(x < GRID_SIZE && y < GRID_SIZE, "cell ({x}, {y}) is outside the 4x4 grid");
        self.0[y * GRID_SIZE + x] = value;
    }

    /// Slide and merge tiles toward `dir` in place.
    ///
    /// Returns `false` when the move is illegal, i.e. nothing changed; the
    /// grid is then left untouched.
    ///
    /// ```
    /// use rollout_2048::engine::{Direction, Grid};
    /// let mut g = Grid::from([2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// assert!(g.apply_move(Direction::Left));
    /// assert_eq!(&g.to_flat_sequence()[..4], &[4, 4, 0, 0]);
    /// assert!(!g.apply_move(Direction::Up));
    /// ```
    pub fn apply_move(&mut self, dir: Direction) -> bool {
        let mut changed = false;
        for line in 0..GRID_SIZE {
            changed |= slide_line(&mut self.0, line_indices(dir, line));
        }
        changed
    }

    /// Return the grid resulting from moving toward `dir` (no random insert).
    #[inline]
    pub fn shift(mut self, dir: Direction) -> Self {
        self.apply_move(dir);
        self
    }

    /// Put a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns `false` without touching the grid when no cell is empty.
    ///
    /// ```
    /// use rollout_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut g = Grid::EMPTY;
    /// assert!(g.spawn_random_tile(&mut rng));
    /// assert_eq!(g.count_empty(), 15);
    /// ```
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut empty = [0usize; CELL_COUNT];
        let mut n = 0;
        for (idx, &val) in self.0.iter().enumerate() {
            if val == 0 {
                empty[n] = idx;
                n += 1;
            }
        }
        if n == 0 {
            return false;
        }
        let tile = generate_random_tile(rng);
        self.0[empty[rng.gen_range(0..n)]] = tile;
        true
    }

    /// Value-style variant of [`Grid::spawn_random_tile`].
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.spawn_random_tile(rng);
        self
    }

    /// Count the number of empty cells.
    #[inline]
    pub fn count_empty(&self) -> usize { self.0.iter().filter(|&&v| v == 0).count() }

    /// Highest tile value on the grid, 0 for an empty grid.
    #[inline]
    pub fn highest_tile(&self) -> Tile { self.0.iter().copied().max().unwrap_or(0) }

    /// Directions that would change the grid, in [`Direction::ALL`] order.
    pub fn legal_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |&dir| self.shift(dir) != *self)
    }

    /// Return true if no legal moves remain.
    ///
    /// ```
    /// use rollout_2048::engine::Grid;
    /// // Nothing slides on an empty grid.
    /// assert!(Grid::EMPTY.is_game_over());
    /// ```
    #[inline]
    pub fn is_game_over(&self) -> bool { is_game_over(self) }

    /// Rotate the whole grid a quarter turn clockwise.
    ///
    /// Moving the rotated grid toward `dir.clockwise()` matches moving the
    /// original toward `dir` and rotating the result.
    pub fn rotate_clockwise(&self) -> Self {
        let mut out = Grid::EMPTY;
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                out.set(GRID_SIZE - 1 - y, x, self.get(x, y));
            }
        }
        out
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

/// Rows on separate lines, values separated by `", "`, each column
/// right-aligned to its widest value.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths = [0usize; GRID_SIZE];
        for (x, width) in widths.iter_mut().enumerate() {
            *width = (0..GRID_SIZE).map(|y| self.get(x, y).to_string().len()).max().unwrap_or(1);
        }
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                write!(f, "{:>width$}", self.get(x, y), width = widths[x])?;
                if x != GRID_SIZE - 1 {
                    f.write_str(", ")?;
                }
            }
            if y != GRID_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl From<Cells> for Grid { fn from(cells: Cells) -> Self { Grid(cells) } }

impl TryFrom<&[Tile]> for Grid {
    type Error = GridError;
    fn try_from(values: &[Tile]) -> Result<Self, Self::Error> { Grid::from_flat_sequence(values) }
}

/// True if no move in any direction changes the grid.
pub fn is_game_over(grid: &Grid) -> bool {
    grid.legal_moves().next().is_none()
}

/// Cell indices of line `line`, ordered from the edge tiles compress toward.
#[inline]
fn line_indices(dir: Direction, line: usize) -> [usize; GRID_SIZE] {
    let mut idx = [0usize; GRID_SIZE];
    for (step, slot) in idx.iter_mut().enumerate() {
        let far = GRID_SIZE - 1 - step;
        *slot = match dir {
            Direction::Left => line * GRID_SIZE + step,
            Direction::Right => line * GRID_SIZE + far,
            Direction::Up => step * GRID_SIZE + line,
            Direction::Down => far * GRID_SIZE + line,
        };
    }
    idx
}

// One placed value merges at most once: `2,2,2,2` becomes `4,4,0,0`.
fn slide_line(cells: &mut Cells, idx: [usize; GRID_SIZE]) -> bool {
    let mut changed = false;
    let mut placed: Option<usize> = None;
    let mut merged = false;
    for pos in 0..GRID_SIZE {
        let val = cells[idx[pos]];
        if val == 0 {
            continue;
        }
        if let Some(target) = placed {
            if !merged && cells[idx[target]] == val {
                cells[idx[target]] = val * 2;
                cells[idx[pos]] = 0;
                merged = true;
                changed = true;
                continue;
            }
        }
        let target = placed.map_or(0, |p| p + 1);
        placed = Some(target);
        merged = false;
        if target != pos {
            cells[idx[target]] = val;
            cells[idx[pos]] = 0;
            changed = true;
        }
    }
    changed
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile { if rng.gen_range(0..10) < 9 { 2 } else { 4 } }
