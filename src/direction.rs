use glam::Vec2;
use strum_macros::EnumIter;

/// A cardinal movement direction on the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the canonical (input-priority) order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// The sprite rotation for an entity facing this direction, in degrees.
    pub fn angle(&self) -> f32 {
        match self {
            Direction::Right => 0.0,
            Direction::Down => 90.0,
            Direction::Left => 180.0,
            Direction::Up => 270.0,
        }
    }

    /// Unit offset in screen coordinates (y grows downward).
    pub fn offset(&self) -> Vec2 {
        match self {
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Up => Vec2::new(0.0, -1.0),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The two directions perpendicular to this one.
    ///
    /// The pair order is fixed (horizontal gives [Up, Down], vertical gives
    /// [Left, Right]) so that callers indexing into it stay deterministic.
    pub fn perpendicular(&self) -> [Direction; 2] {
        match self {
            Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
            Direction::Left | Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    /// Index into direction-keyed arrays, matching the order of [`Self::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}
