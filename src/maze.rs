//! Board parsing: turns the literal string grid into wall segments, pellet
//! positions and spawn points.
//!
//! Horizontal runs of `#` are merged into single wall segments so the
//! physics world carries one box per run instead of one per cell. The
//! resulting coordinates are in pixels.

use glam::Vec2;

use crate::constants::CELL_SIZE;
use crate::ecs::PelletKind;
use crate::error::ParseError;

/// An axis-aligned wall: center plus half-extents, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub center: Vec2,
    pub half: Vec2,
}

impl WallSegment {
    /// Full extents of the segment.
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PelletSpawn {
    pub position: Vec2,
    pub kind: PelletKind,
}

/// Everything the entity factories need to build the maze.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeLayout {
    pub walls: Vec<WallSegment>,
    pub pellets: Vec<PelletSpawn>,
    pub player_spawn: Vec2,
    /// Ghost spawn points, ordered by their `1`-`4` board markers.
    pub ghost_spawns: [Vec2; 4],
    /// Where eaten ghosts respawn: the centroid of the ghost spawn cells.
    pub ghost_house: Vec2,
}

fn cell_center(col: usize, row: usize) -> Vec2 {
    Vec2::new(
        col as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        row as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    )
}

impl MazeLayout {
    /// Parses a board. Rows must all share the first row's width; `#` wall,
    /// `.` pellet, `o` power pellet, `0` player spawn, `1`-`4` ghost spawns
    /// and space are the only valid cells.
    pub fn parse(board: &[&str]) -> Result<MazeLayout, ParseError> {
        let width = board.first().map(|line| line.chars().count()).unwrap_or(0);

        let mut walls = Vec::new();
        let mut pellets = Vec::new();
        let mut player_spawn = None;
        let mut ghost_spawns: [Option<Vec2>; 4] = [None; 4];

        for (row, line) in board.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != width {
                return Err(ParseError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }

            let row_center = row as f32 * CELL_SIZE + CELL_SIZE / 2.0;
            let mut run_start: Option<usize> = None;
            for (col, &cell) in cells.iter().enumerate() {
                if cell == '#' {
                    run_start.get_or_insert(col);
                    continue;
                }
                if let Some(start) = run_start.take() {
                    walls.push(wall_run(start, col, row_center));
                }
                match cell {
                    '.' => pellets.push(PelletSpawn {
                        position: cell_center(col, row),
                        kind: PelletKind::Normal,
                    }),
                    'o' => pellets.push(PelletSpawn {
                        position: cell_center(col, row),
                        kind: PelletKind::Power,
                    }),
                    '0' => player_spawn = Some(cell_center(col, row)),
                    '1'..='4' => {
                        let slot = (cell as usize) - ('1' as usize);
                        ghost_spawns[slot] = Some(cell_center(col, row));
                    }
                    ' ' => {}
                    unknown => return Err(ParseError::UnknownCharacter(unknown)),
                }
            }
            if let Some(start) = run_start.take() {
                walls.push(wall_run(start, width, row_center));
            }
        }

        let player_spawn = player_spawn.ok_or(ParseError::MissingPlayerSpawn)?;
        let found = ghost_spawns.iter().flatten().count();
        if found != 4 {
            return Err(ParseError::InvalidGhostSpawnCount(found));
        }
        let ghost_spawns = ghost_spawns.map(|spawn| spawn.unwrap_or_default());
        let ghost_house = ghost_spawns.iter().sum::<Vec2>() / 4.0;

        Ok(MazeLayout {
            walls,
            pellets,
            player_spawn,
            ghost_spawns,
            ghost_house,
        })
    }
}

fn wall_run(start: usize, end: usize, row_center: f32) -> WallSegment {
    let cells = (end - start) as f32;
    WallSegment {
        center: Vec2::new((start as f32 + cells / 2.0) * CELL_SIZE, row_center),
        half: Vec2::new(cells * CELL_SIZE / 2.0, CELL_SIZE / 2.0),
    }
}
