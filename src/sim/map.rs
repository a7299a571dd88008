//! World map grid and the derived static collision set
//!
//! The world is one or more levels of `i32` cell codes; on level 0 any code
//! greater than zero is a solid wall (the code doubles as a texture id for
//! the renderer). The collision set is the list of wall-face segments every
//! mover is tested against, offset outward from each solid cell by the clip
//! distance so entity centers keep that margin from walls.

use serde::{Deserialize, Serialize};

use super::geom::Line;
use glam::Vec2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapGrid {
    /// Cell codes indexed as `levels[level][x][y]`
    levels: Vec<Vec<Vec<i32>>>,
    width: usize,
    height: usize,
}

impl MapGrid {
    pub fn new(levels: Vec<Vec<Vec<i32>>>) -> Self {
        assert!(!levels.is_empty() && !levels[0].is_empty());
        let width = levels[0].len();
        let height = levels[0][0].len();
        Self {
            levels,
            width,
            height,
        }
    }

    /// Parse a single-level map from an ASCII sketch. Digits 1-9 are walls
    /// with that texture code, `#` is wall code 1, anything else is open
    /// floor. Rows are y (top to bottom), columns are x.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        assert!(width > 0 && height > 0);

        let mut cells = vec![vec![0i32; height]; width];
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged map row");
            for (x, ch) in row.chars().enumerate() {
                cells[x][y] = match ch {
                    '#' => 1,
                    d @ '1'..='9' => d as i32 - '0' as i32,
                    _ => 0,
                };
            }
        }
        Self::new(vec![cells])
    }

    /// A small bordered level used by the demo binary and tests
    pub fn demo() -> Self {
        Self::from_ascii(&[
            "####################",
            "#..................#",
            "#..................#",
            "#....22......22....#",
            "#....22......22....#",
            "#..................#",
            "#.........3........#",
            "#..................#",
            "#...3..........3...#",
            "#..................#",
            "####################",
        ])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Cell code at the given position; out-of-range queries read as open
    pub fn cell(&self, level: usize, x: i64, y: i64) -> i32 {
        if level >= self.levels.len() || x < 0 || y < 0 {
            return 0;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.levels[level][x][y]
    }

    /// Whether the level-0 cell at the given position blocks movement
    pub fn is_solid(&self, x: i64, y: i64) -> bool {
        self.cell(0, x, y) > 0
    }

    /// Wall-face segments for every solid level-0 cell, each cell rectangle
    /// grown outward by `clip` on all sides. Built once per session.
    pub fn collision_lines(&self, clip: f32) -> Vec<Line> {
        let mut lines = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                if !self.is_solid(x as i64, y as i64) {
                    continue;
                }
                let x0 = x as f32 - clip;
                let y0 = y as f32 - clip;
                let x1 = x as f32 + 1.0 + clip;
                let y1 = y as f32 + 1.0 + clip;
                lines.push(Line::new(Vec2::new(x0, y0), Vec2::new(x1, y0)));
                lines.push(Line::new(Vec2::new(x1, y0), Vec2::new(x1, y1)));
                lines.push(Line::new(Vec2::new(x1, y1), Vec2::new(x0, y1)));
                lines.push(Line::new(Vec2::new(x0, y1), Vec2::new(x0, y0)));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_cells() {
        let map = MapGrid::from_ascii(&[
            "###", //
            "#.#", //
            "#2#",
        ]);
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 3);
        assert_eq!(map.cell(0, 0, 0), 1);
        assert_eq!(map.cell(0, 1, 1), 0);
        assert_eq!(map.cell(0, 1, 2), 2);
        assert!(map.is_solid(1, 2));
        assert!(!map.is_solid(1, 1));
    }

    #[test]
    fn test_out_of_range_reads_open() {
        let map = MapGrid::demo();
        assert_eq!(map.cell(0, -1, 0), 0);
        assert_eq!(map.cell(0, 0, -5), 0);
        assert_eq!(map.cell(0, 999, 0), 0);
        assert_eq!(map.cell(7, 1, 1), 0);
        assert!(!map.is_solid(-1, -1));
    }

    #[test]
    fn test_collision_lines_per_solid_cell() {
        let map = MapGrid::from_ascii(&[
            "...", //
            ".#.", //
            "...",
        ]);
        let lines = map.collision_lines(0.1);
        assert_eq!(lines.len(), 4);

        // All endpoints sit on the outset rectangle around cell (1, 1)
        for line in &lines {
            for p in [line.a, line.b] {
                assert!((0.9..=2.1).contains(&p.x));
                assert!((0.9..=2.1).contains(&p.y));
                let on_x_edge = (p.x - 0.9).abs() < 1e-5 || (p.x - 2.1).abs() < 1e-5;
                let on_y_edge = (p.y - 0.9).abs() < 1e-5 || (p.y - 2.1).abs() < 1e-5;
                assert!(on_x_edge && on_y_edge);
            }
        }
    }

    #[test]
    fn test_collision_lines_count_demo() {
        let map = MapGrid::demo();
        let solid = (0..map.width() as i64)
            .flat_map(|x| (0..map.height() as i64).map(move |y| (x, y)))
            .filter(|&(x, y)| map.is_solid(x, y))
            .count();
        assert_eq!(map.collision_lines(0.1).len(), solid * 4);
    }
}
