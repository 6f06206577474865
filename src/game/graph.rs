//! Directional run-length bookkeeping over the board cells.
//!
//! Every cell owns a node in a flat arena indexed by `row * cols + col`. A node
//! knows the indices of its (up to) eight neighbours and, per direction, how
//! many like-valued cells extend from it in that direction (itself included).
//! Counters are refreshed incrementally after each drop by walking the four
//! axes through the new coin, so a win check never has to rescan the board.

use super::board::Cell;

/// The eight neighbour directions. `d` and `d.opposite()` always sit at
/// mirrored positions in [`Direction::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::TopLeft,
        Direction::Top,
        Direction::TopRight,
        Direction::Left,
        Direction::Right,
        Direction::BottomLeft,
        Direction::Bottom,
        Direction::BottomRight,
    ];

    /// One representative per axis; the other half is reached via `opposite`.
    pub const AXES: [Direction; 4] = [
        Direction::Right,
        Direction::BottomLeft,
        Direction::Bottom,
        Direction::BottomRight,
    ];

    /// (row delta, column delta); row 0 is the top of the board.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::TopLeft => (-1, -1),
            Direction::Top => (-1, 0),
            Direction::TopRight => (-1, 1),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::BottomLeft => (1, -1),
            Direction::Bottom => (1, 0),
            Direction::BottomRight => (1, 1),
        }
    }

    pub fn opposite(self) -> Direction {
        Direction::ALL[7 - self.index()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One cell's view of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    neighbours: [Option<usize>; 8],
    runs: [usize; 8],
    value: Cell,
}

impl Node {
    pub fn neighbour(&self, direction: Direction) -> Option<usize> {
        self.neighbours[direction.index()]
    }

    /// Like-valued cells extending from this node in `direction`, itself included.
    pub fn run(&self, direction: Direction) -> usize {
        self.runs[direction.index()]
    }

    pub fn longest_run(&self) -> usize {
        self.runs.iter().copied().max().unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLengthGraph {
    cols: usize,
    nodes: Vec<Node>,
    touched: Vec<usize>,
}

impl RunLengthGraph {
    /// Build the arena and resolve every in-bounds neighbour once.
    pub fn new(rows: usize, cols: usize) -> Self {
        let nodes = (0..rows * cols)
            .map(|idx| {
                let (row, col) = (idx / cols, idx % cols);
                let mut neighbours = [None; 8];
                for direction in Direction::ALL {
                    neighbours[direction.index()] = step(rows, cols, row, col, direction);
                }
                Node {
                    neighbours,
                    runs: [1; 8],
                    value: Cell::Empty,
                }
            })
            .collect();

        RunLengthGraph {
            cols,
            nodes,
            touched: Vec::new(),
        }
    }

    pub fn node(&self, row: usize, col: usize) -> &Node {
        &self.nodes[row * self.cols + col]
    }

    pub fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Cells refreshed by the most recent [`update`](Self::update), the placed
    /// cell first.
    pub fn touched(&self) -> &[usize] {
        &self.touched
    }

    /// Record `cell` at `(row, col)` and refresh the counters of every cell on
    /// the four lines of like-valued coins running through it.
    pub fn update(&mut self, row: usize, col: usize, cell: Cell) -> &[usize] {
        let origin = row * self.cols + col;
        self.nodes[origin].value = cell;
        self.touched.clear();
        self.touched.push(origin);

        for forward in Direction::AXES {
            let backward = forward.opposite();
            let ahead = self.walk(origin, forward, cell);
            let behind = self.walk(origin, backward, cell);

            // Segment ordered from the far backward end to the far forward end.
            let line: Vec<usize> = behind
                .iter()
                .rev()
                .copied()
                .chain(std::iter::once(origin))
                .chain(ahead.iter().copied())
                .collect();
            let span = line.len();
            for (offset, &idx) in line.iter().enumerate() {
                let node = &mut self.nodes[idx];
                node.runs[forward.index()] = span - offset;
                node.runs[backward.index()] = offset + 1;
            }

            self.touched.extend(behind);
            self.touched.extend(ahead);
        }

        &self.touched
    }

    /// Contiguous cells holding `cell` starting next to `from` in `direction`.
    fn walk(&self, from: usize, direction: Direction, cell: Cell) -> Vec<usize> {
        let mut run = Vec::new();
        let mut current = from;
        while let Some(next) = self.nodes[current].neighbour(direction) {
            if self.nodes[next].value != cell {
                break;
            }
            run.push(next);
            current = next;
        }
        run
    }
}

fn step(rows: usize, cols: usize, row: usize, col: usize, direction: Direction) -> Option<usize> {
    let (dr, dc) = direction.delta();
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < rows && c < cols).then_some(r * cols + c)
}
