// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use crate::{grid::{Bounds, Dir}, util::{Answers, Solver}};


const STEP_SCORE: usize = 1;
const TURN_SCORE: usize = 1000;

#[derive(Default)]
pub(crate) struct Maze {
	walls: Vec<bool>,
	width: usize,
	start: Option<usize>,
	end: Option<usize>,
}

/// A reindeer's position & heading, flattened into one index.
type State = usize;

fn state(pos: usize, dir: Dir) -> State { pos * 4 + dir.index() }

fn pos_dir(state: State) -> (usize, Dir) { (state / 4, Dir::ALL[state % 4]) }

impl Maze {
	fn bounds(&self) -> Bounds {
		let height = if self.width == 0 { 0 } else { self.walls.len() / self.width };
		Bounds { width: self.width, height }
	}

	fn moves(&self, from: State) -> impl Iterator<Item = (State, usize)> + '_ {
		let (pos, dir) = pos_dir(from);
		let ahead = self.bounds().step(pos, dir)
			.filter(|&next| !self.walls[next])
			.map(|next| (state(next, dir), STEP_SCORE));
		let turns = [dir.clockwise(), dir.counterclockwise()]
			.map(|dir| (state(pos, dir), TURN_SCORE));
		ahead.into_iter().chain(turns)
	}

	/// Lowest score from start to end, and the number of tiles on any path
	/// scoring that.
	fn walk(&self, start: usize, end: usize) -> Option<(usize, usize)> {
		use std::{cmp::Reverse, collections::BinaryHeap};

		// Dijkstra, remembering every predecessor along an equally good path
		let states = self.walls.len() * 4;
		let mut scores = vec![usize::MAX; states];
		let mut predecessors = vec![vec![]; states];
		let mut heap = BinaryHeap::new();
		let mut iterations = 0;

		scores[state(start, Dir::East)] = 0;
		heap.push(Reverse((0, state(start, Dir::East))));

		while let Some(Reverse((score, current))) = heap.pop() {
			iterations += 1;
			if score > scores[current] { continue }

			for (next, cost) in self.moves(current) {
				let next_score = score + cost;
				if next_score < scores[next] {
					scores[next] = next_score;
					predecessors[next] = vec![current];
					heap.push(Reverse((next_score, next)));
				} else if next_score == scores[next] {
					predecessors[next].push(current);
				}
			}
		}

		let best = Dir::ALL.iter().map(|&dir| scores[state(end, dir)]).min()?;
		if best == usize::MAX { return None }
		tracing::info!("Found end: iterations: {iterations} - score {best}");

		// Walk back from every best-scoring arrival
		let mut seen = vec![false; states];
		let mut stack = Dir::ALL.iter()
			.map(|&dir| state(end, dir))
			.filter(|&s| scores[s] == best)
			.collect::<Vec<_>>();
		let mut tiles = vec![false; self.walls.len()];
		while let Some(current) = stack.pop() {
			if std::mem::replace(&mut seen[current], true) { continue }
			tiles[pos_dir(current).0] = true;
			stack.extend(predecessors[current].iter().copied());
		}

		Some((best, tiles.into_iter().filter(|&t| t).count()))
	}
}

pub(crate) use parsing::MazeError;

impl Solver for Maze {
	type Error = MazeError;

	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
		if line.is_empty() { return Ok(()) }
		if self.width > 0 && line.len() != self.width {
			return Err(MazeError::LineLen { len: self.width, found: line.len() })
		}
		self.width = line.len();

		for (column, b) in line.bytes().enumerate() {
			let pos = self.walls.len();
			macro_rules! set_once { ( $which:ident, $err:ident ) => { {
				if self.$which.replace(pos).is_some() {
					return Err(MazeError::$err { column: column + 1 })
				}
			} } }
			match b {
				b'S' => set_once!(start, DuplicateStart),
				b'E' => set_once!(end, DuplicateEnd),
				b'#' | b'.' => (),
				found => return Err(MazeError::InvalidByte { column: column + 1, found }),
			}
			self.walls.push(b == b'#');
		}
		Ok(())
	}

	fn solve(self) -> Result<Answers, Self::Error> {
		let start = self.start.ok_or(MazeError::NoStart)?;
		let end = self.end.ok_or(MazeError::NoEnd)?;
		let bounds = self.bounds();
		let walls = self.walls.iter().filter(|&&w| w).count();
		tracing::info!("Maze size: {}x{} - walls {} - empty: {}",
			bounds.width, bounds.height, walls, bounds.area() - walls);

		let (score, tiles) = self.walk(start, end).ok_or(MazeError::Unreachable)?;
		Ok(Answers::new(score, tiles))
	}
}


mod parsing {
	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum MazeError {
		LineLen { len: usize, found: usize },
		InvalidByte { column: usize, found: u8 },
		DuplicateStart { column: usize },
		DuplicateEnd { column: usize },
		NoStart,
		NoEnd,
		Unreachable,
	}
}
