// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use crate::{grid::Bounds, util::{Answers, Solver}};


const GRID_SIZE: usize = 71;
const CORRUPTION_TIME: usize = 1024;

pub(crate) struct MemorySpace {
	falling: Vec<[usize; 2]>,
	/// Width & height of the grid.
	size: usize,
	/// Bytes fallen before taking the first walk.
	time: usize,
}

impl Default for MemorySpace {
	fn default() -> Self {
		MemorySpace { falling: vec![], size: GRID_SIZE, time: CORRUPTION_TIME }
	}
}

impl MemorySpace {
	fn bounds(&self) -> Bounds {
		Bounds { width: self.size, height: self.size }
	}

	/// Fewest steps from the top left to the bottom right corner once the
	/// first `fallen` bytes have corrupted their positions.
	fn steps(&self, fallen: usize) -> Option<usize> {
		use std::collections::VecDeque;

		let bounds = self.bounds();
		let mut blocked = vec![false; bounds.area()];
		for &xy in &self.falling[..fallen] {
			blocked[bounds.pos(xy)?] = true;
		}

		// Breadth-first search
		let end = bounds.area().checked_sub(1)?;
		let mut queue = VecDeque::from([(0, 0)]);
		while let Some((pos, steps)) = queue.pop_front() {
			if blocked[pos] { continue }
			if pos == end { return Some(steps) }
			blocked[pos] = true;
			queue.extend(bounds.adjacent(pos)
				.filter(|&next| !blocked[next])
				.map(|next| (next, steps + 1)));
		}
		None
	}

	/// The first byte after which the exit can no longer be reached.
	fn first_blocking(&self) -> Option<[usize; 2]> {
		if self.steps(self.falling.len()).is_some() { return None }

		// Binary search; more fallen bytes never open up a path
		let (mut lo, mut hi) = (0, self.falling.len());
		while lo < hi {
			let mid = (lo + hi) / 2;
			let reachable = self.steps(mid).is_some();
			tracing::debug!("Exit after {mid} bytes: {reachable}");
			if reachable { lo = mid + 1 } else { hi = mid }
		}
		lo.checked_sub(1).map(|i| self.falling[i])
	}
}

pub(crate) use parsing::MemorySpaceError;

impl Solver for MemorySpace {
	type Error = MemorySpaceError;

	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
		use parsing::Line;
		match parsing::try_line_from_str(line)? {
			Line::Blank => (),
			Line::GridSize(size) => self.size = size,
			Line::Time(time) => self.time = time,
			Line::Byte(xy) => self.falling.push(xy),
		}
		Ok(())
	}

	fn solve(self) -> Result<Answers, Self::Error> {
		let bounds = self.bounds();
		if let Some((index, &xy)) = self.falling.iter().enumerate()
			.find(|(_, xy)| bounds.pos(**xy).is_none()) {
			return Err(MemorySpaceError::OutOfBounds { index, xy })
		}
		tracing::info!("Solving on {}x{} grid, limit corruption to {}/{}",
			bounds.width, bounds.height, self.time, self.falling.len());

		let steps = self.steps(self.time.min(self.falling.len()));
		let blocking = self.first_blocking();
		Ok(Answers {
			part1: steps.map(|s| s.to_string()),
			part2: blocking.map(|[x, y]| format!("{x},{y}")),
		})
	}
}


mod parsing {
	use std::num::ParseIntError;

	pub(super) enum Line {
		Blank,
		GridSize(usize),
		Time(usize),
		Byte([usize; 2]),
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum MemorySpaceError {
		Directive(ParseIntError),
		Coordinate { axis: usize, source: Option<ParseIntError> },
		OutOfBounds { index: usize, xy: [usize; 2] },
	}

	pub(super) fn try_line_from_str(s: &str) -> Result<Line, MemorySpaceError> {
		use MemorySpaceError as E;

		if s.is_empty() { return Ok(Line::Blank) }
		if let Some(size) = s.strip_prefix("grid size: ") {
			return size.parse().map(Line::GridSize).map_err(E::Directive)
		}
		if let Some(time) = s.strip_prefix("time: ") {
			return time.parse().map(Line::Time).map_err(E::Directive)
		}

		let (x, y) = s.split_once(',').ok_or(E::Coordinate { axis: 1, source: None })?;
		let x = x.parse().map_err(|e| E::Coordinate { axis: 0, source: Some(e) })?;
		let y = y.parse().map_err(|e| E::Coordinate { axis: 1, source: Some(e) })?;
		Ok(Line::Byte([x, y]))
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::solve_str;

	const INPUT: &str = indoc::indoc! { "
		grid size: 7
		time: 12
		5,4
		4,2
		4,5
		3,0
		2,1
		6,3
		2,4
		1,5
		0,6
		3,3
		2,6
		5,1
		1,2
		5,5
		2,5
		6,5
		1,4
		0,4
		6,4
		1,1
		6,1
		1,0
		0,5
		1,6
		2,0
	" };

	#[test]
	fn tests() {
		assert_eq!(solve_str::<MemorySpace>(INPUT), Answers::new(22, "6,1"));
	}

	#[test]
	fn never_blocked() {
		let answers = solve_str::<MemorySpace>("grid size: 3\ntime: 1\n1,1");
		assert_eq!(answers, Answers { part1: Some("4".to_owned()), part2: None });
	}

	#[test]
	fn blocked_from_the_start() {
		let answers = solve_str::<MemorySpace>("grid size: 2\ntime: 2\n0,1\n1,0");
		assert_eq!(answers, Answers { part1: None, part2: Some("1,0".to_owned()) });
	}

	#[test]
	fn grid_size() {
		assert_eq!(MemorySpace::default().bounds(), Bounds { width: 71, height: 71 });
		assert_eq!(solve_str::<MemorySpace>("grid size: 1"), Answers { part1: Some("0".to_owned()), part2: None });
		assert_eq!(solve_str::<MemorySpace>("grid size: 0"), Answers::default());
	}

	#[test]
	fn errors() {
		let mut space = MemorySpace::default();
		assert!(matches!(space.parse_line("grid size: x"), Err(MemorySpaceError::Directive(_))));
		assert!(matches!(space.parse_line("1;2"), Err(MemorySpaceError::Coordinate { axis: 1, source: None })));
		assert!(matches!(space.parse_line("a,2"), Err(MemorySpaceError::Coordinate { axis: 0, source: Some(_) })));
		space.parse_line("time: 1").unwrap();
		space.parse_line("71,0").unwrap();
		assert!(matches!(space.solve(), Err(MemorySpaceError::OutOfBounds { index: 0, xy: [71, 0] })));
	}
}
