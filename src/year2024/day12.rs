// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use crate::{grid::{Bounds, Dir}, util::{Answers, Solver}};


#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
struct Region {
	plant: u8,
	area: usize,
	perimeter: usize,
	/// Equal to the number of corners.
	sides: usize,
}

#[derive(Default)]
pub(crate) struct Garden {
	plants: Vec<u8>,
	width: usize,
}

impl Garden {
	fn bounds(&self) -> Bounds {
		let height = if self.width == 0 { 0 } else { self.plants.len() / self.width };
		Bounds { width: self.width, height }
	}

	fn regions(&self) -> Vec<Region> {
		use std::collections::VecDeque;

		let bounds = self.bounds();
		let mut ids = vec![None; bounds.area()];
		let mut regions = vec![];

		for start in 0..bounds.area() {
			if ids[start].is_some() { continue }
			let id = regions.len();
			let plant = self.plants[start];

			// Flood fill
			let mut cells = vec![];
			let mut queue = VecDeque::from([start]);
			ids[start] = Some(id);
			while let Some(pos) = queue.pop_front() {
				cells.push(pos);
				for next in bounds.adjacent(pos) {
					if ids[next].is_none() && self.plants[next] == plant {
						ids[next] = Some(id);
						queue.push_back(next);
					}
				}
			}

			let inside = |pos: Option<usize>| pos.map_or(false, |p| ids[p] == Some(id));
			let perimeter = cells.iter()
				.map(|&pos| Dir::ALL.iter()
					.filter(|&&dir| !inside(bounds.step(pos, dir)))
					.count())
				.sum::<usize>();
			let sides = cells.iter()
				.map(|&pos| Dir::ALL.iter()
					.filter(|&&dir| {
						let turned = dir.clockwise();
						let ahead = inside(bounds.step(pos, dir));
						let beside = inside(bounds.step(pos, turned));
						let diagonal = inside(bounds.step(pos, dir)
							.and_then(|p| bounds.step(p, turned)));
						// Outer corner, or inner corner
						!ahead && !beside || ahead && beside && !diagonal
					})
					.count())
				.sum::<usize>();

			let region = Region { plant, area: cells.len(), perimeter, sides };
			tracing::debug!("Found plot '{}': area {}, perimeter {}, sides {}",
				region.plant as char, region.area, region.perimeter, region.sides);
			regions.push(region);
		}

		regions
	}
}

pub(crate) use parsing::GardenError;

impl Solver for Garden {
	type Error = GardenError;

	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
		if line.is_empty() { return Ok(()) }
		let row = parsing::try_row_from_str(line, (self.width > 0).then_some(self.width))?;
		self.width = row.len();
		self.plants.extend_from_slice(row);
		Ok(())
	}

	fn solve(self) -> Result<Answers, Self::Error> {
		tracing::info!("Map is {}x{}", self.bounds().width, self.bounds().height);
		let regions = self.regions();
		let price1 = regions.iter().map(|r| r.area * r.perimeter).sum::<usize>();
		let price2 = regions.iter().map(|r| r.area * r.sides).sum::<usize>();
		Ok(Answers::new(price1, price2))
	}
}


mod parsing {
	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum GardenError {
		LineLen { len: usize, found: usize },
		InvalidByte { column: usize, found: u8 },
	}

	pub(super) fn try_row_from_str(s: &str, len: Option<usize>) -> Result<&[u8], GardenError> {
		if let Some((column, &found)) = s.as_bytes().iter().enumerate()
			.find(|(_, b)| !b.is_ascii_alphabetic()) {
			return Err(GardenError::InvalidByte { column: column + 1, found })
		}
		match len {
			Some(len) if len != s.len() => Err(GardenError::LineLen { len, found: s.len() }),
			_ => Ok(s.as_bytes()),
		}
	}
}
