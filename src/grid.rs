// Copyright (c) 2022 Bastiaan Marinus van de Weerd


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Dir { North, East, South, West }

impl Dir {
	pub(crate) const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

	pub(crate) fn index(self) -> usize {
		self as usize
	}

	pub(crate) fn clockwise(self) -> Self {
		Dir::ALL[(self.index() + 1) % 4]
	}

	pub(crate) fn counterclockwise(self) -> Self {
		Dir::ALL[(self.index() + 3) % 4]
	}
}


/// Row-major grid geometry; positions are indices into a `width * height` buffer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Bounds {
	pub(crate) width: usize,
	pub(crate) height: usize,
}

impl Bounds {
	pub(crate) fn area(&self) -> usize {
		self.width * self.height
	}

	pub(crate) fn xy(&self, pos: usize) -> [usize; 2] {
		[pos % self.width, pos / self.width]
	}

	pub(crate) fn pos(&self, [x, y]: [usize; 2]) -> Option<usize> {
		(x < self.width && y < self.height).then_some(y * self.width + x)
	}

	/// The position one step from `pos` towards `dir`, unless that leaves the grid.
	pub(crate) fn step(&self, pos: usize, dir: Dir) -> Option<usize> {
		let [x, y] = self.xy(pos);
		match dir {
			Dir::North => (y > 0).then(|| pos - self.width),
			Dir::East => (x + 1 < self.width).then(|| pos + 1),
			Dir::South => (y + 1 < self.height).then(|| pos + self.width),
			Dir::West => (x > 0).then(|| pos - 1),
		}
	}

	pub(crate) fn adjacent(&self, pos: usize) -> impl Iterator<Item = usize> + '_ {
		Dir::ALL.into_iter().filter_map(move |dir| self.step(pos, dir))
	}
}


#[test]
fn tests() {
	let bounds = Bounds { width: 3, height: 2 };
	assert_eq!(bounds.area(), 6);
	assert_eq!(bounds.xy(4), [1, 1]);
	assert_eq!(bounds.pos([2, 1]), Some(5));
	assert_eq!(bounds.pos([3, 0]), None);
	assert_eq!(bounds.step(0, Dir::North), None);
	assert_eq!(bounds.step(0, Dir::West), None);
	assert_eq!(bounds.step(2, Dir::East), None);
	assert_eq!(bounds.step(4, Dir::South), None);
	assert_eq!(bounds.step(1, Dir::South), Some(4));
	assert_eq!(bounds.adjacent(1).collect::<Vec<_>>(), [2, 4, 0]);
	assert_eq!(Dir::West.clockwise(), Dir::North);
	assert_eq!(Dir::North.counterclockwise(), Dir::West);
}
