// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use std::{fmt, io, path::Path, time::{Duration, Instant}};


/// Answers to both parts of a puzzle; `None` for a part the input has no answer for.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Answers {
	pub(crate) part1: Option<String>,
	pub(crate) part2: Option<String>,
}

impl Answers {
	pub(crate) fn new(part1: impl ToString, part2: impl ToString) -> Self {
		Answers { part1: Some(part1.to_string()), part2: Some(part2.to_string()) }
	}

	pub(crate) fn part(&self, part: u8) -> Option<&str> {
		match part {
			1 => self.part1.as_deref(),
			2 => self.part2.as_deref(),
			_ => None,
		}
	}
}


/// A day's puzzle. Fed one input line at a time, then solved once.
pub(crate) trait Solver: Default {
	type Error: fmt::Debug + Send + Sync + 'static;

	/// Called for every line not carrying an expected result (blank lines included).
	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error>;

	fn solve(self) -> Result<Answers, Self::Error>;
}


#[derive(Debug)]
pub(crate) enum SolveError<E> {
	Io(io::Error),
	Line { line: usize, source: E },
	Solve(E),
}

impl<E: fmt::Debug> fmt::Display for SolveError<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SolveError::Io(e) => write!(f, "cannot read input: {e}"),
			SolveError::Line { line, source } => write!(f, "invalid input on line {line}: {source:?}"),
			SolveError::Solve(e) => write!(f, "cannot solve: {e:?}"),
		}
	}
}

impl<E: fmt::Debug> std::error::Error for SolveError<E> {}


const EXPECTED_PREFIXES: [&str; 2] = ["result part 1: ", "result part 2: "];

/// Feeds `lines` to a fresh `S`, setting aside expected-result trailer lines.
/// Returns the actual answers followed by the expected ones.
pub(crate) fn solve_lines<S: Solver>(lines: impl IntoIterator<Item = io::Result<String>>)
-> Result<(Answers, Answers), SolveError<S::Error>> {
	let mut solver = S::default();
	let mut expected = Answers::default();

	for (l, line) in lines.into_iter().enumerate() {
		let line = line.map_err(SolveError::Io)?;
		let line = line.strip_suffix('\r').unwrap_or(&line);
		if let Some(value) = line.strip_prefix(EXPECTED_PREFIXES[0]) {
			expected.part1 = Some(value.to_owned());
		} else if let Some(value) = line.strip_prefix(EXPECTED_PREFIXES[1]) {
			expected.part2 = Some(value.to_owned());
		} else {
			solver.parse_line(line)
				.map_err(|e| SolveError::Line { line: l + 1, source: e })?;
		}
	}

	Ok((solver.solve().map_err(SolveError::Solve)?, expected))
}

#[cfg(test)]
pub(crate) fn solve_str<S: Solver>(s: &str) -> Answers {
	solve_lines::<S>(s.lines().map(|l| Ok(l.to_owned()))).unwrap().0
}


pub(crate) struct Report {
	pub(crate) actual: Answers,
	pub(crate) expected: Answers,
	pub(crate) elapsed: Duration,
}

pub(crate) fn solve_file<S: Solver>(path: &Path) -> anyhow::Result<Report> {
	use {std::{fs::File, io::{BufRead as _, BufReader}}, anyhow::Context as _};

	let t0 = Instant::now();
	let file = File::open(path)
		.with_context(|| format!("cannot open file {}", path.display()))?;
	let (actual, expected) = solve_lines::<S>(BufReader::new(file).lines())
		.with_context(|| format!("error with input file {}", path.display()))?;
	Ok(Report { actual, expected, elapsed: t0.elapsed() })
}


pub(crate) struct Day {
	pub(crate) day: u8,
	pub(crate) run: fn(&Path) -> anyhow::Result<Report>,
}

/// Declares a year's day modules, each paired with its [`Solver`], and
/// collects them in that year's `DAYS` table.
macro_rules! mod_days { ( $( $day:literal => $solver:ident ),* $(,)? ) => { paste::paste! {
	$( pub(crate) mod [<day $day>]; )*

	pub(crate) const DAYS: &[crate::util::Day] = &[ $(
		crate::util::Day {
			day: $day,
			run: crate::util::solve_file::<[<day $day>]::$solver>,
		},
	)* ];
} } }

pub(crate) use mod_days;


#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct Tally { lines: Vec<String> }

	impl Solver for Tally {
		type Error = &'static str;

		fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
			if line == "bad" { return Err("bad line") }
			self.lines.push(line.to_owned());
			Ok(())
		}

		fn solve(self) -> Result<Answers, Self::Error> {
			Ok(Answers { part1: Some(self.lines.len().to_string()), part2: None })
		}
	}

	fn lines(s: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
		s.lines().map(|l| Ok(l.to_owned()))
	}

	#[test]
	fn trailers() {
		let (actual, expected) = solve_lines::<Tally>(lines(indoc::indoc! { "
			a

			b
			result part 1: 3
			result part 2: 42
		" })).unwrap();
		assert_eq!(actual, Answers { part1: Some("3".to_owned()), part2: None });
		assert_eq!(expected, Answers::new(3, 42));
		assert_eq!(expected.part(2), Some("42"));
		assert_eq!(expected.part(3), None);
	}

	#[test]
	fn crlf() {
		let crlf = |s: &'static str| s.split_inclusive('\n')
			.map(|l| Ok(l.strip_suffix('\n').unwrap_or(l).to_owned()));
		let (actual, expected) = solve_lines::<Tally>(crlf("a\r\nb\r\nresult part 1: 2\r\n")).unwrap();
		assert_eq!(actual.part1.as_deref(), Some("2"));
		assert_eq!(expected.part1.as_deref(), Some("2"));
		assert!(matches!(solve_lines::<Tally>(crlf("a\r\nbad\r\n")),
			Err(SolveError::Line { line: 2, source: "bad line" })));
	}

	#[test]
	fn line_errors() {
		let err = solve_lines::<Tally>(lines("a\nbad\nc")).unwrap_err();
		assert!(matches!(err, SolveError::Line { line: 2, source: "bad line" }));
		assert_eq!(err.to_string(), "invalid input on line 2: \"bad line\"");
	}

	#[test]
	fn io_errors() {
		let input = [Ok("a".to_owned()), Err(io::Error::new(io::ErrorKind::Other, "gone"))];
		assert!(matches!(solve_lines::<Tally>(input), Err(SolveError::Io(_))));
	}
}
