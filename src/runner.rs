// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use {std::path::Path, anyhow::anyhow, crate::{config::{Config, Selection}, util::Day}};


pub(crate) struct Year {
	pub(crate) year: u16,
	pub(crate) days: &'static [Day],
}

pub(crate) const YEARS: &[Year] = &[
	Year { year: 2022, days: crate::year2022::DAYS },
	Year { year: 2024, days: crate::year2024::DAYS },
];

pub(crate) fn years() -> Vec<u16> {
	YEARS.iter().map(|y| y.year).collect()
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
	/// The solver gave no answer.
	Unanswered,
	/// The input carries no expected answer.
	Unverified,
	Correct,
	Incorrect,
}

pub(crate) fn verify(part: u8, expected: Option<&str>, actual: Option<&str>) -> Verdict {
	match (expected, actual) {
		(_, None) => {
			tracing::debug!("part {part} has no result");
			Verdict::Unanswered
		}
		(None, Some(actual)) => {
			tracing::warn!("part {part} has no expected result (actual: {actual})");
			Verdict::Unverified
		}
		(Some(expected), Some(actual)) if expected == actual => {
			tracing::info!("PART {part} - found expected result: {actual}");
			Verdict::Correct
		}
		(Some(expected), Some(actual)) => {
			tracing::error!("part {part} result is incorrect: expected {expected}, actual {actual}");
			Verdict::Incorrect
		}
	}
}


const INPUT_FILES: [&str; 2] = ["test.txt", "input.txt"];

/// Solves both input files of `day`. Missing files are skipped with a
/// warning unless `strict`.
fn solve_day(dir: &Path, year: u16, day: &Day, strict: bool) -> anyhow::Result<()> {
	tracing::info!("== Solving {year} / day{:02} ==", day.day);

	for name in INPUT_FILES {
		let path = dir.join(format!("day{:02}", day.day)).join(name);
		if !path.is_file() {
			if strict { return Err(anyhow!("missing input file {}", path.display())) }
			tracing::warn!("Skipping missing input file {}", path.display());
			continue
		}

		tracing::info!("Using input file {}", path.display());
		let report = (day.run)(&path)?;
		for part in [1, 2] {
			verify(part, report.expected.part(part), report.actual.part(part));
		}
		tracing::info!("Solved in {:?}", report.elapsed);
	}
	Ok(())
}

pub(crate) fn run(config: &Config) -> anyhow::Result<()> {
	let year = YEARS.iter().find(|y| y.year == config.year)
		.ok_or_else(|| anyhow!("no solvers for year {}", config.year))?;
	let dir = config.inputs.join(year.year.to_string());

	match config.selection {
		Selection::Day(number) => {
			let day = year.days.iter().find(|d| d.day == number)
				.ok_or_else(|| anyhow!("no solver for {} / day{number:02}", year.year))?;
			solve_day(&dir, year.year, day, true)
		}
		Selection::All => {
			for number in 1..=25 {
				let Some(day) = year.days.iter().find(|d| d.day == number) else {
					tracing::debug!("No solver for {} / day{number:02}", year.year);
					continue
				};
				solve_day(&dir, year.year, day, false)?;
			}
			Ok(())
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;
	use test_case::test_case;

	#[test_case(Some("1651"), Some("1651") => Verdict::Correct; "correct")]
	#[test_case(Some("1651"), Some("1650") => Verdict::Incorrect; "incorrect")]
	#[test_case(None, Some("1651") => Verdict::Unverified; "unverified")]
	#[test_case(Some("1651"), None => Verdict::Unanswered; "unanswered")]
	#[test_case(None, None => Verdict::Unanswered; "nothing")]
	fn verdicts(expected: Option<&str>, actual: Option<&str>) -> Verdict {
		verify(1, expected, actual)
	}

	#[test]
	fn registry() {
		assert_eq!(years(), [2022, 2024]);
		for year in YEARS {
			assert!(year.days.windows(2).all(|w| w[0].day < w[1].day));
		}
		let days = YEARS[1].days.iter().map(|d| d.day).collect::<Vec<_>>();
		assert_eq!(days, [12, 13, 16, 17, 18]);
	}
}
