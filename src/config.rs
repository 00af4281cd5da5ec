// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use {std::{path::PathBuf, str::FromStr}, anyhow::{anyhow, Context as _}, clap::Parser};


/// Which days to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
	All,
	Day(u8),
}

impl FromStr for Selection {
	type Err = String;

	/// Accepts `all`, `dayNN` (anything after the two digits is ignored, as
	/// in `day16opt`) or a bare `NN`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s == "all" { return Ok(Selection::All) }
		let digits = match s.strip_prefix("day") {
			Some(rest) => rest.get(..2).ok_or_else(|| format!("expected two digits in {s:?}"))?,
			None => s,
		};
		match digits.parse::<u8>() {
			Ok(day @ 1..=25) => Ok(Selection::Day(day)),
			Ok(day) => Err(format!("no puzzle on day {day}")),
			Err(e) => Err(format!("invalid day {s:?}: {e}")),
		}
	}
}


#[derive(Parser, Debug)]
#[command(name = "advent", about = "Solves Advent of Code puzzles, verifying expected results.")]
pub(crate) struct Cli {
	#[arg(help = "Day to solve: `all`, `dayNN` or `NN`")]
	pub(crate) day: Selection,

	#[arg(long, help = "Puzzle year (defaults to the latest one with solvers)")]
	pub(crate) year: Option<u16>,

	#[arg(long, help = "Directory holding `<year>/dayNN/{test,input}.txt`", default_value = ".")]
	pub(crate) inputs: PathBuf,

	#[arg(long, help = "Log diagnostics from the solvers", default_value_t = false)]
	pub(crate) debug: bool,
}


#[derive(Debug, Clone)]
pub(crate) struct Config {
	pub(crate) selection: Selection,
	pub(crate) year: u16,
	/// Canonical path to an existing directory.
	pub(crate) inputs: PathBuf,
	pub(crate) log_level: tracing::Level,
}

fn resolve_year(year: Option<u16>, years: &[u16]) -> anyhow::Result<u16> {
	match year {
		Some(year) if years.contains(&year) => Ok(year),
		Some(year) => Err(anyhow!("no solvers for year {year} (have {years:?})")),
		None => years.iter().copied().max().ok_or_else(|| anyhow!("no solvers registered")),
	}
}

impl Config {
	/// Validates `cli` against the `years` that have solvers.
	pub(crate) fn new(cli: &Cli, years: &[u16]) -> anyhow::Result<Self> {
		let year = resolve_year(cli.year, years)?;
		let inputs = cli.inputs.canonicalize()
			.with_context(|| format!("cannot find inputs directory {}", cli.inputs.display()))?;
		if !inputs.is_dir() {
			return Err(anyhow!("inputs path {} is not a directory", inputs.display()))
		}

		let log_level = if cli.debug { tracing::Level::DEBUG } else { tracing::Level::INFO };
		Ok(Config { selection: cli.day, year, inputs, log_level })
	}
}
