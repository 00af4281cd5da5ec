// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use crate::util::{Answers, Solver};


const PRESS_LIMIT: i64 = 100;
const PRIZE_OFFSET: i64 = 10_000_000_000_000;

#[derive(Clone, Copy)]
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
struct Machine {
	a: [i64; 2],
	b: [i64; 2],
	prize: [i64; 2],
}

impl Machine {
	/// Fewest tokens winning the prize moved by `offset` along both axes, if
	/// it can be won at all. Button A costs three tokens, button B one.
	fn min_tokens(&self, offset: i64, press_limit: Option<i64>) -> Option<i64> {
		let ([ax, ay], [bx, by]) = (self.a, self.b);
		let px = self.prize[0].checked_add(offset)?;
		let py = self.prize[1].checked_add(offset)?;
		// `p * q - r * s`, unless it overflows
		let cross = |p: i64, q: i64, r: i64, s: i64| p.checked_mul(q)?.checked_sub(r.checked_mul(s)?);

		// Cramer's rule; parallel buttons leave no unique solution
		let det = cross(ax, by, ay, bx)?;
		if det == 0 { return None }
		let (a, b) = (cross(px, by, py, bx)?, cross(ax, py, ay, px)?);
		if a.checked_rem(det)? != 0 || b.checked_rem(det)? != 0 { return None }
		let (a, b) = (a.checked_div(det)?, b.checked_div(det)?);

		if a < 0 || b < 0 { return None }
		if press_limit.map_or(false, |limit| a > limit || b > limit) { return None }
		a.checked_mul(3)?.checked_add(b)
	}
}


#[derive(Default)]
pub(crate) struct Arcade {
	machines: Vec<Machine>,
	a: Option<[i64; 2]>,
	b: Option<[i64; 2]>,
}

pub(crate) use parsing::ArcadeError;

impl Solver for Arcade {
	type Error = ArcadeError;

	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
		use {either::Either, parsing::Button};

		if line.is_empty() { return Ok(()) }
		match parsing::try_line_from_str(line)? {
			Either::Left((Button::A, a)) => {
				if self.a.is_some() { return Err(ArcadeError::Incomplete) }
				self.a = Some(a);
			}
			Either::Left((Button::B, b)) => {
				if self.a.is_none() || self.b.is_some() {
					return Err(ArcadeError::OutOfOrder { expected: "Button A" })
				}
				self.b = Some(b);
			}
			Either::Right(prize) => {
				let (Some(a), Some(b)) = (self.a.take(), self.b.take())
					else { return Err(ArcadeError::OutOfOrder { expected: "Button B" }) };
				self.machines.push(Machine { a, b, prize });
			}
		}
		Ok(())
	}

	fn solve(self) -> Result<Answers, Self::Error> {
		use rayon::prelude::{IntoParallelRefIterator as _, ParallelIterator as _};

		if self.a.is_some() { return Err(ArcadeError::Incomplete) }
		tracing::info!("Found {} machines", self.machines.len());

		let tokens1 = self.machines.par_iter()
			.filter_map(|m| m.min_tokens(0, Some(PRESS_LIMIT)))
			.sum::<i64>();
		let tokens2 = self.machines.par_iter()
			.filter_map(|m| m.min_tokens(PRIZE_OFFSET, None))
			.sum::<i64>();
		Ok(Answers::new(tokens1, tokens2))
	}
}


mod parsing {
	use {std::{num::ParseIntError, sync::OnceLock}, either::Either, regex::Regex};

	pub(super) enum Button { A, B }

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum ArcadeError {
		Format,
		Number(ParseIntError),
		OutOfOrder { expected: &'static str },
		Incomplete,
	}

	fn patterns() -> &'static [Regex; 2] {
		static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
		PATTERNS.get_or_init(|| [
			Regex::new(r"^Button ([AB]): X\+(\d+), Y\+(\d+)$").unwrap(),
			Regex::new(r"^Prize: X=(\d+), Y=(\d+)$").unwrap(),
		])
	}

	/// Either a button's name & movement, or a prize's position.
	pub(super) fn try_line_from_str(s: &str)
	-> Result<Either<(Button, [i64; 2]), [i64; 2]>, ArcadeError> {
		let [button, prize] = patterns();
		let xy = |x: &str, y: &str| -> Result<[i64; 2], ArcadeError> {
			Ok([x.parse().map_err(ArcadeError::Number)?, y.parse().map_err(ArcadeError::Number)?])
		};

		if let Some(caps) = button.captures(s) {
			let name = if &caps[1] == "A" { Button::A } else { Button::B };
			Ok(Either::Left((name, xy(&caps[2], &caps[3])?)))
		} else if let Some(caps) = prize.captures(s) {
			Ok(Either::Right(xy(&caps[1], &caps[2])?))
		} else {
			Err(ArcadeError::Format)
		}
	}
}
