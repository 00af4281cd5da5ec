// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use crate::util::{Answers, Solver};


mod cpu {
	/// Instructions executed before a program is deemed not to halt.
	const STEP_LIMIT: usize = 1_000_000;

	#[allow(dead_code)]
	#[derive(Debug, PartialEq, Eq)]
	pub(crate) enum RunError {
		Combo { ip: usize, operand: u8 },
		StepLimit,
	}

	pub(super) struct Cpu<'p> {
		program: &'p [u8],
		pub(super) registers: [u64; 3],
		ip: usize,
	}

	fn divide(a: u64, exp: u64) -> u64 {
		u32::try_from(exp).ok().and_then(|exp| a.checked_shr(exp)).unwrap_or(0)
	}

	impl<'p> Cpu<'p> {
		pub(super) fn new(program: &'p [u8], registers: [u64; 3]) -> Self {
			Cpu { program, registers, ip: 0 }
		}

		fn combo(&self, operand: u8) -> Result<u64, RunError> {
			match operand {
				0..=3 => Ok(operand as u64),
				4..=6 => Ok(self.registers[operand as usize - 4]),
				_ => Err(RunError::Combo { ip: self.ip, operand }),
			}
		}

		/// Executes the instruction at the pointer, returning what it outputs
		/// (if anything). `None` once halted.
		fn step(&mut self) -> Option<Result<Option<u8>, RunError>> {
			let Some(&[opcode, operand]) = self.program.get(self.ip..self.ip + 2)
				else { return None };
			let [a, b, c] = self.registers;
			tracing::trace!("A={a}, B={b}, C={c} - IP {} - {opcode} {operand}", self.ip);

			macro_rules! combo { () => {
				match self.combo(operand) { Ok(v) => v, Err(e) => return Some(Err(e)) }
			} }

			let mut output = None;
			match opcode {
				0 => self.registers[0] = divide(a, combo!()),
				1 => self.registers[1] = b ^ operand as u64,
				2 => self.registers[1] = combo!() % 8,
				3 => if a != 0 {
					self.ip = operand as usize;
					return Some(Ok(None))
				},
				4 => self.registers[1] = b ^ c,
				5 => output = Some((combo!() % 8) as u8),
				6 => self.registers[1] = divide(a, combo!()),
				7 => self.registers[2] = divide(a, combo!()),
				_ => unreachable!("program values are three-bit"),
			}
			self.ip += 2;
			Some(Ok(output))
		}

		pub(super) fn run(&mut self) -> Result<Vec<u8>, RunError> {
			let mut output = vec![];
			let mut steps = 0;
			while let Some(result) = self.step() {
				steps += 1;
				if steps > STEP_LIMIT { return Err(RunError::StepLimit) }
				output.extend(result?);
			}
			Ok(output)
		}
	}
}

use cpu::{Cpu, RunError};

/// Smallest positive value for register A making `program` output itself.
///
/// Assumes the program loops, dropping the lowest three bits of A on every
/// iteration, so A can be built up three bits at a time: each extension
/// must reproduce one more value from the end of the program. Candidates
/// the program fails to run with never match.
fn self_replicating(program: &[u8], [_, b, c]: [u64; 3]) -> Option<u64> {
	fn extend(program: &[u8], b: u64, c: u64, a: u64, matched: usize) -> Option<u64> {
		if matched == program.len() { return (a > 0).then_some(a) }
		let shifted = a.checked_mul(8)?;
		(0..8).map(|bits| shifted | bits)
			.filter(|&candidate| candidate != 0)
			.filter(|&candidate| match Cpu::new(program, [candidate, b, c]).run() {
				Ok(output) => output[..] == program[program.len() - matched - 1..],
				Err(e) => {
					tracing::debug!("Candidate {candidate} does not run: {e:?}");
					false
				}
			})
			.find_map(|candidate| extend(program, b, c, candidate, matched + 1))
	}

	extend(program, b, c, 0, 0)
}


#[derive(Default)]
pub(crate) struct Computer {
	registers: [u64; 3],
	program: Option<Vec<u8>>,
}

pub(crate) use parsing::ComputerError;

impl Solver for Computer {
	type Error = ComputerError;

	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
		use parsing::Line;
		match parsing::try_line_from_str(line)? {
			Line::Blank => (),
			Line::Register(r, value) => self.registers[r] = value,
			Line::Program(program) => {
				if self.program.replace(program).is_some() {
					return Err(ComputerError::DuplicateProgram)
				}
			}
		}
		Ok(())
	}

	fn solve(self) -> Result<Answers, Self::Error> {
		use itertools::Itertools as _;

		let program = self.program.ok_or(ComputerError::NoProgram)?;
		tracing::info!("Program: {program:?}");

		let mut cpu = Cpu::new(&program, self.registers);
		let output = cpu.run().map_err(ComputerError::Run)?;
		tracing::debug!("Halted with registers {:?}", cpu.registers);

		let a = self_replicating(&program, self.registers);
		if a.is_none() { tracing::debug!("Program does not replicate itself") }

		Ok(Answers {
			part1: Some(output.iter().join(",")),
			part2: a.map(|a| a.to_string()),
		})
	}
}


mod parsing {
	use std::num::ParseIntError;
	use super::RunError;

	pub(super) enum Line {
		Blank,
		Register(usize, u64),
		Program(Vec<u8>),
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum ComputerError {
		Format,
		Register(ParseIntError),
		Value { offset: usize, source: Option<ParseIntError> },
		DuplicateProgram,
		NoProgram,
		Run(RunError),
	}

	pub(super) fn try_line_from_str(s: &str) -> Result<Line, ComputerError> {
		use ComputerError as E;

		if s.is_empty() { return Ok(Line::Blank) }
		for (r, name) in ["A", "B", "C"].into_iter().enumerate() {
			if let Some(value) = s.strip_prefix("Register ")
				.and_then(|s| s.strip_prefix(name))
				.and_then(|s| s.strip_prefix(": ")) {
				return Ok(Line::Register(r, value.parse().map_err(E::Register)?))
			}
		}

		let values = s.strip_prefix("Program: ").ok_or(E::Format)?;
		values.split(',')
			.enumerate()
			.map(|(offset, v)| match v.parse::<u8>() {
				Ok(v) if v < 8 => Ok(v),
				Ok(_) => Err(E::Value { offset, source: None }),
				Err(e) => Err(E::Value { offset, source: Some(e) }),
			})
			.collect::<Result<Vec<_>, _>>()
			.map(Line::Program)
	}
}
