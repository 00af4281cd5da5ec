// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use std::collections::HashMap;
use crate::util::{Answers, Solver};


#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Label(u16);

const START: Label = Label(0);

#[cfg_attr(test, derive(Debug))]
struct Valve {
	flow_rate: usize,
	tunnels: Vec<Label>,
}

type Valves = HashMap<Label, Valve>;


/// The start valve (at index `0`) followed by every valve with a nonzero
/// flow rate, with the tunnel distances between them.
struct Network {
	labels: Vec<Label>,
	flow_rates: Vec<usize>,
	/// Bit set in opened-valve masks once the valve is open; `0` for the start.
	masks: Vec<u64>,
	/// Hop counts by origin & destination index; `None` if unreachable.
	distances: Vec<Vec<Option<usize>>>,
}

impl Network {
	fn new(valves: &Valves) -> Result<Self, VolcanoError> {
		use itertools::Itertools as _;

		if !valves.contains_key(&START) { return Err(VolcanoError::NoStart) }
		for (&label, valve) in valves.iter().sorted_by_key(|(l, _)| **l) {
			if let Some(&to) = valve.tunnels.iter().find(|t| !valves.contains_key(t)) {
				return Err(VolcanoError::UnknownTunnel { from: label, to })
			}
		}

		let labels = std::iter::once(START)
			.chain(valves.iter()
				.filter_map(|(l, v)| (v.flow_rate > 0).then_some(*l))
				.sorted())
			.collect::<Vec<_>>();
		if labels.len() > u64::BITS as usize + 1 {
			return Err(VolcanoError::TooManyValves(labels.len() - 1))
		}

		let flow_rates = labels.iter().enumerate()
			.map(|(i, l)| if i == 0 { 0 } else { valves[l].flow_rate })
			.collect();
		let masks = (0..labels.len())
			.map(|i| if i == 0 { 0 } else { 1 << (i - 1) })
			.collect();
		let distances = labels.iter()
			.map(|&from| Self::distances_from(valves, from, &labels))
			.collect::<Vec<_>>();

		for (from, distances) in labels.iter().zip(&distances) {
			tracing::debug!("Distances for {from}: {distances:?}");
		}

		Ok(Network { labels, flow_rates, masks, distances })
	}

	fn distances_from(valves: &Valves, from: Label, labels: &[Label]) -> Vec<Option<usize>> {
		use std::collections::{HashSet, VecDeque};

		// Breadth-first search, so the first visit is along a shortest path
		let mut distances = vec![None; labels.len()];
		let mut seen = HashSet::from([from]);
		let mut queue = VecDeque::from([(from, 0)]);

		while let Some((label, steps)) = queue.pop_front() {
			for (i, _) in labels.iter().enumerate().filter(|(_, l)| **l == label) {
				distances[i] = Some(steps);
			}
			for &tunnel in &valves[&label].tunnels {
				if seen.insert(tunnel) { queue.push_back((tunnel, steps + 1)) }
			}
		}

		distances
	}

	fn len(&self) -> usize {
		self.labels.len()
	}

	fn describe<const N: usize>(&self, path: &Path<N>) -> String {
		use itertools::Itertools as _;
		path.agents.iter()
			.map(|agent| format!("[{}]", agent.visited.iter().map(|&i| self.labels[i]).join(",")))
			.join(" / ")
	}
}


#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(Debug))]
struct Agent {
	/// Network indices, in visiting order.
	visited: Vec<usize>,
	elapsed: usize,
}

/// Either a complete path from the start, or (as stored in the memo) the
/// increment of some path over the state it extends.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(Debug))]
struct Path<const N: usize> {
	agents: [Agent; N],
	opened: u64,
	released: usize,
}

#[derive(PartialEq, Eq, Hash)]
struct Key<const N: usize> {
	/// Position & elapsed time per agent, in canonical order.
	agents: [(usize, usize); N],
	opened: u64,
}

impl<const N: usize> Path<N> {
	fn start() -> Self {
		Path {
			agents: std::array::from_fn(|_| Agent { visited: vec![0], elapsed: 0 }),
			opened: 0,
			released: 0,
		}
	}

	fn position(&self, agent: usize) -> usize {
		self.agents[agent].visited.last().copied().unwrap_or(0)
	}

	/// Sends `agent` to open the valve at `target`, as long as it gets
	/// opened before `budget` runs out.
	fn open(&self, network: &Network, agent: usize, target: usize, budget: usize) -> Option<Self> {
		let distance = network.distances[self.position(agent)][target]?;
		let elapsed = self.agents[agent].elapsed + distance + 1;
		if elapsed >= budget { return None }

		let mut next = self.clone();
		next.agents[agent].visited.push(target);
		next.agents[agent].elapsed = elapsed;
		next.opened |= network.masks[target];
		next.released += (budget - elapsed) * network.flow_rates[target];
		Some(next)
	}

	/// The increment of `self` over `base`, which `self` must extend.
	fn diff(&self, base: &Self) -> Self {
		Path {
			agents: std::array::from_fn(|i| Agent {
				visited: self.agents[i].visited[base.agents[i].visited.len()..].to_vec(),
				elapsed: self.agents[i].elapsed - base.agents[i].elapsed,
			}),
			opened: self.opened & !base.opened,
			released: self.released - base.released,
		}
	}

	fn merge(&self, increment: &Self) -> Self {
		Path {
			agents: std::array::from_fn(|i| Agent {
				visited: [&self.agents[i].visited[..], &increment.agents[i].visited[..]].concat(),
				elapsed: self.agents[i].elapsed + increment.agents[i].elapsed,
			}),
			opened: self.opened | increment.opened,
			released: self.released + increment.released,
		}
	}

	/// Agent indices sorted such that states differing only in which agent
	/// is where share a key.
	fn canonical_order(&self) -> [usize; N] {
		let mut order = std::array::from_fn(|i| i);
		order.sort_by_key(|&i| (self.position(i), self.agents[i].elapsed));
		order
	}

	fn key(&self, order: &[usize; N]) -> Key<N> {
		Key {
			agents: order.map(|i| (self.position(i), self.agents[i].elapsed)),
			opened: self.opened,
		}
	}

	fn reordered(&self, order: &[usize; N]) -> Self {
		Path { agents: order.map(|i| self.agents[i].clone()), ..self.clone() }
	}

	fn unreordered(&self, order: &[usize; N]) -> Self {
		let mut path = self.clone();
		for (k, &i) in order.iter().enumerate() {
			path.agents[i] = self.agents[k].clone();
		}
		path
	}
}


struct Search<'n, const N: usize> {
	network: &'n Network,
	budget: usize,
	/// Best increment reachable from each state seen so far.
	memo: Option<HashMap<Key<N>, Path<N>>>,
	calls: usize,
	hits: usize,
}

impl<'n, const N: usize> Search<'n, N> {
	fn new(network: &'n Network, budget: usize, memoize: bool) -> Self {
		Search { network, budget, memo: memoize.then(HashMap::new), calls: 0, hits: 0 }
	}

	fn best_path(&mut self, path: &Path<N>) -> Path<N> {
		self.calls += 1;
		if self.calls % 1_000_000 == 0 {
			tracing::debug!("{} calls, {} cache hits...", self.calls, self.hits);
		}

		let order = path.canonical_order();
		let key = path.key(&order);
		if let Some(increment) = self.memo.as_ref().and_then(|memo| memo.get(&key)) {
			self.hits += 1;
			return path.merge(&increment.unreordered(&order))
		}

		let mut best = path.clone();
		for target in 1..self.network.len() {
			if path.opened & self.network.masks[target] != 0 { continue }
			for agent in 0..N {
				let Some(next) = path.open(self.network, agent, target, self.budget)
					else { continue };
				let candidate = self.best_path(&next);
				if candidate.released > best.released { best = candidate }
			}
		}

		if let Some(memo) = self.memo.as_mut() {
			memo.insert(key, best.diff(path).reordered(&order));
		}
		best
	}
}

fn max_release<const N: usize>(network: &Network, budget: usize, memoize: bool) -> Path<N> {
	let t0 = std::time::Instant::now();
	let mut search = Search::<N>::new(network, budget, memoize);
	let best = search.best_path(&Path::start());
	tracing::info!("[{}] Found max flow is {}: {} ({} cache hits, {} calls, {} cache size) [{:.3?}]",
		N,
		best.released,
		network.describe(&best),
		search.hits,
		search.calls,
		search.memo.as_ref().map_or(0, HashMap::len),
		t0.elapsed());
	best
}


#[derive(Default)]
pub(crate) struct Volcano {
	valves: Valves,
}

pub(crate) use parsing::VolcanoError;

impl Solver for Volcano {
	type Error = VolcanoError;

	fn parse_line(&mut self, line: &str) -> Result<(), Self::Error> {
		if line.is_empty() { return Ok(()) }
		let (label, valve) = parsing::try_valve_from_str(line).map_err(VolcanoError::Valve)?;
		if self.valves.insert(label, valve).is_some() {
			return Err(VolcanoError::DuplicateValve(label))
		}
		Ok(())
	}

	fn solve(self) -> Result<Answers, Self::Error> {
		let network = Network::new(&self.valves)?;
		tracing::info!("Found {} valves, {} with flow", self.valves.len(), network.len() - 1);
		let part1 = max_release::<1>(&network, 30, true).released;
		let part2 = max_release::<2>(&network, 26, true).released;
		Ok(Answers::new(part1, part2))
	}
}


mod parsing {
	use std::num::ParseIntError;
	use super::{Label, Valve};

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) struct LabelError { column: usize, found: Option<u8> }

	fn try_label_from_str(s: &str) -> Result<(Label, &str), LabelError> {
		let mut bytes = s.bytes();
		match (bytes.next(), bytes.next()) {
			(None, _) => Err(LabelError { column: 1, found: None }),
			(Some(b), _) if !b.is_ascii_uppercase() =>
				Err(LabelError { column: 1, found: Some(b) }),
			(_, None) => Err(LabelError { column: 2, found: None }),
			(_, Some(b)) if !b.is_ascii_uppercase() =>
				Err(LabelError { column: 2, found: Some(b) }),
			(Some(b0), Some(b1)) => Ok((
				Label((((b0 - b'A') as u16) << 8) + (b1 - b'A') as u16),
				&s[2..],
			))
		}
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum ValveError {
		Format { column: usize },
		Label(LabelError),
		FlowRate(ParseIntError),
		Tunnel { offset: usize, source: LabelError },
	}

	pub(super) fn try_valve_from_str(s: &str) -> Result<(Label, Valve), ValveError> {
		use ValveError as E;
		let s0 = s;
		// `s` only ever shrinks from the front
		let c = |s: &str| s0.len() - s.len();
		let format_err = |s: &str| E::Format { column: c(s) + 1 };

		let s = s.strip_prefix("Valve ").ok_or_else(|| format_err(s))?;
		let (label, s) = try_label_from_str(s).map_err(|e|
			E::Label(LabelError { column: c(s) + e.column, ..e }))?;
		let s = s.strip_prefix(" has flow rate=").ok_or_else(|| format_err(s))?;
		let (flow_rate, s) = s.split_once(';').ok_or_else(|| format_err(s))?;
		let flow_rate = flow_rate.parse().map_err(E::FlowRate)?;

		let tunnels = if let Some(mut s) = s.strip_prefix(" tunnels lead to valves ") {
			let mut tunnels = vec![];
			for offset in 0.. {
				let (tunnel, rest) = try_label_from_str(s)
					.map_err(|e| E::Tunnel { offset, source: e })?;
				tunnels.push(tunnel);
				if rest.is_empty() { break }
				s = rest.strip_prefix(", ").ok_or_else(|| format_err(rest))?;
			}
			tunnels
		} else {
			let s = s.strip_prefix(" tunnel leads to valve ").ok_or_else(|| format_err(s))?;
			let (tunnel, rest) = try_label_from_str(s)
				.map_err(|e| E::Tunnel { offset: 0, source: e })?;
			if !rest.is_empty() { return Err(format_err(rest)) }
			vec![tunnel]
		};

		Ok((label, Valve { flow_rate, tunnels }))
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum VolcanoError {
		Valve(ValveError),
		DuplicateValve(Label),
		NoStart,
		UnknownTunnel { from: Label, to: Label },
		TooManyValves(usize),
	}
}

impl std::fmt::Display for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use std::fmt::Write as _;
		f.write_char((b'A' + ((self.0 & 0xff00) >> 8) as u8) as char)?;
		f.write_char((b'A' + (self.0 & 0x00ff) as u8) as char)?;
		Ok(())
	}
}

impl std::fmt::Debug for Label {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "\"{self}\"")
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	const INPUT: &str = indoc::indoc! { "
		Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
		Valve BB has flow rate=13; tunnels lead to valves CC, AA
		Valve CC has flow rate=2; tunnels lead to valves DD, BB
		Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
		Valve EE has flow rate=3; tunnels lead to valves FF, DD
		Valve FF has flow rate=0; tunnels lead to valves EE, GG
		Valve GG has flow rate=0; tunnels lead to valves FF, HH
		Valve HH has flow rate=22; tunnel leads to valve GG
		Valve II has flow rate=0; tunnels lead to valves AA, JJ
		Valve JJ has flow rate=21; tunnel leads to valve II
	" };

	const TINY: &str = indoc::indoc! { "
		Valve AA has flow rate=0; tunnels lead to valves BB, CC
		Valve BB has flow rate=13; tunnel leads to valve AA
		Valve CC has flow rate=2; tunnel leads to valve AA
	" };

	fn network(s: &str) -> Network {
		let mut volcano = Volcano::default();
		for line in s.lines() { volcano.parse_line(line).unwrap() }
		Network::new(&volcano.valves).unwrap()
	}

	/// Best release of a single agent opening only valves in `available`,
	/// trying every ordering of every subset.
	fn brute_force(network: &Network, budget: usize, available: &[usize]) -> usize {
		use itertools::Itertools as _;
		(0..=available.len())
			.flat_map(|k| available.iter().copied().permutations(k))
			.filter_map(|order| order.into_iter()
				.try_fold((0, 0, 0), |(pos, elapsed, released), target| {
					let elapsed = elapsed + network.distances[pos][target]? + 1;
					(elapsed < budget).then(|| (target, elapsed,
						released + (budget - elapsed) * network.flow_rates[target]))
				})
				.map(|(_, _, released)| released))
			.max()
			.unwrap_or(0)
	}

	/// Best release of two agents, over every split of the valves between them.
	fn brute_force_split(network: &Network, budget: usize) -> usize {
		let valves = (1..network.len()).collect::<Vec<_>>();
		(0u64..1 << valves.len())
			.map(|split| {
				let (mine, theirs): (Vec<usize>, Vec<usize>) = valves.iter()
					.partition(|&&v| split & network.masks[v] != 0);
				brute_force(network, budget, &mine) + brute_force(network, budget, &theirs)
			})
			.max()
			.unwrap_or(0)
	}

	#[test]
	fn tests() {
		assert_eq!(crate::util::solve_str::<Volcano>(INPUT), Answers::new(1651, 1707));
	}

	#[test]
	fn distances() {
		let network = network(INPUT);
		assert_eq!(network.labels.iter().map(ToString::to_string).collect::<Vec<_>>(),
			["AA", "BB", "CC", "DD", "EE", "HH", "JJ"]);
		assert_eq!(network.distances[0], [Some(0), Some(1), Some(2), Some(1), Some(2), Some(5), Some(2)]);
		for (i, row) in network.distances.iter().enumerate() {
			for (j, d) in row.iter().enumerate() {
				assert_eq!(*d, network.distances[j][i]);
			}
		}
	}

	#[test]
	fn tiny() {
		let network = network(TINY);
		let best = max_release::<1>(&network, 30, true);
		assert_eq!(best.released, 28 * 13 + 25 * 2);
		assert_eq!(best.agents[0].visited, [0, 1, 2]);
		assert_eq!(best.released, brute_force(&network, 30, &[1, 2]));
	}

	#[test]
	fn brute_force_agreement() {
		for input in [INPUT, TINY] {
			let network = network(input);
			let all = (1..network.len()).collect::<Vec<_>>();
			assert_eq!(max_release::<1>(&network, 30, true).released, brute_force(&network, 30, &all));
			assert_eq!(max_release::<2>(&network, 26, true).released, brute_force_split(&network, 26));
		}
	}

	#[test]
	fn memo_is_transparent() {
		let network = network(INPUT);
		for budget in [10, 20] {
			assert_eq!(max_release::<1>(&network, budget, true).released,
				max_release::<1>(&network, budget, false).released);
			assert_eq!(max_release::<2>(&network, budget, true).released,
				max_release::<2>(&network, budget, false).released);
		}
		assert_eq!(max_release::<2>(&network, 26, true), max_release::<2>(&network, 26, true));
	}

	#[test]
	fn more_agents_never_worse() {
		let network = network(INPUT);
		for budget in [5, 12, 26, 30] {
			assert!(max_release::<1>(&network, budget, true).released
				<= max_release::<2>(&network, budget, true).released);
		}
	}

	#[test]
	fn boundaries() {
		let network = network(INPUT);
		let best = max_release::<2>(&network, 26, true);
		for agent in &best.agents {
			assert!(agent.visited[1..].iter().all(|&i| network.flow_rates[i] > 0));
		}

		// `BB` is a single step from `AA`, so opening it takes two minutes
		let start = Path::<1>::start();
		assert!(start.open(&network, 0, 1, 2).is_none());
		assert_eq!(start.open(&network, 0, 1, 3).map(|p| p.released), Some(13));
		assert_eq!(max_release::<1>(&network, 2, true).released, 0);
	}

	#[test]
	fn diff_merge() {
		let network = network(INPUT);
		let path = Path::<2>::start().open(&network, 1, 3, 26).unwrap();
		let next = path.open(&network, 0, 1, 26).unwrap().open(&network, 1, 4, 26).unwrap();
		let increment = next.diff(&path);
		assert_eq!(increment.agents[0].visited, [1]);
		assert_eq!(increment.agents[1].visited, [4]);
		assert_eq!(increment.opened, network.masks[1] | network.masks[4]);
		assert_eq!(path.merge(&increment), next);

		let order = next.canonical_order();
		assert_eq!(next.reordered(&order).unreordered(&order), next);
	}

	#[test]
	fn errors() {
		let mut volcano = Volcano::default();
		assert!(matches!(volcano.parse_line("Valve AA has flow rate=x; tunnel leads to valve BB"),
			Err(VolcanoError::Valve(parsing::ValveError::FlowRate(_)))));
		assert!(matches!(volcano.parse_line("Valve Aa has flow rate=0; tunnel leads to valve BB"),
			Err(VolcanoError::Valve(parsing::ValveError::Label(_)))));
		assert!(matches!(volcano.parse_line("Valve AA has flow rate=0; tunnels lead to valves BB,CC"),
			Err(VolcanoError::Valve(parsing::ValveError::Format { column: 52 }))));

		let mut volcano = Volcano::default();
		volcano.parse_line("Valve BB has flow rate=1; tunnel leads to valve CC").unwrap();
		assert!(matches!(volcano.parse_line("Valve BB has flow rate=1; tunnel leads to valve CC"),
			Err(VolcanoError::DuplicateValve(Label(0x0101)))));
		assert!(matches!(volcano.solve(), Err(VolcanoError::NoStart)));

		let mut volcano = Volcano::default();
		volcano.parse_line("Valve AA has flow rate=0; tunnel leads to valve CC").unwrap();
		assert!(matches!(volcano.solve(), Err(VolcanoError::UnknownTunnel { .. })));
	}
}
