// Copyright (c) 2022 Bastiaan Marinus van de Weerd

crate::util::mod_days! {
	12 => Garden,
	13 => Arcade,
	16 => Maze,
	17 => Computer,
	18 => MemorySpace,
}
