// Copyright (c) 2022 Bastiaan Marinus van de Weerd

crate::util::mod_days! {
	16 => Volcano,
}
