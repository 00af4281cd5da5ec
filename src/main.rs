// Copyright (c) 2022 Bastiaan Marinus van de Weerd

mod config;
mod grid;
mod runner;
mod util;
mod year2022;
mod year2024;

use {clap::Parser as _, tracing::level_filters::LevelFilter, tracing_subscriber::EnvFilter};
use config::{Cli, Config};


fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let config = Config::new(&cli, &runner::years())?;

	let filter = EnvFilter::builder()
		.with_default_directive(LevelFilter::from_level(config.log_level).into())
		.from_env_lossy();
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.without_time()
		.with_target(false)
		.init();

	tracing::debug!("Running with {config:?}");
	runner::run(&config)
}
