// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Curio worker binary.
//!
//! Reads one JSON job message per line from stdin and runs it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use curio_config::{LogFormat, LoggingConfig};
use curio_jobs::{JobFactory, ProcessOptions};
use curio_worker::{builtin_registry, Consumer, UPLOAD_DIR_SETTING};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Curio worker - runs queued file jobs.
#[derive(Parser, Debug)]
#[command(name = "curio-worker", about = "Curio job worker", version)]
struct Args {
	/// Config file path (defaults to /etc/curio/worker.toml)
	#[arg(long, env = "CURIO_CONFIG")]
	config: Option<PathBuf>,

	/// Decode and build jobs without performing them
	#[arg(long)]
	dry_run: bool,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

fn format_version_info() -> String {
	format!(
		"curio-worker version: {}\nPlatform:             {}-{}",
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}

fn init_tracing(logging: &LoggingConfig) {
	let (text, json) = match logging.format {
		LogFormat::Text => (
			Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
			None,
		),
		LogFormat::Json => (
			None,
			Some(
				tracing_subscriber::fmt::layer()
					.json()
					.with_writer(std::io::stderr),
			),
		),
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| logging.level.clone().into()),
		)
		.with(text)
		.with(json)
		.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", format_version_info());
		return Ok(());
	}

	let config = match &args.config {
		Some(path) => curio_config::load_config_with_file(path),
		None => curio_config::load_config(),
	}
	.context("failed to load configuration")?;

	init_tracing(&config.logging);

	tracing::info!(
		sources = ?config.sources,
		config_file = ?args.config,
		adapter = ?config.storage.adapter,
		job_options = config.jobs.options.len(),
		log_level = %config.logging.level,
		log_format = ?config.logging.format,
		"configuration loaded"
	);
	if !config.jobs.options.contains_key(UPLOAD_DIR_SETTING) {
		tracing::warn!(
			setting = UPLOAD_DIR_SETTING,
			"no upload directory configured; StoreFileJob messages will be rejected"
		);
	}

	tracing::info!(dry_run = args.dry_run, "starting curio-worker");

	let storage = curio_storage::adapter_from_config(&config.storage)
		.context("failed to configure storage")?;
	storage
		.set_up()
		.await
		.context("failed to set up storage")?;
	if !storage.can_store().await {
		tracing::warn!(adapter = storage.name(), "storage is not currently writable");
	}

	let registry = builtin_registry().context("failed to register built-in jobs")?;
	let process = ProcessOptions::new(config.jobs.options.clone()).with_storage(storage);
	let factory = JobFactory::new(Arc::new(registry), process);
	let consumer = Consumer::new(factory).dry_run(args.dry_run);

	let stdin = tokio::io::BufReader::new(tokio::io::stdin());
	let summary = consumer.run(stdin).await.context("failed to read job messages")?;

	if summary.failed > 0 {
		anyhow::bail!(
			"{} of {} job messages failed",
			summary.failed,
			summary.processed
		);
	}
	Ok(())
}
