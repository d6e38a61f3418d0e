use chrono::Utc;
use clap::Parser;
use projects_stargazers::{
	config::{Cli, Command, ConfigError, WatchArgs},
	pipeline::{RunError, RunOutcome, StargazersJob},
	schedule::run_every,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("Config: {source}")]
	Config {
		#[from]
		source: ConfigError,
	},
	#[error("Run: {source}")]
	Run {
		#[from]
		source: RunError,
	},
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	// A missing .env is normal; real deployments inject env directly.
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();

	utils_trace::init(&cli.log_level)
		.map_err(|source| MainError::TracingInit { source })?;

	match cli.command {
		Command::Run(args) => {
			let job = args.build_job()?;
			let outcome = job.run().await?;
			report(&job, outcome);
		}
		Command::Watch(args) => watch(&args).await?,
	}

	Ok(())
}

async fn watch(args: &WatchArgs) -> Result<(), MainError> {
	let job = args.job.build_job()?;
	let schedule = args.schedule()?;

	info!(
		repository = %job.repository,
		interval_secs = schedule.interval.as_secs(),
		weekdays_only = schedule.weekdays_only,
		"watching stargazers"
	);

	run_every(&job, &schedule, Utc::now, None).await;
	Ok(())
}

fn report(job: &StargazersJob, outcome: RunOutcome) {
	let verdict = match outcome {
		RunOutcome::Notified { .. } => "notified",
		RunOutcome::Skipped { .. } => "skipped",
	};
	info!(repository = %job.repository, stars = outcome.stars(), verdict, "run finished");
}
