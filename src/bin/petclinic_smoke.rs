//! One simulated user, run sequentially against a PetClinic instance.
//!
//! Sets up a session, runs the read-only tasks once per iteration, deletes
//! the pet and owner at the end, prints the outcome table and exits non-zero
//! if anything failed. Use it to check a target before pointing a full load
//! test at it.
//!
//! ```bash
//! cargo run --bin petclinic-smoke -- --host http://localhost:9966 --iterations 3
//! ```

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use petclinic_loadtest::config::normalize_base_path;
use petclinic_loadtest::{
    logging, Harness, LoadTestConfig, RandomFakeData, ReqwestApi, Task, TaskStats,
};
use tracing::info;

/// Smoke-test a PetClinic REST API with a single simulated user
#[derive(Parser, Debug)]
#[command(name = "petclinic-smoke", version, about, long_about = None)]
struct Cli {
    /// Target host, e.g. http://localhost:9966
    #[arg(long, env = "PETCLINIC_HOST", default_value = "http://localhost:9966")]
    host: String,

    /// Context path the API is mounted under (overrides PETCLINIC_BASE_PATH)
    #[arg(long)]
    base_path: Option<String>,

    /// How many times to sweep through the read-only tasks
    #[arg(long, default_value_t = 1)]
    iterations: u32,

    /// Seed for reproducible fake data
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&logging::LogConfig::from_env())?;

    let mut config = LoadTestConfig::from_env();
    if let Some(base_path) = &cli.base_path {
        config.base_path = normalize_base_path(base_path);
    }
    let harness = Harness::new(&config, Arc::new(TaskStats::new()));
    let mut client = ReqwestApi::new(&cli.host).context("failed to build HTTP client")?;
    let mut fake = match cli.seed {
        Some(seed) => RandomFakeData::seeded(seed),
        None => RandomFakeData::new(),
    };

    info!(host = %cli.host, base_path = %config.base_path, "starting smoke run");
    let session = harness.start_session(&mut client, &mut fake).await;
    info!(owner_id = ?session.owner_id, pet_id = ?session.pet_id, "session ready");

    for iteration in 1..=cli.iterations {
        for task in Task::ALL.into_iter().filter(|task| !task.is_delete()) {
            let outcome = harness.run_task(&mut client, &session, task).await;
            info!(iteration, request = task.name(), ?outcome, "task finished");
        }
    }
    for task in [Task::DeletePet, Task::DeleteOwner] {
        let outcome = harness.run_task(&mut client, &session, task).await;
        info!(request = task.name(), ?outcome, "task finished");
    }

    println!("{}", harness.stats().render());
    let failed = harness.stats().total_failed();
    if failed > 0 {
        bail!("{} request(s) failed", failed);
    }
    Ok(())
}
