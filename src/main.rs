use petclinic_loadtest::{attack, logging};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logging(&logging::LogConfig::from_env())?;
    info!(config = ?attack::config(), "starting PetClinic load test");

    attack::run_attack()
        .await
        .map_err(|e| anyhow::anyhow!("goose attack failed: {}", e))?;

    println!("\nPetClinic task outcomes\n");
    println!("{}", attack::stats().render());
    Ok(())
}
