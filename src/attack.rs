//! # Goose Binding
//!
//! Wires the [`Harness`] into a Goose load test: one scenario, `PetclinicUser`,
//! with an on-start transaction that runs setup and a dispatcher transaction
//! that draws a random [`Task`] on every invocation. Goose does the rest:
//! spawning users, pacing them with the configured wait time, and reporting.
//!
//! ```bash
//! cargo run --release -- \
//!   --host http://localhost:9966 \
//!   -u50 -r10 -t5m \
//!   --report-file petclinic-report.html
//! ```
//!
//! Transactions always return `Ok(())`. Non-2xx answers still show up in the
//! Goose report because Goose records every status code; 2xx answers that
//! fail an assertion are flagged through [`GooseUser::set_failure`].

use std::sync::Arc;

use goose::metrics::{GooseMetrics, GooseRequestMetric};
use goose::prelude::*;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::client::{ApiClient, ApiRequest, ApiResponse, Method, ACCEPT, CONTENT_TYPE_JSON};
use crate::config::LoadTestConfig;
use crate::error::ClientError;
use crate::fake::RandomFakeData;
use crate::session::{Harness, Session, Task};
use crate::stats::TaskStats;

/// Host used when `--host` is not given.
pub const DEFAULT_HOST: &str = "http://localhost:9966";

/// Scenario name shown in the Goose report.
pub const SCENARIO_NAME: &str = "PetclinicUser";

/// Name of the on-start transaction.
pub const SETUP_TRANSACTION: &str = "Setup Session";

/// Name of the transaction that runs one random task per invocation.
pub const TASK_TRANSACTION: &str = "Run Task";

static CONFIG: Lazy<LoadTestConfig> = Lazy::new(LoadTestConfig::from_env);

static STATS: Lazy<Arc<TaskStats>> = Lazy::new(|| Arc::new(TaskStats::new()));

static HARNESS: Lazy<Harness> = Lazy::new(|| Harness::new(&CONFIG, Arc::clone(&STATS)));

/// Outcome counters of every simulated user in this process.
pub fn stats() -> &'static TaskStats {
    &STATS
}

/// Configuration the transactions run with.
pub fn config() -> &'static LoadTestConfig {
    &CONFIG
}

/// [`ApiClient`] that sends through a `GooseUser`, so requests are timed and
/// reported by Goose under their request name.
pub struct GooseApi<'a> {
    user: &'a mut GooseUser,
    last: Option<GooseRequestMetric>,
}

impl<'a> GooseApi<'a> {
    pub fn new(user: &'a mut GooseUser) -> Self {
        Self { user, last: None }
    }
}

impl ApiClient for GooseApi<'_> {
    async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let method = match request.method {
            Method::Get => GooseMethod::Get,
            Method::Post => GooseMethod::Post,
            Method::Delete => GooseMethod::Delete,
        };
        let mut request_builder = self
            .user
            .get_request_builder(&method, &request.path)
            .map_err(|e| ClientError::Transport(e.to_string()))?
            .header("Accept", ACCEPT);
        if let Some(body) = request.body_string() {
            request_builder = request_builder
                .header("Content-Type", CONTENT_TYPE_JSON)
                .body(body);
        }
        let goose_request = GooseRequest::builder()
            .set_request_builder(request_builder)
            .name(request.name)
            .build();

        let goose = self
            .user
            .request(goose_request)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        self.last = Some(goose.request);
        let response = goose
            .response
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }

    fn flag_failure(&mut self, reason: &str) {
        if let Some(mut metric) = self.last.take() {
            // set_failure reports the flagged request back as an error
            if let Err(flagged) = self.user.set_failure(reason, &mut metric, None, None) {
                debug!(error = ?flagged, "request flagged as failed");
            }
        }
    }
}

fn current_session(user: &GooseUser) -> Session {
    user.get_session_data::<Session>()
        .copied()
        .unwrap_or_default()
}

async fn run(user: &mut GooseUser, task: Task) -> TransactionResult {
    let session = current_session(user);
    HARNESS
        .run_task(&mut GooseApi::new(user), &session, task)
        .await;
    Ok(())
}

/// Create the owner and pet this user works with.
async fn setup_session(user: &mut GooseUser) -> TransactionResult {
    let mut fake = RandomFakeData::new();
    let session = HARNESS
        .start_session(&mut GooseApi::new(user), &mut fake)
        .await;
    user.set_session_data(session);
    Ok(())
}

/// Pick one task uniformly at random and run it. Every invocation is an
/// independent draw.
async fn run_random_task(user: &mut GooseUser) -> TransactionResult {
    let task = Task::random(&mut rand::thread_rng());
    run(user, task).await
}

/// The `PetclinicUser` scenario: setup on start, then one randomly drawn
/// task per iteration.
///
/// Requests keep their own names (`Get Owners`, `Delete Pet`, ...) in the
/// Goose report; only the transaction rows are merged.
///
/// # Errors
///
/// Returns an error if Goose rejects the wait-time bounds.
pub fn petclinic_scenario(config: &LoadTestConfig) -> Result<Scenario, GooseError> {
    let scenario = scenario!(SCENARIO_NAME)
        .set_wait_time(config.wait_min, config.wait_max)?
        .register_transaction(
            transaction!(setup_session)
                .set_name(SETUP_TRANSACTION)
                .set_on_start(),
        )
        .register_transaction(transaction!(run_random_task).set_name(TASK_TRANSACTION));
    Ok(scenario)
}

/// Parse Goose's command line and run the attack to completion.
///
/// # Errors
///
/// Returns any [`GooseError`] raised while configuring or running the attack.
/// Failed tasks are not errors.
pub async fn run_attack() -> Result<GooseMetrics, GooseError> {
    GooseAttack::initialize()?
        .register_scenario(petclinic_scenario(config())?)
        .set_default(GooseDefault::Host, DEFAULT_HOST)?
        .execute()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_scenario_draws_tasks_from_one_dispatcher() {
        let scenario = petclinic_scenario(&LoadTestConfig::default()).unwrap();
        assert_eq!(scenario.name, SCENARIO_NAME);

        let transactions: Vec<_> = scenario
            .transactions
            .iter()
            .map(|t| (t.name.clone(), t.on_start))
            .collect();
        assert_eq!(
            transactions,
            vec![
                (SETUP_TRANSACTION.to_string(), true),
                (TASK_TRANSACTION.to_string(), false),
            ]
        );
    }

    #[test]
    fn test_scenario_uses_configured_wait_time() {
        let config = LoadTestConfig {
            wait_min: Duration::from_millis(100),
            wait_max: Duration::from_millis(200),
            ..LoadTestConfig::default()
        };
        let scenario = petclinic_scenario(&config).unwrap();
        assert_eq!(
            scenario.transaction_wait,
            Some((Duration::from_millis(100), Duration::from_millis(200)))
        );
    }
}
