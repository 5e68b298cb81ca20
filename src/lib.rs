//! # petclinic-loadtest
//!
//! A synthetic workload for the Spring PetClinic REST API, driven by
//! [Goose](https://docs.rs/goose).
//!
//! Each simulated user creates an owner and a pet when it starts, then keeps
//! picking tasks at random: listing owners, pets, vets and visits, checking
//! health, and deleting the pet and owner it created. Every failure is soft:
//! it is logged, counted in [`stats::TaskStats`], and the user carries on.
//!
//! ## Modules
//!
//! - **[`session`]** - setup steps, tasks, and the log-and-continue policy
//! - **[`client`]** - the [`client::ApiClient`] seam plus a standalone reqwest client
//! - **[`attack`]** - Goose scenario and transactions
//! - **[`fake`]** - randomized owner and pet fields
//! - **[`model`]** - request and response records
//! - **[`stats`]** - per-request outcome counters
//! - **[`config`]** - environment configuration and request paths
//! - **[`logging`]** - tracing subscriber setup
//! - **[`error`]** - error types
//!
//! ## Using the harness without Goose
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use petclinic_loadtest::client::ReqwestApi;
//! use petclinic_loadtest::config::LoadTestConfig;
//! use petclinic_loadtest::fake::RandomFakeData;
//! use petclinic_loadtest::session::{Harness, Task};
//! use petclinic_loadtest::stats::TaskStats;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let harness = Harness::new(&LoadTestConfig::default(), Arc::new(TaskStats::new()));
//! let mut client = ReqwestApi::new("http://localhost:9966")?;
//! let session = harness
//!     .start_session(&mut client, &mut RandomFakeData::new())
//!     .await;
//! for task in Task::ALL {
//!     harness.run_task(&mut client, &session, task).await;
//! }
//! println!("{}", harness.stats().render());
//! # Ok(())
//! # }
//! ```

pub mod attack;
pub mod client;
pub mod config;
pub mod error;
pub mod fake;
pub mod logging;
pub mod model;
pub mod session;
pub mod stats;

pub use client::{ApiClient, ApiRequest, ApiResponse, ReqwestApi};
pub use config::{ApiPaths, LoadTestConfig};
pub use error::{ClientError, DataError, TaskError};
pub use fake::{FakeData, RandomFakeData};
pub use session::{Harness, Session, SetupStep, Task, TaskOutcome};
pub use stats::{Counts, Outcome, TaskStats};
