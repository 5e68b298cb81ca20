//! # Simulated User Session
//!
//! One session per simulated user:
//!
//! 1. **Setup** runs once: [`Harness::create_owner`], then
//!    [`Harness::create_pet`] under that owner. Both fail soft; the
//!    resulting [`Session`] may hold no identifiers at all.
//! 2. **Tasks** run repeatedly, picked at random by the host runner. Each
//!    [`Task`] is one request with one assertion.
//!
//! Every action returns `Result<_, TaskError>`. [`Harness::start_session`]
//! and [`Harness::run_task`] are where those results get logged, counted and
//! dropped, so no failure ever reaches the runner or ends the session.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use tracing::{debug, error, warn};

use crate::client::{ApiClient, ApiRequest};
use crate::config::{ApiPaths, LoadTestConfig};
use crate::error::TaskError;
use crate::fake::{normalize_telephone, FakeData};
use crate::model::{CreatedEntity, Owner, Pet, PetType};
use crate::stats::{Outcome, TaskStats};

/// Draws of a phone number before owner creation gives up.
const TELEPHONE_ATTEMPTS: usize = 5;

/// Identifiers created during setup, private to one simulated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    pub owner_id: Option<i64>,
    pub pet_id: Option<i64>,
}

/// Setup steps, named as they appear in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStep {
    CreateOwner,
    CreatePet,
}

impl SetupStep {
    pub fn name(&self) -> &'static str {
        match self {
            SetupStep::CreateOwner => "Create Owner",
            SetupStep::CreatePet => "Create Pet",
        }
    }
}

/// Independently schedulable tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    ListOwners,
    ListPets,
    ListVets,
    ListVisits,
    HealthCheck,
    DeletePet,
    DeleteOwner,
}

impl Task {
    pub const ALL: [Task; 7] = [
        Task::ListOwners,
        Task::ListPets,
        Task::ListVets,
        Task::ListVisits,
        Task::HealthCheck,
        Task::DeletePet,
        Task::DeleteOwner,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Task::ListOwners => "Get Owners",
            Task::ListPets => "Get Pets",
            Task::ListVets => "Get Vets",
            Task::ListVisits => "Get Visits",
            Task::HealthCheck => "Get Health",
            Task::DeletePet => "Delete Pet",
            Task::DeleteOwner => "Delete Owner",
        }
    }

    /// One task drawn uniformly from [`Task::ALL`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Task {
        Task::ALL[rng.gen_range(0..Task::ALL.len())]
    }

    /// Deletes remove the session's own records; they succeed at most once.
    pub fn is_delete(&self) -> bool {
        matches!(self, Task::DeletePet | Task::DeleteOwner)
    }
}

/// Result of one logged-and-swallowed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    /// Not attempted; no request was sent
    Skipped,
    Failed(TaskError),
}

impl TaskOutcome {
    fn from_result<T>(result: &Result<T, TaskError>) -> Self {
        match result {
            Ok(_) => TaskOutcome::Succeeded,
            Err(TaskError::Skipped(_)) => TaskOutcome::Skipped,
            Err(err) => TaskOutcome::Failed(err.clone()),
        }
    }

    fn as_stat(&self) -> Outcome {
        match self {
            TaskOutcome::Succeeded => Outcome::Succeeded,
            TaskOutcome::Skipped => Outcome::Skipped,
            TaskOutcome::Failed(_) => Outcome::Failed,
        }
    }
}

/// Everything a simulated user needs besides its transport and fake data.
///
/// Shared read-only by all users; only [`TaskStats`] is mutated, and that
/// is concurrent.
#[derive(Debug, Clone)]
pub struct Harness {
    paths: ApiPaths,
    pet_type: PetType,
    stats: Arc<TaskStats>,
}

impl Harness {
    pub fn new(config: &LoadTestConfig, stats: Arc<TaskStats>) -> Self {
        Self {
            paths: config.paths(),
            pet_type: config.pet_type.clone(),
            stats,
        }
    }

    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    /// Build a randomized owner with `id: null`.
    pub fn build_owner<F: FakeData>(&self, fake: &mut F) -> Result<Owner, TaskError> {
        let mut telephone = normalize_telephone(&fake.phone_number());
        for _ in 1..TELEPHONE_ATTEMPTS {
            if telephone.is_ok() {
                break;
            }
            telephone = normalize_telephone(&fake.phone_number());
        }
        Ok(Owner {
            id: None,
            first_name: fake.first_name(),
            last_name: fake.last_name(),
            address: fake.street_address(),
            city: fake.city(),
            telephone: telephone?,
            pets: None,
        })
    }

    /// Build a randomized pet nested under `owner_id`, born within the last
    /// fifteen years of `today`.
    pub fn build_pet<F: FakeData>(
        &self,
        fake: &mut F,
        owner_id: i64,
        today: NaiveDate,
    ) -> Result<Pet, TaskError> {
        let mut owner = self.build_owner(fake)?;
        owner.id = Some(owner_id);
        owner.pets = Some(Vec::new());
        Ok(Pet {
            id: None,
            owner,
            name: fake.pet_name(),
            birth_date: fake.birth_date(today),
            pet_type: self.pet_type.clone(),
        })
    }

    /// `POST /api/owners` and return the assigned owner id.
    pub async fn create_owner<C, F>(&self, client: &mut C, fake: &mut F) -> Result<i64, TaskError>
    where
        C: ApiClient,
        F: FakeData,
    {
        let owner = self.build_owner(fake)?;
        let request = ApiRequest::post(
            self.paths.owners(),
            SetupStep::CreateOwner.name(),
            serde_json::to_value(&owner)?,
        );
        let response = client.send(request).await?.error_for_status()?;
        CreatedEntity::parse_id(&response.body, "owner")
    }

    /// `POST /api/owners/{ownerId}/pets` and return the assigned pet id.
    ///
    /// Without an owner no request is sent and the result is
    /// [`TaskError::Skipped`].
    pub async fn create_pet<C, F>(
        &self,
        client: &mut C,
        fake: &mut F,
        owner_id: Option<i64>,
    ) -> Result<i64, TaskError>
    where
        C: ApiClient,
        F: FakeData,
    {
        let Some(owner_id) = owner_id else {
            return Err(TaskError::Skipped("no owner to attach the pet to"));
        };
        let pet = self.build_pet(fake, owner_id, Utc::now().date_naive())?;
        let request = ApiRequest::post(
            self.paths.owner_pets(owner_id),
            SetupStep::CreatePet.name(),
            serde_json::to_value(&pet)?,
        );
        let response = client.send(request).await?.error_for_status()?;
        CreatedEntity::parse_id(&response.body, "pet")
    }

    /// Run setup for one simulated user. Never fails.
    pub async fn start_session<C, F>(&self, client: &mut C, fake: &mut F) -> Session
    where
        C: ApiClient,
        F: FakeData,
    {
        let owner = self.create_owner(client, fake).await;
        let owner_id = self.settle_setup(client, SetupStep::CreateOwner, owner);
        let pet = self.create_pet(client, fake, owner_id).await;
        let pet_id = self.settle_setup(client, SetupStep::CreatePet, pet);
        debug!(?owner_id, ?pet_id, "session started");
        Session { owner_id, pet_id }
    }

    fn settle_setup<C: ApiClient>(
        &self,
        client: &mut C,
        step: SetupStep,
        result: Result<i64, TaskError>,
    ) -> Option<i64> {
        let outcome = TaskOutcome::from_result(&result);
        self.stats.record(step.name(), outcome.as_stat());
        match result {
            Ok(id) => Some(id),
            Err(TaskError::Skipped(reason)) => {
                debug!(request = step.name(), reason, "setup step skipped");
                None
            }
            Err(err) => {
                if err.is_response_shape() {
                    client.flag_failure(&err.to_string());
                }
                error!(request = step.name(), error = %err, "setup step failed");
                None
            }
        }
    }

    /// Run one task, log and count its outcome. Never fails.
    pub async fn run_task<C: ApiClient>(
        &self,
        client: &mut C,
        session: &Session,
        task: Task,
    ) -> TaskOutcome {
        let result = match task {
            Task::ListOwners => self.list_owners(client).await,
            Task::ListPets => self.list_pets(client).await,
            Task::ListVets => self.list_vets(client).await,
            Task::ListVisits => self.list_visits(client).await,
            Task::HealthCheck => self.health_check(client).await,
            Task::DeletePet => self.delete_pet(client, session.pet_id).await,
            Task::DeleteOwner => self.delete_owner(client, session.owner_id).await,
        };
        let outcome = TaskOutcome::from_result(&result);
        self.stats.record(task.name(), outcome.as_stat());
        match &outcome {
            TaskOutcome::Succeeded => {}
            TaskOutcome::Skipped => debug!(request = task.name(), "task skipped"),
            TaskOutcome::Failed(err) => {
                if err.is_response_shape() {
                    client.flag_failure(&err.to_string());
                }
                warn!(request = task.name(), error = %err, "task failed");
            }
        }
        outcome
    }

    pub async fn list_owners<C: ApiClient>(&self, client: &mut C) -> Result<(), TaskError> {
        self.list(client, self.paths.owners(), Task::ListOwners, "Owners")
            .await
    }

    pub async fn list_pets<C: ApiClient>(&self, client: &mut C) -> Result<(), TaskError> {
        self.list(client, self.paths.pets(), Task::ListPets, "Pets")
            .await
    }

    pub async fn list_vets<C: ApiClient>(&self, client: &mut C) -> Result<(), TaskError> {
        self.list(client, self.paths.vets(), Task::ListVets, "Vets")
            .await
    }

    pub async fn list_visits<C: ApiClient>(&self, client: &mut C) -> Result<(), TaskError> {
        self.list(client, self.paths.visits(), Task::ListVisits, "Visits")
            .await
    }

    /// `GET /actuator/health`; the body must be an object with `status`.
    pub async fn health_check<C: ApiClient>(&self, client: &mut C) -> Result<(), TaskError> {
        let request = ApiRequest::get(self.paths.health(), Task::HealthCheck.name());
        let body = client.send(request).await?.error_for_status()?.json()?;
        if body.get("status").is_none() {
            return Err(TaskError::Assertion(
                "Health response missing 'status'".to_string(),
            ));
        }
        Ok(())
    }

    /// `DELETE /api/pets/{petId}`; skipped without a pet.
    pub async fn delete_pet<C: ApiClient>(
        &self,
        client: &mut C,
        pet_id: Option<i64>,
    ) -> Result<(), TaskError> {
        let Some(pet_id) = pet_id else {
            return Err(TaskError::Skipped("no pet to delete"));
        };
        self.delete(client, self.paths.pet(pet_id), Task::DeletePet)
            .await
    }

    /// `DELETE /api/owners/{ownerId}`; skipped without an owner.
    pub async fn delete_owner<C: ApiClient>(
        &self,
        client: &mut C,
        owner_id: Option<i64>,
    ) -> Result<(), TaskError> {
        let Some(owner_id) = owner_id else {
            return Err(TaskError::Skipped("no owner to delete"));
        };
        self.delete(client, self.paths.owner(owner_id), Task::DeleteOwner)
            .await
    }

    async fn list<C: ApiClient>(
        &self,
        client: &mut C,
        path: String,
        task: Task,
        label: &'static str,
    ) -> Result<(), TaskError> {
        let request = ApiRequest::get(path, task.name());
        let body = client.send(request).await?.error_for_status()?.json()?;
        if !body.is_array() {
            return Err(TaskError::Assertion(format!(
                "{} response is not a list",
                label
            )));
        }
        Ok(())
    }

    async fn delete<C: ApiClient>(
        &self,
        client: &mut C,
        path: String,
        task: Task,
    ) -> Result<(), TaskError> {
        let request = ApiRequest::delete(path, task.name());
        let response = client.send(request).await?.error_for_status()?;
        if !matches!(response.status, 200 | 204) {
            return Err(TaskError::Assertion(format!(
                "Unexpected status code: {}",
                response.status
            )));
        }
        Ok(())
    }
}
