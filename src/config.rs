//! # Workload Configuration
//!
//! Environment-variable configuration for the PetClinic workload. Goose owns
//! its own command line (host, users, hatch rate, run time); everything that
//! shapes the simulated user itself lives here.
//!
//! ## Environment Variables
//!
//! ### `PETCLINIC_BASE_PATH`
//!
//! Context path the API is mounted under. Normalized to start with `/` and
//! drop any trailing `/`; an empty value mounts the API at the root.
//!
//! Default: `/petclinic`
//!
//! ### `PETCLINIC_WAIT_MIN_MS` / `PETCLINIC_WAIT_MAX_MS`
//!
//! Bounds of the uniform random pause between two tasks of one user. Swapped
//! if given in the wrong order.
//!
//! Default: `1000` / `3000`
//!
//! ### `PETCLINIC_PET_TYPE_ID` / `PETCLINIC_PET_TYPE_NAME`
//!
//! Pet type attached to every created pet. It must exist on the target.
//!
//! Default: `3` / `lizard`
//!
//! ## Example
//!
//! ```bash
//! PETCLINIC_BASE_PATH=/ PETCLINIC_WAIT_MIN_MS=200 PETCLINIC_WAIT_MAX_MS=500 \
//! cargo run --release -- --host http://localhost:9966 -u20 -r5 -t2m
//! ```

use std::env;
use std::time::Duration;

use crate::model::PetType;

/// Workload configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTestConfig {
    /// Normalized context path, e.g. `/petclinic`
    pub base_path: String,
    /// Shortest pause between tasks
    pub wait_min: Duration,
    /// Longest pause between tasks
    pub wait_max: Duration,
    /// Pet type used for every created pet
    pub pet_type: PetType,
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            base_path: "/petclinic".to_string(),
            wait_min: Duration::from_millis(1000),
            wait_max: Duration::from_millis(3000),
            pet_type: PetType::default(),
        }
    }
}

impl LoadTestConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unparseable values
    /// fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let millis = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        let base_path = lookup("PETCLINIC_BASE_PATH")
            .map(|raw| normalize_base_path(&raw))
            .unwrap_or(defaults.base_path);
        let mut wait_min = millis("PETCLINIC_WAIT_MIN_MS", defaults.wait_min);
        let mut wait_max = millis("PETCLINIC_WAIT_MAX_MS", defaults.wait_max);
        if wait_min > wait_max {
            std::mem::swap(&mut wait_min, &mut wait_max);
        }
        let pet_type = PetType {
            id: lookup("PETCLINIC_PET_TYPE_ID")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.pet_type.id),
            name: lookup("PETCLINIC_PET_TYPE_NAME")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.pet_type.name),
        };

        Self {
            base_path,
            wait_min,
            wait_max,
            pet_type,
        }
    }

    pub fn paths(&self) -> ApiPaths {
        ApiPaths::new(&self.base_path)
    }
}

/// Leading `/`, no trailing `/`; `""` and `"/"` both mean the root.
pub fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Request paths under a base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    base: String,
}

impl ApiPaths {
    pub fn new(base_path: &str) -> Self {
        Self {
            base: normalize_base_path(base_path),
        }
    }

    pub fn owners(&self) -> String {
        format!("{}/api/owners", self.base)
    }

    pub fn owner(&self, owner_id: i64) -> String {
        format!("{}/api/owners/{}", self.base, owner_id)
    }

    pub fn owner_pets(&self, owner_id: i64) -> String {
        format!("{}/api/owners/{}/pets", self.base, owner_id)
    }

    pub fn pets(&self) -> String {
        format!("{}/api/pets", self.base)
    }

    pub fn pet(&self, pet_id: i64) -> String {
        format!("{}/api/pets/{}", self.base, pet_id)
    }

    pub fn vets(&self) -> String {
        format!("{}/api/vets", self.base)
    }

    pub fn visits(&self) -> String {
        format!("{}/api/visits", self.base)
    }

    pub fn health(&self) -> String {
        format!("{}/actuator/health", self.base)
    }
}
