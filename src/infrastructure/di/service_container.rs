//! Service container for dependency injection
//!
//! Wires settings, the seed source and the outline store together. The
//! container is created once at startup and owns the store for the lifetime
//! of the process; nothing is held in statics.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::{bootstrap, OutlineStore, SeedOutcome};
use crate::config::{IdScheme, Settings};
use crate::domain::{IdGenerator, SequentialIds, UuidIds};
use crate::infrastructure::traits::{FileSeedSource, HttpSeedSource, SeedSource};

/// Container holding the application state and its collaborators.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Where the initial forest comes from; `None` disables seeding
    pub seed: Option<Arc<dyn SeedSource>>,

    store: OutlineStore,
}

impl ServiceContainer {
    /// Create a container with the seed source the settings ask for.
    pub fn new(settings: Settings) -> Self {
        let seed = seed_source_for(&settings);
        Self::with_deps(settings, seed)
    }

    /// Create a container with a custom seed source (for testing).
    pub fn with_deps(settings: Settings, seed: Option<Arc<dyn SeedSource>>) -> Self {
        let ids: Box<dyn IdGenerator> = match settings.id_scheme {
            IdScheme::Uuid => Box::new(UuidIds),
            IdScheme::Sequential => Box::new(SequentialIds::new()),
        };
        Self {
            settings: Arc::new(settings),
            seed,
            store: OutlineStore::with_ids(ids),
        }
    }

    /// Run the one-shot bulk load, if a seed source is configured.
    pub fn bootstrap(&mut self) -> SeedOutcome {
        match &self.seed {
            Some(source) => bootstrap(&mut self.store, source.as_ref()),
            None => {
                debug!("seeding disabled");
                SeedOutcome::Skipped
            }
        }
    }

    pub fn store(&self) -> &OutlineStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut OutlineStore {
        &mut self.store
    }
}

fn seed_source_for(settings: &Settings) -> Option<Arc<dyn SeedSource>> {
    if !settings.auto_seed {
        return None;
    }
    let source: Arc<dyn SeedSource> = match &settings.seed_file {
        Some(path) => Arc::new(FileSeedSource::new(path.clone())),
        None => Arc::new(HttpSeedSource::new(
            settings.seed_url.clone(),
            Duration::from_secs(settings.timeout_secs),
        )),
    };
    Some(source)
}
