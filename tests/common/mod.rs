// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use emuhue_lib::platform::{EntityState, Platform, ServiceData};
use emuhue_lib::storage::{ConfigStorage, LightConfig, MemoryStorage};
use emuhue_lib::{Job, JobFuture, LightRegistry, PlatformError, Scheduler, StorageError};
use serde_json::Value;

// ============================================================================
// Platform
// ============================================================================

/// A service call received by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    TurnOn { entity_id: String, data: ServiceData },
    TurnOff { entity_id: String, data: ServiceData },
}

impl Call {
    pub fn data(&self) -> &ServiceData {
        match self {
            Self::TurnOn { data, .. } | Self::TurnOff { data, .. } => data,
        }
    }
}

/// In-memory Home Assistant.
///
/// Service calls are recorded and applied to the stored entity the way Home
/// Assistant would report them on the next fetch.
#[derive(Debug, Default)]
pub struct MockPlatform {
    entities: parking_lot::Mutex<HashMap<String, EntityState>>,
    calls: parking_lot::Mutex<Vec<Call>>,
    fetches: AtomicUsize,
    fail_fetches: AtomicBool,
    fail_commands: AtomicBool,
    fetch_delay: parking_lot::Mutex<Option<Duration>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(self, entity: EntityState) -> Self {
        self.set_entity(entity);
        self
    }

    pub fn with_fetch_delay(self, delay: Duration) -> Self {
        *self.fetch_delay.lock() = Some(delay);
        self
    }

    pub fn set_entity(&self, entity: EntityState) {
        self.entities.lock().insert(entity.entity_id.clone(), entity);
    }

    pub fn entity(&self, entity_id: &str) -> Option<EntityState> {
        self.entities.lock().get(entity_id).cloned()
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().last().cloned()
    }

    fn apply(&self, entity_id: &str, on: bool, data: &ServiceData) {
        let mut entities = self.entities.lock();
        let entity = entities
            .entry(entity_id.to_string())
            .or_insert_with(|| EntityState::new(entity_id, "off"));

        entity.state = if on { "on" } else { "off" }.to_string();
        for key in ["brightness", "color_temp", "hs_color", "xy_color", "rgb_color"] {
            if let Some(value) = data.get(key) {
                entity.attributes.insert(key.to_string(), value.clone());
            }
        }
    }

    fn command(&self, call: Call, on: bool) -> Result<(), PlatformError> {
        let entity_id = match &call {
            Call::TurnOn { entity_id, .. } | Call::TurnOff { entity_id, .. } => entity_id.clone(),
        };
        let data = call.data().clone();
        self.calls.lock().push(call);

        if self.fail_commands.load(Ordering::SeqCst) {
            return Err(PlatformError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }

        self.apply(&entity_id, on, &data);
        Ok(())
    }
}

impl Platform for MockPlatform {
    async fn get_entity_state(&self, entity_id: &str) -> Result<EntityState, PlatformError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(PlatformError::Timeout(5000));
        }

        self.entity(entity_id)
            .ok_or_else(|| PlatformError::EntityNotFound(entity_id.to_string()))
    }

    async fn turn_on(&self, entity_id: &str, data: &ServiceData) -> Result<(), PlatformError> {
        let call = Call::TurnOn {
            entity_id: entity_id.to_string(),
            data: data.clone(),
        };
        self.command(call, true)
    }

    async fn turn_off(&self, entity_id: &str, data: &ServiceData) -> Result<(), PlatformError> {
        let call = Call::TurnOff {
            entity_id: entity_id.to_string(),
            data: data.clone(),
        };
        self.command(call, false)
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Storage whose writes can be made to fail.
///
/// Reads and id allocation go to the wrapped [`MemoryStorage`].
#[derive(Debug, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_writes: AtomicBool,
    failed_writes: AtomicUsize,
}

impl FlakyStorage {
    pub fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::SeqCst)
    }

    pub fn light(&self, light_id: &str) -> Option<LightConfig> {
        self.inner.light(light_id)
    }
}

impl ConfigStorage for FlakyStorage {
    async fn light_id_for_entity(&self, entity_id: &str) -> Result<String, StorageError> {
        self.inner.light_id_for_entity(entity_id).await
    }

    async fn light_config(&self, light_id: &str) -> Result<LightConfig, StorageError> {
        self.inner.light_config(light_id).await
    }

    async fn set_storage_value(
        &self,
        namespace: &str,
        key: &str,
        value: Value,
    ) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            self.failed_writes.fetch_add(1, Ordering::SeqCst);
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set_storage_value(namespace, key, value).await
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Scheduler that only records jobs; tests run them explicitly.
#[derive(Default)]
pub struct ManualScheduler {
    jobs: parking_lot::Mutex<Vec<(Duration, Job)>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn intervals(&self) -> Vec<Duration> {
        self.jobs.lock().iter().map(|(interval, _)| *interval).collect()
    }

    /// Runs every registered job once.
    pub async fn run_all(&self) {
        let runs: Vec<JobFuture> = self.jobs.lock().iter().map(|(_, job)| job()).collect();
        for run in runs {
            run.await;
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, job: Job) {
        self.jobs.lock().push((interval, job));
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub struct Harness {
    pub platform: Arc<MockPlatform>,
    pub storage: Arc<MemoryStorage>,
    pub scheduler: Arc<ManualScheduler>,
    pub registry: LightRegistry<MockPlatform, MemoryStorage>,
}

impl Harness {
    pub fn new(platform: MockPlatform, storage: MemoryStorage) -> Self {
        let platform = Arc::new(platform);
        let storage = Arc::new(storage);
        let scheduler = Arc::new(ManualScheduler::new());
        let registry = LightRegistry::new(
            Arc::clone(&platform),
            Arc::clone(&storage),
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
        );

        Self {
            platform,
            storage,
            scheduler,
            registry,
        }
    }

    pub fn with_entity(entity: EntityState) -> Self {
        Self::new(MockPlatform::new().with_entity(entity), MemoryStorage::new())
    }
}

/// An entity reporting `state` and the given supported color modes.
pub fn light_entity(entity_id: &str, state: &str, modes: &[&str]) -> EntityState {
    EntityState::new(entity_id, state).with_attribute("supported_color_modes", modes.to_vec())
}
