//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! from the simulator or during request handling.
//!
//! The `*_from_env_value` helpers take the raw `Option<String>` so they can be tested without
//! touching the process environment.

use crate::constants::{DEFAULT_PATIENT_IDS, DEFAULT_TICK_INTERVAL_MS};
use crate::record::PatientId;
use crate::{CoreError, CoreResult};
use std::collections::HashSet;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct CoreConfig {
    tick_interval: Duration,
    patient_ids: Vec<PatientId>,
    simulator_enabled: bool,
    simulator_seed: Option<u64>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            patient_ids: DEFAULT_PATIENT_IDS.to_vec(),
            simulator_enabled: true,
            simulator_seed: None,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidTickInterval` for a zero interval and
    /// `CoreError::InvalidInput` for an empty or duplicated patient-id list.
    pub fn new(
        tick_interval: Duration,
        patient_ids: Vec<PatientId>,
        simulator_enabled: bool,
        simulator_seed: Option<u64>,
    ) -> CoreResult<Self> {
        if tick_interval.is_zero() {
            return Err(CoreError::InvalidTickInterval(
                "tick interval must be greater than zero".into(),
            ));
        }
        if patient_ids.is_empty() {
            return Err(CoreError::InvalidInput(
                "patient id list cannot be empty".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(patient_ids.len());
        if let Some(dup) = patient_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(CoreError::InvalidInput(format!(
                "patient id {dup} listed more than once"
            )));
        }

        Ok(Self {
            tick_interval,
            patient_ids,
            simulator_enabled,
            simulator_seed,
        })
    }

    /// Resolve configuration from the `BIOPANEL_*` environment variables.
    ///
    /// Intended to be called once by a binary's `main`.
    pub fn from_process_env() -> CoreResult<Self> {
        Self::new(
            tick_interval_from_env_value(std::env::var("BIOPANEL_TICK_MS").ok())?,
            patient_ids_from_env_value(std::env::var("BIOPANEL_PATIENT_IDS").ok())?,
            simulator_enabled_from_env_value(std::env::var("BIOPANEL_SIMULATOR").ok())?,
            seed_from_env_value(std::env::var("BIOPANEL_SEED").ok())?,
        )
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn patient_ids(&self) -> &[PatientId] {
        &self.patient_ids
    }

    pub fn simulator_enabled(&self) -> bool {
        self.simulator_enabled
    }

    pub fn simulator_seed(&self) -> Option<u64> {
        self.simulator_seed
    }
}

/// Treats `None` and blank values as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the simulator period in milliseconds. Unset means the 1 second default.
pub fn tick_interval_from_env_value(value: Option<String>) -> CoreResult<Duration> {
    let Some(raw) = non_blank(value) else {
        return Ok(Duration::from_millis(DEFAULT_TICK_INTERVAL_MS));
    };

    let millis: u64 = raw
        .parse()
        .map_err(|e| CoreError::InvalidTickInterval(format!("'{raw}': {e}")))?;
    if millis == 0 {
        return Err(CoreError::InvalidTickInterval(
            "tick interval must be greater than zero".into(),
        ));
    }
    Ok(Duration::from_millis(millis))
}

/// Parse a comma-separated patient-id list. Unset means ids `1..=5`.
pub fn patient_ids_from_env_value(value: Option<String>) -> CoreResult<Vec<PatientId>> {
    let Some(raw) = non_blank(value) else {
        return Ok(DEFAULT_PATIENT_IDS.to_vec());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<PatientId>()
                .map_err(|source| CoreError::InvalidPatientId {
                    value: part.to_string(),
                    source,
                })
        })
        .collect()
}

/// Parse the simulator switch. Unset means enabled.
pub fn simulator_enabled_from_env_value(value: Option<String>) -> CoreResult<bool> {
    match non_blank(value).map(|v| v.to_ascii_lowercase()).as_deref() {
        None | Some("true") | Some("1") | Some("yes") | Some("on") => Ok(true),
        Some("false") | Some("0") | Some("no") | Some("off") => Ok(false),
        Some(other) => Err(CoreError::InvalidFlag(other.to_string())),
    }
}

/// Parse an optional RNG seed.
pub fn seed_from_env_value(value: Option<String>) -> CoreResult<Option<u64>> {
    non_blank(value)
        .map(|raw| raw.parse::<u64>().map_err(CoreError::InvalidSeed))
        .transpose()
}
