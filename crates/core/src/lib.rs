//! # Biopanel Core
//!
//! Core logic for the Biopanel patient dashboard.
//!
//! This crate contains the in-memory measurement engine:
//! - Template catalog and deterministic seeding (`catalog`)
//! - The shared record repository (`repository`)
//! - The periodic value simulator (`simulator`)
//! - The read path used by the API (`query`) and the demo patient directory (`patients`)
//!
//! **No API concerns**: HTTP servers, routing and OpenAPI documents belong in `api-rest`.
//! Wire types come from `api-shared`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod patients;
pub mod query;
pub mod record;
pub mod repository;
pub mod simulator;

pub use api_shared::wire;

pub use catalog::{Catalog, MetricKind, Template};
pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use patients::PatientService;
pub use query::RecordQueryService;
pub use record::{BiomarkerRecord, PatientId, RecordId};
pub use repository::RecordRepository;
pub use simulator::{SimulatorHandle, TickReport, ValueSimulator};

use std::sync::Arc;

/// One seeded repository per metric kind.
///
/// Built once by the composition root; handlers and simulators receive `Arc` clones of the
/// repositories they need.
#[derive(Clone, Debug)]
pub struct Panels {
    biomarkers: Arc<RecordRepository>,
    biotrackers: Arc<RecordRepository>,
}

impl Panels {
    /// Seeds every metric kind for the configured patients.
    pub fn seeded(cfg: &CoreConfig) -> Self {
        let seed = |kind: MetricKind| {
            Arc::new(RecordRepository::seeded(&kind.catalog(), cfg.patient_ids()))
        };

        Self {
            biomarkers: seed(MetricKind::Biomarker),
            biotrackers: seed(MetricKind::Biotracker),
        }
    }

    pub fn repository(&self, kind: MetricKind) -> &Arc<RecordRepository> {
        match kind {
            MetricKind::Biomarker => &self.biomarkers,
            MetricKind::Biotracker => &self.biotrackers,
        }
    }

    pub fn query(&self, kind: MetricKind) -> RecordQueryService {
        RecordQueryService::new(kind, Arc::clone(self.repository(kind)))
    }

    /// Starts one simulator per metric kind.
    ///
    /// With a configured seed each kind gets a distinct derived seed so the two panels do not
    /// move in lockstep.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidTickInterval` if the configured interval is zero.
    pub fn spawn_simulators(&self, cfg: &CoreConfig) -> CoreResult<Vec<SimulatorHandle>> {
        MetricKind::ALL
            .iter()
            .enumerate()
            .map(|(offset, &kind)| {
                let seed = cfg.simulator_seed().map(|s| s.wrapping_add(offset as u64));
                let simulator =
                    ValueSimulator::with_seed(kind, Arc::clone(self.repository(kind)), seed);
                simulator::spawn(simulator, cfg.tick_interval())
            })
            .collect()
    }
}
