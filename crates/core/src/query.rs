//! Read path exposed to the API boundary.

use crate::catalog::MetricKind;
use crate::record::PatientId;
use crate::repository::RecordRepository;
use api_shared::wire;
use std::sync::Arc;

/// Stateless filter layer over one repository.
#[derive(Clone, Debug)]
pub struct RecordQueryService {
    kind: MetricKind,
    repository: Arc<RecordRepository>,
}

impl RecordQueryService {
    pub fn new(kind: MetricKind, repository: Arc<RecordRepository>) -> Self {
        Self { kind, repository }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    /// Records of `patient_id`, optionally restricted to `category` (case-insensitive).
    ///
    /// # Returns
    /// The matching records in seed order, rendered in the client JSON shape. An unknown
    /// patient or category yields an empty vector.
    pub fn records_for_patient(
        &self,
        patient_id: PatientId,
        category: Option<&str>,
    ) -> Vec<wire::Record> {
        self.repository
            .find_by_patient(patient_id, category)
            .iter()
            .map(|r| r.to_wire())
            .collect()
    }
}
