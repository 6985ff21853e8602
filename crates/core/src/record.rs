//! Measurement records.
//!
//! A [`BiomarkerRecord`] is one patient's instance of a catalog template. Its `status` is never
//! stored independently: every value assignment goes through [`BiomarkerRecord::assign_value`],
//! which sets `value`, `measured_at` and `status` together.

use crate::catalog::Template;
use api_shared::wire::{self, ReferenceRange, Status};
use chrono::{DateTime, SecondsFormat, Utc};

pub type RecordId = u64;
pub type PatientId = i64;

/// Classifies `value` against `range`.
///
/// `Low` iff `value < min`, `High` iff `value > max`, otherwise `Normal`.
pub fn classify(value: f64, range: &ReferenceRange) -> Status {
    if value < range.min {
        Status::Low
    } else if value > range.max {
        Status::High
    } else {
        Status::Normal
    }
}

/// Rounds to two decimal places.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Renders a timestamp the way the dashboard client expects (`...Z`, no offset).
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[derive(Clone, Debug, PartialEq)]
pub struct BiomarkerRecord {
    id: RecordId,
    patient_id: PatientId,
    name: String,
    unit: String,
    category: String,
    reference_range: ReferenceRange,
    value: f64,
    status: Status,
    measured_at: DateTime<Utc>,
}

impl BiomarkerRecord {
    /// Creates a record for `patient_id` from `template`, deriving the status from `value`.
    pub fn new(
        id: RecordId,
        patient_id: PatientId,
        template: &Template,
        value: f64,
        measured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            patient_id,
            name: template.name.clone(),
            unit: template.unit.clone(),
            category: template.category.clone(),
            reference_range: template.reference_range,
            value,
            status: classify(value, &template.reference_range),
            measured_at,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn reference_range(&self) -> ReferenceRange {
        self.reference_range
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn measured_at(&self) -> DateTime<Utc> {
        self.measured_at
    }

    /// Overwrites the value and timestamp and recomputes the status.
    pub(crate) fn assign_value(&mut self, value: f64, measured_at: DateTime<Utc>) {
        self.value = value;
        self.measured_at = measured_at;
        self.status = classify(value, &self.reference_range);
    }

    /// Case-insensitive exact match on the stored category.
    pub(crate) fn category_matches(&self, lowered: &str) -> bool {
        self.category.to_lowercase() == lowered
    }

    /// Converts into the client-facing JSON shape.
    pub fn to_wire(&self) -> wire::Record {
        wire::Record {
            id: self.id,
            patient_id: self.patient_id,
            name: self.name.clone(),
            value: self.value,
            unit: self.unit.clone(),
            category: self.category.clone(),
            reference_range: self.reference_range,
            measured_at: format_timestamp(&self.measured_at),
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn glucose() -> Template {
        Template::new("Glucose (fasting)", "mg/dL", "metabolic", 70.0, 99.0)
    }

    #[test]
    fn classify_treats_bounds_as_normal() {
        let range = ReferenceRange::new(70.0, 99.0);
        assert_eq!(classify(70.0, &range), Status::Normal);
        assert_eq!(classify(99.0, &range), Status::Normal);
        assert_eq!(classify(69.99, &range), Status::Low);
        assert_eq!(classify(99.01, &range), Status::High);
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_to_hundredths(84.456), 84.46);
        assert_eq!(round_to_hundredths(5.04), 5.04);
        assert_eq!(round_to_hundredths(-1.234), -1.23);
    }

    #[test]
    fn assign_value_recomputes_status() {
        let seeded_at = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
        let mut record = BiomarkerRecord::new(101, 1, &glucose(), 84.5, seeded_at);
        assert_eq!(record.status(), Status::Normal);

        let later = Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap();
        record.assign_value(120.0, later);
        assert_eq!(record.value(), 120.0);
        assert_eq!(record.status(), Status::High);
        assert_eq!(record.measured_at(), later);

        record.assign_value(10.0, later);
        assert_eq!(record.status(), Status::Low);
    }

    #[test]
    fn wire_timestamp_has_z_suffix_and_millis() {
        let at = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
        assert_eq!(format_timestamp(&at), "2025-11-02T09:00:00Z");

        let with_millis = at + chrono::Duration::milliseconds(250);
        assert_eq!(format_timestamp(&with_millis), "2025-11-02T09:00:00.250Z");
    }

    #[test]
    fn to_wire_copies_template_fields() {
        let at = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).unwrap();
        let record = BiomarkerRecord::new(101, 1, &glucose(), 84.5, at);
        let wire = record.to_wire();
        assert_eq!(wire.id, 101);
        assert_eq!(wire.patient_id, 1);
        assert_eq!(wire.name, "Glucose (fasting)");
        assert_eq!(wire.unit, "mg/dL");
        assert_eq!(wire.category, "metabolic");
        assert_eq!(wire.reference_range, ReferenceRange::new(70.0, 99.0));
        assert_eq!(wire.status, Status::Normal);
    }
}
