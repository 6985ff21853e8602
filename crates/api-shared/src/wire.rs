//! JSON wire types.
//!
//! Field names are camelCase and `status` is lowercase so that responses stay byte-compatible
//! with the dashboard client. The core crate owns the mutable record state and renders into
//! these types on every read.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Closed interval of clinically normal values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

impl ReferenceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Width of the interval (`max - min`).
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Classification of a value relative to its reference range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Normal,
    High,
    Low,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "normal",
            Status::High => "high",
            Status::Low => "low",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measurement as returned by `GET /api/patients/{id}/biomarkers`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: u64,
    pub patient_id: i64,
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub category: String,
    pub reference_range: ReferenceRange,
    /// RFC 3339 UTC timestamp of the last value assignment.
    pub measured_at: String,
    pub status: Status,
}

/// Demo patient as listed by `GET /api/patients`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub date_of_birth: String,
    pub last_visit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serialises_with_client_field_names() {
        let record = Record {
            id: 101,
            patient_id: 1,
            name: "Glucose (fasting)".into(),
            value: 84.5,
            unit: "mg/dL".into(),
            category: "metabolic".into(),
            reference_range: ReferenceRange::new(70.0, 99.0),
            measured_at: "2025-11-02T09:00:00Z".into(),
            status: Status::Normal,
        };

        let json = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(json["patientId"], 1);
        assert_eq!(json["referenceRange"]["min"], 70.0);
        assert_eq!(json["referenceRange"]["max"], 99.0);
        assert_eq!(json["measuredAt"], "2025-11-02T09:00:00Z");
        assert_eq!(json["status"], "normal");
        assert!(json.get("patient_id").is_none());
    }

    #[test]
    fn patient_serialises_with_client_field_names() {
        let patient = Patient {
            id: 2,
            name: "Priya Desai".into(),
            date_of_birth: "1992-06-01".into(),
            last_visit: "2025-10-21".into(),
        };

        let json = serde_json::to_value(&patient).expect("serialise patient");
        assert_eq!(json["dateOfBirth"], "1992-06-01");
        assert_eq!(json["lastVisit"], "2025-10-21");
    }

    #[test]
    fn status_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Status::High).unwrap(), "\"high\"");
        assert_eq!(Status::Low.to_string(), "low");
        let parsed: Status = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(parsed, Status::Normal);
    }
}
