//! Template catalog and deterministic seeding.
//!
//! A [`Catalog`] is the immutable list of templates a metric kind tracks. [`expand`] turns a
//! template list and an ordered list of patient ids into the initial record set; the output is a
//! pure function of its inputs so seeded repositories are reproducible across runs.

use crate::constants::{SEED_ID_BASE, SEED_MEASURED_HOUR, SEED_MEASURED_MONTH, SEED_MEASURED_YEAR};
use crate::record::{round_to_hundredths, BiomarkerRecord, PatientId};
use crate::{CoreError, CoreResult};
use api_shared::wire::ReferenceRange;
use chrono::{DateTime, TimeZone, Utc};
use std::str::FromStr;

/// Static definition shared by every patient's instance of one measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub reference_range: ReferenceRange,
}

impl Template {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        category: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            category: category.into(),
            reference_range: ReferenceRange::new(min, max),
        }
    }
}

/// The families of measurements served by the API.
///
/// Each kind owns a separate repository and simulator; both currently share the standard panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Biomarker,
    Biotracker,
}

impl MetricKind {
    pub const ALL: [MetricKind; 2] = [MetricKind::Biomarker, MetricKind::Biotracker];

    /// Plural path segment used in `/api/patients/{id}/<segment>`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            MetricKind::Biomarker => "biomarkers",
            MetricKind::Biotracker => "biotrackers",
        }
    }

    pub fn catalog(&self) -> Catalog {
        match self {
            MetricKind::Biomarker | MetricKind::Biotracker => Catalog::standard_panel(),
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for MetricKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biomarker" | "biomarkers" => Ok(MetricKind::Biomarker),
            "biotracker" | "biotrackers" => Ok(MetricKind::Biotracker),
            _ => Err(CoreError::UnknownMetricKind(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// The fifteen-entry demo panel: metabolic, cardiovascular and hormonal markers.
    pub fn standard_panel() -> Self {
        Self::new(vec![
            Template::new("Glucose (fasting)", "mg/dL", "metabolic", 70.0, 99.0),
            Template::new("HbA1c", "%", "metabolic", 4.0, 5.6),
            Template::new("Triglycerides", "mg/dL", "metabolic", 0.0, 150.0),
            Template::new("Insulin", "µIU/mL", "metabolic", 2.0, 25.0),
            Template::new("Creatinine", "mg/dL", "metabolic", 0.7, 1.3),
            Template::new("Total Cholesterol", "mg/dL", "cardiovascular", 0.0, 200.0),
            Template::new("LDL Cholesterol", "mg/dL", "cardiovascular", 0.0, 130.0),
            Template::new("HDL Cholesterol", "mg/dL", "cardiovascular", 40.0, 60.0),
            Template::new("Systolic BP", "mmHg", "cardiovascular", 90.0, 120.0),
            Template::new("Diastolic BP", "mmHg", "cardiovascular", 60.0, 80.0),
            Template::new("TSH", "µIU/mL", "hormonal", 0.4, 4.0),
            Template::new("Free T4", "ng/dL", "hormonal", 0.8, 1.8),
            Template::new("Cortisol (AM)", "µg/dL", "hormonal", 6.0, 23.0),
            Template::new("Testosterone", "ng/dL", "hormonal", 300.0, 1000.0),
            Template::new("Estradiol", "pg/mL", "hormonal", 20.0, 200.0),
        ])
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for template in &self.templates {
            if !seen.contains(&template.category.as_str()) {
                seen.push(&template.category);
            }
        }
        seen
    }

    pub fn expand(&self, patient_ids: &[PatientId]) -> Vec<BiomarkerRecord> {
        expand(&self.templates, patient_ids)
    }
}

/// Expands `templates` into one record per patient and template.
///
/// Patients are visited in the given order and templates in catalog order. Identifiers count up
/// from [`SEED_ID_BASE`], so the first record is `101`.
pub fn expand(templates: &[Template], patient_ids: &[PatientId]) -> Vec<BiomarkerRecord> {
    let mut records = Vec::with_capacity(templates.len() * patient_ids.len());
    let mut next_id = SEED_ID_BASE;

    for &patient_id in patient_ids {
        let measured_at = seed_measured_at(patient_id);
        let direction = if patient_id % 3 == 0 { -1.0 } else { 1.0 };

        for (idx, template) in templates.iter().enumerate() {
            let range = template.reference_range;
            let range_mid = (range.min + range.max) / 2.0;
            // A zero midpoint would otherwise erase the spread entirely.
            let spread_base = if range_mid == 0.0 { 1.0 } else { range_mid };
            let variance = (idx % 3) as f64 * 0.05 * spread_base;
            let value = round_to_hundredths(range_mid + direction * variance);

            next_id += 1;
            records.push(BiomarkerRecord::new(
                next_id,
                patient_id,
                template,
                value,
                measured_at,
            ));
        }
    }

    records
}

/// Synthetic seed timestamp: `2025-11-DDT09:00:00Z` with `DD = (patient_id mod 5) + 1`.
fn seed_measured_at(patient_id: PatientId) -> DateTime<Utc> {
    let day = patient_id.rem_euclid(5) as u32 + 1;
    Utc.with_ymd_and_hms(
        SEED_MEASURED_YEAR,
        SEED_MEASURED_MONTH,
        day,
        SEED_MEASURED_HOUR,
        0,
        0,
    )
    .single()
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::format_timestamp;
    use api_shared::wire::Status;

    #[test]
    fn single_glucose_template_seeds_midpoint() {
        let templates = vec![Template::new("Glucose", "mg/dL", "metabolic", 70.0, 99.0)];
        let records = expand(&templates, &[1]);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id(), 101);
        assert_eq!(record.patient_id(), 1);
        assert_eq!(record.value(), 84.5);
        assert_eq!(record.status(), Status::Normal);
        assert_eq!(format_timestamp(&record.measured_at()), "2025-11-02T09:00:00Z");
    }

    #[test]
    fn standard_panel_seeds_patients_times_templates() {
        let catalog = Catalog::standard_panel();
        let records = catalog.expand(&[1, 2, 3, 4, 5]);

        assert_eq!(catalog.templates().len(), 15);
        assert_eq!(records.len(), 75);

        let ids: Vec<u64> = records.iter().map(|r| r.id()).collect();
        let expected: Vec<u64> = (101..=175).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn seeding_applies_template_spread_and_patient_direction() {
        let records = Catalog::standard_panel().expand(&[1, 2, 3, 4, 5]);

        // Patient 1, HbA1c (idx 1): 4.8 + 0.05 * 4.8
        let hba1c = records.iter().find(|r| r.id() == 102).unwrap();
        assert_eq!(hba1c.name(), "HbA1c");
        assert_eq!(hba1c.value(), 5.04);

        // Patient 3 walks downwards: Triglycerides (idx 2) = 75 - 0.1 * 75
        let trig = records
            .iter()
            .find(|r| r.patient_id() == 3 && r.name() == "Triglycerides")
            .unwrap();
        assert_eq!(trig.id(), 133);
        assert_eq!(trig.value(), 67.5);
        assert_eq!(format_timestamp(&trig.measured_at()), "2025-11-04T09:00:00Z");

        // Patient 5 wraps to day 1
        let p5 = records.iter().find(|r| r.patient_id() == 5).unwrap();
        assert_eq!(format_timestamp(&p5.measured_at()), "2025-11-01T09:00:00Z");
    }

    #[test]
    fn zero_midpoint_falls_back_to_unit_spread() {
        let templates = vec![
            Template::new("a", "u", "c", -1.0, 1.0),
            Template::new("b", "u", "c", -1.0, 1.0),
        ];
        let records = expand(&templates, &[1]);
        assert_eq!(records[0].value(), 0.0);
        assert_eq!(records[1].value(), 0.05);
    }

    #[test]
    fn expansion_is_deterministic() {
        let catalog = Catalog::standard_panel();
        assert_eq!(catalog.expand(&[1, 2, 3]), catalog.expand(&[1, 2, 3]));
    }

    #[test]
    fn seeded_status_matches_value() {
        for record in Catalog::standard_panel().expand(&[1, 2, 3, 4, 5]) {
            let range = record.reference_range();
            let expected = crate::record::classify(record.value(), &range);
            assert_eq!(record.status(), expected, "record {}", record.id());
        }
    }

    #[test]
    fn categories_are_distinct_in_catalog_order() {
        assert_eq!(
            Catalog::standard_panel().categories(),
            vec!["metabolic", "cardiovascular", "hormonal"]
        );
    }

    #[test]
    fn parses_metric_kind_names() {
        assert_eq!("biomarkers".parse::<MetricKind>().unwrap(), MetricKind::Biomarker);
        assert_eq!("Biotracker".parse::<MetricKind>().unwrap(), MetricKind::Biotracker);
        let err = "vitals".parse::<MetricKind>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownMetricKind(_)));
    }
}
