//! Demo patient directory.
//!
//! The five seeded patients the dashboard lists. Records reference these ids but the directory
//! does not own them.

use crate::record::PatientId;
use api_shared::wire;

#[derive(Clone, Debug)]
pub struct PatientService {
    patients: Vec<wire::Patient>,
}

impl Default for PatientService {
    fn default() -> Self {
        Self::new()
    }
}

impl PatientService {
    /// Creates the directory with the built-in demo patients.
    pub fn new() -> Self {
        let seed = [
            (1, "Alex Johnson", "1988-02-14", "2025-11-02"),
            (2, "Priya Desai", "1992-06-01", "2025-10-21"),
            (3, "Marco Silva", "1985-09-12", "2025-11-15"),
            (4, "Sofia Martinez", "1979-04-28", "2025-11-08"),
            (5, "Taylor Nguyen", "1995-12-05", "2025-10-30"),
        ];

        Self {
            patients: seed
                .into_iter()
                .map(|(id, name, date_of_birth, last_visit)| wire::Patient {
                    id,
                    name: name.into(),
                    date_of_birth: date_of_birth.into(),
                    last_visit: last_visit.into(),
                })
                .collect(),
        }
    }

    pub fn list_patients(&self) -> Vec<wire::Patient> {
        self.patients.clone()
    }

    pub fn get_patient(&self, id: PatientId) -> Option<wire::Patient> {
        self.patients.iter().find(|p| p.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_five_patients_in_id_order() {
        let ids: Vec<_> = PatientService::new()
            .list_patients()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn gets_patient_by_id() {
        let service = PatientService::new();
        assert_eq!(service.get_patient(3).unwrap().name, "Marco Silva");
        assert!(service.get_patient(6).is_none());
    }
}
