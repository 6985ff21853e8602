//! Constants used throughout the Biopanel core crate.
//!
//! Seed data constants live here so the deterministic seeding and the tests that pin it agree
//! on the same values.

use crate::record::PatientId;

/// Reserved base for record identifiers. The first seeded record receives `SEED_ID_BASE + 1`.
pub const SEED_ID_BASE: u64 = 100;

/// Patient identifiers seeded when no explicit list is configured.
pub const DEFAULT_PATIENT_IDS: [PatientId; 5] = [1, 2, 3, 4, 5];

/// Default simulator period in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Year of the synthetic seed `measuredAt` timestamp.
pub const SEED_MEASURED_YEAR: i32 = 2025;

/// Month of the synthetic seed `measuredAt` timestamp.
pub const SEED_MEASURED_MONTH: u32 = 11;

/// Hour (UTC) of the synthetic seed `measuredAt` timestamp.
pub const SEED_MEASURED_HOUR: u32 = 9;
