use crate::wire::HealthRes;

/// Simple health service used by the REST API and the run binary.
///
/// This service provides a standardised way to check the health status of the Biopanel system.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Biopanel is alive".into(),
        }
    }
}
