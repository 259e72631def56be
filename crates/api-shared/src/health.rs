use crate::dto::HealthRes;

/// Simple health service shared by the API surfaces.
///
/// Reports liveness only; it does not touch the patient file.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new instance of HealthService.
    pub fn new() -> Self {
        Self
    }

    /// Returns a `HealthRes` indicating the service is alive.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Patient Management System is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_reports_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert!(res.message.ends_with("is alive"));
    }
}
