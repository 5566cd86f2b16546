//! Admission repository and service traits.

use async_trait::async_trait;

use super::admissions_model::AdmissionDetails;
use crate::errors::Result;

/// Read side of the remote admission API.
///
/// Totals on the returned snapshot are aggregated server-side; callers never
/// recompute them from payment history.
#[async_trait]
pub trait AdmissionRepositoryTrait: Send + Sync {
    /// Loads the admission with its payments and agent payments.
    async fn get_admission_details(&self, admission_id: &str) -> Result<AdmissionDetails>;

    /// Asks the server to rebuild the admission's running totals.
    async fn recalculate_admission(&self, admission_id: &str) -> Result<()>;
}

#[async_trait]
pub trait AdmissionServiceTrait: Send + Sync {
    async fn get_admission_details(&self, admission_id: &str) -> Result<AdmissionDetails>;

    /// Rebuilds the totals and returns the fresh snapshot. Admins only.
    async fn recalculate_admission(&self, admission_id: &str) -> Result<AdmissionDetails>;
}
