use log::info;
use std::sync::Arc;

use super::admissions_model::AdmissionDetails;
use super::admissions_traits::{AdmissionRepositoryTrait, AdmissionServiceTrait};
use crate::errors::{Error, Result};
use crate::users::CurrentUser;

/// Service for reading and refreshing admission snapshots.
pub struct AdmissionService {
    repository: Arc<dyn AdmissionRepositoryTrait>,
    current_user: CurrentUser,
}

impl AdmissionService {
    pub fn new(repository: Arc<dyn AdmissionRepositoryTrait>, current_user: CurrentUser) -> Self {
        Self {
            repository,
            current_user,
        }
    }
}

#[async_trait::async_trait]
impl AdmissionServiceTrait for AdmissionService {
    async fn get_admission_details(&self, admission_id: &str) -> Result<AdmissionDetails> {
        self.repository.get_admission_details(admission_id).await
    }

    async fn recalculate_admission(&self, admission_id: &str) -> Result<AdmissionDetails> {
        if !self.current_user.role.can_recalculate() {
            return Err(Error::Forbidden(format!(
                "{} users cannot recalculate admissions",
                self.current_user.role.label()
            )));
        }
        self.repository.recalculate_admission(admission_id).await?;
        info!("Recalculated totals for admission {}", admission_id);
        self.repository.get_admission_details(admission_id).await
    }
}
