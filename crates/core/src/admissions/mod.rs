//! Admissions module - snapshot models, repository contract and service.

mod admissions_model;
mod admissions_service;
mod admissions_traits;


pub use admissions_model::{
    Admission, AdmissionAgents, AdmissionDetails, AdmissionStatus, AgentAssignment,
    CollegePaymentSummary, NamedRef, RosterEntry, ServiceChargeSummary, StudentInfo,
    StudentPaymentSummary,
};
pub use admissions_service::AdmissionService;
pub use admissions_traits::{AdmissionRepositoryTrait, AdmissionServiceTrait};
