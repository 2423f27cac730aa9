//! Backoffice resource operations
//!
//! Each submodule adds one group of `ApiHarness` methods. Creates record the
//! new identifier in the harness registry; successful deletes remove it.

pub mod company;
pub mod employee;
pub mod export;
pub mod survey;

use serde::Serialize;
use tracing::{info, warn};

use crate::client::ApiHarness;
use crate::error::HarnessResult;
use crate::registry::ResourceKind;

/// One delete that failed during `cleanup_remote`
#[derive(Debug, Clone, Serialize)]
pub struct CleanupFailure {
    pub kind: ResourceKind,
    pub id: String,
    pub status: Option<u16>,
    pub error: String,
}

/// Outcome of a best-effort remote teardown
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record<T>(&mut self, kind: ResourceKind, id: String, result: HarnessResult<T>) {
        match result {
            Ok(_) => self.deleted += 1,
            Err(e) => {
                warn!(%kind, %id, error = %e, "cleanup delete failed");
                self.failures.push(CleanupFailure {
                    kind,
                    id,
                    status: e.status().map(|s| s.as_u16()),
                    error: e.to_string(),
                });
            }
        }
    }
}

impl ApiHarness {
    /// Delete every registered resource, children before parents
    ///
    /// Order: export jobs, employees, surveys, companies. A failing delete is
    /// logged and reported and does not stop the others. Identifiers whose
    /// delete failed stay registered.
    pub async fn cleanup_remote(&self) -> CleanupReport {
        let snapshot = self.test_data();
        let mut report = CleanupReport::default();

        for job in snapshot.export_jobs() {
            let result = self.delete_export_job(job).await;
            report.record(ResourceKind::ExportJob, job.to_string(), result);
        }

        for (company, employee) in snapshot.employees() {
            let result = self.delete_employee(company, employee).await;
            report.record(ResourceKind::Employee, employee.to_string(), result);
        }

        for survey in snapshot.surveys() {
            let result = self.delete_survey(*survey).await;
            report.record(ResourceKind::Survey, survey.to_string(), result);
        }

        for company in snapshot.companies() {
            let result = self.delete_company(company).await;
            report.record(ResourceKind::Company, company.to_string(), result);
        }

        info!(
            deleted = report.deleted,
            failed = report.failures.len(),
            "remote cleanup finished"
        );
        report
    }
}
