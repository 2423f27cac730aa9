//! Export jobs, statistics and reports
//!
//! Export jobs are created and inspected with one call each. Waiting for a
//! job to finish is left to the caller so the remote system's latency stays
//! observable.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::survey::survey_path;
use crate::client::{ApiHarness, NO_BODY};
use crate::error::{HarnessError, HarnessResult};
use crate::types::{
    Ack, ExportFormat, ExportJob, ExportJobId, ExportPayload, ListOrEnvelope, ReportFormat,
    ReportView, StatisticsRange, SurveyId, SurveyStatistics,
};

fn export_job_path(id: &ExportJobId) -> String {
    format!("/admin/export-job/{}", id)
}

impl ApiHarness {
    /// Start an export job; returns its initial state (normally pending)
    ///
    /// A 2xx body without `jobId` or `id` is a decode error since the job
    /// could neither be registered nor checked later.
    pub async fn create_export_job(&self, survey: SurveyId) -> HarnessResult<ExportJob> {
        let path = format!("{}/export-jobs", survey_path(survey));
        let job: ExportJob = self
            .post(&path, &json!({ "type": "SURVEY_DATA" }))
            .await?;
        let id = job.id().cloned().ok_or_else(|| {
            HarnessError::decode(
                format!("POST {}", path),
                <serde_json::Error as serde::de::Error>::custom("export job without id"),
            )
        })?;
        self.track(|r| r.record_export_job(id));
        Ok(job)
    }

    /// One status check, no polling
    pub async fn get_export_job(&self, id: &ExportJobId) -> HarnessResult<ExportJob> {
        self.get(&export_job_path(id), &[]).await
    }

    pub async fn list_export_jobs(&self, survey: SurveyId) -> HarnessResult<Vec<ExportJob>> {
        let jobs: ListOrEnvelope<ExportJob> = self
            .get(&format!("{}/export-jobs", survey_path(survey)), &[])
            .await?;
        Ok(jobs.into_vec())
    }

    pub async fn delete_export_job(&self, id: &ExportJobId) -> HarnessResult<Ack> {
        let ack: Ack = self.delete(&export_job_path(id)).await?;
        self.track(|r| r.forget_export_job(id));
        Ok(ack)
    }

    // Reporting

    pub async fn survey_statistics(&self, survey: SurveyId) -> HarnessResult<SurveyStatistics> {
        self.survey_report(survey, ReportView::Statistics, None)
            .await
    }

    /// Read one reporting view, optionally restricted to a date range
    pub async fn survey_report<T>(
        &self,
        survey: SurveyId,
        view: ReportView,
        range: Option<StatisticsRange>,
    ) -> HarnessResult<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("{}/{}", survey_path(survey), view.path_segment());
        let query = range.map(|r| r.to_pairs()).unwrap_or_default();
        self.get(&path, &query).await
    }

    /// Direct export; non-JSON formats come back as raw bytes
    pub async fn export_survey(
        &self,
        survey: SurveyId,
        format: ExportFormat,
    ) -> HarnessResult<ExportPayload> {
        self.fetch_bytes(
            Method::GET,
            &format!("{}/export", survey_path(survey)),
            &[("format", format.as_str().to_string())],
            NO_BODY,
        )
        .await
    }

    pub async fn generate_report(
        &self,
        survey: SurveyId,
        format: ReportFormat,
    ) -> HarnessResult<ExportPayload> {
        self.fetch_bytes(
            Method::POST,
            &format!("{}/generate-report", survey_path(survey)),
            &[],
            Some(&json!({ "format": format.as_str() })),
        )
        .await
    }
}
