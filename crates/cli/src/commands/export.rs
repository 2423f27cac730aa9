//! Export Job Commands

use anyhow::Result;
use backoffice_harness::{ApiHarness, ExportJob, ExportJobId, SurveyId};
use clap::Subcommand;
use serde::Serialize;

use crate::output::{cell, print_item, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Start an export job for a survey
    Create {
        /// Survey ID
        survey: u64,
    },

    /// Check an export job once
    Status {
        /// Export job ID
        job: String,
    },
}

#[derive(Serialize)]
pub struct ExportJobDisplay {
    pub id: String,
    pub status: String,
    pub job_type: Option<String>,
    pub download_url: Option<String>,
}

impl From<ExportJob> for ExportJobDisplay {
    fn from(job: ExportJob) -> Self {
        Self {
            id: job.id().map(ToString::to_string).unwrap_or_else(|| "-".to_string()),
            status: job.status.to_string(),
            job_type: job.job_type,
            download_url: job.download_url,
        }
    }
}

impl TableDisplay for ExportJobDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Status", "Type", "Download"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.status.clone(),
            cell(self.job_type.as_deref()),
            cell(self.download_url.as_deref()),
        ]
    }
}

/// Job ids are numeric on most deployments; anything else is passed through
fn parse_job_id(raw: &str) -> ExportJobId {
    raw.parse::<u64>()
        .map(ExportJobId::from)
        .unwrap_or_else(|_| ExportJobId::from(raw))
}

pub async fn execute(cmd: ExportCommands, harness: ApiHarness, format: OutputFormat) -> Result<()> {
    match cmd {
        ExportCommands::Create { survey } => {
            let job = harness.create_export_job(SurveyId(survey)).await?;
            let display = ExportJobDisplay::from(job);
            if format == OutputFormat::Table {
                print_success(&format!("Export job '{}' created", display.id));
            }
            print_item(&display, format);
        }

        ExportCommands::Status { job } => {
            let job = harness.get_export_job(&parse_job_id(&job)).await?;
            print_item(&ExportJobDisplay::from(job), format);
        }
    }

    Ok(())
}
