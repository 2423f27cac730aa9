//! Survey Commands

use anyhow::Result;
use backoffice_harness::{ApiHarness, Survey, SurveyId, SurveyStatistics};
use clap::Subcommand;
use serde::Serialize;

use crate::output::{cell, print_item, print_list, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum SurveyCommands {
    /// Get survey details and its questions
    Get {
        /// Survey ID
        id: u64,

        /// Locale to render question text in (EN, TH)
        #[arg(long)]
        locale: Option<String>,
    },

    /// Show response statistics
    Stats {
        /// Survey ID
        id: u64,
    },
}

#[derive(Serialize)]
pub struct SurveyDisplay {
    pub id: u64,
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub questions: usize,
}

impl From<&Survey> for SurveyDisplay {
    fn from(survey: &Survey) -> Self {
        Self {
            id: survey.id.0,
            code: survey.code.clone(),
            name: survey.name.clone(),
            status: survey.status.clone(),
            questions: survey.questions.len(),
        }
    }
}

impl TableDisplay for SurveyDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Name", "Status", "Questions"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.code.as_deref()),
            cell(self.name.as_deref()),
            cell(self.status.as_deref()),
            self.questions.to_string(),
        ]
    }
}

#[derive(Serialize)]
pub struct QuestionDisplay {
    pub id: String,
    pub kind: Option<String>,
    pub text: Option<String>,
}

impl TableDisplay for QuestionDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Type", "Text"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.kind.as_deref()),
            cell(self.text.as_deref()),
        ]
    }
}

#[derive(Serialize)]
pub struct StatisticsDisplay {
    pub survey: u64,
    pub responses: Option<u64>,
    pub employees: Option<u64>,
    pub reviewers: Option<u64>,
    pub questions: Option<u64>,
    pub completion_rate: Option<f64>,
}

impl StatisticsDisplay {
    fn new(survey: SurveyId, stats: SurveyStatistics) -> Self {
        Self {
            survey: survey.0,
            responses: stats.total_responses,
            employees: stats.total_employees,
            reviewers: stats.total_reviewers,
            questions: stats.total_questions,
            completion_rate: stats.completion_rate,
        }
    }
}

fn count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl TableDisplay for StatisticsDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Survey", "Responses", "Employees", "Reviewers", "Questions", "Completion"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.survey.to_string(),
            count(self.responses),
            count(self.employees),
            count(self.reviewers),
            count(self.questions),
            self.completion_rate
                .map(|r| format!("{:.1}%", r * 100.0))
                .unwrap_or_else(|| "-".to_string()),
        ]
    }
}

pub async fn execute(cmd: SurveyCommands, harness: ApiHarness, format: OutputFormat) -> Result<()> {
    match cmd {
        SurveyCommands::Get { id, locale } => {
            let survey = harness.get_survey(SurveyId(id), locale.as_deref()).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&survey)?);
                }
                OutputFormat::Table => {
                    print_item(&SurveyDisplay::from(&survey), format);
                    let questions: Vec<QuestionDisplay> = survey
                        .questions
                        .into_iter()
                        .map(|q| QuestionDisplay {
                            id: q.id.to_string(),
                            kind: q.kind,
                            text: q.text,
                        })
                        .collect();
                    if !questions.is_empty() {
                        print_list(&questions, format);
                    }
                }
            }
        }

        SurveyCommands::Stats { id } => {
            let survey = SurveyId(id);
            let stats = harness.survey_statistics(survey).await?;
            print_item(&StatisticsDisplay::new(survey, stats), format);
        }
    }

    Ok(())
}
