//! Company Commands

use anyhow::Result;
use backoffice_harness::{ApiHarness, Company, CompanyId, ListQuery};
use clap::Subcommand;
use serde::Serialize;

use crate::output::{cell, print_info, print_item, print_list, print_success, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum CompanyCommands {
    /// List companies
    List {
        /// Free-text search on name and code
        #[arg(long)]
        search: Option<String>,

        /// Filter by status (active, suspended, ...)
        #[arg(long)]
        status: Option<String>,

        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Get company details
    Get {
        /// Company ID
        id: String,
    },

    /// Delete (suspend) a company
    Delete {
        /// Company ID
        id: String,
    },
}

/// Company display wrapper for serialization
#[derive(Serialize)]
pub struct CompanyDisplay {
    pub id: String,
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
}

impl From<Company> for CompanyDisplay {
    fn from(company: Company) -> Self {
        Self {
            id: company.id.to_string(),
            code: company.code,
            name: company.name,
            status: company.status,
        }
    }
}

impl TableDisplay for CompanyDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Name", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            cell(self.code.as_deref()),
            cell(self.name.as_deref()),
            cell(self.status.as_deref()),
        ]
    }
}

pub async fn execute(cmd: CompanyCommands, harness: ApiHarness, format: OutputFormat) -> Result<()> {
    match cmd {
        CompanyCommands::List {
            search,
            status,
            page,
            limit,
        } => {
            let query = ListQuery {
                search,
                status,
                page,
                limit,
            };
            let result = harness.list_companies(&query).await?;
            let total = result
                .meta()
                .and_then(|m| m.get("total"))
                .and_then(|t| t.as_u64());
            let displays: Vec<CompanyDisplay> =
                result.data.into_iter().map(CompanyDisplay::from).collect();
            print_list(&displays, format);
            if let (Some(total), OutputFormat::Table) = (total, format) {
                print_info(&format!("{} of {} companies", displays.len(), total));
            }
        }

        CompanyCommands::Get { id } => {
            let company = harness.get_company(&CompanyId::new(id)).await?;
            print_item(&CompanyDisplay::from(company), format);
        }

        CompanyCommands::Delete { id } => {
            let ack = harness.delete_company(&CompanyId::new(id.clone())).await?;
            let message = ack
                .message
                .unwrap_or_else(|| format!("Company '{}' deleted", id));
            print_success(&message);
        }
    }

    Ok(())
}
