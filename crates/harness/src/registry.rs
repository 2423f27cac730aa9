//! Test data registry
//!
//! Records identifiers created through one harness so a suite can tear them
//! down deterministically. Each harness owns its registry; nothing here is
//! process-wide.

use std::fmt;

use serde::Serialize;

use crate::types::{CompanyId, EmployeeId, ExportJobId, SurveyId};

/// Resource kinds the registry tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Company,
    Survey,
    Employee,
    ExportJob,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Company => "company",
            ResourceKind::Survey => "survey",
            ResourceKind::Employee => "employee",
            ResourceKind::ExportJob => "export-job",
        };
        f.write_str(name)
    }
}

/// Identifiers created during the current run, in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestDataRegistry {
    companies: Vec<CompanyId>,
    surveys: Vec<SurveyId>,
    employees: Vec<(CompanyId, EmployeeId)>,
    export_jobs: Vec<ExportJobId>,
}

/// Read-only snapshot handed out to tests
pub type TestData = TestDataRegistry;

impl TestDataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_company(&mut self, id: CompanyId) {
        push_unique(&mut self.companies, id);
    }

    pub fn record_survey(&mut self, id: SurveyId) {
        push_unique(&mut self.surveys, id);
    }

    pub fn record_employee(&mut self, company: CompanyId, id: EmployeeId) {
        push_unique(&mut self.employees, (company, id));
    }

    pub fn record_export_job(&mut self, id: ExportJobId) {
        push_unique(&mut self.export_jobs, id);
    }

    /// Forget a company and the employees that lived under it
    pub fn forget_company(&mut self, id: &CompanyId) {
        self.companies.retain(|c| c != id);
        self.employees.retain(|(c, _)| c != id);
    }

    pub fn forget_survey(&mut self, id: SurveyId) {
        self.surveys.retain(|s| *s != id);
    }

    pub fn forget_employee(&mut self, company: &CompanyId, id: &EmployeeId) {
        self.employees.retain(|(c, e)| !(c == company && e == id));
    }

    pub fn forget_export_job(&mut self, id: &ExportJobId) {
        self.export_jobs.retain(|j| j != id);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.surveys.is_empty()
            && self.employees.is_empty()
            && self.export_jobs.is_empty()
    }

    /// Number of identifiers held for a kind
    pub fn count(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::Company => self.companies.len(),
            ResourceKind::Survey => self.surveys.len(),
            ResourceKind::Employee => self.employees.len(),
            ResourceKind::ExportJob => self.export_jobs.len(),
        }
    }

    /// Most recently created company
    pub fn company_id(&self) -> Option<&CompanyId> {
        self.companies.last()
    }

    /// Most recently created survey
    pub fn survey_id(&self) -> Option<SurveyId> {
        self.surveys.last().copied()
    }

    pub fn export_job_id(&self) -> Option<&ExportJobId> {
        self.export_jobs.last()
    }

    pub fn companies(&self) -> &[CompanyId] {
        &self.companies
    }

    pub fn surveys(&self) -> &[SurveyId] {
        &self.surveys
    }

    pub fn employees(&self) -> &[(CompanyId, EmployeeId)] {
        &self.employees
    }

    /// Employee identifiers registered under one company
    pub fn employees_of(&self, company: &CompanyId) -> Vec<EmployeeId> {
        self.employees
            .iter()
            .filter(|(c, _)| c == company)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn export_jobs(&self) -> &[ExportJobId] {
        &self.export_jobs
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
