//! Employee operations (nested under a company)

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::company::company_path;
use crate::client::ApiHarness;
use crate::error::HarnessResult;
use crate::types::{
    Ack, CompanyId, Employee, EmployeeBatch, EmployeeId, ListOrEnvelope, ListQuery, Page,
};

fn employees_path(company: &CompanyId) -> String {
    format!("{}/employees", company_path(company))
}

fn employee_path(company: &CompanyId, id: &EmployeeId) -> String {
    format!("{}/{}", employees_path(company), id)
}

impl ApiHarness {
    pub async fn create_employee<B>(&self, company: &CompanyId, data: &B) -> HarnessResult<Employee>
    where
        B: Serialize + ?Sized,
    {
        let employee: Employee = self.post(&employees_path(company), data).await?;
        self.track(|r| r.record_employee(company.clone(), employee.id.clone()));
        Ok(employee)
    }

    pub async fn get_employee(&self, company: &CompanyId, id: &EmployeeId) -> HarnessResult<Employee> {
        self.get(&employee_path(company, id), &[]).await
    }

    pub async fn update_employee<B>(
        &self,
        company: &CompanyId,
        id: &EmployeeId,
        data: &B,
    ) -> HarnessResult<Employee>
    where
        B: Serialize + ?Sized,
    {
        self.put(&employee_path(company, id), data).await
    }

    pub async fn delete_employee(&self, company: &CompanyId, id: &EmployeeId) -> HarnessResult<Ack> {
        let ack: Ack = self.delete(&employee_path(company, id)).await?;
        self.track(|r| r.forget_employee(company, id));
        Ok(ack)
    }

    pub async fn list_employees(
        &self,
        company: &CompanyId,
        query: &ListQuery,
    ) -> HarnessResult<Page<Employee>> {
        self.get(&employees_path(company), &query.to_pairs()).await
    }

    /// Bulk-create employees from a count (synthetic) or pre-built records
    ///
    /// ```ignore
    /// harness.bulk_create_employees(&company, 10usize).await?;
    /// harness.bulk_create_employees(&company, records).await?;
    /// ```
    pub async fn bulk_create_employees(
        &self,
        company: &CompanyId,
        batch: impl Into<EmployeeBatch>,
    ) -> HarnessResult<Vec<Employee>> {
        let records = match batch.into() {
            EmployeeBatch::Generate(count) => self.fixtures().employees(count),
            EmployeeBatch::Records(records) => records,
        };
        let requested = records.len();

        let created: ListOrEnvelope<Employee> = self
            .post(
                &format!("{}/bulk/create", employees_path(company)),
                &json!({ "employees": records }),
            )
            .await?;
        let created = created.into_vec();

        debug!(%company, requested, created = created.len(), "bulk employee create");
        self.track(|r| {
            for employee in &created {
                r.record_employee(company.clone(), employee.id.clone());
            }
        });
        Ok(created)
    }
}
