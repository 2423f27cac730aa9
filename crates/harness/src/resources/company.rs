//! Company operations

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{ApiHarness, NO_BODY};
use crate::error::HarnessResult;
use crate::types::{Ack, Company, CompanyId, ListOrEnvelope, ListQuery, Page};

pub(crate) fn company_path(id: &CompanyId) -> String {
    format!("/admin/company/{}", id)
}

impl ApiHarness {
    /// Create a company and register its id
    pub async fn create_company<B>(&self, data: &B) -> HarnessResult<Company>
    where
        B: Serialize + ?Sized,
    {
        let company: Company = self.post("/admin/company", data).await?;
        debug!(id = %company.id, "company created");
        self.track(|r| r.record_company(company.id.clone()));
        Ok(company)
    }

    pub async fn get_company(&self, id: &CompanyId) -> HarnessResult<Company> {
        self.get(&company_path(id), &[]).await
    }

    pub async fn update_company<B>(&self, id: &CompanyId, data: &B) -> HarnessResult<Company>
    where
        B: Serialize + ?Sized,
    {
        self.put(&company_path(id), data).await
    }

    /// Delete a company; its employees are forgotten with it
    pub async fn delete_company(&self, id: &CompanyId) -> HarnessResult<Ack> {
        let ack: Ack = self.delete(&company_path(id)).await?;
        self.track(|r| r.forget_company(id));
        Ok(ack)
    }

    pub async fn list_companies(&self, query: &ListQuery) -> HarnessResult<Page<Company>> {
        self.get("/admin/company", &query.to_pairs()).await
    }

    pub async fn search_companies(&self, term: &str) -> HarnessResult<Page<Company>> {
        self.list_companies(&ListQuery::new().search(term)).await
    }

    pub async fn companies_by_status(&self, status: &str) -> HarnessResult<Page<Company>> {
        self.list_companies(&ListQuery::new().status(status)).await
    }

    pub async fn suspend_company(&self, id: &CompanyId) -> HarnessResult<Ack> {
        self.call(Method::PUT, &format!("{}/suspend", company_path(id)), &[], NO_BODY)
            .await
    }

    pub async fn activate_company(&self, id: &CompanyId) -> HarnessResult<Ack> {
        self.call(Method::PUT, &format!("{}/activate", company_path(id)), &[], NO_BODY)
            .await
    }

    pub async fn create_department<B>(&self, company: &CompanyId, data: &B) -> HarnessResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.post(&format!("{}/departments", company_path(company)), data)
            .await
    }

    pub async fn create_position<B>(&self, company: &CompanyId, data: &B) -> HarnessResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.post(&format!("{}/positions", company_path(company)), data)
            .await
    }

    // Bulk

    /// Generate `count` synthetic companies and create them in one call
    pub async fn bulk_create_companies(&self, count: usize) -> HarnessResult<Vec<Company>> {
        let records = self.fixtures().companies(count);
        let created: ListOrEnvelope<Company> = self
            .post("/admin/company/bulk/create", &json!({ "companies": records }))
            .await?;
        let created = created.into_vec();

        debug!(requested = count, created = created.len(), "bulk company create");
        self.track(|r| {
            for company in &created {
                r.record_company(company.id.clone());
            }
        });
        Ok(created)
    }

    /// Each update must carry the company `id`
    pub async fn bulk_update_companies(&self, updates: &[Value]) -> HarnessResult<Vec<Company>> {
        let updated: ListOrEnvelope<Company> = self
            .put("/admin/company/bulk/update", &json!({ "companies": updates }))
            .await?;
        Ok(updated.into_vec())
    }

    pub async fn bulk_delete_companies(&self, ids: &[CompanyId]) -> HarnessResult<Ack> {
        let ack: Ack = self
            .post("/admin/company/bulk/delete", &json!({ "ids": ids }))
            .await?;
        self.track(|r| {
            for id in ids {
                r.forget_company(id);
            }
        });
        Ok(ack)
    }
}
