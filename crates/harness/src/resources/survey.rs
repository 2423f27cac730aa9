//! Survey operations: CRUD, lifecycle, questions, assignments, survey taking

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::{ApiHarness, NO_BODY};
use crate::error::HarnessResult;
use crate::types::{
    Ack, EmployeeId, ListQuery, Page, Question, QuestionId, Reviewer, ReviewerId, Survey,
    SurveyId, VisitorToken,
};

pub(crate) fn survey_path(id: SurveyId) -> String {
    format!("/admin/survey/{}", id)
}

fn locale_query(locale: Option<&str>) -> Vec<(&'static str, String)> {
    locale
        .map(|l| vec![("locale", l.to_string())])
        .unwrap_or_default()
}

impl ApiHarness {
    pub async fn create_survey<B>(&self, data: &B) -> HarnessResult<Survey>
    where
        B: Serialize + ?Sized,
    {
        let survey: Survey = self.post("/admin/survey", data).await?;
        debug!(id = %survey.id, "survey created");
        self.track(|r| r.record_survey(survey.id));
        Ok(survey)
    }

    /// Fetch a survey, optionally in a given locale (`EN`, `TH`, ...)
    pub async fn get_survey(&self, id: SurveyId, locale: Option<&str>) -> HarnessResult<Survey> {
        self.get(&survey_path(id), &locale_query(locale)).await
    }

    pub async fn update_survey<B>(&self, id: SurveyId, data: &B) -> HarnessResult<Survey>
    where
        B: Serialize + ?Sized,
    {
        self.put(&survey_path(id), data).await
    }

    pub async fn delete_survey(&self, id: SurveyId) -> HarnessResult<Ack> {
        let ack: Ack = self.delete(&survey_path(id)).await?;
        self.track(|r| r.forget_survey(id));
        Ok(ack)
    }

    pub async fn list_surveys(&self, query: &ListQuery) -> HarnessResult<Page<Survey>> {
        self.get("/admin/survey", &query.to_pairs()).await
    }

    // Lifecycle

    pub async fn activate_survey(&self, id: SurveyId) -> HarnessResult<Survey> {
        self.survey_transition(id, "activate").await
    }

    pub async fn deactivate_survey(&self, id: SurveyId) -> HarnessResult<Survey> {
        self.survey_transition(id, "deactivate").await
    }

    pub async fn delist_survey(&self, id: SurveyId) -> HarnessResult<Survey> {
        self.survey_transition(id, "delist").await
    }

    async fn survey_transition(&self, id: SurveyId, action: &str) -> HarnessResult<Survey> {
        let path = format!("{}/{}", survey_path(id), action);
        self.call(Method::PUT, &path, &[], NO_BODY).await
    }

    // Questions

    pub async fn add_question<B>(&self, survey: SurveyId, data: &B) -> HarnessResult<Question>
    where
        B: Serialize + ?Sized,
    {
        self.post(&format!("{}/questions", survey_path(survey)), data)
            .await
    }

    /// Add a question shown only when `parent`'s condition holds
    ///
    /// `data` carries the question and its `condition`; `parentQuestionId`
    /// is set from `parent` and `isNested` defaults to true.
    pub async fn add_conditional_question(
        &self,
        survey: SurveyId,
        parent: &QuestionId,
        data: &Value,
    ) -> HarnessResult<Question> {
        let mut body = data.clone();
        if let Some(fields) = body.as_object_mut() {
            fields.insert("parentQuestionId".into(), json!(parent));
            fields.entry("isNested").or_insert(Value::Bool(true));
        }
        self.add_question(survey, &body).await
    }

    pub async fn survey_questions(&self, survey: SurveyId) -> HarnessResult<Vec<Question>> {
        self.get(&format!("{}/questions", survey_path(survey)), &[])
            .await
    }

    // Assignments

    /// 360-degree reviewer assignments: `[{ employeeId, reviewerIds, reviewType }]`
    pub async fn assign_reviewers(&self, survey: SurveyId, assignments: &[Value]) -> HarnessResult<Ack> {
        self.post(
            &format!("{}/reviewers", survey_path(survey)),
            &json!({ "assignments": assignments }),
        )
        .await
    }

    pub async fn assign_employee_to_survey(
        &self,
        survey: SurveyId,
        employee: &EmployeeId,
    ) -> HarnessResult<Ack> {
        self.post(
            &format!("{}/assignments", survey_path(survey)),
            &json!({ "employeeId": employee }),
        )
        .await
    }

    pub async fn survey_assignments(&self, survey: SurveyId) -> HarnessResult<Vec<Value>> {
        self.get(&format!("{}/assignments", survey_path(survey)), &[])
            .await
    }

    pub async fn create_reviewer<B>(&self, data: &B) -> HarnessResult<Reviewer>
    where
        B: Serialize + ?Sized,
    {
        self.post("/admin/reviewer", data).await
    }

    pub async fn assign_reviewer_to_employee(
        &self,
        reviewer: &ReviewerId,
        employee: &EmployeeId,
        survey: SurveyId,
    ) -> HarnessResult<Ack> {
        self.post(
            &format!("/admin/reviewer/{}/employees", reviewer),
            &json!({ "employeeId": employee, "surveyId": survey }),
        )
        .await
    }

    // Survey taking

    /// Submit answers: `[{ questionId, choiceId?, freeText?, answer? }]`
    pub async fn submit_survey(&self, survey: SurveyId, answers: &[Value]) -> HarnessResult<Ack> {
        self.post(
            &format!("/survey/{}/submit", survey),
            &json!({ "answers": answers }),
        )
        .await
    }

    /// Issue a visitor token that lets `employee` take the survey
    pub async fn generate_survey_token(
        &self,
        survey: SurveyId,
        employee: &EmployeeId,
    ) -> HarnessResult<VisitorToken> {
        self.post(
            &format!("{}/generate-token", survey_path(survey)),
            &json!({ "employeeId": employee }),
        )
        .await
    }

    /// Token-qualified access, separate from the admin bearer flow
    pub async fn get_survey_as_visitor(
        &self,
        survey: SurveyId,
        token: &str,
        locale: Option<&str>,
    ) -> HarnessResult<Survey> {
        let mut query = vec![("token", token.to_string())];
        query.extend(locale_query(locale));
        self.get(&format!("/survey/{}", survey), &query).await
    }
}
