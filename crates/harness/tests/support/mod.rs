//! In-process mock of the survey backoffice API
//!
//! Serves the routes the harness talks to on an ephemeral port, with just
//! enough behaviour (auth, validation, 404s, cascade deletes, export job
//! progression) to exercise the harness contract.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

use backoffice_harness::{ApiHarness, EnvConfig, HarnessOptions};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin1235";

/// Failed logins tolerated before the mock answers 429
pub const DEFAULT_LOGIN_LIMIT: usize = 5;

pub type Mock = Arc<Mutex<Store>>;

type HandlerResult = Result<Response, Response>;

// ============================================================================
// Store
// ============================================================================

#[derive(Debug)]
pub struct Store {
    tokens: HashSet<String>,
    failed_logins: usize,
    login_limit: usize,
    next_id: u64,
    companies: BTreeMap<String, Value>,
    employees: HashMap<String, BTreeMap<String, Value>>,
    surveys: BTreeMap<u64, Value>,
    questions: HashMap<u64, Vec<Value>>,
    assignments: HashMap<u64, Vec<Value>>,
    responses: HashMap<u64, Vec<Value>>,
    visitor_tokens: HashMap<String, u64>,
    export_jobs: BTreeMap<u64, Value>,
    undeletable: HashSet<String>,
    requests: usize,
}

impl Store {
    fn new() -> Self {
        Self {
            tokens: HashSet::new(),
            failed_logins: 0,
            login_limit: DEFAULT_LOGIN_LIMIT,
            next_id: 0,
            companies: BTreeMap::new(),
            employees: HashMap::new(),
            surveys: BTreeMap::new(),
            questions: HashMap::new(),
            assignments: HashMap::new(),
            responses: HashMap::new(),
            visitor_tokens: HashMap::new(),
            export_jobs: BTreeMap::new(),
            undeletable: HashSet::new(),
            requests: 0,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn company(&self, id: &str) -> Result<&Value, Response> {
        self.companies
            .get(id)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, "Company not found"))
    }

    fn survey_mut(&mut self, id: u64) -> Result<&mut Value, Response> {
        self.surveys
            .get_mut(&id)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, "Survey not found"))
    }

    fn insert_company(&mut self, body: Value) -> Result<Value, Response> {
        let mut fields = object(body)?;
        let code = fields.get("code").and_then(Value::as_str).unwrap_or("");
        if code.is_empty() {
            return Err(error(StatusCode::BAD_REQUEST, "code is required"));
        }
        if let Some(email) = fields.get("email").and_then(Value::as_str) {
            if !email.contains('@') {
                return Err(error(StatusCode::BAD_REQUEST, "email must be a valid email"));
            }
        }
        if !fields.contains_key("name") {
            let name = Value::String(code.to_string());
            fields.insert("name".into(), name);
        }

        let id = format!("cmp-{}", self.next_id());
        fields.insert("id".into(), json!(id));
        fields.insert("status".into(), json!("active"));
        fields.insert("departments".into(), json!([]));
        fields.insert("positions".into(), json!([]));

        let company = Value::Object(fields);
        self.companies.insert(id.clone(), company.clone());
        self.employees.insert(id, BTreeMap::new());
        Ok(company)
    }

    fn validate_employee(&self, company: &str, fields: &Map<String, Value>) -> Result<(), Response> {
        let email = fields.get("email").and_then(Value::as_str);
        let lastname = fields.get("lastname").and_then(Value::as_str);
        let (Some(email), Some(_)) = (email, lastname) else {
            return Err(error(StatusCode::BAD_REQUEST, "email and lastname are required"));
        };
        if !email.contains('@') {
            return Err(error(StatusCode::BAD_REQUEST, "email must be a valid email"));
        }
        let taken = self
            .employees
            .get(company)
            .map(|staff| staff.values().any(|e| e["email"] == email))
            .unwrap_or(false);
        if taken {
            return Err(error(StatusCode::CONFLICT, "email already exists"));
        }
        Ok(())
    }

    fn insert_employee(&mut self, company: &str, body: Value) -> Result<Value, Response> {
        self.company(company)?;
        let mut fields = object(body)?;
        self.validate_employee(company, &fields)?;

        let id = format!("emp-{}", self.next_id());
        fields.insert("id".into(), json!(id));
        fields.insert("companyId".into(), json!(company));
        let employee = Value::Object(fields);
        self.employees
            .entry(company.to_string())
            .or_default()
            .insert(id, employee.clone());
        Ok(employee)
    }

    fn survey_view(&self, id: u64, locale: Option<&str>) -> Option<Value> {
        let mut survey = self.surveys.get(&id)?.clone();
        let mut questions = self.questions.get(&id).cloned().unwrap_or_default();
        if locale == Some("TH") {
            for question in &mut questions {
                question["questionText"] = json!("คุณพอใจแค่ไหน?");
            }
        }
        survey["questions"] = Value::Array(questions);
        if let Some(locale) = locale {
            survey["locale"] = json!(locale);
        }
        Some(survey)
    }
}

// ============================================================================
// Server
// ============================================================================

/// Running mock backoffice bound to 127.0.0.1
pub struct MockBackoffice {
    pub base_url: String,
    store: Mock,
}

impl MockBackoffice {
    pub async fn start() -> Self {
        init_tracing();

        let store: Mock = Arc::new(Mutex::new(Store::new()));
        let app = router(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backoffice");
        let addr = listener.local_addr().expect("mock backoffice addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backoffice server");
        });

        Self {
            base_url: format!("http://{}", addr),
            store,
        }
    }

    /// Environment pointing at this mock with the admin credentials
    pub fn env(&self) -> EnvConfig {
        EnvConfig {
            api_base_url: self.base_url.clone(),
            api_timeout_ms: 5_000,
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
        }
    }

    /// Fresh unauthenticated harness
    pub fn harness(&self) -> ApiHarness {
        ApiHarness::with_env(self.env(), HarnessOptions::new()).expect("harness")
    }

    pub fn harness_with(&self, options: HarnessOptions) -> ApiHarness {
        ApiHarness::with_env(self.env(), options).expect("harness")
    }

    /// Log in with one harness, then build a second one with the token
    pub async fn admin_harness(&self) -> ApiHarness {
        let mut login = self.harness();
        let token = login.login_admin().await.expect("admin login");
        self.harness_with(HarnessOptions::new().token(token))
    }

    pub fn set_login_limit(&self, limit: usize) {
        self.store.lock().login_limit = limit;
    }

    /// Make deletes of this company answer 500
    pub fn fail_deletes_of(&self, company_id: &str) {
        self.store.lock().undeletable.insert(company_id.to_string());
    }

    pub fn company_count(&self) -> usize {
        self.store.lock().companies.len()
    }

    pub fn has_company(&self, id: &str) -> bool {
        self.store.lock().companies.contains_key(id)
    }

    pub fn survey_count(&self) -> usize {
        self.store.lock().surveys.len()
    }

    pub fn export_job_count(&self) -> usize {
        self.store.lock().export_jobs.len()
    }

    /// Requests that reached an authenticated route
    pub fn request_count(&self) -> usize {
        self.store.lock().requests
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn router(store: Mock) -> Router {
    let auth_state = store.clone();
    let auth_layer = middleware::from_fn(move |req: Request, next: Next| {
        let store = auth_state.clone();
        async move { require_bearer(store, req, next).await }
    });

    let mut protected: Router<Mock> = Router::new()
        .route("/admin/slow", get(slow))
        // companies
        .route("/admin/company", get(list_companies).post(create_company))
        .route("/admin/company/bulk/create", post(bulk_create_companies))
        .route("/admin/company/bulk/update", put(bulk_update_companies))
        .route("/admin/company/bulk/delete", post(bulk_delete_companies))
        .route(
            "/admin/company/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/admin/company/:id/suspend", put(suspend_company))
        .route("/admin/company/:id/activate", put(activate_company))
        .route("/admin/company/:id/departments", post(create_department))
        .route("/admin/company/:id/positions", post(create_position))
        // employees
        .route(
            "/admin/company/:id/employees",
            get(list_employees).post(create_employee),
        )
        .route(
            "/admin/company/:id/employees/bulk/create",
            post(bulk_create_employees),
        )
        .route(
            "/admin/company/:id/employees/:employee",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        // surveys
        .route("/admin/survey", get(list_surveys).post(create_survey))
        .route(
            "/admin/survey/:id",
            get(get_survey).put(update_survey).delete(delete_survey),
        )
        .route("/admin/survey/:id/activate", put(activate_survey))
        .route("/admin/survey/:id/deactivate", put(deactivate_survey))
        .route("/admin/survey/:id/delist", put(delist_survey))
        .route(
            "/admin/survey/:id/questions",
            get(list_questions).post(add_question),
        )
        .route("/admin/survey/:id/reviewers", post(assign_reviewers))
        .route(
            "/admin/survey/:id/assignments",
            get(list_assignments).post(assign_employee),
        )
        .route("/admin/survey/:id/generate-token", post(generate_token))
        .route("/admin/reviewer", post(create_reviewer))
        .route("/admin/reviewer/:id/employees", post(assign_reviewer))
        // exports and reporting
        .route(
            "/admin/survey/:id/export-jobs",
            get(list_export_jobs).post(create_export_job),
        )
        .route(
            "/admin/export-job/:id",
            get(get_export_job).delete(delete_export_job),
        )
        .route("/admin/survey/:id/statistics", get(statistics))
        .route("/admin/survey/:id/export", get(export_survey))
        .route("/admin/survey/:id/generate-report", post(generate_report));

    for view in [
        "question-statistics",
        "response-distribution",
        "response-rate-by-department",
        "completion-rate-timeline",
        "average-response-time",
        "sentiment-analysis",
        "trends",
        "dashboard",
    ] {
        protected = protected.route(
            &format!("/admin/survey/:id/{}", view),
            get(move |State(store): State<Mock>, Path(id): Path<u64>| async move {
                report_view(store, id, view)
            }),
        );
    }

    let protected = protected.layer(auth_layer);

    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/admin/auth/login", post(login))
        .route("/survey/:id", get(visitor_survey))
        .route("/survey/:id/submit", post(submit_survey))
        .merge(protected)
        .with_state(store)
}

async fn require_bearer(store: Mock, request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let authorized = {
        let mut store = store.lock();
        store.requests += 1;
        token.map(|t| store.tokens.contains(&t)).unwrap_or(false)
    };

    if authorized {
        next.run(request).await
    } else {
        error(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "statusCode": status.as_u16(), "message": message })),
    )
        .into_response()
}

fn ok(body: Value) -> HandlerResult {
    Ok(Json(body).into_response())
}

fn created(body: Value) -> HandlerResult {
    Ok((StatusCode::CREATED, Json(body)).into_response())
}

fn object(body: Value) -> Result<Map<String, Value>, Response> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(error(StatusCode::BAD_REQUEST, "body must be an object")),
    }
}

fn merge(target: &mut Value, patch: Value) {
    if let (Some(target), Value::Object(patch)) = (target.as_object_mut(), patch) {
        for (key, value) in patch {
            if key != "id" {
                target.insert(key, value);
            }
        }
    }
}

fn paginate(items: Vec<Value>, params: &HashMap<String, String>) -> Value {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(20).max(1);
    let total = items.len();
    let data: Vec<Value> = items.into_iter().skip((page - 1) * limit).take(limit).collect();
    json!({
        "data": data,
        "meta": { "page": page, "limit": limit, "total": total },
    })
}

fn matches_filters(item: &Value, params: &HashMap<String, String>, search_fields: &[&str]) -> bool {
    if let Some(status) = params.get("status") {
        if item["status"].as_str() != Some(status.as_str()) {
            return false;
        }
    }
    if let Some(term) = params.get("search") {
        let term = term.to_lowercase();
        return search_fields.iter().any(|field| {
            item[*field]
                .as_str()
                .map(|v| v.to_lowercase().contains(&term))
                .unwrap_or(false)
        });
    }
    true
}

// ============================================================================
// Handlers: auth
// ============================================================================

async fn login(State(store): State<Mock>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock();
    if store.failed_logins >= store.login_limit {
        return error(StatusCode::TOO_MANY_REQUESTS, "Too many login attempts");
    }

    let username = body["username"].as_str().unwrap_or("");
    let password = body["password"].as_str().unwrap_or("");
    if username.is_empty() || password.is_empty() {
        store.failed_logins += 1;
        return error(StatusCode::BAD_REQUEST, "username and password are required");
    }
    if username != ADMIN_USERNAME || password != ADMIN_PASSWORD {
        store.failed_logins += 1;
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let token = format!("tok-{}", uuid::Uuid::new_v4().simple());
    store.tokens.insert(token.clone());
    Json(json!({ "accessToken": token, "tokenType": "Bearer" })).into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "slow": true })).into_response()
}

// ============================================================================
// Handlers: companies
// ============================================================================

async fn create_company(State(store): State<Mock>, Json(body): Json<Value>) -> HandlerResult {
    let company = store.lock().insert_company(body)?;
    created(company)
}

async fn get_company(State(store): State<Mock>, Path(id): Path<String>) -> HandlerResult {
    ok(store.lock().company(&id)?.clone())
}

async fn update_company(
    State(store): State<Mock>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    let company = store
        .companies
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Company not found"))?;
    merge(company, body);
    ok(company.clone())
}

async fn delete_company(State(store): State<Mock>, Path(id): Path<String>) -> HandlerResult {
    let mut store = store.lock();
    if store.undeletable.contains(&id) {
        return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "Company is locked"));
    }
    store
        .companies
        .remove(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Company not found"))?;
    store.employees.remove(&id);
    ok(json!({ "message": "Company suspended successfully" }))
}

async fn list_companies(
    State(store): State<Mock>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let store = store.lock();
    let items: Vec<Value> = store
        .companies
        .values()
        .filter(|c| matches_filters(c, &params, &["name", "code"]))
        .cloned()
        .collect();
    ok(paginate(items, &params))
}

async fn set_company_status(store: Mock, id: String, status: &str) -> HandlerResult {
    let mut store = store.lock();
    let company = store
        .companies
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Company not found"))?;
    company["status"] = json!(status);
    ok(json!({ "message": format!("Company {} successfully", status), "status": status }))
}

async fn suspend_company(State(store): State<Mock>, Path(id): Path<String>) -> HandlerResult {
    set_company_status(store, id, "suspended").await
}

async fn activate_company(State(store): State<Mock>, Path(id): Path<String>) -> HandlerResult {
    set_company_status(store, id, "active").await
}

async fn add_company_child(store: Mock, id: String, list: &str, body: Value) -> HandlerResult {
    let mut store = store.lock();
    let child_id = store.next_id();
    let company = store
        .companies
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Company not found"))?;
    let mut child = object(body)?;
    child.insert("id".into(), json!(child_id));
    let child = Value::Object(child);
    if let Some(items) = company[list].as_array_mut() {
        items.push(child.clone());
    }
    created(child)
}

async fn create_department(
    State(store): State<Mock>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult {
    add_company_child(store, id, "departments", body).await
}

async fn create_position(
    State(store): State<Mock>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult {
    add_company_child(store, id, "positions", body).await
}

async fn bulk_create_companies(State(store): State<Mock>, Json(body): Json<Value>) -> HandlerResult {
    let records = body["companies"].as_array().cloned().unwrap_or_default();
    let mut store = store.lock();
    let mut created_items = Vec::with_capacity(records.len());
    for record in records {
        created_items.push(store.insert_company(record)?);
    }
    created(json!({ "data": created_items }))
}

async fn bulk_update_companies(State(store): State<Mock>, Json(body): Json<Value>) -> HandlerResult {
    let updates = body["companies"].as_array().cloned().unwrap_or_default();
    let mut store = store.lock();
    let mut updated = Vec::with_capacity(updates.len());
    for update in updates {
        let id = update["id"].as_str().unwrap_or_default().to_string();
        let company = store
            .companies
            .get_mut(&id)
            .ok_or_else(|| error(StatusCode::NOT_FOUND, "Company not found"))?;
        merge(company, update);
        updated.push(company.clone());
    }
    ok(Value::Array(updated))
}

async fn bulk_delete_companies(State(store): State<Mock>, Json(body): Json<Value>) -> HandlerResult {
    let ids = body["ids"].as_array().cloned().unwrap_or_default();
    let mut store = store.lock();
    for id in ids.iter().filter_map(Value::as_str) {
        store.companies.remove(id);
        store.employees.remove(id);
    }
    ok(json!({ "message": format!("{} companies suspended successfully", ids.len()) }))
}

// ============================================================================
// Handlers: employees
// ============================================================================

async fn create_employee(
    State(store): State<Mock>,
    Path(company): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let employee = store.lock().insert_employee(&company, body)?;
    created(employee)
}

async fn bulk_create_employees(
    State(store): State<Mock>,
    Path(company): Path<String>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let records = body["employees"].as_array().cloned().unwrap_or_default();
    let mut store = store.lock();
    store.company(&company)?;

    // all-or-nothing: validate against existing staff and within the batch
    let mut seen = HashSet::new();
    for record in &records {
        let fields = object(record.clone())?;
        store.validate_employee(&company, &fields)?;
        let email = fields["email"].as_str().unwrap_or_default().to_string();
        if !seen.insert(email) {
            return Err(error(StatusCode::CONFLICT, "duplicate email in batch"));
        }
    }

    let mut created_items = Vec::with_capacity(records.len());
    for record in records {
        created_items.push(store.insert_employee(&company, record)?);
    }
    created(Value::Array(created_items))
}

async fn get_employee(
    State(store): State<Mock>,
    Path((company, id)): Path<(String, String)>,
) -> HandlerResult {
    let store = store.lock();
    store.company(&company)?;
    store
        .employees
        .get(&company)
        .and_then(|staff| staff.get(&id))
        .cloned()
        .map(Json)
        .map(IntoResponse::into_response)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Employee not found"))
}

async fn update_employee(
    State(store): State<Mock>,
    Path((company, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    let employee = store
        .employees
        .get_mut(&company)
        .and_then(|staff| staff.get_mut(&id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Employee not found"))?;
    merge(employee, body);
    ok(employee.clone())
}

async fn delete_employee(
    State(store): State<Mock>,
    Path((company, id)): Path<(String, String)>,
) -> HandlerResult {
    let mut store = store.lock();
    store
        .employees
        .get_mut(&company)
        .and_then(|staff| staff.remove(&id))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Employee not found"))?;
    ok(json!({ "message": "Employee deleted successfully" }))
}

async fn list_employees(
    State(store): State<Mock>,
    Path(company): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let store = store.lock();
    store.company(&company)?;
    let items: Vec<Value> = store
        .employees
        .get(&company)
        .map(|staff| {
            staff
                .values()
                .filter(|e| matches_filters(e, &params, &["email", "firstname", "lastname"]))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    ok(paginate(items, &params))
}

// ============================================================================
// Handlers: surveys
// ============================================================================

async fn create_survey(State(store): State<Mock>, Json(body): Json<Value>) -> HandlerResult {
    let mut fields = object(body)?;
    if fields.get("code").and_then(Value::as_str).unwrap_or("").is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "code is required"));
    }
    let mut store = store.lock();
    let id = store.next_id();
    fields.insert("id".into(), json!(id));
    fields.entry("status").or_insert(json!("DRAFT"));
    let survey = Value::Object(fields);
    store.surveys.insert(id, survey.clone());
    created(survey)
}

async fn get_survey(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let store = store.lock();
    store
        .survey_view(id, params.get("locale").map(String::as_str))
        .map(|s| Json(s).into_response())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Survey not found"))
}

async fn update_survey(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    let survey = store.survey_mut(id)?;
    merge(survey, body);
    ok(survey.clone())
}

async fn delete_survey(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    let mut store = store.lock();
    store
        .surveys
        .remove(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Survey not found"))?;
    store.questions.remove(&id);
    ok(json!({ "message": "Survey deleted successfully" }))
}

async fn list_surveys(
    State(store): State<Mock>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let store = store.lock();
    let items: Vec<Value> = store
        .surveys
        .values()
        .filter(|s| matches_filters(s, &params, &["name", "code"]))
        .cloned()
        .collect();
    ok(paginate(items, &params))
}

async fn set_survey_status(store: Mock, id: u64, status: &str) -> HandlerResult {
    let mut store = store.lock();
    let survey = store.survey_mut(id)?;
    survey["status"] = json!(status);
    ok(survey.clone())
}

async fn activate_survey(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    set_survey_status(store, id, "ACTIVE").await
}

async fn deactivate_survey(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    set_survey_status(store, id, "INACTIVE").await
}

async fn delist_survey(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    set_survey_status(store, id, "DELIST").await
}

async fn add_question(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let mut fields = object(body)?;
    let question_id = store.next_id();
    fields.insert("id".into(), json!(question_id));
    fields.entry("isNested").or_insert(json!(false));
    let question = Value::Object(fields);
    store.questions.entry(id).or_default().push(question.clone());
    created(question)
}

async fn list_questions(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    ok(json!(store.questions.get(&id).cloned().unwrap_or_default()))
}

async fn assign_reviewers(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let count = body["assignments"].as_array().map(Vec::len).unwrap_or(0);
    ok(json!({ "message": format!("{} reviewers assigned successfully", count) }))
}

async fn assign_employee(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let assignment = json!({ "surveyId": id, "employeeId": body["employeeId"] });
    store.assignments.entry(id).or_default().push(assignment);
    created(json!({ "message": "Employee assigned successfully" }))
}

async fn list_assignments(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    ok(json!(store.assignments.get(&id).cloned().unwrap_or_default()))
}

async fn create_reviewer(State(store): State<Mock>, Json(body): Json<Value>) -> HandlerResult {
    let mut fields = object(body)?;
    let id = store.lock().next_id();
    fields.insert("id".into(), json!(id));
    created(Value::Object(fields))
}

async fn assign_reviewer(Path(id): Path<u64>, Json(body): Json<Value>) -> HandlerResult {
    ok(json!({
        "message": "Reviewer assigned successfully",
        "reviewerId": id,
        "employeeId": body["employeeId"],
    }))
}

async fn generate_token(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let token = format!("visit-{}", uuid::Uuid::new_v4().simple());
    store.visitor_tokens.insert(token.clone(), id);
    created(json!({ "token": token, "employeeId": body["employeeId"] }))
}

async fn visitor_survey(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let store = store.lock();
    let valid = params
        .get("token")
        .and_then(|t| store.visitor_tokens.get(t))
        .map(|survey| *survey == id)
        .unwrap_or(false);
    if !valid {
        return Err(error(StatusCode::UNAUTHORIZED, "Invalid survey token"));
    }
    store
        .survey_view(id, params.get("locale").map(String::as_str))
        .map(|s| Json(s).into_response())
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Survey not found"))
}

async fn submit_survey(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let answers = body["answers"].as_array().cloned().unwrap_or_default();
    if answers.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "answers must not be empty"));
    }
    store.responses.entry(id).or_default().push(Value::Array(answers));
    ok(json!({ "message": "Survey submitted successfully" }))
}

// ============================================================================
// Handlers: exports and reporting
// ============================================================================

async fn create_export_job(
    State(store): State<Mock>,
    Path(survey): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(survey)?;
    let id = store.next_id();
    let job = json!({
        "id": id,
        "surveyId": survey,
        "type": body["type"].as_str().unwrap_or("SURVEY_DATA"),
        "status": "PENDING",
    });
    store.export_jobs.insert(id, job.clone());
    created(job)
}

/// Each status check moves a job one step: PENDING → PROCESSING → COMPLETED
async fn get_export_job(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    let mut store = store.lock();
    let job = store
        .export_jobs
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Export job not found"))?;
    let next = match job["status"].as_str() {
        Some("PENDING") => "PROCESSING",
        _ => "COMPLETED",
    };
    job["status"] = json!(next);
    if next == "COMPLETED" {
        job["downloadUrl"] = json!(format!("/downloads/export-{}.xlsx", id));
    }
    ok(job.clone())
}

async fn list_export_jobs(State(store): State<Mock>, Path(survey): Path<u64>) -> HandlerResult {
    let store = store.lock();
    let jobs: Vec<Value> = store
        .export_jobs
        .values()
        .filter(|j| j["surveyId"] == survey)
        .cloned()
        .collect();
    ok(json!({ "data": jobs }))
}

async fn delete_export_job(State(store): State<Mock>, Path(id): Path<u64>) -> HandlerResult {
    store
        .lock()
        .export_jobs
        .remove(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Export job not found"))?;
    ok(json!({ "message": "Export job deleted successfully" }))
}

async fn statistics(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let responses = store.responses.get(&id).map(Vec::len).unwrap_or(0);
    let employees = store.assignments.get(&id).map(Vec::len).unwrap_or(0);
    let questions = store.questions.get(&id).map(Vec::len).unwrap_or(0);
    let completion = if employees == 0 {
        0.0
    } else {
        responses as f64 / employees as f64
    };
    ok(json!({
        "totalResponses": responses,
        "totalEmployees": employees,
        "totalReviewers": 0,
        "totalQuestions": questions,
        "completionRate": completion,
        "startDate": params.get("startDate"),
        "endDate": params.get("endDate"),
    }))
}

fn report_view(store: Mock, id: u64, view: &str) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    ok(json!({ "surveyId": id, "view": view, "data": [] }))
}

async fn export_survey(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let (content_type, body): (&str, Vec<u8>) = match params.get("format").map(String::as_str) {
        Some("csv") => ("text/csv", b"questionId,answer\n1,5\n".to_vec()),
        Some("xlsx") => (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            b"PK\x03\x04mock-xlsx".to_vec(),
        ),
        Some("json") => ("application/json", br#"{"responses":[]}"#.to_vec()),
        _ => return Err(error(StatusCode::BAD_REQUEST, "unsupported format")),
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

async fn generate_report(
    State(store): State<Mock>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> HandlerResult {
    let mut store = store.lock();
    store.survey_mut(id)?;
    let (content_type, bytes): (&str, Vec<u8>) = match body["format"].as_str() {
        Some("pdf") => ("application/pdf", b"%PDF-1.4 mock".to_vec()),
        Some("pptx") => (
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            b"PK\x03\x04mock-pptx".to_vec(),
        ),
        _ => return Err(error(StatusCode::BAD_REQUEST, "unsupported format")),
    };
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
