//! Wire types for the survey backoffice API
//!
//! Identifiers are opaque: the harness stores and forwards them without
//! inspecting their structure. Resource structs name only the fields the
//! harness or its callers routinely read; everything else the server sends
//! is kept in `extra`.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{HarnessError, HarnessResult};

// ============================================================================
// Identifiers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                StringOrNumber::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

string_id!(
    /// Company identifier (string on the wire, numbers tolerated)
    CompanyId
);
string_id!(
    /// Employee identifier
    EmployeeId
);

/// Survey identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(pub u64);

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SurveyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier that the backoffice sends either as a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexId {
    Number(u64),
    Text(String),
}

impl fmt::Display for FlexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexId::Number(n) => write!(f, "{}", n),
            FlexId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FlexId {
    fn from(id: u64) -> Self {
        FlexId::Number(id)
    }
}

impl From<&str> for FlexId {
    fn from(id: &str) -> Self {
        FlexId::Text(id.to_string())
    }
}

pub type ExportJobId = FlexId;
pub type QuestionId = FlexId;
pub type ReviewerId = FlexId;

// ============================================================================
// Export job status
// ============================================================================

/// Export job lifecycle status, parsed case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExportJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Anything else the server reports, kept verbatim
    Other(String),
}

impl ExportJobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ExportJobStatus::Pending => "pending",
            ExportJobStatus::Processing => "processing",
            ExportJobStatus::Completed => "completed",
            ExportJobStatus::Failed => "failed",
            ExportJobStatus::Other(s) => s,
        }
    }

    /// No further transitions are expected
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportJobStatus::Completed | ExportJobStatus::Failed)
    }
}

impl FromStr for ExportJobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "pending" => ExportJobStatus::Pending,
            "processing" => ExportJobStatus::Processing,
            "completed" => ExportJobStatus::Completed,
            "failed" => ExportJobStatus::Failed,
            _ => ExportJobStatus::Other(s.to_string()),
        })
    }
}

impl From<String> for ExportJobStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<ExportJobStatus> for String {
    fn from(status: ExportJobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ExportJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Resources
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: SurveyId,
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(alias = "questionText")]
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    pub id: ReviewerId,
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJob {
    #[serde(default)]
    pub id: Option<ExportJobId>,
    #[serde(default)]
    pub job_id: Option<ExportJobId>,
    pub status: ExportJobStatus,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub download_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExportJob {
    /// Job identifier; `jobId` wins over `id` when both are sent
    pub fn id(&self) -> Option<&ExportJobId> {
        self.job_id.as_ref().or(self.id.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStatistics {
    pub total_responses: Option<u64>,
    pub total_employees: Option<u64>,
    pub total_reviewers: Option<u64>,
    pub total_questions: Option<u64>,
    pub completion_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Visitor token issued for token-qualified survey access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitorToken {
    pub token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Acknowledgement body of an action (delete, assign, submit, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    pub message: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Listing envelope: `{ data: [...], meta | pagination: {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub pagination: Option<Value>,
}

impl<T> Page<T> {
    /// Paging metadata from `meta`, falling back to `pagination`
    pub fn meta(&self) -> Option<&Value> {
        self.meta.as_ref().or(self.pagination.as_ref())
    }
}

/// Bulk endpoints answer with a bare array or a `data` envelope
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListOrEnvelope<T> {
    List(Vec<T>),
    Envelope { data: Vec<T> },
}

impl<T> ListOrEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListOrEnvelope::List(items) => items,
            ListOrEnvelope::Envelope { data } => data,
        }
    }
}

// ============================================================================
// Request parameters
// ============================================================================

/// Query parameters accepted by listing endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Input of `bulk_create_employees`
#[derive(Debug, Clone)]
pub enum EmployeeBatch {
    /// Generate this many synthetic employees
    Generate(usize),
    /// Forward pre-built records unchanged
    Records(Vec<Value>),
}

impl From<usize> for EmployeeBatch {
    fn from(count: usize) -> Self {
        EmployeeBatch::Generate(count)
    }
}

impl From<Vec<Value>> for EmployeeBatch {
    fn from(records: Vec<Value>) -> Self {
        EmployeeBatch::Records(records)
    }
}

/// Direct export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Json => "json",
        }
    }
}

/// Generated report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Pptx,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Pptx => "pptx",
        }
    }
}

/// Read-only reporting views under `/admin/survey/{id}/...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView {
    Statistics,
    QuestionStatistics,
    ResponseDistribution,
    ResponseRateByDepartment,
    CompletionRateTimeline,
    AverageResponseTime,
    SentimentAnalysis,
    Trends,
    Dashboard,
}

impl ReportView {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReportView::Statistics => "statistics",
            ReportView::QuestionStatistics => "question-statistics",
            ReportView::ResponseDistribution => "response-distribution",
            ReportView::ResponseRateByDepartment => "response-rate-by-department",
            ReportView::CompletionRateTimeline => "completion-rate-timeline",
            ReportView::AverageResponseTime => "average-response-time",
            ReportView::SentimentAnalysis => "sentiment-analysis",
            ReportView::Trends => "trends",
            ReportView::Dashboard => "dashboard",
        }
    }
}

/// Date window for statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl StatisticsRange {
    /// The last `days` days up to now
    pub fn last_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - chrono::Duration::days(days),
            end,
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", self.start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("endDate", self.end.to_rfc3339_opts(SecondsFormat::Millis, true)),
        ]
    }
}

// ============================================================================
// Binary payloads
// ============================================================================

/// Raw response body with its content type (exports, reports)
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ExportPayload {
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains("json"))
            .unwrap_or(false)
    }

    pub fn content_type_contains(&self, needle: &str) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.contains(needle))
            .unwrap_or(false)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> HarnessResult<T> {
        serde_json::from_slice(&self.bytes).map_err(|e| HarnessError::decode("export payload", e))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
