//! CKAN datastore client for the Sapporo food-license catalog.
//!
//! One fetch per call, no retry, no caching. The raw success envelope is kept
//! alongside the parsed records so pass-through tools can return it verbatim.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Base path of the Sapporo open-data portal's CKAN action API.
pub const DEFAULT_CKAN_BASE: &str = "https://ckan.pf-sapporo.jp/api/3/action";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Column names used by the food-business license dataset.
pub mod fields {
    /// Facility name (屋号).
    pub const NAME: &str = "屋号";
    /// Business type (業種区分名).
    pub const BUSINESS_TYPE: &str = "業種区分名";
    /// Facility address (施設所在地).
    pub const ADDRESS: &str = "施設所在地";
    /// Ward (区名).
    pub const WARD: &str = "区名";
    /// License number (許可番号).
    pub const LICENSE_NUMBER: &str = "許可番号";
    /// License date (許可年月日).
    pub const LICENSE_DATE: &str = "許可年月日";
    /// Applicant name (申請者名).
    pub const APPLICANT: &str = "申請者名";
}

/// Immutable client configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub resource_id: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    #[must_use]
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_CKAN_BASE.to_string(),
            resource_id: resource_id.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A bounded datastore query: optional keyword, optional row limit.
///
/// With a keyword the catalog performs relevance-ranked full-text matching
/// across all fields; without one it returns rows in source order.
#[derive(Debug, Clone, Default)]
pub struct DatastoreQuery {
    pub keyword: Option<String>,
    pub limit: Option<u32>,
}

impl DatastoreQuery {
    #[must_use]
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            limit: None,
        }
    }

    #[must_use]
    pub const fn limit(limit: u32) -> Self {
        Self {
            keyword: None,
            limit: Some(limit),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One flat facility record as returned by the datastore.
///
/// Fields are not validated; accessors return a typed optional and callers
/// decide how to normalize absent values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityRecord(Map<String, Value>);

impl FacilityRecord {
    /// Returns the string value of a field, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.field(fields::NAME)
    }

    #[must_use]
    pub fn ward(&self) -> Option<&str> {
        self.field(fields::WARD)
    }

    #[must_use]
    pub fn business_type(&self) -> Option<&str> {
        self.field(fields::BUSINESS_TYPE)
    }
}

impl From<Map<String, Value>> for FacilityRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A fetched batch: parsed records plus the raw success envelope.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    raw: Value,
    records: Vec<FacilityRecord>,
}

impl RecordBatch {
    /// Builds a batch from a datastore response envelope.
    ///
    /// # Errors
    /// Returns `CatalogError::SourceFailure` carrying the untouched envelope
    /// when it reports `success: false`, or `CatalogError::Decode` when the
    /// records array does not parse.
    pub fn from_envelope(envelope: Value) -> Result<Self, CatalogError> {
        let success = envelope
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            return Err(CatalogError::SourceFailure(envelope));
        }
        let records = match envelope.pointer("/result/records") {
            Some(value) => serde_json::from_value(value.clone()).map_err(CatalogError::Decode)?,
            None => Vec::new(),
        };
        Ok(Self {
            raw: envelope,
            records,
        })
    }

    #[must_use]
    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the batch and returns the raw envelope for pass-through.
    #[must_use]
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

#[derive(Debug)]
pub enum CatalogError {
    /// Transport or connection failure before a response arrived.
    Unavailable(reqwest::Error),
    /// The single outbound call exceeded the configured client timeout.
    Timeout(reqwest::Error),
    /// The catalog answered with a non-2xx status.
    Rejected { status: u16, body: String },
    /// HTTP 200 but the envelope reported `success: false`; preserved verbatim.
    SourceFailure(Value),
    /// The response body was not the expected JSON shape.
    Decode(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(err) => write!(f, "catalog unavailable: {err}"),
            Self::Timeout(err) => write!(f, "catalog request timed out: {err}"),
            Self::Rejected { status, .. } => {
                write!(f, "catalog rejected the request with status {status}")
            }
            Self::SourceFailure(_) => write!(f, "catalog reported a failed query"),
            Self::Decode(err) => write!(f, "catalog response did not parse: {err}"),
        }
    }
}

impl Error for CatalogError {}

/// Client for the `datastore_search` endpoint.
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Builds a client with the configured request timeout.
    ///
    /// # Errors
    /// Returns `CatalogError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CatalogError::Unavailable)?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Issues one bounded query against the catalog.
    ///
    /// # Errors
    /// Returns a `CatalogError` for transport failures, non-2xx responses,
    /// undecodable bodies, or a source-reported failure envelope.
    pub async fn fetch(&self, query: &DatastoreQuery) -> Result<RecordBatch, CatalogError> {
        let url = format!(
            "{}/datastore_search",
            self.config.base_url.trim_end_matches('/')
        );
        let mut params: Vec<(&str, String)> =
            vec![("resource_id", self.config.resource_id.clone())];
        if let Some(keyword) = &query.keyword {
            params.push(("q", keyword.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        debug!(url = %url, keyword = ?query.keyword, limit = ?query.limit, "querying datastore");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(map_transport_err)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_err)?;
        if !status.is_success() {
            return Err(CatalogError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        let envelope: Value = serde_json::from_str(&body).map_err(CatalogError::Decode)?;
        RecordBatch::from_envelope(envelope)
    }
}

fn map_transport_err(err: reqwest::Error) -> CatalogError {
    if err.is_timeout() {
        CatalogError::Timeout(err)
    } else {
        CatalogError::Unavailable(err)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn batch_parses_success_envelope() {
        let envelope = json!({
            "success": true,
            "result": {
                "records": [
                    {"区名": "中央区", "業種区分名": "スナック", "屋号": "さっぽろ亭"},
                    {"業種区分名": "食堂"}
                ]
            }
        });

        let batch = RecordBatch::from_envelope(envelope.clone()).expect("envelope should parse");

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.records()[0].ward(), Some("中央区"));
        assert_eq!(batch.records()[0].name(), Some("さっぽろ亭"));
        assert_eq!(batch.records()[1].ward(), None);
        assert_eq!(batch.into_raw(), envelope);
    }

    #[test]
    fn batch_tolerates_missing_records_array() {
        let envelope = json!({"success": true, "result": {"total": 0}});
        let batch = RecordBatch::from_envelope(envelope).expect("envelope should parse");
        assert!(batch.is_empty());
    }

    #[test]
    fn source_failure_keeps_envelope_verbatim() {
        let envelope = json!({
            "success": false,
            "error": {"message": "resource not found", "__type": "Not Found Error"}
        });

        let err = RecordBatch::from_envelope(envelope.clone())
            .expect_err("failed envelope should not build a batch");
        match err {
            CatalogError::SourceFailure(raw) => assert_eq!(raw, envelope),
            other => panic!("expected SourceFailure, got {other:?}"),
        }
    }

    #[test]
    fn record_field_access_is_typed() {
        let mut map = Map::new();
        map.insert("区名".to_string(), Value::String("北区".to_string()));
        map.insert("_id".to_string(), json!(42));
        let record = FacilityRecord::from(map);

        assert_eq!(record.field("区名"), Some("北区"));
        // Non-string values surface as absent rather than coerced.
        assert_eq!(record.field("_id"), None);
        assert_eq!(record.field("許可番号"), None);
    }
}
