//! HTTP client for the campusdesk REST API.
//!
//! One client implements all three repository traits of the core crate, so
//! the services never see reqwest types. Every request carries the session's
//! bearer token.

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use campusdesk_core::admissions::{AdmissionDetails, AdmissionRepositoryTrait};
use campusdesk_core::agents::{Agent, AgentRepositoryTrait};
use campusdesk_core::errors::{CollaboratorError, Error, Result};
use campusdesk_core::payments::{
    Attachment, ConflictingPayment, NewPayment, PaymentRepositoryTrait,
};

use crate::session::Session;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default base URL of the back-office API.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing REST responses)
// ─────────────────────────────────────────────────────────────────────────────

/// Most endpoints wrap their payload in `{ "data": ... }`.
#[derive(Debug, serde::Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

#[derive(Debug, serde::Deserialize)]
struct ApiCheckRefResponse {
    #[serde(default)]
    exists: bool,
    #[serde(default)]
    payment: Option<ApiConflictingPayment>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiConflictingPayment {
    #[serde(default)]
    student_name: Option<String>,
    #[serde(default)]
    admission_no: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the back-office REST API.
///
/// # Example
///
/// ```ignore
/// let client = ApiClient::new("http://localhost:5000/api", &session, Duration::from_secs(30))?;
/// let details = client.get_admission_details("665f0c...").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
}

impl ApiClient {
    /// Create a new API client for `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token cannot be used as a header value
    /// or the HTTP client cannot be initialized.
    pub fn new(base_url: &str, session: &Session, timeout: Duration) -> Result<Self> {
        let auth_header = HeaderValue::from_str(&format!("Bearer {}", session.access_token))
            .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Headers for JSON requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = self.auth_headers();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Bearer token only; multipart bodies set their own content type.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Make a GET request and parse the response.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("[Api] GET {}", url);

        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(transport_error)?;

        self.parse_response(response).await
    }

    /// Make a POST request with an optional JSON body; only the status is used.
    async fn post(&self, path: &str, body: Option<&serde_json::Value>) -> Result<()> {
        let url = self.url(path);
        debug!("[Api] POST {}", url);

        let mut request = self.client.post(&url).headers(self.headers());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(transport_error)?;

        self.expect_success(response).await
    }

    /// Parse an HTTP response, handling errors appropriately.
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::Collaborator(CollaboratorError::Transport(format!(
                "Failed to read response: {}",
                e
            )))
        })?;

        decode_body(status, &body)
    }

    /// Accept any 2xx response, ignoring the body (writes may answer 201/204
    /// with nothing in it).
    async fn expect_success(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        check_status(status, &body)
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    error!("[Api] Request failed: {}", e);
    Error::Collaborator(CollaboratorError::Transport(e.to_string()))
}

/// Maps a non-success status to a collaborator error, preferring the body's message.
fn check_status(status: StatusCode, body: &str) -> Result<()> {
    if !status.is_success() {
        // Prefer the server's own message when the body carries one
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or_else(|| body.chars().take(200).collect::<String>());

        if status == StatusCode::NOT_FOUND {
            return Err(Error::Collaborator(CollaboratorError::NotFound(message)));
        }
        return Err(Error::Collaborator(CollaboratorError::Status {
            status: status.as_u16(),
            message,
        }));
    }
    Ok(())
}

/// Turns a status and body into a typed value or a collaborator error.
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| {
        Error::Collaborator(CollaboratorError::Decode(format!(
            "{} - {}",
            e,
            body.chars().take(200).collect::<String>()
        )))
    })
}

/// Maps the check-ref response to the payment owning the reference.
fn conflicting_payment(response: ApiCheckRefResponse) -> Option<ConflictingPayment> {
    if !response.exists {
        return None;
    }
    let payment = response.payment;
    Some(ConflictingPayment {
        student_name: payment
            .as_ref()
            .and_then(|p| p.student_name.clone())
            .unwrap_or_default(),
        admission_no: payment
            .and_then(|p| p.admission_no)
            .unwrap_or_default(),
    })
}

/// Builds the multipart body: the payment as a JSON `data` field plus the file.
fn multipart_form(payment: &NewPayment, attachment: Attachment) -> Result<Form> {
    let data = serde_json::to_string(payment)
        .map_err(|e| Error::Unexpected(format!("Failed to encode payment: {}", e)))?;
    let part = Part::bytes(attachment.bytes)
        .file_name(attachment.file_name)
        .mime_str(&attachment.content_type)
        .map_err(|e| Error::Unexpected(format!("Invalid attachment type: {}", e)))?;
    Ok(Form::new().text("data", data).part("attachment", part))
}

// ─────────────────────────────────────────────────────────────────────────────
// Admission Endpoints
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AdmissionRepositoryTrait for ApiClient {
    async fn get_admission_details(&self, admission_id: &str) -> Result<AdmissionDetails> {
        let envelope: ApiEnvelope<AdmissionDetails> = self
            .get(&format!(
                "/admissions/{}/details",
                urlencoding::encode(admission_id)
            ))
            .await?;
        Ok(envelope.data)
    }

    async fn recalculate_admission(&self, admission_id: &str) -> Result<()> {
        let path = format!(
            "/admissions/{}/recalculate",
            urlencoding::encode(admission_id)
        );
        self.post(&path, None).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Agent Endpoints
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AgentRepositoryTrait for ApiClient {
    async fn list_agents(&self, limit: u32) -> Result<Vec<Agent>> {
        let envelope: ApiEnvelope<Vec<Agent>> =
            self.get(&format!("/agents?limit={}", limit)).await?;
        debug!("[Api] Loaded {} agents", envelope.data.len());
        Ok(envelope.data)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment Endpoints
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepositoryTrait for ApiClient {
    async fn find_by_transaction_ref(
        &self,
        reference: &str,
    ) -> Result<Option<ConflictingPayment>> {
        let response: ApiCheckRefResponse = self
            .get(&format!(
                "/payments/check-ref?transactionRef={}",
                urlencoding::encode(reference)
            ))
            .await?;
        Ok(conflicting_payment(response))
    }

    async fn create_payment(
        &self,
        payment: NewPayment,
        attachment: Option<Attachment>,
    ) -> Result<()> {
        let url = self.url("/payments");

        let response = match attachment {
            Some(attachment) => {
                debug!("[Api] POST {} (multipart, {})", url, attachment.file_name);
                let form = multipart_form(&payment, attachment)?;
                self.client
                    .post(&url)
                    .headers(self.auth_headers())
                    .multipart(form)
                    .send()
                    .await
                    .map_err(transport_error)?
            }
            None => {
                debug!("[Api] POST {}", url);
                self.client
                    .post(&url)
                    .headers(self.headers())
                    .json(&payment)
                    .send()
                    .await
                    .map_err(transport_error)?
            }
        };

        self.expect_success(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusdesk_core::users::{CurrentUser, UserRole};

    fn session() -> Session {
        Session {
            access_token: "test-token".to_string(),
            user: CurrentUser {
                id: "u-1".to_string(),
                name: "Office".to_string(),
                role: UserRole::Admin,
            },
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(
            DEFAULT_API_URL,
            &session(),
            Duration::from_millis(DEFAULT_TIMEOUT_MS),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_url_normalization() {
        let client =
            ApiClient::new("http://localhost:5000/api/", &session(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:5000/api");
        assert_eq!(
            client.url("/payments"),
            "http://localhost:5000/api/payments"
        );
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let mut bad = session();
        bad.access_token = "abc\ndef".to_string();
        assert!(ApiClient::new(DEFAULT_API_URL, &bad, Duration::from_secs(5)).is_err());
    }

    #[test]
    fn test_decode_details_envelope() {
        let body = r#"{
            "data": {
                "admission": {
                    "_id": "adm-1",
                    "admissionNo": "ADM-2024-0042",
                    "student": { "firstName": "Asha", "lastName": "Menon" },
                    "branchId": { "_id": "br-1", "name": "Kochi" },
                    "serviceCharge": { "agreed": 5000, "received": 2000, "due": 3000 }
                },
                "payments": [],
                "agentPayments": [],
                "vouchers": []
            }
        }"#;

        let envelope: ApiEnvelope<AdmissionDetails> = decode_body(StatusCode::OK, body).unwrap();
        assert_eq!(envelope.data.admission.id, "adm-1");
        assert_eq!(envelope.data.admission.branch.id, "br-1");
    }

    #[test]
    fn test_error_body_message_is_surfaced() {
        let result: Result<serde_json::Value> = decode_body(
            StatusCode::BAD_REQUEST,
            r#"{"success":false,"message":"Amount is required"}"#,
        );
        match result {
            Err(Error::Collaborator(CollaboratorError::Status { status, message })) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Amount is required");
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let missing: Result<serde_json::Value> =
            decode_body(StatusCode::NOT_FOUND, "Not Found");
        assert!(matches!(
            missing,
            Err(Error::Collaborator(CollaboratorError::NotFound(_)))
        ));
    }

    #[test]
    fn test_write_status_ignores_empty_body() {
        assert!(check_status(StatusCode::CREATED, "").is_ok());
        assert!(check_status(StatusCode::NO_CONTENT, "").is_ok());
        assert!(check_status(StatusCode::OK, "not json").is_ok());

        match check_status(StatusCode::INTERNAL_SERVER_ERROR, "") {
            Err(Error::Collaborator(CollaboratorError::Status { status, .. })) => {
                assert_eq!(status, 500)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let result: Result<ApiEnvelope<Vec<Agent>>> = decode_body(StatusCode::OK, "<html>");
        assert!(matches!(
            result,
            Err(Error::Collaborator(CollaboratorError::Decode(_)))
        ));
    }

    #[test]
    fn test_check_ref_response_mapping() {
        let used: ApiCheckRefResponse = serde_json::from_str(
            r#"{"exists":true,"payment":{"studentName":"Rahul Nair","admissionNo":"ADM-7"}}"#,
        )
        .unwrap();
        assert_eq!(
            conflicting_payment(used),
            Some(ConflictingPayment {
                student_name: "Rahul Nair".to_string(),
                admission_no: "ADM-7".to_string(),
            })
        );

        let free: ApiCheckRefResponse = serde_json::from_str(r#"{"exists":false}"#).unwrap();
        assert_eq!(conflicting_payment(free), None);
    }
}
