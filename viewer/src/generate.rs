//! Animation-generation HTTP client.
//!
//! Fire-and-forget `POST /api/generate` plus job-status polling. One
//! request may be in flight at a time: the busy flag rejects overlapping
//! submissions and is released by a drop guard on success, failure, and
//! panic alike, so the controls it disables always come back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};

/// Canonical request body for `POST /api/generate`.
///
/// Field names are the wire contract: snake_case, `camera` a label string,
/// `fps` an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Participant identifier.
    pub participant: String,
    /// Movement name (e.g. `squat`).
    pub movement: String,
    /// Set type (e.g. `correct`).
    pub set_type: String,
    /// Camera label. Not an index.
    pub camera: String,
    /// Output frame rate.
    pub fps: u32,
    /// Output save name.
    pub save_name: String,
}

/// Server acknowledgement for a generation job.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Whether the job was accepted.
    #[serde(default)]
    pub success: bool,
    /// Identifier for status polling.
    #[serde(default)]
    pub job_id: String,
    /// Human-readable acknowledgement.
    #[serde(default)]
    pub message: String,
}

/// Poll result for a running job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    /// The polled job.
    pub job_id: String,
    /// `running`, `completed`, or `failed`.
    pub status: String,
    /// Seconds since the job started.
    #[serde(default)]
    pub runtime: f64,
}

/// Errors from the generate client.
#[derive(Debug)]
pub enum GenerateError {
    /// A request is already in flight.
    Busy,
    /// Transport failure or non-success HTTP status.
    Http(Box<ureq::Error>),
    /// Failed to decode the response body.
    Decode(std::io::Error),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Busy => write!(f, "a generation request is already in flight"),
            Self::Http(e) => write!(f, "generation request failed: {e}"),
            Self::Decode(e) => write!(f, "unreadable generation response: {e}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Busy => None,
            Self::Http(e) => Some(e),
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<ureq::Error> for GenerateError {
    fn from(e: ureq::Error) -> Self {
        Self::Http(Box::new(e))
    }
}

impl From<std::io::Error> for GenerateError {
    fn from(e: std::io::Error) -> Self {
        Self::Decode(e)
    }
}

/// Releases the in-flight flag when the request finishes, however it
/// finishes.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Client for the animation-generation service.
///
/// Cloning shares the in-flight flag, so every handle sees the same busy
/// state.
#[derive(Debug, Clone)]
pub struct GenerateClient {
    base_url: String,
    in_flight: Arc<AtomicBool>,
}

impl GenerateClient {
    /// Create a client for a service base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a generate request is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit a generation request on a worker thread.
    ///
    /// Returns a receiver for the single result, or `Err(Busy)` while a
    /// previous request has not finished. The result is also logged, so a
    /// caller that never polls the receiver still surfaces the outcome.
    pub fn submit(
        &self,
        request: GenerateRequest,
    ) -> Result<Receiver<Result<GenerateResponse, GenerateError>>, GenerateError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(GenerateError::Busy);
        }
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let url = format!("{}/api/generate", self.base_url);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _guard = guard;
            let result = post_generate(&url, &request);
            match &result {
                Ok(response) => log::info!(
                    "generation accepted: job {} ({})",
                    response.job_id,
                    response.message
                ),
                Err(e) => log::warn!("generation request failed: {e}"),
            }
            // the receiver may already be gone; the log above is the
            // fallback surface
            let _ = tx.send(result);
        });
        Ok(rx)
    }

    /// Poll a job's status. Blocking; meant for occasional use.
    pub fn status(&self, job_id: &str) -> Result<JobStatus, GenerateError> {
        let url = format!("{}/api/status/{job_id}", self.base_url);
        let response = ureq::get(&url).call()?;
        Ok(response.into_json()?)
    }
}

fn post_generate(url: &str, request: &GenerateRequest) -> Result<GenerateResponse, GenerateError> {
    let response = ureq::post(url).send_json(request)?;
    Ok(response.into_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            participant: "04".into(),
            movement: "squat".into(),
            set_type: "correct".into(),
            camera: "04".into(),
            fps: 30,
            save_name: "test".into(),
        }
    }

    #[test]
    fn request_serializes_to_the_canonical_contract() {
        let value = serde_json::to_value(request()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "participant": "04",
                "movement": "squat",
                "set_type": "correct",
                "camera": "04",
                "fps": 30,
                "save_name": "test"
            })
        );
    }

    #[test]
    fn submit_rejects_while_busy() {
        let client = GenerateClient::new("http://localhost:5000");
        client.in_flight.store(true, Ordering::Release);
        match client.submit(request()) {
            Err(GenerateError::Busy) => {}
            other => panic!("expected Busy, got {other:?}"),
        }
        // the rejected submit must not have cleared the flag
        assert!(client.is_busy());
    }

    #[test]
    fn guard_releases_the_flag_on_drop() {
        let flag = Arc::new(AtomicBool::new(true));
        drop(InFlightGuard(Arc::clone(&flag)));
        assert!(!flag.load(Ordering::Acquire));
    }

    #[test]
    fn clones_share_busy_state() {
        let client = GenerateClient::new("http://localhost:5000");
        let other = client.clone();
        client.in_flight.store(true, Ordering::Release);
        assert!(other.is_busy());
    }

    #[test]
    fn response_fields_default_when_absent() {
        let response: GenerateResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.success);
        assert!(response.job_id.is_empty());
    }
}
