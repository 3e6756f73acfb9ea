//! In-process [`PortalApi`] fake for state-layer tests.
//!
//! Results are queued per endpoint and consumed in call order; an empty queue
//! is a test-configuration bug and panics. `gate_next_me` parks the next
//! identity fetch until the returned [`Notify`] fires, which lets tests pin
//! down completion order for interleaving scenarios.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::api::{ApiError, PortalApi};
use super::types::{Doctor, Patient, RegisterRequest, Role, TokenResponse, UserRecord};

#[derive(Default)]
struct Inner {
    token_results: VecDeque<Result<TokenResponse, ApiError>>,
    me_results: VecDeque<Result<UserRecord, ApiError>>,
    register_results: VecDeque<Result<UserRecord, ApiError>>,
    patients_results: VecDeque<Result<Vec<Patient>, ApiError>>,
    doctors_results: VecDeque<Result<Vec<Doctor>, ApiError>>,
    me_gates: VecDeque<Arc<Notify>>,
    patients_gates: VecDeque<Arc<Notify>>,
    calls: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    inner: Mutex<Inner>,
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_token(&self, result: Result<TokenResponse, ApiError>) {
        self.inner.lock().unwrap().token_results.push_back(result);
    }

    pub(crate) fn push_me(&self, result: Result<UserRecord, ApiError>) {
        self.inner.lock().unwrap().me_results.push_back(result);
    }

    pub(crate) fn push_register(&self, result: Result<UserRecord, ApiError>) {
        self.inner.lock().unwrap().register_results.push_back(result);
    }

    pub(crate) fn push_patients(&self, result: Result<Vec<Patient>, ApiError>) {
        self.inner.lock().unwrap().patients_results.push_back(result);
    }

    pub(crate) fn push_doctors(&self, result: Result<Vec<Doctor>, ApiError>) {
        self.inner.lock().unwrap().doctors_results.push_back(result);
    }

    /// Park the next `fetch_me` call until the returned handle is notified.
    pub(crate) fn gate_next_me(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.lock().unwrap().me_gates.push_back(gate.clone());
        gate
    }

    /// Park the next `list_patients` call until the returned handle is
    /// notified.
    pub(crate) fn gate_next_patients(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner
            .lock()
            .unwrap()
            .patients_gates
            .push_back(gate.clone());
        gate
    }

    /// Endpoints invoked so far, in order, with their salient argument.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    fn record(&self, call: String) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn issue_token(&self, username: &str, _password: &str) -> Result<TokenResponse, ApiError> {
        self.record(format!("issue_token:{username}"));
        self.inner
            .lock()
            .unwrap()
            .token_results
            .pop_front()
            .expect("FakeApi: no queued issue_token result")
    }

    async fn fetch_me(&self, token: &str) -> Result<UserRecord, ApiError> {
        self.record(format!("fetch_me:{token}"));
        let gate = self.inner.lock().unwrap().me_gates.pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.inner
            .lock()
            .unwrap()
            .me_results
            .pop_front()
            .expect("FakeApi: no queued fetch_me result")
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserRecord, ApiError> {
        self.record(format!("register:{}", request.email));
        self.inner
            .lock()
            .unwrap()
            .register_results
            .pop_front()
            .expect("FakeApi: no queued register result")
    }

    async fn list_patients(&self, token: &str) -> Result<Vec<Patient>, ApiError> {
        self.record(format!("list_patients:{token}"));
        let gate = self.inner.lock().unwrap().patients_gates.pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.inner
            .lock()
            .unwrap()
            .patients_results
            .pop_front()
            .expect("FakeApi: no queued list_patients result")
    }

    async fn list_doctors(&self, token: &str) -> Result<Vec<Doctor>, ApiError> {
        self.record(format!("list_doctors:{token}"));
        self.inner
            .lock()
            .unwrap()
            .doctors_results
            .pop_front()
            .expect("FakeApi: no queued list_doctors result")
    }
}

// =============================================================================
// Fixture constructors
// =============================================================================

pub(crate) fn token_ok(token: &str) -> Result<TokenResponse, ApiError> {
    Ok(TokenResponse {
        access_token: token.to_owned(),
        token_type: "bearer".to_owned(),
    })
}

pub(crate) fn user_record(id: i64, email: &str, role: Role) -> UserRecord {
    UserRecord {
        id,
        email: email.to_owned(),
        role,
        is_active: true,
    }
}

pub(crate) fn patient_for(user_id: i64) -> Patient {
    Patient {
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        date_of_birth: "1990-04-01".to_owned(),
        gender: "female".to_owned(),
        phone_number: "+254700000000".to_owned(),
        address: Some("nairobi".to_owned()),
        insurance_number: Some("INS-001".to_owned()),
        insurance_provider: Some("NHIF".to_owned()),
        id: user_id * 10,
        user_id,
    }
}

pub(crate) fn doctor_for(user_id: i64) -> Doctor {
    Doctor {
        first_name: "Gregory".to_owned(),
        last_name: "House".to_owned(),
        specialization: "diagnostics".to_owned(),
        phone_number: "+254711111111".to_owned(),
        bio: None,
        id: user_id * 10,
        user_id,
    }
}

pub(crate) fn bad_credentials() -> ApiError {
    ApiError::Status {
        status: 401,
        detail: Some("Incorrect username or password".to_owned()),
        message: None,
    }
}

pub(crate) fn unauthorized() -> ApiError {
    ApiError::Status {
        status: 401,
        detail: Some("Could not validate credentials".to_owned()),
        message: None,
    }
}

pub(crate) fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        detail: None,
        message: None,
    }
}
