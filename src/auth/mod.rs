//! Simulated access gating for the two portals.
//!
//! Neither flow is a security boundary. The citizen gate is a toy OTP
//! exchange whose code is printed back to the caller instead of being sent
//! anywhere, and the admin gate is a verbatim comparison against one
//! configured credential pair. Both gates are process-wide booleans: one
//! logical session, unlocked until an explicit sign-out.
//!
//! The verifier sits behind [`PhoneVerifier`] so a real OTP provider could
//! replace the simulation without touching any view logic.

pub mod ui;

use async_trait::async_trait;
use axum::{
    extract::State,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::shared::state::AppState;

const OTP_EXPIRY_SECONDS: i64 = 300;
const MAX_VERIFICATION_ATTEMPTS: u32 = 5;
const PHONE_DIGITS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Phone number must be exactly 10 digits")]
    InvalidPhone,
    #[error("No code was requested for this number")]
    NoPendingCode,
    #[error("Code expired, request a new one")]
    CodeExpired,
    #[error("Too many attempts, request a new code")]
    TooManyAttempts,
    #[error("Verification denied")]
    Denied,
    #[error("Invalid officer credentials")]
    BadCredentials,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let status = match &self {
            Self::InvalidPhone => StatusCode::BAD_REQUEST,
            Self::NoPendingCode
            | Self::CodeExpired
            | Self::TooManyAttempts
            | Self::Denied
            | Self::BadCredentials => StatusCode::UNAUTHORIZED,
        };
        let message = self.to_string();
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// A code handed out by the verifier. `code` is exposed because this is a
/// simulation: the caller is the delivery channel.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedOtp {
    pub challenge_id: Uuid,
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone)]
struct OtpChallenge {
    id: Uuid,
    code: String,
    expires_at: DateTime<Utc>,
    attempts: u32,
}

/// Phone/code verification seam: {phone, code} -> verified | denied.
#[async_trait]
pub trait PhoneVerifier: Send + Sync {
    async fn issue(&self, phone: &str) -> Result<IssuedOtp, AuthError>;
    async fn verify(&self, phone: &str, code: &str) -> Result<(), AuthError>;
}

fn valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

/// In-process OTP simulation: random 4-digit codes held in memory, keyed by
/// phone, with a short expiry and a small attempt cap. Nothing is ever
/// transmitted.
#[derive(Debug, Default)]
pub struct SimulatedSmsGateway {
    pending: RwLock<HashMap<String, OtpChallenge>>,
}

impl SimulatedSmsGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhoneVerifier for SimulatedSmsGateway {
    async fn issue(&self, phone: &str) -> Result<IssuedOtp, AuthError> {
        if !valid_phone(phone) {
            return Err(AuthError::InvalidPhone);
        }

        let code = rand::thread_rng().gen_range(1000..=9999).to_string();
        let challenge = OtpChallenge {
            id: Uuid::new_v4(),
            code: code.clone(),
            expires_at: Utc::now() + Duration::seconds(OTP_EXPIRY_SECONDS),
            attempts: 0,
        };
        let challenge_id = challenge.id;
        self.pending.write().await.insert(phone.to_string(), challenge);

        info!("SIMULATION: OTP for {phone} is {code} (never transmitted)");

        Ok(IssuedOtp {
            challenge_id,
            phone: phone.to_string(),
            code,
        })
    }

    async fn verify(&self, phone: &str, code: &str) -> Result<(), AuthError> {
        let mut pending = self.pending.write().await;
        let challenge = pending.get_mut(phone).ok_or(AuthError::NoPendingCode)?;

        if Utc::now() > challenge.expires_at {
            pending.remove(phone);
            return Err(AuthError::CodeExpired);
        }
        if challenge.attempts >= MAX_VERIFICATION_ATTEMPTS {
            pending.remove(phone);
            return Err(AuthError::TooManyAttempts);
        }
        if challenge.code != code {
            challenge.attempts += 1;
            return Err(AuthError::Denied);
        }

        pending.remove(phone);
        Ok(())
    }
}

/// The two independent gates. State machine per flow is binary
/// {locked, unlocked}; unlocked -> locked only via explicit sign-out.
pub struct AuthService {
    verifier: Arc<dyn PhoneVerifier>,
    admin: AdminConfig,
    citizen_unlocked: RwLock<bool>,
    admin_unlocked: RwLock<bool>,
}

impl AuthService {
    pub fn new(verifier: Arc<dyn PhoneVerifier>, admin: AdminConfig) -> Self {
        Self {
            verifier,
            admin,
            citizen_unlocked: RwLock::new(false),
            admin_unlocked: RwLock::new(false),
        }
    }

    pub async fn request_code(&self, phone: &str) -> Result<IssuedOtp, AuthError> {
        self.verifier.issue(phone).await
    }

    /// Unlocks the citizen gate only on an exact code match. There is no
    /// bypass path.
    pub async fn verify_code(&self, phone: &str, code: &str) -> Result<(), AuthError> {
        self.verifier.verify(phone, code).await?;
        *self.citizen_unlocked.write().await = true;
        Ok(())
    }

    pub async fn citizen_verified(&self) -> bool {
        *self.citizen_unlocked.read().await
    }

    pub async fn citizen_logout(&self) {
        *self.citizen_unlocked.write().await = false;
    }

    pub async fn admin_login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username == self.admin.username && password == self.admin.password {
            *self.admin_unlocked.write().await = true;
            Ok(())
        } else {
            Err(AuthError::BadCredentials)
        }
    }

    pub async fn admin_logged_in(&self) -> bool {
        *self.admin_unlocked.read().await
    }

    pub async fn admin_logout(&self) {
        *self.admin_unlocked.write().await = false;
    }
}

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn request_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpRequest>,
) -> Result<Json<IssuedOtp>, AuthError> {
    // Stand-in for the SMS gateway handshake.
    tokio::time::sleep(std::time::Duration::from_millis(
        state.config.simulation.sms_delay_ms,
    ))
    .await;
    let issued = state.auth.request_code(&req.phone).await?;
    Ok(Json(issued))
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    state.auth.verify_code(&req.phone, &req.code).await?;
    Ok(Json(serde_json::json!({ "verified": true })))
}

pub async fn citizen_logout(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.auth.citizen_logout().await;
    Json(serde_json::json!({ "logged_out": true }))
}

pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    state.auth.admin_login(&req.username, &req.password).await?;
    info!("Officer {} signed in", req.username);
    Ok(Json(serde_json::json!({ "logged_in": true })))
}

pub async fn admin_logout(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.auth.admin_logout().await;
    Json(serde_json::json!({ "logged_out": true }))
}

pub fn configure_auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/otp/request", post(request_otp))
        .route("/api/auth/otp/verify", post(verify_otp))
        .route("/api/auth/logout", post(citizen_logout))
        .route("/api/auth/admin/login", post(admin_login))
        .route("/api/auth/admin/logout", post(admin_logout))
        .route("/api/ui/otp/request", post(ui::handle_otp_request_form))
        .route("/api/ui/otp/verify", post(ui::handle_otp_verify_form))
        .route("/api/ui/logout", post(ui::handle_citizen_logout))
        .route("/api/ui/admin/login", post(ui::handle_admin_login_form))
        .route("/api/ui/admin/logout", post(ui::handle_admin_logout))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(SimulatedSmsGateway::new()),
            AdminConfig {
                username: "admin".into(),
                password: "admin".into(),
            },
        )
    }

    #[tokio::test]
    async fn malformed_phone_numbers_are_rejected() {
        let auth = service();
        for phone in ["12345", "98765432101", "98765abc21", ""] {
            let err = auth.request_code(phone).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidPhone), "{phone}");
        }
    }

    #[tokio::test]
    async fn correct_code_unlocks_and_logout_relocks() {
        let auth = service();
        assert!(!auth.citizen_verified().await);

        let issued = auth.request_code("9876543210").await.expect("issue");
        auth.verify_code("9876543210", &issued.code)
            .await
            .expect("verify");
        assert!(auth.citizen_verified().await);

        auth.citizen_logout().await;
        assert!(!auth.citizen_verified().await);
    }

    #[tokio::test]
    async fn wrong_code_does_not_unlock() {
        let auth = service();
        let issued = auth.request_code("9876543210").await.expect("issue");

        // A 4-digit code space makes a guaranteed-wrong guess easy to build.
        let wrong = if issued.code == "1000" { "1001" } else { "1000" };
        let err = auth.verify_code("9876543210", wrong).await.unwrap_err();
        assert!(matches!(err, AuthError::Denied));
        assert!(!auth.citizen_verified().await);
    }

    #[tokio::test]
    async fn verify_without_request_is_denied() {
        let auth = service();
        let err = auth.verify_code("9876543210", "1234").await.unwrap_err();
        assert!(matches!(err, AuthError::NoPendingCode));
    }

    #[tokio::test]
    async fn attempt_cap_invalidates_the_challenge() {
        let auth = service();
        let issued = auth.request_code("9876543210").await.expect("issue");
        let wrong = if issued.code == "1000" { "1001" } else { "1000" };

        for _ in 0..MAX_VERIFICATION_ATTEMPTS {
            let _ = auth.verify_code("9876543210", wrong).await;
        }
        let err = auth
            .verify_code("9876543210", &issued.code)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TooManyAttempts));
    }

    #[tokio::test]
    async fn a_new_request_replaces_the_previous_code() {
        let auth = service();
        let first = auth.request_code("9876543210").await.expect("issue");
        let second = auth.request_code("9876543210").await.expect("issue");

        if first.code != second.code {
            let err = auth.verify_code("9876543210", &first.code).await.unwrap_err();
            assert!(matches!(err, AuthError::Denied));
        }
        auth.verify_code("9876543210", &second.code)
            .await
            .expect("latest code verifies");
    }

    #[tokio::test]
    async fn admin_gate_accepts_only_the_configured_pair() {
        let auth = service();
        assert!(!auth.admin_logged_in().await);

        assert!(auth.admin_login("admin", "wrong").await.is_err());
        assert!(auth.admin_login("root", "admin").await.is_err());
        assert!(!auth.admin_logged_in().await);

        auth.admin_login("admin", "admin").await.expect("login");
        assert!(auth.admin_logged_in().await);

        auth.admin_logout().await;
        assert!(!auth.admin_logged_in().await);
    }

    #[tokio::test]
    async fn gates_are_independent() {
        let auth = service();
        auth.admin_login("admin", "admin").await.expect("login");
        assert!(auth.admin_logged_in().await);
        assert!(!auth.citizen_verified().await);
    }
}
