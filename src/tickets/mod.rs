pub mod error;
pub mod store;
pub mod ui;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Local};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::classifier::Category;
use crate::shared::state::AppState;

pub use error::TicketsError;
pub use store::TicketStore;

/// Severity bucket assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown priority: {s}")),
        }
    }
}

/// Lifecycle state of a ticket. Every ticket has exactly one status; the
/// initial value is Open and the only transition mechanism is an explicit
/// status-update action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Rejected,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        Self::Open,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!("Unknown status: {s}")),
        }
    }
}

/// One reported civic issue. Identifier, timestamp and the classification
/// triple are immutable after creation; only `status` ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub reported_at: DateTime<Local>,
    pub category: Category,
    pub priority: Priority,
    pub reason: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: TicketStatus,
}

impl Ticket {
    pub fn reported_at_display(&self) -> String {
        self.reported_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: TicketStatus,
}

/// Reads the evidence field out of the upload form. Only the filename is
/// ever looked at; the image bytes are drained and dropped undecoded.
pub(crate) async fn evidence_filename(multipart: &mut Multipart) -> Result<String, TicketsError> {
    let mut filename = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TicketsError::Upload(e.to_string()))?
    {
        if field.name() == Some("evidence") {
            filename = field.file_name().map(|s| s.to_string());
            field
                .bytes()
                .await
                .map_err(|e| TicketsError::Upload(e.to_string()))?;
        }
    }
    filename.filter(|f| !f.is_empty()).ok_or(TicketsError::MissingUpload)
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Ticket>), TicketsError> {
    if !state.auth.citizen_verified().await {
        return Err(TicketsError::Locked("citizen verification required"));
    }

    let filename = evidence_filename(&mut multipart).await?;

    // Stand-in for the cloud vision round trip.
    tokio::time::sleep(Duration::from_millis(state.config.simulation.analysis_delay_ms)).await;
    let classification = state.classifier.classify(&filename);

    let ticket = state
        .tickets
        .create(
            classification,
            state.config.site.latitude,
            state.config.site.longitude,
        )
        .await;

    info!(
        "Ticket {} generated: {} ({} priority)",
        ticket.id, ticket.category, ticket.priority
    );

    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Ticket>>, TicketsError> {
    if !state.auth.admin_logged_in().await {
        return Err(TicketsError::Locked("officer login required"));
    }
    Ok(Json(state.tickets.list().await))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>, TicketsError> {
    if !state.auth.admin_logged_in().await {
        return Err(TicketsError::Locked("officer login required"));
    }
    state
        .tickets
        .get(&id)
        .await
        .map(Json)
        .ok_or(TicketsError::NotFound(id))
}

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<Ticket>, TicketsError> {
    if !state.auth.admin_logged_in().await {
        return Err(TicketsError::Locked("officer login required"));
    }

    let ticket = state.tickets.update_status(&id, req.status).await?;

    // The reporter is never actually messaged; the notification is logged.
    info!(
        "SIMULATION: SMS to reporter: 'Your ticket {} is now {}'",
        ticket.id, ticket.status
    );

    Ok(Json(ticket))
}

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tickets", get(list_tickets).post(create_ticket))
        .route("/api/tickets/:id", get(get_ticket))
        .route("/api/tickets/:id/status", put(change_status))
        .route("/api/tickets/:id/report", get(crate::report::download_report))
        .route("/api/ui/tickets", get(ui::handle_ticket_table))
        .route("/api/ui/tickets/:id/status", post(ui::handle_status_form))
        .route("/api/ui/report-form", get(ui::handle_report_form))
        .route("/api/ui/reports", post(ui::handle_report_submit))
}
