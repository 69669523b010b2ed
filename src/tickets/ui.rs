//! Server-rendered fragments for the ticket table and the citizen report
//! form. Fragments are swapped in by htmx; every render is a full rebuild
//! from the current in-memory state.

use axum::{
    extract::{Form, Multipart, Path, State},
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::shared::state::AppState;
use crate::tickets::{evidence_filename, Ticket, TicketStatus, TicketsError};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// The three fixed priority styling rules for table cells.
fn priority_cell(ticket: &Ticket) -> String {
    let style = match ticket.priority {
        crate::tickets::Priority::High => {
            "background-color:#ffcccb;color:darkred;font-weight:bold"
        }
        crate::tickets::Priority::Medium => "background-color:#fff4cc;color:darkorange",
        crate::tickets::Priority::Low => "color:green",
    };
    format!(
        "<td class=\"ticket-priority\" style=\"{style}\">{}</td>",
        ticket.priority
    )
}

fn status_badge(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::Open => "<span class=\"badge badge-primary\">Open</span>",
        TicketStatus::InProgress => "<span class=\"badge badge-warning\">In Progress</span>",
        TicketStatus::Resolved => "<span class=\"badge badge-success\">Resolved</span>",
        TicketStatus::Rejected => "<span class=\"badge badge-secondary\">Rejected</span>",
    }
}

fn render_status_form(ticket: &Ticket) -> String {
    let options: String = TicketStatus::ALL
        .iter()
        .map(|s| {
            let selected = if *s == ticket.status { " selected" } else { "" };
            format!("<option value=\"{}\"{selected}>{s}</option>", s.as_str())
        })
        .collect();

    format!(
        "<form hx-post=\"/api/ui/tickets/{id}/status\" hx-target=\"#ticket-table\" hx-swap=\"outerHTML\">\
            <select name=\"status\">{options}</select>\
            <button type=\"submit\">Update</button>\
        </form>",
        id = ticket.id
    )
}

fn render_ticket_row(ticket: &Ticket) -> String {
    format!(
        "<tr class=\"ticket-row\" data-id=\"{id}\">\
            <td class=\"ticket-number\">{id}</td>\
            <td class=\"ticket-category\">{category}</td>\
            {priority}\
            <td class=\"ticket-status\">{status}</td>\
            <td class=\"ticket-created\">{created}</td>\
            <td class=\"ticket-actions\">{status_form}</td>\
            <td><a href=\"/api/tickets/{id}/report\">PDF</a></td>\
        </tr>",
        id = ticket.id,
        category = html_escape(&ticket.category.to_string()),
        priority = priority_cell(ticket),
        status = status_badge(ticket.status),
        created = ticket.reported_at_display(),
        status_form = render_status_form(ticket),
    )
}

fn render_empty_state() -> String {
    "<div id=\"ticket-table\" class=\"empty-state\"><p>No tickets in queue.</p></div>".to_string()
}

fn render_table(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return render_empty_state();
    }
    let rows: String = tickets.iter().map(render_ticket_row).collect();
    format!(
        "<table id=\"ticket-table\" class=\"ticket-table\">\
            <thead><tr>\
                <th>ID</th><th>Category</th><th>Priority</th><th>Status</th>\
                <th>Reported</th><th>Update</th><th>Report</th>\
            </tr></thead>\
            <tbody>{rows}</tbody>\
        </table>"
    )
}

pub async fn handle_ticket_table(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.auth.admin_logged_in().await {
        return Html(crate::auth::ui::admin_login_fragment());
    }
    let tickets = state.tickets.list().await;
    Html(render_table(&tickets))
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

pub async fn handle_status_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Html<String>, TicketsError> {
    if !state.auth.admin_logged_in().await {
        return Ok(Html(crate::auth::ui::admin_login_fragment()));
    }

    let status: TicketStatus = form.status.parse().map_err(TicketsError::Validation)?;
    let ticket = state.tickets.update_status(&id, status).await?;
    log::info!(
        "SIMULATION: SMS to reporter: 'Your ticket {} is now {}'",
        ticket.id,
        ticket.status
    );

    let tickets = state.tickets.list().await;
    Ok(Html(render_table(&tickets)))
}

pub async fn handle_report_form(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.auth.citizen_verified().await {
        return Html(crate::auth::ui::citizen_login_fragment());
    }

    Html(format!(
        "<div id=\"report-form\" class=\"card\">\
            <h3>New Incident Report</h3>\
            <form hx-post=\"/api/ui/reports\" hx-target=\"#report-form\" hx-swap=\"outerHTML\" enctype=\"multipart/form-data\">\
                <label>Upload Evidence <input type=\"file\" name=\"evidence\" accept=\".jpg,.jpeg,.png\"></label>\
                <p class=\"locked-coords\">Locked Coordinates: {lat}, {lon}</p>\
                <button type=\"submit\">Submit Report</button>\
            </form>\
            <form hx-post=\"/api/auth/logout\" hx-target=\"#citizen-panel\" hx-swap=\"innerHTML\">\
                <button type=\"submit\" class=\"link-button\">Logout</button>\
            </form>\
        </div>",
        lat = state.config.site.latitude,
        lon = state.config.site.longitude,
    ))
}

pub async fn handle_report_submit(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, TicketsError> {
    if !state.auth.citizen_verified().await {
        return Ok(Html(crate::auth::ui::citizen_login_fragment()));
    }

    let filename = match evidence_filename(&mut multipart).await {
        Ok(name) => name,
        Err(TicketsError::MissingUpload) => {
            return Ok(Html(
                "<div id=\"report-form\" class=\"card error\">\
                    <p>Attach an evidence photo before submitting.</p>\
                    <button hx-get=\"/api/ui/report-form\" hx-target=\"#report-form\" hx-swap=\"outerHTML\">Back</button>\
                </div>"
                    .to_string(),
            ));
        }
        Err(e) => return Err(e),
    };

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

    log::info!(
        "Ticket {} generated: {} ({} priority)",
        ticket.id,
        ticket.category,
        ticket.priority
    );

    Ok(Html(format!(
        "<div id=\"report-form\" class=\"card success\">\
            <p>Ticket <strong>{id}</strong> generated: {category}</p>\
            <button hx-get=\"/api/ui/report-form\" hx-target=\"#report-form\" hx-swap=\"outerHTML\">File another report</button>\
        </div>",
        id = ticket.id,
        category = html_escape(&ticket.category.to_string()),
    )))
}
