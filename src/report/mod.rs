//! Fixed-layout PDF incident report, one page per ticket.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::shared::state::AppState;
use crate::tickets::{Ticket, TicketsError};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const LEFT_MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 10.0;

const REPORT_TITLE: &str = "BBMP / RVCE Smart City Report";

fn field_lines(ticket: &Ticket) -> [String; 5] {
    [
        format!("Date Reported: {}", ticket.reported_at_display()),
        format!("Category: {}", ticket.category),
        format!("Priority: {}", ticket.priority),
        format!("Location: {}, {}", ticket.latitude, ticket.longitude),
        format!("Current Status: {}", ticket.status),
    ]
}

fn assessment_line(ticket: &Ticket) -> String {
    format!("AI Analysis Reason: {}", ticket.reason)
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Renders the official incident report. The layout is unconditional: a
/// title line, the ticket fields in fixed order, the assessment paragraph,
/// and the ward signature block. Field presence and order are guaranteed;
/// byte-for-byte output stability is not.
pub fn render_ticket_report(ticket: &Ticket, site: &SiteConfig) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Incident Report {}", ticket.id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - 25.0;

    layer.use_text(REPORT_TITLE, 16.0, Mm(55.0), Mm(y), &bold);
    y -= 2.0 * LINE_HEIGHT_MM;

    layer.use_text(
        format!("Official Incident Report: #{}", ticket.id),
        12.0,
        Mm(LEFT_MARGIN_MM),
        Mm(y),
        &bold,
    );
    y -= LINE_HEIGHT_MM;

    for field in field_lines(ticket) {
        layer.use_text(field, 12.0, Mm(LEFT_MARGIN_MM), Mm(y), &regular);
        y -= LINE_HEIGHT_MM;
    }
    y -= LINE_HEIGHT_MM;

    layer.use_text(
        assessment_line(ticket),
        11.0,
        Mm(LEFT_MARGIN_MM),
        Mm(y),
        &italic,
    );
    y -= 3.0 * LINE_HEIGHT_MM;

    layer.use_text(
        "Authorized Signature: _______________________",
        10.0,
        Mm(LEFT_MARGIN_MM),
        Mm(y),
        &bold,
    );
    y -= LINE_HEIGHT_MM;
    layer.use_text(
        format!("Ward Officer, {}", site.ward_name),
        10.0,
        Mm(LEFT_MARGIN_MM),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
}

/// Serves the report for `GET /api/tickets/:id/report` as a named file
/// download.
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, TicketsError> {
    if !state.auth.admin_logged_in().await {
        return Err(TicketsError::Locked("officer login required"));
    }

    let ticket = state
        .tickets
        .get(&id)
        .await
        .ok_or_else(|| TicketsError::NotFound(id.clone()))?;

    let bytes = render_ticket_report(&ticket, &state.config.site)
        .map_err(|e| TicketsError::Report(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"Report_{}.pdf\"", ticket.id),
            ),
        ],
        bytes,
    ))
}
