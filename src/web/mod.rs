//! Page shells for the two portals. Each shell is a static frame; every
//! visible panel is an htmx fragment rebuilt from current in-memory state
//! on each interaction.

use axum::{extract::State, response::Html, routing::get, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

const STYLESHEET: &str = "\
    body{font-family:sans-serif;margin:0;background:#f4f5f7;color:#222}\
    header{background:#1a2b4c;color:#fff;padding:12px 24px}\
    header h1{margin:0;font-size:20px}\
    main{max-width:960px;margin:24px auto;padding:0 16px}\
    .card{background:#fff;border:1px solid #ddd;border-radius:6px;padding:16px;margin-bottom:16px}\
    .card.success{border-color:#8c8}\
    .card.error{border-color:#c88}\
    .info{background:#eef6ff;padding:8px;border-radius:4px}\
    .error{color:darkred}\
    .ticket-table{width:100%;border-collapse:collapse;background:#fff}\
    .ticket-table th,.ticket-table td{border:1px solid #ddd;padding:6px 10px;text-align:left}\
    .badge{padding:2px 8px;border-radius:10px;font-size:12px}\
    .badge-primary{background:#dbeafe}\
    .badge-warning{background:#fef3c7}\
    .badge-success{background:#dcfce7}\
    .badge-secondary{background:#e5e7eb}\
    .chart-grid{display:flex;gap:16px;flex-wrap:wrap}\
    .chart-card{flex:1;min-width:300px}\
    .chart{width:100%;height:auto}\
    .caption{color:#666;font-size:13px}\
    .metric{margin:8px 0;color:#1a2b4c}\
    .link-button{background:none;border:none;color:#1a2b4c;text-decoration:underline;cursor:pointer;padding:0}\
    label{display:block;margin:8px 0}\
    button{margin-top:8px}";

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";

fn page_shell(title: &str, subtitle: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
        <html lang=\"en\">\
        <head>\
            <meta charset=\"utf-8\">\
            <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
            <title>{title}</title>\
            <script src=\"{HTMX_SRC}\"></script>\
            <style>{STYLESHEET}</style>\
        </head>\
        <body>\
            <header><h1>{title}</h1><p>{subtitle}</p></header>\
            <main>{body}</main>\
        </body>\
        </html>"
    )
}

/// Citizen panel: report form when the gate is open, OTP login otherwise.
pub async fn citizen_panel_fragment(state: &AppState) -> String {
    if !state.auth.citizen_verified().await {
        return crate::auth::ui::citizen_login_fragment();
    }
    "<div class=\"card\"><p>Verified Resident</p></div>\
     <div id=\"report-form\" hx-get=\"/api/ui/report-form\" hx-trigger=\"load\" hx-swap=\"outerHTML\"></div>"
        .to_string()
}

/// Admin panel: triage table and sensor hub when signed in, login otherwise.
pub async fn admin_panel_fragment(state: &AppState) -> String {
    if !state.auth.admin_logged_in().await {
        return crate::auth::ui::admin_login_fragment();
    }
    "<div class=\"card\">\
        <h2>Triage Dashboard</h2>\
        <form hx-post=\"/api/ui/admin/logout\" hx-target=\"#admin-panel\" hx-swap=\"innerHTML\">\
            <button type=\"submit\" class=\"link-button\">Sign Out</button>\
        </form>\
     </div>\
     <div id=\"ticket-table\" hx-get=\"/api/ui/tickets\" hx-trigger=\"load\" hx-swap=\"outerHTML\"></div>\
     <div id=\"sensor-hub\" hx-get=\"/api/ui/sensors\" hx-trigger=\"load\" hx-swap=\"outerHTML\"></div>"
        .to_string()
}

pub async fn portal_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page_shell(
        &format!("{} - Citizen Portal", state.config.site.app_name),
        "Report a civic issue in your ward.",
        "<div id=\"citizen-panel\" hx-get=\"/api/ui/citizen\" hx-trigger=\"load\" hx-swap=\"innerHTML\"></div>",
    ))
}

pub async fn admin_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page_shell(
        &format!("{} - Ward Command Center", state.config.site.app_name),
        "Official admin dashboard.",
        "<div id=\"admin-panel\" hx-get=\"/api/ui/admin\" hx-trigger=\"load\" hx-swap=\"innerHTML\"></div>",
    ))
}

pub async fn handle_citizen_panel(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(citizen_panel_fragment(&state).await)
}

pub async fn handle_admin_panel(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(admin_panel_fragment(&state).await)
}

pub fn configure_web_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(portal_page))
        .route("/admin", get(admin_page))
        .route("/api/ui/citizen", get(handle_citizen_panel))
        .route("/api/ui/admin", get(handle_admin_panel))
}
