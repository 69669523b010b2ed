//! Login and verification fragments for both portals.

use axum::{
    extract::{Form, State},
    response::Html,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::shared::state::AppState;
use crate::tickets::ui::html_escape;

pub fn citizen_login_fragment() -> String {
    citizen_login_with_note("")
}

fn citizen_login_with_note(note: &str) -> String {
    format!(
        "<div class=\"card login-card\">\
            <h3>Secure Login (MFA)</h3>\
            {note}\
            <form hx-post=\"/api/ui/otp/request\" hx-target=\"#citizen-panel\" hx-swap=\"innerHTML\">\
                <label>Mobile Number (+91) <input type=\"tel\" name=\"phone\" maxlength=\"10\"></label>\
                <button type=\"submit\">Request OTP</button>\
            </form>\
        </div>"
    )
}

pub fn admin_login_fragment() -> String {
    admin_login_with_note("")
}

fn admin_login_with_note(note: &str) -> String {
    format!(
        "<div class=\"card login-card\">\
            <h3>Ward Command Center</h3>\
            {note}\
            <form hx-post=\"/api/ui/admin/login\" hx-target=\"#admin-panel\" hx-swap=\"innerHTML\">\
                <label>Officer ID <input type=\"text\" name=\"username\"></label>\
                <label>Password <input type=\"password\" name=\"password\"></label>\
                <button type=\"submit\">Secure Login</button>\
            </form>\
        </div>"
    )
}

fn error_note(message: &str) -> String {
    format!("<p class=\"error\">{}</p>", html_escape(message))
}

#[derive(Debug, Deserialize)]
pub struct PhoneForm {
    pub phone: String,
}

pub async fn handle_otp_request_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PhoneForm>,
) -> Html<String> {
    tokio::time::sleep(Duration::from_millis(state.config.simulation.sms_delay_ms)).await;

    match state.auth.request_code(&form.phone).await {
        Ok(issued) => Html(format!(
            "<div class=\"card login-card\">\
                <h3>Secure Login (MFA)</h3>\
                <p class=\"info\">SIMULATION: Your OTP is <strong>{code}</strong></p>\
                <p class=\"info\">Demo OTP sent to {phone}</p>\
                <form hx-post=\"/api/ui/otp/verify\" hx-target=\"#citizen-panel\" hx-swap=\"innerHTML\">\
                    <input type=\"hidden\" name=\"phone\" value=\"{phone}\">\
                    <label>OTP <input type=\"password\" name=\"code\" maxlength=\"4\"></label>\
                    <button type=\"submit\">Verify &amp; Access</button>\
                </form>\
            </div>",
            code = issued.code,
            phone = html_escape(&issued.phone),
        )),
        Err(e) => Html(citizen_login_with_note(&error_note(&e.to_string()))),
    }
}

#[derive(Debug, Deserialize)]
pub struct OtpForm {
    pub phone: String,
    pub code: String,
}

pub async fn handle_otp_verify_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<OtpForm>,
) -> Html<String> {
    match state.auth.verify_code(&form.phone, &form.code).await {
        Ok(()) => Html(crate::web::citizen_panel_fragment(&state).await),
        Err(e) => Html(citizen_login_with_note(&error_note(&e.to_string()))),
    }
}

pub async fn handle_citizen_logout(State(state): State<Arc<AppState>>) -> Html<String> {
    state.auth.citizen_logout().await;
    Html(citizen_login_fragment())
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    pub username: String,
    pub password: String,
}

pub async fn handle_admin_login_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AdminLoginForm>,
) -> Html<String> {
    match state.auth.admin_login(&form.username, &form.password).await {
        Ok(()) => Html(crate::web::admin_panel_fragment(&state).await),
        Err(e) => Html(admin_login_with_note(&error_note(&e.to_string()))),
    }
}

pub async fn handle_admin_logout(State(state): State<Arc<AppState>>) -> Html<String> {
    state.auth.admin_logout().await;
    Html(admin_login_fragment())
}
