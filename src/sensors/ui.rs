//! Sensor hub fragment: the two illustrative charts, redrawn from fresh
//! random samples on every render.

use axum::{extract::State, response::Html, response::IntoResponse};
use std::sync::Arc;

use super::{SensorKind, SERIES_POINTS};
use crate::shared::state::AppState;

const CHART_WIDTH: f64 = 420.0;
const CHART_HEIGHT: f64 = 160.0;

fn chart_points(series: &[f64], lo: f64, hi: f64) -> String {
    let step = CHART_WIDTH / (series.len().max(2) - 1) as f64;
    series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = i as f64 * step;
            let y = CHART_HEIGHT - ((v - lo) / (hi - lo) * CHART_HEIGHT);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn svg_line_chart(series: &[f64], kind: SensorKind, color: &str) -> String {
    let (lo, hi) = kind.range();
    let points = chart_points(series, lo, hi);
    format!(
        "<svg viewBox=\"0 0 {w} {h}\" class=\"chart\" role=\"img\" aria-label=\"{label}\">\
            <polyline fill=\"none\" stroke=\"{color}\" stroke-width=\"2\" points=\"{points}\"/>\
        </svg>",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        label = kind.label(),
    )
}

fn svg_area_chart(series: &[f64], kind: SensorKind, color: &str) -> String {
    let (lo, hi) = kind.range();
    let points = chart_points(series, lo, hi);
    format!(
        "<svg viewBox=\"0 0 {w} {h}\" class=\"chart\" role=\"img\" aria-label=\"{label}\">\
            <polygon fill=\"{color}\" fill-opacity=\"0.35\" stroke=\"{color}\" stroke-width=\"2\" \
                points=\"0,{h} {points} {w},{h}\"/>\
        </svg>",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        label = kind.label(),
    )
}

fn chart_card(title: &str, caption: &str, svg: &str) -> String {
    format!(
        "<div class=\"card chart-card\">\
            <h4>{title}</h4>\
            {svg}\
            <p class=\"caption\">{caption}</p>\
        </div>"
    )
}

pub async fn handle_sensor_hub(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.auth.admin_logged_in().await {
        return Html(crate::auth::ui::admin_login_fragment());
    }

    let aqi = state.telemetry.series(SensorKind::AirQuality, SERIES_POINTS);
    let noise = state.telemetry.series(SensorKind::Noise, SERIES_POINTS);

    Html(format!(
        "<div id=\"sensor-hub\">\
            <div class=\"metric\">Live IoT Sensors: <strong>8 Units Online</strong></div>\
            <div class=\"chart-grid\">{aqi_card}{noise_card}</div>\
        </div>",
        aqi_card = chart_card(
            SensorKind::AirQuality.label(),
            SensorKind::AirQuality.caption(),
            &svg_line_chart(&aqi, SensorKind::AirQuality, "#00aa44"),
        ),
        noise_card = chart_card(
            SensorKind::Noise.label(),
            SensorKind::Noise.caption(),
            &svg_area_chart(&noise, SensorKind::Noise, "#3366ff"),
        ),
    ))
}
