//! Illustrative environmental telemetry for the admin sensor hub.
//!
//! Samples are uniform random draws regenerated on every render; the
//! [`TelemetrySource`] trait is the seam where a real sensor feed would be
//! plugged in.

pub mod ui;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

use crate::shared::state::AppState;

pub const SERIES_POINTS: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum SensorsError {
    #[error("Unknown sensor: {0}")]
    UnknownKind(String),
    #[error("{0}")]
    Locked(&'static str),
}

impl IntoResponse for SensorsError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let status = match &self {
            Self::UnknownKind(_) => StatusCode::NOT_FOUND,
            Self::Locked(_) => StatusCode::UNAUTHORIZED,
        };
        let message = self.to_string();
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    AirQuality,
    Noise,
}

impl SensorKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AirQuality => "AQI (PM2.5)",
            Self::Noise => "Noise Level (dB)",
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            Self::AirQuality => "Air Quality: Moderate",
            Self::Noise => "Noise Levels: Normal",
        }
    }

    /// Uniform sample range for the simulated feed.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::AirQuality => (60.0, 150.0),
            Self::Noise => (40.0, 85.0),
        }
    }
}

impl std::str::FromStr for SensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "air_quality" | "aqi" => Ok(Self::AirQuality),
            "noise" => Ok(Self::Noise),
            _ => Err(format!("Unknown sensor: {s}")),
        }
    }
}

/// Time-series seam: kind + point count -> series.
pub trait TelemetrySource: Send + Sync {
    fn series(&self, kind: SensorKind, points: usize) -> Vec<f64>;
}

#[derive(Debug, Default)]
pub struct SimulatedSensorHub;

impl SimulatedSensorHub {
    pub fn new() -> Self {
        Self
    }
}

impl TelemetrySource for SimulatedSensorHub {
    fn series(&self, kind: SensorKind, points: usize) -> Vec<f64> {
        let (lo, hi) = kind.range();
        let mut rng = rand::thread_rng();
        (0..points).map(|_| rng.gen_range(lo..hi).round()).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct SeriesResponse {
    pub sensor: SensorKind,
    pub label: &'static str,
    pub caption: &'static str,
    pub points: Vec<f64>,
}

pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<SeriesResponse>, SensorsError> {
    if !state.auth.admin_logged_in().await {
        return Err(SensorsError::Locked("Officer login required"));
    }
    let kind: SensorKind = kind
        .parse()
        .map_err(|_| SensorsError::UnknownKind(kind.clone()))?;
    let points = state.telemetry.series(kind, SERIES_POINTS);
    Ok(Json(SeriesResponse {
        sensor: kind,
        label: kind.label(),
        caption: kind.caption(),
        points,
    }))
}

pub fn configure_sensors_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sensors/:kind", get(get_series))
        .route("/api/ui/sensors", get(ui::handle_sensor_hub))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_has_requested_length_and_stays_in_range() {
        let hub = SimulatedSensorHub::new();
        for kind in [SensorKind::AirQuality, SensorKind::Noise] {
            let series = hub.series(kind, SERIES_POINTS);
            assert_eq!(series.len(), SERIES_POINTS);
            let (lo, hi) = kind.range();
            for v in series {
                assert!(v >= lo && v <= hi, "{kind:?}: {v} outside [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn errors_map_to_the_expected_statuses() {
        use axum::http::StatusCode;
        let resp = SensorsError::UnknownKind("humidity".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = SensorsError::Locked("Officer login required").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn sensor_kind_parses_path_values() {
        assert_eq!("air_quality".parse::<SensorKind>(), Ok(SensorKind::AirQuality));
        assert_eq!("aqi".parse::<SensorKind>(), Ok(SensorKind::AirQuality));
        assert_eq!("noise".parse::<SensorKind>(), Ok(SensorKind::Noise));
        assert!("humidity".parse::<SensorKind>().is_err());
    }
}
