use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::{Deserialize, Serialize};

use metar_config::AppConfig;
use metar_core::{DirectionKind, SpeedUnit, WindEncoder, WindObservation, WindResult};

/// Per-deployment settings resolved from [`AppConfig`]
#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    pub station: Option<String>,
    pub speed_unit: SpeedUnit,
}

impl AppSettings {
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let speed_unit = cfg
            .speed_unit()
            .parse()
            .context("Invalid encoder.speed_unit")?;
        Ok(Self {
            station: cfg.station_id(),
            speed_unit,
        })
    }
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    encode_faults_total: Counter<u64>,
    encoder: WindEncoder,
    settings: AppSettings,
}

/// Encoded group as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedWind {
    pub station: Option<String>,
    pub wind: String,
    pub kind: DirectionKind,
}

pub fn build_app() -> (Router, Arc<AppState>) {
    build_app_with(AppSettings::default())
}

pub fn build_app_with(settings: AppSettings) -> (Router, Arc<AppState>) {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .expect("prom exporter");
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("metar-cli");

    let requests_total = meter
        .u64_counter("metar_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let encode_faults_total = meter
        .u64_counter("metar_encode_faults_total")
        .with_description("Observations rejected with a parsing fault")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        encode_faults_total,
        encoder: WindEncoder::default(),
        settings,
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/wind", post(encode_wind))
        .route("/api/v1/wind/batch", post(encode_batch))
        .with_state(Arc::clone(&state));

    (router, state)
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

/// Encode one observation given in `unit`
pub fn encode_observation(
    state: &AppState,
    observation: Option<&WindObservation>,
    unit: SpeedUnit,
) -> WindResult<EncodedWind> {
    let observation = observation.map(|obs| obs.to_knots(unit));
    let group = state.encoder.encode_group(observation.as_ref())?;
    Ok(EncodedWind {
        station: state.settings.station.clone(),
        wind: group.to_string(),
        kind: group.direction_kind(),
    })
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.requests_total.add(1, &[]);
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

#[derive(Deserialize)]
struct UnitQuery {
    unit: Option<String>,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// `?unit=` overrides the configured unit
fn resolve_unit(state: &AppState, q: &UnitQuery) -> Result<SpeedUnit, Response> {
    match q.unit.as_deref() {
        None => Ok(state.settings.speed_unit),
        Some(raw) => raw
            .parse()
            .map_err(|e: metar_core::UnitError| error_response(StatusCode::BAD_REQUEST, e.to_string())),
    }
}

fn fault_response(state: &AppState, fault: metar_core::WindError) -> Response {
    state.encode_faults_total.add(1, &[]);
    tracing::error!(error = %fault, "wind encoding failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, fault.to_string())
}

async fn encode_wind(
    State(state): State<Arc<AppState>>,
    Query(q): Query<UnitQuery>,
    Json(observation): Json<Option<WindObservation>>,
) -> Response {
    state.requests_total.add(1, &[]);
    let unit = match resolve_unit(&state, &q) {
        Ok(unit) => unit,
        Err(res) => return res,
    };

    match encode_observation(&state, observation.as_ref(), unit) {
        Ok(encoded) => (StatusCode::OK, Json(encoded)).into_response(),
        Err(fault) => fault_response(&state, fault),
    }
}

async fn encode_batch(
    State(state): State<Arc<AppState>>,
    Query(q): Query<UnitQuery>,
    Json(observations): Json<Vec<Option<WindObservation>>>,
) -> Response {
    state.requests_total.add(1, &[]);
    let unit = match resolve_unit(&state, &q) {
        Ok(unit) => unit,
        Err(res) => return res,
    };

    let encoded: WindResult<Vec<EncodedWind>> = observations
        .iter()
        .map(|obs| encode_observation(&state, obs.as_ref(), unit))
        .collect();
    match encoded {
        Ok(encoded) => (StatusCode::OK, Json(encoded)).into_response(),
        Err(fault) => fault_response(&state, fault),
    }
}
