use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use advisor_core::config::Settings;
use advisor_core::domain::attributes::{MarketSnapshot, StockAttributes};
use advisor_core::domain::contract::RecommendRequest;
use advisor_core::domain::recommendation::Recommendation;
use advisor_core::engine::{stocks_by_sector, EngineOptions, ListOrder, ListedStock, Recommender, SelectionTier};
use advisor_core::ingest::{
    FileSnapshotProvider, HttpJsonSnapshotProvider, LoadedSnapshot, SnapshotProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let engine = EngineOptions::from_env()?;

    let provider = match build_provider(&settings) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::error!(error = %e, "no snapshot provider configured; starting API in degraded mode");
            None
        }
    };

    let state = AppState::new(provider, engine.recommender());
    if let Err(e) = state.refresh().await {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "initial snapshot fetch failed; starting API in degraded mode");
    }

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_provider(settings: &Settings) -> anyhow::Result<Arc<dyn SnapshotProvider>> {
    if settings.snapshot_path.is_some() {
        return Ok(Arc::new(FileSnapshotProvider::from_settings(settings)?));
    }
    Ok(Arc::new(HttpJsonSnapshotProvider::from_settings(settings)?))
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/snapshot", get(get_snapshot))
        .route("/snapshot/refresh", post(refresh_snapshot))
        .route("/stocks/:sector", get(get_stocks_by_sector))
        .route("/recommend", post(post_recommend))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
struct CurrentSnapshot {
    provider: &'static str,
    fetched_at: DateTime<Utc>,
    loaded: LoadedSnapshot,
}

#[derive(Clone)]
struct AppState {
    provider: Option<Arc<dyn SnapshotProvider>>,
    snapshot: Arc<RwLock<Option<Arc<CurrentSnapshot>>>>,
    recommender: Arc<Recommender>,
}

impl AppState {
    fn new(provider: Option<Arc<dyn SnapshotProvider>>, recommender: Recommender) -> Self {
        Self {
            provider,
            snapshot: Arc::new(RwLock::new(None)),
            recommender: Arc::new(recommender),
        }
    }

    async fn current(&self) -> Option<Arc<CurrentSnapshot>> {
        self.snapshot.read().await.clone()
    }

    async fn replace(&self, provider: &'static str, loaded: LoadedSnapshot) -> Arc<CurrentSnapshot> {
        let current = Arc::new(CurrentSnapshot {
            provider,
            fetched_at: Utc::now(),
            loaded,
        });
        *self.snapshot.write().await = Some(current.clone());
        current
    }

    async fn refresh(&self) -> anyhow::Result<Arc<CurrentSnapshot>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no snapshot provider configured"))?;
        let loaded = provider.fetch_snapshot().await?;
        tracing::info!(
            provider = provider.provider_name(),
            symbols = loaded.snapshot.len(),
            as_of_date = ?loaded.as_of_date,
            "snapshot loaded"
        );
        Ok(self.replace(provider.provider_name(), loaded).await)
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn no_snapshot() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "stock data is not loaded yet; try /snapshot/refresh",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "status": "error",
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
    }))
}

#[derive(Debug, Serialize)]
struct SnapshotSummary {
    provider: &'static str,
    fetched_at: DateTime<Utc>,
    as_of_date: Option<NaiveDate>,
    symbols: usize,
}

impl From<&CurrentSnapshot> for SnapshotSummary {
    fn from(s: &CurrentSnapshot) -> Self {
        Self {
            provider: s.provider,
            fetched_at: s.fetched_at,
            as_of_date: s.loaded.as_of_date,
            symbols: s.loaded.snapshot.len(),
        }
    }
}

async fn get_snapshot(State(state): State<AppState>) -> Result<Json<SnapshotSummary>, ApiError> {
    let current = state.current().await.ok_or_else(ApiError::no_snapshot)?;
    Ok(Json(SnapshotSummary::from(current.as_ref())))
}

async fn refresh_snapshot(State(state): State<AppState>) -> Result<Json<SnapshotSummary>, ApiError> {
    let current = state.refresh().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "snapshot refresh failed");
        ApiError::new(StatusCode::SERVICE_UNAVAILABLE, format!("{e:#}"))
    })?;
    Ok(Json(SnapshotSummary::from(current.as_ref())))
}

#[derive(Debug, Deserialize)]
struct StocksQuery {
    order: Option<String>,
}

async fn get_stocks_by_sector(
    State(state): State<AppState>,
    Path(sector): Path<String>,
    Query(query): Query<StocksQuery>,
) -> Result<Json<Vec<ListedStock>>, ApiError> {
    let current = state.current().await.ok_or_else(ApiError::no_snapshot)?;
    let order = query
        .order
        .as_deref()
        .map(ListOrder::parse)
        .unwrap_or_default();

    let stocks = stocks_by_sector(&current.loaded.snapshot, &sector, order);
    if stocks.is_empty() {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Category '{sector}' not found"),
        ));
    }
    Ok(Json(stocks))
}

/// A recommendation plus the attributes it was computed from.
#[derive(Debug, Serialize)]
struct RecommendationView {
    #[serde(flatten)]
    recommendation: Recommendation,
    name: Option<String>,
    price: f64,
    sector: String,
    market_cap: f64,
    beta: f64,
    dividend_yield: f64,
}

impl RecommendationView {
    fn new(recommendation: Recommendation, attrs: &StockAttributes) -> Self {
        Self {
            recommendation,
            name: attrs.name.clone(),
            price: attrs.current_price,
            sector: attrs.sector.clone().unwrap_or_else(|| "Unknown".to_string()),
            market_cap: attrs.market_cap.unwrap_or(0.0),
            beta: attrs.effective_beta(),
            dividend_yield: attrs.dividend_yield,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    status: &'static str,
    as_of_date: Option<NaiveDate>,
    selection: SelectionTier,
    ranked: usize,
    investment_amount: f64,
    recommendations: Vec<RecommendationView>,
}

async fn post_recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    let prefs = request
        .validate_and_into_preferences()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let current = state.current().await.ok_or_else(ApiError::no_snapshot)?;
    let snapshot: &MarketSnapshot = &current.loaded.snapshot;

    let selection = state.recommender.recommend_with_trace(snapshot, &prefs);
    tracing::info!(
        risk = %prefs.risk_appetite,
        goal = %prefs.investment_goal,
        horizon = prefs.investment_horizon,
        tier = ?selection.tier,
        count = selection.recommendations.len(),
        "recommendations served"
    );

    let recommendations = selection
        .recommendations
        .into_iter()
        .filter_map(|rec| {
            let attrs = snapshot.get(&rec.symbol)?;
            Some(RecommendationView::new(rec, attrs))
        })
        .collect();

    Ok(Json(RecommendResponse {
        status: "success",
        as_of_date: current.loaded.as_of_date,
        selection: selection.tier,
        ranked: selection.ranked,
        investment_amount: prefs.investment_amount,
        recommendations,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
