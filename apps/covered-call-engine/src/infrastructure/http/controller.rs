//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the strategy service.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    routing::{get, post},
};
use chrono::Utc;

use crate::application::dto::{PriceRow, StrategyStatusDto};
use crate::application::ports::{
    CallRepository, PriceHistoryRepository, PriceSource, SettingsRepository,
};
use crate::application::services::{DEFAULT_REFRESH_DAYS, StrategyService};
use crate::domain::strategy::{CallPosition, SettingsUpdate};
use crate::error::ApiError;

use super::request::PricesQuery;
use super::response::{HealthResponse, RefreshResponse, SettingsResponse, SuccessResponse};

/// Application state shared across handlers.
pub struct AppState<P, H, C, S>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    /// Strategy orchestrator.
    pub strategy: Arc<StrategyService<P, H, C, S>>,
    /// Application version.
    pub version: String,
}

impl<P, H, C, S> Clone for AppState<P, H, C, S>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<P, H, C, S>(state: AppState<P, H, C, S>) -> Router
where
    P: PriceSource + 'static,
    H: PriceHistoryRepository + 'static,
    C: CallRepository + 'static,
    S: SettingsRepository + 'static,
{
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/status", get(status))
        .route("/api/refresh", post(refresh))
        .route("/api/calls", get(list_calls).post(open_call))
        .route("/api/calls/{id}/close", post(close_call))
        .route("/api/settings", post(update_settings))
        .route("/api/prices", get(prices))
        .with_state(state)
}

async fn health_check<P, H, C, S>(State(state): State<AppState<P, H, C, S>>) -> Json<HealthResponse>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: state.version.clone(),
    })
}

async fn status<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
) -> Result<Json<StrategyStatusDto>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    Ok(Json(state.strategy.status().await?))
}

async fn refresh<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
) -> Result<Json<RefreshResponse>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    let count = state.strategy.refresh_prices(DEFAULT_REFRESH_DAYS).await?;
    Ok(Json(RefreshResponse { count }))
}

async fn list_calls<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
) -> Result<Json<Vec<CallPosition>>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    Ok(Json(state.strategy.list_calls().await?))
}

async fn open_call<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
) -> Result<Json<CallPosition>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    Ok(Json(state.strategy.open_call().await?))
}

async fn close_call<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    let Path(id) = id.map_err(|e| ApiError::invalid_input(e.body_text()))?;
    state.strategy.close_call(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn update_settings<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
    body: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsResponse>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    let Json(update) = body.map_err(|e| ApiError::invalid_input(e.body_text()))?;
    let settings = state.strategy.update_settings(update).await?;
    Ok(Json(settings.into()))
}

async fn prices<P, H, C, S>(
    State(state): State<AppState<P, H, C, S>>,
    query: Result<Query<PricesQuery>, QueryRejection>,
) -> Result<Json<Vec<PriceRow>>, ApiError>
where
    P: PriceSource,
    H: PriceHistoryRepository,
    C: CallRepository,
    S: SettingsRepository,
{
    let Query(query) = query.map_err(|e| ApiError::invalid_input(e.body_text()))?;
    Ok(Json(state.strategy.price_history(query.days_or_default()).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{FixedClock, PriceSourceError};
    use crate::application::services::StrategyServiceConfig;
    use crate::domain::market::PriceBar;
    use crate::domain::pricing::PremiumEstimator;
    use crate::error::HttpErrorResponse;
    use crate::infrastructure::persistence::InMemoryStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, TimeZone};
    use serde_json::Value;
    use tower::ServiceExt;

    struct StaticSource(Vec<PriceBar>);

    #[async_trait]
    impl PriceSource for StaticSource {
        async fn latest(&self, n: usize) -> Result<Vec<PriceBar>, PriceSourceError> {
            let skip = self.0.len().saturating_sub(n);
            Ok(self.0[skip..].to_vec())
        }
    }

    type TestState = AppState<StaticSource, InMemoryStore, InMemoryStore, InMemoryStore>;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            close,
            close + 0.2,
            close - 0.2,
            1_000_000,
        )
    }

    fn create_test_state(bars: Vec<PriceBar>) -> (TestState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap());
        let strategy = StrategyService::new(
            Arc::new(StaticSource(bars)),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::new(clock),
            PremiumEstimator::default(),
            StrategyServiceConfig::default(),
        );

        let state = AppState {
            strategy: Arc::new(strategy),
            version: "1.0.0-test".to_string(),
        };
        (state, store)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method("POST").uri(uri);
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state).oneshot(get("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], "1.0.0-test");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn status_returns_camel_case_snapshot() {
        let (state, _) = create_test_state(vec![bar(9, 22.5)]);
        let response = create_router(state).oneshot(get("/api/status")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["currentPrice"], 22.5);
        assert_eq!(body["sharesOwned"], 100);
        assert_eq!(body["daysToExpiry"], 37);
        assert_eq!(body["nextExpiry"], "2024-02-16");
        assert!(body["recentPrices"].is_array());
    }

    #[tokio::test]
    async fn status_without_price_is_service_unavailable() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state).oneshot(get("/api/status")).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["code"], "PRICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn open_list_and_close_call() {
        let (state, store) = create_test_state(vec![bar(9, 22.5)]);
        let app = create_router(state);

        let response = app.clone().oneshot(post("/api/calls", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let call = body_json(response).await;
        assert_eq!(call["status"], "open");
        assert_eq!(call["expires"], "2024-02-16");
        let id = call["id"].as_i64().unwrap();

        let response = app.clone().oneshot(get("/api/calls")).await.unwrap();
        let calls = body_json(response).await;
        assert_eq!(calls.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(post(&format!("/api/calls/{id}/close"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
        assert_eq!(store.call_count(), 1);
    }

    #[tokio::test]
    async fn close_unknown_call_is_not_found() {
        let (state, _) = create_test_state(vec![bar(9, 22.5)]);
        let response = create_router(state)
            .oneshot(post("/api/calls/999/close", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: HttpErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn close_with_non_numeric_id_is_bad_request() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state)
            .oneshot(post("/api/calls/abc/close", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn settings_update_merges_fields() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state)
            .oneshot(post(
                "/api/settings",
                Some(serde_json::json!({ "premiumPct": 5 })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["sharesOwned"], 100);
        assert_eq!(body["premiumPct"], 5.0);
    }

    #[tokio::test]
    async fn settings_with_zero_shares_is_rejected() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state)
            .oneshot(post(
                "/api/settings",
                Some(serde_json::json!({ "sharesOwned": 0 })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn settings_with_malformed_body_is_rejected() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state)
            .oneshot(post(
                "/api/settings",
                Some(serde_json::json!({ "sharesOwned": "lots" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_reports_count() {
        let (state, _) = create_test_state(vec![bar(8, 22.0), bar(9, 22.5)]);
        let response = create_router(state)
            .oneshot(post("/api/refresh", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["count"], 2);
    }

    #[tokio::test]
    async fn prices_returns_cached_rows() {
        let (state, store) = create_test_state(vec![]);
        store
            .upsert_bars(&[bar(8, 22.0), bar(9, 22.5), bar(10, 22.8)])
            .await
            .unwrap();
        let app = create_router(state);

        let response = app.clone().oneshot(get("/api/prices?days=2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rows = body_json(response).await;
        let rows = rows.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2024-01-09");
        assert_eq!(rows[1]["close"], 22.8);
        assert_eq!(rows[1]["high"], 23.0);

        let response = app.oneshot(get("/api/prices")).await.unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn prices_with_huge_days_returns_all_rows() {
        let (state, store) = create_test_state(vec![]);
        store.upsert_bars(&[bar(8, 22.0), bar(9, 22.5)]).await.unwrap();

        let response = create_router(state)
            .oneshot(get("/api/prices?days=18446744073709551615"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn prices_with_bad_days_is_bad_request() {
        let (state, _) = create_test_state(vec![]);
        let response = create_router(state)
            .oneshot(get("/api/prices?days=many"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
