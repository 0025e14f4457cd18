use crate::charts::{historical_figures, prediction_figure, HistoricalFigures};
use crate::error::DashboardError;
use crate::models::Quantity;
use crate::processors::ReportContext;
use crate::server::pages::{self, Page};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use plotly::Plot;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

pub type SharedContext = Arc<ReportContext>;

/// Error returned by the JSON endpoints.
#[derive(Debug)]
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            DashboardError::UnknownQuantity(_) | DashboardError::QuantityUnavailable(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct QuantityOptions {
    pub historical: Vec<Quantity>,
    pub prediction: Vec<Quantity>,
}

pub fn router(context: SharedContext) -> Router {
    Router::new()
        .route(Page::Historical.path(), get(historical_page))
        .route(Page::Prediction.path(), get(prediction_page))
        .route("/api/quantities", get(quantities))
        .route("/api/historical/:quantity", get(historical))
        .route("/api/prediction/:quantity", get(prediction))
        .with_state(context)
}

async fn historical_page(State(context): State<SharedContext>) -> Html<String> {
    Html(pages::render(Page::Historical, context.daily.quantities()))
}

async fn prediction_page(State(context): State<SharedContext>) -> Html<String> {
    Html(pages::render(Page::Prediction, context.forecast.quantities()))
}

async fn quantities(State(context): State<SharedContext>) -> Json<QuantityOptions> {
    Json(QuantityOptions {
        historical: context.daily.quantities().to_vec(),
        prediction: context.forecast.quantities().to_vec(),
    })
}

async fn historical(
    State(context): State<SharedContext>,
    Path(name): Path<String>,
) -> Result<Json<HistoricalFigures>, ApiError> {
    let quantity: Quantity = name.parse()?;
    debug!("Redrawing historical charts for {}", quantity);
    Ok(Json(historical_figures(&context, quantity)))
}

async fn prediction(
    State(context): State<SharedContext>,
    Path(name): Path<String>,
) -> Result<Json<Plot>, ApiError> {
    let quantity: Quantity = name.parse()?;
    debug!("Redrawing prediction chart for {}", quantity);
    Ok(Json(prediction_figure(&context.forecast, quantity)?))
}
