use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    state::AppState,
    views::{DASHBOARD_FIELDS, DASHBOARD_TEMPLATE, INDEX_TEMPLATE},
};

/// GET / - Input form
pub async fn index(State(state): State<AppState>) -> Response {
    match state.templates.render(INDEX_TEMPLATE, &[]).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render index");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering template: {e}"),
            )
                .into_response()
        }
    }
}

/// GET /dashboard.html - Result view, filled from query parameters
///
/// Every known parameter defaults to an empty string; unknown ones are ignored.
/// A repeated parameter takes its first value.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let context: Vec<(&str, &str)> = DASHBOARD_FIELDS
        .iter()
        .map(|&key| (key, first_value(&params, key).unwrap_or("")))
        .collect();

    match state.templates.render(DASHBOARD_TEMPLATE, &context).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to render dashboard");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering dashboard template: {e}"),
            )
                .into_response()
        }
    }
}

fn first_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
