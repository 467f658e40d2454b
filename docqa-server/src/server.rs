use crate::pages;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use docqa_retriever::AnswerEngine;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

/// Shared by every request. The engine only reads its index.
#[derive(Clone)]
struct AppState {
    engine: Arc<AnswerEngine>,
}

#[derive(Debug, Deserialize)]
struct QueryForm {
    #[serde(default)]
    q: String,
}

/// Builds the application router around `engine`.
pub fn router(engine: Arc<AnswerEngine>) -> Router {
    Router::new()
        .route("/", get(form).post(answer))
        .route("/healthz", get(healthz))
        .with_state(AppState { engine })
}

async fn healthz() -> &'static str {
    "ok"
}

async fn form() -> Html<String> {
    Html(pages::form_page())
}

async fn answer(
    State(state): State<AppState>,
    Form(request): Form<QueryForm>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let question = request.q.trim();
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Html(pages::error_page("", "Please enter a question.")),
        ));
    }

    match state.engine.answer(question).await {
        Ok(answer) => {
            info!("Answered {:?}", question);
            Ok(Html(pages::answer_page(question, &answer)))
        }
        Err(e) => {
            error!("Query {:?} failed: {}", question, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page(question, &format!("Error: {e}"))),
            ))
        }
    }
}
