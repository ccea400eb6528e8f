// HTTP request handlers
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};

use crate::domain::display::DashboardView;
use crate::presentation::app_state::AppState;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The most recently published dashboard view.
pub async fn current_view(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.view.borrow().clone())
}

/// Server-sent stream of dashboard views, one event per published update.
pub async fn stream_view(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = WatchStream::new(state.view.clone()).map(|view| {
        let event = match Event::default().json_data(&view) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!("failed to serialize dashboard view: {err}");
                Event::default().comment("serialization error")
            }
        };
        Ok(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
