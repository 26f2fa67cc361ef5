//! HTTP surface: one route that regenerates the full feed document from a
//! store scan. Request tasks share the store handle with the scheduler and
//! may observe a mid-cycle store; the served feed is a best-effort snapshot,
//! not a transactional view.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::feed::encoder;
use crate::store::EventStore;

pub const CALENDAR_PATH: &str = "/calendar/ical.ics";

pub fn router<S>(store: S) -> Router
where
    S: EventStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(CALENDAR_PATH, get(serve_calendar::<S>))
        .with_state(store)
}

/// Scan, encode, respond. The body is written only after the whole document
/// is built; any store failure yields a bare 500.
async fn serve_calendar<S>(State(store): State<S>) -> Response
where
    S: EventStore + Clone + Send + Sync + 'static,
{
    let records = match store.scan_all().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(error = %e, "Event scan failed while serving calendar");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    (
        [(header::CONTENT_TYPE, "text/calendar")],
        encoder::encode_calendar(&records),
    )
        .into_response()
}
