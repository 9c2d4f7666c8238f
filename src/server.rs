//! HTTP exposure of the crawl
//!
//! `GET /api/sports` runs a fresh crawl per request and streams records as
//! they complete: NDJSON by default, or rendered text with `?format=text`.

use crate::config::Config;
use crate::crawler::Coordinator;
use crate::model::CompletedRecord;
use crate::output::{build_sink, render_text};
use crate::Result;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use futures::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Response encoding for streamed records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Ndjson,
    Text,
}

#[derive(Debug, Default, Deserialize)]
pub struct SportsQuery {
    #[serde(default)]
    pub format: RecordFormat,
}

/// Builds the application router
pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route("/api/sports", get(get_sports))
        .with_state(coordinator)
}

/// GET /api/sports
async fn get_sports(
    State(coordinator): State<Arc<Coordinator>>,
    Query(query): Query<SportsQuery>,
) -> Response {
    let records = match coordinator.stream().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Crawl request failed: {}", e);
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };

    let (content_type, body) = match query.format {
        RecordFormat::Ndjson => (
            NDJSON_CONTENT_TYPE,
            Body::from_stream(records.map(|record| ndjson_line(&record))),
        ),
        RecordFormat::Text => (
            TEXT_CONTENT_TYPE,
            Body::from_stream(
                records.map(|record| Ok::<_, Infallible>(render_text(&record) + "\n")),
            ),
        ),
    };

    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

fn ndjson_line(record: &CompletedRecord) -> serde_json::Result<Vec<u8>> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    Ok(line)
}

/// Serves the router on the configured bind address until the process exits
///
/// With `server.autostart` set, one crawl to the configured sinks is started
/// in the background first.
pub async fn serve(config: &Config) -> Result<()> {
    let coordinator = Arc::new(Coordinator::new(config)?);

    if config.server.autostart {
        let sink = build_sink(&config.output).await?;
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            if let Err(e) = coordinator.run(&sink).await {
                tracing::error!("Startup crawl failed: {}", e);
            }
        });
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(coordinator)).await?;
    Ok(())
}
