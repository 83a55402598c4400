//! Streaming endpoint
//!
//! Async kinds are polled straight from [`async_feed`]. Blocking kinds run
//! [`BlockingFeed`] on the blocking pool and hand chunks over a bounded
//! channel; when the client goes away the receiver is dropped and the
//! producer stops at its next send.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use futures::StreamExt;
use ormctl_core::{async_feed, BlockingFeed, FeedSettings, StreamKind};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::http::error::ApiError;
use crate::http::extractors::ValidQuery;
use crate::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    pub stream_type: StreamKind,
}

fn blocking_body(kind: StreamKind, settings: FeedSettings) -> Body {
    let (tx, rx) = mpsc::channel::<String>(1);

    tokio::task::spawn_blocking(move || {
        for chunk in BlockingFeed::new(kind, settings) {
            if tx.blocking_send(chunk).is_err() {
                tracing::debug!(%kind, "stream receiver dropped");
                break;
            }
        }
    });

    let chunks = ReceiverStream::new(rx).map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk)));
    Body::from_stream(chunks)
}

fn async_body(kind: StreamKind, settings: FeedSettings) -> Body {
    let chunks = async_feed(kind, settings).map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk)));
    Body::from_stream(chunks)
}

/// GET /stream?stream_type=...
async fn stream(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<StreamParams>,
) -> Result<Response, ApiError> {
    let kind = params.stream_type;
    let settings = state.feed();
    tracing::debug!(%kind, count = settings.count, "streaming");

    let body = if kind.is_blocking() {
        blocking_body(kind, settings)
    } else {
        async_body(kind, settings)
    };

    let response = if kind == StreamKind::Sse {
        (
            [
                (header::CONTENT_TYPE, kind.media_type()),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            body,
        )
            .into_response()
    } else {
        ([(header::CONTENT_TYPE, kind.media_type())], body).into_response()
    };

    Ok(response)
}

/// Stream routes
pub fn router() -> Router<AppState> {
    super::route_both(Router::new(), "/stream", get(stream))
}
