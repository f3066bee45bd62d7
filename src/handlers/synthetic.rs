//! Routes that answer without looking at the request.

use axum::http::StatusCode;
use chrono::{Local, SecondsFormat, Utc};
use serde_json::json;

use crate::http::request::RequestContext;
use crate::http::response::Reply;

pub async fn hello(_ctx: RequestContext) -> Reply {
    Reply::text(StatusCode::OK, "Hello World!")
}

pub async fn ping(_ctx: RequestContext) -> Reply {
    Reply::text(StatusCode::OK, "pong")
}

/// Local time, RFC 3339 with second precision.
pub async fn date(_ctx: RequestContext) -> Reply {
    Reply::text(
        StatusCode::OK,
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Seconds since the Unix epoch.
pub async fn timestamp(_ctx: RequestContext) -> Reply {
    Reply::text(StatusCode::OK, Utc::now().timestamp().to_string())
}

pub async fn check_status(_ctx: RequestContext) -> Reply {
    Reply::json(StatusCode::OK, &json!({ "status": 1 }))
}

pub async fn generate_204(_ctx: RequestContext) -> Reply {
    Reply::empty(StatusCode::NO_CONTENT)
}
