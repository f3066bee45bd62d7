//! `/dns/:domains`

use axum::http::StatusCode;

use crate::dns::{resolve_all, DnsLimits};
use crate::http::request::RequestContext;
use crate::http::response::Reply;

pub async fn dns(ctx: RequestContext, limits: DnsLimits) -> Reply {
    match resolve_all(ctx.param("domains"), &limits).await {
        Ok(resolved) => Reply::json(StatusCode::OK, &resolved),
        Err(e) => {
            tracing::debug!(error = %e, "DNS request rejected");
            Reply::text(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}
