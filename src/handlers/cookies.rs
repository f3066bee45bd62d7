//! Cookie inspection and setting.

use axum::http::StatusCode;

use crate::http::request::{is_cookie_name, RequestContext};
use crate::http::response::{Reply, SetCookie};

pub const COOKIE_MAX_AGE_SECS: u64 = 3600;

const MISSING_COOKIE: &str = "please add cookie to url /cookie_set/:name/:cookie";

const INVALID_NAME: &str = "cookie name must be a token (letters, digits and !#$%&'*+-.^_`|~)";

/// List request cookies as a `<pre>` block, one `name : value` per line.
pub async fn list(ctx: RequestContext) -> Reply {
    if ctx.cookies().is_empty() {
        return Reply::text(StatusCode::OK, "No Cookies.");
    }

    let lines: String = ctx
        .cookies()
        .iter()
        .map(|c| format!("{} : {} \n", c.name, c.value))
        .collect();
    Reply::text(StatusCode::OK, format!("<pre>{lines}</pre>"))
}

/// `/cookie_set/:name/:cookie`
pub async fn set(ctx: RequestContext) -> Reply {
    let name = ctx.param("name");
    let value = ctx.param("cookie");
    if value.is_empty() {
        return Reply::text(StatusCode::BAD_REQUEST, MISSING_COOKIE);
    }
    if !is_cookie_name(name) {
        return Reply::text(StatusCode::BAD_REQUEST, INVALID_NAME);
    }

    let cookie = SetCookie::new(name, value)
        .max_age(COOKIE_MAX_AGE_SECS)
        .path("/")
        .domain(ctx.host().unwrap_or_default())
        .secure(true)
        .http_only(false);

    tracing::debug!(cookie = %cookie.name(), "Setting cookie");
    Reply::text(StatusCode::OK, "setCookie OK.").with_cookie(cookie)
}
