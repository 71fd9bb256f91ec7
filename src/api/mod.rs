// API module entry
// Read-only stats API over the player statistics dataset

mod handlers;
mod response;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::convert::Infallible;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::logger;

/// API route handler
///
/// Dispatches to handler functions based on the path below `/api`.
pub async fn handle_api_request(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let cors = state.config.http.enable_cors;
    let rest = ctx.path.trim_start_matches("/api").trim_matches('/');
    let segments: Vec<&str> = rest.split('/').collect();

    let (status, resp) = match segments.as_slice() {
        ["players"] => handlers::all_players(state, ctx.is_head),
        ["top-players", metric] => handlers::top_players(state, metric, ctx.is_head),
        ["position", position, metric] => {
            handlers::position_leaders(state, position, metric, ctx.is_head)
        }
        ["positions"] => handlers::positions(state, ctx.is_head),
        _ => (404, response::not_found(cors)),
    };

    logger::log_api_request("GET", ctx.path, status);
    Ok(resp)
}
