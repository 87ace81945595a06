use axum::{
    body::Bytes,
    extract::Path,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info, warn};

use crate::SharedState;
use crate::event::PushEvent;
use crate::runner::run_hook_command;

pub async fn root() -> &'static str {
    "bithook is running."
}

/// Handles the Bitbucket webhook POST request for a single hook id.
pub async fn handle_hook(
    AxumState(state): AxumState<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(hook) = state.hooks.find(&id) else {
        warn!("no hook with the id '{}'", id);
        return (StatusCode::NOT_FOUND, "Hook not found.").into_response();
    };

    info!("{} got matched", id);

    let event = parse_push_event(&headers, &body);
    let (triggered, matched_value) = hook.evaluate(&event);

    if !triggered {
        info!(
            "{} got matched, but didn't get triggered because the trigger rules were not satisfied",
            hook.id
        );
        return "Hook rules were not satisfied.".into_response();
    }

    info!("{} hook triggered successfully", hook.id);
    debug!("matched value: {:?}", matched_value);

    // Run the command in the background so the webhook caller gets its
    // response immediately.
    let response_message = hook.response_message.clone();
    let hook = hook.clone();
    tokio::spawn(async move {
        if let Err(e) = run_hook_command(&hook, &matched_value).await {
            error!("error running command for hook {}: {}", hook.id, e);
        }
    });

    response_message.into_response()
}

/// Parses the request body into a [`PushEvent`].
///
/// A non-JSON content type or an unparseable body degrades to an empty
/// event rather than a request error; the hook's rules then simply fail
/// to match.
fn parse_push_event(headers: &HeaderMap, body: &Bytes) -> PushEvent {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("json"))
        .unwrap_or(false);

    if !is_json {
        info!("request body is not JSON, evaluating against an empty event");
        return PushEvent::default();
    }

    match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            info!("error parsing JSON payload: {}", e);
            PushEvent::default()
        }
    }
}
