//! Store-side endpoint answering places requests.
//!
//! Requests are handled one at a time in arrival order, so a caller that
//! issues an update and then a fetch always sees its own update.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use places_core::defaults::{ACTION_DELETE, ACTION_DELETE_ALL, ACTION_FETCH_ALL, ACTION_UPSERT};
use places_core::{Error, PlacesStore, RecordPatch, Result, UrlPayload};

use crate::transport::Channel;
use crate::wire::{Request, Response};

/// Execute one action against `store`.
pub async fn dispatch(
    store: &dyn PlacesStore,
    action: &str,
    payload: JsonValue,
) -> Result<JsonValue> {
    match action {
        ACTION_FETCH_ALL => Ok(serde_json::to_value(store.fetch_all().await?)?),
        ACTION_UPSERT => {
            let patch: RecordPatch = serde_json::from_value(payload)?;
            patch.validate()?;
            store.upsert(patch).await?;
            Ok(JsonValue::Null)
        }
        ACTION_DELETE => {
            let UrlPayload { url } = serde_json::from_value(payload)?;
            store.delete(&url).await?;
            Ok(JsonValue::Null)
        }
        ACTION_DELETE_ALL => {
            store.delete_all().await?;
            Ok(JsonValue::Null)
        }
        other => Err(Error::InvalidInput(format!("unknown action: {other}"))),
    }
}

/// Serve requests from `channel` until the client side closes.
///
/// Requests without an id are executed but not answered.
pub async fn serve(channel: Channel, store: Arc<dyn PlacesStore>) {
    let Channel {
        outbound,
        mut inbound,
    } = channel;
    info!(subsystem = "endpoint", "Places endpoint serving");

    while let Some(message) = inbound.recv().await {
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!(subsystem = "endpoint", error = %e, "Ignoring malformed request");
                continue;
            }
        };

        let outcome = dispatch(store.as_ref(), &request.action, request.payload).await;
        let Some(id) = request.id else {
            if let Err(e) = outcome {
                warn!(subsystem = "endpoint", action = %request.action, error = %e, "Unanswered request failed");
            }
            continue;
        };

        let response = match outcome {
            Ok(result) => Response::ok(id, result),
            Err(e) => {
                debug!(subsystem = "endpoint", call_id = id, action = %request.action, error = %e, "Request failed");
                Response::err(id, e.to_string())
            }
        };

        let message = match serde_json::to_value(&response) {
            Ok(message) => message,
            Err(e) => {
                warn!(subsystem = "endpoint", call_id = id, error = %e, "Failed to encode response");
                continue;
            }
        };
        if outbound.send(message).is_err() {
            break;
        }
    }

    info!(subsystem = "endpoint", "Places endpoint stopped");
}
