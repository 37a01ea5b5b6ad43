//! HTTP request ingress
//!
//! Every route answers a plain `OK` once its parameters validate. Delivery
//! to the cueing software or the prop happens after that and never changes
//! the reply.

use super::{forward_signal, params};
use crate::bridge::BridgeContext;
use crate::config::{CALIBRATION_POINT_ROUTE, HEALTH_ROUTE, RATE_ROUTE};
use crate::egress::Signal;
use crate::error::IngressError;
use crate::mapping::CueChannel;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

type Params = Query<HashMap<String, String>>;

/// Build the router for the rate route, one route per channel, the prop
/// signals and the calibration point notification
pub fn router(ctx: BridgeContext, channels: Vec<CueChannel>) -> Router {
    let mut router = Router::new()
        .route(RATE_ROUTE, get(rate))
        .route(CALIBRATION_POINT_ROUTE, get(calibration_point))
        .route(
            HEALTH_ROUTE,
            get(|| async { Json(serde_json::json!({"status": "ok"})) }),
        );

    for channel in channels {
        info!(
            channel = channel.name(),
            route = channel.route(),
            "creating cue endpoint '{}X/start'",
            channel.prefix()
        );
        let route = channel.route().to_string();
        let channel = Arc::new(channel);
        router = router.route(
            &route,
            get(move |State(ctx): State<BridgeContext>, Query(params): Params| async move {
                reading(&ctx, &channel, &params)
            }),
        );
    }

    for signal in Signal::ALL {
        router = router.route(
            &signal.path(),
            get(move |State(ctx): State<BridgeContext>| async move {
                forward_signal(&ctx.prop, signal);
                "OK"
            }),
        );
    }

    router.with_state(ctx)
}

async fn rate(
    State(ctx): State<BridgeContext>,
    Query(params): Params,
) -> Result<&'static str, IngressError> {
    let bpm = params::required(&params, "v")?;

    if ctx.rate.submit(bpm) {
        info!("{} ({:.2})", RATE_ROUTE, bpm);
    } else {
        debug!(bpm, "rate sample carries no rate, ignored");
    }
    Ok("OK")
}

async fn calibration_point() -> &'static str {
    info!("calibration point recorded");
    "OK"
}

fn reading(
    ctx: &BridgeContext,
    channel: &CueChannel,
    params: &HashMap<String, String>,
) -> Result<&'static str, IngressError> {
    let value = params::required(params, "v")?;
    let baseline = if channel.policy().needs_baseline() {
        Some(params::required(params, "b")?)
    } else {
        None
    };

    let message = channel.trigger(value, baseline);
    match ctx.cues.send(&message) {
        Ok(()) => info!("{} ({:.2})", message.address, value),
        Err(e) => warn!(address = %message.address, error = %e, "unable to deliver cue"),
    }
    Ok("OK")
}
