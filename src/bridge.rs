//! Process wiring: context, scheduler, listeners

use crate::config::BridgeConfig;
use crate::egress::{CueSink, OscEgress, PropController};
use crate::ingress::{self, OscListener};
use crate::mapping::CueChannel;
use crate::pulse::{PulseScheduler, RateCell};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Everything a request handler may touch, handed over at construction
#[derive(Clone)]
pub struct BridgeContext {
    /// Hand-off into the pulse scheduler
    pub rate: Arc<RateCell>,
    /// Cue delivery
    pub cues: Arc<dyn CueSink>,
    /// Prop controller client
    pub prop: Arc<PropController>,
}

impl BridgeContext {
    pub fn new(rate: Arc<RateCell>, cues: Arc<dyn CueSink>, prop: Arc<PropController>) -> Self {
        Self { rate, cues, prop }
    }
}

/// The running bridge
pub struct Bridge {
    config: BridgeConfig,
}

impl Bridge {
    /// Create a bridge from validated configuration
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Reading channels from the configuration
    pub fn channels(&self) -> Vec<CueChannel> {
        self.config.channels.iter().map(CueChannel::from_config).collect()
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let target = self.config.osc.target_addr()?;
        let egress = OscEgress::new(target).context("failed to open OSC egress socket")?;
        info!(osc_target = %target, "sending cues over OSC");
        let cues: Arc<dyn CueSink> = Arc::new(egress);

        let prop = Arc::new(PropController::new(
            self.config.prop.base_url.clone(),
            self.config.prop.timeout(),
        )?);
        let rate = Arc::new(RateCell::new());
        let ctx = BridgeContext::new(Arc::clone(&rate), Arc::clone(&cues), Arc::clone(&prop));

        let mut scheduler = PulseScheduler::new(self.config.pulse.settings(), rate, cues);
        scheduler.start();

        let osc_addr = self.config.osc.listen_addr()?;
        let osc = OscListener::bind(osc_addr, prop)
            .await
            .with_context(|| format!("failed to bind OSC listener on {}", osc_addr))?;
        let osc_task = tokio::spawn(osc.run());

        let app = ingress::router(ctx, self.channels());
        let bind = self.config.http.bind_addr()?;
        let listener = TcpListener::bind(bind)
            .await
            .with_context(|| format!("failed to bind HTTP listener on {}", bind))?;
        info!("listening on http://{}", bind);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        scheduler.stop();
        osc_task.abort();
        info!("bridge stopped");

        served.context("HTTP server failed")
    }
}
