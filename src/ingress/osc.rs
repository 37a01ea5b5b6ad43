//! OSC ingress for prop control signals

use super::forward_signal;
use crate::egress::{PropController, Signal};
use rosc::{decoder, OscPacket};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// Listens for `/calibrate`, `/interrogate` and `/reset` and forwards them
/// to the prop controller
pub struct OscListener {
    socket: UdpSocket,
    prop: Arc<PropController>,
}

impl OscListener {
    /// Bind the listening socket
    pub async fn bind(addr: SocketAddr, prop: Arc<PropController>) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket, prop })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receive until the task is aborted
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!(%addr, "listening for prop signals over OSC");
        }

        let mut buf = vec![0u8; decoder::MTU];
        loop {
            match self.socket.recv_from(&mut buf).await {
                Ok((len, from)) => {
                    for signal in self.handle(&buf[..len], from) {
                        forward_signal(&self.prop, signal);
                    }
                }
                Err(e) => warn!(error = %e, "OSC receive failed"),
            }
        }
    }

    fn handle(&self, bytes: &[u8], from: SocketAddr) -> Vec<Signal> {
        match decoder::decode_udp(bytes) {
            Ok((_, packet)) => signals_in(&packet),
            Err(e) => {
                warn!(%from, "undecodable OSC packet: {:?}", e);
                Vec::new()
            }
        }
    }
}

/// Prop signals addressed by a packet, in order; bundles are flattened
pub fn signals_in(packet: &OscPacket) -> Vec<Signal> {
    match packet {
        OscPacket::Message(msg) => match msg.addr.parse::<Signal>() {
            Ok(signal) => vec![signal],
            Err(_) => {
                debug!(address = %msg.addr, "ignoring OSC message");
                Vec::new()
            }
        },
        OscPacket::Bundle(bundle) => bundle.content.iter().flat_map(signals_in).collect(),
    }
}
