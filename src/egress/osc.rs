//! OSC over UDP to the cueing software

use super::{CueMessage, CueSink};
use crate::error::EgressError;
use rosc::{encoder, OscPacket};
use std::net::{SocketAddr, UdpSocket};
use tracing::debug;

/// Sends cue messages to a fixed OSC endpoint
pub struct OscEgress {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscEgress {
    /// Bind an ephemeral local socket for sending to `target`
    pub fn new(target: SocketAddr) -> Result<Self, EgressError> {
        let bind: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind)?;
        socket.set_nonblocking(true)?;

        Ok(Self { socket, target })
    }
}

/// Encode a message into an OSC packet
pub fn encode(message: &CueMessage) -> Result<Vec<u8>, EgressError> {
    encoder::encode(&OscPacket::Message(message.to_osc()))
        .map_err(|e| EgressError::Encoding(format!("{:?}", e)))
}

impl CueSink for OscEgress {
    fn send(&self, message: &CueMessage) -> Result<(), EgressError> {
        let bytes = encode(message)?;
        self.socket.send_to(&bytes, self.target)?;
        debug!(address = %message.address, to = %self.target, "sent OSC message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::decoder;
    use std::time::Duration;

    #[test]
    fn test_encode_decodes_back_to_address() {
        let bytes = encode(&CueMessage::new("/cue/g4/start")).unwrap();
        let (_, packet) = decoder::decode_udp(&bytes).unwrap();

        match packet {
            OscPacket::Message(msg) => assert_eq!(msg.addr, "/cue/g4/start"),
            OscPacket::Bundle(_) => panic!("expected a message"),
        }
    }

    #[test]
    fn test_send_reaches_listener() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        let egress = OscEgress::new(listener.local_addr().unwrap()).unwrap();
        egress.send(&CueMessage::new("/cue/p/start")).unwrap();

        let mut buf = [0u8; 1024];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let (_, packet) = decoder::decode_udp(&buf[..len]).unwrap();

        match packet {
            OscPacket::Message(msg) => assert_eq!(msg.addr, "/cue/p/start"),
            OscPacket::Bundle(_) => panic!("expected a message"),
        }
    }
}
