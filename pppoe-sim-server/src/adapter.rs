//! Frame assembly on top of a [`FrameTransport`]
//!
//! The adapter owns the transport and the local hardware address for one
//! session. It wraps payloads in PPPoE and Ethernet headers and never looks
//! inside them.

use pppoe_sim_core::{FrameTransport, MacAddr, Result};
use pppoe_sim_packet::{
    EtherType, EthernetFrame, LcpPacket, PapPacket, PppFrame, PppProtocol, PppoeCode, PppoePacket,
};
use tracing::{debug, warn};

pub struct TransportAdapter<T: FrameTransport> {
    transport: T,
    local_mac: MacAddr,
    frames_sent: u64,
    send_failures: u64,
}

impl<T: FrameTransport> TransportAdapter<T> {
    pub fn new(transport: T) -> Self {
        let local_mac = transport.local_mac();
        Self {
            transport,
            local_mac,
            frames_sent: 0,
            send_failures: 0,
        }
    }

    pub fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn send_failures(&self) -> u64 {
        self.send_failures
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Block for the next inbound frame
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        self.transport.read_frame()
    }

    /// Wrap `payload` in a PPPoE header and an Ethernet header, then write it.
    ///
    /// Write failures are logged and counted; the caller carries on.
    pub fn send(
        &mut self,
        dst: MacAddr,
        payload: Vec<u8>,
        code: PppoeCode,
        session_id: u16,
        ethertype: EtherType,
        declared_length: u16,
    ) {
        let pppoe = PppoePacket::with_length(code, session_id, declared_length, payload);
        let frame = EthernetFrame::new(dst, self.local_mac, ethertype, pppoe.to_bytes());
        let bytes = frame.to_bytes();

        match self.transport.write_frame(&bytes) {
            Ok(()) => {
                self.frames_sent += 1;
                debug!(%dst, %ethertype, size = bytes.len(), "Frame sent");
            }
            Err(e) => {
                self.send_failures += 1;
                warn!(%dst, %ethertype, error = %e, "Failed to send frame");
            }
        }
    }

    /// Send a discovery packet (EtherType 0x8863)
    pub fn send_discovery(
        &mut self,
        dst: MacAddr,
        code: PppoeCode,
        session_id: u16,
        payload: Vec<u8>,
    ) {
        let length = payload.len() as u16;
        self.send(dst, payload, code, session_id, EtherType::PPPoEDiscovery, length);
    }

    /// Send a PPP frame inside a session packet (EtherType 0x8864)
    pub fn send_ppp(
        &mut self,
        dst: MacAddr,
        session_id: u16,
        protocol: PppProtocol,
        payload: Vec<u8>,
    ) {
        let ppp = PppFrame::new(protocol, payload).to_bytes();
        let length = ppp.len() as u16;
        self.send(
            dst,
            ppp,
            PppoeCode::SessionData,
            session_id,
            EtherType::PPPoESession,
            length,
        );
    }

    pub fn send_lcp(&mut self, dst: MacAddr, session_id: u16, packet: &LcpPacket) {
        self.send_ppp(dst, session_id, PppProtocol::Lcp, packet.to_bytes());
    }

    pub fn send_pap(&mut self, dst: MacAddr, session_id: u16, packet: &PapPacket) {
        self.send_ppp(dst, session_id, PppProtocol::Pap, packet.to_bytes());
    }
}
