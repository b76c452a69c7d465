//! Session engine
//!
//! Drives one simulated PPPoE session from discovery through LCP
//! negotiation and PAP authentication, answering every client frame with the
//! reply an access concentrator would send. The engine ends when the client
//! starts IPv6CP (the link is up, credentials are in hand) or when the
//! transport stops delivering frames.

use pppoe_sim_core::util::{random_bytes, random_u32};
use pppoe_sim_core::{FrameTransport, MacAddr, Result};
use pppoe_sim_packet::{
    EtherType, EthernetFrame, LcpCode, LcpOption, LcpOptionType, LcpPacket, OfferTags, PapCode,
    PapPacket, PppFrame, PppProtocol, PppoeCode, PppoePacket, PppoeTag,
};
use std::fmt;
use tracing::{debug, info, warn};

use crate::adapter::TransportAdapter;
use crate::config::SimulatorConfig;

pub(crate) const HOST_UNIQ_LEN: usize = 8;
pub(crate) const AC_COOKIE_LEN: usize = 16;

/// Identifier of the Terminate-Request sent on teardown
const TEARDOWN_IDENTIFIER: u8 = 1;

const LAYER_DISCOVERY: &str = "PPPoED";

/// Phase of the simulated session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingDiscovery,
    DiscoveryOffered,
    SessionConfirmed,
    LcpNegotiating,
    Authenticating,
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingDiscovery => write!(f, "awaiting discovery"),
            SessionState::DiscoveryOffered => write!(f, "discovery offered"),
            SessionState::SessionConfirmed => write!(f, "session confirmed"),
            SessionState::LcpNegotiating => write!(f, "LCP negotiating"),
            SessionState::Authenticating => write!(f, "authenticating"),
            SessionState::Terminated => write!(f, "terminated"),
        }
    }
}

/// Credentials submitted in a PAP Authenticate-Request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub peer_id: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(peer_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            secret: secret.into(),
        }
    }

    /// Whether any credential material was captured
    pub fn is_captured(&self) -> bool {
        !self.peer_id.is_empty() || !self.secret.is_empty()
    }
}

/// How the engine stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The client moved on to IPv6CP and the session was torn down
    Completed,
    /// The transport ended or failed before teardown
    TransportClosed(String),
}

/// Frame counters for one engine run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames_received: u64,
    pub frames_sent: u64,
    pub send_failures: u64,
    /// Own frames, ignored stations and unsupported protocols
    pub frames_ignored: u64,
    pub frames_malformed: u64,
}

/// Result of [`SessionEngine::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub credentials: Credentials,
    pub outcome: SessionOutcome,
    pub stats: SessionStats,
}

/// Per-session state, discarded with the engine
#[derive(Debug, Clone)]
struct Transcript {
    session_id: u16,
    last_identifier: Option<u8>,
    client: Option<MacAddr>,
    state: SessionState,
    credentials: Credentials,
}

impl Transcript {
    fn new(session_id: u16) -> Self {
        Self {
            session_id,
            last_identifier: None,
            client: None,
            state: SessionState::AwaitingDiscovery,
            credentials: Credentials::default(),
        }
    }
}

enum Flow {
    Continue,
    Finished,
}

/// The access concentrator side of one PPPoE session
pub struct SessionEngine<T: FrameTransport> {
    adapter: TransportAdapter<T>,
    config: SimulatorConfig,
    transcript: Transcript,
    stats: SessionStats,
}

impl<T: FrameTransport> SessionEngine<T> {
    pub fn new(transport: T, config: SimulatorConfig) -> Self {
        let transcript = Transcript::new(config.session_id);
        Self {
            adapter: TransportAdapter::new(transport),
            config,
            transcript,
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.transcript.state
    }

    /// Hardware address of the client being served, once one has spoken
    pub fn client(&self) -> Option<MacAddr> {
        self.transcript.client
    }

    pub fn credentials(&self) -> &Credentials {
        &self.transcript.credentials
    }

    pub fn transport(&self) -> &T {
        self.adapter.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.adapter.transport_mut()
    }

    pub fn into_transport(self) -> T {
        self.adapter.into_inner()
    }

    /// Consume frames until teardown or until the transport closes.
    ///
    /// Once terminated, further calls return immediately without reading.
    pub fn run(&mut self) -> SessionReport {
        if self.transcript.state == SessionState::Terminated {
            return self.report(SessionOutcome::Completed);
        }

        info!(
            mac = %self.adapter.local_mac(),
            ac_name = %self.config.ac_name,
            "Waiting for PPPoE discovery"
        );

        loop {
            let frame = match self.adapter.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("Transport reached end of stream");
                    return self.report(SessionOutcome::TransportClosed(
                        "end of stream".to_string(),
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "Transport read failed");
                    return self.report(SessionOutcome::TransportClosed(e.to_string()));
                }
            };
            self.stats.frames_received += 1;

            match self.handle_frame(&frame) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Finished) => return self.report(SessionOutcome::Completed),
                Err(e) => {
                    self.stats.frames_malformed += 1;
                    warn!(error = %e, size = frame.len(), "Dropping malformed frame");
                }
            }
        }
    }

    fn report(&self, outcome: SessionOutcome) -> SessionReport {
        SessionReport {
            credentials: self.transcript.credentials.clone(),
            outcome,
            stats: SessionStats {
                frames_sent: self.adapter.frames_sent(),
                send_failures: self.adapter.send_failures(),
                ..self.stats
            },
        }
    }

    fn ignore(&mut self, reason: &str) -> Result<Flow> {
        self.stats.frames_ignored += 1;
        debug!(reason, "Frame ignored");
        Ok(Flow::Continue)
    }

    fn handle_frame(&mut self, data: &[u8]) -> Result<Flow> {
        let frame = EthernetFrame::from_bytes(data)?;

        if frame.source == self.adapter.local_mac() {
            return self.ignore("own frame");
        }
        if self.config.is_ignored(&frame.source) {
            return self.ignore("ignored station");
        }

        match frame.ethertype {
            EtherType::PPPoEDiscovery => self.handle_discovery(&frame),
            EtherType::PPPoESession => self.handle_session(&frame),
            EtherType::Custom(_) => self.ignore("not PPPoE"),
        }
    }

    fn handle_discovery(&mut self, frame: &EthernetFrame) -> Result<Flow> {
        let packet = PppoePacket::from_bytes(&frame.payload)?;
        let peer = frame.source;

        match packet.code {
            PppoeCode::PADI | PppoeCode::PADR | PppoeCode::PADT => {
                log_inbound(frame, LAYER_DISCOVERY, packet.code.describe());
            }
            PppoeCode::PADO | PppoeCode::PADS | PppoeCode::SessionData | PppoeCode::Unknown(_) => {
                return self.ignore("unexpected discovery code");
            }
        }
        self.transcript.client = Some(peer);

        match packet.code {
            PppoeCode::PADI => {
                let tags = [
                    PppoeTag::host_uniq(random_bytes(HOST_UNIQ_LEN)),
                    PppoeTag::ac_name(&self.config.ac_name),
                    PppoeTag::ac_cookie(random_bytes(AC_COOKIE_LEN)),
                ];
                self.send_discovery(peer, PppoeCode::PADO, 0, OfferTags::encode(&tags));
                self.transcript.state = SessionState::DiscoveryOffered;
            }
            PppoeCode::PADR => {
                let session_id = self.transcript.session_id;
                self.send_discovery(peer, PppoeCode::PADS, session_id, packet.payload);
                self.transcript.state = SessionState::SessionConfirmed;
            }
            PppoeCode::PADT => {
                let session_id = self.transcript.session_id;
                self.send_discovery(peer, PppoeCode::PADT, session_id, packet.payload);
            }
            PppoeCode::PADO | PppoeCode::PADS | PppoeCode::SessionData | PppoeCode::Unknown(_) => {}
        }

        Ok(Flow::Continue)
    }

    fn handle_session(&mut self, frame: &EthernetFrame) -> Result<Flow> {
        let packet = PppoePacket::from_bytes(&frame.payload)?;
        if !packet.is_session() {
            return self.ignore("discovery code on session EtherType");
        }

        // Session-phase replies answer in the session the client spoke in
        let session_id = packet.session_id;
        let ppp = PppFrame::from_bytes(&packet.payload)?;
        match ppp.protocol {
            PppProtocol::Lcp => self.handle_lcp(frame, session_id, &ppp.payload),
            PppProtocol::Pap => self.handle_pap(frame, session_id, &ppp.payload),
            PppProtocol::Ipv6cp => {
                log_inbound(frame, &PppProtocol::Ipv6cp.to_string(), "IPv6CP negotiation");
                self.teardown(frame.source, session_id);
                Ok(Flow::Finished)
            }
            PppProtocol::Ipcp => self.ignore("IPCP"),
            PppProtocol::Chap | PppProtocol::Other(_) => self.ignore("unsupported PPP protocol"),
        }
    }

    fn handle_lcp(
        &mut self,
        frame: &EthernetFrame,
        session_id: u16,
        payload: &[u8],
    ) -> Result<Flow> {
        let lcp = LcpPacket::from_bytes(payload)?;
        let peer = frame.source;
        let layer = PppProtocol::Lcp.to_string();

        self.transcript.client = Some(peer);
        self.transcript.last_identifier = Some(lcp.identifier);

        match lcp.code {
            LcpCode::ConfigureRequest => {
                log_inbound(frame, &layer, lcp.code.describe());
                debug!(
                    mru = ?lcp.options.find(LcpOptionType::Mru).and_then(LcpOption::value_u16),
                    magic = ?lcp
                        .options
                        .find(LcpOptionType::MagicNumber)
                        .and_then(LcpOption::value_u32),
                    "Peer link options"
                );

                let options = lcp.options.configure().to_vec();
                let ack = LcpPacket::configure_ack(lcp.identifier, options);
                self.send_lcp(peer, session_id, &ack);

                let mru = match lcp.options.find(LcpOptionType::Mru) {
                    Some(option) => LcpOption::new(LcpOptionType::Mru, option.data.clone()),
                    None => LcpOption::mru(self.config.default_mru),
                };
                let request = LcpPacket::configure_request(
                    lcp.identifier.wrapping_add(1),
                    vec![
                        mru,
                        LcpOption::auth_protocol(PppProtocol::Pap.to_u16()),
                        LcpOption::magic_number(random_u32().to_be_bytes()),
                    ],
                );
                self.send_lcp(peer, session_id, &request);
                self.transcript.state = SessionState::LcpNegotiating;
            }
            LcpCode::ConfigureAck | LcpCode::ConfigureReject => {
                log_inbound(frame, &layer, lcp.code.describe());
            }
            LcpCode::EchoRequest => {
                log_inbound(frame, &layer, lcp.code.describe());
                let reply = LcpPacket::echo_reply(lcp.identifier, random_u32());
                self.send_lcp(peer, session_id, &reply);
            }
            LcpCode::TerminateRequest => {
                log_inbound(frame, &layer, lcp.code.describe());
                self.send_lcp(peer, session_id, &LcpPacket::terminate_ack(lcp.identifier));
            }
            LcpCode::ConfigureNak
            | LcpCode::TerminateAck
            | LcpCode::CodeReject
            | LcpCode::ProtocolReject
            | LcpCode::EchoReply
            | LcpCode::DiscardRequest
            | LcpCode::Identification
            | LcpCode::TimeRemaining
            | LcpCode::Unknown(_) => {
                debug!(
                    src = %peer,
                    code = lcp.code.describe(),
                    identifier = lcp.identifier,
                    "LCP message not answered"
                );
            }
        }

        Ok(Flow::Continue)
    }

    fn handle_pap(
        &mut self,
        frame: &EthernetFrame,
        session_id: u16,
        payload: &[u8],
    ) -> Result<Flow> {
        let pap = PapPacket::from_bytes(payload)?;
        let peer = frame.source;

        let credentials = match (pap.code, pap.body.credentials()) {
            (PapCode::AuthenticateRequest, Some(credentials)) => credentials,
            _ => return self.ignore("PAP message not answered"),
        };

        log_inbound(frame, &PppProtocol::Pap.to_string(), pap.code.describe());
        self.transcript.client = Some(peer);
        self.transcript.last_identifier = Some(pap.identifier);
        self.transcript.credentials =
            Credentials::new(credentials.peer_id_lossy(), credentials.secret_lossy());
        info!(
            src = %peer,
            peer_id = %self.transcript.credentials.peer_id,
            "PAP credentials captured"
        );

        let ack = PapPacket::authenticate_ack(pap.identifier);
        self.adapter.send_pap(peer, session_id, &ack);
        log_outbound(
            self.adapter.local_mac(),
            peer,
            &PppProtocol::Pap.to_string(),
            ack.code.describe(),
        );
        self.transcript.state = SessionState::Authenticating;

        Ok(Flow::Continue)
    }

    /// LCP Terminate-Request followed by PADT; no frame is read afterwards
    fn teardown(&mut self, peer: MacAddr, client_session_id: u16) {
        let terminate = LcpPacket::terminate_request(TEARDOWN_IDENTIFIER);
        self.send_lcp(peer, client_session_id, &terminate);

        let session_id = self.transcript.session_id;
        self.send_discovery(peer, PppoeCode::PADT, session_id, Vec::new());

        self.transcript.state = SessionState::Terminated;
        info!(
            client = %peer,
            last_identifier = ?self.transcript.last_identifier,
            captured = self.transcript.credentials.is_captured(),
            "Session terminated"
        );
    }

    fn send_discovery(&mut self, dst: MacAddr, code: PppoeCode, session_id: u16, payload: Vec<u8>) {
        self.adapter.send_discovery(dst, code, session_id, payload);
        log_outbound(self.adapter.local_mac(), dst, LAYER_DISCOVERY, code.describe());
    }

    fn send_lcp(&mut self, dst: MacAddr, session_id: u16, packet: &LcpPacket) {
        self.adapter.send_lcp(dst, session_id, packet);
        log_outbound(
            self.adapter.local_mac(),
            dst,
            &PppProtocol::Lcp.to_string(),
            packet.code.describe(),
        );
    }
}

fn log_inbound(frame: &EthernetFrame, layer: &str, message: &str) {
    info!(
        direction = "<-",
        src = %frame.source,
        dst = %frame.destination,
        layer,
        "{}",
        message
    );
}

fn log_outbound(src: MacAddr, dst: MacAddr, layer: &str, message: &str) {
    info!(direction = "->", src = %src, dst = %dst, layer, "{}", message);
}
