//! Session engine scenarios against an in-memory transport

use super::*;
use pppoe_sim_core::{Error, FrameTransport, MacAddr, Result};
use pppoe_sim_packet::{
    EchoOption, EtherType, EthernetFrame, LcpCode, LcpOption, LcpOptionType, LcpOptions, LcpPacket,
    OfferTags, PapCode, PapCredentials, PapPacket, PppFrame, PppProtocol, PppoeCode, PppoePacket,
    PppoeTag, PppoeTagType,
};
use crate::config::MAX_AC_NAME_LEN;
use std::collections::VecDeque;

const LOCAL: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
const CLIENT: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x02]);

// ===== In-memory transport =====

#[derive(Default)]
struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    outbound: Vec<Vec<u8>>,
    read_error: Option<String>,
    fail_writes: bool,
}

impl MemoryTransport {
    fn with_frames(frames: Vec<Vec<u8>>) -> Self {
        Self {
            inbound: frames.into(),
            ..Self::default()
        }
    }
}

impl FrameTransport for MemoryTransport {
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        match self.inbound.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None => match self.read_error.take() {
                Some(reason) => Err(Error::TransportClosed(reason)),
                None => Ok(None),
            },
        }
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Capture("injection refused".to_string()));
        }
        self.outbound.push(frame.to_vec());
        Ok(())
    }

    fn local_mac(&self) -> MacAddr {
        LOCAL
    }
}

// ===== Frame helpers =====

fn discovery_from(src: MacAddr, code: PppoeCode, session_id: u16, payload: Vec<u8>) -> Vec<u8> {
    let pppoe = PppoePacket::new(code, session_id, payload);
    EthernetFrame::new(MacAddr::BROADCAST, src, EtherType::PPPoEDiscovery, pppoe.to_bytes())
        .to_bytes()
}

fn discovery(code: PppoeCode, session_id: u16, payload: Vec<u8>) -> Vec<u8> {
    discovery_from(CLIENT, code, session_id, payload)
}

fn padi() -> Vec<u8> {
    discovery(
        PppoeCode::PADI,
        0,
        PppoeTag::encode_all(&[PppoeTag::service_name(""), PppoeTag::host_uniq(vec![0x42; 4])]),
    )
}

fn session(protocol: PppProtocol, payload: Vec<u8>) -> Vec<u8> {
    session_in(1, protocol, payload)
}

fn session_in(session_id: u16, protocol: PppProtocol, payload: Vec<u8>) -> Vec<u8> {
    let ppp = PppFrame::new(protocol, payload);
    let pppoe = PppoePacket::new(PppoeCode::SessionData, session_id, ppp.to_bytes());
    EthernetFrame::new(LOCAL, CLIENT, EtherType::PPPoESession, pppoe.to_bytes()).to_bytes()
}

fn lcp(packet: &LcpPacket) -> Vec<u8> {
    session(PppProtocol::Lcp, packet.to_bytes())
}

fn pap_request(identifier: u8, peer_id: &str, secret: &str) -> Vec<u8> {
    let packet = PapPacket::authenticate_request(
        identifier,
        PapCredentials::new(peer_id.as_bytes(), secret.as_bytes()),
    );
    session(PppProtocol::Pap, packet.to_bytes())
}

fn ipv6cp() -> Vec<u8> {
    session(PppProtocol::Ipv6cp, vec![0x01, 0x01, 0x00, 0x04])
}

fn ipcp() -> Vec<u8> {
    session(PppProtocol::Ipcp, vec![0x01, 0x01, 0x00, 0x04])
}

/// Decode an outbound frame down to its PPPoE packet, checking addressing
fn outbound_pppoe(bytes: &[u8]) -> (EtherType, PppoePacket) {
    let frame = EthernetFrame::from_bytes(bytes).unwrap();
    assert_eq!(frame.source, LOCAL);
    assert_eq!(frame.destination, CLIENT);
    (frame.ethertype, PppoePacket::from_bytes(&frame.payload).unwrap())
}

fn outbound_ppp(bytes: &[u8]) -> PppFrame {
    let (ethertype, pppoe) = outbound_pppoe(bytes);
    assert_eq!(ethertype, EtherType::PPPoESession);
    assert_eq!(pppoe.code, PppoeCode::SessionData);
    PppFrame::from_bytes(&pppoe.payload).unwrap()
}

fn outbound_lcp(bytes: &[u8]) -> LcpPacket {
    let ppp = outbound_ppp(bytes);
    assert_eq!(ppp.protocol, PppProtocol::Lcp);
    LcpPacket::from_bytes(&ppp.payload).unwrap()
}

fn engine(frames: Vec<Vec<u8>>) -> SessionEngine<MemoryTransport> {
    SessionEngine::new(MemoryTransport::with_frames(frames), SimulatorConfig::default())
}

// ===== Discovery =====

#[test]
fn test_padi_answered_with_offer() {
    let mut engine = engine(vec![padi()]);
    let report = engine.run();

    assert_eq!(
        report.outcome,
        SessionOutcome::TransportClosed("end of stream".to_string())
    );
    assert_eq!(engine.state(), SessionState::DiscoveryOffered);
    assert_eq!(engine.client(), Some(CLIENT));

    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 1);

    let (ethertype, pado) = outbound_pppoe(&outbound[0]);
    assert_eq!(ethertype, EtherType::PPPoEDiscovery);
    assert_eq!(pado.code, PppoeCode::PADO);
    assert_eq!(pado.session_id, 0);

    let tags = OfferTags::decode(&pado.payload).unwrap();
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0].tag_type, PppoeTagType::HostUniq);
    assert_eq!(tags[0].value.len(), 8);
    assert_eq!(tags[1].tag_type, PppoeTagType::ACName);
    assert_eq!(tags[1].value, b"Simulator");
    assert_eq!(tags[2].tag_type, PppoeTagType::ACCookie);
    assert_eq!(tags[2].value.len(), 16);
}

#[test]
fn test_configured_ac_name() {
    let config = SimulatorConfig::default().with_ac_name("BRAS-01");
    let mut engine = SessionEngine::new(MemoryTransport::with_frames(vec![padi()]), config);
    engine.run();

    let (_, pado) = outbound_pppoe(&engine.transport().outbound[0]);
    let tags = OfferTags::decode(&pado.payload).unwrap();
    assert_eq!(
        PppoeTag::find(&tags, PppoeTagType::ACName).map(|t| t.value.clone()),
        Some(b"BRAS-01".to_vec())
    );
}

#[test]
fn test_longest_ac_name_offer_fits_one_frame() {
    let config = SimulatorConfig::default().with_ac_name("n".repeat(MAX_AC_NAME_LEN));
    config.validate().unwrap();
    let mut engine = SessionEngine::new(MemoryTransport::with_frames(vec![padi()]), config);
    engine.run();

    let offer = &engine.transport().outbound[0];
    assert_eq!(offer.len(), EthernetFrame::MAX_FRAME_SIZE);
    let (_, pado) = outbound_pppoe(offer);
    let tags = OfferTags::decode(&pado.payload).unwrap();
    let name = PppoeTag::find(&tags, PppoeTagType::ACName).unwrap();
    assert_eq!(name.value.len(), MAX_AC_NAME_LEN);
}

#[test]
fn test_padr_answered_with_confirmation() {
    let request_tags = PppoeTag::encode_all(&[
        PppoeTag::service_name("internet"),
        PppoeTag::host_uniq(vec![0xDE, 0xAD, 0xBE, 0xEF]),
        PppoeTag::ac_cookie(vec![0x5A; 16]),
    ]);
    let mut engine = engine(vec![discovery(PppoeCode::PADR, 0, request_tags.clone())]);
    engine.run();

    assert_eq!(engine.state(), SessionState::SessionConfirmed);
    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 1);

    let (ethertype, pads) = outbound_pppoe(&outbound[0]);
    assert_eq!(ethertype, EtherType::PPPoEDiscovery);
    assert_eq!(pads.code, PppoeCode::PADS);
    assert_eq!(pads.session_id, 1);
    assert_eq!(pads.payload, request_tags);
}

#[test]
fn test_configured_session_id() {
    let config = SimulatorConfig::default().with_session_id(0x0BEE);
    let frames = vec![
        discovery(PppoeCode::PADR, 0, vec![]),
        session_in(0x0BEE, PppProtocol::Ipv6cp, vec![0x01, 0x01, 0x00, 0x04]),
    ];
    let mut engine = SessionEngine::new(MemoryTransport::with_frames(frames), config);
    engine.run();

    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 3);
    for frame in outbound {
        let (_, packet) = outbound_pppoe(frame);
        assert_eq!(packet.session_id, 0x0BEE);
    }
}

#[test]
fn test_padt_echoed_and_session_continues() {
    let mut engine = engine(vec![
        discovery(PppoeCode::PADT, 1, vec![0x01, 0x01, 0x00, 0x00]),
        padi(),
    ]);
    engine.run();

    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 2);

    let (_, padt) = outbound_pppoe(&outbound[0]);
    assert_eq!(padt.code, PppoeCode::PADT);
    assert_eq!(padt.payload, vec![0x01, 0x01, 0x00, 0x00]);

    let (_, pado) = outbound_pppoe(&outbound[1]);
    assert_eq!(pado.code, PppoeCode::PADO);
}

#[test]
fn test_padt_answered_in_assigned_session() {
    let mut engine = engine(vec![discovery(PppoeCode::PADT, 0x0042, vec![])]);
    engine.run();

    let (_, padt) = outbound_pppoe(&engine.transport().outbound[0]);
    assert_eq!(padt.code, PppoeCode::PADT);
    assert_eq!(padt.session_id, 1);
}

#[test]
fn test_session_replies_use_client_session_id() {
    let request = LcpPacket::configure_request(3, vec![LcpOption::mru(1480)]);
    let echo = LcpPacket::new(LcpCode::EchoRequest, 4, LcpOptions::None);
    let credentials = PapPacket::authenticate_request(
        5,
        PapCredentials::new(b"dave".to_vec(), b"pw".to_vec()),
    );
    let mut engine = engine(vec![
        session_in(0x0042, PppProtocol::Lcp, request.to_bytes()),
        session_in(0x0042, PppProtocol::Lcp, echo.to_bytes()),
        session_in(0x0042, PppProtocol::Lcp, LcpPacket::terminate_request(6).to_bytes()),
        session_in(0x0042, PppProtocol::Pap, credentials.to_bytes()),
        session_in(0x0042, PppProtocol::Ipv6cp, vec![0x01, 0x01, 0x00, 0x04]),
    ]);
    let report = engine.run();
    assert_eq!(report.outcome, SessionOutcome::Completed);

    let outbound = &engine.transport().outbound;
    // Ack, own request, echo reply, terminate ack, PAP ack, terminate request, PADT
    assert_eq!(outbound.len(), 7);
    for frame in &outbound[..6] {
        let (ethertype, packet) = outbound_pppoe(frame);
        assert_eq!(ethertype, EtherType::PPPoESession);
        assert_eq!(packet.session_id, 0x0042);
    }

    let (ethertype, padt) = outbound_pppoe(&outbound[6]);
    assert_eq!(ethertype, EtherType::PPPoEDiscovery);
    assert_eq!(padt.code, PppoeCode::PADT);
    assert_eq!(padt.session_id, 1);
}

// ===== LCP =====

#[test]
fn test_configure_request_acked_and_countered() {
    let peer_options = vec![LcpOption::magic_number([0x11, 0x22, 0x33, 0x44])];
    let request = LcpPacket::configure_request(7, peer_options.clone());
    let mut engine = engine(vec![lcp(&request)]);
    engine.run();

    assert_eq!(engine.state(), SessionState::LcpNegotiating);
    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 2);

    let ack = outbound_lcp(&outbound[0]);
    assert_eq!(ack.code, LcpCode::ConfigureAck);
    assert_eq!(ack.identifier, 7);
    assert_eq!(ack.options, LcpOptions::Configure(peer_options));

    let ours = outbound_lcp(&outbound[1]);
    assert_eq!(ours.code, LcpCode::ConfigureRequest);
    assert_eq!(ours.identifier, 8);
    assert_eq!(ours.length, 4 + 4 + 4 + 6);

    let mru = ours.options.find(LcpOptionType::Mru).unwrap();
    assert_eq!(mru.length, 4);
    assert_eq!(mru.value_u16(), Some(1492));

    let auth = ours.options.find(LcpOptionType::AuthenticationProtocol).unwrap();
    assert_eq!(auth.length, 4);
    assert_eq!(auth.value_u16(), Some(0xC023));

    let magic = ours.options.find(LcpOptionType::MagicNumber).unwrap();
    assert_eq!(magic.length, 6);
    assert_eq!(magic.data.len(), 4);
}

#[test]
fn test_peer_mru_is_echoed_in_own_request() {
    let request = LcpPacket::configure_request(
        0xFF,
        vec![LcpOption::mru(1480), LcpOption::magic_number([1, 2, 3, 4])],
    );
    let mut engine = engine(vec![lcp(&request)]);
    engine.run();

    let ours = outbound_lcp(&engine.transport().outbound[1]);
    assert_eq!(ours.identifier, 0x00);
    assert_eq!(
        ours.options.find(LcpOptionType::Mru).and_then(LcpOption::value_u16),
        Some(1480)
    );
}

#[test]
fn test_configured_default_mru() {
    let config = SimulatorConfig::default().with_default_mru(1400);
    let request = LcpPacket::configure_request(1, vec![]);
    let mut engine = SessionEngine::new(MemoryTransport::with_frames(vec![lcp(&request)]), config);
    engine.run();

    let ours = outbound_lcp(&engine.transport().outbound[1]);
    assert_eq!(
        ours.options.find(LcpOptionType::Mru).and_then(LcpOption::value_u16),
        Some(1400)
    );
}

#[test]
fn test_echo_request_answered() {
    let request = LcpPacket::new(LcpCode::EchoRequest, 4, LcpOptions::None);
    let mut engine = engine(vec![lcp(&request)]);
    engine.run();

    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 1);

    let reply = outbound_lcp(&outbound[0]);
    assert_eq!(reply.code, LcpCode::EchoReply);
    assert_eq!(reply.identifier, 4);
    assert_eq!(reply.length, 8);
    match reply.options {
        LcpOptions::Echo(EchoOption { data, .. }) => assert!(data.is_empty()),
        other => panic!("Expected echo option, got {:?}", other),
    }
}

#[test]
fn test_terminate_request_acked() {
    let mut engine = engine(vec![lcp(&LcpPacket::terminate_request(9))]);
    engine.run();

    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 1);

    let ack = outbound_lcp(&outbound[0]);
    assert_eq!(ack, LcpPacket::terminate_ack(9));
}

#[test]
fn test_unanswered_lcp_codes() {
    let mut engine = engine(vec![
        lcp(&LcpPacket::configure_ack(1, vec![])),
        lcp(&LcpPacket::new(LcpCode::ConfigureNak, 2, LcpOptions::Configure(vec![]))),
        lcp(&LcpPacket::echo_reply(3, 0x01020304)),
    ]);
    let report = engine.run();

    assert!(engine.transport().outbound.is_empty());
    assert_eq!(report.stats.frames_received, 3);
    assert_eq!(report.stats.frames_malformed, 0);
}

// ===== PAP and teardown =====

#[test]
fn test_pap_credentials_captured() {
    let mut engine = engine(vec![pap_request(3, "alice", "s3cr3t"), ipv6cp()]);
    let report = engine.run();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.credentials, Credentials::new("alice", "s3cr3t"));
    assert!(report.credentials.is_captured());

    let outbound = &engine.transport().outbound;
    let ppp = outbound_ppp(&outbound[0]);
    assert_eq!(ppp.protocol, PppProtocol::Pap);
    assert_eq!(ppp.payload, vec![0x02, 0x03, 0x00, 0x05, 0x00]);

    let ack = PapPacket::from_bytes(&ppp.payload).unwrap();
    assert_eq!(ack.code, PapCode::AuthenticateAck);
    assert_eq!(ack.identifier, 3);
}

#[test]
fn test_full_session() {
    let frames = vec![
        padi(),
        discovery(PppoeCode::PADR, 0, PppoeTag::service_name("").to_bytes()),
        lcp(&LcpPacket::configure_request(
            1,
            vec![LcpOption::mru(1492), LcpOption::magic_number([9, 9, 9, 9])],
        )),
        lcp(&LcpPacket::configure_ack(2, vec![LcpOption::mru(1492)])),
        pap_request(1, "bob@isp", "hunter2"),
        ipcp(),
        ipv6cp(),
    ];
    let mut engine = engine(frames);
    let report = engine.run();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.credentials, Credentials::new("bob@isp", "hunter2"));
    assert_eq!(engine.state(), SessionState::Terminated);

    // PADO, PADS, Configure-Ack, Configure-Request, Authenticate-Ack, Terminate-Request, PADT
    assert_eq!(report.stats.frames_received, 7);
    assert_eq!(report.stats.frames_sent, 7);
    assert_eq!(report.stats.frames_ignored, 1);
    assert_eq!(engine.transport().outbound.len(), 7);
}

#[test]
fn test_termination_is_final() {
    let mut engine = engine(vec![ipv6cp(), padi(), padi()]);
    let report = engine.run();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert!(!report.credentials.is_captured());

    let outbound = &engine.transport().outbound;
    assert_eq!(outbound.len(), 2);

    let terminate = outbound_lcp(&outbound[0]);
    assert_eq!(terminate, LcpPacket::terminate_request(1));

    let (ethertype, padt) = outbound_pppoe(&outbound[1]);
    assert_eq!(ethertype, EtherType::PPPoEDiscovery);
    assert_eq!(padt.code, PppoeCode::PADT);
    assert_eq!(padt.session_id, 1);
    assert!(padt.payload.is_empty());

    assert_eq!(engine.transport().inbound.len(), 2);

    let again = engine.run();
    assert_eq!(again.outcome, SessionOutcome::Completed);
    assert_eq!(engine.transport().inbound.len(), 2);
    assert_eq!(engine.transport().outbound.len(), 2);
}

// ===== Robustness =====

#[test]
fn test_own_frames_ignored() {
    let own = discovery_from(LOCAL, PppoeCode::PADI, 0, vec![]);
    let mut engine = engine(vec![own]);
    let report = engine.run();

    assert!(engine.transport().outbound.is_empty());
    assert_eq!(engine.state(), SessionState::AwaitingDiscovery);
    assert_eq!(engine.client(), None);
    assert_eq!(report.stats.frames_ignored, 1);
}

#[test]
fn test_ignored_station() {
    let noisy = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x99]);
    let config = SimulatorConfig::default().with_ignored_source(noisy);
    let frames = vec![discovery_from(noisy, PppoeCode::PADI, 0, vec![]), padi()];
    let mut engine = SessionEngine::new(MemoryTransport::with_frames(frames), config);
    let report = engine.run();

    assert_eq!(engine.transport().outbound.len(), 1);
    assert_eq!(engine.client(), Some(CLIENT));
    assert_eq!(report.stats.frames_ignored, 1);
}

#[test]
fn test_non_pppoe_frames_ignored() {
    let arp = EthernetFrame::new(MacAddr::BROADCAST, CLIENT, EtherType::Custom(0x0806), vec![0; 28])
        .to_bytes();
    let mut engine = engine(vec![arp, ipcp()]);
    let report = engine.run();

    assert!(engine.transport().outbound.is_empty());
    assert_eq!(report.stats.frames_ignored, 2);
}

#[test]
fn test_malformed_frame_dropped() {
    // Configure-Request whose declared length runs past the frame
    let truncated = session(PppProtocol::Lcp, vec![0x01, 0x01, 0x00, 0x40, 0x05, 0x06]);
    let runt = vec![0xFF; 10];
    let mut engine = engine(vec![truncated, runt, padi()]);
    let report = engine.run();

    assert_eq!(report.stats.frames_malformed, 2);
    assert_eq!(engine.transport().outbound.len(), 1);
    assert_eq!(engine.state(), SessionState::DiscoveryOffered);
}

#[test]
fn test_end_of_stream_keeps_partial_credentials() {
    let mut engine = engine(vec![pap_request(1, "carol", "")]);
    let report = engine.run();

    assert_eq!(
        report.outcome,
        SessionOutcome::TransportClosed("end of stream".to_string())
    );
    assert_eq!(report.credentials, Credentials::new("carol", ""));
    assert_eq!(engine.credentials(), &report.credentials);
    assert_eq!(engine.state(), SessionState::Authenticating);
}

#[test]
fn test_read_failure_closes_session() {
    let transport = MemoryTransport {
        inbound: vec![padi()].into(),
        read_error: Some("device went away".to_string()),
        ..MemoryTransport::default()
    };
    let mut engine = SessionEngine::new(transport, SimulatorConfig::default());
    let report = engine.run();

    match report.outcome {
        SessionOutcome::TransportClosed(reason) => assert!(reason.contains("device went away")),
        other => panic!("Expected TransportClosed, got {:?}", other),
    }
    assert_eq!(report.stats.frames_received, 1);
}

#[test]
fn test_resume_after_transport_closed() {
    let mut engine = engine(vec![padi()]);
    engine.run();

    engine
        .transport_mut()
        .inbound
        .extend([pap_request(2, "dave", "pw"), ipv6cp()]);
    let report = engine.run();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.credentials, Credentials::new("dave", "pw"));
    assert_eq!(engine.into_transport().outbound.len(), 4);
}

#[test]
fn test_write_failures_are_not_fatal() {
    let transport = MemoryTransport {
        inbound: vec![padi(), discovery(PppoeCode::PADR, 0, vec![])].into(),
        fail_writes: true,
        ..MemoryTransport::default()
    };
    let mut engine = SessionEngine::new(transport, SimulatorConfig::default());
    let report = engine.run();

    assert_eq!(engine.state(), SessionState::SessionConfirmed);
    assert_eq!(report.stats.frames_sent, 0);
    assert_eq!(report.stats.send_failures, 2);
}

#[test]
fn test_report_fields() {
    let mut engine = engine(vec![pap_request(5, "erin", "letmein"), ipv6cp()]);
    let report = engine.run();

    assert_eq!(report.outcome, SessionOutcome::Completed);
    assert_eq!(report.credentials.peer_id, "erin");
    assert_eq!(report.credentials.secret, "letmein");
    assert_eq!(report.stats.frames_sent, 3);
}
