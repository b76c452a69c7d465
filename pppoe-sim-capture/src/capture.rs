//! pcap-backed frame transport

use pcap::{Active, Capture, Device};
use pppoe_sim_core::{Error, FrameTransport, MacAddr, Result};
use tracing::{debug, info, trace};

use crate::filters;
use crate::interface::get_interface;
use crate::stats::{CaptureStats, StatsAccumulator};

/// Default snapshot length (maximum bytes per packet)
const DEFAULT_SNAPLEN: i32 = 65535;

/// Default timeout for packet capture (milliseconds)
const DEFAULT_TIMEOUT_MS: i32 = 1000;

/// Configuration for packet capture
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum bytes to capture per packet
    pub snaplen: i32,
    /// Internal read timeout in milliseconds; expiry is retried
    pub timeout_ms: i32,
    /// Enable promiscuous mode
    pub promiscuous: bool,
    /// Enable immediate mode (deliver packets immediately)
    pub immediate_mode: bool,
    /// Buffer size (0 = default)
    pub buffer_size: i32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: DEFAULT_SNAPLEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            promiscuous: false,
            immediate_mode: true,
            buffer_size: 0,
        }
    }
}

/// Raw Ethernet transport bound to one interface
pub struct PcapTransport {
    interface: String,
    local_mac: MacAddr,
    capture: Capture<Active>,
    stats: StatsAccumulator,
}

impl PcapTransport {
    /// Open a transport on `interface`, resolving its hardware address
    pub fn open(interface: &str, config: &CaptureConfig) -> Result<Self> {
        let local_mac = get_interface(interface)?.hardware_address()?;
        Self::open_with_mac(interface, local_mac, config)
    }

    /// Open a transport with an explicitly supplied local address
    pub fn open_with_mac(
        interface: &str,
        local_mac: MacAddr,
        config: &CaptureConfig,
    ) -> Result<Self> {
        debug!("Initializing pcap capture on {}", interface);

        let device = Device::from(interface);
        let mut capture = Capture::from_device(device)
            .map_err(|e| unavailable(interface, e))?
            .promisc(config.promiscuous)
            .snaplen(config.snaplen)
            .timeout(config.timeout_ms)
            .immediate_mode(config.immediate_mode);

        if config.buffer_size > 0 {
            capture = capture.buffer_size(config.buffer_size);
        }

        let mut capture = capture.open().map_err(|e| unavailable(interface, e))?;

        let filter = filters::pppoe_peer_filter(&local_mac);
        capture
            .filter(&filter, true)
            .map_err(|e| Error::Capture(format!("Failed to apply filter: {}", e)))?;
        debug!("Applied filter: {}", filter);

        info!(interface, mac = %local_mac, "Capture initialized");

        Ok(Self {
            interface: interface.to_string(),
            local_mac,
            capture,
            stats: StatsAccumulator::new(),
        })
    }

    /// Interface this transport is bound to
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Counters merged with the kernel drop statistics
    pub fn stats(&mut self) -> Result<CaptureStats> {
        let pcap_stats = self
            .capture
            .stats()
            .map_err(|e| Error::Capture(format!("Failed to get stats: {}", e)))?;
        Ok(self.stats.snapshot().with_pcap_stats(pcap_stats))
    }
}

fn unavailable(interface: &str, err: pcap::Error) -> Error {
    Error::TransportUnavailable(format!("{}: {}", interface, err))
}

impl FrameTransport for PcapTransport {
    fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            match self.capture.next_packet() {
                Ok(packet) => {
                    let data = packet.data.to_vec();
                    self.stats.record_read(data.len());
                    return Ok(Some(data));
                }
                Err(pcap::Error::TimeoutExpired) => {
                    trace!("Capture timeout on {}", self.interface);
                    continue;
                }
                Err(pcap::Error::NoMorePackets) => return Ok(None),
                Err(e) => return Err(Error::TransportClosed(e.to_string())),
            }
        }
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        match self.capture.sendpacket(frame) {
            Ok(()) => {
                self.stats.record_write(frame.len());
                Ok(())
            }
            Err(e) => {
                self.stats.record_write_error();
                Err(Error::Capture(format!("Failed to send frame: {}", e)))
            }
        }
    }

    fn local_mac(&self) -> MacAddr {
        self.local_mac
    }
}
