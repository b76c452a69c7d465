//! Network interface enumeration and information

use pnet_datalink::{self, NetworkInterface};
use pppoe_sim_core::{Error, MacAddr, Result};
use std::fmt;
use std::net::IpAddr;

/// Information about a network interface
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "eth0", "wlan0")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Hardware address if the interface has one
    pub mac: Option<MacAddr>,
    /// List of IP addresses assigned to this interface
    pub ips: Vec<IpAddr>,
    /// Whether the interface is up
    pub is_up: bool,
    /// Whether the interface is a loopback
    pub is_loopback: bool,
    /// Operating system interface index
    pub index: u32,
}

/// Convert a datalink hardware address
pub fn mac_from_datalink(mac: pnet_datalink::MacAddr) -> MacAddr {
    MacAddr([mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
}

impl From<&NetworkInterface> for InterfaceInfo {
    fn from(iface: &NetworkInterface) -> Self {
        let ips: Vec<IpAddr> = iface.ips.iter().map(|network| network.ip()).collect();

        InterfaceInfo {
            name: iface.name.clone(),
            description: iface.description.clone(),
            mac: iface.mac.map(mac_from_datalink),
            ips,
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
            index: iface.index,
        }
    }
}

impl InterfaceInfo {
    /// Up, not loopback, with a usable hardware address
    pub fn is_capture_capable(&self) -> bool {
        self.is_up && !self.is_loopback && self.mac.is_some_and(|mac| mac != MacAddr::ZERO)
    }

    /// Hardware address, or an error naming the interface
    pub fn hardware_address(&self) -> Result<MacAddr> {
        self.mac.ok_or_else(|| {
            Error::TransportUnavailable(format!(
                "Interface '{}' has no hardware address",
                self.name
            ))
        })
    }
}

impl fmt::Display for InterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mac {
            Some(mac) => write!(f, "{} [{}]", self.name, mac)?,
            None => write!(f, "{} [no hardware address]", self.name)?,
        }
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

/// List all available network interfaces
pub fn list_interfaces() -> Result<Vec<InterfaceInfo>> {
    let interfaces = pnet_datalink::interfaces();

    if interfaces.is_empty() {
        return Err(Error::Capture(
            "No network interfaces found. Are you running with sufficient privileges?".to_string(),
        ));
    }

    Ok(interfaces.iter().map(InterfaceInfo::from).collect())
}

/// Get information about a specific interface by name
pub fn get_interface(name: &str) -> Result<InterfaceInfo> {
    let interfaces = pnet_datalink::interfaces();

    interfaces
        .iter()
        .find(|iface| iface.name == name)
        .map(InterfaceInfo::from)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// List all interfaces a PPPoE client could reach us on
pub fn list_capture_interfaces() -> Result<Vec<InterfaceInfo>> {
    let interfaces = list_interfaces()?;
    Ok(interfaces
        .into_iter()
        .filter(|iface| iface.is_capture_capable())
        .collect())
}
