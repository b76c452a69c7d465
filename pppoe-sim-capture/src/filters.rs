//! BPF (Berkeley Packet Filter) filter builders for PPPoE traffic

use pppoe_sim_core::MacAddr;

/// PPPoE filter (discovery and session)
/// Captures EtherTypes 0x8863 and 0x8864
pub fn pppoe_filter() -> String {
    combine_filters_or(&[&pppoe_discovery_filter(), &pppoe_session_filter()])
}

/// PPPoE discovery filter (PADI, PADO, PADR, PADS, PADT)
pub fn pppoe_discovery_filter() -> String {
    "pppoed".to_string()
}

/// PPPoE session filter
pub fn pppoe_session_filter() -> String {
    "pppoes".to_string()
}

/// Filter for specific source MAC address
pub fn src_mac_filter(mac: &MacAddr) -> String {
    format!("ether src {}", mac)
}

/// PPPoE traffic not sent by the given station
pub fn pppoe_peer_filter(local: &MacAddr) -> String {
    combine_filters(&[&pppoe_filter(), &not_filter(&src_mac_filter(local))])
}

/// Combine multiple filters with AND logic
pub fn combine_filters(filters: &[&str]) -> String {
    if filters.is_empty() {
        return String::new();
    }

    filters
        .iter()
        .map(|f| format!("({})", f))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Combine multiple filters with OR logic
pub fn combine_filters_or(filters: &[&str]) -> String {
    filters.join(" or ")
}

/// Negate a filter
pub fn not_filter(filter: &str) -> String {
    format!("not ({})", filter)
}
