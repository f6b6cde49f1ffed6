use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

use super::schema::USER_AGENT_MAX_LEN;

/// What the transport layer tells us about the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerMeta {
    pub ip: String,
    pub user_agent: Option<String>,
}

/// Extract caller metadata from request headers. A header User-Agent is cut to the
/// length the body field allows.
pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> CallerMeta {
    let ip = extract_ip(headers, peer_addr, trusted_proxies);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.chars().take(USER_AGENT_MAX_LEN).collect());

    CallerMeta { ip, user_agent }
}

/// Prefer `X-Forwarded-For`, then the peer address, then empty text.
///
/// With no trusted proxies configured the header is honored from any peer. Otherwise it
/// is honored only when the peer is a trusted proxy, and the leftmost entry that is not
/// itself a trusted proxy wins.
pub fn extract_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|xff| {
            xff.split(',')
                .filter_map(|s| s.trim().parse::<IpAddr>().ok())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if trusted_proxies.is_empty() {
        if let Some(ip) = forwarded.first() {
            return ip.to_string();
        }
    } else if peer_addr.is_some_and(|peer| trusted_proxies.iter().any(|net| net.contains(&peer))) {
        if let Some(ip) = forwarded
            .iter()
            .find(|ip| !trusted_proxies.iter().any(|net| net.contains(*ip)))
        {
            return ip.to_string();
        }
    }

    peer_addr.map(|ip| ip.to_string()).unwrap_or_default()
}
