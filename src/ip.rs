use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Proxy-aware client address extraction. Never fails.
///
/// The first `X-Forwarded-For` entry wins; otherwise the host part of `peer`
/// (or `peer` verbatim if it is not a socket address). Loopback results are
/// replaced with `loopback_override`, or with `""` when none is configured,
/// which makes the geolocation service report the server's own public address.
pub fn extract_client_ip(
    headers: &HeaderMap,
    peer: &str,
    loopback_override: Option<&str>,
) -> String {
    let ip = forwarded_for(headers).unwrap_or_else(|| peer_host(peer));

    if is_loopback(&ip) {
        return loopback_override.unwrap_or_default().to_string();
    }
    ip
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn peer_host(peer: &str) -> String {
    match peer.parse::<SocketAddr>() {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => peer.to_string(),
    }
}

fn is_loopback(ip: &str) -> bool {
    ip.parse::<IpAddr>()
        .map(|addr| addr.to_canonical().is_loopback())
        .unwrap_or(false)
}
