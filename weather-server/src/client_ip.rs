use axum::http::HeaderMap;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Where the client address was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpSource {
    Query,
    ForwardedFor,
    Peer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp {
    pub ip: String,
    pub source: IpSource,
}

/// Pick the address to geolocate for a request.
///
/// An explicit `ip` parameter wins and is not validated. Then the first
/// `X-Forwarded-For` entry, then the transport peer without its port.
/// Never fails: with no peer known the result is empty.
pub fn resolve_client_ip(
    query_ip: Option<&str>,
    headers: &HeaderMap,
    peer: Option<&str>,
) -> ClientIp {
    if let Some(ip) = query_ip.filter(|ip| !ip.is_empty()) {
        return ClientIp { ip: ip.to_string(), source: IpSource::Query };
    }

    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());
    if let Some(value) = forwarded {
        let first = value.split(',').next().unwrap_or_default().trim();
        return ClientIp { ip: first.to_string(), source: IpSource::ForwardedFor };
    }

    let ip = peer.map(strip_port).unwrap_or_default();
    ClientIp { ip: ip.to_string(), source: IpSource::Peer }
}

/// Drop the `:port` suffix from `host:port` or `[v6]:port`.
///
/// Anything that does not look like a host/port pair comes back unchanged.
pub fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return match rest.split_once("]:") {
            Some((host, port)) if !port.contains(':') => host,
            _ => addr,
        };
    }

    match addr.split_once(':') {
        Some((host, port)) if !port.contains(':') && !port.contains(']') => host,
        _ => addr,
    }
}
