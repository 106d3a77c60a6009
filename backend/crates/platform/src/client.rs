//! Client identification utilities
//!
//! Common functions for identifying clients and the pages they submit from.

use axum::http::{HeaderMap, header};
use std::net::{AddrParseError, IpAddr};
use url::{Host, Url};

/// Extract client IP address
///
/// `X-Forwarded-For` is only honored when the direct peer is one of
/// `trusted_proxies`. The header is then read right to left and the first
/// hop that is not itself a trusted proxy is the client. Any other peer is
/// identified by its own address, whatever it sends.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
/// * `trusted_proxies` - Reverse proxies allowed to report the client address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted_proxies: &[IpAddr],
) -> Option<IpAddr> {
    let peer = direct_ip?;
    if !trusted_proxies.contains(&peer) {
        return Some(peer);
    }

    let hops: Vec<&str> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .collect();

    let mut client = peer;
    for hop in hops.iter().rev() {
        let Ok(ip) = hop.trim().parse::<IpAddr>() else {
            break;
        };
        client = ip;
        if !trusted_proxies.contains(&ip) {
            break;
        }
    }
    Some(client)
}

/// Parse a comma separated list of proxy addresses (`TRUSTED_PROXIES`)
pub fn parse_trusted_proxies(raw: &str) -> Result<Vec<IpAddr>, AddrParseError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}

/// Extract the hostname of the page a request was submitted from
///
/// Reads `Referer`, falling back to `Origin` when the former is absent or
/// empty. Scheme, port, path and IPv6 brackets are stripped. Domain names
/// keep the case they were sent in.
///
/// ## Returns
/// `None` when neither header carries a parsable absolute URL with a host.
pub fn extract_origin_host(headers: &HeaderMap) -> Option<String> {
    let raw = [header::REFERER, header::ORIGIN]
        .into_iter()
        .filter_map(|name| headers.get(name).and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .find(|v| !v.is_empty())?;

    let url = Url::parse(raw).ok()?;
    let host = match url.host()? {
        Host::Domain(domain) => match raw_host(raw) {
            // url lowercases domains
            Some(sent) if sent.eq_ignore_ascii_case(domain) => sent.to_string(),
            _ => domain.to_string(),
        },
        Host::Ipv4(ip) => ip.to_string(),
        Host::Ipv6(ip) => ip.to_string(),
    };

    if host.is_empty() { None } else { Some(host) }
}

/// Host part of an absolute URL exactly as written
fn raw_host(raw: &str) -> Option<&str> {
    let (_, rest) = raw.split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    if let Some(bracketed) = host_port.strip_prefix('[') {
        return bracketed.split_once(']').map(|(host, _)| host);
    }
    Some(host_port.split_once(':').map_or(host_port, |(host, _)| host))
}
