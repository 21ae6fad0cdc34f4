//! Host candidate derivation for signature verification.
//!
//! A client signs the `host` header as it saw it, but the server may receive
//! a rewritten value: a reverse proxy can add or strip the default port, or
//! replace the host entirely and record the original in `X-Forwarded-Host`.
//! Rather than guess, the verifier tries an ordered, deduplicated set of
//! plausible host values and accepts the first one that reproduces the
//! client's signature.
//!
//! Candidate order:
//!
//! 1. The literal `Host` header (lowercased, trimmed), plus its
//!    default-port variant (`:80`/`:443` appended or stripped per scheme).
//! 2. With fallbacks enabled: the first `X-Forwarded-Host` value and the
//!    server's own name (bare and with its listen port), each with their
//!    default-port variants.
//!
//! Fallbacks are off by default: with them disabled, a request whose `Host`
//! differs from the signed host fails verification regardless of any
//! forwarding headers.

use crate::{AuthConfig, SigningView};

/// Derive the ordered, deduplicated host candidate set for a request.
#[must_use]
pub fn host_candidates(view: &SigningView<'_>, config: &AuthConfig) -> Vec<String> {
    let mut bases = Vec::new();

    if let Some(host) = view
        .headers
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
    {
        let host = host.trim().to_ascii_lowercase();
        if !host.is_empty() {
            bases.push(host);
        }
    }

    if config.allow_host_fallbacks {
        if let Some(forwarded) = view
            .headers
            .get("x-forwarded-host")
            .and_then(|v| v.to_str().ok())
        {
            // Proxies append hop values comma-separated; the first is the client-facing one.
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim().to_ascii_lowercase();
                if !first.is_empty() {
                    bases.push(first);
                }
            }
        }

        let server_name = view.server_name.to_ascii_lowercase();
        if !server_name.is_empty() {
            bases.push(server_name.clone());
            bases.push(format!("{server_name}:{}", view.server_port));
        }
    }

    let default_port: u16 = if view.scheme == "https" { 443 } else { 80 };

    let mut candidates = Vec::new();
    for base in bases {
        push_unique(&mut candidates, base.clone());
        if let Some(variant) = default_port_variant(&base, default_port) {
            push_unique(&mut candidates, variant);
        }
    }

    candidates
}

/// The default-port twin of a host value, if one exists.
///
/// `example.com` pairs with `example.com:80` (http) and vice versa; a host
/// already carrying a non-default port has no twin.
fn default_port_variant(host: &str, default_port: u16) -> Option<String> {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            if port.parse::<u16>().ok()? == default_port {
                Some(name.to_owned())
            } else {
                None
            }
        }
        _ => Some(format!("{host}:{default_port}")),
    }
}

fn push_unique(candidates: &mut Vec<String>, value: String) {
    if !candidates.contains(&value) {
        candidates.push(value);
    }
}
