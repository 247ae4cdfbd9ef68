//! Traceroute output parsing
//!
//! One [`HopRecord`] per hop-numbered line, in emission order (which equals
//! path order from source to destination). Unresolved probes are `*`
//! markers; a hop with no responses at all gets `address: None`. Both the
//! numeric form (`1  192.168.1.1  0.5 ms ...`) and the resolved form
//! (`1  gw.local (192.168.1.1)  0.5 ms ...`) are recognized.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{HopRecord, ProbeReport};

use super::ParseError;

fn hop_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(\d+)\s+(.+)$").expect("hop regex"))
}

fn paren_addr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]+)\)").expect("paren address regex"))
}

fn rtt_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\d.]+)\s*ms").expect("hop rtt regex"))
}

/// Parse traceroute stdout into hop records.
///
/// Pure and idempotent. Truncated output (probe killed by timeout) yields
/// the hops emitted before the cut; output with a header but no hop lines
/// yet yields an empty list. Only output without even the traceroute header
/// or a single hop line is an error.
pub fn parse(raw: &ProbeReport) -> Result<Vec<HopRecord>, ParseError> {
    let mut hops = Vec::new();

    for caps in hop_re().captures_iter(&raw.stdout) {
        let hop: u32 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        let rest = caps[2].trim();
        hops.push(parse_hop(hop, rest));
    }

    if hops.is_empty() && !raw.stdout.contains("traceroute to") {
        return Err(ParseError::unrecognized("traceroute"));
    }
    Ok(hops)
}

fn parse_hop(hop: u32, rest: &str) -> HopRecord {
    // Address: resolved form carries it in parentheses; numeric form is the
    // first address-looking token. `*` markers, RTT values, the `ms` unit
    // and `!`-annotations are skipped, so a hop whose first probe timed out
    // but a later one answered still resolves.
    let address = match paren_addr_re().captures(rest) {
        Some(c) => Some(c[1].to_string()),
        None => rest
            .split_whitespace()
            .find(|tok| {
                *tok != "*"
                    && *tok != "ms"
                    && !tok.starts_with('!')
                    && tok.parse::<f64>().is_err()
            })
            .map(|tok| tok.to_string()),
    };

    let rtt_ms = rtt_re()
        .captures_iter(rest)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .collect();

    HopRecord { hop, address, rtt_ms }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stdout: &str) -> ProbeReport {
        ProbeReport {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration_ms: 2200,
            timed_out: false,
        }
    }

    const NUMERIC: &str = "\
traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets
 1  192.168.1.1  0.512 ms  0.498 ms  0.476 ms
 2  * * *
 3  10.11.0.1  5.1 ms * 4.9 ms
";

    #[test]
    fn test_numeric_output() {
        let hops = parse(&report(NUMERIC)).unwrap();
        assert_eq!(hops.len(), 3);

        assert_eq!(hops[0].hop, 1);
        assert_eq!(hops[0].address.as_deref(), Some("192.168.1.1"));
        assert_eq!(hops[0].rtt_ms, vec![0.512, 0.498, 0.476]);

        assert_eq!(hops[1].address, None);
        assert!(hops[1].rtt_ms.is_empty());

        assert_eq!(hops[2].address.as_deref(), Some("10.11.0.1"));
        assert_eq!(hops[2].rtt_ms, vec![5.1, 4.9]);
    }

    #[test]
    fn test_resolved_form_uses_ip_in_parens() {
        let hops = parse(&report(
            "traceroute to example.com (93.184.216.34), 30 hops max\n\
             1  gw.local (192.168.1.1)  0.5 ms  0.4 ms  0.3 ms\n",
        ))
        .unwrap();
        assert_eq!(hops[0].address.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn test_address_found_after_leading_timeout_marker() {
        let hops = parse(&report(
            "traceroute to example.com (93.184.216.34), 30 hops max\n\
             1  192.168.1.1  0.5 ms  0.4 ms  0.3 ms\n\
             2  * 10.0.0.1  5.1 ms *\n",
        ))
        .unwrap();
        assert_eq!(hops[1].address.as_deref(), Some("10.0.0.1"));
        assert_eq!(hops[1].rtt_ms, vec![5.1]);
    }

    #[test]
    fn test_all_unresolved_hops() {
        let hops = parse(&report(
            "traceroute to 10.255.255.1 (10.255.255.1), 30 hops max\n\
             1  * * *\n 2  * * *\n 3  * * *\n",
        ))
        .unwrap();
        assert_eq!(hops.len(), 3);
        assert!(hops.iter().all(|h| h.address.is_none()));
        assert!(hops.iter().all(|h| h.rtt_ms.is_empty()));
    }

    #[test]
    fn test_hop_order_matches_emission_order() {
        let hops = parse(&report(NUMERIC)).unwrap();
        let indices: Vec<u32> = hops.iter().map(|h| h.hop).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_header_only_yields_empty_list() {
        let hops = parse(&report(
            "traceroute to example.com (93.184.216.34), 30 hops max, 60 byte packets\n",
        ))
        .unwrap();
        assert!(hops.is_empty());
    }

    #[test]
    fn test_unrecognized_output_is_parse_error() {
        assert!(parse(&report("no such tool\n")).is_err());
        assert!(parse(&report("")).is_err());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let r = report(NUMERIC);
        assert_eq!(parse(&r).unwrap(), parse(&r).unwrap());
    }
}
