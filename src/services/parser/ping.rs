//! Ping output parsing
//!
//! Recognized pattern set (documented, platform-phrasing independent):
//! - iputils: `4 packets transmitted, 4 received, 0% packet loss, time 3003ms`
//! - BSD/macOS: `4 packets transmitted, 4 packets received, 0.0% packet loss`
//! - iputils RTT: `rtt min/avg/max/mdev = 10.0/12.5/15.0/1.8 ms`
//! - BSD RTT: `round-trip min/avg/max/stddev = 10.0/12.5/15.0/2.0 ms`

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::ProbeReport;

use super::ParseError;

/// Parsed ping summary statistics
#[derive(Clone, Debug, PartialEq)]
pub struct PingStats {
    pub packets_sent: u32,
    pub packets_received: u32,
    pub packet_loss_pct: f64,
    pub min_rtt_ms: Option<f64>,
    pub avg_rtt_ms: Option<f64>,
    pub max_rtt_ms: Option<f64>,
}

fn counts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(\d+) packets transmitted, (\d+)(?: packets)? received")
            .expect("counts regex")
    })
}

fn loss_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([\d.]+)% packet loss").expect("loss regex"))
}

fn rtt_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:rtt|round-trip) min/avg/max(?:/(?:mdev|stddev))? = ([\d.]+)/([\d.]+)/([\d.]+)",
        )
        .expect("rtt regex")
    })
}

/// Parse ping stdout into summary statistics.
///
/// Pure and idempotent. A missing RTT summary (probe killed mid-write, no
/// replies at all) degrades to `None` fields; only output with no
/// transmitted/received line at all is an error.
pub fn parse(raw: &ProbeReport) -> Result<PingStats, ParseError> {
    let counts = counts_re()
        .captures(&raw.stdout)
        .ok_or_else(|| ParseError::unrecognized("ping"))?;

    // Capture groups are all-digit by construction
    let packets_sent: u32 = counts[1].parse().unwrap_or(0);
    let packets_received: u32 = counts[2].parse().unwrap_or(0);

    let packet_loss_pct = loss_re()
        .captures(&raw.stdout)
        .and_then(|c| c[1].parse::<f64>().ok())
        .unwrap_or_else(|| {
            if packets_sent == 0 {
                100.0
            } else {
                // Duplicate echo replies can push received above sent
                packets_sent.saturating_sub(packets_received) as f64 / packets_sent as f64
                    * 100.0
            }
        });

    let (min_rtt_ms, avg_rtt_ms, max_rtt_ms) = match rtt_re().captures(&raw.stdout) {
        Some(c) => (
            c[1].parse::<f64>().ok(),
            c[2].parse::<f64>().ok(),
            c[3].parse::<f64>().ok(),
        ),
        None => (None, None, None),
    };

    Ok(PingStats {
        packets_sent,
        packets_received,
        packet_loss_pct,
        min_rtt_ms,
        avg_rtt_ms,
        max_rtt_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(stdout: &str) -> ProbeReport {
        ProbeReport {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration_ms: 3100,
            timed_out: false,
        }
    }

    const IPUTILS_OK: &str = "\
PING example.com (93.184.216.34) 56(84) bytes of data.
64 bytes from 93.184.216.34: icmp_seq=1 ttl=56 time=12.4 ms
64 bytes from 93.184.216.34: icmp_seq=2 ttl=56 time=10.0 ms
64 bytes from 93.184.216.34: icmp_seq=3 ttl=56 time=15.0 ms
64 bytes from 93.184.216.34: icmp_seq=4 ttl=56 time=12.6 ms

--- example.com ping statistics ---
4 packets transmitted, 4 received, 0% packet loss, time 3004ms
rtt min/avg/max/mdev = 10.0/12.5/15.0/1.8 ms
";

    #[test]
    fn test_iputils_summary() {
        let stats = parse(&report(IPUTILS_OK)).unwrap();
        assert_eq!(stats.packets_sent, 4);
        assert_eq!(stats.packets_received, 4);
        assert_eq!(stats.packet_loss_pct, 0.0);
        assert_eq!(stats.min_rtt_ms, Some(10.0));
        assert_eq!(stats.avg_rtt_ms, Some(12.5));
        assert_eq!(stats.max_rtt_ms, Some(15.0));
    }

    #[test]
    fn test_bsd_phrasing() {
        let stats = parse(&report(
            "--- example.com ping statistics ---\n\
             4 packets transmitted, 3 packets received, 25.0% packet loss\n\
             round-trip min/avg/max/stddev = 9.871/11.204/13.009/1.233 ms\n",
        ))
        .unwrap();
        assert_eq!(stats.packets_sent, 4);
        assert_eq!(stats.packets_received, 3);
        assert_eq!(stats.packet_loss_pct, 25.0);
        assert_eq!(stats.min_rtt_ms, Some(9.871));
    }

    #[test]
    fn test_total_loss_has_no_rtt_summary() {
        let stats = parse(&report(
            "PING 10.255.255.1 (10.255.255.1) 56(84) bytes of data.\n\n\
             --- 10.255.255.1 ping statistics ---\n\
             4 packets transmitted, 0 received, 100% packet loss, time 3065ms\n",
        ))
        .unwrap();
        assert_eq!(stats.packets_received, 0);
        assert_eq!(stats.packet_loss_pct, 100.0);
        assert_eq!(stats.min_rtt_ms, None);
        assert_eq!(stats.avg_rtt_ms, None);
        assert_eq!(stats.max_rtt_ms, None);
    }

    #[test]
    fn test_loss_computed_when_loss_line_missing() {
        // Truncated just after the counts line
        let stats =
            parse(&report("3 packets transmitted, 1 received")).unwrap();
        assert_eq!(stats.packets_sent, 3);
        assert_eq!(stats.packets_received, 1);
        assert!((stats.packet_loss_pct - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_duplicate_replies_do_not_underflow_loss() {
        // iputils counts duplicate echo replies toward "received"; truncated
        // output (loss line cut off by a timeout kill) takes the computed
        // fallback
        let stats = parse(&report("4 packets transmitted, 5 received")).unwrap();
        assert_eq!(stats.packets_sent, 4);
        assert_eq!(stats.packets_received, 5);
        assert_eq!(stats.packet_loss_pct, 0.0);
    }

    #[test]
    fn test_unrecognized_output_is_parse_error() {
        assert!(parse(&report("ping: unreachable.invalid: Name or service not known\n")).is_err());
        assert!(parse(&report("")).is_err());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let r = report(IPUTILS_OK);
        assert_eq!(parse(&r).unwrap(), parse(&r).unwrap());
    }
}
