//! Service-name database keyed by protocol
//!
//! Reads the system services file once; a small built-in table covers
//! hosts where that file is missing.

use std::fs;

use once_cell::sync::Lazy;

const SERVICES_PATH: &str = "/etc/services";

const BUILTIN: &[(&str, u16, &str)] = &[
    ("ftp", 21, "tcp"),
    ("ssh", 22, "tcp"),
    ("telnet", 23, "tcp"),
    ("smtp", 25, "tcp"),
    ("domain", 53, "tcp"),
    ("domain", 53, "udp"),
    ("http", 80, "tcp"),
    ("ntp", 123, "udp"),
    ("https", 443, "tcp"),
    ("rtsp", 554, "tcp"),
    ("rtsp", 554, "udp"),
    ("sip", 5060, "tcp"),
    ("sip", 5060, "udp"),
];

#[derive(Debug)]
struct ServiceEntry {
    names: Vec<String>,
    port: u16,
    protocol: String,
}

static TABLE: Lazy<Vec<ServiceEntry>> = Lazy::new(|| match fs::read_to_string(SERVICES_PATH) {
    Ok(contents) => parse_services(&contents),
    Err(e) => {
        sock_debug!("services database {SERVICES_PATH} unavailable: {e}");
        Vec::new()
    }
});

fn parse_services(contents: &str) -> Vec<ServiceEntry> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.split('#').next().unwrap_or_default();
            let mut fields = line.split_whitespace();
            let name = fields.next()?;
            let (port, protocol) = fields.next()?.split_once('/')?;
            let port = port.parse::<u16>().ok()?;
            let mut names = vec![name.to_string()];
            names.extend(fields.map(str::to_string));
            Some(ServiceEntry {
                names,
                port,
                protocol: protocol.to_ascii_lowercase(),
            })
        })
        .collect()
}

/// Port registered for `name` under `protocol` ("tcp", "udp", "sctp").
#[must_use]
pub fn lookup_service(name: &str, protocol: &str) -> Option<u16> {
    TABLE
        .iter()
        .find(|entry| entry.protocol == protocol && entry.names.iter().any(|n| n == name))
        .map(|entry| entry.port)
        .or_else(|| {
            BUILTIN
                .iter()
                .find(|(n, _, p)| *n == name && *p == protocol)
                .map(|(_, port, _)| *port)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_services_lines() {
        let table = parse_services(
            "# comment\n\
             http\t\t80/tcp\t\twww www-http # WorldWideWeb\n\
             domain\t\t53/udp\n\
             broken line\n",
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].port, 80);
        assert!(table[0].names.iter().any(|n| n == "www"));
        assert_eq!(table[1].protocol, "udp");
    }

    #[test]
    fn test_lookup_known_service() {
        assert_eq!(lookup_service("http", "tcp"), Some(80));
        assert_eq!(lookup_service("definitely-not-a-service", "tcp"), None);
    }
}
