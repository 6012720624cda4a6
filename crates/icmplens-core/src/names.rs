use std::net::{Ipv4Addr, Ipv6Addr};

/// Turn addresses and ports into display strings.
pub trait NameResolver: Send + Sync {
    fn ipv4(&self, addr: Ipv4Addr) -> String;
    fn ipv6(&self, addr: Ipv6Addr) -> String;
    fn tcp_port(&self, port: u16) -> String;
    fn udp_port(&self, port: u16) -> String;
}

/// Print every address and port as a number.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumericNames;

impl NameResolver for NumericNames {
    fn ipv4(&self, addr: Ipv4Addr) -> String {
        addr.to_string()
    }

    fn ipv6(&self, addr: Ipv6Addr) -> String {
        addr.to_string()
    }

    fn tcp_port(&self, port: u16) -> String {
        port.to_string()
    }

    fn udp_port(&self, port: u16) -> String {
        port.to_string()
    }
}

/// Print well known ports by their service name.
///
/// Addresses are printed as numbers and ports without a known service fall back to their number.
#[derive(Debug, Default, Clone, Copy)]
pub struct ServiceNames;

impl NameResolver for ServiceNames {
    fn ipv4(&self, addr: Ipv4Addr) -> String {
        addr.to_string()
    }

    fn ipv6(&self, addr: Ipv6Addr) -> String {
        addr.to_string()
    }

    fn tcp_port(&self, port: u16) -> String {
        lookup(TCP_SERVICES, port)
    }

    fn udp_port(&self, port: u16) -> String {
        lookup(UDP_SERVICES, port)
    }
}

fn lookup(services: &[(u16, &str)], port: u16) -> String {
    services
        .binary_search_by_key(&port, |&(p, _)| p)
        .map_or_else(|_| port.to_string(), |i| String::from(services[i].1))
}

// sorted by port
const TCP_SERVICES: &[(u16, &str)] = &[
    (7, "echo"),
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (53, "domain"),
    (80, "http"),
    (110, "pop3"),
    (119, "nntp"),
    (143, "imap"),
    (179, "bgp"),
    (389, "ldap"),
    (443, "https"),
    (465, "submissions"),
    (514, "shell"),
    (587, "submission"),
    (636, "ldaps"),
    (853, "domain-s"),
    (993, "imaps"),
    (995, "pop3s"),
    (3306, "mysql"),
    (5432, "postgresql"),
    (8080, "http-alt"),
];

// sorted by port
const UDP_SERVICES: &[(u16, &str)] = &[
    (7, "echo"),
    (53, "domain"),
    (67, "bootps"),
    (68, "bootpc"),
    (69, "tftp"),
    (123, "ntp"),
    (137, "netbios-ns"),
    (138, "netbios-dgm"),
    (161, "snmp"),
    (162, "snmptrap"),
    (443, "https"),
    (500, "isakmp"),
    (514, "syslog"),
    (520, "route"),
    (853, "domain-s"),
    (1812, "radius"),
    (1813, "radius-acct"),
    (3784, "bfd-control"),
    (4500, "ipsec-nat-t"),
    (5353, "mdns"),
];
