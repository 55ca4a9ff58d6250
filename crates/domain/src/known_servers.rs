//! Registry of well-known public DoH providers.

/// A well-known DoH provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownServer {
    pub name: &'static str,
    /// RFC 8484 endpoint (`application/dns-message`).
    pub url: &'static str,
    /// Legacy `application/dns-json` endpoint, when the provider has one.
    pub json_url: Option<&'static str>,
}

pub const GOOGLE: KnownServer = KnownServer {
    name: "google",
    url: "https://dns.google/dns-query",
    json_url: Some("https://dns.google.com/resolve"),
};

pub const CLOUDFLARE: KnownServer = KnownServer {
    name: "cloudflare",
    url: "https://cloudflare-dns.com/dns-query",
    json_url: Some("https://cloudflare-dns.com/dns-query"),
};

pub const QUAD9: KnownServer = KnownServer {
    name: "quad9",
    url: "https://dns.quad9.net:5053/dns-query",
    json_url: Some("https://dns.quad9.net:5053/dns-query"),
};

pub const OPENDNS: KnownServer = KnownServer {
    name: "opendns",
    url: "https://doh.opendns.com/dns-query",
    json_url: None,
};

pub const XFINITY: KnownServer = KnownServer {
    name: "xfinity",
    url: "https://doh.xfinity.com/dns-query",
    json_url: None,
};

pub const ADGUARD: KnownServer = KnownServer {
    name: "adguard",
    url: "https://dns.adguard.com/dns-query",
    json_url: None,
};

pub const LIBREDNS: KnownServer = KnownServer {
    name: "libredns",
    url: "https://doh.libredns.gr/dns-query",
    json_url: None,
};

pub const NEXTDNS: KnownServer = KnownServer {
    name: "nextdns",
    url: "https://dns.nextdns.io/dns-query",
    json_url: None,
};

pub const CIRA: KnownServer = KnownServer {
    name: "cira",
    url: "https://private.canadianshield.cira.ca/dns-query",
    json_url: None,
};

pub const MOZILLA: KnownServer = KnownServer {
    name: "mozilla",
    url: "https://mozilla.cloudflare-dns.com/dns-query",
    json_url: None,
};

pub const KNOWN_SERVERS: [KnownServer; 10] = [
    GOOGLE, CLOUDFLARE, QUAD9, OPENDNS, XFINITY, ADGUARD, LIBREDNS, NEXTDNS, CIRA, MOZILLA,
];

/// Default sources for the query command.
pub const DEFAULT_SOURCES: [&str; 3] = ["google", "cloudflare", "quad9"];

impl KnownServer {
    /// Case-insensitive lookup by provider name.
    pub fn lookup(name: &str) -> Option<KnownServer> {
        let name = name.trim();
        KNOWN_SERVERS
            .iter()
            .find(|server| server.name.eq_ignore_ascii_case(name))
            .copied()
    }
}
