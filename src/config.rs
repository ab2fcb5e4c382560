use std::fmt;

/// DHL (Airborne eCommerce) rate-estimate test bed. Production access needs the
/// application to be certified against their live platform first.
pub const DHL_ENDPOINT: &str = "https://eCommerce.airborne.com/ApiLandingTest.asp";

/// FreightQuote XML quoter, connection test version 03.
pub const FREIGHT_QUOTE_ENDPOINT: &str = "http://b2b.freightquote.com/dll/fqxmlquoter.asp";

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Full URL a carrier request is posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

// Client configuration shared by both carriers
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub dhl_endpoint: Endpoint,
    pub freight_quote_endpoint: Endpoint,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dhl_endpoint: Endpoint::new(DHL_ENDPOINT),
            freight_quote_endpoint: Endpoint::new(FREIGHT_QUOTE_ENDPOINT),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn with_dhl_endpoint(mut self, url: impl Into<String>) -> Self {
        self.dhl_endpoint = Endpoint::new(url);
        self
    }

    pub fn with_freight_quote_endpoint(mut self, url: impl Into<String>) -> Self {
        self.freight_quote_endpoint = Endpoint::new(url);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}
