//! FreightQuote LTL quotes.
//!
//! Built against version 03 of FreightQuote's XML connection test. A single
//! request returns rates from every freight carrier FreightQuote works with,
//! so the result is a carrier name → rate table rather than one price.
//!
//! The shared test account `xmltest@FreightQuote.com` / `XML` answers quotes but
//! hides the debugging details tied to a real account.

use crate::carrier::ShippingCarrier;
use crate::config::{ClientConfig, Endpoint};
use crate::error::{QuoteError, QuoteResult};
use crate::params::{self, Params};
use crate::transport::{HttpTransport, XmlTransport};
use crate::xml_request::{
    to_document, XmlDimensions, XmlFreightQuoteRequest, XmlLocation, XmlShipmentItem,
};
use crate::xml_response::XmlFreightQuoteResponse;
use async_trait::async_trait;
use quick_xml::de::from_str;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

pub const CARRIER_NAME: &str = "FreightQuote";

pub const DEFAULT_DESCRIPTION: &str = "NODESC";

/// Checked in this order when reporting a missing field.
pub const REQUIRED_FIELDS: [&str; 5] = ["api_email", "api_password", "to_zip", "from_zip", "weight"];

static DIMENSIONS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)x(\d+)x(\d+)$").expect("valid dimensions pattern")
});

/// Whether a pickup or delivery location is a home or a business, and whether
/// the business has a dock or forklift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationCondition {
    #[default]
    Residence,
    BusinessWithDock,
    BusinessWithoutDock,
}

impl LocationCondition {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "RES" => Some(Self::Residence),
            "BIZ_WITH" => Some(Self::BusinessWithDock),
            "BIZ_WITHOUT" => Some(Self::BusinessWithoutDock),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Residence => "RES",
            Self::BusinessWithDock => "BIZ_WITH",
            Self::BusinessWithoutDock => "BIZ_WITHOUT",
        }
    }

    fn location(&self, zip_code: &str) -> XmlLocation {
        let (residence, loading_dock) = match self {
            Self::Residence => (Some("TRUE"), None),
            Self::BusinessWithDock => (None, Some("TRUE")),
            Self::BusinessWithoutDock => (None, Some("FALSE")),
        };
        XmlLocation {
            zip_code: zip_code.to_string(),
            residence: residence.map(str::to_string),
            loading_dock: loading_dock.map(str::to_string),
            ..Default::default()
        }
    }
}

/// Shipment size as `[Length]x[Width]x[Height]`, e.g. `23x32x15`. Each side
/// keeps the caller's digits as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub length: String,
    pub width: String,
    pub height: String,
}

impl FromStr for Dimensions {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuoteError::invalid("Invalid shipment dimensions");
        let caps = DIMENSIONS_PATTERN.captures(s).ok_or_else(invalid)?;
        let side = |i: usize| -> QuoteResult<String> {
            caps.get(i)
                .map(|m| m.as_str().to_string())
                .ok_or_else(invalid)
        };
        Ok(Self {
            length: side(1)?,
            width: side(2)?,
            height: side(3)?,
        })
    }
}

/// What the rate is based on. A freight class wins over dimensions.
#[derive(Debug, Clone, PartialEq)]
pub enum Cargo {
    Class(String),
    Dimensions(Dimensions),
}

/// A validated quote request with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FreightQuoteRequest {
    pub api_email: String,
    pub api_password: String,
    pub from_zip: String,
    pub to_zip: String,
    /// Total weight in pounds.
    pub weight: f64,
    pub cargo: Cargo,
    pub description: String,
    pub from_conditions: LocationCondition,
    pub to_conditions: LocationCondition,
    /// Liftgate needed at the receiving location.
    pub liftgate: bool,
    /// Inside delivery needed at the receiving location.
    pub inside_delivery: bool,
}

impl FreightQuoteRequest {
    /// Validates a caller-supplied parameter set.
    ///
    /// Required: `api_email`, `api_password`, `from_zip`, `to_zip`, `weight`, and
    /// either `dimensions` or `class`. Optional: `description`,
    /// `from_conditions`, `to_conditions`, `liftgate`, `inside_delivery`.
    pub fn from_params(params: Option<&Params>) -> QuoteResult<Self> {
        let params = params
            .ok_or_else(|| QuoteError::invalid("Nil parameters for FreightQuote quote."))?;

        let class = params::get(params, "class");
        let dimensions = params::get_str(params, "dimensions").map(Dimensions::from_str);
        let cargo = match (class, dimensions) {
            (Some(class), _) => Cargo::Class(
                params::scalar_text(class)
                    .ok_or_else(|| QuoteError::invalid("Invalid shipment class"))?,
            ),
            (None, Some(Ok(dimensions))) => Cargo::Dimensions(dimensions),
            (None, _) => return Err(QuoteError::invalid("Invalid shipment dimensions")),
        };

        let to_conditions = conditions(params, "to_conditions", "Invalid receiving conditions")?;
        let from_conditions =
            conditions(params, "from_conditions", "Invalid shipping conditions")?;
        let liftgate = flag(params, "liftgate", "Invalid liftgate option, only boolean values.")?;
        let inside_delivery = flag(
            params,
            "inside_delivery",
            "Invalid inside delivery option, only boolean values.",
        )?;

        for field in REQUIRED_FIELDS {
            if params::get(params, field).is_none() {
                return Err(missing_field(field));
            }
        }

        let weight = params::get_f64(params, "weight")
            .filter(|w| *w > 0.0)
            .ok_or_else(|| QuoteError::invalid("Invalid weight"))?;

        let description = params::get(params, "description")
            .and_then(params::scalar_text)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        Ok(Self {
            api_email: text(params, "api_email")?,
            api_password: text(params, "api_password")?,
            from_zip: text(params, "from_zip")?,
            to_zip: text(params, "to_zip")?,
            weight,
            cargo,
            description,
            from_conditions,
            to_conditions,
            liftgate,
            inside_delivery,
        })
    }

    /// Checks for requests built directly rather than from a parameter set.
    pub fn validate(&self) -> QuoteResult<()> {
        let required = [
            ("api_email", &self.api_email),
            ("api_password", &self.api_password),
            ("to_zip", &self.to_zip),
            ("from_zip", &self.from_zip),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(missing_field(field));
        }
        if !(self.weight > 0.0) {
            return Err(QuoteError::invalid("Invalid weight"));
        }
        Ok(())
    }

    pub fn to_xml(&self) -> QuoteResult<String> {
        to_document(&XmlFreightQuoteRequest::from(self))
    }
}

impl From<&FreightQuoteRequest> for XmlFreightQuoteRequest {
    fn from(request: &FreightQuoteRequest) -> Self {
        let mut destination = request.to_conditions.location(&request.to_zip);
        if request.liftgate {
            destination.liftgate_delivery = Some("TRUE".to_string());
        }
        if request.inside_delivery {
            destination.inside_delivery = Some("TRUE".to_string());
        }

        let (class, dimensions) = match &request.cargo {
            Cargo::Class(class) => (Some(class.clone()), None),
            Cargo::Dimensions(d) => (
                None,
                Some(XmlDimensions {
                    length: d.length.clone(),
                    width: d.width.clone(),
                    height: d.height.clone(),
                }),
            ),
        };

        XmlFreightQuoteRequest {
            request: "QUOTE".to_string(),
            email: request.api_email.clone(),
            password: request.api_password.clone(),
            // Quotes only; assume the shipper pays.
            bill_to: "SHIPPER".to_string(),
            destination,
            origin: request.from_conditions.location(&request.from_zip),
            shipment: XmlShipmentItem {
                weight: params::format_number(request.weight),
                description: request.description.clone(),
                class,
                dimensions,
                pieces: "1".to_string(),
            },
        }
    }
}

fn missing_field(field: &str) -> QuoteError {
    QuoteError::invalid(format!("Required field \"{}\" not found.", field))
}

fn text(params: &Params, key: &str) -> QuoteResult<String> {
    params::get(params, key)
        .and_then(params::scalar_text)
        .ok_or_else(|| QuoteError::invalid(format!("Invalid {}", key)))
}

fn conditions(params: &Params, key: &str, message: &str) -> QuoteResult<LocationCondition> {
    match params::get(params, key) {
        None => Ok(LocationCondition::default()),
        Some(value) => value
            .as_str()
            .and_then(LocationCondition::from_code)
            .ok_or_else(|| QuoteError::invalid(message)),
    }
}

/// Only real booleans are accepted; `"yes"`, `1` and friends are rejected.
fn flag(params: &Params, key: &str, message: &str) -> QuoteResult<bool> {
    match params::get(params, key) {
        None => Ok(false),
        Some(value) => value.as_bool().ok_or_else(|| QuoteError::invalid(message)),
    }
}

/// Carrier name → rate, in the order the carriers appear in the response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreightQuotes {
    rates: Vec<(String, String)>,
}

impl FreightQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated carrier keeps its first position and takes the latest rate.
    pub fn insert(&mut self, carrier: String, rate: String) {
        match self.rates.iter_mut().find(|(name, _)| *name == carrier) {
            Some(entry) => entry.1 = rate,
            None => self.rates.push((carrier, rate)),
        }
    }

    pub fn get(&self, carrier: &str) -> Option<&str> {
        self.rates
            .iter()
            .find(|(name, _)| name == carrier)
            .map(|(_, rate)| rate.as_str())
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rates.iter().map(|(n, r)| (n.as_str(), r.as_str()))
    }
}

impl IntoIterator for FreightQuotes {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.rates.into_iter()
    }
}

/// Reads every `CARRIER` entry of a quote response. Carrier-side errors are not
/// classified; they simply yield no entries.
pub fn parse_response(xml: &str) -> QuoteResult<FreightQuotes> {
    let response: XmlFreightQuoteResponse = from_str(xml)?;

    let mut quotes = FreightQuotes::new();
    for carrier in response.carriers {
        match carrier.name.filter(|name| !name.trim().is_empty()) {
            Some(name) => {
                let rate = carrier.rate.unwrap_or_default();
                quotes.insert(name.trim().to_string(), rate.trim().to_string());
            }
            None => warn!(carrier = CARRIER_NAME, "skipping CARRIER entry without a name"),
        }
    }

    Ok(quotes)
}

/// FreightQuote client.
pub struct FreightQuoteClient<T: XmlTransport = HttpTransport> {
    endpoint: Endpoint,
    transport: T,
}

impl FreightQuoteClient<HttpTransport> {
    pub fn new(config: &ClientConfig) -> QuoteResult<Self> {
        Ok(Self::with_transport(
            config.freight_quote_endpoint.clone(),
            HttpTransport::new(config.timeout_ms)?,
        ))
    }
}

impl<T: XmlTransport> FreightQuoteClient<T> {
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub async fn quote_request(&self, request: &FreightQuoteRequest) -> QuoteResult<FreightQuotes> {
        request.validate()?;
        let body = request.to_xml()?;
        let response = self.transport.post_xml(&self.endpoint, body).await?;
        parse_response(&response)
    }
}

#[async_trait]
impl<T: XmlTransport> ShippingCarrier for FreightQuoteClient<T> {
    type Quote = FreightQuotes;

    fn name(&self) -> &'static str {
        CARRIER_NAME
    }

    async fn quote(&self, params: Option<&Params>) -> QuoteResult<FreightQuotes> {
        let request = FreightQuoteRequest::from_params(params)?;
        self.quote_request(&request).await
    }
}
