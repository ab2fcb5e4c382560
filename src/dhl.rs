//! DHL (Airborne eCommerce) rate estimates.
//!
//! Only domestic US shipments are supported. A quote is a two-part document: an
//! authentication block followed by a `RateEstimate` shipment, posted to the
//! carrier's test bed. The answer is either a fault list or the total charge
//! estimate.

use crate::carrier::ShippingCarrier;
use crate::config::{ClientConfig, Endpoint};
use crate::error::{QuoteError, QuoteResult};
use crate::params::{self, Params};
use crate::states::is_valid_state;
use crate::transport::{HttpTransport, XmlTransport};
use crate::xml_request::{
    to_document, XmlAddress, XmlBilling, XmlCode, XmlDhlRequest, XmlReceiver, XmlRequestor,
    XmlShipment, XmlShipmentDetail, XmlShippingCredentials,
};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local, NaiveDate, Weekday};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::warn;

pub const CARRIER_NAME: &str = "DHL";

/// Number of keys a parameter set must carry, no more and no fewer.
pub const REQUIRED_PARAM_COUNT: usize = 10;

pub const MAX_WEIGHT_LBS: f64 = 150.0;

/// `Result/Desc` text of a successful estimate.
pub const ESTIMATE_SUCCESSFUL: &str = "Shipment estimate successful.";

/// Sender pays. Quotes never involve a third-party billing account.
const BILLING_PARTY_SENDER: &str = "S";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("valid zip pattern"));

/// Fault code ranges and the request field each one blames. Evaluated in order,
/// first match wins, so 4116 reports the service type and the second
/// 4164..=4166 row is never reached.
pub const FAULT_CATEGORIES: &[(RangeInclusive<i64>, &str)] = &[
    (1000..=1009, "Shipment Headers"),
    (4000..=4004, "ShippingKey"),
    (4007..=4007, "Account Number"),
    (4195..=4198, "Account Number"),
    (4100..=4106, "Shipment Date"),
    (4108..=4117, "Service Type (Code)"),
    (4118..=4122, "Shipment Type Code"),
    (4123..=4124, "Weight"),
    (4128..=4131, "Dimensions"),
    (4116..=4116, "Billing Party (Code)"),
    (4147..=4147, "Billing Party (Code)"),
    (4149..=4152, "Billing Account Number"),
    (4164..=4166, "Receiver City"),
    (4167..=4167, "Receiver State"),
    (4164..=4166, "Receiver City"),
    (4169..=4169, "Receiver Country"),
    (4170..=4176, "Receiver Postal Code"),
];

pub const DEFAULT_FAULT_CATEGORY: &str = "API Request";

pub fn fault_category(code: i64) -> &'static str {
    FAULT_CATEGORIES
        .iter()
        .find(|(range, _)| range.contains(&code))
        .map_or(DEFAULT_FAULT_CATEGORY, |(_, category)| category)
}

// Speed of delivery. Saturday and 10:30 services are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceCode {
    Express,
    NextDay,
    SecondDay,
    #[default]
    Ground,
}

impl ServiceCode {
    /// Unknown codes fall back to ground.
    pub fn from_code(code: &str) -> Self {
        match code {
            "E" => Self::Express,
            "N" => Self::NextDay,
            "S" => Self::SecondDay,
            _ => Self::Ground,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Express => "E",
            Self::NextDay => "N",
            Self::SecondDay => "S",
            Self::Ground => "G",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShipmentType {
    #[default]
    Package,
    Letter,
}

impl ShipmentType {
    /// Unknown codes fall back to package.
    pub fn from_code(code: &str) -> Self {
        match code {
            "L" => Self::Letter,
            _ => Self::Package,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Package => "P",
            Self::Letter => "L",
        }
    }
}

/// A validated rate-estimate request.
#[derive(Debug, Clone, PartialEq)]
pub struct DhlRequest {
    pub api_user: String,
    pub api_password: String,
    pub shipping_key: String,
    pub account_num: String,
    /// Already rendered as `YYYY-MM-DD`.
    pub ship_date: String,
    pub service: ServiceCode,
    pub shipment_type: ShipmentType,
    /// Pounds. Ignored for letters.
    pub weight: f64,
    pub to_zip: String,
    pub to_state: String,
}

impl DhlRequest {
    /// Validates a caller-supplied parameter set and normalizes it.
    ///
    /// Keys: `api_user`, `api_password`, `shipping_key`, `account_num`, `date`,
    /// `service_code`, `shipment_code`, `weight`, `to_zip`, `to_state`. All ten
    /// must be present, though `date` may be null to ship today.
    pub fn from_params(params: Option<&Params>) -> QuoteResult<Self> {
        let params = params.ok_or_else(|| QuoteError::invalid("Invalid parameters"))?;
        if params.len() != REQUIRED_PARAM_COUNT {
            return Err(QuoteError::invalid("Missing shipping parameters"));
        }

        let api_user = credential(params, "api_user")?;
        let api_password = credential(params, "api_password")?;
        let shipping_key = credential(params, "shipping_key")?;
        let account_num = credential(params, "account_num")?;

        let ship_date = ship_date_from_value(params::get(params, "date"))?;
        let service = params::get_str(params, "service_code")
            .map(ServiceCode::from_code)
            .unwrap_or_default();
        let shipment_type = params::get_str(params, "shipment_code")
            .map(ShipmentType::from_code)
            .unwrap_or_default();

        let weight = match shipment_type {
            ShipmentType::Letter => 0.0,
            ShipmentType::Package => {
                let weight = params::get_f64(params, "weight").ok_or_else(invalid_weight)?;
                check_weight(weight)?;
                weight
            }
        };

        let to_state = params::get_str(params, "to_state").unwrap_or_default();
        check_state(to_state)?;

        let to_zip = zip_from_value(params::get(params, "to_zip"))?;
        check_zip(&to_zip)?;

        Ok(Self {
            api_user,
            api_password,
            shipping_key,
            account_num,
            ship_date,
            service,
            shipment_type,
            weight,
            to_zip,
            to_state: to_state.to_string(),
        })
    }

    /// Domain checks for requests built directly rather than from a parameter set.
    pub fn validate(&self) -> QuoteResult<()> {
        if !DATE_PATTERN.is_match(&self.ship_date) {
            return Err(QuoteError::invalid("Invalid ship date"));
        }
        if self.shipment_type == ShipmentType::Package {
            check_weight(self.weight)?;
        }
        check_state(&self.to_state)?;
        check_zip(&self.to_zip)
    }

    /// Weight as sent on the wire; letters always weigh nothing.
    pub fn weight_text(&self) -> String {
        match self.shipment_type {
            ShipmentType::Letter => "0".to_string(),
            ShipmentType::Package => params::format_number(self.weight),
        }
    }

    pub fn to_xml(&self) -> QuoteResult<String> {
        to_document(&XmlDhlRequest::from(self))
    }
}

impl From<&DhlRequest> for XmlDhlRequest {
    fn from(request: &DhlRequest) -> Self {
        XmlDhlRequest {
            action: "Request".to_string(),
            version: "1.1".to_string(),
            requestor: XmlRequestor {
                id: request.api_user.clone(),
                password: request.api_password.clone(),
            },
            shipment: XmlShipment {
                action: "RateEstimate".to_string(),
                version: "1.0".to_string(),
                shipping_credentials: XmlShippingCredentials {
                    shipping_key: request.shipping_key.clone(),
                    account_nbr: request.account_num.clone(),
                },
                shipment_detail: XmlShipmentDetail {
                    ship_date: request.ship_date.clone(),
                    service: XmlCode {
                        code: request.service.code().to_string(),
                    },
                    shipment_type: XmlCode {
                        code: request.shipment_type.code().to_string(),
                    },
                    weight: request.weight_text(),
                },
                billing: XmlBilling {
                    party: XmlCode {
                        code: BILLING_PARTY_SENDER.to_string(),
                    },
                },
                receiver: XmlReceiver {
                    address: XmlAddress {
                        state: request.to_state.clone(),
                        country: "US".to_string(),
                        postal_code: request.to_zip.clone(),
                    },
                },
            },
        }
    }
}

fn credential(params: &Params, key: &str) -> QuoteResult<String> {
    match params::get(params, key) {
        None => Ok(String::new()),
        Some(value) => {
            params::scalar_text(value).ok_or_else(|| QuoteError::invalid(format!("Invalid {}", key)))
        }
    }
}

fn invalid_weight() -> QuoteError {
    QuoteError::invalid("Invalid weight - Must be between 1 and 150 lbs.")
}

fn check_weight(weight: f64) -> QuoteResult<()> {
    if weight > 0.0 && weight <= MAX_WEIGHT_LBS {
        Ok(())
    } else {
        Err(invalid_weight())
    }
}

fn check_state(state: &str) -> QuoteResult<()> {
    if is_valid_state(state) {
        Ok(())
    } else {
        Err(QuoteError::invalid("Invalid state for recipient"))
    }
}

fn check_zip(zip: &str) -> QuoteResult<()> {
    if ZIP_PATTERN.is_match(zip) {
        Ok(())
    } else {
        Err(QuoteError::invalid("Invalid zip code for recipient"))
    }
}

/// Zip codes must arrive as integers; a string is almost always a caller bug.
fn zip_from_value(value: Option<&Value>) -> QuoteResult<String> {
    match value {
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        _ => Err(QuoteError::invalid(
            "Zip Code must be a number. Perhaps you are using a string?",
        )),
    }
}

/// Resolves the `date` parameter.
///
/// A `YYYY-MM-DD` string is trusted and passed through untouched. Any other
/// string must be an RFC 3339 timestamp. Null means now. Timestamps falling on
/// a Sunday move to Monday since DHL does not ship on Sundays.
pub fn ship_date_from_value(value: Option<&Value>) -> QuoteResult<String> {
    match value {
        None => format_ship_date(Local::now().date_naive()),
        Some(Value::String(s)) if DATE_PATTERN.is_match(s) => Ok(s.clone()),
        Some(Value::String(s)) => {
            let timestamp = DateTime::parse_from_rfc3339(s)
                .map_err(|_| QuoteError::invalid("Invalid ship date"))?;
            format_ship_date(timestamp.date_naive())
        }
        Some(_) => Err(QuoteError::invalid("Invalid ship date")),
    }
}

pub fn format_ship_date(date: NaiveDate) -> QuoteResult<String> {
    let date = if date.weekday() == Weekday::Sun {
        date.succ_opt()
            .ok_or_else(|| QuoteError::invalid("Invalid ship date"))?
    } else {
        date
    };
    Ok(date.format("%Y-%m-%d").to_string())
}

// Fields of interest pulled out of a rate-estimate response
#[derive(Debug, Default, PartialEq)]
struct EstimateResponse {
    has_faults: bool,
    fault_code: Option<String>,
    result_desc: Option<String>,
    total_charge: Option<String>,
}

fn ends_with(stack: &[String], suffix: &[&str]) -> bool {
    stack.len() >= suffix.len()
        && stack[stack.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

fn scan_response(xml: &str) -> QuoteResult<EstimateResponse> {
    let mut found = EstimateResponse::default();
    let mut stack: Vec<String> = Vec::new();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let in_faults = stack.iter().any(|n| n == "Faults");

                let slot = if name == "Code" && in_faults {
                    Some(&mut found.fault_code)
                } else if name == "Desc" && ends_with(&stack, &["Shipment", "Result"]) {
                    Some(&mut found.result_desc)
                } else if name == "TotalChargeEstimate"
                    && ends_with(&stack, &["Shipment", "EstimateDetail", "RateEstimate"])
                {
                    Some(&mut found.total_charge)
                } else {
                    None
                };

                match slot {
                    Some(slot) => {
                        let raw = reader.read_text(e.name())?;
                        if slot.is_none() {
                            let text = quick_xml::escape::unescape(&raw)
                                .map_err(|e| QuoteError::MalformedResponse(e.to_string()))?;
                            *slot = Some(text.trim().to_string());
                        }
                    }
                    None => {
                        if name == "Faults" {
                            found.has_faults = true;
                        }
                        stack.push(name);
                    }
                }
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"Faults" {
                    found.has_faults = true;
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => (),
        }
    }

    Ok(found)
}

/// Interprets a rate-estimate response body.
pub fn parse_response(xml: &str) -> QuoteResult<Decimal> {
    let response = scan_response(xml)?;

    if response.has_faults {
        let code = response
            .fault_code
            .filter(|code| !code.is_empty())
            .unwrap_or_else(|| "unknown".to_string());
        // Non-numeric codes count as 0 and fall through to the default category.
        let category = fault_category(code.parse().unwrap_or(0));
        warn!(carrier = CARRIER_NAME, code = %code, category, "carrier reported a fault");
        return Err(QuoteError::carrier(
            CARRIER_NAME,
            format!("{} Error {}: Invalid {}", CARRIER_NAME, code, category),
        ));
    }

    match response.result_desc {
        Some(desc) if desc == ESTIMATE_SUCCESSFUL => {
            let total = response.total_charge.ok_or_else(|| {
                QuoteError::MalformedResponse("missing TotalChargeEstimate".to_string())
            })?;
            let price = Decimal::from_str(&total).map_err(|e| {
                QuoteError::MalformedResponse(format!("TotalChargeEstimate {:?}: {}", total, e))
            })?;
            if price.is_sign_negative() {
                return Err(QuoteError::carrier(
                    CARRIER_NAME,
                    format!("Negative charge estimate {}", price),
                ));
            }
            Ok(price)
        }
        Some(desc) => Err(QuoteError::carrier(CARRIER_NAME, desc)),
        None => Err(QuoteError::carrier(CARRIER_NAME, xml)),
    }
}

/// DHL rate-estimate client.
pub struct DhlClient<T: XmlTransport = HttpTransport> {
    endpoint: Endpoint,
    transport: T,
}

impl DhlClient<HttpTransport> {
    pub fn new(config: &ClientConfig) -> QuoteResult<Self> {
        Ok(Self::with_transport(
            config.dhl_endpoint.clone(),
            HttpTransport::new(config.timeout_ms)?,
        ))
    }
}

impl<T: XmlTransport> DhlClient<T> {
    pub fn with_transport(endpoint: Endpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Quotes an already typed request.
    pub async fn quote_request(&self, request: &DhlRequest) -> QuoteResult<Decimal> {
        request.validate()?;
        let body = request.to_xml()?;
        let response = self.transport.post_xml(&self.endpoint, body).await?;
        parse_response(&response)
    }
}

#[async_trait]
impl<T: XmlTransport> ShippingCarrier for DhlClient<T> {
    type Quote = Decimal;

    fn name(&self) -> &'static str {
        CARRIER_NAME
    }

    async fn quote(&self, params: Option<&Params>) -> QuoteResult<Decimal> {
        let request = DhlRequest::from_params(params)?;
        self.quote_request(&request).await
    }
}
