use crate::error::QuoteResult;
use serde::{Deserialize, Serialize};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serializes a request document, prefixed with the XML declaration both carriers expect.
pub fn to_document<T: Serialize>(document: &T) -> QuoteResult<String> {
    let body = quick_xml::se::to_string(document)?;
    Ok(format!("{}{}", XML_DECLARATION, body))
}

// DHL rate estimate request

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
#[serde(rename = "eCommerce")]
pub struct XmlDhlRequest {
    #[serde(rename = "@action")]
    pub action: String,
    #[serde(rename = "@version")]
    pub version: String,
    pub requestor: XmlRequestor,
    pub shipment: XmlShipment,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlRequestor {
    #[serde(rename = "ID")]
    pub id: String,
    pub password: String,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlShipment {
    #[serde(rename = "@action")]
    pub action: String,
    #[serde(rename = "@version")]
    pub version: String,
    pub shipping_credentials: XmlShippingCredentials,
    pub shipment_detail: XmlShipmentDetail,
    pub billing: XmlBilling,
    pub receiver: XmlReceiver,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlShippingCredentials {
    pub shipping_key: String,
    pub account_nbr: String,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlShipmentDetail {
    pub ship_date: String,
    pub service: XmlCode,
    pub shipment_type: XmlCode,
    pub weight: String,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlCode {
    pub code: String,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlBilling {
    pub party: XmlCode,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlReceiver {
    pub address: XmlAddress,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct XmlAddress {
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

// FreightQuote quote request

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
#[serde(rename = "FREIGHTQUOTE")]
pub struct XmlFreightQuoteRequest {
    #[serde(rename = "@REQUEST")]
    pub request: String,
    #[serde(rename = "@EMAIL")]
    pub email: String,
    #[serde(rename = "@PASSWORD")]
    pub password: String,
    #[serde(rename = "@BILLTO")]
    pub bill_to: String,
    #[serde(rename = "DESTINATION")]
    pub destination: XmlLocation,
    #[serde(rename = "ORIGIN")]
    pub origin: XmlLocation,
    #[serde(rename = "SHIPMENT")]
    pub shipment: XmlShipmentItem,
}

/// Origin or destination block. Liftgate and inside delivery only ever appear
/// on the destination.
#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct XmlLocation {
    #[serde(rename = "ZIPCODE")]
    pub zip_code: String,
    #[serde(rename = "RESIDENCE", skip_serializing_if = "Option::is_none")]
    pub residence: Option<String>,
    #[serde(rename = "LOADINGDOCK", skip_serializing_if = "Option::is_none")]
    pub loading_dock: Option<String>,
    #[serde(rename = "LIFTGATEDELIVERY", skip_serializing_if = "Option::is_none")]
    pub liftgate_delivery: Option<String>,
    #[serde(rename = "INSIDEDELIVERY", skip_serializing_if = "Option::is_none")]
    pub inside_delivery: Option<String>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct XmlShipmentItem {
    #[serde(rename = "WEIGHT")]
    pub weight: String,
    #[serde(rename = "PRODUCTDESC")]
    pub description: String,
    #[serde(rename = "CLASS", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(rename = "DIMENSIONS", skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<XmlDimensions>,
    #[serde(rename = "PIECES")]
    pub pieces: String,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct XmlDimensions {
    #[serde(rename = "LENGTH")]
    pub length: String,
    #[serde(rename = "WIDTH")]
    pub width: String,
    #[serde(rename = "HEIGHT")]
    pub height: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_has_declaration() {
        let doc = XmlDimensions {
            length: "1".to_string(),
            width: "2".to_string(),
            height: "3".to_string(),
        };
        let xml = to_document(&doc).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<LENGTH>1</LENGTH><WIDTH>2</WIDTH><HEIGHT>3</HEIGHT>"));
    }

    #[test]
    fn test_absent_optional_elements_are_omitted() {
        let location = XmlLocation {
            zip_code: "33166".to_string(),
            residence: Some("TRUE".to_string()),
            ..Default::default()
        };
        let xml = quick_xml::se::to_string_with_root("DESTINATION", &location).unwrap();
        assert_eq!(
            xml,
            "<DESTINATION><ZIPCODE>33166</ZIPCODE><RESIDENCE>TRUE</RESIDENCE></DESTINATION>"
        );
    }
}
