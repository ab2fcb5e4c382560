use serde::{Deserialize, Serialize};

// Structures for FreightQuote response deserialization.
// The root element name is not checked; only its CARRIER children are read.
#[derive(Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
#[serde(rename = "FREIGHTQUOTE")]
pub struct XmlFreightQuoteResponse {
    #[serde(rename = "CARRIER")]
    pub carriers: Vec<XmlCarrier>,
}

#[derive(Debug, PartialEq, Default, Deserialize, Clone, Serialize)]
#[serde(default)]
pub struct XmlCarrier {
    #[serde(rename = "CARRIERNAME")]
    pub name: Option<String>,
    #[serde(rename = "RATE")]
    pub rate: Option<String>,
}
