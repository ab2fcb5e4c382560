// Shipping cost quotes from DHL and FreightQuote

pub mod carrier;
pub mod config;
pub mod dhl;
pub mod error;
pub mod freight_quote;
pub mod params;
pub mod states;
pub mod transport;
pub mod xml_request;
pub mod xml_response;

// Re-export key types for convenience
pub use carrier::ShippingCarrier;
pub use config::{ClientConfig, Endpoint};
pub use dhl::{DhlClient, DhlRequest, ServiceCode, ShipmentType};
pub use error::{QuoteError, QuoteResult};
pub use freight_quote::{
    Cargo, Dimensions, FreightQuoteClient, FreightQuoteRequest, FreightQuotes, LocationCondition,
};
pub use params::Params;
pub use states::US_STATES;
pub use transport::{HttpTransport, XmlTransport};
