use crate::error::QuoteResult;
use crate::params::Params;
use async_trait::async_trait;

/// A carrier integration that can price a shipment.
///
/// Each call validates `params`, builds the carrier's request document, performs
/// one HTTP round trip and interprets the answer. Nothing is kept between calls.
#[async_trait]
pub trait ShippingCarrier: Send + Sync {
    /// What a successful quote returns: a single price or a set of rates.
    type Quote: Send;

    /// Name used in carrier errors and log lines.
    fn name(&self) -> &'static str;

    /// Prices a shipment. `None` is rejected as an invalid argument.
    async fn quote(&self, params: Option<&Params>) -> QuoteResult<Self::Quote>;
}
