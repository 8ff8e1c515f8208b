//! Broker order id normalization.

/// Strip the broker-added suffix from an order id echoed back on the
/// wire, so reports correlate with internally tracked ids.
///
/// Brokers decorate the ClOrdID with session-scoped suffixes separated
/// by underscores (`O-123_fxcm_01` for `O-123`); everything from the
/// first underscore onward is decoration.
#[must_use]
pub fn strip_broker_suffix(raw: &str) -> &str {
    match raw.find('_') {
        Some(index) => &raw[..index],
        None => raw,
    }
}
