//! Static instrument table loading.
//!
//! Loaded once at startup from a CSV file (first row header, columns:
//! symbol, nautilus-symbol, tick-value, target-spread,
//! margin-requirement) and treated as read-only afterwards.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::shared::Symbol;
use crate::fix::SymbolMap;

/// Instrument table failures.
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// The file could not be read or parsed.
    #[error("failed to read instrument table: {0}")]
    Read(#[from] csv::Error),
    /// The table parsed but contains no rows.
    #[error("instrument table is empty")]
    Empty,
}

/// One row of the static instrument table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instrument {
    /// Broker symbol code, e.g. `AUD/USD`.
    #[serde(rename = "symbol")]
    pub broker_code: String,
    /// Internal symbol, e.g. `AUDUSD`.
    #[serde(rename = "nautilus-symbol")]
    pub symbol: Symbol,
    /// Value of one tick in the quote currency.
    #[serde(rename = "tick-value")]
    pub tick_value: Decimal,
    /// Target spread used for slippage estimates.
    #[serde(rename = "target-spread")]
    pub target_spread: Decimal,
    /// Margin requirement per unit.
    #[serde(rename = "margin-requirement")]
    pub margin_requirement: Decimal,
}

/// Load the instrument table from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a row fails to parse,
/// or the table is empty.
pub fn load_instruments(path: impl AsRef<Path>) -> Result<Vec<Instrument>, InstrumentError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut instruments = Vec::new();
    for row in reader.deserialize() {
        let instrument: Instrument = row?;
        instruments.push(instrument);
    }
    if instruments.is_empty() {
        return Err(InstrumentError::Empty);
    }
    info!(
        count = instruments.len(),
        path = %path.as_ref().display(),
        "loaded instrument table",
    );
    Ok(instruments)
}

/// Build the translator/router symbol map from the instrument table.
#[must_use]
pub fn symbol_map(instruments: &[Instrument]) -> SymbolMap {
    SymbolMap::new(
        instruments
            .iter()
            .map(|i| (i.broker_code.clone(), i.symbol.clone())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const TABLE: &str = "\
symbol,nautilus-symbol,tick-value,target-spread,margin-requirement
AUD/USD,AUDUSD,0.0001,0.00015,0.03
EUR/USD,EURUSD,0.0001,0.00012,0.02
";

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_instrument_rows() {
        let file = write_table(TABLE);
        let instruments = load_instruments(file.path()).unwrap();
        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments[0].broker_code, "AUD/USD");
        assert_eq!(instruments[0].symbol, Symbol::new("AUDUSD"));
        assert_eq!(instruments[0].tick_value, dec!(0.0001));
        assert_eq!(instruments[1].margin_requirement, dec!(0.02));
    }

    #[test]
    fn empty_table_rejected() {
        let file =
            write_table("symbol,nautilus-symbol,tick-value,target-spread,margin-requirement\n");
        assert!(matches!(
            load_instruments(file.path()),
            Err(InstrumentError::Empty)
        ));
    }

    #[test]
    fn malformed_decimal_rejected() {
        let file = write_table(
            "symbol,nautilus-symbol,tick-value,target-spread,margin-requirement\nAUD/USD,AUDUSD,abc,0.0001,0.03\n",
        );
        assert!(load_instruments(file.path()).is_err());
    }

    #[test]
    fn builds_symbol_map() {
        let file = write_table(TABLE);
        let instruments = load_instruments(file.path()).unwrap();
        let map = symbol_map(&instruments);
        assert_eq!(map.resolve("EUR/USD"), Some(Symbol::new("EURUSD")));
        assert_eq!(map.broker_code(&Symbol::new("AUDUSD")), Some("AUD/USD"));
    }
}
