//! Inbound wire message to domain event translation.
//!
//! Each broker message maps to at most one domain output. Translation
//! failures (unknown symbol, malformed decimal, unrecognized status
//! code) are logged and the single message is dropped; one bad message
//! must never take down the session.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::broker_id::strip_broker_suffix;
use super::messages::{
    BusinessMessageReject, CollateralReport, ExecutionReport, FixMessage, MarketDataSnapshot,
    OrderCancelReject, SecurityList,
};
use super::symbol_map::SymbolMap;
use crate::domain::account::{AccountStateEvent, MarginCallStatus};
use crate::domain::events::Event;
use crate::domain::market::QuoteTick;
use crate::domain::order::events::{
    OrderCancelReject as OrderCancelRejectEvent, OrderCancelled, OrderExpired, OrderFilled,
    OrderModified, OrderPartiallyFilled, OrderRejected, OrderWorking,
};
use crate::domain::order::{OrderEvent, OrderSide, OrderType, TimeInForce};
use crate::domain::shared::{
    AccountId, BrokerOrderId, Currency, ExecutionId, Money, OrderId, Price, Quantity, Symbol,
    Timestamp,
};

/// Why a single message could not be translated.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The broker symbol code has no internal mapping.
    #[error("unknown broker symbol code: {code}")]
    UnknownSymbol {
        /// The unmapped code.
        code: String,
    },
    /// A field failed to parse.
    #[error("malformed field {field}: {message}")]
    Malformed {
        /// Field name.
        field: &'static str,
        /// Parse failure detail.
        message: String,
    },
    /// An enumerated wire code was not recognized.
    #[error("unrecognized {field} code: {code}")]
    UnknownCode {
        /// Field name.
        field: &'static str,
        /// The unrecognized code.
        code: char,
    },
}

/// Successful translation output.
#[derive(Debug, Clone)]
pub enum TranslatedMessage {
    /// A domain event for the execution engine.
    Event(Event),
    /// A quote tick for the bar pipeline.
    Quote(QuoteTick),
    /// A wholesale instrument refresh.
    Instruments(Vec<Symbol>),
}

/// Stateless inbound translator. Shares the symbol map with the router.
#[derive(Debug)]
pub struct FixTranslator {
    symbol_map: Arc<SymbolMap>,
}

impl FixTranslator {
    /// Create a translator over the given symbol map.
    #[must_use]
    pub const fn new(symbol_map: Arc<SymbolMap>) -> Self {
        Self { symbol_map }
    }

    /// Translate one inbound message.
    ///
    /// Returns `None` when the message carries nothing for the domain
    /// (business rejects) or could not be translated; failures are
    /// logged here and never propagate.
    #[must_use]
    pub fn translate(&self, message: &FixMessage) -> Option<TranslatedMessage> {
        let result = match message {
            FixMessage::ExecutionReport(report) => self
                .translate_execution_report(report)
                .map(|e| TranslatedMessage::Event(Event::Order(e))),
            FixMessage::OrderCancelReject(reject) => Self::translate_cancel_reject(reject)
                .map(|e| TranslatedMessage::Event(Event::Order(e))),
            FixMessage::CollateralReport(report) => Self::translate_collateral_report(report)
                .map(|e| TranslatedMessage::Event(Event::AccountState(e))),
            FixMessage::MarketDataSnapshot(snapshot) => self
                .translate_market_data(snapshot)
                .map(TranslatedMessage::Quote),
            FixMessage::SecurityList(list) => Ok(TranslatedMessage::Instruments(
                self.translate_security_list(list),
            )),
            FixMessage::BusinessMessageReject(reject) => {
                Self::log_business_reject(reject);
                return None;
            }
        };
        match result {
            Ok(translated) => Some(translated),
            Err(error) => {
                warn!(%error, "dropping untranslatable message");
                None
            }
        }
    }

    fn translate_execution_report(
        &self,
        report: &ExecutionReport,
    ) -> Result<OrderEvent, TranslateError> {
        let order_id = OrderId::new(strip_broker_suffix(&report.order_id));
        let event_id = Uuid::new_v4();
        let timestamp = parse_timestamp("transact_time", &report.transact_time)?;

        match report.order_status {
            '8' => Ok(OrderEvent::Rejected(OrderRejected {
                order_id,
                reason: report.text.clone().unwrap_or_default(),
                event_id,
                timestamp,
            })),
            '4' => Ok(OrderEvent::Cancelled(OrderCancelled {
                order_id,
                event_id,
                timestamp,
            })),
            'C' => Ok(OrderEvent::Expired(OrderExpired {
                order_id,
                event_id,
                timestamp,
            })),
            '5' => Ok(OrderEvent::Modified(OrderModified {
                order_id,
                broker_order_id: BrokerOrderId::new(strip_broker_suffix(&report.broker_order_id)),
                modified_quantity: parse_quantity("quantity", &report.quantity)?,
                modified_price: parse_price("price", report.price.as_deref().unwrap_or_default())?,
                event_id,
                timestamp,
            })),
            '0' => Ok(OrderEvent::Working(OrderWorking {
                order_id,
                broker_order_id: BrokerOrderId::new(strip_broker_suffix(&report.broker_order_id)),
                symbol: self.resolve_symbol(&report.symbol_code)?,
                side: parse_side(report.side)?,
                order_type: parse_order_type(report.order_type)?,
                quantity: parse_quantity("quantity", &report.quantity)?,
                price: report
                    .price
                    .as_deref()
                    .map(|p| parse_price("price", p))
                    .transpose()?,
                time_in_force: parse_time_in_force(report.time_in_force)?,
                expire_time: report
                    .expire_time
                    .as_deref()
                    .map(|t| parse_timestamp("expire_time", t))
                    .transpose()?,
                event_id,
                timestamp,
            })),
            '1' => Ok(OrderEvent::PartiallyFilled(OrderPartiallyFilled {
                order_id,
                execution_id: ExecutionId::new(&report.execution_id),
                symbol: self.resolve_symbol(&report.symbol_code)?,
                side: parse_side(report.side)?,
                filled_quantity: parse_quantity("cum_quantity", &report.cum_quantity)?,
                leaves_quantity: parse_quantity("leaves_quantity", &report.leaves_quantity)?,
                average_price: parse_price("average_price", &report.average_price)?,
                execution_time: timestamp,
                event_id,
                timestamp,
            })),
            '2' => Ok(OrderEvent::Filled(OrderFilled {
                order_id,
                execution_id: ExecutionId::new(&report.execution_id),
                symbol: self.resolve_symbol(&report.symbol_code)?,
                side: parse_side(report.side)?,
                filled_quantity: parse_quantity("cum_quantity", &report.cum_quantity)?,
                average_price: parse_price("average_price", &report.average_price)?,
                execution_time: timestamp,
                event_id,
                timestamp,
            })),
            other => Err(TranslateError::UnknownCode {
                field: "order_status",
                code: other,
            }),
        }
    }

    fn translate_cancel_reject(reject: &OrderCancelReject) -> Result<OrderEvent, TranslateError> {
        let response_to = match reject.response_to {
            '1' => "CANCEL",
            '2' => "MODIFY",
            other => {
                return Err(TranslateError::UnknownCode {
                    field: "response_to",
                    code: other,
                });
            }
        };
        Ok(OrderEvent::CancelReject(OrderCancelRejectEvent {
            order_id: OrderId::new(strip_broker_suffix(&reject.order_id)),
            response_to: response_to.to_string(),
            reason: reject.reason.clone(),
            event_id: Uuid::new_v4(),
            timestamp: parse_timestamp("transact_time", &reject.transact_time)?,
        }))
    }

    fn translate_collateral_report(
        report: &CollateralReport,
    ) -> Result<AccountStateEvent, TranslateError> {
        let currency = Currency::parse(&report.currency).map_err(|e| TranslateError::Malformed {
            field: "currency",
            message: e.to_string(),
        })?;
        Ok(AccountStateEvent {
            account_id: AccountId::new(&report.account_id),
            cash_balance: parse_money("cash_balance", &report.cash_balance, currency)?,
            cash_start_day: parse_money("cash_start_day", &report.cash_start_day, currency)?,
            margin_used_maintenance: parse_money(
                "margin_used_maintenance",
                &report.margin_used_maintenance,
                currency,
            )?,
            margin_used_liquidation: parse_money(
                "margin_used_liquidation",
                &report.margin_used_liquidation,
                currency,
            )?,
            margin_ratio: report.margin_ratio.clone(),
            margin_call_status: parse_margin_call_status(&report.margin_call_status)?,
            event_id: Uuid::new_v4(),
            timestamp: parse_timestamp("transact_time", &report.transact_time)?,
        })
    }

    fn translate_market_data(
        &self,
        snapshot: &MarketDataSnapshot,
    ) -> Result<QuoteTick, TranslateError> {
        Ok(QuoteTick {
            symbol: self.resolve_symbol(&snapshot.symbol_code)?,
            bid: parse_price("bid", &snapshot.bid)?,
            ask: parse_price("ask", &snapshot.ask)?,
            bid_size: parse_quantity("bid_size", &snapshot.bid_size)?,
            ask_size: parse_quantity("ask_size", &snapshot.ask_size)?,
            timestamp: parse_timestamp("timestamp", &snapshot.timestamp)?,
        })
    }

    fn translate_security_list(&self, list: &SecurityList) -> Vec<Symbol> {
        list.symbol_codes
            .iter()
            .filter_map(|code| match self.symbol_map.resolve(code) {
                Some(symbol) => Some(symbol),
                None => {
                    warn!(code, "skipping unmapped instrument in security list");
                    None
                }
            })
            .collect()
    }

    fn log_business_reject(reject: &BusinessMessageReject) {
        warn!(
            ref_msg_type = %reject.ref_msg_type,
            reason = %reject.reason,
            text = reject.text.as_deref().unwrap_or(""),
            "business message reject received",
        );
    }

    fn resolve_symbol(&self, code: &str) -> Result<Symbol, TranslateError> {
        self.symbol_map
            .resolve(code)
            .ok_or_else(|| TranslateError::UnknownSymbol {
                code: code.to_string(),
            })
    }
}

fn parse_price(field: &'static str, raw: &str) -> Result<Price, TranslateError> {
    Price::parse(raw).map_err(|e| TranslateError::Malformed {
        field,
        message: e.to_string(),
    })
}

fn parse_quantity(field: &'static str, raw: &str) -> Result<Quantity, TranslateError> {
    Quantity::parse(raw).map_err(|e| TranslateError::Malformed {
        field,
        message: e.to_string(),
    })
}

fn parse_money(
    field: &'static str,
    raw: &str,
    currency: Currency,
) -> Result<Money, TranslateError> {
    Money::parse(raw, currency).map_err(|e| TranslateError::Malformed {
        field,
        message: e.to_string(),
    })
}

fn parse_timestamp(field: &'static str, raw: &str) -> Result<Timestamp, TranslateError> {
    Timestamp::parse(raw).map_err(|e| TranslateError::Malformed {
        field,
        message: e.to_string(),
    })
}

fn parse_side(code: char) -> Result<OrderSide, TranslateError> {
    match code {
        '1' => Ok(OrderSide::Buy),
        '2' => Ok(OrderSide::Sell),
        other => Err(TranslateError::UnknownCode {
            field: "side",
            code: other,
        }),
    }
}

fn parse_order_type(code: char) -> Result<OrderType, TranslateError> {
    match code {
        '1' => Ok(OrderType::Market),
        '2' => Ok(OrderType::Limit),
        '3' => Ok(OrderType::Stop),
        '4' => Ok(OrderType::StopLimit),
        other => Err(TranslateError::UnknownCode {
            field: "order_type",
            code: other,
        }),
    }
}

fn parse_time_in_force(code: char) -> Result<TimeInForce, TranslateError> {
    match code {
        '0' => Ok(TimeInForce::Day),
        '1' => Ok(TimeInForce::Gtc),
        '3' => Ok(TimeInForce::Ioc),
        '4' => Ok(TimeInForce::Fok),
        '6' => Ok(TimeInForce::Gtd),
        other => Err(TranslateError::UnknownCode {
            field: "time_in_force",
            code: other,
        }),
    }
}

fn parse_margin_call_status(code: &str) -> Result<MarginCallStatus, TranslateError> {
    match code {
        "N" => Ok(MarginCallStatus::None),
        "M" => Ok(MarginCallStatus::MarginCall),
        "L" => Ok(MarginCallStatus::LiquidationInProgress),
        other => Err(TranslateError::Malformed {
            field: "margin_call_status",
            message: format!("unrecognized status: {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn translator() -> FixTranslator {
        FixTranslator::new(Arc::new(SymbolMap::new([
            ("AUD/USD".to_string(), Symbol::new("AUDUSD")),
            ("EUR/USD".to_string(), Symbol::new("EURUSD")),
        ])))
    }

    fn execution_report(status: char) -> ExecutionReport {
        ExecutionReport {
            order_id: "O-1_fxcm_01".to_string(),
            broker_order_id: "B-9_fxcm".to_string(),
            execution_id: "E-1".to_string(),
            symbol_code: "AUD/USD".to_string(),
            order_status: status,
            side: '1',
            order_type: '2',
            quantity: "100000".to_string(),
            price: Some("1.20000".to_string()),
            time_in_force: '1',
            expire_time: None,
            cum_quantity: "100000".to_string(),
            leaves_quantity: "0".to_string(),
            average_price: "1.20005".to_string(),
            transact_time: "2020-01-06T12:00:00Z".to_string(),
            text: Some("rejected by dealer".to_string()),
        }
    }

    fn translate_order_event(t: &FixTranslator, report: ExecutionReport) -> OrderEvent {
        match t.translate(&FixMessage::ExecutionReport(report)) {
            Some(TranslatedMessage::Event(Event::Order(event))) => event,
            other => panic!("expected order event, got {other:?}"),
        }
    }

    #[test]
    fn working_report_translates_with_stripped_ids() {
        let event = translate_order_event(&translator(), execution_report('0'));
        let OrderEvent::Working(working) = event else {
            panic!("expected Working");
        };
        assert_eq!(working.order_id.as_str(), "O-1");
        assert_eq!(working.broker_order_id.as_str(), "B-9");
        assert_eq!(working.symbol, Symbol::new("AUDUSD"));
        assert_eq!(working.side, OrderSide::Buy);
        assert_eq!(working.order_type, OrderType::Limit);
        assert_eq!(working.time_in_force, TimeInForce::Gtc);
    }

    #[test]
    fn filled_report_translates() {
        let event = translate_order_event(&translator(), execution_report('2'));
        let OrderEvent::Filled(filled) = event else {
            panic!("expected Filled");
        };
        assert_eq!(filled.filled_quantity.value(), dec!(100000));
        assert_eq!(filled.average_price.value(), dec!(1.20005));
    }

    #[test]
    fn partially_filled_report_translates() {
        let mut report = execution_report('1');
        report.cum_quantity = "40000".to_string();
        report.leaves_quantity = "60000".to_string();
        let event = translate_order_event(&translator(), report);
        let OrderEvent::PartiallyFilled(partial) = event else {
            panic!("expected PartiallyFilled");
        };
        assert_eq!(partial.filled_quantity.value(), dec!(40000));
        assert_eq!(partial.leaves_quantity.value(), dec!(60000));
    }

    #[test]
    fn rejected_report_carries_reason() {
        let event = translate_order_event(&translator(), execution_report('8'));
        let OrderEvent::Rejected(rejected) = event else {
            panic!("expected Rejected");
        };
        assert_eq!(rejected.reason, "rejected by dealer");
    }

    #[test]
    fn unknown_status_is_dropped() {
        let t = translator();
        let report = execution_report('Z');
        assert!(t.translate(&FixMessage::ExecutionReport(report)).is_none());
    }

    #[test]
    fn unknown_symbol_is_dropped() {
        let t = translator();
        let mut report = execution_report('0');
        report.symbol_code = "XAG/USD".to_string();
        assert!(t.translate(&FixMessage::ExecutionReport(report)).is_none());
    }

    #[test]
    fn malformed_decimal_is_dropped() {
        let t = translator();
        let mut report = execution_report('2');
        report.average_price = "not-a-price".to_string();
        assert!(t.translate(&FixMessage::ExecutionReport(report)).is_none());
    }

    #[test]
    fn cancel_reject_translates() {
        let t = translator();
        let message = FixMessage::OrderCancelReject(OrderCancelReject {
            order_id: "O-1_fxcm".to_string(),
            response_to: '1',
            reason: "TOO_LATE_TO_CANCEL".to_string(),
            transact_time: "2020-01-06T12:00:00Z".to_string(),
        });
        let Some(TranslatedMessage::Event(Event::Order(OrderEvent::CancelReject(reject)))) =
            t.translate(&message)
        else {
            panic!("expected CancelReject");
        };
        assert_eq!(reject.order_id.as_str(), "O-1");
        assert_eq!(reject.response_to, "CANCEL");
    }

    #[test]
    fn collateral_report_translates() {
        let t = translator();
        let message = FixMessage::CollateralReport(CollateralReport {
            account_id: "FXCM-123".to_string(),
            currency: "USD".to_string(),
            cash_balance: "100250.75".to_string(),
            cash_start_day: "100000".to_string(),
            margin_used_maintenance: "500".to_string(),
            margin_used_liquidation: "250".to_string(),
            margin_ratio: "0.05".to_string(),
            margin_call_status: "N".to_string(),
            transact_time: "2020-01-06T12:00:00Z".to_string(),
        });
        let Some(TranslatedMessage::Event(Event::AccountState(event))) = t.translate(&message)
        else {
            panic!("expected AccountState");
        };
        assert_eq!(event.cash_balance.value(), dec!(100250.75));
        assert_eq!(event.margin_call_status, MarginCallStatus::None);
    }

    #[test]
    fn market_data_translates_to_quote() {
        let t = translator();
        let message = FixMessage::MarketDataSnapshot(MarketDataSnapshot {
            symbol_code: "EUR/USD".to_string(),
            bid: "1.10000".to_string(),
            ask: "1.10020".to_string(),
            bid_size: "1000000".to_string(),
            ask_size: "1000000".to_string(),
            timestamp: "2020-01-06T12:00:00Z".to_string(),
        });
        let Some(TranslatedMessage::Quote(tick)) = t.translate(&message) else {
            panic!("expected Quote");
        };
        assert_eq!(tick.symbol, Symbol::new("EURUSD"));
        assert_eq!(tick.bid.value(), dec!(1.10000));
    }

    #[test]
    fn security_list_skips_unknown_codes() {
        let t = translator();
        let message = FixMessage::SecurityList(SecurityList {
            symbol_codes: vec![
                "AUD/USD".to_string(),
                "XAG/USD".to_string(),
                "EUR/USD".to_string(),
            ],
        });
        let Some(TranslatedMessage::Instruments(symbols)) = t.translate(&message) else {
            panic!("expected Instruments");
        };
        assert_eq!(symbols, vec![Symbol::new("AUDUSD"), Symbol::new("EURUSD")]);
    }

    #[test]
    fn business_reject_produces_nothing() {
        let t = translator();
        let message = FixMessage::BusinessMessageReject(BusinessMessageReject {
            ref_msg_type: "D".to_string(),
            reason: "3".to_string(),
            text: None,
        });
        assert!(t.translate(&message).is_none());
    }
}
