//! Bracket (atomic) orders: entry plus linked protective orders.

use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::order::Order;
use super::types::OrderType;
use crate::domain::shared::OrderId;

/// An entry order plus its stop-loss and optional take-profit, submitted
/// and tracked as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketOrder {
    entry: Order,
    stop_loss: Order,
    take_profit: Option<Order>,
}

impl BracketOrder {
    /// Assemble a bracket order.
    ///
    /// # Errors
    ///
    /// Returns an error if the constituents are inconsistent: duplicate
    /// order ids, mixed symbols, protective orders on the entry's side,
    /// mismatched quantities, or a stop-loss that is not a stop order.
    pub fn new(
        entry: Order,
        stop_loss: Order,
        take_profit: Option<Order>,
    ) -> Result<Self, OrderError> {
        let mut ids = vec![entry.order_id(), stop_loss.order_id()];
        if let Some(tp) = &take_profit {
            ids.push(tp.order_id());
        }
        for (i, id) in ids.iter().enumerate() {
            if ids[i + 1..].contains(id) {
                return Err(OrderError::InvalidParameters {
                    field: "order_id".to_string(),
                    message: format!("duplicate order id in bracket: {id}"),
                });
            }
        }

        for (name, order) in [("stop_loss", Some(&stop_loss)), ("take_profit", take_profit.as_ref())]
        {
            let Some(order) = order else { continue };
            if order.symbol() != entry.symbol() {
                return Err(OrderError::InvalidParameters {
                    field: name.to_string(),
                    message: format!(
                        "symbol {} does not match entry symbol {}",
                        order.symbol(),
                        entry.symbol()
                    ),
                });
            }
            if order.side() != entry.side().opposite() {
                return Err(OrderError::InvalidParameters {
                    field: name.to_string(),
                    message: "protective orders must be on the opposite side of the entry"
                        .to_string(),
                });
            }
            if order.quantity() != entry.quantity() {
                return Err(OrderError::InvalidParameters {
                    field: name.to_string(),
                    message: "protective order quantity must match the entry quantity".to_string(),
                });
            }
        }

        if !matches!(stop_loss.order_type(), OrderType::Stop | OrderType::StopLimit) {
            return Err(OrderError::InvalidParameters {
                field: "stop_loss".to_string(),
                message: "stop-loss must be a stop or stop-limit order".to_string(),
            });
        }

        Ok(Self {
            entry,
            stop_loss,
            take_profit,
        })
    }

    /// The entry order.
    #[must_use]
    pub const fn entry(&self) -> &Order {
        &self.entry
    }

    /// The stop-loss order.
    #[must_use]
    pub const fn stop_loss(&self) -> &Order {
        &self.stop_loss
    }

    /// The take-profit order, if any.
    #[must_use]
    pub const fn take_profit(&self) -> Option<&Order> {
        self.take_profit.as_ref()
    }

    /// All constituent order ids, entry first.
    #[must_use]
    pub fn order_ids(&self) -> Vec<&OrderId> {
        let mut ids = vec![self.entry.order_id(), self.stop_loss.order_id()];
        if let Some(tp) = &self.take_profit {
            ids.push(tp.order_id());
        }
        ids
    }

    /// All constituent orders, entry first.
    #[must_use]
    pub fn orders(&self) -> Vec<&Order> {
        let mut orders = vec![&self.entry, &self.stop_loss];
        if let Some(tp) = &self.take_profit {
            orders.push(tp);
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::order::OrderParams;
    use crate::domain::order::types::{OrderSide, TimeInForce};
    use crate::domain::shared::{Price, Quantity, Symbol, Timestamp};

    fn order(id: &str, side: OrderSide, order_type: OrderType, px: Option<&str>) -> Order {
        Order::new(OrderParams {
            order_id: OrderId::new(id),
            symbol: Symbol::new("AUDUSD"),
            side,
            order_type,
            quantity: Quantity::from_units(100),
            price: px.map(|p| Price::parse(p).unwrap()),
            time_in_force: TimeInForce::Gtc,
            expire_time: None,
            init_time: Timestamp::now(),
        })
        .unwrap()
    }

    #[test]
    fn valid_bracket() {
        let bracket = BracketOrder::new(
            order("O-1", OrderSide::Buy, OrderType::Market, None),
            order("O-2", OrderSide::Sell, OrderType::Stop, Some("1.1900")),
            Some(order("O-3", OrderSide::Sell, OrderType::Limit, Some("1.2100"))),
        )
        .unwrap();
        assert_eq!(bracket.order_ids().len(), 3);
        assert_eq!(bracket.orders().len(), 3);
    }

    #[test]
    fn bracket_without_take_profit() {
        let bracket = BracketOrder::new(
            order("O-1", OrderSide::Buy, OrderType::Market, None),
            order("O-2", OrderSide::Sell, OrderType::Stop, Some("1.1900")),
            None,
        )
        .unwrap();
        assert_eq!(bracket.order_ids().len(), 2);
        assert!(bracket.take_profit().is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = BracketOrder::new(
            order("O-1", OrderSide::Buy, OrderType::Market, None),
            order("O-1", OrderSide::Sell, OrderType::Stop, Some("1.1900")),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn stop_loss_on_entry_side_rejected() {
        let result = BracketOrder::new(
            order("O-1", OrderSide::Buy, OrderType::Market, None),
            order("O-2", OrderSide::Buy, OrderType::Stop, Some("1.1900")),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn stop_loss_must_be_stop_order() {
        let result = BracketOrder::new(
            order("O-1", OrderSide::Buy, OrderType::Market, None),
            order("O-2", OrderSide::Sell, OrderType::Limit, Some("1.1900")),
            None,
        );
        assert!(result.is_err());
    }
}
