//! Order aggregate root.
//!
//! The order enforces the legal transition table internally: events are
//! applied in the sequence the gateway produced them, illegal events are
//! rejected without mutating state, and terminal states absorb everything.

use serde::{Deserialize, Serialize};

use super::errors::OrderError;
use super::events::OrderEvent;
use super::state::OrderState;
use super::types::{OrderSide, OrderType, TimeInForce};
use crate::domain::shared::{BrokerOrderId, OrderId, Price, Quantity, Symbol, Timestamp};

/// Parameters for initializing a new order.
#[derive(Debug, Clone)]
pub struct OrderParams {
    /// System-assigned order ID.
    pub order_id: OrderId,
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Side.
    pub side: OrderSide,
    /// Order type.
    pub order_type: OrderType,
    /// Quantity to trade.
    pub quantity: Quantity,
    /// Price (required for all non-market types).
    pub price: Option<Price>,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Expiry (required for GTD).
    pub expire_time: Option<Timestamp>,
    /// Initialization timestamp.
    pub init_time: Timestamp,
}

/// Order aggregate root.
// `order_type` follows FIX terminology (tag 40 OrdType).
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    symbol: Symbol,
    side: OrderSide,
    order_type: OrderType,
    quantity: Quantity,
    price: Option<Price>,
    time_in_force: TimeInForce,
    expire_time: Option<Timestamp>,
    state: OrderState,
    filled_quantity: Quantity,
    average_price: Option<Price>,
    broker_order_id: Option<BrokerOrderId>,
    init_time: Timestamp,
    last_event_time: Timestamp,
    event_count: usize,
}

impl Order {
    /// Initialize a new order.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are inconsistent: zero quantity,
    /// missing price for a priced order type, or missing expiry for GTD.
    pub fn new(params: OrderParams) -> Result<Self, OrderError> {
        params.symbol.validate()?;
        if !params.quantity.is_positive() {
            return Err(OrderError::InvalidParameters {
                field: "quantity".to_string(),
                message: "order quantity must be positive".to_string(),
            });
        }
        if params.order_type.requires_price() && params.price.is_none() {
            return Err(OrderError::InvalidParameters {
                field: "price".to_string(),
                message: format!("price required for {} orders", params.order_type),
            });
        }
        if params.order_type == OrderType::Market && params.price.is_some() {
            return Err(OrderError::InvalidParameters {
                field: "price".to_string(),
                message: "market orders cannot carry a price".to_string(),
            });
        }
        if params.time_in_force == TimeInForce::Gtd && params.expire_time.is_none() {
            return Err(OrderError::InvalidParameters {
                field: "expire_time".to_string(),
                message: "expire time required for GTD orders".to_string(),
            });
        }

        Ok(Self {
            order_id: params.order_id,
            symbol: params.symbol,
            side: params.side,
            order_type: params.order_type,
            quantity: params.quantity,
            price: params.price,
            time_in_force: params.time_in_force,
            expire_time: params.expire_time,
            state: OrderState::Initialized,
            filled_quantity: Quantity::ZERO,
            average_price: None,
            broker_order_id: None,
            init_time: params.init_time,
            last_event_time: params.init_time,
            event_count: 0,
        })
    }

    /// Order ID. Never changes.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Order type.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Current working quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Current price, if the order type has one.
    #[must_use]
    pub const fn price(&self) -> Option<Price> {
        self.price
    }

    /// Time in force.
    #[must_use]
    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Expiry time, for GTD orders.
    #[must_use]
    pub const fn expire_time(&self) -> Option<Timestamp> {
        self.expire_time
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> OrderState {
        self.state
    }

    /// Cumulative filled quantity.
    #[must_use]
    pub const fn filled_quantity(&self) -> Quantity {
        self.filled_quantity
    }

    /// Average fill price, once any fill has arrived.
    #[must_use]
    pub const fn average_price(&self) -> Option<Price> {
        self.average_price
    }

    /// Broker order ID, assigned once accepted.
    #[must_use]
    pub const fn broker_order_id(&self) -> Option<&BrokerOrderId> {
        self.broker_order_id.as_ref()
    }

    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns true if the order is working in the market.
    #[must_use]
    pub const fn is_working(&self) -> bool {
        self.state.is_working()
    }

    /// Number of events applied so far.
    #[must_use]
    pub const fn event_count(&self) -> usize {
        self.event_count
    }

    /// Apply an order event.
    ///
    /// Legal events mutate the order and advance its state. Cancel-reject
    /// events are recorded without a state change.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] for events illegal in the
    /// current state (including anything after a terminal state), leaving
    /// the order untouched; [`OrderError::OverFill`] if a fill would exceed
    /// the order quantity.
    pub fn apply(&mut self, event: &OrderEvent) -> Result<(), OrderError> {
        // Informational: no state transition.
        if let OrderEvent::CancelReject(e) = event {
            self.event_count += 1;
            self.last_event_time = e.timestamp;
            return Ok(());
        }

        let target = match event {
            OrderEvent::Submitted(_) => OrderState::Submitted,
            OrderEvent::Accepted(_) => OrderState::Accepted,
            OrderEvent::Working(_) | OrderEvent::Modified(_) => OrderState::Working,
            OrderEvent::Cancelled(_) => OrderState::Cancelled,
            OrderEvent::Expired(_) => OrderState::Expired,
            OrderEvent::PartiallyFilled(_) => OrderState::PartiallyFilled,
            OrderEvent::Filled(_) => OrderState::Filled,
            OrderEvent::Rejected(_) | OrderEvent::Denied(_) | OrderEvent::Invalid(_) => {
                OrderState::Rejected
            }
            OrderEvent::CancelReject(_) => unreachable!("handled above"),
        };

        if !self.state.can_transition_to(target) {
            return Err(OrderError::InvalidTransition {
                order_id: self.order_id.clone(),
                from: self.state,
                event: event.event_type(),
            });
        }

        match event {
            OrderEvent::Accepted(e) => {
                self.broker_order_id = Some(e.broker_order_id.clone());
            }
            OrderEvent::Working(e) => {
                self.broker_order_id = Some(e.broker_order_id.clone());
            }
            OrderEvent::Modified(e) => {
                self.quantity = e.modified_quantity;
                self.price = Some(e.modified_price);
            }
            OrderEvent::PartiallyFilled(e) => {
                if e.filled_quantity > self.quantity {
                    return Err(self.over_fill(e.filled_quantity));
                }
                self.filled_quantity = e.filled_quantity;
                self.average_price = Some(e.average_price);
            }
            OrderEvent::Filled(e) => {
                if e.filled_quantity > self.quantity {
                    return Err(self.over_fill(e.filled_quantity));
                }
                self.filled_quantity = e.filled_quantity;
                self.average_price = Some(e.average_price);
            }
            _ => {}
        }

        self.state = target;
        self.event_count += 1;
        self.last_event_time = event.timestamp();
        Ok(())
    }

    fn over_fill(&self, filled: Quantity) -> OrderError {
        OrderError::OverFill {
            order_id: self.order_id.clone(),
            filled: filled.to_string(),
            quantity: self.quantity.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::events::{
        OrderAccepted, OrderCancelReject, OrderCancelled, OrderFilled, OrderPartiallyFilled,
        OrderSubmitted, OrderWorking,
    };
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn market_order(qty: u64) -> Order {
        Order::new(OrderParams {
            order_id: OrderId::new("O-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: Quantity::from_units(qty),
            price: None,
            time_in_force: TimeInForce::Day,
            expire_time: None,
            init_time: Timestamp::now(),
        })
        .unwrap()
    }

    fn submitted(order: &Order) -> OrderEvent {
        OrderEvent::Submitted(OrderSubmitted {
            order_id: order.order_id().clone(),
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })
    }

    fn accepted(order: &Order) -> OrderEvent {
        OrderEvent::Accepted(OrderAccepted {
            order_id: order.order_id().clone(),
            broker_order_id: BrokerOrderId::new("B-1"),
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })
    }

    fn working(order: &Order) -> OrderEvent {
        OrderEvent::Working(OrderWorking {
            order_id: order.order_id().clone(),
            broker_order_id: BrokerOrderId::new("B-1"),
            symbol: order.symbol().clone(),
            side: order.side(),
            order_type: order.order_type(),
            quantity: order.quantity(),
            price: order.price(),
            time_in_force: order.time_in_force(),
            expire_time: None,
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })
    }

    fn filled(order: &Order, qty: u64, px: &str) -> OrderEvent {
        OrderEvent::Filled(OrderFilled {
            order_id: order.order_id().clone(),
            execution_id: ExecutionId::new("E-1"),
            symbol: order.symbol().clone(),
            side: order.side(),
            filled_quantity: Quantity::from_units(qty),
            average_price: Price::parse(px).unwrap(),
            execution_time: Timestamp::now(),
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })
    }

    use crate::domain::shared::ExecutionId;

    #[test]
    fn new_market_order_is_initialized() {
        let order = market_order(100);
        assert_eq!(order.state(), OrderState::Initialized);
        assert!(order.filled_quantity().is_zero());
        assert!(order.broker_order_id().is_none());
    }

    #[test]
    fn limit_order_requires_price() {
        let result = Order::new(OrderParams {
            order_id: OrderId::new("O-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            order_type: OrderType::Limit,
            quantity: Quantity::from_units(100),
            price: None,
            time_in_force: TimeInForce::Day,
            expire_time: None,
            init_time: Timestamp::now(),
        });
        assert!(matches!(result, Err(OrderError::InvalidParameters { .. })));
    }

    #[test]
    fn gtd_requires_expire_time() {
        let result = Order::new(OrderParams {
            order_id: OrderId::new("O-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Sell,
            order_type: OrderType::Limit,
            quantity: Quantity::from_units(100),
            price: Some(Price::parse("1.20000").unwrap()),
            time_in_force: TimeInForce::Gtd,
            expire_time: None,
            init_time: Timestamp::now(),
        });
        assert!(matches!(result, Err(OrderError::InvalidParameters { .. })));
    }

    #[test]
    fn zero_quantity_rejected() {
        let result = Order::new(OrderParams {
            order_id: OrderId::new("O-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: Quantity::ZERO,
            price: None,
            time_in_force: TimeInForce::Day,
            expire_time: None,
            init_time: Timestamp::now(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn happy_path_to_filled() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&accepted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();
        order.apply(&filled(&order, 100, "1.20000")).unwrap();

        assert_eq!(order.state(), OrderState::Filled);
        assert_eq!(order.filled_quantity(), Quantity::from_units(100));
        assert_eq!(order.average_price().unwrap().value(), dec!(1.20000));
        assert!(order.is_terminal());
    }

    #[test]
    fn accepted_assigns_broker_order_id() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&accepted(&order)).unwrap();
        assert_eq!(order.broker_order_id().unwrap().as_str(), "B-1");
    }

    #[test]
    fn partial_then_full_fill() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();

        order
            .apply(&OrderEvent::PartiallyFilled(OrderPartiallyFilled {
                order_id: order.order_id().clone(),
                execution_id: ExecutionId::new("E-1"),
                symbol: order.symbol().clone(),
                side: order.side(),
                filled_quantity: Quantity::from_units(40),
                leaves_quantity: Quantity::from_units(60),
                average_price: Price::parse("1.2").unwrap(),
                execution_time: Timestamp::now(),
                event_id: Uuid::new_v4(),
                timestamp: Timestamp::now(),
            }))
            .unwrap();
        assert_eq!(order.state(), OrderState::PartiallyFilled);
        assert_eq!(order.filled_quantity(), Quantity::from_units(40));

        order.apply(&filled(&order, 100, "1.2001")).unwrap();
        assert_eq!(order.state(), OrderState::Filled);
    }

    #[test]
    fn terminal_state_absorbs_events() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();
        order.apply(&filled(&order, 100, "1.2")).unwrap();

        let before = order.clone();
        let result = order.apply(&working(&order));
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        assert_eq!(order, before, "illegal event must not mutate the order");
    }

    #[test]
    fn fill_event_straight_from_initialized_is_illegal() {
        let mut order = market_order(100);
        let result = order.apply(&filled(&order, 100, "1.2"));
        assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));
        assert_eq!(order.state(), OrderState::Initialized);
    }

    #[test]
    fn over_fill_rejected() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();
        let result = order.apply(&filled(&order, 150, "1.2"));
        assert!(matches!(result, Err(OrderError::OverFill { .. })));
        assert_eq!(order.state(), OrderState::Working);
    }

    #[test]
    fn cancel_reject_keeps_state() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();

        order
            .apply(&OrderEvent::CancelReject(OrderCancelReject {
                order_id: order.order_id().clone(),
                response_to: "CANCEL".to_string(),
                reason: "TOO_LATE".to_string(),
                event_id: Uuid::new_v4(),
                timestamp: Timestamp::now(),
            }))
            .unwrap();
        assert_eq!(order.state(), OrderState::Working);
    }

    #[test]
    fn modify_updates_price_and_quantity() {
        let mut order = Order::new(OrderParams {
            order_id: OrderId::new("O-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            order_type: OrderType::Limit,
            quantity: Quantity::from_units(100),
            price: Some(Price::parse("1.19000").unwrap()),
            time_in_force: TimeInForce::Gtc,
            expire_time: None,
            init_time: Timestamp::now(),
        })
        .unwrap();
        order.apply(&submitted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();

        order
            .apply(&OrderEvent::Modified(crate::domain::order::events::OrderModified {
                order_id: order.order_id().clone(),
                broker_order_id: BrokerOrderId::new("B-1"),
                modified_quantity: Quantity::from_units(50),
                modified_price: Price::parse("1.19500").unwrap(),
                event_id: Uuid::new_v4(),
                timestamp: Timestamp::now(),
            }))
            .unwrap();

        assert_eq!(order.state(), OrderState::Working);
        assert_eq!(order.quantity(), Quantity::from_units(50));
        assert_eq!(order.price().unwrap().value(), dec!(1.19500));
    }

    #[test]
    fn cancelled_from_working() {
        let mut order = market_order(100);
        order.apply(&submitted(&order)).unwrap();
        order.apply(&working(&order)).unwrap();
        order
            .apply(&OrderEvent::Cancelled(OrderCancelled {
                order_id: order.order_id().clone(),
                event_id: Uuid::new_v4(),
                timestamp: Timestamp::now(),
            }))
            .unwrap();
        assert_eq!(order.state(), OrderState::Cancelled);
    }
}
