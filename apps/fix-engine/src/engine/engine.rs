//! Command/event orchestration.
//!
//! The engine owns the execution database and processes one message at
//! a time: commands are validated and deduplicated before reaching the
//! gateway, inbound events are applied to aggregates and persisted,
//! and every applied event is republished in processing order.
//!
//! Nothing here returns an error to the caller. Per the error taxonomy,
//! duplicate commands, stale events and invalid transitions are local
//! no-ops with a logged reason; only programming bugs would surface as
//! database errors, and those are logged at error severity.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::database::{ExecutionDatabase, OrderIdentity};
use super::gateway::TradingGateway;
use super::publisher::EventPublisher;
use crate::domain::events::Event;
use crate::domain::order::events::OrderSubmitted;
use crate::domain::order::{
    CancelOrder, ModifyOrder, Order, OrderEvent, SubmitBracketOrder, SubmitOrder, TradingCommand,
};
use crate::domain::position::{Position, PositionFill};
use crate::domain::shared::{OrderId, Quantity, Timestamp};

/// Where an accepted modify currently stands.
#[derive(Debug, Clone)]
enum ModifyState {
    /// Sent to the gateway; awaiting the broker's OrderModified.
    InFlight,
    /// Held until the order goes Working or the in-flight modify
    /// resolves. At most one is retained; a newer one replaces it.
    Buffered(ModifyOrder),
    /// In flight, with the next modify already waiting.
    InFlightWithNext(ModifyOrder),
}

/// Processing counters, reported on shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineCounters {
    /// Commands processed, including no-ops.
    pub commands: u64,
    /// Events applied and republished.
    pub events_applied: u64,
    /// Duplicate submissions absorbed.
    pub duplicate_commands: u64,
    /// Events dropped (unknown order, illegal transition).
    pub events_dropped: u64,
}

/// The execution engine. Single-threaded by construction: the runner
/// feeds it one message at a time, so no aggregate is ever mutated
/// concurrently.
pub struct ExecutionEngine {
    database: ExecutionDatabase,
    gateway: Arc<dyn TradingGateway>,
    publisher: Box<dyn EventPublisher>,
    modifies: HashMap<OrderId, ModifyState>,
    counters: EngineCounters,
}

impl ExecutionEngine {
    /// Create an engine over a gateway and publisher, with an empty
    /// database.
    #[must_use]
    pub fn new(gateway: Arc<dyn TradingGateway>, publisher: Box<dyn EventPublisher>) -> Self {
        Self {
            database: ExecutionDatabase::new(),
            gateway,
            publisher,
            modifies: HashMap::new(),
            counters: EngineCounters::default(),
        }
    }

    /// Query surface over the engine's state.
    #[must_use]
    pub const fn database(&self) -> &ExecutionDatabase {
        &self.database
    }

    /// Processing counters so far.
    #[must_use]
    pub const fn counters(&self) -> EngineCounters {
        self.counters
    }

    // ------------------------------------------------------------ commands

    /// Process one trading command.
    pub fn execute(&mut self, command: TradingCommand) {
        self.counters.commands += 1;
        match command {
            TradingCommand::SubmitOrder(cmd) => self.handle_submit(cmd),
            TradingCommand::SubmitBracketOrder(cmd) => self.handle_submit_bracket(cmd),
            TradingCommand::CancelOrder(cmd) => self.handle_cancel(cmd),
            TradingCommand::ModifyOrder(cmd) => self.handle_modify(cmd),
            TradingCommand::AccountInquiry(cmd) => {
                if let Err(e) = self.gateway.account_inquiry(&cmd.account_id) {
                    error!(account_id = %cmd.account_id, error = %e, "account inquiry failed");
                }
            }
        }
    }

    fn handle_submit(&mut self, cmd: SubmitOrder) {
        let order_id = cmd.order.order_id().clone();
        if self.database.order(&order_id).is_some() {
            self.counters.duplicate_commands += 1;
            info!(%order_id, "duplicate submission absorbed");
            return;
        }
        let identity = OrderIdentity {
            trader_id: cmd.trader_id,
            account_id: cmd.account_id,
            strategy_id: cmd.strategy_id,
            position_id: cmd.position_id,
        };
        if let Err(e) = self.database.add_order(cmd.order.clone(), identity) {
            error!(%order_id, error = %e, "failed to store order");
            return;
        }
        if let Err(e) = self.gateway.submit_order(&cmd.order) {
            error!(%order_id, error = %e, "gateway submission failed");
            return;
        }
        self.apply_order_event(&OrderEvent::Submitted(OrderSubmitted {
            order_id,
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        }));
    }

    fn handle_submit_bracket(&mut self, cmd: SubmitBracketOrder) {
        let order_ids: Vec<OrderId> = cmd.bracket.order_ids().into_iter().cloned().collect();
        if order_ids
            .iter()
            .any(|id| self.database.order(id).is_some())
        {
            self.counters.duplicate_commands += 1;
            info!(entry_id = %order_ids[0], "duplicate bracket submission absorbed");
            return;
        }
        let identity = OrderIdentity {
            trader_id: cmd.trader_id,
            account_id: cmd.account_id,
            strategy_id: cmd.strategy_id,
            position_id: cmd.position_id,
        };
        if let Err(e) = self.database.add_bracket_order(&cmd.bracket, identity) {
            error!(entry_id = %order_ids[0], error = %e, "failed to store bracket");
            return;
        }
        if let Err(e) = self.gateway.submit_bracket_order(&cmd.bracket) {
            error!(entry_id = %order_ids[0], error = %e, "gateway submission failed");
            return;
        }
        for order_id in order_ids {
            self.apply_order_event(&OrderEvent::Submitted(OrderSubmitted {
                order_id,
                event_id: Uuid::new_v4(),
                timestamp: Timestamp::now(),
            }));
        }
    }

    fn handle_cancel(&mut self, cmd: CancelOrder) {
        let Some(order) = self.database.order(&cmd.order_id) else {
            warn!(order_id = %cmd.order_id, "cancel for unknown order dropped");
            return;
        };
        if order.is_terminal() {
            info!(
                order_id = %cmd.order_id,
                state = %order.state(),
                "cancel for terminal order dropped",
            );
            return;
        }
        if let Err(e) = self.gateway.cancel_order(order, &cmd.reason) {
            error!(order_id = %cmd.order_id, error = %e, "gateway cancel failed");
        }
    }

    fn handle_modify(&mut self, cmd: ModifyOrder) {
        let Some(order) = self.database.order(&cmd.order_id) else {
            warn!(order_id = %cmd.order_id, "modify for unknown order dropped");
            return;
        };
        if order.is_terminal() {
            info!(
                order_id = %cmd.order_id,
                state = %order.state(),
                "modify for terminal order dropped",
            );
            return;
        }
        if !order.is_working() {
            // Broker has not acknowledged yet; hold the modify and
            // replay it when OrderWorking arrives. Latest wins.
            debug!(order_id = %cmd.order_id, "buffering modify until order is working");
            self.modifies
                .insert(cmd.order_id.clone(), ModifyState::Buffered(cmd));
            return;
        }
        match self.modifies.get(&cmd.order_id) {
            Some(ModifyState::InFlight | ModifyState::InFlightWithNext(_)) => {
                debug!(order_id = %cmd.order_id, "modify already in flight; holding");
                self.modifies
                    .insert(cmd.order_id.clone(), ModifyState::InFlightWithNext(cmd));
            }
            Some(ModifyState::Buffered(_)) | None => self.forward_modify(cmd),
        }
    }

    fn forward_modify(&mut self, cmd: ModifyOrder) {
        let Some(order) = self.database.order(&cmd.order_id) else {
            return;
        };
        match self
            .gateway
            .modify_order(order, cmd.modified_quantity, cmd.modified_price)
        {
            Ok(()) => {
                self.modifies
                    .insert(cmd.order_id.clone(), ModifyState::InFlight);
            }
            Err(e) => {
                error!(order_id = %cmd.order_id, error = %e, "gateway modify failed");
                self.modifies.remove(&cmd.order_id);
            }
        }
    }

    // -------------------------------------------------------------- events

    /// Apply one inbound event and republish it.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Order(order_event) => self.apply_order_event(&order_event),
            Event::AccountState(account_event) => {
                let account = match self.database.account(&account_event.account_id) {
                    Some(existing) => {
                        let mut account = existing.clone();
                        account.apply(&account_event);
                        account
                    }
                    None => crate::domain::account::Account::from_event(&account_event),
                };
                self.database.upsert_account(account);
                self.counters.events_applied += 1;
                self.publisher.publish(Event::AccountState(account_event));
            }
            other => {
                // Market open/close and bar events carry no engine
                // state; pass them straight through to subscribers.
                self.counters.events_applied += 1;
                self.publisher.publish(other);
            }
        }
    }

    fn apply_order_event(&mut self, event: &OrderEvent) {
        let order_id = event.order_id().clone();
        let Some(existing) = self.database.order(&order_id) else {
            warn!(%order_id, event_type = event.event_type(), "event for unknown order dropped");
            self.counters.events_dropped += 1;
            return;
        };

        let filled_before = existing.filled_quantity();
        let mut order = existing.clone();
        if let Err(e) = order.apply(event) {
            warn!(%order_id, event_type = event.event_type(), error = %e, "event dropped");
            self.counters.events_dropped += 1;
            return;
        }
        let filled_after = order.filled_quantity();
        let side = order.side();
        let terminal = order.is_terminal();

        if let Err(e) = self.database.update_order(order) {
            error!(%order_id, error = %e, "failed to persist order");
            return;
        }

        match event {
            OrderEvent::PartiallyFilled(fill) => {
                self.apply_fill(
                    &order_id,
                    filled_before,
                    filled_after,
                    PositionFill {
                        side,
                        quantity: Quantity::ZERO,
                        price: fill.average_price,
                        timestamp: fill.execution_time,
                    },
                );
            }
            OrderEvent::Filled(fill) => {
                self.apply_fill(
                    &order_id,
                    filled_before,
                    filled_after,
                    PositionFill {
                        side,
                        quantity: Quantity::ZERO,
                        price: fill.average_price,
                        timestamp: fill.execution_time,
                    },
                );
            }
            OrderEvent::Working(_) => self.replay_buffered_modify(&order_id),
            OrderEvent::Modified(_) => self.resolve_in_flight_modify(&order_id),
            OrderEvent::CancelReject(reject) if reject.response_to == "MODIFY" => {
                self.resolve_in_flight_modify(&order_id);
            }
            _ => {}
        }
        if terminal {
            self.modifies.remove(&order_id);
        }

        self.counters.events_applied += 1;
        self.publisher.publish(Event::Order(event.clone()));
    }

    /// Open or grow the position behind a fill. The fill events carry
    /// cumulative quantities; the position needs the increment.
    fn apply_fill(
        &mut self,
        order_id: &OrderId,
        filled_before: Quantity,
        filled_after: Quantity,
        template: PositionFill,
    ) {
        let delta = filled_after.value() - filled_before.value();
        if delta <= rust_decimal::Decimal::ZERO {
            warn!(%order_id, "fill with no quantity increment; position unchanged");
            return;
        }
        let quantity = match Quantity::new(delta, filled_after.precision()) {
            Ok(quantity) => quantity,
            Err(e) => {
                error!(%order_id, error = %e, "unrepresentable fill increment");
                return;
            }
        };
        let fill = PositionFill {
            quantity,
            ..template
        };

        let Some(position_id) = self.database.position_id(order_id).cloned() else {
            error!(%order_id, "no position id indexed for filled order");
            return;
        };
        match self.database.position(&position_id) {
            Some(existing) => {
                let mut position = existing.clone();
                position.apply_fill(&fill);
                if let Err(e) = self.database.update_position(position) {
                    error!(%position_id, error = %e, "failed to persist position");
                }
            }
            None => {
                let Some(order) = self.database.order(order_id) else {
                    return;
                };
                let symbol = order.symbol().clone();
                let (Some(trader_id), Some(strategy_id)) = (
                    self.database.trader_id(order_id).cloned(),
                    self.database.strategy_id(order_id).cloned(),
                ) else {
                    error!(%order_id, "no identity indexed for filled order");
                    return;
                };
                let position = Position::open(position_id.clone(), symbol, &fill);
                if let Err(e) = self.database.add_position(position, trader_id, strategy_id) {
                    error!(%position_id, error = %e, "failed to open position");
                }
            }
        }
    }

    fn replay_buffered_modify(&mut self, order_id: &OrderId) {
        if let Some(ModifyState::Buffered(cmd)) = self.modifies.remove(order_id) {
            debug!(%order_id, "replaying buffered modify");
            self.forward_modify(cmd);
        }
    }

    fn resolve_in_flight_modify(&mut self, order_id: &OrderId) {
        match self.modifies.remove(order_id) {
            Some(ModifyState::InFlightWithNext(cmd)) => {
                debug!(%order_id, "forwarding next held modify");
                self.forward_modify(cmd);
            }
            Some(ModifyState::Buffered(cmd)) => {
                self.modifies
                    .insert(order_id.clone(), ModifyState::Buffered(cmd));
            }
            Some(ModifyState::InFlight) | None => {}
        }
    }
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::events::{
        OrderFilled, OrderModified, OrderPartiallyFilled, OrderWorking,
    };
    use crate::domain::order::{OrderParams, OrderSide, OrderState, OrderType, TimeInForce};
    use crate::domain::shared::{
        AccountId, ExecutionId, Price, PositionId, StrategyId, Symbol, TraderId,
    };
    use crate::engine::gateway::{GatewayCall, RecordingGateway};
    use crate::engine::publisher::NoOpPublisher;
    use rust_decimal_macros::dec;

    fn engine() -> (Arc<RecordingGateway>, ExecutionEngine) {
        let gateway = Arc::new(RecordingGateway::new());
        let engine = ExecutionEngine::new(gateway.clone(), Box::new(NoOpPublisher));
        (gateway, engine)
    }

    fn order(id: &str, order_type: OrderType, price: Option<&str>) -> Order {
        Order::new(OrderParams {
            order_id: OrderId::new(id),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            order_type,
            quantity: Quantity::from_units(100),
            price: price.map(|p| Price::parse(p).unwrap()),
            time_in_force: TimeInForce::Gtc,
            expire_time: None,
            init_time: Timestamp::now(),
        })
        .unwrap()
    }

    fn submit(id: &str) -> TradingCommand {
        TradingCommand::SubmitOrder(SubmitOrder {
            trader_id: TraderId::new("TESTER-000"),
            account_id: AccountId::new("FXCM-123"),
            strategy_id: StrategyId::new("S-1"),
            position_id: PositionId::new("P-1"),
            order: order(id, OrderType::Market, None),
            command_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })
    }

    fn working_event(id: &str) -> Event {
        Event::Order(OrderEvent::Working(OrderWorking {
            order_id: OrderId::new(id),
            broker_order_id: crate::domain::shared::BrokerOrderId::new("B-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            quantity: Quantity::from_units(100),
            price: None,
            time_in_force: TimeInForce::Gtc,
            expire_time: None,
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        }))
    }

    fn filled_event(id: &str, cum: u64, price: &str) -> Event {
        Event::Order(OrderEvent::Filled(OrderFilled {
            order_id: OrderId::new(id),
            execution_id: ExecutionId::new("E-1"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Buy,
            filled_quantity: Quantity::from_units(cum),
            average_price: Price::parse(price).unwrap(),
            execution_time: Timestamp::now(),
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        }))
    }

    fn modify(id: &str, qty: u64, price: &str) -> TradingCommand {
        TradingCommand::ModifyOrder(ModifyOrder {
            trader_id: TraderId::new("TESTER-000"),
            order_id: OrderId::new(id),
            modified_quantity: Quantity::from_units(qty),
            modified_price: Price::parse(price).unwrap(),
            command_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })
    }

    #[test]
    fn duplicate_submission_forwards_once() {
        let (gateway, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.execute(submit("O-1"));
        assert_eq!(engine.database().order_count(), 1);
        assert_eq!(gateway.calls().len(), 1);
        assert_eq!(engine.counters().duplicate_commands, 1);
    }

    #[test]
    fn submission_transitions_to_submitted() {
        let (_, mut engine) = engine();
        engine.execute(submit("O-1"));
        let order = engine.database().order(&OrderId::new("O-1")).unwrap();
        assert_eq!(order.state(), OrderState::Submitted);
    }

    #[test]
    fn fill_opens_position_with_net_quantity() {
        let (_, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.apply(working_event("O-1"));
        engine.apply(filled_event("O-1", 100, "1.2000"));

        let position = engine.database().position(&PositionId::new("P-1")).unwrap();
        assert_eq!(position.net_quantity(), dec!(100));
        assert_eq!(position.average_entry_price().unwrap(), dec!(1.2000));
        let order = engine.database().order(&OrderId::new("O-1")).unwrap();
        assert_eq!(order.state(), OrderState::Filled);
    }

    #[test]
    fn partial_fills_increment_position_by_delta() {
        let (_, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.apply(working_event("O-1"));
        engine.apply(Event::Order(OrderEvent::PartiallyFilled(
            OrderPartiallyFilled {
                order_id: OrderId::new("O-1"),
                execution_id: ExecutionId::new("E-1"),
                symbol: Symbol::new("AUDUSD"),
                side: OrderSide::Buy,
                filled_quantity: Quantity::from_units(40),
                leaves_quantity: Quantity::from_units(60),
                average_price: Price::parse("1.2000").unwrap(),
                execution_time: Timestamp::now(),
                event_id: Uuid::new_v4(),
                timestamp: Timestamp::now(),
            },
        )));
        engine.apply(filled_event("O-1", 100, "1.2000"));

        let position = engine.database().position(&PositionId::new("P-1")).unwrap();
        // 40 then 60 more, never 40 + 100.
        assert_eq!(position.net_quantity(), dec!(100));
        assert_eq!(position.fill_count(), 2);
    }

    #[test]
    fn modify_before_working_is_buffered_then_replayed() {
        let (gateway, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.execute(modify("O-1", 50, "1.2100"));
        // Not forwarded yet: only the submit reached the gateway.
        assert_eq!(gateway.calls().len(), 1);

        engine.apply(working_event("O-1"));
        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[1],
            GatewayCall::Modify { order_id, quantity, .. }
                if order_id == "O-1" && quantity.value() == dec!(50)
        ));
    }

    #[test]
    fn second_buffered_modify_replaces_the_first() {
        let (gateway, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.execute(modify("O-1", 50, "1.2100"));
        engine.execute(modify("O-1", 75, "1.2200"));
        engine.apply(working_event("O-1"));

        let calls = gateway.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[1],
            GatewayCall::Modify { quantity, .. } if quantity.value() == dec!(75)
        ));
    }

    #[test]
    fn one_modify_in_flight_at_a_time() {
        let (gateway, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.apply(working_event("O-1"));
        engine.execute(modify("O-1", 50, "1.2100"));
        engine.execute(modify("O-1", 75, "1.2200"));
        // Second modify held while the first is unresolved.
        assert_eq!(gateway.calls().len(), 2);

        engine.apply(Event::Order(OrderEvent::Modified(OrderModified {
            order_id: OrderId::new("O-1"),
            broker_order_id: crate::domain::shared::BrokerOrderId::new("B-1"),
            modified_quantity: Quantity::from_units(50),
            modified_price: Price::parse("1.2100").unwrap(),
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        })));
        let calls = gateway.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(
            &calls[2],
            GatewayCall::Modify { quantity, .. } if quantity.value() == dec!(75)
        ));
    }

    #[test]
    fn cancel_of_unknown_or_terminal_order_is_dropped() {
        let (gateway, mut engine) = engine();
        engine.execute(TradingCommand::CancelOrder(CancelOrder {
            trader_id: TraderId::new("TESTER-000"),
            order_id: OrderId::new("O-404"),
            reason: "exit".to_string(),
            command_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        }));
        assert!(gateway.calls().is_empty());

        engine.execute(submit("O-1"));
        engine.apply(working_event("O-1"));
        engine.apply(filled_event("O-1", 100, "1.2000"));
        let before = gateway.calls().len();
        engine.execute(TradingCommand::CancelOrder(CancelOrder {
            trader_id: TraderId::new("TESTER-000"),
            order_id: OrderId::new("O-1"),
            reason: "exit".to_string(),
            command_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        }));
        assert_eq!(gateway.calls().len(), before);
    }

    #[test]
    fn event_for_unknown_order_is_counted_and_dropped() {
        let (_, mut engine) = engine();
        engine.apply(filled_event("O-404", 100, "1.2000"));
        assert_eq!(engine.counters().events_dropped, 1);
        assert_eq!(engine.counters().events_applied, 0);
    }

    #[test]
    fn terminal_order_absorbs_further_events() {
        let (_, mut engine) = engine();
        engine.execute(submit("O-1"));
        engine.apply(working_event("O-1"));
        engine.apply(filled_event("O-1", 100, "1.2000"));
        let dropped_before = engine.counters().events_dropped;

        engine.apply(working_event("O-1"));
        assert_eq!(engine.counters().events_dropped, dropped_before + 1);
        let order = engine.database().order(&OrderId::new("O-1")).unwrap();
        assert_eq!(order.state(), OrderState::Filled);
    }

    #[test]
    fn republishes_applied_events_in_order() {
        use crate::engine::publisher::ChannelPublisher;
        let gateway = Arc::new(RecordingGateway::new());
        let (publisher, mut receiver) = ChannelPublisher::new();
        let mut engine = ExecutionEngine::new(gateway, Box::new(publisher));

        engine.execute(submit("O-1"));
        engine.apply(working_event("O-1"));
        engine.apply(filled_event("O-1", 100, "1.2000"));

        let mut types = Vec::new();
        while let Ok(Event::Order(event)) = receiver.try_recv() {
            types.push(event.event_type());
        }
        assert_eq!(
            types,
            vec!["ORDER_SUBMITTED", "ORDER_WORKING", "ORDER_FILLED"]
        );
    }

    #[test]
    fn bracket_submission_stores_all_constituents() {
        let (gateway, mut engine) = engine();
        let entry = order("O-1", OrderType::Market, None);
        let stop = Order::new(OrderParams {
            order_id: OrderId::new("O-2"),
            symbol: Symbol::new("AUDUSD"),
            side: OrderSide::Sell,
            order_type: OrderType::Stop,
            quantity: Quantity::from_units(100),
            price: Some(Price::parse("1.1900").unwrap()),
            time_in_force: TimeInForce::Gtc,
            expire_time: None,
            init_time: Timestamp::now(),
        })
        .unwrap();
        let bracket = crate::domain::order::BracketOrder::new(entry, stop, None).unwrap();
        let cmd = TradingCommand::SubmitBracketOrder(SubmitBracketOrder {
            trader_id: TraderId::new("TESTER-000"),
            account_id: AccountId::new("FXCM-123"),
            strategy_id: StrategyId::new("S-1"),
            position_id: PositionId::new("P-1"),
            bracket,
            command_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        });
        engine.execute(cmd.clone());
        engine.execute(cmd);

        assert_eq!(engine.database().order_count(), 2);
        assert_eq!(gateway.calls().len(), 1);
        assert_eq!(engine.counters().duplicate_commands, 1);
    }

    #[test]
    fn account_snapshot_is_applied_and_queryable() {
        use crate::domain::account::{AccountStateEvent, MarginCallStatus};
        use crate::domain::shared::{Currency, Money};

        let (_, mut engine) = engine();
        engine.apply(Event::AccountState(AccountStateEvent {
            account_id: AccountId::new("FXCM-123"),
            cash_balance: Money::new(dec!(100500), Currency::Usd),
            cash_start_day: Money::new(dec!(100000), Currency::Usd),
            margin_used_maintenance: Money::new(dec!(500), Currency::Usd),
            margin_used_liquidation: Money::new(dec!(250), Currency::Usd),
            margin_ratio: "0.05".to_string(),
            margin_call_status: MarginCallStatus::None,
            event_id: Uuid::new_v4(),
            timestamp: Timestamp::now(),
        }));
        let account = engine.database().account(&AccountId::new("FXCM-123")).unwrap();
        assert_eq!(account.cash_balance().value(), dec!(100500));
    }
}
