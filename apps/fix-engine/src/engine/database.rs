//! In-memory execution database.
//!
//! The authoritative store for orders, positions and accounts plus the
//! identity indexes linking them. Not a state machine itself, but the
//! enforcement point for uniqueness: adds fail on duplicate identities,
//! updates relocate entries between index sets, and absence is an
//! explicit `None`, never an error.
//!
//! Owned and mutated exclusively by the engine's processing loop.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::account::Account;
use crate::domain::order::{BracketOrder, Order};
use crate::domain::position::Position;
use crate::domain::shared::{AccountId, OrderId, PositionId, StrategyId, TraderId};

/// Uniqueness violations surfaced to the engine.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// An order with this id is already stored.
    #[error("order {order_id} already exists")]
    DuplicateOrder {
        /// The conflicting id.
        order_id: OrderId,
    },
    /// A position with this id is already stored.
    #[error("position {position_id} already exists")]
    DuplicatePosition {
        /// The conflicting id.
        position_id: PositionId,
    },
    /// An update referenced an order never added.
    #[error("order {order_id} not found")]
    OrderNotFound {
        /// The missing id.
        order_id: OrderId,
    },
    /// An update referenced a position never added.
    #[error("position {position_id} not found")]
    PositionNotFound {
        /// The missing id.
        position_id: PositionId,
    },
}

/// Identity context stored alongside each order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIdentity {
    /// Owning trader.
    pub trader_id: TraderId,
    /// Account traded on.
    pub account_id: AccountId,
    /// Originating strategy.
    pub strategy_id: StrategyId,
    /// Position the order contributes to.
    pub position_id: PositionId,
}

/// The in-memory store and its bidirectional indexes.
#[derive(Debug, Default)]
pub struct ExecutionDatabase {
    orders: HashMap<OrderId, Order>,
    positions: HashMap<PositionId, Position>,
    accounts: HashMap<AccountId, Account>,

    order_identity: HashMap<OrderId, OrderIdentity>,
    position_trader: HashMap<PositionId, TraderId>,
    position_strategy: HashMap<PositionId, StrategyId>,

    trader_orders: HashMap<TraderId, BTreeSet<OrderId>>,
    trader_strategy_orders: HashMap<(TraderId, StrategyId), BTreeSet<OrderId>>,
    trader_positions: HashMap<TraderId, BTreeSet<PositionId>>,
    trader_strategy_positions: HashMap<(TraderId, StrategyId), BTreeSet<PositionId>>,

    working_orders: BTreeSet<OrderId>,
    completed_orders: BTreeSet<OrderId>,
    open_positions: BTreeSet<PositionId>,
    closed_positions: BTreeSet<PositionId>,
}

impl ExecutionDatabase {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------- adds

    /// Store a new order with its identity context.
    ///
    /// # Errors
    ///
    /// Returns an error if the order id already exists; nothing is
    /// mutated in that case.
    pub fn add_order(
        &mut self,
        order: Order,
        identity: OrderIdentity,
    ) -> Result<(), DatabaseError> {
        let order_id = order.order_id().clone();
        if self.orders.contains_key(&order_id) {
            return Err(DatabaseError::DuplicateOrder { order_id });
        }
        self.index_order(&order_id, &identity);
        self.relocate_order_membership(&order_id, order.state().is_terminal());
        self.order_identity.insert(order_id.clone(), identity);
        self.orders.insert(order_id, order);
        Ok(())
    }

    /// Store every constituent of a bracket under one identity context.
    ///
    /// # Errors
    ///
    /// Returns an error if any constituent id already exists; no
    /// constituent is stored in that case.
    pub fn add_bracket_order(
        &mut self,
        bracket: &BracketOrder,
        identity: OrderIdentity,
    ) -> Result<(), DatabaseError> {
        for order_id in bracket.order_ids() {
            if self.orders.contains_key(order_id) {
                return Err(DatabaseError::DuplicateOrder {
                    order_id: order_id.clone(),
                });
            }
        }
        for order in bracket.orders() {
            self.add_order(order.clone(), identity.clone())?;
        }
        Ok(())
    }

    /// Store a new position, indexed under the given trader/strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if the position id already exists.
    pub fn add_position(
        &mut self,
        position: Position,
        trader_id: TraderId,
        strategy_id: StrategyId,
    ) -> Result<(), DatabaseError> {
        let position_id = position.position_id().clone();
        if self.positions.contains_key(&position_id) {
            return Err(DatabaseError::DuplicatePosition { position_id });
        }
        self.trader_positions
            .entry(trader_id.clone())
            .or_default()
            .insert(position_id.clone());
        self.trader_strategy_positions
            .entry((trader_id.clone(), strategy_id.clone()))
            .or_default()
            .insert(position_id.clone());
        self.position_trader.insert(position_id.clone(), trader_id);
        self.position_strategy
            .insert(position_id.clone(), strategy_id);
        self.relocate_position_membership(&position_id, position.is_open());
        self.positions.insert(position_id, position);
        Ok(())
    }

    /// Store or overwrite an account snapshot. Idempotent: the broker's
    /// latest snapshot is always the truth.
    pub fn upsert_account(&mut self, account: Account) {
        self.accounts.insert(account.account_id().clone(), account);
    }

    // ------------------------------------------------------------- updates

    /// Persist an order after event application, relocating it between
    /// the working and completed sets as its state dictates.
    ///
    /// # Errors
    ///
    /// Returns an error if the order was never added.
    pub fn update_order(&mut self, order: Order) -> Result<(), DatabaseError> {
        let order_id = order.order_id().clone();
        if !self.orders.contains_key(&order_id) {
            return Err(DatabaseError::OrderNotFound { order_id });
        }
        self.relocate_order_membership(&order_id, order.state().is_terminal());
        self.orders.insert(order_id, order);
        Ok(())
    }

    /// Persist a position after a fill, relocating it between the open
    /// and closed sets by the net-quantity-zero test.
    ///
    /// # Errors
    ///
    /// Returns an error if the position was never added.
    pub fn update_position(&mut self, position: Position) -> Result<(), DatabaseError> {
        let position_id = position.position_id().clone();
        if !self.positions.contains_key(&position_id) {
            return Err(DatabaseError::PositionNotFound { position_id });
        }
        self.relocate_position_membership(&position_id, position.is_open());
        self.positions.insert(position_id, position);
        Ok(())
    }

    // ------------------------------------------------------------- queries

    /// Look up an order.
    #[must_use]
    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Look up a position.
    #[must_use]
    pub fn position(&self, position_id: &PositionId) -> Option<&Position> {
        self.positions.get(position_id)
    }

    /// Look up an account.
    #[must_use]
    pub fn account(&self, account_id: &AccountId) -> Option<&Account> {
        self.accounts.get(account_id)
    }

    /// The trader owning an order.
    #[must_use]
    pub fn trader_id(&self, order_id: &OrderId) -> Option<&TraderId> {
        self.order_identity.get(order_id).map(|i| &i.trader_id)
    }

    /// The account an order trades on.
    #[must_use]
    pub fn account_id(&self, order_id: &OrderId) -> Option<&AccountId> {
        self.order_identity.get(order_id).map(|i| &i.account_id)
    }

    /// The strategy that originated an order.
    #[must_use]
    pub fn strategy_id(&self, order_id: &OrderId) -> Option<&StrategyId> {
        self.order_identity.get(order_id).map(|i| &i.strategy_id)
    }

    /// The position an order contributes to.
    #[must_use]
    pub fn position_id(&self, order_id: &OrderId) -> Option<&PositionId> {
        self.order_identity.get(order_id).map(|i| &i.position_id)
    }

    /// The trader owning a position.
    #[must_use]
    pub fn position_trader_id(&self, position_id: &PositionId) -> Option<&TraderId> {
        self.position_trader.get(position_id)
    }

    /// The strategy that opened a position.
    #[must_use]
    pub fn position_strategy_id(&self, position_id: &PositionId) -> Option<&StrategyId> {
        self.position_strategy.get(position_id)
    }

    /// All order ids for a trader, optionally narrowed to one strategy.
    #[must_use]
    pub fn order_ids(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<OrderId> {
        self.trader_order_set(trader_id, strategy_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Working order ids for a trader, optionally narrowed to one
    /// strategy.
    #[must_use]
    pub fn working_order_ids(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<OrderId> {
        self.intersect_orders(&self.working_orders, trader_id, strategy_id)
    }

    /// Completed (terminal) order ids for a trader, optionally narrowed
    /// to one strategy.
    #[must_use]
    pub fn completed_order_ids(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<OrderId> {
        self.intersect_orders(&self.completed_orders, trader_id, strategy_id)
    }

    /// All position ids for a trader, optionally narrowed to one
    /// strategy.
    #[must_use]
    pub fn position_ids(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<PositionId> {
        self.trader_position_set(trader_id, strategy_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Open position ids for a trader, optionally narrowed to one
    /// strategy.
    #[must_use]
    pub fn open_position_ids(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<PositionId> {
        self.intersect_positions(&self.open_positions, trader_id, strategy_id)
    }

    /// Closed position ids for a trader, optionally narrowed to one
    /// strategy.
    #[must_use]
    pub fn closed_position_ids(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<PositionId> {
        self.intersect_positions(&self.closed_positions, trader_id, strategy_id)
    }

    /// Number of stored orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of stored positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    // ------------------------------------------------------------- resets

    /// Empty every in-memory index and aggregate, simulating a cold
    /// start.
    pub fn clear_caches(&mut self) {
        info!(
            orders = self.orders.len(),
            positions = self.positions.len(),
            accounts = self.accounts.len(),
            "clearing execution database caches",
        );
        self.reset();
    }

    /// Destructive full reset: removes all traces of every identity
    /// from every index.
    pub fn flush(&mut self) {
        debug!("flushing execution database");
        self.reset();
    }

    fn reset(&mut self) {
        self.orders.clear();
        self.positions.clear();
        self.accounts.clear();
        self.order_identity.clear();
        self.position_trader.clear();
        self.position_strategy.clear();
        self.trader_orders.clear();
        self.trader_strategy_orders.clear();
        self.trader_positions.clear();
        self.trader_strategy_positions.clear();
        self.working_orders.clear();
        self.completed_orders.clear();
        self.open_positions.clear();
        self.closed_positions.clear();
    }

    // ----------------------------------------------------------- internal

    fn index_order(&mut self, order_id: &OrderId, identity: &OrderIdentity) {
        self.trader_orders
            .entry(identity.trader_id.clone())
            .or_default()
            .insert(order_id.clone());
        self.trader_strategy_orders
            .entry((identity.trader_id.clone(), identity.strategy_id.clone()))
            .or_default()
            .insert(order_id.clone());
    }

    fn relocate_order_membership(&mut self, order_id: &OrderId, terminal: bool) {
        if terminal {
            self.working_orders.remove(order_id);
            self.completed_orders.insert(order_id.clone());
        } else {
            self.completed_orders.remove(order_id);
            self.working_orders.insert(order_id.clone());
        }
    }

    fn relocate_position_membership(&mut self, position_id: &PositionId, open: bool) {
        if open {
            self.closed_positions.remove(position_id);
            self.open_positions.insert(position_id.clone());
        } else {
            self.open_positions.remove(position_id);
            self.closed_positions.insert(position_id.clone());
        }
    }

    fn trader_order_set(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> Option<&BTreeSet<OrderId>> {
        match strategy_id {
            Some(strategy_id) => self
                .trader_strategy_orders
                .get(&(trader_id.clone(), strategy_id.clone())),
            None => self.trader_orders.get(trader_id),
        }
    }

    fn trader_position_set(
        &self,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> Option<&BTreeSet<PositionId>> {
        match strategy_id {
            Some(strategy_id) => self
                .trader_strategy_positions
                .get(&(trader_id.clone(), strategy_id.clone())),
            None => self.trader_positions.get(trader_id),
        }
    }

    fn intersect_orders(
        &self,
        membership: &BTreeSet<OrderId>,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<OrderId> {
        self.trader_order_set(trader_id, strategy_id)
            .map(|ids| ids.intersection(membership).cloned().collect())
            .unwrap_or_default()
    }

    fn intersect_positions(
        &self,
        membership: &BTreeSet<PositionId>,
        trader_id: &TraderId,
        strategy_id: Option<&StrategyId>,
    ) -> BTreeSet<PositionId> {
        self.trader_position_set(trader_id, strategy_id)
            .map(|ids| ids.intersection(membership).cloned().collect())
            .unwrap_or_default()
    }
}
