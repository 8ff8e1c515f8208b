//! Tick-to-bar pipeline tests: wire snapshots translated into quotes,
//! routed through the aggregation controller, and folded into bars.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio::sync::mpsc;

use fix_engine::data::AggregationController;
use fix_engine::domain::market::{
    BarAggregation, BarSpecification, BarType, PriceType, QuoteTick,
};
use fix_engine::domain::shared::{Symbol, Timestamp};
use fix_engine::fix::messages::{FixMessage, MarketDataSnapshot};
use fix_engine::fix::{FixTranslator, SymbolMap, TranslatedMessage};

fn translator() -> FixTranslator {
    FixTranslator::new(Arc::new(SymbolMap::new([(
        "EUR/USD".to_string(),
        Symbol::new("EURUSD"),
    )])))
}

fn snapshot(bid: &str, ask: &str, ts: &str) -> FixMessage {
    FixMessage::MarketDataSnapshot(MarketDataSnapshot {
        symbol_code: "EUR/USD".to_string(),
        bid: bid.to_string(),
        ask: ask.to_string(),
        bid_size: "1000000".to_string(),
        ask_size: "1000000".to_string(),
        timestamp: ts.to_string(),
    })
}

fn quote(message: &FixMessage) -> QuoteTick {
    match translator().translate(message) {
        Some(TranslatedMessage::Quote(tick)) => tick,
        other => panic!("expected quote, got {other:?}"),
    }
}

fn bar_type(period: u32, aggregation: BarAggregation, price_type: PriceType) -> BarType {
    BarType {
        symbol: Symbol::new("EURUSD"),
        specification: BarSpecification {
            period,
            aggregation,
            price_type,
        },
    }
}

#[test]
fn three_tick_bar_from_translated_snapshots() {
    let mut controller = AggregationController::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    controller.register_receiver(tx);
    controller
        .subscribe(bar_type(3, BarAggregation::Tick, PriceType::Bid))
        .unwrap();

    let ticks = [
        quote(&snapshot("1.1000", "1.1002", "2020-01-06T12:00:01Z")),
        quote(&snapshot("1.1005", "1.1007", "2020-01-06T12:00:02Z")),
        quote(&snapshot("1.0995", "1.0997", "2020-01-06T12:00:03Z")),
    ];
    let mut emitted = Vec::new();
    for tick in &ticks {
        emitted.extend(controller.on_tick(tick));
    }

    assert_eq!(emitted.len(), 1);
    let bar = &emitted[0].bar;
    assert_eq!(bar.open().value(), dec!(1.1000));
    assert_eq!(bar.high().value(), dec!(1.1005));
    assert_eq!(bar.low().value(), dec!(1.0995));
    assert_eq!(bar.close().value(), dec!(1.0995));
    assert_eq!(rx.try_recv().unwrap().bar, emitted[0].bar);
}

#[test]
fn mid_bars_use_the_halved_sum() {
    let mut controller = AggregationController::new();
    controller
        .subscribe(bar_type(2, BarAggregation::Tick, PriceType::Mid))
        .unwrap();

    let first = quote(&snapshot("1.1000", "1.1002", "2020-01-06T12:00:01Z"));
    let second = quote(&snapshot("1.1004", "1.1006", "2020-01-06T12:00:02Z"));
    assert!(controller.on_tick(&first).is_empty());
    let emitted = controller.on_tick(&second);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].bar.open().value(), dec!(1.1001));
    assert_eq!(emitted[0].bar.close().value(), dec!(1.1005));
}

#[test]
fn time_bars_close_deterministically_across_instances() {
    let ticks = [
        quote(&snapshot("1.1000", "1.1002", "2020-01-06T12:00:10Z")),
        quote(&snapshot("1.1003", "1.1005", "2020-01-06T12:00:55Z")),
        quote(&snapshot("1.1001", "1.1003", "2020-01-06T12:01:30Z")),
        quote(&snapshot("1.1004", "1.1006", "2020-01-06T12:02:15Z")),
    ];

    let run = || {
        let mut controller = AggregationController::new();
        controller
            .subscribe(bar_type(1, BarAggregation::Minute, PriceType::Bid))
            .unwrap();
        let mut bars = Vec::new();
        for tick in &ticks {
            bars.extend(controller.on_tick(tick).into_iter().map(|e| e.bar));
        }
        bars
    };

    let first_run = run();
    let second_run = run();
    assert_eq!(first_run, second_run);
    assert_eq!(
        first_run[0].timestamp(),
        Timestamp::parse("2020-01-06T12:01:00Z").unwrap()
    );
    assert_eq!(
        first_run[1].timestamp(),
        Timestamp::parse("2020-01-06T12:02:00Z").unwrap()
    );
}

#[test]
fn bar_timestamps_strictly_increase_per_series() {
    let mut controller = AggregationController::new();
    controller
        .subscribe(bar_type(1, BarAggregation::Minute, PriceType::Bid))
        .unwrap();

    let mut closes = Vec::new();
    for minute in 0..5 {
        let ts = format!("2020-01-06T12:0{minute}:30Z");
        let tick = quote(&snapshot("1.1000", "1.1002", &ts));
        closes.extend(
            controller
                .on_tick(&tick)
                .into_iter()
                .map(|e| e.bar.timestamp()),
        );
    }
    assert!(closes.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(closes.len(), 4);
}
