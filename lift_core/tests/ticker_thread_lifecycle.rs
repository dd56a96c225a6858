//! Ticker thread lifecycle and cleanup.
//!
//! Verifies that:
//! - Threads are joined when a Ticker is dropped
//! - Ticker threads exit on their own once the consumer is gone
//! - Tick events carry the elapsed time measured on the supplied clock

use crossbeam_channel as xch;
use lift_core::{Event, Ticker};
use lift_traits::clock::MonotonicClock;
use lift_traits::clock::test_clock::TestClock;
use std::time::Duration;

#[test]
fn ticker_thread_exits_on_drop() {
    let (tx, rx) = xch::bounded(8);
    let ticker = Ticker::spawn(tx, Duration::from_millis(5), MonotonicClock::new());

    // At least one tick arrives in real time
    let ev = rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert!(matches!(ev, Event::Tick(_)));

    // Drop joins the thread; the test hangs here if it leaked
    drop(ticker);
}

#[test]
fn multiple_tickers_dont_leak_threads() {
    for _ in 0..10 {
        let (tx, rx) = xch::bounded(1);
        let ticker = Ticker::spawn(tx, Duration::from_millis(2), MonotonicClock::new());
        std::thread::sleep(Duration::from_millis(5));
        let _ = rx.try_recv();
        drop(ticker);
    }
}

#[test]
fn ticker_exits_when_consumer_disconnects() {
    let (tx, rx) = xch::bounded(1);
    let ticker = Ticker::spawn(tx, Duration::from_millis(2), MonotonicClock::new());
    drop(rx);
    std::thread::sleep(Duration::from_millis(20));
    drop(ticker);
}

#[test]
fn ticks_carry_clock_elapsed() {
    let clock = TestClock::new();
    let (tx, rx) = xch::bounded(4);
    let ticker = Ticker::spawn(tx, Duration::from_millis(16), clock.clone());

    for _ in 0..3 {
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            Event::Tick(dt) => assert_eq!(dt, Duration::from_millis(16)),
            Event::Press(p) => panic!("unexpected press {p}"),
        }
    }
    drop(ticker);
    assert!(clock.elapsed() >= Duration::from_millis(48));
}
