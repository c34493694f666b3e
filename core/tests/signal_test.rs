use std::time::Duration;

use metrodesk_core::signal::{Signal, SignalBus};

#[tokio::test]
async fn subscribe_and_emit_basic() {
    let bus = SignalBus::new();
    let (_sub_id, mut rx) = bus.subscribe(Signal::AnnouncementAdded);

    let delivered = bus.emit(Signal::AnnouncementAdded);
    assert_eq!(delivered, 1);

    let received = tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("timeout")
        .expect("channel closed");
    assert_eq!(received, Signal::AnnouncementAdded);
}

#[tokio::test]
async fn signals_emitted_before_subscribing_are_not_replayed() {
    let bus = SignalBus::new();

    // Nobody is listening yet
    let delivered = bus.emit(Signal::SessionExpired);
    assert_eq!(delivered, 0);

    let (_sub_id, mut rx) = bus.subscribe(Signal::SessionExpired);
    let early = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(early.is_err(), "should not replay past signals");

    // Only signals emitted after the subscription arrive
    bus.emit(Signal::SessionExpired);
    let received = tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("timeout")
        .expect("channel closed");
    assert_eq!(received, Signal::SessionExpired);
}

#[tokio::test]
async fn signals_do_not_leak_across_kinds() {
    let bus = SignalBus::new();
    let (_sub_id, mut rx) = bus.subscribe(Signal::AnnouncementAdded);

    let delivered = bus.emit(Signal::LoggedOut);
    assert_eq!(delivered, 0, "no subscriber for that signal");

    let result = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(result.is_err(), "subscriber of another signal must not see it");
}

#[tokio::test]
async fn unsubscribe_stops_delivery() {
    let bus = SignalBus::new();
    let (sub_id, mut rx) = bus.subscribe(Signal::IdleWarning);

    // Emit before unsubscribe
    bus.emit(Signal::IdleWarning);

    bus.unsubscribe(&sub_id);

    // Emit after unsubscribe
    bus.emit(Signal::IdleWarning);

    // Should receive the first signal
    let first = tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("timeout")
        .expect("channel closed");
    assert_eq!(first, Signal::IdleWarning);

    // Should NOT receive the second (channel should close or stay empty)
    let second = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(
        second.is_err() || second.unwrap().is_none(),
        "should not receive after unsubscribe"
    );

    let stats = bus.stats(Signal::IdleWarning).expect("stats exist");
    assert_eq!(stats.active_subscriptions, 0);
}

#[tokio::test]
async fn unsubscribing_twice_is_harmless() {
    let bus = SignalBus::new();
    let (sub_id, _rx) = bus.subscribe(Signal::LoggedOut);

    bus.unsubscribe(&sub_id);
    bus.unsubscribe(&sub_id);

    let stats = bus.stats(Signal::LoggedOut).expect("stats exist");
    assert_eq!(stats.active_subscriptions, 0, "count must not go negative");
}

#[tokio::test]
async fn full_queue_drops_instead_of_blocking() {
    let bus = SignalBus::new();
    let (_sub_id, mut rx) = bus.subscribe(Signal::AnnouncementAdded);

    // Emit past the per-subscriber queue depth without draining
    for _ in 0..40 {
        bus.emit(Signal::AnnouncementAdded);
    }

    let mut received_count = 0;
    while rx.try_recv().is_ok() {
        received_count += 1;
    }

    let stats = bus.stats(Signal::AnnouncementAdded).expect("stats exist");
    assert!(
        stats.dropped_signals > 0,
        "expected drops once the queue filled"
    );
    assert!(received_count < 40, "not every signal should be received");
    assert_eq!(stats.total_delivered as usize, received_count);
}

#[tokio::test]
async fn multiple_subscribers_each_receive() {
    let bus = SignalBus::new();
    let (_sub1, mut rx1) = bus.subscribe(Signal::SessionExpired);
    let (_sub2, mut rx2) = bus.subscribe(Signal::SessionExpired);

    let delivered = bus.emit(Signal::SessionExpired);
    assert_eq!(delivered, 2, "both subscribers should receive");

    let r1 = rx1.recv().await.expect("rx1 closed");
    let r2 = rx2.recv().await.expect("rx2 closed");
    assert_eq!(r1, Signal::SessionExpired);
    assert_eq!(r2, Signal::SessionExpired);
}

#[tokio::test]
async fn stats_track_emitted_and_delivered() {
    let bus = SignalBus::new();
    let (_sub_id, mut rx) = bus.subscribe(Signal::LoggedOut);

    for _ in 0..10 {
        bus.emit(Signal::LoggedOut);
    }

    // Drain
    let mut count = 0;
    while rx.try_recv().is_ok() {
        count += 1;
    }

    let stats = bus.stats(Signal::LoggedOut).expect("stats");
    assert_eq!(stats.total_emitted, 10);
    assert_eq!(stats.total_delivered, 10);
    assert_eq!(stats.dropped_signals, 0);
    assert_eq!(count, 10);
}
