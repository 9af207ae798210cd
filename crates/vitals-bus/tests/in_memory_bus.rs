use vitals_bus::memory::InMemoryBus;
use vitals_bus::{BusMessage, MessageBus, OffsetReset, Topic};

#[tokio::test]
async fn consumer_started_before_produce_sees_the_message() {
    let bus = InMemoryBus::new();
    let mut consumer = bus
        .consume(Topic::TelemetryNormalized, "normalizer", OffsetReset::Earliest)
        .await
        .expect("subscribe should succeed");

    bus.produce(
        Topic::TelemetryNormalized,
        BusMessage::new(b"patient-42".to_vec(), br#"{"ok":true}"#.to_vec()),
    )
    .await
    .expect("produce should succeed");

    let got = consumer
        .recv()
        .await
        .expect("recv should not error")
        .expect("channel should not be closed");
    assert_eq!(got.key, b"patient-42");
}

#[tokio::test]
async fn consuming_an_unproduced_topic_times_out_gracefully() {
    let bus = InMemoryBus::new();
    let mut consumer = bus
        .consume(Topic::AlertsRaised, "watcher", OffsetReset::Latest)
        .await
        .expect("subscribe should succeed");

    let outcome = tokio::time::timeout(std::time::Duration::from_millis(50), consumer.recv()).await;
    assert!(outcome.is_err(), "no message was produced, recv should still be pending");
}
