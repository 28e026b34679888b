//! Seeding and per-subscriber FIFO delivery

use futures::StreamExt;
use keeper::{PrimitiveDefaults, StructuredDefaults};
use std::sync::Arc;
use std::thread;

use crate::test_utils::{setup, Key, Profile};

#[test]
fn new_subscriber_sees_current_value_first() {
    let (store, bus) = setup();
    let theme = PrimitiveDefaults::<Key, String>::new(Key::Theme, store, bus);
    theme.set_value("dark".into()).unwrap();

    let mut events = theme.subscribe();
    theme.set_value("light".into()).unwrap();

    assert_eq!(
        events.drain(),
        vec![Some("dark".to_string()), Some("light".to_string())]
    );
}

#[test]
fn new_subscriber_sees_absence_when_never_set() {
    let (store, bus) = setup();
    let profile = StructuredDefaults::<Key, Profile>::new(Key::Profile, store, bus);

    let mut events = profile.subscribe();

    assert_eq!(events.drain(), vec![None]);
}

#[test]
fn set_set_remove_is_observed_in_order() {
    let (store, bus) = setup();
    let volume = PrimitiveDefaults::<Key, i64>::new(Key::Volume, store, bus);
    let mut events = volume.subscribe();
    events.drain();

    volume.set_value(1).unwrap();
    volume.set_value(2).unwrap();
    volume.remove().unwrap();

    assert_eq!(events.drain(), vec![Some(1), Some(2), None]);
}

#[test]
fn repeated_equal_values_are_not_coalesced() {
    let (store, bus) = setup();
    let volume = PrimitiveDefaults::<Key, i64>::new(Key::Volume, store, bus);
    let mut events = volume.subscribe();
    events.drain();

    volume.set_value(5).unwrap();
    volume.set_value(5).unwrap();

    assert_eq!(events.drain(), vec![Some(5), Some(5)]);
}

#[test]
fn seed_is_never_older_than_a_racing_writer() {
    let (store, bus) = setup();
    let volume = PrimitiveDefaults::<Key, i64>::new(Key::Volume, store, bus);
    volume.set_value(0).unwrap();

    let writer = volume.clone();
    let handle = thread::spawn(move || {
        for i in 1..=500 {
            writer.set_value(i).unwrap();
        }
    });

    // Each subscriber must see a non-decreasing sequence ending at the final
    // value: the seed can never be stale relative to what follows it.
    let mut subs = Vec::new();
    for _ in 0..20 {
        subs.push(volume.subscribe());
    }
    handle.join().unwrap();

    for mut sub in subs {
        let seen: Vec<i64> = sub.drain().into_iter().map(|v| v.unwrap()).collect();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1), "{:?}", seen);
        assert_eq!(*seen.last().unwrap(), 500);
    }
}

#[tokio::test]
async fn stream_across_tasks() {
    let (store, bus) = setup();
    let theme = Arc::new(PrimitiveDefaults::<Key, String>::new(Key::Theme, store, bus));
    let mut stream = theme.subscribe();

    let writer = Arc::clone(&theme);
    let task = tokio::spawn(async move {
        writer.set_value("a".into()).unwrap();
        writer.set_value("b".into()).unwrap();
        writer.remove().unwrap();
    });

    let collected: Vec<_> = (&mut stream).take(4).collect().await;
    task.await.unwrap();

    assert_eq!(
        collected,
        vec![None, Some("a".to_string()), Some("b".to_string()), None]
    );
}

#[test]
fn cancelled_subscription_gets_nothing_more() {
    let (store, bus) = setup();
    let volume = PrimitiveDefaults::<Key, i64>::new(Key::Volume, store, bus.clone());
    let keep = volume.subscribe();
    let mut other = volume.subscribe();
    other.drain();

    keep.cancel();
    volume.set_value(3).unwrap();

    assert_eq!(bus.subscriber_count(&volume.slot()), 1);
    assert_eq!(other.drain(), vec![Some(3)]);
}
