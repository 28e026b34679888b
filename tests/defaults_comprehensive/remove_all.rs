//! remove_all clears every key of a kind and notifies each topic once

use keeper::{remove_all, AccessorKind, PrimitiveDefaults, SettingKey, StructuredDefaults};

use crate::test_utils::{setup, Key, Profile};

#[test]
fn clears_every_key_and_notifies_each_once() {
    let (store, bus) = setup();

    for (i, key) in Key::ALL.iter().enumerate() {
        PrimitiveDefaults::<Key, i64>::new(*key, store.clone(), bus.clone())
            .set_value(i as i64)
            .unwrap();
    }

    let mut subs: Vec<_> = Key::ALL
        .iter()
        .map(|key| PrimitiveDefaults::<Key, i64>::new(*key, store.clone(), bus.clone()).subscribe())
        .collect();
    for sub in &mut subs {
        assert_eq!(sub.drain().len(), 1);
    }

    let report = PrimitiveDefaults::<Key, i64>::remove_all(&*store, &bus);

    assert!(report.is_complete());
    assert_eq!(report.removed.len(), Key::ALL.len());
    for key in Key::ALL {
        assert_eq!(
            PrimitiveDefaults::<Key, i64>::new(*key, store.clone(), bus.clone()).get(),
            None,
            "{} still set",
            key.name()
        );
    }
    for sub in &mut subs {
        assert_eq!(sub.drain(), vec![None]);
    }
}

#[test]
fn notifies_keys_that_were_never_set() {
    let (store, bus) = setup();
    let mut theme =
        PrimitiveDefaults::<Key, String>::new(Key::Theme, store.clone(), bus.clone()).subscribe();
    theme.drain();

    remove_all::<Key>(AccessorKind::Primitive, &*store, &bus);

    assert_eq!(theme.drain(), vec![None]);
}

#[test]
fn leaves_the_other_kind_alone() {
    let (store, bus) = setup();
    let profile = StructuredDefaults::<Key, Profile>::new(Key::Profile, store.clone(), bus.clone());
    profile.set_value(Profile::new("kept", 1)).unwrap();
    let mut events = profile.subscribe();
    events.drain();

    let report = remove_all::<Key>(AccessorKind::Primitive, &*store, &bus);

    assert!(report.is_complete());
    assert_eq!(profile.get(), Some(Profile::new("kept", 1)));
    assert!(events.drain().is_empty());
}
