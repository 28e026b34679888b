//! Accessors over a persistent FileStore

use keeper::{
    define_keys, BackingStore, ChangeBus, FileStore, OpenOptions, PrimitiveDefaults, SettingKey,
    StructuredDefaults,
};
use serde::Deserialize;
use std::sync::Arc;
use tempfile::TempDir;

use crate::test_utils::{Key, Profile};

fn open(path: &std::path::Path) -> Arc<dyn BackingStore> {
    Arc::new(FileStore::open_with(path, OpenOptions::new().sync_on_write(false)).unwrap())
}

#[test]
fn values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    {
        let store = open(&path);
        let bus = ChangeBus::new();
        PrimitiveDefaults::<Key, bool>::new(Key::Onboarded, store.clone(), bus.clone())
            .set_value(true)
            .unwrap();
        StructuredDefaults::<Key, Profile>::new(Key::Profile, store, bus)
            .set_value(Profile::new("Anton", 30))
            .unwrap();
    }

    let store = open(&path);
    let bus = ChangeBus::new();
    assert_eq!(
        PrimitiveDefaults::<Key, bool>::new(Key::Onboarded, store.clone(), bus.clone()).get(),
        Some(true)
    );

    let profile = StructuredDefaults::<Key, Profile>::new(Key::Profile, store, bus);
    let mut events = profile.subscribe();
    assert_eq!(events.drain(), vec![Some(Profile::new("Anton", 30))]);
}

#[test]
fn schema_change_reads_as_absent_until_overwritten() {
    #[derive(Debug, PartialEq, serde::Serialize, Deserialize)]
    struct ProfileV2 {
        full_name: String,
    }

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let store = open(&path);
    let bus = ChangeBus::new();

    StructuredDefaults::<Key, Profile>::new(Key::Profile, store.clone(), bus.clone())
        .set_value(Profile::new("Anton", 30))
        .unwrap();

    let v2 = StructuredDefaults::<Key, ProfileV2>::new(Key::Profile, store, bus);
    assert_eq!(v2.get(), None);
    assert!(v2.contains());

    v2.set_value(ProfileV2 {
        full_name: "Anton B".into(),
    })
    .unwrap();
    assert_eq!(
        v2.get(),
        Some(ProfileV2 {
            full_name: "Anton B".into()
        })
    );
}

#[test]
fn remove_all_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    {
        let store = open(&path);
        let bus = ChangeBus::new();
        PrimitiveDefaults::<Key, String>::new(Key::Theme, store.clone(), bus.clone())
            .set_value("dark".into())
            .unwrap();
        let report = PrimitiveDefaults::<Key, String>::remove_all(&*store, &bus);
        assert!(report.is_complete());
    }

    let store = open(&path);
    assert_eq!(
        PrimitiveDefaults::<Key, String>::new(Key::Theme, store, ChangeBus::new()).get(),
        None
    );
}

define_keys! {
    enum Shape {
        Plain => "plain",
        Nested => "group/item",
        LeadingSep => "/lead",
        TrailingSep => "trail/",
        PrefixLike => "primitive/theme",
        Spaced => "with space",
        Unicode => "thème",
        Single => "x",
    }
}

#[test]
fn every_key_name_shape_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    {
        let store = open(&path);
        let bus = ChangeBus::new();
        for (i, key) in Shape::ALL.iter().enumerate() {
            PrimitiveDefaults::<Shape, i64>::new(*key, store.clone(), bus.clone())
                .set_value(i as i64)
                .unwrap();
            StructuredDefaults::<Shape, Profile>::new(*key, store.clone(), bus.clone())
                .set_value(Profile::new(key.name(), i as u32))
                .unwrap();
        }
    }

    let store = open(&path);
    let bus = ChangeBus::new();
    for (i, key) in Shape::ALL.iter().enumerate() {
        assert_eq!(
            PrimitiveDefaults::<Shape, i64>::new(*key, store.clone(), bus.clone()).get(),
            Some(i as i64),
            "primitive {:?} lost on reopen",
            key
        );
        assert_eq!(
            StructuredDefaults::<Shape, Profile>::new(*key, store.clone(), bus.clone()).get(),
            Some(Profile::new(key.name(), i as u32)),
            "structured {:?} lost on reopen",
            key
        );
    }
}
