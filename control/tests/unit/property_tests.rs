//! Property-based tests for language derivation and single-field changes.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use hostctl::domain::{SettingChange, language_from_path};
use hostctl_common::AppSettings;
use proptest::prelude::*;

// ============================================================================
// language_from_path() property tests
// ============================================================================

proptest! {
    /// The language never contains a dot and is a suffix of the path.
    #[test]
    fn prop_language_is_dotless_suffix(path in ".{0,40}") {
        let language = language_from_path(&path);
        prop_assert!(!language.contains('.'), "dot in language: {}", language);
        prop_assert!(path.ends_with(language));
    }

    /// Appending `.ext` to any path yields `ext`.
    #[test]
    fn prop_appended_extension_wins(stem in ".{0,30}", ext in "[a-z0-9]{1,6}") {
        let path = format!("{stem}.{ext}");
        prop_assert_eq!(language_from_path(&path), ext.as_str());
    }

    /// Paths without a dot have no language.
    #[test]
    fn prop_dotless_path_has_no_language(path in "[^.]{0,40}") {
        prop_assert_eq!(language_from_path(&path), "");
    }
}

// ============================================================================
// SettingChange::apply() property tests
// ============================================================================

fn any_change() -> impl Strategy<Value = SettingChange> {
    prop_oneof![
        any::<bool>().prop_map(SettingChange::AutostartEnabled),
        any::<bool>().prop_map(SettingChange::ServiceEnabled),
        any::<u16>().prop_map(SettingChange::ServicePort),
        any::<u32>().prop_map(SettingChange::ClientCount),
        ".{0,20}".prop_map(SettingChange::ArchivePath),
        ".{0,20}".prop_map(SettingChange::MapExchangeString),
        ".{0,20}".prop_map(SettingChange::RconPassword),
        any::<u16>().prop_map(SettingChange::RconPort),
        any::<bool>().prop_map(SettingChange::RecreateWorkspace),
        any::<u16>().prop_map(SettingChange::ResourceServicePort),
        ".{0,20}".prop_map(SettingChange::Seed),
        ".{0,20}".prop_map(SettingChange::WorkspacePath),
    ]
}

/// Serialized leaf values, keyed by their dotted path.
fn leaves(settings: &AppSettings) -> Vec<(String, serde_json::Value)> {
    let value = serde_json::to_value(settings).expect("serialize settings");
    let mut out = Vec::new();
    for (section, fields) in value.as_object().expect("object") {
        for (field, leaf) in fields.as_object().expect("section object") {
            out.push((format!("{section}.{field}"), leaf.clone()));
        }
    }
    out
}

proptest! {
    /// A change touches at most the one field its key names.
    #[test]
    fn prop_change_touches_only_its_field(change in any_change()) {
        let before = AppSettings::default();
        let mut after = before.clone();
        let key = change.key();
        change.apply(&mut after);

        for ((path, old), (_, new)) in leaves(&before).into_iter().zip(leaves(&after)) {
            if path != key {
                prop_assert_eq!(old, new, "field {} changed by {}", path, key);
            }
        }
    }

    /// Applying the same change twice is the same as applying it once.
    #[test]
    fn prop_change_is_idempotent(change in any_change()) {
        let mut once = AppSettings::default();
        change.clone().apply(&mut once);
        let mut twice = once.clone();
        change.apply(&mut twice);
        prop_assert_eq!(once, twice);
    }
}
