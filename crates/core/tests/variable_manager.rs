//! Integration tests for the VariableManager backed by a JSON file.

use std::sync::Arc;

use promptvars_core::store::{JsonFileStore, PreferenceStore};
use promptvars_core::vars::{VariableError, VariableLimits, VariableManager, VariableMap};
use serde_json::Value;
use tempfile::tempdir;

fn store_at(path: &std::path::Path) -> Arc<dyn PreferenceStore> {
    Arc::new(JsonFileStore::new(path))
}

#[tokio::test]
async fn test_manager_starts_empty_without_file() {
    let tmp = tempdir().unwrap();
    let manager = VariableManager::load(store_at(&tmp.path().join("prefs.json"))).await.unwrap();

    assert!(manager.custom_variables().is_empty());
    assert!(!manager.is_advanced_mode_enabled());
    assert!(manager.last_conversation_messages().is_empty());
}

#[tokio::test]
async fn test_every_mutation_rewrites_the_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("prefs.json");
    let mut manager = VariableManager::load(store_at(&path)).await.unwrap();

    manager.set_variable("audience", "engineers").await.unwrap();
    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        on_disk[VariableManager::STORAGE_KEY]["customVariables"]["audience"],
        "engineers"
    );

    manager.delete_variable("audience").await.unwrap();
    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(on_disk[VariableManager::STORAGE_KEY]["customVariables"]
        .as_object()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_rejected_mutation_leaves_file_untouched() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("prefs.json");
    let mut manager = VariableManager::load(store_at(&path)).await.unwrap();

    let err = manager.set_variable("currentPrompt", "x").await.unwrap_err();
    assert!(matches!(err, VariableError::PredefinedVariableOverride { .. }));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_custom_limits_apply() {
    let tmp = tempdir().unwrap();
    let limits = VariableLimits { max_value_length: 5, max_interactive_value_length: 5 };
    let mut manager =
        VariableManager::load_with_limits(store_at(&tmp.path().join("p.json")), limits)
            .await
            .unwrap();

    manager.set_variable("short", "12345").await.unwrap();
    let err = manager.set_variable("long", "123456").await.unwrap_err();
    assert!(matches!(err, VariableError::ValueTooLong { max: 5, .. }));
}

#[tokio::test]
async fn test_export_then_import_into_fresh_namespace() {
    let tmp = tempdir().unwrap();
    let mut source = VariableManager::load(store_at(&tmp.path().join("a.json"))).await.unwrap();
    source.set_variable("tone", "dry").await.unwrap();
    source.set_variable("lang", "es").await.unwrap();
    source.set_advanced_mode(true).await.unwrap();
    let exported = source.export_variables();

    let mut target = VariableManager::load(store_at(&tmp.path().join("b.json"))).await.unwrap();
    let summary = target.import_variables(&exported).await.unwrap();

    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(target.custom_variables(), source.custom_variables());
    assert!(target.is_advanced_mode_enabled());
}

#[tokio::test]
async fn test_resolution_feeds_replacement() {
    let tmp = tempdir().unwrap();
    let mut manager = VariableManager::load(store_at(&tmp.path().join("p.json"))).await.unwrap();
    manager.set_variable("tone", "playful").await.unwrap();

    let context: VariableMap =
        [("originalPrompt".to_string(), "Describe the sea".to_string())].into();
    let resolved = manager.resolve_all_variables(Some(&context));
    let out = manager.replace_variables(
        "Rewrite '{{originalPrompt}}' in a {{tone}} voice for {{audience}}.",
        Some(&resolved),
    );
    assert_eq!(out, "Rewrite 'Describe the sea' in a playful voice for {{audience}}.");
}
