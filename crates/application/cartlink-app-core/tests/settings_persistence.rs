use cartlink_app_core::{DispatchMode, FilePersistence, Settings, SettingsRepo};
use cartlink_core::{ButtonInput, KeyBinding, KeyId};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FilePersistence::at(dir.path().join("settings.json"));

    let settings = repo.load().unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.dispatch_mode, DispatchMode::PressOnly);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let repo = FilePersistence::at(&path);

    let settings = Settings {
        key_bindings: vec![
            KeyBinding::new("z", ButtonInput::A),
            KeyBinding::new("x", ButtonInput::B),
        ],
        dispatch_mode: DispatchMode::PressAndRelease,
    };
    repo.save(&settings).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let loaded = repo.load().unwrap();
    assert_eq!(loaded, settings);
    let table = loaded.key_table().unwrap();
    assert_eq!(table.lookup(&KeyId::new("x")), Some(ButtonInput::B));
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "dispatch_mode": "press-and-release" }"#).unwrap();

    let settings = FilePersistence::at(&path).load_settings().unwrap();
    assert_eq!(settings.dispatch_mode, DispatchMode::PressAndRelease);
    assert_eq!(settings.key_bindings, cartlink_core::default_bindings());
}

#[test]
fn duplicate_keys_in_file_are_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "key_bindings": [
            { "key": "j", "button": "a" },
            { "key": "j", "button": "b" }
        ] }"#,
    )
    .unwrap();

    let err = FilePersistence::at(&path).load_settings().unwrap_err();
    assert!(format!("{err:#}").contains("bound to both"));
}
