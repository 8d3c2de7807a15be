use std::sync::Arc;

use cartlink_app_core::{
    BridgeError, CartridgeLoader, DispatchMode, DispatchOutcome, EngineHandle,
    EngineLifecycleGate, EngineModuleLoader, InputDispatcher, NullSink,
};
use cartlink_core::{
    write_header, ButtonEvent, ButtonInput, EngineCommand, KeyBindingTable, KeyboardEvent,
};
use cartlink_infra::{EngineProbe, FsCartridgeFile, ReferenceEngine, ReferenceModuleLoader};

fn rom(title: &str) -> Vec<u8> {
    let mut image = vec![0u8; 0x8000];
    write_header(&mut image, title).unwrap();
    image
}

#[test]
fn rejects_buttons_before_a_cartridge() {
    let probe = EngineProbe::new();
    let mut engine = ReferenceEngine::new(probe.clone());

    let err = engine.button(ButtonEvent::press(ButtonInput::A)).unwrap_err();
    assert_eq!(err.0, "no cartridge loaded");
    assert!(probe.buttons().is_empty());
}

#[test]
fn rejects_images_without_a_valid_header() {
    let probe = EngineProbe::new();
    let mut engine = ReferenceEngine::new(probe.clone());

    let err = engine.load_cartridge(&[0u8; 64]).unwrap_err();
    assert!(err.0.contains("too short"), "{err}");

    let mut image = rom("TETRIS");
    image[0x0134] ^= 0xFF;
    let err = engine.load_cartridge(&image).unwrap_err();
    assert!(err.0.contains("checksum"), "{err}");

    assert_eq!(probe.current_cartridge(), None);
}

#[test]
fn records_cartridge_and_joypad() {
    let probe = EngineProbe::new();
    let mut engine = ReferenceEngine::new(probe.clone());

    engine.load_cartridge(&rom("ZELDA")).unwrap();
    engine.button(ButtonEvent::press(ButtonInput::Down)).unwrap();
    engine.button(ButtonEvent::press(ButtonInput::B)).unwrap();
    engine.button(ButtonEvent::release(ButtonInput::Down)).unwrap();

    let cart = probe.current_cartridge().unwrap();
    assert_eq!(cart.title, "ZELDA");
    assert_eq!(cart.size, 0x8000);

    let pad = probe.joypad();
    assert!(pad.is_held(ButtonInput::B));
    assert!(!pad.is_held(ButtonInput::Down));
    // action row selected: B is bit 1, active low
    assert_eq!(pad.read_p1(0x10) & 0x0F, 0x0D);
    assert_eq!(probe.buttons().len(), 3);
}

#[tokio::test]
async fn module_loader_delivers_a_working_engine() {
    let probe = EngineProbe::new();
    let loader = ReferenceModuleLoader::new(probe.clone()).with_delay_ms(0);
    let mut engine = loader.load().await.unwrap();

    engine.load_cartridge(&rom("KIRBY")).unwrap();
    assert_eq!(probe.current_cartridge().unwrap().title, "KIRBY");
}

#[tokio::test]
async fn forced_failure_reaches_the_gate() {
    let gate = EngineLifecycleGate::new();
    let loader = ReferenceModuleLoader::new(EngineProbe::new())
        .with_delay_ms(1)
        .failing("module fetch failed");

    let err = gate.initialize(loader).await.unwrap_err();
    assert_eq!(
        err,
        BridgeError::EngineUnavailable("module fetch failed".into())
    );
    assert_eq!(
        gate.dispatch_command(EngineCommand::Button(ButtonEvent::press(ButtonInput::A))),
        Err(BridgeError::EngineUnavailable("module fetch failed".into()))
    );
}

#[tokio::test]
async fn file_on_disk_loads_through_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pokemon.gb");
    std::fs::write(&path, rom("POKEMON RED")).unwrap();

    let probe = EngineProbe::new();
    let gate = Arc::new(EngineLifecycleGate::new());
    let init = gate.spawn_initialize(ReferenceModuleLoader::new(probe.clone()).with_delay_ms(5));

    let loader = CartridgeLoader::new(gate.clone(), Arc::new(NullSink));
    let file = FsCartridgeFile::from_std_path(&path).unwrap();
    let loaded = loader.submit(&file).await.unwrap();

    init.await.unwrap().unwrap();
    assert_eq!(loaded.file_name, "pokemon.gb");
    assert_eq!(loaded.title.as_deref(), Some("POKEMON RED"));
    assert_eq!(probe.current_cartridge().unwrap().size, 0x8000);
}

#[tokio::test]
async fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = FsCartridgeFile::from_std_path(&dir.path().join("gone.gb")).unwrap();

    let gate = Arc::new(EngineLifecycleGate::new());
    gate.initialize(ReferenceModuleLoader::new(EngineProbe::new()).with_delay_ms(0))
        .await
        .unwrap();
    let loader = CartridgeLoader::new(gate, Arc::new(NullSink));

    let err = loader.submit(&file).await.unwrap_err();
    assert!(matches!(err, BridgeError::FileReadError { ref name, .. } if name == "gone.gb"));
}

#[tokio::test]
async fn press_refused_before_cartridge_gets_no_release() {
    let probe = EngineProbe::new();
    let gate = Arc::new(EngineLifecycleGate::new());
    gate.initialize(ReferenceModuleLoader::new(probe.clone()).with_delay_ms(0))
        .await
        .unwrap();
    let input = InputDispatcher::new(
        gate.clone(),
        KeyBindingTable::with_defaults(),
        DispatchMode::PressAndRelease,
    );

    let outcome = input.on_raw_event(KeyboardEvent::down("Enter").into());
    assert_eq!(
        outcome,
        DispatchOutcome::Rejected(BridgeError::EngineRejected("no cartridge loaded".into()))
    );

    gate.dispatch_command(EngineCommand::LoadCartridge(rom("TETRIS")))
        .unwrap();
    assert_eq!(
        input.on_raw_event(KeyboardEvent::up("Enter").into()),
        DispatchOutcome::Suppressed
    );
    assert!(probe.buttons().is_empty());
    assert!(!probe.joypad().is_held(ButtonInput::Start));
}
