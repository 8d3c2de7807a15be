use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use cartlink_app_core::shell::{shell_channel, ChannelNotifier, ShellEvent, ShellState, ShellStore};
use cartlink_app_core::{
    BridgeError, CartridgeLoader, DispatchOutcome, EngineLifecycleGate, EventHub, FilePersistence,
    GameLoaded, InputDispatcher, LifecycleState,
};
use cartlink_core::{CartridgeHeader, KeyboardEvent, PointerEvent, RawInput};
use cartlink_infra::{EngineProbe, FsCartridgeFile, ProbeRecord, ReferenceModuleLoader};
use tracing::{debug, info};

use crate::CliDispatchMode;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub rom: Utf8PathBuf,
    pub keys: Vec<String>,
    pub clicks: Vec<String>,
    pub early_keys: Vec<String>,
    pub load_delay_ms: u64,
    pub fail_load: Option<String>,
    pub mode: Option<CliDispatchMode>,
    pub config: Option<Utf8PathBuf>,
}

impl RunOptions {
    pub fn new(rom: impl Into<Utf8PathBuf>) -> Self {
        Self {
            rom: rom.into(),
            keys: Vec::new(),
            clicks: Vec::new(),
            early_keys: Vec::new(),
            load_delay_ms: cartlink_config::DEFAULT_ENGINE_LOAD_DELAY_MS,
            fail_load: None,
            mode: None,
            config: None,
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub loaded: Result<GameLoaded, BridgeError>,
    pub lifecycle: LifecycleState,
    pub early: Vec<(String, DispatchOutcome)>,
    pub probe: ProbeRecord,
    pub shell: ShellState,
}

/// One browser session against `gate`: boot the engine, upload the ROM
/// while the engine is still loading, then play the scripted input.
pub async fn run_session(gate: Arc<EngineLifecycleGate>, opts: RunOptions) -> Result<RunReport> {
    let persistence = match &opts.config {
        Some(path) => FilePersistence::at(path.as_std_path()),
        None => FilePersistence::new(),
    };
    let settings = persistence.load_settings()?;
    let mode = opts
        .mode
        .map(Into::into)
        .unwrap_or(settings.dispatch_mode);

    let probe = EngineProbe::new();
    let mut module = ReferenceModuleLoader::new(probe.clone()).with_delay_ms(opts.load_delay_ms);
    if let Some(message) = &opts.fail_load {
        module = module.failing(message.clone());
    }

    let (tx, mut rx) = shell_channel();
    let store = ShellStore::default();

    let init = gate.spawn_initialize(module);
    let lifecycle = {
        let ready = gate.await_ready();
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = match ready.await {
                Ok(()) => ShellEvent::EngineReady,
                Err(e) => ShellEvent::EngineFailed {
                    message: e.to_string(),
                },
            };
            let _ = tx.send(event).await;
        })
    };

    let mut dispatcher = InputDispatcher::new(Arc::clone(&gate), settings.key_table()?, mode);

    let early = opts
        .early_keys
        .iter()
        .flat_map(|key| {
            [
                KeyboardEvent::down(key.as_str()),
                KeyboardEvent::up(key.as_str()),
            ]
        })
        .map(|event| {
            let key = event.key.to_string();
            (key, dispatcher.on_raw_event(RawInput::Key(event)))
        })
        .collect::<Vec<_>>();

    let loader = CartridgeLoader::new(Arc::clone(&gate), Arc::new(ChannelNotifier::new(tx.clone())));
    let file = FsCartridgeFile::new(opts.rom.clone())?;
    let loaded = loader.submit(&file).await;
    if let Err(e) = &loaded {
        let _ = tx
            .send(ShellEvent::CartridgeFailed {
                message: e.to_string(),
            })
            .await;
    }

    lifecycle.await.context("lifecycle watcher panicked")?;
    if let Err(e) = init.await.context("engine load task panicked")? {
        debug!("engine initialization ended with {e}");
    }

    if loaded.is_ok() {
        let keyboard: EventHub<KeyboardEvent> = EventHub::new();
        let pointer: EventHub<PointerEvent> = EventHub::new();
        dispatcher.register_keyboard(&keyboard);
        dispatcher.register_pointer(&pointer);

        for key in &opts.keys {
            keyboard.emit(&KeyboardEvent::down(key.as_str()));
            keyboard.emit(&KeyboardEvent::up(key.as_str()));
        }
        for widget in &opts.clicks {
            pointer.emit(&PointerEvent::down(widget.as_str()));
            pointer.emit(&PointerEvent::up(widget.as_str()));
        }
        info!(
            "replayed {} keys and {} clicks",
            opts.keys.len(),
            opts.clicks.len()
        );
    }
    dispatcher.teardown();

    drop(tx);
    store.drain(&mut rx);

    Ok(RunReport {
        loaded,
        lifecycle: gate.state(),
        early,
        probe: probe.snapshot(),
        shell: store.state(),
    })
}

pub async fn cmd_run(opts: RunOptions) -> Result<()> {
    println!(":: Loading engine and cartridge: {}", opts.rom);

    let report = run_session(EngineLifecycleGate::global(), opts).await?;

    println!("   Engine: {:?}", report.lifecycle);
    for (key, outcome) in &report.early {
        println!("   Early key {:<10} {:?}", key, outcome);
    }

    match &report.loaded {
        Ok(game) => {
            println!("\n:: Game loaded");
            println!("   File:  {}", game.file_name);
            println!("   Size:  {} bytes", game.size);
            if let Some(title) = &game.title {
                println!("   Title: {}", title);
            }
        }
        Err(e) => println!("\n:: Cartridge not loaded: {}", e),
    }

    println!("\n:: Engine probe");
    for cart in &report.probe.cartridges {
        println!("   Cartridge: '{}' ({} bytes, cgb: {})", cart.title, cart.size, cart.cgb);
    }
    for event in &report.probe.buttons {
        println!("   Button:    {}", event);
    }
    println!(
        "   P1:        dpad {:#04x}, buttons {:#04x}",
        report.probe.joypad.read_p1(0x20),
        report.probe.joypad.read_p1(0x10)
    );
    println!("   View:      {:?}", report.shell.view);

    report.loaded.map(|_| ()).map_err(Into::into)
}

pub async fn cmd_inspect(rom: Utf8PathBuf) -> Result<()> {
    let image = tokio::fs::read(&rom)
        .await
        .with_context(|| format!("Failed to read {}", rom))?;
    let header = CartridgeHeader::parse(&image).with_context(|| format!("{} has no valid header", rom))?;

    println!("{}", serde_json::to_string_pretty(&header)?);
    if let Some(declared) = header.rom_size_bytes() {
        if declared != image.len() {
            println!(
                ":: Header declares {} bytes, file has {}",
                declared,
                image.len()
            );
        }
    }
    Ok(())
}
