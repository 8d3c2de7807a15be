use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use cartlink_app_core::{FilePersistence, Settings};
use cartlink_core::{default_bindings, ButtonInput, KeyBinding, KeyId};

pub struct BindingsManager {
    persistence: FilePersistence,
}

impl BindingsManager {
    pub fn new(config: Option<Utf8PathBuf>) -> Self {
        let persistence = match config {
            Some(path) => FilePersistence::at(path.into_std_path_buf()),
            None => FilePersistence::new(),
        };
        Self { persistence }
    }

    pub fn settings(&self) -> Result<Settings> {
        self.persistence.load_settings()
    }

    pub fn list(&self) -> Result<Vec<KeyBinding>> {
        Ok(self.settings()?.key_table()?.bindings())
    }

    /// Bind `key` to `button`, returning what the key was bound to before.
    pub fn set(&self, key: &str, button: ButtonInput) -> Result<Option<ButtonInput>> {
        let mut settings = self.settings()?;
        let mut table = settings.key_table()?;
        let previous = table.bind(key, button);
        settings.key_bindings = table.bindings();
        self.persistence.save_settings(&settings)?;
        Ok(previous)
    }

    pub fn unset(&self, key: &str) -> Result<ButtonInput> {
        let mut settings = self.settings()?;
        let mut table = settings.key_table()?;
        let removed = table
            .unbind(&KeyId::new(key))
            .with_context(|| format!("Key '{}' is not bound", key))?;
        settings.key_bindings = table.bindings();
        self.persistence.save_settings(&settings)?;
        Ok(removed)
    }

    pub fn reset(&self) -> Result<()> {
        let mut settings = self.settings()?;
        settings.key_bindings = default_bindings();
        self.persistence.save_settings(&settings)
    }
}

pub fn handle_list(config: Option<Utf8PathBuf>) -> Result<()> {
    let mgr = BindingsManager::new(config);
    let bindings = mgr.list()?;
    if bindings.is_empty() {
        println!("No key bindings. Use 'bindings reset' to restore the defaults.");
        return Ok(());
    }

    println!("{:<12} BUTTON", "KEY");
    for b in bindings {
        println!("{:<12} {}", b.key, b.button);
    }
    Ok(())
}

pub fn handle_set(config: Option<Utf8PathBuf>, key: String, button: ButtonInput) -> Result<()> {
    let mgr = BindingsManager::new(config);
    match mgr.set(&key, button)? {
        Some(previous) if previous != button => {
            println!("Key '{}' now maps to {} (was {}).", key, button, previous)
        }
        _ => println!("Key '{}' maps to {}.", key, button),
    }
    Ok(())
}

pub fn handle_unset(config: Option<Utf8PathBuf>, key: String) -> Result<()> {
    let removed = BindingsManager::new(config).unset(&key)?;
    println!("Key '{}' no longer maps to {}.", key, removed);
    Ok(())
}

pub fn handle_reset(config: Option<Utf8PathBuf>) -> Result<()> {
    BindingsManager::new(config).reset()?;
    println!("Key bindings restored to defaults.");
    Ok(())
}
