use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use cartlink_core::{
    ButtonEvent, ButtonInput, EngineCommand, KeyBindingTable, KeyId, KeyPhase, KeyboardEvent,
    PointerEvent, PointerPhase, RawInput, WidgetId,
};

use crate::domain::{DispatchMode, Settings};
use crate::error::BridgeError;
use crate::gate::EngineLifecycleGate;
use crate::subscription::{RawEventSource, Subscription};

/// What happened to one raw event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Reached the engine.
    Forwarded(ButtonEvent),
    /// No button for this key or widget.
    Unmapped,
    /// Repeat, duplicate press, or a release that is not forwarded.
    Suppressed,
    /// The engine was not ready; the event is gone for good.
    Dropped,
    /// The engine refused the event or is unavailable.
    Rejected(BridgeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InputSource {
    Key(KeyId),
    Widget(WidgetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Press,
    Repeat,
    Release,
}

struct DispatchCore {
    gate: Arc<EngineLifecycleGate>,
    bindings: KeyBindingTable,
    mode: DispatchMode,
    /// Held sources, and whether the engine accepted their press.
    pressed: Mutex<HashMap<InputSource, bool>>,
}

impl DispatchCore {
    fn resolve(&self, raw: RawInput) -> (InputSource, Option<ButtonInput>, Edge) {
        match raw {
            RawInput::Key(KeyboardEvent { key, phase }) => {
                let button = self.bindings.lookup(&key);
                let edge = match phase {
                    KeyPhase::Down => Edge::Press,
                    KeyPhase::Repeat => Edge::Repeat,
                    KeyPhase::Up => Edge::Release,
                };
                (InputSource::Key(key), button, edge)
            }
            RawInput::Pointer(PointerEvent { widget, phase }) => {
                let button = ButtonInput::for_widget(widget.as_str());
                let edge = match phase {
                    PointerPhase::Down => Edge::Press,
                    PointerPhase::Up => Edge::Release,
                };
                (InputSource::Widget(widget), button, edge)
            }
        }
    }

    fn on_raw_event(&self, raw: RawInput) -> DispatchOutcome {
        let (source, button, edge) = self.resolve(raw);
        let Some(button) = button else {
            trace!("ignoring unmapped input {source:?}");
            return DispatchOutcome::Unmapped;
        };

        // Held across the forward so the engine sees events in observed order.
        let mut pressed = self.pressed.lock().unwrap_or_else(PoisonError::into_inner);

        let event = match edge {
            // A repeat with no recorded press (e.g. focus gained mid-hold)
            // still counts as the transition into pressed.
            Edge::Press | Edge::Repeat => {
                if pressed.contains_key(&source) {
                    return DispatchOutcome::Suppressed;
                }
                let event = ButtonEvent::press(button);
                let outcome = self.forward(event);
                let delivered = matches!(outcome, DispatchOutcome::Forwarded(_));
                pressed.insert(source, delivered);
                return outcome;
            }
            Edge::Release => {
                // Only a press the engine accepted gets its release.
                let delivered = pressed.remove(&source).unwrap_or(false);
                if !delivered || self.mode == DispatchMode::PressOnly {
                    return DispatchOutcome::Suppressed;
                }
                ButtonEvent::release(button)
            }
        };
        self.forward(event)
    }

    fn forward(&self, event: ButtonEvent) -> DispatchOutcome {
        match self.gate.dispatch_command(EngineCommand::Button(event)) {
            Ok(()) => {
                debug!("forwarded {event}");
                DispatchOutcome::Forwarded(event)
            }
            Err(BridgeError::NotReady) => {
                debug!("dropped {event}: engine not ready");
                DispatchOutcome::Dropped
            }
            Err(e) => {
                warn!("{event} not delivered: {e}");
                DispatchOutcome::Rejected(e)
            }
        }
    }
}

/// Turns keyboard and pointer events into button events for the engine.
///
/// Subscriptions made through [`Self::register_keyboard`] and
/// [`Self::register_pointer`] live as long as the dispatcher and are
/// released by [`Self::teardown`] or on drop.
pub struct InputDispatcher {
    core: Arc<DispatchCore>,
    subscriptions: Vec<Subscription>,
}

impl InputDispatcher {
    pub fn new(gate: Arc<EngineLifecycleGate>, bindings: KeyBindingTable, mode: DispatchMode) -> Self {
        Self {
            core: Arc::new(DispatchCore {
                gate,
                bindings,
                mode,
                pressed: Mutex::new(HashMap::new()),
            }),
            subscriptions: Vec::new(),
        }
    }

    pub fn from_settings(
        gate: Arc<EngineLifecycleGate>,
        settings: &Settings,
    ) -> Result<Self, cartlink_core::BindingError> {
        Ok(Self::new(gate, settings.key_table()?, settings.dispatch_mode))
    }

    pub fn bindings(&self) -> &KeyBindingTable {
        &self.core.bindings
    }

    pub fn mode(&self) -> DispatchMode {
        self.core.mode
    }

    pub fn register_keyboard(&mut self, source: &dyn RawEventSource<KeyboardEvent>) {
        let core = Arc::clone(&self.core);
        let sub = source.subscribe(Box::new(move |event: &KeyboardEvent| {
            core.on_raw_event(RawInput::Key(event.clone()));
        }));
        self.subscriptions.push(sub);
    }

    pub fn register_pointer(&mut self, source: &dyn RawEventSource<PointerEvent>) {
        let core = Arc::clone(&self.core);
        let sub = source.subscribe(Box::new(move |event: &PointerEvent| {
            core.on_raw_event(RawInput::Pointer(event.clone()));
        }));
        self.subscriptions.push(sub);
    }

    pub fn on_raw_event(&self, raw: RawInput) -> DispatchOutcome {
        self.core.on_raw_event(raw)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Release every subscription. Safe to call more than once.
    pub fn teardown(&mut self) {
        if !self.subscriptions.is_empty() {
            debug!("releasing {} input subscriptions", self.subscriptions.len());
        }
        for mut sub in self.subscriptions.drain(..) {
            sub.dispose();
        }
    }
}

impl Drop for InputDispatcher {
    fn drop(&mut self) {
        self.teardown();
    }
}
