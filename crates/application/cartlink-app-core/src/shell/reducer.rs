use super::events::ShellEvent;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Engine module still loading.
    #[default]
    Booting,
    /// Waiting for the user to pick a cartridge.
    Upload,
    /// A cartridge is running; on-screen controls are attached.
    Play,
    /// The engine failed to load; nothing can run this session.
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct ShellState {
    pub view: View,
    pub loaded_title: Option<String>,
    pub games_loaded: u32,
    pub error: Option<String>,
}

impl ShellState {
    /// Controls are only attached once a game is running.
    pub fn controls_attached(&self) -> bool {
        self.view == View::Play
    }
}

pub fn reduce(mut state: ShellState, ev: ShellEvent) -> ShellState {
    match ev {
        ShellEvent::EngineReady => {
            if state.view == View::Booting {
                state.view = View::Upload;
            }
        }

        ShellEvent::EngineFailed { message } => {
            state.view = View::Unavailable;
            state.error = Some(message);
        }

        ShellEvent::GameLoaded(loaded) => {
            if state.view != View::Unavailable {
                state.view = View::Play;
                state.loaded_title = loaded.title.or(Some(loaded.file_name));
                state.games_loaded += 1;
                state.error = None;
            }
        }

        ShellEvent::CartridgeFailed { message } => {
            state.error = Some(message);
        }
    }
    state
}
