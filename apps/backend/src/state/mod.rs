pub mod app_state;
pub mod default_prompt;
pub mod model_selection;
pub mod security_config;

pub use app_state::AppState;
pub use default_prompt::DefaultPrompt;
pub use model_selection::ModelSelection;
pub use security_config::SecurityConfig;
