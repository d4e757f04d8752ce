use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod debug_log;
pub mod field_view;
pub mod setup_prompt;
pub mod status_bar;

pub use debug_log::{DebugLogComponent, DebugLogHandle};
pub use field_view::render_scene;
pub use setup_prompt::{PromptStage, SetupChoice, SetupPrompt};
pub use status_bar::StatusBar;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool);

    fn handle_event(&mut self, _event: &Event) -> bool {
        false
    }
}
