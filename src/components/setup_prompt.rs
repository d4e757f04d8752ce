//! Two-stage setup dialog: how many areas, then which palette.

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::area::handles::rect_contains;
use crate::components::Component;
use crate::constants::AREA_COUNT_CHOICES;
use crate::keybindings::{Action, KeyBindings};
use crate::palette::Palette;
use crate::ui::{UiFrame, safe_set_string};

const DIALOG_WIDTH: u16 = 56;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStage {
    Count,
    Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupChoice {
    pub count: usize,
    pub palette: Palette,
}

#[derive(Debug)]
pub struct SetupPrompt {
    stage: PromptStage,
    count: Option<usize>,
    selected: usize,
    buttons: Vec<Rect>,
    visible: bool,
    choice: Option<SetupChoice>,
}

impl Default for SetupPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupPrompt {
    pub fn new() -> Self {
        Self {
            stage: PromptStage::Count,
            count: None,
            selected: 0,
            buttons: Vec::new(),
            visible: true,
            choice: None,
        }
    }

    /// Skip the count stage when the count is already known.
    pub fn with_count(count: usize) -> Self {
        Self {
            stage: PromptStage::Palette,
            count: Some(count),
            ..Self::new()
        }
    }

    pub fn stage(&self) -> PromptStage {
        self.stage
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The finished setup, once, after the last stage was answered through
    /// [`Component::handle_event`].
    pub fn take_choice(&mut self) -> Option<SetupChoice> {
        self.choice.take()
    }

    fn labels(&self) -> Vec<String> {
        match self.stage {
            PromptStage::Count => AREA_COUNT_CHOICES.iter().map(|c| c.to_string()).collect(),
            PromptStage::Palette => Palette::ALL.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn title(&self) -> &'static str {
        match self.stage {
            PromptStage::Count => " How many areas? ",
            PromptStage::Palette => " Which colors? ",
        }
    }

    fn choice_count(&self) -> usize {
        match self.stage {
            PromptStage::Count => AREA_COUNT_CHOICES.len(),
            PromptStage::Palette => Palette::ALL.len(),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.choice_count() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }

    /// Accept the highlighted choice; returns the finished setup after the
    /// last stage.
    fn accept(&mut self) -> Option<SetupChoice> {
        match self.stage {
            PromptStage::Count => {
                self.count = AREA_COUNT_CHOICES.get(self.selected).copied();
                self.stage = PromptStage::Palette;
                self.selected = 0;
                self.buttons.clear();
                None
            }
            PromptStage::Palette => {
                let palette = Palette::ALL.get(self.selected).copied()?;
                let count = self.count?;
                self.visible = false;
                tracing::debug!(count, %palette, "setup chosen");
                Some(SetupChoice { count, palette })
            }
        }
    }

    fn back(&mut self) {
        if self.stage == PromptStage::Palette {
            self.stage = PromptStage::Count;
            self.selected = self
                .count
                .and_then(|c| AREA_COUNT_CHOICES.iter().position(|x| *x == c))
                .unwrap_or(0);
            self.buttons.clear();
        }
    }

    /// Feed one input event. Returns the final choice once both stages are
    /// answered.
    pub fn handle_prompt_event(&mut self, event: &Event) -> Option<SetupChoice> {
        if !self.visible {
            return None;
        }
        match event {
            Event::Key(key) => {
                let kb = KeyBindings::default();
                let action = kb.resolve(
                    key,
                    &[
                        Action::PromptPrev,
                        Action::PromptNext,
                        Action::PromptAccept,
                        Action::PromptBack,
                    ],
                )?;
                match action {
                    Action::PromptPrev => self.move_selection(-1),
                    Action::PromptNext => self.move_selection(1),
                    Action::PromptAccept => return self.accept(),
                    Action::PromptBack => self.back(),
                    _ => {}
                }
                None
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let index = self
                    .buttons
                    .iter()
                    .position(|rect| rect_contains(*rect, mouse.column, mouse.row))?;
                self.selected = index;
                self.accept()
            }
            _ => None,
        }
    }

    pub fn rect_for(&self, area: Rect) -> Rect {
        let width = area.width.min(DIALOG_WIDTH);
        let height = area.height.min(8);
        Rect {
            x: area.x.saturating_add(area.width.saturating_sub(width) / 2),
            y: area.y.saturating_add(area.height.saturating_sub(height) / 2),
            width,
            height,
        }
    }
}

impl Component for SetupPrompt {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _focused: bool) {
        self.buttons.clear();
        if !self.visible || area.width < 4 || area.height < 4 {
            return;
        }
        let rect = self.rect_for(area);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .style(
                Style::default()
                    .fg(crate::theme::dialog_fg())
                    .bg(crate::theme::dialog_bg()),
            );
        let hint = match self.stage {
            PromptStage::Count => "Left/Right to choose, Enter to accept",
            PromptStage::Palette => "Enter to start, Esc to go back",
        };
        frame.render_widget(
            Paragraph::new(hint)
                .alignment(Alignment::Center)
                .style(Style::default().fg(crate::theme::dialog_separator()))
                .block(block),
            rect,
        );

        let inner = Rect {
            x: rect.x.saturating_add(2),
            y: rect.y.saturating_add(2),
            width: rect.width.saturating_sub(4),
            height: rect.height.saturating_sub(3),
        };
        let selected_style = Style::default()
            .fg(crate::theme::choice_selected_fg())
            .bg(crate::theme::choice_selected_bg())
            .add_modifier(Modifier::BOLD);
        let normal_style = Style::default()
            .fg(crate::theme::dialog_fg())
            .bg(crate::theme::choice_bg());

        let buffer = frame.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        let (mut x, mut y) = (inner.x, inner.y);
        let right = inner.x.saturating_add(inner.width);
        for (index, label) in self.labels().iter().enumerate() {
            let text = format!(" {label} ");
            let width = text.chars().count() as u16;
            if x > inner.x && x.saturating_add(width) > right {
                x = inner.x;
                y = y.saturating_add(2);
            }
            let style = if index == self.selected {
                selected_style
            } else {
                normal_style
            };
            safe_set_string(buffer, bounds, x, y, &text, style);
            self.buttons.push(Rect {
                x,
                y,
                width,
                height: 1,
            });
            x = x.saturating_add(width + 1);
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.visible {
            return false;
        }
        if let Some(choice) = self.handle_prompt_event(event) {
            self.choice = Some(choice);
        }
        // Modal: nothing behind the prompt sees input while it is open.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keyboard_walks_both_stages() {
        let mut prompt = SetupPrompt::new();
        assert_eq!(prompt.handle_prompt_event(&key(KeyCode::Right)), None);
        assert_eq!(prompt.handle_prompt_event(&key(KeyCode::Right)), None);
        // 2, 5, 10
        assert_eq!(prompt.handle_prompt_event(&key(KeyCode::Enter)), None);
        assert_eq!(prompt.stage(), PromptStage::Palette);
        prompt.handle_prompt_event(&key(KeyCode::Left));
        let choice = prompt.handle_prompt_event(&key(KeyCode::Enter));
        assert_eq!(
            choice,
            Some(SetupChoice {
                count: 10,
                palette: Palette::Monochrome
            })
        );
        assert!(!prompt.visible());
    }

    #[test]
    fn component_events_keep_the_answer_until_taken() {
        let mut prompt = SetupPrompt::new();
        assert!(prompt.handle_event(&key(KeyCode::Enter)));
        assert_eq!(prompt.take_choice(), None);
        assert!(prompt.handle_event(&key(KeyCode::Enter)));
        assert_eq!(
            prompt.take_choice(),
            Some(SetupChoice {
                count: 2,
                palette: Palette::Random
            })
        );
        assert_eq!(prompt.take_choice(), None);
    }

    #[test]
    fn back_returns_to_the_count_stage() {
        let mut prompt = SetupPrompt::new();
        prompt.handle_prompt_event(&key(KeyCode::Tab));
        prompt.handle_prompt_event(&key(KeyCode::Enter));
        prompt.handle_prompt_event(&key(KeyCode::Esc));
        assert_eq!(prompt.stage(), PromptStage::Count);
        assert_eq!(prompt.selected(), 1);
    }

    #[test]
    fn preset_count_starts_at_palette() {
        let mut prompt = SetupPrompt::with_count(300);
        assert_eq!(prompt.stage(), PromptStage::Palette);
        prompt.handle_prompt_event(&key(KeyCode::Right));
        assert_eq!(
            prompt.handle_prompt_event(&key(KeyCode::Enter)),
            Some(SetupChoice {
                count: 300,
                palette: Palette::Red
            })
        );
    }

    #[test]
    fn clicking_a_rendered_choice_accepts_it() {
        let mut prompt = SetupPrompt::new();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        prompt.render(&mut UiFrame::from_parts(area, &mut buf), area, true);
        let target = prompt.buttons[3];
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: target.x,
            row: target.y,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(prompt.handle_prompt_event(&click), None);
        assert_eq!(prompt.stage(), PromptStage::Palette);
        assert_eq!(prompt.count, Some(30));
    }
}
