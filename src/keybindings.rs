use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    ToggleDebugLog,
    Reroll,
    // Setup prompt
    PromptPrev,
    PromptNext,
    PromptAccept,
    PromptBack,
    // Debug log scrolling
    ScrollPageUp,
    ScrollPageDown,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::ToggleDebugLog => "Toggle debug log",
            Action::Reroll => "New scene",
            Action::PromptPrev => "Previous choice",
            Action::PromptNext => "Next choice",
            Action::PromptAccept => "Accept choice",
            Action::PromptBack => "Back",
            Action::ScrollPageUp => "Scroll log up",
            Action::ScrollPageDown => "Scroll log down",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        kb.add(Quit, KeyCombo::plain(KeyCode::Char('q')));
        kb.add(ToggleDebugLog, KeyCombo::plain(KeyCode::Char('d')));
        kb.add(Reroll, KeyCombo::plain(KeyCode::Char('r')));

        kb.add(PromptPrev, KeyCombo::plain(KeyCode::Left));
        kb.add(PromptPrev, KeyCombo::plain(KeyCode::BackTab));
        kb.add(PromptNext, KeyCombo::plain(KeyCode::Right));
        kb.add(PromptNext, KeyCombo::plain(KeyCode::Tab));
        kb.add(PromptAccept, KeyCombo::plain(KeyCode::Enter));
        kb.add(PromptAccept, KeyCombo::plain(KeyCode::Char(' ')));
        kb.add(PromptBack, KeyCombo::plain(KeyCode::Esc));
        kb.add(PromptBack, KeyCombo::plain(KeyCode::Backspace));

        kb.add(ScrollPageUp, KeyCombo::plain(KeyCode::PageUp));
        kb.add(ScrollPageDown, KeyCombo::plain(KeyCode::PageDown));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    /// First of `candidates` bound to `key`.
    ///
    /// Several actions may share a key in different modes, so the caller
    /// names the ones that apply.
    pub fn resolve(&self, key: &KeyEvent, candidates: &[Action]) -> Option<Action> {
        candidates
            .iter()
            .copied()
            .find(|action| self.matches(*action, key))
    }

    /// Display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(KeyCombo::display).collect())
            .unwrap_or_default()
    }

    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        assert!(kb.matches(
            Action::Quit,
            &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(kb.matches(
            Action::Quit,
            &KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)
        ));
        assert!(!kb.matches(
            Action::Quit,
            &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)
        ));
    }

    #[test]
    fn resolve_respects_candidate_order() {
        let kb = KeyBindings::default();
        let tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(
            kb.resolve(&tab, &[Action::Quit, Action::PromptNext]),
            Some(Action::PromptNext)
        );
        assert_eq!(kb.resolve(&tab, &[Action::Quit, Action::Reroll]), None);
    }

    #[test]
    fn combo_display() {
        let kb = KeyBindings::default();
        assert_eq!(kb.combos_for(Action::Quit), vec!["Ctrl+c", "q"]);
        assert_eq!(
            kb.first_combo(Action::ToggleDebugLog).map(|c| c.to_string()),
            Some("d".to_string())
        );
    }
}
