use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

/// Smooths over terminal differences before events reach the app.
///
/// - Shift+Tab arrives as `BackTab` everywhere.
/// - Key releases and repeats are dropped; Windows reports both.
/// - Bare pointer motion is dropped; only button drags move areas.
#[derive(Debug, Default)]
pub struct InputNormalizer {
    esc_down: bool,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<Event> {
        match evt {
            Event::Key(mut key) => {
                if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
                    key.code = KeyCode::BackTab;
                    key.modifiers.remove(KeyModifiers::SHIFT);
                }
                match key.kind {
                    KeyEventKind::Release => {
                        if key.code == KeyCode::Esc {
                            self.esc_down = false;
                        }
                        return None;
                    }
                    KeyEventKind::Repeat => return None,
                    KeyEventKind::Press => {}
                }
                if cfg!(windows) && key.code == KeyCode::Esc {
                    if self.esc_down {
                        return None;
                    }
                    self.esc_down = true;
                } else {
                    self.esc_down = false;
                }
                Some(Event::Key(key))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseButton, MouseEvent};

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn shift_tab_becomes_backtab() {
        let mut norm = InputNormalizer::new();
        let out = norm.normalize(Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT)));
        let Some(Event::Key(k)) = out else {
            panic!("expected key event");
        };
        assert_eq!(k.code, KeyCode::BackTab);
        assert!(!k.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn releases_are_dropped() {
        let mut norm = InputNormalizer::new();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(Event::Key(key)).is_none());
    }

    #[test]
    fn bare_motion_is_dropped_but_drags_pass() {
        let mut norm = InputNormalizer::new();
        assert!(norm.normalize(mouse(MouseEventKind::Moved)).is_none());
        assert!(
            norm.normalize(mouse(MouseEventKind::Drag(MouseButton::Left)))
                .is_some()
        );
        assert!(norm.normalize(Event::Resize(10, 20)).is_some());
    }
}
