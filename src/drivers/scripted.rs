use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Size;

use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

/// Replays a fixed list of events, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedInputDriver {
    events: VecDeque<Event>,
    mouse_capture: Option<bool>,
}

impl ScriptedInputDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
            mouse_capture: None,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    pub fn mouse_capture(&self) -> Option<bool> {
        self.mouse_capture
    }
}

impl InputDriver for ScriptedInputDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.mouse_capture = Some(enabled);
        Ok(())
    }
}

/// Off-screen output backed by ratatui's `TestBackend`.
pub struct HeadlessOutputDriver {
    terminal: Terminal<TestBackend>,
    entered: bool,
}

impl HeadlessOutputDriver {
    pub fn new(width: u16, height: u16) -> io::Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn entered(&self) -> bool {
        self.entered
    }
}

impl OutputDriver for HeadlessOutputDriver {
    type Backend = TestBackend;

    fn enter(&mut self) -> io::Result<()> {
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        self.entered = false;
        Ok(())
    }

    fn size(&self) -> io::Result<Size> {
        self.terminal
            .size()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| f(UiFrame::new(frame)))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn replays_in_order_then_runs_dry() {
        let key = |c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        let mut d = ScriptedInputDriver::new([key('a'), key('b')]);
        assert!(d.poll(Duration::ZERO).unwrap());
        assert_eq!(d.read().unwrap(), key('a'));
        assert_eq!(d.read().unwrap(), key('b'));
        assert!(!d.poll(Duration::ZERO).unwrap());
        assert!(d.read().is_err());
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        fn enable<D: InputDriver>(mut driver: D) -> io::Result<()> {
            driver.set_mouse_capture(true)
        }
        let mut d = ScriptedInputDriver::default();
        enable(&mut d).unwrap();
        assert_eq!(d.mouse_capture(), Some(true));
    }

    #[test]
    fn headless_draw_lands_in_buffer() {
        let mut out = HeadlessOutputDriver::new(4, 2).unwrap();
        out.draw(|mut frame| {
            let area = frame.area();
            frame.set_cell(area.x, area.y, "x", ratatui::style::Style::default());
        })
        .unwrap();
        assert_eq!(out.buffer().cell((0, 0)).map(|c| c.symbol()), Some("x"));
        assert_eq!(out.size().unwrap(), Size::new(4, 2));
    }
}
