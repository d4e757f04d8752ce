use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::area::handles::rect_contains;
use crate::components::Component;
use crate::keybindings::{Action, KeyBindings};
use crate::ui::UiFrame;

const DEFAULT_MAX_LINES: usize = 2000;
static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();
static PANIC_PENDING: AtomicBool = AtomicBool::new(false);

pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Route panic reports into the debug log so they survive the alternate
/// screen being torn down.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(handle) = GLOBAL_LOG.get() {
            handle.push("=== PANIC ===");
            if let Some(location) = info.location() {
                handle.push(format!(
                    "{}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                ));
            }
            if let Some(msg) = info.payload().downcast_ref::<&str>() {
                handle.push(format!("message: {msg}"));
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                handle.push(format!("message: {msg}"));
            } else {
                handle.push("message: <non-string panic>");
            }
            let backtrace = std::backtrace::Backtrace::force_capture();
            for line in backtrace.to_string().lines() {
                handle.push(line.to_string());
            }
            handle.push("=============");
        }
        PANIC_PENDING.store(true, Ordering::SeqCst);
        prev(info);
    }));
}

pub fn take_panic_pending() -> bool {
    PANIC_PENDING.swap(false, Ordering::SeqCst)
}

#[derive(Debug)]
struct DebugLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl DebugLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Shared, bounded line buffer fed by the tracing subscriber.
#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<DebugLogBuffer>>,
}

impl DebugLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebugLogBuffer::new(max_lines))),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `count` lines ending `back` lines before the newest one.
    pub fn tail(&self, count: usize, back: usize) -> Vec<String> {
        let Ok(buffer) = self.inner.lock() else {
            return Vec::new();
        };
        let end = buffer.lines.len().saturating_sub(back);
        let start = end.saturating_sub(count);
        buffer.lines.range(start..end).cloned().collect()
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter::new(self.clone())
    }
}

/// `io::Write` adapter that pushes one buffer line per newline.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn push_text(&self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            self.handle.push(line.to_string());
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        if let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') {
            let complete: Vec<u8> = self.pending.drain(..=pos).collect();
            self.push_text(&complete);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.push_text(&rest);
        }
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Bottom panel showing the newest log lines.
#[derive(Debug)]
pub struct DebugLogComponent {
    handle: DebugLogHandle,
    visible: bool,
    /// Lines scrolled back from the tail; zero follows new output.
    back: usize,
    area: Rect,
}

impl DebugLogComponent {
    pub fn new(max_lines: usize) -> (Self, DebugLogHandle) {
        let handle = DebugLogHandle::new(max_lines);
        (Self::with_handle(handle.clone()), handle)
    }

    pub fn new_default() -> (Self, DebugLogHandle) {
        Self::new(DEFAULT_MAX_LINES)
    }

    pub fn with_handle(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            visible: false,
            back: 0,
            area: Rect::default(),
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.back = 0;
    }

    pub fn following(&self) -> bool {
        self.back == 0
    }

    fn page(&self) -> usize {
        usize::from(self.area.height.saturating_sub(2)).max(1)
    }

    fn scroll_back(&mut self, lines: usize) {
        let max_back = self.handle.len().saturating_sub(self.page());
        self.back = self.back.saturating_add(lines).min(max_back);
    }

    fn scroll_forward(&mut self, lines: usize) {
        self.back = self.back.saturating_sub(lines);
    }
}

impl Component for DebugLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        self.area = area;
        if !self.visible || area.width == 0 || area.height < 3 {
            return;
        }
        frame.render_widget(Clear, area);
        let lines = self.handle.tail(self.page(), self.back);
        let title = if self.following() {
            " debug log ".to_string()
        } else {
            format!(" debug log (-{}) ", self.back)
        };
        let mut border = Style::default();
        if focused {
            border = border
                .fg(crate::theme::debug_highlight())
                .add_modifier(Modifier::BOLD);
        }
        let block = Block::default()
            .title(title)
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_style(border);
        let text = Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>());
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.visible {
            return false;
        }
        match event {
            Event::Key(key) => {
                let kb = KeyBindings::default();
                match kb.resolve(key, &[Action::ScrollPageUp, Action::ScrollPageDown]) {
                    Some(Action::ScrollPageUp) => {
                        self.scroll_back(self.page());
                        true
                    }
                    Some(Action::ScrollPageDown) => {
                        self.scroll_forward(self.page());
                        true
                    }
                    _ => false,
                }
            }
            Event::Mouse(mouse) if rect_contains(self.area, mouse.column, mouse.row) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.scroll_back(3),
                    MouseEventKind::ScrollDown => self.scroll_forward(3),
                    _ => {}
                }
                // The panel covers the field; presses on it never reach areas.
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    #[test]
    fn buffer_is_capped() {
        let (_comp, handle) = DebugLogComponent::new(3);
        for line in ["one", "two", "three", "four"] {
            handle.push(line);
        }
        assert_eq!(handle.len(), 3);
        assert_eq!(handle.tail(10, 0), vec!["two", "three", "four"]);
        assert_eq!(handle.tail(1, 1), vec!["three"]);
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial() {
        let (_comp, handle) = DebugLogComponent::new(10);
        let mut writer = handle.writer();
        writer.write_all(b"first line\nsecond line\npartial").unwrap();
        assert_eq!(handle.len(), 2);
        writer.flush().unwrap();
        assert_eq!(handle.tail(10, 0), vec!["first line", "second line", "partial"]);
    }

    #[test]
    fn page_keys_scroll_and_return_to_tail() {
        let (mut comp, handle) = DebugLogComponent::new(100);
        for i in 0..40 {
            handle.push(format!("line{i}"));
        }
        comp.set_visible(true);
        let area = Rect::new(0, 0, 20, 7);
        let mut buf = Buffer::empty(area);
        comp.render(&mut UiFrame::from_parts(area, &mut buf), area, false);

        let page_up = Event::Key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE));
        assert!(comp.handle_event(&page_up));
        assert_eq!(comp.back, 5);
        assert!(!comp.following());
        let page_down = Event::Key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        comp.handle_event(&page_down);
        assert!(comp.following());
    }

    #[test]
    fn hidden_panel_ignores_events() {
        let (mut comp, _handle) = DebugLogComponent::new(10);
        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert!(!comp.handle_event(&scroll));
    }

    #[test]
    fn renders_newest_lines() {
        let (mut comp, handle) = DebugLogComponent::new(10);
        handle.push("older");
        handle.push("newest");
        comp.set_visible(true);
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        comp.render(&mut UiFrame::from_parts(area, &mut buf), area, false);
        assert_eq!(buf.cell((0, 1)).map(|c| c.symbol()), Some("n"));
    }
}
