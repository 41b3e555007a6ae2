pub mod test_helpers {
    use crate::event_source::{Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind};
    use crate::event_source::SimulatedEventSource;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    /// Builder for creating test scenarios with simulated user input
    #[derive(Default)]
    pub struct TestScenarioBuilder {
        pub(crate) events: Vec<Event>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::char_key(c));
            self
        }

        pub fn press_ctrl_char(mut self, c: char) -> Self {
            self.events.push(SimulatedEventSource::ctrl_char_key(c));
            self
        }

        pub fn press_key(mut self, code: KeyCode) -> Self {
            self.events
                .push(SimulatedEventSource::key_event(code, KeyModifiers::empty()));
            self
        }

        pub fn type_text(mut self, text: &str) -> Self {
            for c in text.chars() {
                self = self.press_char(c);
            }
            self
        }

        pub fn press_enter(self) -> Self {
            self.press_key(KeyCode::Enter)
        }

        pub fn press_esc(self) -> Self {
            self.press_key(KeyCode::Esc)
        }

        /// Next page (press 'l') n times
        pub fn next_page(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('l');
            }
            self
        }

        /// Prior page (press 'h') n times
        pub fn prior_page(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('h');
            }
            self
        }

        pub fn first_page(self) -> Self {
            self.press_char('g').press_char('g')
        }

        pub fn last_page(self) -> Self {
            self.press_char('G')
        }

        /// Open the go-to popup, type the page and confirm
        pub fn go_to_page(self, page: u32) -> Self {
            self.press_char('p').type_text(&page.to_string()).press_enter()
        }

        pub fn scroll_down(mut self) -> Self {
            self.events
                .push(SimulatedEventSource::mouse_event(MouseEventKind::ScrollDown, 1, 5));
            self
        }

        pub fn scroll_up(mut self) -> Self {
            self.events
                .push(SimulatedEventSource::mouse_event(MouseEventKind::ScrollUp, 1, 5));
            self
        }

        /// Left button press and release at one cell
        pub fn click(mut self, column: u16, row: u16) -> Self {
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Down(MouseButton::Left),
                column,
                row,
            ));
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Up(MouseButton::Left),
                column,
                row,
            ));
            self
        }

        /// Press at `from`, drag to `to`, release there
        pub fn drag(mut self, from: (u16, u16), to: (u16, u16)) -> Self {
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Down(MouseButton::Left),
                from.0,
                from.1,
            ));
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Drag(MouseButton::Left),
                to.0,
                to.1,
            ));
            self.events.push(SimulatedEventSource::mouse_event(
                MouseEventKind::Up(MouseButton::Left),
                to.0,
                to.1,
            ));
            self
        }

        pub fn quit(self) -> Self {
            self.press_char('q')
        }

        pub fn build(self) -> SimulatedEventSource {
            SimulatedEventSource::new(self.events)
        }
    }

    /// Create a test terminal for snapshot testing
    pub fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    /// Capture the current terminal buffer as a string
    pub fn capture_terminal_state(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut lines = Vec::new();

        for y in 0..buffer.area.height {
            let mut line = String::new();
            for x in 0..buffer.area.width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;

    #[test]
    fn scenario_builder_collects_events() {
        let builder = TestScenarioBuilder::new()
            .next_page(2)
            .first_page()
            .go_to_page(12)
            .click(3, 4)
            .quit();
        // l l g g p 1 2 Enter down up q
        assert_eq!(builder.events.len(), 11);
    }
}
