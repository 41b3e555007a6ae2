use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Recently pressed keys, for two-key commands such as `gg`
#[derive(Debug)]
pub struct KeySeq {
    keys: Vec<KeyEvent>,
    last_key_time: Instant,
    timeout: Duration,
}

impl Default for KeySeq {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySeq {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(1))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            keys: Vec::new(),
            last_key_time: Instant::now(),
            timeout,
        }
    }

    /// Record a character key and return the sequence typed so far
    pub fn handle_key(&mut self, key_char: char) -> String {
        self.check_timeout();

        if self.keys.len() == 2 {
            self.keys.remove(0);
        }
        self.keys
            .push(KeyEvent::new(KeyCode::Char(key_char), KeyModifiers::NONE));
        self.last_key_time = Instant::now();

        self.current_sequence()
    }

    pub fn current_sequence(&self) -> String {
        if self.is_expired() {
            return String::new();
        }
        self.keys
            .iter()
            .filter_map(|k| match k.code {
                KeyCode::Char(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn is_expired(&self) -> bool {
        self.keys.is_empty() || self.last_key_time.elapsed() > self.timeout
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    fn check_timeout(&mut self) {
        if !self.keys.is_empty() && self.last_key_time.elapsed() > self.timeout {
            self.keys.clear();
        }
    }
}
