// Key behavior configuration
//
// Navigation keys repeat while held. Action keys fire once per press, with
// a short debounce for terminals that never send release events.

use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Minimum gap between two triggers of a held action key
const ACTION_DEBOUNCE: Duration = Duration::from_millis(150);

/// Without release events, a press this long after the previous one is a new
/// press rather than terminal auto-repeat
const RELEASE_GAP: Duration = Duration::from_millis(200);

/// Defines how a key should behave when pressed/held
#[derive(Debug, Clone, Copy)]
pub enum KeyBehavior {
    /// Trigger once per press (row actions, modal openers)
    StateChange,

    /// Trigger on press, then repeat after an initial delay (row movement)
    Repeatable {
        initial_delay: Duration,
        repeat_interval: Duration,
    },
}

impl KeyBehavior {
    pub fn navigation() -> Self {
        Self::Repeatable {
            initial_delay: Duration::from_millis(400),
            repeat_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Default)]
struct KeyState {
    pressed_at: Option<Instant>,
    last_triggered: Option<Instant>,
    last_seen: Option<Instant>,
}

/// Tracks held keys and decides whether a press should act
pub struct InputHandler {
    key_states: HashMap<KeyCode, KeyState>,
    key_behaviors: HashMap<KeyCode, KeyBehavior>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            key_states: HashMap::new(),
            key_behaviors: HashMap::new(),
        }
    }

    pub fn configure_keys(&mut self, keys: &[KeyCode], behavior: KeyBehavior) {
        for key in keys {
            self.key_behaviors.insert(*key, behavior);
        }
    }

    /// Returns true if the press should trigger its action
    pub fn handle_key_press(&mut self, key: KeyCode) -> bool {
        self.press_at(key, Instant::now())
    }

    fn press_at(&mut self, key: KeyCode, now: Instant) -> bool {
        let behavior = self
            .key_behaviors
            .get(&key)
            .copied()
            .unwrap_or(KeyBehavior::StateChange);
        let state = self.key_states.entry(key).or_default();
        let released = state
            .last_seen
            .map_or(true, |seen| now.duration_since(seen) > RELEASE_GAP);
        state.last_seen = Some(now);

        let (Some(pressed_at), Some(last), false) =
            (state.pressed_at, state.last_triggered, released)
        else {
            state.pressed_at = Some(now);
            state.last_triggered = Some(now);
            return true;
        };

        let fire = match behavior {
            KeyBehavior::StateChange => now.duration_since(last) >= ACTION_DEBOUNCE,
            KeyBehavior::Repeatable {
                initial_delay,
                repeat_interval,
            } => {
                now.duration_since(pressed_at) >= initial_delay
                    && now.duration_since(last) >= repeat_interval
            }
        };
        if fire {
            state.last_triggered = Some(now);
        }
        fire
    }

    pub fn handle_key_release(&mut self, key: KeyCode) {
        self.key_states.remove(&key);
    }

    /// Bindings of the admin screens
    pub fn with_default_config() -> Self {
        let mut handler = Self::new();

        handler.configure_keys(
            &[
                KeyCode::Up,
                KeyCode::Down,
                KeyCode::Char('j'),
                KeyCode::Char('k'),
                KeyCode::Char('['),
                KeyCode::Char(']'),
            ],
            KeyBehavior::navigation(),
        );

        handler.configure_keys(
            &[
                KeyCode::Enter,
                KeyCode::Char(' '),
                KeyCode::Tab,
                KeyCode::BackTab,
                KeyCode::Char('1'),
                KeyCode::Char('2'),
                KeyCode::Char('3'),
                KeyCode::Char('n'),
                KeyCode::Char('e'),
                KeyCode::Char('d'),
                KeyCode::Char('a'),
                KeyCode::Char('x'),
                KeyCode::Char('r'),
                KeyCode::Char('y'),
                KeyCode::Char('?'),
                KeyCode::Char('q'),
            ],
            KeyBehavior::StateChange,
        );

        handler
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::with_default_config()
    }
}
