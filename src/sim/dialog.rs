//! Proximity-triggered name prompt
//!
//! `Idle -> Approaching -> AwaitingInput -> Submitted`. Once the characters
//! meet, the prompt stays open until the name is confirmed, even if they
//! walk apart again. `Submitted` is terminal.

use serde::{Deserialize, Serialize};

/// Observable phase of the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogPhase {
    /// Characters apart, nothing shown
    Idle,
    /// Characters within threshold; the prompt opens in the same step
    Approaching,
    /// Input box open, collecting the name
    AwaitingInput,
    /// Name confirmed, greeting shown for the rest of the session
    Submitted,
}

/// Dialog and text input state, one per session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogSession {
    /// Input box open and accepting text
    pub input_active: bool,
    /// Name typed so far
    pub input_text: String,
    /// One-way latch, set on confirm
    pub input_submitted: bool,
    /// Text shown above the secondary character
    pub dialog_text: String,
    /// Characters were within threshold at the last proximity check
    pub near: bool,
}

impl DialogSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DialogPhase {
        if self.input_submitted {
            DialogPhase::Submitted
        } else if self.input_active {
            DialogPhase::AwaitingInput
        } else if self.near {
            DialogPhase::Approaching
        } else {
            DialogPhase::Idle
        }
    }

    /// Feed the current character distance.
    ///
    /// Returns `Some(phase)` when the session changed phase during this call.
    pub fn observe(&mut self, distance: f32, threshold: f32, prompt: &str) -> Option<DialogPhase> {
        let before = self.phase();
        self.near = distance < threshold;

        if self.near && !self.input_submitted {
            if !self.input_active {
                self.input_active = true;
                self.input_text.clear();
            }
            if self.dialog_text.is_empty() {
                self.dialog_text = prompt.to_string();
            }
        }

        let after = self.phase();
        (after != before).then_some(after)
    }

    /// Append a typed character. Control characters are ignored.
    pub fn type_char(&mut self, c: char) -> bool {
        if !self.input_active || c.is_control() {
            return false;
        }
        self.input_text.push(c);
        true
    }

    /// Remove the last typed character
    pub fn backspace(&mut self) -> bool {
        if !self.input_active {
            return false;
        }
        self.input_text.pop().is_some()
    }

    /// Confirm the typed name and switch to the greeting.
    ///
    /// An empty name is accepted and yields `" " + suffix`.
    pub fn submit(&mut self, suffix: &str) -> bool {
        if !self.input_active {
            return false;
        }
        self.dialog_text = format!("{} {}", self.input_text.trim(), suffix);
        self.input_submitted = true;
        self.input_active = false;
        true
    }

    /// Whether the dialog box above the secondary character is drawn
    pub fn dialog_visible(&self) -> bool {
        if self.dialog_text.is_empty() {
            return false;
        }
        self.input_active || (!self.input_submitted && self.near) || self.input_submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "What is your name?";
    const SUFFIX: &str = "welcome";

    fn awaiting() -> DialogSession {
        let mut session = DialogSession::new();
        session.observe(10.0, 100.0, PROMPT);
        session
    }

    #[test]
    fn test_far_stays_idle() {
        let mut session = DialogSession::new();
        assert_eq!(session.observe(150.0, 100.0, PROMPT), None);
        assert_eq!(session.phase(), DialogPhase::Idle);
        assert!(!session.dialog_visible());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut session = DialogSession::new();
        session.observe(100.0, 100.0, PROMPT);
        assert!(!session.input_active);
    }

    #[test]
    fn test_approach_opens_prompt() {
        let mut session = DialogSession::new();
        let changed = session.observe(99.0, 100.0, PROMPT);
        assert_eq!(changed, Some(DialogPhase::AwaitingInput));
        assert!(session.input_active);
        assert_eq!(session.input_text, "");
        assert_eq!(session.dialog_text, PROMPT);
        assert!(session.dialog_visible());
    }

    #[test]
    fn test_reentering_does_not_clear_text() {
        let mut session = awaiting();
        session.type_char('x');
        assert_eq!(session.observe(10.0, 100.0, PROMPT), None);
        assert_eq!(session.input_text, "x");
    }

    #[test]
    fn test_moving_away_keeps_prompt_open() {
        let mut session = awaiting();
        session.observe(1000.0, 100.0, PROMPT);
        assert_eq!(session.phase(), DialogPhase::AwaitingInput);
        assert!(session.dialog_visible());
        assert!(session.type_char('a'));
    }

    #[test]
    fn test_type_backspace_submit() {
        let mut session = awaiting();
        for c in ['A', 'B', 'C'] {
            session.type_char(c);
        }
        session.backspace();
        assert!(session.submit(SUFFIX));
        assert_eq!(session.dialog_text, "AB welcome");
        assert_eq!(session.phase(), DialogPhase::Submitted);
        assert!(!session.input_active);
    }

    #[test]
    fn test_backspace_removes_whole_char() {
        let mut session = awaiting();
        session.type_char('小');
        session.type_char('明');
        session.backspace();
        assert_eq!(session.input_text, "小");
    }

    #[test]
    fn test_empty_submit() {
        let mut session = awaiting();
        session.type_char(' ');
        session.submit(SUFFIX);
        assert_eq!(session.dialog_text, " welcome");
    }

    #[test]
    fn test_submitted_is_terminal() {
        let mut session = awaiting();
        session.type_char('Z');
        session.submit(SUFFIX);
        let text = session.dialog_text.clone();

        assert!(!session.type_char('Q'));
        assert!(!session.backspace());
        assert!(!session.submit("again"));
        assert_eq!(session.observe(0.0, 100.0, PROMPT), None);
        assert_eq!(session.dialog_text, text);
        assert!(!session.input_active);

        session.observe(1000.0, 100.0, PROMPT);
        assert!(session.dialog_visible());
    }

    #[test]
    fn test_input_ignored_while_idle() {
        let mut session = DialogSession::new();
        assert!(!session.type_char('a'));
        assert!(!session.backspace());
        assert!(!session.submit(SUFFIX));
        assert!(!session.input_submitted);
    }

    #[test]
    fn test_control_chars_ignored() {
        let mut session = awaiting();
        assert!(!session.type_char('\n'));
        assert!(session.input_text.is_empty());
    }
}
