//! Per-frame scene update
//!
//! `tick` runs once per display frame with the held-key snapshot;
//! `handle_event` applies discrete key/char/pointer events between ticks.

use super::dialog::DialogPhase;
use super::state::{SceneEvent, SceneState};

/// Level-triggered input: keys currently held, sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Monotonic clock in milliseconds
    pub now_ms: f64,
    /// Arrow left / right
    pub primary_left: bool,
    pub primary_right: bool,
    /// A / D
    pub secondary_left: bool,
    pub secondary_right: bool,
}

/// Keys with a discrete meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Space: primary jump
    Jump,
    /// W: secondary jump
    SecondaryJump,
    /// Enter: submit the typed name
    Confirm,
    Backspace,
    /// Anything else (still counts as a user gesture)
    Other,
}

/// Edge-triggered input, delivered between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed(Key),
    /// A printable character was typed
    CharTyped(char),
    PointerPressed,
}

/// Advance the scene by one display frame
pub fn tick(state: &mut SceneState, input: &TickInput) {
    // Nothing to animate without primary frames; the renderer shows the placeholder
    if state.assets_missing() {
        return;
    }

    state.primary_cycle.advance(input.now_ms);
    state.secondary_cycle.advance(input.now_ms);

    let width = state.canvas_size.x;
    let ground_y = state.ground_y;
    state
        .secondary
        .step(input.secondary_left, input.secondary_right, width, ground_y);
    state
        .primary
        .step(input.primary_left, input.primary_right, width, ground_y);

    let distance = state.primary.distance_to(&state.secondary);
    let threshold = state.proximity_threshold();
    if let Some(phase) = state.dialog.observe(distance, threshold, &state.prompt_text) {
        log::info!("Dialog phase: {:?} (distance {:.1} < {:.1})", phase, distance, threshold);
        state.events.push(SceneEvent::Dialog(phase));
    }
}

/// Apply one discrete input event
pub fn handle_event(state: &mut SceneState, event: InputEvent) {
    match event {
        InputEvent::PointerPressed => unlock_audio(state),
        InputEvent::KeyPressed(key) => {
            unlock_audio(state);
            match key {
                Key::Jump => {
                    if state.primary.jump() {
                        state.events.push(SceneEvent::PrimaryJumped);
                    }
                }
                Key::SecondaryJump => {
                    if state.secondary.jump() {
                        state.events.push(SceneEvent::SecondaryJumped);
                    }
                }
                Key::Confirm => {
                    if state.dialog.submit(&state.welcome_suffix) {
                        log::info!("Name submitted: {:?}", state.dialog.dialog_text);
                        state.events.push(SceneEvent::Dialog(DialogPhase::Submitted));
                        state
                            .events
                            .push(SceneEvent::NameSubmitted(state.dialog.dialog_text.clone()));
                    }
                }
                Key::Backspace => {
                    state.dialog.backspace();
                }
                Key::Other => {}
            }
        }
        InputEvent::CharTyped(c) => {
            state.dialog.type_char(c);
        }
    }
}

fn unlock_audio(state: &mut SceneState) {
    if state.audio.unlock() {
        log::info!("Audio unlocked by user gesture");
        state.events.push(SceneEvent::AudioUnlocked);
    }
}
