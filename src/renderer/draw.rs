//! Draw list construction
//!
//! Turns a `SceneState` into backend-neutral draw commands. Coordinates are
//! CSS pixels with the origin top-left and y down, matching the simulation.

use glam::Vec2;

use super::vertex::colors;
use crate::settings::Settings;
use crate::sim::SceneState;

/// Dialog box above the secondary character
const DIALOG_TEXT_SIZE: f32 = 18.0;
const DIALOG_PADDING: f32 = 10.0;
const DIALOG_BOX_HEIGHT: f32 = 26.0 + DIALOG_PADDING;
const DIALOG_GAP: f32 = 8.0;
const BOX_CORNER_RADIUS: f32 = 6.0;
const BOX_STROKE_WIDTH: f32 = 2.0;

/// Name input box above the primary character
const INPUT_TEXT_SIZE: f32 = 18.0;
const INPUT_PADDING: f32 = 8.0;
const INPUT_MIN_WIDTH: f32 = 160.0;
const INPUT_BOX_HEIGHT: f32 = 32.0;
const INPUT_RAISE: f32 = 60.0;
const CARET_HALF_HEIGHT: f32 = 10.0;

/// Ground indicator and hints
const GROUND_LINE_OFFSET: f32 = 10.0;
const GROUND_LINE_WIDTH: f32 = 2.0;
const HINT_TEXT_SIZE: f32 = 14.0;
const HINT_BOTTOM_MARGIN: f32 = 20.0;
const PLACEHOLDER_TEXT_SIZE: f32 = 18.0;

/// Which sprite sheet a sprite command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: [f32; 4],
    pub width: f32,
}

/// A single drawing instruction for a render sink
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole canvas
    Clear { color: [f32; 4] },
    /// Sprite frame, center-anchored
    Sprite {
        sprite: SpriteId,
        frame: usize,
        center: Vec2,
        size: Vec2,
    },
    /// Rounded rectangle, center-anchored
    Rect {
        center: Vec2,
        size: Vec2,
        corner_radius: f32,
        fill: [f32; 4],
        stroke: Option<Stroke>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        align: TextAlign,
        baseline: TextBaseline,
        color: [f32; 4],
    },
}

/// Commands for one frame, in painter's order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub canvas_size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Render sink failures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("text overlay: {0}")]
    Overlay(String),
}

/// Anything that can present a draw list
pub trait RenderSink {
    fn submit(&mut self, list: &DrawList) -> Result<(), RenderError>;
}

/// Sink that keeps the last list; used by the native harness and tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: u64,
    pub last: DrawList,
}

impl RenderSink for RecordingSink {
    fn submit(&mut self, list: &DrawList) -> Result<(), RenderError> {
        self.frames += 1;
        self.last = list.clone();
        Ok(())
    }
}

/// Estimated advance width of `text` at `size` px.
///
/// ASCII glyphs are about half an em wide, CJK and other glyphs a full em.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| if c.is_ascii() { 0.56 } else { 1.0 })
        .sum::<f32>()
        * size
}

/// Build the frame's draw list
pub fn build_draw_list(state: &SceneState, settings: &Settings) -> DrawList {
    let mut commands = Vec::with_capacity(16);
    let size = state.canvas_size;

    commands.push(DrawCommand::Clear {
        color: colors::BACKGROUND,
    });

    if state.assets_missing() {
        commands.push(DrawCommand::Text {
            text: settings.missing_frames_text.clone(),
            pos: size / 2.0,
            size: PLACEHOLDER_TEXT_SIZE,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            color: colors::TEXT,
        });
        return DrawList {
            canvas_size: size,
            commands,
        };
    }

    let primary = &state.primary;
    let secondary = &state.secondary;

    if !state.secondary_cycle.is_empty() {
        commands.push(DrawCommand::Sprite {
            sprite: SpriteId::Secondary,
            frame: state.secondary_cycle.index,
            center: secondary.pos,
            size: secondary.size,
        });
    }

    commands.push(DrawCommand::Sprite {
        sprite: SpriteId::Primary,
        frame: state.primary_cycle.index,
        center: primary.pos,
        size: primary.size,
    });

    if state.dialog.dialog_visible() {
        push_dialog_box(&mut commands, state);
    }

    if state.dialog.input_active {
        push_input_box(&mut commands, state);
    }

    let ground_line_y = state.ground_y + primary.half_height() + GROUND_LINE_OFFSET;
    commands.push(DrawCommand::Line {
        from: Vec2::new(0.0, ground_line_y),
        to: Vec2::new(size.x, ground_line_y),
        width: GROUND_LINE_WIDTH,
        color: colors::GROUND_LINE,
    });

    if state.audio.hint_visible() {
        commands.push(DrawCommand::Text {
            text: settings.audio_hint_text.clone(),
            pos: Vec2::new(size.x / 2.0, size.y - HINT_BOTTOM_MARGIN),
            size: HINT_TEXT_SIZE,
            align: TextAlign::Center,
            baseline: TextBaseline::Bottom,
            color: colors::HINT,
        });
    }

    DrawList {
        canvas_size: size,
        commands,
    }
}

fn push_dialog_box(commands: &mut Vec<DrawCommand>, state: &SceneState) {
    let text = &state.dialog.dialog_text;
    let secondary = &state.secondary;
    let box_size = Vec2::new(
        text_width(text, DIALOG_TEXT_SIZE) + DIALOG_PADDING * 2.0,
        DIALOG_BOX_HEIGHT,
    );
    let center = Vec2::new(
        secondary.pos.x,
        secondary.pos.y - secondary.half_height() - box_size.y / 2.0 - DIALOG_GAP,
    );

    commands.push(DrawCommand::Rect {
        center,
        size: box_size,
        corner_radius: BOX_CORNER_RADIUS,
        fill: colors::DIALOG_FILL,
        stroke: Some(Stroke {
            color: colors::OUTLINE,
            width: BOX_STROKE_WIDTH,
        }),
    });
    commands.push(DrawCommand::Text {
        text: text.clone(),
        pos: center,
        size: DIALOG_TEXT_SIZE,
        align: TextAlign::Center,
        baseline: TextBaseline::Middle,
        color: colors::TEXT,
    });
}

fn push_input_box(commands: &mut Vec<DrawCommand>, state: &SceneState) {
    let text = &state.dialog.input_text;
    // Anchored to the ground so the box does not follow jumps
    let center = Vec2::new(
        state.primary.pos.x,
        state.ground_y - state.primary.half_height() - INPUT_RAISE,
    );
    let measured = if text.is_empty() { " " } else { text.as_str() };
    let box_width =
        INPUT_MIN_WIDTH.max(text_width(measured, INPUT_TEXT_SIZE) + INPUT_PADDING * 2.0 + 12.0);

    commands.push(DrawCommand::Rect {
        center,
        size: Vec2::new(box_width, INPUT_BOX_HEIGHT),
        corner_radius: BOX_CORNER_RADIUS,
        fill: colors::INPUT_FILL,
        stroke: Some(Stroke {
            color: colors::OUTLINE,
            width: BOX_STROKE_WIDTH,
        }),
    });

    let text_x = center.x - box_width / 2.0 + INPUT_PADDING + 4.0;
    commands.push(DrawCommand::Text {
        text: text.clone(),
        pos: Vec2::new(text_x, center.y),
        size: INPUT_TEXT_SIZE,
        align: TextAlign::Left,
        baseline: TextBaseline::Middle,
        color: colors::TEXT,
    });

    // Estimated width: the overlay renders real glyphs, so with proportional
    // Latin fonts the caret can sit a few px off the end of the text. CJK
    // names (full-em glyphs) line up.
    let caret_x = text_x + text_width(text, INPUT_TEXT_SIZE) + 2.0;
    commands.push(DrawCommand::Line {
        from: Vec2::new(caret_x, center.y - CARET_HALF_HEIGHT),
        to: Vec2::new(caret_x, center.y + CARET_HALF_HEIGHT),
        width: BOX_STROKE_WIDTH,
        color: colors::OUTLINE,
    });
}
