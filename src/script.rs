//! Scripted input for headless runs.
//!
//! A script is a list of steps; each step sets the held keys, optionally taps
//! keys, drags the view and hovers or clicks a hotspot, then runs for a number
//! of frames.
//!
//! ```json
//! { "steps": [
//!     { "frames": 60, "hold": ["w"] },
//!     { "frames": 30, "look": [-520, 0] },
//!     { "frames": 1, "press": ["f"] },
//!     { "frames": 1, "hover": "book-1", "click": "book-1" }
//! ] }
//! ```

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::controller::Button;
use crate::geometry::GeometryProvider;
use crate::session::{FrameOutput, NavigationSession};
use crate::triggers::TriggerEvent;

fn one_frame() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default = "one_frame")]
    pub frames: u32,
    /// Keys held for the whole step; everything else is released
    #[serde(default)]
    pub hold: Vec<String>,
    /// Keys tapped on the first frame of the step
    #[serde(default)]
    pub press: Vec<String>,
    /// Total drag in pixels, spread evenly over the step
    #[serde(default)]
    pub look: Option<(f32, f32)>,
    /// Hotspot under the pointer from this step on; `""` clears it
    #[serde(default)]
    pub hover: Option<String>,
    #[serde(default)]
    pub click: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

fn parse_keys(names: &[String]) -> Result<Vec<Button>> {
    names
        .iter()
        .map(|name| Button::from_key_name(name).with_context(|| format!("unknown key '{}'", name)))
        .collect()
}

impl InputScript {
    /// No input at all for `frames` frames
    pub fn idle(frames: u32) -> Self {
        Self {
            steps: vec![ScriptStep {
                frames,
                ..Default::default()
            }],
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let script: InputScript = serde_json::from_str(json).context("Failed to parse input script")?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read script: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Invalid script: {:?}", path))
    }

    pub fn validate(&self) -> Result<()> {
        for (i, step) in self.steps.iter().enumerate() {
            ensure!(step.frames > 0, "step {}: frames must be at least 1", i);
            parse_keys(&step.hold).with_context(|| format!("step {}", i))?;
            parse_keys(&step.press).with_context(|| format!("step {}", i))?;
            if let Some((dx, dy)) = step.look {
                ensure!(dx.is_finite() && dy.is_finite(), "step {}: look must be finite", i);
            }
        }
        Ok(())
    }

    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|s| s.frames as u64).sum()
    }

    pub fn cursor(&self) -> ScriptCursor<'_> {
        ScriptCursor::new(self)
    }

    /// Run the whole script against fixed geometry
    pub fn replay(
        &self,
        session: &mut NavigationSession,
        provider: &dyn GeometryProvider,
        dt: f32,
        mut on_frame: impl FnMut(&FrameOutput),
    ) -> Result<u64> {
        let mut cursor = self.cursor();
        let mut frames = 0;
        while let Some(clicks) = cursor.next_frame(session)? {
            let mut out = session.step_frame(dt, provider);
            out.events.extend(clicks);
            on_frame(&out);
            frames += 1;
        }
        Ok(frames)
    }
}

/// Feeds a script into a session one frame at a time, so the caller can swap
/// geometry between frames
pub struct ScriptCursor<'a> {
    script: &'a InputScript,
    step: usize,
    frame_in_step: u32,
    taps: Vec<Button>,
    pointer: (f32, f32),
    hovered: Option<String>,
}

impl<'a> ScriptCursor<'a> {
    fn new(script: &'a InputScript) -> Self {
        Self {
            script,
            step: 0,
            frame_in_step: 0,
            taps: Vec::new(),
            pointer: (0.0, 0.0),
            hovered: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.script.steps.len()
    }

    /// Apply the input for the next frame. Returns events from clicks made
    /// this frame, or None once the script is exhausted.
    pub fn next_frame(&mut self, session: &mut NavigationSession) -> Result<Option<Vec<TriggerEvent>>> {
        for button in self.taps.drain(..) {
            session.key_up(button);
        }

        if self.frame_in_step == 0 {
            // Close the previous step's drag
            if session.input().is_dragging() {
                session.pointer_up();
            }
        }

        let script = self.script;
        let Some(step) = script.steps.get(self.step) else {
            return Ok(None);
        };

        let mut clicks = Vec::new();
        if self.frame_in_step == 0 {
            clicks = self.begin_step(step, session)?;
        }

        if let Some((dx, dy)) = step.look {
            let n = step.frames as f32;
            self.pointer.0 += dx / n;
            self.pointer.1 += dy / n;
            session.pointer_move(self.pointer.0, self.pointer.1);
        }

        self.frame_in_step += 1;
        if self.frame_in_step >= step.frames {
            self.step += 1;
            self.frame_in_step = 0;
        }

        Ok(Some(clicks))
    }

    fn begin_step(&mut self, step: &ScriptStep, session: &mut NavigationSession) -> Result<Vec<TriggerEvent>> {
        let hold = parse_keys(&step.hold)?;
        for button in [Button::Forward, Button::Backward, Button::Left, Button::Right, Button::Confirm] {
            if hold.contains(&button) {
                session.key_down(button);
            } else {
                session.key_up(button);
            }
        }

        for button in parse_keys(&step.press)? {
            session.key_down(button);
            if !hold.contains(&button) {
                self.taps.push(button);
            }
        }

        if step.look.is_some() {
            session.pointer_down(self.pointer.0, self.pointer.1);
        }

        if let Some(id) = &step.hover {
            if let Some(previous) = self.hovered.take() {
                session.hotspot_out(&previous);
            }
            if !id.is_empty() {
                if !session.hotspot_over(id) {
                    log::warn!("script hovers unknown trigger '{}'", id);
                }
                self.hovered = Some(id.clone());
            }
        }

        let mut clicks = Vec::new();
        if let Some(id) = &step.click {
            match session.hotspot_click(id) {
                Some(event) => clicks.push(event),
                None => log::warn!("script click on '{}' did nothing", id),
            }
        }
        Ok(clicks)
    }
}
