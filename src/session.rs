//! One navigation session: the pose, its input and its triggers, advanced a frame at a time.

use std::fmt;

use glam::Vec3;

use crate::camera::{Axis, Pose};
use crate::config::NavigationConfig;
use crate::core::controller::Button;
use crate::core::input_sampler::InputSampler;
use crate::geometry::GeometryProvider;
use crate::locomotion::{self, GroundOutcome, StepReport};
use crate::triggers::{Trigger, TriggerEvent, TriggerRegistry};

/// Everything a frame produced for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub pose: Pose,
    pub events: Vec<TriggerEvent>,
    pub report: StepReport,
}

pub struct NavigationSession {
    config: NavigationConfig,
    pose: Pose,
    input: InputSampler,
    triggers: TriggerRegistry,
    frame: u64,
}

impl NavigationSession {
    pub fn new(config: NavigationConfig, spawn: Pose) -> Self {
        Self {
            config,
            pose: spawn,
            input: InputSampler::new(),
            triggers: TriggerRegistry::new(),
            frame: 0,
        }
    }

    pub fn with_triggers(mut self, triggers: impl IntoIterator<Item = Trigger>) -> Self {
        for trigger in triggers {
            self.triggers.register(trigger);
        }
        self
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn input(&self) -> &InputSampler {
        &self.input
    }

    /// Event callbacks write here; the frame loop only reads it
    pub fn input_mut(&mut self) -> &mut InputSampler {
        &mut self.input
    }

    pub fn triggers(&self) -> &TriggerRegistry {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerRegistry {
        &mut self.triggers
    }

    pub fn key_down(&mut self, button: Button) {
        self.input.key_down(button);
    }

    pub fn key_up(&mut self, button: Button) {
        self.input.key_up(button);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.input.pointer_down(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.input.pointer_up();
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer_move(x, y);
    }

    pub fn hotspot_over(&mut self, id: &str) -> bool {
        self.triggers.pointer_over(id)
    }

    pub fn hotspot_out(&mut self, id: &str) -> bool {
        self.triggers.pointer_out(id)
    }

    /// Clicks are handled immediately, outside the frame loop
    pub fn hotspot_click(&mut self, id: &str) -> Option<TriggerEvent> {
        let event = self.triggers.click(id);
        if let Some(event) = &event {
            log::debug!("hotspot click: {:?}", event);
        }
        event
    }

    /// Operator override of one coordinate
    pub fn set_axis(&mut self, axis: Axis, value: f32) {
        self.pose.set_axis(axis, value);
    }

    /// Place the viewer somewhere else, e.g. after a scene switch. Held input is kept.
    pub fn teleport(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Replace the session's triggers, dropping all proximity and hover state
    pub fn replace_triggers(&mut self, triggers: impl IntoIterator<Item = Trigger>) {
        self.triggers.clear();
        for trigger in triggers {
            self.triggers.register(trigger);
        }
    }

    /// Input, then orientation, then locomotion, then triggers
    pub fn step_frame(&mut self, dt: f32, provider: &dyn GeometryProvider) -> FrameOutput {
        let intent = self.input.take_intent();

        let (dx, dy) = intent.look_delta;
        if dx != 0.0 || dy != 0.0 {
            self.pose.apply_look(dx, dy, self.config.look_sensitivity);
        }

        let surfaces = provider.collidables();
        let report = locomotion::step(&mut self.pose, &intent, &self.config, dt, &surfaces);
        if report.ground == GroundOutcome::GeometryUnavailable && intent.is_moving() {
            log::debug!("frame {}: no collidable geometry, moving unconstrained", self.frame);
        }

        let events = self.triggers.update(&self.pose, intent.confirm_pressed);
        self.frame += 1;

        FrameOutput {
            pose: self.pose,
            events,
            report,
        }
    }
}

/// Pose rounded to two decimals, as shown on a debug readout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl RoundedPose {
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            position: Vec3::new(
                round2(pose.position.x),
                round2(pose.position.y),
                round2(pose.position.z),
            ),
            yaw: round2(pose.yaw),
            pitch: round2(pose.pitch),
        }
    }
}

impl fmt::Display for RoundedPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos ({:.2}, {:.2}, {:.2}) yaw {:.2} pitch {:.2}",
            self.position.x, self.position.y, self.position.z, self.yaw, self.pitch
        )
    }
}

fn round2(value: f32) -> f32 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid reporting "-0.00" as a change from "0.00"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Reports the pose only when its rounded value changes
#[derive(Debug, Clone, Default)]
pub struct PoseReporter {
    last: Option<RoundedPose>,
}

impl PoseReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, pose: &Pose) -> Option<RoundedPose> {
        let rounded = RoundedPose::from_pose(pose);
        if self.last == Some(rounded) {
            return None;
        }
        self.last = Some(rounded);
        Some(rounded)
    }

    pub fn last(&self) -> Option<RoundedPose> {
        self.last
    }
}
