//! Proximity triggers: doors entered with a confirm key and pointer hotspots.
//!
//! The registry never moves the camera. Proximity state is recomputed from the
//! pose every frame; the previous boolean is kept only to detect entry edges.

use glam::Vec3;

use crate::camera::Pose;
use crate::math::Ray;

#[derive(Debug, Clone, PartialEq)]
pub enum HotspotAction {
    /// Open the exhibit detail for this hotspot
    Inspect,
    /// Switch to another scene (a portal)
    Transition { target: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerKind {
    Door { target: Option<String> },
    Hotspot { action: HotspotAction },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub id: String,
    pub position: Vec3,
    /// Activation radius, strict: `distance < radius` is near
    pub radius: f32,
    pub kind: TriggerKind,
}

impl Trigger {
    pub fn door(id: impl Into<String>, position: Vec3, radius: f32) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            kind: TriggerKind::Door { target: None },
        }
    }

    pub fn hotspot(id: impl Into<String>, position: Vec3, radius: f32) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            kind: TriggerKind::Hotspot {
                action: HotspotAction::Inspect,
            },
        }
    }

    pub fn portal(id: impl Into<String>, position: Vec3, radius: f32, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            kind: TriggerKind::Hotspot {
                action: HotspotAction::Transition {
                    target: target.into(),
                },
            },
        }
    }

    /// Door leading to a named scene
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        if let TriggerKind::Door { target: t } = &mut self.kind {
            *t = Some(target.into());
        }
        self
    }

    pub fn is_door(&self) -> bool {
        matches!(self.kind, TriggerKind::Door { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerEvent {
    /// Viewer crossed into the activation radius
    Entered { id: String },
    /// Confirm key pressed while near a door
    DoorActivated { id: String, target: Option<String> },
    /// Inspect hotspot clicked
    HotspotInteract { id: String },
    /// Portal hotspot clicked
    SceneTransition { id: String, target: String },
}

impl TriggerEvent {
    pub fn id(&self) -> &str {
        match self {
            TriggerEvent::Entered { id }
            | TriggerEvent::DoorActivated { id, .. }
            | TriggerEvent::HotspotInteract { id }
            | TriggerEvent::SceneTransition { id, .. } => id,
        }
    }

    pub fn dispatch(&self, listener: &mut dyn TriggerListener) {
        match self {
            TriggerEvent::Entered { id } => listener.on_enter_trigger(id),
            TriggerEvent::DoorActivated { id, target } => listener.on_door_enter(id, target.as_deref()),
            TriggerEvent::HotspotInteract { id } => listener.on_hotspot_interact(id),
            TriggerEvent::SceneTransition { id, target } => listener.on_scene_transition(id, target),
        }
    }
}

/// Callback view of [`TriggerEvent`] for presentation code
pub trait TriggerListener {
    fn on_enter_trigger(&mut self, _id: &str) {}
    fn on_door_enter(&mut self, _id: &str, _target: Option<&str>) {}
    fn on_hotspot_interact(&mut self, _id: &str) {}
    fn on_scene_transition(&mut self, _id: &str, _target: &str) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TriggerState {
    near: bool,
    hovered: bool,
}

#[derive(Debug, Clone)]
struct Entry {
    trigger: Trigger,
    state: TriggerState,
}

/// Continuous-polling registry. Fine for the handful of triggers a scene has.
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    entries: Vec<Entry>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trigger. A trigger with the same id is replaced.
    pub fn register(&mut self, trigger: Trigger) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.trigger.id == trigger.id) {
            log::warn!("trigger '{}' registered twice, replacing", trigger.id);
            existing.trigger = trigger;
            existing.state = TriggerState::default();
            return;
        }
        self.entries.push(Entry {
            trigger,
            state: TriggerState::default(),
        });
    }

    pub fn remove(&mut self, id: &str) -> Option<Trigger> {
        let idx = self.entries.iter().position(|e| e.trigger.id == id)?;
        Some(self.entries.remove(idx).trigger)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Trigger> {
        self.entry(id).map(|e| &e.trigger)
    }

    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.entries.iter().map(|e| &e.trigger)
    }

    pub fn is_near(&self, id: &str) -> bool {
        self.entry(id).is_some_and(|e| e.state.near)
    }

    pub fn is_hovered(&self, id: &str) -> bool {
        self.entry(id).is_some_and(|e| e.state.hovered)
    }

    pub fn near_ids(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.state.near)
            .map(|e| e.trigger.id.as_str())
    }

    /// True while any trigger is hovered, for a pointer cursor
    pub fn any_hovered(&self) -> bool {
        self.entries.iter().any(|e| e.state.hovered)
    }

    fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.trigger.id == id)
    }

    fn entry_mut(&mut self, id: &str) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.trigger.id == id)
    }

    /// Recompute proximity against the pose, then apply a confirm press to the nearest near door
    pub fn update(&mut self, pose: &Pose, confirm_pressed: bool) -> Vec<TriggerEvent> {
        let mut events = Vec::new();
        let mut nearest_door: Option<(f32, usize)> = None;

        for (idx, entry) in self.entries.iter_mut().enumerate() {
            let distance = entry.trigger.position.distance(pose.position);
            let near = distance < entry.trigger.radius;

            if near && !entry.state.near {
                log::debug!("entered trigger '{}' at {:.2}", entry.trigger.id, distance);
                events.push(TriggerEvent::Entered {
                    id: entry.trigger.id.clone(),
                });
            }
            entry.state.near = near;

            if near && entry.trigger.is_door() && nearest_door.map_or(true, |(d, _)| distance < d) {
                nearest_door = Some((distance, idx));
            }
        }

        if confirm_pressed {
            if let Some((_, idx)) = nearest_door {
                let trigger = &self.entries[idx].trigger;
                if let TriggerKind::Door { target } = &trigger.kind {
                    log::info!("door '{}' activated", trigger.id);
                    events.push(TriggerEvent::DoorActivated {
                        id: trigger.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        events
    }

    /// Returns false for unknown ids
    pub fn pointer_over(&mut self, id: &str) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.state.hovered = true;
                true
            }
            None => false,
        }
    }

    pub fn pointer_out(&mut self, id: &str) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.state.hovered = false;
                true
            }
            None => false,
        }
    }

    /// Nearest hotspot whose pick sphere the ray passes through
    pub fn pick(&self, ray: &Ray, pick_radius: f32) -> Option<&str> {
        let r2 = pick_radius * pick_radius;
        self.entries
            .iter()
            .filter(|e| !e.trigger.is_door())
            .filter_map(|e| {
                let to_center = e.trigger.position - ray.origin;
                let t = to_center.dot(ray.direction);
                let miss2 = to_center.length_squared() - t * t;
                (t >= 0.0 && miss2 <= r2).then_some((t, e.trigger.id.as_str()))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    /// Click on a hotspot. Doors ignore clicks; they need the confirm key.
    pub fn click(&mut self, id: &str) -> Option<TriggerEvent> {
        let trigger = &self.entry(id)?.trigger;
        match &trigger.kind {
            TriggerKind::Hotspot {
                action: HotspotAction::Inspect,
            } => Some(TriggerEvent::HotspotInteract { id: trigger.id.clone() }),
            TriggerKind::Hotspot {
                action: HotspotAction::Transition { target },
            } => Some(TriggerEvent::SceneTransition {
                id: trigger.id.clone(),
                target: target.clone(),
            }),
            TriggerKind::Door { .. } => None,
        }
    }
}
