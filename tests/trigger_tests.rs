use glam::Vec3;
use walkthrough::core::Button;
use walkthrough::{NavigationConfig, NavigationSession, Pose, Trigger, TriggerEvent};

#[cfg(test)]
mod trigger_tests {
    use super::*;

    fn session_at(x: f32, triggers: Vec<Trigger>) -> NavigationSession {
        NavigationSession::new(NavigationConfig::default(), Pose::at(Vec3::new(x, 0.0, 0.0))).with_triggers(triggers)
    }

    fn door() -> Trigger {
        Trigger::door("door", Vec3::ZERO, 5.0).with_target("interior")
    }

    fn door_activations(events: &[TriggerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, TriggerEvent::DoorActivated { .. }))
            .count()
    }

    #[test]
    fn test_enter_leave_enter_fires_twice() {
        let mut session = session_at(4.9, vec![door()]);

        let out = session.step_frame(0.016, &());
        assert_eq!(out.events, vec![TriggerEvent::Entered { id: "door".into() }]);

        // Staying near is silent
        assert!(session.step_frame(0.016, &()).events.is_empty());

        // Leaving emits nothing
        session.teleport(Pose::at(Vec3::new(5.1, 0.0, 0.0)));
        assert!(session.step_frame(0.016, &()).events.is_empty());
        assert!(!session.triggers().is_near("door"));

        session.teleport(Pose::at(Vec3::new(4.9, 0.0, 0.0)));
        let out = session.step_frame(0.016, &());
        assert_eq!(out.events, vec![TriggerEvent::Entered { id: "door".into() }]);
    }

    #[test]
    fn test_distance_is_three_dimensional() {
        // 3 units across, 4 units below: exactly 5 away, not near
        let mut session = NavigationSession::new(NavigationConfig::default(), Pose::at(Vec3::new(3.0, 4.0, 0.0)))
            .with_triggers([door()]);
        assert!(session.step_frame(0.016, &()).events.is_empty());
        assert!(!session.triggers().is_near("door"));
    }

    #[test]
    fn test_held_confirm_activates_once() {
        let mut session = session_at(2.0, vec![door()]);
        session.key_down(Button::Confirm);

        let mut activations = 0;
        for _ in 0..5 {
            activations += door_activations(&session.step_frame(0.016, &()).events);
        }
        assert_eq!(activations, 1);

        session.key_up(Button::Confirm);
        session.key_down(Button::Confirm);
        let out = session.step_frame(0.016, &());
        assert_eq!(
            out.events,
            vec![TriggerEvent::DoorActivated {
                id: "door".into(),
                target: Some("interior".into())
            }]
        );
    }

    #[test]
    fn test_confirm_out_of_range_is_spent() {
        let mut session = session_at(10.0, vec![door()]);
        session.key_down(Button::Confirm);
        assert!(session.step_frame(0.016, &()).events.is_empty());

        // Walk into range with the key still held: no activation without a new press
        session.teleport(Pose::at(Vec3::new(1.0, 0.0, 0.0)));
        let out = session.step_frame(0.016, &());
        assert_eq!(door_activations(&out.events), 0);
        assert_eq!(out.events, vec![TriggerEvent::Entered { id: "door".into() }]);
    }

    #[test]
    fn test_press_and_release_within_one_frame_still_counts() {
        let mut session = session_at(1.0, vec![door()]);
        session.key_down(Button::Confirm);
        session.key_up(Button::Confirm);
        let out = session.step_frame(0.016, &());
        assert_eq!(door_activations(&out.events), 1);
    }

    #[test]
    fn test_only_nearest_door_activates() {
        let mut session = session_at(
            0.0,
            vec![
                Trigger::door("side", Vec3::new(3.0, 0.0, 0.0), 5.0),
                Trigger::door("main", Vec3::new(-1.0, 0.0, 0.0), 5.0),
            ],
        );
        session.key_down(Button::Confirm);
        let out = session.step_frame(0.016, &());
        let activated: Vec<&str> = out
            .events
            .iter()
            .filter(|e| matches!(e, TriggerEvent::DoorActivated { .. }))
            .map(|e| e.id())
            .collect();
        assert_eq!(activated, vec!["main"]);
    }

    #[test]
    fn test_hotspot_click_needs_no_proximity() {
        let mut session = session_at(100.0, vec![Trigger::hotspot("book-1", Vec3::ZERO, 1.5)]);
        assert!(!session.triggers().is_near("book-1"));
        assert_eq!(
            session.hotspot_click("book-1"),
            Some(TriggerEvent::HotspotInteract { id: "book-1".into() })
        );
        // Confirm key does nothing for hotspots
        session.teleport(Pose::at(Vec3::ZERO));
        session.key_down(Button::Confirm);
        let out = session.step_frame(0.016, &());
        assert_eq!(door_activations(&out.events), 0);
    }
}
