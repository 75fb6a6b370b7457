use glam::Vec3;
use walkthrough::core::Button;
use walkthrough::scenes::{preset, PRESET_NAMES};
use walkthrough::{GeometryProvider, HorizontalOutcome, TriggerEvent};

#[cfg(test)]
mod scene_tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_all_presets_load() {
        for name in PRESET_NAMES {
            let scene = preset(name).unwrap_or_else(|| panic!("missing preset {}", name));
            assert_eq!(scene.name, name);
            assert!(!scene.geometry.collidables().is_empty());
            assert!(!scene.triggers.is_empty());
            assert!(scene.config.validate().is_ok());
        }
        assert!(preset("basement").is_none());
    }

    #[test]
    fn test_exterior_spawn_rests_on_ground() {
        let scene = preset("exterior").unwrap();
        let mut session = scene.session();
        for _ in 0..30 {
            session.step_frame(DT, &scene.geometry);
        }
        assert!((session.pose().position.y - (-5.0)).abs() < 1e-3);
    }

    #[test]
    fn test_exterior_walk_up_the_stairs_to_the_door() {
        let scene = preset("exterior").unwrap();
        let mut session = scene.session();
        session.key_down(Button::Forward);

        let mut entered = false;
        let mut blocked = 0;
        for _ in 0..240 {
            let out = session.step_frame(DT, &scene.geometry);
            entered |= out.events.contains(&TriggerEvent::Entered { id: "front-door".into() });
            if matches!(out.report.horizontal, HorizontalOutcome::Blocked { .. }) {
                blocked += 1;
            }
        }

        let pos = session.pose().position;
        // Stopped by the facade, standing on the porch
        assert!(pos.z > 6.6 && pos.z < 6.8, "z = {}", pos.z);
        assert!((pos.y - (-3.4)).abs() < 1e-3, "y = {}", pos.y);
        assert!(blocked > 0);
        assert!(entered);

        session.key_up(Button::Forward);
        session.key_down(Button::Confirm);
        let out = session.step_frame(DT, &scene.geometry);
        assert!(out.events.contains(&TriggerEvent::DoorActivated {
            id: "front-door".into(),
            target: Some("interior".into()),
        }));
    }

    #[test]
    fn test_exterior_confirm_from_spawn_does_nothing() {
        let scene = preset("exterior").unwrap();
        let mut session = scene.session();
        session.key_down(Button::Confirm);
        let out = session.step_frame(DT, &scene.geometry);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_interior_gallery_and_books() {
        let scene = preset("interior").unwrap();
        let mut session = scene.session();
        session.key_down(Button::Forward);

        let mut near_books = Vec::new();
        for _ in 0..300 {
            for event in session.step_frame(DT, &scene.geometry).events {
                if let TriggerEvent::Entered { id } = event {
                    near_books.push(id);
                }
            }
        }

        let pos = session.pose().position;
        assert!(pos.z > -10.7 && pos.z < -10.5, "stopped at the shelves: z = {}", pos.z);
        assert!((pos.y - 1.9).abs() < 1e-3, "standing on the gallery: y = {}", pos.y);
        assert_eq!(near_books, vec!["book-2".to_string()]);
    }

    #[test]
    fn test_interior_walls_contain_viewer() {
        let scene = preset("interior").unwrap();
        let mut session = scene.session();
        session.key_down(Button::Right);
        for _ in 0..600 {
            session.step_frame(DT, &scene.geometry);
        }
        let pos = session.pose().position;
        assert!(pos.x < 10.0 - 0.3 && pos.x > 9.4, "x = {}", pos.x);
    }

    #[test]
    fn test_interior_ceiling_not_used_as_ground() {
        let scene = preset("interior").unwrap();
        let mut session = scene.session();
        for _ in 0..60 {
            session.step_frame(DT, &scene.geometry);
        }
        assert!((session.pose().position.y - 1.6).abs() < 1e-3);
    }

    #[test]
    fn test_hidden_surfaces_do_not_collide() {
        let mut scene = preset("interior").unwrap();
        assert!(scene.geometry.set_visible("walls", false) > 0);
        let mut session = scene.session();
        session.key_down(Button::Right);
        for _ in 0..180 {
            session.step_frame(DT, &scene.geometry);
        }
        // Three seconds at 5 u/s from x = 0 with no walls
        assert!((session.pose().position.x - 15.0).abs() < 1e-2);
    }

    #[test]
    fn test_portal_click_leads_outside() {
        let scene = preset("interior").unwrap();
        let mut session = scene.session();
        assert_eq!(
            session.hotspot_click("exit-portal"),
            Some(TriggerEvent::SceneTransition {
                id: "exit-portal".into(),
                target: "exterior".into()
            })
        );
        assert!(scene.triggers.iter().any(|t| t.position == Vec3::new(0.0, 1.5, 8.5)));
    }
}
