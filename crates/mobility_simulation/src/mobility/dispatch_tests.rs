//! Tests for the activation dispatcher.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::components::MovementConditions;
    use crate::mobility::dispatch::{dispatch_jump_edge, dispatch_start_glide};
    use crate::mobility::test_support::{activated, airborne_frame, Fixture};
    use crate::mobility::{AbilityKind, AbilityState, ActivationOutcome, ContinuousMode, RejectReason};

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_nothing_equipped_is_rejected() {
        let mut fx = Fixture::new(None);
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(outcome, Some(ActivationOutcome::Rejected(RejectReason::NoAbilityEquipped)));
        assert_eq!(state, AbilityState::new());
        assert_eq!(frame, airborne_frame());
    }

    #[test]
    fn test_cooldown_blocks_burst_without_side_effects() {
        let mut fx = Fixture::equipped(AbilityKind::Burst);
        let mut state = AbilityState::new();
        state.cooldown_ticks = 5;
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(
            outcome,
            Some(ActivationOutcome::Rejected(RejectReason::CooldownActive { remaining: 5 }))
        );
        assert_eq!(frame.velocity, airborne_frame().velocity);
        assert!(!frame.velocity_modified);
        assert_eq!(fx.resources.stamina, 20);
        assert_eq!(state.cooldown_ticks, 5);
        assert_eq!(state.active(), None);
    }

    #[test]
    fn test_burst_launches_along_look_direction() {
        let mut fx = Fixture::equipped(AbilityKind::Burst);
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();
        frame.orientation = crate::components::Orientation::new(90.0, -30.0);

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(outcome, Some(activated(AbilityKind::Burst)));
        assert_vec_eq(frame.velocity, frame.orientation.forward() * 1.5);
        assert!(frame.velocity_modified);
        assert_eq!(fx.resources.stamina, 18);
        assert_eq!(state.cooldown_ticks, 3);
        assert_eq!(state.active(), None); // мгновенная, слот не занят
    }

    #[test]
    fn test_burst_without_stamina_changes_nothing() {
        let mut fx = Fixture::equipped(AbilityKind::Burst);
        fx.resources.stamina = 1;
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(
            outcome,
            Some(ActivationOutcome::Rejected(RejectReason::InsufficientStamina {
                cost: 2,
                available: 1,
            }))
        );
        assert_eq!(fx.resources.stamina, 1);
        assert_eq!(state, AbilityState::new());
        assert_eq!(frame, airborne_frame());
    }

    #[test]
    fn test_exempt_agent_bursts_for_free() {
        let mut fx = Fixture::equipped(AbilityKind::Burst);
        fx.resources.stamina = 0;
        fx.resources.exempt = true;
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(outcome, Some(activated(AbilityKind::Burst)));
        assert_eq!(fx.resources.stamina, 0);
    }

    #[test]
    fn test_extra_jump_once_per_airtime() {
        let mut fx = Fixture::equipped(AbilityKind::ExtraJump);
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());
        assert_eq!(outcome, Some(activated(AbilityKind::ExtraJump)));
        assert_eq!(frame.velocity, Vec3::new(0.1, 0.42, 0.3)); // x/z не тронуты
        assert!(state.used_extra_jump);
        assert_eq!(fx.resources.stamina, 18);

        // Cooldown прошёл, но прыжок уже использован
        state.cooldown_ticks = 0;
        let mut second = airborne_frame();
        let outcome = dispatch_jump_edge(&mut state, &mut second, &mut fx.ctx());
        assert_eq!(outcome, Some(ActivationOutcome::Rejected(RejectReason::ExtraJumpAlreadyUsed)));
        assert_eq!(second, airborne_frame());
        assert_eq!(fx.resources.stamina, 18);
    }

    #[test]
    fn test_wing_suit_keeps_velocity() {
        let mut fx = Fixture::equipped(AbilityKind::WingSuit);
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(outcome, Some(activated(AbilityKind::WingSuit)));
        assert_eq!(frame, airborne_frame());
        assert_eq!(state.active(), Some(ContinuousMode::WingSuit));
        assert_eq!(state.cooldown_ticks, 3);
        assert_eq!(fx.resources.stamina, 20); // активация бесплатна
    }

    #[test]
    fn test_wall_rebound_without_wall_changes_nothing() {
        let mut fx = Fixture::equipped(AbilityKind::WallRebound);
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(outcome, Some(ActivationOutcome::Rejected(RejectReason::NoWallNearby)));
        assert_eq!(state, AbilityState::new());
        assert_eq!(frame, airborne_frame());
        assert_eq!(fx.resources.stamina, 20);
    }

    #[test]
    fn test_wall_rebound_launches_away_from_wall() {
        let mut fx = Fixture::equipped(AbilityKind::WallRebound);
        fx.world.fill_column(1, 0, 8, 12); // стена на востоке
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();
        frame.position = Vec3::new(0.69, 10.0, 0.5);

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(outcome, Some(activated(AbilityKind::WallRebound)));
        assert!(state.wall_rebound_active());
        assert!(frame.velocity.x < 0.0);
        assert_eq!(frame.velocity.z, 0.0);
        assert!((frame.velocity.y + frame.velocity.x).abs() < 1e-6); // 45°
        assert_eq!(fx.resources.stamina, 19);
    }

    #[test]
    fn test_wall_rebound_without_stamina_changes_nothing() {
        let mut fx = Fixture::equipped(AbilityKind::WallRebound);
        fx.world.fill_column(1, 0, 8, 12);
        fx.resources.stamina = 0;
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();
        frame.position = Vec3::new(0.69, 10.0, 0.5);
        let before = frame;

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(
            outcome,
            Some(ActivationOutcome::Rejected(RejectReason::InsufficientStamina {
                cost: 1,
                available: 0,
            }))
        );
        assert_eq!(state, AbilityState::new());
        assert_eq!(frame, before);
    }

    #[test]
    fn test_wing_suit_after_gear_swap_reports_displaced_rebound() {
        // Экипировку сменили между тиками, WallRebound ещё в слоте
        let mut fx = Fixture::equipped(AbilityKind::WingSuit);
        let mut state = AbilityState::new();
        state.begin(ContinuousMode::WallRebound);
        let mut frame = airborne_frame();

        let outcome = dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx());

        assert_eq!(
            outcome,
            Some(ActivationOutcome::Activated {
                kind: AbilityKind::WingSuit,
                displaced: Some(ContinuousMode::WallRebound),
            })
        );
        assert_eq!(state.active(), Some(ContinuousMode::WingSuit));
    }

    #[test]
    fn test_powered_glide_ignores_jump_edge() {
        let mut fx = Fixture::equipped(AbilityKind::PoweredGlide);
        let mut state = AbilityState::new();
        let mut frame = airborne_frame();

        assert_eq!(dispatch_jump_edge(&mut state, &mut frame, &mut fx.ctx()), None);
        assert_eq!(state, AbilityState::new());
    }

    #[test]
    fn test_start_glide_replaces_wall_rebound() {
        let mut fx = Fixture::equipped(AbilityKind::PoweredGlide);
        let mut state = AbilityState::new();
        state.begin(ContinuousMode::WallRebound);
        state.glide_tick_count = 77;
        let frame = airborne_frame();

        let outcome = dispatch_start_glide(&mut state, false, &frame, &mut fx.ctx());

        assert_eq!(
            outcome,
            ActivationOutcome::Activated {
                kind: AbilityKind::PoweredGlide,
                displaced: Some(ContinuousMode::WallRebound),
            }
        );
        assert_eq!(state.active(), Some(ContinuousMode::PoweredGlide));
        assert!(!state.wall_rebound_active());
        assert_eq!(state.glide_tick_count, 0);
        assert_eq!(state.cooldown_ticks, 3);
    }

    #[test]
    fn test_start_glide_preconditions() {
        type Setup = fn(&mut Fixture, &mut AbilityState, &mut MovementConditions, &mut bool);

        let cases: [(Setup, RejectReason); 8] = [
            (
                |fx, _, _, _| fx.gear.ability = Some(AbilityKind::WingSuit),
                RejectReason::NotEquipped,
            ),
            (
                |_, state, _, _| state.cooldown_ticks = 2,
                RejectReason::CooldownActive { remaining: 2 },
            ),
            (
                |_, state, _, _| {
                    state.begin(ContinuousMode::PoweredGlide);
                },
                RejectReason::AlreadyGliding,
            ),
            (|_, _, _, grounded| *grounded = true, RejectReason::Grounded),
            (
                |_, _, conditions, _| conditions.riding_vehicle = true,
                RejectReason::RidingVehicle,
            ),
            (
                |_, _, conditions, _| conditions.submerged = true,
                RejectReason::Submerged,
            ),
            (
                |_, _, conditions, _| conditions.movement_impaired = true,
                RejectReason::MovementImpaired,
            ),
            (
                |fx, _, _, _| fx.gear.near_breaking = true,
                RejectReason::GearNearlyBroken,
            ),
        ];

        for (setup, expected) in cases {
            let mut fx = Fixture::equipped(AbilityKind::PoweredGlide);
            let mut state = AbilityState::new();
            let mut frame = airborne_frame();
            let mut grounded = false;
            setup(&mut fx, &mut state, &mut frame.conditions, &mut grounded);
            let before = state.clone();

            let outcome = dispatch_start_glide(&mut state, grounded, &frame, &mut fx.ctx());

            assert_eq!(outcome, ActivationOutcome::Rejected(expected));
            assert_eq!(state, before, "state mutated on {:?}", expected);
        }
    }
}
