//! Fixed timestep simulation tick
//!
//! Per-tick order: input, timers, player, backdrop, scroll, contacts, removal
//! pass, HUD. Timers only fire here, between steps.

use super::contact::Outcome;
use super::entity::{EntityId, EntityTag};
use super::session::Phase;
use super::state::{GameState, TimerEvent};
use crate::persistence::BestScoreStore;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/space. Position and touch count are irrelevant.
    pub tap: bool,
    /// Idle/demo mode - AI flies the bird
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick<S: BestScoreStore + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    store: &mut S,
) {
    if state.session.phase == Phase::Ready {
        return;
    }

    let tap = input.tap || (input.idle_mode && idle_wants_flap(state));
    if tap {
        state.handle_tap();
    }

    // Frozen after game over, only a tap gets us out
    if state.paused {
        state.refresh_hud();
        return;
    }

    state.time_ticks += 1;

    for event in state.scheduler.advance(dt) {
        match event {
            TimerEvent::SpawnObstacles => {
                state.spawn_obstacles();
            }
        }
    }

    let tuning = &state.tuning;
    if let Some(player) = &mut state.player {
        player.integrate(tuning.gravity, dt);
        player.anim.advance(dt, tuning.flap_frame_time);
    }
    state.backdrop.advance(dt, tuning.backdrop_period);

    let mut scrolled_out: Vec<EntityId> = Vec::new();
    for entity in &mut state.entities {
        if let Some(scroll) = &mut entity.scroll {
            entity.pos.x = scroll.advance(dt);
            if scroll.is_finished() {
                scrolled_out.push(entity.id);
            }
        }
    }

    let contacts = match &state.player {
        Some(player) => state.contacts.detect(player, &state.entities),
        None => Vec::new(),
    };

    // Points first, then termination
    for contact in contacts.iter().filter(|c| c.outcome() == Outcome::Score) {
        state.score_gap(contact.entity);
    }
    if contacts.iter().any(|c| c.outcome() == Outcome::GameOver) {
        state.end_session(store);
    }

    for id in scrolled_out {
        state.despawn(id);
    }

    state.refresh_hud();
}

/// Autopilot: aim a little below the next gap's center, flap when under the
/// aim point and not already rising
fn idle_wants_flap(state: &GameState) -> bool {
    if !state.session.is_active() {
        return false;
    }
    let Some(player) = &state.player else {
        return false;
    };

    let player_x = player.pos().x - player.radius;
    let target_y = state
        .tagged(EntityTag::GapSensor)
        .filter(|gap| gap.right() >= player_x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
        .map(|gap| gap.pos.y - gap.size.y / 4.0)
        .unwrap_or(state.tuning.center().y);

    player.pos().y < target_y && player.vel.y <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::backdrop::Backdrop;
    use crate::persistence::MemoryStore;
    use crate::sim::state::{EngineCommand, GameEvent};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet_tuning() -> Tuning {
        Tuning {
            spawn_on_start: false,
            ..Tuning::default()
        }
    }

    fn started(tuning: Tuning, store: &MemoryStore) -> GameState {
        let mut state = GameState::new(12345, tuning).unwrap();
        state.start(store);
        state
    }

    fn run(state: &mut GameState, store: &mut MemoryStore, seconds: f32) {
        let steps = (seconds / SIM_DT).round() as u32;
        for _ in 0..steps {
            tick(state, &TickInput::default(), SIM_DT, store);
        }
    }

    #[test]
    fn test_first_tap_impulses_from_rest() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);

        // Held in place until the first tap
        run(&mut state, &mut store, 0.5);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.pos(), state.tuning.center());

        let tap = TickInput {
            tap: true,
            ..Default::default()
        };
        tick(&mut state, &tap, SIM_DT, &mut store);

        let player = state.player.as_ref().unwrap();
        let expected = state.tuning.flap_impulse + state.tuning.gravity * SIM_DT;
        assert!((player.vel.y - expected).abs() < 1e-3);
        assert!(player.pos().y > state.tuning.center().y);
        assert!(state.drain_events().contains(&GameEvent::Flap));
    }

    #[test]
    fn test_timer_spawns_every_period() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);
        // Out of the obstacles' way
        state.player.as_mut().unwrap().entity.pos.y = 100_000.0;
        assert_eq!(state.tagged(EntityTag::GapSensor).count(), 0);

        run(&mut state, &mut store, 3.05);
        assert_eq!(state.tagged(EntityTag::GapSensor).count(), 1);

        run(&mut state, &mut store, 3.0);
        assert_eq!(state.tagged(EntityTag::GapSensor).count(), 2);
        assert_eq!(state.tagged(EntityTag::ObstacleTop).count(), 2);
        assert_eq!(state.tagged(EntityTag::ObstacleBottom).count(), 2);
    }

    #[test]
    fn test_obstacles_scroll_out_and_dispose() {
        let mut store = MemoryStore::new();
        let tuning = Tuning {
            // Far apart so the held player is never touched
            spawn_period: 100.0,
            hold_until_first_tap: true,
            player_size: Vec2::new(4.0, 4.0),
            ..Tuning::default()
        };
        let mut state = started(tuning, &store);
        // Keep the pair away from the player by pinning the player high up
        state.player.as_mut().unwrap().entity.pos.y = state.tuning.viewport.y * 10.0;

        let gap = state.tagged(EntityTag::GapSensor).next().unwrap().id;
        let start_x = state.entity(gap).unwrap().pos.x;

        run(&mut state, &mut store, 1.0);
        let x = state.entity(gap).unwrap().pos.x;
        assert!((start_x - x - 200.0).abs() < 1.0);

        state.drain_commands();
        let duration = state.tuning.scroll_duration();
        run(&mut state, &mut store, duration);
        assert!(state.entity(gap).is_none());
        assert_eq!(state.tagged(EntityTag::ObstacleTop).count(), 0);
        assert!(state.drain_commands().contains(&EngineCommand::Despawn(gap)));
    }

    #[test]
    fn test_passing_gap_scores_once() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);

        // Drop a pair right on the held player, centered on it
        let ids = state.spawn_obstacles().unwrap();
        let player_pos = state.player.as_ref().unwrap().pos();
        let offset = player_pos.y - state.entity(ids[2]).unwrap().pos.y;
        let width = state.tuning.viewport.x;
        for entity in state.entities.iter_mut().filter(|e| ids.contains(&e.id)) {
            entity.pos.y += offset;
            if let Some(scroll) = &mut entity.scroll {
                scroll.from_x = player_pos.x;
                scroll.to_x = player_pos.x - 2.0 * width;
            }
        }

        run(&mut state, &mut store, 1.0);
        assert_eq!(state.session.current_score, 1);
        assert_eq!(state.session.phase, Phase::Active);
        assert!(state.entity(ids[2]).unwrap().spent);
    }

    #[test]
    fn test_falling_to_ground_ends_session() {
        let mut store = MemoryStore::with_best(5);
        let mut state = started(quiet_tuning(), &store);
        state.player.as_mut().unwrap().dynamic = true;

        run(&mut state, &mut store, 5.0);
        assert_eq!(state.session.phase, Phase::GameOver);
        assert!(state.session.is_over);
        assert!(state.paused);
        assert!(!state.is_spawning());
        assert_eq!(store.best_score(), Some(5));
        assert_eq!(store.writes(), 0);

        // Frozen: nothing moves, nothing spawns
        let frozen = state.player.as_ref().unwrap().pos();
        let count = state.entities.len();
        run(&mut state, &mut store, 10.0);
        assert_eq!(state.player.as_ref().unwrap().pos(), frozen);
        assert_eq!(state.entities.len(), count);
    }

    #[test]
    fn test_backdrop_freezes_on_game_over() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);
        state.player.as_mut().unwrap().dynamic = true;

        run(&mut state, &mut store, 5.0);
        assert_eq!(state.session.phase, Phase::GameOver);

        let (width, period) = (state.tuning.backdrop_tile_width, state.tuning.backdrop_period);
        let frozen = state.backdrop.tile_positions(width, period);
        assert_ne!(frozen, Backdrop::new().tile_positions(width, period));

        run(&mut state, &mut store, 2.0);
        assert_eq!(state.backdrop.tile_positions(width, period), frozen);
    }

    #[test]
    fn test_simultaneous_contacts_end_once() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);
        state.session.current_score = 3;

        // Two obstacles overlapping the player at once
        let ids = state.spawn_obstacles().unwrap();
        let player_pos = state.player.as_ref().unwrap().pos();
        for entity in state.entities.iter_mut().filter(|e| ids[..2].contains(&e.id)) {
            entity.pos = player_pos;
            entity.scroll = None;
        }

        tick(&mut state, &TickInput::default(), SIM_DT, &mut store);
        assert_eq!(state.session.phase, Phase::GameOver);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.best_score(), Some(3));

        let game_overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_tap_after_game_over_restarts() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);
        state.player.as_mut().unwrap().dynamic = true;
        run(&mut state, &mut store, 5.0);
        assert_eq!(state.session.phase, Phase::GameOver);

        let tap = TickInput {
            tap: true,
            ..Default::default()
        };
        tick(&mut state, &tap, SIM_DT, &mut store);

        assert_eq!(state.session.phase, Phase::Active);
        assert_eq!(state.session.current_score, 0);
        let player = state.player.as_ref().unwrap();
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.pos(), state.tuning.center());
    }

    #[test]
    fn test_score_text_follows_session() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);
        assert!(state
            .drain_commands()
            .contains(&EngineCommand::SetScoreText("0".to_string())));

        let ids = state.spawn_obstacles().unwrap();
        state.score_gap(ids[2]);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut store);
        assert!(state
            .drain_commands()
            .contains(&EngineCommand::SetScoreText("1".to_string())));
    }

    #[test]
    fn test_idle_mode_flaps_when_falling_low() {
        let mut store = MemoryStore::new();
        let mut state = started(quiet_tuning(), &store);
        {
            let player = state.player.as_mut().unwrap();
            player.dynamic = true;
            player.entity.pos.y = 300.0;
            player.vel.y = -100.0;
        }

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle, SIM_DT, &mut store);
        assert!(state.player.as_ref().unwrap().vel.y > 0.0);
    }

    #[test]
    fn test_determinism() {
        let store = MemoryStore::new();
        let mut state1 = started(Tuning::default(), &store);
        let mut state2 = started(Tuning::default(), &store);
        let mut store1 = MemoryStore::new();
        let mut store2 = MemoryStore::new();

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..2400 {
            tick(&mut state1, &idle, SIM_DT, &mut store1);
            tick(&mut state2, &idle, SIM_DT, &mut store2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.session.current_score, state2.session.current_score);
        assert_eq!(state1.entities, state2.entities);
    }
}
