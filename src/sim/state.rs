//! Game state and session transitions
//!
//! `GameState` owns the scene (player, obstacles, sensors), the session and
//! the spawn timer. It never talks to a renderer directly; everything the host
//! engine has to do is queued as an `EngineCommand`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::backdrop::Backdrop;
use super::contact::ContactTracker;
use super::entity::{Entity, EntityId, EntityTag, Player};
use super::scheduler::{Scheduler, TimerHandle};
use super::session::{Phase, SessionState, SessionSummary};
use super::spawner::SpawnEvent;
use crate::error::Result;
use crate::hud::Hud;
use crate::persistence::BestScoreStore;
use crate::tuning::Tuning;

/// Events carried by simulation timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpawnObstacles,
}

/// Requests from the core to the host engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Create a node for this entity
    Spawn(Entity),
    /// Remove a node; unknown ids must be ignored
    Despawn(EntityId),
    SetScoreText(String),
    ShowMessage(String),
    ClearMessage,
    /// Freeze all motion and actions
    Pause,
    Resume,
}

/// Gameplay notices (sound cues, logging, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Flap,
    ObstaclesSpawned { gap: EntityId },
    Scored { score: u32 },
    GameOver(SessionSummary),
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub session: SessionState,
    /// The player, present while a session is running
    pub player: Option<Player>,
    /// Obstacles and sensors (sorted by id)
    pub entities: Vec<Entity>,
    pub backdrop: Backdrop,
    /// All motion frozen
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) scheduler: Scheduler<TimerEvent>,
    pub(crate) contacts: ContactTracker,
    spawn_timer: Option<TimerHandle>,
    rng: Pcg32,
    next_id: EntityId,
    score_text: String,
    commands: Vec<EngineCommand>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle scene; call `start` to begin the first session.
    /// Fails if the tuning cannot drive a simulation.
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        Ok(Self {
            seed,
            tuning,
            session: SessionState::new(),
            player: None,
            entities: Vec::new(),
            backdrop: Backdrop::new(),
            paused: false,
            time_ticks: 0,
            scheduler: Scheduler::new(),
            contacts: ContactTracker::new(),
            spawn_timer: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            score_text: String::new(),
            commands: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ready -> Active: load the best score and set up the first session
    pub fn start<S: BestScoreStore + ?Sized>(&mut self, store: &S) {
        if self.session.phase != Phase::Ready {
            return;
        }
        self.session.load_best(store);
        log::info!("Scene started (best score {})", self.session.best_score);
        self.begin_session();
    }

    /// GameOver -> Active: wipe the scene and start over from scratch
    pub fn restart(&mut self) {
        if self.session.phase != Phase::GameOver {
            return;
        }
        self.clear_scene();
        self.commands.push(EngineCommand::ClearMessage);
        self.commands.push(EngineCommand::Resume);
        self.events.push(GameEvent::Restarted);
        log::info!("Session restarted");
        self.begin_session();
    }

    fn begin_session(&mut self) {
        self.session.begin();
        self.paused = false;
        self.backdrop.reset();

        let ground_id = self.next_entity_id();
        let ground = Entity::new(
            ground_id,
            EntityTag::GroundSensor,
            Vec2::new(self.tuning.center().x, 0.0),
            Vec2::new(self.tuning.viewport.x, 1.0),
        );
        self.add_entity(ground);

        let player_id = self.next_entity_id();
        let player = Player::new(
            player_id,
            self.tuning.center(),
            self.tuning.player_size,
            self.tuning.player_radius(),
            !self.tuning.hold_until_first_tap,
        );
        self.commands.push(EngineCommand::Spawn(player.entity.clone()));
        self.player = Some(player);

        self.spawn_timer =
            self.scheduler
                .schedule(TimerEvent::SpawnObstacles, self.tuning.spawn_period, true);

        if self.tuning.spawn_on_start {
            self.spawn_obstacles();
        }
        self.refresh_hud();
    }

    /// Any tap: flap while playing, restart once over
    pub fn handle_tap(&mut self) {
        match self.session.phase {
            Phase::Active => self.flap(),
            Phase::GameOver => self.restart(),
            Phase::Ready => {}
        }
    }

    /// Upward impulse on the player
    pub fn flap(&mut self) {
        if !self.session.is_active() {
            return;
        }
        if let Some(player) = &mut self.player {
            player.apply_impulse(
                Vec2::new(0.0, self.tuning.flap_impulse),
                self.tuning.player_mass,
            );
            self.events.push(GameEvent::Flap);
        }
    }

    /// Spawn timer callback. Returns the new entity ids, or `None` when the
    /// session is not running.
    pub fn spawn_obstacles(&mut self) -> Option<[EntityId; 3]> {
        if !self.session.is_active() || self.paused {
            log::debug!("Ignoring spawn request outside an active session");
            return None;
        }

        let ids = [
            self.next_entity_id(),
            self.next_entity_id(),
            self.next_entity_id(),
        ];
        let event = SpawnEvent::roll(&mut self.rng, &self.tuning);
        for entity in event.build(&self.tuning, ids) {
            self.add_entity(entity);
        }

        log::debug!("Spawned obstacle pair {ids:?} offset {:.1}", event.offset);
        self.events.push(GameEvent::ObstaclesSpawned { gap: ids[2] });
        Some(ids)
    }

    /// Award a point for passing through a gap sensor, once per sensor
    pub fn score_gap(&mut self, id: EntityId) -> bool {
        let Some(sensor) = self
            .entities
            .iter_mut()
            .find(|e| e.id == id && e.tag == EntityTag::GapSensor)
        else {
            return false;
        };
        if sensor.spent || !self.session.add_point() {
            return false;
        }
        sensor.spent = true;

        log::debug!("Scored: {}", self.session.current_score);
        self.events.push(GameEvent::Scored {
            score: self.session.current_score,
        });
        true
    }

    /// Active -> GameOver. Stops spawning, freezes the scene and persists the
    /// best score. Later calls in the same session do nothing.
    pub fn end_session<S: BestScoreStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Option<SessionSummary> {
        let summary = self.session.finish(store)?;

        if let Some(handle) = self.spawn_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.paused = true;
        self.commands.push(EngineCommand::Pause);
        for message in Hud::project(&self.session).messages {
            self.commands.push(EngineCommand::ShowMessage(message));
        }
        self.events.push(GameEvent::GameOver(summary));

        log::info!(
            "Game over: score {} best {}{}",
            summary.score,
            summary.best_score,
            if summary.new_high_score { " (new high score)" } else { "" }
        );
        Some(summary)
    }

    fn add_entity(&mut self, entity: Entity) {
        self.commands.push(EngineCommand::Spawn(entity.clone()));
        self.entities.push(entity);
    }

    /// Remove an entity. Removing an unknown or already removed id is a no-op.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(index) = self.entities.iter().position(|e| e.id == id) else {
            return false;
        };
        self.entities.remove(index);
        self.contacts.forget(id);
        self.commands.push(EngineCommand::Despawn(id));
        true
    }

    fn clear_scene(&mut self) {
        let ids: Vec<EntityId> = self.entities.iter().map(|e| e.id).collect();
        for id in ids {
            self.despawn(id);
        }
        if let Some(player) = self.player.take() {
            self.commands.push(EngineCommand::Despawn(player.id()));
        }
        self.contacts.clear();
        if let Some(handle) = self.spawn_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Push a score label update if the text changed
    pub(crate) fn refresh_hud(&mut self) {
        let hud = Hud::project(&self.session);
        if hud.score_text != self.score_text {
            self.commands.push(EngineCommand::SetScoreText(hud.score_text.clone()));
            self.score_text = hud.score_text;
        }
    }

    /// Whether the spawn timer is live
    pub fn is_spawning(&self) -> bool {
        self.spawn_timer
            .is_some_and(|handle| self.scheduler.is_scheduled(handle))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Entities with the given tag
    pub fn tagged(&self, tag: EntityTag) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.tag == tag)
    }

    pub fn hud(&self) -> Hud {
        Hud::project(&self.session)
    }

    /// Take queued engine commands
    pub fn drain_commands(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Take queued gameplay events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
