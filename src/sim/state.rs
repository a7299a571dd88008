//! Simulation state: entities, registries, and per-tick events
//!
//! Everything that must survive a save or replay deterministically lives
//! here. Registries are plain vectors kept in id order; spawns append and
//! removals happen after each tick's pass, never mid-iteration, and no
//! entity is touched again once removed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Line;
use super::map::MapGrid;
use crate::consts::*;

/// Stable handle to a live entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Base movable/collidable object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    /// Vertical coordinate; 0 is the floor
    pub pos_z: f32,
    /// Heading in radians
    pub angle: f32,
    /// Vertical aim in radians
    pub pitch: f32,
    /// Scalar speed along angle/pitch, in map units per tick
    pub velocity: f32,
    /// 0 disables collision entirely for this entity
    pub collision_radius: f32,
    pub collision_height: f32,
    /// Spawning entity; used only to exclude self-collision, never ownership
    pub parent: Option<EntityId>,
}

impl Entity {
    pub fn new(id: EntityId, pos: Vec2, collision_radius: f32) -> Self {
        debug_assert!(collision_radius >= 0.0);
        Self {
            id,
            pos,
            pos_z: 0.0,
            angle: 0.0,
            pitch: 0.0,
            velocity: 0.0,
            collision_radius,
            collision_height: 0.0,
            parent: None,
        }
    }
}

/// Frame/loop bookkeeping for sprite animation.
///
/// Visual playback is the renderer's business; the simulation only advances
/// counters and watches loop completion for effect expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Ticks per frame step (0 = static sprite)
    pub rate: u32,
    pub frames: u32,
    tick_counter: u32,
    pub frame: u32,
    pub loops_completed: u32,
}

impl Animation {
    pub fn new(rate: u32, frames: u32) -> Self {
        Self {
            rate,
            frames,
            tick_counter: 0,
            frame: 0,
            loops_completed: 0,
        }
    }

    /// Step the frame counter by one tick
    pub fn advance(&mut self) {
        if self.rate == 0 || self.frames <= 1 {
            return;
        }
        self.tick_counter += 1;
        if self.tick_counter >= self.rate {
            self.tick_counter = 0;
            self.frame += 1;
            if self.frame >= self.frames {
                self.frame = 0;
                self.loops_completed += 1;
            }
        }
    }
}

/// A world sprite: the base entity plus animation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub entity: Entity,
    pub anim: Animation,
}

impl Sprite {
    pub fn new(entity: Entity, anim: Animation) -> Self {
        Self { entity, anim }
    }

    /// Per-tick update hook
    pub fn update(&mut self) {
        self.anim.advance();
    }
}

/// Template for the effect a projectile leaves on impact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub anim_rate: u32,
    pub anim_frames: u32,
    /// Full animation loops to play before the effect is removed
    pub loop_count: u32,
}

/// Template for the projectiles a weapon fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub collision_radius: f32,
    /// Seconds before an unimpeded projectile despawns
    pub lifespan: f32,
    /// Remaining wall bounces (reserved; fired projectiles carry it as data)
    pub ricochets: u32,
    pub anim_rate: u32,
    pub anim_frames: u32,
    pub impact_effect: Option<EffectSpec>,
}

impl Default for ProjectileSpec {
    fn default() -> Self {
        Self {
            collision_radius: 0.05,
            lifespan: f32::MAX,
            ricochets: 0,
            anim_rate: 0,
            anim_frames: 1,
            impact_effect: None,
        }
    }
}

/// A fired projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub sprite: Sprite,
    pub ricochets: u32,
    /// Seconds remaining before quiet despawn
    pub lifespan: f32,
    pub impact_effect: Option<EffectSpec>,
}

impl Projectile {
    /// Instantiate this projectile's impact effect at the struck point.
    /// The effect inherits heading, pitch, and the projectile's parent.
    pub fn spawn_effect(&self, id: EntityId, pos: Vec2, pos_z: f32) -> Option<Effect> {
        self.impact_effect.map(|spec| {
            let mut entity = Entity::new(id, pos, 0.0);
            entity.pos_z = pos_z;
            entity.angle = self.sprite.entity.angle;
            entity.pitch = self.sprite.entity.pitch;
            entity.parent = self.sprite.entity.parent;
            Effect {
                sprite: Sprite::new(entity, Animation::new(spec.anim_rate, spec.anim_frames)),
                loop_count: spec.loop_count,
            }
        })
    }
}

/// A spawned visual effect (explosion, impact flash)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub sprite: Sprite,
    pub loop_count: u32,
}

impl Effect {
    pub fn update(&mut self) {
        self.sprite.update();
    }

    /// True once the animation has played `loop_count` full cycles
    pub fn finished(&self) -> bool {
        self.sprite.anim.loops_completed >= self.loop_count
    }
}

/// A weapon in the player's inventory
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub projectile: ProjectileSpec,
    /// Muzzle velocity in map units per second
    pub velocity: f32,
    /// Shots per second
    pub rate_of_fire: f32,
    cooldown_ticks: u32,
}

impl Weapon {
    pub fn new(projectile: ProjectileSpec, velocity: f32, rate_of_fire: f32) -> Self {
        Self {
            projectile,
            velocity,
            rate_of_fire,
            cooldown_ticks: 0,
        }
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown_ticks > 0
    }

    /// Tick down the fire cooldown
    pub(crate) fn cool(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
    }

    /// Start the fire cooldown; false if still cooling down from a prior shot
    pub(crate) fn fire(&mut self) -> bool {
        if self.on_cooldown() {
            return false;
        }
        self.cooldown_ticks = (TICK_RATE as f32 / self.rate_of_fire).round() as u32;
        true
    }
}

/// Player stances; each fixes the eye height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Posture {
    Stand,
    Crouch,
    Prone,
    Jump,
}

/// The player: an entity plus weapon inventory. Exactly one per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub weapons: Vec<Weapon>,
    /// Index into `weapons`; None = holstered
    pub selected_weapon: Option<usize>,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, angle: f32, collision_radius: f32) -> Self {
        let mut entity = Entity::new(id, pos, collision_radius);
        entity.angle = angle;
        entity.pos_z = STAND_Z;
        entity.collision_height = 0.5;
        Self {
            entity,
            weapons: Vec::new(),
            selected_weapon: None,
        }
    }

    /// Add a weapon and select it
    pub fn add_weapon(&mut self, weapon: Weapon) {
        self.weapons.push(weapon);
        self.selected_weapon = Some(self.weapons.len() - 1);
    }

    /// Select a weapon slot, or holster with None. Out-of-range slots holster.
    pub fn select_weapon(&mut self, slot: Option<usize>) {
        self.selected_weapon = slot.filter(|&i| i < self.weapons.len());
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.selected_weapon.map(|i| &self.weapons[i])
    }

    pub fn weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.selected_weapon.map(|i| &mut self.weapons[i])
    }

    pub fn set_posture(&mut self, posture: Posture) {
        self.entity.pos_z = match posture {
            Posture::Stand => STAND_Z,
            Posture::Crouch => CROUCH_Z,
            Posture::Prone => PRONE_Z,
            Posture::Jump => JUMP_Z,
        };
    }

    pub fn is_standing(&self) -> bool {
        self.entity.pos_z == STAND_Z
    }
}

/// Seeded RNG bookkeeping. PCG streams are cheap to reconstruct, so only
/// the seed is persisted; draws are keyed by tick and entity so replays
/// stay stable regardless of iteration interleaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Stream for a specific tick/entity pair
    pub fn stream(&self, tick: u64, salt: u32) -> Pcg32 {
        let mixed = self
            .seed
            .wrapping_add(tick.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add((salt as u64) << 17);
        Pcg32::seed_from_u64(mixed)
    }
}

/// Outcomes the embedding layer consumes after each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile struck the player
    PlayerDamaged { by: EntityId },
    /// A projectile struck a sprite (drives the crosshair hit indicator)
    SpriteHit { target: EntityId, point: Vec2 },
    /// A projectile was destroyed by impact or floor contact
    ProjectileImpact { pos: Vec2 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub map: MapGrid,
    /// Wall-face segments derived from the map at construction; immutable
    /// for the session
    pub collision_set: Vec<Line>,
    pub clip_distance: f32,
    pub player: Player,
    /// Live registries, kept in id order for deterministic iteration
    pub sprites: Vec<Sprite>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
    /// Events emitted by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Demo world: bordered map, player in the open facing north
    pub fn new(seed: u64) -> Self {
        Self::with_map(
            MapGrid::demo(),
            CLIP_DISTANCE,
            seed,
            Vec2::new(9.5, 8.5),
            std::f32::consts::FRAC_PI_2,
        )
    }

    pub fn with_map(
        map: MapGrid,
        clip_distance: f32,
        seed: u64,
        player_pos: Vec2,
        player_angle: f32,
    ) -> Self {
        let collision_set = map.collision_lines(clip_distance);
        Self {
            seed,
            rng: RngState::new(seed),
            time_ticks: 0,
            map,
            collision_set,
            clip_distance,
            player: Player::new(EntityId(0), player_pos, player_angle, clip_distance),
            sprites: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a fresh entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawn a wandering sprite
    pub fn spawn_sprite(
        &mut self,
        pos: Vec2,
        collision_radius: f32,
        angle: f32,
        velocity: f32,
        anim: Animation,
    ) -> EntityId {
        let id = self.next_entity_id();
        let mut entity = Entity::new(id, pos, collision_radius);
        entity.angle = angle;
        entity.velocity = velocity;
        self.sprites.push(Sprite::new(entity, anim));
        id
    }

    /// Spawn a decorative, non-blocking prop (zero collision radius)
    pub fn spawn_prop(&mut self, pos: Vec2) -> EntityId {
        self.spawn_sprite(pos, 0.0, 0.0, 0.0, Animation::new(0, 1))
    }

    /// Spawn a projectile from a template; `parent` is the firing entity
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_projectile(
        &mut self,
        spec: &ProjectileSpec,
        pos: Vec2,
        pos_z: f32,
        angle: f32,
        pitch: f32,
        velocity: f32,
        parent: Option<EntityId>,
    ) -> EntityId {
        let id = self.next_entity_id();
        let mut entity = Entity::new(id, pos, spec.collision_radius);
        entity.pos_z = pos_z;
        entity.angle = angle;
        entity.pitch = pitch;
        entity.velocity = velocity;
        entity.parent = parent;
        self.projectiles.push(Projectile {
            sprite: Sprite::new(entity, Animation::new(spec.anim_rate, spec.anim_frames)),
            ricochets: spec.ricochets,
            lifespan: spec.lifespan,
            impact_effect: spec.impact_effect,
        });
        id
    }

    pub fn sprite(&self, id: EntityId) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.entity.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_loop_counting() {
        let mut anim = Animation::new(2, 3);
        // 2 ticks per frame, 3 frames: one full loop every 6 ticks
        for _ in 0..6 {
            anim.advance();
        }
        assert_eq!(anim.loops_completed, 1);
        assert_eq!(anim.frame, 0);
        for _ in 0..12 {
            anim.advance();
        }
        assert_eq!(anim.loops_completed, 3);
    }

    #[test]
    fn test_static_animation_never_loops() {
        let mut anim = Animation::new(0, 1);
        for _ in 0..100 {
            anim.advance();
        }
        assert_eq!(anim.loops_completed, 0);
    }

    #[test]
    fn test_weapon_cooldown_cycle() {
        let mut weapon = Weapon::new(ProjectileSpec::default(), 24.0, 6.0);
        assert!(weapon.fire());
        assert!(weapon.on_cooldown());
        assert!(!weapon.fire());

        // 6 shots/sec at 60 Hz = 10 ticks of cooldown
        for _ in 0..10 {
            weapon.cool();
        }
        assert!(weapon.fire());
    }

    #[test]
    fn test_entity_id_allocation_monotonic() {
        let mut state = GameState::new(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
        assert!(a > state.player.entity.id);
    }

    #[test]
    fn test_effect_finishes_after_loops() {
        let spec = EffectSpec {
            anim_rate: 1,
            anim_frames: 2,
            loop_count: 1,
        };
        let projectile = Projectile {
            sprite: Sprite::new(
                Entity::new(EntityId(7), Vec2::ZERO, 0.05),
                Animation::new(0, 1),
            ),
            ricochets: 0,
            lifespan: f32::MAX,
            impact_effect: Some(spec),
        };
        let mut effect = projectile
            .spawn_effect(EntityId(8), Vec2::new(3.0, 4.0), 0.4)
            .unwrap();
        assert!(!effect.finished());
        effect.update();
        assert!(!effect.finished());
        effect.update();
        assert!(effect.finished());
        assert_eq!(effect.sprite.entity.pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_posture_heights() {
        let mut player = Player::new(EntityId(0), Vec2::ZERO, 0.0, 0.1);
        assert!(player.is_standing());
        player.set_posture(Posture::Crouch);
        assert_eq!(player.entity.pos_z, CROUCH_Z);
        player.set_posture(Posture::Jump);
        assert_eq!(player.entity.pos_z, JUMP_Z);
        player.set_posture(Posture::Stand);
        assert!(player.is_standing());
    }

    #[test]
    fn test_rng_streams_are_stable() {
        use rand::Rng;
        let rng = RngState::new(42);
        let a: u32 = rng.stream(5, 3).random();
        let b: u32 = rng.stream(5, 3).random();
        let c: u32 = rng.stream(6, 3).random();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
