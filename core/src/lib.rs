#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tunnelman simulation.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure spawning system, and the adapters that drive them. The world
//! advances one tick at a time, talks to its surroundings exclusively through
//! the [`Host`] collaborator, and appends [`Event`] values describing what
//! happened so observers can react without poking at world internals.

use serde::{Deserialize, Serialize};

/// Number of terrain columns in the oil field.
pub const FIELD_COLUMNS: i32 = 64;

/// Number of terrain rows in the oil field. Row zero is the bottom of the field.
pub const FIELD_ROWS: i32 = 60;

/// Largest coordinate an entity anchor may occupy on either axis.
///
/// Anchors name the lower-left corner of a 4×4 sprite, so an anchor at 60
/// still keeps the sprite inside the 64 terrain columns. Row 60 is the surface
/// row above the terrain.
pub const MAX_ANCHOR: i32 = 60;

/// Edge length of every footprint (boulders, deposits, the digger's shovel).
pub const FOOTPRINT: i32 = 4;

/// Cell where protesters enter the field and which they seek when leaving.
pub const EXIT_CELL: CellCoord = CellCoord::new(60, 60);

/// Cell where the Tunnelman starts every level.
pub const PLAYER_START: CellCoord = CellCoord::new(30, 60);

/// Cell where bonus sonar kits appear.
pub const SONAR_KIT_CELL: CellCoord = CellCoord::new(0, 60);

/// Location of a single grid cell expressed as x and y coordinates.
///
/// `y` grows upward: moving [`Direction::Down`] decreases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell, increasing upward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the cell `distance` steps away in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx * distance, self.y + dy * distance)
    }

    /// Returns the adjacent cell in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Squared Euclidean distance between two cells.
    #[must_use]
    pub const fn distance_squared(self, other: CellCoord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    /// Euclidean distance between two cells.
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Reports whether `other` lies within `radius` (inclusive) of this cell.
    ///
    /// The comparison is made on squared distances so integer radii are exact.
    #[must_use]
    pub fn within(self, other: CellCoord, radius: f64) -> bool {
        self.distance_squared(other) as f64 <= radius * radius
    }

    /// Reports whether the cell is a legal anchor for a 4×4 entity.
    #[must_use]
    pub const fn is_anchor(&self) -> bool {
        self.x >= 0 && self.x <= MAX_ANCHOR && self.y >= 0 && self.y <= MAX_ANCHOR
    }

    /// Reports whether the cell lies inside the terrain grid.
    #[must_use]
    pub const fn is_terrain(&self) -> bool {
        self.x >= 0 && self.x < FIELD_COLUMNS && self.y >= 0 && self.y < FIELD_ROWS
    }

    /// Iterates the cells of the 4×4 footprint anchored at this cell.
    pub fn footprint(self) -> impl Iterator<Item = CellCoord> {
        (0..FOOTPRINT).flat_map(move |dx| {
            (0..FOOTPRINT).map(move |dy| CellCoord::new(self.x + dx, self.y + dy))
        })
    }

    /// Reports whether `cell` lies inside the 4×4 footprint anchored here.
    #[must_use]
    pub const fn footprint_contains(&self, cell: CellCoord) -> bool {
        self.x <= cell.x
            && cell.x < self.x + FOOTPRINT
            && self.y <= cell.y
            && cell.y < self.y + FOOTPRINT
    }
}

/// Cardinal facing and movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing y.
    Up,
    /// Movement toward decreasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
}

impl Direction {
    /// Every direction in the order candidate directions are enumerated.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit offset applied to a cell when stepping in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, 1),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Reports whether the direction runs along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// The two directions perpendicular to this one, vertical pair first.
    #[must_use]
    pub const fn perpendicular(self) -> [Direction; 2] {
        if self.is_horizontal() {
            [Self::Up, Self::Down]
        } else {
            [Self::Left, Self::Right]
        }
    }
}

/// Unique identifier assigned to every entity the registry owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Stable type identifier of an entity, as seen by renderers and observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled digger.
    Player,
    /// Protester with five hit points that never pursues by pathfinding.
    RegularProtester,
    /// Protester with twenty hit points that tracks the player by scent.
    HardcoreProtester,
    /// Unstable rock that falls once the terrain beneath it is dug away.
    Boulder,
    /// Gold nugget, either buried or dropped by the player as a bribe.
    Gold,
    /// Buried oil deposit; collecting all of them finishes the level.
    Barrel,
    /// Temporary pickup granting one sonar charge.
    SonarKit,
    /// Temporary pickup granting five water charges.
    WaterPool,
    /// Short-range water projectile fired by the player.
    Squirt,
}

impl EntityKind {
    /// Rendering depth passed through to presentation layers.
    #[must_use]
    pub const fn depth(self) -> u8 {
        match self {
            Self::Player | Self::RegularProtester | Self::HardcoreProtester => 0,
            Self::Boulder | Self::Squirt => 1,
            Self::Gold | Self::Barrel | Self::SonarKit | Self::WaterPool => 2,
        }
    }

    /// Reports whether the kind belongs to the adversary family.
    #[must_use]
    pub const fn is_protester(self) -> bool {
        matches!(self, Self::RegularProtester | Self::HardcoreProtester)
    }
}

/// Adversary variants spawned at the exit cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtesterKind {
    /// Regular protester.
    Regular,
    /// Hardcore protester.
    Hardcore,
}

impl ProtesterKind {
    /// Hit points the variant starts with.
    #[must_use]
    pub const fn initial_hit_points(self) -> i32 {
        match self {
            Self::Regular => 5,
            Self::Hardcore => 20,
        }
    }

    /// Entity kind reported for the variant.
    #[must_use]
    pub const fn entity_kind(self) -> EntityKind {
        match self {
            Self::Regular => EntityKind::RegularProtester,
            Self::Hardcore => EntityKind::HardcoreProtester,
        }
    }
}

/// Control keys the input collaborator may report for a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKey {
    /// Abandon the current life.
    Quit,
    /// Fire a water squirt in the facing direction.
    Fire,
    /// Turn toward, or step in, the provided direction.
    Move(Direction),
    /// Spend a sonar charge to reveal nearby buried items.
    UseSonar,
    /// Drop a gold nugget as a bribe.
    DropGold,
}

/// Sound cues emitted through [`Host::play_sound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// Terrain was dug away.
    Dig,
    /// The player died or quit.
    PlayerGaveUp,
    /// The player fired water.
    PlayerSquirt,
    /// A sonar charge was used.
    Sonar,
    /// A gold nugget, sonar kit or water pool was collected.
    GotGoodie,
    /// An oil deposit was collected.
    FoundOil,
    /// A boulder started falling.
    FallingRock,
    /// A protester shouted at the player.
    ProtesterYell,
    /// A protester was hurt but stays in the field.
    ProtesterAnnoyed,
    /// A protester gave up and is heading for the exit.
    ProtesterGaveUp,
    /// A protester took a gold bribe.
    ProtesterFoundGold,
    /// The last oil deposit was collected.
    FinishedLevel,
}

/// Result of a single simulation tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickOutcome {
    /// The level continues.
    Continue,
    /// The player lost a life during the tick.
    PlayerDied,
    /// Every oil deposit has been collected.
    LevelFinished,
}

impl TickOutcome {
    /// Reports whether the outcome ends the current world.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Events appended by the world while advancing a tick.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A protester entered the field.
    ProtesterSpawned {
        /// Identifier allocated to the protester.
        protester: EntityId,
        /// Variant that was spawned.
        kind: ProtesterKind,
        /// Cell the protester occupies after spawning.
        cell: CellCoord,
    },
    /// The terrain under a boulder is gone; it will fall after a short delay.
    BoulderLoosened {
        /// Identifier of the loosened boulder.
        boulder: EntityId,
    },
    /// A falling boulder descended one row.
    BoulderFell {
        /// Identifier of the falling boulder.
        boulder: EntityId,
        /// Anchor before the descent.
        from: CellCoord,
        /// Anchor after the descent.
        to: CellCoord,
    },
    /// A falling boulder hit the floor, terrain, or another boulder.
    BoulderShattered {
        /// Identifier of the shattered boulder.
        boulder: EntityId,
        /// Anchor where the boulder came to rest.
        cell: CellCoord,
    },
    /// The player fired a squirt that entered the field.
    SquirtFired {
        /// Identifier allocated to the squirt.
        squirt: EntityId,
        /// Cell the squirt starts from.
        cell: CellCoord,
        /// Direction of travel.
        direction: Direction,
    },
    /// The player dropped a gold nugget.
    GoldDropped {
        /// Identifier allocated to the nugget.
        gold: EntityId,
        /// Cell where the nugget lies.
        cell: CellCoord,
    },
    /// A buried item became visible.
    ItemRevealed {
        /// Identifier of the revealed item.
        item: EntityId,
        /// Kind of the revealed item.
        kind: EntityKind,
    },
    /// The player collected an oil deposit.
    OilFound {
        /// Identifier of the collected deposit.
        barrel: EntityId,
        /// Deposits still buried after this one.
        remaining: u32,
    },
    /// A protester committed to leaving the field.
    ProtesterLeaving {
        /// Identifier of the departing protester.
        protester: EntityId,
    },
    /// A leaving protester reached the exit.
    ProtesterExited {
        /// Identifier of the protester that left.
        protester: EntityId,
    },
    /// A bonus pickup appeared.
    BonusSpawned {
        /// Identifier allocated to the pickup.
        item: EntityId,
        /// Kind of pickup.
        kind: EntityKind,
        /// Cell the pickup occupies.
        cell: CellCoord,
    },
    /// A dead entity was swept from the registry.
    EntityRemoved {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Kind of the removed entity.
        kind: EntityKind,
    },
}

/// One-based level index driving every difficulty formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Level(u32);

impl Level {
    /// Creates a level wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying level index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Level that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Number of boulders seeded at level start.
    #[must_use]
    pub const fn boulder_count(self) -> u32 {
        min(self.0 / 2 + 2, 9)
    }

    /// Number of permanent gold nuggets seeded at level start.
    #[must_use]
    pub const fn gold_count(self) -> u32 {
        max(5u32.saturating_sub(self.0 / 2), 2)
    }

    /// Number of oil deposits seeded at level start.
    #[must_use]
    pub const fn oil_count(self) -> u32 {
        min(self.0.saturating_add(2), 21)
    }

    /// Ticks that must elapse between protester spawns.
    #[must_use]
    pub const fn spawn_cooldown(self) -> u32 {
        max(200u32.saturating_sub(self.0), 25)
    }

    /// Maximum number of live protesters, `floor(2 + 1.5 · level)` capped at 15.
    #[must_use]
    pub const fn protester_cap(self) -> u32 {
        min(self.0.saturating_mul(3) / 2 + 2, 15)
    }

    /// Percent chance that a spawned protester is the hardcore variant.
    #[must_use]
    pub const fn hardcore_chance_percent(self) -> u32 {
        min(self.0.saturating_mul(10).saturating_add(30), 90)
    }

    /// Rest applied to protesters after every action.
    #[must_use]
    pub const fn rest_ticks(self) -> u32 {
        3u32.saturating_sub(self.0 / 4)
    }

    /// Rest applied to a protester that survives being annoyed, and the
    /// duration of a hardcore protester's bribed stare.
    #[must_use]
    pub const fn stun_ticks(self) -> u32 {
        max(100u32.saturating_sub(self.0.saturating_mul(10)), 50)
    }

    /// Lifetime of sonar kits and water pools.
    #[must_use]
    pub const fn goodie_lifetime(self) -> u32 {
        max(300u32.saturating_sub(self.0.saturating_mul(10)), 100)
    }

    /// One-in-N odds of a bonus pickup appearing after a tick.
    #[must_use]
    pub const fn bonus_odds(self) -> u32 {
        self.0.saturating_mul(25).saturating_add(300)
    }

    /// Step budget of a hardcore protester's pursuit search.
    #[must_use]
    pub const fn pursuit_budget(self) -> u32 {
        self.0.saturating_mul(2).saturating_add(16)
    }
}

const fn min(a: u32, b: u32) -> u32 {
    if a < b {
        a
    } else {
        b
    }
}

const fn max(a: u32, b: u32) -> u32 {
    if a > b {
        a
    } else {
        b
    }
}

/// Collaborator surface the simulation consumes while ticking.
///
/// Input polling, audio, score keeping and the status line live outside the
/// simulation; the world only ever reaches them through this trait.
pub trait Host {
    /// Returns the control key pending for this tick, if any.
    fn pending_key(&mut self) -> Option<ControlKey>;

    /// Plays a sound cue. Fire and forget.
    fn play_sound(&mut self, sound: Sound);

    /// Increases the score by `points`.
    fn increase_score(&mut self, points: u32);

    /// Current score.
    fn score(&self) -> u32;

    /// Lives remaining.
    fn lives(&self) -> u32;

    /// Removes one life.
    fn decrement_lives(&mut self);

    /// Replaces the status line shown to the player.
    fn set_status_text(&mut self, text: &str);
}

/// Resources carried by the Tunnelman.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Remaining hit points; zero or below means dead.
    pub hit_points: i32,
    /// Water charges available for squirts.
    pub water: u32,
    /// Sonar charges available.
    pub sonar: u32,
    /// Gold nuggets available for bribes.
    pub gold: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            hit_points: 10,
            water: 5,
            sonar: 1,
            gold: 0,
        }
    }
}

/// Immutable representation of a single entity used by renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Identifier assigned to the entity.
    pub id: EntityId,
    /// Stable type identifier.
    pub kind: EntityKind,
    /// Anchor cell.
    pub cell: CellCoord,
    /// Facing direction.
    pub facing: Direction,
    /// Whether the entity should be drawn.
    pub visible: bool,
    /// Rendering depth.
    pub depth: u8,
}

/// Read-only snapshot describing every live entity, player first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityView {
    snapshots: Vec<EntitySnapshot>,
}

impl EntityView {
    /// Creates a view from snapshots already in registry order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EntitySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Counts snapshots of the provided kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.kind == kind)
            .count()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.snapshots
    }
}
