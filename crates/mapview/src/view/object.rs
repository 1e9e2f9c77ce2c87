use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewId {
    Floor,
    Grass,
    Road,
    Bridge,
    Wall,
    BlackWall,
    YellowWall,
    HellWall,
    LowRockWall,
    WoodWall,
    CastleWall,
    MudWall,
    Mountain2,
    Water,
    Magma,
    Library,
    TrainingRoom,
    TortureTable,
    Workshop,
    Laboratory,
    Door,
    Tree,
    Player,
    Keeper,
    Goblin,
    Imp,
    Skeleton,
    Gold,
    Sword,
    Chest,
    FogOfWar,
    FogOfWarCorner,
}

impl ViewId {
    pub const COUNT: usize = 32;
    pub const ALL: [ViewId; ViewId::COUNT] = [
        ViewId::Floor,
        ViewId::Grass,
        ViewId::Road,
        ViewId::Bridge,
        ViewId::Wall,
        ViewId::BlackWall,
        ViewId::YellowWall,
        ViewId::HellWall,
        ViewId::LowRockWall,
        ViewId::WoodWall,
        ViewId::CastleWall,
        ViewId::MudWall,
        ViewId::Mountain2,
        ViewId::Water,
        ViewId::Magma,
        ViewId::Library,
        ViewId::TrainingRoom,
        ViewId::TortureTable,
        ViewId::Workshop,
        ViewId::Laboratory,
        ViewId::Door,
        ViewId::Tree,
        ViewId::Player,
        ViewId::Keeper,
        ViewId::Goblin,
        ViewId::Imp,
        ViewId::Skeleton,
        ViewId::Gold,
        ViewId::Sword,
        ViewId::Chest,
        ViewId::FogOfWar,
        ViewId::FogOfWarCorner,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewLayer {
    FloorBackground,
    Floor,
    Item,
    LargeItem,
    Creature,
}

impl ViewLayer {
    pub const COUNT: usize = 5;
    pub const ALL: [ViewLayer; ViewLayer::COUNT] = [
        ViewLayer::FloorBackground,
        ViewLayer::Floor,
        ViewLayer::Item,
        ViewLayer::LargeItem,
        ViewLayer::Creature,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn is_floor(self) -> bool {
        matches!(self, ViewLayer::Floor | ViewLayer::FloorBackground)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const HIDDEN = 1 << 0;
        const ILLUSION = 1 << 1;
        const LOCKED = 1 << 2;
        // Excluded from auto-tiling.
        const PLANNED = 1 << 3;
        const CASTS_SHADOW = 1 << 4;
        const INVISIBLE = 1 << 5;
        const TEAM_HIGHLIGHT = 1 << 6;
        const PLAYER = 1 << 7;
        const MOVE_UP = 1 << 8;
        const ROUND_SHADOW = 1 << 9;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Disposition {
    Hostile,
    Friendly,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attributes {
    pub bleeding: f64,
    pub burning: f64,
    pub water_depth: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewObject {
    id: ViewId,
    layer: ViewLayer,
    description: String,
    modifiers: Modifiers,
    attributes: Attributes,
    disposition: Disposition,
}

impl ViewObject {
    pub fn new(id: ViewId, layer: ViewLayer, description: impl Into<String>) -> Self {
        Self {
            id,
            layer,
            description: description.into(),
            modifiers: Modifiers::empty(),
            attributes: Attributes::default(),
            disposition: Disposition::Neutral,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    pub fn with_bleeding(mut self, amount: f64) -> Self {
        self.attributes.bleeding = amount.clamp(0.0, 1.0);
        self
    }

    pub fn with_burning(mut self, amount: f64) -> Self {
        self.attributes.burning = amount.clamp(0.0, 1.0);
        self
    }

    pub fn with_water_depth(mut self, depth: f64) -> Self {
        self.attributes.water_depth = depth.max(0.0);
        self
    }

    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn layer(&self) -> ViewLayer {
        self.layer
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn has_modifier(&self, modifier: Modifiers) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }

    pub fn is_hostile(&self) -> bool {
        self.disposition == Disposition::Hostile
    }

    pub fn is_friendly(&self) -> bool {
        self.disposition == Disposition::Friendly
    }
}
