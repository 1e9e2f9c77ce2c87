use mapview::{
    Disposition, HighlightType, MapSnapshot, Modifiers, Rect, Table, Vec2, ViewId, ViewIndex,
    ViewLayer, ViewObject,
};

pub(crate) const DUNGEON_BOUNDS: Rect = Rect::new(0, 0, 40, 28);
const KEEPER_START: Vec2 = Vec2::new(8, 8);
const SIGHT_RADIUS: i32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Brush {
    Wall,
    Floor,
    Water,
    Road,
    PlannedWall,
}

impl Brush {
    pub(crate) const ALL: [Brush; 5] = [
        Brush::Wall,
        Brush::Floor,
        Brush::Water,
        Brush::Road,
        Brush::PlannedWall,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Brush::Wall => "Dig wall",
            Brush::Floor => "Clear floor",
            Brush::Water => "Flood",
            Brush::Road => "Pave road",
            Brush::PlannedWall => "Plan wall",
        }
    }

    pub(crate) fn hint(self) -> &'static str {
        match self {
            Brush::Wall => "Click or drag to raise solid rock",
            Brush::Floor => "Click or drag to clear tiles down to bare floor",
            Brush::Water => "Click or drag to flood tiles",
            Brush::Road => "Click or drag to lay a road",
            Brush::PlannedWall => "Click or drag to mark walls for construction",
        }
    }

    fn terrain(self) -> Terrain {
        match self {
            Brush::Wall => Terrain::solid(ViewId::Wall),
            Brush::Floor => Terrain::ground(ViewId::Floor),
            Brush::Water => Terrain::ground(ViewId::Water),
            Brush::Road => Terrain::ground(ViewId::Road),
            Brush::PlannedWall => Terrain {
                planned: true,
                ..Terrain::solid(ViewId::Wall)
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Terrain {
    ground: ViewId,
    feature: Option<ViewId>,
    planned: bool,
}

impl Terrain {
    const fn ground(ground: ViewId) -> Self {
        Self {
            ground,
            feature: None,
            planned: false,
        }
    }

    const fn solid(feature: ViewId) -> Self {
        Self {
            ground: ViewId::Floor,
            feature: Some(feature),
            planned: false,
        }
    }

    fn is_walkable(&self) -> bool {
        match self.feature {
            Some(ViewId::Bridge) | Some(ViewId::Door) => true,
            Some(_) => self.planned,
            None => !matches!(self.ground, ViewId::Water | ViewId::Magma),
        }
    }

    fn objects(&self) -> Vec<ViewObject> {
        let mut objects = Vec::with_capacity(2);
        match self.feature {
            None => objects.push(ViewObject::new(self.ground, ViewLayer::Floor, describe(self.ground))),
            Some(feature) => {
                objects.push(ViewObject::new(
                    self.ground,
                    ViewLayer::FloorBackground,
                    describe(self.ground),
                ));
                let mut object = ViewObject::new(feature, ViewLayer::Floor, describe(feature));
                if self.planned {
                    object = object.with_modifiers(Modifiers::PLANNED);
                } else if is_wall(feature) {
                    object = object.with_modifiers(Modifiers::CASTS_SHADOW);
                }
                objects.push(object);
            }
        }
        objects
    }
}

fn is_wall(id: ViewId) -> bool {
    matches!(
        id,
        ViewId::Wall | ViewId::BlackWall | ViewId::CastleWall | ViewId::WoodWall | ViewId::Mountain2
    )
}

fn describe(id: ViewId) -> &'static str {
    match id {
        ViewId::Floor => "Floor",
        ViewId::Road => "Road",
        ViewId::Bridge => "Bridge",
        ViewId::Water => "Water",
        ViewId::Magma => "Magma",
        ViewId::Library => "Library",
        ViewId::Laboratory => "Laboratory",
        ViewId::Door => "Door",
        ViewId::Mountain2 => "Mountain",
        ViewId::CastleWall => "Castle wall",
        _ => "Wall",
    }
}

#[derive(Debug, Clone)]
struct Creature {
    object: ViewObject,
    pos: Vec2,
    patrol: i32,
}

pub(crate) struct Dungeon {
    terrain: Table<Terrain>,
    explored: Table<bool>,
    creatures: Vec<Creature>,
    items: Vec<(Vec2, ViewObject)>,
    turn: u64,
}

impl Dungeon {
    pub(crate) fn new() -> Self {
        let mut dungeon = Self {
            terrain: Table::from_fn(DUNGEON_BOUNDS, |pos| {
                if on_border(pos) {
                    Terrain::solid(ViewId::Mountain2)
                } else {
                    Terrain::solid(ViewId::Wall)
                }
            }),
            explored: Table::filled(DUNGEON_BOUNDS, false),
            creatures: Vec::new(),
            items: Vec::new(),
            turn: 0,
        };
        dungeon.carve();
        dungeon.populate();
        dungeon.reveal_around(KEEPER_START, SIGHT_RADIUS);
        dungeon.reveal_around(Vec2::new(22, 12), 4);
        dungeon
    }

    fn carve(&mut self) {
        // Keeper hall.
        self.fill(Rect::new(3, 3, 15, 13), Terrain::ground(ViewId::Floor));
        // Library in its east corner.
        self.fill(Rect::new(11, 4, 14, 7), Terrain::ground(ViewId::Library));
        // Corridor to the river.
        self.fill(Rect::new(15, 8, 20, 9), Terrain::ground(ViewId::Road));
        // River running north to south, crossed by a bridge.
        self.fill(Rect::new(20, 2, 23, 26), Terrain::ground(ViewId::Water));
        self.fill(
            Rect::new(20, 8, 23, 9),
            Terrain {
                ground: ViewId::Water,
                feature: Some(ViewId::Bridge),
                planned: false,
            },
        );
        // Goblin cave beyond the river.
        self.fill(Rect::new(23, 5, 35, 20), Terrain::ground(ViewId::Floor));
        self.fill(Rect::new(30, 14, 34, 18), Terrain::ground(ViewId::Laboratory));
        self.fill(Rect::new(26, 10, 28, 12), Terrain::solid(ViewId::CastleWall));
        self.set_terrain(Vec2::new(15, 8), Terrain::solid(ViewId::Door));
        self.fill(
            Rect::new(5, 11, 9, 12),
            Terrain {
                planned: true,
                ..Terrain::solid(ViewId::Wall)
            },
        );
    }

    fn populate(&mut self) {
        self.creatures = vec![
            Creature {
                object: ViewObject::new(ViewId::Keeper, ViewLayer::Creature, "Keeper")
                    .with_modifiers(Modifiers::PLAYER)
                    .with_disposition(Disposition::Friendly),
                pos: KEEPER_START,
                patrol: 0,
            },
            Creature {
                object: ViewObject::new(ViewId::Imp, ViewLayer::Creature, "Imp")
                    .with_modifiers(Modifiers::TEAM_HIGHLIGHT)
                    .with_disposition(Disposition::Friendly),
                pos: Vec2::new(6, 5),
                patrol: 1,
            },
            Creature {
                object: ViewObject::new(ViewId::Imp, ViewLayer::Creature, "Swimming imp")
                    .with_disposition(Disposition::Friendly)
                    .with_water_depth(1.0),
                pos: Vec2::new(21, 14),
                patrol: 0,
            },
            Creature {
                object: ViewObject::new(ViewId::Goblin, ViewLayer::Creature, "Goblin warrior")
                    .with_disposition(Disposition::Hostile),
                pos: Vec2::new(25, 7),
                patrol: 1,
            },
            Creature {
                object: ViewObject::new(ViewId::Goblin, ViewLayer::Creature, "Wounded goblin")
                    .with_disposition(Disposition::Hostile)
                    .with_bleeding(0.6),
                pos: Vec2::new(29, 13),
                patrol: -1,
            },
            Creature {
                object: ViewObject::new(ViewId::Skeleton, ViewLayer::Creature, "Skeleton")
                    .with_modifiers(Modifiers::ILLUSION | Modifiers::ROUND_SHADOW),
                pos: Vec2::new(31, 8),
                patrol: 0,
            },
        ];
        self.items = vec![
            (
                Vec2::new(4, 4),
                ViewObject::new(ViewId::Gold, ViewLayer::Item, "Pile of gold"),
            ),
            (
                Vec2::new(12, 10),
                ViewObject::new(ViewId::Sword, ViewLayer::Item, "Sword"),
            ),
            (
                Vec2::new(13, 11),
                ViewObject::new(ViewId::Chest, ViewLayer::LargeItem, "Chest")
                    .with_modifiers(Modifiers::LOCKED),
            ),
            (
                Vec2::new(33, 6),
                ViewObject::new(ViewId::Tree, ViewLayer::LargeItem, "Burning tree")
                    .with_burning(0.7),
            ),
            (
                Vec2::new(24, 18),
                ViewObject::new(ViewId::Tree, ViewLayer::LargeItem, "Tree"),
            ),
        ];
    }

    pub(crate) fn bounds(&self) -> Rect {
        DUNGEON_BOUNDS
    }

    pub(crate) fn keeper_position(&self) -> Vec2 {
        self.creatures
            .first()
            .map(|creature| creature.pos)
            .unwrap_or(KEEPER_START)
    }

    pub(crate) fn turn(&self) -> u64 {
        self.turn
    }

    fn fill(&mut self, rect: Rect, terrain: Terrain) {
        for pos in rect.intersection(DUNGEON_BOUNDS).positions() {
            self.set_terrain(pos, terrain);
        }
    }

    fn set_terrain(&mut self, pos: Vec2, terrain: Terrain) -> bool {
        match self.terrain.get_mut(pos) {
            Some(slot) if *slot != terrain => {
                *slot = terrain;
                true
            }
            _ => false,
        }
    }

    fn is_walkable(&self, pos: Vec2) -> bool {
        self.terrain.get(pos).is_some_and(Terrain::is_walkable)
            && !self.creatures.iter().any(|creature| creature.pos == pos)
    }

    pub(crate) fn is_explored(&self, pos: Vec2) -> bool {
        self.explored.get(pos).copied().unwrap_or(false)
    }

    pub(crate) fn reveal_around(&mut self, center: Vec2, radius: i32) {
        let area = Rect::new(
            center.x - radius,
            center.y - radius,
            center.x + radius + 1,
            center.y + radius + 1,
        );
        for pos in area.intersection(DUNGEON_BOUNDS).positions() {
            self.explored.set(pos, true);
        }
    }

    pub(crate) fn paint(&mut self, pos: Vec2, brush: Brush) -> bool {
        if !DUNGEON_BOUNDS.contains(pos) || on_border(pos) {
            return false;
        }
        let changed = self.set_terrain(pos, brush.terrain());
        if changed {
            self.reveal_around(pos, 1);
        }
        changed
    }

    pub(crate) fn advance(&mut self) {
        self.turn += 1;
        for index in 0..self.creatures.len() {
            let Creature { pos, patrol, .. } = self.creatures[index];
            if patrol == 0 {
                continue;
            }
            let next = pos + Vec2::new(patrol, 0);
            if self.is_walkable(next) {
                self.creatures[index].pos = next;
            } else {
                self.creatures[index].patrol = -patrol;
            }
        }
    }

    #[cfg(test)]
    fn creature_positions(&self) -> Vec<Vec2> {
        self.creatures.iter().map(|creature| creature.pos).collect()
    }

    pub(crate) fn snapshot(&self) -> MapSnapshot {
        let keeper = self.keeper_position();
        let mut snapshot = Table::from_fn(DUNGEON_BOUNDS, |pos| {
            if !self.is_explored(pos) {
                return None;
            }
            let terrain = self.terrain.get(pos).copied()?;
            let mut index = ViewIndex::new();
            for object in terrain.objects() {
                index.insert(object);
            }
            if terrain.planned {
                index.set_highlight(HighlightType::Build, 1.0);
            }
            if terrain.ground == ViewId::Library {
                index.set_highlight(HighlightType::Efficiency, 0.4);
            }
            if terrain.ground == ViewId::Laboratory {
                index.set_highlight(HighlightType::PoisonGas, 0.5);
            }
            if chebyshev(pos, keeper) > SIGHT_RADIUS {
                index.set_highlight(HighlightType::Memory, 1.0);
            }
            Some(index)
        });
        let movable = self
            .items
            .iter()
            .map(|(pos, object)| (*pos, object))
            .chain(self.creatures.iter().map(|creature| (creature.pos, &creature.object)));
        for (pos, object) in movable {
            if let Some(Some(index)) = snapshot.get_mut(pos) {
                index.insert(object.clone());
            }
        }
        snapshot
    }
}

fn on_border(pos: Vec2) -> bool {
    pos.x == DUNGEON_BOUNDS.left
        || pos.y == DUNGEON_BOUNDS.top
        || pos.x == DUNGEON_BOUNDS.right - 1
        || pos.y == DUNGEON_BOUNDS.bottom - 1
}

fn chebyshev(a: Vec2, b: Vec2) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(snapshot: &MapSnapshot, pos: Vec2, layer: ViewLayer) -> Option<ViewObject> {
        snapshot
            .get(pos)?
            .as_ref()?
            .object(layer)
            .cloned()
    }

    #[test]
    fn unexplored_tiles_are_absent_from_the_snapshot() {
        let dungeon = Dungeon::new();
        let snapshot = dungeon.snapshot();
        assert_eq!(snapshot.bounds(), DUNGEON_BOUNDS);
        assert!(!dungeon.is_explored(Vec2::new(38, 26)));
        assert_eq!(snapshot.get(Vec2::new(38, 26)), Some(&None));
        assert!(snapshot.get(KEEPER_START).is_some_and(Option::is_some));
    }

    #[test]
    fn keeper_is_drawn_with_player_outline() {
        let dungeon = Dungeon::new();
        let keeper = object_at(&dungeon.snapshot(), KEEPER_START, ViewLayer::Creature)
            .expect("keeper visible");
        assert_eq!(keeper.id(), ViewId::Keeper);
        assert!(keeper.has_modifier(Modifiers::PLAYER));
    }

    #[test]
    fn walls_cast_shadows_and_sit_on_floor_background() {
        let dungeon = Dungeon::new();
        let snapshot = dungeon.snapshot();
        let wall = object_at(&snapshot, Vec2::new(2, 8), ViewLayer::Floor).expect("wall");
        assert_eq!(wall.id(), ViewId::Wall);
        assert!(wall.has_modifier(Modifiers::CASTS_SHADOW));
        let ground =
            object_at(&snapshot, Vec2::new(2, 8), ViewLayer::FloorBackground).expect("ground");
        assert_eq!(ground.id(), ViewId::Floor);
    }

    #[test]
    fn planned_walls_are_highlighted_for_building() {
        let dungeon = Dungeon::new();
        let snapshot = dungeon.snapshot();
        let pos = Vec2::new(6, 11);
        let wall = object_at(&snapshot, pos, ViewLayer::Floor).expect("planned wall");
        assert!(wall.has_modifier(Modifiers::PLANNED));
        assert!(!wall.has_modifier(Modifiers::CASTS_SHADOW));
        let index = snapshot.get(pos).and_then(Option::as_ref).expect("index");
        assert_eq!(index.highlight(HighlightType::Build), 1.0);
    }

    #[test]
    fn painting_changes_terrain_but_not_the_border() {
        let mut dungeon = Dungeon::new();
        assert!(dungeon.paint(Vec2::new(5, 5), Brush::Water));
        assert!(!dungeon.paint(Vec2::new(5, 5), Brush::Water));
        assert!(!dungeon.paint(Vec2::new(0, 5), Brush::Floor));
        assert!(!dungeon.paint(Vec2::new(-3, 5), Brush::Floor));

        let water = object_at(&dungeon.snapshot(), Vec2::new(5, 5), ViewLayer::Floor)
            .expect("painted tile");
        assert_eq!(water.id(), ViewId::Water);
    }

    #[test]
    fn painting_reveals_the_neighbourhood() {
        let mut dungeon = Dungeon::new();
        let pos = Vec2::new(36, 24);
        assert!(!dungeon.is_explored(pos));
        assert!(dungeon.paint(pos, Brush::Floor));
        assert!(dungeon.is_explored(pos));
        assert!(dungeon.is_explored(pos + Vec2::new(1, 1)));
    }

    #[test]
    fn patrols_stay_on_walkable_tiles() {
        let mut dungeon = Dungeon::new();
        for _ in 0..40 {
            dungeon.advance();
            for pos in dungeon.creature_positions() {
                let terrain = dungeon.terrain.get(pos).copied().expect("inside level");
                assert!(
                    terrain.is_walkable() || terrain.ground == ViewId::Water,
                    "creature on {pos:?}"
                );
            }
        }
        assert_eq!(dungeon.turn(), 40);
        assert_eq!(dungeon.keeper_position(), KEEPER_START);
    }

    #[test]
    fn swimmer_reports_water_depth() {
        let dungeon = Dungeon::new();
        let snapshot = dungeon.snapshot();
        let imp = object_at(&snapshot, Vec2::new(21, 14), ViewLayer::Creature).expect("imp");
        assert_eq!(imp.attributes().water_depth, 1.0);
    }
}
