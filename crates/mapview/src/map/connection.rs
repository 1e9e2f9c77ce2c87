use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::geometry::{Dir, DirSet, Vec2};
use crate::view::{MapSnapshot, Modifiers, ViewId, ViewLayer, ViewObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionCategory {
    Road,
    Wall,
    Water,
    Bridge,
    Library,
    TrainingRoom,
    TortureRoom,
    Workshop,
    Laboratory,
}

const CATEGORY_BY_ID: [Option<ConnectionCategory>; ViewId::COUNT] = {
    use ConnectionCategory as C;
    let mut table = [None; ViewId::COUNT];
    table[ViewId::Road.index()] = Some(C::Road);
    table[ViewId::Wall.index()] = Some(C::Wall);
    table[ViewId::BlackWall.index()] = Some(C::Wall);
    table[ViewId::YellowWall.index()] = Some(C::Wall);
    table[ViewId::HellWall.index()] = Some(C::Wall);
    table[ViewId::LowRockWall.index()] = Some(C::Wall);
    table[ViewId::WoodWall.index()] = Some(C::Wall);
    table[ViewId::CastleWall.index()] = Some(C::Wall);
    table[ViewId::MudWall.index()] = Some(C::Wall);
    table[ViewId::Mountain2.index()] = Some(C::Wall);
    table[ViewId::Water.index()] = Some(C::Water);
    table[ViewId::Magma.index()] = Some(C::Water);
    table[ViewId::Bridge.index()] = Some(C::Bridge);
    table[ViewId::Library.index()] = Some(C::Library);
    table[ViewId::TrainingRoom.index()] = Some(C::TrainingRoom);
    table[ViewId::TortureTable.index()] = Some(C::TortureRoom);
    table[ViewId::Workshop.index()] = Some(C::Workshop);
    table[ViewId::Laboratory.index()] = Some(C::Laboratory);
    table
};

const EIGHT_WAY_BY_ID: [bool; ViewId::COUNT] = {
    let mut table = [false; ViewId::COUNT];
    table[ViewId::Library.index()] = true;
    table[ViewId::Workshop.index()] = true;
    table[ViewId::Laboratory.index()] = true;
    table[ViewId::TortureTable.index()] = true;
    table[ViewId::TrainingRoom.index()] = true;
    table
};

pub fn connection_category(object: &ViewObject) -> Option<ConnectionCategory> {
    if object.has_modifier(Modifiers::PLANNED) {
        return None;
    }
    CATEGORY_BY_ID[object.id().index()]
}

pub fn neighbor_dirs(id: ViewId) -> &'static [Dir] {
    if EIGHT_WAY_BY_ID[id.index()] {
        &Dir::ALL
    } else {
        &Dir::CARDINAL
    }
}

#[derive(Debug, Clone, Default)]
pub struct TileCaches {
    connections: HashMap<Vec2, ConnectionCategory>,
    shadowed: HashSet<Vec2>,
}

impl TileCaches {
    pub fn rebuild(&mut self, snapshot: &MapSnapshot, tiles: impl IntoIterator<Item = Vec2>) {
        self.connections.clear();
        self.shadowed.clear();
        for pos in tiles {
            let Some(object) = snapshot
                .present(pos)
                .and_then(|index| index.object(ViewLayer::Floor))
            else {
                continue;
            };
            if object.has_modifier(Modifiers::CASTS_SHADOW) {
                self.shadowed.remove(&pos);
                self.shadowed.insert(pos + Dir::S.offset());
            }
            if let Some(category) = connection_category(object) {
                self.connections.insert(pos, category);
            }
        }
        debug!(
            connections = self.connections.len(),
            shadowed = self.shadowed.len(),
            "tile_caches_rebuilt"
        );
    }

    pub fn category_at(&self, pos: Vec2) -> Option<ConnectionCategory> {
        self.connections.get(&pos).copied()
    }

    pub fn connects(&self, category: ConnectionCategory, pos: Vec2) -> bool {
        self.category_at(pos) == Some(category)
    }

    pub fn is_shadowed(&self, pos: Vec2) -> bool {
        self.shadowed.contains(&pos)
    }

    pub fn connected_dirs(&self, object: &ViewObject, pos: Vec2) -> DirSet {
        let Some(category) = connection_category(object) else {
            return DirSet::empty();
        };
        neighbor_dirs(object.id())
            .iter()
            .copied()
            .filter(|dir| self.connects(category, pos + dir.offset()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::view::{Table, ViewIndex};

    fn floor(id: ViewId) -> ViewObject {
        ViewObject::new(id, ViewLayer::Floor, format!("{id:?}"))
    }

    fn snapshot(cells: &[(Vec2, ViewObject)]) -> MapSnapshot {
        let mut table: MapSnapshot = Table::filled(Rect::new(0, 0, 5, 5), None);
        for (pos, object) in cells {
            table.set(*pos, Some(ViewIndex::new().with_object(object.clone())));
        }
        table
    }

    fn rebuilt(snapshot: &MapSnapshot) -> TileCaches {
        let mut caches = TileCaches::default();
        caches.rebuild(snapshot, snapshot.bounds().positions());
        caches
    }

    #[test]
    fn category_table_matches_wall_and_water_families() {
        for id in [
            ViewId::Wall,
            ViewId::BlackWall,
            ViewId::YellowWall,
            ViewId::HellWall,
            ViewId::LowRockWall,
            ViewId::WoodWall,
            ViewId::CastleWall,
            ViewId::MudWall,
            ViewId::Mountain2,
        ] {
            assert_eq!(
                connection_category(&floor(id)),
                Some(ConnectionCategory::Wall),
                "id={id:?}"
            );
        }
        assert_eq!(
            connection_category(&floor(ViewId::Magma)),
            Some(ConnectionCategory::Water)
        );
        assert_eq!(
            connection_category(&floor(ViewId::TortureTable)),
            Some(ConnectionCategory::TortureRoom)
        );
        assert_eq!(connection_category(&floor(ViewId::Floor)), None);
        assert_eq!(connection_category(&floor(ViewId::Door)), None);
    }

    #[test]
    fn planned_objects_never_connect() {
        let planned = floor(ViewId::Wall).with_modifiers(Modifiers::PLANNED);
        assert_eq!(connection_category(&planned), None);
    }

    #[test]
    fn room_furniture_checks_all_eight_neighbors() {
        assert_eq!(neighbor_dirs(ViewId::Library).len(), 8);
        assert_eq!(neighbor_dirs(ViewId::Workshop).len(), 8);
        assert_eq!(neighbor_dirs(ViewId::Wall), &Dir::CARDINAL);
        assert_eq!(neighbor_dirs(ViewId::Road), &Dir::CARDINAL);
    }

    #[test]
    fn rebuild_records_categories_of_floor_objects() {
        let snapshot = snapshot(&[
            (Vec2::new(1, 1), floor(ViewId::Wall)),
            (Vec2::new(2, 1), floor(ViewId::Water)),
            (Vec2::new(3, 1), floor(ViewId::Floor)),
            (
                Vec2::new(4, 1),
                ViewObject::new(ViewId::Road, ViewLayer::Item, "road item"),
            ),
        ]);
        let caches = rebuilt(&snapshot);
        assert!(caches.connects(ConnectionCategory::Wall, Vec2::new(1, 1)));
        assert!(caches.connects(ConnectionCategory::Water, Vec2::new(2, 1)));
        assert!(!caches.connects(ConnectionCategory::Wall, Vec2::new(2, 1)));
        assert_eq!(caches.category_at(Vec2::new(3, 1)), None);
        assert_eq!(caches.category_at(Vec2::new(4, 1)), None);
    }

    #[test]
    fn wall_with_wall_to_the_east_connects_east_only() {
        let snapshot = snapshot(&[
            (Vec2::new(1, 1), floor(ViewId::Wall)),
            (Vec2::new(2, 1), floor(ViewId::CastleWall)),
            (Vec2::new(1, 2), floor(ViewId::Water)),
        ]);
        let caches = rebuilt(&snapshot);
        assert_eq!(
            caches.connected_dirs(&floor(ViewId::Wall), Vec2::new(1, 1)),
            DirSet::E
        );
    }

    #[test]
    fn library_connects_diagonally() {
        let snapshot = snapshot(&[
            (Vec2::new(1, 1), floor(ViewId::Library)),
            (Vec2::new(2, 2), floor(ViewId::Library)),
            (Vec2::new(1, 2), floor(ViewId::Library)),
        ]);
        let caches = rebuilt(&snapshot);
        assert_eq!(
            caches.connected_dirs(&floor(ViewId::Library), Vec2::new(1, 1)),
            DirSet::S | DirSet::SE
        );
    }

    #[test]
    fn shadow_falls_one_row_south_and_is_cleared_by_lower_casters() {
        let caster = floor(ViewId::Wall).with_modifiers(Modifiers::CASTS_SHADOW);
        let snapshot = snapshot(&[
            (Vec2::new(1, 0), caster.clone()),
            (Vec2::new(1, 1), caster),
            (Vec2::new(3, 0), floor(ViewId::Wall)),
        ]);
        let caches = rebuilt(&snapshot);
        assert!(!caches.is_shadowed(Vec2::new(1, 1)));
        assert!(caches.is_shadowed(Vec2::new(1, 2)));
        assert!(!caches.is_shadowed(Vec2::new(3, 1)));
    }

    #[test]
    fn rebuild_only_scans_the_given_tiles() {
        let snapshot = snapshot(&[(Vec2::new(4, 4), floor(ViewId::Wall))]);
        let mut caches = TileCaches::default();
        caches.rebuild(&snapshot, Rect::new(0, 0, 2, 2).positions());
        assert_eq!(caches.category_at(Vec2::new(4, 4)), None);
    }
}
