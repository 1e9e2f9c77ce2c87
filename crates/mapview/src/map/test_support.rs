use crate::geometry::{Rect, Vec2};
use crate::tiles::TileAtlas;
use crate::view::{MapSnapshot, Table, ViewIndex, ViewObject};

const FIXTURE_ATLAS: &str = r##"{
    "nominal_size": [24, 24],
    "textures": [
        { "file": "shadows.png", "tile_size": [24, 24] },
        { "file": "terrain.png", "tile_size": [24, 24] },
        { "file": "effects.png", "tile_size": [24, 24] },
        { "file": "items.png", "tile_size": [24, 24] },
        { "file": "creatures.png", "tile_size": [24, 24] },
        { "file": "overlays.png", "tile_size": [24, 24] }
    ],
    "tiles": [
        { "id": "FLOOR", "glyph": { "text": ".", "color": { "r": 120, "g": 120, "b": 120 } },
          "sprite": { "texture": 1, "coord": [0, 0] } },
        { "id": "WALL", "glyph": { "text": "#", "color": { "r": 200, "g": 200, "b": 200 } },
          "sprite": { "texture": 1, "coord": [1, 0],
                      "connections": { "": [1, 1], "E": [2, 1], "N,S": [3, 1] } } },
        { "id": "WATER", "glyph": { "text": "~", "color": { "r": 0, "g": 0, "b": 255 } },
          "sprite": { "texture": 1, "coord": [4, 0], "background": [5, 0] } },
        { "id": "DOOR", "glyph": { "text": "+", "color": { "r": 160, "g": 100, "b": 40 } },
          "sprite": { "texture": 1, "coord": [7, 0], "translucent": 0.5 } },
        { "id": "TREE", "glyph": { "text": "T", "color": { "r": 0, "g": 160, "b": 0 } },
          "sprite": { "texture": 1, "coord": [8, 0], "no_shadow": true } },
        { "id": "CHEST", "glyph": { "text": "=", "color": { "r": 160, "g": 100, "b": 40 } },
          "sprite": { "texture": 3, "coord": [-1, 0] } },
        { "id": "GOBLIN", "glyph": { "text": "g", "color": { "r": 0, "g": 200, "b": 0 } },
          "sprite": { "texture": 4, "coord": [0, 0] } },
        { "id": "GOLD", "glyph": { "text": "$", "symbol_font": true, "color": { "r": 250, "g": 255, "b": 0 } } },
        { "id": "FOG_OF_WAR", "glyph": { "text": " ", "color": { "r": 0, "g": 0, "b": 0 } },
          "sprite": { "texture": 1, "coord": [0, 9], "connections": { "": [1, 9] } } },
        { "id": "FOG_OF_WAR_CORNER", "glyph": { "text": " ", "color": { "r": 0, "g": 0, "b": 0 } },
          "sprite": { "texture": 1, "coord": [0, 10],
                      "connections": { "NE": [1, 10], "SE": [2, 10], "NW": [3, 10], "SW": [4, 10] } } }
    ]
}"##;

pub(crate) fn fixture_atlas() -> TileAtlas {
    TileAtlas::from_json_str(FIXTURE_ATLAS).expect("fixture atlas")
}

pub(crate) fn snapshot_with(bounds: Rect, objects: &[(Vec2, ViewObject)]) -> MapSnapshot {
    let mut table: MapSnapshot = Table::filled(bounds, None);
    for (pos, object) in objects {
        let Some(slot) = table.get_mut(*pos) else {
            continue;
        };
        slot.get_or_insert_with(ViewIndex::new).insert(object.clone());
    }
    table
}
