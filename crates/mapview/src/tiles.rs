use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::color::Color;
use crate::geometry::{DirSet, Vec2};
use crate::view::{ViewId, ViewObject};

/// Cell coordinate inside a texture atlas. A negative `x` means "no sprite".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct SpriteCoord {
    pub x: i32,
    pub y: i32,
}

impl SpriteCoord {
    pub const INVALID: SpriteCoord = SpriteCoord { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self) -> bool {
        self.x >= 0
    }

    pub fn pixel_origin(&self, cell_size: Vec2) -> Vec2 {
        Vec2::new(self.x * cell_size.x, self.y * cell_size.y)
    }
}

impl From<[i32; 2]> for SpriteCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<SpriteCoord> for [i32; 2] {
    fn from(coord: SpriteCoord) -> Self {
        [coord.x, coord.y]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTile {
    pub texture: usize,
    pub coord: SpriteCoord,
    pub connections: HashMap<DirSet, SpriteCoord>,
    pub background: Option<SpriteCoord>,
    // 0 is opaque, 1 fully see-through.
    pub translucent: f64,
    pub no_shadow: bool,
}

impl SpriteTile {
    pub fn new(texture: usize, coord: SpriteCoord) -> Self {
        Self {
            texture,
            coord,
            connections: HashMap::new(),
            background: None,
            translucent: 0.0,
            no_shadow: false,
        }
    }

    pub fn sprite_coord(&self, dirs: DirSet) -> SpriteCoord {
        self.connections.get(&dirs).copied().unwrap_or(self.coord)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlyphTile {
    pub text: char,
    pub symbol_font: bool,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileDescriptor {
    pub sprite: Option<SpriteTile>,
    pub glyph: GlyphTile,
}

impl TileDescriptor {
    pub fn glyph(text: char, color: Color) -> Self {
        Self {
            sprite: None,
            glyph: GlyphTile {
                text,
                symbol_font: false,
                color,
            },
        }
    }

    pub fn with_sprite(mut self, sprite: SpriteTile) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn sprite(&self) -> Option<&SpriteTile> {
        self.sprite.as_ref()
    }
}

pub trait TileLookup {
    fn resolve(&self, object: &ViewObject, sprite_mode: bool) -> &TileDescriptor;

    fn sprite_for(&self, id: ViewId) -> Option<&SpriteTile>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSpec {
    pub file: PathBuf,
    pub tile_size: [i32; 2],
}

#[derive(Debug, Error)]
pub enum TileAtlasError {
    #[error("failed to read tile atlas at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tile atlas json at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tile {id:?} is defined more than once")]
    DuplicateTile { id: ViewId },
    #[error("tile {id:?} has invalid connection key '{key}'")]
    InvalidConnectionKey { id: ViewId, key: String },
    #[error("tile {id:?} references texture {texture}, but only {available} are declared")]
    UnknownTexture {
        id: ViewId,
        texture: usize,
        available: usize,
    },
    #[error("tile {id:?} has translucency {value} outside 0..=1")]
    InvalidTranslucency { id: ViewId, value: f64 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtlasFile {
    nominal_size: [i32; 2],
    #[serde(default)]
    textures: Vec<TextureSpec>,
    tiles: Vec<TileDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TileDef {
    id: ViewId,
    glyph: GlyphDef,
    #[serde(default)]
    sprite: Option<SpriteDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GlyphDef {
    text: char,
    #[serde(default)]
    symbol_font: bool,
    color: Color,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpriteDef {
    texture: usize,
    coord: SpriteCoord,
    #[serde(default)]
    connections: HashMap<String, SpriteCoord>,
    #[serde(default)]
    background: Option<SpriteCoord>,
    #[serde(default)]
    translucent: f64,
    #[serde(default)]
    no_shadow: bool,
}

#[derive(Debug, Clone)]
pub struct TileAtlas {
    nominal_size: Vec2,
    textures: Vec<TextureSpec>,
    sprite_tiles: HashMap<ViewId, TileDescriptor>,
    glyph_tiles: HashMap<ViewId, TileDescriptor>,
    unknown: TileDescriptor,
}

const UNKNOWN_TILE_GLYPH: char = '?';
const UNKNOWN_TILE_COLOR: Color = Color::rgb(255, 0, 255);

impl TileAtlas {
    pub fn load(path: &Path) -> Result<Self, TileAtlasError> {
        let raw = fs::read_to_string(path).map_err(|source| TileAtlasError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let atlas = Self::from_json_str(&raw)?;
        debug!(
            path = %path.display(),
            tile_count = atlas.glyph_tiles.len(),
            texture_count = atlas.textures.len(),
            "tile_atlas_loaded"
        );
        Ok(atlas)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TileAtlasError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file: AtlasFile =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
                let path = error.path().to_string();
                TileAtlasError::Parse {
                    path,
                    source: error.into_inner(),
                }
            })?;
        Self::from_file(file)
    }

    fn from_file(file: AtlasFile) -> Result<Self, TileAtlasError> {
        let texture_count = file.textures.len();
        let mut sprite_tiles = HashMap::new();
        let mut glyph_tiles = HashMap::new();
        for def in file.tiles {
            let id = def.id;
            let glyph_only = TileDescriptor {
                sprite: None,
                glyph: GlyphTile {
                    text: def.glyph.text,
                    symbol_font: def.glyph.symbol_font,
                    color: def.glyph.color,
                },
            };
            let sprite = def
                .sprite
                .map(|sprite| build_sprite_tile(id, sprite, texture_count))
                .transpose()?;
            let full = TileDescriptor {
                sprite,
                glyph: glyph_only.glyph.clone(),
            };
            if glyph_tiles.insert(id, glyph_only).is_some() {
                return Err(TileAtlasError::DuplicateTile { id });
            }
            sprite_tiles.insert(id, full);
        }

        Ok(Self {
            nominal_size: Vec2::new(file.nominal_size[0], file.nominal_size[1]),
            textures: file.textures,
            sprite_tiles,
            glyph_tiles,
            unknown: TileDescriptor::glyph(UNKNOWN_TILE_GLYPH, UNKNOWN_TILE_COLOR),
        })
    }

    pub fn nominal_size(&self) -> Vec2 {
        self.nominal_size
    }

    pub fn textures(&self) -> &[TextureSpec] {
        &self.textures
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.glyph_tiles.contains_key(&id)
    }
}

fn build_sprite_tile(
    id: ViewId,
    def: SpriteDef,
    texture_count: usize,
) -> Result<SpriteTile, TileAtlasError> {
    if def.texture >= texture_count {
        return Err(TileAtlasError::UnknownTexture {
            id,
            texture: def.texture,
            available: texture_count,
        });
    }
    if !(0.0..=1.0).contains(&def.translucent) {
        return Err(TileAtlasError::InvalidTranslucency {
            id,
            value: def.translucent,
        });
    }
    let mut connections = HashMap::with_capacity(def.connections.len());
    for (key, coord) in def.connections {
        let dirs = DirSet::parse_list(&key)
            .ok_or_else(|| TileAtlasError::InvalidConnectionKey { id, key: key.clone() })?;
        connections.insert(dirs, coord);
    }
    Ok(SpriteTile {
        texture: def.texture,
        coord: def.coord,
        connections,
        background: def.background,
        translucent: def.translucent,
        no_shadow: def.no_shadow,
    })
}

impl TileLookup for TileAtlas {
    fn resolve(&self, object: &ViewObject, sprite_mode: bool) -> &TileDescriptor {
        let tiles = if sprite_mode {
            &self.sprite_tiles
        } else {
            &self.glyph_tiles
        };
        tiles.get(&object.id()).unwrap_or(&self.unknown)
    }

    fn sprite_for(&self, id: ViewId) -> Option<&SpriteTile> {
        self.sprite_tiles.get(&id).and_then(TileDescriptor::sprite)
    }
}

impl Default for TileAtlas {
    fn default() -> Self {
        Self {
            nominal_size: Vec2::new(24, 24),
            textures: Vec::new(),
            sprite_tiles: HashMap::new(),
            glyph_tiles: HashMap::new(),
            unknown: TileDescriptor::glyph(UNKNOWN_TILE_GLYPH, UNKNOWN_TILE_COLOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewLayer;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ATLAS_JSON: &str = r##"{
        "nominal_size": [24, 24],
        "textures": [
            { "file": "creatures.png", "tile_size": [24, 24] },
            { "file": "terrain.png", "tile_size": [24, 36] }
        ],
        "tiles": [
            {
                "id": "WALL",
                "glyph": { "text": "#", "color": { "r": 200, "g": 200, "b": 200 } },
                "sprite": {
                    "texture": 1,
                    "coord": [0, 0],
                    "connections": { "": [1, 0], "N,S": [2, 0], "E": [-1, 0] }
                }
            },
            {
                "id": "GOBLIN",
                "glyph": { "text": "g", "color": { "r": 0, "g": 200, "b": 0 } }
            }
        ]
    }"##;

    #[test]
    fn parses_tiles_and_connection_variants() {
        let atlas = TileAtlas::from_json_str(ATLAS_JSON).expect("atlas");
        assert_eq!(atlas.nominal_size(), Vec2::new(24, 24));
        assert_eq!(atlas.textures().len(), 2);

        let wall = atlas.sprite_for(ViewId::Wall).expect("wall sprite");
        assert_eq!(wall.sprite_coord(DirSet::empty()), SpriteCoord::new(1, 0));
        assert_eq!(
            wall.sprite_coord(DirSet::N | DirSet::S),
            SpriteCoord::new(2, 0)
        );
        assert!(!wall.sprite_coord(DirSet::E).is_valid());
        assert_eq!(wall.sprite_coord(DirSet::W), SpriteCoord::new(0, 0));

        let object = ViewObject::new(ViewId::Wall, ViewLayer::Floor, "wall");
        let glyph = &atlas.resolve(&object, false).glyph;
        assert_eq!(glyph.text, '#');
        assert_eq!(glyph.color, Color::rgb(200, 200, 200));
    }

    #[test]
    fn glyph_mode_never_returns_sprites() {
        let atlas = TileAtlas::from_json_str(ATLAS_JSON).expect("atlas");
        let wall = ViewObject::new(ViewId::Wall, ViewLayer::Floor, "wall");
        assert!(atlas.resolve(&wall, true).sprite().is_some());
        let glyph_tile = atlas.resolve(&wall, false);
        assert!(glyph_tile.sprite().is_none());
        assert_eq!(glyph_tile.glyph.text, '#');
    }

    #[test]
    fn unknown_ids_resolve_to_placeholder_glyph() {
        let atlas = TileAtlas::from_json_str(ATLAS_JSON).expect("atlas");
        let chest = ViewObject::new(ViewId::Chest, ViewLayer::Item, "chest");
        assert_eq!(atlas.resolve(&chest, true).glyph.text, UNKNOWN_TILE_GLYPH);
        assert!(!atlas.contains(ViewId::Chest));
    }

    #[test]
    fn parse_errors_name_the_json_path() {
        let raw = r#"{ "nominal_size": [24, 24], "tiles": [ { "id": "NOT_A_TILE", "glyph": { "text": "x", "color": { "r": 0, "g": 0, "b": 0 } } } ] }"#;
        let err = TileAtlas::from_json_str(raw).expect_err("err");
        match err {
            TileAtlasError::Parse { path, .. } => assert_eq!(path, "tiles[0].id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_bad_connection_keys_and_textures() {
        let bad_key = ATLAS_JSON.replace("\"N,S\"", "\"N,UP\"");
        assert!(matches!(
            TileAtlas::from_json_str(&bad_key),
            Err(TileAtlasError::InvalidConnectionKey { id: ViewId::Wall, .. })
        ));

        let bad_texture = ATLAS_JSON.replace("\"texture\": 1", "\"texture\": 7");
        assert!(matches!(
            TileAtlas::from_json_str(&bad_texture),
            Err(TileAtlasError::UnknownTexture { texture: 7, .. })
        ));
    }

    #[test]
    fn rejects_duplicate_tiles() {
        let raw = r#"{ "nominal_size": [8, 8], "tiles": [
            { "id": "GOLD", "glyph": { "text": "$", "color": { "r": 1, "g": 1, "b": 1 } } },
            { "id": "GOLD", "glyph": { "text": "*", "color": { "r": 1, "g": 1, "b": 1 } } }
        ] }"#;
        assert!(matches!(
            TileAtlas::from_json_str(raw),
            Err(TileAtlasError::DuplicateTile { id: ViewId::Gold })
        ));
    }

    #[test]
    fn load_reads_from_disk_and_reports_missing_files() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(ATLAS_JSON.as_bytes()).expect("write");
        let atlas = TileAtlas::load(file.path()).expect("atlas");
        assert!(atlas.contains(ViewId::Goblin));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            TileAtlas::load(&missing),
            Err(TileAtlasError::Read { .. })
        ));
    }
}
