pub mod app;
pub mod backend;
pub mod clock;
pub mod color;
pub mod geometry;
pub mod layout;
pub mod map;
pub mod options;
pub mod tiles;
pub mod view;

pub use app::{run_viewer, ViewerConfig, ViewerError};
pub use backend::{
    CanvasFrame, FontId, RenderBackend, SpriteDraw, TextDraw, TextureLoadError, TextureSet,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use color::Color;
pub use geometry::{Dir, DirSet, Rect, Vec2};
pub use layout::{GridLayout, MapLayout};
pub use map::{
    Animation, FlashAnimation, FogOfWar, FrameSummary, GlyphPopAnimation, MapView,
};
pub use options::{HintHandle, ModalOverlay, OptionRow, OptionsPanel};
pub use tiles::{
    GlyphTile, SpriteCoord, SpriteTile, TileAtlas, TileAtlasError, TileDescriptor, TileLookup,
};
pub use view::{
    Attributes, Disposition, HighlightType, MapSnapshot, Modifiers, Table, TableError, ViewId,
    ViewIndex, ViewLayer, ViewObject,
};
