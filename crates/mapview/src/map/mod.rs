mod animation;
mod connection;
mod draw;
mod fog;
mod highlight;
#[cfg(test)]
pub(crate) mod test_support;
mod view;

pub use animation::{Animation, AnimationOverlay, FlashAnimation, GlyphPopAnimation, MAX_ANIMATIONS};
pub use connection::{connection_category, neighbor_dirs, ConnectionCategory, TileCaches};
pub use draw::{
    bleeding_color, fire_color, object_color, Cell, ObjectPainter, FIRE_GLYPH, STRONG_FIRE_GLYPH,
};
pub use fog::{FogMask, FogOfWar};
pub use highlight::highlight_color;
pub use view::{FrameSummary, MapView};
