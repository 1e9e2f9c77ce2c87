mod index;
mod object;
mod table;

pub use index::{HighlightType, ViewIndex};
pub use object::{Attributes, Disposition, Modifiers, ViewId, ViewLayer, ViewObject};
pub use table::{MapSnapshot, Table, TableError};
