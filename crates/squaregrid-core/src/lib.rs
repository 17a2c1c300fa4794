pub mod config;
pub mod error;
pub mod grid;
pub mod notify;
pub mod scroll;
pub mod selection;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use grid::{GridItem, GridLayoutEngine, ItemSource, LayoutConfig, Row, RowMode, TileId};
pub use notify::{ChangeNotifier, Subscription};
pub use scroll::{ScrollController, ScrollEvent};
pub use selection::{SelectionEvent, SelectionStore};
