mod grid;
mod header;
mod popup;
mod status_bar;

pub use grid::GridWidget;
pub use header::HeaderWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
