//! Built-in widgets.

mod image_view;
mod label;
mod panel;

pub use image_view::ImageView;
pub use label::Label;
pub use panel::Panel;
