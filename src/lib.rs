//! Retained-mode UI toolkit.
//!
//! # Conceptual overview
//! Arbor keeps a tree of views, lays it out with pluggable strategies, and records draw
//! instructions for a drawing context to present.
//!
//! ## Views
//! A [`View`] owns its children, its frame (in the parent's coordinate space) and its dirty flags.
//! What a view does is decided by its [`Widget`]: a label measures and draws text, a panel lays out
//! children, and so on. Widgets get hooks for every pass and a mutable handle to the view's shared
//! state in each.
//!
//! Views have three kinds of sizes, all measured including borders: minimum, preferred and maximum.
//! Setting any of them to a new value marks the preferred size as changed so that the parent lays
//! out again.
//!
//! ## Frames
//! Each frame runs three passes over the tree:
//!
//! 1. *update*: widgets react to changed properties; then, bottom-up, views that need it
//!    recompute their sizes from their children's.
//! 2. *layout*: top-down, views whose layout is stale assign frames to their children.
//! 3. *draw*: every view is drawn into a painter scoped to its frame. A frame in which nothing
//!    needed redrawing records nothing and is not presented.
//!
//! ## Layout
//! Layout is performed top-down by [`LayoutStrategy`] implementations, which see children only
//! through the [`SubLayout`] interface: settings, preferred size, height for a given width, and a
//! way to assign a frame. [`FlexRow`] lays children out in a row, growing and shrinking them by
//! weight.
//!
//! ## Coordinate System
//! The origin of the top-level coordinate system is at the top left corner of the surface. The
//! y-axis is oriented such that positive y points down. Deeper layers are drawn on top of
//! shallower ones.
//!
//! ## Drawing Contexts
//! A [`DrawingContext`] hands out a [`Recording`] per frame and presents it afterwards.
//! [`SoftwareContext`] rasterizes on the CPU; GPU contexts can upload [`Recording::vertices`], the
//! text mask and the recording's images.

pub mod backend;
pub mod color;
pub mod config;
pub mod controls;
mod error;
pub mod font;
mod host;
pub mod layer;
pub mod layout;
pub mod mask;
pub mod painter;
pub mod png;
pub mod rect;
pub mod vertex;
#[macro_use]
mod view;

pub use backend::{DrawingContext, SoftwareContext};
pub use color::Color;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use host::{Host, Window};
pub use layer::{Layer, Painter};
pub use layout::{FlexJustify, FlexRow, LayoutSettings, LayoutStrategy, NoneLayout, SubLayout};
pub use painter::{Instruction, Recording};
pub use rect::{EdgeInsets, Point, Rect, Size};
pub use view::{View, ViewBase, ViewId, Widget};
