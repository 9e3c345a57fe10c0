//! Pointer and cursor state machine for a stacking desktop compositor.
//!
//! The [`Seat`] owns every piece of seat-scoped input state and is driven by
//! the host through `handle_*` entry points. Everything the seat needs from
//! the surrounding compositor (scene graph, views, outputs, focus, clients)
//! is reached through the collaborator traits in [`server`]. The
//! [`desktop::Desktop`] type is a complete in-memory host used by the
//! terminal playground, the replay benchmark and the tests.

pub mod click;
pub mod config;
pub mod constants;
pub mod constraint;
pub mod context;
pub mod cursor;
pub mod cursor_shape;
pub mod desktop;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod interactive;
pub mod mousebind;
pub mod node;
pub mod part;
pub mod playground;
pub mod pressed;
pub mod preview;
pub mod scene;
pub mod scroll;
pub mod seat;
pub mod server;
pub mod snap;
pub mod tracing_sub;
pub mod ui;
pub mod view;

pub use config::Config;
pub use context::{CursorContext, PartKind};
pub use error::{Error, Result};
pub use geometry::{Rect, ResizeEdges};
pub use mousebind::{Action, Modifiers, MouseEvent, Mousebind, Mousebinds};
pub use part::Part;
pub use seat::{Grab, InputMode, Seat};
pub use server::Server;
