//! Client-side core of the invoice email add-in taskpane.
//!
//! The pure pieces (confidence tiers, section selection, invoice projection and
//! import payload assembly) sit next to the seams for the mail host, the
//! backend service and the text surface.

pub mod api;
pub mod config;
pub mod confidence;
pub mod display;
pub mod error;
pub mod form;
pub mod host;
pub mod model;
pub mod payload;
pub mod projector;
pub mod render;
pub mod session;

pub use display::{DisplayState, resolve};
pub use session::{PaneState, Taskpane};
