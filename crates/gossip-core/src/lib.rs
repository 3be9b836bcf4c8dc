//! Menu composition and navigation engine for interactive dialog trees.
//!
//! A [`Menu`] owns [`Page`]s and [`MenuOption`]s by id. Pages are ordered,
//! visibility-gated clusters of option references; options are single
//! selectable lines whose behavior is one of a closed set of variants (plain,
//! paid popup, or delegate to an external menu). The host renders through the
//! [`RenderBoundary`] and charges costs through the [`EconomyBoundary`]; the
//! engine itself performs no I/O and keeps no per-viewer state.

/// Host-facing capabilities: rendering and currency.
pub mod boundary;
/// Menu configuration.
pub mod config;
/// Error types used throughout the crate.
pub mod error;
/// Dialog icons.
pub mod icon;
/// Page, option, text and requester identifiers.
pub mod id;
/// The registry and show/select orchestrator.
pub mod menu;
/// Currency amounts in the smallest unit.
pub mod money;
/// Selectable option lines and their post-selection navigation.
pub mod option;
/// Ordered clusters of option references.
pub mod page;
/// An in-memory viewer that records every boundary call.
pub mod recording;

/// Re-export boundary types.
pub use boundary::{EconomyBoundary, RenderBoundary, RenderedLine, RenderedOption, Viewer};
/// Re-export configuration.
pub use config::MenuConfig;
/// Re-export error types.
pub use error::{MenuError, MenuResult};
/// Re-export icons.
pub use icon::Icon;
/// Re-export identifiers.
pub use id::{OptionId, PageId, RequesterId, TextId};
/// Re-export the menu.
pub use menu::Menu;
/// Re-export currency.
pub use money::Money;
/// Re-export option types.
pub use option::{DelegateTarget, MenuOption, Navigation, NextStep};
/// Re-export page types.
pub use page::Page;
/// Re-export the recording viewer.
pub use recording::{Frame, RecordingViewer, RenderEvent};
