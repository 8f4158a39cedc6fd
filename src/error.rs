//! Error handling for stax
use crate::Xid;
use std::{any::TypeId, num::ParseIntError};
use thiserror::Error;

/// A result type for fallible operations carried out by stax.
pub type Result<T> = std::result::Result<T, Error>;

/// Top level error type for all of the internals of stax.
#[derive(Debug, Error)]
pub enum Error {
    /// Another window manager is currently running and holding the requested selection.
    #[error("another window manager is already running")]
    AnotherWmRunning,

    /// Attempted to set up a [StackSet][crate::pure::StackSet] with no screens available.
    #[error("at least one screen is required to run")]
    NoScreens,

    /// There are more workspace tags requested than available screens to place them on.
    #[error("not enough workspaces for the available screens: {n_ws} workspaces for {n_screens} screens")]
    InsufficientWorkspaces {
        /// The number of workspace tags given
        n_ws: usize,
        /// The number of available screens
        n_screens: usize,
    },

    /// Two or more workspaces were given the same tag.
    #[error("workspace tags must be unique, duplicates found: {tags:?}")]
    NonUniqueTags {
        /// The tags that were duplicated
        tags: Vec<String>,
    },

    /// A requested client is not known to the running [StackSet][crate::pure::StackSet].
    #[error("unknown client: {0}")]
    UnknownClient(Xid),

    /// A requested client is known but is not currently visible on any screen.
    #[error("client is not currently visible: {0}")]
    ClientIsNotVisible(Xid),

    /// A [State][crate::core::State] extension of the requested type has not been registered.
    #[error("no state extension registered for {type_id:?}")]
    UnknownStateExtension {
        /// The [TypeId] of the extension that was requested
        type_id: TypeId,
    },

    /// A client supplied hint (WM_HINTS or WM_NORMAL_HINTS) could not be parsed.
    #[error("invalid window hints: {0}")]
    InvalidHints(String),

    /// A hex color string could not be parsed as a valid color.
    #[error("invalid hex color '{0}'")]
    InvalidHexColor(String),

    /// A method on [MockXConn][crate::x::mock::MockXConn] was called with no implementation
    /// provided. Only ever returned from test code.
    #[error("no mock implementation was provided for this method")]
    UnimplementedMock,

    /// Parsing an integer (such as a hex color component) failed.
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    /// Spawning an external program or waiting on its output failed.
    #[error("unable to run external program: {0}")]
    Spawn(#[from] std::io::Error),

    /// A [Layout][crate::core::layout::Layout] failed in some unrecoverable way while laying
    /// out clients on a [Workspace][crate::pure::Workspace].
    #[error("layout exception: {0}")]
    LayoutException(String),

    /// An error was returned to us by the X server while processing a request.
    #[error("X server error: {0}")]
    X11(String),

    /// An unrecoverable error was encountered: the running [WindowManager][crate::core::WindowManager]
    /// should exit.
    #[error("fatal error: {0}")]
    Fatal(String),
}
