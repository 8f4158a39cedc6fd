//! A single physical output and the [Workspace] currently mounted on it.
use crate::pure::{geometry::Rect, Workspace};

/// A screen is a physical output with a [Workspace] mounted on it for display.
///
/// The `index` of a screen is a simple 0-based counter assigned in the order screens were
/// discovered: it is unrelated to the physical arrangement of monitors and is only used as a
/// stable handle for referring to a specific screen (e.g. `focus_screen`).
#[derive(Debug, Clone)]
pub struct Screen<C> {
    /// The workspace currently mounted on this screen
    pub workspace: Workspace<C>,
    /// The 0-indexed screen this corresponds to
    pub index: usize,
    /// The available space for this screen. (Not accounting for any reserved space such as
    /// status bars: see the [LayoutHook][crate::core::hooks::LayoutHook] based gap support for
    /// that)
    pub r: Rect,
}

impl<C> Screen<C> {
    /// The 0-indexed identifier for this screen.
    pub fn index(&self) -> usize {
        self.index
    }
}
