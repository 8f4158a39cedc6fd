//! Built-in layout messages
pub use common::*;

macro_rules! msg {
    ($m:ident) => {
        impl $crate::core::layout::messages::IntoMessage for $m {}
    };
}

/// Messages for common [Layout] operations.
pub mod common {
    /// Alter the number of clients contained in the main area of the [Layout]
    pub struct IncMain(pub i8);
    msg!(IncMain);

    /// Expand the size of the main area of the [Layout]
    pub struct ExpandMain;
    msg!(ExpandMain);

    /// Shrink the size of the main area of the [Layout]
    pub struct ShrinkMain;
    msg!(ShrinkMain);

    /// Rotate the [Layout] to a new orientation
    pub struct Rotate;
    msg!(Rotate);

    /// Flip the main/secondary split of the [Layout] without changing its orientation
    pub struct Mirror;
    msg!(Mirror);

    /// Unwrap a [LayoutTransformer] to return the underlying [Layout]
    pub struct UnwrapTransformer;
    msg!(UnwrapTransformer);
}

/// Control messages sent by stax itself during window manager operation. All layouts
/// (particularly those that are maintaing additional state) should consider handling these.
pub mod control {
    /// A [Message] sent when a [Layout] is no longer visible (e.g. Layout changed on a visible
    /// [Workspace] or the workspace itself becoming hidden).
    pub struct Hide;
    msg!(Hide);

    /// A [Message] sent when stax is shutting down or restarting.
    pub struct ShutDown;
    msg!(ShutDown);
}
