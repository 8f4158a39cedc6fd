//! Setting up and responding to user defined key/mouse bindings
use crate::{
    core::{State, WindowManager, Xid},
    pure::geometry::Point,
    x::XConn,
    Result,
};
#[cfg(feature = "keysyms")]
use stax_keysyms::XKeySym;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, convert::TryFrom};
use strum::EnumIter;

/// Mapping of raw string key binding (e.g. "M-j") to the X key code it was bound to at grab time.
pub type CodeMap = HashMap<String, u8>;

/// Something that can be run in response to a [KeyPress] being received.
pub trait KeyEventHandler<X>
where
    X: XConn,
{
    /// Run this handler, modifying [State] and/or driving the connection as required.
    fn call(&mut self, state: &mut State<X>, x: &X) -> Result<()>;
}

impl<X, F> KeyEventHandler<X> for F
where
    X: XConn,
    F: FnMut(&mut State<X>, &X) -> Result<()>,
{
    fn call(&mut self, state: &mut State<X>, x: &X) -> Result<()> {
        (self)(state, x)
    }
}

/// Something that can be run in response to a [MouseEvent] being received.
pub trait MouseEventHandler<X>
where
    X: XConn,
{
    /// Run this handler, modifying [State] and/or driving the connection as required.
    fn call(&mut self, event: &MouseEvent, state: &mut State<X>, x: &X) -> Result<()>;
}

impl<X, F> MouseEventHandler<X> for F
where
    X: XConn,
    F: FnMut(&MouseEvent, &mut State<X>, &X) -> Result<()>,
{
    fn call(&mut self, event: &MouseEvent, state: &mut State<X>, x: &X) -> Result<()> {
        (self)(event, state, x)
    }
}

/// User defined key bindings, keyed by the raw [KeyCode] they were grabbed under.
pub type KeyBindings<X> = HashMap<KeyCode, Box<dyn KeyEventHandler<X>>>;

/// User defined mouse bindings, keyed by the kind of event and the button / modifier state
/// that should trigger them.
pub type MouseBindings<X> = HashMap<(MouseEventKind, MouseState), Box<dyn MouseEventHandler<X>>>;

/// Abstraction layer for working with key presses that have already been resolved from an
/// X key code using the current keyboard mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    /// A raw character key
    Utf8(String),
    /// Return / enter key
    Return,
    /// Escape
    Escape,
    /// Tab
    Tab,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// PageUp
    PageUp,
    /// PageDown
    PageDown,
    /// Up
    Up,
    /// Down
    Down,
    /// Left
    Left,
    /// Right
    Right,
}

#[cfg(feature = "keysyms")]
impl TryFrom<XKeySym> for KeyPress {
    type Error = std::string::FromUtf8Error;

    fn try_from(s: XKeySym) -> std::result::Result<KeyPress, Self::Error> {
        Ok(match s {
            XKeySym::XK_Return | XKeySym::XK_KP_Enter | XKeySym::XK_ISO_Enter => KeyPress::Return,
            XKeySym::XK_Escape => KeyPress::Escape,
            XKeySym::XK_Tab | XKeySym::XK_ISO_Left_Tab | XKeySym::XK_KP_Tab => KeyPress::Tab,
            XKeySym::XK_BackSpace => KeyPress::Backspace,
            XKeySym::XK_Delete | XKeySym::XK_KP_Delete => KeyPress::Delete,
            XKeySym::XK_Page_Up | XKeySym::XK_KP_Page_Up => KeyPress::PageUp,
            XKeySym::XK_Page_Down | XKeySym::XK_KP_Page_Down => KeyPress::PageDown,
            XKeySym::XK_Up | XKeySym::XK_KP_Up => KeyPress::Up,
            XKeySym::XK_Down | XKeySym::XK_KP_Down => KeyPress::Down,
            XKeySym::XK_Left | XKeySym::XK_KP_Left => KeyPress::Left,
            XKeySym::XK_Right | XKeySym::XK_KP_Right => KeyPress::Right,
            s => KeyPress::Utf8(s.as_utf8_string()?),
        })
    }
}

/// A u16 X key-code bitmask covering the modifiers held when a key was pressed.
pub type KeyCodeMask = u16;

/// A u8 X key-code enum value identifying the physical key that was pressed.
pub type KeyCodeValue = u8;

/// A key press and held modifiers, resolved to the raw values reported by the X server.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyCode {
    /// The held modifier mask
    pub mask: KeyCodeMask,
    /// The key code that was held
    pub code: KeyCodeValue,
}

impl KeyCode {
    /// Create a new [KeyCode] from this one that removes the given mask.
    ///
    /// Used to generate the additional grabs required so that a binding still fires when
    /// NumLock or CapsLock happen to be held (see [clean_mask][super::bindings::clean_mask]).
    pub fn ignoring_modifier(&self, mask: KeyCodeMask) -> KeyCode {
        KeyCode {
            mask: self.mask & !mask,
            code: self.code,
        }
    }
}

/// Known mouse buttons for binding actions
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MouseButton {
    /// 1
    Left,
    /// 2
    Middle,
    /// 3
    Right,
    /// 4
    ScrollUp,
    /// 5
    ScrollDown,
}

impl From<MouseButton> for u8 {
    fn from(b: MouseButton) -> u8 {
        match b {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::ScrollUp => 4,
            MouseButton::ScrollDown => 5,
        }
    }
}

/// Known modifier keys for bindings
#[derive(Debug, EnumIter, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ModifierKey {
    /// Control
    Ctrl,
    /// Alt
    Alt,
    /// Shift
    Shift,
    /// Meta / super / windows
    Meta,
}

impl TryFrom<&str> for ModifierKey {
    type Error = String;

    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        match s {
            "C" => Ok(Self::Ctrl),
            "A" => Ok(Self::Alt),
            "S" => Ok(Self::Shift),
            "M" => Ok(Self::Meta),
            _ => Err(format!("unknown modifier key: {s}")),
        }
    }
}

/// A mouse state specification indicating the button and modifiers held
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MouseState {
    /// The [MouseButton] being held
    pub button: MouseButton,
    /// All [ModifierKey]s being held
    pub modifiers: Vec<ModifierKey>,
}

impl MouseState {
    /// Construct a new MouseState
    pub fn new(button: MouseButton, mut modifiers: Vec<ModifierKey>) -> Self {
        modifiers.sort();
        Self { button, modifiers }
    }
}

/// The types of mouse events represented by a [MouseEvent]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MouseEventKind {
    /// A button was pressed
    Press,
    /// A button was released
    Release,
    /// The mouse was moved while a button was held
    Motion,
}

/// A mouse movement or button event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MouseEvent {
    /// The ID of the window that contained the click
    pub id: Xid,
    /// Absolute coordinate of the event
    pub rpt: Point,
    /// Coordinate of the event relative to top-left of the window itself
    pub wpt: Point,
    /// The modifier and button code that was received
    pub state: MouseState,
    /// Was this press, release or motion?
    pub kind: MouseEventKind,
}

impl MouseEvent {
    /// Construct a new [MouseEvent] from raw data
    pub fn new(
        id: Xid,
        rx: i16,
        ry: i16,
        ex: i16,
        ey: i16,
        state: MouseState,
        kind: MouseEventKind,
    ) -> Self {
        MouseEvent {
            id,
            rpt: Point::new(rx as u32, ry as u32),
            wpt: Point::new(ex as u32, ey as u32),
            state,
            kind,
        }
    }
}

/// The modifier masks that should be ignored when grabbing / matching key bindings: NumLock
/// and CapsLock both vary by machine and should never prevent a binding from firing.
///
/// Each binding is grabbed once per combination of these "clean modifiers" being held, and
/// matching is always performed after stripping them from the mask reported by the server
/// (see [KeyCode::ignoring_modifier]).
pub fn clean_mask(numlock_mask: KeyCodeMask) -> KeyCodeMask {
    numlock_mask | LOCK_MASK
}

const LOCK_MASK: KeyCodeMask = 2; // XCB_MOD_MASK_LOCK (CapsLock)

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignoring_modifier_clears_only_the_requested_bits() {
        let k = KeyCode { mask: 0b1111, code: 38 };
        let cleared = k.ignoring_modifier(0b0101);

        assert_eq!(cleared.mask, 0b1010);
        assert_eq!(cleared.code, 38);
    }

    #[test]
    fn modifier_key_from_str_rejects_unknown_tokens() {
        assert_eq!(ModifierKey::try_from("M"), Ok(ModifierKey::Meta));
        assert!(ModifierKey::try_from("X").is_err());
    }
}
