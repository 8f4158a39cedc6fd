//! stax: a modern, tiling window manager library for X11.
//!
//! stax's core is split into three layers:
//!
//! - [pure] holds the side effect free [StackSet][pure::StackSet] model of window manager state
//!   along with the layout engine's geometry helpers.
//! - [core] wires that pure state up to a running X server connection: [State][core::State] and
//!   [WindowManager][core::WindowManager], key/mouse bindings, hooks and the layout engine itself.
//! - [x] defines the [XConn][x::XConn] trait that any X server backend needs to implement along
//!   with the atoms, properties and events that flow across it.
//!
//! [builtin] provides a minimal but usable set of layouts, messages and key binding actions built
//! entirely on the public APIs of the above so that you have somewhere to start from.
#![warn(missing_docs)]
#![allow(clippy::too_many_arguments)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::convert::{TryFrom, TryInto};

pub mod builtin;
pub mod core;
pub mod pure;
pub mod util;
pub mod x;

mod error;

#[doc(inline)]
pub use crate::core::Xid;
pub use error::{Error, Result};

/// Create a [`std::collections::HashMap`] literal.
///
/// ```
/// # use stax::map;
/// let m = map! {
///     1 => "one",
///     2 => "two",
/// };
/// assert_eq!(m.get(&1), Some(&"one"));
/// ```
#[macro_export]
macro_rules! map {
    {} => { ::std::collections::HashMap::new() };

    { $($key:expr => $value:expr),+, } => {
        {
            let mut _map = ::std::collections::HashMap::new();
            $(_map.insert($key, $value);)+
            _map
        }
    };
}

/// Pop the first element of `$self.$lst` matching `$pred`, leaving the remaining elements in
/// their original relative order.
///
/// `$lst` must be a [`std::collections::LinkedList`] field on `$self`: this is a macro rather
/// than a method as `LinkedList` has no stable API for removing an element from the middle of
/// the list without reallocating the whole thing.
#[macro_export]
macro_rules! pop_where {
    ($self:ident, $lst:ident, $($pred:tt)+) => {{
        let placeholder = take(&mut $self.$lst);

        let mut remaining = ::std::collections::LinkedList::default();
        let mut popped = None;
        let pred = $($pred)+;

        for item in placeholder.into_iter() {
            if pred(&item) {
                popped = Some(item);
            } else {
                remaining.push_back(item);
            }
        }

        swap(&mut $self.$lst, &mut remaining);

        popped
    }};
}

/// A simple RGBA color, used for setting window border colors.
///
/// Colors can be parsed from `#rrggbb` or `#rrggbbaa` hex strings:
/// ```
/// # use std::convert::TryFrom;
/// # use stax::Color;
/// let c = Color::try_from("#ff000080").unwrap();
/// assert_eq!(c.rgb_u32(), 0xff0000);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

macro_rules! f2u {
    ($f:expr, $s:expr) => {
        (($f * 255.0) as u32) << $s
    };
}

impl Color {
    /// Create a new [Color] from a hex encoded u32: `0xRRGGBB` or `0xRRGGBBAA`.
    pub fn new_from_hex(hex: u32) -> Self {
        let bytes = hex.to_be_bytes();
        let [r, g, b, a] = bytes.map(|n| n as f64 / 255.0);

        Self { r, g, b, a }
    }

    /// The RGB components of this color as 0.0-1.0 range floats.
    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    /// The RGBA components of this color as 0.0-1.0 range floats.
    pub fn rgba(&self) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, self.a)
    }

    /// Render this color as a `#rrggbb` hex string.
    pub fn as_rgb_hex_string(&self) -> String {
        format!("#{:06x}", self.rgb_u32())
    }

    /// `0xRRGGBB` representation of this [Color] (no alpha information).
    pub fn rgb_u32(&self) -> u32 {
        f2u!(self.r, 16) + f2u!(self.g, 8) + f2u!(self.b, 0)
    }

    /// `0xRRGGBBAA` representation of this [Color].
    pub fn rgba_u32(&self) -> u32 {
        f2u!(self.r, 24) + f2u!(self.g, 16) + f2u!(self.b, 8) + f2u!(self.a, 0)
    }

    /// `0xAARRGGBB` representation of this [Color], the pixel format X11 expects for a
    /// window border color.
    pub fn argb_u32(&self) -> u32 {
        f2u!(self.a, 24) + f2u!(self.r, 16) + f2u!(self.g, 8) + f2u!(self.b, 0)
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::new_from_hex(hex)
    }
}

impl From<(f64, f64, f64)> for Color {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl From<(f64, f64, f64, f64)> for Color {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        Self { r, g, b, a }
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.as_str().try_into()
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        let stripped = s.strip_prefix('#').unwrap_or(s);
        let hex = u32::from_str_radix(stripped, 16)?;

        match s.len() {
            7 => Ok(Self::new_from_hex((hex << 8) + 0xFF)),
            9 => Ok(Self::new_from_hex(hex)),
            _ => Err(Error::InvalidHexColor(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case("#ff0000", 0xff0000; "rgb red")]
    #[test_case("#00ff00", 0x00ff00; "rgb green")]
    #[test_case("#0000ffcc", 0x0000ff; "rgba ignores alpha for rgb_u32")]
    #[test]
    fn color_parses_hex_strings(s: &str, expected: u32) {
        let c = Color::try_from(s).unwrap();
        assert_eq!(c.rgb_u32(), expected);
    }

    #[test]
    fn invalid_hex_color_is_an_error() {
        assert!(Color::try_from("not-a-color").is_err());
        assert!(Color::try_from("#fff").is_err());
    }
}
