//! Data types for working with X window properties
use crate::{pure::geometry::{Point, Rect}, Error, Result, Xid};
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Known property types that should be returnable by [XConn][crate::x::XConn] impls when they
/// check window properties.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Prop {
    /// One or more X Atoms, given as their string names
    Atom(Vec<String>),
    /// Raw bytes for when the prop type is non-standard
    Bytes(Vec<u32>),
    /// One or more cardinal numbers
    Cardinal(Vec<u32>),
    /// UTF-8 encoded string data
    UTF8String(Vec<String>),
    /// One or more X window IDs
    Window(Vec<Xid>),
    /// The WM_HINTS property for this window
    WmHints(WmHints),
    /// The WM_NORMAL_HINTS property for this window
    WmNormalHints(WmNormalHints),
}

bitflags! {
    /// Possible flags that can be set in a WM_HINTS client property
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Default)]
    pub struct WmHintsFlags: u32 {
        /// Input hint is set
        const INPUT_HINT         = 0b0000000001;
        /// State hint is set
        const STATE_HINT         = 0b0000000010;
        /// Icon pixmap hint is set
        const ICON_PIXMAP_HINT   = 0b0000000100;
        /// Icon window hint is set
        const ICON_WINDOW_HINT   = 0b0000001000;
        /// Icon position hint is set
        const ICON_POSITION_HINT = 0b0000010000;
        /// Icon mask hint is set
        const ICON_MASK_HINT     = 0b0000100000;
        /// Window group hint is set
        const WINDOW_GROUP_HINT  = 0b0001000000;
        /// Urgency hint is set
        const URGENCY_HINT       = 0b0100000000;
    }
}

bitflags! {
    /// Possible flags that can be set in a WM_NORMAL_HINTS client property
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Default)]
    pub struct WmNormalHintsFlags: u32 {
        /// User-specified x, y
        const U_POSITION    = 0b0000000001;
        /// User-specified width, height
        const U_SIZE        = 0b0000000010;
        /// Program-specified position
        const P_POSITION    = 0b0000000100;
        /// Program-specified size
        const P_SIZE        = 0b0000001000;
        /// Program-specified minimum size
        const P_MIN_SIZE    = 0b0000010000;
        /// Program-specified maximum size
        const P_MAX_SIZE    = 0b0000100000;
        /// Program-specified resize increments
        const P_RESIZE_INC  = 0b0001000000;
        /// Program-specified min and max aspect ratios
        const P_ASPECT      = 0b0010000000;
        /// Program-specified base size
        const P_BASE_SIZE   = 0b0100000000;
        /// Program-specified window gravity
        const P_WIN_GRAVITY = 0b1000000000;
    }
}

/// Possible valid values for setting the `WM_STATE` property on a client.
///
/// See the [ICCCM docs][1] for more information.
///
/// [1]: https://tronche.com/gui/x/icccm/sec-4.html#s-4.1.3.1
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum WmState {
    /// Window is not visible
    Withdrawn = 0,
    /// Window is visible
    Normal = 1,
    /// Window is iconified
    Iconic = 3,
}

impl From<WmState> for u32 {
    fn from(s: WmState) -> Self {
        s as u32
    }
}

impl TryFrom<u32> for WmState {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self> {
        match raw {
            0 => Ok(Self::Withdrawn),
            1 => Ok(Self::Normal),
            3 => Ok(Self::Iconic),
            _ => Err(Error::InvalidHints(format!("invalid WM_STATE value: {raw}"))),
        }
    }
}

/// The mapping states a window can be in
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum MapState {
    /// The window is unmapped
    Unmapped,
    /// The window is never viewable
    UnViewable,
    /// The window is currently viewable
    Viewable,
}

/// The input class for a window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum WindowClass {
    /// Class is copied from parent window
    CopyFromParent,
    /// Window can be displayed
    InputOutput,
    /// Window can only be used for queries
    InputOnly,
}

/// Client requested hints about information other than window geometry.
///
/// See the ICCCM [spec][1] for further details.
///
/// [1]: https://www.x.org/releases/X11R7.6/doc/xorg-docs/specs/ICCCM/icccm.html#wm_hints_property
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct WmHints {
    pub(crate) flags: WmHintsFlags,
    pub(crate) accepts_input: bool,
    pub(crate) initial_state: WmState,
    pub(crate) icon_pixmap: u32,
    pub(crate) icon_win: Xid,
    pub(crate) icon_position: Point,
    pub(crate) icon_mask: u32,
    pub(crate) window_group: u32,
}

impl WmHints {
    /// Create a new instance from component parts
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flags: WmHintsFlags,
        accepts_input: bool,
        initial_state: WmState,
        icon_pixmap: u32,
        icon_win: Xid,
        icon_position: Point,
        icon_mask: u32,
        window_group: u32,
    ) -> Self {
        Self {
            flags,
            accepts_input,
            initial_state,
            icon_pixmap,
            icon_win,
            icon_position,
            icon_mask,
            window_group,
        }
    }

    /// Whether or not this client has indicated that it accepts keyboard input focus.
    pub fn accepts_input(&self) -> bool {
        self.accepts_input
    }

    /// Try to construct a [WmHints] instance from raw bytes.
    ///
    /// This method expects a slice of 9 u32s corresponding to the C struct layout shown below.
    ///
    /// ```C
    /// typedef struct {
    ///     long flags;          /* marks which fields in this structure are defined */
    ///     Bool input;          /* does this application rely on the window manager to
    ///                             get keyboard input? */
    ///     int initial_state;   /* see below */
    ///     Pixmap icon_pixmap;  /* pixmap to be used as icon */
    ///     Window icon_window;  /* window to be used as icon */
    ///     int icon_x, icon_y;  /* initial position of icon */
    ///     Pixmap icon_mask;    /* pixmap to be used as mask for icon_pixmap */
    ///     XID window_group;    /* id of related window group */
    /// } XWMHints;
    /// ```
    pub fn try_from_bytes(raw: &[u32]) -> Result<Self> {
        if raw.len() != 9 {
            return Err(Error::InvalidHints(format!(
                "raw bytes should be [u32; 9] for WmHints, got [u32; {}]",
                raw.len()
            )));
        }

        let flags = WmHintsFlags::from_bits_truncate(raw[0]);
        let accepts_input = !flags.contains(WmHintsFlags::INPUT_HINT) || raw[1] > 0;
        let initial_state = match (flags.contains(WmHintsFlags::STATE_HINT), raw[2]) {
            (true, 0) => WmState::Withdrawn,
            (true, 1) | (false, _) => WmState::Normal,
            (true, 2) | (true, 3) => WmState::Iconic,
            _ => {
                return Err(Error::InvalidHints(format!(
                    "initial state flag should be 0, 1, 2: got {}",
                    raw[2]
                )))
            }
        };

        Ok(Self {
            flags,
            accepts_input,
            initial_state,
            icon_pixmap: raw[3],
            icon_win: Xid(raw[4]),
            icon_position: Point::new(raw[5], raw[6]),
            icon_mask: raw[7],
            window_group: raw[8],
        })
    }
}

/// Client requested hints about window geometry.
///
/// See the ICCCM [spec][1] for further details or the [Xlib manual][2] for more details of the
/// data format. Window gravity is parsed but not currently honoured when applying hints to a
/// requested [Rect]: all positioning from stax is top left relative already.
///
/// [1]: https://www.x.org/releases/X11R7.6/doc/xorg-docs/specs/ICCCM/icccm.html#wm_normal_hints_property
/// [2]: https://tronche.com/gui/x/xlib/ICC/client-to-window-manager/wm-normal-hints.html
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct WmNormalHints {
    pub(crate) flags: WmNormalHintsFlags,
    pub(crate) min: Option<(u32, u32)>,
    pub(crate) max: Option<(u32, u32)>,
    pub(crate) base: Option<(u32, u32)>,
    pub(crate) resize_inc: Option<(u32, u32)>,
    pub(crate) aspect: Option<((u32, u32), (u32, u32))>,
}

impl WmNormalHints {
    /// Create a new instance from component parts
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flags: WmNormalHintsFlags,
        min: Option<(u32, u32)>,
        max: Option<(u32, u32)>,
        base: Option<(u32, u32)>,
        resize_inc: Option<(u32, u32)>,
        aspect: Option<((u32, u32), (u32, u32))>,
    ) -> Self {
        Self {
            flags,
            min,
            max,
            base,
            resize_inc,
            aspect,
        }
    }

    /// Try to construct a [WmNormalHints] instance from raw bytes.
    ///
    /// This method expects a slice of 18 u32s corresponding to the C struct layout shown below.
    ///
    /// ```C
    /// typedef struct {
    ///     long flags;
    ///     int x, y;                  /* obsolete */
    ///     int width, height;         /* obsolete */
    ///     int min_width, min_height;
    ///     int max_width, max_height;
    ///     int width_inc, height_inc;
    ///     struct { int x; int y; } min_aspect, max_aspect;
    ///     int base_width, base_height;
    ///     int win_gravity;
    /// } XSizeHints;
    /// ```
    pub fn try_from_bytes(raw: &[u32]) -> Result<Self> {
        if raw.len() != 18 {
            return Err(Error::InvalidHints(format!(
                "raw bytes should be [u32; 18] for WmNormalHints, got [u32; {}]",
                raw.len()
            )));
        }

        let flags = WmNormalHintsFlags::from_bits_truncate(raw[0]);

        let (min_w, min_h) = (raw[5], raw[6]);
        let (max_w, max_h) = (raw[7], raw[8]);
        let (inc_w, inc_h) = (raw[9], raw[10]);
        let (min_aspect_x, min_aspect_y) = (raw[11], raw[12]);
        let (max_aspect_x, max_aspect_y) = (raw[13], raw[14]);
        let (base_w, base_h) = (raw[15], raw[16]);

        let if_set = |w, h| if w > 0 && h > 0 { Some((w, h)) } else { None };

        Ok(Self {
            flags,
            min: if_set(min_w, min_h),
            max: if_set(max_w, max_h),
            base: if_set(base_w, base_h),
            resize_inc: if_set(inc_w, inc_h),
            aspect: if_set(min_aspect_x, min_aspect_y)
                .zip(if_set(max_aspect_x, max_aspect_y)),
        })
    }

    // ICCCM 4.1.2.3: aspect ratio is checked against (w - base_w, h - base_h) rather than the
    // raw requested size.
    fn clamp_aspect(&self, w: u32, h: u32) -> (u32, u32) {
        let ((min_x, min_y), (max_x, max_y)) = match self.aspect {
            Some(a) => a,
            None => return (w, h),
        };
        let (base_w, base_h) = self.base.unwrap_or((0, 0));
        let dw = w.saturating_sub(base_w).max(1) as f64;
        let dh = h.saturating_sub(base_h).max(1) as f64;
        let ratio = dw / dh;

        if ratio < min_x as f64 / min_y as f64 {
            (w, (dw * min_y as f64 / min_x as f64) as u32 + base_h)
        } else if ratio > max_x as f64 / max_y as f64 {
            ((dh * max_x as f64 / max_y as f64) as u32 + base_w, h)
        } else {
            (w, h)
        }
    }

    // ICCCM 4.1.2.3: size is rounded down to base + n * resize_inc along each axis.
    fn clamp_resize_inc(&self, w: u32, h: u32) -> (u32, u32) {
        let (inc_w, inc_h) = match self.resize_inc {
            Some(inc) => inc,
            None => return (w, h),
        };
        let (base_w, base_h) = self.base.unwrap_or((0, 0));

        let w = if inc_w > 0 && w > base_w {
            base_w + ((w - base_w) / inc_w) * inc_w
        } else {
            w
        };
        let h = if inc_h > 0 && h > base_h {
            base_h + ((h - base_h) / inc_h) * inc_h
        } else {
            h
        };

        (w, h)
    }

    /// Apply the full ICCCM `WM_NORMAL_HINTS` size constraints to the given [Rect], leaving its
    /// position untouched: clamp to the aspect ratio bounds, round to the nearest resize
    /// increment, then clamp to the min/max size, never shrinking below `1x1`.
    pub fn apply_to(&self, r: Rect) -> Rect {
        let (w, h) = self.clamp_aspect(r.w, r.h);
        let (mut w, mut h) = self.clamp_resize_inc(w, h);

        if let Some((max_w, max_h)) = self.max {
            if max_w > 0 {
                w = w.min(max_w);
            }
            if max_h > 0 {
                h = h.min(max_h);
            }
        }

        if let Some((min_w, min_h)) = self.min {
            w = w.max(min_w);
            h = h.max(min_h);
        }

        Rect {
            w: w.max(1),
            h: h.max(1),
            ..r
        }
    }

    /// `true` if this client has requested a fixed size window (`min == max`), per ICCCM
    /// 4.1.2.3: such clients should be floated rather than tiled (spec §4.4 `manage`).
    pub fn is_fixed_size(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min == max)
    }
}

/// Window attributes honoured when deciding whether or not to manage a newly mapped window.
///
/// Only a small subset of window attributes are checked and honoured. This list may be
/// extended in future.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct WindowAttributes {
    /// Whether the client has requested to manage its own stacking and geometry.
    pub override_redirect: bool,
    /// The current map state for this client.
    pub map_state: MapState,
    /// The input class for this client.
    pub window_class: WindowClass,
}

impl WindowAttributes {
    /// Create a new instance from component parts
    pub fn new(override_redirect: bool, map_state: MapState, window_class: WindowClass) -> Self {
        Self {
            override_redirect,
            map_state,
            window_class,
        }
    }
}
