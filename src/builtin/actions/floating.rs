//! Actions for manipulating floating windows.
use crate::{
    builtin::actions::{key_handler, mouse_handler, modify_with},
    core::bindings::{KeyEventHandler, MouseEventHandler},
    x::{XConn, XConnExt},
};

/// Resize a currently floating window by a given (width, height) delta
///
/// Screen coordinates are 0-indexed from the top left corner of the sceen.
pub fn resize<X: XConn>(dw: i32, dh: i32) -> Box<dyn KeyEventHandler<X>> {
    modify_with(move |cs| {
        let id = match cs.current_client() {
            Some(&id) => id,
            None => return,
        };

        if let Some(r) = cs.floating.get_mut(&id) {
            r.apply_as_rect(&cs.screens.focus.r, |mut r| {
                r.resize(dw, dh);
                r
            });
        }
    })
}

/// Move a currently floating window by a given (x, y) delta
///
/// Screen coordinates are 0-indexed from the top left corner of the sceen.
pub fn reposition<X: XConn>(dx: i32, dy: i32) -> Box<dyn KeyEventHandler<X>> {
    modify_with(move |cs| {
        let id = match cs.current_client() {
            Some(&id) => id,
            None => return,
        };

        if let Some(r) = cs.floating.get_mut(&id) {
            r.apply_as_rect(&cs.screens.focus.r, |mut r| {
                r.reposition(dx, dy);
                r
            });
        }
    })
}

/// Move the currently focused windo to the floating layer in its current on screen position
pub fn float_focused<X: XConn>() -> Box<dyn KeyEventHandler<X>> {
    key_handler(|state, x: &X| {
        let id = match state.client_set.current_client() {
            Some(&id) => id,
            None => return Ok(()),
        };

        let r = x.client_geometry(id)?;

        x.modify_and_refresh(state, |cs| cs.float_unchecked(id, r))
    })
}

/// Sink the current window back into tiling mode if it was floating
pub fn sink_focused<X: XConn>() -> Box<dyn KeyEventHandler<X>> {
    modify_with(|cs| {
        let id = match cs.current_client() {
            Some(&id) => id,
            None => return,
        };

        cs.sink(&id);
    })
}

/// Float all windows in their current tiled position
pub fn float_all<X: XConn>() -> Box<dyn KeyEventHandler<X>> {
    key_handler(|state, x: &X| {
        let positions = state.visible_client_positions(x);

        x.modify_and_refresh(state, |cs| {
            for &(c, r) in positions.iter() {
                cs.float_unchecked(c, r);
            }
        })
    })
}

/// Sink all floating windows back into their tiled positions
pub fn sink_all<X: XConn>() -> Box<dyn KeyEventHandler<X>> {
    modify_with(|cs| cs.floating.clear())
}

/// Begin an interactive drag of the focused client, following the mouse until the button
/// used to start the drag is released.
///
/// Bind this to a `ButtonPress` mouse binding: the focused client is floated in its current
/// on screen position if it is not floating already, and tracks the pointer from then on.
pub fn mouse_move_window<X: XConn + 'static>() -> Box<dyn MouseEventHandler<X>> {
    mouse_handler(|e, state, x: &X| {
        let id = match state.client_set.current_client() {
            Some(&id) => id,
            None => return Ok(()),
        };

        if !state.client_set.floating.contains_key(&id) {
            let r = x.client_geometry(id)?;
            state.client_set.float_unchecked(id, r);
        }

        let mut last = e.rpt;

        state.start_drag(
            move |state, x, p| {
                let dx = p.x as i32 - last.x as i32;
                let dy = p.y as i32 - last.y as i32;
                last = p;

                let screen = state.client_set.current_screen().r;
                if let Some(r) = state.client_set.floating.get_mut(&id) {
                    r.apply_as_rect(&screen, |mut r| {
                        r.reposition(dx, dy);
                        r
                    });
                }

                let _ = x.modify_and_refresh(state, |_| ());
            },
            |_, _| (),
        );

        Ok(())
    })
}

/// Begin an interactive resize of the focused client, following the mouse until the button
/// used to start the drag is released.
///
/// Bind this to a `ButtonPress` mouse binding: the focused client is floated in its current
/// on screen position if it is not floating already, and is grown or shrunk to track the
/// pointer from then on.
pub fn mouse_resize_window<X: XConn + 'static>() -> Box<dyn MouseEventHandler<X>> {
    mouse_handler(|e, state, x: &X| {
        let id = match state.client_set.current_client() {
            Some(&id) => id,
            None => return Ok(()),
        };

        if !state.client_set.floating.contains_key(&id) {
            let r = x.client_geometry(id)?;
            state.client_set.float_unchecked(id, r);
        }

        let mut last = e.rpt;

        state.start_drag(
            move |state, x, p| {
                let dw = p.x as i32 - last.x as i32;
                let dh = p.y as i32 - last.y as i32;
                last = p;

                let screen = state.client_set.current_screen().r;
                if let Some(r) = state.client_set.floating.get_mut(&id) {
                    r.apply_as_rect(&screen, |mut r| {
                        r.resize(dw, dh);
                        r
                    });
                }

                let _ = x.modify_and_refresh(state, |_| ());
            },
            |_, _| (),
        );

        Ok(())
    })
}
