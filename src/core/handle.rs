//! XEvent handlers for use in the main event loop;
use crate::{
    core::{
        bindings::{KeyBindings, KeyCode, MouseBindings, MouseEvent, MouseEventKind},
        State, Xid,
    },
    pure::geometry::Point,
    x::{
        atom::Atom,
        event::{ClientMessage, ClientMessageKind, ConfigureEvent, PointerChange},
        property::{Prop, WmHints},
        ClientConfig, XConn, XConnExt,
    },
    Result,
};
use tracing::{error, info, trace};

// STAX_RESTART is the only client message handled by default: everything else is broadcast to
// any event_hook the user has configured (see core::mod::handle_xevent) and otherwise ignored
// (see the ewmh extension for some examples of messages that are handled when that is enabled).
pub(crate) fn client_message<X: XConn>(
    msg: ClientMessage,
    state: &mut State<X>,
    x: &X,
) -> Result<()> {
    let data = &msg.data;
    trace!(id = msg.id.0, dtype = ?msg.dtype, ?data, "got client message");

    if msg.dtype == Atom::StaxRestart.as_ref() {
        info!(id = msg.id.0, "restart requested, shutting down");
        x.modify_and_refresh(state, |cs| {
            for ws in cs.workspaces_mut() {
                ws.broadcast_message(crate::builtin::layout::messages::control::ShutDown);
            }
        })?;
        state.request_restart();
    }

    Ok(())
}

pub(crate) fn mapping_notify<X: XConn>(
    key_bindings: &KeyBindings<X>,
    mouse_bindings: &MouseBindings<X>,
    x: &X,
) -> Result<()> {
    trace!("grabbing key and mouse bindings");
    let key_codes: Vec<_> = key_bindings.keys().copied().collect();
    let mouse_states: Vec<_> = mouse_bindings
        .keys()
        .map(|(_, state)| state.clone())
        .collect();

    x.grab(&key_codes, &mouse_states)
}

pub(crate) fn keypress<X: XConn>(
    key: KeyCode,
    bindings: &mut KeyBindings<X>,
    state: &mut State<X>,
    x: &X,
) -> Result<()> {
    if let Some(action) = bindings.get_mut(&key) {
        trace!(?key, "running user keybinding");
        if let Err(error) = action.call(state, x) {
            error!(%error, ?key, "error running user keybinding");
            return Err(error);
        }
    }

    Ok(())
}

// A drag in progress takes priority over bound actions for Motion and Release: once a drag
// has been started (typically from a bound Press action) the button held to drive it is no
// longer looked up against the binding table until it is released.
pub(crate) fn mouse_event<X: XConn>(
    e: MouseEvent,
    bindings: &mut MouseBindings<X>,
    state: &mut State<X>,
    x: &X,
) -> Result<()> {
    match e.kind {
        MouseEventKind::Motion if state.is_dragging() => {
            let (mut motion, cleanup) = state.dragging.take().expect("checked is_dragging");
            motion(state, x, e.rpt);
            state.dragging = Some((motion, cleanup));
            return Ok(());
        }

        MouseEventKind::Release if state.is_dragging() => {
            let (_, mut cleanup) = state.dragging.take().expect("checked is_dragging");
            cleanup(state, x);
            return Ok(());
        }

        _ => (),
    }

    if let Some(action) = bindings.get_mut(&(e.kind, e.state.clone())) {
        if let Err(error) = action.call(&e, state, x) {
            error!(%error, ?e, "error running user mouse binding");
            return Err(error);
        }
    }

    Ok(())
}

pub(crate) fn configure_request<X: XConn>(
    ConfigureEvent { id, r, .. }: &ConfigureEvent,
    state: &mut State<X>,
    x: &X,
) -> Result<()> {
    if state.client_set.contains(id) && !state.client_set.floating.contains_key(id) {
        // Managed tiled clients aren't allowed to configure themselves, but ICCCM still
        // requires that they be told their actual (unchanged) geometry so they don't hang
        // waiting for a ConfigureNotify that would otherwise never come.
        let current = x.client_geometry(*id)?;
        return x.send_configure_notify(*id, current);
    }

    x.set_client_config(*id, &[ClientConfig::Position(*r)])
}

pub(crate) fn map_request<X: XConn>(client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
    trace!(?client, "handling new map request");
    let attrs = x.get_window_attributes(client)?;

    if !state.client_set.contains(&client) && !attrs.override_redirect {
        trace!(?client, "managing client");
        x.manage(client, state)?;
    }

    Ok(())
}

pub(crate) fn destroy<X: XConn>(client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
    trace!(?client, "destroying client");
    x.unmanage(client, state)?;
    state.mapped.remove(&client);
    state.pending_unmap.remove(&client);

    Ok(())
}

// Expected unmap events are tracked in pending_unmap. We ignore expected unmaps.
pub(crate) fn unmap_notify<X: XConn>(client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
    let expected = *state.pending_unmap.get(&client).unwrap_or(&0);

    if expected == 0 {
        x.unmanage(client, state)?;
    } else if expected == 1 {
        state.pending_unmap.remove(&client);
    } else {
        state
            .pending_unmap
            .entry(client)
            .and_modify(|count| *count -= 1);
    }

    Ok(())
}

pub(crate) fn focus_in<X: XConn>(client: Xid, state: &mut State<X>, x: &X) -> Result<()> {
    let accepts_focus = match x.get_prop(client, Atom::WmHints.as_ref()) {
        Ok(Some(Prop::WmHints(WmHints { accepts_input, .. }))) => accepts_input,
        _ => true,
    };

    if accepts_focus {
        x.focus(client)?;
        x.set_prop(
            x.root(),
            Atom::NetActiveWindow.as_ref(),
            Prop::Window(vec![client]),
        )?;
        x.set_active_client(client, state)?;
    } else {
        let msg = ClientMessageKind::TakeFocus(client).as_message(x)?;
        x.send_client_message(msg)?;
    }

    Ok(())
}

pub(crate) fn enter<X: XConn>(p: PointerChange, state: &mut State<X>, x: &X) -> Result<()> {
    if state.config.focus_follow_mouse {
        x.modify_and_refresh(state, |cs| {
            cs.focus_client(&p.id);
        })
    } else {
        Ok(())
    }
}

pub(crate) fn leave<X: XConn>(p: PointerChange, state: &mut State<X>, x: &X) -> Result<()> {
    if p.id == state.root() && !p.same_screen {
        x.focus(p.id)?;
        set_screen_from_point(p.abs, state, x)?;
    }

    Ok(())
}

pub(crate) fn detect_screens<X: XConn>(state: &mut State<X>, x: &X) -> Result<()> {
    info!("re-detecting screens");
    let rects = x.screen_details()?;
    info!(?rects, "found screens");

    state.client_set.update_screens(rects)
}

pub(crate) fn screen_change<X: XConn>(state: &mut State<X>, x: &X) -> Result<()> {
    trace!("screen changed");
    set_screen_from_point(x.cursor_position()?, state, x)
}

fn set_screen_from_point<X: XConn>(p: Point, state: &mut State<X>, x: &X) -> Result<()> {
    x.modify_and_refresh(state, |cs| {
        let index = cs
            .screens()
            .find(|s| s.r.contains_point(p))
            .map(|s| s.index());

        if let Some(index) = index {
            cs.focus_screen(index);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pure::geometry::Rect, x::mock::MockXConn};
    use std::cell::RefCell;

    #[derive(Default)]
    struct NotifyingXConn {
        geometry: Rect,
        notified: RefCell<Option<(Xid, Rect)>>,
    }

    impl MockXConn for NotifyingXConn {
        fn mock_client_geometry(&self, _client: Xid) -> Result<Rect> {
            Ok(self.geometry)
        }

        fn mock_set_client_config(&self, _client: Xid, _data: &[ClientConfig]) -> Result<()> {
            Ok(())
        }

        fn mock_send_configure_notify(&self, client: Xid, r: Rect) -> Result<()> {
            *self.notified.borrow_mut() = Some((client, r));
            Ok(())
        }
    }

    #[test]
    fn tiled_clients_get_a_synthetic_notify_instead_of_being_moved() {
        let current = Rect::new(0, 0, 800, 600);
        let conn = NotifyingXConn {
            geometry: current,
            ..Default::default()
        };
        let mut state = State::try_new(Default::default(), &conn).expect("test state");
        state.client_set.insert(Xid(1));

        let e = ConfigureEvent {
            id: Xid(1),
            r: Rect::new(10, 10, 400, 400),
            is_root: false,
        };

        configure_request(&e, &mut state, &conn).expect("handled");

        assert_eq!(
            *conn.notified.borrow(),
            Some((Xid(1), current)),
            "tiled client is echoed its real, unchanged geometry"
        );
    }

    #[test]
    fn floating_clients_are_reconfigured_directly() {
        let conn = NotifyingXConn::default();
        let mut state = State::try_new(Default::default(), &conn).expect("test state");
        state.client_set.insert(Xid(1));
        state.client_set.float_unchecked(Xid(1), Rect::new(0, 0, 400, 400));

        let requested = Rect::new(10, 10, 400, 400);
        let e = ConfigureEvent {
            id: Xid(1),
            r: requested,
            is_root: false,
        };

        configure_request(&e, &mut state, &conn).expect("handled");

        assert!(
            conn.notified.borrow().is_none(),
            "floating client is configured directly, not sent a synthetic notify"
        );
    }
}
