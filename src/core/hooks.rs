//! User supplied hooks for extending window manager behaviour at the points where pure state
//! changes are turned into (or triggered by) side effects against the X server.
//!
//! Each hook type is stored as a single optional `Box<dyn _>` on [Config][crate::core::Config].
//! Setting a hook directly overwrites whatever was there before; the `compose_or_set_*` methods
//! on [Config][crate::core::Config] are the usual way to attach a hook without clobbering one a
//! user has already set, chaining the new hook in front of the existing one.
use crate::{
    core::State,
    pure::geometry::Rect,
    x::{XConn, XEvent},
    Result, Xid,
};

/// Something that can be run against [State] and the active [XConn] with no further input.
///
/// Used for [Config::startup_hook][crate::core::Config::startup_hook] (run once before the main
/// event loop starts) and [Config::refresh_hook][crate::core::Config::refresh_hook] (run at the
/// end of every [modify_and_refresh][crate::x::XConnExt::modify_and_refresh] call).
pub trait StateHook<X>
where
    X: XConn,
{
    /// Run this hook, modifying [State] and/or driving the connection as required.
    fn call(&mut self, state: &mut State<X>, x: &X) -> Result<()>;

    /// Box this hook up for storing on [Config][crate::core::Config].
    fn boxed(self) -> Box<dyn StateHook<X>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Chain this hook so that it runs before `next`.
    fn then_boxed(self, next: Box<dyn StateHook<X>>) -> Box<dyn StateHook<X>>
    where
        Self: Sized + 'static,
        X: 'static,
    {
        Box::new(ComposedStateHook {
            first: Box::new(self),
            second: next,
        })
    }
}

impl<X, F> StateHook<X> for F
where
    X: XConn,
    F: FnMut(&mut State<X>, &X) -> Result<()>,
{
    fn call(&mut self, state: &mut State<X>, x: &X) -> Result<()> {
        (self)(state, x)
    }
}

struct ComposedStateHook<X: XConn> {
    first: Box<dyn StateHook<X>>,
    second: Box<dyn StateHook<X>>,
}

impl<X: XConn> StateHook<X> for ComposedStateHook<X> {
    fn call(&mut self, state: &mut State<X>, x: &X) -> Result<()> {
        self.first.call(state, x)?;
        self.second.call(state, x)
    }
}

/// Something that can be run in response to every [XEvent] received from the X server, before
/// the window manager's default handling for that event runs.
///
/// Returning `Ok(false)` skips the window manager's default handling for the event entirely:
/// use this when you want to fully take over handling a particular event.
pub trait EventHook<X>
where
    X: XConn,
{
    /// Run this hook, returning whether or not default event handling should still proceed.
    fn call(&mut self, event: &XEvent, state: &mut State<X>, x: &X) -> Result<bool>;

    /// Box this hook up for storing on [Config][crate::core::Config].
    fn boxed(self) -> Box<dyn EventHook<X>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Chain this hook so that it runs before `next`. Default handling only proceeds if both
    /// hooks agree that it should.
    fn then_boxed(self, next: Box<dyn EventHook<X>>) -> Box<dyn EventHook<X>>
    where
        Self: Sized + 'static,
        X: 'static,
    {
        Box::new(ComposedEventHook {
            first: Box::new(self),
            second: next,
        })
    }
}

impl<X, F> EventHook<X> for F
where
    X: XConn,
    F: FnMut(&XEvent, &mut State<X>, &X) -> Result<bool>,
{
    fn call(&mut self, event: &XEvent, state: &mut State<X>, x: &X) -> Result<bool> {
        (self)(event, state, x)
    }
}

struct ComposedEventHook<X: XConn> {
    first: Box<dyn EventHook<X>>,
    second: Box<dyn EventHook<X>>,
}

impl<X: XConn> EventHook<X> for ComposedEventHook<X> {
    fn call(&mut self, event: &XEvent, state: &mut State<X>, x: &X) -> Result<bool> {
        let r1 = self.first.call(event, state, x)?;
        let r2 = self.second.call(event, state, x)?;

        Ok(r1 && r2)
    }
}

/// Something that is run against a newly managed client before the initial refresh that maps
/// it to the screen.
///
/// See [manage_without_refresh][crate::x::manage_without_refresh] for where this is invoked:
/// by the time this hook runs the client has already been inserted into the [ClientSet][crate::core::ClientSet]
/// (and assigned floating status if applicable) but nothing has been sent to the X server yet.
pub trait ManageHook<X>
where
    X: XConn,
{
    /// Run this hook against the newly managed client.
    fn call(&mut self, id: Xid, state: &mut State<X>, x: &X) -> Result<()>;

    /// Box this hook up for storing on [Config][crate::core::Config].
    fn boxed(self) -> Box<dyn ManageHook<X>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Chain this hook so that it runs before `next`.
    fn then_boxed(self, next: Box<dyn ManageHook<X>>) -> Box<dyn ManageHook<X>>
    where
        Self: Sized + 'static,
        X: 'static,
    {
        Box::new(ComposedManageHook {
            first: Box::new(self),
            second: next,
        })
    }
}

impl<X, F> ManageHook<X> for F
where
    X: XConn,
    F: FnMut(Xid, &mut State<X>, &X) -> Result<()>,
{
    fn call(&mut self, id: Xid, state: &mut State<X>, x: &X) -> Result<()> {
        (self)(id, state, x)
    }
}

struct ComposedManageHook<X: XConn> {
    first: Box<dyn ManageHook<X>>,
    second: Box<dyn ManageHook<X>>,
}

impl<X: XConn> ManageHook<X> for ComposedManageHook<X> {
    fn call(&mut self, id: Xid, state: &mut State<X>, x: &X) -> Result<()> {
        self.first.call(id, state, x)?;
        self.second.call(id, state, x)
    }
}

/// Something that adjusts the screen [Rect] and/or resulting client positions produced by the
/// layout engine before they are applied.
///
/// See [builtin::hooks::SpacingHook][crate::builtin::hooks::SpacingHook] for the built-in gaps
/// implementation of this trait.
pub trait LayoutHook<X>
where
    X: XConn,
{
    /// Adjust the available screen space before the layout is run against it.
    fn transform_initial(&mut self, r: Rect, state: &State<X>, x: &X) -> Rect;

    /// Adjust the positions returned by the layout after it has been run.
    fn transform_positions(
        &mut self,
        r: Rect,
        positions: Vec<(Xid, Rect)>,
        state: &State<X>,
        x: &X,
    ) -> Vec<(Xid, Rect)>;

    /// Box this hook up for storing on [Config][crate::core::Config].
    fn boxed(self) -> Box<dyn LayoutHook<X>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Chain this hook so that it runs before `next`: `next` sees the screen space and
    /// positions as already adjusted by this hook.
    fn then_boxed(self, next: Box<dyn LayoutHook<X>>) -> Box<dyn LayoutHook<X>>
    where
        Self: Sized + 'static,
        X: 'static,
    {
        Box::new(ComposedLayoutHook {
            first: Box::new(self),
            second: next,
        })
    }
}

struct ComposedLayoutHook<X: XConn> {
    first: Box<dyn LayoutHook<X>>,
    second: Box<dyn LayoutHook<X>>,
}

impl<X: XConn> LayoutHook<X> for ComposedLayoutHook<X> {
    fn transform_initial(&mut self, r: Rect, state: &State<X>, x: &X) -> Rect {
        let r = self.first.transform_initial(r, state, x);
        self.second.transform_initial(r, state, x)
    }

    fn transform_positions(
        &mut self,
        r: Rect,
        positions: Vec<(Xid, Rect)>,
        state: &State<X>,
        x: &X,
    ) -> Vec<(Xid, Rect)> {
        let positions = self.first.transform_positions(r, positions, state, x);
        self.second.transform_positions(r, positions, state, x)
    }
}
