//! Core data structures and user facing functionality for the window manager
use crate::{
    pure::{geometry::{Point, Rect}, Diff, Snapshot, StackSet, Workspace},
    x::{XConn, XConnExt, XEvent},
    Color, Error, Result,
};
use anymap::{any::Any, AnyMap};
use nix::sys::signal::{signal, SigHandler, Signal};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{
    any::TypeId,
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt,
    ops::Deref,
    sync::Arc,
};
use tracing::{error, span, trace, Level};

pub mod bindings;
pub mod handle;
pub mod hooks;
pub mod layout;

use bindings::{KeyBindings, MouseBindings};
use hooks::{EventHook, LayoutHook, ManageHook, StateHook};
use layout::LayoutStack;

/// An X11 ID for a given resource
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

/// The pure client state information for the window manager
pub type ClientSet = StackSet<Xid>;

/// The pure client state information for a single [Workspace]
pub type ClientSpace = Workspace<Xid>;

/// The two callbacks that drive an in-progress interactive mouse drag: one invoked for every
/// `MotionNotify` while the drag is active, the other run once when the initiating button is
/// released.
///
/// Stored on [State] rather than passed around explicitly so that the event reducer can stay a
/// single dispatch point: see the `MotionNotify` / `ButtonRelease` rows of the event handling
/// table for how this is driven.
pub(crate) type Drag<X> = (
    Box<dyn FnMut(&mut State<X>, &X, Point)>,
    Box<dyn FnMut(&mut State<X>, &X)>,
);

/// Mutable internal state for the window manager
pub struct State<X>
where
    X: XConn,
{
    pub config: Config<X>,
    pub client_set: ClientSet,
    pub(crate) extensions: AnyMap,
    pub(crate) root: Xid,
    pub(crate) mapped: HashSet<Xid>,
    pub(crate) pending_unmap: HashMap<Xid, usize>,
    pub(crate) current_event: Option<XEvent>,
    pub(crate) diff: Diff<Xid>,
    pub(crate) dragging: Option<Drag<X>>,
    pub(crate) restarting: bool,
    /// Set to false by the `exit` built-in action to stop the main event loop.
    pub running: bool,
}

impl<X> fmt::Debug for State<X>
where
    X: XConn,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("config", &self.config)
            .field("client_set", &self.client_set)
            .field("root", &self.root)
            .field("mapped", &self.mapped)
            .field("pending_unmap", &self.pending_unmap)
            .field("current_event", &self.current_event)
            .field("diff", &self.diff)
            .field("dragging", &self.dragging.is_some())
            .field("restarting", &self.restarting)
            .field("running", &self.running)
            .finish()
    }
}

impl<X> State<X>
where
    X: XConn,
{
    /// Construct a new [State] directly from a [Config] and a connected [XConn].
    ///
    /// [WindowManager::new] is the usual entry point: this exists so that the pure state can be
    /// driven directly in tests without needing a full [WindowManager].
    pub fn try_new(config: Config<X>, x: &X) -> Result<Self> {
        let client_set = StackSet::try_new(
            config.default_layouts.clone(),
            config.workspace_names.iter(),
            x.screen_details()?,
        )?;

        let ss = client_set.snapshot(vec![]);
        let diff = Diff::new(ss.clone(), ss);

        Ok(Self {
            config,
            client_set,
            extensions: AnyMap::new(),
            root: x.root(),
            mapped: HashSet::new(),
            pending_unmap: HashMap::new(),
            current_event: None,
            diff,
            dragging: None,
            restarting: false,
            running: true,
        })
    }

    /// Begin an interactive mouse drag: `motion` is run against every subsequent `MotionNotify`
    /// until the button initiating the drag is released, at which point `cleanup` runs once and
    /// the drag ends. Replaces any drag already in progress.
    pub fn start_drag<M, C>(&mut self, motion: M, cleanup: C)
    where
        M: FnMut(&mut State<X>, &X, Point) + 'static,
        C: FnMut(&mut State<X>, &X) + 'static,
    {
        self.dragging = Some((Box::new(motion), Box::new(cleanup)));
    }

    /// Whether or not an interactive mouse drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Request that the main event loop stop and the process be restarted in place.
    ///
    /// This stops [WindowManager::run] in the same way as the `exit` built-in action but leaves
    /// [State::should_restart] set so that the caller can tell the two cases apart: actually
    /// performing the re-exec with [State::resume_data] as the `--resume` argument is left to the
    /// host binary, which owns process and command line handling.
    pub fn request_restart(&mut self) {
        self.restarting = true;
        self.running = false;
    }

    /// Whether the main event loop stopped because of a restart request rather than a plain exit.
    pub fn should_restart(&self) -> bool {
        self.restarting
    }

    /// Run the layout engine against every visible [Screen][crate::pure::Screen], applying any
    /// configured [LayoutHook] and committing the resulting client positions and any layout
    /// self-replacement back to the [ClientSet].
    ///
    /// This does not update [State::diff]: see [State::position_and_snapshot] for the version
    /// used by [modify_and_refresh][crate::x::XConnExt::modify_and_refresh].
    pub fn visible_client_positions(&mut self, x: &X) -> Vec<(Xid, Rect)> {
        let mut hook = self.config.layout_hook.take();
        let screens: Vec<(String, Rect)> = self
            .client_set
            .screens()
            .map(|s| (s.workspace.tag().to_string(), s.r))
            .collect();

        let mut positions = Vec::new();

        for (tag, r) in screens {
            let initial = match &mut hook {
                Some(h) => h.transform_initial(r, self, x),
                None => r,
            };

            let raw = {
                let screen = self
                    .client_set
                    .screens_mut()
                    .find(|s| s.workspace.tag() == tag)
                    .expect("tag to still be present");

                screen
                    .workspace
                    .layouts
                    .layout_workspace(&tag, &screen.workspace.stack, initial)
            };

            let ps = match &mut hook {
                Some(h) => h.transform_positions(initial, raw, self, x),
                None => raw,
            };

            positions.extend(ps);
        }

        self.config.layout_hook = hook;

        positions
    }

    /// Run the layout engine and fold the result into a [Snapshot] of the current state,
    /// draining any clients that were killed since the last refresh.
    pub fn position_and_snapshot(&mut self, x: &X) -> Snapshot<Xid> {
        let positions = self.visible_client_positions(x);

        self.client_set.snapshot(positions)
    }

    /// The Xid of the root window for the running [WindowManager].
    pub fn root(&self) -> Xid {
        self.root
    }

    /// The set of all client windows currently mapped to a screen.
    pub fn mapped_clients(&self) -> &HashSet<Xid> {
        &self.mapped
    }

    /// The event currently being processed.
    pub fn current_event(&self) -> Option<&XEvent> {
        self.current_event.as_ref()
    }

    /// Get access to a shared state extension.
    ///
    /// To add an extension to [State] before starting the Window Manager, see the
    /// [WindowManager::add_extension] method. To add an extension dynamically
    /// when you have access to [State], see [State::add_extension].
    ///
    /// # Errors
    /// Returns `Error::UnknownStateExtension` if there is no extension of type `E`.
    pub fn extension<E: Any>(&self) -> Result<Arc<RefCell<E>>> {
        self.extensions
            .get()
            .map(Arc::clone)
            .ok_or(Error::UnknownStateExtension {
                type_id: TypeId::of::<E>(),
            })
    }

    /// Remove a shared state extension entirely.
    ///
    /// Returns `None` if there is no extension of type `E` or if that extension
    /// is currently being held by another thread.
    pub fn remove_extension<E: Any>(&mut self) -> Option<E> {
        let arc: Arc<RefCell<E>> = self.extensions.remove()?;

        // If there is only one strong reference to this state then we'll be able to
        // try_unwrap it and return the underlying `E`. If not then this fails so we
        // need to store it back in the extensions anymap.
        match Arc::try_unwrap(arc) {
            Ok(rc) => Some(rc.into_inner()),
            Err(arc) => {
                self.extensions.insert(arc);
                None
            }
        }
    }

    /// Add a typed [State] extension to this State.
    pub fn add_extension<E: Any>(&mut self, extension: E) {
        self.extensions.insert(Arc::new(RefCell::new(extension)));
    }

    /// Serialise the current [ClientSet] and extension state to text for use with
    /// an in-place restart.
    ///
    /// The resulting string is suitable for passing back in to [State::from_resume_state]
    /// on the next invocation of the binary. Extensions are not themselves serialised:
    /// only a string keyed map from type name to the extension's own `to_string` output,
    /// which an extension may choose to opt in to by registering a codec ahead of calling
    /// this method.
    pub fn resume_data(&self, ext_state: HashMap<String, String>) -> String {
        let tags: Vec<&str> = self
            .client_set
            .workspaces()
            .map(|w| w.tag())
            .collect();

        format!("{}\0{}", tags.join(","), serialize_ext_state(&ext_state))
    }
}

fn serialize_ext_state(ext_state: &HashMap<String, String>) -> String {
    ext_state
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(";")
}

pub struct Config<X>
where
    X: XConn,
{
    pub normal_border: Color,
    pub focused_border: Color,
    pub border_width: u32,
    pub focus_follow_mouse: bool,
    pub default_layouts: LayoutStack,
    pub workspace_names: Vec<String>,
    pub floating_classes: Vec<String>,
    pub startup_hook: Option<Box<dyn StateHook<X>>>,
    pub event_hook: Option<Box<dyn EventHook<X>>>,
    pub manage_hook: Option<Box<dyn ManageHook<X>>>,
    pub refresh_hook: Option<Box<dyn StateHook<X>>>,
    pub layout_hook: Option<Box<dyn LayoutHook<X>>>,
}

impl<X> fmt::Debug for Config<X>
where
    X: XConn,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("normal_border", &self.normal_border)
            .field("focused_border", &self.focused_border)
            .field("border_width", &self.border_width)
            .field("focus_follow_mouse", &self.focus_follow_mouse)
            .field("default_layouts", &self.default_layouts)
            .field("workspace_names", &self.workspace_names)
            .field("floating_classes", &self.floating_classes)
            .finish()
    }
}

impl<X> Default for Config<X>
where
    X: XConn,
{
    fn default() -> Self {
        let strings = |slice: &[&str]| slice.iter().map(|s| s.to_string()).collect();

        Config {
            normal_border: "#3c3836".try_into().expect("valid hex code"),
            focused_border: "#cc241d".try_into().expect("valid hex code"),
            border_width: 2,
            focus_follow_mouse: true,
            default_layouts: LayoutStack::default(),
            workspace_names: strings(&["1", "2", "3", "4", "5", "6", "7", "8", "9"]),
            floating_classes: strings(&["dmenu", "dunst"]),
            startup_hook: None,
            event_hook: None,
            manage_hook: None,
            refresh_hook: None,
            layout_hook: None,
        }
    }
}

impl<X> Config<X>
where
    X: XConn,
{
    pub fn compose_or_set_startup_hook<H>(&mut self, hook: H)
    where
        H: StateHook<X> + 'static,
        X: 'static,
    {
        self.startup_hook = match self.startup_hook.take() {
            Some(h) => Some(hook.then_boxed(h)),
            None => Some(hook.boxed()),
        };
    }

    pub fn compose_or_set_event_hook<H>(&mut self, hook: H)
    where
        H: EventHook<X> + 'static,
        X: 'static,
    {
        self.event_hook = match self.event_hook.take() {
            Some(h) => Some(hook.then_boxed(h)),
            None => Some(hook.boxed()),
        };
    }

    pub fn compose_or_set_manage_hook<H>(&mut self, hook: H)
    where
        H: ManageHook<X> + 'static,
        X: 'static,
    {
        self.manage_hook = match self.manage_hook.take() {
            Some(h) => Some(hook.then_boxed(h)),
            None => Some(hook.boxed()),
        };
    }

    pub fn compose_or_set_refresh_hook<H>(&mut self, hook: H)
    where
        H: StateHook<X> + 'static,
        X: 'static,
    {
        self.refresh_hook = match self.refresh_hook.take() {
            Some(h) => Some(hook.then_boxed(h)),
            None => Some(hook.boxed()),
        };
    }

    pub fn compose_or_set_layout_hook<H>(&mut self, hook: H)
    where
        H: LayoutHook<X> + 'static,
        X: 'static,
    {
        self.layout_hook = match self.layout_hook.take() {
            Some(h) => Some(hook.then_boxed(h)),
            None => Some(hook.boxed()),
        };
    }
}

/// A top level struct holding all of the state required to run as an X11 window manager.
///
/// This allows for final configuration to be carried out before entering the main event
/// loop. Constructing a [WindowManager] performs the initial ICCCM handover dance with any
/// existing manager (see [XConn::attempt_to_become_wm] for the connection-level side of this)
/// and builds the initial [ClientSet] from whatever the display server currently reports for
/// screen geometry.
pub struct WindowManager<X>
where
    X: XConn,
{
    x: X,
    pub state: State<X>,
    key_bindings: KeyBindings<X>,
    mouse_bindings: MouseBindings<X>,
}

impl<X> WindowManager<X>
where
    X: XConn,
{
    /// Construct a new [WindowManager] with the provided config and X connection.
    ///
    /// `replace` corresponds to the host binary's `--replace` command line flag (see the
    /// `XConn::attempt_to_become_wm` docs): pass `true` to take over from a running manager
    /// rather than failing with `Error::AnotherWmRunning` if the root window's substructure
    /// redirect mask is already held.
    ///
    /// If you need to set [State] extensions, call [WindowManager::add_extension] after
    /// constructing your initial WindowManager.
    pub fn new(
        config: Config<X>,
        key_bindings: KeyBindings<X>,
        mouse_bindings: MouseBindings<X>,
        replace: bool,
        x: X,
    ) -> Result<Self> {
        x.attempt_to_become_wm(replace)?;
        let state = State::try_new(config, &x)?;

        Ok(Self {
            x,
            state,
            key_bindings,
            mouse_bindings,
        })
    }

    /// Rebuild a [WindowManager] from a previous invocation's [resume data][State::resume_data].
    ///
    /// Used to implement `--resume`: the serialised tag list is used to re-derive the
    /// set of workspaces while the actual client placements are rediscovered from the
    /// server via [XConn::existing_clients], so that no client identity is trusted from
    /// the resume string itself.
    pub fn from_resume_state(
        resume_data: &str,
        mut config: Config<X>,
        key_bindings: KeyBindings<X>,
        mouse_bindings: MouseBindings<X>,
        x: X,
    ) -> Result<(Self, HashMap<String, String>)> {
        let (tags_part, ext_part) = resume_data.split_once('\0').unwrap_or((resume_data, ""));
        let tags: Vec<String> = tags_part.split(',').map(|s| s.to_string()).collect();
        if !tags.is_empty() {
            config.workspace_names = tags;
        }

        let ext_state = ext_part
            .split(';')
            .filter_map(|kv| kv.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        // A resumed process is re-exec'ing itself in place: its own predecessor has already
        // relinquished the connection by the time we get here, so this always replaces rather
        // than failing if the mask somehow hasn't been released yet.
        let mut wm = Self::new(config, key_bindings, mouse_bindings, true, x)?;
        for id in wm.x.existing_clients()? {
            wm.x.manage(id, &mut wm.state)?;
        }

        Ok((wm, ext_state))
    }

    /// Add a typed [State] extension to this WindowManager.
    pub fn add_extension<E: Any>(&mut self, extension: E) {
        self.state.add_extension(extension);
    }

    /// Start the WindowManager and run it until told to exit.
    ///
    /// Any provided startup hooks will be run after setting signal handlers and grabbing
    /// key / mouse bindings from the X server. Any set up you need to do should be run
    /// explicitly before calling this method or as part of a startup hook.
    pub fn run(mut self) -> Result<()> {
        trace!("registering SIGCHILD signal handler");
        if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) } {
            panic!("unable to set signal handler: {}", e);
        }

        self.grab()?;

        if let Some(mut h) = self.state.config.startup_hook.take() {
            trace!("running user startup hook");
            if let Err(e) = h.call(&mut self.state, &self.x) {
                error!(%e, "error returned from user startup hook");
            }
        }

        self.x.modify_and_refresh(&mut self.state, |_| ())?;

        while self.state.running {
            match self.x.next_event() {
                Ok(event) => {
                    let span = span!(target: "stax", Level::DEBUG, "XEvent", %event);
                    let _enter = span.enter();
                    trace!(details = ?event, "event details");
                    self.state.current_event = Some(event.clone());

                    if let Err(e) = self.handle_xevent(event) {
                        error!(%e, "error handling XEvent");
                    }
                    self.x.flush();

                    self.state.current_event = None;
                }

                Err(e) => error!(%e, "Error pulling next x event"),
            }
        }

        Ok(())
    }

    fn grab(&self) -> Result<()> {
        trace!("grabbing key and mouse bindings");
        let key_codes: Vec<_> = self.key_bindings.keys().copied().collect();
        let mouse_states: Vec<_> = self
            .mouse_bindings
            .keys()
            .map(|(_, state)| state.clone())
            .collect();

        self.x.grab(&key_codes, &mouse_states)
    }

    fn handle_xevent(&mut self, event: XEvent) -> Result<()> {
        use XEvent::*;

        let WindowManager {
            x,
            state,
            key_bindings,
            mouse_bindings,
        } = self;

        let mut hook = state.config.event_hook.take();
        if let Some(ref mut h) = hook {
            trace!("running user event hook");
            let should_run = match h.call(&event, state, x) {
                Ok(should_run) => should_run,
                Err(e) => {
                    error!(%e, "error returned from user event hook");
                    true
                }
            };

            if !should_run {
                trace!("User event hook returned false: skipping default handling");
                state.config.event_hook = hook;
                return Ok(());
            }
        }
        state.config.event_hook = hook;

        match event {
            ClientMessage(m) => handle::client_message(m, state, x)?,
            ConfigureNotify(e) if e.is_root => handle::detect_screens(state, x)?,
            ConfigureNotify(_) => (), // server echo of our own ConfigureWindow calls
            ConfigureRequest(e) => handle::configure_request(&e, state, x)?,
            Enter(p) => handle::enter(p, state, x)?,
            Expose(_) => (), // repainting is a host / extension concern
            FocusIn(id) => handle::focus_in(id, state, x)?,
            Destroy(xid) => handle::destroy(xid, state, x)?,
            KeyPress(code) => handle::keypress(code, key_bindings, state, x)?,
            Leave(p) => handle::leave(p, state, x)?,
            MappingNotify => handle::mapping_notify(key_bindings, mouse_bindings, x)?,
            MapRequest(xid) => handle::map_request(xid, state, x)?,
            MouseEvent(e) => handle::mouse_event(e, mouse_bindings, state, x)?,
            PropertyNotify(_) => (), // property tracking is an extension concern (see EWMH)
            RandrNotify => handle::detect_screens(state, x)?,
            ScreenChange => handle::screen_change(state, x)?,
            UnmapNotify(xid) => handle::unmap_notify(xid, state, x)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pure::geometry::Rect;

    #[test]
    fn visible_client_positions_respects_floating_clients() {
        let tags = (1..10).map(|n| n.to_string());
        let screen = Rect::new(0, 0, 200, 100);
        let mut cs = ClientSet::try_new(LayoutStack::default(), tags, vec![screen]).unwrap();

        for n in 0..4 {
            cs.insert(Xid(n));
        }

        let r = Rect::new(50, 50, 50, 50);
        cs.float_unchecked(Xid(1), r);

        let positions = cs.visible_client_positions();

        assert!(positions.contains(&(Xid(1), r)))
    }
}
