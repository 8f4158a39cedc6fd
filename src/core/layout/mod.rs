//! The layout engine: positioning client windows within a [Workspace][crate::pure::Workspace].
use crate::{
    pure::{geometry::Rect, Stack},
    stack, Xid,
};

pub mod messages;
pub mod transformers;

pub use messages::{IntoMessage, Message};
pub use transformers::LayoutTransformer;

/// A [Layout] is responsible for positioning the visible clients of a single [Workspace][crate::pure::Workspace]
/// within the available screen space.
///
/// Layouts are run as part of [windows][crate::x::XConnExt::modify_and_refresh] whenever the
/// window manager needs to refresh what is being shown on screen: adding or removing a client,
/// switching workspaces, or resizing a screen all trigger a fresh layout pass.
///
/// Implementations are free to hold on to whatever internal state they need (number of windows in
/// the main area, a split ratio, sort order) and to return a replacement for themselves from
/// [Layout::layout] / [Layout::handle_message] when that state changes: the window manager always
/// swaps in whatever is returned rather than mutating the stored layout directly, which allows a
/// [Layout] to replace itself with a different concrete type (see [LayoutTransformer]).
pub trait Layout: std::fmt::Debug {
    /// The name to report for this layout: used for status bars and `M-grave` style logging.
    fn name(&self) -> String;

    /// Clone this layout as a trait object.
    fn boxed_clone(&self) -> Box<dyn Layout>;

    /// Generate screen positions for each client in `s`, given the available screen space `r`.
    ///
    /// The window manager will call this with the [Stack] of currently visible (non-floating)
    /// clients for the workspace being laid out: there is always at least one client present.
    fn layout(&mut self, s: &Stack<Xid>, r: Rect) -> (Option<Box<dyn Layout>>, Vec<(Xid, Rect)>);

    /// As per [Layout::layout] but called with the full workspace tag and possibly empty stack.
    ///
    /// The default implementation dispatches to [Layout::layout] when there are clients present
    /// and [Layout::layout_empty] otherwise: most layouts do not need the workspace tag and can
    /// leave this at its default.
    fn layout_workspace(
        &mut self,
        _tag: &str,
        stack: &Option<Stack<Xid>>,
        r: Rect,
    ) -> (Option<Box<dyn Layout>>, Vec<(Xid, Rect)>) {
        match stack {
            Some(s) => self.layout(s, r),
            None => self.layout_empty(r),
        }
    }

    /// Called in place of [Layout::layout] when the workspace being laid out has no visible
    /// clients. The default implementation returns no positions and leaves the layout unchanged.
    fn layout_empty(&mut self, _r: Rect) -> (Option<Box<dyn Layout>>, Vec<(Xid, Rect)>) {
        (None, vec![])
    }

    /// Pass a dynamically typed [Message] to this layout.
    ///
    /// Returning `Some(layout)` replaces the stored layout with the returned value (most often
    /// used to update `self`'s state and return a freshly boxed clone, or to swap to an entirely
    /// different [Layout] implementation). Returning `None` leaves the current layout in place
    /// unmodified, which is also the correct response to a [Message] this layout does not
    /// recognise.
    fn handle_message(&mut self, m: &Message) -> Option<Box<dyn Layout>>;
}

impl Clone for Box<dyn Layout> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// A non-empty stack of available [Layout]s for a single [Workspace][crate::pure::Workspace].
///
/// At any given time a single layout is active (the [focus][Stack::focus] of the wrapped
/// [Stack]): sending a [common::Rotate][crate::builtin::layout::messages::common::Rotate] style
/// message, or calling [LayoutStack::next] / [LayoutStack::previous], cycles through the
/// remaining layouts without losing their state.
#[derive(Debug, Clone)]
pub struct LayoutStack(pub(crate) Stack<Box<dyn Layout>>);

impl LayoutStack {
    /// Construct a new [LayoutStack] from a non-empty [Stack] of boxed [Layout]s.
    pub fn new(stack: Stack<Box<dyn Layout>>) -> Self {
        Self(stack)
    }

    /// The name of the currently active layout.
    pub fn name(&self) -> String {
        self.0.focus.name()
    }

    /// Run the currently active layout against the given stack of clients.
    pub fn layout_workspace(
        &mut self,
        tag: &str,
        stack: &Option<Stack<Xid>>,
        r: Rect,
    ) -> Vec<(Xid, Rect)> {
        let (new, positions) = self.0.focus.layout_workspace(tag, stack, r);
        if let Some(l) = new {
            self.0.focus = l;
        }

        positions
    }

    /// Send a message to the currently active layout only.
    ///
    /// If the layout returns a replacement it is swapped in. Returns `true` if the message was
    /// acted upon (the layout returned a replacement for itself).
    pub fn handle_message(&mut self, m: &Message) -> bool {
        match self.0.focus.handle_message(m) {
            Some(l) => {
                self.0.focus = l;
                true
            }
            None => false,
        }
    }

    /// Send a message to every layout in the stack, not just the currently active one.
    pub fn broadcast_message(&mut self, m: &Message) {
        for l in self.0.iter_mut() {
            if let Some(new) = l.handle_message(m) {
                *l = new;
            }
        }
    }

    /// Cycle to the next available layout, keeping its existing state.
    pub fn next(&mut self) {
        self.0.focus_down();
    }

    /// Cycle to the previous available layout, keeping its existing state.
    pub fn previous(&mut self) {
        self.0.focus_up();
    }

    /// Jump directly to the layout with the given name, if one is present in this stack.
    ///
    /// The outgoing layout is sent a [Hide][crate::builtin::layout::messages::control::Hide]
    /// message before the switch so that it can clear down any transient state it was holding
    /// on to. Does nothing if `name` does not match any layout currently held.
    pub fn jump_to(&mut self, name: &str) {
        use crate::builtin::layout::messages::control::Hide;

        if self.0.focus.name() == name || !self.0.iter().any(|l| l.name() == name) {
            return;
        }

        self.handle_message(&Hide.into_message());

        while self.0.focus.name() != name {
            self.0.focus_down();
        }
    }

    /// Apply a transform to every [Layout] held in this stack, consuming it in the process.
    ///
    /// This is how [LayoutTransformer]s such as
    /// [Gaps][transformers::Gaps] are composed on to a set of base layouts.
    pub fn map<F>(self, mut f: F) -> Self
    where
        F: FnMut(Box<dyn Layout>) -> Box<dyn Layout>,
    {
        Self(self.0.map(|l| f(l)))
    }
}

impl Default for LayoutStack {
    fn default() -> Self {
        use crate::builtin::layout::{MainAndStack, Monocle};

        Self(stack!(
            Box::new(MainAndStack::default()) as Box<dyn Layout>,
            Monocle::boxed()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builtin::layout::messages::common::IncMain, pure::Stack};

    #[derive(Debug, Clone, Copy)]
    struct Counter(u8);

    impl Layout for Counter {
        fn name(&self) -> String {
            "Counter".to_owned()
        }

        fn boxed_clone(&self) -> Box<dyn Layout> {
            Box::new(*self)
        }

        fn layout(&mut self, s: &Stack<Xid>, r: Rect) -> (Option<Box<dyn Layout>>, Vec<(Xid, Rect)>) {
            (None, vec![(s.focus, r)])
        }

        fn handle_message(&mut self, m: &Message) -> Option<Box<dyn Layout>> {
            if let Some(&IncMain(n)) = m.downcast_ref() {
                Some(Box::new(Counter(self.0.wrapping_add(n as u8))))
            } else {
                None
            }
        }
    }

    #[test]
    fn handle_message_replaces_the_focused_layout() {
        let mut ls = LayoutStack::new(stack!(
            Box::new(Counter(0)) as Box<dyn Layout>,
            Box::new(Counter(100))
        ));

        let acted = ls.handle_message(&IncMain(3).into_message());

        assert!(acted);
        assert_eq!(ls.name(), "Counter");
    }

    #[test]
    fn next_and_previous_cycle_without_losing_state() {
        let mut ls = LayoutStack::new(stack!(
            Box::new(Counter(1)) as Box<dyn Layout>,
            Box::new(Counter(2))
        ));

        ls.next();
        ls.handle_message(&IncMain(5).into_message());
        ls.previous();
        ls.next();

        // we are back on the layout we bumped, having kept its updated state
        let (_, positions) = ls.0.focus.layout(
            &Stack::new(vec![], Xid(0), vec![]),
            Rect::new(0, 0, 100, 100),
        );
        assert_eq!(positions, vec![(Xid(0), Rect::new(0, 0, 100, 100))]);
    }
}
