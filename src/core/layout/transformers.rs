//! Helpers for writing [Layout]s that wrap another [Layout] and adjust its behaviour rather than
//! implementing layout logic of their own.
//!
//! See [simple_transformer] for the easy way to build one of these from a single transform
//! function.
use crate::{
    builtin::layout::messages::UnwrapTransformer,
    core::layout::{messages::Message, Layout},
    pure::{geometry::Rect, Stack},
    Xid,
};
use std::fmt;

/// A [Layout] that wraps another [Layout], modifying the [Rect] windows are given and / or
/// post processing the positions it returns before they are applied.
///
/// The underlying [Layout] is unaware that it is being wrapped: from its perspective it is
/// simply being run against whatever [Rect] it is handed. [UnwrapTransformer] can be sent to
/// strip the transformer back off and restore the original wrapped layout.
pub trait LayoutTransformer: Sized + 'static {
    /// The name to use for this transformed layout
    fn transformed_name(&self) -> String;

    /// A mutable reference to the underlying (wrapped) [Layout]
    fn inner_mut(&mut self) -> &mut Box<dyn Layout>;

    /// Replace the inner [Layout] with a new one, returning the old one.
    fn swap_inner(&mut self, new: Box<dyn Layout>) -> Box<dyn Layout> {
        std::mem::replace(self.inner_mut(), new)
    }

    /// Unwrap this transformer, returning the underlying (wrapped) [Layout].
    fn unwrap(self) -> Box<dyn Layout>;

    /// Modify the [Rect] available for the wrapped layout before it is run.
    fn transform_initial(&self, r: Rect) -> Rect {
        r
    }

    /// Modify the positions returned by the wrapped layout before they are returned by this one.
    fn transform_positions(&self, r: Rect, positions: Vec<(Xid, Rect)>) -> Vec<(Xid, Rect)> {
        let _ = r;
        positions
    }

    /// Run the wrapped layout using the [Rect] obtained from [LayoutTransformer::transform_initial]
    /// and post process its output using [LayoutTransformer::transform_positions].
    fn run_transform(
        &mut self,
        tag: &str,
        stack: &Option<Stack<Xid>>,
        r: Rect,
    ) -> Vec<(Xid, Rect)> {
        let initial = self.transform_initial(r);
        let (new, positions) = self.inner_mut().layout_workspace(tag, stack, initial);
        if let Some(l) = new {
            self.swap_inner(l);
        }

        self.transform_positions(r, positions)
    }

    /// Handle [UnwrapTransformer] by default: anything else is passed through to the wrapped
    /// layout's own message handling.
    fn passthrough_message(&mut self, m: &Message) -> Option<Box<dyn Layout>>
    where
        Self: Layout,
    {
        if let Some(&UnwrapTransformer) = m.downcast_ref() {
            return Some(self.swap_inner(Box::new(NullLayout)));
        }

        self.inner_mut().handle_message(m)
    }
}

impl<LT> Layout for LT
where
    LT: LayoutTransformer + fmt::Debug + Clone,
{
    fn name(&self) -> String {
        self.transformed_name()
    }

    fn boxed_clone(&self) -> Box<dyn Layout> {
        Box::new(self.clone())
    }

    fn layout(&mut self, s: &Stack<Xid>, r: Rect) -> (Option<Box<dyn Layout>>, Vec<(Xid, Rect)>) {
        (None, self.run_transform("", &Some(s.clone()), r))
    }

    fn layout_workspace(
        &mut self,
        tag: &str,
        stack: &Option<Stack<Xid>>,
        r: Rect,
    ) -> (Option<Box<dyn Layout>>, Vec<(Xid, Rect)>) {
        (None, self.run_transform(tag, stack, r))
    }

    fn handle_message(&mut self, m: &Message) -> Option<Box<dyn Layout>> {
        self.passthrough_message(m)
    }
}

/// A placeholder [Layout] used to fill the gap left when a [LayoutTransformer] is unwrapped.
///
/// This should never be run: [LayoutTransformer::swap_inner] always replaces it before control
/// returns to the layout engine.
#[derive(Debug, Clone, Copy)]
pub struct NullLayout;

impl Layout for NullLayout {
    fn name(&self) -> String {
        "null".to_string()
    }

    fn boxed_clone(&self) -> Box<dyn Layout> {
        Box::new(*self)
    }

    fn layout_workspace(
        &mut self,
        _tag: &str,
        _stack: &Option<Stack<Xid>>,
        _r: Rect,
    ) -> Vec<(Xid, Rect)> {
        panic!("NullLayout should never be run directly")
    }
}

/// Generate a simple [LayoutTransformer] from a transform function that operates on the
/// positions returned by a wrapped [Layout].
///
/// ```
/// # use stax::{
/// #     core::layout::Layout,
/// #     pure::geometry::Rect,
/// #     simple_transformer,
/// #     Xid,
/// # };
/// fn my_transform(r: Rect, positions: Vec<(Xid, Rect)>) -> Vec<(Xid, Rect)> {
///     positions
/// }
///
/// simple_transformer!("MyTransform", MyTransformer, my_transform);
/// ```
#[macro_export]
macro_rules! simple_transformer {
    ($prefix:expr, $transform_name:ident, $f:expr) => {
        #[doc = concat!("A simple LayoutTransformer wrapping another Layout using `", stringify!($f), "`")]
        #[derive(Debug, Clone)]
        pub struct $transform_name {
            prefix: String,
            inner: Box<dyn $crate::core::layout::Layout>,
        }

        impl $transform_name {
            #[doc = concat!("Wrap `layout` to create a new ", stringify!($transform_name))]
            pub fn wrap(layout: Box<dyn $crate::core::layout::Layout>) -> Box<dyn $crate::core::layout::Layout> {
                Box::new(Self {
                    prefix: $prefix.to_string(),
                    inner: layout,
                })
            }
        }

        impl $crate::core::layout::transformers::LayoutTransformer for $transform_name {
            fn transformed_name(&self) -> String {
                format!("{}{}", self.prefix, self.inner.name())
            }

            fn inner_mut(&mut self) -> &mut Box<dyn $crate::core::layout::Layout> {
                &mut self.inner
            }

            fn unwrap(self) -> Box<dyn $crate::core::layout::Layout> {
                self.inner
            }

            fn transform_positions(
                &self,
                r: $crate::pure::geometry::Rect,
                positions: Vec<($crate::Xid, $crate::pure::geometry::Rect)>,
            ) -> Vec<($crate::Xid, $crate::pure::geometry::Rect)> {
                $f(r, positions)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::layout::messages::{IncMain, UnwrapTransformer};

    #[derive(Debug, Clone)]
    struct ReflectHorizontal {
        inner: Box<dyn Layout>,
    }

    impl LayoutTransformer for ReflectHorizontal {
        fn transformed_name(&self) -> String {
            format!("Reflected{}", self.inner.name())
        }

        fn inner_mut(&mut self) -> &mut Box<dyn Layout> {
            &mut self.inner
        }

        fn unwrap(self) -> Box<dyn Layout> {
            self.inner
        }

        fn transform_positions(&self, r: Rect, positions: Vec<(Xid, Rect)>) -> Vec<(Xid, Rect)> {
            positions
                .into_iter()
                .map(|(id, c)| {
                    let x = r.x + (r.w - (c.x - r.x) - c.w);
                    (id, Rect { x, ..c })
                })
                .collect()
        }
    }

    #[test]
    fn unwrap_transformer_restores_the_inner_layout() {
        use crate::builtin::layout::MainAndStack;

        let inner: Box<dyn Layout> = Box::new(MainAndStack::side(1, 0.6, 0.1));
        let mut wrapped: Box<dyn Layout> = Box::new(ReflectHorizontal {
            inner: inner.boxed_clone(),
        });

        let restored = wrapped
            .handle_message(&Message::new(UnwrapTransformer))
            .expect("to unwrap");

        assert_eq!(restored.name(), inner.name());
    }

    #[test]
    fn other_messages_are_passed_through() {
        use crate::builtin::layout::MainAndStack;

        let inner: Box<dyn Layout> = Box::new(MainAndStack::side(1, 0.6, 0.1));
        let mut wrapped: Box<dyn Layout> = Box::new(ReflectHorizontal { inner });

        // IncMain is handled by MainAndStack directly and returns None (mutates in place)
        assert!(wrapped.handle_message(&Message::new(IncMain(1))).is_none());
    }
}
