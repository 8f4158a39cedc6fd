//! Dynamically typed messages sent to [Layout][super::Layout]s.
use std::any::Any;

/// Marker trait for types that can be sent to a [Layout][super::Layout] as a [Message].
///
/// Implementing this trait (typically via the `msg!` macro used by built-in messages) allows
/// a concrete struct to be boxed up and sent through [LayoutStack::handle_message] /
/// [LayoutStack::broadcast_message][super::LayoutStack::broadcast_message] without the caller
/// needing to know which concrete [Layout] implementations are present in the stack.
pub trait IntoMessage: Any {
    /// Box this value up as a dynamically typed [Message].
    fn into_message(self) -> Message
    where
        Self: Sized,
    {
        Message(Box::new(self))
    }
}

/// A dynamically typed message that can be sent to a running [Layout][super::Layout].
///
/// Layouts are free to ignore messages they do not know how to handle: see
/// [Layout::handle_message][super::Layout::handle_message].
pub struct Message(Box<dyn Any>);

impl Message {
    /// Construct a new [Message] wrapping `t`.
    ///
    /// Equivalent to `t.into_message()` but reads better at call sites that don't already have
    /// [IntoMessage] in scope.
    pub fn new<T: IntoMessage>(t: T) -> Self {
        t.into_message()
    }

    /// Attempt to downcast this message to a concrete message type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Foo(u8);
    impl IntoMessage for Foo {}

    struct Bar;
    impl IntoMessage for Bar {}

    #[test]
    fn downcast_ref_returns_none_for_the_wrong_type() {
        let m = Foo(42).into_message();

        assert_eq!(m.downcast_ref::<Foo>().map(|f| f.0), Some(42));
        assert!(m.downcast_ref::<Bar>().is_none());
    }
}
