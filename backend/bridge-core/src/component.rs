//! Capability shared by every driver that owns DOM resources.

/// Whether a driver may still react to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Disposed,
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    /// Move to `Disposed`. Returns `false` if already disposed, so callers
    /// can skip teardown on repeated calls.
    pub fn retire(&mut self) -> bool {
        match self {
            Lifecycle::Active => {
                *self = Lifecycle::Disposed;
                true
            }
            Lifecycle::Disposed => false,
        }
    }
}

pub trait Component {
    /// What the component was created in, typically a window.
    type Context;

    /// The owning context, `None` once disposed.
    fn owning_context(&self) -> Option<&Self::Context>;

    /// Release every listener and element. Calling it again is a no-op.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}
