//! Core runtime for Trellis: positional identity, the framed persistent
//! state store, observable values and derived state.

pub mod collections;
pub mod derived_state;
pub mod error;
pub mod hash;
pub mod identity;
pub mod immutable_map;
pub mod lifecycle;
pub mod mutable_value;
pub mod observer;
pub mod persistent_state;
pub mod platform;

pub use derived_state::{derived_state_of, derived_state_with_policy, DerivedState};
pub use error::StateError;
pub use identity::{Identifier, IdentityManager, NodePath, DEFAULT_SCOPE};
pub use immutable_map::ImmutableMap;
pub use lifecycle::{CancellationScope, RememberObserver, ViewModel};
pub use mutable_value::{
    never_equal, structural_equality, ChangeNotifier, ComparePolicy, MutableValue, Subscription,
};
pub use observer::{
    is_observing, notify_read, observe_reads, without_read_observation, ObjectId, ReadRecord,
    ReadSet, StateObject,
};
pub use persistent_state::{with_frame, FrameGuard, PersistentState, StateOptions};
pub use platform::{Clock, RuntimeScheduler, UiExecutor, UiTask};

/// Shorthand for a structurally compared [`MutableValue`].
pub fn mutable_value_of<T>(value: T) -> MutableValue<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    MutableValue::new(value)
}
