//! Bus subscribers bridging the core to external collaborators.

pub mod broadcast;

pub use broadcast::{BroadcastSubscriber, Broadcaster};
