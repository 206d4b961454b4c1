//! Client-side helpers: reconnect bookkeeping and the mirrored table

pub mod mirror;
pub mod store;

pub use mirror::{MirrorUpdate, MirroredPlayer, TableMirror};
pub use store::PlayerIdStore;
