//! Browser-side engine for a server-authoritative incremental game.
//!
//! The server owns the rules and always answers with a complete state. This
//! crate keeps the last confirmed [`snapshot::Snapshot`] in a
//! [`store::GameStore`], extrapolates resource amounts between syncs
//! ([`extrapolate`]), talks to the server through an injected
//! [`sync::Transport`] ([`sync::SyncController`]) and drives an injected
//! [`render::View`] ([`render::RenderDispatcher`]).
//!
//! [`web`] and [`view`] provide the browser implementations used by the
//! binary.

pub mod clock;
pub mod config;
pub mod error;
pub mod extrapolate;
pub mod input;
pub mod render;
pub mod schedule;
pub mod snapshot;
pub mod store;
pub mod sync;
pub mod view;
pub mod web;
pub mod widgets;
