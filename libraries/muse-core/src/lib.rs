//! Muse Player Core
//!
//! Catalog-facing types shared between the playback core and the
//! application's catalog layer.
//!
//! The catalog itself (sagas, songs, lore, locations) lives outside this
//! workspace; it hands the playback core immutable [`Track`] values and
//! consumes the published player state.

pub mod track;

pub use track::{Track, TrackId};
