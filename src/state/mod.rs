/// State management module
///
/// This module handles all application state, including:
/// - The static photo catalog and name translations (data.rs)
/// - Persisted like/dislike ratings (store.rs)
/// - The shuffled deck for the current pass (sequencer.rs)
/// - The per-visit session state machine (session.rs)

pub mod data;
pub mod sequencer;
pub mod session;
pub mod store;
