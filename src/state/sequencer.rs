/// Deck sequencing for one pass over the catalog
///
/// A "pass" is one full shuffle cycle: a random permutation of the
/// candidate photos, walked until every catalog photo has been shown.
/// The sequencer owns the deck, the cursor into it, and the set of IDs
/// already presented during the pass. It never touches persistence; the
/// session layer combines it with the rating store.

use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::HashSet;

use super::data::PhotoEntry;
use super::store::RatingStore;

/// The shuffled working deck for the current pass
#[derive(Debug, Default)]
pub struct Sequencer {
    /// Element set is frozen while a pass is active
    deck: Vec<PhotoEntry>,
    /// Index of the currently displayed entry
    cursor: usize,
    /// IDs presented to the user during this pass
    seen: HashSet<u32>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh pass: shuffle the candidates uniformly, reset the
    /// cursor to the front and forget what was seen.
    pub fn build_pass(&mut self, mut candidates: Vec<PhotoEntry>, rng: &mut dyn RngCore) {
        candidates.shuffle(rng);
        self.deck = candidates;
        self.cursor = 0;
        self.seen.clear();
    }

    /// The entry under the cursor, or `None` for an empty deck.
    pub fn current(&self) -> Option<&PhotoEntry> {
        self.deck.get(self.cursor)
    }

    /// Record that the entry under the cursor has been shown.
    ///
    /// Called when a pass first becomes visible; `advance_to` does the
    /// same for every later entry.
    pub fn mark_current_seen(&mut self) {
        if let Some(entry) = self.deck.get(self.cursor) {
            self.seen.insert(entry.id);
        }
    }

    /// Find the next entry worth showing: scan forward from the cursor,
    /// then wrap around to the front, looking for the first entry that
    /// is neither seen this pass nor already rated.
    ///
    /// This is a pure lookup; it does not move the cursor. The caller
    /// uses it both for pre-loading the next image and (recomputed at
    /// decision time) for the actual advance.
    pub fn peek_next(&self, store: &RatingStore) -> Option<usize> {
        let forward = (self.cursor + 1)..self.deck.len();
        let wrapped = 0..self.cursor;

        forward
            .chain(wrapped)
            .find(|&i| self.is_candidate(i, store))
    }

    fn is_candidate(&self, index: usize, store: &RatingStore) -> bool {
        let id = self.deck[index].id;
        !self.seen.contains(&id) && !store.is_rated(id)
    }

    /// Move the cursor to the given deck index and mark that entry seen.
    /// Out-of-range indices are ignored.
    pub fn advance_to(&mut self, index: usize) {
        if let Some(entry) = self.deck.get(index) {
            self.seen.insert(entry.id);
            self.cursor = index;
        }
    }

    /// Whether every catalog photo has been presented this pass.
    /// This is the exhaustion condition that forces a full reset.
    pub fn all_seen(&self, catalog: &[PhotoEntry]) -> bool {
        catalog.iter().all(|entry| self.seen.contains(&entry.id))
    }

    /// Look up a deck entry by index, e.g. to preview what `peek_next`
    /// found.
    pub fn entry_at(&self, index: usize) -> Option<&PhotoEntry> {
        self.deck.get(index)
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }
}
