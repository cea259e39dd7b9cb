/// Per-visit session state machine
///
/// The session coordinates the rating store and the sequencer in
/// response to user decisions, and layers four concerns on top of the
/// plain deck walk:
/// - the confetti celebration at randomized like-count milestones,
/// - the one-time feedback notice on the first dislike,
/// - the periodic break screen after a batch of ratings,
/// - the single deferred advance that ties the interruptions together.
///
/// One explicit `Screen` value plus one `Option<usize>` pending slot
/// replaces the pile of independent booleans such a flow tends to grow;
/// impossible flag combinations simply cannot be represented.

use rand::{Rng, RngCore};
use std::ops::RangeInclusive;

use super::data::PhotoEntry;
use super::sequencer::Sequencer;
use super::store::RatingStore;

/// Which top-level screen the application is on.
///
/// The feedback notice is an overlay on `Viewing`, not a screen of its
/// own; see [`Session::notice_visible`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Branding splash right after launch
    Splash,
    /// Initial shuffle / loading indicator
    Loading,
    /// The photo card, accepting ratings
    Viewing,
    /// Periodic break between rating batches; input is suppressed
    Break,
}

/// Tunable ranges for the randomized pacing thresholds.
///
/// Production uses the defaults; tests narrow the ranges to pin the
/// behavior down.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Ratings per batch before the break screen appears
    pub batch_ratings: RangeInclusive<u32>,
    /// Likes between two confetti celebrations
    pub celebration_likes: RangeInclusive<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            batch_ratings: 5..=7,
            celebration_likes: 3..=5,
        }
    }
}

/// The session coordinator
pub struct Session {
    catalog: Vec<PhotoEntry>,
    store: RatingStore,
    sequencer: Sequencer,
    config: SessionConfig,
    /// Injectable so tests can drive exact shuffles and thresholds
    rng: Box<dyn RngCore>,

    screen: Screen,
    /// Overlay on `Viewing`; never true on any other screen
    notice_visible: bool,
    /// At most one deferred cursor target; consumed exactly once
    pending_advance: Option<usize>,

    like_count: u32,
    /// Cumulative like count at which the next celebration fires
    next_celebration_at: u32,
    /// Ratings since the last break screen
    batch_counter: u32,
    /// Current roll of ratings-per-batch
    batch_size: u32,
}

impl Session {
    /// Create a session and build the initial pass.
    ///
    /// The store is expected to have been wiped at startup already, so
    /// the first pass normally covers the whole catalog; the unrated
    /// filter is applied anyway in case persistence survived.
    pub fn new(catalog: Vec<PhotoEntry>, store: RatingStore, rng: Box<dyn RngCore>) -> Self {
        Self::with_config(catalog, store, rng, SessionConfig::default())
    }

    pub fn with_config(
        catalog: Vec<PhotoEntry>,
        store: RatingStore,
        mut rng: Box<dyn RngCore>,
        config: SessionConfig,
    ) -> Self {
        let batch_size = (&mut *rng).gen_range(config.batch_ratings.clone());
        let next_celebration_at = (&mut *rng).gen_range(config.celebration_likes.clone());

        let mut session = Session {
            catalog,
            store,
            sequencer: Sequencer::new(),
            config,
            rng,
            screen: Screen::Splash,
            notice_visible: false,
            pending_advance: None,
            like_count: 0,
            next_celebration_at,
            batch_counter: 0,
            batch_size,
        };

        session.build_pass_from_unrated();
        session
    }

    // ---- read interface for the presentation layer ----

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The photo currently on the card, if any.
    pub fn current(&self) -> Option<&PhotoEntry> {
        self.sequencer.current()
    }

    /// The photo that would come next, for pre-rendering behind the
    /// card. Purely a preview; the advance recomputes its own target at
    /// decision time, so staleness here is harmless.
    pub fn next_preview(&self) -> Option<&PhotoEntry> {
        self.sequencer
            .peek_next(&self.store)
            .and_then(|index| self.sequencer.entry_at(index))
    }

    /// Whether the one-time feedback notice overlay is up.
    pub fn notice_visible(&self) -> bool {
        self.notice_visible
    }

    /// True while rating input should be ignored: on every screen but
    /// `Viewing`, and while the notice overlay holds an advance back.
    /// Accepting a rating mid-notice would re-rate the photo that is
    /// still on the card and break rating exclusivity.
    pub fn input_disabled(&self) -> bool {
        self.screen != Screen::Viewing || self.notice_visible
    }

    pub fn is_current_liked(&self) -> bool {
        self.current().map_or(false, |e| self.store.is_liked(e.id))
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    // ---- screen-flow handlers ----

    /// Splash timer finished; move on to the initial loading screen.
    pub fn on_splash_complete(&mut self) {
        if self.screen == Screen::Splash {
            self.screen = Screen::Loading;
        }
    }

    /// Initial loading finished; show the first photo.
    pub fn on_loading_complete(&mut self) {
        if self.screen == Screen::Loading {
            self.screen = Screen::Viewing;
            self.sequencer.mark_current_seen();
        }
    }

    // ---- rating decisions ----

    /// Handle a like (right swipe or button).
    ///
    /// Returns true when the confetti celebration should fire; the
    /// presentation layer treats that as a fire-and-forget trigger.
    pub fn on_like(&mut self) -> bool {
        if self.input_disabled() {
            return false;
        }
        let Some(current) = self.sequencer.current().cloned() else {
            return false;
        };

        // Persist before anything can interrupt; an abandoned break or
        // notice must never lose the decision.
        self.store.mark_liked(current.id);
        self.sequencer.mark_current_seen();

        self.like_count += 1;
        let celebrate = self.like_count >= self.next_celebration_at;
        if celebrate {
            self.next_celebration_at = self.like_count + self.roll(self.config.celebration_likes.clone());
        }

        self.batch_counter += 1;
        let target = self.resolve_next();
        self.finish_decision(target, false);

        celebrate
    }

    /// Handle a dislike (left swipe or button).
    ///
    /// The first dislike of the visit also raises the feedback notice,
    /// deferring the advance until it is dismissed.
    pub fn on_dislike(&mut self) {
        if self.input_disabled() {
            return;
        }
        let Some(current) = self.sequencer.current().cloned() else {
            return;
        };

        self.store.mark_disliked(current.id);
        self.sequencer.mark_current_seen();

        // Latch immediately; even if the break screen wins below, the
        // notice must not pop up on some later dislike.
        let notice_due = !self.store.has_shown_feedback_notice();
        if notice_due {
            self.store.mark_feedback_notice_shown();
        }

        self.batch_counter += 1;
        let target = self.resolve_next();
        self.finish_decision(target, notice_due);
    }

    /// The notice overlay was dismissed (auto-timeout).
    pub fn on_notice_dismissed(&mut self) {
        if !self.notice_visible {
            return;
        }
        self.notice_visible = false;
        if let Some(index) = self.pending_advance.take() {
            self.sequencer.advance_to(index);
        }
    }

    /// The break screen ran its course; resume viewing.
    pub fn on_break_complete(&mut self) {
        if self.screen != Screen::Break {
            return;
        }
        self.screen = Screen::Viewing;
        self.batch_counter = 0;
        self.batch_size = self.roll(self.config.batch_ratings.clone());

        match self.pending_advance.take() {
            Some(index) => self.sequencer.advance_to(index),
            // Nothing was held back; recompute from scratch so the
            // card is not stuck on an already-rated photo.
            None => {
                let target = self.resolve_next();
                self.apply_advance(target);
            }
        }
    }

    // ---- internals ----

    /// Route the resolved target either into an interruption's pending
    /// slot or straight into the sequencer.
    ///
    /// When a dislike both raises the notice and completes a batch, the
    /// break screen wins and the notice stays hidden for this decision
    /// (its latch is already set). That keeps a single consumer for the
    /// single pending slot.
    fn finish_decision(&mut self, target: Option<usize>, notice_due: bool) {
        if self.batch_counter >= self.batch_size {
            self.pending_advance = target;
            self.notice_visible = false;
            self.screen = Screen::Break;
        } else if notice_due {
            self.pending_advance = target;
            self.notice_visible = true;
        } else {
            self.apply_advance(target);
        }
    }

    /// Compute where the cursor should go after a rating, applying the
    /// pass-lifecycle rules in order:
    /// 1. exhaustion — every catalog photo has been shown: wipe the
    ///    ratings and reshuffle the full catalog into a new round;
    /// 2. normal advance — next unseen, unrated entry in this deck;
    /// 3. starvation — deck has nothing left but unrated photos exist
    ///    outside it: build a fresh pass from those;
    /// 4. nothing anywhere — stay on the current entry.
    fn resolve_next(&mut self) -> Option<usize> {
        if !self.catalog.is_empty() && self.sequencer.all_seen(&self.catalog) {
            println!("🔄 Every photo has been shown; starting a new round");
            self.store.reset_all();
            let full = self.catalog.clone();
            self.sequencer.build_pass(full, &mut *self.rng);
            return Some(0);
        }

        if let Some(index) = self.sequencer.peek_next(&self.store) {
            return Some(index);
        }

        let unrated: Vec<PhotoEntry> = self
            .catalog
            .iter()
            .filter(|entry| !self.store.is_rated(entry.id))
            .cloned()
            .collect();

        if !unrated.is_empty() {
            self.sequencer.build_pass(unrated, &mut *self.rng);
            return Some(0);
        }

        None
    }

    /// Build the initial pass: all unrated photos, or the full catalog
    /// when everything is already rated.
    fn build_pass_from_unrated(&mut self) {
        let unrated: Vec<PhotoEntry> = self
            .catalog
            .iter()
            .filter(|entry| !self.store.is_rated(entry.id))
            .cloned()
            .collect();

        let candidates = if unrated.is_empty() {
            self.catalog.clone()
        } else {
            unrated
        };
        self.sequencer.build_pass(candidates, &mut *self.rng);
    }

    fn apply_advance(&mut self, target: Option<usize>) {
        if let Some(index) = target {
            self.sequencer.advance_to(index);
        }
    }

    fn roll(&mut self, range: RangeInclusive<u32>) -> u32 {
        (&mut *self.rng).gen_range(range)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("screen", &self.screen)
            .field("notice_visible", &self.notice_visible)
            .field("pending_advance", &self.pending_advance)
            .field("like_count", &self.like_count)
            .field("batch_counter", &self.batch_counter)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(id: u32, label: &str) -> PhotoEntry {
        PhotoEntry {
            id,
            label: label.to_string(),
        }
    }

    fn catalog(n: u32) -> Vec<PhotoEntry> {
        (1..=n).map(|id| entry(id, "fox")).collect()
    }

    fn session(n: u32, config: SessionConfig, seed: u64) -> Session {
        let mut s = Session::with_config(
            catalog(n),
            RatingStore::open_in_memory(),
            Box::new(StdRng::seed_from_u64(seed)),
            config,
        );
        s.on_splash_complete();
        s.on_loading_complete();
        s
    }

    fn wide_config() -> SessionConfig {
        // Batches too large to trigger during short tests
        SessionConfig {
            batch_ratings: 100..=100,
            celebration_likes: 3..=5,
        }
    }

    #[test]
    fn test_startup_walks_splash_loading_viewing() {
        let mut s = Session::with_config(
            catalog(3),
            RatingStore::open_in_memory(),
            Box::new(StdRng::seed_from_u64(1)),
            SessionConfig::default(),
        );

        assert_eq!(s.screen(), Screen::Splash);
        assert!(s.input_disabled());

        s.on_splash_complete();
        assert_eq!(s.screen(), Screen::Loading);

        s.on_loading_complete();
        assert_eq!(s.screen(), Screen::Viewing);
        assert!(!s.input_disabled());
        assert!(s.current().is_some());
    }

    #[test]
    fn test_rating_exclusivity() {
        let mut s = session(6, wide_config(), 11);

        for _ in 0..6 {
            let id = s.current().unwrap().id;
            if id % 2 == 0 {
                s.on_like();
            } else {
                s.on_dislike();
                if s.notice_visible() {
                    s.on_notice_dismissed();
                }
            }
        }

        for id in 1..=6 {
            assert!(
                !(s.store().is_liked(id) && s.store().is_disliked(id)),
                "photo {} is both liked and disliked",
                id
            );
        }
    }

    #[test]
    fn test_like_advances_to_a_fresh_photo() {
        let mut s = session(5, wide_config(), 21);

        let first = s.current().unwrap().id;
        s.on_like();
        let second = s.current().unwrap().id;

        assert_ne!(first, second);
        assert!(s.store().is_liked(first));
        assert!(!s.store().is_rated(second));
    }

    #[test]
    fn test_exhaustion_resets_store_and_starts_new_round() {
        // Property: after K decisions covering all K photos, the store
        // is wiped and a fresh pass of size K begins.
        let mut s = session(4, wide_config(), 5);

        let mut rated = Vec::new();
        for _ in 0..4 {
            let id = s.current().unwrap().id;
            rated.push(id);
            s.on_like();
        }

        rated.sort_unstable();
        rated.dedup();
        assert_eq!(rated.len(), 4, "a photo was rated twice in one pass");

        for id in 1..=4 {
            assert!(!s.store().is_rated(id), "store was not reset");
        }
        assert_eq!(s.sequencer.deck_len(), 4);
        assert!(s.current().is_some());
    }

    #[test]
    fn test_batch_break_holds_the_advance() {
        let config = SessionConfig {
            batch_ratings: 5..=5,
            celebration_likes: 100..=100,
        };
        let mut s = session(12, config, 8);

        // First decision is a dislike so the mix covers both kinds
        s.on_dislike();
        assert!(s.notice_visible());
        s.on_notice_dismissed();

        for _ in 0..3 {
            s.on_like();
            assert_eq!(s.screen(), Screen::Viewing);
        }

        let shown_during_break = s.current().unwrap().id;
        s.on_like(); // fifth rating of the batch
        assert_eq!(s.screen(), Screen::Break);
        assert!(s.input_disabled());
        assert_eq!(
            s.current().unwrap().id,
            shown_during_break,
            "the card advanced before the break finished"
        );

        // Ratings are ignored while the break is up
        s.on_like();
        s.on_dislike();
        assert_eq!(s.current().unwrap().id, shown_during_break);

        s.on_break_complete();
        assert_eq!(s.screen(), Screen::Viewing);
        assert_ne!(s.current().unwrap().id, shown_during_break);
        assert_eq!(s.batch_counter, 0);
    }

    #[test]
    fn test_notice_shows_once_per_visit() {
        let mut s = session(8, wide_config(), 13);

        s.on_dislike();
        assert!(s.notice_visible());

        // The advance is held until the notice goes away
        let held = s.current().unwrap().id;
        assert!(s.store().is_disliked(held));
        s.on_notice_dismissed();
        assert_ne!(s.current().unwrap().id, held);

        for _ in 0..3 {
            s.on_dislike();
            assert!(!s.notice_visible(), "notice reappeared");
        }
    }

    #[test]
    fn test_break_takes_precedence_over_notice() {
        let config = SessionConfig {
            batch_ratings: 1..=1,
            celebration_likes: 100..=100,
        };
        let mut s = session(6, config, 17);

        // First dislike raises both interruptions at once
        s.on_dislike();
        assert_eq!(s.screen(), Screen::Break);
        assert!(!s.notice_visible());

        s.on_break_complete();
        assert_eq!(s.screen(), Screen::Viewing);

        // The notice was latched anyway and never shows later
        s.on_dislike();
        assert!(!s.notice_visible());
    }

    #[test]
    fn test_three_photo_round_trip_with_forced_batch() {
        // Catalog of three, batch size pinned to three: the third
        // decision exhausts the pass, so the break screen comes up over
        // a freshly reset round.
        let config = SessionConfig {
            batch_ratings: 3..=3,
            celebration_likes: 100..=100,
        };
        let mut s = Session::with_config(
            vec![entry(1, "fox"), entry(2, "badger"), entry(3, "dog")],
            RatingStore::open_in_memory(),
            Box::new(StdRng::seed_from_u64(2)),
            config,
        );
        s.on_splash_complete();
        s.on_loading_complete();

        s.on_like();
        s.on_dislike();
        // Second decision raised the notice; the third rating comes in
        // only after it is gone.
        s.on_notice_dismissed();
        s.on_like();

        assert_eq!(s.screen(), Screen::Break);

        s.on_break_complete();
        assert_eq!(s.screen(), Screen::Viewing);
        for id in 1..=3 {
            assert!(!s.store().is_rated(id), "round did not reset photo {}", id);
        }
        assert_eq!(s.sequencer.deck_len(), 3);
        assert!(s.current().is_some());
        assert_eq!(s.batch_counter, 0);
    }

    #[test]
    fn test_celebration_fires_at_rolled_thresholds() {
        let config = SessionConfig {
            batch_ratings: 100..=100,
            celebration_likes: 3..=3,
        };
        let mut s = session(20, config, 4);

        let fired: Vec<bool> = (0..9).map(|_| s.on_like()).collect();

        // Threshold pinned to 3: fires on likes 3, 6 and 9
        assert_eq!(
            fired,
            vec![false, false, true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_dislikes_never_celebrate() {
        let config = SessionConfig {
            batch_ratings: 100..=100,
            celebration_likes: 1..=1,
        };
        let mut s = session(10, config, 6);

        s.on_dislike();
        s.on_notice_dismissed();
        s.on_dislike();
        assert_eq!(s.like_count, 0);

        // The very first like reaches the pinned threshold of 1
        assert!(s.on_like());
    }

    #[test]
    fn test_empty_catalog_stays_on_loading_state() {
        let mut s = session(0, wide_config(), 1);

        assert!(s.current().is_none());
        // Decisions on nothing are no-ops, not panics
        assert!(!s.on_like());
        s.on_dislike();
        assert_eq!(s.screen(), Screen::Viewing);
    }

    #[test]
    fn test_degraded_store_still_sequences_without_repeats() {
        let mut s = Session::with_config(
            catalog(5),
            RatingStore::degraded(),
            Box::new(StdRng::seed_from_u64(3)),
            wide_config(),
        );
        s.on_splash_complete();
        s.on_loading_complete();

        // Ratings are not persisted, but the seen set still prevents
        // repeats within the pass.
        let mut shown = Vec::new();
        for _ in 0..5 {
            shown.push(s.current().unwrap().id);
            s.on_like();
        }
        let mut unique = shown.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), shown.len());
    }
}
