/// The swipeable photo card
///
/// Drag tracking lives in an explicit state machine instead of a pile
/// of timers: `Idle → Dragging → AnimatingOut | Resetting → Idle`. Each
/// animated state is driven by the shared tick and replaced wholesale
/// on any new interaction, so a late tick can never act on stale drag
/// state. The card emits the swipe direction only once the fling
/// animation has finished, and resets whenever the displayed photo
/// changes.

use iced::widget::{column, container, image, mouse_area, stack, text};
use iced::{Alignment, Element, Length, Padding, Point};
use std::time::{Duration, Instant};

use crate::Message;

/// Minimum travel before a release counts as a swipe attempt at all
const MINIMUM_SWIPE_DISTANCE: f32 = 20.0;
/// Travel that always completes the swipe
const SWIPE_THRESHOLD: f32 = 100.0;
/// Fast flicks complete the swipe below the distance threshold (px/ms)
const FLING_VELOCITY: f32 = 0.5;

const FLING_DURATION: Duration = Duration::from_millis(200);
const RESET_DURATION: Duration = Duration::from_millis(150);
/// How far off-screen the card travels during the fling
const FLING_DISTANCE: f32 = 600.0;

/// Where a completed swipe went
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Dislike
    Left,
    /// Like
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Dragging {
        grabbed_at: f32,
        started: Instant,
    },
    AnimatingOut {
        direction: SwipeDirection,
        from: f32,
        started: Instant,
    },
    Resetting {
        from: f32,
        started: Instant,
    },
}

/// Interaction state for the card currently on screen
#[derive(Debug)]
pub struct CardState {
    phase: Phase,
    /// Last known cursor x over the card area
    cursor_x: f32,
    /// Current horizontal displacement of the card
    offset: f32,
}

impl Default for CardState {
    fn default() -> Self {
        CardState {
            phase: Phase::Idle,
            cursor_x: 0.0,
            offset: 0.0,
        }
    }
}

impl CardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer moved over the card.
    pub fn cursor_moved(&mut self, position: Point) {
        self.cursor_x = position.x;
        if let Phase::Dragging { grabbed_at, .. } = self.phase {
            self.offset = position.x - grabbed_at;
        }
    }

    /// The pointer went down; start a drag from the current position.
    /// Grabbing interrupts a snap-back animation but not a fling, whose
    /// decision is already on its way.
    pub fn grabbed(&mut self, now: Instant) {
        match self.phase {
            Phase::Idle | Phase::Resetting { .. } => {
                self.phase = Phase::Dragging {
                    grabbed_at: self.cursor_x,
                    started: now,
                };
                self.offset = 0.0;
            }
            Phase::Dragging { .. } | Phase::AnimatingOut { .. } => {}
        }
    }

    /// The pointer went up; decide between fling and snap-back.
    pub fn released(&mut self, now: Instant) {
        let Phase::Dragging { started, .. } = self.phase else {
            return;
        };

        let distance = self.offset.abs();
        let elapsed_ms = now.duration_since(started).as_millis().max(1) as f32;
        let velocity = distance / elapsed_ms;

        if distance < MINIMUM_SWIPE_DISTANCE {
            self.phase = Phase::Resetting {
                from: self.offset,
                started: now,
            };
        } else if distance > SWIPE_THRESHOLD || velocity > FLING_VELOCITY {
            let direction = if self.offset > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            self.phase = Phase::AnimatingOut {
                direction,
                from: self.offset,
                started: now,
            };
        } else {
            self.phase = Phase::Resetting {
                from: self.offset,
                started: now,
            };
        }
    }

    /// The pointer left the card mid-drag (scroll, window exit).
    pub fn cancelled(&mut self, now: Instant) {
        if let Phase::Dragging { .. } = self.phase {
            self.phase = Phase::Resetting {
                from: self.offset,
                started: now,
            };
        }
    }

    /// Advance the running animation, if any. Returns the swipe
    /// direction exactly once, when the fling completes.
    pub fn tick(&mut self, now: Instant) -> Option<SwipeDirection> {
        match self.phase {
            Phase::AnimatingOut {
                direction,
                from,
                started,
            } => {
                let t = progress(started, now, FLING_DURATION);
                let out = FLING_DISTANCE * if from >= 0.0 { 1.0 } else { -1.0 };
                self.offset = from + (out - from) * t;

                if t >= 1.0 {
                    self.phase = Phase::Idle;
                    self.offset = 0.0;
                    return Some(direction);
                }
                None
            }
            Phase::Resetting { from, started } => {
                let t = progress(started, now, RESET_DURATION);
                self.offset = from * (1.0 - t);

                if t >= 1.0 {
                    self.phase = Phase::Idle;
                    self.offset = 0.0;
                }
                None
            }
            Phase::Idle | Phase::Dragging { .. } => None,
        }
    }

    /// Forget the interaction entirely; called when the displayed photo
    /// changes under the card.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.offset = 0.0;
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::AnimatingOut { .. } | Phase::Resetting { .. }
        )
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Card fades as it travels, bottoming out at 50%.
    pub fn opacity(&self) -> f32 {
        1.0 - (self.offset.abs() / 200.0).min(0.5)
    }
}

fn progress(started: Instant, now: Instant, duration: Duration) -> f32 {
    (now.duration_since(started).as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

/// Render the card: the next photo dimmed in the background, the
/// current photo on top, shifted by the drag offset.
pub fn view(
    state: &CardState,
    current: Option<image::Handle>,
    next: Option<image::Handle>,
    caption: String,
    disabled: bool,
) -> Element<'static, Message> {
    let mut layers = stack![];

    if let Some(handle) = next {
        layers = layers.push(
            container(image(handle).opacity(0.15).width(Length::Fill))
                .center(Length::Fill)
                .padding(40),
        );
    }

    let photo: Element<'static, Message> = match current {
        Some(handle) => image(handle)
            .opacity(state.opacity())
            .width(Length::Fill)
            .into(),
        // Unresolvable image: placeholder instead of a crash
        None => container(text("📷").size(64)).center(Length::Fill).into(),
    };

    let offset = state.offset();
    let drag_padding = Padding {
        top: 0.0,
        right: (-offset).max(0.0),
        bottom: 0.0,
        left: offset.max(0.0),
    };

    layers = layers.push(
        container(
            column![photo, text(caption).size(18)]
                .spacing(10)
                .align_x(Alignment::Center),
        )
        .padding(drag_padding)
        .center(Length::Fill),
    );

    let card = container(layers)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(16);

    if disabled {
        card.into()
    } else {
        mouse_area(card)
            .on_press(Message::CardGrabbed)
            .on_release(Message::CardReleased)
            .on_move(Message::CardMoved)
            .on_exit(Message::CardLeft)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(state: &mut CardState, start: Instant, from_x: f32, to_x: f32, hold: Duration) {
        state.cursor_moved(Point::new(from_x, 0.0));
        state.grabbed(start);
        state.cursor_moved(Point::new(to_x, 0.0));
        state.released(start + hold);
    }

    #[test]
    fn test_tiny_drag_snaps_back() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        drag(&mut state, t0, 100.0, 110.0, Duration::from_millis(300));
        assert!(state.is_animating());

        // Snap-back never emits a decision
        let result = state.tick(t0 + Duration::from_millis(600));
        assert_eq!(result, None);
        assert!(!state.is_animating());
        assert_eq!(state.offset(), 0.0);
    }

    #[test]
    fn test_long_drag_right_emits_like() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        drag(&mut state, t0, 100.0, 250.0, Duration::from_millis(400));
        assert!(state.is_animating());

        // Mid-animation: no decision yet, card is on its way out
        assert_eq!(state.tick(t0 + Duration::from_millis(450)), None);
        assert!(state.offset() > 0.0);

        let result = state.tick(t0 + Duration::from_millis(700));
        assert_eq!(result, Some(SwipeDirection::Right));
        // Decision is emitted exactly once
        assert_eq!(state.tick(t0 + Duration::from_millis(800)), None);
    }

    #[test]
    fn test_long_drag_left_emits_dislike() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        drag(&mut state, t0, 300.0, 120.0, Duration::from_millis(400));
        let result = state.tick(t0 + Duration::from_millis(700));
        assert_eq!(result, Some(SwipeDirection::Left));
    }

    #[test]
    fn test_fast_flick_completes_below_distance_threshold() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        // 60 px in 40 ms: under the distance threshold, over the
        // velocity threshold
        drag(&mut state, t0, 100.0, 160.0, Duration::from_millis(40));
        let result = state.tick(t0 + Duration::from_millis(300));
        assert_eq!(result, Some(SwipeDirection::Right));
    }

    #[test]
    fn test_cancel_resets_without_decision() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        state.cursor_moved(Point::new(100.0, 0.0));
        state.grabbed(t0);
        state.cursor_moved(Point::new(280.0, 0.0));
        state.cancelled(t0 + Duration::from_millis(100));

        assert!(state.is_animating());
        assert_eq!(state.tick(t0 + Duration::from_millis(400)), None);
        assert_eq!(state.offset(), 0.0);
    }

    #[test]
    fn test_reset_clears_a_running_fling() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        drag(&mut state, t0, 100.0, 300.0, Duration::from_millis(200));
        state.reset();

        assert!(!state.is_animating());
        assert_eq!(state.tick(t0 + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_opacity_fades_with_travel() {
        let mut state = CardState::new();
        let t0 = Instant::now();

        assert_eq!(state.opacity(), 1.0);

        state.cursor_moved(Point::new(0.0, 0.0));
        state.grabbed(t0);
        state.cursor_moved(Point::new(100.0, 0.0));
        assert_eq!(state.opacity(), 0.5);

        // Clamped at 50% no matter how far the drag goes
        state.cursor_moved(Point::new(500.0, 0.0));
        assert_eq!(state.opacity(), 0.5);
    }
}
