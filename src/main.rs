use iced::widget::{button, column, container, row, stack, text};
use iced::{Alignment, Element, Length, Point, Subscription, Task, Theme};
use std::path::Path;
use std::time::{Duration, Instant};

mod state;
mod ui;

use state::data::{self, ImageDirectory, NameDirectory};
use state::session::{Screen, Session};
use state::store::RatingStore;
use ui::card::{CardState, SwipeDirection};
use ui::confetti::ConfettiBurst;

/// Splash screen duration before the initial shuffle appears
const SPLASH_DURATION: Duration = Duration::from_millis(800);
/// Initial loading screen and periodic break screen duration
const BREAK_DURATION: Duration = Duration::from_millis(2000);
/// Auto-dismiss delay for the feedback notice
const NOTICE_DURATION: Duration = Duration::from_millis(2500);

/// Animation tick rate while anything is moving on screen
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Main application state
struct WildWatch {
    /// The sequencing and rating core
    session: Session,
    /// Species tag → display name
    names: NameDirectory,
    /// Photo ID → image file
    images: ImageDirectory,
    /// Drag/fling state of the card on screen
    card: CardState,
    /// Live celebration burst, if one is running
    confetti: Option<ConfettiBurst>,
    /// When the current screen phase (splash/loading/break) began
    phase_started: Instant,
    /// When the feedback notice appeared, while it is up
    notice_since: Option<Instant>,
    /// Last observed tick, so `view` never has to look at the clock
    now: Instant,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Shared animation/timer tick
    Tick(Instant),
    /// Like button tapped
    LikePressed,
    /// Dislike button tapped
    DislikePressed,
    /// Pointer went down on the card
    CardGrabbed,
    /// Pointer moved over the card
    CardMoved(Point),
    /// Pointer released the card
    CardReleased,
    /// Pointer left the card mid-drag
    CardLeft,
}

impl WildWatch {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let catalog = data::load_catalog(data::CATALOG_JSON).unwrap_or_else(|e| {
            eprintln!("⚠️  Could not parse the photo catalog: {}", e);
            Vec::new()
        });
        let names = NameDirectory::from_json(data::NAMES_JSON).unwrap_or_else(|e| {
            eprintln!("⚠️  Could not parse the name list: {}", e);
            NameDirectory::empty()
        });
        let images = ImageDirectory::scan(Path::new("assets/animals"));

        // The store wipes itself on open; ratings never survive a restart
        let store = RatingStore::open();

        println!("🦊 WildWatch initialized with {} photos", catalog.len());

        let session = Session::new(catalog, store, Box::new(rand::thread_rng()));
        let now = Instant::now();

        (
            WildWatch {
                session,
                names,
                images,
                card: CardState::new(),
                confetti: None,
                phase_started: now,
                notice_since: None,
                now,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick(now) => self.tick(now),
            Message::LikePressed => self.decide(SwipeDirection::Right),
            Message::DislikePressed => self.decide(SwipeDirection::Left),
            Message::CardGrabbed => {
                if !self.session.input_disabled() {
                    self.card.grabbed(Instant::now());
                }
            }
            Message::CardMoved(position) => self.card.cursor_moved(position),
            Message::CardReleased => self.card.released(Instant::now()),
            Message::CardLeft => self.card.cancelled(Instant::now()),
        }

        Task::none()
    }

    /// Advance every running timer and animation to `now`.
    fn tick(&mut self, now: Instant) {
        self.now = now;
        let elapsed = now.duration_since(self.phase_started);

        match self.session.screen() {
            Screen::Splash if elapsed >= SPLASH_DURATION => {
                self.session.on_splash_complete();
                self.phase_started = now;
            }
            Screen::Loading if elapsed >= BREAK_DURATION => {
                self.session.on_loading_complete();
                self.card.reset();
                self.phase_started = now;
            }
            Screen::Break if elapsed >= BREAK_DURATION => {
                self.session.on_break_complete();
                self.card.reset();
                self.phase_started = now;
            }
            _ => {}
        }

        if let Some(shown_at) = self.notice_since {
            if now.duration_since(shown_at) >= NOTICE_DURATION {
                self.session.on_notice_dismissed();
                self.notice_since = None;
                self.card.reset();
            }
        }

        // The fling animation delivers the decision once it is done
        if let Some(direction) = self.card.tick(now) {
            self.decide(direction);
        }

        if let Some(burst) = &mut self.confetti {
            burst.tick(now);
            if burst.is_finished() {
                self.confetti = None;
            }
        }
    }

    /// Apply a rating decision from either the buttons or a swipe.
    fn decide(&mut self, direction: SwipeDirection) {
        if self.session.input_disabled() {
            return;
        }

        match direction {
            SwipeDirection::Right => {
                if self.session.on_like() {
                    self.confetti = Some(ConfettiBurst::spawn(
                        &mut rand::thread_rng(),
                        Instant::now(),
                    ));
                }
            }
            SwipeDirection::Left => {
                self.session.on_dislike();
                if self.session.notice_visible() && self.notice_since.is_none() {
                    self.notice_since = Some(Instant::now());
                }
            }
        }

        // A batch may just have completed; the break screen timer
        // starts counting from this decision
        if self.session.screen() == Screen::Break {
            self.phase_started = Instant::now();
            self.notice_since = None;
        }

        self.card.reset();
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        match self.session.screen() {
            Screen::Splash => {
                let progress = self.phase_elapsed() / SPLASH_DURATION.as_secs_f32();
                ui::splash::view(progress)
            }
            Screen::Loading | Screen::Break => ui::break_screen::view(self.phase_elapsed()),
            Screen::Viewing => self.viewing(),
        }
    }

    fn phase_elapsed(&self) -> f32 {
        self.now.duration_since(self.phase_started).as_secs_f32()
    }

    /// The main rating screen: header, card, action buttons, plus the
    /// notice and confetti overlays when active.
    fn viewing(&self) -> Element<'_, Message> {
        let Some(current) = self.session.current() else {
            // Empty catalog: stay on a quiet loading state
            return container(text("Lade Fotos...").size(16))
                .center(Length::Fill)
                .into();
        };

        let current_handle = self.image_handle(current.id);
        let caption = self.names.display_name(&current.label).to_string();
        let next_handle = self
            .session
            .next_preview()
            .and_then(|entry| self.image_handle(entry.id));

        let disabled = self.session.input_disabled();
        let card = ui::card::view(&self.card, current_handle, next_handle, caption, disabled);

        let base = column![header(), card, action_buttons(disabled)]
            .width(Length::Fill)
            .height(Length::Fill);

        let mut layers = stack![base];

        if self.session.notice_visible() {
            let progress = self
                .notice_since
                .map(|shown_at| {
                    self.now.duration_since(shown_at).as_secs_f32()
                        / NOTICE_DURATION.as_secs_f32()
                })
                .unwrap_or(0.0);
            layers = layers.push(ui::toast::view(progress));
        }

        if let Some(burst) = &self.confetti {
            layers = layers.push(
                iced::widget::canvas(burst)
                    .width(Length::Fill)
                    .height(Length::Fill),
            );
        }

        layers.into()
    }

    fn image_handle(&self, id: u32) -> Option<iced::widget::image::Handle> {
        self.images
            .resolve(id)
            .map(iced::widget::image::Handle::from_path)
    }

    /// Tick only while something on screen is actually moving.
    fn subscription(&self) -> Subscription<Message> {
        let animating = self.session.screen() != Screen::Viewing
            || self.session.notice_visible()
            || self.card.is_animating()
            || self.confetti.is_some();

        if animating {
            iced::time::every(TICK_INTERVAL).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn header() -> Element<'static, Message> {
    container(
        row![text("🦊").size(22), text("WildWatch").size(20)]
            .spacing(10)
            .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(14)
    .into()
}

fn action_buttons(disabled: bool) -> Element<'static, Message> {
    let dislike = button(text("✕").size(26))
        .padding([10, 24])
        .on_press_maybe((!disabled).then_some(Message::DislikePressed));
    let like = button(text("♥").size(26))
        .padding([10, 24])
        .on_press_maybe((!disabled).then_some(Message::LikePressed));

    container(
        row![dislike, like]
            .spacing(40)
            .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .align_x(Alignment::Center)
    .padding(24)
    .into()
}

fn main() -> iced::Result {
    iced::application("WildWatch", WildWatch::update, WildWatch::view)
        .subscription(WildWatch::subscription)
        .theme(WildWatch::theme)
        .window_size((430.0, 780.0))
        .centered()
        .run_with(WildWatch::new)
}
