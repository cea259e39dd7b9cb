/// UI building blocks layered over the session core
///
/// - card.rs: the swipeable photo card and its drag state machine
/// - splash.rs: branding splash with progress bar
/// - break_screen.rs: paw-print interstitial between rating batches
/// - toast.rs: one-time feedback notice overlay
/// - confetti.rs: celebration burst on the canvas

pub mod break_screen;
pub mod card;
pub mod confetti;
pub mod splash;
pub mod toast;
