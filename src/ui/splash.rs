/// Branding splash shown right after launch
///
/// Purely presentational: a logo mark and a progress bar that fills
/// over the splash duration. The timing itself lives in the main tick
/// handler; this module only renders the given progress.

use iced::widget::{column, container, progress_bar, text};
use iced::{Alignment, Element, Length};

use crate::Message;

pub fn view(progress: f32) -> Element<'static, Message> {
    let content = column![
        text("🦊").size(72),
        text("WildWatch").size(32),
        progress_bar(0.0..=1.0, progress.clamp(0.0, 1.0))
            .width(Length::Fixed(240.0))
            .height(Length::Fixed(6.0)),
    ]
    .spacing(24)
    .align_x(Alignment::Center);

    container(content).center(Length::Fill).into()
}
