/// One-time feedback notice overlay
///
/// Shown over the photo card on the first dislike of a visit; a thin
/// progress bar runs down its auto-dismiss duration. The dismissal
/// timer lives in the main tick handler.

use iced::widget::{column, container, progress_bar, text};
use iced::{Alignment, Element, Length};

use crate::Message;

const TITLE: &str = "Danke für dein Feedback";
const BODY: &str =
    "Es hilft uns, unser KI-Modell zu verbessern und mehr Wildtiere zu schützen.";

pub fn view(progress: f32) -> Element<'static, Message> {
    let body = column![
        text(TITLE).size(18),
        text(BODY).size(14),
        progress_bar(0.0..=1.0, progress.clamp(0.0, 1.0))
            .width(Length::Fill)
            .height(Length::Fixed(4.0)),
    ]
    .spacing(10)
    .align_x(Alignment::Center);

    let panel = container(body)
        .padding(16)
        .max_width(360)
        .style(container::rounded_box);

    // Pin to the upper part of the screen, horizontally centered
    container(panel)
        .width(Length::Fill)
        .align_x(Alignment::Center)
        .padding(80)
        .into()
}
