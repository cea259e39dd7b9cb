/// Paw-print interstitial
///
/// Shown for the initial shuffle and as the periodic break between
/// rating batches: four paw prints in pine-green tones bouncing in a
/// staggered wave. Drawn on the canvas and animated purely from the
/// elapsed time handed in by the main tick handler.

use iced::widget::canvas::{self, Path};
use iced::widget::{column, container, text};
use iced::{Alignment, Color, Element, Length, Point, Rectangle, Renderer, Theme};

use crate::Message;

/// Pine-green tones, darkest to lightest
const PAW_COLORS: [Color; 4] = [
    Color::from_rgb(0.18, 0.31, 0.09), // #2d5016
    Color::from_rgb(0.24, 0.42, 0.12), // #3d6b1f
    Color::from_rgb(0.30, 0.48, 0.16), // #4d7a28
    Color::from_rgb(0.12, 0.23, 0.06), // #1e3a0f
];

/// Full bounce cycle per paw
const BOUNCE_PERIOD: f32 = 1.2;
/// Stagger between neighboring paws
const BOUNCE_DELAY: f32 = 0.2;

pub fn view(elapsed: f32) -> Element<'static, Message> {
    let content = column![
        iced::widget::canvas(PawPrints { elapsed })
            .width(Length::Fixed(300.0))
            .height(Length::Fixed(90.0)),
        text("Einen Moment...").size(14),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    container(content).center(Length::Fill).into()
}

struct PawPrints {
    elapsed: f32,
}

impl<Message> canvas::Program<Message> for PawPrints {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let slot = bounds.width / PAW_COLORS.len() as f32;

        for (i, color) in PAW_COLORS.iter().enumerate() {
            let phase = (self.elapsed - i as f32 * BOUNCE_DELAY) / BOUNCE_PERIOD;
            // 0..1 bounce wave: faded and small at rest, full and
            // lifted mid-cycle
            let wave = (phase * std::f32::consts::TAU).sin().max(0.0);

            let center = Point::new(
                slot * (i as f32 + 0.5),
                bounds.height * 0.6 - 10.0 * wave,
            );
            let scale = 0.8 + 0.2 * wave;
            let alpha = 0.3 + 0.7 * wave;

            draw_paw(&mut frame, center, scale, Color { a: alpha, ..*color });
        }

        vec![frame.into_geometry()]
    }
}

/// One paw: a main pad below four toe pads.
fn draw_paw(frame: &mut canvas::Frame, center: Point, scale: f32, color: Color) {
    let pads = [
        // (dx, dy, radius) relative to the paw center
        (0.0, 6.0, 11.0),    // main pad
        (-12.0, -10.0, 5.5), // outer left toe
        (0.0, -15.0, 5.5),   // middle toe
        (12.0, -10.0, 5.5),  // outer right toe
        (5.0, -5.0, 4.5),    // inner toe
    ];

    for (dx, dy, radius) in pads {
        let pad = Path::circle(
            Point::new(center.x + dx * scale, center.y + dy * scale),
            radius * scale,
        );
        frame.fill(&pad, color);
    }
}
