use crate::color::{self, channel, Color};
use crate::view::HighlightType;

pub fn highlight_color(highlight: HighlightType, amount: f64) -> Color {
    match highlight {
        HighlightType::Build => color::YELLOW.with_alpha(170),
        HighlightType::RectSelection => color::YELLOW.with_alpha(90),
        HighlightType::Fog => color::WHITE.with_alpha(channel(120.0 * amount)),
        HighlightType::PoisonGas => Color::rgba(
            0,
            channel((500.0 * amount).min(255.0)),
            0,
            channel(140.0 * amount),
        ),
        HighlightType::Memory => color::BLACK.with_alpha(80),
        HighlightType::Night => color::NIGHT_BLUE.with_alpha(channel(160.0 * amount)),
        HighlightType::Efficiency => Color::rgba(255, 0, 0, channel(120.0 * (1.0 - amount))),
    }
}
