//! Procedural line icons. Every recipe is written in fractions of the icon
//! box, so the same icon scales to any size.

use crate::layout::text::PT_TO_UNIT;
use crate::layout::{Point, Rect};
use crate::surface::{DrawMode, Surface, TextAlign, polyline};
use crate::theme::{Font, Rgb};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconKind {
    File,
    People,
    Currency,
    Check,
    Clock,
    Trend,
}

/// Maps fractional icon coordinates into the icon box.
struct IconBox {
    origin: Point,
    size: f32,
}

impl IconBox {
    fn at(&self, fx: f32, fy: f32) -> Point {
        Point::new(self.origin.x + fx * self.size, self.origin.y + fy * self.size)
    }

    fn len(&self, fraction: f32) -> f32 {
        fraction * self.size
    }
}

/// Draws `kind` inside the square box at `origin` with side `size`.
/// `currency_symbol` is only used by [`IconKind::Currency`].
pub fn draw_icon(
    surface: &mut dyn Surface,
    origin: Point,
    size: f32,
    kind: IconKind,
    color: Rgb,
    currency_symbol: &str,
) {
    if !size.is_finite() || size <= 0.0 {
        return;
    }
    let ib = IconBox { origin, size };
    surface.set_stroke_color(color);
    surface.set_fill_color(color);
    surface.set_line_width((size * 0.07).max(0.15));

    match kind {
        IconKind::File => {
            let body = Rect::new(
                ib.at(0.2, 0.1).x,
                ib.at(0.2, 0.1).y,
                ib.len(0.6),
                ib.len(0.8),
            );
            surface.rounded_rect(body, ib.len(0.08), DrawMode::Stroke);
            for fy in [0.3, 0.5, 0.7] {
                surface.line(ib.at(0.32, fy), ib.at(0.68, fy));
            }
        }
        IconKind::People => {
            surface.circle(ib.at(0.38, 0.3), ib.len(0.13), DrawMode::Stroke);
            surface.circle(ib.at(0.66, 0.36), ib.len(0.1), DrawMode::Stroke);
            surface.ellipse(ib.at(0.38, 0.72), ib.len(0.22), ib.len(0.15), DrawMode::Stroke);
            surface.ellipse(ib.at(0.68, 0.74), ib.len(0.17), ib.len(0.12), DrawMode::Stroke);
        }
        IconKind::Currency => {
            surface.line(ib.at(0.5, 0.08), ib.at(0.5, 0.92));
            surface.set_font(Font::bold(ib.len(0.72) / PT_TO_UNIT));
            surface.text(currency_symbol, ib.at(0.5, 0.74), TextAlign::Center);
        }
        IconKind::Check => {
            surface.circle(ib.at(0.5, 0.5), ib.len(0.42), DrawMode::Stroke);
            polyline(
                surface,
                &[ib.at(0.25, 0.5), ib.at(0.4, 0.65), ib.at(0.75, 0.35)],
            );
        }
        IconKind::Clock => {
            let center = ib.at(0.5, 0.5);
            surface.circle(center, ib.len(0.42), DrawMode::Stroke);
            // Hour hand towards ten o'clock, minute hand straight up.
            surface.line(center, center.polar(ib.len(0.2), -PI * 5.0 / 6.0));
            surface.line(center, center.polar(ib.len(0.3), -PI / 2.0));
        }
        IconKind::Trend => {
            let tip = ib.at(0.9, 0.2);
            polyline(
                surface,
                &[ib.at(0.1, 0.55), ib.at(0.35, 0.75), ib.at(0.6, 0.45), tip],
            );
            surface.line(tip, ib.at(0.68, 0.2));
            surface.line(tip, ib.at(0.9, 0.42));
        }
    }
}
