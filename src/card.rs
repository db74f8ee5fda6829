use crate::config::LayoutConfig;
use crate::elevation::draw_panel;
use crate::icon::{IconKind, draw_icon};
use crate::layout::text::truncate_to_width;
use crate::layout::{Point, Rect};
use crate::surface::{DrawMode, OpacityScope, Surface, TextAlign, styled_text};
use crate::theme::{ColorToken, Theme};

/// One metric tile.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSpec {
    pub value: String,
    pub title: String,
    pub subtitle: String,
    pub icon: IconKind,
    pub color: ColorToken,
}

impl CardSpec {
    pub fn new(
        title: impl Into<String>,
        value: impl Into<String>,
        subtitle: impl Into<String>,
        icon: IconKind,
        color: ColorToken,
    ) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
            subtitle: subtitle.into(),
            icon,
            color,
        }
    }
}

// Baselines as fractions of the card height.
const BADGE_CENTER_Y: f32 = 0.36;
const BADGE_RADIUS: f32 = 0.17;
const TITLE_BASELINE: f32 = 0.3;
const VALUE_BASELINE: f32 = 0.6;
const SUBTITLE_BASELINE: f32 = 0.86;

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub badge_center: Point,
    pub badge_radius: f32,
    pub icon_origin: Point,
    pub icon_size: f32,
    pub text_x: f32,
    pub text_width: f32,
    pub title_y: f32,
    pub value_y: f32,
    pub subtitle_x: f32,
    pub subtitle_y: f32,
    pub subtitle_width: f32,
}

pub fn compute_card_layout(rect: Rect, config: &LayoutConfig) -> CardLayout {
    let pad = config.card_padding;
    let badge_radius = (rect.height * BADGE_RADIUS).min(rect.width * 0.12).max(0.0);
    let badge_center = Point::new(
        rect.x + pad + badge_radius,
        rect.y + rect.height * BADGE_CENTER_Y,
    );
    let icon_size = badge_radius * 1.2;
    let text_x = badge_center.x + badge_radius + pad * 0.75;
    CardLayout {
        badge_center,
        badge_radius,
        icon_origin: badge_center.offset(-icon_size / 2.0, -icon_size / 2.0),
        icon_size,
        text_x,
        text_width: (rect.right() - pad - text_x).max(0.0),
        title_y: rect.y + rect.height * TITLE_BASELINE,
        value_y: rect.y + rect.height * VALUE_BASELINE,
        subtitle_x: rect.x + pad,
        subtitle_y: rect.y + rect.height * SUBTITLE_BASELINE,
        subtitle_width: (rect.width - pad * 2.0).max(0.0),
    }
}

pub fn draw_card(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    rect: Rect,
    spec: &CardSpec,
) {
    let layout = compute_card_layout(rect, config);
    let accent = theme.color(spec.color);
    draw_panel(surface, theme, config, rect, config.card_radius);

    {
        let mut badge = OpacityScope::new(&mut *surface, config.badge_opacity);
        badge.set_fill_color(accent);
        badge.circle(layout.badge_center, layout.badge_radius, DrawMode::Fill);
    }
    draw_icon(
        surface,
        layout.icon_origin,
        layout.icon_size,
        spec.icon,
        accent,
        &theme.number_format.currency_symbol,
    );

    let muted = theme.color(ColorToken::TextMuted);
    let title = truncate_to_width(&spec.title, layout.text_width, theme.caption_font, theme, config);
    styled_text(
        surface,
        &title,
        Point::new(layout.text_x, layout.title_y),
        TextAlign::Left,
        theme.caption_font,
        muted,
    );
    let value = truncate_to_width(&spec.value, layout.text_width, theme.value_font, theme, config);
    styled_text(
        surface,
        &value,
        Point::new(layout.text_x, layout.value_y),
        TextAlign::Left,
        theme.value_font,
        theme.color(ColorToken::Text),
    );
    let subtitle = truncate_to_width(
        &spec.subtitle,
        layout.subtitle_width,
        theme.small_font,
        theme,
        config,
    );
    styled_text(
        surface,
        &subtitle,
        Point::new(layout.subtitle_x, layout.subtitle_y),
        TextAlign::Left,
        theme.small_font,
        muted,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn spec() -> CardSpec {
        CardSpec::new(
            "Active cases",
            "1,284",
            "+12% vs previous period",
            IconKind::File,
            ColorToken::Primary,
        )
    }

    #[test]
    fn baselines_scale_with_card_height() {
        let config = LayoutConfig::default();
        let small = compute_card_layout(Rect::new(0.0, 0.0, 60.0, 30.0), &config);
        let tall = compute_card_layout(Rect::new(0.0, 0.0, 60.0, 60.0), &config);
        assert!((small.value_y / 30.0 - tall.value_y / 60.0).abs() < 1e-5);
        assert!(small.title_y < small.value_y && small.value_y < small.subtitle_y);
    }

    #[test]
    fn draw_order_is_shadow_panel_badge_icon_text() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let mut surface = RecordingSurface::new();
        draw_card(&mut surface, &theme, &config, Rect::new(14.0, 40.0, 58.0, 30.0), &spec());

        let cmds = surface.commands();
        let first_rect = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::RoundedRect { .. }))
            .unwrap();
        let badge = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { mode: DrawMode::Fill, .. }))
            .unwrap();
        let first_text = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::Text { .. }))
            .unwrap();
        assert!(first_rect < badge && badge < first_text);
        assert_eq!(surface.texts(), vec!["Active cases", "1,284", "+12% vs previous period"]);
        assert_eq!(surface.opacity(), 1.0);
    }

    #[test]
    fn long_values_are_truncated() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let mut surface = RecordingSurface::new();
        let mut card = spec();
        card.value = "$ 123,456,789,012.00 and a lot more text".to_string();
        draw_card(&mut surface, &theme, &config, Rect::new(0.0, 0.0, 40.0, 30.0), &card);
        assert!(surface.texts()[1].ends_with('\u{2026}'));
    }
}
