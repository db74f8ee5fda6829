use crate::config::LayoutConfig;
use crate::layout::Rect;
use crate::surface::{DrawMode, OpacityScope, Surface};
use crate::theme::{ColorToken, Theme};

/// Soft drop shadow under a rounded panel: offset copies of the shape at low
/// opacity. Must be called before the opaque panel is drawn.
pub fn draw_elevation(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    rect: Rect,
    radius: f32,
) {
    surface.set_fill_color(theme.color(ColorToken::Shadow));
    for (offset, opacity) in config
        .shadow_offsets
        .iter()
        .zip(config.shadow_opacities.iter())
    {
        let mut scoped = OpacityScope::new(&mut *surface, *opacity);
        scoped.rounded_rect(rect.translate(*offset, *offset), radius, DrawMode::Fill);
    }
}

/// Elevation, filled panel and hairline border in one go.
pub fn draw_panel(
    surface: &mut dyn Surface,
    theme: &Theme,
    config: &LayoutConfig,
    rect: Rect,
    radius: f32,
) {
    draw_elevation(surface, theme, config, rect, radius);
    surface.set_fill_color(theme.color(ColorToken::Panel));
    surface.rounded_rect(rect, radius, DrawMode::Fill);
    surface.set_stroke_color(theme.color(ColorToken::Border));
    surface.set_line_width(config.line_width);
    surface.rounded_rect(rect, radius, DrawMode::Stroke);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn shadow_layers_precede_panel_and_restore_opacity() {
        let theme = Theme::corporate();
        let config = LayoutConfig::default();
        let mut surface = RecordingSurface::new();
        let rect = Rect::new(10.0, 10.0, 60.0, 30.0);
        draw_panel(&mut surface, &theme, &config, rect, 2.5);

        let rects: Vec<(Rect, DrawMode)> = surface
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::RoundedRect { rect, mode, .. } => Some((*rect, *mode)),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 4);
        assert_eq!(rects[0].0, rect.translate(0.5, 0.5));
        assert_eq!(rects[1].0, rect.translate(1.0, 1.0));
        assert_eq!(rects[2], (rect, DrawMode::Fill));
        assert_eq!(rects[3], (rect, DrawMode::Stroke));

        let opacities: Vec<f32> = surface
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Opacity { opacity } => Some(*opacity),
                _ => None,
            })
            .collect();
        assert_eq!(opacities, vec![0.05, 1.0, 0.03, 1.0]);
        assert_eq!(surface.opacity(), 1.0);
    }
}
