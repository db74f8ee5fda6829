use crate::theme::{Font, NumberFormat, Rgb, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub gap: f32,
    pub header_height: f32,
    pub footer_height: f32,
    pub line_width: f32,
    pub card_height: f32,
    pub card_radius: f32,
    pub card_padding: f32,
    pub badge_opacity: f32,
    pub panel_radius: f32,
    pub shadow_offsets: [f32; 2],
    pub shadow_opacities: [f32; 2],
    pub chart_title_height: f32,
    pub chart_padding: f32,
    pub arc_subdivisions: usize,
    pub donut_inner_ratio: f32,
    pub legend_row_height: f32,
    pub bar_row_height: f32,
    pub bar_thickness: f32,
    pub gantt_row_height: f32,
    pub table_row_height: f32,
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 14.0,
            gap: 5.0,
            header_height: 16.0,
            footer_height: 8.0,
            line_width: 0.3,
            card_height: 30.0,
            card_radius: 2.5,
            card_padding: 4.0,
            badge_opacity: 0.12,
            panel_radius: 3.0,
            shadow_offsets: [0.5, 1.0],
            shadow_opacities: [0.05, 0.03],
            chart_title_height: 9.0,
            chart_padding: 5.0,
            arc_subdivisions: 30,
            donut_inner_ratio: 0.58,
            legend_row_height: 4.2,
            bar_row_height: 8.0,
            bar_thickness: 3.2,
            gantt_row_height: 7.0,
            table_row_height: 7.0,
            fast_text_metrics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Leading part of every output filename and the footer brand.
    pub product_prefix: String,
    pub output_dir: PathBuf,
    /// Pixels per layout unit when rasterizing pages to PNG.
    pub png_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            product_prefix: "Report".to_string(),
            output_dir: PathBuf::from("."),
            png_scale: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    primary_color: Option<Rgb>,
    primary_dark_color: Option<Rgb>,
    success_color: Option<Rgb>,
    warning_color: Option<Rgb>,
    danger_color: Option<Rgb>,
    info_color: Option<Rgb>,
    accent_color: Option<Rgb>,
    text_color: Option<Rgb>,
    muted_text_color: Option<Rgb>,
    border_color: Option<Rgb>,
    panel_color: Option<Rgb>,
    background: Option<Rgb>,
    track_color: Option<Rgb>,
    title_font_size: Option<f32>,
    body_font_size: Option<f32>,
    number_format: Option<NumberFormat>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfig>,
    render: Option<RenderConfig>,
}

/// Loads a JSON (or JSON5) config file over the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("invalid config {}: {err}", path.display()))?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = match theme_name {
            "corporate" | "default" => Theme::corporate(),
            "slate" => Theme::slate(),
            other => {
                tracing::warn!(theme = other, "unknown theme preset, keeping default");
                Theme::corporate()
            }
        };
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }
    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }

    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    let palette = &mut theme.palette;
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.primary_color {
        palette.primary = v;
    }
    if let Some(v) = vars.primary_dark_color {
        palette.primary_dark = v;
    }
    if let Some(v) = vars.success_color {
        palette.success = v;
    }
    if let Some(v) = vars.warning_color {
        palette.warning = v;
    }
    if let Some(v) = vars.danger_color {
        palette.danger = v;
    }
    if let Some(v) = vars.info_color {
        palette.info = v;
    }
    if let Some(v) = vars.accent_color {
        palette.accent = v;
    }
    if let Some(v) = vars.text_color {
        palette.text = v;
    }
    if let Some(v) = vars.muted_text_color {
        palette.text_muted = v;
    }
    if let Some(v) = vars.border_color {
        palette.border = v;
    }
    if let Some(v) = vars.panel_color {
        palette.panel = v;
    }
    if let Some(v) = vars.background {
        palette.background = v;
    }
    if let Some(v) = vars.track_color {
        palette.track = v;
    }
    if let Some(size) = vars.title_font_size {
        theme.title_font = Font::bold(size);
    }
    if let Some(size) = vars.body_font_size {
        theme.body_font = Font::regular(size);
    }
    if let Some(v) = vars.number_format {
        theme.number_format = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("report-rs-renderer-config-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn no_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.arc_subdivisions, 30);
        assert_eq!(config.render.product_prefix, "Report");
    }

    #[test]
    fn partial_layout_keeps_other_defaults() {
        let path = write_temp(
            "partial.json5",
            r##"{
                // comments are allowed
                theme: "slate",
                themeVariables: { primaryColor: "#FF0000" },
                layout: { margin: 10 },
                render: { productPrefix: "Lexa" },
            }"##,
        );
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout.margin, 10.0);
        assert_eq!(config.layout.page_width, 210.0);
        assert_eq!(config.theme.palette.primary, Rgb::new(255, 0, 0));
        assert_eq!(config.theme.palette.track, Theme::slate().palette.track);
        assert_eq!(config.render.product_prefix, "Lexa");
    }

    #[test]
    fn bad_color_is_rejected() {
        let path = write_temp(
            "bad-color.json",
            r#"{ "themeVariables": { "primaryColor": "blue" } }"#,
        );
        assert!(load_config(Some(&path)).is_err());
    }
}
