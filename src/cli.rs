use crate::config::{Config, load_config};
use crate::report::ReportAssembler;
use crate::snapshot::{ReportFilters, ReportSnapshot};
use crate::surface::{PdfSurface, RecordingSurface, Surface, SvgSurface};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "rrpt",
    version,
    about = "Render an analytics snapshot into a fixed-layout report"
)]
pub struct Args {
    /// Snapshot JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Directory the report is written into (defaults to render.outputDir)
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "format", value_enum, default_value = "pdf")]
    pub format: OutputFormat,

    /// Config JSON file (theme preset, themeVariables, layout, render)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Period caption shown on every page
    #[arg(long = "period", default_value = "All periods")]
    pub period: String,

    /// Jurisdiction caption shown on every page
    #[arg(long = "jurisdiction", default_value = "All jurisdictions")]
    pub jurisdiction: String,

    /// Product prefix for the file name and footer
    #[arg(long = "prefix")]
    pub prefix: Option<String>,

    /// More logging (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Svg,
    Png,
    /// Draw-command dump
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(prefix) = &args.prefix {
        config.render.product_prefix = prefix.clone();
    }
    let out_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| config.render.output_dir.clone());

    let input = read_input(args.input.as_deref())?;
    let snapshot = ReportSnapshot::from_json(&input)?;
    let filters = ReportFilters::new(args.period.clone(), args.jurisdiction.clone());
    let surface = build_surface(args.format, &config)?;

    let assembler = ReportAssembler::new(config);
    let timestamp = chrono::Local::now().naive_local();
    let report = assembler.generate(
        surface,
        &snapshot,
        &filters,
        &out_dir,
        timestamp,
        args.format.extension(),
    )?;
    for path in &report.paths {
        println!("{}", path.display());
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn build_surface(format: OutputFormat, config: &Config) -> Result<Box<dyn Surface>> {
    let layout = &config.layout;
    let theme = &config.theme;
    let surface: Box<dyn Surface> = match format {
        OutputFormat::Pdf => {
            let title = format!("{} Analytics", config.render.product_prefix);
            Box::new(PdfSurface::new(&title, theme, layout)?)
        }
        OutputFormat::Svg => Box::new(SvgSurface::new(
            layout.page_width,
            layout.page_height,
            &theme.font_family,
        )),
        OutputFormat::Png => Box::new(
            SvgSurface::new(layout.page_width, layout.page_height, &theme.font_family)
                .rasterized(config.render.png_scale),
        ),
        OutputFormat::Json => Box::new(RecordingSurface::new()),
    };
    Ok(surface)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
