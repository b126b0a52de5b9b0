use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use newsprint::{
    Composition, DirectorySink, EditorSession, ExportOpts, Exporter, Field, FieldKind,
};
use tracing_subscriber::EnvFilter;

const EXPORT_FAILURE_NOTICE: &str = "Failed to download image. Please try again.";

#[derive(Parser, Debug)]
#[command(name = "newsprint", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the live preview of an article.
    Preview(PreviewArgs),
    /// Export the article as a JPEG.
    Export(ExportArgs),
    /// List editable fields with their defaults and declared ranges.
    Fields,
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Field assignment, e.g. `--set heading="Breaking News"`. Applied in order.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Image file to embed.
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    edit: EditArgs,

    /// Print the live composition state as JSON instead of the preview.
    #[arg(long, default_value_t = false)]
    state: bool,

    /// Print the preview tree as JSON instead of the outline.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    edit: EditArgs,

    /// Directory the JPEG is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Device pixels per CSS pixel.
    #[arg(long, default_value_t = 2.0)]
    scale: f32,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 95)]
    quality: u8,

    /// Preview column width in CSS pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Font file preferred over system fonts.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
        Command::Fields => cmd_fields(),
    }
}

fn build_session(args: &EditArgs) -> anyhow::Result<EditorSession> {
    let mut session = EditorSession::new();
    for assignment in &args.set {
        session
            .apply_assignment(assignment)
            .with_context(|| format!("apply --set {assignment}"))?;
    }
    session.load_image(args.image.as_deref())?;
    Ok(session)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<ExitCode> {
    let session = build_session(&args.edit)?;
    if args.state {
        println!("{}", session.state().to_json_pretty()?);
    } else if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(session.preview()).context("serialize preview")?
        );
    } else {
        print!("{}", session.outline());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<ExitCode> {
    let session = build_session(&args.edit)?;
    let opts = ExportOpts::default()
        .with_scale(args.scale)
        .with_jpeg_quality(args.quality)
        .with_viewport_width(args.width)
        .with_font_path(args.font);

    let mut sink = DirectorySink::new(&args.out_dir);
    let result = Exporter::new(opts).and_then(|mut exporter| session.export(&mut exporter, &mut sink));
    match result {
        Ok(artifact) => {
            println!("{}", args.out_dir.join(&artifact.file_name).display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            eprintln!("{EXPORT_FAILURE_NOTICE}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_fields() -> anyhow::Result<ExitCode> {
    let defaults = Composition::default();
    for field in Field::ALL {
        let kind = match field.kind() {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Color => "color",
            FieldKind::Choice => "choice",
        };
        let mut line = format!("{:<18} {:<6} default={:?}", field.name(), kind, field.value_in(&defaults));
        if let Some(r) = field.range() {
            line.push_str(&format!(" range={}..={}", r.min, r.max));
        }
        println!("{line}");
    }
    println!("{:<18} {:<6} (use --image PATH)", "image", "file");
    Ok(ExitCode::SUCCESS)
}
