use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_annotator_core::{
    ActorKind, AnnotationSession, AnnotatorConfig, Color, ContentStreamWriter, NoPreview,
    PageCommands, PageSize, ShapeKind, StaticPages, TextPrompt, ViewPoint,
};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "pdf-annotator")]
#[command(about = "Replay annotation gestures and print the resulting draw commands")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a JSON gesture script and print the export.
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the actor kind to color table as JSON.
    Palette,
    /// Print CLI version.
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Draw commands as JSON
    Json,
    /// PDF content-stream operators per page
    ContentStream,
}

/// A gesture script: the document's page sizes and the UI events to replay
#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    pages: Vec<PageSize>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    CreateActor {
        name: String,
        kind: String,
    },
    SelectActor {
        name: String,
    },
    /// `tool` omitted or null deselects
    SelectTool {
        #[serde(default)]
        tool: Option<ShapeKind>,
    },
    Down {
        x: f32,
        y: f32,
    },
    Move {
        x: f32,
        y: f32,
    },
    /// `text` answers the text prompt; omitted means the prompt was cancelled
    Up {
        x: f32,
        y: f32,
        #[serde(default)]
        text: Option<String>,
    },
    Undo,
    ZoomIn,
    ZoomOut,
    SetZoom {
        factor: f32,
    },
    NextPage,
    PrevPage,
    GoToPage {
        page: usize,
    },
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    pages: Vec<PageCommands>,
}

#[derive(Debug, Serialize)]
struct PaletteEntry {
    kind: String,
    color: Color,
}

/// Prompt answer taken from the `up` step being replayed
struct ScriptedPrompt(Option<String>);

impl TextPrompt for ScriptedPrompt {
    fn prompt_text(&mut self, _kind: ShapeKind) -> Option<String> {
        self.0.take()
    }
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    match cli.command {
        Commands::Replay { script, format } => {
            let config = load_config(cli.config.as_deref())?;
            run_replay(&script, format, config)
        }
        Commands::Palette => run_palette(),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AnnotatorConfig> {
    let config = match path {
        Some(path) => AnnotatorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?
            .with_env_overrides()?,
        None => AnnotatorConfig::from_env()?,
    };
    Ok(config)
}

fn run_replay(path: &Path, format: OutputFormat, config: AnnotatorConfig) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read script {}", path.display()))?;
    let script: Script = serde_json::from_slice(&bytes).context("failed to parse script")?;

    let mut session = AnnotationSession::new(config)?;
    if !script.pages.is_empty() {
        session.open_document(StaticPages::new(script.pages.clone()), &mut NoPreview);
    }

    for (index, step) in script.steps.into_iter().enumerate() {
        apply_step(&mut session, step).with_context(|| format!("step {index} failed"))?;
    }

    match format {
        OutputFormat::Json => {
            let payload = ReplayOutput {
                pages: session.export(),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::ContentStream => {
            let mut writer = ContentStreamWriter::new(script.pages);
            session
                .export_to(&mut writer)
                .context("failed to render content stream")?;
            for (page, stream) in writer.into_streams() {
                println!("% page {page}");
                print!("{stream}");
            }
        }
    }

    Ok(())
}

fn apply_step(session: &mut AnnotationSession, step: Step) -> Result<()> {
    tracing::trace!(?step, "replaying step");
    match step {
        Step::CreateActor { name, kind } => {
            session.create_actor(&name, ActorKind::from_label(&kind))?;
        }
        Step::SelectActor { name } => {
            let id = session
                .actors()
                .find_by_name(&name)
                .map(|actor| actor.id())
                .with_context(|| format!("no actor named {name:?}"))?;
            session.select_actor(id)?;
        }
        Step::SelectTool { tool } => session.select_tool(tool),
        Step::Down { x, y } => {
            session.pointer_down(ViewPoint::new(x, y), &mut NoPreview);
        }
        Step::Move { x, y } => {
            session.pointer_move(ViewPoint::new(x, y), &mut NoPreview);
        }
        Step::Up { x, y, text } => {
            session.pointer_up(ViewPoint::new(x, y), &mut ScriptedPrompt(text), &mut NoPreview);
        }
        Step::Undo => {
            session.undo();
        }
        Step::ZoomIn => {
            session.zoom_in();
        }
        Step::ZoomOut => {
            session.zoom_out();
        }
        Step::SetZoom { factor } => {
            session.set_zoom(factor)?;
        }
        Step::NextPage => {
            session.next_page();
        }
        Step::PrevPage => {
            session.prev_page();
        }
        Step::GoToPage { page } => session.go_to_page(page)?,
    }
    Ok(())
}

fn run_palette() -> Result<()> {
    let mut entries: Vec<PaletteEntry> = ActorKind::palette()
        .iter()
        .map(|kind| PaletteEntry {
            kind: kind.label().to_string(),
            color: kind.color(),
        })
        .collect();
    entries.push(PaletteEntry {
        kind: "Custom".to_string(),
        color: pdf_annotator_core::FALLBACK_COLOR,
    });

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
