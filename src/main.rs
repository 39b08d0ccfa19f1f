use clap::{Parser, Subcommand, ValueEnum};
use portrait_kit::catalog::{self, CATALOG, OutputSpec};
use portrait_kit::config::{self, ToolConfig};
use portrait_kit::imaging::Anchor;
use portrait_kit::package::{self, BatchOptions, BatchResult, PackageError, ProcessEvent};
use portrait_kit::{output, sources};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup; called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "portrait-kit")]
#[command(about = "Batch-crop photos into standard avatar and hero PNGs")]
#[command(long_about = "\
Batch-crop photos into standard avatar and hero PNGs

Every input photo is cropped to each selected size, resized, and written as
a transparent RGBA PNG. The results are packed into one ZIP.

Sizes (see 'portrait-kit catalog'):

  avatar_256x256   avatar_500x345   hero_1200x1165   hero_1500x920

Naming:

  front.jpg + hero 1500x920  →  front-hero_1500x920.png

Photos taller than the target shape keep their top edge (heads stay in
shot); photos wider than it are trimmed evenly from both sides. A photo
that cannot be read fails on its own; the rest of the batch still ships.

Run 'portrait-kit gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Shared flags for commands that render images.
#[derive(clap::Args, Clone)]
struct RenderArgs {
    /// Photos, or directories to search for photos
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Size to generate, by catalog key (repeatable; default: config sizes)
    #[arg(long = "size", value_name = "KEY")]
    sizes: Vec<String>,

    /// Draw the positioning guide on every image
    #[arg(long)]
    guideline: bool,

    /// Vertical crop anchor (default: config anchor)
    #[arg(long, value_enum)]
    anchor: Option<AnchorArg>,
}

#[derive(ValueEnum, Clone, Copy)]
enum AnchorArg {
    Top,
    Center,
}

impl From<AnchorArg> for Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Top => Anchor::Top,
            AnchorArg::Center => Anchor::Center,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render every selected size for every input and write one ZIP
    Generate {
        #[command(flatten)]
        render: RenderArgs,

        /// Archive path (default: output.archive_name from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a JSON report of generated images and failures
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Render every selected size and write the PNGs into a directory
    Preview {
        #[command(flatten)]
        render: RenderArgs,

        /// Directory to write images into (created if missing)
        #[arg(long)]
        dir: PathBuf,
    },
    /// List the available output sizes
    Catalog,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            render,
            output: archive_out,
            report,
        } => {
            let tool_config = config::load_config(cli.config.as_deref())?;
            let (specs, options) = resolve_render(&render, &tool_config)?;
            init_thread_pool(&tool_config.processing);

            let inputs = sources::load_sources(&render.inputs)?;
            let (tx, printer) = spawn_printer();
            let packaged = package::package(&inputs, &specs, &options, Some(tx));
            join_printer(printer)?;

            let packaged = match packaged {
                Ok(packaged) => packaged,
                Err(PackageError::NothingGenerated { failures }) => {
                    let result = BatchResult {
                        artifacts: Vec::new(),
                        failures,
                    };
                    if let Some(path) = &report {
                        write_report(path, &result)?;
                    }
                    println!();
                    for line in output::format_failures(&result.failures) {
                        println!("{}", line);
                    }
                    return Err(PackageError::NothingGenerated {
                        failures: result.failures,
                    }
                    .into());
                }
                Err(e) => return Err(e.into()),
            };

            let archive_path =
                archive_out.unwrap_or_else(|| PathBuf::from(&tool_config.output.archive_name));
            if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&archive_path, &packaged.archive)?;
            if let Some(path) = &report {
                write_report(path, &packaged.result)?;
            }
            output::print_batch_summary(
                &packaged.result,
                inputs.len(),
                (&archive_path, packaged.archive.len()),
            );
        }
        Command::Preview { render, dir } => {
            let tool_config = config::load_config(cli.config.as_deref())?;
            let (specs, options) = resolve_render(&render, &tool_config)?;
            init_thread_pool(&tool_config.processing);

            let inputs = sources::load_sources(&render.inputs)?;
            let (tx, printer) = spawn_printer();
            let result = package::render_batch(&inputs, &specs, &options, Some(tx));
            join_printer(printer)?;
            let result = result?;

            std::fs::create_dir_all(&dir)?;
            for artifact in &result.artifacts {
                std::fs::write(dir.join(&artifact.name), &artifact.bytes)?;
            }
            output::print_preview_output(&result, &dir);
        }
        Command::Catalog => {
            output::print_catalog(&CATALOG);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Merge CLI flags over the loaded config.
fn resolve_render(
    args: &RenderArgs,
    tool_config: &ToolConfig,
) -> Result<(Vec<OutputSpec>, BatchOptions), Box<dyn std::error::Error>> {
    let specs = if args.sizes.is_empty() {
        tool_config.output.specs()?
    } else {
        let selected = args
            .sizes
            .iter()
            .map(|key| catalog::lookup(key))
            .collect::<Result<Vec<_>, _>>()?;
        catalog::specs_for(&selected)
    };
    let options = BatchOptions {
        show_guideline: args.guideline || tool_config.output.guideline,
        anchor: args
            .anchor
            .map(Anchor::from)
            .unwrap_or(tool_config.output.anchor),
        time_budget: tool_config.processing.time_budget(),
    };
    Ok((specs, options))
}

/// Progress goes to stdout from a dedicated thread; the batch never blocks on it.
fn spawn_printer() -> (Sender<ProcessEvent>, JoinHandle<()>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    (tx, printer)
}

fn join_printer(printer: JoinHandle<()>) -> Result<(), Box<dyn std::error::Error>> {
    printer
        .join()
        .map_err(|_| "progress printer thread panicked".into())
}

fn write_report(path: &Path, result: &BatchResult) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&result.report())?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
