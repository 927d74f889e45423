use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rotasheet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a turntable spritesheet PNG using the built-in preview renderer.
    Render(RenderArgs),
    /// Print the planned (rotation, frame) -> cell sequence as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Job configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = rotasheet::SheetJobConfig::from_json_file(&args.config)
        .with_context(|| format!("load config '{}'", args.config.display()))?;
    config.validate()?;

    // Views render at full sheet resolution and downscale into their cells,
    // matching what a scene backend configured for this sheet would produce.
    let mut renderer =
        rotasheet::PreviewRenderer::new(config.sheet_width, config.sheet_height);
    let out = rotasheet::render_spritesheet_to_png(&config, &mut renderer)?;

    eprintln!(
        "wrote {} ({} cells)",
        out.sheet_path.display(),
        out.stats.cells_rendered
    );
    eprintln!("wrote {}", out.metadata_path.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let config = rotasheet::SheetJobConfig::from_json_file(&args.config)
        .with_context(|| format!("load config '{}'", args.config.display()))?;
    config.validate()?;

    let plan = config.sequence_plan()?;
    let cells: Vec<rotasheet::PlannedCell> = plan.cells().collect();
    println!("{}", serde_json::to_string_pretty(&cells)?);
    Ok(())
}
