use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thumbkit::{
    Engine, EngineOpts, IssueTarget, LayerKind, Resolution, Workspace, export_png,
};

#[derive(Parser, Debug)]
#[command(name = "thumbkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a workspace JSON to a PNG.
    Render(RenderArgs),
    /// Write the starter workspace JSON.
    Starter(StarterArgs),
    /// List the layers of a workspace, bottom to top.
    Layers(LayersArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input workspace JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render at preview resolution (640x360).
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Engine options JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StarterArgs {
    /// Output workspace JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayersArgs {
    /// Input workspace JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Starter(args) => cmd_starter(args),
        Command::Layers(args) => cmd_layers(args),
    }
}

fn load_opts(path: Option<&Path>, in_path: &Path) -> anyhow::Result<EngineOpts> {
    let mut opts = match path {
        Some(p) => {
            let s = std::fs::read_to_string(p)
                .with_context(|| format!("read config '{}'", p.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse config '{}'", p.display()))?
        }
        None => EngineOpts::default(),
    };
    // Relative image paths resolve against the workspace file unless configured otherwise.
    if opts.assets_root.is_none() {
        opts.assets_root = in_path.parent().map(Path::to_path_buf);
    }
    // Relative font dirs are searched next to the workspace file as well.
    if let Some(root) = in_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let beside: Vec<_> = opts
            .fonts
            .dirs
            .iter()
            .filter(|d| d.is_relative())
            .map(|d| root.join(d))
            .collect();
        opts.fonts.dirs.extend(beside);
    }
    Ok(opts)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let ws = Workspace::from_path(&args.in_path)?;
    let engine = Engine::new(load_opts(args.config.as_deref(), &args.in_path)?);
    let resolution = if args.preview {
        Resolution::Preview
    } else {
        Resolution::Canonical
    };
    let out = engine.render_canvas(&ws, resolution)?;

    for f in &out.font_fallbacks {
        tracing::warn!(layer = %f.layer, requested = %f.requested, resolved = %f.resolved, "font fallback");
    }
    for issue in &out.issues {
        match &issue.target {
            IssueTarget::Background => tracing::warn!(error = %issue.error, "background asset"),
            IssueTarget::Layer(id) => tracing::warn!(layer = %id, error = %issue.error, "layer asset"),
        }
    }

    export_png(&out.buffer, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_starter(args: StarterArgs) -> anyhow::Result<()> {
    Workspace::starter().save_to_path(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layers(args: LayersArgs) -> anyhow::Result<()> {
    let ws = Workspace::from_path(&args.in_path)?;
    for (i, layer) in ws.layers().iter().enumerate() {
        let summary = match &layer.kind {
            LayerKind::Text(t) => format!("{:?}", t.text),
            LayerKind::Overlay(o) => format!("{:?} {}x{}", o.shape, o.size.width, o.size.height),
            LayerKind::Image(img) => img.source_path.clone(),
        };
        println!(
            "{i}\t{}\t{}\t{}{}\t{summary}",
            layer.id(),
            layer.kind.type_name(),
            layer.label,
            if layer.visible { "" } else { " (hidden)" },
        );
    }
    Ok(())
}
