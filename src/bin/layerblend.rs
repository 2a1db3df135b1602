use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "layerblend", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge the layers of a stack manifest into one PNG.
    Blend(BlendArgs),
}

#[derive(Parser, Debug)]
struct BlendArgs {
    /// Input layer stack JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Blend mode (average, darken, lighten, inverse_normal, extract_normal, median).
    #[arg(long)]
    mode: Option<layerblend::BlendMode>,

    /// Horizontal crop band in pixels.
    #[arg(long)]
    crop_h: Option<u32>,

    /// Vertical crop band in pixels.
    #[arg(long)]
    crop_v: Option<u32>,

    /// Horizontal fade band in pixels.
    #[arg(long)]
    fade_h: Option<u32>,

    /// Vertical fade band in pixels.
    #[arg(long)]
    fade_v: Option<u32>,

    /// Reference color for extract_normal, as RRGGBB.
    #[arg(long)]
    reference: Option<layerblend::Rgb8>,

    /// Only merge visible layers.
    #[arg(long, default_value_t = false)]
    visible_only: bool,

    /// Also merge layers marked as unlinked.
    #[arg(long, default_value_t = false)]
    include_unlinked: bool,

    /// Process layer rows in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Log compositing steps to stderr.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Blend(args) => cmd_blend(args),
    }
}

fn cmd_blend(args: BlendArgs) -> anyhow::Result<()> {
    if args.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut stack = layerblend::LayerStack::from_path(&args.in_path)?;
    apply_overrides(&mut stack, &args);
    let root = args
        .in_path
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));

    let Some(merged) = stack
        .blend(root)
        .with_context(|| format!("blend layers of '{}'", args.in_path.display()))?
    else {
        eprintln!("fewer than two layers selected, nothing written");
        return Ok(());
    };

    merged.save_png(&args.out)?;
    eprintln!(
        "wrote {} ({}: origin {},{} size {}x{})",
        args.out.display(),
        merged.name,
        merged.origin.x,
        merged.origin.y,
        merged.width,
        merged.height
    );
    Ok(())
}

fn apply_overrides(stack: &mut layerblend::LayerStack, args: &BlendArgs) {
    let opts = &mut stack.options;
    if let Some(mode) = args.mode {
        opts.mode = mode;
    }
    if let Some(v) = args.crop_h {
        opts.edges.crop_h = v;
    }
    if let Some(v) = args.crop_v {
        opts.edges.crop_v = v;
    }
    if let Some(v) = args.fade_h {
        opts.edges.fade_h = v;
    }
    if let Some(v) = args.fade_v {
        opts.edges.fade_v = v;
    }
    if let Some(rgb) = args.reference {
        opts.reference_rgb = rgb;
    }
    if args.parallel {
        opts.parallel = true;
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    stack.filter.visible_only |= args.visible_only;
    if args.include_unlinked {
        stack.filter.linked_only = false;
    }
}
