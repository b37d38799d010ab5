//! Kryon Smoke Harness
//!
//! Loads a `.krb` document, prepares and lays it out, then prints the
//! geometry of every node along with any diagnostics.
//!
//! ```text
//! kryon-smoke <file.krb> [--width N] [--height N]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use kryon_dom::{NodeId, Rect};
use kryon_engine::RenderContext;
use tracing::info;

/// Parse command line arguments
struct Args {
    file: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut file = None;
        let mut width = None;
        let mut height = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--width" => {
                    width = args.next().and_then(|val| val.parse().ok());
                }
                "--height" => {
                    height = args.next().and_then(|val| val.parse().ok());
                }
                _ if file.is_none() => file = Some(PathBuf::from(arg)),
                _ => {}
            }
        }

        Self {
            file,
            width,
            height,
        }
    }
}

fn dump(ctx: &RenderContext, id: NodeId, depth: usize) {
    let node = &ctx.tree()[id];
    let Rect {
        x,
        y,
        width,
        height,
    } = node.rect;
    let element_id = node
        .element_id
        .as_deref()
        .map(|id| format!(" #{id}"))
        .unwrap_or_default();
    let hidden = if node.visual.visible { "" } else { " (hidden)" };
    println!(
        "{:indent$}{}{} [{}] {x:.1},{y:.1} {width:.1}x{height:.1}{hidden}",
        "",
        node.name,
        element_id,
        id.index(),
        indent = depth * 2
    );
    for &child in ctx.tree().children(id) {
        dump(ctx, child, depth + 1);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let Some(file) = args.file else {
        bail!("usage: kryon-smoke <file.krb> [--width N] [--height N]");
    };

    let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
    let base_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut ctx = RenderContext::from_bytes(&bytes)
        .with_context(|| format!("parsing {}", file.display()))?
        .with_base_dir(base_dir);

    let width = args.width.unwrap_or(ctx.config().width);
    let height = args.height.unwrap_or(ctx.config().height);
    ctx.layout_viewport(Rect::new(0.0, 0.0, width as f32, height as f32));
    info!(
        file = %file.display(),
        width,
        height,
        scale = ctx.scale(),
        "Laid out document"
    );

    println!("{} ({width}x{height}, scale {})", ctx.config().title, ctx.scale());
    for &root in ctx.tree().roots() {
        dump(&ctx, root, 0);
    }
    if !ctx.tree().orphans().is_empty() {
        println!("orphans: {:?}", ctx.tree().orphans());
    }
    for diagnostic in ctx.diagnostics() {
        println!("diagnostic: {diagnostic}");
    }
    println!("display list: {} commands", ctx.display_list().len());
    Ok(())
}
