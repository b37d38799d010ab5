#![allow(dead_code)]

use kryon_dom::{NodeId, TextureSize};
use kryon_engine::{ComponentRegistry, ImageLoadError, ImageLoader, ImageSource, RenderContext};
use kryon_krb::DocumentBuilder;

/// Loader that accepts inline data and rejects every file.
pub struct InlineOnlyLoader {
    pub size: TextureSize,
}

impl ImageLoader for InlineOnlyLoader {
    fn load(&self, source: &ImageSource<'_>) -> Result<TextureSize, ImageLoadError> {
        match source {
            ImageSource::Inline(_) => Ok(self.size),
            ImageSource::File(path) => Err(ImageLoadError::NotFound(path.clone())),
        }
    }
}

/// Prepare a document with the built-in behaviors and lay it out.
#[track_caller]
pub fn prepared(builder: DocumentBuilder) -> RenderContext {
    prepared_with(builder, ComponentRegistry::with_builtins())
}

#[track_caller]
pub fn prepared_with(builder: DocumentBuilder, registry: ComponentRegistry) -> RenderContext {
    init_tracing();
    let doc = builder.build().expect("document should encode and parse");
    let mut ctx = RenderContext::new(doc, registry);
    ctx.relayout();
    ctx
}

#[track_caller]
pub fn node_by_id(ctx: &RenderContext, element_id: &str) -> NodeId {
    ctx.find_by_id(element_id)
        .unwrap_or_else(|| panic!("no node with id '{element_id}'"))
}

/// Route library logs to the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
