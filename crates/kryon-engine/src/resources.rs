//! Texture loading through a host-provided image loader.
//!
//! Runs once after the tree is resolved. Every Image and Button node with a
//! resource index asks the loader for that resource; results are cached per
//! index, so a shared image is decoded once and a broken one is reported
//! once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kryon_dom::{Diagnostic, RenderTree, TextureSize};
use kryon_krb::{Document, ElementType, ResourceData};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors an [`ImageLoader`] reports for one resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageLoadError {
    #[error("resource index out of range")]
    UnknownResource,

    #[error("path string index {0} out of range")]
    UnresolvedPath(u8),

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("decode failed: {0}")]
    Decode(String),
}

/// Where the bytes of an image resource come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// A file, already joined onto the document's directory.
    File(PathBuf),
    Inline(&'a [u8]),
}

/// Decodes images into backend textures.
pub trait ImageLoader {
    /// Load one image and return its native size.
    fn load(&self, source: &ImageSource<'_>) -> Result<TextureSize, ImageLoadError>;
}

/// Load outcomes keyed by resource index.
#[derive(Debug, Clone, Default)]
pub struct TextureCache {
    entries: HashMap<u8, Option<TextureSize>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome: `Some(None)` is a failure that will not be retried.
    pub fn get(&self, resource: u8) -> Option<Option<TextureSize>> {
        self.entries.get(&resource).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Resolve a resource index to its image source.
pub fn image_source<'d>(
    doc: &'d Document,
    base_dir: &Path,
    resource: u8,
) -> Result<ImageSource<'d>, ImageLoadError> {
    let entry = doc
        .resource(resource)
        .ok_or(ImageLoadError::UnknownResource)?;
    match &entry.data {
        ResourceData::External { path_index } => doc
            .string(*path_index)
            .map(|path| ImageSource::File(base_dir.join(path)))
            .ok_or(ImageLoadError::UnresolvedPath(*path_index)),
        ResourceData::Inline(bytes) => Ok(ImageSource::Inline(bytes)),
    }
}

/// Attach textures to every image-bearing node. Returns the number of
/// nodes that ended up with a texture.
pub fn load_textures(
    tree: &mut RenderTree,
    doc: &Document,
    base_dir: &Path,
    loader: &dyn ImageLoader,
    cache: &mut TextureCache,
) -> usize {
    let targets: Vec<_> = tree
        .iter()
        .filter(|(_, node)| {
            matches!(
                node.header.element_type,
                ElementType::Image | ElementType::Button
            )
        })
        .filter_map(|(id, node)| node.content.resource.map(|resource| (id, resource)))
        .collect();

    let mut textured = 0;
    let mut failed = 0;
    for (id, resource) in targets {
        let outcome = match cache.get(resource) {
            Some(cached) => cached,
            None => {
                let loaded = image_source(doc, base_dir, resource)
                    .and_then(|source| loader.load(&source));
                let outcome = match loaded {
                    Ok(size) => Some(size),
                    Err(err) => {
                        warn!(resource, node = %tree[id].name, error = %err, "Texture load failed");
                        tree.record(Diagnostic::TextureLoad {
                            resource,
                            reason: err.to_string(),
                        });
                        failed += 1;
                        None
                    }
                };
                cache.entries.insert(resource, outcome);
                outcome
            }
        };
        tree[id].texture = outcome;
        if outcome.is_some() {
            textured += 1;
        }
    }

    debug!(textured, failed, cached = cache.len(), "Loaded textures");
    textured
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use kryon_dom::{build_tree, resolve_tree, NoStyleSelector, NodeId};
    use kryon_krb::{DocumentBuilder, ElementBuilder, Property, PropertyId, ResourceType};
    use kryon_style::ResolveDefaults;

    struct CountingLoader {
        calls: Cell<usize>,
    }

    impl ImageLoader for CountingLoader {
        fn load(&self, source: &ImageSource<'_>) -> Result<TextureSize, ImageLoadError> {
            self.calls.set(self.calls.get() + 1);
            match source {
                ImageSource::Inline(bytes) => Ok(TextureSize {
                    width: bytes.len() as u32,
                    height: 1,
                }),
                ImageSource::File(path) => Err(ImageLoadError::NotFound(path.clone())),
            }
        }
    }

    #[test]
    fn test_cache_and_failures() {
        let mut b = DocumentBuilder::new();
        let inline = b.inline_resource(ResourceType::IMAGE, "dot", vec![0; 4]);
        let missing = b.external_resource(ResourceType::IMAGE, "logo", "logo.png");
        let app = b.element(ElementBuilder::new(ElementType::App));
        for resource in [inline, inline, missing, missing] {
            let image = b.element(
                ElementBuilder::new(ElementType::Image)
                    .property(Property::resource(PropertyId::IMAGE_SOURCE, resource)),
            );
            b.add_child(app, image);
        }
        let doc = b.build().unwrap();
        let mut tree = build_tree(&doc, &NoStyleSelector);
        resolve_tree(&mut tree, &doc, &ResolveDefaults::default());

        let loader = CountingLoader { calls: Cell::new(0) };
        let mut cache = TextureCache::new();
        let textured = load_textures(&mut tree, &doc, Path::new("/assets"), &loader, &mut cache);

        assert_eq!(textured, 2);
        assert_eq!(loader.calls.get(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(
            tree[NodeId(1)].texture,
            Some(TextureSize { width: 4, height: 1 })
        );
        assert_eq!(tree[NodeId(3)].texture, None);
        let failures: Vec<_> = tree
            .diagnostics()
            .iter()
            .filter(|d| matches!(d, Diagnostic::TextureLoad { .. }))
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(
            image_source(&doc, Path::new("/assets"), missing).unwrap(),
            ImageSource::File(PathBuf::from("/assets/logo.png"))
        );
    }

    #[test]
    fn test_unknown_resource_index() {
        let mut b = DocumentBuilder::new();
        b.element(ElementBuilder::new(ElementType::App));
        let doc = b.build().unwrap();
        assert_eq!(
            image_source(&doc, Path::new("."), 3),
            Err(ImageLoadError::UnknownResource)
        );
    }
}
