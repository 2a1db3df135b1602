use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;

use crate::{
    blend::engine::{BlendOptions, blend_layers},
    blend::output::BlendOutput,
    foundation::core::Point,
    foundation::error::{BlendError, BlendResult},
    layer::model::{FULL_OPACITY, Layer},
    layer::pixels::PixelBuffer,
};

/// Host-side description of the layers to merge, as stored in JSON.
///
/// Layers are listed topmost first, the way image editors list them. Image paths are relative to
/// the directory holding the manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerStack {
    /// Candidate layers, topmost first.
    pub layers: Vec<StackLayer>,
    /// Which candidates take part.
    #[serde(default)]
    pub filter: LayerFilter,
    /// Compositing options.
    #[serde(default)]
    pub options: BlendOptions,
}

/// One layer entry of a [`LayerStack`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StackLayer {
    /// Image file, relative to the manifest directory.
    pub source: String,
    /// Display name (may carry a `(w<number>)` weight). Defaults to the file stem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `[x, y]` offset of the top-left corner.
    #[serde(default)]
    pub offset: [i64; 2],
    /// Opacity in percent.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Visibility flag, only consulted by [`LayerFilter::visible_only`].
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Link flag, only consulted by [`LayerFilter::linked_only`].
    #[serde(default = "default_true")]
    pub linked: bool,
}

fn default_opacity() -> f64 {
    FULL_OPACITY
}

fn default_true() -> bool {
    true
}

impl StackLayer {
    /// Name handed to the compositor.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        Path::new(&self.source)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.clone())
    }
}

/// Layer selection applied before compositing.
///
/// By default only linked layers take part; visibility is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerFilter {
    /// Skip hidden layers.
    pub visible_only: bool,
    /// Skip unlinked layers.
    pub linked_only: bool,
}

impl Default for LayerFilter {
    fn default() -> Self {
        Self {
            visible_only: false,
            linked_only: true,
        }
    }
}

impl LayerFilter {
    /// Whether `layer` passes the filter.
    pub fn accepts(&self, layer: &StackLayer) -> bool {
        (!self.visible_only || layer.visible) && (!self.linked_only || layer.linked)
    }
}

impl LayerStack {
    /// Parse a layer stack from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BlendResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BlendError::serde(format!("parse layer stack JSON: {e}")))
    }

    /// Parse a layer stack from a JSON string.
    pub fn from_json(json: &str) -> BlendResult<Self> {
        Self::from_reader(json.as_bytes())
    }

    /// Parse a layer stack from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BlendResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BlendError::validation(format!("open layer stack JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check manifest invariants.
    pub fn validate(&self) -> BlendResult<()> {
        self.options.validate()?;
        for (i, layer) in self.layers.iter().enumerate() {
            normalize_rel_path(&layer.source)
                .map_err(|e| BlendError::validation(format!("layer {i}: {e}")))?;
            if !layer.opacity.is_finite() || !(0.0..=FULL_OPACITY).contains(&layer.opacity) {
                return Err(BlendError::validation(format!(
                    "layer {i} ('{}') opacity must be within [0, 100]",
                    layer.source
                )));
            }
        }
        Ok(())
    }

    /// Layers passing the filter, topmost first.
    pub fn selected(&self) -> impl Iterator<Item = &StackLayer> {
        self.layers.iter().filter(|l| self.filter.accepts(l))
    }

    /// Decode the selected layers' images, resolving sources against `root`.
    #[tracing::instrument(skip(self, root), fields(root = %root.as_ref().display()))]
    pub fn load_layers(&self, root: impl AsRef<Path>) -> BlendResult<Vec<Layer>> {
        self.validate()?;
        let root = root.as_ref();
        self.selected()
            .map(|entry| -> BlendResult<Layer> {
                let rel = normalize_rel_path(&entry.source)?;
                let path = root.join(&rel);
                let img = image::open(&path)
                    .with_context(|| format!("decode layer image '{}'", path.display()))?;
                let pixels = PixelBuffer::from_dynamic(img)?;
                tracing::debug!(
                    source = %rel,
                    width = pixels.width(),
                    height = pixels.height(),
                    alpha = pixels.format().has_alpha(),
                    "loaded layer"
                );
                Ok(Layer {
                    name: entry.display_name(),
                    offset: Point::new(entry.offset[0], entry.offset[1]),
                    opacity: entry.opacity,
                    pixels,
                })
            })
            .collect()
    }

    /// Load the selected layers and composite them with [`LayerStack::options`].
    pub fn blend(&self, root: impl AsRef<Path>) -> BlendResult<Option<BlendOutput>> {
        let layers = self.load_layers(root)?;
        blend_layers(&layers, &self.options)
    }
}

/// Normalize a manifest-relative path: forward slashes, no `.` segments, no `..`, not absolute.
pub fn normalize_rel_path(source: &str) -> BlendResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(BlendError::validation("layer source must be non-empty"));
    }
    if s.starts_with('/') || s.chars().nth(1) == Some(':') {
        return Err(BlendError::validation("layer source must be a relative path"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(BlendError::validation("layer source must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(BlendError::validation("layer source must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/stack/manifest.rs"]
mod tests;
