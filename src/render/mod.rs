/*!
Rendering collaborators for a finished `GraphModel`.

Structure:
- `layout`: the `LayoutStrategy` trait with circular and force-directed strategies.
- `svg`: draws a model and its layout as an SVG document.
- `raster`: rasterizes that document to PNG.

Rendering only reads the model; the strategy is always chosen by the caller.
*/

pub mod layout;
pub mod raster;
pub mod svg;

use std::path::Path;

use tracing::info;

use crate::{
    error::{GraphError, GraphResult},
    network::network_graph::GraphModel,
};

pub use layout::{CircularLayout, ForceDirectedLayout, Layout, LayoutStrategy};
pub use svg::SvgRenderer;

const PNG_SIZE_PX: u32 = 1200;

/// Lays out `model` with `strategy` and writes it to `path`.
/// A `.png` extension produces a raster image, anything else an SVG document.
pub fn render_to_path(
    model: &GraphModel,
    strategy: &dyn LayoutStrategy,
    renderer: &SvgRenderer,
    path: &Path,
) -> GraphResult<()> {
    let layout = strategy.layout(model);
    let svg = renderer.render(model, &layout);

    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        raster::write_png(&svg, PNG_SIZE_PX, path)?;
    } else {
        std::fs::write(path, svg).map_err(|source| GraphError::Output {
            path: path.to_path_buf(),
            source,
        })?;
    }
    info!(path = %path.display(), layout = strategy.name(), nodes = layout.len(), "rendered attack graph");
    Ok(())
}
