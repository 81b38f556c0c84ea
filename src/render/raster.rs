use std::path::Path;

use tiny_skia::{Color, Pixmap, Transform};
use usvg::Tree;

use crate::error::{GraphError, GraphResult};

/// Rasterize SVG text so that its longest side is `target_px` (keeps aspect).
/// System fonts are loaded so node labels are drawn.
pub fn rasterize_svg(svg: &str, target_px: u32) -> GraphResult<Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = Tree::from_str(svg, &opt)
        .map_err(|e| GraphError::Render(format!("invalid SVG document: {e}")))?;

    let size = tree.size().to_int_size();
    let max_side = size.width().max(size.height()).max(1) as f32;
    let scale = target_px.max(1) as f32 / max_side;

    let w = ((size.width() as f32) * scale).ceil().max(1.0) as u32;
    let h = ((size.height() as f32) * scale).ceil().max(1.0) as u32;

    let mut pixmap = Pixmap::new(w, h)
        .ok_or_else(|| GraphError::Render(format!("cannot allocate a {w}x{h} image")))?;
    pixmap.fill(Color::WHITE);
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pm);
    Ok(pixmap)
}

pub fn write_png(svg: &str, target_px: u32, path: &Path) -> GraphResult<()> {
    let pixmap = rasterize_svg(svg, target_px)?;
    pixmap
        .save_png(path)
        .map_err(|e| GraphError::Render(format!("cannot write {}: {e}", path.display())))
}
