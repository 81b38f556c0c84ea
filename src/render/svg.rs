use std::fmt::Write;

use crate::{
    network::{network_graph::GraphModel, node::Node},
    render::layout::{Layout, Point},
};

const ROUTER_COLOR: &str = "#e74c3c";
const HOST_COLOR: &str = "#add8e6";
const EDGE_COLOR: &str = "#808080";

/// Draws a laid-out model as a standalone SVG document.
///
/// Routers are red triangles, hosts light blue circles. Undeclared nodes get a
/// dashed outline. Edges are straight arrows from source to target.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    /// Pixels per layout unit
    pub scale: f32,
    pub node_radius: f32,
    pub margin: f32,
    pub font_size: f32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            scale: 40.0,
            node_radius: 22.0,
            margin: 60.0,
            font_size: 12.0,
        }
    }
}

impl SvgRenderer {
    pub fn render(&self, model: &GraphModel, layout: &Layout) -> String {
        let (min, max) = layout
            .bounds()
            .unwrap_or((Point::ORIGIN, Point::ORIGIN));
        let width = (max.x - min.x) * self.scale + 2.0 * self.margin;
        let height = (max.y - min.y) * self.scale + 2.0 * self.margin;
        let to_canvas = |p: Point| {
            Point::new(
                (p.x - min.x) * self.scale + self.margin,
                (p.y - min.y) * self.scale + self.margin,
            )
        };

        let mut svg = String::new();
        // Writing into a String never fails
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"#
        );
        let _ = writeln!(
            svg,
            r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M 0 0 L 10 5 L 0 10 z" fill="{EDGE_COLOR}"/></marker></defs>"#
        );
        let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

        for edge in model.edges() {
            let (Some(source), Some(target)) = (layout.position(&edge.source), layout.position(&edge.target))
            else {
                continue;
            };
            let (from, to) = self.trim_segment(to_canvas(source), to_canvas(target));
            let _ = writeln!(
                svg,
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{EDGE_COLOR}" stroke-width="1.5" marker-end="url(#arrow)"/>"#,
                from.x, from.y, to.x, to.y
            );
        }

        for node in model.nodes() {
            let Some(position) = layout.position(&node.id) else {
                continue;
            };
            self.write_node(&mut svg, node, to_canvas(position));
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn write_node(&self, svg: &mut String, node: &Node, at: Point) {
        let r = self.node_radius;
        let dash = if node.is_undeclared() {
            r#" stroke-dasharray="4 3""#
        } else {
            ""
        };
        if node.is_router() {
            let _ = writeln!(
                svg,
                r#"<polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="{ROUTER_COLOR}" stroke="black"{dash}/>"#,
                at.x,
                at.y - r,
                at.x - r * 0.87,
                at.y + r * 0.5,
                at.x + r * 0.87,
                at.y + r * 0.5
            );
        } else {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.1}" cy="{:.1}" r="{r:.1}" fill="{HOST_COLOR}" stroke="black"{dash}/>"#,
                at.x, at.y
            );
        }
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{}" font-weight="bold" text-anchor="middle">{}</text>"#,
            at.x,
            at.y + r + self.font_size + 2.0,
            self.font_size,
            escape(&node.id)
        );
    }

    /// Shortens a segment by the node radius at both ends so arrows stop at the node outline.
    fn trim_segment(&self, from: Point, to: Point) -> (Point, Point) {
        let delta = Point::new(to.x - from.x, to.y - from.y);
        let length = delta.length();
        if length <= 2.0 * self.node_radius {
            return (from, to);
        }
        let (ux, uy) = (delta.x / length, delta.y / length);
        let r = self.node_radius;
        (
            Point::new(from.x + ux * r, from.y + uy * r),
            Point::new(to.x - ux * r, to.y - uy * r),
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
