//! SVG export of scenes.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info};
use svg::{
    Document,
    node::element::{self as svg_element, Definitions, Marker},
};

use proofviz_core::{
    color::Color,
    draw::{LayeredOutput, RenderLayer},
    geometry::{Bounds, Insets, Point, Size},
};

use crate::{
    config::StyleConfig,
    export,
    graph::NodeKind,
    highlight::Emphasis,
    scene::{RenderedEdge, RenderedNode, Scene},
};

const FONT_FAMILY: &str = "Arial, sans-serif";
const FONT_SIZE: f32 = 14.0;
const EDGE_FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 18.0;
const TEXT_PADDING: f32 = 10.0;
// Rough average glyph width relative to the font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;
const NODE_STROKE: &str = "#333333";
const EDGE_STROKE: &str = "#555555";
const ARROW_MARKER_ID: &str = "arrow";

/// Builder for [`Svg`].
#[derive(Debug, Default)]
pub struct SvgBuilder {
    file_name: Option<PathBuf>,
    style: StyleConfig,
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file written by [`export::Exporter::export_scene`].
    pub fn with_file_name(mut self, file_name: impl AsRef<Path>) -> Self {
        self.file_name = Some(file_name.as_ref().to_path_buf());
        self
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if the configured background color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let background_color = self
            .style
            .background_color()
            .map_err(export::Error::Render)?;

        Ok(Svg {
            file_name: self.file_name,
            background_color,
            dimmed_opacity: self.style.dimmed_opacity(),
            padding: self.style.padding(),
        })
    }
}

/// SVG renderer and exporter.
#[derive(Debug)]
pub struct Svg {
    file_name: Option<PathBuf>,
    background_color: Option<Color>,
    dimmed_opacity: f32,
    padding: f32,
}

impl Svg {
    /// Renders `scene` to an SVG document.
    ///
    /// The view box is the scene bounds grown by the configured padding, so
    /// dragged nodes with negative coordinates stay visible.
    pub fn render_scene(&self, scene: &Scene) -> Document {
        let view = scene.bounds().add_padding(Insets::uniform(self.padding));
        debug!(width = view.width(), height = view.height(); "SVG dimensions");

        let doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view.min_x(),
                    view.min_y(),
                    view.width(),
                    view.height()
                ),
            )
            .set("width", view.width())
            .set("height", view.height())
            .add(self.marker_definitions());

        let mut output = LayeredOutput::new();
        if let Some(background) = self.render_background(view) {
            output.merge(background);
        }
        for edge in scene.edges() {
            output.merge(self.render_edge(scene, edge));
        }
        for node in scene.nodes() {
            output.merge(self.render_node(node, scene.node_size()));
        }

        output
            .render()
            .into_iter()
            .fold(doc, |doc, layer| doc.add(layer))
    }

    /// Writes an SVG document to `writer`.
    pub fn write_document(
        &self,
        doc: &Document,
        mut writer: impl Write,
    ) -> Result<(), export::Error> {
        write!(writer, "{doc}").map_err(export::Error::Io)
    }

    fn render_background(&self, view: Bounds) -> Option<LayeredOutput> {
        let color = self.background_color.as_ref()?;
        let rect = svg_element::Rectangle::new()
            .set("x", view.min_x())
            .set("y", view.min_y())
            .set("width", view.width())
            .set("height", view.height())
            .set("fill", color)
            .set("fill-opacity", color.alpha());

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Background, Box::new(rect));
        Some(output)
    }

    fn render_node(&self, node: &RenderedNode, size: Size) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = Bounds::new_from_top_left(node.position(), size);

        let mut rect = svg_element::Rectangle::new()
            .set("data-id", node.id().to_string())
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("rx", 8.0)
            .set("fill", kind_fill(node.kind()))
            .set("stroke", NODE_STROKE)
            .set("stroke-width", 1.5);
        self.apply_emphasis(&mut rect, node.emphasis());
        output.add_to_layer(RenderLayer::Node, Box::new(rect));

        let max_chars = ((size.width() - 2.0 * TEXT_PADDING) / (FONT_SIZE * CHAR_WIDTH_RATIO))
            .floor()
            .max(1.0) as usize;
        let max_lines = ((size.height() - 2.0 * TEXT_PADDING) / LINE_HEIGHT)
            .floor()
            .max(1.0) as usize;
        let lines = wrap_label(node.label(), max_chars, max_lines);

        let center = bounds.center();
        let first_y = center.y() - (lines.len() as f32 - 1.0) * LINE_HEIGHT / 2.0;
        let mut group = svg_element::Group::new()
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle");
        for (index, line) in lines.into_iter().enumerate() {
            let text = svg_element::Text::new(line)
                .set("x", center.x())
                .set("y", first_y + index as f32 * LINE_HEIGHT);
            group = group.add(text);
        }
        self.apply_emphasis(&mut group, node.emphasis());
        output.add_to_layer(RenderLayer::Text, Box::new(group));

        output
    }

    fn render_edge(&self, scene: &Scene, edge: &RenderedEdge) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let (Some(source), Some(target)) = (
            scene.node_bounds(edge.source()),
            scene.node_bounds(edge.target()),
        ) else {
            return output;
        };

        let start = source.bottom_center();
        let end = target.top_center();

        let mut path = svg_element::Path::new()
            .set("data-id", edge.id())
            .set("d", path_data(start, end))
            .set("fill", "none")
            .set("stroke", EDGE_STROKE)
            .set("stroke-width", 1.5)
            .set("marker-end", format!("url(#{ARROW_MARKER_ID})"));
        self.apply_emphasis(&mut path, edge.emphasis());
        output.add_to_layer(RenderLayer::Edge, Box::new(path));

        if let Some(label) = edge.label() {
            let mid = start.midpoint(end);
            let mut text = svg_element::Text::new(label)
                .set("x", mid.x())
                .set("y", mid.y())
                .set("font-family", FONT_FAMILY)
                .set("font-size", EDGE_FONT_SIZE)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "middle")
                .set("fill", EDGE_STROKE);
            self.apply_emphasis(&mut text, edge.emphasis());
            output.add_to_layer(RenderLayer::Text, Box::new(text));
        }

        output
    }

    fn marker_definitions(&self) -> Definitions {
        let arrow = Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("viewBox", "0 0 10 10")
            .set("refX", 9)
            .set("refY", 5)
            .set("markerWidth", 6)
            .set("markerHeight", 6)
            .set("orient", "auto")
            .add(
                svg_element::Path::new()
                    .set("d", "M 0 0 L 10 5 L 0 10 z")
                    .set("fill", EDGE_STROKE),
            );
        Definitions::new().add(arrow)
    }

    fn apply_emphasis(&self, element: &mut impl svg::Node, emphasis: Emphasis) {
        if emphasis.is_dimmed() {
            element.assign("opacity", self.dimmed_opacity);
        }
    }
}

impl export::Exporter for Svg {
    fn export_scene(&mut self, scene: &Scene) -> Result<(), export::Error> {
        let file_name = self
            .file_name
            .as_ref()
            .ok_or_else(|| export::Error::Render("No output file configured".to_string()))?;

        let doc = self.render_scene(scene);
        debug!("SVG document rendered");

        info!(file_name = file_name.display().to_string(); "Creating SVG file");
        let file = File::create(file_name).map_err(|err| {
            error!(file_name = file_name.display().to_string(), err:err; "Failed to create SVG file");
            export::Error::Io(err)
        })?;
        self.write_document(&doc, file)
    }
}

fn kind_fill(kind: Option<NodeKind>) -> &'static str {
    match kind {
        Some(NodeKind::Assumption) => "#e3f2fd",
        Some(NodeKind::Deduction) => "#f1f8e9",
        Some(NodeKind::Contradiction) => "#ffebee",
        Some(NodeKind::Conclusion) => "#fff8e1",
        None => "#ffffff",
    }
}

fn path_data(start: Point, end: Point) -> String {
    format!("M {} {} L {} {}", start.x(), start.y(), end.x(), end.y())
}

/// Greedy word wrap. Words longer than a line are split; text beyond
/// `max_lines` is cut and the last line ends with an ellipsis.
fn wrap_label(label: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in label.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut chars: Vec<char> = last.chars().collect();
            chars.truncate(max_chars.saturating_sub(1));
            *last = chars.into_iter().collect::<String>() + "…";
        }
    }
    lines
}
