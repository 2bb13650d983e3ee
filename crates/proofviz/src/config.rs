//! Configuration types for ProofViz layout and rendering.
//!
//! All types implement [`serde::Deserialize`] with a default for every
//! field, so a configuration file only needs to mention what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Node box size and spacing between nodes and layers.
//! - [`StyleConfig`] - Visual options for exported diagrams.
//! - [`SyncConfig`] - What counts as a structural change on graph replacement.
//!
//! # Example
//!
//! ```
//! # use proofviz::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.layout().metrics().is_ok());
//! assert!(config.style().background_color().is_ok());
//! assert!(config.sync().relayout_on_edge_change());
//! ```

use serde::Deserialize;

use proofviz_core::{color::Color, geometry::Size};

use crate::layout::LayoutMetrics;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    sync: SyncConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig, sync: SyncConfig) -> Self {
        Self {
            layout,
            style,
            sync,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the synchronization configuration.
    pub fn sync(&self) -> &SyncConfig {
        &self.sync
    }
}

/// Node box dimensions and spacing used by the position assigner.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    node_width: f32,
    node_height: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            node_height: 100.0,
            horizontal_spacing: 50.0,
            vertical_spacing: 80.0,
        }
    }
}

impl LayoutConfig {
    pub fn new(
        node_width: f32,
        node_height: f32,
        horizontal_spacing: f32,
        vertical_spacing: f32,
    ) -> Self {
        Self {
            node_width,
            node_height,
            horizontal_spacing,
            vertical_spacing,
        }
    }

    /// Returns validated [`LayoutMetrics`].
    ///
    /// # Errors
    ///
    /// Node dimensions must be finite and positive; spacings must be finite
    /// and non-negative.
    pub fn metrics(&self) -> Result<LayoutMetrics, String> {
        let dimensions = [
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("layout.{name} must be a positive number, got {value}"));
            }
        }

        let spacings = [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
        ];
        for (name, value) in spacings {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("layout.{name} must not be negative, got {value}"));
            }
        }

        Ok(LayoutMetrics::new(
            Size::new(self.node_width, self.node_height),
            self.horizontal_spacing,
            self.vertical_spacing,
        ))
    }
}

/// Visual styling configuration for exported diagrams.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color as a CSS color string. Transparent when unset.
    background_color: Option<String>,

    /// Opacity applied to dimmed nodes and edges.
    dimmed_opacity: f32,

    /// Margin around the diagram.
    padding: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            dimmed_opacity: 0.2,
            padding: 35.0,
        }
    }
}

impl StyleConfig {
    pub fn new(background_color: Option<String>, dimmed_opacity: f32, padding: f32) -> Self {
        Self {
            background_color,
            dimmed_opacity,
            padding,
        }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the dimmed opacity clamped to `0.0..=1.0`.
    pub fn dimmed_opacity(&self) -> f32 {
        self.dimmed_opacity.clamp(0.0, 1.0)
    }

    pub fn padding(&self) -> f32 {
        self.padding.max(0.0)
    }
}

/// Controls how the synchronizer classifies a replaced graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Treat an edge-set change with an unchanged node set as structural.
    relayout_on_edge_change: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            relayout_on_edge_change: true,
        }
    }
}

impl SyncConfig {
    pub fn new(relayout_on_edge_change: bool) -> Self {
        Self {
            relayout_on_edge_change,
        }
    }

    pub fn relayout_on_edge_change(&self) -> bool {
        self.relayout_on_edge_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"layout": {"node_width": 300.0}}"#)
            .expect("valid config");

        let metrics = config.layout().metrics().unwrap();
        assert_eq!(metrics.node_size().width(), 300.0);
        assert_eq!(metrics.node_size().height(), 100.0);
        assert_eq!(metrics.horizontal_spacing(), 50.0);
        assert_eq!(metrics.vertical_spacing(), 80.0);
    }

    #[test]
    fn test_metrics_rejects_zero_width() {
        let layout = LayoutConfig::new(0.0, 100.0, 10.0, 10.0);
        let err = layout.metrics().unwrap_err();
        assert!(err.contains("node_width"));
    }

    #[test]
    fn test_metrics_rejects_negative_spacing() {
        let layout = LayoutConfig::new(10.0, 10.0, -1.0, 10.0);
        assert!(layout.metrics().is_err());
    }

    #[test]
    fn test_metrics_allows_zero_spacing() {
        let layout = LayoutConfig::new(10.0, 10.0, 0.0, 0.0);
        assert!(layout.metrics().is_ok());
    }

    #[test]
    fn test_style_background_color() {
        let style: StyleConfig =
            serde_json::from_str(r##"{"background_color": "#fafafa"}"##).unwrap();
        assert!(style.background_color().unwrap().is_some());

        let bad: StyleConfig = serde_json::from_str(r#"{"background_color": "nope"}"#).unwrap();
        assert!(bad.background_color().is_err());
    }

    #[test]
    fn test_sync_treats_edge_changes_as_structural_unless_disabled() {
        assert!(SyncConfig::default().relayout_on_edge_change());

        let config: AppConfig = serde_json::from_str(r#"{"sync": {}}"#).unwrap();
        assert!(config.sync().relayout_on_edge_change());

        let config: AppConfig =
            serde_json::from_str(r#"{"sync": {"relayout_on_edge_change": false}}"#).unwrap();
        assert!(!config.sync().relayout_on_edge_change());
    }

    #[test]
    fn test_dimmed_opacity_is_clamped() {
        let style: StyleConfig = serde_json::from_str(r#"{"dimmed_opacity": 3.0}"#).unwrap();
        assert_eq!(style.dimmed_opacity(), 1.0);
    }
}
