//! Toolpath visualizer
//! Owns the parsed document, view state and per-view simplified geometry

use super::lod::{simplify_segments, LodLevel};
use super::toolpath::{DocumentStats, ParsedDocument, PathSegment, SegmentFilter};
use super::toolpath_cache::{content_hash, DocumentCache, LodCache, LodCacheKey};
use super::viewport::{Bounds, ViewState};
use super::z_levels::{z_levels, ZLevelMap};
use crate::gcode::parse_document;
use gcodeview_settings::Config;
use std::sync::Arc;
use tracing::debug;

const MIN_ZOOM: f32 = 0.01;
const MAX_ZOOM: f32 = 50.0;
const ZOOM_STEP: f32 = 1.1;
const PAN_PERCENTAGE: f32 = 0.1;
/// Fraction of the canvas left empty on each side by `fit_to_view`
const FIT_MARGIN_FACTOR: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct Visualizer {
    config: Config,
    /// Zoom in pixels per document unit (1.0 = 100%)
    pub zoom_scale: f32,
    /// Pan offset along X in document units
    pub x_offset: f32,
    /// Pan offset along Y in document units
    pub y_offset: f32,
    document_cache: DocumentCache,
    lod_cache: LodCache,
    /// Set when the document or settings changed since the last draw
    dirty: bool,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            zoom_scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
            document_cache: DocumentCache::new(),
            lod_cache: LodCache::new(),
            dirty: true,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the settings. Cached LOD geometry is dropped; a parser
    /// settings change also marks the document stale so the next
    /// [`parse_gcode`](Self::parse_gcode) reparses even for identical text.
    pub fn set_config(&mut self, config: Config) {
        if config == self.config {
            return;
        }
        if config.parser != self.config.parser {
            self.document_cache.mark_stale();
        }
        self.config = config;
        self.lod_cache.invalidate();
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Parse G-code text. Returns `false` when the text is unchanged and
    /// the cached document was kept.
    pub fn parse_gcode(&mut self, gcode: &str) -> bool {
        let new_hash = content_hash(gcode);
        if !self.document_cache.needs_update(new_hash) {
            debug!("G-code hash unchanged, skipping parse");
            return false;
        }

        debug!("Parsing new G-code (hash: {})", new_hash);
        let document = parse_document(gcode, &self.config.parser);
        self.document_cache.update(new_hash, document);
        self.lod_cache.invalidate();
        self.dirty = true;
        true
    }

    pub fn document(&self) -> &ParsedDocument {
        self.document_cache.document()
    }

    pub fn shared_document(&self) -> Arc<ParsedDocument> {
        self.document_cache.shared()
    }

    pub fn stats(&self) -> DocumentStats {
        self.document().stats()
    }

    pub fn z_levels(&self) -> ZLevelMap {
        z_levels(&self.document().z_values)
    }

    /// Camera as currently set on this visualizer
    pub fn current_view(&self) -> ViewState {
        ViewState::new(self.zoom_scale, self.x_offset, self.y_offset)
    }

    /// Segments to draw for `view`, simplified to the zoom tier's budget.
    ///
    /// One list is built per filter and detail tier and reused by every
    /// zoom and pan bucket that lands on it, until the document or settings
    /// change.
    pub fn render_segments(&mut self, view: ViewState, filter: SegmentFilter) -> &[PathSegment] {
        let key = LodCacheKey::new(filter, &view);
        let level = LodLevel::from_zoom(view.zoom);
        let document = self.document_cache.document();
        let lod = &self.config.lod;

        self.lod_cache.get_or_insert_with(key, level, || {
            let segments = document.filtered_segments(filter);
            let budget = level.effective_budget(lod.point_budget);
            debug!(
                "Building {:?} segments at {:?} (budget {})",
                filter, level, budget
            );
            simplify_segments(&segments, budget, lod)
        })
    }

    /// Increase zoom by 10%
    pub fn zoom_in(&mut self) {
        self.zoom_scale = (self.zoom_scale * ZOOM_STEP).min(MAX_ZOOM);
    }

    /// Decrease zoom by 10%
    pub fn zoom_out(&mut self) {
        self.zoom_scale = (self.zoom_scale / ZOOM_STEP).max(MIN_ZOOM);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom_scale = 1.0;
    }

    pub fn get_zoom_percent(&self) -> u32 {
        (self.zoom_scale * 100.0).round() as u32
    }

    /// Canvas pixels to document units at the current zoom
    fn pan_step(&self, canvas_extent: f32) -> f32 {
        canvas_extent * PAN_PERCENTAGE / self.zoom_scale
    }

    /// Pan view to the right by 10% of canvas width
    pub fn pan_right(&mut self, canvas_width: f32) {
        self.x_offset += self.pan_step(canvas_width);
    }

    /// Pan view to the left by 10% of canvas width
    pub fn pan_left(&mut self, canvas_width: f32) {
        self.x_offset -= self.pan_step(canvas_width);
    }

    /// Pan view down by 10% of canvas height
    pub fn pan_down(&mut self, canvas_height: f32) {
        self.y_offset -= self.pan_step(canvas_height);
    }

    /// Pan view up by 10% of canvas height
    pub fn pan_up(&mut self, canvas_height: f32) {
        self.y_offset += self.pan_step(canvas_height);
    }

    pub fn reset_pan(&mut self) {
        self.x_offset = 0.0;
        self.y_offset = 0.0;
    }

    /// Zoom and center so all cutting moves fit the canvas with a margin.
    pub fn fit_to_view(&mut self, canvas_width: f32, canvas_height: f32) {
        let Some(bounds) = self.get_cutting_bounds() else {
            self.reset_zoom();
            self.reset_pan();
            return;
        };

        let center_x = (bounds.min_x + bounds.max_x) / 2.0;
        let center_y = (bounds.min_y + bounds.max_y) / 2.0;
        self.x_offset = -center_x;
        self.y_offset = -center_y;

        let content_width = bounds.width();
        let content_height = bounds.height();
        if content_width == 0.0 || content_height == 0.0 {
            self.zoom_scale = 1.0;
            return;
        }

        let available_width = canvas_width * (1.0 - FIT_MARGIN_FACTOR * 2.0);
        let available_height = canvas_height * (1.0 - FIT_MARGIN_FACTOR * 2.0);
        let scale_x = available_width / content_width;
        let scale_y = available_height / content_height;
        self.zoom_scale = scale_x.min(scale_y).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn get_bounds(&self) -> Option<Bounds> {
        self.document().bounds()
    }

    /// Get bounds of cutting moves only (excluding rapid moves)
    pub fn get_cutting_bounds(&self) -> Option<Bounds> {
        self.document().cutting_bounds()
    }
}
