use super::lod::LodLevel;
use super::toolpath::{ParsedDocument, PathSegment, SegmentFilter};
use super::viewport::ViewState;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, trace};

/// Edge length of a pan bucket in document units.
pub const PAN_BUCKET_SIZE: f32 = 64.0;

/// Zoom buckets per doubling.
const ZOOM_BUCKETS_PER_OCTAVE: f32 = 4.0;

/// Hash of a G-code text used to detect unchanged documents
pub fn content_hash(gcode: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    gcode.hash(&mut hasher);
    hasher.finish()
}

/// Last parsed document keyed by the hash of its text
#[derive(Debug, Default, Clone)]
pub struct DocumentCache {
    content_hash: Option<u64>,
    document: Arc<ParsedDocument>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn needs_update(&self, new_hash: u64) -> bool {
        self.content_hash != Some(new_hash)
    }

    pub fn update(&mut self, new_hash: u64, document: ParsedDocument) {
        debug!(
            "Document cache updated (hash: {}, {} points)",
            new_hash,
            document.len()
        );
        self.content_hash = Some(new_hash);
        self.document = Arc::new(document);
    }

    pub fn document(&self) -> &ParsedDocument {
        &self.document
    }

    /// Shared handle, e.g. for a render thread
    pub fn shared(&self) -> Arc<ParsedDocument> {
        Arc::clone(&self.document)
    }

    pub fn hash(&self) -> Option<u64> {
        self.content_hash
    }

    /// Force the next `needs_update` to report true, keeping the document
    pub fn mark_stale(&mut self) {
        self.content_hash = None;
    }

    pub fn clear(&mut self) {
        self.content_hash = None;
        self.document = Arc::default();
    }
}

/// Identifies one simplified segment list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LodCacheKey {
    pub classification: SegmentFilter,
    pub zoom_bucket: i32,
    pub pan_bucket: (i32, i32),
}

impl LodCacheKey {
    pub fn new(classification: SegmentFilter, view: &ViewState) -> Self {
        Self {
            classification,
            zoom_bucket: zoom_bucket(view.zoom),
            pan_bucket: (pan_bucket(view.pan_x), pan_bucket(view.pan_y)),
        }
    }
}

/// Quarter-octave bucket of a zoom factor
pub fn zoom_bucket(zoom: f32) -> i32 {
    let zoom = if zoom.is_finite() && zoom > 0.0 {
        zoom
    } else {
        f32::MIN_POSITIVE
    };
    (zoom.log2() * ZOOM_BUCKETS_PER_OCTAVE).floor() as i32
}

pub fn pan_bucket(offset: f32) -> i32 {
    if offset.is_finite() {
        (offset / PAN_BUCKET_SIZE).floor() as i32
    } else {
        0
    }
}

/// View buckets remembered before the lookup table is reset.
pub const MAX_VIEW_ENTRIES: usize = 64;

/// Simplified segment lists per view bucket
///
/// Simplification depends only on the segment filter and the detail tier, so
/// each `(filter, tier)` list is built once and shared by every view bucket
/// that maps to it. The view table is bounded by [`MAX_VIEW_ENTRIES`].
#[derive(Debug, Default, Clone)]
pub struct LodCache {
    views: HashMap<LodCacheKey, Arc<[PathSegment]>>,
    tiers: HashMap<(SegmentFilter, LodLevel), Arc<[PathSegment]>>,
}

impl LodCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &LodCacheKey) -> Option<&[PathSegment]> {
        self.views.get(key).map(|segments| &**segments)
    }

    /// Cached entry for `key`, building the `level` list on a miss
    pub fn get_or_insert_with(
        &mut self,
        key: LodCacheKey,
        level: LodLevel,
        build: impl FnOnce() -> Vec<PathSegment>,
    ) -> &[PathSegment] {
        if self.views.len() >= MAX_VIEW_ENTRIES && !self.views.contains_key(&key) {
            debug!("LOD view table full, resetting {} entries", self.views.len());
            self.views.clear();
        }

        let tiers = &mut self.tiers;
        let segments = self.views.entry(key).or_insert_with(|| {
            let shared = tiers
                .entry((key.classification, level))
                .or_insert_with(|| {
                    trace!("LOD cache miss: {:?} at {:?}", key.classification, level);
                    Arc::from(build())
                });
            Arc::clone(shared)
        });
        &**segments
    }

    pub fn invalidate(&mut self) {
        if !self.tiers.is_empty() {
            debug!(
                "Invalidating {} LOD lists ({} views)",
                self.tiers.len(),
                self.views.len()
            );
        }
        self.views.clear();
        self.tiers.clear();
    }

    /// View buckets currently mapped
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Distinct simplified lists held
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}
