use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::surface::function::{ShapeParams, TwistedTorus};
use crate::surface::mesh::StripMesh;
use crate::surface::normal::NormalMode;
use crate::surface::tessellator::{TessellationError, TessellationSettings, build_mesh};

const DEFAULT_CAPACITY: usize = 4;

/// Bit-exact parameter tuple. Two requests share a mesh only when every
/// float is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshKey {
    major_radius: u64,
    amplitude: u64,
    lobes: u32,
    zoom: u64,
    step_u: u64,
    step_v: u64,
    delta_u: u64,
    delta_v: u64,
    normal_mode: NormalMode,
}

impl MeshKey {
    pub fn new(params: &ShapeParams, settings: &TessellationSettings) -> Self {
        Self {
            major_radius: params.major_radius.to_bits(),
            amplitude: params.amplitude.to_bits(),
            lobes: params.lobes,
            zoom: params.zoom.to_bits(),
            step_u: settings.step_u.to_bits(),
            step_v: settings.step_v.to_bits(),
            delta_u: settings.deltas.du.to_bits(),
            delta_v: settings.deltas.dv.to_bits(),
            normal_mode: settings.normal_mode,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct MeshCache {
    entries: HashMap<MeshKey, Arc<StripMesh>>,
    order: VecDeque<MeshKey>,
    capacity: usize,
    stats: CacheStats,
}

impl Default for MeshCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MeshCache {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            stats: CacheStats::default(),
        }
    }

    pub fn get_or_build(
        &mut self,
        params: ShapeParams,
        settings: &TessellationSettings,
    ) -> Result<Arc<StripMesh>, TessellationError> {
        let key = MeshKey::new(&params, settings);

        if let Some(mesh) = self.entries.get(&key) {
            self.stats.hits += 1;
            let mesh = Arc::clone(mesh);
            self.touch(key);
            return Ok(mesh);
        }

        let mesh = Arc::new(build_mesh(&TwistedTorus::new(params), settings)?);
        self.stats.misses += 1;

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, Arc::clone(&mesh));
        self.order.push_back(key);

        Ok(mesh)
    }

    fn touch(&mut self, key: MeshKey) {
        if let Some(pos) = self.order.iter().position(|k| *k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn coarse() -> TessellationSettings {
        TessellationSettings::with_steps(PI / 6.0, TAU / 8.0)
    }

    #[test]
    fn test_same_tuple_shares_mesh() {
        let mut cache = MeshCache::default();
        let a = cache.get_or_build(ShapeParams::reference(), &coarse()).unwrap();
        let b = cache.get_or_build(ShapeParams::reference(), &coarse()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_any_changed_field_misses() {
        let mut cache = MeshCache::with_capacity(16);
        let base = cache.get_or_build(ShapeParams::reference(), &coarse()).unwrap();

        let mut params = ShapeParams::reference();
        params.lobes = 5;
        let other = cache.get_or_build(params, &coarse()).unwrap();
        assert!(!Arc::ptr_eq(&base, &other));

        let mut settings = coarse();
        settings.normal_mode = NormalMode::Reference;
        cache.get_or_build(ShapeParams::reference(), &settings).unwrap();

        let mut settings = coarse();
        settings.deltas.dv = 0.001;
        cache.get_or_build(ShapeParams::reference(), &settings).unwrap();

        assert_eq!(cache.stats().misses, 4);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = MeshCache::with_capacity(2);
        let mut first = ShapeParams::reference();
        first.lobes = 3;
        let mut second = ShapeParams::reference();
        second.lobes = 4;
        let mut third = ShapeParams::reference();
        third.lobes = 5;

        cache.get_or_build(first, &coarse()).unwrap();
        cache.get_or_build(second, &coarse()).unwrap();
        cache.get_or_build(first, &coarse()).unwrap();
        cache.get_or_build(third, &coarse()).unwrap();
        assert_eq!(cache.len(), 2);

        cache.get_or_build(first, &coarse()).unwrap();
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 3 });

        cache.get_or_build(second, &coarse()).unwrap();
        assert_eq!(cache.stats().misses, 4);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = MeshCache::default();
        let bad = TessellationSettings::with_steps(-1.0, 0.1);
        assert!(cache.get_or_build(ShapeParams::reference(), &bad).is_err());
        assert_eq!(cache.len(), 0);
    }
}
