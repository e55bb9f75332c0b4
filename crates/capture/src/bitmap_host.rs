use crate::CaptureOptions;
use crate::error::CaptureError;
use crate::host::{CaptureHost, RegionRef};
use image::RgbaImage;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Region {
    image: Arc<RgbaImage>,
    styles: BTreeMap<String, String>,
    offscreen: bool,
}

/// A host whose regions are already rendered bitmaps.
///
/// Regions are flat (no children). Rasterizing returns the stored bitmap
/// unchanged, so `CaptureOptions::scale` has no effect here. Removed nodes
/// free their slot for the next clone.
#[derive(Debug, Default)]
pub struct BitmapHost {
    regions: Vec<Option<Region>>,
    free: Vec<usize>,
    ids: HashMap<String, usize>,
}

impl BitmapHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `id`, replacing any previous region with that id.
    pub fn insert(&mut self, id: impl Into<String>, image: RgbaImage) -> usize {
        let region = Region {
            image: Arc::new(image),
            styles: BTreeMap::new(),
            offscreen: false,
        };
        let id = id.into();
        match self.ids.get(&id) {
            Some(&node) => {
                self.regions[node] = Some(region);
                node
            }
            None => {
                let node = self.allocate(region);
                self.ids.insert(id, node);
                node
            }
        }
    }

    pub fn style(&self, node: usize, property: &str) -> Option<&str> {
        self.region(node)?.styles.get(property).map(String::as_str)
    }

    /// Number of off-screen clones still attached.
    pub fn attached_clones(&self) -> usize {
        self.regions.iter().flatten().filter(|r| r.offscreen).count()
    }

    fn region(&self, node: usize) -> Option<&Region> {
        self.regions.get(node)?.as_ref()
    }

    fn allocate(&mut self, region: Region) -> usize {
        match self.free.pop() {
            Some(node) => {
                self.regions[node] = Some(region);
                node
            }
            None => {
                self.regions.push(Some(region));
                self.regions.len() - 1
            }
        }
    }
}

impl CaptureHost for BitmapHost {
    type Node = usize;

    fn resolve(&self, region: &RegionRef<usize>) -> Option<usize> {
        let node = match region {
            RegionRef::Id(id) => *self.ids.get(id)?,
            RegionRef::Node(node) => *node,
        };
        self.region(node).map(|_| node)
    }

    fn children(&self, _node: &usize) -> Vec<usize> {
        Vec::new()
    }

    fn computed_style(&self, node: &usize, property: &str) -> Option<String> {
        self.style(*node, property).map(String::from)
    }

    fn set_style(&mut self, node: &usize, property: &str, value: &str) {
        if let Some(Some(region)) = self.regions.get_mut(*node) {
            region.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn clone_offscreen(&mut self, node: &usize) -> Result<usize, CaptureError> {
        let mut clone = self
            .region(*node)
            .ok_or_else(|| CaptureError::OffscreenClone(format!("unknown node {}", node)))?
            .clone();
        clone.offscreen = true;
        Ok(self.allocate(clone))
    }

    fn remove(&mut self, node: &usize) {
        let removed = self.regions.get_mut(*node).and_then(Option::take);
        if removed.is_some() {
            self.ids.retain(|_, n| *n != *node);
            self.free.push(*node);
        }
    }

    fn rasterize(
        &mut self,
        node: &usize,
        options: &CaptureOptions,
    ) -> Result<RgbaImage, CaptureError> {
        let region = self
            .region(*node)
            .ok_or_else(|| CaptureError::Rasterize(format!("node {} is not attached", node)))?;

        for value in region.styles.values() {
            if let Some(function) = options.colors.find_unsupported(value) {
                return Err(CaptureError::UnsupportedColorFunction {
                    function: function.to_string(),
                    message: format!("cannot parse '{}'", value),
                });
            }
        }

        Ok(region.image.as_ref().clone())
    }
}
