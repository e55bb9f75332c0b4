use crate::CaptureOptions;
use crate::error::CaptureError;
use image::RgbaImage;
use std::fmt;

/// Names a region of the host interface.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionRef<N> {
    /// An element identifier, resolved by the host.
    Id(String),
    /// A node handle the caller already holds.
    Node(N),
}

impl<N> fmt::Display for RegionRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionRef::Id(id) => write!(f, "#{}", id),
            RegionRef::Node(_) => write!(f, "<node>"),
        }
    }
}

impl<N> From<&str> for RegionRef<N> {
    fn from(id: &str) -> Self {
        RegionRef::Id(id.to_string())
    }
}

/// The rendering surface that owns the interface being captured.
///
/// Implementations wrap whatever tree the interface lives in. Nodes are
/// cheap handles; every mutation goes through the host.
pub trait CaptureHost {
    type Node: Clone;

    /// Returns the live node for `region`, or `None` when it is not attached.
    fn resolve(&self, region: &RegionRef<Self::Node>) -> Option<Self::Node>;

    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// The resolved (computed) value of a style property.
    fn computed_style(&self, node: &Self::Node, property: &str) -> Option<String>;

    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Deep-clones `node` into the document body, positioned off-screen.
    fn clone_offscreen(&mut self, node: &Self::Node) -> Result<Self::Node, CaptureError>;

    /// Detaches a node previously returned by [`CaptureHost::clone_offscreen`].
    fn remove(&mut self, node: &Self::Node);

    fn rasterize(
        &mut self,
        node: &Self::Node,
        options: &CaptureOptions,
    ) -> Result<RgbaImage, CaptureError>;
}
