use crate::colors::{ColorFallback, sanitize_colors};
use crate::error::CaptureError;
use crate::host::CaptureHost;
use docket_types::Color;
use image::RgbaImage;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureOptions {
    /// Device pixels per CSS pixel.
    pub scale: f32,
    /// Painted behind the region so transparent areas come out solid.
    pub background: Color,
    pub colors: ColorFallback,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: Color::WHITE,
            colors: ColorFallback::default(),
        }
    }
}

/// A rasterized region. The bitmap is shared read-only from here on.
#[derive(Debug, Clone)]
pub struct Capture {
    pub image: Arc<RgbaImage>,
}

impl Capture {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// An off-screen copy of a region. Dropping the guard detaches the copy.
pub struct OffscreenClone<'h, H: CaptureHost> {
    host: &'h mut H,
    node: H::Node,
}

impl<'h, H: CaptureHost> OffscreenClone<'h, H> {
    pub fn attach(host: &'h mut H, original: &H::Node) -> Result<Self, CaptureError> {
        let node = host.clone_offscreen(original)?;
        Ok(Self { host, node })
    }

    pub fn node(&self) -> &H::Node {
        &self.node
    }

    fn prepare(&mut self, background: Color) {
        self.host.set_style(&self.node, "background-color", &background.to_hex());
        self.host.set_style(&self.node, "box-sizing", "border-box");
    }

    fn rasterize(&mut self, options: &CaptureOptions) -> Result<RgbaImage, CaptureError> {
        self.host.rasterize(&self.node, options)
    }

    fn sanitize(&mut self, original: &H::Node, options: &CaptureOptions) -> usize {
        let count = sanitize_colors(&mut *self.host, original, &self.node, &options.colors);
        // The pass copies the original's root background over the forced one.
        self.prepare(options.background);
        count
    }
}

impl<H: CaptureHost> Drop for OffscreenClone<'_, H> {
    fn drop(&mut self) {
        self.host.remove(&self.node);
    }
}

/// Runs `attempt`; when it fails with an error accepted by `should_recover`,
/// runs `recover` and attempts exactly once more.
///
/// If the second attempt also fails, the error from the first attempt is
/// returned and the second is only logged.
pub fn capture_with_recovery<S, T, E>(
    state: &mut S,
    mut attempt: impl FnMut(&mut S) -> Result<T, E>,
    recover: impl FnOnce(&mut S),
    should_recover: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    E: fmt::Display,
{
    let first = match attempt(state) {
        Ok(value) => return Ok(value),
        Err(e) if should_recover(&e) => e,
        Err(e) => return Err(e),
    };

    log::debug!("First attempt failed ({}), recovering and retrying once.", first);
    recover(state);

    attempt(state).map_err(|retry| {
        log::debug!("Retry failed as well: {}", retry);
        first
    })
}

/// Rasterizes `region` through an off-screen clone.
///
/// An unsupported color function in the clone's styles triggers one color
/// fallback pass and a single retry.
pub fn capture_region<H: CaptureHost>(
    host: &mut H,
    region: &H::Node,
    options: &CaptureOptions,
) -> Result<Capture, CaptureError> {
    let mut clone = OffscreenClone::attach(host, region)?;
    clone.prepare(options.background);

    let image = capture_with_recovery(
        &mut clone,
        |clone| clone.rasterize(options),
        |clone| {
            let substituted = clone.sanitize(region, options);
            log::warn!(
                "Region uses unsupported color functions; substituted {} value(s) before retrying.",
                substituted
            );
        },
        |err| options.colors.is_unsupported_color(err),
    )?;

    log::debug!("Captured region at {}x{} px.", image.width(), image.height());
    Ok(Capture { image: Arc::new(image) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RegionRef;
    use std::collections::{BTreeMap, HashMap, VecDeque};

    #[derive(Debug, Clone, Default)]
    struct MockNode {
        styles: BTreeMap<String, String>,
        children: Vec<usize>,
    }

    #[derive(Default)]
    struct MockHost {
        nodes: Vec<MockNode>,
        ids: HashMap<String, usize>,
        attached: Vec<usize>,
        removed: Vec<usize>,
        rasterize_calls: usize,
        scripted_failures: VecDeque<CaptureError>,
        fail_clone: bool,
    }

    impl MockHost {
        fn add(&mut self, styles: &[(&str, &str)], children: Vec<usize>) -> usize {
            self.nodes.push(MockNode {
                styles: styles.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                children,
            });
            self.nodes.len() - 1
        }

        fn deep_copy(&mut self, node: usize) -> usize {
            let source = self.nodes[node].clone();
            let children = source.children.iter().map(|&c| self.deep_copy(c)).collect();
            self.nodes.push(MockNode { styles: source.styles, children });
            self.nodes.len() - 1
        }

        fn style(&self, node: usize, property: &str) -> Option<&str> {
            self.nodes[node].styles.get(property).map(String::as_str)
        }

        fn first_unsupported(&self, node: usize, fallback: &ColorFallback) -> Option<String> {
            let own = self.nodes[node]
                .styles
                .values()
                .find_map(|v| fallback.find_unsupported(v).map(String::from));
            own.or_else(|| {
                self.nodes[node]
                    .children
                    .iter()
                    .find_map(|&c| self.first_unsupported(c, fallback))
            })
        }
    }

    impl CaptureHost for MockHost {
        type Node = usize;

        fn resolve(&self, region: &RegionRef<usize>) -> Option<usize> {
            match region {
                RegionRef::Id(id) => self.ids.get(id).copied(),
                RegionRef::Node(n) => Some(*n),
            }
        }

        fn children(&self, node: &usize) -> Vec<usize> {
            self.nodes[*node].children.clone()
        }

        fn computed_style(&self, node: &usize, property: &str) -> Option<String> {
            self.style(*node, property).map(String::from)
        }

        fn set_style(&mut self, node: &usize, property: &str, value: &str) {
            self.nodes[*node].styles.insert(property.to_string(), value.to_string());
        }

        fn clone_offscreen(&mut self, node: &usize) -> Result<usize, CaptureError> {
            if self.fail_clone {
                return Err(CaptureError::OffscreenClone("body is not available".into()));
            }
            let copy = self.deep_copy(*node);
            self.attached.push(copy);
            Ok(copy)
        }

        fn remove(&mut self, node: &usize) {
            self.attached.retain(|n| n != node);
            self.removed.push(*node);
        }

        fn rasterize(
            &mut self,
            node: &usize,
            options: &CaptureOptions,
        ) -> Result<RgbaImage, CaptureError> {
            self.rasterize_calls += 1;
            if let Some(err) = self.scripted_failures.pop_front() {
                return Err(err);
            }
            if let Some(function) = self.first_unsupported(*node, &options.colors) {
                return Err(CaptureError::UnsupportedColorFunction {
                    function,
                    message: "Attempting to parse an unsupported color function".into(),
                });
            }
            Ok(RgbaImage::new(8, 6))
        }
    }

    fn unsupported(tag: &str) -> CaptureError {
        CaptureError::UnsupportedColorFunction {
            function: "oklch".into(),
            message: tag.into(),
        }
    }

    #[test]
    fn clean_region_is_captured_on_first_attempt() {
        let mut host = MockHost::default();
        let child = host.add(&[("color", "rgb(10, 20, 30)")], vec![]);
        let root = host.add(&[("background-color", "rgba(0, 0, 0, 0)")], vec![child]);

        let capture = capture_region(&mut host, &root, &CaptureOptions::default()).unwrap();

        assert_eq!((capture.width(), capture.height()), (8, 6));
        assert_eq!(host.rasterize_calls, 1);
        assert!(host.attached.is_empty());
        assert_eq!(host.removed.len(), 1);

        let clone = host.removed[0];
        assert_eq!(host.style(clone, "background-color"), Some("#ffffff"));
        assert_eq!(host.style(clone, "box-sizing"), Some("border-box"));
        // The live region is never touched.
        assert_eq!(
            host.style(root, "background-color"),
            Some("rgba(0, 0, 0, 0)")
        );
    }

    #[test]
    fn unsupported_color_triggers_one_fallback_and_retry() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut host = MockHost::default();
        let child = host.add(
            &[("color", "oklch(0.6 0.1 250)"), ("box-shadow", "0 1px 2px oklab(0.2 0 0)")],
            vec![],
        );
        let root = host.add(&[("border-top-color", "rgb(1, 2, 3)")], vec![child]);

        let capture = capture_region(&mut host, &root, &CaptureOptions::default()).unwrap();

        assert_eq!(capture.width(), 8);
        assert_eq!(host.rasterize_calls, 2);
        assert!(host.attached.is_empty());

        let clone = host.removed[0];
        let clone_child = host.nodes[clone].children[0];
        assert_eq!(host.style(clone_child, "color"), Some("#000000"));
        assert_eq!(host.style(clone_child, "box-shadow"), Some("none"));
        assert_eq!(host.style(clone, "border-top-color"), Some("rgb(1, 2, 3)"));
        assert_eq!(host.style(clone, "background-color"), Some("#ffffff"));
        assert_eq!(host.style(child, "color"), Some("oklch(0.6 0.1 250)"));
    }

    #[test]
    fn fallback_keeps_supported_values() {
        let mut host = MockHost::default();
        let child = host.add(
            &[("color", "rgb(200, 0, 0)"), ("background-color", "#fafafa"), ("box-shadow", "none")],
            vec![],
        );
        let root = host.add(&[("border-left-color", "rgba(0, 0, 0, 0.5)")], vec![child]);
        let clone = host.deep_copy(root);

        let substituted = sanitize_colors(&mut host, &root, &clone, &ColorFallback::default());

        assert_eq!(substituted, 0);
        let clone_child = host.nodes[clone].children[0];
        assert_eq!(host.style(clone_child, "color"), Some("rgb(200, 0, 0)"));
        assert_eq!(host.style(clone_child, "background-color"), Some("#fafafa"));
        assert_eq!(host.style(clone_child, "box-shadow"), Some("none"));
        assert_eq!(
            host.style(clone, "border-left-color"),
            Some("rgba(0, 0, 0, 0.5)")
        );
    }

    #[test]
    fn failed_retry_surfaces_the_first_error() {
        let mut host = MockHost::default();
        let root = host.add(&[("color", "black")], vec![]);
        host.scripted_failures.push_back(unsupported("first attempt"));
        host.scripted_failures.push_back(unsupported("second attempt"));

        let err = capture_region(&mut host, &root, &CaptureOptions::default()).unwrap_err();

        assert_eq!(err, unsupported("first attempt"));
        assert_eq!(host.rasterize_calls, 2);
        assert!(host.attached.is_empty());
    }

    #[test]
    fn other_failures_are_not_retried() {
        let mut host = MockHost::default();
        let root = host.add(&[], vec![]);
        host.scripted_failures
            .push_back(CaptureError::Rasterize("canvas exceeds maximum size".into()));

        let err = capture_region(&mut host, &root, &CaptureOptions::default()).unwrap_err();

        assert_eq!(
            err,
            CaptureError::Rasterize("canvas exceeds maximum size".into())
        );
        assert_eq!(host.rasterize_calls, 1);
        assert!(host.attached.is_empty());
        assert_eq!(host.removed.len(), 1);
    }

    #[test]
    fn clone_failure_propagates_without_cleanup() {
        let mut host = MockHost::default();
        let root = host.add(&[], vec![]);
        host.fail_clone = true;

        let err = capture_region(&mut host, &root, &CaptureOptions::default()).unwrap_err();

        assert!(matches!(err, CaptureError::OffscreenClone(_)));
        assert_eq!(host.rasterize_calls, 0);
        assert!(host.removed.is_empty());
    }

    #[test]
    fn recovery_runs_at_most_once() {
        let mut calls = 0;
        let mut recovered = 0;
        let result: Result<(), String> = capture_with_recovery(
            &mut calls,
            |calls| {
                *calls += 1;
                Err(format!("attempt {}", calls))
            },
            |_| recovered += 1,
            |_| true,
        );

        assert_eq!(result, Err("attempt 1".to_string()));
        assert_eq!(calls, 2);
        assert_eq!(recovered, 1);
    }

    #[test]
    fn deserializes_options_with_defaults() {
        let options: CaptureOptions = serde_json::from_str(r#"{"scale": 1.0}"#).unwrap();
        assert_eq!(options.scale, 1.0);
        assert_eq!(options.background, Color::WHITE);
        assert_eq!(options.colors, ColorFallback::default());
    }
}
