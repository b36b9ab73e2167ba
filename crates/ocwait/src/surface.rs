//! Rendered UI surfaces and element text probes.
//!
//! A [`Surface`] is anything that can reload itself and report the text of an
//! element. The browser backend lives behind the `browser` feature; tests
//! drive [`ElementProbe`] with in-memory surfaces.

use crate::observation::Observation;
use crate::observe::Observe;
use crate::result::{ProbeError, ProbeResult};
use crate::selector::Selector;
use async_trait::async_trait;
use tracing::debug;

/// A page that can be reloaded and queried
#[async_trait]
pub trait Surface: Send {
    /// Reload the current page
    async fn reload(&mut self) -> ProbeResult<()>;

    /// Text content of the first element matching `selector`, `None` if absent
    async fn element_text(&mut self, selector: &Selector) -> ProbeResult<Option<String>>;
}

/// Reload-then-read snapshots of one element
///
/// The first observation reads the page as it is; every later one reloads
/// first so that server-side changes become visible.
#[derive(Debug)]
pub struct ElementProbe<'a, S: ?Sized> {
    surface: &'a mut S,
    selector: Selector,
    observed: bool,
}

impl<'a, S: Surface + ?Sized> ElementProbe<'a, S> {
    /// Probe `selector` on `surface`
    #[must_use]
    pub fn new(surface: &'a mut S, selector: Selector) -> Self {
        Self {
            surface,
            selector,
            observed: false,
        }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }
}

#[async_trait]
impl<'a, S: Surface + ?Sized> Observe for ElementProbe<'a, S> {
    async fn observe(&mut self) -> ProbeResult<Observation> {
        if self.observed {
            self.surface.reload().await.map_err(into_observation_failure)?;
        }
        self.observed = true;

        let text = self
            .surface
            .element_text(&self.selector)
            .await
            .map_err(into_observation_failure)?;
        match text {
            Some(text) => Ok(Observation::text(text)),
            None => {
                debug!(selector = %self.selector, "element not present");
                Ok(Observation::empty())
            }
        }
    }

    fn describe(&self) -> String {
        self.selector.to_css()
    }
}

fn into_observation_failure(e: ProbeError) -> ProbeError {
    match e {
        ProbeError::ObservationFailed { .. } => e,
        other => ProbeError::observation(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::poll::{PollConfig, Poller};
    use std::time::Duration;

    /// Surface whose element text advances on each reload
    #[derive(Debug, Default)]
    struct ScriptedSurface {
        frames: Vec<Option<&'static str>>,
        current: usize,
        reloads: u32,
        reads: u32,
        broken: bool,
        unreachable: bool,
    }

    impl ScriptedSurface {
        fn new(frames: Vec<Option<&'static str>>) -> Self {
            Self {
                frames,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Surface for ScriptedSurface {
        async fn reload(&mut self) -> ProbeResult<()> {
            if self.broken {
                return Err(ProbeError::Browser {
                    message: "target closed".to_string(),
                });
            }
            self.reloads += 1;
            self.current = (self.current + 1).min(self.frames.len() - 1);
            Ok(())
        }

        async fn element_text(&mut self, _selector: &Selector) -> ProbeResult<Option<String>> {
            self.reads += 1;
            if self.unreachable {
                return Err(ProbeError::Browser {
                    message: "websocket closed".to_string(),
                });
            }
            Ok(self.frames[self.current].map(str::to_string))
        }
    }

    #[tokio::test]
    async fn test_first_observation_does_not_reload() {
        let mut surface = ScriptedSurface::new(vec![Some("Pending"), Some("Running")]);
        let mut probe = ElementProbe::new(&mut surface, Selector::test_id("status"));
        assert_eq!(probe.observe().await.unwrap().as_str(), "Pending");
        assert_eq!(probe.observe().await.unwrap().as_str(), "Running");
        assert_eq!(surface.reloads, 1);
    }

    #[tokio::test]
    async fn test_missing_element_is_empty_observation() {
        let mut surface = ScriptedSurface::new(vec![None]);
        let mut probe = ElementProbe::new(&mut surface, Selector::id("banner"));
        assert!(probe.observe().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reload_failure_is_observation_failure() {
        let mut surface = ScriptedSurface::new(vec![Some("x")]);
        surface.broken = true;
        let mut probe = ElementProbe::new(&mut surface, Selector::css("h1"));
        probe.observe().await.unwrap();
        let err = probe.observe().await.unwrap_err();
        assert!(matches!(err, ProbeError::ObservationFailed { .. }));
        assert!(err.to_string().contains("target closed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_surface_fails_on_first_attempt() {
        let mut surface = ScriptedSurface::new(vec![Some("Running")]);
        surface.unreachable = true;
        let start = tokio::time::Instant::now();
        let err = Poller::new("Running")
            .with_config(PollConfig::new(3, Duration::from_secs(10)))
            .poll(&mut ElementProbe::new(&mut surface, Selector::test_id("status")))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::ObservationFailed { .. }));
        assert!(err.to_string().contains("websocket closed"));
        assert_eq!(surface.reads, 1);
        assert_eq!(surface.reloads, 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_describe_is_css() {
        let mut surface = ScriptedSurface::new(vec![None]);
        let probe = ElementProbe::new(&mut surface, Selector::test_id_legacy("login"));
        assert_eq!(probe.describe(), r#"[data-test-id="login"]"#);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_element_appears() {
        let mut surface = ScriptedSurface::new(vec![None, None, Some("console-demo-plugin")]);
        let obs = Poller::new("console-demo-plugin")
            .with_config(PollConfig::new(4, Duration::from_millis(100)))
            .wait_until(&mut ElementProbe::new(&mut surface, Selector::test_id("plugin-name")))
            .await
            .unwrap();
        assert_eq!(obs.attempt(), 3);
        assert_eq!(surface.reloads, 2);
    }
}
