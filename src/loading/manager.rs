//! Load progress tracking and the loading overlay state machine
//!
//! Every asset load reports `item_start` when it is queued and `item_end`
//! when it finishes, successfully or not. Failures additionally report
//! `item_error` first. The manager turns that stream into the overlay the
//! UI draws: a progress bar while loading, a fade-out once everything has
//! arrived, and a frozen error panel when anything failed.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{error, info};

/// What the loading overlay currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Hidden,
    Loading,
    /// All items finished; the overlay fades out from `since`
    FadingOut { since: Instant },
    /// A load failed; stays until the scene is rebuilt
    Error,
}

/// Broad category of a failed asset, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    Image,
    Other,
}

impl AssetKind {
    pub fn from_url(url: &str) -> Self {
        let extension = Path::new(url)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("glb" | "gltf") => AssetKind::Model,
            Some("png" | "jpg" | "jpeg") => AssetKind::Image,
            _ => AssetKind::Other,
        }
    }
}

/// Failure shown on the error overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub url: String,
    pub kind: AssetKind,
}

impl LoadFailure {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: AssetKind::from_url(url),
        }
    }

    /// Headline, e.g. "Failed to load: models/scene.glb"
    pub fn title(&self) -> String {
        format!("Failed to load: {}", self.url)
    }

    /// Explanation keyed by the asset kind
    pub fn details(&self) -> String {
        match self.kind {
            AssetKind::Model => format!(
                "The model file failed to load. Possible causes:\n\
                 - the file does not exist or the path is wrong\n\
                 - the file could not be read\n\
                 - the GLB file is malformed\n\n\
                 Make sure {} exists and is readable.",
                self.url
            ),
            AssetKind::Image => {
                let file_name = Path::new(&self.url)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(&self.url);
                format!(
                    "The texture or lightmap file failed to load. Possible causes:\n\
                     - the file does not exist or the path is wrong\n\
                     - the image format is not supported\n\n\
                     Make sure {} exists and is readable.",
                    file_name
                )
            }
            AssetKind::Other => {
                "A resource failed to load. Check that the file exists and the path is correct."
                    .to_string()
            }
        }
    }
}

/// Progress percentage for `loaded` of `total` items, capped at 100
pub fn progress_percent(loaded: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let percent = (loaded as f64 / total as f64 * 100.0).round() as u32;
    percent.min(100)
}

pub struct LoadingManager {
    items_loaded: usize,
    items_total: usize,
    is_loading: bool,
    phase: OverlayPhase,
    percent: u32,
    status: String,
    failure: Option<LoadFailure>,
    fade_duration: Duration,
}

impl LoadingManager {
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            items_loaded: 0,
            items_total: 0,
            is_loading: false,
            phase: OverlayPhase::Hidden,
            percent: 0,
            status: String::new(),
            failure: None,
            fade_duration,
        }
    }

    /// Registers a queued load; the first one of a batch shows the overlay
    pub fn item_start(&mut self, url: &str) {
        self.items_total += 1;

        if !self.is_loading {
            self.is_loading = true;
            info!("Started loading: {}", url);
            self.on_start();
        }
    }

    /// Registers a finished load, successful or not
    pub fn item_end(&mut self, url: &str, now: Instant) {
        self.items_loaded += 1;

        info!(
            "Loading file: {} ({}/{})",
            url, self.items_loaded, self.items_total
        );
        self.on_progress();

        if self.items_loaded == self.items_total {
            self.is_loading = false;
            info!("Loading complete!");
            self.on_load(now);
        }
    }

    /// Registers a failed load; call before the matching `item_end`
    pub fn item_error(&mut self, url: &str) {
        error!("Error loading {}", url);

        self.phase = OverlayPhase::Error;
        // Keep the first failure on screen
        if self.failure.is_none() {
            let failure = LoadFailure::new(url);
            self.status = failure.title();
            self.failure = Some(failure);
        }
    }

    fn on_start(&mut self) {
        if self.phase == OverlayPhase::Error {
            return;
        }
        self.phase = OverlayPhase::Loading;
        self.percent = 0;
        self.status = "Loading...".to_string();
    }

    fn on_progress(&mut self) {
        let percent = progress_percent(self.items_loaded, self.items_total);
        // Items queued late can lower the ratio; the bar never moves back
        self.percent = self.percent.max(percent);
        if self.phase != OverlayPhase::Error {
            self.status = format!("Loading... {}%", self.percent);
        }
    }

    fn on_load(&mut self, now: Instant) {
        if matches!(self.phase, OverlayPhase::Loading) {
            self.phase = OverlayPhase::FadingOut { since: now };
        }
    }

    /// Advances the fade; hides the overlay once the fade has elapsed
    pub fn tick(&mut self, now: Instant) {
        if let OverlayPhase::FadingOut { since } = self.phase {
            if now.duration_since(since) >= self.fade_duration {
                self.phase = OverlayPhase::Hidden;
            }
        }
    }

    /// Overlay opacity in 0..=1
    pub fn overlay_opacity(&self, now: Instant) -> f32 {
        match self.phase {
            OverlayPhase::Hidden => 0.0,
            OverlayPhase::Loading | OverlayPhase::Error => 1.0,
            OverlayPhase::FadingOut { since } => {
                if self.fade_duration.is_zero() {
                    return 0.0;
                }
                let t = now.duration_since(since).as_secs_f32() / self.fade_duration.as_secs_f32();
                (1.0 - t).clamp(0.0, 1.0)
            }
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// (loaded, total)
    pub fn items(&self) -> (usize, usize) {
        (self.items_loaded, self.items_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FADE: Duration = Duration::from_millis(500);

    #[test]
    fn test_start_shows_overlay() {
        let mut manager = LoadingManager::new(FADE);
        assert_eq!(manager.phase(), OverlayPhase::Hidden);

        manager.item_start("textures/baked.png");
        manager.item_start("models/scene.glb");
        assert_eq!(manager.phase(), OverlayPhase::Loading);
        assert_eq!(manager.status_text(), "Loading...");
        assert_eq!(manager.percent(), 0);
        assert_eq!(manager.items(), (0, 2));
        assert!(manager.is_loading());
    }

    #[test]
    fn test_progress_is_monotone_and_reaches_100() {
        for total in 1..=7 {
            let mut manager = LoadingManager::new(FADE);
            let now = Instant::now();
            for i in 0..total {
                manager.item_start(&format!("asset{}.png", i));
            }

            let mut last = 0;
            for i in 0..total {
                manager.item_end(&format!("asset{}.png", i), now);
                assert!(manager.percent() >= last);
                last = manager.percent();
            }
            assert_eq!(manager.percent(), 100);
            assert_eq!(manager.status_text(), "Loading... 100%");
        }
    }

    #[test]
    fn test_percent_rounds() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(5, 4), 100);
    }

    #[test]
    fn test_complete_fades_then_hides() {
        let mut manager = LoadingManager::new(FADE);
        let start = Instant::now();
        manager.item_start("a.png");
        manager.item_end("a.png", start);

        assert_eq!(manager.phase(), OverlayPhase::FadingOut { since: start });
        assert!(!manager.is_loading());
        assert_eq!(manager.overlay_opacity(start), 1.0);
        let half = manager.overlay_opacity(start + Duration::from_millis(250));
        assert!((half - 0.5).abs() < 1e-3);

        manager.tick(start + Duration::from_millis(499));
        assert!(matches!(manager.phase(), OverlayPhase::FadingOut { .. }));
        manager.tick(start + FADE);
        assert_eq!(manager.phase(), OverlayPhase::Hidden);
        assert_eq!(manager.overlay_opacity(start + FADE), 0.0);
    }

    #[test]
    fn test_error_freezes_overlay_through_completion() {
        let mut manager = LoadingManager::new(FADE);
        let now = Instant::now();
        manager.item_start("textures/baked.png");
        manager.item_start("models/scene.glb");

        manager.item_error("models/scene.glb");
        manager.item_end("models/scene.glb", now);
        manager.item_end("textures/baked.png", now);
        manager.tick(now + Duration::from_secs(5));

        assert_eq!(manager.phase(), OverlayPhase::Error);
        assert_eq!(manager.status_text(), "Failed to load: models/scene.glb");
        assert_eq!(manager.overlay_opacity(now), 1.0);
        assert_eq!(manager.failure().map(|f| f.kind), Some(AssetKind::Model));
    }

    #[test]
    fn test_first_failure_is_kept() {
        let mut manager = LoadingManager::new(FADE);
        manager.item_start("a.png");
        manager.item_start("b.glb");
        manager.item_error("a.png");
        manager.item_error("b.glb");
        assert_eq!(manager.failure().map(|f| f.url.as_str()), Some("a.png"));
    }

    #[test]
    fn test_status_names_the_kept_failure() {
        let mut manager = LoadingManager::new(FADE);
        manager.item_start("textures/lightmap.png");
        manager.item_start("models/scene.glb");
        manager.item_error("textures/lightmap.png");
        manager.item_error("models/scene.glb");

        let failure = manager.failure().unwrap();
        assert_eq!(failure.kind, AssetKind::Image);
        assert_eq!(manager.status_text(), failure.title());
        assert_eq!(manager.status_text(), "Failed to load: textures/lightmap.png");
    }

    #[test]
    fn test_error_message_keyed_by_extension() {
        let image = LoadFailure::new("static/textures/scene_lightmap.png");
        assert_eq!(image.kind, AssetKind::Image);
        assert!(image.details().contains("texture or lightmap"));
        assert!(image.details().contains("scene_lightmap.png"));

        assert_eq!(AssetKind::from_url("photo.JPG"), AssetKind::Image);
        assert_eq!(AssetKind::from_url("photo.jpeg"), AssetKind::Image);

        let model = LoadFailure::new("models/scene.glb");
        assert_eq!(model.kind, AssetKind::Model);
        assert!(model.details().contains("model file"));
        assert!(!model.details().contains("lightmap"));
        assert_eq!(AssetKind::from_url("models/scene.gltf"), AssetKind::Model);

        for url in ["data/scene.bin", "noextension", "archive.png.zip"] {
            let other = LoadFailure::new(url);
            assert_eq!(other.kind, AssetKind::Other);
            assert!(!other.details().contains("lightmap"));
            assert!(!other.details().contains("model file"));
        }
    }
}
