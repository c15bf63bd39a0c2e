//! Background asset loading
//!
//! Each file is read and decoded on its own thread. Completions are sent
//! over a channel and drained on the event-loop thread by `poll`, so every
//! completion handler runs on one thread in arrival order.

use std::path::{Path, PathBuf};
use std::thread;

use flume::{Receiver, Sender};
use log::{debug, warn};

use super::{
    manager::LoadingManager,
    model::load_model_file,
    texture::{load_texture_file, TextureData},
};
use crate::{error::LoadError, gfx::color::ColorSpace, gfx::scene::model::MeshData};

/// Which scene asset a completion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    BakedTexture,
    Lightmap,
    Model,
}

#[derive(Debug)]
pub enum AssetPayload {
    Texture(TextureData),
    Model(Vec<MeshData>),
}

#[derive(Debug)]
pub struct LoadEvent {
    pub id: AssetId,
    pub url: String,
    pub result: Result<AssetPayload, LoadError>,
}

pub struct AssetLoader {
    tx: Sender<LoadEvent>,
    rx: Receiver<LoadEvent>,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    /// Queues an image load; registers it with `manager` first
    pub fn load_texture(
        &self,
        id: AssetId,
        path: &Path,
        color_space: ColorSpace,
        manager: &mut LoadingManager,
    ) {
        self.spawn(id, path.to_path_buf(), manager, move |p| {
            load_texture_file(p, color_space).map(AssetPayload::Texture)
        });
    }

    /// Queues a GLB/glTF load; registers it with `manager` first
    pub fn load_model(&self, id: AssetId, path: &Path, manager: &mut LoadingManager) {
        self.spawn(id, path.to_path_buf(), manager, |p| {
            load_model_file(p).map(AssetPayload::Model)
        });
    }

    fn spawn<F>(&self, id: AssetId, path: PathBuf, manager: &mut LoadingManager, load: F)
    where
        F: FnOnce(&Path) -> Result<AssetPayload, LoadError> + Send + 'static,
    {
        let url = path.display().to_string();
        manager.item_start(&url);

        let tx = self.tx.clone();
        let thread_url = url.clone();
        let spawned = thread::Builder::new()
            .name(format!("load {:?}", id))
            .spawn(move || {
                let result = load(&path);
                // The scene may be gone by now; late results are dropped
                if tx.send(LoadEvent { id, url: thread_url, result }).is_err() {
                    debug!("discarding load result for {}", path.display());
                }
            });

        if let Err(e) = spawned {
            warn!("could not start loader thread for {}: {}", url, e);
            let _ = self.tx.send(LoadEvent {
                id,
                url: url.clone(),
                result: Err(LoadError::Io { url, source: e }),
            });
        }
    }

    /// Drains every completion that has arrived so far
    pub fn poll(&self) -> Vec<LoadEvent> {
        self.rx.try_iter().collect()
    }

    /// Blocks until the next completion arrives or `timeout` passes
    pub fn wait(&self, timeout: std::time::Duration) -> Option<LoadEvent> {
        self.rx.recv_timeout(timeout).ok()
    }
}
