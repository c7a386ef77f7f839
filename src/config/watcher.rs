//! Configuration file watcher for hot reload of the target list.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProbeConfig;

/// Monitors the configuration file and publishes every valid revision.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ProbeConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ProbeConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| handle_event(&path, res, &tx),
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Reload on modify/create; only configs that load and validate are published.
fn handle_event(
    path: &Path,
    res: notify::Result<Event>,
    tx: &mpsc::UnboundedSender<ProbeConfig>,
) {
    match res {
        Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
            tracing::info!(path = ?path, "Config file change detected, reloading");
            match load_config(path) {
                Ok(new_config) => {
                    let _ = tx.send(new_config);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to reload config, keeping current targets");
                }
            }
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = ?e, "Watch error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};

    use notify::event::{DataChange, EventKind, ModifyKind};

    fn modified(path: &Path) -> notify::Result<Event> {
        Ok(Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path.to_path_buf()))
    }

    fn rewrite(file: &mut tempfile::NamedTempFile, content: &str) {
        let f = file.as_file_mut();
        f.set_len(0).unwrap();
        f.rewind().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }

    #[test]
    fn test_only_valid_revisions_are_published() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let (watcher, mut updates) = ConfigWatcher::new(file.path());

        rewrite(
            &mut file,
            r#"
            [[targets]]
            name = "api"
            probe_url = "http://127.0.0.1:3000/ping"
            "#,
        );
        handle_event(&watcher.path, modified(file.path()), &watcher.update_tx);

        rewrite(
            &mut file,
            r#"
            [[targets]]
            name = "api"
            probe_url = "https://127.0.0.1:3000/ping"
            "#,
        );
        handle_event(&watcher.path, modified(file.path()), &watcher.update_tx);

        let config = updates.try_recv().unwrap();
        assert_eq!(config.targets[0].probe_url, "http://127.0.0.1:3000/ping");
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn test_non_write_events_are_ignored() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (watcher, mut updates) = ConfigWatcher::new(file.path());

        handle_event(
            &watcher.path,
            Ok(Event::new(EventKind::Access(notify::event::AccessKind::Any))),
            &watcher.update_tx,
        );
        handle_event(&watcher.path, Err(notify::Error::generic("boom")), &watcher.update_tx);

        assert!(updates.try_recv().is_err());
    }
}
