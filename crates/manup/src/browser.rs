use log::{debug, warn};
use manup_host::LinkLauncher;

/// Opens update links in the user's default browser or store handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl LinkLauncher for SystemBrowser {
    fn open(&self, url: &str) {
        debug!("Opening update link {url}");
        if let Err(error) = open::that_detached(url) {
            warn!("Failed to open update link {url}: {error}");
        }
    }
}
