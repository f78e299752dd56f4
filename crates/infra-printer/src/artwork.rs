// Ticket artwork loading
//
// Each company has a header (`ticket_{c}_01.png`) and a footer
// (`ticket_{c}_02.png`) image. Both are rasterized once and cached.

use crate::raster::MonoImage;
use queueboard_core::domain::CompanyId;
use queueboard_core::port::PrintError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Rasterized artwork for one company. Missing files are `None`.
#[derive(Debug, Clone, Default)]
pub struct TicketArtwork {
    pub header: Option<MonoImage>,
    pub footer: Option<MonoImage>,
}

pub struct ArtworkStore {
    dir: PathBuf,
    cache: Mutex<HashMap<CompanyId, Arc<TicketArtwork>>>,
}

impl ArtworkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn header_path(&self, company: CompanyId) -> PathBuf {
        self.dir.join(file_name(company, 1))
    }

    pub fn footer_path(&self, company: CompanyId) -> PathBuf {
        self.dir.join(file_name(company, 2))
    }

    /// Artwork for `company`, decoding on first use
    pub async fn get(&self, company: CompanyId) -> Result<Arc<TicketArtwork>, PrintError> {
        let mut cache = self.cache.lock().await;
        if let Some(artwork) = cache.get(&company) {
            return Ok(Arc::clone(artwork));
        }

        let header_path = self.header_path(company);
        let footer_path = self.footer_path(company);
        let artwork = tokio::task::spawn_blocking(move || -> Result<TicketArtwork, PrintError> {
            Ok(TicketArtwork {
                header: load_mono(&header_path)?,
                footer: load_mono(&footer_path)?,
            })
        })
        .await
        .map_err(|e| PrintError::Artwork(format!("artwork task failed: {}", e)))??;

        debug!(company = %company, "Ticket artwork loaded");
        let artwork = Arc::new(artwork);
        cache.insert(company, Arc::clone(&artwork));
        Ok(artwork)
    }
}

fn file_name(company: CompanyId, part: u8) -> String {
    format!(
        "ticket_{}_{:02}.png",
        company.letter().to_ascii_lowercase(),
        part
    )
}

fn load_mono(path: &Path) -> Result<Option<MonoImage>, PrintError> {
    if !path.exists() {
        warn!(path = %path.display(), "Ticket artwork missing, skipped");
        return Ok(None);
    }
    let image = image::open(path)
        .map_err(|e| PrintError::Artwork(format!("Failed to load image: {} ({})", path.display(), e)))?;
    Ok(Some(MonoImage::from_rgba(&image.to_rgba8())))
}
