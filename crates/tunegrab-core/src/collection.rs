//! Download every track of a resolved Spotify collection

use crate::downloader::{DownloadRequest, Fetch, MediaKind};
use crate::error::Result;
use crate::format::AudioFormat;
use crate::naming::{sanitize_filename, track_file_stem};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::debug;
use tunegrab_spotify::{Collection, Track};

/// Progress events for a collection job
#[derive(Debug, Clone)]
pub enum CollectionEvent {
    Started { name: String, total: usize, directory: PathBuf },
    Skipped { index: usize, total: usize, query: String },
    Downloading { index: usize, total: usize, query: String },
    Downloaded { index: usize, total: usize, query: String, files: Vec<PathBuf> },
    Failed { index: usize, total: usize, query: String, error: String },
    Finished(Summary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} successful, {} skipped, {} failed",
            self.downloaded, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Downloaded,
    Skipped,
    Failed,
}

pub struct CollectionJob<F> {
    fetcher: F,
    audio_format: AudioFormat,
    parallel: usize,
    progress_tx: mpsc::Sender<CollectionEvent>,
}

impl<F: Fetch> CollectionJob<F> {
    pub fn new(
        fetcher: F,
        audio_format: AudioFormat,
        parallel: usize,
        progress_tx: mpsc::Sender<CollectionEvent>,
    ) -> Self {
        Self {
            fetcher,
            audio_format,
            parallel: parallel.max(1),
            progress_tx,
        }
    }

    /// Directory a collection is written to under `output_root`
    pub fn directory_for(collection: &Collection, output_root: &Path) -> PathBuf {
        let name = sanitize_filename(&collection.name);
        if name.is_empty() {
            output_root.join("Untitled")
        } else {
            output_root.join(name)
        }
    }

    /// Download all tracks; individual failures are counted, never fatal
    pub async fn run(&self, collection: &Collection, output_root: &Path) -> Result<Summary> {
        let directory = Self::directory_for(collection, output_root);
        tokio::fs::create_dir_all(&directory).await?;

        let total = collection.tracks.len();
        debug!("{}: {} ({} tracks)", collection.kind, collection.name, total);
        debug!("Output directory: {}", directory.display());

        let _ = self
            .progress_tx
            .send(CollectionEvent::Started {
                name: collection.name.clone(),
                total,
                directory: directory.clone(),
            })
            .await;

        let outcomes: Vec<Outcome> = stream::iter(collection.tracks.iter().enumerate())
            .map(|(i, track)| self.process(i + 1, total, track, &directory))
            .buffer_unordered(self.parallel)
            .collect()
            .await;

        let mut summary = Summary::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Downloaded => summary.downloaded += 1,
                Outcome::Skipped => summary.skipped += 1,
                Outcome::Failed => summary.failed += 1,
            }
        }

        debug!("Download complete: {}", summary);
        let _ = self.progress_tx.send(CollectionEvent::Finished(summary)).await;

        Ok(summary)
    }

    async fn process(&self, index: usize, total: usize, track: &Track, directory: &Path) -> Outcome {
        let query = track.query();
        let stem = match track_file_stem(track) {
            s if s.is_empty() => format!("Track {}", index),
            s => s,
        };

        let expected = directory.join(format!("{}.{}", stem, self.audio_format.extension()));
        if expected.exists() {
            debug!("[{}/{}] Skipping (exists): {}", index, total, query);
            let _ = self
                .progress_tx
                .send(CollectionEvent::Skipped { index, total, query })
                .await;
            return Outcome::Skipped;
        }

        let _ = self
            .progress_tx
            .send(CollectionEvent::Downloading {
                index,
                total,
                query: query.clone(),
            })
            .await;

        let request = DownloadRequest::new(query.clone(), MediaKind::Audio).with_file_stem(stem);
        match self.fetcher.fetch(&request, directory).await {
            Ok(files) => {
                debug!("[{}/{}] Downloaded: {}", index, total, query);
                let _ = self
                    .progress_tx
                    .send(CollectionEvent::Downloaded {
                        index,
                        total,
                        query,
                        files,
                    })
                    .await;
                Outcome::Downloaded
            }
            Err(e) => {
                debug!("[{}/{}] Failed: {} ({})", index, total, query, e);
                let _ = self
                    .progress_tx
                    .send(CollectionEvent::Failed {
                        index,
                        total,
                        query,
                        error: e.to_string(),
                    })
                    .await;
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tunegrab_spotify::LinkKind;

    /// Writes an empty file per request; queries containing "broken" fail
    #[derive(Default)]
    struct FakeFetcher {
        requests: Mutex<Vec<DownloadRequest>>,
    }

    impl Fetch for FakeFetcher {
        async fn fetch(
            &self,
            request: &DownloadRequest,
            output_dir: &Path,
        ) -> std::result::Result<Vec<PathBuf>, DownloadError> {
            self.requests.lock().unwrap().push(request.clone());

            if request.query.contains("broken") {
                return Err(DownloadError::VideoUnavailable(request.query.clone()));
            }

            let stem = request.file_stem.clone().unwrap_or_else(|| "untitled".to_string());
            let path = output_dir.join(format!("{}.mp3", stem));
            std::fs::write(&path, b"")?;
            Ok(vec![path])
        }
    }

    fn track(artist: &str, title: &str) -> Track {
        Track {
            title: title.to_string(),
            artists: vec![artist.to_string()],
        }
    }

    fn collection(tracks: Vec<Track>) -> Collection {
        Collection {
            kind: LinkKind::Playlist,
            name: "Mix: Vol/1".to_string(),
            tracks,
        }
    }

    fn drain(mut rx: mpsc::Receiver<CollectionEvent>) -> Vec<CollectionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_downloads_skips_and_failures() {
        let root = tempfile::tempdir().unwrap();
        let playlist = collection(vec![
            track("Artist", "Already Here"),
            track("Artist", "New Song"),
            track("Artist", "broken upload"),
        ]);

        let directory = CollectionJob::<FakeFetcher>::directory_for(&playlist, root.path());
        assert_eq!(directory, root.path().join("Mix_ Vol_1"));
        std::fs::create_dir_all(&directory).unwrap();
        std::fs::write(directory.join("Artist - Already Here.mp3"), b"").unwrap();

        let (tx, rx) = mpsc::channel(64);
        let job = CollectionJob::new(FakeFetcher::default(), AudioFormat::Mp3, 1, tx);
        let summary = job.run(&playlist, root.path()).await.unwrap();

        assert_eq!(
            summary,
            Summary {
                downloaded: 1,
                skipped: 1,
                failed: 1
            }
        );
        assert_eq!(summary.total(), 3);
        assert!(directory.join("Artist - New Song.mp3").exists());

        let requests = job.fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].kind, MediaKind::Audio);
        assert_eq!(requests[0].query, "Artist - New Song");
        assert_eq!(requests[0].file_stem.as_deref(), Some("Artist - New Song"));

        let events = drain(rx);
        assert!(matches!(events.first(), Some(CollectionEvent::Started { total: 3, .. })));
        assert!(matches!(events.last(), Some(CollectionEvent::Finished(s)) if *s == summary));
        assert!(events
            .iter()
            .any(|e| matches!(e, CollectionEvent::Failed { index: 3, .. })));
    }

    #[tokio::test]
    async fn test_second_run_skips_everything() {
        let root = tempfile::tempdir().unwrap();
        let playlist = collection(vec![track("A", "One"), track("B", "Two")]);

        let (tx, _rx) = mpsc::channel(64);
        let job = CollectionJob::new(FakeFetcher::default(), AudioFormat::Mp3, 2, tx);

        let first = job.run(&playlist, root.path()).await.unwrap();
        assert_eq!(first.downloaded, 2);

        let second = job.run(&playlist, root.path()).await.unwrap();
        assert_eq!(second.skipped, 2);
        assert_eq!(second.downloaded, 0);
    }

    #[tokio::test]
    async fn test_skip_check_uses_configured_extension() {
        let root = tempfile::tempdir().unwrap();
        let playlist = collection(vec![track("A", "One")]);
        let directory = CollectionJob::<FakeFetcher>::directory_for(&playlist, root.path());
        std::fs::create_dir_all(&directory).unwrap();
        // An mp3 from an earlier run does not count when flac is configured
        std::fs::write(directory.join("A - One.mp3"), b"").unwrap();

        let (tx, _rx) = mpsc::channel(64);
        let job = CollectionJob::new(FakeFetcher::default(), AudioFormat::Flac, 1, tx);
        let summary = job.run(&playlist, root.path()).await.unwrap();

        assert_eq!(summary.downloaded, 1);
        assert_eq!(summary.skipped, 0);
    }

    /// Counts events at INFO or above
    struct Loud(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for Loud {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() <= tracing::Level::INFO {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_progress_is_left_to_events() {
        let loud = Arc::new(AtomicUsize::new(0));
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(Loud(loud.clone())),
        );
        tracing::info!("layer is wired");
        assert_eq!(loud.load(Ordering::SeqCst), 1);

        let root = tempfile::tempdir().unwrap();
        let playlist = collection(vec![track("A", "One"), track("A", "broken")]);
        let (tx, rx) = mpsc::channel(64);
        let job = CollectionJob::new(FakeFetcher::default(), AudioFormat::Mp3, 1, tx);
        job.run(&playlist, root.path()).await.unwrap();
        job.run(&playlist, root.path()).await.unwrap();

        // Skips, downloads and failures reach the caller as events only
        assert_eq!(loud.load(Ordering::SeqCst), 1);
        assert!(drain(rx)
            .iter()
            .any(|e| matches!(e, CollectionEvent::Skipped { .. })));
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let root = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel(8);
        let job = CollectionJob::new(FakeFetcher::default(), AudioFormat::Mp3, 1, tx);

        let summary = job.run(&collection(Vec::new()), root.path()).await.unwrap();
        assert_eq!(summary, Summary::default());
    }
}
