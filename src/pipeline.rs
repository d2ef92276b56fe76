//! # Fetch Pipeline
//!
//! Chains the three dependent catalog calls that produce one random album:
//!
//! ```text
//! Idle → FetchingRandomAlbumId → FetchingAlbumDetail → FetchingArtistDetail → Ready
//!                  ↘                     ↘                      ↘
//!                                     Failed
//! ```
//!
//! Every run gets a [`RunId`] from a monotonically increasing counter. Runs
//! may overlap; the [`WritePolicy`] decides whether a run that is no longer
//! the newest may still write to the shared view.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::Settings,
    spotify::catalog::{Catalog, SearchOptions},
    types::{
        Album, AlbumObject, AlbumView, Artist, ArtistObject, PLACEHOLDER_ALBUM_URL,
        PLACEHOLDER_IMAGE_URL, PLACEHOLDER_THUMBNAIL_URL,
    },
    utils::{self, RandomQuery},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(pub u64);

/// Who may write to the view while runs overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
    /// Only the most recently started run writes. Older runs stop at their
    /// next step and report [`RunOutcome::Superseded`].
    #[default]
    LatestRunWins,
    /// Every run writes whenever its responses arrive, so the response that
    /// resolves last wins regardless of which run it belongs to.
    LastWriteWins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    FetchingRandomAlbumId { run: RunId, query: RandomQuery },
    FetchingAlbumDetail { run: RunId, album_id: String },
    FetchingArtistDetail { run: RunId, artist_id: String },
    Ready { run: RunId },
    Failed { run: RunId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Ready(AlbumView),
    /// A newer run started before this one could write its result.
    Superseded { run: RunId, by: RunId },
}

struct Inner {
    state: PipelineState,
    view: AlbumView,
}

pub struct Pipeline {
    policy: WritePolicy,
    market: String,
    next_run: AtomicU64,
    latest_run: AtomicU64,
    inner: Mutex<Inner>,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Self {
        Self::with_policy(settings.market.clone(), WritePolicy::default())
    }

    pub fn with_policy(market: impl Into<String>, policy: WritePolicy) -> Self {
        Self {
            policy,
            market: market.into(),
            next_run: AtomicU64::new(0),
            latest_run: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: PipelineState::Idle,
                view: AlbumView::default(),
            }),
        }
    }

    pub fn policy(&self) -> WritePolicy {
        self.policy
    }

    /// Reserves the id for a new run. The newest reserved id is the one
    /// [`WritePolicy::LatestRunWins`] lets through.
    pub fn start(&self) -> RunId {
        let id = self.next_run.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_run.fetch_max(id, Ordering::SeqCst);
        RunId(id)
    }

    pub fn latest_run(&self) -> RunId {
        RunId(self.latest_run.load(Ordering::SeqCst))
    }

    pub async fn state(&self) -> PipelineState {
        self.inner.lock().await.state.clone()
    }

    pub async fn view(&self) -> AlbumView {
        self.inner.lock().await.view.clone()
    }

    /// Draws a random query from `rng` and runs the whole chain once.
    pub async fn run<C, R>(&self, catalog: &C, rng: &mut R) -> Res<RunOutcome>
    where
        C: Catalog + ?Sized,
        R: Rng,
    {
        let query = utils::random_query(rng);
        let run = self.start();
        self.execute(run, catalog, query).await
    }

    /// Runs the chain for a run id obtained from [`Pipeline::start`].
    ///
    /// The artist fetch only starts once the album detail produced an artist
    /// id. A failed call moves the state to [`PipelineState::Failed`] and is
    /// returned as the error.
    pub async fn execute<C>(&self, run: RunId, catalog: &C, query: RandomQuery) -> Res<RunOutcome>
    where
        C: Catalog + ?Sized,
    {
        let started = self
            .commit(run, |inner| {
                inner.state = PipelineState::FetchingRandomAlbumId {
                    run,
                    query: query.clone(),
                }
            })
            .await;
        if started.is_none() {
            return Ok(self.superseded(run));
        }

        let options = SearchOptions {
            limit: 1,
            offset: query.offset,
            market: self.market.clone(),
        };
        let q = query.query.to_string();
        let albums = match catalog.search_albums(&q, &options).await {
            Ok(albums) => albums,
            Err(e) => return self.fail(run, e).await,
        };
        let Some(first) = albums.into_iter().next() else {
            return self
                .fail(
                    run,
                    Error::EmptySearch {
                        query: q,
                        offset: query.offset,
                    },
                )
                .await;
        };

        let album_id = first.id;
        let fetching_album = self
            .commit(run, |inner| {
                inner.state = PipelineState::FetchingAlbumDetail {
                    run,
                    album_id: album_id.clone(),
                }
            })
            .await;
        if fetching_album.is_none() {
            return Ok(self.superseded(run));
        }

        let album = match catalog.get_album(&album_id).await.and_then(album_from_object) {
            Ok(album) => album,
            Err(e) => return self.fail(run, e).await,
        };
        if !album.has_artist_id() {
            return self.fail(run, Error::MissingField("artists[0].id")).await;
        }

        let artist_id = album.artist_id.clone();
        let fetching_artist = self
            .commit(run, |inner| {
                inner.view.album = album;
                inner.state = PipelineState::FetchingArtistDetail {
                    run,
                    artist_id: artist_id.clone(),
                };
            })
            .await;
        if fetching_artist.is_none() {
            return Ok(self.superseded(run));
        }

        let artist = match catalog.get_artist(&artist_id).await {
            Ok(object) => artist_from_object(object),
            Err(e) => return self.fail(run, e).await,
        };

        let ready = self
            .commit(run, |inner| {
                inner.view.artist = artist;
                inner.state = PipelineState::Ready { run };
            })
            .await;

        match ready {
            Some(view) => Ok(RunOutcome::Ready(view)),
            None => Ok(self.superseded(run)),
        }
    }

    /// Applies `apply` if the write policy lets `run` write and returns the
    /// resulting view.
    async fn commit<F>(&self, run: RunId, apply: F) -> Option<AlbumView>
    where
        F: FnOnce(&mut Inner),
    {
        let mut inner = self.inner.lock().await;
        if self.policy == WritePolicy::LatestRunWins && run != self.latest_run() {
            return None;
        }

        apply(&mut inner);
        Some(inner.view.clone())
    }

    /// Records a failed call. A run that lost its right to write reports
    /// [`RunOutcome::Superseded`] instead of the error.
    async fn fail(&self, run: RunId, error: Error) -> Res<RunOutcome> {
        let reason = error.to_string();
        let recorded = self
            .commit(run, |inner| inner.state = PipelineState::Failed { run, reason })
            .await;
        match recorded {
            Some(_) => Err(error),
            None => Ok(self.superseded(run)),
        }
    }

    fn superseded(&self, run: RunId) -> RunOutcome {
        RunOutcome::Superseded {
            run,
            by: self.latest_run(),
        }
    }
}

/// Picks the fields the view needs out of a full album record.
///
/// The first artist is mandatory since the artist fetch depends on it; its
/// id is checked with [`Album::has_artist_id`] before that fetch. A missing
/// cover or URI keeps its placeholder.
pub fn album_from_object(object: AlbumObject) -> Res<Album> {
    let artist = object
        .artists
        .into_iter()
        .next()
        .ok_or(Error::MissingField("artists"))?;

    let image_url = object
        .images
        .into_iter()
        .next()
        .map(|image| image.url)
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());

    let external_url = if object.uri.is_empty() {
        PLACEHOLDER_ALBUM_URL.to_string()
    } else {
        object.uri
    };

    Ok(Album {
        id: object.id,
        name: object.name,
        artist: artist.name,
        artist_id: artist.id,
        image_url,
        external_url,
    })
}

pub fn artist_from_object(object: ArtistObject) -> Artist {
    Artist {
        thumbnail_url: object
            .images
            .into_iter()
            .next()
            .map(|image| image.url)
            .unwrap_or_else(|| PLACEHOLDER_THUMBNAIL_URL.to_string()),
    }
}
