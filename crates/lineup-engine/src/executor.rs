//! The add-to-playlist action for a single track.
//!
//! One invocation drives the shared page through five steps:
//! navigate to the search view, resolve the first result row, open its context
//! menu, activate "Add to playlist", and pick the target playlist. Every step has
//! its own time budget, and every failure is turned into an [`ActionOutcome`]
//! here; nothing propagates to the caller as an error.

use crate::backend::{Backend, BackendError};
use crate::config::LineupConfig;
use crate::config::schema::{PlaylistConfig, SelectorConfig, TimingConfig, ms};
use crate::normalize::{TitleNormalizer, build_search_url};
use crate::resolution::{
    Cascade, Committed, ExactEntryStrategy, FilterFieldStrategy, LocateStrategy,
    ResolutionError, SubstringStrategy, TypeAheadStrategy, wait_visible,
};
use lineup_common::element::{ElementQuery, MouseButton};
use lineup_common::model::{ActionOutcome, PlaylistTarget, Step, TrackRequest};
use tokio::time::{sleep, timeout};
use tracing::{Instrument, debug, info_span, warn};

/// Why the step sequence stopped early.
#[derive(Debug)]
enum StepFailure {
    NotFound,
    Timeout(Step),
    Interaction { step: Step, reason: String },
}

impl StepFailure {
    fn from_backend(step: Step, err: BackendError) -> Self {
        if err.is_timeout() {
            StepFailure::Timeout(step)
        } else {
            StepFailure::Interaction {
                step,
                reason: err.to_string(),
            }
        }
    }

    fn from_resolution(step: Step, err: ResolutionError, exhausted: StepFailure) -> Self {
        match err {
            ResolutionError::Exhausted { .. } => exhausted,
            ResolutionError::Backend { source, .. } => Self::from_backend(step, source),
        }
    }
}

pub struct ActionExecutor {
    base_url: String,
    normalizer: TitleNormalizer,
    timings: TimingConfig,
    selectors: SelectorConfig,
    playlist: PlaylistConfig,
    result_rows: Cascade,
    menu_entry: Cascade,
}

impl ActionExecutor {
    pub fn new(config: &LineupConfig) -> Self {
        let timings = config.timings.clone();
        let selectors = config.selectors.clone();
        let poll = ms(timings.poll_interval);

        let mut result_rows = Cascade::new("first result row");
        for candidate in &selectors.result_rows {
            result_rows = result_rows.with(LocateStrategy::new(
                &candidate.name,
                ElementQuery::css(&candidate.selector),
                ms(timings.result_row_budget),
                poll,
            ));
        }

        let mut menu_entry = Cascade::new("add to playlist entry");
        for candidate in &selectors.menu_entry {
            menu_entry = menu_entry.with(LocateStrategy::new(
                &candidate.name,
                ElementQuery::css_with_text(&candidate.selector, &selectors.menu_entry_text),
                ms(timings.menu_entry_budget),
                poll,
            ));
        }

        Self {
            base_url: config.player.base_url.clone(),
            normalizer: TitleNormalizer::new(&config.title_markers),
            timings,
            selectors,
            playlist: config.playlist.clone(),
            result_rows,
            menu_entry,
        }
    }

    /// The ordered playlist-selection strategies for one target.
    pub fn selection_cascade(&self, target: &PlaylistTarget) -> Cascade<Committed> {
        let t = &self.timings;
        let poll = ms(t.poll_interval);
        let prefix = self.playlist.type_ahead_prefix(&target.name);

        Cascade::new(format!("playlist '{}'", target.name))
            .with(FilterFieldStrategy::new(
                &self.selectors.playlist_filter,
                &target.name,
                ms(t.playlist_filter_budget),
                ms(t.after_fill),
                poll,
            ))
            .with(ExactEntryStrategy::new(
                &self.selectors.playlist_entry,
                &target.name,
                ms(t.playlist_entry_budget),
                poll,
            ))
            .with(TypeAheadStrategy::new(
                prefix,
                ms(t.type_ahead_key_delay),
                ms(t.after_type_ahead),
            ))
            .with(SubstringStrategy::new(
                &target.name,
                ms(t.last_resort_budget),
                poll,
            ))
    }

    /// Add one track to the target playlist.
    pub async fn execute(
        &self,
        backend: &mut dyn Backend,
        request: &TrackRequest,
        target: &PlaylistTarget,
    ) -> ActionOutcome {
        let cleaned = self.normalizer.normalize(&request.track_title);
        let span = info_span!("add_track", artist = %request.artist_name, title = %cleaned);

        let result = self
            .run_steps(backend, &request.artist_name, &cleaned, target)
            .instrument(span)
            .await;

        match result {
            Ok(()) => ActionOutcome::added(request.clone(), cleaned),
            Err(StepFailure::NotFound) => ActionOutcome::not_found(request.clone(), cleaned),
            Err(StepFailure::Timeout(step)) => ActionOutcome::timeout(request.clone(), cleaned, step),
            Err(StepFailure::Interaction { step, reason }) => {
                ActionOutcome::interaction_failed(request.clone(), cleaned, step, reason)
            }
        }
    }

    async fn run_steps(
        &self,
        backend: &mut dyn Backend,
        artist: &str,
        title: &str,
        target: &PlaylistTarget,
    ) -> Result<(), StepFailure> {
        let t = &self.timings;

        // 1. Navigate straight to the search results.
        let url = build_search_url(&self.base_url, title, artist).map_err(|e| {
            StepFailure::Interaction {
                step: Step::Navigate,
                reason: e.to_string(),
            }
        })?;
        debug!(url = %url, "Opening search");
        match timeout(ms(t.navigation_timeout), backend.navigate(&url)).await {
            Err(_) => return Err(StepFailure::Timeout(Step::Navigate)),
            Ok(Err(e)) => return Err(StepFailure::from_backend(Step::Navigate, e)),
            Ok(Ok(_)) => {}
        }
        sleep(ms(t.after_navigation)).await;

        // 2. Narrow to tracks if the page offers it, then find the first row.
        self.apply_category_filter(backend).await;

        let row = self
            .result_rows
            .resolve(backend)
            .await
            .map_err(|e| {
                StepFailure::from_resolution(Step::ResolveResult, e, StepFailure::NotFound)
            })?
            .value;

        // 3. Context menu on the row.
        backend
            .click(row, MouseButton::Right)
            .await
            .map_err(|e| StepFailure::from_backend(Step::OpenContextMenu, e))?;
        sleep(ms(t.after_context_menu)).await;

        // 4. "Add to playlist" opens a lazily rendered submenu.
        let entry = self
            .menu_entry
            .resolve(backend)
            .await
            .map_err(|e| {
                StepFailure::from_resolution(
                    Step::AddToPlaylist,
                    e,
                    StepFailure::Timeout(Step::AddToPlaylist),
                )
            })?
            .value;
        backend
            .click(entry, MouseButton::Left)
            .await
            .map_err(|e| StepFailure::from_backend(Step::AddToPlaylist, e))?;
        sleep(ms(t.after_menu_entry)).await;

        // 5. Pick the playlist.
        let selection = self.selection_cascade(target);
        let hit = selection.resolve(backend).await.map_err(|e| {
            let exhausted = StepFailure::Interaction {
                step: Step::SelectPlaylist,
                reason: format!("no strategy selected '{}'", target.name),
            };
            StepFailure::from_resolution(Step::SelectPlaylist, e, exhausted)
        })?;
        debug!(strategy = %hit.strategy, "Playlist selected");
        sleep(ms(t.after_selection)).await;

        Ok(())
    }

    /// Best effort: a missing filter is not an error.
    async fn apply_category_filter(&self, backend: &mut dyn Backend) {
        let t = &self.timings;
        let query = ElementQuery::css_with_text(
            &self.selectors.category_filter,
            &self.selectors.category_filter_text,
        );

        match wait_visible(backend, &query, ms(t.category_filter_budget), ms(t.poll_interval)).await
        {
            Ok(Some(filter)) => match backend.click(filter, MouseButton::Left).await {
                Ok(()) => sleep(ms(t.after_category_filter)).await,
                Err(e) => warn!("Category filter click failed: {}", e),
            },
            Ok(None) => debug!("No category filter on page"),
            Err(e) => debug!("Category filter probe failed: {}", e),
        }
    }
}
