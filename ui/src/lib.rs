//! User interface module for the photo gallery admin console.

mod image_loader;
mod preview;
mod style;

pub use image_loader::{ImageLoader, ImageLoaderError};
pub use preview::{PreviewKind, PreviewState};

use api_client::{
    ApiClient, Photo, PhotoUpdate, RebuildState, RebuildStatus, UploadResponse, YearAlbum,
};
use catalog::{
    filter_photos, flatten_albums, items_per_row, use_virtual, years, LibraryStats, PhotoFilter,
    SelectionSet, Throttle, Throttled, VirtualGrid, Visibility, VisibleRange, ITEM_HEIGHT,
};
use crate::style::Palette;
use iced::widget::image::Handle;
use iced::widget::{
    button, checkbox, column, container, image, pick_list, progress_bar, row,
    scrollable, text, text_input, Column, Space,
};
use iced::{
    event, executor, keyboard, window, Application, Command, Element, Length, Settings,
    Subscription, Theme,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use rfd::AsyncFileDialog;

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);
const SCROLL_THROTTLE_WINDOW: std::time::Duration = std::time::Duration::from_millis(100);
const RESIZE_THROTTLE_WINDOW: std::time::Duration = std::time::Duration::from_millis(200);
const REBUILD_POLL_INTERVAL: Duration = Duration::from_secs(1);
const REBUILD_CLOSE_DELAY: Duration = Duration::from_secs(2);
const UPLOAD_REBUILD_DELAY: Duration = Duration::from_secs(2);

const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;
const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;
/// Header, stats row and paddings above the grid area.
const GRID_CHROME_HEIGHT: f32 = 240.0;
const CARD_SPACING: u16 = 10;
const THUMB_HEIGHT: f32 = 180.0;

#[cfg_attr(feature = "trace-spans", tracing::instrument(skip(cache_dir)))]
pub fn run(base_url: String, cache_dir: PathBuf, preload_threads: usize) -> iced::Result {
    let mut settings = Settings::with_flags((base_url, cache_dir, preload_threads));
    settings.window.size = iced::Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT);
    AdminUI::run(settings)
}

#[derive(Debug, Clone)]
pub enum Message {
    LoadPhotos,
    PhotosLoaded(Result<Vec<YearAlbum>, String>),
    SearchChanged(String),
    YearPicked(YearOption),
    StatusPicked(StatusOption),
    ToggleSelection(String, bool),
    BatchSetHidden(bool),
    BatchUpdated(Result<(Vec<String>, bool), String>),
    GridScrolled(scrollable::Viewport),
    ScrollThrottleFired,
    WindowResized(u32, u32),
    ResizeThrottleFired,
    ThumbnailLoaded(String, Result<Handle, String>),
    ShowDetail(String),
    CloseDetail,
    DetailAltChanged(String),
    DetailTagsChanged(String),
    DetailHiddenToggled(bool),
    SaveDetail,
    DetailSaved(Result<(String, PhotoUpdate), String>),
    ShowDeletePhotoDialog,
    CancelDeletePhoto,
    ConfirmDeletePhoto,
    PhotoDeleted(Result<String, String>),
    ShowPreview(String, PreviewKind),
    PreviewLoaded(String, Result<Handle, String>),
    ClosePreview,
    StartRebuild,
    RebuildStarted(Result<(), String>),
    PollRebuildStatus,
    RebuildStatusLoaded(Result<RebuildStatus, String>),
    FinishRebuild,
    CloseRebuild,
    PickUploadFiles,
    UploadFilesPicked(Option<Vec<PathBuf>>),
    UploadFinishedOne(String, Result<UploadResponse, String>),
    CloseUpload,
    CloseUploadAndRebuild,
    EscapePressed,
    DismissError(usize),
    ClearErrors,
}

/// Year filter entry; `None` is the "all years" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearOption(pub Option<String>);

impl std::fmt::Display for YearOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(year) => write!(f, "{}", year),
            None => write!(f, "All years"),
        }
    }
}

/// Visibility filter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOption {
    All,
    Visible,
    Hidden,
}

impl StatusOption {
    const ALL: [StatusOption; 3] = [StatusOption::All, StatusOption::Visible, StatusOption::Hidden];

    fn visibility(self) -> Option<Visibility> {
        match self {
            StatusOption::All => None,
            StatusOption::Visible => Some(Visibility::Visible),
            StatusOption::Hidden => Some(Visibility::Hidden),
        }
    }

    fn from_visibility(visibility: Option<Visibility>) -> Self {
        match visibility {
            None => StatusOption::All,
            Some(Visibility::Visible) => StatusOption::Visible,
            Some(Visibility::Hidden) => StatusOption::Hidden,
        }
    }
}

impl std::fmt::Display for StatusOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusOption::All => "All photos",
            StatusOption::Visible => "Visible",
            StatusOption::Hidden => "Hidden",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug)]
enum ViewState {
    Grid,
    Detail {
        photo: Photo,
        alt: String,
        tags: String,
        hidden: bool,
        confirming_delete: bool,
    },
}

#[derive(Debug)]
struct UploadTask {
    queue: VecDeque<PathBuf>,
    total: usize,
    uploaded: usize,
    failed: usize,
    logs: Vec<String>,
}

impl UploadTask {
    fn finished(&self) -> usize {
        self.uploaded + self.failed
    }

    fn progress(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.finished() as f32 / self.total as f32 * 100.0
        }
    }
}

pub struct AdminUI {
    client: ApiClient,
    image_loader: ImageLoader,
    photos: Vec<Photo>,
    filtered: Vec<Photo>,
    filter: PhotoFilter,
    year_options: Vec<YearOption>,
    selection: SelectionSet,
    thumbnails: HashMap<String, Handle>,
    thumbnails_in_flight: HashSet<String>,
    thumbnails_failed: HashSet<String>,
    loading: bool,
    grid: Option<VirtualGrid>,
    visible: VisibleRange,
    scroll_top: f32,
    grid_height: f32,
    window_width: f32,
    window_height: f32,
    scroll_throttle: Throttle,
    resize_throttle: Throttle,
    state: ViewState,
    rebuild: Option<RebuildStatus>,
    upload: Option<UploadTask>,
    preview: Option<PreviewState>,
    errors: Vec<String>,
    error_log_path: PathBuf,
}

impl AdminUI {
    /// Expose current view state for testing purposes
    pub fn state_debug(&self) -> String {
        match &self.state {
            ViewState::Grid => "Grid".to_string(),
            ViewState::Detail { photo, .. } => format!("Detail({})", photo.filename),
        }
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered.len()
    }

    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_selected(&self, filename: &str) -> bool {
        self.selection.contains(filename)
    }

    /// Whether the virtualized render path is active.
    pub fn is_virtual(&self) -> bool {
        self.grid.is_some()
    }

    pub fn visible_range(&self) -> (usize, usize) {
        (self.visible.start, self.visible.end)
    }

    /// Scroll-spacer height of the virtual grid, if that path is active.
    pub fn grid_total_height(&self) -> Option<f32> {
        self.grid.as_ref().map(|g| g.total_height())
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::compute(&self.photos, &self.selection)
    }

    pub fn photo_hidden(&self, filename: &str) -> Option<bool> {
        self.photos
            .iter()
            .find(|p| p.filename == filename)
            .map(|p| p.is_hidden)
    }

    pub fn search_query(&self) -> String {
        self.filter.query.clone()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn rebuild_state(&self) -> Option<RebuildState> {
        self.rebuild.as_ref().map(|s| s.status)
    }

    pub fn upload_active(&self) -> bool {
        self.upload.is_some()
    }

    pub fn preview_title(&self) -> Option<String> {
        self.preview.as_ref().map(|p| p.title())
    }

    fn log_error(&self, msg: &str) {
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.error_log_path)
        {
            let _ = writeln!(file, "{}", msg);
        }
    }

    fn push_error(&mut self, msg: String) -> Command<Message> {
        tracing::error!("{}", msg);
        self.log_error(&msg);
        self.errors.push(msg);
        AdminUI::error_timeout()
    }

    fn error_timeout() -> Command<Message> {
        Command::perform(
            async {
                sleep(ERROR_DISPLAY_DURATION).await;
            },
            |_| Message::ClearErrors,
        )
    }

    fn refilter(&mut self) {
        self.filtered = filter_photos(&self.photos, &self.filter);
    }

    /// Re-derive the filtered view and pick the render path for its size,
    /// tearing down whichever mode no longer applies.
    fn rebuild_grid(&mut self) -> Command<Message> {
        let len = self.filtered.len();
        if use_virtual(len) {
            match &mut self.grid {
                Some(grid) => {
                    self.visible = grid.update_count(len, self.scroll_top, self.grid_height);
                }
                None => {
                    let mut grid = VirtualGrid::new(len, self.window_width);
                    self.visible = grid.update_count(len, self.scroll_top, self.grid_height);
                    self.grid = Some(grid);
                }
            }
        } else {
            // Direct path: drop the grid state with its scroll handler.
            self.grid = None;
            self.visible = VisibleRange {
                start: 0,
                end: len,
                offset_y: 0.0,
            };
        }
        self.request_visible_thumbnails()
    }

    /// Ask the loader for every thumbnail in the current window that we
    /// neither have nor already requested. Buffer rows give the pre-load
    /// margin; the in-flight set makes each request happen at most once.
    fn request_visible_thumbnails(&mut self) -> Command<Message> {
        let start = self.visible.start.min(self.filtered.len());
        let end = self.visible.end.min(self.filtered.len());
        let mut commands = Vec::new();
        for index in start..end {
            let photo = self.filtered[index].clone();
            if self.thumbnails.contains_key(&photo.filename)
                || self.thumbnails_in_flight.contains(&photo.filename)
            {
                continue;
            }
            self.thumbnails_in_flight.insert(photo.filename.clone());
            commands.push(self.load_thumbnail_command(&photo));
        }
        Command::batch(commands)
    }

    fn load_thumbnail_command(&self, photo: &Photo) -> Command<Message> {
        let loader = self.image_loader.clone();
        let url = self.client.image_url(&photo.year, &photo.filename);
        let year = photo.year.clone();
        let filename = photo.filename.clone();
        let key = photo.filename.clone();
        Command::perform(
            async move {
                loader
                    .load_thumbnail(&year, &filename, &url)
                    .await
                    .map_err(|e| e.to_string())
            },
            move |result| Message::ThumbnailLoaded(key, result),
        )
    }

    fn apply_scroll(&mut self) -> Command<Message> {
        if let Some(grid) = &mut self.grid {
            if let Some(range) = grid.on_scroll(self.scroll_top, self.grid_height) {
                self.visible = range;
                return self.request_visible_thumbnails();
            }
        }
        Command::none()
    }

    fn apply_resize(&mut self) -> Command<Message> {
        self.grid_height = (self.window_height - GRID_CHROME_HEIGHT).max(200.0);
        if let Some(grid) = &mut self.grid {
            let range = grid.on_resize(self.window_width, self.scroll_top, self.grid_height);
            self.visible = range;
            return self.request_visible_thumbnails();
        }
        Command::none()
    }

    fn upload_next(&mut self) -> Command<Message> {
        let client = self.client.clone();
        if let Some(task) = &mut self.upload {
            if let Some(path) = task.queue.pop_front() {
                let name = path
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string());
                task.logs.push(format!("Uploading {}...", name));
                return Command::perform(
                    async move {
                        client
                            .upload_photo(&path)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    move |result| Message::UploadFinishedOne(name, result),
                );
            }
        }
        Command::none()
    }
}

impl Application for AdminUI {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = (String, PathBuf, usize);

    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        let (base_url, cache_dir, preload_threads) = flags;
        let error_log_path = cache_dir.join("ui_errors.log");
        let image_loader = ImageLoader::new(cache_dir, preload_threads);

        let grid_height = (DEFAULT_WINDOW_HEIGHT - GRID_CHROME_HEIGHT).max(200.0);
        let app = Self {
            client: ApiClient::new(base_url),
            image_loader,
            photos: Vec::new(),
            filtered: Vec::new(),
            filter: PhotoFilter::default(),
            year_options: vec![YearOption(None)],
            selection: SelectionSet::new(),
            thumbnails: HashMap::new(),
            thumbnails_in_flight: HashSet::new(),
            thumbnails_failed: HashSet::new(),
            loading: false,
            grid: None,
            visible: VisibleRange::EMPTY,
            scroll_top: 0.0,
            grid_height,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            scroll_throttle: Throttle::new(SCROLL_THROTTLE_WINDOW),
            resize_throttle: Throttle::new(RESIZE_THROTTLE_WINDOW),
            state: ViewState::Grid,
            rebuild: None,
            upload: None,
            preview: None,
            errors: Vec::new(),
            error_log_path,
        };

        (app, Command::perform(async {}, |_| Message::LoadPhotos))
    }

    fn title(&self) -> String {
        String::from("Photo Admin")
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::LoadPhotos => {
                self.loading = true;
                let client = self.client.clone();
                return Command::perform(
                    async move { client.list_albums().await.map_err(|e| e.to_string()) },
                    Message::PhotosLoaded,
                );
            }
            Message::PhotosLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(albums) => {
                        self.photos = flatten_albums(albums);
                        self.year_options = std::iter::once(YearOption(None))
                            .chain(years(&self.photos).into_iter().map(|y| YearOption(Some(y))))
                            .collect();
                        self.refilter();
                        return self.rebuild_grid();
                    }
                    Err(error) => {
                        return self.push_error(format!("Failed to load photos: {}", error));
                    }
                }
            }
            Message::SearchChanged(query) => {
                self.filter.query = query;
                self.refilter();
                return self.rebuild_grid();
            }
            Message::YearPicked(option) => {
                self.filter.year = option.0;
                self.refilter();
                return self.rebuild_grid();
            }
            Message::StatusPicked(option) => {
                self.filter.visibility = option.visibility();
                self.refilter();
                return self.rebuild_grid();
            }
            Message::ToggleSelection(filename, selected) => {
                self.selection.toggle(&filename, selected);
            }
            Message::BatchSetHidden(hidden) => {
                if self.selection.is_empty() {
                    return Command::none();
                }
                let filenames = self.selection.to_vec();
                let client = self.client.clone();
                return Command::perform(
                    async move {
                        client
                            .batch_set_hidden(&filenames, hidden)
                            .await
                            .map(|_| (filenames, hidden))
                            .map_err(|e| e.to_string())
                    },
                    Message::BatchUpdated,
                );
            }
            Message::BatchUpdated(result) => match result {
                Ok((filenames, hidden)) => {
                    let updated: HashSet<String> = filenames.into_iter().collect();
                    for photo in &mut self.photos {
                        if updated.contains(&photo.filename) {
                            photo.is_hidden = hidden;
                        }
                    }
                    self.selection.clear();
                    self.refilter();
                    return self.rebuild_grid();
                }
                Err(error) => {
                    return self.push_error(format!("Batch update failed: {}", error));
                }
            },
            Message::GridScrolled(viewport) => {
                self.scroll_top = viewport.absolute_offset().y;
                self.grid_height = viewport.bounds().height;
                match self.scroll_throttle.event(Instant::now()) {
                    Throttled::Run => return self.apply_scroll(),
                    Throttled::Deferred(delay) => {
                        return Command::perform(
                            async move {
                                sleep(delay).await;
                            },
                            |_| Message::ScrollThrottleFired,
                        );
                    }
                    Throttled::Coalesced => {}
                }
            }
            Message::ScrollThrottleFired => {
                if self.scroll_throttle.fire(Instant::now()) {
                    return self.apply_scroll();
                }
            }
            Message::WindowResized(width, height) => {
                self.window_width = width as f32;
                self.window_height = height as f32;
                match self.resize_throttle.event(Instant::now()) {
                    Throttled::Run => return self.apply_resize(),
                    Throttled::Deferred(delay) => {
                        return Command::perform(
                            async move {
                                sleep(delay).await;
                            },
                            |_| Message::ResizeThrottleFired,
                        );
                    }
                    Throttled::Coalesced => {}
                }
            }
            Message::ResizeThrottleFired => {
                if self.resize_throttle.fire(Instant::now()) {
                    return self.apply_resize();
                }
            }
            Message::ThumbnailLoaded(filename, result) => {
                self.thumbnails_in_flight.remove(&filename);
                match result {
                    Ok(handle) => {
                        self.thumbnails.insert(filename, handle);
                    }
                    Err(error) => {
                        // Inline "failed" placeholder in the card; no banner.
                        tracing::error!("Failed to load thumbnail for {}: {}", filename, error);
                        self.thumbnails_failed.insert(filename);
                    }
                }
            }
            Message::ShowDetail(filename) => {
                if let Some(photo) = self.photos.iter().find(|p| p.filename == filename).cloned() {
                    let command = if self.thumbnails.contains_key(&photo.filename)
                        || self.thumbnails_in_flight.contains(&photo.filename)
                    {
                        Command::none()
                    } else {
                        self.thumbnails_in_flight.insert(photo.filename.clone());
                        self.load_thumbnail_command(&photo)
                    };
                    self.state = ViewState::Detail {
                        alt: photo.alt.clone().unwrap_or_default(),
                        tags: photo.subject.join(", "),
                        hidden: photo.is_hidden,
                        confirming_delete: false,
                        photo,
                    };
                    return command;
                }
            }
            Message::CloseDetail => {
                self.state = ViewState::Grid;
            }
            Message::DetailAltChanged(value) => {
                if let ViewState::Detail { alt, .. } = &mut self.state {
                    *alt = value;
                }
            }
            Message::DetailTagsChanged(value) => {
                if let ViewState::Detail { tags, .. } = &mut self.state {
                    *tags = value;
                }
            }
            Message::DetailHiddenToggled(value) => {
                if let ViewState::Detail { hidden, .. } = &mut self.state {
                    *hidden = value;
                }
            }
            Message::SaveDetail => {
                if let ViewState::Detail {
                    photo,
                    alt,
                    tags,
                    hidden,
                    ..
                } = &self.state
                {
                    let update = PhotoUpdate {
                        alt: Some(alt.clone()),
                        is_hidden: Some(*hidden),
                        subject: Some(parse_tags(tags)),
                    };
                    let filename = photo.filename.clone();
                    let client = self.client.clone();
                    let applied = update.clone();
                    return Command::perform(
                        async move {
                            client
                                .update_photo(&filename, &update)
                                .await
                                .map(|_| (filename, applied))
                                .map_err(|e| e.to_string())
                        },
                        Message::DetailSaved,
                    );
                }
            }
            Message::DetailSaved(result) => match result {
                Ok((filename, update)) => {
                    if let Some(photo) = self.photos.iter_mut().find(|p| p.filename == filename) {
                        if let Some(alt) = update.alt {
                            photo.alt = if alt.is_empty() { None } else { Some(alt) };
                        }
                        if let Some(hidden) = update.is_hidden {
                            photo.is_hidden = hidden;
                        }
                        if let Some(subject) = update.subject {
                            photo.subject = subject;
                        }
                    }
                    self.state = ViewState::Grid;
                    self.refilter();
                    return self.rebuild_grid();
                }
                Err(error) => {
                    return self.push_error(format!("Failed to save photo: {}", error));
                }
            },
            Message::ShowDeletePhotoDialog => {
                if let ViewState::Detail {
                    confirming_delete, ..
                } = &mut self.state
                {
                    *confirming_delete = true;
                }
            }
            Message::CancelDeletePhoto => {
                if let ViewState::Detail {
                    confirming_delete, ..
                } = &mut self.state
                {
                    *confirming_delete = false;
                }
            }
            Message::ConfirmDeletePhoto => {
                if let ViewState::Detail { photo, .. } = &self.state {
                    let filename = photo.filename.clone();
                    let client = self.client.clone();
                    return Command::perform(
                        async move {
                            client
                                .delete_photo(&filename)
                                .await
                                .map(|_| filename)
                                .map_err(|e| e.to_string())
                        },
                        Message::PhotoDeleted,
                    );
                }
            }
            Message::PhotoDeleted(result) => match result {
                Ok(filename) => {
                    self.photos.retain(|p| p.filename != filename);
                    self.selection.remove(&filename);
                    self.thumbnails.remove(&filename);
                    self.state = ViewState::Grid;
                    self.refilter();
                    return self.rebuild_grid();
                }
                Err(error) => {
                    return self.push_error(format!("Failed to delete photo: {}", error));
                }
            },
            Message::ShowPreview(filename, kind) => {
                if let Some(photo) = self.photos.iter().find(|p| p.filename == filename) {
                    let state = PreviewState::new(photo, kind);
                    let proxy = match self.client.proxy_url(&state.source_url) {
                        Ok(url) => url,
                        Err(e) => {
                            return self.push_error(format!("Failed to build proxy URL: {}", e));
                        }
                    };
                    self.preview = Some(state);
                    let loader = self.image_loader.clone();
                    return Command::perform(
                        async move { loader.load_preview(&proxy).await.map_err(|e| e.to_string()) },
                        move |result| Message::PreviewLoaded(filename, result),
                    );
                }
            }
            Message::PreviewLoaded(filename, result) => {
                if let Some(preview) = &mut self.preview {
                    if preview.filename == filename {
                        match result {
                            Ok(handle) => preview.handle = Some(handle),
                            Err(error) => preview.error = Some(error),
                        }
                    }
                }
            }
            Message::ClosePreview => {
                self.preview = None;
            }
            Message::StartRebuild => {
                self.rebuild = Some(RebuildStatus {
                    status: RebuildState::Running,
                    progress: 0,
                    message: "Starting rebuild...".into(),
                    logs: Vec::new(),
                });
                let client = self.client.clone();
                return Command::perform(
                    async move { client.start_rebuild().await.map_err(|e| e.to_string()) },
                    Message::RebuildStarted,
                );
            }
            Message::RebuildStarted(result) => match result {
                Ok(()) => {
                    return Command::perform(async {}, |_| Message::PollRebuildStatus);
                }
                Err(error) => {
                    self.rebuild = None;
                    return self.push_error(format!("Failed to start rebuild: {}", error));
                }
            },
            Message::PollRebuildStatus => {
                if self.rebuild.is_some() {
                    let client = self.client.clone();
                    return Command::perform(
                        async move { client.rebuild_status().await.map_err(|e| e.to_string()) },
                        Message::RebuildStatusLoaded,
                    );
                }
            }
            Message::RebuildStatusLoaded(result) => match result {
                Ok(status) => {
                    if self.rebuild.is_some() {
                        let state = status.status;
                        self.rebuild = Some(status);
                        match state {
                            RebuildState::Completed => {
                                return Command::perform(
                                    async {
                                        sleep(REBUILD_CLOSE_DELAY).await;
                                    },
                                    |_| Message::FinishRebuild,
                                );
                            }
                            RebuildState::Failed => {
                                return self
                                    .push_error("Rebuild failed, see the job log".to_string());
                            }
                            _ => {}
                        }
                    }
                }
                Err(error) => {
                    // Polling failures are transient; the next tick retries.
                    tracing::error!("Failed to poll rebuild status: {}", error);
                }
            },
            Message::FinishRebuild => {
                if self.rebuild.is_some() {
                    self.rebuild = None;
                    return Command::perform(async {}, |_| Message::LoadPhotos);
                }
            }
            Message::CloseRebuild => {
                self.rebuild = None;
            }
            Message::PickUploadFiles => {
                return Command::perform(
                    async {
                        AsyncFileDialog::new()
                            .add_filter("images", &["jpg", "jpeg", "png", "webp"])
                            .pick_files()
                            .await
                            .map(|files| {
                                files
                                    .into_iter()
                                    .map(|f| f.path().to_path_buf())
                                    .collect::<Vec<_>>()
                            })
                    },
                    Message::UploadFilesPicked,
                );
            }
            Message::UploadFilesPicked(paths) => {
                if let Some(paths) = paths {
                    if paths.is_empty() {
                        return Command::none();
                    }
                    let total = paths.len();
                    self.upload = Some(UploadTask {
                        queue: paths.into(),
                        total,
                        uploaded: 0,
                        failed: 0,
                        logs: vec![format!("Preparing to upload {} photos...", total)],
                    });
                    return self.upload_next();
                }
            }
            Message::UploadFinishedOne(name, result) => {
                let mut done = false;
                let mut any_uploaded = false;
                if let Some(task) = &mut self.upload {
                    match result {
                        Ok(response) => {
                            task.uploaded += 1;
                            task.logs
                                .push(format!("Uploaded {} to {}", name, response.year));
                        }
                        Err(error) => {
                            task.failed += 1;
                            task.logs.push(format!("Failed {}: {}", name, error));
                        }
                    }
                    if task.queue.is_empty() {
                        task.logs.push(format!(
                            "Upload complete: {} uploaded, {} failed",
                            task.uploaded, task.failed
                        ));
                        done = true;
                        any_uploaded = task.uploaded > 0;
                        if any_uploaded {
                            task.logs.push("Starting automatic rebuild...".into());
                        }
                    }
                }
                if !done {
                    return self.upload_next();
                }
                if any_uploaded {
                    return Command::perform(
                        async {
                            sleep(UPLOAD_REBUILD_DELAY).await;
                        },
                        |_| Message::CloseUploadAndRebuild,
                    );
                }
            }
            Message::CloseUpload => {
                self.upload = None;
            }
            Message::CloseUploadAndRebuild => {
                self.upload = None;
                return self.update(Message::StartRebuild);
            }
            Message::EscapePressed => {
                if self.preview.is_some() {
                    return self.update(Message::ClosePreview);
                }
                if self.rebuild.is_some() {
                    return self.update(Message::CloseRebuild);
                }
                if self.upload.is_some() {
                    return self.update(Message::CloseUpload);
                }
                if let ViewState::Detail {
                    confirming_delete, ..
                } = &mut self.state
                {
                    if *confirming_delete {
                        *confirming_delete = false;
                    } else {
                        self.state = ViewState::Grid;
                    }
                }
            }
            Message::DismissError(index) => {
                if index < self.errors.len() {
                    self.errors.remove(index);
                }
            }
            Message::ClearErrors => {
                self.errors.clear();
            }
        }
        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subs: Vec<Subscription<Message>> =
            vec![event::listen_with(|event, _status| match event {
                iced::Event::Keyboard(keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::Escape),
                    ..
                }) => Some(Message::EscapePressed),
                iced::Event::Window(_, window::Event::Resized { width, height }) => {
                    Some(Message::WindowResized(width, height))
                }
                _ => None,
            })];

        // Poll the rebuild job every second while it is running.
        if matches!(&self.rebuild, Some(status) if status.status == RebuildState::Running) {
            subs.push(
                iced::time::every(REBUILD_POLL_INTERVAL).map(|_| Message::PollRebuildStatus),
            );
        }

        Subscription::batch(subs)
    }

    fn view(&self) -> Element<Message> {
        let stats = self.stats();

        let header = row![
            text("Photo Admin").size(24),
            button("Refresh")
                .style(style::button_primary())
                .on_press(Message::LoadPhotos),
            button("Import")
                .style(style::button_primary())
                .on_press(Message::PickUploadFiles),
            button("Rebuild")
                .style(style::button_primary())
                .on_press(Message::StartRebuild),
            text_input("Search filename", &self.filter.query)
                .style(style::text_input_basic())
                .on_input(Message::SearchChanged),
            pick_list(
                self.year_options.clone(),
                Some(YearOption(self.filter.year.clone())),
                Message::YearPicked,
            ),
            pick_list(
                &StatusOption::ALL[..],
                Some(StatusOption::from_visibility(self.filter.visibility)),
                Message::StatusPicked,
            ),
            button("Hide selected")
                .style(style::button_primary())
                .on_press_maybe(
                    (!self.selection.is_empty()).then_some(Message::BatchSetHidden(true))
                ),
            button("Show selected")
                .style(style::button_primary())
                .on_press_maybe(
                    (!self.selection.is_empty()).then_some(Message::BatchSetHidden(false))
                ),
        ]
        .spacing(Palette::SPACING)
        .align_items(iced::Alignment::Center);

        let stats_row = row![
            text(format!("Total: {}", stats.total)).size(14),
            text(format!("Hidden: {}", stats.hidden)).size(14),
            text(format!("Selected: {}", stats.selected)).size(14),
            text(format!("Showing: {}", self.filtered.len())).size(14),
        ]
        .spacing(Palette::SPACING);

        let error_banner = if self.errors.is_empty() {
            None
        } else {
            let mut list = Column::new().spacing(5);
            for (i, msg) in self.errors.iter().enumerate() {
                let row = row![
                    text(msg.clone()).size(16),
                    button("Dismiss")
                        .style(style::button_primary())
                        .on_press(Message::DismissError(i))
                ]
                .spacing(10)
                .align_items(iced::Alignment::Center);
                list = list.push(row);
            }
            let banner = column![
                row![
                    text("Operation failed").size(16),
                    button("Dismiss All")
                        .style(style::button_primary())
                        .on_press(Message::ClearErrors)
                ]
                .spacing(10)
                .align_items(iced::Alignment::Center),
                scrollable(list).height(Length::Fixed(100.0))
            ]
            .spacing(5);
            Some(
                container(banner)
                    .style(style::error_banner())
                    .padding(10)
                    .width(Length::Fill),
            )
        };

        let content: Element<Message> = match &self.state {
            ViewState::Grid => self.grid_view(),
            ViewState::Detail {
                photo,
                alt,
                tags,
                hidden,
                confirming_delete,
            } => self.detail_view(photo, alt, tags, *hidden, *confirming_delete),
        };

        let mut base = column![].spacing(Palette::SPACING);
        if let Some(banner) = error_banner {
            base = base.push(banner);
        }
        base = base.push(header).push(stats_row).push(content);

        if let Some(status) = &self.rebuild {
            base = base.push(self.rebuild_modal(status));
        }
        if let Some(task) = &self.upload {
            base = base.push(self.upload_modal(task));
        }
        if let Some(preview) = &self.preview {
            base = base.push(self.preview_modal(preview));
        }

        container(base)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }
}

impl AdminUI {
    fn grid_view(&self) -> Element<Message> {
        if self.loading {
            return text("Loading photos...").size(16).into();
        }
        if self.filtered.is_empty() {
            return text("No photos found").size(16).into();
        }

        match &self.grid {
            Some(grid) => {
                // Virtualized path: spacers stand in for the skipped rows
                // so the scrollbar covers the whole sequence.
                let options = grid.options();
                let per_row = options.items_per_row;
                let start = self.visible.start.min(self.filtered.len());
                let end = self.visible.end.min(self.filtered.len());
                let slice = &self.filtered[start..end];

                let mut content = column![].width(Length::Fill);
                if self.visible.offset_y > 0.0 {
                    content = content.push(Space::with_height(Length::Fixed(self.visible.offset_y)));
                }
                let mut row_count = 0usize;
                for chunk in slice.chunks(per_row) {
                    content = content.push(self.card_row(chunk, per_row, options.item_height));
                    row_count += 1;
                }
                let rendered_height = self.visible.offset_y + row_count as f32 * options.item_height;
                let bottom = (grid.total_height() - rendered_height).max(0.0);
                if bottom > 0.0 {
                    content = content.push(Space::with_height(Length::Fixed(bottom)));
                }

                scrollable(content)
                    .on_scroll(Message::GridScrolled)
                    .height(Length::Fill)
                    .into()
            }
            None => {
                // Direct path: the full filtered sequence, no spacers and
                // no scroll tracking.
                let per_row = items_per_row(self.window_width);
                let mut content = column![].width(Length::Fill);
                for chunk in self.filtered.chunks(per_row) {
                    content = content.push(self.card_row(chunk, per_row, ITEM_HEIGHT));
                }
                scrollable(content).height(Length::Fill).into()
            }
        }
    }

    fn card_row(&self, chunk: &[Photo], per_row: usize, item_height: f32) -> Element<Message> {
        let mut cards = row![].spacing(CARD_SPACING);
        for photo in chunk {
            cards = cards.push(self.photo_card(photo, item_height));
        }
        // Keep trailing cards the same width as full rows.
        for _ in chunk.len()..per_row {
            cards = cards.push(Space::with_width(Length::Fill));
        }
        cards.width(Length::Fill).into()
    }

    fn photo_card(&self, photo: &Photo, item_height: f32) -> Element<Message> {
        let filename = photo.filename.clone();
        let selected = self.selection.contains(&photo.filename);

        let thumb: Element<Message> = if let Some(handle) = self.thumbnails.get(&photo.filename) {
            image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(THUMB_HEIGHT))
                .into()
        } else {
            let placeholder = if self.thumbnails_failed.contains(&photo.filename) {
                "failed"
            } else {
                "Loading..."
            };
            container(text(placeholder).size(14))
                .width(Length::Fill)
                .height(Length::Fixed(THUMB_HEIGHT))
                .center_x()
                .center_y()
                .into()
        };

        let select_row = row![
            checkbox("", selected)
                .on_toggle({
                    let filename = filename.clone();
                    move |checked| Message::ToggleSelection(filename.clone(), checked)
                })
                .style(style::checkbox_primary()),
            text(&photo.filename).size(14),
        ]
        .spacing(5)
        .align_items(iced::Alignment::Center);

        let meta = row![
            text(&photo.date).size(12),
            text(format!("{}x{}", photo.width, photo.height)).size(12),
        ]
        .spacing(10);

        let card = column![
            select_row,
            button(thumb)
                .style(style::button_primary())
                .on_press(Message::ShowDetail(filename.clone())),
            meta,
            button("Preview")
                .style(style::button_primary())
                .on_press(Message::ShowPreview(filename, PreviewKind::Thumbnail)),
        ]
        .spacing(5);

        container(card)
            .style(style::card(photo.is_hidden, selected))
            .padding(10)
            .width(Length::Fill)
            .height(Length::Fixed(item_height))
            .into()
    }

    fn detail_view(
        &self,
        photo: &Photo,
        alt: &str,
        tags: &str,
        hidden: bool,
        confirming_delete: bool,
    ) -> Element<Message> {
        let img: Element<Message> = if let Some(handle) = self.thumbnails.get(&photo.filename) {
            image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(360.0))
                .into()
        } else {
            container(text("Loading..."))
                .width(Length::Fill)
                .height(Length::Fixed(360.0))
                .center_x()
                .center_y()
                .into()
        };

        let mut col = column![
            button("Close")
                .style(style::button_primary())
                .on_press(Message::CloseDetail),
            img,
            text(&photo.filename).size(18),
            row![
                text(&photo.date).size(14),
                text(format!("{}x{}", photo.width, photo.height)).size(14),
            ]
            .spacing(10),
            text_input("Alt text", alt)
                .style(style::text_input_basic())
                .on_input(Message::DetailAltChanged),
            text_input("Tags, comma separated", tags)
                .style(style::text_input_basic())
                .on_input(Message::DetailTagsChanged),
            checkbox("Hidden", hidden)
                .on_toggle(Message::DetailHiddenToggled)
                .style(style::checkbox_primary()),
            row![
                button("Save")
                    .style(style::button_primary())
                    .on_press(Message::SaveDetail),
                button("Cancel")
                    .style(style::button_primary())
                    .on_press(Message::CloseDetail),
                button("Delete")
                    .style(style::button_primary())
                    .on_press(Message::ShowDeletePhotoDialog),
                button("Remote thumbnail")
                    .style(style::button_primary())
                    .on_press(Message::ShowPreview(
                        photo.filename.clone(),
                        PreviewKind::Thumbnail
                    )),
                button("Remote original")
                    .style(style::button_primary())
                    .on_press(Message::ShowPreview(
                        photo.filename.clone(),
                        PreviewKind::Original
                    )),
            ]
            .spacing(10),
        ]
        .spacing(10);

        if confirming_delete {
            col = col.push(
                column![
                    text(format!(
                        "Delete {}? This removes the local and remote files and cannot be undone.",
                        photo.filename
                    ))
                    .size(16),
                    row![
                        button("Delete")
                            .style(style::button_primary())
                            .on_press(Message::ConfirmDeletePhoto),
                        button("Cancel")
                            .style(style::button_primary())
                            .on_press(Message::CancelDeletePhoto)
                    ]
                    .spacing(10)
                ]
                .spacing(10),
            );
        }

        container(col)
            .style(style::card(false, false))
            .padding(20)
            .width(Length::Fill)
            .into()
    }

    fn rebuild_modal(&self, status: &RebuildStatus) -> Element<Message> {
        let mut logs = Column::new().spacing(2);
        for line in &status.logs {
            logs = logs.push(text(line.clone()).size(12));
        }

        let dialog = column![
            text("Rebuilding library").size(18),
            progress_bar(0.0..=100.0, status.progress as f32).height(Length::Fixed(12.0)),
            text(status.message.clone()).size(14),
            scrollable(logs).height(Length::Fixed(150.0)),
            button("Close")
                .style(style::button_primary())
                .on_press(Message::CloseRebuild),
        ]
        .spacing(10);

        container(dialog)
            .style(style::card(false, false))
            .padding(20)
            .width(Length::Fill)
            .into()
    }

    fn upload_modal(&self, task: &UploadTask) -> Element<Message> {
        let mut logs = Column::new().spacing(2);
        for line in &task.logs {
            logs = logs.push(text(line.clone()).size(12));
        }

        let dialog = column![
            text("Uploading photos").size(18),
            progress_bar(0.0..=100.0, task.progress()).height(Length::Fixed(12.0)),
            text(format!(
                "Uploaded {}/{} ({} failed)",
                task.finished(),
                task.total,
                task.failed
            ))
            .size(14),
            scrollable(logs).height(Length::Fixed(150.0)),
            button("Close")
                .style(style::button_primary())
                .on_press(Message::CloseUpload),
        ]
        .spacing(10);

        container(dialog)
            .style(style::card(false, false))
            .padding(20)
            .width(Length::Fill)
            .into()
    }

    fn preview_modal(&self, preview: &PreviewState) -> Element<Message> {
        let body: Element<Message> = if let Some(handle) = &preview.handle {
            // The viewer gives drag-pan and wheel-zoom over the remote image.
            image::Viewer::new(handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(420.0))
                .into()
        } else if let Some(error) = &preview.error {
            text(format!("Failed to load preview: {}", error))
                .size(14)
                .into()
        } else {
            text("Loading preview...").size(14).into()
        };

        let dialog = column![
            text(preview.title()).size(18),
            body,
            text(preview.source_url.clone()).size(12),
            button("Close")
                .style(style::button_primary())
                .on_press(Message::ClosePreview),
        ]
        .spacing(10);

        container(dialog)
            .style(style::card(false, false))
            .padding(20)
            .width(Length::Fill)
            .into()
    }
}

fn parse_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_tags;

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(parse_tags("a, b , ,c"), vec!["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ").is_empty());
    }
}
