//! The editing session.
//!
//! An [`Editor`] owns one [`Surface`] and one [`Scene`] and exposes the
//! user-level operations on them. It is a cheap-clone, single-threaded
//! handle: clones share the same session, and the session lives in an
//! `Rc<RefCell<Option<_>>>` so [`Editor::dispose`] can release it while an
//! async operation is still suspended.
//!
//! No `RefCell` borrow is held across an `.await`. Async operations re-check
//! the session after resuming and return [`EditorError::Disposed`] without
//! touching anything if it is gone.

use std::cell::RefCell;
use std::rc::Rc;

use canvas_core::{palette, Background, ObjectId, Scene, SceneObject, Selection, TextStyle};
use canvas_renderer::image::decode_bitmap;
use canvas_renderer::{ExportConfig, PixelExporter, Surface, SurfaceConfig};

use crate::artifact::ExportArtifact;
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult};
use crate::fetch::{BitmapFetcher, BitmapSource, SourceFetcher};
use crate::notify::NotificationSink;

struct Session {
    surface: Surface,
    scene: Scene,
}

type SessionHandle = Rc<RefCell<Option<Session>>>;

/// Handle to an editing session.
pub struct Editor<F = SourceFetcher> {
    session: SessionHandle,
    fetcher: Rc<F>,
    sink: Rc<dyn NotificationSink>,
    config: Rc<EditorConfig>,
}

impl<F> Clone for Editor<F> {
    fn clone(&self) -> Self {
        Self {
            session: Rc::clone(&self.session),
            fetcher: Rc::clone(&self.fetcher),
            sink: Rc::clone(&self.sink),
            config: Rc::clone(&self.config),
        }
    }
}

impl<F> std::fmt::Debug for Editor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.session.borrow();
        f.debug_struct("Editor")
            .field("disposed", &session.is_none())
            .field("objects", &session.as_ref().map(|s| s.scene.len()))
            .field("surface", &session.as_ref().map(|s| &s.surface))
            .finish_non_exhaustive()
    }
}

impl Editor<SourceFetcher> {
    /// Start a session that fetches images with a [`SourceFetcher`] built
    /// from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the surface cannot be created.
    pub fn new(config: EditorConfig, sink: impl NotificationSink + 'static) -> EditorResult<Self> {
        let fetcher = SourceFetcher::new(config.fetch_mode, config.origin.clone())?;
        Self::initialize(config, fetcher, sink)
    }
}

impl<F: BitmapFetcher> Editor<F> {
    /// Allocate the surface, draw the first background and start a session.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Render`] if the surface is unavailable. This is
    /// the one fatal error: there is no session to report it through.
    pub fn initialize(
        config: EditorConfig,
        fetcher: F,
        sink: impl NotificationSink + 'static,
    ) -> EditorResult<Self> {
        let surface_config = SurfaceConfig {
            load_system_fonts: config.load_system_fonts,
        };
        let mut surface = Surface::with_config(config.width, config.height, &surface_config)?;
        let scene = Scene::new();
        surface.render(&scene)?;

        tracing::info!(
            "Editing session started: {}x{}, fetch mode {:?}",
            config.width,
            config.height,
            config.fetch_mode
        );

        Ok(Self {
            session: Rc::new(RefCell::new(Some(Session { surface, scene }))),
            fetcher: Rc::new(fetcher),
            sink: Rc::new(sink),
            config: Rc::new(config),
        })
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ---- Surface ----

    /// Advance to the next preset background and redraw.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn cycle_background(&self) -> EditorResult<&'static str> {
        self.mutate(|session| Ok(session.surface.cycle_background()))
    }

    /// Release the surface. Later operations return
    /// [`EditorError::Disposed`]; pending ones complete as no-ops.
    ///
    /// Returns `false` if the session was already disposed.
    #[allow(clippy::must_use_candidate)]
    pub fn dispose(&self) -> bool {
        let taken = self.session.borrow_mut().take();
        let Some(session) = taken else {
            return false;
        };
        tracing::info!("Disposing session with {} objects", session.scene.len());
        session.surface.dispose();
        true
    }

    /// Whether [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.session.borrow().is_none()
    }

    // ---- Adding objects ----

    /// Add a text object with the configured default content.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn add_default_text(&self) -> EditorResult<ObjectId> {
        let content = self.config.default_text.clone();
        self.add_text(content)
    }

    /// Add a text object in the default style at the centre and make it
    /// active.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn add_text(&self, content: impl Into<String>) -> EditorResult<ObjectId> {
        let (x, y) = self.config.centre();
        let object = SceneObject::text(content, TextStyle::default()).centered_at(x, y);
        self.mutate(move |session| {
            let id = session.scene.add(object);
            tracing::debug!("Added text {id}");
            Ok(id)
        })
    }

    /// Fetch and decode a bitmap, then add it as an image object normalized
    /// to the target size, centred and active.
    ///
    /// On failure the scene is unchanged and a notice is sent.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Fetch`] or [`EditorError::Render`] if the
    /// bitmap cannot be loaded, or [`EditorError::Disposed`] if the session
    /// was disposed before the load completed.
    pub async fn add_image(&self, source: &BitmapSource) -> EditorResult<ObjectId> {
        let result = self.load_image(source).await;
        self.report(result)
    }

    /// Parse `source` as a [`BitmapSource`] and add it like
    /// [`add_image`](Self::add_image).
    ///
    /// An unparseable source is an image-load failure: it is reported to the
    /// sink like any other.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Fetch`] if the source is invalid, otherwise as
    /// [`add_image`](Self::add_image).
    pub async fn add_image_from(&self, source: &str) -> EditorResult<ObjectId> {
        let result = match source.parse::<BitmapSource>() {
            Ok(source) => self.load_image(&source).await,
            Err(e) if self.is_disposed() => {
                tracing::debug!("Ignoring invalid source on disposed session: {e}");
                Err(EditorError::Disposed)
            }
            Err(e) => Err(e.into()),
        };
        self.report(result)
    }

    async fn load_image(&self, source: &BitmapSource) -> EditorResult<ObjectId> {
        if self.is_disposed() {
            return Err(EditorError::Disposed);
        }

        tracing::debug!("Loading image from {source}");
        let fetched = self.fetcher.fetch(source).await;
        if self.is_disposed() {
            tracing::debug!("Session disposed while loading {source}, dropping result");
            return Err(EditorError::Disposed);
        }
        let fetched = fetched?;
        let bitmap = decode_bitmap(&fetched.bytes, fetched.readback_permitted)?;

        let target = self.config.image_target_size;
        let (x, y) = self.config.centre();
        let object = SceneObject::image(source.to_string(), bitmap, target).centered_at(x, y);
        self.apply(move |session| {
            let id = session.scene.add(object);
            tracing::info!("Added image {id} from {source}");
            Ok(id)
        })
    }

    // ---- Selection ----

    /// Make `id` the active object.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Canvas`] if no object has that id.
    pub fn select(&self, id: ObjectId) -> EditorResult<()> {
        self.update(|session| Ok(session.scene.select(id)?))
    }

    /// Select the topmost object under the point, or go idle on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn select_at(&self, x: f32, y: f32) -> EditorResult<Selection> {
        self.update(|session| Ok(session.scene.select_at(x, y)))
    }

    /// Clear the selection.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn deselect(&self) -> EditorResult<()> {
        self.update(|session| {
            session.scene.deselect();
            Ok(())
        })
    }

    // ---- Transforms on the active object ----

    /// Toggle the active object's horizontal flip.
    ///
    /// # Errors
    ///
    /// Returns a nothing-selected error (and sends its notice) when idle.
    pub fn flip_active(&self) -> EditorResult<bool> {
        self.mutate(|session| Ok(session.scene.flip_active()?))
    }

    /// Remove the active object.
    ///
    /// # Errors
    ///
    /// Returns a nothing-selected error (and sends its notice) when idle.
    pub fn delete_active(&self) -> EditorResult<SceneObject> {
        self.mutate(|session| Ok(session.scene.delete_active()?))
    }

    /// Translate the active object.
    ///
    /// # Errors
    ///
    /// Returns a nothing-selected error (and sends its notice) when idle.
    pub fn move_active(&self, dx: f32, dy: f32) -> EditorResult<()> {
        self.mutate(|session| Ok(session.scene.move_active(dx, dy)?))
    }

    /// Rotate the active object clockwise.
    ///
    /// # Errors
    ///
    /// Returns a nothing-selected error (and sends its notice) when idle.
    pub fn rotate_active(&self, degrees: f32) -> EditorResult<f32> {
        self.mutate(|session| Ok(session.scene.rotate_active(degrees)?))
    }

    /// Replace the content of the active text object.
    ///
    /// # Errors
    ///
    /// Returns a nothing-selected error when idle, or an invalid-operation
    /// error if the active object is an image.
    pub fn set_active_text(&self, content: impl Into<String>) -> EditorResult<()> {
        let content = content.into();
        self.mutate(move |session| Ok(session.scene.set_active_text(content)?))
    }

    // ---- Export ----

    /// Encode the pixels currently on the surface.
    ///
    /// The frame is copied before the first suspension point, so the
    /// artifact shows the surface as it was when export was requested.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Render`] if the surface is tainted or encoding
    /// fails, or [`EditorError::Disposed`] if the session went away.
    pub async fn export_to_image(&self) -> EditorResult<ExportArtifact> {
        let result = self.encode_frame().await;
        self.report(result)
    }

    async fn encode_frame(&self) -> EditorResult<ExportArtifact> {
        let (pixels, background) = self.read(|session| {
            Ok((session.surface.read_pixels()?, session.surface.background()))
        })?;

        tokio::task::yield_now().await;
        if self.is_disposed() {
            tracing::debug!("Session disposed during export, dropping frame");
            return Err(EditorError::Disposed);
        }

        let matte = palette::parse_hex(background.color()).unwrap_or(self.config.export.matte);
        let exporter = PixelExporter::new(ExportConfig {
            matte,
            ..self.config.export.clone()
        });
        let bytes = exporter.encode(&pixels)?;

        let artifact = ExportArtifact {
            file_name: self.config.export_file_name(),
            mime_type: exporter.format().mime_type(),
            bytes,
        };
        tracing::info!(
            "Exported {} ({} bytes)",
            artifact.file_name,
            artifact.len()
        );
        Ok(artifact)
    }

    // ---- Inspection ----

    /// Run `f` against the current scene.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn with_scene<T>(&self, f: impl FnOnce(&Scene) -> T) -> EditorResult<T> {
        self.read(|session| Ok(f(&session.scene)))
    }

    /// Number of objects in the scene.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn object_count(&self) -> EditorResult<usize> {
        self.with_scene(Scene::len)
    }

    /// Current selection state.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn selection(&self) -> EditorResult<Selection> {
        self.with_scene(Scene::selection)
    }

    /// Current background.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn background(&self) -> EditorResult<Background> {
        self.read(|session| Ok(session.surface.background()))
    }

    /// The scene as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose), or
    /// a serialization error.
    pub fn scene_json(&self) -> EditorResult<String> {
        self.read(|session| Ok(session.scene.to_json()?))
    }

    /// Number of frames drawn so far, including the initial one.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn frame_count(&self) -> EditorResult<u64> {
        self.read(|session| Ok(session.surface.frame_count()))
    }

    /// Whether export is blocked by a bitmap without read-back permission.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Disposed`] after [`dispose`](Self::dispose).
    pub fn is_tainted(&self) -> EditorResult<bool> {
        self.read(|session| Ok(session.surface.is_tainted()))
    }

    // ---- Internals ----

    fn read<T>(&self, f: impl FnOnce(&Session) -> EditorResult<T>) -> EditorResult<T> {
        let session = self.session.borrow();
        f(session.as_ref().ok_or(EditorError::Disposed)?)
    }

    /// Run a selection change and report any failure. Nothing is redrawn.
    fn update<T>(&self, op: impl FnOnce(&mut Session) -> EditorResult<T>) -> EditorResult<T> {
        let result = {
            let mut guard = self.session.borrow_mut();
            match guard.as_mut() {
                Some(session) => op(session),
                None => Err(EditorError::Disposed),
            }
        };
        self.report(result)
    }

    /// Run a mutation, redraw, and report any failure.
    fn mutate<T>(&self, op: impl FnOnce(&mut Session) -> EditorResult<T>) -> EditorResult<T> {
        let result = self.apply(op);
        self.report(result)
    }

    /// Run a mutation and redraw. If the redraw fails the scene and
    /// background are rolled back, so a failed operation changes nothing.
    fn apply<T>(&self, op: impl FnOnce(&mut Session) -> EditorResult<T>) -> EditorResult<T> {
        let mut guard = self.session.borrow_mut();
        let session = guard.as_mut().ok_or(EditorError::Disposed)?;

        let scene_before = session.scene.clone();
        let background_before = session.surface.background();
        let value = op(session)?;

        if let Err(e) = session.surface.render(&session.scene) {
            session.scene = scene_before;
            session.surface.set_background(background_before);
            return Err(e.into());
        }
        Ok(value)
    }

    /// Forward the notice for a failure to the sink.
    ///
    /// Called with no session borrow outstanding, so a sink may call back
    /// into the editor.
    fn report<T>(&self, result: EditorResult<T>) -> EditorResult<T> {
        if let Err(e) = &result {
            match e.notice() {
                Some(notice) => {
                    tracing::debug!("Operation failed: {e}");
                    self.sink.notify(notice);
                }
                None => tracing::debug!("Operation skipped: {e}"),
            }
        }
        result
    }
}
