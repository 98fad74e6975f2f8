//! Scene object store and the selection-gated transform operations.

use serde::Serialize;

use crate::{CanvasError, CanvasResult, ObjectId, ObjectKind, SceneObject};

/// Which object, if any, transform operations target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum Selection {
    /// Nothing is selected.
    #[default]
    Idle,
    /// Exactly one object is selected.
    Active(ObjectId),
}

impl Selection {
    /// The selected object ID, if any.
    #[must_use]
    pub fn id(self) -> Option<ObjectId> {
        match self {
            Self::Idle => None,
            Self::Active(id) => Some(id),
        }
    }

    /// Whether something is selected.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// An insertion-ordered collection of scene objects with at most one active.
///
/// The active reference is a lookup key into the store; removing the active
/// object clears it in the same call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Scene {
    /// Objects in drawing order (first is bottom-most).
    objects: Vec<SceneObject>,
    /// Current selection.
    selection: Selection,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an object and make it the active one.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id;
        self.objects.push(object);
        self.selection = Selection::Active(id);
        tracing::debug!("Added object {id}, {} in scene", self.objects.len());
        id
    }

    /// Get an object by ID.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    /// The most recently added object still in the scene.
    #[must_use]
    pub fn last(&self) -> Option<&SceneObject> {
        self.objects.last()
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Current selection state.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The active object, if any.
    #[must_use]
    pub fn active(&self) -> Option<&SceneObject> {
        self.selection.id().and_then(|id| self.get(id))
    }

    /// Select an object by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ObjectNotFound`] if the ID is not in the
    /// scene; the selection is left unchanged.
    pub fn select(&mut self, id: ObjectId) -> CanvasResult<()> {
        if self.get(id).is_none() {
            return Err(CanvasError::ObjectNotFound(id.to_string()));
        }
        self.selection = Selection::Active(id);
        tracing::debug!("Selected {id}");
        Ok(())
    }

    /// Select the topmost object under a surface point.
    ///
    /// A point over the bare background clears the selection.
    pub fn select_at(&mut self, x: f32, y: f32) -> Selection {
        self.selection = self
            .objects
            .iter()
            .rev()
            .find(|o| o.contains_point(x, y))
            .map_or(Selection::Idle, |o| Selection::Active(o.id));
        tracing::debug!("Pointer select at ({x}, {y}): {:?}", self.selection);
        self.selection
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selection = Selection::Idle;
    }

    fn active_mut(&mut self, action: &'static str) -> CanvasResult<&mut SceneObject> {
        let id = self
            .selection
            .id()
            .ok_or(CanvasError::NothingSelected { action })?;
        self.get_mut(id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))
    }

    /// Toggle the horizontal flip of the active object.
    ///
    /// Returns the new flip flag.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NothingSelected`] when idle.
    pub fn flip_active(&mut self) -> CanvasResult<bool> {
        let object = self.active_mut("flip")?;
        object.transform.flip_x = !object.transform.flip_x;
        let flipped = object.transform.flip_x;
        tracing::debug!("Flipped {} (flip_x = {flipped})", object.id);
        Ok(flipped)
    }

    /// Remove the active object and return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NothingSelected`] when idle.
    pub fn delete_active(&mut self) -> CanvasResult<SceneObject> {
        let id = self
            .selection
            .id()
            .ok_or(CanvasError::NothingSelected { action: "delete" })?;
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| CanvasError::ObjectNotFound(id.to_string()))?;
        let removed = self.objects.remove(index);
        self.selection = Selection::Idle;
        tracing::debug!("Deleted {id}, {} left", self.objects.len());
        Ok(removed)
    }

    /// Translate the active object.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NothingSelected`] when idle, or
    /// [`CanvasError::InvalidOperation`] if an offset is not finite.
    pub fn move_active(&mut self, dx: f32, dy: f32) -> CanvasResult<()> {
        let object = self.active_mut("move")?;
        if !dx.is_finite() || !dy.is_finite() {
            return Err(CanvasError::InvalidOperation(format!(
                "cannot move by ({dx}, {dy})"
            )));
        }
        object.transform.x += dx;
        object.transform.y += dy;
        Ok(())
    }

    /// Rotate the active object clockwise by `degrees`.
    ///
    /// Returns the resulting rotation, normalized into `[0, 360)`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NothingSelected`] when idle, or
    /// [`CanvasError::InvalidOperation`] if `degrees` is not finite.
    pub fn rotate_active(&mut self, degrees: f32) -> CanvasResult<f32> {
        let object = self.active_mut("rotate")?;
        if !degrees.is_finite() {
            return Err(CanvasError::InvalidOperation(format!(
                "cannot rotate by {degrees}"
            )));
        }
        let mut rotation = (object.transform.rotation + degrees).rem_euclid(360.0);
        // rem_euclid rounds tiny negative sums up to exactly 360 in f32.
        if rotation >= 360.0 {
            rotation = 0.0;
        }
        object.transform.rotation = rotation;
        Ok(rotation)
    }

    /// Replace the content of the active text object.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::NothingSelected`] when idle, or
    /// [`CanvasError::InvalidOperation`] if the active object is an image.
    pub fn set_active_text(&mut self, content: impl Into<String>) -> CanvasResult<()> {
        let object = self.active_mut("edit")?;
        match &mut object.kind {
            ObjectKind::Text(text) => {
                text.content = content.into();
                Ok(())
            }
            ObjectKind::Image(_) => Err(CanvasError::InvalidOperation(format!(
                "{} is an image, not text",
                object.id
            ))),
        }
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string_pretty(self).map_err(CanvasError::Serialization)
    }
}
