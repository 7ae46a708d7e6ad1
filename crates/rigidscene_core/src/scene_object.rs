//! Scene objects
//!
//! A [`SceneObject`] carries translation, rotation and scale, an optional shared
//! [`Mesh`], and a transform matrix derived from the three fields.
//!
//! The matrix is **not** kept in sync automatically. Setters only mark the
//! object dirty; whoever changes the fields must call
//! [`SceneObject::recompute_transform`] before the matrix is read.

use std::cell::RefCell;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use bitflags::bitflags;
use rigidscene_math::{mat4, Mat4, Quat, Vec3};

use crate::{codec, Mesh, PersistError};

bitflags! {
    /// Flags indicating which parts of an object changed since they were last consumed
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Translation, rotation or scale changed and the matrix is stale
        const TRANSFORM = 1 << 0;
        /// The attached mesh was replaced
        const MESH = 1 << 1;
        /// Everything needs rebuilding
        const ALL = Self::TRANSFORM.bits() | Self::MESH.bits();
    }
}

/// Shared handle to a scene object
///
/// The runtime is single-threaded: the object list, the renderer and the
/// physics binding all hold clones of the same handle.
pub type SharedObject = Rc<RefCell<SceneObject>>;

/// An object in the scene
#[derive(Clone, Debug)]
pub struct SceneObject {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    mesh: Option<Arc<Mesh>>,
    matrix: Mat4,
    dirty: DirtyFlags,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneObject {
    /// Create an empty object at the origin with no mesh
    pub fn new() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
            matrix: mat4::IDENTITY,
            dirty: DirtyFlags::NONE,
        }
    }

    /// Attach a mesh
    pub fn with_mesh(mut self, mesh: Arc<Mesh>) -> Self {
        self.set_mesh(Some(mesh));
        self
    }

    /// Set the translation (marks the transform stale)
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.set_translation(translation);
        self
    }

    /// Set the rotation (marks the transform stale)
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Set the scale (marks the transform stale)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Wrap this object in a shared handle
    pub fn into_shared(self) -> SharedObject {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// Rebuild the matrix as scale, then rotate, then translate
    pub fn recompute_transform(&mut self) {
        self.matrix = mat4::scale_rotate_translate(self.scale, self.rotation, self.translation);
        self.dirty.remove(DirtyFlags::TRANSFORM);
    }

    /// The matrix as of the last [`recompute_transform`](Self::recompute_transform)
    #[inline]
    pub fn transform(&self) -> Mat4 {
        self.matrix
    }

    /// The attached mesh, if any
    #[inline]
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Replace the mesh
    ///
    /// Does not touch the transform matrix.
    pub fn set_mesh(&mut self, mesh: Option<Arc<Mesh>>) {
        self.mesh = mesh;
        self.dirty |= DirtyFlags::MESH;
    }

    /// Current dirty flags
    #[inline]
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// True if a field changed after the matrix was last rebuilt
    #[inline]
    pub fn is_transform_stale(&self) -> bool {
        self.dirty.contains(DirtyFlags::TRANSFORM)
    }

    /// Return the dirty flags and clear everything except a stale transform
    ///
    /// A stale transform can only be cleared by recomputing it.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        let flags = self.dirty;
        self.dirty &= DirtyFlags::TRANSFORM;
        flags
    }

    /// Write this object in the binary object format
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<(), PersistError> {
        codec::write_object(self, writer)?;
        Ok(())
    }

    /// Read an object from a complete binary object buffer
    pub fn load(bytes: &[u8]) -> Result<Self, PersistError> {
        codec::read_object(bytes)
    }

    /// Save to a file, replacing any existing contents
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistError> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load from a file
    ///
    /// A missing file is reported as [`PersistError::NotFound`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PersistError::NotFound(path.to_path_buf()),
            _ => PersistError::Io(e),
        })?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Self::load(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigidscene_math::mat4::{abs_diff_eq, transform_point};

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_defaults() {
        let obj = SceneObject::new();
        assert_eq!(obj.translation(), Vec3::ZERO);
        assert_eq!(obj.rotation(), Quat::IDENTITY);
        assert_eq!(obj.scale(), Vec3::ONE);
        assert!(!obj.has_mesh());
        assert_eq!(obj.transform(), mat4::IDENTITY);
        assert!(!obj.is_transform_stale());
    }

    #[test]
    fn test_setters_do_not_recompute() {
        let mut obj = SceneObject::new();
        obj.set_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.transform(), mat4::IDENTITY);
        assert!(obj.is_transform_stale());

        obj.recompute_transform();
        assert!(!obj.is_transform_stale());
        assert_eq!(obj.transform()[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_recompute_is_scale_rotate_translate() {
        let mut obj = SceneObject::new()
            .with_scale(Vec3::splat(2.0))
            .with_rotation(Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2))
            .with_translation(Vec3::new(10.0, 0.0, 0.0));
        obj.recompute_transform();

        // The stored rotation acts as its inverse on row vectors: X*2 -> (0, -2, 0)
        let p = transform_point(obj.transform(), Vec3::X);
        assert!((p - Vec3::new(10.0, -2.0, 0.0)).length() < EPSILON, "got {:?}", p);
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let mut a = SceneObject::new()
            .with_rotation(Quat::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), 0.3))
            .with_translation(Vec3::new(4.0, 5.0, 6.0));
        let mut b = a.clone();
        a.recompute_transform();
        b.recompute_transform();
        b.recompute_transform();
        assert_eq!(a.transform(), b.transform());
    }

    #[test]
    fn test_set_mesh_does_not_recompute() {
        let mut obj = SceneObject::new().with_translation(Vec3::new(0.0, 1.0, 0.0));
        obj.recompute_transform();
        let before = obj.transform();

        obj.set_scale(Vec3::splat(3.0));
        obj.set_mesh(Some(Arc::new(Mesh::triangle())));
        assert!(obj.has_mesh());
        assert!(abs_diff_eq(obj.transform(), before, 0.0));
        assert!(obj.dirty().contains(DirtyFlags::MESH | DirtyFlags::TRANSFORM));
    }

    #[test]
    fn test_take_dirty_keeps_stale_transform() {
        let mut obj = SceneObject::new().with_mesh(Arc::new(Mesh::triangle()));
        obj.set_translation(Vec3::ONE);

        let flags = obj.take_dirty();
        assert_eq!(flags, DirtyFlags::ALL);
        assert_eq!(obj.dirty(), DirtyFlags::TRANSFORM);

        obj.recompute_transform();
        assert_eq!(obj.take_dirty(), DirtyFlags::NONE);
    }

    #[test]
    fn test_clone_shares_mesh() {
        let mesh = Arc::new(Mesh::triangle());
        let obj = SceneObject::new().with_mesh(mesh.clone());
        let copy = obj.clone();
        assert!(Arc::ptr_eq(copy.mesh().unwrap(), &mesh));
        assert_eq!(Arc::strong_count(&mesh), 3);
    }

    #[test]
    fn test_shared_handle() {
        let shared = SceneObject::new().into_shared();
        let other = Rc::clone(&shared);
        other.borrow_mut().set_translation(Vec3::Y);
        assert_eq!(shared.borrow().translation(), Vec3::Y);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let err = SceneObject::load_from_file("definitely/not/here.rso").unwrap_err();
        assert!(matches!(err, PersistError::NotFound(_)), "got {:?}", err);
    }
}
