//! Binary object format
//!
//! A scene object is stored as a sequence of tagged records. Every record
//! starts with a 4-byte marker; all integers and floats are little-endian and
//! tightly packed.
//!
//! | Marker        | Value | Payload                                   |
//! |---------------|-------|-------------------------------------------|
//! | `Translation` | 0     | 3 × f32                                   |
//! | `Rotation`    | 1     | 4 × f32 (x, y, z, w)                      |
//! | `Scale`       | 2     | 3 × f32                                   |
//! | `Vertices`    | 3     | u32 count, then count × 8 × f32           |
//! | `Indices`     | 4     | u32 count, then count × u32               |
//! | `End`         | 5     | none                                      |
//!
//! Writers emit translation, rotation, scale, the two geometry records when
//! the object has a mesh, and `End`. Readers take records in stream order
//! until `End`. A repeated record overwrites the earlier one and anything after
//! `End` is ignored. Unknown markers and short payloads are rejected; counts
//! are checked against the bytes left before anything is allocated.

use std::io::{self, Write};
use std::sync::Arc;

use rigidscene_math::{Quat, Vec3};

use crate::{CorruptKind, Mesh, PersistError, SceneObject, Vertex};

/// Record markers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Marker {
    Translation = 0,
    Rotation = 1,
    Scale = 2,
    Vertices = 3,
    Indices = 4,
    End = 5,
}

impl Marker {
    /// Parse a raw marker value
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Marker::Translation),
            1 => Some(Marker::Rotation),
            2 => Some(Marker::Scale),
            3 => Some(Marker::Vertices),
            4 => Some(Marker::Indices),
            5 => Some(Marker::End),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Write an object as a complete record stream
pub fn write_object<W: Write>(object: &SceneObject, writer: &mut W) -> io::Result<()> {
    write_marker(writer, Marker::Translation)?;
    write_vec3(writer, object.translation())?;

    write_marker(writer, Marker::Rotation)?;
    for c in object.rotation().to_array() {
        writer.write_all(&c.to_le_bytes())?;
    }

    write_marker(writer, Marker::Scale)?;
    write_vec3(writer, object.scale())?;

    if let Some(mesh) = object.mesh() {
        write_marker(writer, Marker::Vertices)?;
        write_count(writer, mesh.vertex_count())?;
        for vertex in mesh.vertices() {
            for c in vertex.to_floats() {
                writer.write_all(&c.to_le_bytes())?;
            }
        }

        write_marker(writer, Marker::Indices)?;
        write_count(writer, mesh.index_count())?;
        for index in mesh.indices() {
            writer.write_all(&index.to_le_bytes())?;
        }
    }

    write_marker(writer, Marker::End)
}

/// Encode an object into a new byte buffer
///
/// Fails only when a mesh count does not fit the 32-bit count field.
pub fn encode_object(object: &SceneObject) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_object(object, &mut bytes)?;
    Ok(bytes)
}

/// Read an object from a complete record stream
///
/// The transform matrix of the returned object is already recomputed.
pub fn read_object(bytes: &[u8]) -> Result<SceneObject, PersistError> {
    let mut reader = ByteReader::new(bytes);
    let mut object = SceneObject::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    loop {
        if reader.remaining() == 0 {
            return Err(CorruptKind::MissingEnd.into());
        }
        let offset = reader.offset();
        let raw = reader.read_u32(Marker::End)?;
        let marker = Marker::from_u32(raw)
            .ok_or(CorruptKind::UnknownMarker { marker: raw, offset })?;

        match marker {
            Marker::Translation => {
                object.set_translation(reader.read_vec3(marker)?);
            }
            Marker::Rotation => {
                let x = reader.read_f32(marker)?;
                let y = reader.read_f32(marker)?;
                let z = reader.read_f32(marker)?;
                let w = reader.read_f32(marker)?;
                object.set_rotation(Quat::new(x, y, z, w));
            }
            Marker::Scale => {
                object.set_scale(reader.read_vec3(marker)?);
            }
            Marker::Vertices => {
                let count = reader.read_count(marker, Vertex::SIZE)?;
                vertices = Vec::with_capacity(count);
                for _ in 0..count {
                    let mut floats = [0.0f32; Vertex::FLOAT_COUNT];
                    for f in floats.iter_mut() {
                        *f = reader.read_f32(marker)?;
                    }
                    vertices.push(Vertex::from_floats(floats));
                }
            }
            Marker::Indices => {
                let count = reader.read_count(marker, 4)?;
                indices = Vec::with_capacity(count);
                for _ in 0..count {
                    indices.push(reader.read_u32(marker)?);
                }
            }
            Marker::End => break,
        }
    }

    if reader.remaining() > 0 {
        log::debug!("Ignoring {} bytes after END marker", reader.remaining());
    }

    if indices.is_empty() {
        if !vertices.is_empty() {
            log::debug!("Object has {} vertices but no indices; leaving it without a mesh", vertices.len());
        }
    } else {
        let mesh = Mesh::new(vertices, indices).map_err(CorruptKind::InvalidGeometry)?;
        object.set_mesh(Some(Arc::new(mesh)));
    }

    object.recompute_transform();
    Ok(object)
}

fn write_marker<W: Write>(writer: &mut W, marker: Marker) -> io::Result<()> {
    writer.write_all(&marker.as_u32().to_le_bytes())
}

fn write_count<W: Write>(writer: &mut W, count: usize) -> io::Result<()> {
    let count = u32::try_from(count).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "record count does not fit in 4 bytes")
    })?;
    writer.write_all(&count.to_le_bytes())
}

fn write_vec3<W: Write>(writer: &mut W, v: Vec3) -> io::Result<()> {
    for c in v.to_array() {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

/// Bounds-checked little-endian cursor over a byte slice
struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[inline]
    fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take4(&mut self, marker: Marker) -> Result<[u8; 4], CorruptKind> {
        let end = self.pos + 4;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or(CorruptKind::Truncated { marker, offset: self.pos })?;
        self.pos = end;
        let mut out = [0u8; 4];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn read_u32(&mut self, marker: Marker) -> Result<u32, CorruptKind> {
        self.take4(marker).map(u32::from_le_bytes)
    }

    fn read_f32(&mut self, marker: Marker) -> Result<f32, CorruptKind> {
        self.take4(marker).map(f32::from_le_bytes)
    }

    fn read_vec3(&mut self, marker: Marker) -> Result<Vec3, CorruptKind> {
        Ok(Vec3::new(
            self.read_f32(marker)?,
            self.read_f32(marker)?,
            self.read_f32(marker)?,
        ))
    }

    /// Read a record count and check `count * item_size` bytes are left
    fn read_count(&mut self, marker: Marker, item_size: usize) -> Result<usize, CorruptKind> {
        let count = self.read_u32(marker)?;
        let available = self.remaining();
        let fits = (count as usize)
            .checked_mul(item_size)
            .is_some_and(|needed| needed <= available);
        if !fits {
            return Err(CorruptKind::CountExceedsStream { marker, count, available });
        }
        Ok(count as usize)
    }
}
