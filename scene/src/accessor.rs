//! Typed accessor extraction
//!
//! [`extract`] validates an accessor against its buffer view and buffer, then
//! copies `count` strided elements into a densely packed `Vec<T>`. Nothing is
//! copied unless every check passes.

use bytemuck::Pod;
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

use crate::document::{ComponentType, Document, Shape};
use crate::error::{Result, SceneError};

/// A type that can be read straight out of an accessor.
pub trait Element: Pod {
    const COMPONENT: ComponentType;
    const SHAPE: Shape;
}

macro_rules! impl_element {
    ($($ty:ty => $component:ident, $shape:ident;)*) => {
        $(
            impl Element for $ty {
                const COMPONENT: ComponentType = ComponentType::$component;
                const SHAPE: Shape = Shape::$shape;
            }
        )*
    };
}

impl_element! {
    u8 => U8, Scalar;
    u16 => U16, Scalar;
    u32 => U32, Scalar;
    f32 => F32, Scalar;
    Vec2 => F32, Vec2;
    Vec3 => F32, Vec3;
    Vec4 => F32, Vec4;
    Quat => F32, Vec4;
    Mat4 => F32, Mat4;
    [u8; 4] => U8, Vec4;
    [u16; 4] => U16, Vec4;
}

/// Decode accessor `index` as a `Vec<T>`.
pub fn extract<T: Element>(doc: &Document, index: usize) -> Result<Vec<T>> {
    let accessor = doc.accessor(index)?;

    let view_index = accessor
        .buffer_view
        .ok_or(SceneError::MissingBufferView(index))?;
    let view = doc.buffer_views.get(view_index).ok_or_else(|| {
        SceneError::out_of_bounds("buffer view", view_index, doc.buffer_views.len())
    })?;
    let buffer = doc
        .buffers
        .get(view.buffer)
        .ok_or_else(|| SceneError::out_of_bounds("buffer", view.buffer, doc.buffers.len()))?;
    let data = buffer.data.as_slice();

    if data.is_empty() {
        return Err(SceneError::EmptyBuffer(view.buffer));
    }

    let view_end = view.byte_offset.saturating_add(view.byte_length);
    if view_end > data.len() {
        return Err(SceneError::ViewOutOfBounds {
            view: view_index,
            buffer: view.buffer,
            offset: view.byte_offset,
            end: view_end,
            len: data.len(),
        });
    }

    if accessor.component_type != T::COMPONENT || accessor.shape != T::SHAPE {
        return Err(SceneError::TypeMismatch {
            accessor: index,
            expected: format!("{:?} {:?}", T::COMPONENT, T::SHAPE),
            found: format!("{:?} {:?}", accessor.component_type, accessor.shape),
        });
    }

    let element_size = size_of::<T>();
    let stride = view.byte_stride.unwrap_or(element_size);
    let byte_offset = view
        .byte_offset
        .checked_add(accessor.byte_offset)
        .ok_or(SceneError::AccessorOutOfBounds {
            accessor: index,
            end: usize::MAX,
            len: data.len(),
        })?;

    let end = accessor
        .count
        .checked_mul(stride)
        .and_then(|n| n.checked_add(byte_offset))
        .unwrap_or(usize::MAX);
    if end > data.len() {
        return Err(SceneError::AccessorOutOfBounds {
            accessor: index,
            end,
            len: data.len(),
        });
    }

    if element_size > stride {
        return Err(SceneError::StrideTooSmall {
            accessor: index,
            element_size,
            stride,
        });
    }

    Ok((0..accessor.count)
        .map(|i| {
            let start = byte_offset + i * stride;
            bytemuck::pod_read_unaligned(&data[start..start + element_size])
        })
        .collect())
}

/// Decode an index accessor of any unsigned width, widened to `u32`.
pub fn extract_indices(doc: &Document, index: usize) -> Result<Vec<u32>> {
    match doc.accessor(index)?.component_type {
        ComponentType::U8 => Ok(extract::<u8>(doc, index)?
            .into_iter()
            .map(u32::from)
            .collect()),
        ComponentType::U16 => Ok(extract::<u16>(doc, index)?
            .into_iter()
            .map(u32::from)
            .collect()),
        _ => extract::<u32>(doc, index),
    }
}
