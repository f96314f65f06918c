//! Drawable entries: materialized representations living in a collection.
//!
//! A [`Drawable`] is what an occurrence with a representation puts into the
//! collection of its world handle. It is keyed by the occurrence id and
//! carries the absolute matrix, visibility and selection state the renderer
//! reads back.

use std::rc::Rc;

use cgmath::{Matrix, Matrix3, Matrix4, SquareMatrix};

use crate::data_structures::{
    bounding_box::BoundingBox, occurrence::OccurrenceId, representation::Representation,
};

#[derive(Clone, Debug)]
pub struct Drawable {
    id: OccurrenceId,
    name: String,
    representation: Rc<Representation>,
    matrix: Matrix4<f32>,
    visible: bool,
    selected: bool,
    normals_reversed: bool,
}

impl Drawable {
    /// Stamps a representation template with an occurrence's id and name.
    pub fn new(
        id: OccurrenceId,
        name: impl Into<String>,
        representation: Rc<Representation>,
        matrix: Matrix4<f32>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            representation,
            matrix,
            visible: true,
            selected: false,
            normals_reversed: false,
        }
    }

    pub fn id(&self) -> OccurrenceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn representation(&self) -> &Rc<Representation> {
        &self.representation
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.matrix
    }

    pub fn set_matrix(&mut self, matrix: Matrix4<f32>) {
        self.matrix = matrix;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn normals_reversed(&self) -> bool {
        self.normals_reversed
    }

    /// Flips the orientation of the geometry normals.
    pub fn reverse_normals(&mut self) {
        self.normals_reversed = !self.normals_reversed;
    }

    /// The template's local box moved to world space.
    pub fn bounding_box(&self) -> BoundingBox {
        self.representation.bounding_box.transform(&self.matrix)
    }

    pub fn to_raw(&self) -> DrawableRaw {
        let linear = Matrix3::from_cols(
            self.matrix.x.truncate(),
            self.matrix.y.truncate(),
            self.matrix.z.truncate(),
        );
        // normals transform with the inverse transpose of the linear part
        let normal = linear
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);
        let mut handedness = linear.determinant().signum();
        if self.normals_reversed {
            handedness = -handedness;
        }
        DrawableRaw {
            model: self.matrix.into(),
            normal: normal.into(),
            handedness,
        }
    }
}

/// The per-drawable data a GPU renderer uploads.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawableRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    /// -1 flips front faces, for mirrored placements and reversed normals.
    pub handedness: f32,
}
