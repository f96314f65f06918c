#![allow(dead_code)]

use std::rc::Rc;

use assembly_ngin::{
    BoundingBox, InstanceId, Material, NO_SHADER, OccurrenceId, Representation, SceneGraph,
    StructReference, WorldHandleId,
    cgmath::{Matrix4, Point3, Vector3},
};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

pub(crate) fn unit_box() -> BoundingBox {
    BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0))
}

pub(crate) fn material(id: u32, name: &str) -> Rc<Material> {
    Rc::new(Material::new(id, name, [0.5, 0.5, 0.5, 1.0]))
}

pub(crate) fn assert_matrix_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let a: [[f32; 4]; 4] = actual.into();
    let e: [[f32; 4]; 4] = expected.into();
    for col in 0..4 {
        for row in 0..4 {
            assert!(
                (a[col][row] - e[col][row]).abs() < 1e-5,
                "matrices differ at [{}][{}]: {:?} != {:?}",
                col,
                row,
                actual,
                expected
            );
        }
    }
}

/// A graph with one world and an assembly root at `root_matrix`.
pub(crate) struct Fixture {
    pub graph: SceneGraph,
    pub world: WorldHandleId,
    pub root: OccurrenceId,
    pub root_instance: InstanceId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_root_matrix(translation(0.0, 0.0, 1.0))
    }

    pub fn with_root_matrix(root_matrix: Matrix4<f32>) -> Self {
        init_logging();
        let mut graph = SceneGraph::new();
        let world = graph.create_world_handle();
        let root_ref = assembly(&mut graph, "root");
        let root_instance = graph.create_instance("root", root_ref, root_matrix);
        let root = graph
            .create_occurrence(Some(world), root_instance, NO_SHADER)
            .expect("root occurrence");
        Self {
            graph,
            world,
            root,
            root_instance,
        }
    }

    pub fn instance(
        &mut self,
        name: &str,
        reference: Rc<StructReference>,
        m: Matrix4<f32>,
    ) -> InstanceId {
        self.graph.create_instance(name, reference, m)
    }

    pub fn part(
        &mut self,
        name: &str,
        faces: usize,
        vertices: usize,
        materials: &[Rc<Material>],
    ) -> Rc<StructReference> {
        part(&mut self.graph, name, faces, vertices, materials)
    }

    pub fn assembly(&mut self, name: &str) -> Rc<StructReference> {
        assembly(&mut self.graph, name)
    }

    /// Checks that every instance lists exactly the live occurrences wrapping it.
    pub fn assert_instance_counts(&self) {
        for instance in self.graph.instances() {
            let live = self
                .graph
                .occurrences()
                .filter(|occ| occ.instance() == instance.id())
                .count();
            assert_eq!(instance.occurrence_count(), live, "instance {}", instance.name());
            assert!(live > 0, "instance {} outlived its occurrences", instance.name());
        }
    }
}

/// A reference with a unit-box representation.
pub(crate) fn part(
    graph: &mut SceneGraph,
    name: &str,
    faces: usize,
    vertices: usize,
    materials: &[Rc<Material>],
) -> Rc<StructReference> {
    let mut representation = Representation::new(name, unit_box()).with_counts(faces, vertices);
    for material in materials {
        representation = representation.with_material(Rc::clone(material));
    }
    let id = graph.next_id();
    Rc::new(StructReference::with_representation(id, name, representation))
}

/// A reference without representation.
pub(crate) fn assembly(graph: &mut SceneGraph, name: &str) -> Rc<StructReference> {
    let id = graph.next_id();
    Rc::new(StructReference::new(id, name))
}
