use anyhow::Result;
use assembly_ngin::{
    InstanceId, NO_SHADER, OccurrenceId, SceneError, placement_matrix,
    cgmath::{Deg, Quaternion, Rotation3, Vector3},
};

use crate::common::test_utils::{Fixture, assert_matrix_eq, translation};

mod common;

struct Parts {
    wheel: InstanceId,
    bolt: InstanceId,
}

fn parts(f: &mut Fixture) -> Parts {
    let bolt_ref = f.part("bolt", 12, 8, &[]);
    let wheel_ref = f.assembly("wheel");
    Parts {
        wheel: f.instance("wheel", wheel_ref, translation(2.0, 0.0, 0.0)),
        bolt: f.instance("bolt", bolt_ref, translation(0.0, 1.0, 0.0)),
    }
}

fn absolute(f: &Fixture, id: OccurrenceId) -> assembly_ngin::cgmath::Matrix4<f32> {
    f.graph.occurrence(id).expect("occurrence exists").absolute_matrix()
}

#[test]
fn should_compose_absolute_matrices_down_the_chain() -> Result<()> {
    let root_matrix = placement_matrix(
        Vector3::new(0.0, 0.0, 1.0),
        Quaternion::from_angle_z(Deg(90.0)),
        Vector3::new(1.0, 1.0, 1.0),
    );
    let mut f = Fixture::with_root_matrix(root_matrix);
    let p = parts(&mut f);
    let wheel = f.graph.add_child_instance(f.root, p.wheel)?;
    let bolt = f.graph.add_child_instance(wheel, p.bolt)?;

    let expected = root_matrix * translation(2.0, 0.0, 0.0) * translation(0.0, 1.0, 0.0);
    assert_matrix_eq(absolute(&f, bolt), expected);
    assert_matrix_eq(
        absolute(&f, bolt),
        absolute(&f, wheel) * translation(0.0, 1.0, 0.0),
    );

    f.graph.update_childs_absolute_matrix(f.root)?;
    let collection = f.graph.occurrence_collection(bolt)?.expect("attached");
    let drawable = collection.instance_handle(bolt).expect("bolt drawable");
    assert_matrix_eq(drawable.matrix(), expected);
    Ok(())
}

#[test]
fn should_move_every_occurrence_of_an_instance() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let w1 = f.graph.add_child_instance(f.root, p.wheel)?;
    let b1 = f.graph.add_child_instance(w1, p.bolt)?;
    let w2 = f.graph.add_child_instance(f.root, p.wheel)?;
    let b2 = f.graph.occurrence(w2).and_then(|w| w.child(0)).expect("cloned bolt");

    f.graph.set_relative_matrix(p.wheel, translation(3.0, 0.0, 0.0))?;

    for bolt in [b1, b2] {
        assert_matrix_eq(absolute(&f, bolt), translation(3.0, 1.0, 1.0));
        let collection = f.graph.occurrence_collection(bolt)?.expect("attached");
        let drawable = collection.instance_handle(bolt).expect("drawable");
        assert_matrix_eq(drawable.matrix(), translation(3.0, 1.0, 1.0));
    }
    Ok(())
}

#[test]
fn should_refuse_to_add_a_child_that_has_a_parent() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let bolt = f.graph.add_child_instance(f.root, p.bolt)?;
    let other = f.graph.create_occurrence(Some(f.world), p.wheel, NO_SHADER)?;

    assert_eq!(f.graph.add_child(other, bolt), Err(SceneError::NotOrphan(bolt)));
    assert_eq!(f.graph.occurrence(bolt).and_then(|b| b.parent()), Some(f.root));
    assert_eq!(f.graph.occurrence(other).map(|o| o.child_count()), Some(0));
    Ok(())
}

#[test]
fn should_refuse_children_from_another_world() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let elsewhere = f.graph.create_world_handle();
    let bolt = f.graph.create_occurrence(Some(elsewhere), p.bolt, NO_SHADER)?;

    let err = f.graph.add_child(f.root, bolt);
    assert!(matches!(
        err,
        Err(SceneError::WorldHandleMismatch { child, child_world: Some(w), .. })
            if child == bolt && w == elsewhere
    ));
    Ok(())
}

#[test]
fn should_refuse_to_create_a_cycle() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let wheel = f.graph.add_child_instance(f.root, p.wheel)?;

    assert_eq!(
        f.graph.add_child(wheel, f.root),
        Err(SceneError::WouldCreateCycle {
            parent: wheel,
            child: f.root
        })
    );
    assert!(f.graph.occurrence(f.root).expect("root").is_orphan());
    Ok(())
}

#[test]
fn should_move_a_removed_child_under_a_new_parent() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let bolt = f.graph.add_child_instance(f.root, p.bolt)?;
    let other_ref = f.assembly("other");
    let other_inst = f.instance("other", other_ref, translation(5.0, 0.0, 0.0));
    let other = f.graph.create_occurrence(Some(f.world), other_inst, NO_SHADER)?;

    assert!(f.graph.remove_child(f.root, bolt)?);

    let node = f.graph.occurrence(bolt).expect("bolt survives removal");
    assert!(node.is_orphan());
    assert!(!node.is_attached());
    assert_matrix_eq(node.absolute_matrix(), translation(0.0, 1.0, 0.0));
    let world = f.graph.world_handle(f.world).expect("world");
    assert!(!world.contains_occurrence(bolt));
    assert!(!world.collection().contains(bolt));
    assert_eq!(f.graph.occurrence(f.root).map(|r| r.child_count()), Some(0));

    f.graph.add_child(other, bolt)?;

    let node = f.graph.occurrence(bolt).expect("bolt");
    assert_eq!(node.world_handle(), Some(f.world));
    assert_eq!(node.parent(), Some(other));
    assert_matrix_eq(node.absolute_matrix(), translation(5.0, 1.0, 0.0));
    let collection = f.graph.occurrence_collection(bolt)?.expect("attached");
    let drawable = collection.instance_handle(bolt).expect("re-registered drawable");
    assert_matrix_eq(drawable.matrix(), translation(5.0, 1.0, 0.0));
    f.assert_instance_counts();
    Ok(())
}

#[test]
fn should_ignore_removal_of_a_non_child() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let wheel = f.graph.add_child_instance(f.root, p.wheel)?;
    let bolt = f.graph.add_child_instance(wheel, p.bolt)?;

    assert!(!f.graph.remove_child(f.root, bolt)?);

    let node = f.graph.occurrence(bolt).expect("bolt");
    assert_eq!(node.parent(), Some(wheel));
    assert_eq!(node.world_handle(), Some(f.world));
    Ok(())
}

#[test]
fn should_orphan_only_parented_occurrences() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let wheel = f.graph.add_child_instance(f.root, p.wheel)?;
    let bolt = f.graph.add_child_instance(wheel, p.bolt)?;

    assert_eq!(f.graph.make_orphan(f.root), Err(SceneError::AlreadyOrphan(f.root)));

    f.graph.make_orphan(wheel)?;

    assert!(f.graph.occurrence(wheel).expect("wheel").is_orphan());
    // the detached subtree leaves the world as a whole
    assert_eq!(f.graph.occurrence(bolt).and_then(|b| b.world_handle()), None);
    assert_eq!(f.graph.root_occurrences(f.world)?, vec![f.root]);
    Ok(())
}

#[test]
fn should_defer_transforms_of_bulk_attached_children() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let loose: Vec<OccurrenceId> = (0..3)
        .map(|_| f.graph.create_occurrence(None, p.bolt, NO_SHADER))
        .collect::<assembly_ngin::Result<_>>()?;

    let pending = f.graph.attach_children(f.root, &loose)?;
    assert_eq!(pending.parent(), f.root);
    assert_eq!(pending.children(), loose.as_slice());

    for &bolt in &loose {
        let node = f.graph.occurrence(bolt).expect("bolt");
        assert_eq!(node.parent(), Some(f.root));
        assert!(!node.is_attached());
        assert_matrix_eq(node.absolute_matrix(), translation(0.0, 1.0, 0.0));
    }

    f.graph.commit_transforms(pending)?;

    let collection = f.graph.occurrence_collection(f.root)?.expect("attached");
    assert_eq!(collection.len(), 3);
    for &bolt in &loose {
        assert_eq!(f.graph.occurrence(bolt).and_then(|b| b.world_handle()), Some(f.world));
        assert_matrix_eq(absolute(&f, bolt), translation(0.0, 1.0, 1.0));
        let drawable = collection.instance_handle(bolt).expect("drawable");
        assert_matrix_eq(drawable.matrix(), translation(0.0, 1.0, 1.0));
    }
    Ok(())
}

#[test]
fn should_skip_children_moved_away_before_commit() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let loose = f.graph.create_occurrence(None, p.bolt, NO_SHADER)?;
    let holder_ref = f.assembly("holder");
    let holder_inst = f.instance("holder", holder_ref, translation(5.0, 0.0, 0.0));
    let holder = f.graph.create_occurrence(None, holder_inst, NO_SHADER)?;

    let pending = f.graph.attach_children(f.root, &[loose])?;
    f.graph.make_orphan(loose)?;
    f.graph.add_child(holder, loose)?;
    f.graph.commit_transforms(pending)?;

    let node = f.graph.occurrence(loose).expect("moved bolt");
    assert_eq!(node.parent(), Some(holder));
    assert_eq!(node.world_handle(), None);
    assert_matrix_eq(node.absolute_matrix(), translation(5.0, 1.0, 0.0));
    let world = f.graph.world_handle(f.world).expect("world");
    assert!(!world.contains_occurrence(loose));
    assert!(!world.collection().contains(loose));
    assert_eq!(f.graph.occurrence(f.root).map(|r| r.child_count()), Some(0));
    Ok(())
}

#[test]
fn should_skip_children_destroyed_before_commit() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let first = f.graph.create_occurrence(None, p.bolt, NO_SHADER)?;
    let second = f.graph.create_occurrence(None, p.bolt, NO_SHADER)?;

    let pending = f.graph.attach_children(f.root, &[first, second])?;
    f.graph.destroy_occurrence(first)?;
    f.graph.commit_transforms(pending)?;

    assert!(f.graph.occurrence(first).is_none());
    assert_eq!(f.graph.occurrence(second).and_then(|o| o.world_handle()), Some(f.world));
    assert_matrix_eq(absolute(&f, second), translation(0.0, 1.0, 1.0));
    f.assert_instance_counts();
    Ok(())
}

#[test]
fn should_reject_bulk_attach_as_a_whole() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let parented = f.graph.add_child_instance(f.root, p.bolt)?;
    let loose = f.graph.create_occurrence(None, p.bolt, NO_SHADER)?;

    assert_eq!(
        f.graph.attach_children(f.root, &[loose, parented]).map(|_| ()),
        Err(SceneError::NotOrphan(parented))
    );
    assert_eq!(
        f.graph.attach_children(f.root, &[loose, loose]).map(|_| ()),
        Err(SceneError::DuplicateChild(loose))
    );
    assert!(f.graph.occurrence(loose).expect("loose").is_orphan());
    assert_eq!(f.graph.occurrence(f.root).map(|r| r.child_count()), Some(1));
    Ok(())
}

#[test]
fn should_move_a_subtree_to_another_world() -> Result<()> {
    let mut f = Fixture::new();
    let p = parts(&mut f);
    let elsewhere = f.graph.create_world_handle();
    let wheel = f.graph.create_occurrence(Some(f.world), p.wheel, NO_SHADER)?;
    let bolt = f.graph.add_child_instance(wheel, p.bolt)?;
    f.graph
        .world_handle_mut(f.world)
        .expect("world")
        .collection_mut()
        .select(bolt);

    f.graph.set_world_handle(wheel, Some(elsewhere))?;

    let home = f.graph.world_handle(f.world).expect("world");
    assert!(!home.contains_occurrence(wheel));
    assert!(!home.collection().contains(bolt));
    assert_eq!(home.collection().selection_size(), 0);
    let away = f.graph.world_handle(elsewhere).expect("other world");
    assert!(away.contains_occurrence(wheel));
    assert!(away.contains_occurrence(bolt));
    assert!(away.collection().contains(bolt));
    // selection stays behind with the old collection
    assert!(!away.collection().is_selected(bolt));

    f.graph.set_world_handle(wheel, Some(elsewhere))?;
    assert_eq!(f.graph.world_handle(elsewhere).map(|w| w.occurrence_count()), Some(2));
    Ok(())
}
