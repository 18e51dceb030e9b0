use {
    crate::{
        ifs::wl_surface::{LinkOwner, Role, SurfaceLink, SurfaceRole, WlSurface},
        it::testrun::TestRun,
        object::ObjectId,
        rect::Rect,
        wire::{Event, WlSurfaceId},
    },
    std::{cell::RefCell, rc::Rc},
};

#[test]
fn views_rotate_on_commit() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    surface.set_buffer_scale(2).unwrap();
    surface.attach(Some(&run.buffer(20, 10).unwrap()), 0, 0);
    assert_eq!(surface.current().scale, 1);
    surface.commit().unwrap();
    assert_eq!(surface.current().scale, 2);
    assert_eq!(surface.previous().scale, 1);
    assert_eq!(surface.size(), (10, 5));

    // Persistent state is inherited, per-commit state is not.
    let pending = surface.pending();
    assert_eq!(pending.scale, 2);
    assert!(pending.buffer.is_none());
    assert!(pending.commit_state.is_none());

    surface.commit().unwrap();
    assert_eq!(surface.size(), (10, 5));
    assert!(surface.is_mapped());
}

#[test]
fn transform_swaps_size_and_damage() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    surface.set_buffer_transform(1).unwrap();
    surface.attach(Some(&run.buffer(20, 10).unwrap()), 0, 0);
    surface.damage(0, 0, 2, 4);
    surface.commit().unwrap();
    assert_eq!(surface.size(), (10, 20));
    let upload = run.importer.last_upload().unwrap();
    assert_eq!(upload.damage.extents(), Rect::new_sized(0, 8, 4, 2).unwrap());
}

#[test]
fn crop_defines_size() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    surface.set_crop(Some((4, 4, 8, 6))).unwrap();
    surface.attach(Some(&run.buffer(32, 32).unwrap()), 0, 0);
    surface.commit().unwrap();
    assert_eq!(surface.size(), (8, 6));

    surface.set_crop(None).unwrap();
    surface.commit().unwrap();
    assert_eq!(surface.size(), (32, 32));
}

#[test]
fn invalid_parameters_are_protocol_errors() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    assert!(surface.set_buffer_scale(0).is_err());
    assert_eq!(run.protocol_error(), Some((ObjectId::from(surface.id), 0)));

    let run = TestRun::new();
    let surface = run.surface().unwrap();
    assert!(surface.set_buffer_transform(8).is_err());
    assert_eq!(run.protocol_error(), Some((ObjectId::from(surface.id), 1)));

    let run = TestRun::new();
    let surface = run.surface().unwrap();
    assert!(surface.set_crop(Some((0, 0, 0, 5))).is_err());
    assert_eq!(run.protocol_error(), Some((ObjectId::from(surface.id), 2)));
}

#[test]
fn input_region_limits_hit_testing() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    let region = run.compositor.create_region().unwrap();
    region.add(0, 0, 5, 5).unwrap();
    surface.set_input_region(Some(&region));
    run.commit_buffer(&surface, 10, 10).unwrap();
    assert!(surface.point_in_surface(7.0, 7.0));
    assert!(!surface.point_in_input_region(7.0, 7.0));
    assert!(surface.point_in_input_region(2.0, 2.0));
    assert!(surface.surface_at(7.0, 7.0).is_none());
    assert!(surface
        .surface_at(2.0, 2.0)
        .is_some_and(|s| s.id == surface.id));

    surface.set_input_region(None);
    surface.commit().unwrap();
    assert!(surface.point_in_input_region(7.0, 7.0));
}

#[test]
fn topmost_subsurface_is_hit_first() {
    let run = TestRun::new();
    let parent = run.surface().unwrap();
    run.commit_buffer(&parent, 100, 100).unwrap();
    let (a, ss_a) = run.subsurface(&parent).unwrap();
    let (b, ss_b) = run.subsurface(&parent).unwrap();
    ss_a.set_desync().unwrap();
    ss_b.set_desync().unwrap();
    run.commit_buffer(&a, 50, 50).unwrap();
    run.commit_buffer(&b, 50, 50).unwrap();
    parent.commit().unwrap();
    assert!(parent.surface_at(10.0, 10.0).is_some_and(|s| s.id == b.id));

    ss_b.place_below(&a).unwrap();
    assert!(parent.surface_at(10.0, 10.0).is_some_and(|s| s.id == b.id));
    parent.commit().unwrap();
    assert!(parent.surface_at(10.0, 10.0).is_some_and(|s| s.id == a.id));
    assert!(parent.surface_at(70.0, 70.0).is_some_and(|s| s.id == parent.id));
}

#[test]
fn frame_callbacks_fire_after_commit() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    let cb = surface.frame().unwrap();
    assert!(!surface.has_frame_requests());
    run.commit_buffer(&surface, 10, 10).unwrap();
    assert!(surface.has_frame_requests());
    assert_eq!(
        surface.dirty().extents(),
        Rect::new_sized(0, 0, 10, 10).unwrap()
    );

    run.events();
    surface.flush_frame(123);
    assert_eq!(
        run.events(),
        vec![Event::CallbackDone {
            callback: cb.id,
            time: 123,
        }]
    );
    assert!(!run.client.has_obj(cb.id.into()));
    assert!(surface.dirty().is_empty());
    assert!(!surface.has_frame_requests());
}

#[test]
fn moving_damages_old_and_new_area() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    run.commit_buffer(&surface, 10, 10).unwrap();
    surface.flush_frame(0);
    surface.set_position(20.0, 0.0);
    assert_eq!(surface.bounding_box(), Rect::new_sized(20, 0, 10, 10).unwrap());
    assert_eq!(
        surface.dirty().extents(),
        Rect::new_sized(0, 0, 30, 10).unwrap()
    );
    assert_eq!(surface.to_local(25.0, 5.0), (5.0, 5.0));
}

#[test]
fn destroyed_role_object_keeps_role() {
    let run = TestRun::new();
    let window = run.toplevel().unwrap();
    window.toplevel.destroy().unwrap();
    assert_eq!(window.surface.role_kind(), SurfaceRole::Toplevel);
    assert!(matches!(window.surface.role(), Role::Toplevel(None)));

    // The surface is unmapped, so a new toplevel object may be created.
    let toplevel = window.xdg.get_toplevel().unwrap();
    assert!(matches!(window.surface.role(), Role::Toplevel(Some(_))));
    assert!(!run.client.is_killed());
    toplevel.destroy().unwrap();
}

#[test]
fn role_cannot_change() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    run.seat.set_cursor_surface(Some(&surface), 0, 0).unwrap();
    let err = surface.set_role(Role::Toplevel(None)).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Surface {} cannot be assigned the role xdg_toplevel because it already has the role cursor",
            surface.id
        )
    );
    assert!(run.wm_base.get_xdg_surface(&surface).is_err());
    assert_eq!(run.protocol_error(), Some((ObjectId::from(run.wm_base.id), 0)));
}

#[test]
fn denied_role_is_rejected() {
    let run = TestRun::new();
    run.policy.denied.borrow_mut().push(SurfaceRole::Cursor);
    let surface = run.surface().unwrap();
    let err = run.seat.set_cursor_surface(Some(&surface), 0, 0).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "The shell policy does not allow surface {} to become a cursor",
            surface.id
        )
    );
    assert_eq!(surface.role_kind(), SurfaceRole::None);
    assert!(run.seat.cursor().is_none());
}

#[test]
fn destroy_releases_buffer() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    let buffer = run.buffer(4, 4).unwrap();
    surface.attach(Some(&buffer), 0, 0);
    surface.commit().unwrap();
    run.events();
    surface.destroy().unwrap();
    assert!(surface.is_destroyed());
    assert!(!surface.is_mapped());
    assert_eq!(run.events(), vec![Event::BufferRelease { buffer: buffer.id }]);
}

#[derive(Default)]
struct Links {
    unlinked: RefCell<Vec<(WlSurfaceId, SurfaceLink)>>,
}

impl LinkOwner for Links {
    fn surface_unlinked(&self, surface: &WlSurface, link: SurfaceLink) {
        self.unlinked.borrow_mut().push((surface.id, link));
    }
}

#[test]
fn destroy_notifies_link_owners() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    let links = Rc::new(Links::default());
    let owner: Rc<dyn LinkOwner> = links.clone();
    surface.link(SurfaceLink::Output, &owner);
    surface.link(SurfaceLink::Input, &owner);
    surface.link(SurfaceLink::Plane, &owner);
    surface.unlink(SurfaceLink::Plane);
    assert!(surface.is_linked(SurfaceLink::Output));
    assert!(!surface.is_linked(SurfaceLink::Plane));
    assert!(!surface.is_linked(SurfaceLink::Layer));

    surface.destroy().unwrap();
    assert_eq!(
        *links.unlinked.borrow(),
        vec![
            (surface.id, SurfaceLink::Output),
            (surface.id, SurfaceLink::Input),
        ]
    );
    assert!(!surface.is_linked(SurfaceLink::Output));
}

#[test]
fn damage_order_does_not_matter() {
    let run = TestRun::new();
    let a = run.surface().unwrap();
    let b = run.surface().unwrap();
    let rects = [(0, 0, 5, 5), (3, 3, 5, 5), (20, 0, 1, 1)];
    for (x, y, w, h) in rects {
        a.damage(x, y, w, h);
    }
    for (x, y, w, h) in rects.iter().rev().copied() {
        b.damage(x, y, w, h);
    }
    b.damage(0, 0, -1, 4);
    let (da, db) = (a.pending().surface_damage, b.pending().surface_damage);
    assert_eq!(da.extents(), db.extents());
    assert_eq!(da.extents(), Rect::new_sized(0, 0, 21, 8).unwrap());
    for (x, y) in [(0, 0), (4, 4), (7, 7), (6, 1), (20, 0), (10, 0)] {
        assert_eq!(da.contains(x, y), db.contains(x, y));
    }
    assert!(!da.contains(6, 1));
}

#[test]
fn same_role_can_be_bound_again() {
    let run = TestRun::new();
    let surface = run.surface().unwrap();
    surface.set_role(Role::Cursor(None)).unwrap();
    run.commit_buffer(&surface, 4, 4).unwrap();
    surface.set_role(Role::Cursor(None)).unwrap();
    assert!(surface.set_role(Role::Subsurface(None)).is_err());
    assert_eq!(surface.role_kind(), SurfaceRole::Cursor);
}
