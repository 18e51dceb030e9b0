use crate::{
    ifs::xdg_positioner::{
        BOTTOM_RIGHT, CA, CA_FLIP_X, CA_SLIDE_Y, E_BOTTOM, E_LEFT, E_RIGHT, E_TOP, Edge, LEFT,
        Positioned, TOP_LEFT,
    },
    it::testrun::TestRun,
    object::ObjectId,
    rect::Rect,
};

fn positioned(anchor: Edge, gravity: Edge) -> Positioned {
    Positioned {
        size_width: 40,
        size_height: 30,
        ar: Rect::new_sized(10, 10, 20, 20),
        anchor,
        gravity,
        ..Default::default()
    }
}

#[test]
fn centered_by_default() {
    let p = positioned(Edge::none(), Edge::none());
    assert_eq!(p.get_position(), Rect::new_sized(0, 5, 40, 30).unwrap());
}

#[test]
fn anchor_and_gravity_pick_the_corner() {
    let p = positioned(E_BOTTOM | E_RIGHT, E_BOTTOM | E_RIGHT);
    assert_eq!(p.get_position(), Rect::new_sized(30, 30, 40, 30).unwrap());

    let p = positioned(E_TOP | E_LEFT, E_TOP | E_LEFT);
    assert_eq!(p.get_position(), Rect::new_sized(-30, -20, 40, 30).unwrap());

    let p = positioned(E_LEFT, E_RIGHT);
    assert_eq!(p.get_position(), Rect::new_sized(10, 5, 40, 30).unwrap());
}

#[test]
fn offset_is_added() {
    let mut p = positioned(E_BOTTOM | E_RIGHT, E_BOTTOM | E_RIGHT);
    p.off_x = 2;
    p.off_y = -3;
    assert_eq!(p.get_position(), Rect::new_sized(32, 27, 40, 30).unwrap());
}

#[test]
fn constraint_adjustment_does_not_move_the_popup() {
    let mut p = positioned(E_BOTTOM | E_RIGHT, E_BOTTOM | E_RIGHT);
    let plain = p.get_position();
    p.ca = CA_FLIP_X | CA_SLIDE_Y;
    assert_eq!(p.get_position(), plain);
}

#[test]
fn requests_update_the_snapshot() {
    let run = TestRun::new();
    let pos = run.wm_base.create_positioner().unwrap();
    assert!(!pos.value().is_complete());
    pos.set_size(40, 30).unwrap();
    assert!(!pos.value().is_complete());
    pos.set_anchor_rect(10, 10, 20, 20).unwrap();
    assert!(pos.value().is_complete());

    pos.set_anchor(BOTTOM_RIGHT).unwrap();
    pos.set_gravity(TOP_LEFT).unwrap();
    pos.set_constraint_adjustment(CA::all().raw()).unwrap();
    pos.set_offset(1, 2);
    pos.set_reactive();
    pos.set_parent_size(100, 0).unwrap();
    pos.set_parent_configure(9);

    let value = pos.value();
    assert_eq!(value.anchor, E_BOTTOM | E_RIGHT);
    assert_eq!(value.gravity, E_TOP | E_LEFT);
    assert_eq!(value.ca, CA::all());
    assert_eq!((value.off_x, value.off_y), (1, 2));
    assert!(value.reactive);
    assert_eq!((value.parent_width, value.parent_height), (100, 0));
    assert_eq!(value.parent_serial, 9);

    // Later changes do not affect earlier snapshots.
    pos.set_anchor(LEFT).unwrap();
    assert_eq!(value.anchor, E_BOTTOM | E_RIGHT);
    assert_eq!(pos.value().anchor, E_LEFT);
}

fn assert_invalid_input(f: impl FnOnce(&crate::ifs::xdg_positioner::XdgPositioner) -> bool) {
    let run = TestRun::new();
    let pos = run.wm_base.create_positioner().unwrap();
    assert!(f(&pos));
    assert_eq!(run.protocol_error(), Some((ObjectId::from(pos.id), 0)));
    assert!(run.client.is_killed());
}

#[test]
fn invalid_input_is_a_protocol_error() {
    assert_invalid_input(|p| p.set_size(0, 10).is_err());
    assert_invalid_input(|p| p.set_size(10, -1).is_err());
    assert_invalid_input(|p| p.set_anchor_rect(0, 0, 0, 10).is_err());
    assert_invalid_input(|p| p.set_anchor_rect(0, 0, 10, -5).is_err());
    assert_invalid_input(|p| p.set_anchor(9).is_err());
    assert_invalid_input(|p| p.set_gravity(100).is_err());
    assert_invalid_input(|p| p.set_constraint_adjustment(64).is_err());
    assert_invalid_input(|p| p.set_parent_size(-1, 10).is_err());
}

#[test]
fn zero_parent_size_is_allowed() {
    let run = TestRun::new();
    let pos = run.wm_base.create_positioner().unwrap();
    pos.set_parent_size(0, 0).unwrap();
    assert!(run.protocol_error().is_none());
}

#[test]
fn setter_order_does_not_matter() {
    let run = TestRun::new();
    let a = run.wm_base.create_positioner().unwrap();
    a.set_anchor_rect(0, 0, 100, 50).unwrap();
    a.set_anchor(TOP_LEFT).unwrap();
    a.set_gravity(BOTTOM_RIGHT).unwrap();
    a.set_offset(10, 5);
    a.set_size(30, 30).unwrap();

    let b = run.wm_base.create_positioner().unwrap();
    b.set_size(30, 30).unwrap();
    b.set_offset(10, 5);
    b.set_gravity(BOTTOM_RIGHT).unwrap();
    b.set_anchor(TOP_LEFT).unwrap();
    b.set_anchor_rect(0, 0, 100, 50).unwrap();

    assert_eq!(a.value(), b.value());
    assert_eq!(a.value().get_position().position(), (10, 5));
}

#[test]
fn extreme_offsets_saturate() {
    let mut p = positioned(E_BOTTOM | E_RIGHT, Edge::none());
    p.off_x = i32::MAX;
    assert_eq!(p.get_position().x1(), i32::MAX - 20);
    p.off_x = i32::MIN;
    p.off_y = i32::MIN;
    p.gravity = E_TOP | E_LEFT;
    assert_eq!(p.get_position().position(), (i32::MIN, i32::MIN));

    let run = TestRun::new();
    let window = run.map_toplevel(100, 50).unwrap();
    let pos = run.positioner(40, 30, (0, 0, 100, 50)).unwrap();
    pos.set_anchor(BOTTOM_RIGHT).unwrap();
    pos.set_offset(i32::MAX, 0);
    let popup = run.map_popup(&window.xdg, &pos).unwrap();
    assert_eq!(popup.popup.relative_position().x1(), i32::MAX - 20);
    assert!(!run.client.is_killed());
}
