use crate::{
    rect::{Rect, Region},
    transform::{Mat3, Transform},
};

fn close(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
}

#[test]
fn compose_applies_first_then_self() {
    let scale = Mat3::scale(2.0, 3.0);
    let translate = Mat3::translate(1.0, 1.0);
    let m = scale.compose(&translate);
    assert!(close(m.transform_point(1.0, 1.0), (4.0, 6.0)));
    let m = translate.compose(&scale);
    assert!(close(m.transform_point(1.0, 1.0), (3.0, 4.0)));
}

#[test]
fn invert_round_trips() {
    let m = Transform::Rotate90
        .to_buffer(20.0, 10.0)
        .compose(&Mat3::scale(2.0, 2.0))
        .compose(&Mat3::translate(3.0, -4.0));
    let inv = m.invert().unwrap();
    for p in [(0.0, 0.0), (7.5, 2.0), (-3.0, 11.0)] {
        let q = m.transform_point(p.0, p.1);
        assert!(close(inv.transform_point(q.0, q.1), p));
    }
    assert!(close(
        m.compose(&inv).transform_point(5.0, 6.0),
        (5.0, 6.0)
    ));
}

#[test]
fn singular_has_no_inverse() {
    assert!(Mat3::scale(0.0, 1.0).invert().is_none());
}

#[test]
fn every_transform_maps_onto_the_buffer() {
    for wl in 0..8 {
        let t = Transform::from_wl(wl).unwrap();
        let (w, h) = t.maybe_swap((40, 30));
        let m = t.to_buffer(w as f32, h as f32);
        let r = m.transform_rect(Rect::new_sized(0, 0, w, h).unwrap());
        assert_eq!(r, Rect::new_sized(0, 0, 40, 30).unwrap(), "{:?}", t);
    }
    assert!(Transform::from_wl(8).is_none());
}

#[test]
fn rect_bounds_round_outward() {
    let m = Mat3::scale(0.5, 0.5);
    let r = m.transform_rect(Rect::new_sized(1, 1, 3, 3).unwrap());
    assert_eq!(r, Rect::new(0, 0, 2, 2).unwrap());
}

#[test]
fn region_translation() {
    let region = Region::from_rects(&[
        Rect::new_sized(0, 0, 5, 5).unwrap(),
        Rect::new_sized(10, 0, 5, 5).unwrap(),
    ]);
    let moved = Mat3::translate(100.0, 50.0).transform_region(&region);
    assert_eq!(moved, region.move_(100, 50));
}
