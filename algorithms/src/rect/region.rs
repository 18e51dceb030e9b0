//! Banded region arithmetic.
//!
//! Every function returns rectangles in canonical form: sorted into
//! horizontal bands from top to bottom, each band sorted from left to right,
//! no two rectangles of a band touching, and vertically adjacent bands with
//! identical spans merged. Two containers describe the same area if and only
//! if they are equal.

use {
    crate::rect::{Container, RectRaw},
    smallvec::SmallVec,
};

type Spans = SmallVec<[(i32, i32); 8]>;

pub fn union(left: &[RectRaw], right: &[RectRaw]) -> Container {
    op(left, right, |l, r| l || r)
}

pub fn subtract(left: &[RectRaw], right: &[RectRaw]) -> Container {
    op(left, right, |l, r| l && !r)
}

pub fn intersect(left: &[RectRaw], right: &[RectRaw]) -> Container {
    op(left, right, |l, r| l && r)
}

/// Converts an arbitrary, possibly overlapping, list of rectangles into
/// canonical form.
pub fn rects_to_bands(rects: &[RectRaw]) -> Container {
    op(rects, &[], |l, _| l)
}

pub fn extents(rects: &[RectRaw]) -> RectRaw {
    let mut iter = rects.iter().filter(|r| !r.is_empty());
    let Some(first) = iter.next() else {
        return RectRaw::default();
    };
    let mut res = *first;
    for r in iter {
        res.x1 = res.x1.min(r.x1);
        res.y1 = res.y1.min(r.y1);
        res.x2 = res.x2.max(r.x2);
        res.y2 = res.y2.max(r.y2);
    }
    res
}

fn op(left: &[RectRaw], right: &[RectRaw], f: impl Fn(bool, bool) -> bool) -> Container {
    let mut ys: SmallVec<[i32; 16]> = left
        .iter()
        .chain(right.iter())
        .filter(|r| !r.is_empty())
        .flat_map(|r| [r.y1, r.y2])
        .collect();
    ys.sort_unstable();
    ys.dedup();
    let mut res = Container::new();
    let mut prev: Option<(usize, i32)> = None;
    for w in ys.windows(2) {
        let (y1, y2) = (w[0], w[1]);
        let l = spans(left, y1, y2);
        let r = spans(right, y1, y2);
        let segments = combine(&l, &r, &f);
        if segments.is_empty() {
            prev = None;
            continue;
        }
        if let Some((start, prev_y2)) = prev {
            let band = &res[start..];
            let same = prev_y2 == y1
                && band.len() == segments.len()
                && band
                    .iter()
                    .zip(segments.iter())
                    .all(|(a, &(x1, x2))| a.x1 == x1 && a.x2 == x2);
            if same {
                for rect in &mut res[start..] {
                    rect.y2 = y2;
                }
                prev = Some((start, y2));
                continue;
            }
        }
        let start = res.len();
        res.extend(
            segments
                .iter()
                .map(|&(x1, x2)| RectRaw { x1, y1, x2, y2 }),
        );
        prev = Some((start, y2));
    }
    res
}

/// The merged x spans covered by `rects` over the whole of `y1..y2`.
fn spans(rects: &[RectRaw], y1: i32, y2: i32) -> Spans {
    let mut spans: Spans = rects
        .iter()
        .filter(|r| !r.is_empty() && r.y1 <= y1 && r.y2 >= y2)
        .map(|r| (r.x1, r.x2))
        .collect();
    spans.sort_unstable();
    let mut res = Spans::new();
    for (x1, x2) in spans {
        if let Some(last) = res.last_mut() {
            if x1 <= last.1 {
                last.1 = last.1.max(x2);
                continue;
            }
        }
        res.push((x1, x2));
    }
    res
}

fn covers(spans: &Spans, x: i32) -> bool {
    spans.iter().any(|&(x1, x2)| x1 <= x && x < x2)
}

fn combine(left: &Spans, right: &Spans, f: &impl Fn(bool, bool) -> bool) -> Spans {
    let mut xs: SmallVec<[i32; 16]> = left
        .iter()
        .chain(right.iter())
        .flat_map(|&(x1, x2)| [x1, x2])
        .collect();
    xs.sort_unstable();
    xs.dedup();
    let mut res = Spans::new();
    for w in xs.windows(2) {
        let (x1, x2) = (w[0], w[1]);
        if !f(covers(left, x1), covers(right, x1)) {
            continue;
        }
        match res.last_mut() {
            Some(last) if last.1 == x1 => last.1 = x2,
            _ => res.push((x1, x2)),
        }
    }
    res
}
