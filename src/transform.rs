#[cfg(test)]
mod tests;

use {
    crate::rect::{Rect, Region},
    std::rc::Rc,
};

/// The eight buffer transforms of `wl_output.transform`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Transform {
    #[default]
    None,
    Rotate90,
    Rotate180,
    Rotate270,
    Flip,
    FlipRotate90,
    FlipRotate180,
    FlipRotate270,
}

impl Transform {
    pub fn from_wl(wl: i32) -> Option<Self> {
        let t = match wl {
            0 => Self::None,
            1 => Self::Rotate90,
            2 => Self::Rotate180,
            3 => Self::Rotate270,
            4 => Self::Flip,
            5 => Self::FlipRotate90,
            6 => Self::FlipRotate180,
            7 => Self::FlipRotate270,
            _ => return None,
        };
        Some(t)
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Rotate90 | Self::Rotate270 | Self::FlipRotate90 | Self::FlipRotate270
        )
    }

    pub fn maybe_swap<T>(self, (a, b): (T, T)) -> (T, T) {
        match self.swaps_dimensions() {
            true => (b, a),
            false => (a, b),
        }
    }

    /// Maps points of the transformed `width` x `height` area onto the
    /// untransformed buffer.
    pub fn to_buffer(self, width: f32, height: f32) -> Mat3 {
        let (w, h) = (width, height);
        let rows = match self {
            Self::None => [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            Self::Rotate90 => [[0.0, 1.0, 0.0], [-1.0, 0.0, w]],
            Self::Rotate180 => [[-1.0, 0.0, w], [0.0, -1.0, h]],
            Self::Rotate270 => [[0.0, -1.0, h], [1.0, 0.0, 0.0]],
            Self::Flip => [[-1.0, 0.0, w], [0.0, 1.0, 0.0]],
            Self::FlipRotate90 => [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            Self::FlipRotate180 => [[1.0, 0.0, 0.0], [0.0, -1.0, h]],
            Self::FlipRotate270 => [[0.0, -1.0, h], [-1.0, 0.0, w]],
        };
        Mat3([rows[0], rows[1], [0.0, 0.0, 1.0]])
    }
}

/// A 2D affine transform in homogeneous coordinates, row major.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mat3(pub [[f32; 3]; 3]);

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat3 {
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    pub fn translate(x: f32, y: f32) -> Self {
        Self([[1.0, 0.0, x], [0.0, 1.0, y], [0.0, 0.0, 1.0]])
    }

    pub fn scale(x: f32, y: f32) -> Self {
        Self([[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Returns the transform that applies `first` and then `self`.
    pub fn compose(&self, first: &Mat3) -> Mat3 {
        let a = &self.0;
        let b = &first.0;
        let mut res = [[0.0; 3]; 3];
        for (i, row) in res.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Mat3(res)
    }

    fn determinant(&self) -> f32 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns `None` if the transform is singular.
    pub fn invert(&self) -> Option<Mat3> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let m = &self.0;
        let inv = 1.0 / det;
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            m[r0][c0] * m[r1][c1] - m[r0][c1] * m[r1][c0]
        };
        Some(Mat3([
            [
                cof(1, 2, 1, 2) * inv,
                -cof(0, 2, 1, 2) * inv,
                cof(0, 1, 1, 2) * inv,
            ],
            [
                -cof(1, 2, 0, 2) * inv,
                cof(0, 2, 0, 2) * inv,
                -cof(0, 1, 0, 2) * inv,
            ],
            [
                cof(1, 2, 0, 1) * inv,
                -cof(0, 2, 0, 1) * inv,
                cof(0, 1, 0, 1) * inv,
            ],
        ]))
    }

    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.0;
        let w = m[2][0] * x + m[2][1] * y + m[2][2];
        let w = if w == 0.0 { 1.0 } else { w };
        (
            (m[0][0] * x + m[0][1] * y + m[0][2]) / w,
            (m[1][0] * x + m[1][1] * y + m[1][2]) / w,
        )
    }

    /// The smallest integer rectangle containing the transformed rectangle.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        if rect.is_empty() {
            let (x, y) = self.transform_point(rect.x1() as f32, rect.y1() as f32);
            return Rect::new_empty(x.round() as i32, y.round() as i32);
        }
        let corners = [
            (rect.x1(), rect.y1()),
            (rect.x2(), rect.y1()),
            (rect.x1(), rect.y2()),
            (rect.x2(), rect.y2()),
        ];
        let (mut x1, mut y1) = (f32::MAX, f32::MAX);
        let (mut x2, mut y2) = (f32::MIN, f32::MIN);
        for (x, y) in corners {
            let (x, y) = self.transform_point(x as f32, y as f32);
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);
        }
        Rect::new(
            x1.floor() as i32,
            y1.floor() as i32,
            x2.ceil() as i32,
            y2.ceil() as i32,
        )
        .unwrap_or_default()
    }

    pub fn transform_region(&self, region: &Region) -> Rc<Region> {
        let rects: Vec<_> = region.rects().map(|r| self.transform_rect(r)).collect();
        Region::from_rects(&rects)
    }
}
