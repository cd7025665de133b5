//! Bundled platform value types: points, sizes, rectangles, ranges, and
//! affine/3D transforms.

use super::bytes::ByteReader;
use super::StructValue;

/// A 2D point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 2D extent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

/// A half-open index range `location..location + length`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub location: u64,
    pub length: u64,
}

/// A 2D affine transform `[a b 0; c d 0; tx ty 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

/// A 4x4 row-major 3D transform.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Transform3D {
    pub m: [[f64; 4]; 4],
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }
}

impl Range {
    pub const fn new(location: u64, length: u64) -> Self {
        Range { location, length }
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };
}

impl Transform3D {
    pub const IDENTITY: Transform3D = Transform3D {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        let mut t = Self::IDENTITY;
        t.m[3][0] = tx;
        t.m[3][1] = ty;
        t.m[3][2] = tz;
        t
    }
}

fn put(out: &mut Vec<u8>, values: &[f64]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

impl StructValue for Point {
    const NAME: &'static str = "Point";
    const SIZE: usize = 16;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        put(out, &[self.x, self.y]);
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let mut r = ByteReader::new(bytes);
        let point = Point::new(r.f64()?, r.f64()?);
        r.is_empty().then_some(point)
    }
}

impl StructValue for Size {
    const NAME: &'static str = "Size";
    const SIZE: usize = 16;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        put(out, &[self.width, self.height]);
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let mut r = ByteReader::new(bytes);
        let size = Size::new(r.f64()?, r.f64()?);
        r.is_empty().then_some(size)
    }
}

impl StructValue for Rect {
    const NAME: &'static str = "Rect";
    const SIZE: usize = 32;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.origin.write_bytes(out);
        self.size.write_bytes(out);
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        let (origin, size) = bytes.split_at(Point::SIZE);
        Some(Rect {
            origin: Point::read_bytes(origin)?,
            size: Size::read_bytes(size)?,
        })
    }
}

impl StructValue for Range {
    const NAME: &'static str = "Range";
    const SIZE: usize = 16;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.location.to_le_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let mut r = ByteReader::new(bytes);
        let range = Range::new(r.u64()?, r.u64()?);
        r.is_empty().then_some(range)
    }
}

impl StructValue for AffineTransform {
    const NAME: &'static str = "AffineTransform";
    const SIZE: usize = 48;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        put(out, &[self.a, self.b, self.c, self.d, self.tx, self.ty]);
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let mut r = ByteReader::new(bytes);
        let t = AffineTransform {
            a: r.f64()?,
            b: r.f64()?,
            c: r.f64()?,
            d: r.f64()?,
            tx: r.f64()?,
            ty: r.f64()?,
        };
        r.is_empty().then_some(t)
    }
}

impl StructValue for Transform3D {
    const NAME: &'static str = "Transform3D";
    const SIZE: usize = 128;

    fn write_bytes(&self, out: &mut Vec<u8>) {
        for row in &self.m {
            put(out, row);
        }
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let mut r = ByteReader::new(bytes);
        let mut m = [[0.0; 4]; 4];
        for row in &mut m {
            for cell in row.iter_mut() {
                *cell = r.f64()?;
            }
        }
        r.is_empty().then_some(Transform3D { m })
    }
}
