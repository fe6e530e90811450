use sp_core::{BorderType, DataType, ImageView, PlanarAccess, StridedView};

/// Densely packed copy of one interleaved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixels {
    pub width: usize,
    pub height: usize,
    pub pixel_bytes: usize,
    pub data: Vec<u8>,
}

impl Pixels {
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.pixel_bytes;
        &self.data[start..start + self.pixel_bytes]
    }

    pub fn from_image(view: &ImageView<'_>) -> Self {
        let mut data = Vec::new();
        for y in 0..view.height() {
            data.extend_from_slice(view.row(y));
        }
        Self {
            width: view.width(),
            height: view.height(),
            pixel_bytes: view.format().plane_pixel_bytes(),
            data,
        }
    }

    pub fn from_tensor(view: &StridedView<'_>, sample: usize) -> Self {
        let access = PlanarAccess::new(view.desc()).expect("image layout");
        let elem = view.dtype().size_bytes();
        let mut data = Vec::new();
        for y in 0..access.num_rows() {
            for x in 0..access.num_cols() {
                for k in 0..access.num_channels() {
                    let offset = access.offset(sample, y, x, k);
                    data.extend_from_slice(&view.data()[offset..offset + elem]);
                }
            }
        }
        Self {
            width: access.num_cols(),
            height: access.num_rows(),
            pixel_bytes: access.num_channels() * elem,
            data,
        }
    }
}

/// Out-of-range index resolution written as iterated mirroring.
pub fn resolve(i: isize, len: usize, border: BorderType) -> Option<usize> {
    let n = len as isize;
    if (0..n).contains(&i) {
        return Some(i as usize);
    }
    let mut i = i;
    match border {
        BorderType::Constant => return None,
        BorderType::Replicate => i = i.clamp(0, n - 1),
        BorderType::Wrap => i = ((i % n) + n) % n,
        BorderType::Reflect => {
            while i < 0 || i >= n {
                i = if i < 0 { -i - 1 } else { 2 * n - i - 1 };
            }
        }
        BorderType::Reflect101 => {
            if n == 1 {
                return Some(0);
            }
            while i < 0 || i >= n {
                i = if i < 0 { -i } else { 2 * n - i - 2 };
            }
        }
    }
    Some(i as usize)
}

pub fn pad(
    src: &Pixels,
    width: usize,
    height: usize,
    (top, left): (usize, usize),
    border: BorderType,
    fill: &[u8],
) -> Pixels {
    assert_eq!(fill.len(), src.pixel_bytes);
    let mut data = Vec::with_capacity(width * height * src.pixel_bytes);
    for di in 0..height {
        for dj in 0..width {
            let sy = resolve(di as isize - top as isize, src.height, border);
            let sx = resolve(dj as isize - left as isize, src.width, border);
            match (sx, sy) {
                (Some(x), Some(y)) => data.extend_from_slice(src.pixel(x, y)),
                _ => data.extend_from_slice(fill),
            }
        }
    }
    Pixels {
        width,
        height,
        pixel_bytes: src.pixel_bytes,
        data,
    }
}

/// Fill pixel bytes for the element types exercised by the tests.
pub fn fill_pixel(dtype: DataType, channels: usize, fill: [f32; 4]) -> Vec<u8> {
    let mut out = Vec::new();
    for k in 0..channels {
        let v = if k < 4 { fill[k] } else { 0.0 };
        match dtype {
            DataType::U8 => out.push(v as u8),
            DataType::U16 => out.extend_from_slice(&(v as u16).to_ne_bytes()),
            DataType::S16 => out.extend_from_slice(&(v as i16).to_ne_bytes()),
            DataType::S32 => out.extend_from_slice(&(v as i32).to_ne_bytes()),
            DataType::F32 => out.extend_from_slice(&v.to_ne_bytes()),
            other => panic!("no reference fill for {other}"),
        }
    }
    out
}
