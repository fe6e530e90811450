use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sp_core::{Image, ImageFormat, Tensor};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Image with random contents, padding bytes included.
pub fn random_image(
    rng: &mut StdRng,
    width: usize,
    height: usize,
    format: ImageFormat,
    row_align: usize,
) -> Image {
    let mut img = Image::new(width, height, format, row_align).expect("supported format");
    rng.fill(img.data_mut());
    img
}

pub fn random_tensor(
    rng: &mut StdRng,
    samples: usize,
    width: usize,
    height: usize,
    format: ImageFormat,
) -> Tensor {
    let mut tensor = Tensor::for_images(samples, width, height, format).expect("supported format");
    rng.fill(tensor.data_mut());
    tensor
}

/// Single-channel `u8` image whose pixels are all distinct.
pub fn ramp_u8(width: usize, height: usize) -> Image {
    assert!(width * height <= 256, "ramp must fit in u8");
    let mut img = Image::new(width, height, ImageFormat::U8, 1).expect("u8 image");
    let mut view = img.as_view_mut();
    for y in 0..height {
        for (x, v) in view.row_mut(y).iter_mut().enumerate() {
            *v = (y * width + x) as u8;
        }
    }
    img
}
