use crate::image::{ColorFormat, Image};
use std::ops::{Deref, DerefMut};

pub fn convert_color<A, B>(src: &Image<A>, dst: &mut Image<B>)
where
    A: Deref<Target = [u8]>,
    B: DerefMut<Target = [u8]>,
{
    assert_eq!(src.height, dst.height);
    assert_eq!(src.width, dst.width);

    src.validate();
    dst.validate();

    use ColorFormat::*;

    let swap_red_blue = match (src.color_format, dst.color_format) {
        (a, b) if a == b => false,
        (Rgba8888, Bgra8888) | (Bgra8888, Rgba8888) => true,
        (a, b) => unimplemented!("cannot convert {a:?} to {b:?}"),
    };

    for y in 0..src.height {
        let src_row = src.row(y);
        let dst_row = dst.row_mut(y);

        if !swap_red_blue {
            dst_row.copy_from_slice(src_row);
            continue;
        }

        for (s, d) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
            d[3] = s[3];
        }
    }
}

/// Scale the color channels of a 4-byte-per-pixel image by its alpha channel.
pub fn premultiply_alpha<T>(img: &mut Image<T>)
where
    T: DerefMut<Target = [u8]>,
{
    img.validate();

    for y in 0..img.height {
        for px in img.row_mut(y).chunks_exact_mut(4) {
            let a = px[3] as u32;
            if a == 0xFF {
                continue;
            }

            for c in &mut px[..3] {
                *c = ((*c as u32 * a + 127) / 255) as u8;
            }
        }
    }
}
