use crate::{RenderError, compressed_stream};
use image::RgbaImage;
use lopdf::Stream;

/// Builds a `DeviceRGB` image XObject, compositing alpha over white.
pub(crate) fn image_xobject(image: &RgbaImage) -> Result<Stream, RenderError> {
    let mut rgb = Vec::with_capacity(image.width() as usize * image.height() as usize * 3);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[over_white(r, a), over_white(g, a), over_white(b, a)]);
    }

    let mut stream = compressed_stream(&rgb)?;
    stream.dict.set("Type", "XObject");
    stream.dict.set("Subtype", "Image");
    stream.dict.set("Width", image.width() as i64);
    stream.dict.set("Height", image.height() as i64);
    stream.dict.set("ColorSpace", "DeviceRGB");
    stream.dict.set("BitsPerComponent", 8);
    Ok(stream)
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn alpha_is_composited_over_white() {
        assert_eq!(over_white(0, 255), 0);
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(200, 255), 200);
        assert_eq!(over_white(0, 128), 127);
    }

    #[test]
    fn stream_describes_the_bitmap() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        let stream = image_xobject(&image).unwrap();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
        assert_eq!(
            stream.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );

        assert_eq!(
            stream.decompressed_content().unwrap(),
            vec![10, 20, 30, 255, 255, 255]
        );
    }
}
