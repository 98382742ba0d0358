use super::Preview;
use image::{DynamicImage, ImageBuffer};

impl TryFrom<Preview> for DynamicImage {
    type Error = String;

    fn try_from(preview: Preview) -> Result<Self, Self::Error> {
        let Preview {
            dimensions: (width, height),
            buffer,
        } = preview;
        ImageBuffer::from_raw(width, height, buffer)
            .map(DynamicImage::ImageRgba8)
            .ok_or("Buffer does not match dimensions".to_string())
    }
}

impl Preview {
    pub fn into_image(self) -> Result<DynamicImage, String> {
        self.try_into()
    }
}
