use crate::error::ValidationError;

/// PNG stores width and height as 31-bit unsigned integers.
pub const PNG_MAX_DIMENSION: usize = 0x7FFF_FFFF;

pub const CHANNELS: usize = 3;

/// Returns the dimensions as PNG header values, or an error if the image
/// cannot be addressed by the format or held in memory as RGB.
pub fn check_png_limits(width: usize, height: usize) -> Result<(u32, u32), ValidationError> {
    let too_large = || ValidationError::ImageTooLarge { width, height };

    if width > PNG_MAX_DIMENSION || height > PNG_MAX_DIMENSION {
        return Err(too_large());
    }
    width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or_else(too_large)?;

    Ok((width as u32, height as u32))
}

/// Interleaves three equally sized band buffers into RGB triples.
pub fn interleave(channels: &[Vec<u8>; CHANNELS]) -> Vec<u8> {
    let [red, green, blue] = channels;
    let mut pixels = Vec::with_capacity(red.len() * CHANNELS);
    for ((&r, &g), &b) in red.iter().zip(green).zip(blue) {
        pixels.extend_from_slice(&[r, g, b]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleave() {
        let channels = [vec![1, 2, 3], vec![10, 20, 30], vec![100, 200, 255]];
        assert_eq!(
            interleave(&channels),
            vec![1, 10, 100, 2, 20, 200, 3, 30, 255]
        );
    }

    #[test]
    fn test_png_limits() {
        assert_eq!(check_png_limits(512, 256).unwrap(), (512, 256));
        assert_eq!(
            check_png_limits(PNG_MAX_DIMENSION, 1).unwrap(),
            (0x7FFF_FFFF, 1)
        );

        assert_eq!(
            check_png_limits(PNG_MAX_DIMENSION + 1, 1),
            Err(ValidationError::ImageTooLarge {
                width: PNG_MAX_DIMENSION + 1,
                height: 1
            })
        );
        assert!(check_png_limits(1, PNG_MAX_DIMENSION + 1).is_err());
    }
}
