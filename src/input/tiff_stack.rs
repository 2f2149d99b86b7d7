use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult, Limits};

use crate::input::{Frame, InputError, Stack};

/// Decodes every page of a grayscale TIFF into a frame, in page order.
pub fn decode_tiff_stack(bytes: &[u8]) -> Result<Stack, InputError> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?.with_limits(Limits::unlimited());
    let mut frames = Vec::new();

    loop {
        let (width, height) = decoder.dimensions()?;
        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => {
                return Err(InputError::Decode(format!(
                    "page {} has unsupported colour type {:?}",
                    frames.len(),
                    other
                )));
            }
        }
        let pixels = decoding_result_to_f32(decoder.read_image()?, frames.len())?;
        frames.push(Frame::new(width as usize, height as usize, pixels)?);

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    Stack::new(frames)
}

fn decoding_result_to_f32(result: DecodingResult, page: usize) -> Result<Vec<f32>, InputError> {
    let pixels = match result {
        DecodingResult::U8(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f32::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => buf.into_iter().map(|v| v as f32).collect(),
        _ => {
            return Err(InputError::Decode(format!(
                "page {page} uses an unsupported sample format"
            )));
        }
    };
    Ok(pixels)
}
