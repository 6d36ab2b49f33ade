//! Sample-rate conversion via rubato

use rubato::{FftFixedIn, Resampler};

use crate::{Error, Result};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Resample mono audio from one rate to another
///
/// The final partial chunk and the resampler's internal delay are both
/// flushed so no tail audio is dropped.
///
/// # Errors
///
/// Returns [`Error::Audio`] if the resampler cannot be constructed or fails
#[allow(clippy::cast_possible_truncation)]
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f64>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        SUB_CHUNKS,
        1,
    )
    .map_err(|e| Error::Audio(format!("resampler init failed: {e}")))?;

    let input: Vec<f64> = samples.iter().map(|&s| f64::from(s)).collect();

    let mut output = Vec::new();

    for chunk in input.chunks(CHUNK_SIZE) {
        let result = if chunk.len() == CHUNK_SIZE {
            resampler.process(&[chunk], None)
        } else {
            resampler.process_partial(Some(&[chunk]), None)
        }
        .map_err(|e| Error::Audio(format!("resample failed: {e}")))?;
        output.extend_from_slice(&result[0]);
    }

    // One empty call drains the internal delay, which still holds the tail
    let tail = resampler
        .process_partial::<&[f64]>(None, None)
        .map_err(|e| Error::Audio(format!("resample failed: {e}")))?;
    output.extend_from_slice(&tail[0]);

    Ok(output.iter().map(|&s| s as f32).collect())
}
