use super::error::AssemblyError;
use super::pause::PauseModel;
use super::timing::{estimated_duration, SegmentTiming};
use crate::domain::script::NormalizedLine;
use crate::domain::tts::AudioChunk;
use rand::RngCore;

/// Concatenated audio plus the inferred per-line timings
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledTrack {
    pub audio: Vec<u8>,
    pub timings: Vec<SegmentTiming>,
    pub chunk_byte_lengths: Vec<usize>,
    pub estimated_duration: f64,
}

/// Joins per-line chunks into one stream and infers where each line sits in it.
///
/// A chunk's spoken duration is `byte_length / bytes_per_second`, which holds
/// for constant-bitrate output. The pauses are not audible silence in the
/// concatenated stream; they only push later lines' windows forward, and the
/// resulting drift is corrected by rescaling once the real duration is known.
#[derive(Debug, Clone, Copy)]
pub struct AudioAssembler {
    bytes_per_second: f64,
    pause_model: PauseModel,
}

impl AudioAssembler {
    pub fn new(bytes_per_second: f64, pause_model: PauseModel) -> Result<Self, AssemblyError> {
        if !(bytes_per_second.is_finite() && bytes_per_second > 0.0) {
            return Err(AssemblyError::InvalidByteRate(bytes_per_second));
        }
        Ok(Self {
            bytes_per_second,
            pause_model,
        })
    }

    pub fn bytes_per_second(&self) -> f64 {
        self.bytes_per_second
    }

    pub fn assemble(
        &self,
        chunks: Vec<AudioChunk>,
        lines: &[NormalizedLine],
        rng: &mut dyn RngCore,
    ) -> Result<AssembledTrack, AssemblyError> {
        if chunks.len() != lines.len() {
            return Err(AssemblyError::LengthMismatch {
                chunks: chunks.len(),
                lines: lines.len(),
            });
        }
        if let Some(index) = chunks
            .iter()
            .zip(lines)
            .position(|(chunk, line)| chunk.speaker != line.speaker)
        {
            return Err(AssemblyError::SpeakerMismatch { index });
        }

        let chunk_byte_lengths: Vec<usize> = chunks.iter().map(|c| c.byte_length).collect();
        let timings = self.compute_timings(&chunk_byte_lengths, lines, rng)?;

        let total: usize = chunk_byte_lengths.iter().sum();
        let mut audio = Vec::with_capacity(total);
        for chunk in chunks {
            audio.extend_from_slice(&chunk.bytes);
        }

        let estimated_duration = estimated_duration(&timings);
        tracing::info!(
            line_count = lines.len(),
            audio_size_bytes = audio.len(),
            estimated_duration_secs = estimated_duration,
            "Assembled dialogue track"
        );

        Ok(AssembledTrack {
            audio,
            timings,
            chunk_byte_lengths,
            estimated_duration,
        })
    }

    /// Timings from per-line byte lengths alone, so a stored track can be
    /// re-timed without its chunks
    pub fn compute_timings(
        &self,
        byte_lengths: &[usize],
        lines: &[NormalizedLine],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<SegmentTiming>, AssemblyError> {
        if byte_lengths.len() != lines.len() {
            return Err(AssemblyError::LengthMismatch {
                chunks: byte_lengths.len(),
                lines: lines.len(),
            });
        }

        let mut timings = Vec::with_capacity(lines.len());
        let mut cursor = 0.0;

        for (index, (line, &bytes)) in lines.iter().zip(byte_lengths).enumerate() {
            let spoken = bytes as f64 / self.bytes_per_second;
            let start = cursor;
            let end = start + spoken;
            timings.push(SegmentTiming {
                index,
                start,
                end,
                speaker: line.speaker,
            });

            cursor = end;
            if index + 1 < lines.len() {
                cursor += self.pause_model.pause_after(index, lines, rng);
            }
        }

        Ok(timings)
    }
}

/// Split `total_bytes` across lines in proportion to their cleaned text
/// length. Used when a stored track predates per-line byte lengths.
pub fn estimate_byte_lengths(total_bytes: usize, lines: &[NormalizedLine]) -> Vec<usize> {
    let weights: Vec<usize> = lines.iter().map(|l| l.cleaned_text.chars().count()).collect();
    let total_weight: usize = weights.iter().sum();

    if total_weight == 0 {
        return vec![0; lines.len()];
    }

    let mut lengths: Vec<usize> = weights
        .iter()
        .map(|&w| ((total_bytes as u128 * w as u128) / total_weight as u128) as usize)
        .collect();

    // Integer division leaves a remainder; the last voiced line absorbs it
    let assigned: usize = lengths.iter().sum();
    if let Some(last) = weights.iter().rposition(|&w| w > 0) {
        lengths[last] += total_bytes - assigned;
    }

    lengths
}
