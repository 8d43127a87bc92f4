use crate::domain::playback::PlaybackError;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// What a probe learns about an encoded stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub duration: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Probe an in-memory stream for its duration.
///
/// Every packet is walked so streams without a frame count in their header
/// (headerless MP3) still report an exact duration, and the first packet is
/// decoded so corrupt audio fails here instead of during playback.
pub fn probe(bytes: &[u8]) -> Result<StreamInfo, PlaybackError> {
    if bytes.is_empty() {
        return Err(PlaybackError::Decode("empty audio buffer".to_string()));
    }

    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::Decode(format!("unrecognized format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| PlaybackError::Decode("no supported audio track".to_string()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let sample_rate = params
        .sample_rate
        .ok_or_else(|| PlaybackError::Decode("unknown sample rate".to_string()))?;
    let channels = params.channels.map(|c| c.count() as u16).unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| PlaybackError::Decode(format!("unsupported codec: {}", e)))?;

    let mut frames: u64 = 0;
    let mut validated = false;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(PlaybackError::Decode(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }
        if !validated {
            decoder
                .decode(&packet)
                .map_err(|e| PlaybackError::Decode(e.to_string()))?;
            validated = true;
        }
        frames += packet.dur;
    }

    if !validated {
        return Err(PlaybackError::Decode("stream contains no audio packets".to_string()));
    }

    // Prefer the container's frame count when it has one
    let frames = params.n_frames.unwrap_or(frames);
    let duration = match params.time_base {
        Some(time_base) => {
            let time = time_base.calc_time(frames);
            time.seconds as f64 + time.frac
        }
        None => frames as f64 / sample_rate as f64,
    };

    tracing::debug!(
        duration_secs = duration,
        sample_rate,
        channels,
        size_bytes = bytes.len(),
        "Probed audio stream"
    );

    Ok(StreamInfo {
        duration,
        sample_rate,
        channels,
    })
}

/// Mono 16-bit PCM WAV of `seconds` of silence
#[cfg(test)]
pub(crate) fn silent_wav(sample_rate: u32, seconds: f64) -> Vec<u8> {
    let samples = (sample_rate as f64 * seconds).round() as u32;
    let data_len = samples * 2;
    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVEfmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.resize(44 + data_len as usize, 0);
    wav
}
