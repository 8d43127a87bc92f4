use serde::{Deserialize, Serialize};

/// Requested audio output format, e.g. `mp3_44100_128`.
///
/// The bit-rate suffix is what the timing model uses to turn byte lengths
/// into seconds, so the format string sent to the service and the byte rate
/// used for timing always come from the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFormat {
    pub codec: String,
    pub sample_rate: u32,
    pub bitrate_kbps: u32,
}

impl OutputFormat {
    /// Parse `codec_samplerate_kbps`
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split('_');
        let codec = parts.next()?.to_lowercase();
        let sample_rate = parts.next()?.parse().ok()?;
        let bitrate_kbps: u32 = parts.next()?.parse().ok()?;
        if codec.is_empty() || parts.next().is_some() || bitrate_kbps == 0 {
            return None;
        }
        Some(Self {
            codec,
            sample_rate,
            bitrate_kbps,
        })
    }

    /// Encoded bytes per second of audio (bit-rate / 8)
    pub fn bytes_per_second(&self) -> f64 {
        self.bitrate_kbps as f64 * 1000.0 / 8.0
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            codec: "mp3".to_string(),
            sample_rate: 44100,
            bitrate_kbps: 128,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.codec, self.sample_rate, self.bitrate_kbps)
    }
}
