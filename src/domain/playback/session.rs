use crate::infrastructure::audio::SourceNode;

/// The one active source node and the clock reference it was started at.
///
/// Replaced wholesale on every play; dropping it stops the source.
pub struct PlaybackSession {
    source: Box<dyn SourceNode>,
    offset: f64,
    started_at: f64,
    speed: f64,
}

impl PlaybackSession {
    pub fn new(source: Box<dyn SourceNode>, offset: f64, started_at: f64, speed: f32) -> Self {
        Self {
            source,
            offset,
            started_at,
            speed: speed as f64,
        }
    }

    /// `offset + (now - started_at) * speed`, clamped to `[0, duration]`
    pub fn position(&self, now: f64, duration: f64) -> f64 {
        let position = self.offset + (now - self.started_at) * self.speed;
        position.clamp(0.0, duration.max(0.0))
    }

    /// Change speed without jumping: the position reached so far becomes the
    /// new offset
    pub fn set_speed(&mut self, speed: f32, now: f64, duration: f64) {
        self.offset = self.position(now, duration);
        self.started_at = now;
        self.speed = speed as f64;
        self.source.set_playback_rate(speed);
    }

    pub fn set_gain(&mut self, gain: f32) {
        self.source.set_gain(gain);
    }

    pub fn level(&self) -> f32 {
        self.source.level()
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.source.stop();
    }
}
