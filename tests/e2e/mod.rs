// End-to-end tests for the tapecast pipeline
//
// The speech and mastering services are wiremock servers, track records go
// to a temporary directory, and audio is "decoded" by a byte-rate engine that
// keeps time on the tokio clock, so playback tests can run on a paused clock.

mod helpers;
mod test_pipeline;
mod test_playback;
mod test_reload;
