use brickfall_engine::Cue;

/// Receiver of the sound cues raised by the game.
///
/// The runtime calls [`notify`](Self::notify) for every cue, passing the mute
/// flag of the snapshot the action was applied to. Implementations decide
/// whether to play anything.
pub trait SoundSink: Send + 'static {
    fn notify(&self, cue: Cue, muted: bool);
}

/// Sink that ignores every cue.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn notify(&self, _cue: Cue, _muted: bool) {}
}
