//! Externally controlled tint for crystallized cells.
//!
//! Each channel is an independent atomic byte. Writers (a network listener,
//! UI sliders) and the frame clock may live on different threads; a reader
//! can observe some channels updated and others stale.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// One of the three color channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Maps a normalized value to a channel byte.
///
/// Input is clamped to `[0, 1]` (NaN counts as `0`) and scaled by 255 with
/// round-half-away-from-zero, so `0.5` becomes `128`.
#[inline]
pub fn normalized_to_byte(value: f32) -> u8 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (v * 255.0).round() as u8
}

/// Shared RGB tint. Clones refer to the same channels.
#[derive(Clone, Debug)]
pub struct ColorState {
    channels: Arc<[AtomicU8; 3]>,
}

impl Default for ColorState {
    fn default() -> Self {
        Self::from_rgb([255, 255, 255])
    }
}

impl ColorState {
    /// Creates a tint with the given starting channel bytes.
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self {
            channels: Arc::new(rgb.map(AtomicU8::new)),
        }
    }

    /// Stores `value` (normalized, clamped) into `channel`.
    pub fn set_channel(&self, channel: Channel, value: f32) {
        self.channels[channel.index()].store(normalized_to_byte(value), Ordering::Relaxed);
    }

    /// Shorthand for `set_channel(Channel::Red, value)`.
    pub fn set_red(&self, value: f32) {
        self.set_channel(Channel::Red, value);
    }

    pub fn set_green(&self, value: f32) {
        self.set_channel(Channel::Green, value);
    }

    pub fn set_blue(&self, value: f32) {
        self.set_channel(Channel::Blue, value);
    }

    /// Latest byte stored in `channel`.
    pub fn channel(&self, channel: Channel) -> u8 {
        self.channels[channel.index()].load(Ordering::Relaxed)
    }

    /// Latest value of every channel, read independently.
    pub fn rgb(&self) -> [u8; 3] {
        Channel::ALL.map(|c| self.channel(c))
    }
}
