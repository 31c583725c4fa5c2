//! Signal-capture instrument abstraction with delimited-text waveform
//! import.
//!
//! The instrument itself is hardware-free: channels and their waveforms come
//! from importing a timestamped sample file or from a saved configuration,
//! and the acquisition surface answers as a stopped instrument.

pub mod channel;
pub mod config;
pub mod error;
mod import;
pub mod instrument;
pub mod mock;
pub mod waveform;

pub use channel::{default_channel_color, Channel, ChannelType, Coupling};
pub use config::{ChannelNode, IdTable, ScopeConfig};
pub use error::CaptureError;
pub use instrument::{InstrumentKind, Oscilloscope, TriggerMode};
pub use mock::MockScope;
pub use waveform::{AnalogWaveform, FS_PER_SECOND};
