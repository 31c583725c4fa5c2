use crate::channel::{Channel, Coupling};
use crate::instrument::{InstrumentKind, Oscilloscope, TriggerMode};

/// Hardware-free capture instrument.
///
/// Channels and waveforms come from a waveform import
/// ([`MockScope::load_csv`]) or a saved configuration
/// ([`MockScope::load_configuration`]); the trigger and acquisition surface
/// answers as a stopped instrument that never triggers. The scope owns its
/// channel list exclusively, and each channel owns whatever waveform is
/// bound to it.
pub struct MockScope {
    name: String,
    vendor: String,
    serial: String,
    channels: Vec<Channel>,
    external_trigger: Option<Channel>,
}

impl MockScope {
    pub fn new(
        name: impl Into<String>,
        vendor: impl Into<String>,
        serial: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            vendor: vendor.into(),
            serial: serial.into(),
            channels: Vec::new(),
            external_trigger: None,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn add_channel(&mut self, channel: Channel) {
        self.channels.push(channel);
    }

    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut Channel> {
        self.channels.get_mut(index)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
}

impl Oscilloscope for MockScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn vendor(&self) -> &str {
        &self.vendor
    }

    fn serial(&self) -> &str {
        &self.serial
    }

    fn driver_name(&self) -> &'static str {
        "mock"
    }

    fn transport_name(&self) -> &'static str {
        "null"
    }

    fn transport_connection_string(&self) -> String {
        String::new()
    }

    fn id_ping(&self) -> String {
        String::new()
    }

    fn instrument_types(&self) -> InstrumentKind {
        InstrumentKind::Oscilloscope
    }

    fn is_channel_enabled(&self, index: usize) -> bool {
        self.channels.get(index).is_some_and(Channel::enabled)
    }

    fn enable_channel(&mut self, index: usize) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_enabled(true);
        }
    }

    fn disable_channel(&mut self, index: usize) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_enabled(false);
        }
    }

    fn channel_coupling(&self, index: usize) -> Coupling {
        self.channels
            .get(index)
            .map(Channel::coupling)
            .unwrap_or_default()
    }

    fn set_channel_coupling(&mut self, index: usize, coupling: Coupling) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_coupling(coupling);
        }
    }

    fn channel_attenuation(&self, index: usize) -> f64 {
        self.channels
            .get(index)
            .map(Channel::attenuation)
            .unwrap_or_default()
    }

    fn set_channel_attenuation(&mut self, index: usize, attenuation: f64) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_attenuation(attenuation);
        }
    }

    fn channel_bandwidth_limit(&self, index: usize) -> u32 {
        self.channels
            .get(index)
            .map(Channel::bandwidth_limit_mhz)
            .unwrap_or_default()
    }

    fn set_channel_bandwidth_limit(&mut self, index: usize, limit_mhz: u32) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_bandwidth_limit_mhz(limit_mhz);
        }
    }

    fn channel_voltage_range(&self, index: usize) -> f64 {
        self.channels
            .get(index)
            .map(Channel::voltage_range)
            .unwrap_or_default()
    }

    fn set_channel_voltage_range(&mut self, index: usize, range: f64) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_voltage_range(range);
        }
    }

    fn channel_offset(&self, index: usize) -> f64 {
        self.channels
            .get(index)
            .map(Channel::offset)
            .unwrap_or_default()
    }

    fn set_channel_offset(&mut self, index: usize, offset: f64) {
        if let Some(chan) = self.channels.get_mut(index) {
            chan.set_offset(offset);
        }
    }

    fn external_trigger(&self) -> Option<&Channel> {
        self.external_trigger.as_ref()
    }

    fn poll_trigger(&self) -> TriggerMode {
        // We never trigger.
        TriggerMode::Stop
    }

    fn acquire_data(&mut self) -> bool {
        // No new data possible.
        false
    }

    fn start(&mut self) {}

    fn start_single_trigger(&mut self) {}

    fn stop(&mut self) {}

    fn arm_trigger(&mut self) {}

    fn is_trigger_armed(&self) -> bool {
        false
    }

    fn push_trigger(&mut self) {}

    fn pull_trigger(&mut self) {}

    fn trigger_offset(&self) -> i64 {
        0
    }

    fn set_trigger_offset(&mut self, _offset: i64) {}

    fn sample_rates_non_interleaved(&self) -> Vec<u64> {
        Vec::new()
    }

    fn sample_rates_interleaved(&self) -> Vec<u64> {
        Vec::new()
    }

    fn interleave_conflicts(&self) -> Vec<(usize, usize)> {
        Vec::new()
    }

    fn sample_depths_non_interleaved(&self) -> Vec<u64> {
        Vec::new()
    }

    fn sample_depths_interleaved(&self) -> Vec<u64> {
        Vec::new()
    }

    fn sample_rate(&self) -> u64 {
        1
    }

    fn sample_depth(&self) -> u64 {
        1
    }

    fn set_sample_depth(&mut self, _depth: u64) {}

    fn set_sample_rate(&mut self, _rate: u64) {}

    fn is_interleaving(&self) -> bool {
        false
    }

    fn set_interleaving(&mut self, _combine: bool) -> bool {
        false
    }
}
