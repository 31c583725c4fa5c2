use crate::channel::{Channel, Coupling};

/// Trigger state reported by [`Oscilloscope::poll_trigger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerMode {
    Run,
    Stop,
    Triggered,
    Wait,
    Auto,
}

/// Broad instrument class a driver exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstrumentKind {
    Oscilloscope,
    Multimeter,
    PowerSupply,
    FunctionGenerator,
}

/// Control surface shared by capture instruments.
///
/// A file-fed instrument implements most of this as fixed answers: it never
/// triggers and acquires nothing beyond what an import put in place. Channel
/// accessors take a channel index; out-of-range indices are absorbed, with
/// getters returning the type's default and setters doing nothing.
pub trait Oscilloscope {
    fn name(&self) -> &str;
    fn vendor(&self) -> &str;
    fn serial(&self) -> &str;
    fn driver_name(&self) -> &'static str;
    fn transport_name(&self) -> &'static str;
    fn transport_connection_string(&self) -> String;
    /// Identification answer from the transport, empty when there is none.
    fn id_ping(&self) -> String;
    fn instrument_types(&self) -> InstrumentKind;

    fn is_channel_enabled(&self, index: usize) -> bool;
    fn enable_channel(&mut self, index: usize);
    fn disable_channel(&mut self, index: usize);
    fn channel_coupling(&self, index: usize) -> Coupling;
    fn set_channel_coupling(&mut self, index: usize, coupling: Coupling);
    fn channel_attenuation(&self, index: usize) -> f64;
    fn set_channel_attenuation(&mut self, index: usize, attenuation: f64);
    fn channel_bandwidth_limit(&self, index: usize) -> u32;
    fn set_channel_bandwidth_limit(&mut self, index: usize, limit_mhz: u32);
    fn channel_voltage_range(&self, index: usize) -> f64;
    fn set_channel_voltage_range(&mut self, index: usize, range: f64);
    fn channel_offset(&self, index: usize) -> f64;
    fn set_channel_offset(&mut self, index: usize, offset: f64);
    fn external_trigger(&self) -> Option<&Channel>;

    fn poll_trigger(&self) -> TriggerMode;
    /// Pulls freshly acquired data from the hardware; reports whether any
    /// arrived.
    fn acquire_data(&mut self) -> bool;
    fn start(&mut self);
    fn start_single_trigger(&mut self);
    fn stop(&mut self);
    fn arm_trigger(&mut self);
    fn is_trigger_armed(&self) -> bool;
    /// Pushes the in-memory trigger configuration to the hardware.
    fn push_trigger(&mut self);
    /// Pulls the trigger configuration back from the hardware.
    fn pull_trigger(&mut self);
    fn trigger_offset(&self) -> i64;
    fn set_trigger_offset(&mut self, offset: i64);

    fn sample_rates_non_interleaved(&self) -> Vec<u64>;
    fn sample_rates_interleaved(&self) -> Vec<u64>;
    /// Channel index pairs that cannot be captured simultaneously when
    /// interleaving.
    fn interleave_conflicts(&self) -> Vec<(usize, usize)>;
    fn sample_depths_non_interleaved(&self) -> Vec<u64>;
    fn sample_depths_interleaved(&self) -> Vec<u64>;
    fn sample_rate(&self) -> u64;
    fn sample_depth(&self) -> u64;
    fn set_sample_depth(&mut self, depth: u64);
    fn set_sample_rate(&mut self, rate: u64);
    fn is_interleaving(&self) -> bool;
    /// Requests channel interleaving; reports the setting actually in
    /// effect.
    fn set_interleaving(&mut self, combine: bool) -> bool;
}
