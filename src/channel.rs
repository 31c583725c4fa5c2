use crate::waveform::AnalogWaveform;

/// Kind tag for a channel. Imported data is always analog; the other tags
/// exist for channels rebuilt from a saved configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelType {
    Analog,
    Digital,
    Trigger,
    /// Catch-all for type tags this driver does not model.
    Complex,
}

impl ChannelType {
    /// Maps a saved type tag; anything unrecognized counts as complex.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "analog" => ChannelType::Analog,
            "digital" => ChannelType::Digital,
            "trigger" => ChannelType::Trigger,
            _ => ChannelType::Complex,
        }
    }
}

/// Input coupling of a channel's front end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Coupling {
    #[default]
    Dc1M,
    Ac1M,
    Dc50,
    Ground,
}

impl Coupling {
    /// Maps a saved coupling tag; anything unrecognized counts as DC 1M.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ac_1m" => Coupling::Ac1M,
            "dc_50" => Coupling::Dc50,
            "gnd" => Coupling::Ground,
            _ => Coupling::Dc1M,
        }
    }
}

const DEFAULT_CHANNEL_COLORS: [&str; 4] = ["#ffff00", "#ff6abc", "#00ffff", "#00c100"];

/// Deterministic display color for a channel, cycling a fixed palette by
/// column index.
pub fn default_channel_color(index: usize) -> &'static str {
    DEFAULT_CHANNEL_COLORS[index % DEFAULT_CHANNEL_COLORS.len()]
}

/// A named, colored, independently calibrated signal source exposed by the
/// instrument.
///
/// The display settings (enable flag, coupling, attenuation, bandwidth
/// limit, voltage range, offset) live on the channel itself; the instrument
/// reaches them through its index-based accessor surface. Captured data is
/// held per segment, with segment 0 carrying the active waveform.
#[derive(Clone, Debug)]
pub struct Channel {
    index: usize,
    name: String,
    display_name: Option<String>,
    channel_type: ChannelType,
    color: String,
    unit_scale: f64,
    enabled: bool,
    coupling: Coupling,
    attenuation: f64,
    bandwidth_limit_mhz: u32,
    voltage_range: f64,
    offset: f64,
    segments: Vec<Option<AnalogWaveform>>,
}

impl Channel {
    pub fn new(
        index: usize,
        name: impl Into<String>,
        channel_type: ChannelType,
        color: impl Into<String>,
        unit_scale: f64,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            display_name: None,
            channel_type,
            color: color.into(),
            unit_scale,
            enabled: false,
            coupling: Coupling::default(),
            attenuation: 0.0,
            bandwidth_limit_mhz: 0,
            voltage_range: 0.0,
            offset: 0.0,
            segments: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Hardware name of the channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name, falling back to the hardware name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Assigns the default display name if none has been chosen yet.
    pub fn set_default_display_name(&mut self) {
        if self.display_name.is_none() {
            self.display_name = Some(self.name.clone());
        }
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = Some(name.into());
    }

    pub fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn coupling(&self) -> Coupling {
        self.coupling
    }

    pub fn set_coupling(&mut self, coupling: Coupling) {
        self.coupling = coupling;
    }

    pub fn attenuation(&self) -> f64 {
        self.attenuation
    }

    pub fn set_attenuation(&mut self, attenuation: f64) {
        self.attenuation = attenuation;
    }

    pub fn bandwidth_limit_mhz(&self) -> u32 {
        self.bandwidth_limit_mhz
    }

    pub fn set_bandwidth_limit_mhz(&mut self, limit_mhz: u32) {
        self.bandwidth_limit_mhz = limit_mhz;
    }

    /// Display voltage range, used only for rendering.
    pub fn voltage_range(&self) -> f64 {
        self.voltage_range
    }

    pub fn set_voltage_range(&mut self, range: f64) {
        self.voltage_range = range;
    }

    /// Display offset, used only for rendering.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Binds `waveform` as this channel's captured data at `segment`,
    /// dropping whatever was bound there before.
    pub fn set_data(&mut self, waveform: AnalogWaveform, segment: usize) {
        if self.segments.len() <= segment {
            self.segments.resize_with(segment + 1, || None);
        }
        self.segments[segment] = Some(waveform);
    }

    pub fn data(&self, segment: usize) -> Option<&AnalogWaveform> {
        self.segments.get(segment).and_then(Option::as_ref)
    }

    pub fn data_mut(&mut self, segment: usize) -> Option<&mut AnalogWaveform> {
        self.segments.get_mut(segment).and_then(Option::as_mut)
    }
}
