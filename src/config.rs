//! Saved-configuration loading.
//!
//! A configuration document describes the channel layout of a previously
//! saved instrument. Loading one rebuilds the channel objects and records
//! which saved id maps to which live channel, so references elsewhere in
//! the document can be resolved against the instrument.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use crate::channel::{default_channel_color, Channel, ChannelType, Coupling};
use crate::error::CaptureError;
use crate::instrument::Oscilloscope;
use crate::mock::MockScope;

/// Maps saved object ids to live channel indices.
pub type IdTable = HashMap<u64, usize>;

/// Channel entry in a saved configuration document.
#[derive(Clone, Debug, Deserialize)]
pub struct ChannelNode {
    pub id: u64,
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub color: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub coupling: Option<String>,
    #[serde(default)]
    pub attenuation: Option<f64>,
    #[serde(default)]
    pub bandwidth_mhz: Option<u32>,
    #[serde(default)]
    pub voltage_range: Option<f64>,
    #[serde(default)]
    pub offset: Option<f64>,
}

/// Saved instrument configuration document.
#[derive(Clone, Debug, Deserialize)]
pub struct ScopeConfig {
    pub channels: Vec<ChannelNode>,
}

impl ScopeConfig {
    /// Decodes a configuration document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, CaptureError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl MockScope {
    /// Rebuilds the channel layout from a saved configuration.
    ///
    /// Channel slots grow to cover the highest configured index; slots the
    /// document never mentions keep placeholder channels. Unrecognized type
    /// and coupling tags fall back to their catch-all values, and each
    /// node's saved id is recorded in `ids`.
    pub fn load_configuration(&mut self, config: &ScopeConfig, ids: &mut IdTable) {
        for node in &config.channels {
            debug!("restoring channel {} at index {}", node.name, node.index);

            // Allocate channel space if we didn't have it yet.
            while self.channel_count() <= node.index {
                let index = self.channel_count();
                let mut chan = Channel::new(
                    index,
                    format!("CH{}", index + 1),
                    ChannelType::Analog,
                    default_channel_color(index),
                    1.0,
                );
                chan.set_default_display_name();
                self.add_channel(chan);
            }

            let mut chan = Channel::new(
                node.index,
                node.name.clone(),
                ChannelType::from_tag(&node.channel_type),
                node.color.clone(),
                1.0,
            );
            chan.set_default_display_name();
            if let Some(slot) = self.channel_mut(node.index) {
                *slot = chan;
            }

            if let Some(enabled) = node.enabled {
                if enabled {
                    self.enable_channel(node.index);
                } else {
                    self.disable_channel(node.index);
                }
            }
            if let Some(tag) = &node.coupling {
                self.set_channel_coupling(node.index, Coupling::from_tag(tag));
            }
            if let Some(attenuation) = node.attenuation {
                self.set_channel_attenuation(node.index, attenuation);
            }
            if let Some(limit) = node.bandwidth_mhz {
                self.set_channel_bandwidth_limit(node.index, limit);
            }
            if let Some(range) = node.voltage_range {
                self.set_channel_voltage_range(node.index, range);
            }
            if let Some(offset) = node.offset {
                self.set_channel_offset(node.index, offset);
            }

            ids.insert(node.id, node.index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuilds_channels_from_a_document() {
        let doc = r##"{"channels":[
            {"id":11,"index":0,"name":"VCC","type":"analog","color":"#ff0000",
             "enabled":true,"coupling":"ac_1m","voltage_range":2.5,"offset":-1.25},
            {"id":12,"index":1,"name":"SCL","type":"digital","color":"#00ff00"}
        ]}"##;
        let config = ScopeConfig::from_json(doc).unwrap();

        let mut scope = MockScope::new("restored", "none", "");
        let mut ids = IdTable::new();
        scope.load_configuration(&config, &mut ids);

        assert_eq!(scope.channel_count(), 2);
        let vcc = scope.channel(0).unwrap();
        assert_eq!(vcc.name(), "VCC");
        assert_eq!(vcc.channel_type(), ChannelType::Analog);
        assert_eq!(vcc.color(), "#ff0000");
        assert!(scope.is_channel_enabled(0));
        assert_eq!(scope.channel_coupling(0), Coupling::Ac1M);
        assert_eq!(scope.channel_voltage_range(0), 2.5);
        assert_eq!(scope.channel_offset(0), -1.25);
        assert_eq!(scope.channel(1).unwrap().channel_type(), ChannelType::Digital);
        assert_eq!(ids[&11], 0);
        assert_eq!(ids[&12], 1);
    }

    #[test]
    fn sparse_indices_get_placeholder_channels() {
        let doc = r##"{"channels":[
            {"id":7,"index":2,"name":"D2","type":"digital","color":"#0000ff"}
        ]}"##;
        let config = ScopeConfig::from_json(doc).unwrap();

        let mut scope = MockScope::new("restored", "none", "");
        let mut ids = IdTable::new();
        scope.load_configuration(&config, &mut ids);

        assert_eq!(scope.channel_count(), 3);
        assert_eq!(scope.channel(0).unwrap().name(), "CH1");
        assert_eq!(scope.channel(1).unwrap().name(), "CH2");
        assert_eq!(scope.channel(2).unwrap().name(), "D2");
        assert_eq!(ids[&7], 2);
    }

    #[test]
    fn unknown_type_tags_load_as_complex() {
        let doc = r##"{"channels":[
            {"id":1,"index":0,"name":"EYE","type":"eye","color":"#123456"}
        ]}"##;
        let config = ScopeConfig::from_json(doc).unwrap();

        let mut scope = MockScope::new("restored", "none", "");
        scope.load_configuration(&config, &mut IdTable::new());
        assert_eq!(scope.channel(0).unwrap().channel_type(), ChannelType::Complex);
    }

    #[test]
    fn malformed_documents_surface_config_errors() {
        assert!(matches!(
            ScopeConfig::from_json("{\"channels\":"),
            Err(CaptureError::Config(_))
        ));
    }
}
