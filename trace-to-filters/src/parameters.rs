//! Channel DSP settings and where they come from.
//!
//! The filter computation needs eight named per-channel settings. They are
//! fetched through the [`ParameterStore`] trait so the engine works the same
//! whether the values come from live modules or from an in-memory table
//! loaded offline.

use std::collections::HashMap;

use digiscope_common::{CHANNELS_PER_MODULE, ChannelId, ModuleId};
use strum::{Display, EnumString};
use thiserror::Error;

/// The channel settings the filter computation reads, spelled the way the
/// hardware API names them.
#[derive(Clone, Copy, Debug, Display, EnumString, Hash, PartialEq, Eq)]
pub enum ChannelParam {
    /// Sampling period of captured traces, in microseconds.
    #[strum(to_string = "XDT")]
    Xdt,
    /// Fast filter rise time, in microseconds.
    #[strum(to_string = "TRIGGER_RISETIME")]
    TriggerRisetime,
    /// Fast filter gap, in microseconds.
    #[strum(to_string = "TRIGGER_FLATTOP")]
    TriggerFlattop,
    /// CFD attenuation scale, dimensionless (conventionally 0 to 7).
    #[strum(to_string = "CFDScale")]
    CfdScale,
    /// CFD delay, in microseconds.
    #[strum(to_string = "CFDDelay")]
    CfdDelay,
    /// Slow filter rise time, in microseconds.
    #[strum(to_string = "ENERGY_RISETIME")]
    EnergyRisetime,
    /// Slow filter gap, in microseconds.
    #[strum(to_string = "ENERGY_FLATTOP")]
    EnergyFlattop,
    /// Preamplifier decay constant, in microseconds.
    #[strum(to_string = "TAU")]
    Tau,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("module {0} is not present in the store")]
    UnknownModule(ModuleId),
    #[error("channel {channel} is not valid on module {module}")]
    UnknownChannel { module: ModuleId, channel: ChannelId },
    #[error("no value for parameter {param} on module {module} channel {channel}")]
    MissingParameter {
        module: ModuleId,
        channel: ChannelId,
        param: ChannelParam,
    },
}

/// Point lookups of channel DSP settings.
///
/// Values are returned in the units the hardware API uses: microseconds for
/// durations, raw numbers for dimensionless settings and registers.
pub trait ParameterStore {
    fn get_chan_par(
        &self,
        module: ModuleId,
        channel: ChannelId,
        param: ChannelParam,
    ) -> Result<f64, StoreError>;
}

/// A plain in-memory parameter table.
///
/// Stands in for live modules when working offline; tests and simulated
/// setups populate it with [`set_chan_par`](Self::set_chan_par).
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    values: HashMap<(ModuleId, ChannelId), HashMap<ChannelParam, f64>>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_chan_par(
        &mut self,
        module: ModuleId,
        channel: ChannelId,
        param: ChannelParam,
        value: f64,
    ) -> Result<(), StoreError> {
        if usize::from(channel) >= CHANNELS_PER_MODULE {
            return Err(StoreError::UnknownChannel { module, channel });
        }
        self.values
            .entry((module, channel))
            .or_default()
            .insert(param, value);
        Ok(())
    }
}

impl ParameterStore for MemoryParameterStore {
    fn get_chan_par(
        &self,
        module: ModuleId,
        channel: ChannelId,
        param: ChannelParam,
    ) -> Result<f64, StoreError> {
        if usize::from(channel) >= CHANNELS_PER_MODULE {
            return Err(StoreError::UnknownChannel { module, channel });
        }
        let channel_values = self.values.get(&(module, channel)).ok_or_else(|| {
            if self.values.keys().any(|(m, _)| *m == module) {
                StoreError::UnknownChannel { module, channel }
            } else {
                StoreError::UnknownModule(module)
            }
        })?;
        channel_values
            .get(&param)
            .copied()
            .ok_or(StoreError::MissingParameter {
                module,
                channel,
                param,
            })
    }
}

/// The raw physical values of all eight settings for one channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParameters {
    pub xdt: f64,
    pub trigger_risetime: f64,
    pub trigger_flattop: f64,
    pub cfd_scale: f64,
    pub cfd_delay: f64,
    pub energy_risetime: f64,
    pub energy_flattop: f64,
    pub tau: f64,
}

impl FilterParameters {
    /// Fetches every setting the filters depend on. Any store miss aborts
    /// the fetch; there are no defaults.
    pub fn from_store<S: ParameterStore>(
        store: &S,
        module: ModuleId,
        channel: ChannelId,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            xdt: store.get_chan_par(module, channel, ChannelParam::Xdt)?,
            trigger_risetime: store.get_chan_par(module, channel, ChannelParam::TriggerRisetime)?,
            trigger_flattop: store.get_chan_par(module, channel, ChannelParam::TriggerFlattop)?,
            cfd_scale: store.get_chan_par(module, channel, ChannelParam::CfdScale)?,
            cfd_delay: store.get_chan_par(module, channel, ChannelParam::CfdDelay)?,
            energy_risetime: store.get_chan_par(module, channel, ChannelParam::EnergyRisetime)?,
            energy_flattop: store.get_chan_par(module, channel, ChannelParam::EnergyFlattop)?,
            tau: store.get_chan_par(module, channel, ChannelParam::Tau)?,
        })
    }
}
