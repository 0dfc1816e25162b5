// Copyright @yucwang 2026

use crate::core::error::CameraError;
use crate::core::records::AuxiliaryRecord;

/// Depth of the in-flight pass ring and the fixed latency, in passes, between
/// generating a block and getting its radiance back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub depth: usize,
    pub latency: usize,
}

impl PipelineConfig {
    pub fn new(depth: usize, latency: usize) -> Result<Self, CameraError> {
        let config = Self { depth, latency };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if self.depth == 0 {
            return Err(CameraError::InvalidConfig(String::from("pipeline depth must be at least 1")));
        }
        if self.latency >= self.depth {
            return Err(CameraError::InvalidConfig(format!(
                "pipeline latency {} must be smaller than pipeline depth {}",
                self.latency, self.depth
            )));
        }
        Ok(())
    }
}

/// Ring of auxiliary-record buffers. Generation for pass `p` writes slot
/// `p mod depth`; accumulation for pass `p` reads slot `(p - latency) mod depth`.
#[derive(Debug, Clone)]
pub struct ContributionPipeline {
    config: PipelineConfig,
    slots: Vec<Vec<AuxiliaryRecord>>,
}

impl ContributionPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, CameraError> {
        config.validate()?;
        Ok(Self { config, slots: vec![Vec::new(); config.depth] })
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn put_slot(&self, pass_id: u32) -> usize {
        pass_id as usize % self.config.depth
    }

    pub fn take_slot(&self, pass_id: u32) -> usize {
        (pass_id as usize % self.config.depth + self.config.depth - self.config.latency) % self.config.depth
    }

    /// The slot generation for `pass_id` writes into, sized to `block_size`.
    pub fn slot_for_generation(&mut self, pass_id: u32, block_size: usize) -> &mut [AuxiliaryRecord] {
        let slot = self.put_slot(pass_id);
        let records = &mut self.slots[slot];
        records.resize(block_size, AuxiliaryRecord::default());
        records
    }

    /// The records written by the pass whose radiance returns under `pass_id`.
    pub fn slot_for_accumulation(&self, pass_id: u32) -> &[AuxiliaryRecord] {
        &self.slots[self.take_slot(pass_id)]
    }
}
