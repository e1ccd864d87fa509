use std::io::{Read, Seek};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::Result;
use crate::image::ImageSource;
use crate::mft::attributes::DataAttribute;
use crate::mft::boot::VolumeBootRecord;
use crate::mft::runs::DataRunEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFileLocation {
    pub start_byte_offset: u64,
    pub logical_size: u64,
    pub allocated_size: u64,
}

impl ResolvedFileLocation {
    /// start = LCN * sectors_per_cluster * bytes_per_sector + hidden_sectors * bytes_per_sector
    pub fn resolve(boot: &VolumeBootRecord, first_run: &DataRunEntry, attr: &DataAttribute) -> Self {
        let bps = boot.bytes_per_sector as u64;
        let start_byte_offset = first_run
            .cluster_offset
            .saturating_mul(boot.sectors_per_cluster as u64)
            .saturating_mul(bps)
            .saturating_add((boot.hidden_sectors as u64).saturating_mul(bps));

        Self {
            start_byte_offset,
            logical_size: attr.logical_size,
            allocated_size: attr.allocated_size,
        }
    }

    pub fn slack_offset(&self) -> u64 {
        self.start_byte_offset.saturating_add(self.logical_size)
    }

    pub fn slack_len(&self) -> u64 {
        self.allocated_size.saturating_sub(self.logical_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackData {
    pub bytes: Vec<u8>,
    pub sha256: String,
}

impl SlackData {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Размер в КиБ целочисленным делением, как в исходной утилите.
    pub fn size_kib(&self) -> u64 {
        self.len() / 1024
    }
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

pub fn read_slack<R: Read + Seek>(image: &mut ImageSource<R>, location: &ResolvedFileLocation) -> Result<SlackData> {
    let bytes = image.read_vec_at("чтение slack", location.slack_offset(), location.slack_len())?;
    let sha256 = sha256_hex(&bytes);
    info!(
        offset = location.slack_offset(),
        len = bytes.len(),
        sha256 = %sha256,
        "slack прочитан"
    );
    Ok(SlackData { bytes, sha256 })
}
