use serde::{Deserialize, Serialize};

/// Итог одного прогона: все значения по стадиям плюс размер и хеш slack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackReport {
    pub image: String,
    pub search_file: String,
    pub outfile: String,

    pub partition_start_lba: u32,
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub hidden_sectors: u32,
    pub mft_lcn: u64,
    pub mft_start_lba: u64,

    pub mft_record_number: u64,
    pub mft_record_offset: u64,
    pub record_file_name: String,

    pub run_count: usize,
    pub run_length_clusters: u64,
    pub start_lcn: u64,

    pub file_start_offset: u64,
    pub logical_size: u64,
    pub allocated_size: u64,

    pub slack_size: u64,
    pub slack_size_kib: u64,
    pub sha256: String,
}
