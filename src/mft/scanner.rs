use std::io::{Read, Seek};

use tracing::{debug, info};

use super::boot::MftLocation;
use super::record::{MftRecord, FILE_SIGNATURE, MFT_RECORD_SIZE};
use crate::error::{Result, SlackError};
use crate::image::ImageSource;

/// Где искать сигнатуру `FILE` в записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMatch {
    /// В любом месте записи (поведение исходной утилиты, возможны ложные срабатывания)
    #[default]
    Anywhere,
    /// Только в первых 4 байтах записи
    Header,
}

pub struct MftScanner {
    target: String,
    target_utf16: Vec<u8>,
    mode: SignatureMatch,
}

impl MftScanner {
    pub fn new(target: &str, mode: SignatureMatch) -> Self {
        Self {
            target: target.to_string(),
            target_utf16: encode_utf16le(target),
            mode,
        }
    }

    pub fn is_candidate(&self, record: &[u8]) -> bool {
        match self.mode {
            SignatureMatch::Anywhere => contains(record, FILE_SIGNATURE),
            SignatureMatch::Header => record.starts_with(FILE_SIGNATURE),
        }
    }

    pub fn is_match(&self, record: &[u8]) -> bool {
        self.is_candidate(record) && contains(record, &self.target_utf16)
    }

    /// Последовательно читает записи от начала $MFT до первой совпавшей.
    /// Скан ограничен длиной образа; неполная запись в конце образа не читается.
    pub fn scan<R: Read + Seek>(&self, image: &mut ImageSource<R>, location: &MftLocation) -> Result<MftRecord> {
        let start = location.byte_offset();
        let record_len = MFT_RECORD_SIZE as u64;

        if image.remaining_from(start) < record_len {
            return Err(SlackError::ImageTooShort {
                stage: "сканирование MFT",
                offset: start,
                needed: record_len,
                image_len: image.len(),
            });
        }

        let total_records = image.remaining_from(start) / record_len;
        info!(offset = start, total_records, target = %self.target, "сканирование MFT");

        let mut raw = [0u8; MFT_RECORD_SIZE];
        for record_number in 0..total_records {
            let byte_offset = start + record_number * record_len;
            image.read_at("сканирование MFT", byte_offset, &mut raw)?;

            if self.is_match(&raw) {
                let record = MftRecord { raw, byte_offset, record_number };
                match record.header() {
                    Some(h) => info!(
                        record_number,
                        offset = byte_offset,
                        sequence = h.sequence_number,
                        in_use = h.is_in_use(),
                        directory = h.is_directory(),
                        "запись найдена"
                    ),
                    None => info!(record_number, offset = byte_offset, "запись найдена (без заголовка FILE)"),
                }
                return Ok(record);
            }
            debug!(record_number, "запись не совпала");
        }

        Err(SlackError::TargetFileNotFound {
            name: self.target.clone(),
            records_scanned: total_records,
        })
    }
}

pub fn encode_utf16le(name: &str) -> Vec<u8> {
    name.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}
