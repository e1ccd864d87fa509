use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use encoding_rs::UTF_16LE;

use super::record::{MftRecord, MFT_RECORD_SIZE};
use super::runs::{decode_runs, DataRunList};
use crate::error::{Result, SlackError};

// Типичная запись: $FILE_NAME начинается с 0x98, резидентный заголовок 0x18 байт,
// длина имени лежит на +0x40 внутри значения: 0x98 + 0x18 + 0x40 = 240.
pub const FILE_NAME_LENGTH_OFFSET: usize = 240;
/// Байт пространства имен (namespace) сразу после длины имени.
pub const FILE_NAME_TYPE_TAG_LEN: usize = 1;
/// Само имя в UTF-16LE.
pub const FILE_NAME_OFFSET: usize = FILE_NAME_LENGTH_OFFSET + 1 + FILE_NAME_TYPE_TAG_LEN;
/// Младший байт кода типа атрибута $DATA.
pub const DATA_ATTRIBUTE_MARKER: u8 = 0x80;
/// От байта после маркера до allocated_size (+0x28 от начала атрибута).
pub const ALLOCATED_SIZE_SKIP: u64 = 0x28 - 1;
/// initialized_size между real_size и списком runs.
pub const INITIALIZED_SIZE_LEN: u64 = 8;

/// Разобранный нерезидентный $DATA искомого файла.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataAttribute {
    pub allocated_size: u64,
    pub logical_size: u64,
    pub runs: DataRunList,
    /// Имя из $FILE_NAME записи, для отчета
    pub file_name: String,
}

pub fn parse_data_attribute(record: &MftRecord) -> Result<DataAttribute> {
    parse_record_bytes(&record.raw, record.byte_offset)
}

/// Разбор по фиксированной раскладке записи. `record_offset` только для ошибок.
pub fn parse_record_bytes(raw: &[u8], record_offset: u64) -> Result<DataAttribute> {
    let malformed = |detail: String| SlackError::MalformedDataAttribute { record_offset, detail };
    let raw = &raw[..raw.len().min(MFT_RECORD_SIZE)];

    let name_len = *raw
        .get(FILE_NAME_LENGTH_OFFSET)
        .ok_or_else(|| malformed("запись короче поля длины имени".to_string()))? as usize;
    let file_name = decode_file_name(raw, name_len);

    // Пропуск L + 1 байт, как в исходной утилите (учитывается байт типа имени)
    let search_from = FILE_NAME_LENGTH_OFFSET + 1 + name_len + FILE_NAME_TYPE_TAG_LEN;
    let marker_pos = raw
        .get(search_from..)
        .and_then(|tail| tail.iter().position(|&b| b == DATA_ATTRIBUTE_MARKER))
        .map(|pos| search_from + pos)
        .ok_or(SlackError::DataAttributeNotFound { record_offset })?;

    let mut cursor = Cursor::new(raw);
    cursor.set_position((marker_pos + 1) as u64 + ALLOCATED_SIZE_SKIP);
    let allocated_size = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| malformed("allocated_size выходит за границы записи".to_string()))?;
    let logical_size = cursor
        .read_u64::<LittleEndian>()
        .map_err(|_| malformed("real_size выходит за границы записи".to_string()))?;

    if allocated_size < logical_size {
        return Err(malformed(format!(
            "allocated_size ({}) меньше real_size ({})",
            allocated_size, logical_size
        )));
    }

    let runs_start = cursor.position() + INITIALIZED_SIZE_LEN;
    let runs_bytes = raw
        .get(runs_start as usize..)
        .filter(|b| !b.is_empty())
        .ok_or_else(|| malformed("список data runs выходит за границы записи".to_string()))?;
    let runs = decode_runs(runs_bytes).map_err(malformed)?;
    if runs.is_empty() {
        return Err(malformed("пустой список data runs".to_string()));
    }

    Ok(DataAttribute { allocated_size, logical_size, runs, file_name })
}

fn decode_file_name(raw: &[u8], name_len: usize) -> String {
    let end = (FILE_NAME_OFFSET + name_len * 2).min(raw.len());
    match raw.get(FILE_NAME_OFFSET..end) {
        Some(bytes) => UTF_16LE.decode_without_bom_handling(bytes).0.into_owned(),
        None => String::new(),
    }
}
