use byteorder::{ByteOrder, LittleEndian};
use tracing::info;

use crate::error::{Result, SlackError};
use crate::image::{ImageSource, SECTOR_SIZE};
use std::io::{Read, Seek};

/// Начало таблицы разделов MBR.
pub const PARTITION_TABLE_OFFSET: u64 = 446;
/// Смещение поля "первый LBA" внутри 16-байтовой записи раздела.
pub const ENTRY_LBA_FIELD: u64 = 8;
/// Абсолютное смещение LBA первой записи: 446 + 8 = 454.
pub const FIRST_ENTRY_LBA_OFFSET: u64 = PARTITION_TABLE_OFFSET + ENTRY_LBA_FIELD;

const STAGE: &str = "таблица разделов MBR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionDescriptor {
    pub start_sector_lba: u32,
}

impl PartitionDescriptor {
    pub fn parse(field: &[u8]) -> Option<Self> {
        if field.len() < 4 {
            return None;
        }
        Some(Self { start_sector_lba: LittleEndian::read_u32(&field[0..4]) })
    }

    pub fn read<R: Read + Seek>(image: &mut ImageSource<R>) -> Result<Self> {
        let mut field = [0u8; 4];
        image.read_at(STAGE, FIRST_ENTRY_LBA_OFFSET, &mut field)?;
        let descriptor = Self::parse(&field).ok_or(SlackError::ImageTooShort {
            stage: STAGE,
            offset: FIRST_ENTRY_LBA_OFFSET,
            needed: field.len() as u64,
            image_len: image.len(),
        })?;
        info!(lba = descriptor.start_sector_lba, "раздел найден");
        Ok(descriptor)
    }

    pub fn byte_offset(&self) -> u64 {
        self.start_sector_lba as u64 * SECTOR_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_first_entry_lba() {
        let mut mbr = vec![0u8; 512];
        mbr[454..458].copy_from_slice(&2048u32.to_le_bytes());
        let mut image = ImageSource::new(Cursor::new(mbr)).unwrap();

        let part = PartitionDescriptor::read(&mut image).unwrap();
        assert_eq!(part.start_sector_lba, 2048);
        assert_eq!(part.byte_offset(), 2048 * 512);
    }

    #[test]
    fn image_shorter_than_458_bytes_fails() {
        let mut image = ImageSource::new(Cursor::new(vec![0u8; 457])).unwrap();
        assert!(matches!(
            PartitionDescriptor::read(&mut image),
            Err(SlackError::ImageTooShort { offset: 454, needed: 4, .. })
        ));

        let mut exact = ImageSource::new(Cursor::new(vec![0u8; 458])).unwrap();
        assert!(PartitionDescriptor::read(&mut exact).is_ok());
    }

    #[test]
    fn parse_needs_four_bytes() {
        assert_eq!(PartitionDescriptor::parse(&[0x3F, 0, 0]), None);
        assert_eq!(
            PartitionDescriptor::parse(&[0x3F, 0, 0, 0]),
            Some(PartitionDescriptor { start_sector_lba: 63 })
        );
    }
}
