use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Seek};
use tracing::{info, warn};

use super::partition::PartitionDescriptor;
use crate::error::{Result, SlackError};
use crate::image::{ImageSource, SECTOR_SIZE};

// Смещения полей BPB относительно начала раздела
pub const BYTES_PER_SECTOR_OFFSET: usize = 0x0B; // 11, 2 байта
pub const SECTORS_PER_CLUSTER_OFFSET: usize = 0x0D; // 13, 1 байт
pub const HIDDEN_SECTORS_OFFSET: usize = 0x1C; // 28, 4 байта
pub const MFT_LCN_OFFSET: usize = 0x30; // 48, 8 байт

/// Сколько байт VBR нужно прочитать, чтобы покрыть все поля выше.
pub const VBR_FIELDS_LEN: usize = MFT_LCN_OFFSET + 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeBootRecord {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub hidden_sectors: u32,
    pub mft_start_cluster: u64,
}

impl VolumeBootRecord {
    /// Разбирает поля из начала VBR. `offset` нужен только для сообщения об ошибке.
    pub fn parse(vbr: &[u8], offset: u64) -> Result<Self> {
        if vbr.len() < VBR_FIELDS_LEN {
            return Err(SlackError::ImageTooShort {
                stage: "VBR",
                offset,
                needed: VBR_FIELDS_LEN as u64,
                image_len: vbr.len() as u64,
            });
        }

        let sectors_per_cluster = vbr[SECTORS_PER_CLUSTER_OFFSET];
        if sectors_per_cluster == 0 {
            return Err(SlackError::InvalidBootRecord {
                offset,
                detail: "sectors_per_cluster равен 0".to_string(),
            });
        }

        Ok(Self {
            bytes_per_sector: LittleEndian::read_u16(&vbr[BYTES_PER_SECTOR_OFFSET..BYTES_PER_SECTOR_OFFSET + 2]),
            sectors_per_cluster,
            hidden_sectors: LittleEndian::read_u32(&vbr[HIDDEN_SECTORS_OFFSET..HIDDEN_SECTORS_OFFSET + 4]),
            mft_start_cluster: LittleEndian::read_u64(&vbr[MFT_LCN_OFFSET..MFT_LCN_OFFSET + 8]),
        })
    }

    pub fn read<R: Read + Seek>(image: &mut ImageSource<R>, partition: &PartitionDescriptor) -> Result<Self> {
        let offset = partition.byte_offset();
        let mut vbr = [0u8; VBR_FIELDS_LEN];
        image.read_at("VBR", offset, &mut vbr)?;
        let boot = Self::parse(&vbr, offset)?;

        if boot.bytes_per_sector as u64 != SECTOR_SIZE {
            warn!(
                bytes_per_sector = boot.bytes_per_sector,
                "размер сектора отличается от 512, LBA все равно пересчитываются по 512"
            );
        }
        info!(
            bytes_per_sector = boot.bytes_per_sector,
            sectors_per_cluster = boot.sectors_per_cluster,
            hidden_sectors = boot.hidden_sectors,
            mft_lcn = boot.mft_start_cluster,
            cluster_size = boot.bytes_per_cluster(),
            "VBR разобран"
        );
        Ok(boot)
    }

    pub fn bytes_per_cluster(&self) -> u64 {
        self.bytes_per_sector as u64 * self.sectors_per_cluster as u64
    }

    /// Начальный сектор $MFT: mft_lcn * sectors_per_cluster + hidden_sectors.
    pub fn mft_location(&self) -> MftLocation {
        let start_sector_lba = self
            .mft_start_cluster
            .saturating_mul(self.sectors_per_cluster as u64)
            .saturating_add(self.hidden_sectors as u64);
        MftLocation { start_sector_lba }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MftLocation {
    pub start_sector_lba: u64,
}

impl MftLocation {
    pub fn byte_offset(&self) -> u64 {
        self.start_sector_lba.saturating_mul(SECTOR_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn vbr_bytes(bps: u16, spc: u8, hidden: u32, mft_lcn: u64) -> Vec<u8> {
        let mut vbr = vec![0u8; 512];
        vbr[3..11].copy_from_slice(b"NTFS    ");
        vbr[11..13].copy_from_slice(&bps.to_le_bytes());
        vbr[13] = spc;
        vbr[28..32].copy_from_slice(&hidden.to_le_bytes());
        vbr[48..56].copy_from_slice(&mft_lcn.to_le_bytes());
        vbr
    }

    #[test]
    fn reads_fields_relative_to_partition() {
        let mut image = vec![0u8; 63 * 512];
        image.extend(vbr_bytes(512, 8, 63, 786_432));
        let mut image = ImageSource::new(Cursor::new(image)).unwrap();

        let boot = VolumeBootRecord::read(&mut image, &PartitionDescriptor { start_sector_lba: 63 }).unwrap();
        assert_eq!(boot.bytes_per_sector, 512);
        assert_eq!(boot.sectors_per_cluster, 8);
        assert_eq!(boot.hidden_sectors, 63);
        assert_eq!(boot.mft_start_cluster, 786_432);
        assert_eq!(boot.bytes_per_cluster(), 4096);
        assert_eq!(boot.mft_location().start_sector_lba, 786_432 * 8 + 63);
    }

    #[test]
    fn zero_sectors_per_cluster_is_invalid() {
        let err = VolumeBootRecord::parse(&vbr_bytes(512, 0, 63, 4), 0x7E00).unwrap_err();
        assert!(matches!(err, SlackError::InvalidBootRecord { offset: 0x7E00, .. }));
    }

    #[test]
    fn truncated_vbr_is_too_short() {
        let mut image = vec![0u8; 512];
        image.extend(vec![0u8; 40]);
        let mut image = ImageSource::new(Cursor::new(image)).unwrap();
        let err = VolumeBootRecord::read(&mut image, &PartitionDescriptor { start_sector_lba: 1 }).unwrap_err();
        assert!(matches!(err, SlackError::ImageTooShort { stage: "VBR", .. }));
    }

    #[test]
    fn huge_mft_lcn_saturates() {
        let boot = VolumeBootRecord {
            bytes_per_sector: 512,
            sectors_per_cluster: 8,
            hidden_sectors: 63,
            mft_start_cluster: u64::MAX,
        };
        assert_eq!(boot.mft_location().start_sector_lba, u64::MAX);
        assert_eq!(boot.mft_location().byte_offset(), u64::MAX);
    }

    proptest! {
        #[test]
        fn mft_location_formula(
            spc in 1u8..=u8::MAX,
            hidden in any::<u32>(),
            mft_lcn in 0u64..=u32::MAX as u64,
        ) {
            let boot = VolumeBootRecord::parse(&vbr_bytes(512, spc, hidden, mft_lcn), 0).unwrap();
            prop_assert_eq!(
                boot.mft_location().start_sector_lba,
                mft_lcn * spc as u64 + hidden as u64
            );
        }
    }
}
