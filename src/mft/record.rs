use byteorder::{ByteOrder, LittleEndian};

/// Фиксированный размер записи MFT.
pub const MFT_RECORD_SIZE: usize = 1024;
/// Сигнатура записи MFT.
pub const FILE_SIGNATURE: &[u8; 4] = b"FILE";

/// Одна запись MFT, прочитанная при сканировании.
#[derive(Clone)]
pub struct MftRecord {
    pub raw: [u8; MFT_RECORD_SIZE],
    /// Абсолютное смещение записи в образе
    pub byte_offset: u64,
    /// Номер записи относительно начала $MFT
    pub record_number: u64,
}

impl MftRecord {
    pub fn header(&self) -> Option<MftRecordHeader> {
        MftRecordHeader::parse(&self.raw)
    }
}

impl std::fmt::Debug for MftRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MftRecord")
            .field("byte_offset", &self.byte_offset)
            .field("record_number", &self.record_number)
            .finish_non_exhaustive()
    }
}

/// Заголовок записи. Нужен только для строгой проверки сигнатуры и для логов.
#[derive(Debug)]
pub struct MftRecordHeader {
    pub sequence_number: u16,
    pub flags: u16, // 0x01 = InUse, 0x02 = Directory
}

impl MftRecordHeader {
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.len() < 48 { return None; }
        if &data[0..4] != FILE_SIGNATURE {
            return None;
        }

        Some(Self {
            sequence_number: LittleEndian::read_u16(&data[16..18]),
            flags: LittleEndian::read_u16(&data[22..24]),
        })
    }

    pub fn is_in_use(&self) -> bool {
        self.flags & 0x01 != 0
    }

    pub fn is_directory(&self) -> bool {
        self.flags & 0x02 != 0
    }
}
