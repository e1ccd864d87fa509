//! Синтетический образ: MBR + NTFS VBR + несколько записей $MFT + кластер с данными.

#![allow(dead_code)]

pub const PARTITION_LBA: u32 = 63;
pub const SECTORS_PER_CLUSTER: u8 = 8;
pub const HIDDEN_SECTORS: u32 = 63;
pub const MFT_LCN: u64 = 4;
pub const FILE_LCN: u16 = 20;
pub const IMAGE_LEN: usize = 120 * 1024;

pub const MFT_OFFSET: usize = (MFT_LCN as usize * SECTORS_PER_CLUSTER as usize + HIDDEN_SECTORS as usize) * 512;
pub const FILE_START: usize = FILE_LCN as usize * SECTORS_PER_CLUSTER as usize * 512 + HIDDEN_SECTORS as usize * 512;

const DATA_AT: usize = 0x140;

pub struct SyntheticImage {
    pub bytes: Vec<u8>,
    pub expected_slack: Vec<u8>,
}

fn utf16(name: &str) -> Vec<u8> {
    name.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

/// Запись MFT с $FILE_NAME по смещению 240 и нерезидентным $DATA на 0x140.
pub fn mft_record(name: &str, signature_at: usize, allocated: u64, logical: u64) -> Vec<u8> {
    let mut rec = vec![0u8; 1024];
    rec[signature_at..signature_at + 4].copy_from_slice(b"FILE");
    rec[240] = name.len() as u8;
    rec[241] = 1;
    let encoded = utf16(name);
    rec[242..242 + encoded.len()].copy_from_slice(&encoded);

    rec[DATA_AT] = 0x80;
    rec[DATA_AT + 4] = 0x48;
    rec[DATA_AT + 8] = 1;
    rec[DATA_AT + 0x28..DATA_AT + 0x30].copy_from_slice(&allocated.to_le_bytes());
    rec[DATA_AT + 0x30..DATA_AT + 0x38].copy_from_slice(&logical.to_le_bytes());
    rec[DATA_AT + 0x38..DATA_AT + 0x40].copy_from_slice(&logical.to_le_bytes());
    // 0x21: длина 1 байт (1 кластер), смещение 2 байта (FILE_LCN), затем терминатор
    rec[DATA_AT + 0x40] = 0x21;
    rec[DATA_AT + 0x41] = 0x01;
    rec[DATA_AT + 0x42..DATA_AT + 0x44].copy_from_slice(&FILE_LCN.to_le_bytes());
    rec
}

pub fn build_image(target: &str, logical: u64, allocated: u64) -> SyntheticImage {
    build_image_with(target, logical, allocated, 0)
}

pub fn build_image_with(target: &str, logical: u64, allocated: u64, signature_at: usize) -> SyntheticImage {
    let mut img = vec![0u8; IMAGE_LEN];

    img[454..458].copy_from_slice(&PARTITION_LBA.to_le_bytes());
    img[510] = 0x55;
    img[511] = 0xAA;

    let vbr = PARTITION_LBA as usize * 512;
    img[vbr + 3..vbr + 11].copy_from_slice(b"NTFS    ");
    img[vbr + 11..vbr + 13].copy_from_slice(&512u16.to_le_bytes());
    img[vbr + 13] = SECTORS_PER_CLUSTER;
    img[vbr + 28..vbr + 32].copy_from_slice(&HIDDEN_SECTORS.to_le_bytes());
    img[vbr + 48..vbr + 56].copy_from_slice(&MFT_LCN.to_le_bytes());

    let records = [
        mft_record("$MFT", 0, 16384, 16384),
        mft_record("other.txt", 0, 4096, 10),
        mft_record(target, signature_at, allocated, logical),
    ];
    for (i, rec) in records.iter().enumerate() {
        let at = MFT_OFFSET + i * 1024;
        img[at..at + 1024].copy_from_slice(rec);
    }

    let data = &mut img[FILE_START..FILE_START + allocated as usize];
    for (i, b) in data.iter_mut().enumerate() {
        *b = (i as u32 * 31 + 7) as u8;
    }
    let expected_slack = img[FILE_START + logical as usize..FILE_START + allocated as usize].to_vec();

    SyntheticImage { bytes: img, expected_slack }
}
