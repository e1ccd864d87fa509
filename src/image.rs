use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, SlackError};

/// Размер сектора для пересчета LBA в байты (классический MBR).
pub const SECTOR_SIZE: u64 = 512;

/// Источник байтов поверх сырого образа. Длина известна заранее,
/// поэтому любое чтение за концом образа превращается в `ImageTooShort`.
pub struct ImageSource<R> {
    reader: R,
    len: u64,
}

impl ImageSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SlackError::ImageNotFound { path: path.to_path_buf() });
        }
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self { reader: BufReader::new(file), len })
    }
}

impl<R: Read + Seek> ImageSource<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self { reader, len })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Сколько байт доступно начиная с `offset`.
    pub fn remaining_from(&self, offset: u64) -> u64 {
        self.len.saturating_sub(offset)
    }

    pub fn read_at(&mut self, stage: &'static str, offset: u64, buf: &mut [u8]) -> Result<()> {
        let needed = buf.len() as u64;
        if self.remaining_from(offset) < needed {
            return Err(SlackError::ImageTooShort { stage, offset, needed, image_len: self.len });
        }
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(buf)?;
        Ok(())
    }

    pub fn read_vec_at(&mut self, stage: &'static str, offset: u64, len: u64) -> Result<Vec<u8>> {
        // Граница проверяется до выделения буфера: длина может прийти из поврежденной записи
        if self.remaining_from(offset) < len {
            return Err(SlackError::ImageTooShort { stage, offset, needed: len, image_len: self.len });
        }
        let mut buf = vec![0u8; len as usize];
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}
