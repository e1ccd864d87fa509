use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Ошибки конвейера извлечения slack. Каждая стадия прерывает весь конвейер.
#[derive(Error, Debug)]
pub enum SlackError {
    #[error("образ не найден: {}", path.display())]
    ImageNotFound { path: PathBuf },

    #[error("{stage}: образ обрывается (нужно {needed} байт по смещению {offset:#X}, размер образа {image_len} байт)")]
    ImageTooShort {
        stage: &'static str,
        offset: u64,
        needed: u64,
        image_len: u64,
    },

    #[error("некорректный VBR по смещению {offset:#X}: {detail}")]
    InvalidBootRecord { offset: u64, detail: String },

    #[error("файл {name} не найден в MFT (просмотрено записей: {records_scanned})")]
    TargetFileNotFound { name: String, records_scanned: u64 },

    #[error("атрибут $DATA (0x80) не найден в записи MFT по смещению {record_offset:#X}")]
    DataAttributeNotFound { record_offset: u64 },

    #[error("поврежденный атрибут $DATA в записи MFT по смещению {record_offset:#X}: {detail}")]
    MalformedDataAttribute { record_offset: u64, detail: String },

    #[error("каталог для выходного файла не существует: {}", dir.display())]
    OutputDirectoryMissing { dir: PathBuf },

    #[error("ошибка ввода-вывода: {0}")]
    Io(#[from] io::Error),
}

impl SlackError {
    /// Код завершения процесса, свой для каждого вида ошибки.
    pub fn exit_code(&self) -> i32 {
        match self {
            SlackError::Io(_) => 1,
            SlackError::ImageNotFound { .. } => 2,
            SlackError::ImageTooShort { .. } => 3,
            SlackError::InvalidBootRecord { .. } => 4,
            SlackError::TargetFileNotFound { .. } => 5,
            SlackError::DataAttributeNotFound { .. } => 6,
            SlackError::MalformedDataAttribute { .. } => 7,
            SlackError::OutputDirectoryMissing { .. } => 8,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlackError>;
