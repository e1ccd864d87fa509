use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SlackError};

/// Каталог, в который будет записан файл. Пустой родитель - текущий каталог.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Проверка до любого чтения slack: сам файл может не существовать, каталог - обязан.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    let dir = parent_dir(path);
    if !dir.is_dir() {
        return Err(SlackError::OutputDirectoryMissing { dir });
    }
    Ok(())
}

/// Записывает сырые байты slack. При ошибке записи недописанный файл удаляется.
pub fn write_slack(path: &Path, data: &[u8]) -> Result<()> {
    ensure_output_dir(path)?;
    let result = File::create(path).and_then(|f| {
        let mut writer = BufWriter::new(f);
        writer.write_all(data)?;
        writer.flush()
    });
    if let Err(e) = result {
        let _ = fs::remove_file(path);
        return Err(e.into());
    }
    Ok(())
}

pub fn meta_path_for_slack(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Сайдкар `<outfile>.meta.json` с отчетом.
pub fn write_meta<T: Serialize>(path: &Path, value: &T) -> Result<PathBuf> {
    let meta_path = meta_path_for_slack(path);
    let mut writer = BufWriter::new(File::create(&meta_path)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(std::io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(meta_path)
}
