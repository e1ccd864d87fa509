use clap::Parser;
use std::path::PathBuf;

use crate::commands::extract::ExtractOptions;
use crate::mft::scanner::SignatureMatch;

const EXAMPLES: &str = r#"
ПРИМЕРЫ ИСПОЛЬЗОВАНИЯ:

  1. Извлечь slack файла secret.txt из образа диска в slack.bin:
     ntfs_slack --image disk.dd --searchfile secret.txt --outfile C:\Case\slack.bin

     Или коротко:
     ntfs_slack -i disk.dd -f secret.txt -o C:\Case\slack.bin

  2. То же самое, плюс отчет slack.bin.meta.json и строгая проверка сигнатуры FILE:
     ntfs_slack -i disk.dd -f secret.txt -o slack.bin --meta --strict-signature

  Подробный лог: RUST_LOG=debug ntfs_slack ...
"#;

#[derive(Parser, Debug)]
#[command(name = "ntfs_slack")]
#[command(version = "1.0")]
#[command(about = "DFIR tool: извлечение file slack из сырого образа NTFS")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Образ диска (raw/dd); первый сектор образа - MBR
    #[arg(short, long)]
    pub image: PathBuf,
    /// Имя искомого файла (ASCII, с учетом регистра)
    #[arg(short = 'f', long, value_parser = parse_search_name)]
    pub searchfile: String,
    /// Куда записать байты slack
    #[arg(short, long)]
    pub outfile: PathBuf,
    /// Записать отчет в <outfile>.meta.json
    #[arg(short, long)]
    pub meta: bool,
    /// Искать сигнатуру FILE только в начале записи
    #[arg(long)]
    pub strict_signature: bool,
}

impl Cli {
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            image: self.image.clone(),
            search_file: self.searchfile.clone(),
            outfile: self.outfile.clone(),
            write_meta: self.meta,
            signature: if self.strict_signature { SignatureMatch::Header } else { SignatureMatch::Anywhere },
        }
    }
}

fn parse_search_name(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("имя файла не может быть пустым".to_string());
    }
    if !s.is_ascii() {
        return Err("ожидается имя в ASCII".to_string());
    }
    Ok(s.to_string())
}
