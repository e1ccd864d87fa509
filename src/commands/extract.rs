use std::io::{Read, Seek};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{Result, SlackError};
use crate::image::ImageSource;
use crate::mft::attributes::parse_data_attribute;
use crate::mft::boot::VolumeBootRecord;
use crate::mft::partition::PartitionDescriptor;
use crate::mft::scanner::{MftScanner, SignatureMatch};
use crate::models::SlackReport;
use crate::output::{ensure_output_dir, write_meta, write_slack};
use crate::slack::{read_slack, ResolvedFileLocation, SlackData};

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub image: PathBuf,
    pub search_file: String,
    pub outfile: PathBuf,
    pub write_meta: bool,
    pub signature: SignatureMatch,
}

/// Результат разбора образа до записи на диск.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub report: SlackReport,
    pub slack: SlackData,
}

/// Полный конвейер: MBR -> VBR -> $MFT -> запись -> $DATA -> slack -> файл.
pub fn run(opts: &ExtractOptions) -> Result<SlackReport> {
    info!(image = %opts.image.display(), outfile = %opts.outfile.display(), "запуск извлечения slack");

    let mut image = ImageSource::open(&opts.image)?;
    // Каталог проверяется до разбора образа: при ошибке slack не читается вовсе
    ensure_output_dir(&opts.outfile)?;

    let Extraction { report, slack } = extract(&mut image, opts)?;

    write_slack(&opts.outfile, &slack.bytes)?;
    info!(path = %opts.outfile.display(), len = slack.len(), "slack записан");

    if opts.write_meta {
        let meta_path = write_meta(&opts.outfile, &report)?;
        info!(path = %meta_path.display(), "отчет записан");
    }
    Ok(report)
}

/// Разбор образа без побочных эффектов на файловой системе.
pub fn extract<R: Read + Seek>(image: &mut ImageSource<R>, opts: &ExtractOptions) -> Result<Extraction> {
    let partition = PartitionDescriptor::read(image)?;
    let boot = VolumeBootRecord::read(image, &partition)?;
    let mft = boot.mft_location();
    info!(mft_lba = mft.start_sector_lba, offset = mft.byte_offset(), "расположение $MFT");

    let record = MftScanner::new(&opts.search_file, opts.signature).scan(image, &mft)?;
    let attr = parse_data_attribute(&record)?;

    let first_run = *attr.runs.first().ok_or_else(|| SlackError::MalformedDataAttribute {
        record_offset: record.byte_offset,
        detail: "пустой список data runs".to_string(),
    })?;
    if attr.runs.is_fragmented() {
        warn!(runs = attr.runs.len(), "файл фрагментирован, используется только первый data run");
    }

    let location = ResolvedFileLocation::resolve(&boot, &first_run, &attr);
    info!(
        start = location.start_byte_offset,
        logical_size = location.logical_size,
        allocated_size = location.allocated_size,
        "файл расположен"
    );

    let slack = read_slack(image, &location)?;

    let report = SlackReport {
        image: opts.image.display().to_string(),
        search_file: opts.search_file.clone(),
        outfile: opts.outfile.display().to_string(),
        partition_start_lba: partition.start_sector_lba,
        bytes_per_sector: boot.bytes_per_sector,
        sectors_per_cluster: boot.sectors_per_cluster,
        hidden_sectors: boot.hidden_sectors,
        mft_lcn: boot.mft_start_cluster,
        mft_start_lba: mft.start_sector_lba,
        mft_record_number: record.record_number,
        mft_record_offset: record.byte_offset,
        record_file_name: attr.file_name.clone(),
        run_count: attr.runs.len(),
        run_length_clusters: first_run.length_in_clusters,
        start_lcn: first_run.cluster_offset,
        file_start_offset: location.start_byte_offset,
        logical_size: location.logical_size,
        allocated_size: location.allocated_size,
        slack_size: slack.len(),
        slack_size_kib: slack.size_kib(),
        sha256: slack.sha256.clone(),
    };

    Ok(Extraction { report, slack })
}
