use clap::Parser;
use tracing_subscriber::EnvFilter;

use ntfs_slack::cli::Cli;
use ntfs_slack::commands;

// Вспомогательная функция для фатальных ошибок
fn fatal(err: &ntfs_slack::SlackError) -> ! {
    eprintln!("[!] КРИТИЧЕСКАЯ ОШИБКА: {}", err);
    std::process::exit(err.exit_code());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let report = match commands::extract::run(&cli.options()) {
        Ok(r) => r,
        Err(e) => fatal(&e),
    };

    println!("\n[+] Файл {} найден в MFT (запись {})", report.search_file, report.mft_record_number);
    println!("[+] Размер slack: {} КиБ ({} байт)", report.slack_size_kib, report.slack_size);
    println!("[+] SHA-256 slack: {}", report.sha256);
    println!("[+] Slack записан в {}", report.outfile);
}
