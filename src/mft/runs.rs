use tracing::warn;

/// Максимальная ширина поля длины/смещения в data run.
pub const MAX_RUN_FIELD_SIZE: usize = 8;

/// Один data run в том виде, как он закодирован в записи.
/// Для первого run `cluster_offset` это абсолютный номер кластера (LCN),
/// для последующих это дельта со знаком относительно предыдущего.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataRunEntry {
    pub run_length_field_size: u8,
    pub run_offset_field_size: u8,
    pub length_in_clusters: u64,
    pub cluster_offset: u64,
}

impl DataRunEntry {
    pub fn is_terminator(&self) -> bool {
        self.run_length_field_size == 0 && self.run_offset_field_size == 0
    }

    /// Ширина закодированного run в байтах (заголовок + оба поля).
    pub fn encoded_len(&self) -> usize {
        1 + self.run_length_field_size as usize + self.run_offset_field_size as usize
    }
}

/// Упорядоченный список data runs атрибута.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRunList(pub Vec<DataRunEntry>);

impl DataRunList {
    pub fn first(&self) -> Option<&DataRunEntry> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_fragmented(&self) -> bool {
        self.0.len() > 1
    }
}

/// Младший ниббл заголовка - ширина поля длины, старший - ширина поля смещения.
pub fn split_header(header: u8) -> (usize, usize) {
    ((header & 0x0F) as usize, ((header & 0xF0) >> 4) as usize)
}

fn read_le(bytes: &[u8]) -> u64 {
    let mut value: u64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        value |= (b as u64) << (i * 8);
    }
    value
}

/// Декодирует один run, начиная с байта заголовка `data[0]`.
/// Заголовок 0x00 дает терминатор с нулевыми значениями.
pub fn decode_run(data: &[u8]) -> Result<DataRunEntry, String> {
    let header = *data.first().ok_or("Нет байта заголовка data run")?;
    let (len_bytes, off_bytes) = split_header(header);

    if len_bytes > MAX_RUN_FIELD_SIZE || off_bytes > MAX_RUN_FIELD_SIZE {
        return Err(format!("Некорректные размеры нибблов: len={}, off={}", len_bytes, off_bytes));
    }
    if 1 + len_bytes + off_bytes > data.len() {
        return Err("Data run выходит за границы записи".to_string());
    }

    let length_field = &data[1..1 + len_bytes];
    let offset_field = &data[1 + len_bytes..1 + len_bytes + off_bytes];

    Ok(DataRunEntry {
        run_length_field_size: len_bytes as u8,
        run_offset_field_size: off_bytes as u8,
        length_in_clusters: read_le(length_field),
        cluster_offset: read_le(offset_field),
    })
}

/// Декодирует runs до терминатора 0x00 или конца буфера.
/// Ошибка возвращается только для первого run; на битом последующем
/// декодирование останавливается, уже прочитанные runs сохраняются.
pub fn decode_runs(data: &[u8]) -> Result<DataRunList, String> {
    let mut runs = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let run = match decode_run(&data[pos..]) {
            Ok(run) => run,
            Err(e) if runs.is_empty() => return Err(e),
            Err(e) => {
                warn!(run_index = runs.len(), offset = pos, "data run не декодирован, список обрезан: {}", e);
                break;
            }
        };
        if run.is_terminator() {
            break;
        }
        pos += run.encoded_len();
        runs.push(run);
    }
    Ok(DataRunList(runs))
}
