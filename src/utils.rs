use crate::entities::{Task, TorrentTask};
use byte_unit::{Byte, Unit, UnitType};

/// Download progress in percent, following the Download Station convention
///
/// A task without a known size reports `0`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn calculate_percentage(downloaded: i64, size: i64) -> f64 {
    if size == 0 {
        return 0.0;
    }
    ((downloaded - size) as f64 / size as f64) * 100.0 + 100.0
}

/// Formats a byte count with decimal units and one decimal below ten
///
/// `1_234_567_890` becomes `1.2 GB`, `12_345_678_901` becomes `12 GB`.
#[must_use]
pub fn format_size(bytes: i64) -> String {
    let bytes = u64::try_from(bytes).unwrap_or_default();
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let adjusted = Byte::from(bytes).get_appropriate_unit(UnitType::Decimal);
    let unit: Unit = adjusted.get_unit();
    let value = (adjusted.get_value() * 10.0 + 0.5).floor() / 10.0;

    if value < 10.0 {
        format!("{value:.1} {unit}")
    } else {
        format!("{value:.0} {unit}")
    }
}

/// Formats a percentage as an integer followed by ` %`
#[must_use]
pub fn format_progress(percentage: f64) -> String {
    format!("{percentage:.0} %")
}

impl Task {
    #[must_use]
    pub fn is_bittorrent(&self) -> bool {
        self.task_type == "bt"
    }

    #[must_use]
    pub fn calculate_size(&self) -> String {
        format_size(self.size)
    }

    #[must_use]
    pub fn size_downloaded(&self) -> i64 {
        self.additional
            .as_ref()
            .and_then(|additional| additional.transfer.as_ref())
            .map(|transfer| transfer.size_downloaded)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn calculate_progress(&self) -> f64 {
        calculate_percentage(self.size_downloaded(), self.size)
    }

    #[must_use]
    pub fn to_torrent_task(&self) -> TorrentTask {
        TorrentTask {
            id: self.id.clone(),
            user: self.username.clone(),
            title: self.title.clone(),
            status: self.status,
            size_bytes: self.size,
            downloaded_bytes: self.size_downloaded(),
            size: self.calculate_size(),
            progress: format_progress(self.calculate_progress()),
        }
    }
}
