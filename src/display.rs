use crate::entities::TorrentTask;
use prettytable::format::{Alignment, consts::FORMAT_DEFAULT};
use prettytable::{Cell, Row, Table};

const HEADERS: [&str; 6] = ["ID", "User", "Title", "Status", "Size", "Progress (%)"];
const NO_TASKS: &str = "No tasks found";

/// Renders tasks as a grid, one row per task in the given order
#[must_use]
pub fn render_torrent_tasks(tasks: &[TorrentTask]) -> String {
    if tasks.is_empty() {
        return NO_TASKS.to_string();
    }

    let mut table = Table::new();
    table.set_format(*FORMAT_DEFAULT);
    table.set_titles(Row::new(
        HEADERS
            .iter()
            .map(|header| Cell::new_align(header, Alignment::LEFT))
            .collect(),
    ));

    for task in tasks {
        let status = task.status.to_string();
        table.add_row(Row::new(
            [
                task.id.as_str(),
                task.user.as_str(),
                task.title.as_str(),
                status.as_str(),
                task.size.as_str(),
                task.progress.as_str(),
            ]
            .iter()
            .map(|value| Cell::new_align(value, Alignment::LEFT))
            .collect(),
        ));
    }

    table.to_string()
}

pub fn print_torrent_tasks(tasks: &[TorrentTask]) {
    println!("{}", render_torrent_tasks(tasks));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TaskStatus;

    fn row(id: &str, title: &str) -> TorrentTask {
        TorrentTask {
            id: id.into(),
            user: "alice".into(),
            title: title.into(),
            status: TaskStatus::Downloading,
            size_bytes: 1_234_567_890,
            downloaded_bytes: 617_283_945,
            size: "1.2 GB".into(),
            progress: "50 %".into(),
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_torrent_tasks(&[]), "No tasks found");
    }

    #[test]
    fn test_render_keeps_order() {
        let output = render_torrent_tasks(&[row("dbid_2", "Second"), row("dbid_1", "First")]);

        assert!(output.contains("Progress (%)"));
        assert!(output.contains("downloading"));
        assert!(output.contains("50 %"));
        let second = output.find("dbid_2").unwrap();
        let first = output.find("dbid_1").unwrap();
        assert!(second < first);
    }
}
