use rfd::FileDialog;
use std::path::PathBuf;

/// File dialog helper
pub struct FileDialogs;

impl FileDialogs {
    /// Open a file dialog for selecting a trajectory CSV
    pub fn open_trajectory_file() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .add_filter("All Files", &["*"])
            .set_title("Open Trajectory")
            .pick_file()
    }
}
