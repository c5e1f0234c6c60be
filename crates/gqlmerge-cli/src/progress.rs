use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for ongoing operations.
///
/// The spinner is sent to stderr and ticks every 80ms.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a spinner with a success message.
pub fn finish_spinner(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}

/// Clear a spinner that ended in failure; the error is reported separately.
pub fn abandon_spinner(pb: &ProgressBar) {
    pb.finish_and_clear();
}
