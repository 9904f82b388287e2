use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Run `work` behind a terminal spinner, clearing it when the call returns.
pub fn with_spinner<T>(message: &str, work: impl FnOnce() -> T) -> T {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));

    let result = work();

    bar.finish_and_clear();
    result
}
