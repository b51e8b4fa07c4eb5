use std::sync::Arc;

use dbsandbox_archive::Progress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {pos} entries {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

static SPINNER_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

/// Spinner counting tarball entries as they are written.
#[derive(Clone)]
pub struct EntryTracker {
    pb: ProgressBar,
}

impl EntryTracker {
    pub fn new(prefix: &str) -> Self {
        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let pb = match SPINNER_TEMPLATE.as_ref() {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };
        pb.set_prefix(prefix.to_string());
        Self { pb }
    }

    /// Callback for [`dbsandbox_archive::ExtractOptions::on_progress`].
    pub fn callback(&self) -> Arc<dyn Fn(&Progress) + Send + Sync> {
        let pb = self.pb.clone();
        Arc::new(move |progress: &Progress| {
            pb.set_position(progress.entries);
            pb.set_message(format!(
                "{} {}",
                indicatif::HumanBytes(progress.bytes_processed),
                progress.current_file.display()
            ));
            pb.tick();
        })
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}
