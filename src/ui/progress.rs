use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})";


/// Receives one tick per processed record.
pub trait Progress: Send + Sync {
    fn start(&self, label: &str, total: u64);

    /// Grows the expected total, used when recursion discovers child records.
    fn extend(&self, additional: u64);

    fn tick(&self);

    fn finish(&self);
}


pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarProgress {
    fn start(&self, label: &str, total: u64) {
        self.bar.reset();
        self.bar.set_length(total);
        self.bar.set_message(label.to_string());
    }

    fn extend(&self, additional: u64) {
        self.bar.inc_length(additional);
    }

    fn tick(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}


pub struct SilentProgress;

impl Progress for SilentProgress {
    fn start(&self, _label: &str, _total: u64) {}

    fn extend(&self, _additional: u64) {}

    fn tick(&self) {}

    fn finish(&self) {}
}
