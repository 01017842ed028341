pub mod progress;
pub mod prompt;

pub use progress::{BarProgress, Progress, SilentProgress};
pub use prompt::{AssumeYes, Confirmation, TerminalConfirmation, confirmation_message};
