pub mod clock;
pub mod dir;
pub mod format;
pub mod logging;
pub mod shutdown;
pub mod time;
