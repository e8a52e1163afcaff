/// Conditional logging module for development builds
///
/// The `dev_log!` macro provides informational logging that is compiled out in
/// release builds by default. Warnings and errors go through `log::warn!` and
/// `log::error!` directly so they always reach the installed logger.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use rail_timetable::logging::dev_log;
///
/// let sheet = "WL";
/// dev_log!("Extracting sheet {}", sheet);
/// ```
/// Conditionally log in development builds
///
/// This macro expands to `log::debug!` in debug builds or when the
/// `console_logging` feature is enabled. In production release builds it
/// compiles to nothing.
#[macro_export]
macro_rules! dev_log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            ::log::debug!($($arg),+);
        }
    };
}

pub use crate::dev_log;
