//! Logging configuration
//!
//! Structured `tracing` output. In the browser events go to the devtools
//! console, natively to stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use tracing_subscriber::util::TryInitError;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,     // trace, debug, info, warn, error
    pub json_format: bool, // one JSON object per event
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Install the global subscriber. Fails if one is already installed.
    pub fn init(&self) -> Result<(), TryInitError> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        // SystemTime is unavailable on wasm32, so events carry no timestamp
        let output = if self.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .without_time()
                .with_writer(writer::make_writer)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .without_time()
                .with_writer(writer::make_writer)
                .boxed()
        };

        tracing_subscriber::registry()
            .with(output)
            .with(env_filter)
            .try_init()
    }
}

#[cfg(target_arch = "wasm32")]
mod writer {
    use std::io;

    /// Buffers one formatted event and logs it to the console on flush
    #[derive(Default)]
    pub struct ConsoleWriter {
        buffer: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if !self.buffer.is_empty() {
                let line = String::from_utf8_lossy(&self.buffer);
                web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line.trim_end()));
                self.buffer.clear();
            }
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }

    pub fn make_writer() -> ConsoleWriter {
        ConsoleWriter::default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod writer {
    pub fn make_writer() -> std::io::Stdout {
        std::io::stdout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = config.init();

        assert!(config.init().is_err());
    }
}
