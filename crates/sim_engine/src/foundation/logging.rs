//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Reads the filter from `RUST_LOG`, falling back to `info`. Safe to call more
/// than once; later calls are ignored so tests can initialize freely.
pub fn init() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).is_test(cfg!(test)).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
        info!("logging initialised");
    }
}
