use env_logger::Env;
use log::LevelFilter;

/// Level for a `-v` count. `RUST_LOG` still takes precedence.
pub fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbose: u8) {
    let default = level(verbose).as_str().to_lowercase();
    env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
