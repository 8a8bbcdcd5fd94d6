use env_logger::Env;

/// Honours `RUST_LOG`; quiet (`warn`) otherwise so child output stays readable.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}
