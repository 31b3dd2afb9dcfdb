//! Tests for tracing subscriber setup

#[cfg(test)]
mod tests {
    use towerwfc::io::logging::init_logging;

    // Tests repeated initialisation keeps the first subscriber quietly
    // Verified by switching try_init to init
    #[test]
    fn test_init_logging_twice() {
        init_logging(true);
        init_logging(false);
        tracing::info!("logging initialised");
    }
}
