/// Intercept messages using the `log` crate and print them to STDERR. Defaults to `info`, but
/// `RUST_LOG` overrides it, e.g. `RUST_LOG=convert_osm=debug` to see every dropped relation.
pub fn setup() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}
