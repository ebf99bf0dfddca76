pub const VERSION: &str = match option_env!("PHY_FAKE_BUILD_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
