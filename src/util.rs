// Small shared helpers

/// `MM:SS` for the countdown display.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Console logging; a no-op off the browser so native tests never call into JS.
pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!(msg);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}
