use drawpage_common::EngineConfig;
use serde_json::json;
use webdriver::capabilities::Capabilities;

/// Flags every session is launched with: no sandbox, no GPU.
const BASE_CHROME_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--disable-gpu",
];

/// Construct Chrome command-line arguments for an engine configuration.
pub fn build_chrome_arguments(engine: &EngineConfig) -> Vec<String> {
    let mut args: Vec<String> = BASE_CHROME_ARGS.iter().map(|a| a.to_string()).collect();
    args.push(format!(
        "--window-size={},{}",
        engine.window_width, engine.window_height
    ));
    if engine.headless {
        args.push("--headless=new".to_string());
    }
    args
}

/// WebDriver capabilities selecting the configured Chrome binary.
pub fn build_capabilities(engine: &EngineConfig) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!("chrome"));
    caps.insert("pageLoadStrategy".to_string(), json!("normal"));
    caps.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "binary": engine.executable_path,
            "args": build_chrome_arguments(engine),
        }),
    );
    caps
}
