/// Display a banner with version and useful information
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");

    let banner = format!(
        r#"
╭────────────────────────────────────────────────────────╮
│  {:<54}│
│  Version: {:<45}│
│  MySQL + Redis status board                            │
╰────────────────────────────────────────────────────────╯
"#,
        capitalize(name),
        version,
    );

    println!("{}", banner);
}

/// Display startup information
pub fn print_startup_info(host: &str, port: u16) {
    println!("{}", startup_info(host, port));
}

fn startup_info(host: &str, port: u16) -> String {
    format!(
        r#"
📋 Configuration Loaded
  🌐 Server Address: http://{}:{}
  🔗 Routes: /  /status  /health  /simple-check  /test-mysql  /test-redis  /visitors
  📦 Ready to accept connections
"#,
        host, port
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
