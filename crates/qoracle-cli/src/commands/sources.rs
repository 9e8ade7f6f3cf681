use qoracle_core::FallbackProvider;

use super::{BackendOptions, fail, load_settings};

pub fn run(options: &BackendOptions) {
    let settings = load_settings(options);
    let provider = FallbackProvider::from_settings(&settings).unwrap_or_else(|e| fail(e));

    println!("Probing order ({} remote sources):\n", provider.source_count());
    println!("  {:<3} {:<8} {:<7} Description", "#", "Tag", "Remote");
    println!("  {}", "-".repeat(60));
    for (i, info) in provider.source_infos().iter().enumerate() {
        let remote = if info.remote { "yes" } else { "no" };
        println!(
            "  {:<3} {:<8} {:<7} {}",
            i + 1,
            info.tag,
            remote,
            info.description
        );
    }

    println!();
    println!("  LFDR endpoint:  {}", settings.lfdr_url);
    println!("  ANU endpoint:   {}", settings.anu_url);
    println!(
        "  ANU API key:    {}",
        if settings.anu_key.is_some() { "configured" } else { "missing" }
    );
    println!("  Timeout:        {:.1}s", settings.timeout.as_secs_f64());
    println!(
        "  Local fallback: {}",
        if provider.fallback_enabled() { "enabled" } else { "disabled" }
    );
}
