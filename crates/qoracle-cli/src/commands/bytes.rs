use super::{BackendOptions, fail, make_provider};

pub fn run(options: &BackendOptions, length: usize) {
    let provider = make_provider(options);
    let bytes = provider.get_bytes(length).unwrap_or_else(|e| fail(e));
    println!("{}", hex::encode(&bytes));

    if let Some(draw) = provider.history().last() {
        log::info!("{} bytes from {}", bytes.len(), draw.source_tag);
    }
}
