#![allow(dead_code)]

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Write `content` to a uniquely named temp file and return its path.
    pub fn create_temp_registry(content: &str, ext: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "postforge_test_{}_{}_{}.{}",
            std::process::id(),
            counter,
            nanos,
            ext
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn cleanup(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub mod test_server {
    use std::sync::Once;

    static MAY_INIT: Once = Once::new();

    /// Configure the may runtime once per test binary.
    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}

/// Registry document shared by the integration suites.
pub const EVENT_REGISTRY: &str = r#"
content_types:
  - name: event
    label: Events
    fields:
      - { name: location, label: Location, kind: text }
      - { name: capacity, label: Capacity, kind: number }
    taxonomies:
      - { name: event_category, label: Event Categories }
  - name: page
    label: Pages
"#;
