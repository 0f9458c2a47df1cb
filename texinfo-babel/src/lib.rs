//! Conversion of Texinfo documents through makeinfo
//!
//!     The structural crates never render anything themselves. Previews and save-time
//!     diagnostics both come from running the real `makeinfo` on the file on disk, and this
//!     crate owns that boundary: turning configuration into command-line options, running the
//!     program under a size limit and handing back the HTML together with makeinfo's log.
//!
//!     ├── error.rs      ConvertError
//!     ├── makeinfo.rs   MakeinfoOptions, Converter, Conversion
//!     └── publish.rs    writing a rendered preview to memory or disk

pub mod error;
pub mod makeinfo;
pub mod publish;

pub use error::ConvertError;
pub use makeinfo::{Conversion, Converter, MakeinfoOptions};
pub use publish::{publish_html, PublishArtifact, PublishResult};

#[cfg(all(test, unix))]
pub(crate) mod test_support {
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::sync::{Mutex, MutexGuard};

    static SCRIPTS: Mutex<()> = Mutex::new(());

    /// Serialises tests that write and then execute scripts, so no concurrent fork inherits
    /// a script's open write handle.
    pub(crate) fn script_lock() -> MutexGuard<'static, ()> {
        SCRIPTS.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write an executable shell script standing in for makeinfo and return its path.
    pub(crate) fn fake_makeinfo(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path.to_string_lossy().into_owned()
    }
}
