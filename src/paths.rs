use std::{path::PathBuf, sync::LazyLock};

pub static DEFAULT_EXT_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    let mut path = dirs::home_dir().unwrap_or_default();

    if std::env::var("FOA_XDG_PATH").is_ok() {
        path.push(".config")
    }

    path.push("FoA-BepInEx");
    path
});

/// Computes a path under the extension's data directory.
///
/// With no arguments this is the data directory itself (`~/FoA-BepInEx`, or
/// `~/.config/FoA-BepInEx` when `FOA_XDG_PATH` is set). Each argument is joined
/// onto it in order.
///
/// # Examples
///
/// ```ignore
/// let state = ext_path!("state.json");
/// let logs = ext_path!("logs", "foa_20250101_120000.log");
/// ```
#[macro_export]
macro_rules! ext_path {
    () => {
        $crate::paths::DEFAULT_EXT_PATH.as_path()
    };

    ( $( $path:expr ),+ $(,)? ) => {
        [
            $crate::paths::DEFAULT_EXT_PATH.as_path(),
            $( std::path::Path::new(&$path) ),+
        ].into_iter().collect::<std::path::PathBuf>()
    };
}
