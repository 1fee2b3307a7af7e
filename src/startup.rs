//! Start-with-the-OS registration
//!
//! On first launch the user is asked once whether the app should start in
//! the background at login. The answer is remembered through a flag file in
//! the app data directory, written whatever the answer.
//!
//! # Platform Support
//! - Windows: `.lnk` shortcut in the per-user Startup folder
//! - macOS 13+: SMAppService login item
//! - Other platforms: not supported (returns an error)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{MarketError, Result};
use crate::paths::{self, APP_TITLE};

pub const FIRST_RUN_FLAG_FILENAME: &str = ".first_run_flag";
const FIRST_RUN_FLAG_CONTENTS: &str = "run=true";

pub const STARTUP_PROMPT_TITLE: &str = "Start with your computer?";
pub const STARTUP_PROMPT_MESSAGE: &str = "Would you like ARC Raiders Market to start \
     automatically in the background when your computer starts?";
pub const STARTUP_ERROR_TITLE: &str = "Startup Error";

/// Marker file recording that the startup question was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstRunFlag {
    path: PathBuf,
}

impl FirstRunFlag {
    /// Flag in the app data directory.
    pub fn in_app_data() -> Self {
        Self::at(paths::app_data_dir().join(FIRST_RUN_FLAG_FILENAME))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_set(&self) -> bool {
        self.path.exists()
    }

    pub fn mark(&self) -> Result<()> {
        let write_err = |source| MarketError::StateWrite {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, FIRST_RUN_FLAG_CONTENTS).map_err(write_err)
    }
}

/// Record the user's answer and, if accepted, create the startup entry.
///
/// The flag is written before anything else so a failing shortcut never
/// causes the question to be asked again.
pub fn handle_startup_answer(
    flag: &FirstRunFlag,
    accepted: bool,
    create_entry: impl FnOnce() -> anyhow::Result<()>,
) -> Result<()> {
    if let Err(e) = flag.mark() {
        warn!(error = %e, path = %flag.path().display(), "Could not write first-run flag");
    }

    if !accepted {
        info!("Startup registration declined");
        return Ok(());
    }

    create_entry().map_err(|e| MarketError::StartupShortcut(format!("{:#}", e)))?;
    info!("Startup registration created");
    Ok(())
}

/// Per-user Startup folder: `%APPDATA%\Microsoft\Windows\Start Menu\Programs\Startup`
pub fn windows_startup_dir(roaming_app_data: &Path) -> PathBuf {
    roaming_app_data
        .join("Microsoft")
        .join("Windows")
        .join("Start Menu")
        .join("Programs")
        .join("Startup")
}

pub fn shortcut_filename() -> String {
    format!("{}.lnk", APP_TITLE)
}

/// Creates a Startup-folder shortcut to the running executable.
///
/// # Errors
/// Returns an error if COM fails or the folder is not writable.
#[cfg(target_os = "windows")]
pub fn create_startup_entry() -> anyhow::Result<()> {
    use anyhow::Context;
    use windows::core::{Interface, PCWSTR};
    use windows::Win32::Foundation::TRUE;
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

    fn wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    let exe = std::env::current_exe().context("Cannot locate the executable")?;
    let working_dir = exe
        .parent()
        .map(Path::to_path_buf)
        .context("Executable has no parent directory")?;
    let roaming = dirs::data_dir().context("No roaming app data directory")?;
    let startup_dir = windows_startup_dir(&roaming);
    fs::create_dir_all(&startup_dir)
        .with_context(|| format!("Cannot create {}", startup_dir.display()))?;
    let lnk_path = startup_dir.join(shortcut_filename());

    let exe_w = wide(&exe.to_string_lossy());
    let dir_w = wide(&working_dir.to_string_lossy());
    let lnk_w = wide(&lnk_path.to_string_lossy());

    unsafe {
        // Already initialized on this thread is fine
        let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);

        let link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)
            .context("CoCreateInstance(ShellLink) failed")?;
        link.SetPath(PCWSTR(exe_w.as_ptr()))
            .context("IShellLinkW::SetPath failed")?;
        link.SetWorkingDirectory(PCWSTR(dir_w.as_ptr()))
            .context("IShellLinkW::SetWorkingDirectory failed")?;
        link.SetIconLocation(PCWSTR(exe_w.as_ptr()), 0)
            .context("IShellLinkW::SetIconLocation failed")?;

        let persist: IPersistFile = link.cast().context("IPersistFile unavailable")?;
        persist
            .Save(PCWSTR(lnk_w.as_ptr()), TRUE)
            .with_context(|| format!("Cannot save {}", lnk_path.display()))?;
    }

    info!(path = %lnk_path.display(), "Created startup shortcut");
    Ok(())
}

/// Registers the app as a login item via SMAppService.
#[cfg(target_os = "macos")]
pub fn create_startup_entry() -> anyhow::Result<()> {
    use anyhow::Context;
    use smappservice_rs::{AppService, ServiceType};

    let service = AppService::new(ServiceType::MainApp);
    service
        .register()
        .map_err(|e| anyhow::anyhow!("Failed to register login item: {}", e))
        .context("SMAppService registration failed")?;
    info!("Registered login item");
    Ok(())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn create_startup_entry() -> anyhow::Result<()> {
    anyhow::bail!("Starting at login is not supported on this platform")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flag_roundtrip() {
        let dir = TempDir::new().unwrap();
        let flag = FirstRunFlag::at(dir.path().join("nested").join(FIRST_RUN_FLAG_FILENAME));
        assert!(!flag.is_set());

        flag.mark().unwrap();
        assert!(flag.is_set());
        assert_eq!(fs::read_to_string(flag.path()).unwrap(), "run=true");
    }

    #[test]
    fn test_declined_marks_flag_without_creating_entry() {
        let dir = TempDir::new().unwrap();
        let flag = FirstRunFlag::at(dir.path().join(FIRST_RUN_FLAG_FILENAME));
        let mut created = false;

        handle_startup_answer(&flag, false, || {
            created = true;
            Ok(())
        })
        .unwrap();

        assert!(flag.is_set());
        assert!(!created);
    }

    #[test]
    fn test_accepted_creates_entry() {
        let dir = TempDir::new().unwrap();
        let flag = FirstRunFlag::at(dir.path().join(FIRST_RUN_FLAG_FILENAME));
        let mut created = false;

        handle_startup_answer(&flag, true, || {
            created = true;
            Ok(())
        })
        .unwrap();

        assert!(flag.is_set());
        assert!(created);
    }

    #[test]
    fn test_failed_entry_is_critical_and_flag_still_written() {
        let dir = TempDir::new().unwrap();
        let flag = FirstRunFlag::at(dir.path().join(FIRST_RUN_FLAG_FILENAME));

        let err = handle_startup_answer(&flag, true, || anyhow::bail!("access denied"))
            .unwrap_err();

        assert!(matches!(err, MarketError::StartupShortcut(_)));
        assert_eq!(err.severity(), crate::error::ErrorSeverity::Critical);
        assert!(err.to_string().contains("access denied"));
        assert!(flag.is_set());
    }

    #[test]
    fn test_windows_startup_dir_layout() {
        let dir = windows_startup_dir(Path::new("/roaming"));
        assert!(dir.ends_with("Microsoft/Windows/Start Menu/Programs/Startup"));
        assert_eq!(shortcut_filename(), "ARC Raiders Market.lnk");
    }

    /// Creates a real login item / shortcut. Run manually.
    #[test]
    #[cfg(feature = "system-tests")]
    #[ignore]
    fn test_create_startup_entry_system() {
        create_startup_entry().unwrap();
    }
}
