#[cfg(target_os = "windows")]
mod windows;

#[cfg(unix)]
mod unix;

use thiserror::Error;

/// Startup refused because the process lacks elevated privileges
#[derive(Error, Debug)]
#[error("Elevated privileges required. {instructions}")]
pub struct PrivilegeError {
    pub instructions: &'static str,
}

/// Check if the process is running with elevated privileges
pub fn is_elevated() -> bool {
    #[cfg(target_os = "windows")]
    {
        windows::is_admin()
    }
    #[cfg(unix)]
    {
        unix::is_root()
    }
    #[cfg(not(any(target_os = "windows", unix)))]
    {
        false
    }
}

/// Get instructions for elevating privileges on the current platform
pub fn get_elevation_instructions() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "Right-click Command Prompt/PowerShell and select 'Run as Administrator'"
    }
    #[cfg(unix)]
    {
        "Run with sudo: 'sudo ./forensilock'"
    }
    #[cfg(not(any(target_os = "windows", unix)))]
    {
        "Run with elevated privileges appropriate for your operating system"
    }
}

/// Fail unless the process is elevated. Acquisition never starts without it.
///
/// Runs before logging is set up, so it reports only through its result.
pub fn require_elevation() -> Result<(), PrivilegeError> {
    if is_elevated() {
        Ok(())
    } else {
        Err(PrivilegeError {
            instructions: get_elevation_instructions(),
        })
    }
}
