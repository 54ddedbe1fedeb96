use std::process::{Command, Stdio};
use tracing::{debug, info};

/// `<browser> -new-window <url> [-P <profile>]`, detached from this process.
pub fn launch_command(browser: &str, url: &str, profile: Option<&str>) -> Command {
    let mut cmd = Command::new(browser);
    cmd.arg("-new-window").arg(url);
    if let Some(profile) = profile {
        cmd.arg("-P").arg(profile);
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // New session: no controlling terminal, no SIGHUP when rofi exits.
    // Std opens every descriptor with O_CLOEXEC, so nothing else leaks in.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: setsid is async-signal-safe and touches no parent state.
        unsafe {
            cmd.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }

    cmd
}

/// Start the browser at `url` and return immediately. Whether it actually
/// started is not observed.
pub fn launch(browser: &str, url: &str, profile: Option<&str>) {
    info!("🌐 Opening {} in {}", url, browser);
    match launch_command(browser, url, profile).spawn() {
        // Dropping the handle does not kill or wait for the child.
        Ok(child) => debug!("Spawned {} (pid {})", browser, child.id()),
        Err(e) => debug!("Failed to spawn {}: {}", browser, e),
    }
}
