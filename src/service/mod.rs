mod templates;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::process::Command;
use tera::Tera;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::ServiceError;
use crate::platform::PlatformFamily;

/// Install the platform's service-control files for the agent, then disable
/// and stop any running instance so the scheduler becomes the only thing
/// re-invoking it.
///
/// Linux-only: other targets skip this step and leave schedule
/// synchronization to run on its own.
pub fn install(config: &Config, client_bin: &Path) -> Result<()> {
    if !cfg!(target_os = "linux") {
        debug!("service control skipped: not a linux target");
        return Ok(());
    }

    let family = PlatformFamily::detect().ok_or_else(|| {
        ServiceError::UnsupportedPlatform("unrecognized /etc/os-release".into())
    })?;
    install_under(Path::new("/etc"), family, &config.agent.name, client_bin)?;
    disable_and_stop(&config.agent.name);
    Ok(())
}

/// Render and write the init script and the environment defaults file under
/// `etc_root`. Split out from [`install`] so tests can target a scratch root
/// with a forced family.
pub fn install_under(
    etc_root: &Path,
    family: PlatformFamily,
    agent_name: &str,
    client_bin: &Path,
) -> Result<()> {
    let (dist_dir, conf_dir) = family.dirs();

    let mut ctx = tera::Context::new();
    ctx.insert("agent_name", agent_name);
    ctx.insert("client_bin", &client_bin.display().to_string());
    ctx.insert("conf_dir", conf_dir);
    ctx.insert("env_file", &format!("/etc/{conf_dir}/{agent_name}"));

    let script = Tera::one_off(templates::init_script(dist_dir), &ctx, false)
        .map_err(|err| ServiceError::Render(err.to_string()))?;
    let script_path = etc_root.join("init.d").join(agent_name);
    write_control_file(&script_path, &script, 0o755)?;

    let env_file = Tera::one_off(templates::ENV_FILE, &ctx, false)
        .map_err(|err| ServiceError::Render(err.to_string()))?;
    let env_path = etc_root.join(conf_dir).join(agent_name);
    write_control_file(&env_path, &env_file, 0o644)?;

    info!(family = %family, script = %script_path.display(), "installed service-control files");
    Ok(())
}

fn write_control_file(path: &Path, content: &str, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("Failed to chmod {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

/// Disable and stop the agent's OS service. The service may never have been
/// installed, so failures here are logged and tolerated.
fn disable_and_stop(agent_name: &str) {
    for args in [["disable", agent_name], ["stop", agent_name]] {
        if let Err(err) = run_checked(Command::new("systemctl").args(args)) {
            debug!(service = agent_name, %err, "service {} skipped", args[0]);
        }
    }
}

fn run_checked(command: &mut Command) -> Result<()> {
    let output = command.output().context("Failed to spawn command")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("Command failed: {}", stderr.trim());
    }
    Ok(())
}
