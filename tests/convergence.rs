//! End-to-end convergence behavior against scratch backend roots.

use std::fs;
use std::path::{Path, PathBuf};

use cronsync::Config;
use cronsync::schedule::{
    self, BackendKind, CronDStore, CrontabStore, ScheduleStore, apply, plan, remove_everywhere,
};
use tempfile::TempDir;

fn scratch_config(tmp: &TempDir) -> Config {
    let mut config = Config::default();
    config.schedule.identity = Some("node-01.example.net".into());
    config.backends.crontab = tmp.path().join("crontab");
    config.backends.cron_d = tmp.path().join("cron.d");
    config
}

fn stores(config: &Config) -> (CrontabStore, CronDStore) {
    (
        CrontabStore::new(config.backends.crontab.clone()),
        CronDStore::new(config.backends.cron_d.clone()),
    )
}

fn client_bin() -> PathBuf {
    PathBuf::from("/usr/bin/chef-client")
}

#[test]
fn full_pass_synthesizes_the_documented_command() {
    let tmp = TempDir::new().unwrap();
    let mut config = scratch_config(&tmp);
    config.schedule.splay = 300;
    config.schedule.shard_seed = Some(617); // 617 % 300 == 17
    config.schedule.env_vars = Some("FOO=bar".into());
    config.schedule.process_priority = Some(10);
    config.schedule.daemon_options = vec!["--once".into()];
    config.schedule.append_log = true;
    config.schedule.log_file = PathBuf::from("/var/log/chef/client.log");

    let plan = plan(&config, &client_bin());
    assert_eq!(
        plan.entry.command,
        "sleep 17; FOO=bar nice -n 10 /usr/bin/chef-client --once>> /var/log/chef/client.log 2>&1"
    );

    let (crontab, cron_d) = stores(&config);
    apply(&plan, &crontab, &cron_d).unwrap();

    let persisted = crontab.read("chef-client").unwrap().unwrap();
    assert_eq!(persisted.command, plan.entry.command);
}

#[test]
fn minimal_config_synthesizes_the_bare_command() {
    let tmp = TempDir::new().unwrap();
    let mut config = scratch_config(&tmp);
    config.schedule.splay = 0;
    config.schedule.log_file = PathBuf::from("/var/log/chef/client.log");

    let plan = plan(&config, &client_bin());
    assert_eq!(
        plan.entry.command,
        "/usr/bin/chef-client > /var/log/chef/client.log 2>&1"
    );
}

#[test]
fn repeated_passes_leave_byte_identical_state() {
    let tmp = TempDir::new().unwrap();
    let config = scratch_config(&tmp);
    let (crontab, cron_d) = stores(&config);

    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    let first = fs::read_to_string(&config.backends.crontab).unwrap();

    let outcome = apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    assert!(!outcome.wrote);
    assert_eq!(fs::read_to_string(&config.backends.crontab).unwrap(), first);
}

#[test]
fn toggling_the_backend_never_leaves_two_entries() {
    let tmp = TempDir::new().unwrap();
    let mut config = scratch_config(&tmp);
    let (crontab, cron_d) = stores(&config);

    let entries_present = |crontab: &CrontabStore, cron_d: &CronDStore| {
        usize::from(crontab.read("chef-client").unwrap().is_some())
            + usize::from(cron_d.read("chef-client").unwrap().is_some())
    };

    config.schedule.use_cron_d = false;
    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    assert_eq!(entries_present(&crontab, &cron_d), 1);

    config.schedule.use_cron_d = true;
    let moved = apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    assert!(moved.removed_stale);
    assert_eq!(entries_present(&crontab, &cron_d), 1);
    assert!(cron_d.read("chef-client").unwrap().is_some());

    config.schedule.use_cron_d = false;
    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    assert_eq!(entries_present(&crontab, &cron_d), 1);
    assert!(crontab.read("chef-client").unwrap().is_some());
}

#[test]
fn plan_is_stable_for_a_fixed_identity() {
    let tmp = TempDir::new().unwrap();
    let config = scratch_config(&tmp);

    let first = plan(&config, &client_bin());
    let second = plan(&config, &client_bin());
    assert_eq!(first, second);
    assert_eq!(first.active, BackendKind::Crontab);
}

#[test]
fn foreign_crontab_content_is_never_touched() {
    let tmp = TempDir::new().unwrap();
    let config = scratch_config(&tmp);
    let preexisting = "SHELL=/bin/sh\nPATH=/usr/bin:/bin\n\n17 2 * * * root /usr/sbin/logrotate\n";
    fs::write(&config.backends.crontab, preexisting).unwrap();

    let (crontab, cron_d) = stores(&config);
    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();

    let content = fs::read_to_string(&config.backends.crontab).unwrap();
    assert!(content.starts_with(preexisting));

    remove_everywhere("chef-client", &crontab, &cron_d).unwrap();
    assert_eq!(fs::read_to_string(&config.backends.crontab).unwrap(), preexisting);
}

#[test]
fn remove_everywhere_retires_whichever_backend_is_live() {
    let tmp = TempDir::new().unwrap();
    let mut config = scratch_config(&tmp);
    config.schedule.use_cron_d = true;
    let (crontab, cron_d) = stores(&config);

    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    assert_eq!(remove_everywhere("chef-client", &crontab, &cron_d).unwrap(), 1);
    assert_eq!(remove_everywhere("chef-client", &crontab, &cron_d).unwrap(), 0);
    assert!(!Path::new(&config.backends.cron_d).join("chef-client").exists());
}

#[test]
fn drop_in_entry_carries_path_and_mailto() {
    let tmp = TempDir::new().unwrap();
    let mut config = scratch_config(&tmp);
    config.schedule.use_cron_d = true;
    config.schedule.path = Some("/usr/local/bin:/usr/bin:/bin".into());
    config.schedule.mailto = Some("ops@example.com".into());

    let (crontab, cron_d) = stores(&config);
    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();

    let content = fs::read_to_string(config.backends.cron_d.join("chef-client")).unwrap();
    assert!(content.contains("PATH=/usr/local/bin:/usr/bin:/bin\n"));
    assert!(content.contains("MAILTO=ops@example.com\n"));
    assert!(content.contains(" root "));
}

#[test]
fn next_occurrence_is_reported_for_the_live_entry() {
    let tmp = TempDir::new().unwrap();
    let config = scratch_config(&tmp);
    let (crontab, cron_d) = stores(&config);

    apply(&plan(&config, &client_bin()), &crontab, &cron_d).unwrap();
    let entry = crontab.read("chef-client").unwrap().unwrap();

    let now = chrono::Utc::now();
    let next = schedule::next_occurrence(&entry, now).unwrap();
    assert!(next > now);
}
