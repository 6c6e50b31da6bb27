//! Embedded sources for the service-control files, one init-script flavor per
//! template directory the platform table can select.

pub(super) const REDHAT_INIT: &str = r#"#!/bin/bash
# {{ agent_name }} - manages the {{ agent_name }} daemon
#
# chkconfig: 2345 98 02
# description: Periodic convergence agent
# processname: {{ agent_name }}

[ -f {{ env_file }} ] && . {{ env_file }}

BINARY={{ client_bin }}
PIDFILE=/var/run/{{ agent_name }}.pid

case "$1" in
  start)
    echo -n "Starting {{ agent_name }}: "
    $BINARY -d -P $PIDFILE $OPTIONS
    ;;
  stop)
    echo -n "Stopping {{ agent_name }}: "
    [ -f $PIDFILE ] && kill $(cat $PIDFILE) && rm -f $PIDFILE
    ;;
  restart)
    $0 stop
    $0 start
    ;;
  status)
    [ -f $PIDFILE ] && kill -0 $(cat $PIDFILE) 2>/dev/null
    ;;
  *)
    echo "Usage: $0 {start|stop|restart|status}"
    exit 1
    ;;
esac
"#;

pub(super) const DEBIAN_INIT: &str = r#"#!/bin/sh
### BEGIN INIT INFO
# Provides:          {{ agent_name }}
# Required-Start:    $remote_fs $network
# Required-Stop:     $remote_fs $network
# Default-Start:     2 3 4 5
# Default-Stop:      0 1 6
# Short-Description: Periodic convergence agent
### END INIT INFO

[ -r {{ env_file }} ] && . {{ env_file }}

BINARY={{ client_bin }}
PIDFILE=/var/run/{{ agent_name }}.pid

case "$1" in
  start)
    start-stop-daemon --start --quiet --pidfile $PIDFILE --exec $BINARY -- -d -P $PIDFILE $OPTIONS
    ;;
  stop)
    start-stop-daemon --stop --quiet --pidfile $PIDFILE
    ;;
  restart)
    $0 stop
    $0 start
    ;;
  status)
    [ -f $PIDFILE ] && kill -0 $(cat $PIDFILE) 2>/dev/null
    ;;
  *)
    echo "Usage: $0 {start|stop|restart|status}"
    exit 1
    ;;
esac
"#;

pub(super) const SUSE_INIT: &str = r#"#!/bin/sh
### BEGIN INIT INFO
# Provides:          {{ agent_name }}
# Required-Start:    $remote_fs $network
# Required-Stop:     $remote_fs $network
# Default-Start:     2 3 5
# Default-Stop:      0 1 6
# Short-Description: Periodic convergence agent
### END INIT INFO

. /etc/rc.status
[ -f {{ env_file }} ] && . {{ env_file }}

BINARY={{ client_bin }}
PIDFILE=/var/run/{{ agent_name }}.pid

case "$1" in
  start)
    startproc -p $PIDFILE $BINARY -d -P $PIDFILE $OPTIONS
    ;;
  stop)
    killproc -p $PIDFILE $BINARY
    ;;
  restart)
    $0 stop
    $0 start
    ;;
  status)
    checkproc -p $PIDFILE $BINARY
    ;;
  *)
    echo "Usage: $0 {start|stop|restart|status}"
    exit 1
    ;;
esac
rc_exit
"#;

pub(super) const ENV_FILE: &str = r"# /etc/{{ conf_dir }}/{{ agent_name }}
# Environment defaults read by the init script. Uncomment to override.

# CONFIG=/etc/chef/client.rb
# INTERVAL=1800
# SPLAY=20
# LOGFILE=/var/log/chef/client.log
# OPTIONS=
";

/// The init-script source for a template flavor directory.
pub(super) fn init_script(dist_dir: &str) -> &'static str {
    match dist_dir {
        "debian" => DEBIAN_INIT,
        "suse" => SUSE_INIT,
        _ => REDHAT_INIT,
    }
}
