//! Tests for startup configuration

use super::*;

fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
    pairs
        .iter()
        .map(|(k, v)| (OsString::from(k), OsString::from(v)))
        .collect()
}

#[test]
fn test_targets_collect_values_with_prefix_in_order() {
    let targets = TargetList::from_vars(vars(&[
        ("ALIVE_B", "http://b.test"),
        ("HOME", "/root"),
        ("ALIVE_A", "http://a.test"),
    ]));

    let urls: Vec<&str> = targets.iter().collect();
    assert_eq!(urls, vec!["http://b.test", "http://a.test"]);
}

#[test]
fn test_targets_ignore_names_without_underscore_prefix() {
    let targets = TargetList::from_vars(vars(&[
        ("ALIVE", "http://no.test"),
        ("ALIVED_X", "http://no2.test"),
        ("alive_x", "http://lower.test"),
        ("X_ALIVE_Y", "http://infix.test"),
    ]));

    assert!(targets.is_empty());
}

#[test]
fn test_targets_keep_full_value_including_equals() {
    let targets = TargetList::from_vars(vars(&[("ALIVE_Q", "http://q.test/?a=1&b=2")]));

    assert_eq!(targets.iter().next(), Some("http://q.test/?a=1&b=2"));
}

#[test]
fn test_targets_keep_empty_values() {
    // No validation here; an empty URL fails at fetch time
    let targets = TargetList::from_vars(vars(&[("ALIVE_EMPTY", "")]));

    assert_eq!(targets.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_targets_skip_non_utf8_values() {
    use std::os::unix::ffi::OsStringExt;

    let targets = TargetList::from_vars(vec![
        (OsString::from("ALIVE_BAD"), OsString::from_vec(vec![0xff, 0xfe])),
        (OsString::from("ALIVE_OK"), OsString::from("http://ok.test")),
    ]);

    let urls: Vec<&str> = targets.iter().collect();
    assert_eq!(urls, vec!["http://ok.test"]);
}

#[test]
fn test_target_list_clones_share_storage() {
    let targets: TargetList = ["http://a.test", "http://b.test"].into_iter().collect();
    let cloned = targets.clone();

    assert!(Arc::ptr_eq(&targets.urls, &cloned.urls));
}

#[test]
fn test_config_defaults() {
    let config = Config::from_vars(vars(&[])).expect("empty environment is valid");

    assert_eq!(config.listen_addr, SocketAddr::from(([0, 0, 0, 0], 8001)));
    assert_eq!(config.poll_interval, Duration::from_secs(5));
    assert_eq!(config.listener_shutdown_timeout, Duration::from_secs(5));
    assert_eq!(config.fetch_timeout, None);
    assert!(config.targets.is_empty());
}

#[test]
fn test_config_reads_fetch_timeout() {
    let config = Config::from_vars(vars(&[
        ("POLL_FETCH_TIMEOUT_SECS", "3"),
        ("ALIVE_A", "http://a.test"),
    ]))
    .expect("valid timeout");

    assert_eq!(config.fetch_timeout, Some(Duration::from_secs(3)));
    assert_eq!(config.targets.len(), 1);
}

#[test]
fn test_config_rejects_invalid_fetch_timeout() {
    for bad in ["0", "-1", "soon", ""] {
        let result = Config::from_vars(vars(&[("POLL_FETCH_TIMEOUT_SECS", bad)]));
        assert_eq!(
            result.err(),
            Some(ConfigError::InvalidFetchTimeout(bad.to_string())),
            "value {:?} should be rejected",
            bad
        );
    }
}
