//! Environment helpers for terminal detection tests.
//!
//! Tests using these must be `#[serial]`: the process environment is shared
//! by every test thread.

/// Temporarily set an environment variable for the duration of a closure.
///
/// The original value is restored after the closure completes.
pub fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    with_env(&[(key, Some(value))], f)
}

/// Temporarily remove an environment variable for the duration of a closure.
pub fn without_env_var<F, R>(key: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    with_env(&[(key, None)], f)
}

/// Apply several assignments (`None` removes) around a closure.
pub fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let originals: Vec<(&str, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (*key, std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        set(key, *value);
    }

    let result = f();

    for (key, value) in &originals {
        set(key, value.as_deref());
    }

    result
}

/// The detection variables all cleared, so only the streams decide.
pub fn with_clean_env<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_env(
        &[
            ("COULEUR_DISABLE", None),
            ("NO_COLOR", None),
            ("FORCE_COULEUR", None),
            ("TERM", None),
        ],
        f,
    )
}

fn set(key: &str, value: Option<&str>) {
    // SAFETY: Test-only code; callers are serialized with `#[serial]`.
    match value {
        Some(value) => unsafe { std::env::set_var(key, value) },
        None => unsafe { std::env::remove_var(key) },
    }
}
