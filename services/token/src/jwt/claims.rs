//! Time claim resolution and payload assembly.

use serde_json::{Map, Value};

/// Registered claim names the builder derives from its time settings.
pub const ISSUED_AT: &str = "iat";
/// Not-before claim name.
pub const NOT_BEFORE: &str = "nbf";
/// Expiry claim name.
pub const EXPIRY: &str = "exp";

/// Numeric input accepted by the time setters, in Unix seconds.
pub trait TimeValue {
    /// The value as (possibly fractional) seconds.
    fn into_seconds(self) -> f64;
}

impl TimeValue for f64 {
    fn into_seconds(self) -> f64 {
        self
    }
}

impl TimeValue for f32 {
    fn into_seconds(self) -> f64 {
        f64::from(self)
    }
}

impl TimeValue for i32 {
    fn into_seconds(self) -> f64 {
        f64::from(self)
    }
}

impl TimeValue for u32 {
    fn into_seconds(self) -> f64 {
        f64::from(self)
    }
}

impl TimeValue for i64 {
    #[allow(clippy::cast_precision_loss)]
    fn into_seconds(self) -> f64 {
        self as f64
    }
}

impl TimeValue for u64 {
    #[allow(clippy::cast_precision_loss)]
    fn into_seconds(self) -> f64 {
        self as f64
    }
}

/// A resolved Unix-seconds timestamp.
///
/// `relative` is true when the value was derived from the clock rather than
/// supplied by the caller as an absolute instant. Only `value` ends up in the
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch
    pub value: i64,
    /// Derived from the clock rather than given by the caller
    pub relative: bool,
}

impl Timestamp {
    /// A caller supplied instant.
    #[must_use]
    pub const fn absolute(value: i64) -> Self {
        Self { value, relative: false }
    }

    /// An instant computed from the clock.
    #[must_use]
    pub const fn relative(value: i64) -> Self {
        Self { value, relative: true }
    }

    /// Zero is indistinguishable from "not set" when claims are assembled.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.value != 0
    }
}

/// Floor to whole seconds. NaN and infinities become zero, i.e. absent.
#[allow(clippy::cast_possible_truncation)]
fn floor_secs(value: f64) -> i64 {
    if value.is_finite() {
        value.floor() as i64
    } else {
        0
    }
}

/// Resolve an iat/nbf setting against `now`.
///
/// Zero (or NaN) means "now", a negative value means that many seconds
/// before now, anything else is an absolute instant.
#[must_use]
pub fn resolve_offset(value: f64, now: f64) -> Timestamp {
    if value == 0.0 || value.is_nan() {
        Timestamp::relative(floor_secs(now))
    } else if value < 0.0 {
        Timestamp::relative(floor_secs(now.floor() + value))
    } else {
        Timestamp::absolute(floor_secs(value))
    }
}

/// Resolve an expiry offset.
///
/// The offset is added to `issued_at` when one is set and non-zero, otherwise
/// to `now`. A non-finite offset resolves to zero and is dropped at build time.
#[must_use]
pub fn resolve_expiry(seconds: f64, issued_at: Option<Timestamp>, now: f64) -> Timestamp {
    match issued_at.filter(Timestamp::is_present) {
        Some(iat) => Timestamp::absolute(floor_secs(iat.value.into_seconds() + seconds)),
        None => Timestamp::relative(floor_secs(now.floor() + seconds)),
    }
}

/// Merge derived time claims with user claims. User claims win on collision.
#[must_use]
pub fn assemble(
    issued_at: Option<Timestamp>,
    not_before: Option<Timestamp>,
    expiry: Option<Timestamp>,
    user: &Map<String, Value>,
) -> Map<String, Value> {
    let mut claims = Map::new();

    for (name, ts) in [(ISSUED_AT, issued_at), (NOT_BEFORE, not_before), (EXPIRY, expiry)] {
        if let Some(ts) = ts.filter(Timestamp::is_present) {
            claims.insert(name.to_string(), Value::from(ts.value));
        }
    }

    for (key, value) in user {
        claims.insert(key.clone(), value.clone());
    }

    claims
}
